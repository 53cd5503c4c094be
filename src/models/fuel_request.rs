//! Modelo de FuelRequest
//!
//! Este módulo contiene el struct FuelRequest y el enum de estados con sus
//! reglas de transición. Los campos derivados (distancia, combustible
//! esperado, varianza) son Option: "no calculable" se distingue
//! estructuralmente de "calculado como cero".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la solicitud - mapea al ENUM request_status
///
/// Transiciones permitidas: Pending/Flagged → Approved/Rejected.
/// Approved y Rejected son terminales; la decisión Pending/Flagged se toma
/// una sola vez en la submission a partir de la varianza calculada.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Flagged,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Un estado terminal no admite más transiciones
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Flagged => "flagged",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "flagged" => Ok(RequestStatus::Flagged),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("unknown request status '{}'", other)),
        }
    }
}

/// FuelRequest principal - mapea exactamente a la tabla fuel_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelRequest {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_registration: String,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub requested_at: DateTime<Utc>,
    pub odometer_reading: Decimal,
    pub last_odometer_reading: Option<Decimal>,
    pub distance_travelled: Option<Decimal>,
    pub requested_fuel: Decimal,
    pub expected_fuel: Option<Decimal>,
    pub variance_percentage: Option<Decimal>,
    pub status: RequestStatus,
    pub resolved_by: Option<Uuid>,
    pub resolved_by_name: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_terminal_classification() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Flagged.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Flagged,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(RequestStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(RequestStatus::from_str("cancelled").is_err());
    }
}
