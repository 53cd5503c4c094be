//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle que mapea a la tabla vehicles.
//! El rendimiento de combustible (km por litro) solo se modifica a través
//! del servicio auditado de fuel economy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_number: String,
    /// km por litro; None hasta que un administrador lo configure
    pub fuel_economy: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
