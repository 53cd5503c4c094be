use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::alert::Alert;
use crate::models::fuel_request::{FuelRequest, RequestStatus};

// Request para someter una solicitud de combustible
// La identidad del conductor llega ya autenticada desde la capa superior.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFuelRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub driver_name: String,

    pub odometer_reading: Decimal,
    pub requested_fuel: Decimal,
}

// Request para aprobar una solicitud
#[derive(Debug, Deserialize, Validate)]
pub struct ApproveFuelRequest {
    pub approver_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub approver_name: String,

    pub notes: Option<String>,
}

// Request para rechazar una solicitud - el motivo es obligatorio
#[derive(Debug, Deserialize, Validate)]
pub struct RejectFuelRequest {
    pub rejector_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub rejector_name: String,

    #[validate(length(min = 1))]
    pub reason: String,
}

// Filtros para el listado de solicitudes
#[derive(Debug, Deserialize)]
pub struct FuelRequestFilters {
    pub status: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Response de solicitud - los campos derivados son nullable para que el
// consumidor distinga "no calculable" de "cero"
#[derive(Debug, Serialize)]
pub struct FuelRequestResponse {
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

impl From<FuelRequest> for FuelRequestResponse {
    fn from(request: FuelRequest) -> Self {
        Self {
            id: request.id,
            vehicle_id: request.vehicle_id,
            vehicle_registration: request.vehicle_registration,
            driver_id: request.driver_id,
            driver_name: request.driver_name,
            requested_at: request.requested_at,
            odometer_reading: request.odometer_reading,
            last_odometer_reading: request.last_odometer_reading,
            distance_travelled: request.distance_travelled,
            requested_fuel: request.requested_fuel,
            expected_fuel: request.expected_fuel,
            variance_percentage: request.variance_percentage,
            status: request.status,
            resolved_by: request.resolved_by,
            resolved_by_name: request.resolved_by_name,
            resolved_at: request.resolved_at,
            resolution_notes: request.resolution_notes,
        }
    }
}

// Filtros para el listado de alertas
#[derive(Debug, Deserialize)]
pub struct AlertFilters {
    pub unacknowledged: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Response de alerta
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub id: Uuid,
    pub fuel_request_id: Uuid,
    pub alert_type: String,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
    pub acknowledged_by: Option<Uuid>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            fuel_request_id: alert.fuel_request_id,
            alert_type: alert.alert_type,
            message: alert.message,
            acknowledged: alert.acknowledged,
            created_at: alert.created_at,
            acknowledged_by: alert.acknowledged_by,
            acknowledged_at: alert.acknowledged_at,
        }
    }
}
