use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 20))]
    pub registration_number: String,

    /// km por litro; opcional en el alta, configurable luego vía el
    /// updater auditado
    pub fuel_economy: Option<Decimal>,
}

// Request para actualizar el rendimiento (km/L) de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFuelEconomyRequest {
    pub fuel_economy: Decimal,
    pub actor_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub actor_name: String,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub registration_number: String,
    pub fuel_economy: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            fuel_economy: vehicle.fuel_economy,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

// Entrada del historial de cambios de rendimiento
#[derive(Debug, Serialize)]
pub struct FuelEconomyHistoryResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub old_value: Option<Decimal>,
    pub new_value: Decimal,
    pub changed_by: Uuid,
    pub changed_by_name: String,
    pub changed_at: DateTime<Utc>,
}

impl From<crate::models::fuel_economy_audit::FuelEconomyAuditEntry> for FuelEconomyHistoryResponse {
    fn from(entry: crate::models::fuel_economy_audit::FuelEconomyAuditEntry) -> Self {
        Self {
            id: entry.id,
            vehicle_id: entry.vehicle_id,
            old_value: entry.old_value,
            new_value: entry.new_value,
            changed_by: entry.changed_by,
            changed_by_name: entry.changed_by_name,
            changed_at: entry.changed_at,
        }
    }
}
