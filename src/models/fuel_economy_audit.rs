//! Modelo de FuelEconomyAuditEntry
//!
//! Historial append-only de cambios de rendimiento por vehículo.
//! old_value es None en el primer set del ratio.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelEconomyAuditEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub old_value: Option<Decimal>,
    pub new_value: Decimal,
    pub changed_by: Uuid,
    pub changed_by_name: String,
    pub changed_at: DateTime<Utc>,
}
