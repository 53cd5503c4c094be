//! Modelo de Settings
//!
//! Fila singleton con el umbral de varianza usado por el detector de
//! anomalías. Si no existe, el engine materializa el default antes del
//! primer uso.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Umbral por defecto (porcentaje) cuando no hay settings guardados
pub const DEFAULT_VARIANCE_THRESHOLD: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppSettings {
    pub id: i32,
    pub variance_threshold: Decimal,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl AppSettings {
    pub fn default_threshold() -> Decimal {
        Decimal::from(DEFAULT_VARIANCE_THRESHOLD)
    }
}
