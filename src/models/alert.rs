//! Modelo de Alert
//!
//! Alertas de anomalía ligadas a solicitudes de combustible flaggeadas.
//! Se crean solo como efecto de una submission flaggeada y se reconocen
//! solo como efecto de la resolución terminal de esa solicitud.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de alerta soportado actualmente
pub const ALERT_TYPE_FUEL_ANOMALY: &str = "fuel_anomaly";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub fuel_request_id: Uuid,
    pub alert_type: String,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
    pub acknowledged_by: Option<Uuid>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}
