use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::settings::AppSettings;

// Request para actualizar el umbral de varianza (porcentaje, [0,100])
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub variance_threshold: Decimal,
    pub actor_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub actor_name: String,
}

// Response de settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub variance_threshold: Decimal,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppSettings> for SettingsResponse {
    fn from(settings: AppSettings) -> Self {
        Self {
            variance_threshold: settings.variance_threshold,
            updated_by: settings.updated_by,
            updated_at: settings.updated_at,
        }
    }
}
