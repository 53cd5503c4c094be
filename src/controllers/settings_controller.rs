use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::{SettingsResponse, UpdateSettingsRequest};
use crate::repositories::settings_repository::SettingsRepository;
use crate::utils::errors::AppError;

pub struct SettingsController {
    repository: SettingsRepository,
}

impl SettingsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SettingsRepository::new(pool),
        }
    }

    /// Leer settings, materializando el default si aún no existen
    pub async fn get(&self) -> Result<SettingsResponse, AppError> {
        let settings = self.repository.get_or_create().await?;
        Ok(settings.into())
    }

    pub async fn update(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<ApiResponse<SettingsResponse>, AppError> {
        request.validate()?;

        // El umbral es un porcentaje: fuera de [0,100] no tiene sentido
        if request.variance_threshold < Decimal::ZERO
            || request.variance_threshold > Decimal::ONE_HUNDRED
        {
            return Err(AppError::Validation(
                "variance_threshold must be between 0 and 100".to_string(),
            ));
        }

        let settings = self
            .repository
            .update_threshold(request.variance_threshold, request.actor_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            settings.into(),
            "Umbral de varianza actualizado exitosamente".to_string(),
        ))
    }
}
