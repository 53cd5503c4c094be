use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::fuel_request_dto::{AlertFilters, AlertResponse};
use crate::repositories::alert_repository::AlertRepository;
use crate::utils::errors::AppError;

const DEFAULT_PAGE_SIZE: i64 = 50;

pub struct AlertController {
    repository: AlertRepository,
}

impl AlertController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AlertRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: AlertFilters) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self
            .repository
            .list(
                filters.unacknowledged.unwrap_or(false),
                filters.limit.unwrap_or(DEFAULT_PAGE_SIZE),
                filters.offset.unwrap_or(0),
            )
            .await?;

        Ok(alerts.into_iter().map(Into::into).collect())
    }

    pub async fn list_for_request(
        &self,
        fuel_request_id: Uuid,
    ) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self.repository.find_by_request(fuel_request_id).await?;
        Ok(alerts.into_iter().map(Into::into).collect())
    }
}
