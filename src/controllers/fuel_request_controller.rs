use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_request_dto::{
    ApproveFuelRequest, FuelRequestFilters, FuelRequestResponse, RejectFuelRequest,
    SubmitFuelRequest,
};
use crate::dto::stats_dto::FuelStatisticsResponse;
use crate::models::fuel_request::RequestStatus;
use crate::repositories::fuel_request_repository::FuelRequestRepository;
use crate::services::fuel_workflow_service::FuelWorkflowService;
use crate::services::statistics_service::StatisticsService;
use crate::utils::errors::AppError;

const DEFAULT_PAGE_SIZE: i64 = 50;

pub struct FuelRequestController {
    workflow: FuelWorkflowService,
    statistics: StatisticsService,
    repository: FuelRequestRepository,
}

impl FuelRequestController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            workflow: FuelWorkflowService::new(pool.clone()),
            statistics: StatisticsService::new(pool.clone()),
            repository: FuelRequestRepository::new(pool),
        }
    }

    pub async fn submit(
        &self,
        request: SubmitFuelRequest,
    ) -> Result<ApiResponse<FuelRequestResponse>, AppError> {
        request.validate()?;

        let submitted = self
            .workflow
            .submit(
                request.driver_id,
                &request.driver_name,
                request.vehicle_id,
                request.odometer_reading,
                request.requested_fuel,
            )
            .await?;

        let message = match submitted.status {
            RequestStatus::Flagged => {
                "Solicitud registrada y marcada para revisión por varianza anómala".to_string()
            }
            _ => "Solicitud registrada exitosamente".to_string(),
        };

        Ok(ApiResponse::success_with_message(submitted.into(), message))
    }

    pub async fn approve(
        &self,
        id: Uuid,
        request: ApproveFuelRequest,
    ) -> Result<ApiResponse<FuelRequestResponse>, AppError> {
        request.validate()?;

        let approved = self
            .workflow
            .approve(
                id,
                request.approver_id,
                &request.approver_name,
                request.notes.as_deref(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            approved.into(),
            "Solicitud aprobada exitosamente".to_string(),
        ))
    }

    pub async fn reject(
        &self,
        id: Uuid,
        request: RejectFuelRequest,
    ) -> Result<ApiResponse<FuelRequestResponse>, AppError> {
        request.validate()?;

        let rejected = self
            .workflow
            .reject(id, request.rejector_id, &request.rejector_name, &request.reason)
            .await?;

        Ok(ApiResponse::success_with_message(
            rejected.into(),
            "Solicitud rechazada".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<FuelRequestResponse, AppError> {
        let request = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fuel request with id '{}' not found", id)))?;

        Ok(request.into())
    }

    pub async fn list(
        &self,
        filters: FuelRequestFilters,
    ) -> Result<Vec<FuelRequestResponse>, AppError> {
        let status = match filters.status.as_deref() {
            Some(raw) => Some(raw.parse::<RequestStatus>().map_err(AppError::Validation)?),
            None => None,
        };

        let requests = self
            .repository
            .list(
                status,
                filters.vehicle_id,
                filters.limit.unwrap_or(DEFAULT_PAGE_SIZE),
                filters.offset.unwrap_or(0),
            )
            .await?;

        Ok(requests.into_iter().map(Into::into).collect())
    }

    pub async fn statistics(&self) -> Result<FuelStatisticsResponse, AppError> {
        self.statistics.fuel_statistics().await
    }
}
