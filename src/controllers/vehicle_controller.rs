use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, FuelEconomyHistoryResponse, UpdateFuelEconomyRequest, VehicleResponse,
};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::fuel_economy_service::FuelEconomyService;
use crate::utils::errors::{conflict_error, AppError};

pub struct VehicleController {
    repository: VehicleRepository,
    fuel_economy: FuelEconomyService,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            fuel_economy: FuelEconomyService::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let registration = request.registration_number.trim().to_string();
        if registration.is_empty() {
            return Err(AppError::Validation("La matrícula es requerida".to_string()));
        }

        if let Some(ratio) = request.fuel_economy {
            if ratio <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "fuel_economy must be greater than zero".to_string(),
                ));
            }
        }

        // La matrícula es única en todo el sistema
        if self.repository.registration_exists(&registration).await? {
            return Err(conflict_error("Vehicle", "registration_number", &registration));
        }

        let vehicle = self
            .repository
            .create(registration, request.fuel_economy)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list().await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn update_fuel_economy(
        &self,
        id: Uuid,
        request: UpdateFuelEconomyRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .fuel_economy
            .update_fuel_economy(id, request.fuel_economy, request.actor_id, &request.actor_name)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Rendimiento actualizado exitosamente".to_string(),
        ))
    }

    pub async fn fuel_economy_history(
        &self,
        id: Uuid,
    ) -> Result<Vec<FuelEconomyHistoryResponse>, AppError> {
        let entries = self.fuel_economy.history(id).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }
}
