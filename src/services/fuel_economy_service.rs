//! Updater auditado de rendimiento de combustible
//!
//! El ratio (km/L) de un vehículo solo se modifica por aquí: la escritura en
//! el registro y la entrada de auditoría old→new commitean en la misma
//! transacción, así el historial nunca diverge del valor vigente.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::fuel_economy_audit::FuelEconomyAuditEntry;
use crate::models::vehicle::Vehicle;
use crate::repositories::fuel_economy_audit_repository::FuelEconomyAuditRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct FuelEconomyService {
    pool: PgPool,
    vehicles: VehicleRepository,
    audit: FuelEconomyAuditRepository,
}

impl FuelEconomyService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            audit: FuelEconomyAuditRepository::new(pool.clone()),
            pool,
        }
    }

    /// Actualizar el ratio de un vehículo dejando exactamente una entrada de
    /// auditoría por cambio aplicado
    pub async fn update_fuel_economy(
        &self,
        vehicle_id: Uuid,
        new_ratio: Decimal,
        actor_id: Uuid,
        actor_name: &str,
    ) -> Result<Vehicle, AppError> {
        if new_ratio <= Decimal::ZERO {
            return Err(AppError::Validation(
                "fuel_economy must be greater than zero".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let vehicle = self
            .vehicles
            .lock_for_update(&mut tx, vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id '{}' not found", vehicle_id))
            })?;

        let old_value = vehicle.fuel_economy;
        let updated = self
            .vehicles
            .set_fuel_economy(&mut tx, vehicle_id, new_ratio)
            .await?;

        self.audit
            .append(&mut tx, vehicle_id, old_value, new_ratio, actor_id, actor_name, Utc::now())
            .await?;

        tx.commit().await?;

        info!(
            "🔧 Fuel economy for vehicle {} changed {:?} -> {} by {}",
            updated.registration_number, old_value, new_ratio, actor_name
        );
        Ok(updated)
    }

    /// Historial de cambios del vehículo, más reciente primero
    pub async fn history(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<FuelEconomyAuditEntry>, AppError> {
        // Validar que el vehículo existe para devolver 404 en vez de lista vacía
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id '{}' not found", vehicle_id))
            })?;

        self.audit.history(vehicle_id).await
    }
}
