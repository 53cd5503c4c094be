use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::fuel_economy_audit::FuelEconomyAuditEntry;
use crate::utils::errors::AppError;

pub struct FuelEconomyAuditRepository {
    pool: PgPool,
}

impl FuelEconomyAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Una entrada por cambio aplicado, en la misma transacción que la
    /// escritura del registro de vehículos
    pub async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
        old_value: Option<Decimal>,
        new_value: Decimal,
        changed_by: Uuid,
        changed_by_name: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<FuelEconomyAuditEntry, AppError> {
        let entry = sqlx::query_as::<_, FuelEconomyAuditEntry>(
            r#"
            INSERT INTO fuel_economy_audit (id, vehicle_id, old_value, new_value, changed_by, changed_by_name, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(old_value)
        .bind(new_value)
        .bind(changed_by)
        .bind(changed_by_name)
        .bind(changed_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    /// Historial del vehículo, más reciente primero
    pub async fn history(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<FuelEconomyAuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, FuelEconomyAuditEntry>(
            r#"
            SELECT * FROM fuel_economy_audit
            WHERE vehicle_id = $1
            ORDER BY changed_at DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
