use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::settings::AppSettings;
use crate::utils::errors::AppError;

pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Leer los settings materializando el default si la fila no existe.
    /// El upsert con DO NOTHING hace la materialización idempotente bajo
    /// lecturas concurrentes.
    pub async fn get_or_create(&self) -> Result<AppSettings, AppError> {
        sqlx::query(
            r#"
            INSERT INTO app_settings (id, variance_threshold, updated_at)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(AppSettings::default_threshold())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let settings = sqlx::query_as::<_, AppSettings>("SELECT * FROM app_settings WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(settings)
    }

    /// Variante transaccional usada por el workflow de submission
    pub async fn get_or_create_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<AppSettings, AppError> {
        sqlx::query(
            r#"
            INSERT INTO app_settings (id, variance_threshold, updated_at)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(AppSettings::default_threshold())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

        let settings = sqlx::query_as::<_, AppSettings>("SELECT * FROM app_settings WHERE id = 1")
            .fetch_one(&mut **tx)
            .await?;

        Ok(settings)
    }

    pub async fn update_threshold(
        &self,
        variance_threshold: Decimal,
        updated_by: Uuid,
    ) -> Result<AppSettings, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(
            r#"
            INSERT INTO app_settings (id, variance_threshold, updated_by, updated_at)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET variance_threshold = EXCLUDED.variance_threshold,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(variance_threshold)
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
