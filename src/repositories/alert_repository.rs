use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::alert::{Alert, ALERT_TYPE_FUEL_ANOMALY};
use crate::utils::errors::AppError;

pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear la alerta de anomalía en la misma transacción que la solicitud
    /// flaggeada; nunca como escritura independiente
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fuel_request_id: Uuid,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Alert, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO fuel_alerts (id, fuel_request_id, alert_type, message, acknowledged, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(fuel_request_id)
        .bind(ALERT_TYPE_FUEL_ANOMALY)
        .bind(message)
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(alert)
    }

    /// Reconocer todas las alertas abiertas de una solicitud, dentro de la
    /// transacción de resolución terminal
    pub async fn acknowledge_for_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fuel_request_id: Uuid,
        acknowledged_by: Uuid,
        acknowledged_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE fuel_alerts
            SET acknowledged = TRUE, acknowledged_by = $2, acknowledged_at = $3
            WHERE fuel_request_id = $1 AND acknowledged = FALSE
            "#,
        )
        .bind(fuel_request_id)
        .bind(acknowledged_by)
        .bind(acknowledged_at)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list(
        &self,
        only_unacknowledged: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM fuel_alerts
            WHERE ($1 = FALSE OR acknowledged = FALSE)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(only_unacknowledged)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn find_by_request(&self, fuel_request_id: Uuid) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT * FROM fuel_alerts WHERE fuel_request_id = $1 ORDER BY created_at DESC",
        )
        .bind(fuel_request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }
}
