use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::fuel_request::{FuelRequest, RequestStatus};
use crate::utils::errors::AppError;

pub struct FuelRequestRepository {
    pool: PgPool,
}

impl FuelRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar la solicitud dentro de la transacción de submission
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &FuelRequest,
    ) -> Result<FuelRequest, AppError> {
        let inserted = sqlx::query_as::<_, FuelRequest>(
            r#"
            INSERT INTO fuel_requests (
                id, vehicle_id, vehicle_registration, driver_id, driver_name,
                requested_at, odometer_reading, last_odometer_reading,
                distance_travelled, requested_fuel, expected_fuel,
                variance_percentage, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(request.vehicle_id)
        .bind(&request.vehicle_registration)
        .bind(request.driver_id)
        .bind(&request.driver_name)
        .bind(request.requested_at)
        .bind(request.odometer_reading)
        .bind(request.last_odometer_reading)
        .bind(request.distance_travelled)
        .bind(request.requested_fuel)
        .bind(request.expected_fuel)
        .bind(request.variance_percentage)
        .bind(request.status)
        .fetch_one(&mut **tx)
        .await?;

        Ok(inserted)
    }

    /// Última solicitud aprobada del vehículo, leída dentro de la
    /// transacción para que el check de kilometraje no use un valor stale
    pub async fn latest_approved_for_vehicle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
    ) -> Result<Option<FuelRequest>, AppError> {
        let request = sqlx::query_as::<_, FuelRequest>(
            r#"
            SELECT * FROM fuel_requests
            WHERE vehicle_id = $1 AND status = 'approved'
            ORDER BY requested_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FuelRequest>, AppError> {
        let request = sqlx::query_as::<_, FuelRequest>("SELECT * FROM fuel_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    /// Leer la solicitud con lock de fila antes de resolverla
    pub async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<FuelRequest>, AppError> {
        let request =
            sqlx::query_as::<_, FuelRequest>("SELECT * FROM fuel_requests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(request)
    }

    /// Aplicar la resolución terminal (approve/reject) dentro de la
    /// transacción que también reconoce las alertas
    pub async fn resolve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: RequestStatus,
        resolved_by: Uuid,
        resolved_by_name: &str,
        resolution_notes: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> Result<FuelRequest, AppError> {
        let request = sqlx::query_as::<_, FuelRequest>(
            r#"
            UPDATE fuel_requests
            SET status = $2, resolved_by = $3, resolved_by_name = $4,
                resolution_notes = $5, resolved_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(resolved_by)
        .bind(resolved_by_name)
        .bind(resolution_notes)
        .bind(resolved_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        vehicle_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FuelRequest>, AppError> {
        let requests = sqlx::query_as::<_, FuelRequest>(
            r#"
            SELECT * FROM fuel_requests
            WHERE ($1::request_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
            ORDER BY requested_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(vehicle_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Solicitudes aprobadas desde un instante dado, para el agregador de
    /// estadísticas (ventana más ancha; las demás se derivan en memoria)
    pub async fn approved_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<FuelRequest>, AppError> {
        let requests = sqlx::query_as::<_, FuelRequest>(
            r#"
            SELECT * FROM fuel_requests
            WHERE status = 'approved' AND requested_at >= $1
            ORDER BY requested_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Solicitudes aún sin resolver (pending o flagged)
    pub async fn open_count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM fuel_requests WHERE status IN ('pending', 'flagged')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
