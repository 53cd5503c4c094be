//! Agregador de estadísticas de combustible
//!
//! Vista derivada de solo lectura: acumula combustible aprobado y distancia
//! por ventanas rodantes (hoy / 7 / 30 / 365 días, todas ancladas a la
//! medianoche local). Se recalcula desde cero en cada llamada; no hay estado
//! incremental que mantener consistente.

use chrono::{DateTime, Duration, Local, NaiveTime, Utc};
use sqlx::PgPool;

use crate::dto::stats_dto::{FuelStatisticsResponse, WindowTotals};
use crate::models::fuel_request::FuelRequest;
use crate::repositories::fuel_request_repository::FuelRequestRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

/// Inicios de cada ventana rodante
#[derive(Debug, Clone, Copy)]
pub struct WindowBoundaries {
    pub today_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub year_start: DateTime<Utc>,
}

impl WindowBoundaries {
    /// Ventanas ancladas a la medianoche local del día dado
    pub fn anchored_at(today_start: DateTime<Utc>) -> Self {
        Self {
            today_start,
            week_start: today_start - Duration::days(7),
            month_start: today_start - Duration::days(30),
            year_start: today_start - Duration::days(365),
        }
    }
}

/// Acumular totales por ventana. Una solicitud cuenta en cada ventana cuyo
/// inicio supera; las ventanas están anidadas, no son excluyentes.
pub fn accumulate_windows(
    requests: &[FuelRequest],
    boundaries: WindowBoundaries,
) -> (WindowTotals, WindowTotals, WindowTotals, WindowTotals) {
    let mut today = WindowTotals::default();
    let mut week = WindowTotals::default();
    let mut month = WindowTotals::default();
    let mut year = WindowTotals::default();

    for request in requests {
        let distance = request.distance_travelled.unwrap_or_default();
        for (start, totals) in [
            (boundaries.today_start, &mut today),
            (boundaries.week_start, &mut week),
            (boundaries.month_start, &mut month),
            (boundaries.year_start, &mut year),
        ] {
            if request.requested_at >= start {
                totals.fuel_litres += request.requested_fuel;
                totals.distance_km += distance;
                totals.request_count += 1;
            }
        }
    }

    (today, week, month, year)
}

pub struct StatisticsService {
    requests: FuelRequestRepository,
    vehicles: VehicleRepository,
}

impl StatisticsService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            requests: FuelRequestRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Rollup completo: ventanas sobre solicitudes aprobadas, total de
    /// vehículos y solicitudes abiertas
    pub async fn fuel_statistics(&self) -> Result<FuelStatisticsResponse, AppError> {
        let now = Local::now();
        let today_start = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .ok_or_else(|| AppError::Internal("could not resolve local midnight".to_string()))?
            .with_timezone(&Utc);

        let boundaries = WindowBoundaries::anchored_at(today_start);

        // Un solo scan con la ventana más ancha; el resto se deriva en memoria
        let approved = self.requests.approved_since(boundaries.year_start).await?;
        let (today, week, month, year) = accumulate_windows(&approved, boundaries);

        let total_vehicles = self.vehicles.count().await?;
        let open_requests = self.requests.open_count().await?;

        Ok(FuelStatisticsResponse {
            today,
            week,
            month,
            year,
            total_vehicles,
            open_requests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fuel_request::RequestStatus;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("literal decimal")
    }

    fn approved_request(
        requested_at: DateTime<Utc>,
        fuel: &str,
        distance: Option<&str>,
    ) -> FuelRequest {
        FuelRequest {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            vehicle_registration: "AB-123-CD".to_string(),
            driver_id: Uuid::new_v4(),
            driver_name: "Test Driver".to_string(),
            requested_at,
            odometer_reading: dec("1000"),
            last_odometer_reading: None,
            distance_travelled: distance.map(dec),
            requested_fuel: dec(fuel),
            expected_fuel: None,
            variance_percentage: None,
            status: RequestStatus::Approved,
            resolved_by: None,
            resolved_by_name: None,
            resolved_at: None,
            resolution_notes: None,
        }
    }

    fn boundaries() -> WindowBoundaries {
        let today_start = Utc.with_ymd_and_hms(2026, 8, 30, 0, 0, 0).unwrap();
        WindowBoundaries::anchored_at(today_start)
    }

    #[test]
    fn test_request_counts_in_all_nested_windows() {
        let b = boundaries();
        let requests = vec![approved_request(
            b.today_start + Duration::hours(8),
            "25",
            Some("200"),
        )];

        let (today, week, month, year) = accumulate_windows(&requests, b);

        for totals in [&today, &week, &month, &year] {
            assert_eq!(totals.fuel_litres, dec("25"));
            assert_eq!(totals.distance_km, dec("200"));
            assert_eq!(totals.request_count, 1);
        }
    }

    #[test]
    fn test_yesterday_is_excluded_from_today_only() {
        let b = boundaries();
        let requests = vec![approved_request(
            b.today_start - Duration::hours(5),
            "10",
            Some("80"),
        )];

        let (today, week, month, year) = accumulate_windows(&requests, b);

        assert_eq!(today.request_count, 0);
        assert_eq!(week.request_count, 1);
        assert_eq!(month.request_count, 1);
        assert_eq!(year.request_count, 1);
    }

    #[test]
    fn test_old_request_only_lands_in_wider_windows() {
        let b = boundaries();
        let requests = vec![
            approved_request(b.today_start - Duration::days(10), "30", Some("250")),
            approved_request(b.today_start - Duration::days(100), "40", None),
        ];

        let (today, week, month, year) = accumulate_windows(&requests, b);

        assert_eq!(today.request_count, 0);
        assert_eq!(week.request_count, 0);
        assert_eq!(month.request_count, 1);
        assert_eq!(month.fuel_litres, dec("30"));
        assert_eq!(year.request_count, 2);
        assert_eq!(year.fuel_litres, dec("70"));
        // Sin distancia registrada la solicitud suma cero km, no se descarta
        assert_eq!(year.distance_km, dec("250"));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let b = boundaries();
        let requests = vec![approved_request(b.week_start, "12", Some("90"))];

        let (_, week, _, _) = accumulate_windows(&requests, b);
        assert_eq!(week.request_count, 1);
    }

    #[test]
    fn test_boundaries_trail_local_midnight() {
        let b = boundaries();
        assert_eq!(b.today_start - b.week_start, Duration::days(7));
        assert_eq!(b.today_start - b.month_start, Duration::days(30));
        assert_eq!(b.today_start - b.year_start, Duration::days(365));
    }
}
