use rust_decimal::Decimal;
use serde::Serialize;

// Acumulado de una ventana (hoy / 7 días / 30 días / 365 días)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowTotals {
    pub fuel_litres: Decimal,
    pub distance_km: Decimal,
    pub request_count: u64,
}

// Rollup completo de estadísticas de combustible
#[derive(Debug, Serialize)]
pub struct FuelStatisticsResponse {
    pub today: WindowTotals,
    pub week: WindowTotals,
    pub month: WindowTotals,
    pub year: WindowTotals,
    pub total_vehicles: i64,
    pub open_requests: i64,
}
