//! Workflow de solicitudes de combustible
//!
//! El núcleo del sistema: calcula los campos derivados de una submission
//! (distancia, combustible esperado, varianza), decide el estado inicial
//! (pending/flagged) contra el umbral configurado y maneja las transiciones
//! terminales approve/reject.
//!
//! Invariantes que este servicio garantiza:
//! - una solicitud flaggeada nunca existe sin su alerta (misma transacción)
//! - una resolución terminal y el reconocimiento de sus alertas commitean
//!   juntos o no commitean
//! - el check de kilometraje monotónico se evalúa contra la última solicitud
//!   aprobada leída dentro de la transacción, con el vehículo lockeado

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::fuel_request::{FuelRequest, RequestStatus};
use crate::repositories::alert_repository::AlertRepository;
use crate::repositories::fuel_request_repository::FuelRequestRepository;
use crate::repositories::settings_repository::SettingsRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

/// Reintentos ante fallos de serialización de Postgres antes de devolver
/// Conflict al caller
const MAX_TX_ATTEMPTS: u32 = 3;

/// Resultado del cálculo puro de una submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionEvaluation {
    pub last_odometer_reading: Option<Decimal>,
    pub distance_travelled: Option<Decimal>,
    pub expected_fuel: Option<Decimal>,
    pub variance_percentage: Option<Decimal>,
    pub status: RequestStatus,
}

/// Calcular campos derivados y estado inicial de una submission.
///
/// La distancia existe solo con una solicitud aprobada previa; el combustible
/// esperado y la varianza solo cuando además hay un ratio positivo
/// configurado. Sin varianza calculable el estado es siempre Pending: la
/// ausencia de evidencia no es evidencia de anomalía.
pub fn evaluate_submission(
    odometer_reading: Decimal,
    requested_fuel: Decimal,
    prior_approved_odometer: Option<Decimal>,
    fuel_economy: Option<Decimal>,
    variance_threshold: Decimal,
) -> Result<SubmissionEvaluation, AppError> {
    if odometer_reading <= Decimal::ZERO {
        return Err(AppError::Validation(
            "odometer_reading must be greater than zero".to_string(),
        ));
    }
    if requested_fuel <= Decimal::ZERO {
        return Err(AppError::Validation(
            "requested_fuel must be greater than zero".to_string(),
        ));
    }

    let distance_travelled = match prior_approved_odometer {
        Some(previous) => {
            if odometer_reading <= previous {
                return Err(AppError::MileageRegression {
                    submitted: odometer_reading,
                    previous,
                });
            }
            Some(odometer_reading - previous)
        }
        None => None,
    };

    let (expected_fuel, variance_percentage) = match (distance_travelled, fuel_economy) {
        (Some(distance), Some(ratio)) if ratio > Decimal::ZERO => {
            let expected = (distance / ratio).round_dp(2);
            if expected > Decimal::ZERO {
                let variance = ((requested_fuel - expected) / expected
                    * Decimal::ONE_HUNDRED)
                    .round_dp(2);
                (Some(expected), Some(variance))
            } else {
                (Some(expected), None)
            }
        }
        _ => (None, None),
    };

    let status = match variance_percentage {
        Some(variance) if variance.abs() > variance_threshold => RequestStatus::Flagged,
        _ => RequestStatus::Pending,
    };

    Ok(SubmissionEvaluation {
        last_odometer_reading: prior_approved_odometer,
        distance_travelled,
        expected_fuel,
        variance_percentage,
        status,
    })
}

/// Guard de transición: solo una solicitud no terminal admite resolución.
/// Approved y Rejected son definitivos, sin reversión.
pub fn ensure_resolvable(request_id: Uuid, status: RequestStatus) -> Result<(), AppError> {
    if status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Fuel request {} is already {}",
            request_id,
            status.as_str()
        )));
    }
    Ok(())
}

/// Mensaje de la alerta de anomalía con esperado vs solicitado y varianza
pub fn build_alert_message(
    vehicle_registration: &str,
    expected_fuel: Decimal,
    requested_fuel: Decimal,
    variance_percentage: Decimal,
) -> String {
    let signed_variance = if variance_percentage >= Decimal::ZERO {
        format!("+{}", variance_percentage)
    } else {
        variance_percentage.to_string()
    };
    format!(
        "Solicitud anómala para el vehículo {}: {} L solicitados frente a {} L esperados (varianza {}%)",
        vehicle_registration, requested_fuel, expected_fuel, signed_variance
    )
}

/// Fallo transitorio de serialización que la capa de transacción puede
/// reintentar (SQLSTATE 40001 serialization_failure, 40P01 deadlock_detected)
fn is_transient_conflict(error: &AppError) -> bool {
    match error {
        AppError::Database(sqlx::Error::Database(db_error)) => matches!(
            db_error.code().as_deref(),
            Some("40001") | Some("40P01")
        ),
        _ => false,
    }
}

pub struct FuelWorkflowService {
    pool: PgPool,
    vehicles: VehicleRepository,
    requests: FuelRequestRepository,
    alerts: AlertRepository,
    settings: SettingsRepository,
}

impl FuelWorkflowService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            requests: FuelRequestRepository::new(pool.clone()),
            alerts: AlertRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Someter una solicitud de combustible
    pub async fn submit(
        &self,
        driver_id: Uuid,
        driver_name: &str,
        vehicle_id: Uuid,
        odometer_reading: Decimal,
        requested_fuel: Decimal,
    ) -> Result<FuelRequest, AppError> {
        let mut attempt = 1;
        loop {
            match self
                .try_submit(driver_id, driver_name, vehicle_id, odometer_reading, requested_fuel)
                .await
            {
                Err(error) if is_transient_conflict(&error) && attempt < MAX_TX_ATTEMPTS => {
                    warn!(
                        "Submission retry {}/{} for vehicle {}: {}",
                        attempt, MAX_TX_ATTEMPTS, vehicle_id, error
                    );
                    attempt += 1;
                }
                Err(error) if is_transient_conflict(&error) => {
                    return Err(AppError::Conflict(
                        "Submission lost a concurrent update race, please retry".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_submit(
        &self,
        driver_id: Uuid,
        driver_name: &str,
        vehicle_id: Uuid,
        odometer_reading: Decimal,
        requested_fuel: Decimal,
    ) -> Result<FuelRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock del vehículo: serializa submissions concurrentes del mismo
        // vehículo sin afectar a los demás
        let vehicle = self
            .vehicles
            .lock_for_update(&mut tx, vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id '{}' not found", vehicle_id))
            })?;

        let prior_approved = self
            .requests
            .latest_approved_for_vehicle(&mut tx, vehicle_id)
            .await?;

        let settings = self.settings.get_or_create_in_tx(&mut tx).await?;

        let evaluation = evaluate_submission(
            odometer_reading,
            requested_fuel,
            prior_approved.map(|r| r.odometer_reading),
            vehicle.fuel_economy,
            settings.variance_threshold,
        )?;

        let request = FuelRequest {
            id: Uuid::new_v4(),
            vehicle_id,
            vehicle_registration: vehicle.registration_number.clone(),
            driver_id,
            driver_name: driver_name.to_string(),
            requested_at: Utc::now(),
            odometer_reading,
            last_odometer_reading: evaluation.last_odometer_reading,
            distance_travelled: evaluation.distance_travelled,
            requested_fuel,
            expected_fuel: evaluation.expected_fuel,
            variance_percentage: evaluation.variance_percentage,
            status: evaluation.status,
            resolved_by: None,
            resolved_by_name: None,
            resolved_at: None,
            resolution_notes: None,
        };

        let inserted = self.requests.insert(&mut tx, &request).await?;

        // Solicitud flaggeada y su alerta commitean juntas
        if inserted.status == RequestStatus::Flagged {
            let message = build_alert_message(
                &inserted.vehicle_registration,
                inserted.expected_fuel.unwrap_or_default(),
                inserted.requested_fuel,
                inserted.variance_percentage.unwrap_or_default(),
            );
            self.alerts
                .insert(&mut tx, inserted.id, &message, inserted.requested_at)
                .await?;
        }

        tx.commit().await?;

        info!(
            "⛽ Fuel request {} for vehicle {} submitted with status {}",
            inserted.id,
            inserted.vehicle_registration,
            inserted.status.as_str()
        );
        Ok(inserted)
    }

    /// Aprobar una solicitud pendiente o flaggeada
    pub async fn approve(
        &self,
        request_id: Uuid,
        approver_id: Uuid,
        approver_name: &str,
        notes: Option<&str>,
    ) -> Result<FuelRequest, AppError> {
        self.resolve(request_id, RequestStatus::Approved, approver_id, approver_name, notes)
            .await
    }

    /// Rechazar una solicitud pendiente o flaggeada; el motivo es obligatorio
    pub async fn reject(
        &self,
        request_id: Uuid,
        rejector_id: Uuid,
        rejector_name: &str,
        reason: &str,
    ) -> Result<FuelRequest, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::Validation(
                "rejection reason must not be empty".to_string(),
            ));
        }
        self.resolve(request_id, RequestStatus::Rejected, rejector_id, rejector_name, Some(reason))
            .await
    }

    async fn resolve(
        &self,
        request_id: Uuid,
        target_status: RequestStatus,
        actor_id: Uuid,
        actor_name: &str,
        notes: Option<&str>,
    ) -> Result<FuelRequest, AppError> {
        let mut attempt = 1;
        loop {
            match self
                .try_resolve(request_id, target_status, actor_id, actor_name, notes)
                .await
            {
                Err(error) if is_transient_conflict(&error) && attempt < MAX_TX_ATTEMPTS => {
                    warn!(
                        "Resolution retry {}/{} for request {}: {}",
                        attempt, MAX_TX_ATTEMPTS, request_id, error
                    );
                    attempt += 1;
                }
                Err(error) if is_transient_conflict(&error) => {
                    return Err(AppError::Conflict(
                        "Resolution lost a concurrent update race, please retry".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_resolve(
        &self,
        request_id: Uuid,
        target_status: RequestStatus,
        actor_id: Uuid,
        actor_name: &str,
        notes: Option<&str>,
    ) -> Result<FuelRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = self
            .requests
            .lock_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Fuel request with id '{}' not found", request_id))
            })?;

        ensure_resolvable(request_id, request.status)?;

        let resolved_at = Utc::now();
        let resolved = self
            .requests
            .resolve(&mut tx, request_id, target_status, actor_id, actor_name, notes, resolved_at)
            .await?;

        // La resolución y el reconocimiento de alertas commitean juntos
        let acknowledged = self
            .alerts
            .acknowledge_for_request(&mut tx, request_id, actor_id, resolved_at)
            .await?;

        tx.commit().await?;

        info!(
            "✅ Fuel request {} resolved as {} by {} ({} alerts acknowledged)",
            request_id,
            target_status.as_str(),
            actor_name,
            acknowledged
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("literal decimal")
    }

    #[test]
    fn test_first_request_has_no_variance_and_is_pending() {
        // Vehículo nuevo: sin solicitud aprobada previa no hay señal de
        // distancia, da igual cuánto combustible se pida
        let eval = evaluate_submission(dec("500"), dec("900"), None, Some(dec("10")), dec("15"))
            .expect("evaluation");

        assert_eq!(eval.status, RequestStatus::Pending);
        assert_eq!(eval.last_odometer_reading, None);
        assert_eq!(eval.distance_travelled, None);
        assert_eq!(eval.expected_fuel, None);
        assert_eq!(eval.variance_percentage, None);
    }

    #[test]
    fn test_no_configured_ratio_is_pending() {
        let eval = evaluate_submission(dec("1200"), dec("25"), Some(dec("1000")), None, dec("15"))
            .expect("evaluation");

        assert_eq!(eval.status, RequestStatus::Pending);
        assert_eq!(eval.distance_travelled, Some(dec("200")));
        assert_eq!(eval.expected_fuel, None);
        assert_eq!(eval.variance_percentage, None);
    }

    #[test]
    fn test_spec_scenario_over_request_is_flagged() {
        // 10 km/L, 1000 → 1200, 25 L pedidos: esperado 20 L, varianza +25%
        let eval =
            evaluate_submission(dec("1200"), dec("25"), Some(dec("1000")), Some(dec("10")), dec("15"))
                .expect("evaluation");

        assert_eq!(eval.distance_travelled, Some(dec("200")));
        assert_eq!(eval.expected_fuel, Some(dec("20.00")));
        assert_eq!(eval.variance_percentage, Some(dec("25.00")));
        assert_eq!(eval.status, RequestStatus::Flagged);
    }

    #[test]
    fn test_spec_scenario_within_threshold_is_pending() {
        // 10 km/L, 1000 → 1150, 16 L pedidos: esperado 15 L, varianza ~+6.7%
        let eval =
            evaluate_submission(dec("1150"), dec("16"), Some(dec("1000")), Some(dec("10")), dec("15"))
                .expect("evaluation");

        assert_eq!(eval.distance_travelled, Some(dec("150")));
        assert_eq!(eval.expected_fuel, Some(dec("15.00")));
        assert_eq!(eval.variance_percentage, Some(dec("6.67")));
        assert_eq!(eval.status, RequestStatus::Pending);
    }

    #[test]
    fn test_under_request_beyond_threshold_is_flagged() {
        // La varianza se compara en valor absoluto: pedir muy poco también
        // es anómalo
        let eval =
            evaluate_submission(dec("1200"), dec("10"), Some(dec("1000")), Some(dec("10")), dec("15"))
                .expect("evaluation");

        assert_eq!(eval.variance_percentage, Some(dec("-50.00")));
        assert_eq!(eval.status, RequestStatus::Flagged);
    }

    #[test]
    fn test_variance_exactly_at_threshold_is_pending() {
        // El umbral es estricto: |varianza| > threshold, no >=
        let eval =
            evaluate_submission(dec("1200"), dec("23"), Some(dec("1000")), Some(dec("10")), dec("15"))
                .expect("evaluation");

        assert_eq!(eval.variance_percentage, Some(dec("15.00")));
        assert_eq!(eval.status, RequestStatus::Pending);
    }

    #[test]
    fn test_equal_odometer_is_mileage_regression() {
        let result =
            evaluate_submission(dec("1000"), dec("20"), Some(dec("1000")), Some(dec("10")), dec("15"));

        match result {
            Err(AppError::MileageRegression { submitted, previous }) => {
                assert_eq!(submitted, dec("1000"));
                assert_eq!(previous, dec("1000"));
            }
            other => panic!("expected MileageRegression, got {:?}", other.map(|e| e.status)),
        }
    }

    #[test]
    fn test_lower_odometer_is_mileage_regression() {
        let result =
            evaluate_submission(dec("950"), dec("20"), Some(dec("1000")), Some(dec("10")), dec("15"));
        assert!(matches!(result, Err(AppError::MileageRegression { .. })));
    }

    #[test]
    fn test_non_positive_inputs_are_rejected() {
        assert!(matches!(
            evaluate_submission(dec("0"), dec("20"), None, None, dec("15")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            evaluate_submission(dec("100"), dec("-5"), None, None, dec("15")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_expected_fuel_rounding_to_zero_skips_variance() {
        // Distancia minúscula: el esperado redondea a 0.00 y la varianza
        // queda incomputable en vez de dividir por cero
        let eval = evaluate_submission(
            dec("1000.001"),
            dec("5"),
            Some(dec("1000")),
            Some(dec("10")),
            dec("15"),
        )
        .expect("evaluation");

        assert_eq!(eval.distance_travelled, Some(dec("0.001")));
        assert_eq!(eval.expected_fuel, Some(Decimal::ZERO));
        assert_eq!(eval.variance_percentage, None);
        assert_eq!(eval.status, RequestStatus::Pending);
    }

    #[test]
    fn test_terminal_request_cannot_be_resolved_again() {
        let id = Uuid::new_v4();

        for terminal in [RequestStatus::Approved, RequestStatus::Rejected] {
            match ensure_resolvable(id, terminal) {
                Err(AppError::Conflict(message)) => {
                    assert!(message.contains(&id.to_string()));
                    assert!(message.contains(terminal.as_str()));
                }
                other => panic!("expected Conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_open_request_can_be_resolved() {
        let id = Uuid::new_v4();
        assert!(ensure_resolvable(id, RequestStatus::Pending).is_ok());
        assert!(ensure_resolvable(id, RequestStatus::Flagged).is_ok());
    }

    #[test]
    fn test_alert_message_embeds_expected_and_requested() {
        let message = build_alert_message("AB-123-CD", dec("20.00"), dec("25"), dec("25.00"));

        assert!(message.contains("AB-123-CD"));
        assert!(message.contains("25 L solicitados"));
        assert!(message.contains("20.00 L esperados"));
        assert!(message.contains("+25.00%"));
    }

    #[test]
    fn test_alert_message_negative_variance_keeps_sign() {
        let message = build_alert_message("AB-123-CD", dec("20.00"), dec("10"), dec("-50.00"));
        assert!(message.contains("-50.00%"));
    }
}
