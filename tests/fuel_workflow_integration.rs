//! Tests de integración del workflow contra PostgreSQL
//!
//! Ejercitan los invariantes transaccionales que los tests unitarios puros
//! no pueden cubrir: solicitud flaggeada + alerta, resolución + acknowledge
//! y registro + auditoría. Requieren TEST_DATABASE_URL apuntando a una base
//! de pruebas; sin la variable cada test se omite.

use fleet_fuel_backend::models::fuel_request::RequestStatus;
use fleet_fuel_backend::repositories::alert_repository::AlertRepository;
use fleet_fuel_backend::repositories::fuel_request_repository::FuelRequestRepository;
use fleet_fuel_backend::repositories::vehicle_repository::VehicleRepository;
use fleet_fuel_backend::services::fuel_economy_service::FuelEconomyService;
use fleet_fuel_backend::services::fuel_workflow_service::FuelWorkflowService;
use fleet_fuel_backend::utils::errors::AppError;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    value.parse().expect("literal decimal")
}

/// Matrícula única por test para poder correr contra una base compartida
fn unique_registration() -> String {
    format!("TEST-{}", &Uuid::new_v4().simple().to_string()[..8])
}

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL no está definida, test omitido");
            return None;
        }
    };

    let pool = PgPool::connect(&url)
        .await
        .expect("conexión a la base de pruebas");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migraciones de pruebas");
    Some(pool)
}

#[tokio::test]
async fn test_flagged_submission_creates_exactly_one_unacknowledged_alert() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleRepository::new(pool.clone());
    let alerts = AlertRepository::new(pool.clone());
    let workflow = FuelWorkflowService::new(pool);

    let vehicle = vehicles
        .create(unique_registration(), Some(dec("10")))
        .await
        .expect("alta de vehículo");
    let driver = Uuid::new_v4();

    // Primera solicitud: sin aprobada previa no hay varianza ni alerta
    let first = workflow
        .submit(driver, "Conductor Uno", vehicle.id, dec("1000"), dec("10"))
        .await
        .expect("primera solicitud");
    assert_eq!(first.status, RequestStatus::Pending);
    assert!(alerts.find_by_request(first.id).await.expect("alertas").is_empty());

    workflow
        .approve(first.id, Uuid::new_v4(), "Gestora", None)
        .await
        .expect("aprobación inicial");

    // 1000 → 1200 con 25 L pedidos a 10 km/L: varianza +25%, flaggeada
    let flagged = workflow
        .submit(driver, "Conductor Uno", vehicle.id, dec("1200"), dec("25"))
        .await
        .expect("solicitud anómala");
    assert_eq!(flagged.status, RequestStatus::Flagged);
    assert_eq!(flagged.expected_fuel, Some(dec("20")));
    assert_eq!(flagged.variance_percentage, Some(dec("25")));

    let open_alerts = alerts.find_by_request(flagged.id).await.expect("alertas");
    assert_eq!(open_alerts.len(), 1);
    assert!(!open_alerts[0].acknowledged);
    assert!(open_alerts[0].message.contains("25"));
    assert!(open_alerts[0].message.contains("20"));
}

#[tokio::test]
async fn test_resolution_acknowledges_alerts_and_is_terminal() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleRepository::new(pool.clone());
    let alerts = AlertRepository::new(pool.clone());
    let requests = FuelRequestRepository::new(pool.clone());
    let workflow = FuelWorkflowService::new(pool);

    let vehicle = vehicles
        .create(unique_registration(), Some(dec("10")))
        .await
        .expect("alta de vehículo");
    let driver = Uuid::new_v4();

    let first = workflow
        .submit(driver, "Conductor Dos", vehicle.id, dec("500"), dec("10"))
        .await
        .expect("primera solicitud");
    workflow
        .approve(first.id, Uuid::new_v4(), "Gestora", None)
        .await
        .expect("aprobación inicial");

    let flagged = workflow
        .submit(driver, "Conductor Dos", vehicle.id, dec("700"), dec("40"))
        .await
        .expect("solicitud anómala");
    assert_eq!(flagged.status, RequestStatus::Flagged);

    let manager = Uuid::new_v4();
    let resolved = workflow
        .approve(flagged.id, manager, "Gestora Jefa", Some("revisado en taller"))
        .await
        .expect("aprobación de la flaggeada");
    assert_eq!(resolved.status, RequestStatus::Approved);
    assert_eq!(resolved.resolved_by, Some(manager));

    // La resolución y el acknowledge commitean juntos: no queda ninguna
    // alerta abierta de la solicitud
    for alert in alerts.find_by_request(flagged.id).await.expect("alertas") {
        assert!(alert.acknowledged);
        assert_eq!(alert.acknowledged_by, Some(manager));
    }

    // Un estado terminal es definitivo: re-resolver falla con Conflict y no
    // pisa los campos de resolución
    let retry = workflow
        .reject(flagged.id, Uuid::new_v4(), "Otro Gestor", "duplicada")
        .await;
    assert!(matches!(retry, Err(AppError::Conflict(_))));

    let unchanged = requests
        .find_by_id(flagged.id)
        .await
        .expect("lectura")
        .expect("la solicitud existe");
    assert_eq!(unchanged.status, RequestStatus::Approved);
    assert_eq!(unchanged.resolved_by, Some(manager));
    assert_eq!(unchanged.resolved_by_name.as_deref(), Some("Gestora Jefa"));
}

#[tokio::test]
async fn test_mileage_regression_persists_nothing() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleRepository::new(pool.clone());
    let requests = FuelRequestRepository::new(pool.clone());
    let workflow = FuelWorkflowService::new(pool);

    let vehicle = vehicles
        .create(unique_registration(), Some(dec("10")))
        .await
        .expect("alta de vehículo");
    let driver = Uuid::new_v4();

    let first = workflow
        .submit(driver, "Conductor Tres", vehicle.id, dec("1000"), dec("10"))
        .await
        .expect("primera solicitud");
    workflow
        .approve(first.id, Uuid::new_v4(), "Gestora", None)
        .await
        .expect("aprobación inicial");

    let before = requests
        .list(None, Some(vehicle.id), 100, 0)
        .await
        .expect("listado")
        .len();

    // Kilometraje igual al último aprobado: ni mayor estricto ni persistido
    let result = workflow
        .submit(driver, "Conductor Tres", vehicle.id, dec("1000"), dec("5"))
        .await;
    match result {
        Err(AppError::MileageRegression { submitted, previous }) => {
            assert_eq!(submitted, dec("1000"));
            assert_eq!(previous, dec("1000"));
        }
        other => panic!("expected MileageRegression, got {:?}", other.map(|r| r.status)),
    }

    let after = requests
        .list(None, Some(vehicle.id), 100, 0)
        .await
        .expect("listado")
        .len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_fuel_economy_update_appends_exactly_one_audit_entry() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleRepository::new(pool.clone());
    let economy = FuelEconomyService::new(pool);

    // Alta sin ratio: la primera entrada de auditoría no tiene valor previo
    let vehicle = vehicles
        .create(unique_registration(), None)
        .await
        .expect("alta de vehículo");
    let admin = Uuid::new_v4();

    let updated = economy
        .update_fuel_economy(vehicle.id, dec("12"), admin, "Admin Flota")
        .await
        .expect("primer cambio de ratio");
    assert_eq!(updated.fuel_economy, Some(dec("12")));

    let history = economy.history(vehicle.id).await.expect("historial");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_value, None);
    assert_eq!(history[0].new_value, dec("12"));

    let updated = economy
        .update_fuel_economy(vehicle.id, dec("9.5"), admin, "Admin Flota")
        .await
        .expect("segundo cambio de ratio");
    assert_eq!(updated.fuel_economy, Some(dec("9.5")));

    // Más reciente primero; old_value encadena con el valor anterior del
    // registro
    let history = economy.history(vehicle.id).await.expect("historial");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_value, Some(dec("12")));
    assert_eq!(history[0].new_value, dec("9.5"));
    assert_eq!(history[1].old_value, None);
}
