use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_fuel_backend::config::environment::EnvironmentConfig;
use fleet_fuel_backend::database::DatabaseConnection;
use fleet_fuel_backend::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use fleet_fuel_backend::routes;
use fleet_fuel_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging: DEBUG en desarrollo, INFO en el resto
    let max_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    info!("⛽ Fleet Fuel Backend - Gestión de solicitudes de combustible");
    info!("============================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = db_connection.run_migrations().await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(e);
    }

    let pool = db_connection.pool().clone();

    // En producción con orígenes configurados el CORS se restringe;
    // en desarrollo se permite cualquier origen
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest(
            "/api/fuel-request",
            routes::fuel_request_routes::create_fuel_request_router(),
        )
        .nest("/api/alert", routes::alert_routes::create_alert_router())
        .nest("/api/settings", routes::settings_routes::create_settings_router())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Registrar vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id/fuel-economy - Actualizar rendimiento (auditado)");
    info!("   GET  /api/vehicle/:id/fuel-economy/history - Historial de rendimiento");
    info!("⛽ Endpoints - Fuel Request:");
    info!("   POST /api/fuel-request - Someter solicitud");
    info!("   GET  /api/fuel-request - Listar solicitudes");
    info!("   GET  /api/fuel-request/stats - Estadísticas agregadas");
    info!("   GET  /api/fuel-request/:id - Obtener solicitud");
    info!("   POST /api/fuel-request/:id/approve - Aprobar solicitud");
    info!("   POST /api/fuel-request/:id/reject - Rechazar solicitud");
    info!("🔔 Endpoints - Alert:");
    info!("   GET  /api/alert - Listar alertas");
    info!("   GET  /api/alert/request/:id - Alertas de una solicitud");
    info!("⚙️  Endpoints - Settings:");
    info!("   GET  /api/settings/fuel - Obtener umbral de varianza");
    info!("   PUT  /api/settings/fuel - Actualizar umbral de varianza");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Fleet Fuel Backend funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
