use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::alert_controller::AlertController;
use crate::dto::fuel_request_dto::{AlertFilters, AlertResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/request/:id", get(list_alerts_for_request))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(filters): Query<AlertFilters>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn list_alerts_for_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list_for_request(id).await?;
    Ok(Json(response))
}
