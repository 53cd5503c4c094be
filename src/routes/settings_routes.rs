use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::{SettingsResponse, UpdateSettingsRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/fuel", get(get_settings))
        .route("/fuel", put(update_settings))
}

async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.get().await?;
    Ok(Json(response))
}

async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.update(request).await?;
    Ok(Json(response))
}
