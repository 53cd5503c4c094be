use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::fuel_request_controller::FuelRequestController;
use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_request_dto::{
    ApproveFuelRequest, FuelRequestFilters, FuelRequestResponse, RejectFuelRequest,
    SubmitFuelRequest,
};
use crate::dto::stats_dto::FuelStatisticsResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_request_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_fuel_request))
        .route("/", get(list_fuel_requests))
        // /stats antes de /:id para que el path no se interprete como UUID
        .route("/stats", get(fuel_statistics))
        .route("/:id", get(get_fuel_request))
        .route("/:id/approve", post(approve_fuel_request))
        .route("/:id/reject", post(reject_fuel_request))
}

async fn submit_fuel_request(
    State(state): State<AppState>,
    Json(request): Json<SubmitFuelRequest>,
) -> Result<Json<ApiResponse<FuelRequestResponse>>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.submit(request).await?;
    Ok(Json(response))
}

async fn get_fuel_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FuelRequestResponse>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_fuel_requests(
    State(state): State<AppState>,
    Query(filters): Query<FuelRequestFilters>,
) -> Result<Json<Vec<FuelRequestResponse>>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn approve_fuel_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApproveFuelRequest>,
) -> Result<Json<ApiResponse<FuelRequestResponse>>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.approve(id, request).await?;
    Ok(Json(response))
}

async fn reject_fuel_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectFuelRequest>,
) -> Result<Json<ApiResponse<FuelRequestResponse>>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.reject(id, request).await?;
    Ok(Json(response))
}

async fn fuel_statistics(
    State(state): State<AppState>,
) -> Result<Json<FuelStatisticsResponse>, AppError> {
    let controller = FuelRequestController::new(state.pool.clone());
    let response = controller.statistics().await?;
    Ok(Json(response))
}
