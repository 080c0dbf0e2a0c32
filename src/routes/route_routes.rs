use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    ApiResponse, AssignRouteRequest, AssignRouteResponse, CreateRouteRequest, RouteResponse,
    UpdateStopStatusRequest, UpdateStopStatusResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/:id", get(get_route))
        .route("/:id/assign", post(assign_route))
        .route("/:id/stops/:stop_index/status", put(update_stop_status))
        .route("/:id/cancel", post(cancel_route))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(state.config.depot_location(), request).await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn assign_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignRouteRequest>,
) -> Result<Json<ApiResponse<AssignRouteResponse>>, AppError> {
    // Serializar mutaciones por ruta: un solo writer a la vez
    let lock = state.route_lock(id).await;
    let _guard = lock.lock().await;

    let controller = RouteController::new(state.pool.clone());
    let response = controller.assign(id, request).await?;
    Ok(Json(response))
}

async fn update_stop_status(
    State(state): State<AppState>,
    Path((id, stop_index)): Path<(Uuid, usize)>,
    Json(request): Json<UpdateStopStatusRequest>,
) -> Result<Json<UpdateStopStatusResponse>, AppError> {
    // Serializar mutaciones por ruta: un solo writer a la vez
    let lock = state.route_lock(id).await;
    let _guard = lock.lock().await;

    let controller = RouteController::new(state.pool.clone());
    let response = controller.update_stop_status(id, stop_index, request).await?;
    Ok(Json(response))
}

async fn cancel_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let lock = state.route_lock(id).await;
    let _guard = lock.lock().await;

    let controller = RouteController::new(state.pool.clone());
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}
