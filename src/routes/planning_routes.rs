use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::planning_controller::PlanningController;
use crate::dto::planning_dto::{OptimizeRouteRequest, OptimizedRouteResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_planning_router() -> Router<AppState> {
    Router::new().route("/optimize", post(optimize_route))
}

async fn optimize_route(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRouteRequest>,
) -> Result<Json<OptimizedRouteResponse>, AppError> {
    let controller = PlanningController::new(state.pool.clone());
    let response = controller.optimize(&state.config, request).await?;
    Ok(Json(response))
}
