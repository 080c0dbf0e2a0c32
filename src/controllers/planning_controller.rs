//! Controller de planificación
//!
//! Orquesta la optimización de una ruta de recogida: lee los snapshots de
//! contenedores y solicitudes, reúne candidatos, los secuencia por vecino
//! más cercano y devuelve el plan anotado con distancia y duración.

use chrono::Utc;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::dto::planning_dto::{OptimizationMetadata, OptimizeRouteRequest, OptimizedRouteResponse};
use crate::dto::route_dto::StopResponse;
use crate::models::route::StopType;
use crate::repositories::receptacle_repository::ReceptacleRepository;
use crate::repositories::request_repository::RequestRepository;
use crate::services::candidate_service::{
    collect_stop_candidates, DEFAULT_FILL_LEVEL_THRESHOLD, DEFAULT_MAX_STOPS,
};
use crate::services::distance_service::estimate_duration_minutes;
use crate::services::sequencing_service::sequence_stops;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{validate_coordinates, validate_fill_level};

pub struct PlanningController {
    receptacle_repository: ReceptacleRepository,
    request_repository: RequestRepository,
}

impl PlanningController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            receptacle_repository: ReceptacleRepository::new(pool.clone()),
            request_repository: RequestRepository::new(pool),
        }
    }

    /// Calcular un plan de recogida. No persiste nada: el plan es
    /// consultivo hasta que el coordinador crea la ruta.
    pub async fn optimize(
        &self,
        config: &EnvironmentConfig,
        request: OptimizeRouteRequest,
    ) -> Result<OptimizedRouteResponse, AppError> {
        let fill_level_threshold = request
            .fill_level_threshold
            .unwrap_or(DEFAULT_FILL_LEVEL_THRESHOLD);
        if validate_fill_level(fill_level_threshold).is_err() {
            return Err(validation_error("fill_level_threshold", "must be between 0 and 100"));
        }

        let start_location = request.start_location.unwrap_or_else(|| config.depot_location());
        if validate_coordinates(start_location.lat, start_location.lng).is_err() {
            return Err(validation_error("start_location", "coordinates are out of range"));
        }

        let max_stops = request.max_stops.unwrap_or(DEFAULT_MAX_STOPS);
        let include_requests = request.include_approved_requests.unwrap_or(true);

        log::info!(
            "🚛 Optimizando ruta: umbral {}%, cap {} stops, solicitudes {}",
            fill_level_threshold,
            max_stops,
            if include_requests { "incluidas" } else { "excluidas" }
        );

        let receptacles = self.receptacle_repository.find_active().await?;
        let requests = if include_requests {
            self.request_repository.find_approved().await?
        } else {
            Vec::new()
        };

        let candidates =
            collect_stop_candidates(&receptacles, &requests, fill_level_threshold, max_stops);

        // Conteos sobre la lista ya truncada: lo que la ruta contiene de verdad
        let high_priority_bin_count = candidates
            .iter()
            .filter(|c| c.kind == StopType::Receptacle)
            .count();
        let request_count = candidates
            .iter()
            .filter(|c| c.kind == StopType::Request)
            .count();

        let plan = sequence_stops(candidates, start_location);
        let estimated_duration = estimate_duration_minutes(plan.total_distance, plan.stops.len());

        log::info!(
            "✅ Plan generado: {} stops, {:.2} km, ~{} min",
            plan.stops.len(),
            plan.total_distance,
            estimated_duration
        );

        Ok(OptimizedRouteResponse {
            total_stops: plan.stops.len(),
            stops: plan.stops.iter().map(StopResponse::from).collect(),
            total_distance: plan.total_distance,
            estimated_duration,
            metadata: OptimizationMetadata {
                high_priority_bin_count,
                request_count,
                fill_level_threshold,
                optimization_timestamp: Utc::now(),
            },
        })
    }
}
