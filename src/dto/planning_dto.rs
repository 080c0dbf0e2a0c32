use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::route_dto::StopResponse;
use crate::models::geo::GeoPoint;

// Request de planificación; todos los campos tienen default
#[derive(Debug, Deserialize, Default)]
pub struct OptimizeRouteRequest {
    pub fill_level_threshold: Option<i32>,
    pub start_location: Option<GeoPoint>,
    pub max_stops: Option<usize>,
    pub include_approved_requests: Option<bool>,
}

// Metadata del resultado de optimización
#[derive(Debug, Serialize)]
pub struct OptimizationMetadata {
    pub high_priority_bin_count: usize,
    pub request_count: usize,
    pub fill_level_threshold: i32,
    pub optimization_timestamp: DateTime<Utc>,
}

// Response de planificación: plan secuenciado, sin persistir
#[derive(Debug, Serialize)]
pub struct OptimizedRouteResponse {
    pub stops: Vec<StopResponse>,
    pub total_stops: usize,
    pub total_distance: f64,
    pub estimated_duration: i32,
    pub metadata: OptimizationMetadata,
}
