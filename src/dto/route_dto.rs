use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::geo::GeoPoint;
use crate::models::route::{Route, RouteStatus, Stop, StopPriority, StopStatus, StopType};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Stop dentro de un request de creación de ruta; la secuencia definitiva
// la asigna el sequencer al persistir
#[derive(Debug, Deserialize)]
pub struct CreateStopRequest {
    pub stop_type: StopType,
    pub reference_id: Uuid,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: Option<StopPriority>,
}

// Request para crear una ruta en draft a partir de un plan
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,

    pub scheduled_date: NaiveDate,
    pub coordinator_id: Option<Uuid>,

    // Punto de salida para el rollup de distancia; por defecto el depósito
    pub start_location: Option<GeoPoint>,

    pub stops: Vec<CreateStopRequest>,
}

// Request para asignar una ruta a una cuadrilla
#[derive(Debug, Deserialize)]
pub struct AssignRouteRequest {
    pub crew_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

// Response de asignación
#[derive(Debug, Serialize)]
pub struct AssignRouteResponse {
    pub route_id: Uuid,
    pub crew_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub status: RouteStatus,
}

// Request para actualizar el estado de un stop. El estado llega como
// string y se valida antes de mutar nada.
#[derive(Debug, Deserialize)]
pub struct UpdateStopStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

// Response de actualización de stop
#[derive(Debug, Serialize)]
pub struct UpdateStopStatusResponse {
    pub route_id: Uuid,
    pub stop_index: usize,
    pub status: StopStatus,
    pub completion_percentage: i32,
    pub route_status: RouteStatus,
}

// Stop serializado en responses
#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub stop_type: StopType,
    pub reference_id: Uuid,
    pub sequence: i32,
    pub coordinates: GeoPoint,
    pub address: String,
    pub priority: StopPriority,
    pub status: StopStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Stop> for StopResponse {
    fn from(stop: &Stop) -> Self {
        Self {
            stop_type: stop.stop_type,
            reference_id: stop.reference_id,
            sequence: stop.sequence,
            coordinates: GeoPoint::new(stop.latitude, stop.longitude),
            address: stop.address.clone(),
            priority: stop.priority,
            status: stop.status,
            completed_at: stop.completed_at,
            notes: stop.notes.clone(),
        }
    }
}

// Response completa de ruta
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub name: String,
    pub coordinator_id: Option<Uuid>,
    pub crew_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: RouteStatus,
    pub scheduled_date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_stops: usize,
    pub total_distance: f64,
    pub estimated_duration: i32,
    pub actual_duration: Option<i32>,
    pub completion_percentage: i32,
    pub stops: Vec<StopResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            name: route.name,
            coordinator_id: route.coordinator_id,
            crew_id: route.crew_id,
            vehicle_id: route.vehicle_id,
            status: route.status,
            scheduled_date: route.scheduled_date,
            start_time: route.start_time,
            end_time: route.end_time,
            total_stops: route.stops.len(),
            total_distance: route.total_distance,
            estimated_duration: route.estimated_duration,
            actual_duration: route.actual_duration,
            completion_percentage: route.completion_percentage,
            stops: route.stops.iter().map(StopResponse::from).collect(),
            created_at: route.created_at,
        }
    }
}
