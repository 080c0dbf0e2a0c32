//! Modelo de CollectionRequest
//!
//! Solicitud de recogida enviada por un ciudadano y aprobada por un
//! coordinador. Entidad colaboradora: el core la programa al asignar
//! una ruta y la completa al finalizar la visita.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la solicitud - mapea al ENUM request_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Scheduled,
    Completed,
    Cancelled,
}

/// CollectionRequest - mapea a la tabla collection_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionRequest {
    pub id: Uuid,
    pub status: RequestStatus,
    pub waste_type: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub requester_name: String,
    pub scheduled_route_id: Option<Uuid>,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CollectionRequest {
    /// Solo las solicitudes con coordenadas válidas pueden planificarse
    pub fn has_valid_coordinates(&self) -> bool {
        matches!((self.latitude, self.longitude), (Some(lat), Some(lng))
            if lat.is_finite() && lng.is_finite()
                && (-90.0..=90.0).contains(&lat)
                && (-180.0..=180.0).contains(&lng))
    }
}
