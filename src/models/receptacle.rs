//! Modelo de Receptacle
//!
//! Contenedor monitorizado con nivel de llenado y geolocalización.
//! Es una entidad colaboradora: el core la lee como snapshot y la
//! actualiza únicamente a través de su repositorio al vaciarla.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del contenedor - mapea al ENUM receptacle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "receptacle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReceptacleStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Receptacle - mapea a la tabla receptacles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receptacle {
    pub id: Uuid,
    pub label: String,
    pub status: ReceptacleStatus,
    pub fill_level: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub last_emptied_at: Option<DateTime<Utc>>,
    pub collections_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Receptacle {
    /// Un contenedor es candidato a recogida si está activo y
    /// su nivel de llenado alcanza el umbral
    pub fn needs_collection(&self, fill_level_threshold: i32) -> bool {
        self.status == ReceptacleStatus::Active && self.fill_level >= fill_level_threshold
    }
}
