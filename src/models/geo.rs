//! Punto geográfico compartido por planificación y rutas

use serde::{Deserialize, Serialize};

/// Coordenada geográfica (latitud/longitud en grados)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
