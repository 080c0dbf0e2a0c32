//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use crate::models::geo::GeoPoint;

/// Latitud/longitud por defecto del depósito (centro de la ciudad)
const DEFAULT_DEPOT_LAT: f64 = 48.8566;
const DEFAULT_DEPOT_LNG: f64 = 2.3522;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Punto de salida por defecto de las rutas de recogida
    pub depot_lat: f64,
    pub depot_lng: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            depot_lat: env::var("DEPOT_LAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEPOT_LAT),
            depot_lng: env::var("DEPOT_LNG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEPOT_LNG),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Punto de salida por defecto para la planificación
    pub fn depot_location(&self) -> GeoPoint {
        GeoPoint::new(self.depot_lat, self.depot_lng)
    }
}
