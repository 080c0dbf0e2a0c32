//! Servicio de estimación de distancias y duraciones
//!
//! Distancia de círculo máximo (haversine) entre puntos geográficos y
//! estimación de duración de una ruta. Funciones puras, sin efectos.

use crate::models::geo::GeoPoint;

/// Radio terrestre en kilómetros
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Velocidad media asumida del camión de recogida
const AVERAGE_SPEED_KMH: f64 = 30.0;

/// Minutos de parada por cada stop (vaciado / carga)
const SERVICE_MINUTES_PER_STOP: f64 = 5.0;

/// Distancia haversine entre dos puntos, en km redondeados a 2 decimales.
/// Simétrica; cero solo cuando ambos puntos coinciden.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    round2(EARTH_RADIUS_KM * c)
}

/// Estimar la duración total de una ruta en minutos: tiempo de conducción
/// a velocidad media más el tiempo de servicio por stop. Cero stops y cero
/// kilómetros devuelven 0.
pub fn estimate_duration_minutes(total_distance_km: f64, stop_count: usize) -> i32 {
    let drive_minutes = total_distance_km / AVERAGE_SPEED_KMH * 60.0;
    let service_minutes = stop_count as f64 * SERVICE_MINUTES_PER_STOP;
    (drive_minutes + service_minutes).round() as i32
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
