//! Secuenciación de rutas por vecino más cercano
//!
//! Ordena los candidatos en una secuencia de visita con la heurística
//! greedy de vecino más cercano anclada en la ubicación de salida, y
//! calcula el rollup de distancia del plan. Este módulo es el único
//! que escribe números de secuencia iniciales.

use crate::models::geo::GeoPoint;
use crate::models::route::{Stop, StopStatus};
use crate::services::candidate_service::StopCandidate;
use crate::services::distance_service::{distance_km, round2};

/// Resultado de la secuenciación: stops en orden de visita con la
/// distancia total del recorrido (sin tramo de vuelta al origen)
#[derive(Debug, Clone)]
pub struct SequencedPlan {
    pub stops: Vec<Stop>,
    pub total_distance: f64,
}

/// Ordenar candidatos por vecino más cercano desde `start_location`.
///
/// En cada paso se elige el candidato no visitado a menor distancia de la
/// posición actual; los empates los gana el primero encontrado, así que el
/// resultado es determinista para un mismo orden de entrada. O(n²) sobre el
/// pool, aceptable con el cap de stops por ruta.
pub fn sequence_stops(candidates: Vec<StopCandidate>, start_location: GeoPoint) -> SequencedPlan {
    let mut pool = candidates;
    let mut stops: Vec<Stop> = Vec::with_capacity(pool.len());
    let mut current = start_location;
    let mut total_distance = 0.0;

    while !pool.is_empty() {
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for (index, candidate) in pool.iter().enumerate() {
            let leg = distance_km(current, candidate.location());
            if leg < best_distance {
                best_distance = leg;
                best_index = index;
            }
        }

        let chosen = pool.remove(best_index);
        total_distance += best_distance;
        current = chosen.location();

        stops.push(Stop {
            stop_type: chosen.kind,
            reference_id: chosen.reference_id,
            sequence: stops.len() as i32 + 1,
            latitude: chosen.latitude,
            longitude: chosen.longitude,
            address: chosen.address,
            priority: chosen.priority,
            status: StopStatus::Pending,
            completed_at: None,
            notes: None,
        });
    }

    SequencedPlan {
        stops,
        total_distance: round2(total_distance),
    }
}

/// Reasignar números de secuencia 1..N según la posición en la lista.
/// Se usa al persistir una ruta a partir de un plan ya ordenado.
pub fn assign_sequences(stops: &mut [Stop]) {
    for (index, stop) in stops.iter_mut().enumerate() {
        stop.sequence = index as i32 + 1;
    }
}

/// Distancia total de un recorrido ya ordenado: suma de tramos consecutivos
/// desde la salida hasta el último stop, sin tramo de regreso.
pub fn rollup_distance(stops: &[Stop], start_location: GeoPoint) -> f64 {
    let mut current = start_location;
    let mut total = 0.0;
    for stop in stops {
        let next = GeoPoint::new(stop.latitude, stop.longitude);
        total += distance_km(current, next);
        current = next;
    }
    round2(total)
}
