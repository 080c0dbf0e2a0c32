//! Recolección de candidatos de stop
//!
//! Reúne en una lista uniforme los contenedores que superan el umbral de
//! llenado y las solicitudes aprobadas con coordenadas válidas. La lista
//! resultante no tiene orden espacial; eso es trabajo del sequencer.

use uuid::Uuid;

use crate::models::collection_request::CollectionRequest;
use crate::models::geo::GeoPoint;
use crate::models::receptacle::Receptacle;
use crate::models::route::{StopPriority, StopType};

/// Umbral de llenado por defecto para incluir un contenedor
pub const DEFAULT_FILL_LEVEL_THRESHOLD: i32 = 90;

/// Cap de stops por ruta
pub const DEFAULT_MAX_STOPS: usize = 50;

/// Nivel de llenado a partir del cual un contenedor es urgente
const URGENT_FILL_LEVEL: i32 = 90;

/// Candidato transitorio producido por el collector y consumido
/// inmediatamente por el sequencer. No se persiste.
#[derive(Debug, Clone)]
pub struct StopCandidate {
    pub kind: StopType,
    pub reference_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub priority: StopPriority,
}

impl StopCandidate {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Reunir candidatos de ambas fuentes: contenedores primero (ordenados por
/// nivel de llenado descendente, orden estable) y solicitudes después.
///
/// La lista concatenada se trunca a `max_stops` ANTES del ordenamiento
/// espacial, así que con muchos contenedores llenos las solicitudes pueden
/// quedar fuera por completo.
/// TODO: muestrear proporcionalmente entre fuentes en lugar de truncar
/// contenedores-primero.
pub fn collect_stop_candidates(
    receptacles: &[Receptacle],
    requests: &[CollectionRequest],
    fill_level_threshold: i32,
    max_stops: usize,
) -> Vec<StopCandidate> {
    let mut eligible: Vec<&Receptacle> = receptacles
        .iter()
        .filter(|r| r.needs_collection(fill_level_threshold))
        .collect();
    // sort_by es estable: empates de llenado conservan el orden de entrada
    eligible.sort_by(|a, b| b.fill_level.cmp(&a.fill_level));

    let mut candidates: Vec<StopCandidate> = eligible
        .into_iter()
        .map(|r| StopCandidate {
            kind: StopType::Receptacle,
            reference_id: r.id,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address.clone(),
            priority: if r.fill_level >= URGENT_FILL_LEVEL {
                StopPriority::Urgent
            } else {
                StopPriority::High
            },
        })
        .collect();

    candidates.extend(
        requests
            .iter()
            .filter(|req| req.has_valid_coordinates())
            .map(|req| StopCandidate {
                kind: StopType::Request,
                reference_id: req.id,
                latitude: req.latitude.unwrap_or_default(),
                longitude: req.longitude.unwrap_or_default(),
                address: req.address.clone(),
                priority: StopPriority::Normal,
            }),
    );

    if candidates.len() > max_stops {
        log::debug!(
            "✂️ Truncando candidatos: {} -> {} (cap de la ruta)",
            candidates.len(),
            max_stops
        );
        candidates.truncate(max_stops);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::collection_request::RequestStatus;
    use crate::models::receptacle::ReceptacleStatus;
    use chrono::Utc;

    fn receptacle(fill_level: i32, status: ReceptacleStatus) -> Receptacle {
        Receptacle {
            id: Uuid::new_v4(),
            label: format!("B-{}", fill_level),
            status,
            fill_level,
            latitude: 48.85,
            longitude: 2.35,
            address: format!("Calle {}", fill_level),
            last_emptied_at: None,
            collections_count: 0,
            created_at: Utc::now(),
        }
    }

    fn request(latitude: Option<f64>, longitude: Option<f64>) -> CollectionRequest {
        CollectionRequest {
            id: Uuid::new_v4(),
            status: RequestStatus::Approved,
            waste_type: "bulky".to_string(),
            address: "Av. de la República 12".to_string(),
            latitude,
            longitude,
            requester_name: "Marta".to_string(),
            scheduled_route_id: None,
            scheduled_date: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_threshold_filter_and_fill_level_order() {
        // Escenario: llenados [95, 92, 88, 70, 40] con umbral 90
        let receptacles = vec![
            receptacle(95, ReceptacleStatus::Active),
            receptacle(92, ReceptacleStatus::Active),
            receptacle(88, ReceptacleStatus::Active),
            receptacle(70, ReceptacleStatus::Active),
            receptacle(40, ReceptacleStatus::Active),
        ];

        let candidates = collect_stop_candidates(&receptacles, &[], 90, DEFAULT_MAX_STOPS);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].reference_id, receptacles[0].id);
        assert_eq!(candidates[1].reference_id, receptacles[1].id);
        assert_eq!(candidates[0].priority, StopPriority::Urgent);
    }

    #[test]
    fn test_inactive_receptacles_are_excluded() {
        let receptacles = vec![
            receptacle(95, ReceptacleStatus::Maintenance),
            receptacle(93, ReceptacleStatus::Inactive),
            receptacle(91, ReceptacleStatus::Active),
        ];

        let candidates = collect_stop_candidates(&receptacles, &[], 90, DEFAULT_MAX_STOPS);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].reference_id, receptacles[2].id);
    }

    #[test]
    fn test_priority_below_ninety_is_high() {
        let receptacles = vec![receptacle(85, ReceptacleStatus::Active)];
        let candidates = collect_stop_candidates(&receptacles, &[], 80, DEFAULT_MAX_STOPS);
        assert_eq!(candidates[0].priority, StopPriority::High);
    }

    #[test]
    fn test_fill_level_ties_keep_input_order() {
        let receptacles = vec![
            receptacle(92, ReceptacleStatus::Active),
            receptacle(95, ReceptacleStatus::Active),
            receptacle(92, ReceptacleStatus::Active),
        ];

        let candidates = collect_stop_candidates(&receptacles, &[], 90, DEFAULT_MAX_STOPS);
        assert_eq!(candidates[0].reference_id, receptacles[1].id);
        assert_eq!(candidates[1].reference_id, receptacles[0].id);
        assert_eq!(candidates[2].reference_id, receptacles[2].id);
    }

    #[test]
    fn test_requests_without_coordinates_are_dropped() {
        let requests = vec![
            request(Some(48.86), Some(2.36)),
            request(None, Some(2.36)),
            request(Some(48.86), None),
            request(Some(f64::NAN), Some(2.36)),
        ];

        let candidates = collect_stop_candidates(&[], &requests, 90, DEFAULT_MAX_STOPS);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, StopType::Request);
        assert_eq!(candidates[0].priority, StopPriority::Normal);
    }

    #[test]
    fn test_receptacles_come_before_requests() {
        let receptacles = vec![receptacle(95, ReceptacleStatus::Active)];
        let requests = vec![request(Some(48.86), Some(2.36))];

        let candidates = collect_stop_candidates(&receptacles, &requests, 90, DEFAULT_MAX_STOPS);
        assert_eq!(candidates[0].kind, StopType::Receptacle);
        assert_eq!(candidates[1].kind, StopType::Request);
    }

    #[test]
    fn test_truncation_happens_before_sequencing_and_can_starve_requests() {
        let receptacles: Vec<Receptacle> =
            (0..5).map(|i| receptacle(91 + i, ReceptacleStatus::Active)).collect();
        let requests = vec![request(Some(48.86), Some(2.36))];

        let candidates = collect_stop_candidates(&receptacles, &requests, 90, 5);
        assert_eq!(candidates.len(), 5);
        assert!(candidates.iter().all(|c| c.kind == StopType::Receptacle));
    }

    #[test]
    fn test_empty_inputs_yield_empty_list() {
        let candidates = collect_stop_candidates(&[], &[], 90, DEFAULT_MAX_STOPS);
        assert!(candidates.is_empty());
    }
}
