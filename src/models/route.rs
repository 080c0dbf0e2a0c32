//! Modelo de Route
//!
//! Este módulo contiene el agregado Route con su lista ordenada de stops
//! y la máquina de estados que gobierna el ciclo de vida de la ruta.
//! Las transiciones de stop devuelven eventos de dominio que el controller
//! aplica sobre las entidades colaboradoras dentro de una transacción.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use crate::utils::errors::{transition_error, validation_error, AppError};

/// Estado de la ruta - mapea al ENUM route_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "route_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Draft,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

/// Tipo de stop: referencia polimórfica a contenedor o solicitud
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StopType {
    Receptacle,
    Request,
}

/// Estado individual de cada stop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Pending,
    Completed,
    Skipped,
}

impl StopStatus {
    /// Parsear el estado recibido en un request; los valores inválidos
    /// se rechazan antes de mutar nada
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// Prioridad asignada durante la planificación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StopPriority {
    Urgent,
    High,
    Normal,
}

/// Stop individual, embebido en el array JSONB de la ruta.
/// Los stops no tienen ciclo de vida propio fuera de su ruta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub stop_type: StopType,
    pub reference_id: Uuid,
    pub sequence: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub priority: StopPriority,
    pub status: StopStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Eventos de dominio emitidos por el agregado. El caller los aplica
/// sobre las entidades colaboradoras en la misma transacción que
/// persiste la ruta.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    ReceptacleEmptied { receptacle_id: Uuid },
    RequestCompleted { request_id: Uuid },
    RequestScheduled { request_id: Uuid },
}

/// Route principal - mapea a la tabla routes con stops embebidos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub coordinator_id: Option<Uuid>,
    pub crew_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub stops: Vec<Stop>,
    pub status: RouteStatus,
    pub scheduled_date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_distance: f64,
    pub estimated_duration: i32,
    pub actual_duration: Option<i32>,
    pub completion_percentage: i32,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Crear una ruta en estado draft a partir de un plan secuenciado
    pub fn new_draft(
        name: String,
        coordinator_id: Option<Uuid>,
        scheduled_date: NaiveDate,
        stops: Vec<Stop>,
        total_distance: f64,
        estimated_duration: i32,
        now: DateTime<Utc>,
    ) -> Self {
        let mut route = Self {
            id: Uuid::new_v4(),
            name,
            coordinator_id,
            crew_id: None,
            vehicle_id: None,
            stops,
            status: RouteStatus::Draft,
            scheduled_date,
            start_time: None,
            end_time: None,
            total_distance,
            estimated_duration,
            actual_duration: None,
            completion_percentage: 0,
            version: 0,
            created_at: now,
        };
        route.recompute_completion();
        route
    }

    pub fn completed_stops(&self) -> usize {
        self.stops
            .iter()
            .filter(|s| s.status == StopStatus::Completed)
            .count()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// Recalcular el porcentaje de completitud. Solo cuentan los stops
    /// `completed`; los `skipped` nunca suman.
    pub fn recompute_completion(&mut self) {
        self.completion_percentage = if self.stops.is_empty() {
            0
        } else {
            let completed = self.completed_stops() as f64;
            ((completed / self.stops.len() as f64) * 100.0).round() as i32
        };
    }

    /// Asignar la ruta a una cuadrilla (y opcionalmente un vehículo).
    /// Emite `RequestScheduled` por cada stop de tipo request.
    pub fn assign(
        &mut self,
        crew_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> Result<Vec<DomainEvent>, AppError> {
        if self.is_terminal() {
            return Err(transition_error("route", "route is already completed or cancelled"));
        }

        self.crew_id = Some(crew_id);
        self.vehicle_id = vehicle_id;
        self.status = RouteStatus::Assigned;

        Ok(self
            .stops
            .iter()
            .filter(|s| s.stop_type == StopType::Request)
            .map(|s| DomainEvent::RequestScheduled { request_id: s.reference_id })
            .collect())
    }

    /// Aplicar una transición de estado a un stop durante el trabajo de campo.
    ///
    /// Toda la validación ocurre antes de mutar nada. Repetir el estado
    /// actual de un stop es un no-op completo: no toca `completed_at`
    /// ni vuelve a emitir eventos de colaboradores.
    pub fn update_stop_status(
        &mut self,
        stop_index: usize,
        new_status: StopStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<DomainEvent>, AppError> {
        if self.status == RouteStatus::Cancelled {
            return Err(transition_error("route", "route is cancelled"));
        }

        let stop = self
            .stops
            .get(stop_index)
            .ok_or_else(|| validation_error("stop_index", "stop index is out of range"))?;

        if new_status == StopStatus::Skipped {
            let has_notes = notes
                .as_deref()
                .map(str::trim)
                .is_some_and(|n| !n.is_empty());
            if !has_notes {
                return Err(validation_error("notes", "notes are required when skipping a stop"));
            }
        }

        if stop.status == new_status {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        {
            let stop = &mut self.stops[stop_index];
            match new_status {
                StopStatus::Completed => {
                    stop.status = StopStatus::Completed;
                    stop.completed_at = Some(now);
                    match stop.stop_type {
                        StopType::Receptacle => events.push(DomainEvent::ReceptacleEmptied {
                            receptacle_id: stop.reference_id,
                        }),
                        StopType::Request => events.push(DomainEvent::RequestCompleted {
                            request_id: stop.reference_id,
                        }),
                    }
                }
                StopStatus::Skipped => {
                    stop.status = StopStatus::Skipped;
                    stop.completed_at = None;
                    stop.notes = notes;
                }
                StopStatus::Pending => {
                    stop.status = StopStatus::Pending;
                    stop.completed_at = None;
                    stop.notes = None;
                }
            }
        }

        self.recompute_completion();

        if self.status == RouteStatus::Assigned && self.completed_stops() > 0 {
            self.status = RouteStatus::InProgress;
            if self.start_time.is_none() {
                self.start_time = Some(now);
            }
        }

        if self.completion_percentage == 100
            && !self.stops.is_empty()
            && self.status != RouteStatus::Completed
        {
            self.status = RouteStatus::Completed;
            self.end_time = Some(now);
            if let Some(start) = self.start_time {
                self.actual_duration =
                    Some(((now - start).num_seconds() as f64 / 60.0).round() as i32);
            }
        }

        Ok(events)
    }

    /// Cancelar la ruta. Los efectos ya aplicados sobre colaboradores
    /// no se revierten.
    pub fn cancel(&mut self) -> Result<(), AppError> {
        match self.status {
            RouteStatus::Draft | RouteStatus::Assigned | RouteStatus::InProgress => {
                self.status = RouteStatus::Cancelled;
                Ok(())
            }
            RouteStatus::Completed => {
                Err(transition_error("route", "route is already completed"))
            }
            RouteStatus::Cancelled => {
                Err(transition_error("route", "route is already cancelled"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stop(stop_type: StopType, sequence: i32) -> Stop {
        Stop {
            stop_type,
            reference_id: Uuid::new_v4(),
            sequence,
            latitude: 48.85,
            longitude: 2.35,
            address: format!("Stop {}", sequence),
            priority: StopPriority::Normal,
            status: StopStatus::Pending,
            completed_at: None,
            notes: None,
        }
    }

    fn route_with_stops(stops: Vec<Stop>) -> Route {
        Route::new_draft(
            "Ruta norte".to_string(),
            None,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            stops,
            12.5,
            55,
            Utc.with_ymd_and_hms(2024, 6, 3, 6, 0, 0).unwrap(),
        )
    }

    fn now_at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_completion_percentage_empty_route() {
        let route = route_with_stops(vec![]);
        assert_eq!(route.completion_percentage, 0);
    }

    #[test]
    fn test_completion_percentage_counts_only_completed() {
        let mut route = route_with_stops(vec![
            stop(StopType::Receptacle, 1),
            stop(StopType::Receptacle, 2),
            stop(StopType::Receptacle, 3),
        ]);
        route.assign(Uuid::new_v4(), None).unwrap();

        route
            .update_stop_status(0, StopStatus::Completed, None, now_at(8, 0))
            .unwrap();
        assert_eq!(route.completion_percentage, 33);

        route
            .update_stop_status(1, StopStatus::Skipped, Some("acceso bloqueado".to_string()), now_at(8, 10))
            .unwrap();
        // El skip no suma al porcentaje
        assert_eq!(route.completion_percentage, 33);
    }

    #[test]
    fn test_assign_schedules_request_stops() {
        // Escenario: asignar una ruta con un stop de tipo request
        let request_stop = stop(StopType::Request, 2);
        let request_id = request_stop.reference_id;
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1), request_stop]);

        let crew = Uuid::new_v4();
        let vehicle = Uuid::new_v4();
        let events = route.assign(crew, Some(vehicle)).unwrap();

        assert_eq!(route.status, RouteStatus::Assigned);
        assert_eq!(route.crew_id, Some(crew));
        assert_eq!(route.vehicle_id, Some(vehicle));
        assert_eq!(events, vec![DomainEvent::RequestScheduled { request_id }]);
    }

    #[test]
    fn test_assign_rejected_on_terminal_route() {
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        route.cancel().unwrap();
        assert!(route.assign(Uuid::new_v4(), None).is_err());
    }

    #[test]
    fn test_first_completion_moves_route_to_in_progress() {
        let mut route = route_with_stops(vec![
            stop(StopType::Receptacle, 1),
            stop(StopType::Receptacle, 2),
        ]);
        route.assign(Uuid::new_v4(), None).unwrap();
        assert!(route.start_time.is_none());

        route
            .update_stop_status(0, StopStatus::Completed, None, now_at(8, 0))
            .unwrap();

        assert_eq!(route.status, RouteStatus::InProgress);
        assert_eq!(route.start_time, Some(now_at(8, 0)));
    }

    #[test]
    fn test_completing_last_stop_completes_route() {
        // Escenario: completar el último stop pendiente de una ruta de 4
        let mut route = route_with_stops(vec![
            stop(StopType::Receptacle, 1),
            stop(StopType::Receptacle, 2),
            stop(StopType::Receptacle, 3),
            stop(StopType::Request, 4),
        ]);
        route.assign(Uuid::new_v4(), None).unwrap();

        route.update_stop_status(0, StopStatus::Completed, None, now_at(8, 0)).unwrap();
        route.update_stop_status(1, StopStatus::Completed, None, now_at(8, 30)).unwrap();
        route.update_stop_status(2, StopStatus::Completed, None, now_at(9, 0)).unwrap();
        assert_eq!(route.status, RouteStatus::InProgress);

        let events = route
            .update_stop_status(3, StopStatus::Completed, None, now_at(9, 45))
            .unwrap();

        assert_eq!(route.status, RouteStatus::Completed);
        assert_eq!(route.completion_percentage, 100);
        assert_eq!(route.end_time, Some(now_at(9, 45)));
        // 8:00 -> 9:45
        assert_eq!(route.actual_duration, Some(105));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DomainEvent::RequestCompleted { .. }));
    }

    #[test]
    fn test_skip_without_notes_is_rejected_without_mutation() {
        // Escenario: skip sin notes se rechaza y no cambia nada
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        route.assign(Uuid::new_v4(), None).unwrap();
        let before = route.clone();

        let result = route.update_stop_status(0, StopStatus::Skipped, None, now_at(8, 0));
        assert!(result.is_err());
        assert_eq!(route.stops, before.stops);
        assert_eq!(route.status, before.status);
        assert_eq!(route.completion_percentage, before.completion_percentage);

        let result = route.update_stop_status(0, StopStatus::Skipped, Some("   ".to_string()), now_at(8, 0));
        assert!(result.is_err());
        assert_eq!(route.stops, before.stops);
    }

    #[test]
    fn test_out_of_range_stop_index_is_rejected() {
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        let result = route.update_stop_status(5, StopStatus::Completed, None, now_at(8, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_status_is_a_full_noop() {
        let mut route = route_with_stops(vec![
            stop(StopType::Receptacle, 1),
            stop(StopType::Receptacle, 2),
        ]);
        route.assign(Uuid::new_v4(), None).unwrap();

        let events = route
            .update_stop_status(0, StopStatus::Completed, None, now_at(8, 0))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(route.stops[0].completed_at, Some(now_at(8, 0)));

        // Segunda llamada con el mismo estado: sin eventos, sin mover el timestamp
        let events = route
            .update_stop_status(0, StopStatus::Completed, None, now_at(9, 30))
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(route.stops[0].completed_at, Some(now_at(8, 0)));
        assert_eq!(route.completion_percentage, 50);
    }

    #[test]
    fn test_all_skipped_route_never_autocompletes() {
        let mut route = route_with_stops(vec![
            stop(StopType::Receptacle, 1),
            stop(StopType::Receptacle, 2),
        ]);
        route.assign(Uuid::new_v4(), None).unwrap();

        route
            .update_stop_status(0, StopStatus::Skipped, Some("inaccesible".to_string()), now_at(8, 0))
            .unwrap();
        route
            .update_stop_status(1, StopStatus::Skipped, Some("contenedor dañado".to_string()), now_at(8, 15))
            .unwrap();

        assert_eq!(route.completion_percentage, 0);
        assert_ne!(route.status, RouteStatus::Completed);
    }

    #[test]
    fn test_reverting_to_pending_clears_completion_marks() {
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1), stop(StopType::Receptacle, 2)]);
        route.assign(Uuid::new_v4(), None).unwrap();

        route.update_stop_status(0, StopStatus::Completed, None, now_at(8, 0)).unwrap();
        route.update_stop_status(0, StopStatus::Pending, None, now_at(8, 5)).unwrap();

        assert_eq!(route.stops[0].status, StopStatus::Pending);
        assert!(route.stops[0].completed_at.is_none());
        assert_eq!(route.completion_percentage, 0);
    }

    #[test]
    fn test_cancel_transitions() {
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        assert!(route.cancel().is_ok());
        assert_eq!(route.status, RouteStatus::Cancelled);
        assert!(route.cancel().is_err());

        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        route.assign(Uuid::new_v4(), None).unwrap();
        route.update_stop_status(0, StopStatus::Completed, None, now_at(8, 0)).unwrap();
        // Completada: ya no se puede cancelar
        assert!(route.cancel().is_err());
    }

    #[test]
    fn test_updates_rejected_on_cancelled_route() {
        let mut route = route_with_stops(vec![stop(StopType::Receptacle, 1)]);
        route.cancel().unwrap();
        let result = route.update_stop_status(0, StopStatus::Completed, None, now_at(8, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_completed_receptacle_stop_emits_emptied_event() {
        let receptacle_stop = stop(StopType::Receptacle, 1);
        let receptacle_id = receptacle_stop.reference_id;
        let mut route = route_with_stops(vec![receptacle_stop, stop(StopType::Receptacle, 2)]);
        route.assign(Uuid::new_v4(), None).unwrap();

        let events = route
            .update_stop_status(0, StopStatus::Completed, None, now_at(8, 0))
            .unwrap();
        assert_eq!(events, vec![DomainEvent::ReceptacleEmptied { receptacle_id }]);
    }

    #[test]
    fn test_stop_status_parse() {
        assert_eq!(StopStatus::parse("pending"), Some(StopStatus::Pending));
        assert_eq!(StopStatus::parse("completed"), Some(StopStatus::Completed));
        assert_eq!(StopStatus::parse("skipped"), Some(StopStatus::Skipped));
        assert_eq!(StopStatus::parse("done"), None);
    }
}
