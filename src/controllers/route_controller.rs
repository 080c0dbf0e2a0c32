//! Controller de rutas
//!
//! Ciclo de vida del agregado Route: creación en draft, asignación a
//! cuadrilla, seguimiento de ejecución stop a stop y cancelación. Las
//! mutaciones persisten la ruta y aplican los eventos de dominio sobre
//! los colaboradores dentro de una única transacción; un fallo en
//! cualquier paso revierte el conjunto completo.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_dto::{
    ApiResponse, AssignRouteRequest, AssignRouteResponse, CreateRouteRequest, RouteResponse,
    UpdateStopStatusRequest, UpdateStopStatusResponse,
};
use crate::models::geo::GeoPoint;
use crate::models::route::{DomainEvent, Route, Stop, StopPriority, StopStatus, StopType};
use crate::repositories::receptacle_repository::ReceptacleRepository;
use crate::repositories::request_repository::RequestRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::services::distance_service::estimate_duration_minutes;
use crate::services::sequencing_service::{assign_sequences, rollup_distance};
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{validate_coordinates, validate_not_empty};

pub struct RouteController {
    pool: PgPool,
    route_repository: RouteRepository,
    receptacle_repository: ReceptacleRepository,
    request_repository: RequestRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            route_repository: RouteRepository::new(pool.clone()),
            receptacle_repository: ReceptacleRepository::new(pool.clone()),
            request_repository: RequestRepository::new(pool.clone()),
            pool,
        }
    }

    /// Crear una ruta en draft a partir de una lista ordenada de stops.
    /// Cada referencia se resuelve contra su colaborador; las secuencias
    /// y el rollup de distancia se recalculan en el servidor.
    pub async fn create(
        &self,
        depot: GeoPoint,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        // Validar que cada stop sea utilizable y referencie una entidad existente
        for stop_request in &request.stops {
            if validate_not_empty(&stop_request.address).is_err() {
                return Err(validation_error("stops", "every stop needs an address"));
            }
            if validate_coordinates(stop_request.latitude, stop_request.longitude).is_err() {
                return Err(validation_error("stops", "stop coordinates are out of range"));
            }
            match stop_request.stop_type {
                StopType::Receptacle => {
                    if self
                        .receptacle_repository
                        .find_by_id(stop_request.reference_id)
                        .await?
                        .is_none()
                    {
                        return Err(AppError::BadRequest(format!(
                            "receptacle '{}' does not exist",
                            stop_request.reference_id
                        )));
                    }
                }
                StopType::Request => {
                    if self
                        .request_repository
                        .find_by_id(stop_request.reference_id)
                        .await?
                        .is_none()
                    {
                        return Err(AppError::BadRequest(format!(
                            "collection request '{}' does not exist",
                            stop_request.reference_id
                        )));
                    }
                }
            }
        }

        let mut stops: Vec<Stop> = request
            .stops
            .iter()
            .map(|s| Stop {
                stop_type: s.stop_type,
                reference_id: s.reference_id,
                sequence: 0,
                latitude: s.latitude,
                longitude: s.longitude,
                address: s.address.clone(),
                priority: s.priority.unwrap_or(StopPriority::Normal),
                status: StopStatus::Pending,
                completed_at: None,
                notes: None,
            })
            .collect();
        assign_sequences(&mut stops);

        let start_location = request.start_location.unwrap_or(depot);
        let total_distance = rollup_distance(&stops, start_location);
        let estimated_duration = estimate_duration_minutes(total_distance, stops.len());

        let route = Route::new_draft(
            request.name,
            request.coordinator_id,
            request.scheduled_date,
            stops,
            total_distance,
            estimated_duration,
            Utc::now(),
        );

        let created = self.route_repository.create(&route).await?;
        log::info!("🗺️ Ruta '{}' creada con {} stops", created.name, created.stops.len());

        Ok(ApiResponse::success_with_message(
            created.into(),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RouteResponse, AppError> {
        let route = self
            .route_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;

        Ok(route.into())
    }

    /// Asignar la ruta a una cuadrilla. Las solicitudes referenciadas por
    /// stops de tipo request quedan programadas en la misma transacción.
    pub async fn assign(
        &self,
        id: Uuid,
        request: AssignRouteRequest,
    ) -> Result<ApiResponse<AssignRouteResponse>, AppError> {
        let crew_id = request
            .crew_id
            .ok_or_else(|| validation_error("crew_id", "crew_id is required"))?;

        let mut route = self
            .route_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;
        let expected_version = route.version;

        let events = route.assign(crew_id, request.vehicle_id)?;

        let mut tx = self.pool.begin().await?;
        self.apply_events(&mut tx, &route, &events, Utc::now()).await?;
        let updated = self
            .route_repository
            .update_in_tx(&mut tx, &route, expected_version)
            .await?;
        tx.commit().await?;

        log::info!("👷 Ruta '{}' asignada a cuadrilla {}", updated.name, crew_id);

        Ok(ApiResponse::success_with_message(
            AssignRouteResponse {
                route_id: updated.id,
                crew_id,
                vehicle_id: updated.vehicle_id,
                status: updated.status,
            },
            "Ruta asignada exitosamente".to_string(),
        ))
    }

    /// Aplicar una transición de estado a un stop durante el trabajo de
    /// campo. El stop, el recálculo de completitud y los efectos sobre
    /// colaboradores se confirman o revierten juntos.
    pub async fn update_stop_status(
        &self,
        id: Uuid,
        stop_index: usize,
        request: UpdateStopStatusRequest,
    ) -> Result<UpdateStopStatusResponse, AppError> {
        let new_status = StopStatus::parse(&request.status).ok_or_else(|| {
            validation_error("status", "status must be one of: pending, completed, skipped")
        })?;

        let mut route = self
            .route_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;
        let expected_version = route.version;

        let now = Utc::now();
        let events = route.update_stop_status(stop_index, new_status, request.notes, now)?;

        let mut tx = self.pool.begin().await?;
        self.apply_events(&mut tx, &route, &events, now).await?;
        let updated = self
            .route_repository
            .update_in_tx(&mut tx, &route, expected_version)
            .await?;
        tx.commit().await?;

        log::info!(
            "📍 Stop {} de la ruta '{}' -> {:?} ({}% completado)",
            stop_index,
            updated.name,
            new_status,
            updated.completion_percentage
        );

        Ok(UpdateStopStatusResponse {
            route_id: updated.id,
            stop_index,
            status: new_status,
            completion_percentage: updated.completion_percentage,
            route_status: updated.status,
        })
    }

    pub async fn cancel(&self, id: Uuid) -> Result<ApiResponse<RouteResponse>, AppError> {
        let mut route = self
            .route_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;
        let expected_version = route.version;

        route.cancel()?;

        let mut tx = self.pool.begin().await?;
        let updated = self
            .route_repository
            .update_in_tx(&mut tx, &route, expected_version)
            .await?;
        tx.commit().await?;

        log::info!("🛑 Ruta '{}' cancelada", updated.name);

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Ruta cancelada".to_string(),
        ))
    }

    /// Aplicar los eventos de dominio emitidos por el agregado sobre las
    /// entidades colaboradoras, dentro de la transacción en curso
    async fn apply_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        route: &Route,
        events: &[DomainEvent],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        for event in events {
            match event {
                DomainEvent::ReceptacleEmptied { receptacle_id } => {
                    self.receptacle_repository
                        .mark_emptied_in_tx(tx, *receptacle_id, now)
                        .await?;
                }
                DomainEvent::RequestCompleted { request_id } => {
                    self.request_repository
                        .mark_completed_in_tx(tx, *request_id, now)
                        .await?;
                }
                DomainEvent::RequestScheduled { request_id } => {
                    self.request_repository
                        .mark_scheduled_in_tx(tx, *request_id, route.id, route.scheduled_date)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
