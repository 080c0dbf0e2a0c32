//! Repositorio de rutas
//!
//! Acceso a la tabla routes. El array ordenado de stops viaja embebido
//! como JSONB dentro del documento de la ruta; las entidades referenciadas
//! (contenedores, solicitudes) nunca se embeben.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::route::{Route, RouteStatus, Stop};
use crate::utils::errors::AppError;

/// Fila de la tabla routes; los stops se deserializan desde JSONB
#[derive(Debug, sqlx::FromRow)]
struct RouteRecord {
    id: Uuid,
    name: String,
    coordinator_id: Option<Uuid>,
    crew_id: Option<Uuid>,
    vehicle_id: Option<Uuid>,
    stops: Json<Vec<Stop>>,
    status: RouteStatus,
    scheduled_date: NaiveDate,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    total_distance: f64,
    estimated_duration: i32,
    actual_duration: Option<i32>,
    completion_percentage: i32,
    version: i32,
    created_at: DateTime<Utc>,
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            coordinator_id: record.coordinator_id,
            crew_id: record.crew_id,
            vehicle_id: record.vehicle_id,
            stops: record.stops.0,
            status: record.status,
            scheduled_date: record.scheduled_date,
            start_time: record.start_time,
            end_time: record.end_time,
            total_distance: record.total_distance,
            estimated_duration: record.estimated_duration,
            actual_duration: record.actual_duration,
            completion_percentage: record.completion_percentage,
            version: record.version,
            created_at: record.created_at,
        }
    }
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, route: &Route) -> Result<Route, AppError> {
        let record = sqlx::query_as::<_, RouteRecord>(
            r#"
            INSERT INTO routes (
                id, name, coordinator_id, crew_id, vehicle_id, stops, status,
                scheduled_date, start_time, end_time, total_distance,
                estimated_duration, actual_duration, completion_percentage,
                version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.name)
        .bind(route.coordinator_id)
        .bind(route.crew_id)
        .bind(route.vehicle_id)
        .bind(Json(route.stops.clone()))
        .bind(route.status)
        .bind(route.scheduled_date)
        .bind(route.start_time)
        .bind(route.end_time)
        .bind(route.total_distance)
        .bind(route.estimated_duration)
        .bind(route.actual_duration)
        .bind(route.completion_percentage)
        .bind(route.version)
        .bind(route.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Route>, AppError> {
        let record = sqlx::query_as::<_, RouteRecord>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Route::from))
    }

    /// Persistir una ruta mutada dentro de una transacción abierta.
    ///
    /// El contador de versión detecta escrituras obsoletas: si la fila
    /// cambió desde que se leyó, no se actualiza nada y se devuelve
    /// un conflicto para que el caller reintente.
    pub async fn update_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        route: &Route,
        expected_version: i32,
    ) -> Result<Route, AppError> {
        let record = sqlx::query_as::<_, RouteRecord>(
            r#"
            UPDATE routes
            SET name = $3, coordinator_id = $4, crew_id = $5, vehicle_id = $6,
                stops = $7, status = $8, scheduled_date = $9, start_time = $10,
                end_time = $11, total_distance = $12, estimated_duration = $13,
                actual_duration = $14, completion_percentage = $15,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(expected_version)
        .bind(&route.name)
        .bind(route.coordinator_id)
        .bind(route.crew_id)
        .bind(route.vehicle_id)
        .bind(Json(route.stops.clone()))
        .bind(route.status)
        .bind(route.scheduled_date)
        .bind(route.start_time)
        .bind(route.end_time)
        .bind(route.total_distance)
        .bind(route.estimated_duration)
        .bind(route.actual_duration)
        .bind(route.completion_percentage)
        .fetch_optional(&mut **tx)
        .await?;

        record.map(Route::from).ok_or_else(|| {
            AppError::Conflict("Route was modified concurrently, retry the update".to_string())
        })
    }
}
