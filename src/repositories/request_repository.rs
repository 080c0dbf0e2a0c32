//! Repositorio de solicitudes de recogida
//!
//! Snapshot de solicitudes aprobadas para la planificación y las
//! actualizaciones que aplican los eventos de programación y
//! finalización dentro de la transacción de la ruta.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::collection_request::CollectionRequest;
use crate::utils::errors::AppError;

pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Solicitudes aprobadas pendientes de programar, en orden de alta
    pub async fn find_approved(&self) -> Result<Vec<CollectionRequest>, AppError> {
        let requests = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE status = 'approved' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CollectionRequest>, AppError> {
        let request = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Aplicar el evento RequestScheduled: la solicitud queda ligada a la
    /// ruta y a su fecha programada
    pub async fn mark_scheduled_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        route_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE collection_requests
            SET status = 'scheduled', scheduled_route_id = $2, scheduled_date = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(route_id)
        .bind(scheduled_date)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Upstream(format!(
                "collection request '{}' could not be scheduled",
                id
            )));
        }

        Ok(())
    }

    /// Aplicar el evento RequestCompleted
    pub async fn mark_completed_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE collection_requests
            SET status = 'completed', completed_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(completed_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Upstream(format!(
                "collection request '{}' could not be completed",
                id
            )));
        }

        Ok(())
    }
}
