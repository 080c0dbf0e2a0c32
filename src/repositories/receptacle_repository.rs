//! Repositorio de contenedores
//!
//! Lecturas de snapshot para la planificación y la actualización que
//! aplica el evento de vaciado. El vaciado participa en la transacción
//! de la ruta para que el stop y el contenedor cambien juntos.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::receptacle::Receptacle;
use crate::utils::errors::AppError;

pub struct ReceptacleRepository {
    pool: PgPool,
}

impl ReceptacleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Snapshot de contenedores activos para el collector, en orden de
    /// alta estable
    pub async fn find_active(&self) -> Result<Vec<Receptacle>, AppError> {
        let receptacles = sqlx::query_as::<_, Receptacle>(
            "SELECT * FROM receptacles WHERE status = 'active' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(receptacles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Receptacle>, AppError> {
        let receptacle =
            sqlx::query_as::<_, Receptacle>("SELECT * FROM receptacles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(receptacle)
    }

    /// Aplicar el evento ReceptacleEmptied: nivel a 0, timestamp de último
    /// vaciado y contador de recogidas. Si la fila no existe la transacción
    /// completa debe abortar.
    pub async fn mark_emptied_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        emptied_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE receptacles
            SET fill_level = 0, last_emptied_at = $2, collections_count = collections_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(emptied_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Upstream(format!(
                "receptacle '{}' could not be updated",
                id
            )));
        }

        Ok(())
    }
}
