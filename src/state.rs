//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, incluido el registro de locks que
//! serializa las mutaciones de cada ruta.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub route_locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            route_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Obtener el lock de serialización de una ruta, creándolo si no existe.
    /// Dos actualizaciones simultáneas sobre la misma ruta se encolan aquí;
    /// rutas distintas avanzan en paralelo.
    pub async fn route_lock(&self, route_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.route_locks.read().await;
            if let Some(lock) = locks.get(&route_id) {
                return lock.clone();
            }
        }

        let mut locks = self.route_locks.write().await;
        locks
            .entry(route_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Retirar del registro los locks que nadie está usando
    pub async fn cleanup_idle_locks(&self) {
        let mut locks = self.route_locks.write().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let pool = PgPool::connect_lazy("postgresql://localhost/waste_routing_test")
            .expect("lazy pool");
        AppState::new(pool, EnvironmentConfig::default())
    }

    #[tokio::test]
    async fn test_route_lock_is_shared_per_route() {
        let state = test_state();
        let route_id = Uuid::new_v4();

        let lock_a = state.route_lock(route_id).await;
        let lock_b = state.route_lock(route_id).await;
        assert!(Arc::ptr_eq(&lock_a, &lock_b));

        let other = state.route_lock(Uuid::new_v4()).await;
        assert!(!Arc::ptr_eq(&lock_a, &other));
    }

    #[tokio::test]
    async fn test_cleanup_retains_locks_in_use() {
        let state = test_state();
        let route_id = Uuid::new_v4();

        let held = state.route_lock(route_id).await;
        let _idle = state.route_lock(Uuid::new_v4()).await;
        drop(_idle);

        state.cleanup_idle_locks().await;

        let locks = state.route_locks.read().await;
        assert!(locks.contains_key(&route_id));
        assert_eq!(locks.len(), 1);
        drop(locks);
        drop(held);
    }
}
