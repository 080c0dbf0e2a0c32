//! Services module
//!
//! Este módulo contiene la lógica pura de planificación: estimación de
//! distancias, recolección de candidatos y secuenciación de rutas.
//! Los servicios no tienen efectos; la orquestación con persistencia
//! vive en los controllers.

pub mod candidate_service;
pub mod distance_service;
pub mod sequencing_service;

pub use candidate_service::*;
pub use distance_service::*;
pub use sequencing_service::*;
