//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod collection_request;
pub mod geo;
pub mod receptacle;
pub mod route;
