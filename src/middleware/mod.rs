//! Middleware del sistema
//!
//! Este módulo contiene el middleware de CORS; la autenticación y el
//! rate limiting se asumen aplicados por la capa que nos llama.

pub mod cors;

pub use cors::*;
