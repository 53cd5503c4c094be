//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod alert;
pub mod fuel_economy_audit;
pub mod fuel_request;
pub mod settings;
pub mod vehicle;
