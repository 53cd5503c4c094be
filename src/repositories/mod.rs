//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de una tabla. Las escrituras que
//! forman parte de un efecto multi-fila reciben la transacción abierta por
//! el servicio, nunca el pool directamente.

pub mod alert_repository;
pub mod fuel_economy_audit_repository;
pub mod fuel_request_repository;
pub mod settings_repository;
pub mod vehicle_repository;
