//! Controladores
//!
//! Capa fina entre los DTOs de la API y los servicios/repositorios.

pub mod alert_controller;
pub mod fuel_request_controller;
pub mod settings_controller;
pub mod vehicle_controller;
