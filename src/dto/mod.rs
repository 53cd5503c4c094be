//! DTOs de la API
//!
//! Requests y responses serializables, separados de los modelos de base de
//! datos.

pub mod api_response;
pub mod fuel_request_dto;
pub mod settings_dto;
pub mod stats_dto;
pub mod vehicle_dto;
