//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! encapsulan las operaciones que involucran múltiples modelos y las
//! escrituras transaccionales multi-fila.

pub mod fuel_economy_service;
pub mod fuel_workflow_service;
pub mod statistics_service;
