//! Fleet Fuel Backend
//!
//! Gestión del ciclo de vida de solicitudes de combustible: cálculo de
//! campos derivados, detección de anomalías por varianza, workflow de
//! aprobación/rechazo y auditoría de cambios de rendimiento.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
