//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de
//! configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, origins: Vec<&str>) -> EnvironmentConfig {
        EnvironmentConfig {
            environment: environment.to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: origins.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_environment_mode_helpers() {
        assert!(config("development", vec![]).is_development());
        assert!(!config("development", vec![]).is_production());
        assert!(config("production", vec![]).is_production());
    }

    #[test]
    fn test_server_url_is_a_bindable_address() {
        let url = config("development", vec![]).server_url();
        assert_eq!(url, "0.0.0.0:3000");
        assert!(url.parse::<std::net::SocketAddr>().is_ok());
    }

    #[test]
    fn test_cors_origins_round_trip() {
        let cfg = config("production", vec!["https://flota.example.com"]);
        assert_eq!(cfg.cors_origins.len(), 1);
    }
}
