use crate::{env_parse_or, env_required, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Origin value that switches CORS to allow-any.
pub const ANY_ORIGIN: &str = "*";

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; a single `*` entry allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            cors_allowed_origins: vec![ANY_ORIGIN.to_string()],
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl FromEnv for ServerConfig {
    /// Reads:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - CORS_ALLOWED_ORIGIN: required, comma-separated origins or `*`
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_parse_or("HOST", Ipv4Addr::UNSPECIFIED)?.to_string();
        let port = env_parse_or("PORT", 8080u16)?;

        let cors_allowed_origins = parse_origins(&env_required("CORS_ALLOWED_ORIGIN")?);
        if cors_allowed_origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}
