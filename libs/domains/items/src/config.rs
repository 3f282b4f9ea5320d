use core_config::{ConfigError, FromEnv, env_parse_or};

use crate::allocator::DEFAULT_MAX_ATTEMPTS;

/// Catalog settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Draws the id allocator makes before giving up (`CATALOG_ID_MAX_ATTEMPTS`)
    pub id_max_attempts: u32,
    /// Store the demo item at startup (`CATALOG_SEED_DEMO`)
    pub seed_demo: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            id_max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed_demo: false,
        }
    }
}

impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let id_max_attempts: u32 = env_parse_or("CATALOG_ID_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if id_max_attempts == 0 {
            return Err(ConfigError::ParseError {
                key: "CATALOG_ID_MAX_ATTEMPTS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            id_max_attempts,
            seed_demo: env_parse_or("CATALOG_SEED_DEMO", false)?,
        })
    }
}
