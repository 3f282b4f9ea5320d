use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_items::CatalogConfig;

pub use core_config::Environment;

/// Application configuration
/// Composes shared config components from `core_config` and the items domain
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            catalog,
            environment,
        })
    }
}
