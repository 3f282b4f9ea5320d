//! Application state management.

use domain_items::{InMemoryItemRepository, ItemService};

use crate::config::Config;

pub type Catalog = ItemService<InMemoryItemRepository>;

/// Shared application state.
///
/// Cloning is cheap: the catalog is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// The item catalog
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let repository = InMemoryItemRepository::from_config(&config.catalog);
        Self {
            catalog: ItemService::new(repository),
            config,
        }
    }
}
