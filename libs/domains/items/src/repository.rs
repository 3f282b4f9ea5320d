use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::allocator::IdAllocator;
use crate::config::CatalogConfig;
use crate::error::ItemResult;
use crate::filter::ItemQuery;
use crate::models::{Item, NewItem};

/// Repository trait for Item persistence
///
/// Listing operations return items in insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Assign a fresh id and store the item
    async fn create(&self, input: NewItem) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// All stored items
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Items matching every constraint of the query
    async fn find(&self, query: ItemQuery) -> ItemResult<Vec<Item>>;

    /// Delete an item by ID; false when nothing was stored under it
    async fn delete(&self, id: Uuid) -> ItemResult<bool>;

    /// Number of stored items
    async fn count(&self) -> ItemResult<u64>;
}

#[derive(Debug, Default)]
struct CatalogState {
    items: HashMap<Uuid, Item>,
    order: Vec<Uuid>,
    allocator: IdAllocator,
}

impl CatalogState {
    fn ordered(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }
}

/// In-memory implementation of ItemRepository
///
/// Id allocation and insertion happen under one write lock, so concurrent
/// creates never observe each other's half-finished state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allocator(allocator: IdAllocator) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState {
                allocator,
                ..Default::default()
            })),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::with_allocator(IdAllocator::new(config.id_max_attempts))
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    #[instrument(skip(self, input), fields(owner_id = %input.owner_id))]
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let mut state = self.state.write().await;

        let id = state.allocator.allocate()?;
        let item = Item::new(id, input, Utc::now());
        state.items.insert(id, item.clone());
        state.order.push(id);

        tracing::info!(item_id = %id, "Created item");
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn list(&self) -> ItemResult<Vec<Item>> {
        let state = self.state.read().await;
        Ok(state.ordered().cloned().collect())
    }

    async fn find(&self, query: ItemQuery) -> ItemResult<Vec<Item>> {
        let state = self.state.read().await;
        Ok(state
            .ordered()
            .filter(|item| query.matches(item))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let mut state = self.state.write().await;

        if state.items.remove(&id).is_some() {
            state.order.retain(|existing| *existing != id);
            tracing::info!(item_id = %id, "Deleted item");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count(&self) -> ItemResult<u64> {
        let state = self.state.read().await;
        Ok(state.items.len() as u64)
    }
}
