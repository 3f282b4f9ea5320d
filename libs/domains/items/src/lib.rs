//! Items Domain
//!
//! An in-memory catalog of lost and found items.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage trait + in-memory implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, filter criteria
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{handlers, InMemoryItemRepository, ItemService};
//!
//! let service = ItemService::new(InMemoryItemRepository::new());
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod allocator;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use allocator::{IdAllocator, IdGenerator};
pub use config::CatalogConfig;
pub use error::{ItemError, ItemResult};
pub use filter::{BoundingBox, ItemQuery};
pub use handlers::ApiDoc;
pub use models::{CreateItem, Item, ItemFilter, Lenient, NewItem};
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
