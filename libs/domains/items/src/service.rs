//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::filter::ItemQuery;
use crate::models::{CreateItem, Item, ItemFilter};
use crate::repository::ItemRepository;

/// Item service providing catalog operations
///
/// Validation happens here; the repository only ever sees checked input.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and store a new item
    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        let new_item = input.into_new_item()?;
        self.repository.create(new_item).await
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// All items in insertion order
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<Item>> {
        self.repository.list().await
    }

    /// Items matching the filter; an empty filter lists everything
    #[instrument(skip(self))]
    pub async fn filter_items(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let query = ItemQuery::try_from(filter)?;
        if query.is_unconstrained() {
            return self.repository.list().await;
        }
        self.repository.find(query).await
    }

    /// Delete an item
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> ItemResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ItemError::NotFound(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn count_items(&self) -> ItemResult<u64> {
        self.repository.count().await
    }

    /// Store the demo item
    pub async fn seed_demo_item(&self) -> ItemResult<Item> {
        let item = self.create_item(CreateItem::sample()).await?;
        tracing::info!(item_id = %item.id, "Seeded demo item");
        Ok(item)
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lenient, NewItem};
    use crate::repository::MockItemRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored(id: Uuid, input: NewItem) -> Item {
        Item::new(id, input, Utc::now())
    }

    fn hammer() -> CreateItem {
        CreateItem {
            owner_id: Some("u1".to_string().into()),
            keywords: Some(vec!["hammer".to_string()].into()),
            description: Some("claw hammer".to_string().into()),
            image: None,
            latitude: Some(Lenient::Valid(10.0)),
            longitude: Some(Lenient::Valid(20.0)),
        }
    }

    #[tokio::test]
    async fn test_create_passes_validated_input() {
        let mut mock_repo = MockItemRepository::new();
        let id = Uuid::new_v4();

        mock_repo
            .expect_create()
            .withf(|input| input.owner_id == "u1" && input.keywords == vec!["hammer"])
            .times(1)
            .returning(move |input| Ok(stored(id, input)));

        let service = ItemService::new(mock_repo);
        let item = service.create_item(hammer()).await.unwrap();

        assert_eq!(item.id, id);
        assert_eq!(item.description, "claw hammer");
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_repository() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo.expect_create().never();

        let service = ItemService::new(mock_repo);
        let input = CreateItem {
            latitude: Some(Lenient::Valid(91.0)),
            ..hammer()
        };

        let err = service.create_item(input).await.unwrap_err();
        assert_eq!(err.field(), Some("latitude"));
    }

    #[tokio::test]
    async fn test_get_missing_item_is_not_found() {
        let mut mock_repo = MockItemRepository::new();
        let id = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ItemService::new(mock_repo);
        assert_eq!(service.get_item(id).await.unwrap_err(), ItemError::NotFound(id));
    }

    #[tokio::test]
    async fn test_delete_missing_item_is_not_found() {
        let mut mock_repo = MockItemRepository::new();
        let id = Uuid::new_v4();

        mock_repo
            .expect_delete()
            .with(eq(id))
            .returning(|_| Ok(false));

        let service = ItemService::new(mock_repo);
        assert_eq!(
            service.delete_item(id).await.unwrap_err(),
            ItemError::NotFound(id)
        );
    }

    #[tokio::test]
    async fn test_empty_filter_lists_everything() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo.expect_list().times(1).returning(|| Ok(vec![]));
        mock_repo.expect_find().never();

        let service = ItemService::new(mock_repo);
        let items = service.filter_items(ItemFilter::default()).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_constrained_filter_uses_find() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo.expect_list().never();
        mock_repo
            .expect_find()
            .withf(|query| !query.is_unconstrained())
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ItemService::new(mock_repo);
        let filter = ItemFilter {
            keyword: Some("tools".to_string()),
            ..Default::default()
        };
        service.filter_items(filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_filter_rejected_before_repository() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo.expect_find().never();
        mock_repo.expect_list().never();

        let service = ItemService::new(mock_repo);
        let filter = ItemFilter {
            min_lat: Some(0.0),
            ..Default::default()
        };
        let err = service.filter_items(filter).await.unwrap_err();
        assert_eq!(err.field(), Some("maxLat"));
    }
}
