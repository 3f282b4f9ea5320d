use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    JsonBody, QueryParams, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemFilter};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, delete_item, count_items),
    components(
        schemas(Item, CreateItem, ItemFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Lost and found item catalog")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/count", get(count_items))
        .route("/{id}", get(get_item).delete(delete_item))
        .with_state(shared_service)
}

/// List items, narrowed by any filter given
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    params(ItemFilter),
    responses(
        (status = 200, description = "Items in insertion order", body = Vec<Item>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    QueryParams(filter): QueryParams<ItemFilter>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.filter_items(filter).await?;
    Ok(Json(items))
}

/// Submit a new item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    JsonBody(input): JsonBody<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
) -> ItemResult<StatusCode> {
    service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Number of stored items
#[utoipa::path(
    get,
    path = "/count",
    tag = "Items",
    responses(
        (status = 200, description = "Item count", body = u64),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<u64>> {
    let count = service.count_items().await?;
    Ok(Json(count))
}
