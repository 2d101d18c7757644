use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateItemRequest, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/items handler - Create a new item
///
/// `title` is required and must be non-empty after trimming; the stored
/// title is the trimmed value. `description` defaults to the empty string.
#[utoipa::path(
    post,
    path = routes::ITEMS,
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Missing or empty title", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let title = match body.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(ApiError::TitleRequired),
    };
    let description = body.description.unwrap_or_default();

    let item = state.store.insert(title, description).await?;

    tracing::info!("Created item with id: {}", item.id);
    Ok((StatusCode::CREATED, Json(item.into())))
}
