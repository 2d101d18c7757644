use crate::error::{parse_item_id, ApiError, ErrorResponse};
use crate::models::{ItemResponse, UpdateItemRequest};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// PATCH /api/items/{id} handler - Partially update an item
///
/// Both body fields are optional; the body itself may be absent. A
/// whitespace-only title leaves the stored title unchanged, but the
/// write still refreshes `updated_at`.
#[utoipa::path(
    patch,
    path = routes::ITEM,
    params(
        ("id" = i64, Path, description = "Positive integer item id")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Option<Json<UpdateItemRequest>>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let id = parse_item_id(&id_str)?;
    let Json(body) = body.unwrap_or_default();

    match state.store.update(id, body.title, body.description).await? {
        Some(item) => {
            tracing::info!("Updated item with id: {}", id);
            Ok((StatusCode::OK, Json(item.into())))
        }
        None => Err(ApiError::ItemNotFound(id)),
    }
}
