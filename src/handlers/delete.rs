use crate::error::{parse_item_id, ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /api/items/{id} handler - Hard-delete an item
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("id" = i64, Path, description = "Positive integer item id")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_item_id(&id_str)?;

    if state.store.delete(id).await? {
        tracing::info!("Deleted item with id: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::ItemNotFound(id))
    }
}
