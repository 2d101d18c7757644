use crate::error::{parse_item_id, ApiError, ErrorResponse};
use crate::models::ItemResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /api/items/{id} handler - Retrieve a single item
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("id" = i64, Path, description = "Positive integer item id")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let id = parse_item_id(&id_str)?;

    match state.store.get(id).await? {
        Some(item) => {
            tracing::debug!("Retrieved item with id: {}", id);
            Ok((StatusCode::OK, Json(item.into())))
        }
        None => Err(ApiError::ItemNotFound(id)),
    }
}
