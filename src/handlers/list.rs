use crate::error::{ApiError, ErrorResponse};
use crate::models::{ItemResponse, ListQuery, ListResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Query, extract::State, http::StatusCode, Json};

/// GET /api/items handler - List items, newest first
///
/// Query parameters:
/// - q: keyword; matches items whose title or description contains it (optional)
/// - limit: page size, clamped to [1, 100] (optional, default: 20)
/// - offset: rows to skip, clamped to >= 0 (optional, default: 0)
///
/// The response echoes the clamped limit/offset and reports `count` as
/// the number of rows in the returned page.
#[utoipa::path(
    get,
    path = routes::ITEMS,
    params(
        ("q" = Option<String>, Query, description = "Substring filter on title or description"),
        ("limit" = Option<i64>, Query, description = "Page size, clamped to [1, 100]"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, clamped to >= 0")
    ),
    responses(
        (status = 200, description = "Page of items", body = ListResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let keyword = query.keyword();
    let limit = query.limit();
    let offset = query.offset();

    let items = state.store.list(keyword.clone(), limit, offset).await?;
    let items: Vec<ItemResponse> = items.into_iter().map(Into::into).collect();

    tracing::info!(
        "Listed {} items (q: {:?}, limit: {}, offset: {})",
        items.len(),
        keyword,
        limit,
        offset
    );

    let response = ListResponse {
        count: items.len(),
        items,
        limit,
        offset,
    };

    Ok((StatusCode::OK, Json(response)))
}
