use serde::{Deserialize, Serialize};

use crate::db::Item;

/// Request body for POST /api/items
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Request body for PATCH /api/items/{id}; absent fields keep stored values
#[derive(Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for the list endpoint
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Trimmed keyword filter, empty string when absent
    pub fn keyword(&self) -> String {
        self.q.as_deref().unwrap_or("").trim().to_string()
    }

    /// Page size clamped to [1, 100], default 20
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Page start clamped to a minimum of 0, default 0
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Response type for the list endpoint
///
/// `count` is the number of rows in this page, not the total match count.
/// `limit` and `offset` echo the clamped values actually applied.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub items: Vec<ItemResponse>,
    pub limit: i64,
    pub offset: i64,
    pub count: usize,
}

/// A single item as returned over HTTP, timestamps in RFC 3339
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse {
            id: item.id,
            title: item.title,
            description: item.description,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}
