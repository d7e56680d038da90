//! Inventory routes: browse, search, maintain and sell items.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use sweetshop_core::{
    Item, ItemDraft, ItemFilter, ItemPatch, MessageResponse, Money, QuantityRequest,
    ValidationError, DEFAULT_PURCHASE_QUANTITY,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonOrDefault, ValidJson};
use crate::state::AppState;

/// Query string of `GET /api/sweets/search`.
///
/// Prices arrive as text so a malformed number is reported as a
/// validation failure instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl SearchParams {
    pub fn into_filter(self) -> Result<ItemFilter, ValidationError> {
        Ok(ItemFilter {
            name: self.name,
            category: self.category,
            min_price: parse_price("minPrice", self.min_price)?,
            max_price: parse_price("maxPrice", self.max_price)?,
        }
        .normalized())
    }
}

fn parse_price(field: &str, raw: Option<String>) -> Result<Option<Money>, ValidationError> {
    let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let amount: f64 = raw.parse().map_err(|_| invalid("expected a number"))?;
    Money::from_decimal(amount)
        .map(Some)
        .map_err(|_| invalid("out of range"))
}

/// `GET /api/sweets`
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    let items = state.db().items().list(&ItemFilter::default()).await?;
    Ok(Json(items))
}

/// `GET /api/sweets/search?name=&category=&minPrice=&maxPrice=`
pub async fn search_items(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Item>>> {
    let Query(params) = params?;
    let filter = params.into_filter()?;

    let items = state.db().items().list(&filter).await?;
    Ok(Json(items))
}

/// `GET /api/sweets/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    state
        .db()
        .items()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Sweet not found".to_string()))
}

/// `POST /api/sweets` (admin)
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(draft): ValidJson<ItemDraft>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.db().items().create(draft).await?;
    info!(id = %item.id, by = %user.id, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/sweets/{id}` (admin)
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<ItemPatch>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.db().items().update(&id, patch).await?))
}

/// `DELETE /api/sweets/{id}` (admin)
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db().items().delete(&id).await?;
    info!(id = %id, by = %user.id, "Item deleted");
    Ok(Json(MessageResponse {
        message: "Deleted".to_string(),
    }))
}

/// `POST /api/sweets/{id}/purchase` (signed in)
///
/// A missing `quantity` buys one unit.
pub async fn purchase_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonOrDefault(body): JsonOrDefault<QuantityRequest>,
) -> ApiResult<Json<Item>> {
    let quantity = body.quantity.unwrap_or(DEFAULT_PURCHASE_QUANTITY);
    let item = state.db().items().purchase(&id, quantity).await?;
    info!(id = %id, buyer = %user.id, quantity, "Purchase recorded");
    Ok(Json(item))
}

/// `POST /api/sweets/{id}/restock` (admin)
pub async fn restock_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrDefault(body): JsonOrDefault<QuantityRequest>,
) -> ApiResult<Json<Item>> {
    let quantity = body.quantity.ok_or_else(|| ValidationError::Required {
        field: "quantity".to_string(),
    })?;
    Ok(Json(state.db().items().restock(&id, quantity).await?))
}
