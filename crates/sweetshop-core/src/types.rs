//! # Domain Types
//!
//! Core domain types used throughout SweetShop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │      Item       │   │    Account      │   │     Role        │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  Standard       │        │
//! │  │  name           │   │  email (unique) │   │  Admin          │        │
//! │  │  category       │   │  name           │   └─────────────────┘        │
//! │  │  price (Money)  │   │  role           │                              │
//! │  │  quantity >= 0  │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Input shapes:  ItemDraft ──validate──► NewItem                         │
//! │                 ItemPatch ──validate──► ItemChanges                     │
//! │                 ItemFilter (search: name / category / price range)      │
//! │                                                                         │
//! │  Wire shapes:   PublicUser, AuthResponse, RegisterRequest,              │
//! │                 LoginRequest, QuantityRequest, MessageResponse          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire shapes use camelCase field names (`imageUrl`, `createdAt`,
//! `expiresIn`), which is what browser clients already speak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_category, validate_image_url, validate_item_name, validate_price,
    validate_stock_quantity, ValidationResult,
};

// =============================================================================
// Item
// =============================================================================

/// A sellable item ("sweet").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-text category tag ("Chocolate", "Gummy", ...).
    pub category: String,

    /// Unit price. Serialized as a decimal number.
    #[ts(type = "number")]
    pub price: Money,

    /// Units on the shelf. Never negative.
    pub quantity: i64,

    /// Image URL or `data:` URI.
    #[serde(default)]
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Builds a fresh item from a validated draft.
    pub fn from_new(new: NewItem, now: DateTime<Utc>) -> Self {
        Item {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            category: new.category,
            price: new.price,
            quantity: new.quantity,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether at least `quantity` units can be sold right now.
    #[inline]
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

// =============================================================================
// Item Draft (create)
// =============================================================================

/// Create payload as received from a client. Every field is optional so
/// that a missing field becomes a `ValidationError`, not a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ItemDraft {
    /// Checks presence and ranges of all fields.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::{ItemDraft, Money};
    ///
    /// let draft = ItemDraft {
    ///     name: Some("Chocolate Frog".into()),
    ///     category: Some("Chocolate".into()),
    ///     price: Some(Money::from_cents(400)),
    ///     quantity: Some(20),
    ///     image_url: None,
    /// };
    /// let item = draft.validate().unwrap();
    /// assert_eq!(item.quantity, 20);
    ///
    /// assert!(ItemDraft::default().validate().is_err());
    /// ```
    pub fn validate(self) -> ValidationResult<NewItem> {
        let name = self.name.ok_or_else(|| required("name"))?;
        let category = self.category.ok_or_else(|| required("category"))?;
        let price = self.price.ok_or_else(|| required("price"))?;
        let quantity = self.quantity.ok_or_else(|| required("quantity"))?;

        validate_item_name(&name)?;
        validate_category(&category)?;
        validate_price(price)?;
        validate_stock_quantity(quantity)?;

        let image_url = normalize_image(self.image_url);
        if let Some(url) = &image_url {
            validate_image_url(url)?;
        }

        Ok(NewItem {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price,
            quantity,
            image_url,
        })
    }
}

/// A create payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i64,
    pub image_url: Option<String>,
}

// =============================================================================
// Item Patch (update)
// =============================================================================

/// Partial update payload.
///
/// Absent fields keep their current value. `imageUrl` distinguishes absent
/// (keep) from explicit `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(type = "string | null")]
    pub image_url: Option<Option<String>>,
}

impl ItemPatch {
    /// Validates the provided fields only.
    pub fn validate(self) -> ValidationResult<ItemChanges> {
        if let Some(name) = &self.name {
            validate_item_name(name)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_stock_quantity(quantity)?;
        }

        let image_url = self.image_url.map(normalize_image);
        if let Some(Some(url)) = &image_url {
            validate_image_url(url)?;
        }

        Ok(ItemChanges {
            name: self.name.map(|n| n.trim().to_string()),
            category: self.category.map(|c| c.trim().to_string()),
            price: self.price,
            quantity: self.quantity,
            image_url,
        })
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    /// `Some(None)` clears the image.
    pub image_url: Option<Option<String>>,
}

impl ItemChanges {
    /// Applies the changes to an item in place and bumps `updated_at`.
    pub fn apply(self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(image_url) = self.image_url {
            item.image_url = image_url;
        }
        item.updated_at = now;
    }
}

/// Maps `null` to `Some(None)` instead of collapsing it into "absent".
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Blank image strings mean "no image".
fn normalize_image(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Item Filter (search)
// =============================================================================

/// Case-folded form of an item name used for name search.
///
/// Unicode lowercasing, so `"CRÈME"` and `"crème"` fold alike. The SQLite
/// store keeps this in its `name_key` column; the in-memory source folds on
/// the fly. Both must go through this function.
pub fn name_search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Search criteria. Every criterion is optional; all present ones must hold.
///
/// ```text
/// name       case-insensitive substring
/// category   exact match
/// min_price  price >= min_price (inclusive)
/// max_price  price <= max_price (inclusive)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl ItemFilter {
    /// Filter by name substring.
    pub fn by_name(name: impl Into<String>) -> Self {
        ItemFilter {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Filter by exact category.
    pub fn by_category(category: impl Into<String>) -> Self {
        ItemFilter {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Drops blank text criteria so `?name=` behaves like no `name` at all.
    pub fn normalized(self) -> Self {
        let blank_to_none = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        ItemFilter {
            name: blank_to_none(self.name),
            category: blank_to_none(self.category),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Evaluates the filter against one item.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(name) = &self.name {
            if !name_search_key(&item.name).contains(&name_search_key(name)) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if item.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if item.price > max {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Role
// =============================================================================

/// Account role. Wire form is `"USER"` / `"ADMIN"`, storage form is
/// `user` / `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Role {
    /// Regular shopper: may browse and purchase.
    #[serde(rename = "USER")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "user"))]
    Standard,
    /// May create, edit, delete and restock items.
    #[serde(rename = "ADMIN")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "admin"))]
    Admin,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Standard
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Account
// =============================================================================

/// A registered account. The password hash is deliberately not part of
/// this type; it stays inside the store layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The user shape returned by auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<&Account> for PublicUser {
    fn from(account: &Account) -> Self {
        PublicUser {
            id: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
            name: account.name.clone(),
        }
    }
}

/// Issued credential plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
    /// Seconds until `token` expires.
    #[serde(default)]
    #[ts(type = "number")]
    pub expires_in: i64,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of purchase and restock calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub quantity: Option<i64>,
}

impl QuantityRequest {
    pub fn new(quantity: i64) -> Self {
        QuantityRequest {
            quantity: Some(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
