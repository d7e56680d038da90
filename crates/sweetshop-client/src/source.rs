//! # Inventory Data Source
//!
//! The one seam between a storefront and where its items live.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!   Storefront ──►│  dyn InventorySource         │
//!                 └──────────────┬───────────────┘
//!                 ┌──────────────┴───────────────┐
//!                 ▼                              ▼
//!         RemoteSource                    InMemorySource
//!         HTTP → sweetshop-api            demo dataset, one Mutex
//! ```
//!
//! Both implementations keep the same rules: no negative stock, unknown
//! ids are "not found", restock quantities are validated.

use async_trait::async_trait;
use sweetshop_core::{Item, ItemDraft, ItemFilter, ItemPatch};

use crate::error::ClientResult;

/// Which implementation is behind a `dyn InventorySource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    InMemory,
}

#[async_trait]
pub trait InventorySource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Items matching `filter`, in catalog order.
    async fn list(&self, filter: &ItemFilter) -> ClientResult<Vec<Item>>;

    async fn create(&self, draft: ItemDraft) -> ClientResult<Item>;

    async fn update(&self, id: &str, patch: ItemPatch) -> ClientResult<Item>;

    async fn delete(&self, id: &str) -> ClientResult<()>;

    /// Sells `qty` units; fails without changing stock if fewer are left.
    async fn purchase(&self, id: &str, qty: i64) -> ClientResult<Item>;

    async fn restock(&self, id: &str, qty: i64) -> ClientResult<Item>;
}
