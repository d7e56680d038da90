//! # In-Memory Demo Source
//!
//! A self-contained catalog used when the API cannot be reached. Changes
//! live for the lifetime of the source and are never persisted.
//!
//! Stock changes go through [`sweetshop_core::stock`], the same arithmetic
//! the SQLite store enforces, while the dataset lock is held.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use sweetshop_core::stock::{apply_purchase, apply_restock};
use sweetshop_core::{CoreError, Item, ItemDraft, ItemFilter, ItemPatch, Money, NewItem};

use crate::error::ClientResult;
use crate::source::{InventorySource, SourceKind};

/// (name, category, price in cents, quantity, image)
const DEMO_CATALOG: &[(&str, &str, i64, i64, Option<&str>)] = &[
    (
        "Rainbow Lollipop",
        "Hard Candy",
        250,
        50,
        Some("https://images.unsplash.com/photo-1575224300306-1b8da36134ec?auto=format&fit=crop&q=80&w=400"),
    ),
    ("Chocolate Frog", "Chocolate", 400, 20, None),
    ("Sour Worms", "Gummy", 150, 100, None),
    ("Licorice Wands", "Hard Candy", 300, 0, None),
];

#[derive(Debug, Default)]
pub struct InMemorySource {
    items: Mutex<Vec<Item>>,
}

impl InMemorySource {
    /// Source holding exactly `items`.
    pub fn new(items: Vec<Item>) -> Self {
        InMemorySource {
            items: Mutex::new(items),
        }
    }

    /// Source seeded with the demo catalog.
    pub fn demo() -> Self {
        let now = Utc::now();
        let items = DEMO_CATALOG
            .iter()
            .map(|(name, category, cents, quantity, image)| {
                Item::from_new(
                    NewItem {
                        name: name.to_string(),
                        category: category.to_string(),
                        price: Money::from_cents(*cents),
                        quantity: *quantity,
                        image_url: image.map(str::to_string),
                    },
                    now,
                )
            })
            .collect();

        Self::new(items)
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::ItemNotFound(id.to_string())
}

#[async_trait]
impl InventorySource for InMemorySource {
    fn kind(&self) -> SourceKind {
        SourceKind::InMemory
    }

    async fn list(&self, filter: &ItemFilter) -> ClientResult<Vec<Item>> {
        let items = self.items.lock().await;
        Ok(items.iter().filter(|i| filter.matches(i)).cloned().collect())
    }

    async fn create(&self, draft: ItemDraft) -> ClientResult<Item> {
        let item = Item::from_new(draft.validate()?, Utc::now());
        self.items.lock().await.push(item.clone());
        info!(id = %item.id, name = %item.name, "Demo item created");
        Ok(item)
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> ClientResult<Item> {
        let changes = patch.validate()?;
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))?;

        changes.apply(item, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|i| i.id != id);

        if items.len() == before {
            return Err(not_found(id).into());
        }
        info!(id = %id, "Demo item deleted");
        Ok(())
    }

    async fn purchase(&self, id: &str, qty: i64) -> ClientResult<Item> {
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))?;

        item.quantity = apply_purchase(item, qty)?;
        item.updated_at = Utc::now();
        debug!(id = %id, sold = qty, remaining = item.quantity, "Demo purchase");
        Ok(item.clone())
    }

    async fn restock(&self, id: &str, qty: i64) -> ClientResult<Item> {
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))?;

        item.quantity = apply_restock(item, qty)?;
        item.updated_at = Utc::now();
        debug!(id = %id, added = qty, quantity = item.quantity, "Demo restock");
        Ok(item.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
