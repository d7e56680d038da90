//! # Item Repository
//!
//! The Inventory Store: CRUD plus the two stock-changing operations.
//!
//! ## Guarded Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a purchase stays race-free                       │
//! │                                                                         │
//! │  ❌ WRONG: read, check in Rust, write back                              │
//! │     SELECT quantity ...            (both requests read 1)               │
//! │     UPDATE ... SET quantity = 0    (both "succeed", 2 sold from 1)      │
//! │                                                                         │
//! │  ✅ CORRECT: check and write in ONE statement                           │
//! │     UPDATE items SET quantity = quantity - ?qty                         │
//! │     WHERE id = ?id AND quantity >= ?qty                                 │
//! │     RETURNING ...                                                       │
//! │                                                                         │
//! │  SQLite serializes writers, so the second request evaluates the WHERE   │
//! │  clause against the first one's committed decrement.                    │
//! │                                                                         │
//! │  Zero rows back?  → look the id up once:                                │
//! │     missing  → NotFound                                                 │
//! │     present  → InsufficientStock                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use sweetshop_core::validation::{validate_purchase_quantity, validate_restock_quantity};
use sweetshop_core::{name_search_key, CoreError, Item, ItemDraft, ItemFilter, ItemPatch, Money};

const ITEM_COLUMNS: &str =
    "id, name, category, price_cents, quantity, image_url, created_at, updated_at";

/// Row shape of the `items` table.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    category: String,
    price_cents: i64,
    quantity: i64,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            category: row.category,
            price: Money::from_cents(row.price_cents),
            quantity: row.quantity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for inventory operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let all = repo.list(&ItemFilter::default()).await?;
/// let frog = repo.purchase(&frog_id, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists items matching `filter`, in insertion order.
    ///
    /// ## Filter Semantics
    /// - `name`: case-insensitive substring (Unicode folding via `name_key`)
    /// - `category`: exact match
    /// - `min_price` / `max_price`: inclusive bounds
    ///
    /// An empty filter returns everything. No match is an empty Vec, not an error.
    pub async fn list(&self, filter: &ItemFilter) -> DbResult<Vec<Item>> {
        debug!(?filter, "Listing items");

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE 1 = 1"));

        // instr() rather than LIKE so '%' and '_' in the search text are literal
        if let Some(name) = &filter.name {
            query
                .push(" AND instr(name_key, ")
                .push_bind(name_search_key(name))
                .push(") > 0");
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(min) = filter.min_price {
            query.push(" AND price_cents >= ").push_bind(min.cents());
        }
        if let Some(max) = filter.max_price {
            query.push(" AND price_cents <= ").push_bind(max.cents());
        }
        query.push(" ORDER BY seq");

        let rows: Vec<ItemRow> = query.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "List returned items");
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let row: Option<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Item::from))
    }

    /// Validates `draft` and inserts a new item with a fresh UUID.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored item
    /// * `Err(DbError::Domain(Validation))` - Missing or out-of-range field
    pub async fn create(&self, draft: ItemDraft) -> DbResult<Item> {
        let item = Item::from_new(draft.validate()?, Utc::now());

        debug!(id = %item.id, name = %item.name, "Inserting item");

        let row: ItemRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO items (
                id, name, category, price_cents, quantity, image_url, created_at, updated_at,
                name_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.quantity)
        .bind(&item.image_url)
        .bind(item.created_at)
        .bind(item.updated_at)
        .bind(name_search_key(&item.name))
        .fetch_one(&self.pool)
        .await?;

        info!(id = %row.id, name = %row.name, quantity = row.quantity, "Item created");
        Ok(row.into())
    }

    /// Applies a partial update.
    ///
    /// Absent fields keep their stored value; `imageUrl: null` clears the image.
    /// `updated_at` is bumped even when nothing else changes.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> DbResult<Item> {
        let changes = patch.validate()?;

        debug!(id = %id, ?changes, "Updating item");

        let (set_image, image_url) = match changes.image_url {
            Some(image) => (true, image),
            None => (false, None),
        };

        let name_key = changes.name.as_deref().map(name_search_key);
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE items SET
                name = COALESCE(?2, name),
                name_key = COALESCE(?9, name_key),
                category = COALESCE(?3, category),
                price_cents = COALESCE(?4, price_cents),
                quantity = COALESCE(?5, quantity),
                image_url = CASE WHEN ?6 THEN ?7 ELSE image_url END,
                updated_at = ?8
            WHERE id = ?1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.category)
        .bind(changes.price.map(|p| p.cents()))
        .bind(changes.quantity)
        .bind(set_image)
        .bind(image_url)
        .bind(Utc::now())
        .bind(name_key)
        .fetch_optional(&self.pool)
        .await?;

        let item: Item = row.ok_or_else(|| DbError::not_found("Item", id))?.into();
        info!(id = %item.id, "Item updated");
        Ok(item)
    }

    /// Hard-deletes an item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        info!(id = %id, "Item deleted");
        Ok(())
    }

    /// Sells `qty` units of an item.
    ///
    /// ## Errors
    /// * `Validation` - `qty <= 0`
    /// * `NotFound` - no item with this id
    /// * `InsufficientStock` - fewer than `qty` units left; quantity unchanged
    ///
    /// The `available` count in `InsufficientStock` comes from a follow-up read
    /// and may already reflect later writes.
    pub async fn purchase(&self, id: &str, qty: i64) -> DbResult<Item> {
        validate_purchase_quantity(qty)?;

        debug!(id = %id, quantity = qty, "Purchasing item");

        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE items
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(qty)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            info!(id = %row.id, sold = qty, remaining = row.quantity, "Purchase completed");
            return Ok(row.into());
        }

        match self.get_by_id(id).await? {
            None => Err(DbError::not_found("Item", id)),
            Some(item) => {
                debug!(id = %id, available = item.quantity, requested = qty, "Insufficient stock");
                Err(CoreError::InsufficientStock {
                    name: item.name,
                    available: item.quantity,
                    requested: qty,
                }
                .into())
            }
        }
    }

    /// Adds `qty` units to an item. Any positive `qty` is accepted as long as
    /// the total still fits in an `i64`.
    pub async fn restock(&self, id: &str, qty: i64) -> DbResult<Item> {
        validate_restock_quantity(qty)?;

        debug!(id = %id, quantity = qty, "Restocking item");

        // Upper bound keeps SQLite from promoting an overflowing sum to REAL.
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE items
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity <= ?4
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(qty)
        .bind(Utc::now())
        .bind(i64::MAX - qty)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            info!(id = %row.id, added = qty, quantity = row.quantity, "Restock completed");
            return Ok(row.into());
        }

        match self.get_by_id(id).await? {
            None => Err(DbError::not_found("Item", id)),
            Some(item) => Err(CoreError::QuantityOverflow { name: item.name }.into()),
        }
    }

    /// Computes `name_key` for rows that predate the column. Returns how many
    /// rows were filled.
    pub async fn fill_missing_name_keys(&self) -> DbResult<u64> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM items WHERE name_key IS NULL")
                .fetch_all(&self.pool)
                .await?;

        let mut filled = 0;
        for (id, name) in rows {
            filled += sqlx::query("UPDATE items SET name_key = ?2 WHERE id = ?1")
                .bind(&id)
                .bind(name_search_key(&name))
                .execute(&self.pool)
                .await?
                .rows_affected();
        }

        if filled > 0 {
            info!(count = filled, "Filled search keys for existing items");
        }
        Ok(filled)
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> ItemRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items()
    }

    fn draft(name: &str, category: &str, cents: i64, quantity: i64) -> ItemDraft {
        ItemDraft {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            price: Some(Money::from_cents(cents)),
            quantity: Some(quantity),
            image_url: None,
        }
    }

    async fn seed_catalog(repo: &ItemRepository) {
        repo.create(draft("Rainbow Lollipop", "Hard Candy", 250, 50))
            .await
            .unwrap();
        repo.create(draft("Chocolate Frog", "Chocolate", 400, 20))
            .await
            .unwrap();
        repo.create(draft("Sour Worms", "Gummy", 150, 100))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_name_search_folds_non_ascii() {
        let repo = setup().await;
        repo.create(draft("CRÈME Brûlée", "Custard", 500, 3))
            .await
            .unwrap();
        seed_catalog(&repo).await;

        for needle in ["crème", "BRÛLÉE", "Crème brû"] {
            let filter = ItemFilter::by_name(needle);
            let hits = repo.list(&filter).await.unwrap();
            assert_eq!(hits.len(), 1, "search {needle:?}");
            assert!(filter.matches(&hits[0]));
        }
        assert!(repo.list(&ItemFilter::by_name("creme")).await.unwrap().is_empty());

        // Renaming refreshes the key.
        let id = repo.list(&ItemFilter::by_name("crème")).await.unwrap()[0].id.clone();
        repo.update(
            &id,
            ItemPatch {
                name: Some("ÉCLAIR".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(repo.list(&ItemFilter::by_name("crème")).await.unwrap().is_empty());
        assert_eq!(repo.list(&ItemFilter::by_name("éclair")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fill_missing_name_keys() {
        let repo = setup().await;
        repo.create(draft("ÉCLAIR", "Pastry", 300, 1)).await.unwrap();
        sqlx::query("UPDATE items SET name_key = NULL")
            .execute(&repo.pool)
            .await
            .unwrap();
        assert!(repo.list(&ItemFilter::by_name("éclair")).await.unwrap().is_empty());

        assert_eq!(repo.fill_missing_name_keys().await.unwrap(), 1);
        assert_eq!(repo.list(&ItemFilter::by_name("éclair")).await.unwrap().len(), 1);
        assert_eq!(repo.fill_missing_name_keys().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restock_has_no_per_call_cap() {
        let repo = setup().await;
        let item = repo.create(draft("Licorice Wands", "Hard Candy", 300, 0)).await.unwrap();

        let restocked = repo.restock(&item.id, 2_000_000).await.unwrap();
        assert_eq!(restocked.quantity, 2_000_000);

        let err = repo.restock(&item.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::QuantityOverflow { .. })));
        let unchanged = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(unchanged.quantity, 2_000_000);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create(draft("Chocolate Frog", "Chocolate", 400, 20))
            .await
            .unwrap();

        assert_eq!(uuid::Uuid::parse_str(&created.id).unwrap().get_version_num(), 4);
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Chocolate Frog");
        assert_eq!(fetched.price, Money::from_cents(400));
        assert_eq!(fetched.quantity, 20);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let repo = setup().await;
        let mut incomplete = draft("Frog", "Chocolate", 400, 1);
        incomplete.price = None;

        let err = repo.create(incomplete).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_in_insertion_order_with_filters() {
        let repo = setup().await;
        seed_catalog(&repo).await;

        let all = repo.list(&ItemFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Rainbow Lollipop", "Chocolate Frog", "Sour Worms"]);

        let by_name = repo.list(&ItemFilter::by_name("FROG")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Chocolate Frog");

        let by_category = repo.list(&ItemFilter::by_category("Gummy")).await.unwrap();
        assert_eq!(by_category.len(), 1);
        assert!(repo
            .list(&ItemFilter::by_category("gummy"))
            .await
            .unwrap()
            .is_empty());

        // Inclusive bounds on both ends.
        let priced = repo
            .list(&ItemFilter {
                min_price: Some(Money::from_cents(150)),
                max_price: Some(Money::from_cents(250)),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = priced.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Rainbow Lollipop", "Sour Worms"]);

        let combined = repo
            .list(&ItemFilter {
                name: Some("o".into()),
                category: Some("Chocolate".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(combined.len(), 1);

        let literal = repo.list(&ItemFilter::by_name("%")).await.unwrap();
        assert!(literal.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = setup().await;
        let mut with_image = draft("Frog", "Chocolate", 400, 5);
        with_image.image_url = Some("https://img.example/frog.png".into());
        let item = repo.create(with_image).await.unwrap();

        let updated = repo
            .update(
                &item.id,
                ItemPatch {
                    price: Some(Money::from_cents(450)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price.cents(), 450);
        assert_eq!(updated.name, "Frog");
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.image_url.as_deref(), Some("https://img.example/frog.png"));
        assert!(updated.updated_at >= item.updated_at);

        let cleared = repo
            .update(
                &item.id,
                ItemPatch {
                    image_url: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.image_url, None);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = setup().await;
        let err = repo
            .update("missing", ItemPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let item = repo.create(draft("Frog", "Chocolate", 400, 5)).await.unwrap();

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purchase_and_restock() {
        let repo = setup().await;
        let item = repo.create(draft("Frog", "Chocolate", 400, 10)).await.unwrap();

        let after = repo.purchase(&item.id, 2).await.unwrap();
        assert_eq!(after.quantity, 8);

        let err = repo.purchase(&item.id, 100).await.unwrap_err();
        match err {
            DbError::Domain(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 8);
                assert_eq!(requested, 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.get_by_id(&item.id).await.unwrap().unwrap().quantity, 8);

        let restocked = repo.restock(&item.id, 10).await.unwrap();
        assert_eq!(restocked.quantity, 18);
    }

    #[tokio::test]
    async fn test_purchase_validation_and_missing() {
        let repo = setup().await;
        let item = repo.create(draft("Frog", "Chocolate", 400, 10)).await.unwrap();

        for bad in [0, -1] {
            let err = repo.purchase(&item.id, bad).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
            let err = repo.restock(&item.id, bad).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }

        let err = repo.purchase("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        let err = repo.restock("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restock_overflow_is_rejected() {
        let repo = setup().await;
        let item = repo
            .create(draft("Bulk", "Gummy", 1, i64::MAX - 5))
            .await
            .unwrap();

        let err = repo.restock(&item.id, 10).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::QuantityOverflow { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_purchases_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("race.db")).max_connections(5))
            .await
            .unwrap();
        let item = db
            .items()
            .create(draft("Last Frogs", "Chocolate", 400, 10))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let repo = db.items();
            let id = item.id.clone();
            handles.push(tokio::spawn(async move { repo.purchase(&id, 1).await }));
        }

        let mut sold = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(after) => {
                    assert!(after.quantity >= 0);
                    sold += 1;
                }
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => rejected += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(sold, 10);
        assert_eq!(rejected, 15);
        let left = db.items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(left.quantity, 0);
        db.close().await;
    }
}
