//! # Repository Module
//!
//! Database repository implementations for SweetShop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.items().purchase(&id, 2)                              │
//! │       ▼                                                                 │
//! │  ItemRepository                     AccountRepository                   │
//! │  ├── list(&filter)                  ├── create_with_bootstrap_role(..)  │
//! │  ├── get_by_id(id)                  ├── find_by_email(email)            │
//! │  ├── create(draft)                  ├── get_by_id(id)                   │
//! │  ├── update(id, patch)              └── verify_credentials(email, pw)   │
//! │  ├── delete(id)                                                         │
//! │  ├── purchase(id, qty)                                                  │
//! │  └── restock(id, qty)                                                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Inventory CRUD, search, purchase, restock
//! - [`AccountRepository`](account::AccountRepository) - Accounts and credential checks

pub mod account;
pub mod item;
