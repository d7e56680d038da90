//! # sweetshop-client: Storefront Client Library
//!
//! Everything a SweetShop front end needs apart from drawing pixels: the
//! API client, an offline demo catalog, the persisted session and the
//! storefront view state.
//!
//! ## Modules
//!
//! - [`source`] - `InventorySource` trait shared by both data sources
//! - [`remote`] - HTTP source backed by sweetshop-api
//! - [`memory`] - In-memory demo catalog
//! - [`auth`] - Register / login / current-user calls
//! - [`session`] - Session object and its on-disk store
//! - [`storefront`] - View state and source selection
//! - [`config`] - `client.toml` + `SWEETSHOP_*` overrides
//! - [`error`] - Client error type
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sweetshop_client::{ClientConfig, SessionStore, Storefront};
//!
//! # async fn run() -> sweetshop_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let mut shop = Storefront::connect(config, SessionStore::default_location()?).await?;
//!
//! shop.set_search("frog");
//! for item in shop.refresh().await? {
//!     println!("{} ({} left)", item.name, item.quantity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod memory;
pub mod remote;
pub mod session;
pub mod source;
pub mod storefront;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use memory::InMemorySource;
pub use remote::RemoteSource;
pub use session::{Session, SessionStore};
pub use source::{InventorySource, SourceKind};
pub use storefront::{BackendStatus, Storefront, View, ViewState};
