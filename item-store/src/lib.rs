//! Generic Item Cache Library
//!
//! A key/value cache for device state facts ("items") with batch-atomic
//! updates and a per-key subscriber registry.
//!
//! # Features
//!
//! - **Last-known-value semantics**: each key maps to its most recently
//!   applied value, no history
//! - **Batch-atomic apply**: all items in a batch are written before any
//!   subscriber is notified, so no subscriber can observe a half-applied batch
//! - **Per-key subscribers**: callbacks registered per item key, invoked
//!   synchronously in registration order
//! - **Shared handles**: cloning an `ItemStore` shares the underlying cache
//!
//! # Quick Start
//!
//! ```rust
//! use item_store::{Item, ItemStore};
//! use serde_json::json;
//!
//! let store = ItemStore::new();
//!
//! // Apply a batch of items
//! store.apply(&[
//!     Item::new("power", json!("On")),
//!     Item::new("door", json!("Closed")),
//! ]);
//!
//! // Read back the last-known value
//! assert_eq!(store.get("power"), Some(json!("On")));
//! assert_eq!(store.get("missing"), None);
//! ```

// Modules
pub mod item;
pub mod store;

// Re-exports - Public API
pub use item::Item;
pub use store::{ItemStore, SubscriptionId};
