//! Device state synchronization engine for cloud-connected home appliances
//!
//! This crate is the core of the SDK: it ingests an unreliable,
//! reconnect-prone server-sent event stream, reconciles it against an
//! in-memory item cache, infers unreported state (power) from correlated
//! signals, and drives a bounded, backoff-governed recovery procedure when
//! connectivity is interrupted or reading state fails.
//!
//! # Architecture
//!
//! ```text
//! ApplianceClient (transport)
//!     │ events
//!     ▼
//! engine (stream consumer)
//!     ├── connectivity (tri-state link, debounce, grace timers)
//!     │       └── resync (ordered bulk re-read, exponential retry)
//!     ├── inference (power correction with blackout window)
//!     └── ItemStore (batch-atomic cache, per-key subscribers)
//!
//! Appliance (operation surface)
//!     ├── gate (scope / connectivity / remote-control checks)
//!     └── coalesce (single-slot pending writes)
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use appliance_state::{Appliance, EngineConfig};
//!
//! let config = EngineConfig::for_appliance_type("Washer").with_program_polling(true);
//! let washer = Appliance::new(client, haid, config).await?;
//!
//! washer.subscribe("BSH.Common.Status.OperationState", |item| {
//!     println!("phase: {}", item.value);
//! });
//! ```

// Modules
pub mod appliance;
pub mod config;
pub mod error;

mod coalesce;
mod connectivity;
mod engine;
mod gate;
mod inference;
mod resync;
mod shared;

// Re-exports - Public API
pub use appliance::Appliance;
pub use config::EngineConfig;
pub use error::{Result, StateError};
pub use item_store::{Item, ItemStore, SubscriptionId};
