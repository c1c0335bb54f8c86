//! Transport contract and wire types for the cloud appliance API
//!
//! This crate defines what the state engine requires from the cloud
//! transport, without implementing any of it:
//!
//! - [`ApplianceClient`]: async trait covering the event stream and every
//!   read/write endpoint
//! - [`StreamEvent`]: the server-sent event model
//! - [`ApplianceInfo`], [`Program`], [`Command`], [`Scope`]: wire types
//! - [`ApiError`] / [`ErrorCode`]: classified transport failures
//! - [`keys`]: the well-known item key/value namespace the engine interprets
//!
//! The actual HTTP/SSE/auth plumbing (token refresh, reconnection) is a
//! separate concern implemented behind [`ApplianceClient`].

pub mod client;
pub mod error;
pub mod event;
pub mod keys;
pub mod types;

// Re-exports - Public API
pub use client::ApplianceClient;
pub use error::{ApiError, ErrorCode, Result};
pub use event::StreamEvent;
pub use item_store::Item;
pub use types::{ApplianceInfo, Command, Program, Scope};
