//! # Appliance SDK - state synchronization for cloud-connected appliances
//!
//! High-level entry point for monitoring and controlling home appliances
//! through their cloud API:
//!
//! ```rust,ignore
//! use appliance_sdk::{ApplianceBuilder, logging, LoggingMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     logging::init_logging(LoggingMode::Development)?;
//!
//!     let oven = ApplianceBuilder::new(client, "BOSCH-HCS01OVN1-43E0065FE245", "Oven")
//!         .build()
//!         .await?;
//!
//!     oven.subscribe("BSH.Common.Status.OperationState", |item| {
//!         println!("phase: {}", item.value);
//!     });
//!
//!     oven.set_setting("BSH.Common.Setting.PowerState", "On".into()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! appliance-sdk (builder, class profiles, logging)
//!     ↓
//! appliance-state (sync engine: connectivity, resync, inference, gating)
//!     ↓
//! appliance-api (transport contract: events + read/write endpoints)
//!     ↓
//! item-store (batch-atomic item cache with per-key subscribers)
//! ```

// Main exports
pub use builder::ApplianceBuilder;
pub use logging::{LoggingError, LoggingMode};
pub use profiles::supports_programs;

// Re-export the engine surface
pub use appliance_state::{Appliance, EngineConfig, Item, ItemStore, Result, StateError, SubscriptionId};

// Re-export the transport contract for implementors
pub use appliance_api::{ApiError, ApplianceClient, ApplianceInfo, Command, ErrorCode, Program, Scope, StreamEvent};

// Internal modules
mod builder;
pub mod logging;
mod profiles;
