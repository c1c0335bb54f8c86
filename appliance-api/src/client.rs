//! The `ApplianceClient` trait: what the engine requires from the transport
//!
//! The HTTP/auth plumbing (token refresh, request signing, SSE reconnect)
//! lives behind this trait. The state engine only needs an ordered event
//! sequence plus read/write calls that may fail with a classified error.

use async_trait::async_trait;
use item_store::Item;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::StreamEvent;
use crate::types::{ApplianceInfo, Command, Program};

/// Asynchronous client for the cloud appliance API
///
/// One client serves all appliances on an account; every call takes the
/// home appliance identifier (`haid`). Implementations must deliver events
/// in arrival order and keep the underlying SSE channel alive themselves,
/// emitting `Start`/`Stop` framing around each (re)connection attempt.
#[async_trait]
pub trait ApplianceClient: Send + Sync {
    /// Subscribe to the appliance's server-sent event stream
    ///
    /// The returned channel is effectively infinite; it only closes when the
    /// client itself is shut down.
    async fn events(&self, haid: &str) -> Result<mpsc::Receiver<StreamEvent>>;

    /// Read the appliance descriptor (authoritative connectivity)
    async fn appliance(&self, haid: &str) -> Result<ApplianceInfo>;

    /// Read all status items
    async fn status(&self, haid: &str) -> Result<Vec<Item>>;

    /// Read all setting items
    async fn settings(&self, haid: &str) -> Result<Vec<Item>>;

    /// Read a single setting item
    async fn setting(&self, haid: &str, key: &str) -> Result<Item>;

    /// Write a single setting
    async fn set_setting(&self, haid: &str, key: &str, value: Value) -> Result<()>;

    /// Read the currently selected program
    async fn selected_program(&self, haid: &str) -> Result<Program>;

    /// Read the currently active program
    async fn active_program(&self, haid: &str) -> Result<Program>;

    /// Select a program without starting it
    async fn set_selected_program(&self, haid: &str, program: &Program) -> Result<()>;

    /// Start a program
    async fn set_active_program(&self, haid: &str, program: &Program) -> Result<()>;

    /// Stop the active program
    async fn stop_active_program(&self, haid: &str) -> Result<()>;

    /// Write a single option of the active program
    async fn set_active_program_option(&self, haid: &str, key: &str, value: Value)
        -> Result<()>;

    /// Read the commands supported by the appliance
    async fn commands(&self, haid: &str) -> Result<Vec<Command>>;

    /// Issue a command
    async fn set_command(&self, haid: &str, key: &str) -> Result<()>;

    /// Whether the given authorization scope was granted
    fn has_scope(&self, scope: &str) -> bool;
}
