//! Error types for the appliance state engine

use appliance_api::ApiError;
use thiserror::Error;

/// Result type for state engine operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors surfaced by appliance state operations
///
/// Capability gate failures (`Authorization`, `Offline`,
/// `RemoteControlDenied`) are raised synchronously, before any transport
/// call is attempted. `Clone` is required because coalesced writes fan one
/// transport result out to every waiting caller.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    /// The required authorization scope was not granted
    #[error("Missing authorization scope: {0}")]
    Authorization(String),

    /// The appliance is not currently connected
    #[error("Appliance is not connected")]
    Offline,

    /// Remote operation is not currently permitted on the appliance
    #[error("Remote control denied: {0}")]
    RemoteControlDenied(&'static str),

    /// The transport returned no data where data was required
    #[error("Empty response where data was required")]
    EmptyResponse,

    /// The event stream delivered an unrecognized event tag
    ///
    /// Never propagated to callers; logged by the stream consumer, which
    /// then continues with the next event.
    #[error("Unsupported stream event: {0}")]
    UnsupportedEvent(String),

    /// A coalesced write was abandoned before its transport call completed
    #[error("Operation interrupted before completion")]
    Interrupted,

    /// Classified transport failure
    #[error(transparent)]
    Transport(#[from] ApiError),
}
