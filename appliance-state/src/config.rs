//! Engine configuration

use std::time::Duration;

/// Configuration for one appliance's state engine
///
/// Defaults are tuned for the cloud appliance API's observed behavior:
/// event streams flap briefly on token refresh (hence the disconnect grace
/// and connect debounce), and bulk reads occasionally fail transiently
/// (hence the bounded exponential retry).
///
/// # Example
///
/// ```rust
/// use appliance_state::EngineConfig;
///
/// let config = EngineConfig::for_appliance_type("Oven")
///     .with_program_polling(true);
/// assert_eq!(config.appliance_type, "Oven");
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Appliance class (e.g. "Oven"), used for class-specific scope names
    pub appliance_type: String,

    /// Whether resynchronization also reads selected/active programs
    pub poll_programs: bool,

    /// How long after a non-error stream stop before assuming disconnected
    pub disconnect_grace: Duration,

    /// Debounce window before re-evaluating connectivity on connect signals
    pub connect_debounce: Duration,

    /// Initial retry delay for failed resynchronization actions
    pub retry_min: Duration,

    /// Retry delay cap
    pub retry_max: Duration,

    /// Multiplier applied to the retry delay on each consecutive failure
    pub retry_factor: u32,

    /// Suppression window for inferred power corrections after a genuine
    /// power-setting update
    pub blackout: Duration,
}

impl EngineConfig {
    /// Create a configuration for the given appliance class
    pub fn for_appliance_type(appliance_type: impl Into<String>) -> Self {
        Self {
            appliance_type: appliance_type.into(),
            ..Self::default()
        }
    }

    /// Enable or disable program polling during resynchronization
    pub fn with_program_polling(mut self, poll_programs: bool) -> Self {
        self.poll_programs = poll_programs;
        self
    }

    /// Override the retry delay bounds
    pub fn with_retry_delays(mut self, min: Duration, max: Duration) -> Self {
        self.retry_min = min;
        self.retry_max = max;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            appliance_type: "Generic".to_string(),
            poll_programs: false,
            disconnect_grace: Duration::from_secs(3),
            connect_debounce: Duration::from_millis(500),
            retry_min: Duration::from_secs(5),
            retry_max: Duration::from_secs(300),
            retry_factor: 2,
            blackout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.poll_programs);
        assert!(config.retry_min < config.retry_max);
        assert_eq!(config.retry_factor, 2);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::for_appliance_type("Washer")
            .with_program_polling(true)
            .with_retry_delays(Duration::from_secs(1), Duration::from_secs(8));
        assert_eq!(config.appliance_type, "Washer");
        assert!(config.poll_programs);
        assert_eq!(config.retry_min, Duration::from_secs(1));
    }
}
