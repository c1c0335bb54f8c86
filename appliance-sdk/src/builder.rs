//! Appliance construction

use std::sync::Arc;
use std::time::Duration;

use appliance_api::ApplianceClient;
use appliance_state::{Appliance, EngineConfig, Result};

use crate::profiles;

/// Builder for an [`Appliance`] engine
///
/// Seeds the engine configuration from the appliance class profile (program
/// polling is enabled automatically for classes that run programs), with
/// every timing knob overridable for tests and unusual deployments.
///
/// # Example
///
/// ```rust,ignore
/// use appliance_sdk::ApplianceBuilder;
///
/// let washer = ApplianceBuilder::new(client, "BOSCH-WAV28E42-68A40E123456", "Washer")
///     .build()
///     .await?;
/// ```
pub struct ApplianceBuilder {
    client: Arc<dyn ApplianceClient>,
    haid: String,
    config: EngineConfig,
}

impl ApplianceBuilder {
    /// Start building an engine for one appliance
    pub fn new(
        client: Arc<dyn ApplianceClient>,
        haid: impl Into<String>,
        appliance_type: impl Into<String>,
    ) -> Self {
        let appliance_type = appliance_type.into();
        let config = EngineConfig::for_appliance_type(appliance_type.clone())
            .with_program_polling(profiles::supports_programs(&appliance_type));
        Self {
            client,
            haid: haid.into(),
            config,
        }
    }

    /// Override the profile's program polling decision
    pub fn program_polling(mut self, poll: bool) -> Self {
        self.config.poll_programs = poll;
        self
    }

    /// Override the retry delay bounds for failed resynchronization actions
    pub fn retry_delays(mut self, min: Duration, max: Duration) -> Self {
        self.config = self.config.with_retry_delays(min, max);
        self
    }

    /// Override the grace period after an orderly stream stop
    pub fn disconnect_grace(mut self, grace: Duration) -> Self {
        self.config.disconnect_grace = grace;
        self
    }

    /// Override the connect debounce window
    pub fn connect_debounce(mut self, debounce: Duration) -> Self {
        self.config.connect_debounce = debounce;
        self
    }

    /// Start the engine
    pub async fn build(self) -> Result<Appliance> {
        tracing::info!(
            "{}: starting {} engine",
            self.haid,
            self.config.appliance_type
        );
        Appliance::new(self.client, self.haid, self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_seeds_program_polling() {
        // Builder internals only; no transport involved
        let config = EngineConfig::for_appliance_type("Washer")
            .with_program_polling(profiles::supports_programs("Washer"));
        assert!(config.poll_programs);

        let config = EngineConfig::for_appliance_type("FridgeFreezer")
            .with_program_polling(profiles::supports_programs("FridgeFreezer"));
        assert!(!config.poll_programs);
    }
}
