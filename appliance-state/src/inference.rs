//! Power-state inference
//!
//! Some appliances never report a power-setting change when switched at the
//! physical unit, but their operation phase gives it away: an appliance
//! cannot be "Run" while off. This module cross-checks each reported
//! operation phase against the stored power setting and publishes a
//! synthetic corrected power item when they disagree.
//!
//! A genuine power-setting update opens a short blackout window during
//! which corrections are computed but suppressed, so inference never fights
//! a setting change that is still propagating through the appliance.

use appliance_api::keys::{key, operation_state, power_state};
use item_store::Item;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::shared::Shared;

/// Power state implied by an operation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImpliedPower {
    On,
    Off,
}

/// Map an operation phase to the power state it implies, if any
///
/// Phases without a defined mapping (paused, finished, error, ...) yield no
/// inference.
pub(crate) fn implied_power(phase: &str) -> Option<ImpliedPower> {
    match phase {
        operation_state::INACTIVE => Some(ImpliedPower::Off),
        operation_state::READY | operation_state::RUN => Some(ImpliedPower::On),
        _ => None,
    }
}

/// Blackout window state
pub(crate) struct Inference {
    blackout_until: Option<Instant>,
}

impl Inference {
    pub(crate) fn new() -> Self {
        Self {
            blackout_until: None,
        }
    }

    /// Arm the blackout window for `window` from now
    pub(crate) fn arm_blackout(&mut self, window: std::time::Duration) {
        self.blackout_until = Some(Instant::now() + window);
    }

    /// Whether the blackout window is currently armed
    pub(crate) fn blackout_active(&self) -> bool {
        self.blackout_until
            .is_some_and(|until| Instant::now() < until)
    }
}

impl Shared {
    /// Apply a batch of transport-reported items and run inference hooks
    ///
    /// The batch is written and notified atomically first. Genuine
    /// power-setting updates in the batch arm the blackout window before
    /// any operation-phase item in the same batch is evaluated, so a power
    /// change delivered together with its phase never triggers a
    /// correction.
    pub(crate) fn apply_reported(&self, batch: &[Item]) {
        self.store.apply(batch);

        for item in batch {
            if item.key == key::POWER_STATE {
                self.inference.lock().arm_blackout(self.config.blackout);
            }
        }
        for item in batch {
            if item.key == key::OPERATION_STATE {
                if let Some(phase) = item.value.as_str() {
                    self.infer_power(phase);
                }
            }
        }
    }

    /// Cross-check one operation phase against the stored power setting
    ///
    /// Publishes a synthetic power item on contradiction: implied-on over a
    /// stored off/standby becomes `On`; implied-off over a stored on
    /// becomes `Standby` (never `Off` — some appliances cannot be fully
    /// powered off remotely).
    fn infer_power(&self, phase: &str) {
        let Some(implied) = implied_power(phase) else {
            return;
        };

        let stored = self.store.get(key::POWER_STATE);
        let corrected = match (implied, stored.as_ref().and_then(Value::as_str)) {
            (ImpliedPower::On, Some(power_state::OFF | power_state::STANDBY)) => power_state::ON,
            (ImpliedPower::Off, Some(power_state::ON)) => power_state::STANDBY,
            _ => return,
        };

        if self.inference.lock().blackout_active() {
            tracing::debug!(
                "{}: power correction to {} suppressed during blackout",
                self.haid,
                corrected
            );
            return;
        }

        tracing::debug!(
            "{}: phase {} contradicts stored power, publishing {}",
            self.haid,
            phase,
            corrected
        );
        // Synthetic publish: goes straight to the store so it does not arm
        // the blackout window itself.
        self.store.apply(&[Item::new(key::POWER_STATE, json!(corrected))]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        assert_eq!(implied_power(operation_state::INACTIVE), Some(ImpliedPower::Off));
        assert_eq!(implied_power(operation_state::READY), Some(ImpliedPower::On));
        assert_eq!(implied_power(operation_state::RUN), Some(ImpliedPower::On));
        assert_eq!(implied_power(operation_state::PAUSE), None);
        assert_eq!(implied_power(operation_state::FINISHED), None);
        assert_eq!(implied_power("not a phase"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blackout_window_expires() {
        let mut inference = Inference::new();
        assert!(!inference.blackout_active());

        inference.arm_blackout(std::time::Duration::from_secs(10));
        assert!(inference.blackout_active());

        tokio::time::advance(std::time::Duration::from_secs(11)).await;
        assert!(!inference.blackout_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_extends_blackout() {
        let mut inference = Inference::new();
        inference.arm_blackout(std::time::Duration::from_secs(10));

        tokio::time::advance(std::time::Duration::from_secs(8)).await;
        inference.arm_blackout(std::time::Duration::from_secs(10));

        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        assert!(inference.blackout_active());
    }
}
