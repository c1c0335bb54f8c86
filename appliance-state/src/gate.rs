//! Capability gate
//!
//! Every operation that queries or mutates appliance state passes the gate
//! before touching the transport, in a fixed order: authorization scope,
//! then connectivity, and for mutations also the appliance's local/remote
//! control flags. Gate failures are synchronous — no transport call is
//! attempted.

use appliance_api::keys::key;
use appliance_api::Scope;
use item_store::ItemStore;

use crate::error::{Result, StateError};

/// Permission checks for one appliance
pub(crate) struct CapabilityGate {
    appliance_type: String,
}

impl CapabilityGate {
    pub(crate) fn new(appliance_type: impl Into<String>) -> Self {
        Self {
            appliance_type: appliance_type.into(),
        }
    }

    /// Check scope authorization: the appliance-class-specific scope first,
    /// falling back to the generic grant
    fn authorized<F>(&self, has_scope: &F, scope: Scope) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        if has_scope(&scope.for_appliance_type(&self.appliance_type))
            || has_scope(scope.as_str())
        {
            Ok(())
        } else {
            Err(StateError::Authorization(scope.as_str().to_string()))
        }
    }

    /// Gate for querying operations: scope, then connectivity
    pub(crate) fn check_query<F>(&self, has_scope: &F, store: &ItemStore, scope: Scope) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        self.authorized(has_scope, scope)?;
        if store.get(key::CONNECTED).and_then(|value| value.as_bool()) != Some(true) {
            return Err(StateError::Offline);
        }
        Ok(())
    }

    /// Gate for mutating operations: query gate plus local/remote control
    ///
    /// Flags the appliance has never reported are treated as permissive;
    /// only an explicit contrary report denies the operation.
    pub(crate) fn check_mutate<F>(
        &self,
        has_scope: &F,
        store: &ItemStore,
        scope: Scope,
    ) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        self.check_query(has_scope, store, scope)?;
        if flag(store, key::LOCAL_CONTROL_ACTIVE) == Some(true) {
            return Err(StateError::RemoteControlDenied("local control is active"));
        }
        if flag(store, key::REMOTE_CONTROL_ACTIVE) == Some(false) {
            return Err(StateError::RemoteControlDenied("remote control is disabled"));
        }
        Ok(())
    }

    /// Gate for starting a program: mutation gate plus remote start
    pub(crate) fn check_start<F>(
        &self,
        has_scope: &F,
        store: &ItemStore,
        scope: Scope,
    ) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        self.check_mutate(has_scope, store, scope)?;
        if flag(store, key::REMOTE_START_ALLOWED) == Some(false) {
            return Err(StateError::RemoteControlDenied("remote start is not allowed"));
        }
        Ok(())
    }
}

fn flag(store: &ItemStore, item_key: &str) -> Option<bool> {
    store.get(item_key).and_then(|value| value.as_bool())
}
