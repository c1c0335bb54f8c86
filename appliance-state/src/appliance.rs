//! The `Appliance` engine object
//!
//! One `Appliance` per registered home appliance: it owns the item cache,
//! consumes the event stream, keeps connectivity synchronized, and exposes
//! the gated query/mutation operations that the accessory-binding layer
//! calls. `stop()` ceases all autonomous activity deterministically.

use std::sync::Arc;

use appliance_api::keys::key;
use appliance_api::{ApplianceClient, Command, ErrorCode, Item, Program, Scope};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::coalesce::WriteCoalescer;
use crate::config::EngineConfig;
use crate::engine;
use crate::error::{Result, StateError};
use crate::gate::CapabilityGate;
use crate::resync::benign_program_read;
use crate::shared::Shared;
use item_store::SubscriptionId;

/// State synchronization engine and operation surface for one appliance
///
/// # Example
///
/// ```rust,ignore
/// use appliance_state::{Appliance, EngineConfig};
///
/// let config = EngineConfig::for_appliance_type("Oven").with_program_polling(true);
/// let oven = Appliance::new(client, "BOSCH-HCS01OVN1-43E0065FE245", config).await?;
///
/// // Observe power changes
/// oven.subscribe("BSH.Common.Setting.PowerState", |item| {
///     println!("power is now {}", item.value);
/// });
///
/// // Gated mutation
/// oven.set_setting("BSH.Common.Setting.PowerState", "On".into()).await?;
///
/// // Teardown when the appliance is unregistered
/// oven.stop();
/// ```
pub struct Appliance {
    shared: Arc<Shared>,
    gate: CapabilityGate,
    writes: WriteCoalescer,
    engine: Mutex<Option<JoinHandle<()>>>,
}

impl Appliance {
    /// Create the engine for one appliance and start synchronizing
    ///
    /// Subscribes to the appliance's event stream and kicks off an initial
    /// connectivity evaluation (and hence an initial bulk state read).
    pub async fn new(
        client: Arc<dyn ApplianceClient>,
        haid: impl Into<String>,
        config: EngineConfig,
    ) -> Result<Self> {
        let haid = haid.into();
        let events = client.events(&haid).await?;
        let gate = CapabilityGate::new(config.appliance_type.clone());
        let shared = Shared::new(haid, client, config);
        let engine = engine::spawn_engine(Arc::clone(&shared), events);
        shared.schedule_evaluation();

        Ok(Self {
            shared,
            gate,
            writes: WriteCoalescer::new(),
            engine: Mutex::new(Some(engine)),
        })
    }

    /// Home appliance identifier
    pub fn haid(&self) -> &str {
        &self.shared.haid
    }

    /// Last cached value for an item key
    pub fn item(&self, item_key: &str) -> Option<Value> {
        self.shared.store.get(item_key)
    }

    /// Tri-state connectivity: `None` until the first determination
    pub fn connected(&self) -> Option<bool> {
        self.shared.published_connected()
    }

    /// Register a callback for an item key
    pub fn subscribe<F>(&self, item_key: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: Fn(&Item) + Send + Sync + 'static,
    {
        self.shared.store.subscribe(item_key, callback)
    }

    /// Remove a previously registered callback
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.store.unsubscribe(id)
    }

    /// Cease all autonomous activity
    ///
    /// Stops consuming the event stream, cancels every pending timer, and
    /// detaches all item subscribers. Idempotent; also invoked on drop.
    pub fn stop(&self) {
        self.shared.shut_down();
        if let Some(handle) = self.engine.lock().take() {
            handle.abort();
        }
        self.shared.store.clear_subscribers();
        tracing::debug!("{}: engine stopped", self.shared.haid);
    }

    // ========================================================================
    // Gated query operations
    // ========================================================================

    /// Read all status items from the appliance, refreshing the cache
    pub async fn status(&self) -> Result<Vec<Item>> {
        self.check_query(Scope::Monitor)?;
        let items = self.logged(self.shared.client.status(self.haid()).await)?;
        self.shared.apply_reported(&items);
        Ok(items)
    }

    /// Read all setting items from the appliance, refreshing the cache
    pub async fn settings(&self) -> Result<Vec<Item>> {
        self.check_query(Scope::Settings)?;
        let items = self.logged(self.shared.client.settings(self.haid()).await)?;
        self.shared.apply_reported(&items);
        Ok(items)
    }

    /// Read a single setting
    ///
    /// Returns `Ok(None)` if the appliance reports the setting as
    /// unsupported; a present setting with no value is an error.
    pub async fn setting(&self, setting_key: &str) -> Result<Option<Item>> {
        self.check_query(Scope::Settings)?;
        match self.shared.client.setting(self.haid(), setting_key).await {
            Ok(item) if item.value.is_null() => Err(StateError::EmptyResponse),
            Ok(item) => {
                self.shared.apply_reported(std::slice::from_ref(&item));
                Ok(Some(item))
            }
            Err(err) if err.code() == Some(ErrorCode::UnsupportedSetting) => Ok(None),
            Err(err) => self.logged(Err(err)),
        }
    }

    /// Read the currently selected program
    ///
    /// Returns `Ok(None)` when no program is selected or the appliance is
    /// in a state without program selection.
    pub async fn selected_program(&self) -> Result<Option<Program>> {
        self.check_query(Scope::Monitor)?;
        match self.shared.client.selected_program(self.haid()).await {
            Ok(program) => {
                self.shared.apply_program(key::SELECTED_PROGRAM, &program);
                Ok(Some(program))
            }
            Err(err) if benign_program_read(&err) => Ok(None),
            Err(err) => self.logged(Err(err)),
        }
    }

    /// Read the currently active program
    ///
    /// Returns `Ok(None)` when no program is active.
    pub async fn active_program(&self) -> Result<Option<Program>> {
        self.check_query(Scope::Monitor)?;
        match self.shared.client.active_program(self.haid()).await {
            Ok(program) => {
                self.shared.apply_program(key::ACTIVE_PROGRAM, &program);
                Ok(Some(program))
            }
            Err(err) if benign_program_read(&err) => Ok(None),
            Err(err) => self.logged(Err(err)),
        }
    }

    /// Read the commands supported by the appliance
    ///
    /// Appliances without command support yield an empty list.
    pub async fn commands(&self) -> Result<Vec<Command>> {
        self.check_query(Scope::Control)?;
        match self.shared.client.commands(self.haid()).await {
            Ok(commands) => Ok(commands),
            Err(err) if err.code() == Some(ErrorCode::UnsupportedOperation) => Ok(Vec::new()),
            Err(err) => self.logged(Err(err)),
        }
    }

    // ========================================================================
    // Gated mutating operations
    // ========================================================================

    /// Write a single setting
    ///
    /// Rapid repeat writes of the same setting are coalesced into one
    /// transport call carrying the most recent value.
    pub async fn set_setting(&self, setting_key: &str, value: Value) -> Result<()> {
        self.check_mutate(Scope::Settings)?;
        let identity = format!("setting:{setting_key}");
        self.writes
            .submit(&identity, value, |value| {
                let client = Arc::clone(&self.shared.client);
                let haid = self.shared.haid.clone();
                let setting_key = setting_key.to_string();
                async move {
                    client
                        .set_setting(&haid, &setting_key, value)
                        .await
                        .map_err(log_transport(&haid, "set_setting"))
                }
            })
            .await
    }

    /// Select a program without starting it
    pub async fn select_program(&self, program: &Program) -> Result<()> {
        self.check_mutate(Scope::Control)?;
        self.logged(
            self.shared
                .client
                .set_selected_program(self.haid(), program)
                .await,
        )
    }

    /// Start a program
    ///
    /// Additionally requires remote start to be allowed on the appliance.
    pub async fn start_program(&self, program: &Program) -> Result<()> {
        self.gate.check_start(
            &|name| self.shared.client.has_scope(name),
            &self.shared.store,
            Scope::Control,
        )?;
        self.logged(
            self.shared
                .client
                .set_active_program(self.haid(), program)
                .await,
        )
    }

    /// Stop the active program
    ///
    /// Stopping when nothing is running is a no-op, not an error.
    pub async fn stop_program(&self) -> Result<()> {
        self.check_mutate(Scope::Control)?;
        match self.shared.client.stop_active_program(self.haid()).await {
            Ok(()) => Ok(()),
            Err(err) if err.code() == Some(ErrorCode::WrongOperationState) => Ok(()),
            Err(err) => self.logged(Err(err)),
        }
    }

    /// Write one option of the active program
    ///
    /// Rapid repeat writes of the same option are coalesced into one
    /// transport call carrying the most recent value.
    pub async fn set_program_option(&self, option_key: &str, value: Value) -> Result<()> {
        self.check_mutate(Scope::Control)?;
        let identity = format!("option:{option_key}");
        self.writes
            .submit(&identity, value, |value| {
                let client = Arc::clone(&self.shared.client);
                let haid = self.shared.haid.clone();
                let option_key = option_key.to_string();
                async move {
                    client
                        .set_active_program_option(&haid, &option_key, value)
                        .await
                        .map_err(log_transport(&haid, "set_program_option"))
                }
            })
            .await
    }

    /// Issue a supported command
    pub async fn press_command(&self, command_key: &str) -> Result<()> {
        self.check_mutate(Scope::Control)?;
        self.logged(
            self.shared
                .client
                .set_command(self.haid(), command_key)
                .await,
        )
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn check_query(&self, scope: Scope) -> Result<()> {
        self.gate.check_query(
            &|name| self.shared.client.has_scope(name),
            &self.shared.store,
            scope,
        )
    }

    fn check_mutate(&self, scope: Scope) -> Result<()> {
        self.gate.check_mutate(
            &|name| self.shared.client.has_scope(name),
            &self.shared.store,
            scope,
        )
    }

    /// Log a transport failure, then re-surface it to the caller
    fn logged<T>(&self, result: appliance_api::Result<T>) -> Result<T> {
        result.map_err(log_transport(&self.shared.haid, "operation"))
    }
}

fn log_transport<'a>(
    haid: &'a str,
    operation: &'static str,
) -> impl FnOnce(appliance_api::ApiError) -> StateError + 'a {
    move |err| {
        tracing::warn!("{}: {} failed: {}", haid, operation, err);
        StateError::Transport(err)
    }
}

impl Drop for Appliance {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Appliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Appliance")
            .field("haid", &self.shared.haid)
            .field("connected", &self.connected())
            .finish()
    }
}
