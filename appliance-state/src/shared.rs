//! Shared engine state
//!
//! One `Shared` per appliance, exclusively owned by that appliance's engine:
//! the item cache, the connectivity link state with its resynchronization
//! bookkeeping, the power-inference blackout window, and the cancellation
//! handles for every timer task the engine arms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use appliance_api::ApplianceClient;
use item_store::ItemStore;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::inference::Inference;

/// Internal connectivity link state (tri-state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// Nothing contradicts a connection yet (initial, and after stream
    /// restarts)
    Unknown,
    /// Known connected
    Up,
    /// Known disconnected
    Down,
}

/// Link state plus resynchronization bookkeeping
///
/// `generation` is bumped on every disconnect; a resynchronization sequence
/// that observes a stale generation abandons silently, which discards the
/// result of any in-flight transport call without force-aborting it.
pub(crate) struct LinkState {
    pub(crate) link: Link,
    pub(crate) generation: u64,
    pub(crate) resync_inflight: bool,
}

impl LinkState {
    fn new() -> Self {
        Self {
            link: Link::Unknown,
            generation: 0,
            resync_inflight: false,
        }
    }
}

/// Cancellation handles for the engine's deferred work
///
/// Each slot holds the latest scheduled task for that purpose; arming a
/// timer aborts its predecessor, so only the most recent scheduling wins.
#[derive(Default)]
pub(crate) struct Tasks {
    /// Grace timer after a stream stop, fires "assume disconnected"
    pub(crate) disconnect: Option<JoinHandle<()>>,
    /// Debounced connectivity re-evaluation
    pub(crate) evaluate: Option<JoinHandle<()>>,
    /// Current resynchronization sequence
    pub(crate) resync: Option<JoinHandle<()>>,
}

/// State shared between the engine task, timer tasks, and the appliance
/// handle
pub(crate) struct Shared {
    pub(crate) haid: String,
    pub(crate) client: Arc<dyn ApplianceClient>,
    pub(crate) config: EngineConfig,
    pub(crate) store: ItemStore,
    pub(crate) link: Mutex<LinkState>,
    pub(crate) tasks: Mutex<Tasks>,
    pub(crate) inference: Mutex<Inference>,
    stopped: AtomicBool,
}

impl Shared {
    pub(crate) fn new(
        haid: String,
        client: Arc<dyn ApplianceClient>,
        config: EngineConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            haid,
            client,
            config,
            store: ItemStore::new(),
            link: Mutex::new(LinkState::new()),
            tasks: Mutex::new(Tasks::default()),
            inference: Mutex::new(Inference::new()),
            stopped: AtomicBool::new(false),
        })
    }

    /// Whether teardown has been requested
    pub(crate) fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Request teardown and cancel all pending timer tasks
    pub(crate) fn shut_down(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let mut tasks = self.tasks.lock();
        for handle in [
            tasks.disconnect.take(),
            tasks.evaluate.take(),
            tasks.resync.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }

    /// Whether a resynchronization started at `generation` is stale
    ///
    /// True once a disconnect has invalidated the sequence or teardown has
    /// been requested.
    pub(crate) fn resync_stale(&self, generation: u64) -> bool {
        self.stopped() || self.link.lock().generation != generation
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let link = self.link.lock();
        f.debug_struct("Shared")
            .field("haid", &self.haid)
            .field("link", &link.link)
            .field("resync_inflight", &link.resync_inflight)
            .finish()
    }
}
