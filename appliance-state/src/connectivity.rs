//! Connectivity state machine
//!
//! Tracks the tri-state link (`Unknown`/`Up`/`Down`), debounces rapid
//! flapping, publishes the `connected` sentinel item, and triggers bulk
//! resynchronization on (re)connect.
//!
//! Transition sources are the stream consumer's event classifications and
//! the descriptor reads performed during resynchronization, which report
//! authoritative connectivity as a side channel.

use std::sync::Arc;

use appliance_api::keys::key;
use item_store::Item;
use serde_json::json;

use crate::resync;
use crate::shared::{Link, Shared};

impl Shared {
    /// The currently published `connected` value, if any
    pub(crate) fn published_connected(&self) -> Option<bool> {
        self.store.get(key::CONNECTED).and_then(|value| value.as_bool())
    }

    /// Publish `connected` to observers, coalescing repeats
    ///
    /// Only the most recent transition value is applied; publishing the
    /// already-published value is a no-op so flapping collapses into a
    /// single observable change.
    pub(crate) fn publish_connected(&self, connected: bool) {
        if self.published_connected() == Some(connected) {
            return;
        }
        tracing::debug!("{}: publishing connected={}", self.haid, connected);
        self.store.apply(&[Item::new(key::CONNECTED, json!(connected))]);
    }

    /// Mark the appliance disconnected immediately
    ///
    /// Invalidates any in-flight resynchronization (its remaining queue is
    /// discarded, not paused) and publishes `connected=false` if observers
    /// have not already seen it.
    pub(crate) fn mark_disconnected(&self) {
        {
            let mut tasks = self.tasks.lock();
            if let Some(handle) = tasks.disconnect.take() {
                handle.abort();
            }
            if let Some(handle) = tasks.evaluate.take() {
                handle.abort();
            }
        }
        {
            let mut link = self.link.lock();
            link.link = Link::Down;
            link.generation = link.generation.wrapping_add(1);
            link.resync_inflight = false;
        }
        self.publish_connected(false);
    }

    /// Treat the link as unknown-but-hopeful (stream restart, re-pairing)
    pub(crate) fn reopen_link(&self) {
        let mut link = self.link.lock();
        if link.link == Link::Down {
            link.link = Link::Unknown;
        }
    }

    /// Record a definite connected report from the stream
    pub(crate) fn link_up(&self) {
        self.link.lock().link = Link::Up;
    }

    /// Apply the authoritative connectivity from a descriptor read
    pub(crate) fn descriptor_connectivity(&self, connected: bool) {
        if connected {
            self.link_up();
        } else {
            tracing::debug!("{}: descriptor reports disconnected", self.haid);
            self.mark_disconnected();
        }
    }

    /// Arm the "assume disconnected" grace timer after a stream stop
    ///
    /// Immediate if the stream ended with a transport error, otherwise after
    /// the configured grace period. A subsequent stream start cancels it.
    pub(crate) fn arm_disconnect_timer(self: &Arc<Self>, immediate: bool) {
        let shared = Arc::clone(self);
        let grace = if immediate {
            std::time::Duration::ZERO
        } else {
            self.config.disconnect_grace
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if shared.stopped() {
                return;
            }
            tracing::debug!("{}: no stream restart within grace period", shared.haid);
            shared.mark_disconnected();
        });
        let mut tasks = self.tasks.lock();
        if let Some(previous) = tasks.disconnect.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel a pending "assume disconnected" timer
    pub(crate) fn cancel_disconnect_timer(&self) {
        if let Some(handle) = self.tasks.lock().disconnect.take() {
            handle.abort();
        }
    }

    /// Schedule a debounced connectivity re-evaluation
    ///
    /// Only the latest scheduling wins: re-arming aborts the previous timer,
    /// so a burst of connect signals produces one evaluation.
    pub(crate) fn schedule_evaluation(self: &Arc<Self>) {
        let shared = Arc::clone(self);
        let debounce = self.config.connect_debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if shared.stopped() {
                return;
            }
            shared.evaluate_connectivity();
        });
        let mut tasks = self.tasks.lock();
        if let Some(previous) = tasks.evaluate.replace(handle) {
            previous.abort();
        }
    }

    /// Evaluate connectivity now
    ///
    /// If the link is down, publish `connected=false` (the pending resync
    /// queue, if any, is left to abandon itself). Otherwise start a
    /// resynchronization sequence, unless one is already queued or in
    /// flight — the in-flight one supersedes.
    pub(crate) fn evaluate_connectivity(self: &Arc<Self>) {
        let start = {
            let mut link = self.link.lock();
            match link.link {
                Link::Down => None,
                Link::Up | Link::Unknown => {
                    if link.resync_inflight {
                        tracing::debug!("{}: resynchronization already pending", self.haid);
                        None
                    } else {
                        link.resync_inflight = true;
                        Some(link.generation)
                    }
                }
            }
        };

        match start {
            None => {
                if self.link.lock().link == Link::Down {
                    self.publish_connected(false);
                }
            }
            Some(generation) => {
                let shared = Arc::clone(self);
                let handle = tokio::spawn(async move {
                    resync::run(shared, generation).await;
                });
                let mut tasks = self.tasks.lock();
                if let Some(previous) = tasks.resync.replace(handle) {
                    // A superseded sequence has already observed a stale
                    // generation or finished; dropping the handle is enough.
                    drop(previous);
                }
            }
        }
    }

    /// Conclude a successful resynchronization
    ///
    /// Resets the in-flight flag and, if the appliance is now known
    /// connected but observers have not seen `connected=true` yet,
    /// publishes it.
    pub(crate) fn finish_resync(&self, generation: u64) {
        let known_connected = {
            let mut link = self.link.lock();
            if self.stopped() || link.generation != generation {
                return;
            }
            link.resync_inflight = false;
            link.link == Link::Up
        };
        tracing::debug!("{}: resynchronization complete", self.haid);
        if known_connected {
            self.publish_connected(true);
        }
    }
}
