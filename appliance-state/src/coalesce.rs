//! Write coalescing
//!
//! Serialization discipline for user-triggered writes: rapid repeat calls
//! for the same logical action (e.g. two quick toggles of one setting) are
//! coalesced into a single transport call carrying the most recent value,
//! and every waiting caller receives that one call's result.
//!
//! Each operation identity owns at most one slot: the latest value plus the
//! list of result channels, drained by exactly one in-flight execution at a
//! time.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{Result, StateError};

struct Slot {
    value: Value,
    waiters: Vec<oneshot::Sender<Result<()>>>,
    draining: bool,
}

/// Per-operation-identity single-slot pending request queue
pub(crate) struct WriteCoalescer {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Releases a wedged slot if the draining caller's future is dropped
/// mid-execution (e.g. the caller wrapped the write in a timeout).
///
/// Without this, `draining` would stay set forever and every later write
/// for the identity would park a waiter nobody drains. On drop the slot is
/// removed and all waiters fail with [`StateError::Interrupted`]; the next
/// submission starts a fresh slot.
struct DrainGuard<'a> {
    coalescer: &'a WriteCoalescer,
    id: &'a str,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.coalescer.slots.lock();
        if let Some(slot) = slots.remove(self.id) {
            for waiter in slot.waiters {
                let _ = waiter.send(Err(StateError::Interrupted));
            }
        }
    }
}

impl WriteCoalescer {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Submit a write for the given operation identity
    ///
    /// If no execution is in flight for `id`, this caller becomes the
    /// drainer: it yields once (so same-tick submissions can still coalesce
    /// into the slot), then executes `exec` with the latest value, fanning
    /// the result out to every waiter. Values submitted while an execution
    /// is in flight are drained by a follow-up execution.
    ///
    /// Cancellation-safe: if the drainer's future is dropped mid-execution,
    /// the slot is released and waiting callers fail with
    /// [`StateError::Interrupted`] instead of hanging.
    pub(crate) async fn submit<F, Fut>(&self, id: &str, value: Value, exec: F) -> Result<()>
    where
        F: Fn(Value) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let (tx, rx) = oneshot::channel();
        let drainer = {
            let mut slots = self.slots.lock();
            let slot = slots.entry(id.to_string()).or_insert_with(|| Slot {
                value: Value::Null,
                waiters: Vec::new(),
                draining: false,
            });
            slot.value = value;
            slot.waiters.push(tx);
            if slot.draining {
                false
            } else {
                slot.draining = true;
                true
            }
        };

        if drainer {
            let mut guard = DrainGuard {
                coalescer: self,
                id,
                armed: true,
            };
            tokio::task::yield_now().await;
            loop {
                let (value, waiters) = {
                    let mut slots = self.slots.lock();
                    let Some(slot) = slots.get_mut(id) else {
                        break;
                    };
                    (slot.value.clone(), std::mem::take(&mut slot.waiters))
                };

                let result = exec(value).await;
                for waiter in waiters {
                    let _ = waiter.send(result.clone());
                }

                let done = {
                    let mut slots = self.slots.lock();
                    match slots.get_mut(id) {
                        Some(slot) if slot.waiters.is_empty() => {
                            slots.remove(id);
                            true
                        }
                        Some(_) => false,
                        None => true,
                    }
                };
                if done {
                    break;
                }
            }
            guard.armed = false;
        }

        rx.await.unwrap_or(Err(StateError::Interrupted))
    }
}
