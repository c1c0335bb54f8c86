//! Resynchronization sequencer
//!
//! On (re)connect the engine performs an ordered bulk re-read of appliance
//! state: descriptor, status, settings, and — for appliance classes with
//! program support — selected then active program. Actions run strictly in
//! order, one at a time. A transient failure while still connected retries
//! the *entire remaining queue* (failed action stays at the head) after an
//! exponentially growing delay; a disconnect detected mid-sequence discards
//! the queue silently.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use appliance_api::keys::key;
use appliance_api::{ErrorCode, Program};
use item_store::Item;
use serde_json::json;

use crate::config::EngineConfig;
use crate::error::{Result, StateError};
use crate::shared::Shared;

/// One read operation of the resynchronization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResyncAction {
    Descriptor,
    Status,
    Settings,
    SelectedProgram,
    ActiveProgram,
}

/// Build the ordered action queue for one resynchronization
pub(crate) fn action_queue(poll_programs: bool) -> VecDeque<ResyncAction> {
    let mut queue = VecDeque::from([
        ResyncAction::Descriptor,
        ResyncAction::Status,
        ResyncAction::Settings,
    ]);
    if poll_programs {
        queue.push_back(ResyncAction::SelectedProgram);
        queue.push_back(ResyncAction::ActiveProgram);
    }
    queue
}

/// Exponential retry delay: `min, min*factor, min*factor², ...` capped at
/// `max`
///
/// One `Backoff` lives for one resynchronization run, so each fresh run
/// starts again at the minimum delay — the reset-on-success rule falls out
/// of the sequencer's lifecycle.
pub(crate) struct Backoff {
    next: Duration,
    max: Duration,
    factor: u32,
}

impl Backoff {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        Self {
            next: config.retry_min.min(config.retry_max),
            max: config.retry_max,
            factor: config.retry_factor.max(1),
        }
    }

    /// The delay to wait before the next retry, doubling for the one after
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (delay * self.factor).min(self.max);
        delay
    }
}

/// Run one resynchronization sequence
///
/// `generation` identifies the connect cycle that started this sequence; a
/// disconnect bumps the shared generation, after which the sequence
/// abandons without retrying and without publishing anything.
pub(crate) async fn run(shared: Arc<Shared>, generation: u64) {
    let mut backoff = Backoff::new(&shared.config);
    let mut queue = action_queue(shared.config.poll_programs);

    tracing::debug!("{}: resynchronizing ({} actions)", shared.haid, queue.len());

    while let Some(action) = queue.front().copied() {
        if shared.resync_stale(generation) {
            tracing::debug!("{}: resynchronization abandoned", shared.haid);
            return;
        }

        match execute(&shared, action).await {
            Ok(()) => {
                queue.pop_front();
            }
            Err(err) => {
                if shared.resync_stale(generation) {
                    tracing::debug!(
                        "{}: resynchronization abandoned after {:?} failed: {}",
                        shared.haid,
                        action,
                        err
                    );
                    return;
                }
                let delay = backoff.next_delay();
                tracing::warn!(
                    "{}: {:?} failed ({}), retrying remaining queue in {:?}",
                    shared.haid,
                    action,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    shared.finish_resync(generation);
}

/// Execute one action against the transport, updating the item cache
async fn execute(shared: &Arc<Shared>, action: ResyncAction) -> Result<()> {
    match action {
        ResyncAction::Descriptor => {
            let info = shared.client.appliance(&shared.haid).await?;
            shared.descriptor_connectivity(info.connected);
            Ok(())
        }
        ResyncAction::Status => {
            let items = shared.client.status(&shared.haid).await?;
            shared.apply_reported(&items);
            Ok(())
        }
        ResyncAction::Settings => {
            let items = shared.client.settings(&shared.haid).await?;
            shared.apply_reported(&items);
            Ok(())
        }
        ResyncAction::SelectedProgram => {
            match shared.client.selected_program(&shared.haid).await {
                Ok(program) => {
                    shared.apply_program(key::SELECTED_PROGRAM, &program);
                    Ok(())
                }
                Err(err) if benign_program_read(&err) => Ok(()),
                Err(err) => Err(StateError::Transport(err)),
            }
        }
        ResyncAction::ActiveProgram => match shared.client.active_program(&shared.haid).await {
            Ok(program) => {
                shared.apply_program(key::ACTIVE_PROGRAM, &program);
                Ok(())
            }
            Err(err) if benign_program_read(&err) => Ok(()),
            Err(err) => Err(StateError::Transport(err)),
        },
    }
}

/// "No such program" server responses are a valid state, not a failure
pub(crate) fn benign_program_read(err: &appliance_api::ApiError) -> bool {
    matches!(
        err.code(),
        Some(
            ErrorCode::NoProgramSelected
                | ErrorCode::NoProgramActive
                | ErrorCode::WrongOperationState
        )
    )
}

impl Shared {
    /// Apply a program read as one atomic batch: the program key together
    /// with all of its option items
    pub(crate) fn apply_program(&self, root_key: &str, program: &Program) {
        let mut batch = Vec::with_capacity(1 + program.options.len());
        batch.push(Item::new(root_key, json!(program.key)));
        batch.extend(program.options.iter().cloned());
        self.apply_reported(&batch);
    }
}
