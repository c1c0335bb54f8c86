//! Event stream consumer
//!
//! Consumes the transport's server-sent event channel for one appliance and
//! drives the item cache and connectivity state machine. Each event is
//! fully processed (cache updated, observers notified) before the next is
//! considered, so notification order matches arrival order.
//!
//! The transport owns the underlying stream and its reconnection; this
//! consumer only reacts to the `Start`/`Stop` framing around it.

use std::sync::Arc;

use appliance_api::StreamEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::StateError;
use crate::shared::Shared;

/// Spawn the engine task for one appliance's event stream
pub(crate) fn spawn_engine(
    shared: Arc<Shared>,
    events: mpsc::Receiver<StreamEvent>,
) -> JoinHandle<()> {
    tokio::spawn(run(shared, events))
}

async fn run(shared: Arc<Shared>, mut events: mpsc::Receiver<StreamEvent>) {
    while let Some(event) = events.recv().await {
        if shared.stopped() {
            break;
        }
        handle_event(&shared, event);
    }
    tracing::debug!("{}: event channel closed", shared.haid);
}

/// Classify one stream event and apply its side effects synchronously
fn handle_event(shared: &Arc<Shared>, event: StreamEvent) {
    match event {
        StreamEvent::Start => {
            tracing::debug!("{}: event stream started", shared.haid);
            shared.cancel_disconnect_timer();
            shared.reopen_link();
            shared.schedule_evaluation();
        }
        StreamEvent::Stop { error } => {
            tracing::debug!("{}: event stream stopped (error={})", shared.haid, error);
            shared.arm_disconnect_timer(error);
        }
        StreamEvent::Paired => {
            tracing::debug!("{}: appliance paired", shared.haid);
            shared.reopen_link();
            shared.schedule_evaluation();
        }
        StreamEvent::Depaired => {
            tracing::debug!("{}: appliance depaired", shared.haid);
            shared.mark_disconnected();
        }
        StreamEvent::Connected => {
            tracing::debug!("{}: appliance connected", shared.haid);
            shared.link_up();
            shared.schedule_evaluation();
        }
        StreamEvent::Disconnected => {
            tracing::debug!("{}: appliance disconnected", shared.haid);
            shared.mark_disconnected();
        }
        StreamEvent::Status { items }
        | StreamEvent::Event { items }
        | StreamEvent::Notify { items } => {
            shared.apply_reported(&items);
        }
        StreamEvent::Unknown { tag } => {
            // Non-fatal: log and keep consuming the stream.
            let err = StateError::UnsupportedEvent(tag);
            tracing::warn!("{}: {}", shared.haid, err);
        }
    }
}
