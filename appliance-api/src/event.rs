//! Stream event model
//!
//! Events delivered by the server-sent event channel for one appliance.
//! The transport owns the underlying SSE connection and its reconnection;
//! consumers only see `Start`/`Stop` framing around the retried stream plus
//! the appliance-level events in between.

use item_store::Item;
use serde::{Deserialize, Serialize};

/// One event from an appliance's server-sent event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum StreamEvent {
    /// The transport (re)established the event channel
    Start,
    /// The event channel ended; `error` is true if it ended with a
    /// transport failure rather than an orderly close
    Stop { error: bool },
    /// The appliance was re-added to the account
    Paired,
    /// The appliance was removed from the account
    Depaired,
    /// The appliance reported itself connected
    Connected,
    /// The appliance reported itself disconnected
    Disconnected,
    /// Status items changed
    Status { items: Vec<Item> },
    /// Event items were reported (programs, notifications about progress)
    Event { items: Vec<Item> },
    /// Setting/option items changed
    Notify { items: Vec<Item> },
    /// An event tag this library does not recognize
    Unknown { tag: String },
}

impl StreamEvent {
    /// The items carried by a data-bearing event, if any
    pub fn items(&self) -> Option<&[Item]> {
        match self {
            Self::Status { items } | Self::Event { items } | Self::Notify { items } => {
                Some(items)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_accessor() {
        let event = StreamEvent::Notify {
            items: vec![Item::new("k", json!(1))],
        };
        assert_eq!(event.items().map(<[Item]>::len), Some(1));
        assert!(StreamEvent::Start.items().is_none());
    }

    #[test]
    fn test_serde_tagging() {
        let encoded = serde_json::to_string(&StreamEvent::Stop { error: true }).unwrap();
        assert!(encoded.contains("Stop"));
        let decoded: StreamEvent = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, StreamEvent::Stop { error: true });
    }
}
