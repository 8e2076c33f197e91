//! One-way messages to the extension host.
//!
//! Sends never wait for a reply and never fail the caller: a full or closed
//! channel is logged and the message dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Ask the host to open the settings page.
    OpenSettings,
}

/// Sending half of the host message channel.
#[derive(Debug, Clone)]
pub struct HostSender {
    tx: mpsc::Sender<HostMessage>,
}

impl HostSender {
    /// Create a bounded channel; the receiver is driven by the host side.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HostMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Fire-and-forget send.
    pub fn send(&self, message: HostMessage) {
        match self.tx.try_send(message) {
            Ok(()) => debug!("host message queued"),
            Err(e) => warn!("host message dropped: {e}"),
        }
    }

    pub fn open_settings(&self) {
        self.send(HostMessage::OpenSettings);
    }
}
