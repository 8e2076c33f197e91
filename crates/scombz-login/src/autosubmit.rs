//! Delayed, cancellable submission of the saved credentials.
//!
//! The login form is submitted once, `delay` after the page is ready. A
//! success or failure signal from the page cancels the pending submit
//! through the shared [`CancellationToken`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use scombz_core::config::LoginConfig;
use scombz_core::types::LoginData;

/// Whatever actually fills in and submits the login form.
pub trait LoginSubmitter {
    fn submit(&mut self, login: &LoginData);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Cancelled,
}

pub struct AutoSubmit {
    delay: Duration,
    cancel: CancellationToken,
}

impl AutoSubmit {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &LoginConfig) -> Self {
        Self::new(Duration::from_millis(config.submit_delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Token to hand to whoever observes the login result.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the delay, then submit once unless cancelled first.
    pub async fn run<S: LoginSubmitter>(self, login: &LoginData, submitter: &mut S) -> SubmitOutcome {
        debug!(delay_ms = self.delay.as_millis() as u64, "auto submit armed");
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!("auto submit cancelled");
                SubmitOutcome::Cancelled
            }
            _ = tokio::time::sleep(self.delay) => {
                submitter.submit(login);
                info!(username = %login.username, "credentials submitted");
                SubmitOutcome::Submitted
            }
        }
    }
}
