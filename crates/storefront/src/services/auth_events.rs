//! Auth event channel.
//!
//! Sign-in/sign-out are published on a broadcast channel instead of being
//! observed through ad-hoc callbacks. A single listener task is spawned at
//! startup and shut down with the server; a liveness flag turns deliveries
//! that race with teardown into no-ops, so nothing writes state after the
//! listener is gone. The listener keeps the Sentry user context in sync.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use lojinha_core::{Email, UserId};

use crate::error::{clear_sentry_user, set_sentry_user};

/// Channel capacity; sign-in/out are rare, lag means something is wrong.
const CHANNEL_CAPACITY: usize = 32;

/// An authentication state change.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A user signed in (or re-established a session).
    SignedIn { user_id: UserId, email: Email },
    /// A user signed out.
    SignedOut { user_id: UserId },
}

/// Create the auth event sender.
///
/// Receivers subscribe via [`broadcast::Sender::subscribe`]; sending with no
/// live receiver is not an error worth surfacing.
#[must_use]
pub fn channel() -> broadcast::Sender<AuthEvent> {
    broadcast::channel(CHANNEL_CAPACITY).0
}

/// Handle to the running listener task.
pub struct AuthEventListener {
    alive: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl AuthEventListener {
    /// Spawn the listener on the given subscription.
    #[must_use]
    pub fn spawn(mut rx: broadcast::Receiver<AuthEvent>) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let task_alive = Arc::clone(&alive);

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        // A delivery that raced with shutdown is dropped
                        if !task_alive.load(Ordering::SeqCst) {
                            break;
                        }
                        handle_event(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { alive, handle }
    }

    /// Whether the listener is still accepting events.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Stop the listener. Events already in the channel are discarded.
    pub fn shutdown(self) {
        self.alive.store(false, Ordering::SeqCst);
        self.handle.abort();
    }
}

fn handle_event(event: &AuthEvent) {
    match event {
        AuthEvent::SignedIn { user_id, email } => {
            tracing::info!(user_id = %user_id, "user signed in");
            set_sentry_user(user_id, Some(email.as_str()));
        }
        AuthEvent::SignedOut { user_id } => {
            tracing::info!(user_id = %user_id, "user signed out");
            clear_sentry_user();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signed_in() -> AuthEvent {
        AuthEvent::SignedIn {
            user_id: UserId::generate(),
            email: Email::parse("user@example.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_listener_consumes_events() {
        let tx = channel();
        let listener = AuthEventListener::spawn(tx.subscribe());

        tx.send(signed_in()).unwrap();
        tx.send(AuthEvent::SignedOut {
            user_id: UserId::generate(),
        })
        .unwrap();

        // Give the task a chance to drain the channel
        tokio::task::yield_now().await;

        assert!(listener.is_alive());
        listener.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_flips_liveness_before_abort() {
        let tx = channel();
        let listener = AuthEventListener::spawn(tx.subscribe());
        let alive = Arc::clone(&listener.alive);

        listener.shutdown();

        assert!(!alive.load(Ordering::SeqCst));
        // Late sends must not panic; there is simply nobody listening
        let _ = tx.send(signed_in());
    }

    #[tokio::test]
    async fn test_send_without_listener_is_harmless() {
        let tx = channel();
        assert!(tx.send(signed_in()).is_err());
    }
}
