//! Watch selectors, events, and subscriptions
//!
//! A watch subscription is a live, push-based feed of change events for
//! objects matching a selector. Subscriptions hold a cancellation guard
//! so that dropping one deterministically tears down its producer; the
//! engine relies on this to release both streams on every exit path.

use std::fmt;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use tokio_util::sync::DropGuard;

use crate::client::ClientError;
use crate::pod::PodState;
use crate::run::RunState;

/// Change event delivered on a watch subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A run object changed
    Run(RunState),
    /// A pod placement object changed
    Pod(PodState),
}

impl WatchEvent {
    /// Object kind carried by this event, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Run(_) => "run",
            Self::Pod(_) => "pod",
        }
    }
}

/// Selector scoping a watch subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSelector {
    /// Exact match on a run name
    RunName(String),
    /// Label match on pods owned by the given run
    PodOwner(String),
}

impl fmt::Display for WatchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunName(name) => write!(f, "run={name}"),
            Self::PodOwner(run) => write!(f, "{}", crate::labels::owned_by_selector(run)),
        }
    }
}

/// Stream of watch events; the stream ending means the control plane
/// dropped the subscription
pub type EventStream = Pin<Box<dyn Stream<Item = Result<WatchEvent, ClientError>> + Send>>;

/// A live watch subscription
///
/// Owns the event stream plus a drop guard for the producer-side
/// cancellation token. Dropping the subscription (or calling
/// [`release`](Self::release)) cancels the producer.
pub struct WatchSubscription {
    events: EventStream,
    _guard: DropGuard,
}

impl WatchSubscription {
    /// Wrap an event stream with its producer-side cancellation guard
    pub fn new(events: EventStream, guard: DropGuard) -> Self {
        Self {
            events,
            _guard: guard,
        }
    }

    /// Wait for the next event; `None` means the subscription ended
    pub async fn next_event(&mut self) -> Option<Result<WatchEvent, ClientError>> {
        self.events.next().await
    }

    /// Release the subscription, cancelling its producer
    pub fn release(self) {}
}

impl fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSubscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::wrappers::ReceiverStream;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_selector_display() {
        assert_eq!(
            WatchSelector::RunName("run-1".to_string()).to_string(),
            "run=run-1"
        );
        assert_eq!(
            WatchSelector::PodOwner("run-1".to_string()).to_string(),
            "podtrace/owned-by-run=run-1"
        );
    }

    #[tokio::test]
    async fn test_release_cancels_producer_token() {
        let token = CancellationToken::new();
        let (_tx, rx) = tokio::sync::mpsc::channel::<Result<WatchEvent, ClientError>>(4);
        let sub = WatchSubscription::new(Box::pin(ReceiverStream::new(rx)), token.clone().drop_guard());

        assert!(!token.is_cancelled());
        sub.release();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_next_event_returns_none_after_sender_drop() {
        let token = CancellationToken::new();
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let mut sub =
            WatchSubscription::new(Box::pin(ReceiverStream::new(rx)), token.drop_guard());

        tx.send(Ok(WatchEvent::Run(RunState::new("run-1", "default"))))
            .await
            .unwrap();
        drop(tx);

        assert!(matches!(
            sub.next_event().await,
            Some(Ok(WatchEvent::Run(_)))
        ));
        assert!(sub.next_event().await.is_none());
    }
}
