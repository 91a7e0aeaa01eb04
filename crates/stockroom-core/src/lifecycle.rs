// ── Fetch lifecycle ──
//
// Tracks the catalog list fetch: `Idle -> Pending -> Succeeded | Failed`.
// A fetch can only begin when none is pending, which is how duplicate
// concurrent loads are suppressed. State is published on a watch channel.

use tokio::sync::watch;
use tracing::debug;

/// Observable state of the list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed {
        message: String,
    },
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Failure message, cleared by a later success.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct FetchLifecycle {
    state: watch::Sender<LifecycleState>,
}

impl Default for FetchLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchLifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self { state }
    }

    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// `true` only before the first fetch has ever started.
    pub fn should_autoload(&self) -> bool {
        *self.state.borrow() == LifecycleState::Idle
    }

    /// Move to `Pending`. Returns `None` when a fetch is already pending.
    ///
    /// The returned ticket settles the fetch. Dropping it unsettled puts
    /// the previous state back.
    pub fn begin(&self) -> Option<FetchTicket<'_>> {
        let mut previous = None;
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                previous = Some(std::mem::replace(state, LifecycleState::Pending));
                true
            }
        });

        let Some(previous) = previous else {
            debug!("list fetch already pending, suppressed");
            return None;
        };
        debug!(from = ?previous, "lifecycle -> pending");
        Some(FetchTicket {
            lifecycle: self,
            previous: Some(previous),
        })
    }

    fn settle(&self, next: LifecycleState) {
        debug!(to = ?next, "lifecycle settled");
        self.state.send_replace(next);
    }
}

/// Proof that a fetch is in flight. Consumed by `succeed` or `fail`.
#[derive(Debug)]
#[must_use = "an unsettled ticket restores the previous state on drop"]
pub struct FetchTicket<'a> {
    lifecycle: &'a FetchLifecycle,
    previous: Option<LifecycleState>,
}

impl FetchTicket<'_> {
    pub fn succeed(mut self) {
        self.previous = None;
        self.lifecycle.settle(LifecycleState::Succeeded);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.previous = None;
        self.lifecycle.settle(LifecycleState::Failed {
            message: message.into(),
        });
    }
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            debug!(to = ?previous, "fetch abandoned, lifecycle restored");
            self.lifecycle.state.send_replace(previous);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_autoloads() {
        let lifecycle = FetchLifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
        assert!(lifecycle.should_autoload());
    }

    #[test]
    fn begin_while_pending_is_refused() {
        let lifecycle = FetchLifecycle::new();
        let ticket = lifecycle.begin().unwrap();
        assert!(lifecycle.begin().is_none());
        assert!(!lifecycle.should_autoload());
        ticket.succeed();
        assert_eq!(lifecycle.state(), LifecycleState::Succeeded);
    }

    #[test]
    fn failure_carries_message_and_success_clears_it() {
        let lifecycle = FetchLifecycle::new();
        lifecycle.begin().unwrap().fail("service down");
        assert_eq!(lifecycle.state().error(), Some("service down"));
        assert!(!lifecycle.should_autoload());

        lifecycle.begin().unwrap().succeed();
        assert_eq!(lifecycle.state().error(), None);
    }

    #[test]
    fn dropped_ticket_restores_previous_state() {
        let lifecycle = FetchLifecycle::new();
        lifecycle.begin().unwrap().succeed();
        drop(lifecycle.begin().unwrap());
        assert_eq!(lifecycle.state(), LifecycleState::Succeeded);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let lifecycle = FetchLifecycle::new();
        let mut rx = lifecycle.subscribe();
        let ticket = lifecycle.begin().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_pending());
        ticket.succeed();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), LifecycleState::Succeeded);
    }
}
