use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, warn};

use super::identity::IdentityProvider;
use super::{Session, SessionSnapshot};

type Listener = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

#[derive(Default)]
struct ObserverState {
    snapshot: SessionSnapshot,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Holds the latest session snapshot and fans changes out to subscribers.
///
/// Listeners run synchronously on the publishing thread, in subscription order,
/// after the internal lock has been released so they may subscribe or
/// unsubscribe re-entrantly.
#[derive(Clone, Default)]
pub struct SessionObserver {
    state: Arc<Mutex<ObserverState>>,
}

impl SessionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SessionSnapshot {
        lock(&self.state).snapshot.clone()
    }

    /// Register a listener for future changes. The current snapshot is not replayed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));

        Subscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Record a change reported by the identity provider and notify listeners.
    ///
    /// Notification happens after the lock is released, so publishes racing
    /// from several threads may reach listeners in a different order than
    /// they reached `current()`. Callers publish from one task.
    pub fn publish(&self, session: Option<Session>) {
        let snapshot = SessionSnapshot::from_session(session);
        let listeners: Vec<Listener> = {
            let mut state = lock(&self.state);
            state.snapshot = snapshot.clone();
            state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        debug!(
            authenticated = snapshot.user_id().is_some(),
            listeners = listeners.len(),
            "session snapshot changed"
        );

        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Resolve the first snapshot from an access token.
    ///
    /// Provider failures resolve to `Anonymous`, matching a session fetch that
    /// returned no user.
    pub async fn hydrate<I>(&self, identity: &I, access_token: Option<&str>)
    where
        I: IdentityProvider + ?Sized,
    {
        let session = match access_token {
            None => None,
            Some(token) => match identity.session_for_token(token).await {
                Ok(session) => session.map(|session| session.with_access_token(token)),
                Err(error) => {
                    warn!(%error, "identity provider unavailable; treating session as anonymous");
                    None
                }
            },
        };

        self.publish(session);
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }
}

/// Handle returned by [`SessionObserver::subscribe`].
///
/// Dropping the handle unsubscribes. `unsubscribe` may be called any number of times.
#[must_use = "dropping a subscription stops its notifications"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<ObserverState>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state)
                .listeners
                .retain(|(listener_id, _)| *listener_id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn lock(state: &Mutex<ObserverState>) -> MutexGuard<'_, ObserverState> {
    state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
