//! Cross-component refresh signaling.
//!
//! When a control (pagination, filter sidebar, price form) is about to
//! trigger a navigation, it emits exactly one refresh signal before
//! changing query state. Display surfaces that depend on the resulting
//! fetch (the product grid, the result-count label) each hold a
//! [`LoadingGate`]: any received signal puts the gate into a loading state,
//! which clears when the surface's data identity changes, or after a safety
//! timeout when it never does (a failed fetch, or a response identical to
//! the previous page).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// What kind of navigation is starting. Carries no payload; subscribers
/// react to all kinds alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    /// A page change is starting.
    Pagination,
    /// A category/brand filter change is starting.
    Filter,
    /// A price-range submit is starting.
    PriceFilter,
}

impl RefreshKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshKind::Pagination => "pagination-start",
            RefreshKind::Filter => "filter-start",
            RefreshKind::PriceFilter => "price-filter-start",
        }
    }
}

/// Process-wide broadcast bus for refresh signals.
///
/// Fire-and-forget: emitting with no live subscribers is not an error, and
/// subscribers must tolerate signals for navigations they did not initiate.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<RefreshKind>,
}

impl SignalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Broadcast a signal to all current subscribers.
    pub fn emit(&self, kind: RefreshKind) {
        // An Err here only means nobody is listening right now.
        let _ = self.tx.send(kind);
    }

    /// Subscribe a new gate with the default 3-second safety timeout.
    pub fn gate(&self) -> LoadingGate {
        self.gate_with_timeout(LoadingGate::DEFAULT_TIMEOUT)
    }

    /// Subscribe a new gate with an explicit safety timeout.
    pub fn gate_with_timeout(&self, timeout: Duration) -> LoadingGate {
        LoadingGate {
            rx: self.tx.subscribe(),
            timeout,
            deadline: None,
            identity: None,
        }
    }

    /// Number of live subscribers; used by tests to show gates detach on
    /// drop.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A display surface's loading state, driven by the bus.
///
/// The subscription ends when the gate is dropped, so repeated
/// mount/unmount cycles cannot leak timers or listeners.
#[derive(Debug)]
pub struct LoadingGate {
    rx: broadcast::Receiver<RefreshKind>,
    timeout: Duration,
    deadline: Option<Instant>,
    identity: Option<u64>,
}

impl LoadingGate {
    /// Safety timeout guarding against a fetch that never lands.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// Whether the surface should render as loading.
    ///
    /// Drains pending signals, arming (or re-arming) the safety timer for
    /// each, then reports whether the timer is still live.
    pub fn is_loading(&mut self) -> bool {
        self.drain();
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                // Abnormal clear: the data never arrived (or arrived
                // identical to the previous page).
                self.deadline = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Report the identity of the data currently displayed.
    ///
    /// The normal clear path: when the set of displayed record ids differs
    /// from the previous one, the pending fetch has landed and the gate
    /// opens.
    pub fn observe<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Hash,
    {
        let mut hasher = DefaultHasher::new();
        for id in ids {
            id.hash(&mut hasher);
        }
        let identity = hasher.finish();

        if self.identity != Some(identity) {
            if self.identity.is_some() {
                self.deadline = None;
            }
            self.identity = Some(identity);
        }
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(_) => {
                    self.deadline = Some(Instant::now() + self.timeout);
                }
                // Falling behind just means several navigations were
                // signalled; the latest deadline is the one that matters.
                Err(TryRecvError::Lagged(_)) => {
                    self.deadline = Some(Instant::now() + self.timeout);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}
