//! Events emitted by ledger operations for subscribers.

use ingot_types::{AccountId, Amount};
use std::fmt;

/// Token-level events that observers can subscribe to via the [`EventBus`].
///
/// The null account is the sentinel for supply movements: a mint is a
/// `Transfer` from [`AccountId::NULL`], a burn is a `Transfer` to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenEvent {
    /// Value moved between accounts (or in/out of existence for mint/burn).
    Transfer {
        from: AccountId,
        to: AccountId,
        value: Amount,
    },
    /// An allowance was set. `value` is always the new absolute allowance,
    /// never a delta.
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: Amount,
    },
}

/// Synchronous fan-out event bus for token events.
///
/// Listeners are invoked inline on the mutating call; keep handlers fast to
/// avoid stalling ledger operations. Events are emitted only after the
/// operation's state changes have committed, so listeners never observe a
/// partial or failed operation.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&TokenEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TokenEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &TokenEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
