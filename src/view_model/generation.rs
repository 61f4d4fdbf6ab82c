//! Guard against out-of-order and post-detach responses.
//!
//! Every load takes a [`Ticket`] before it suspends. When its response
//! arrives, it is applied only if the view is still attached and the ticket
//! is newer than the last one applied. The "last applied" number lives next
//! to the state it protects, so the check and the write happen under one lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Generation number of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct LoadGuard {
    issued: AtomicU64,
    detached: AtomicBool,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next load. Tickets strictly increase.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stop applying responses. Irreversible.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Whether a response for `ticket` may replace state last written by
    /// generation `applied`.
    pub fn admits(&self, ticket: Ticket, applied: u64) -> bool {
        !self.is_detached() && ticket.0 > applied
    }
}
