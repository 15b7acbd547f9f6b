// ⏳ Loading Timer
// Cancellable deferred "loading finished" effect for selection changes

use std::time::{Duration, Instant};
use tracing::debug;

/// Delay shown after every selection change
pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(600);

/// Identifies one scheduled loading period; only the latest one may end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTicket(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: LoadingTicket,
    due: Instant,
}

/// Loading flag with a deferred clear.
///
/// Starting a new period supersedes the pending one, so a stale deadline
/// can never clear the flag for a newer selection.
#[derive(Debug, Clone)]
pub struct LoadingTimer {
    delay: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl LoadingTimer {
    pub fn new(delay: Duration) -> Self {
        LoadingTimer {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Set loading and schedule its end `delay` from `now`
    pub fn start(&mut self, now: Instant) -> LoadingTicket {
        self.generation += 1;
        let ticket = LoadingTicket(self.generation);

        if let Some(stale) = self.pending.replace(Pending {
            ticket,
            due: now + self.delay,
        }) {
            debug!("Loading {:?} superseded by {:?}", stale.ticket, ticket);
        }

        ticket
    }

    /// Deliver the deferred callback for `ticket`. Returns true if it ended
    /// the loading period; stale or early tickets are ignored.
    pub fn fire(&mut self, ticket: LoadingTicket, now: Instant) -> bool {
        match self.pending {
            Some(p) if p.ticket == ticket && now >= p.due => {
                self.pending = None;
                debug!("Loading {:?} finished", ticket);
                true
            }
            _ => false,
        }
    }

    /// Event-loop tick: ends the current period once its deadline passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) => self.fire(p.ticket, now),
            None => false,
        }
    }

    /// Time left before the current period ends
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Drop the pending period without waiting
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for LoadingTimer {
    fn default() -> Self {
        Self::new(DEFAULT_LOADING_DELAY)
    }
}

// ============================================================================
// TESTS
// ============================================================================
