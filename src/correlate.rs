//! Session-scoped bookkeeping: per-subject sequence numbers and the
//! reply-subject correlation map.
//!
//! Both structures are owned by the watch session and mutated only by the
//! dispatch loop, so concurrent sessions (and tests) never share state.

use std::collections::HashMap;

/// Per-subject occurrence counters. Sequence numbers are 1-based and
/// strictly increasing, independently per display subject.
#[derive(Debug, Default)]
pub struct Sequences {
    counts: HashMap<String, u64>,
}

impl Sequences {
    /// Advance and return the counter for a display subject.
    pub fn next(&mut self, subject: &str) -> u64 {
        let count = self.counts.entry(subject.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Current counter without advancing. Zero if the subject was never
    /// displayed.
    pub fn current(&self, subject: &str) -> u64 {
        self.counts.get(subject).copied().unwrap_or(0)
    }
}

/// A request awaiting replies on an ephemeral reply subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    /// Display subject of the original request.
    pub subject: String,
    /// Sequence number the request was displayed with.
    pub seq: u64,
}

/// Reply-subject → originating request. Reply subjects are taken verbatim
/// from inbound messages, never constructed. Entries are never expired or
/// consumed: several replies may fan in on one subject.
#[derive(Debug, Default)]
pub struct Requests {
    pending: HashMap<String, Pending>,
}

impl Requests {
    pub fn register(&mut self, reply_to: &str, subject: &str, seq: u64) {
        self.pending.insert(
            reply_to.to_string(),
            Pending {
                subject: subject.to_string(),
                seq,
            },
        );
    }

    pub fn lookup(&self, subject: &str) -> Option<&Pending> {
        self.pending.get(subject)
    }
}
