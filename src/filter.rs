//! Relevance filtering.
//!
//! A message concerns the watched app when its subject mentions the GUID, or
//! when a GUID-bearing payload field matches: the top-level `droplet`/`app`
//! identifier, or the `droplet` of any per-instance record in a heartbeat
//! style `droplets` list. Replies to registered requests are independently
//! relevant; the dispatch loop enforces that before calling in here.

use crate::payload::{record_str, Payload};

/// Does this message concern the watched GUID?
pub fn is_relevant(subject: &str, payload: &Payload, guid: &str) -> bool {
    if subject.contains(guid) {
        return true;
    }
    if payload.str_field("droplet") == Some(guid) || payload.str_field("app") == Some(guid) {
        return true;
    }
    payload
        .records("droplets")
        .any(|record| record_str(record, "droplet") == Some(guid))
}
