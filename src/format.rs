//! Per-kind message formatters.
//!
//! Each formatter is a pure mapping from a decoded payload (plus captured
//! subject segments) to the detail text shown after the subject column.
//! `Ok(None)` suppresses the line entirely (advertise chatter); `Ok(Some(""))`
//! keeps a subject-only line, which for bookkeeping-only kinds is itself the
//! information. Bookkeeping fields like `cc_partition` are never rendered.

use chrono::{DateTime, Local};

use crate::classify::{short_node_id, Classified, MessageKind};
use crate::error::WatchError;
use crate::payload::{record_str, Payload};

/// Detail text for a top-level message line, or `None` for kinds suppressed
/// from the stream.
pub fn format_message(
    classified: &Classified,
    payload: &Payload,
    raw_body: &str,
    guid: &str,
    reply_expected: bool,
) -> Result<Option<String>, WatchError> {
    let detail = match classified.kind {
        MessageKind::Advertise => return Ok(None),

        MessageKind::InstanceExited => format!(
            "reason: {}, index: {}",
            payload.require_str("reason")?,
            payload.require_u64("index")?
        ),

        MessageKind::Heartbeat => heartbeat_summary(payload, guid)?,

        MessageKind::RouteRegistered | MessageKind::RouteUnregistered => route_summary(payload)?,

        MessageKind::InstanceStart => format!(
            "dea: {}, index: {}, uris: {}",
            classified.capture().map(short_node_id).unwrap_or(""),
            payload.require_u64("index")?,
            payload.require_str_list("uris")?.join(", ")
        ),

        // Nothing in the body is worth showing; the notification is the news.
        MessageKind::DropletUpdated => String::new(),

        MessageKind::InstanceStop => stop_summary(payload),

        MessageKind::InstanceUpdate => {
            format!("uris: {}", payload.require_str_list("uris")?.join(", "))
        }

        MessageKind::DropletQuery => {
            let states = lower_joined(&payload.require_str_list("states")?);
            if reply_expected {
                format!("querying states: {states}")
            } else {
                format!("states: {states}")
            }
        }

        MessageKind::HealthQuery => format!(
            "querying states: {}",
            payload.require_str("state")?.to_lowercase()
        ),

        MessageKind::Unknown => raw_body.to_string(),
    };
    Ok(Some(detail))
}

/// Detail text for a reply, keyed by the *request's* kind. Requests without
/// a dedicated reply shape fall back to the raw body.
pub fn format_reply(
    request_kind: MessageKind,
    payload: &Payload,
    raw_body: &str,
) -> Result<String, WatchError> {
    let detail = match request_kind {
        MessageKind::DropletQuery => format!(
            "dea: {}, index: {}, state: {}, since: {}",
            short_node_id(payload.require_str("dea")?),
            payload.require_u64("index")?,
            payload.require_str("state")?.to_lowercase(),
            calendar_time(payload.require_f64("state_timestamp")?)
        ),

        MessageKind::HealthQuery => {
            format!("indices: {}", joined_u64(&payload.require_u64_list("indices")?))
        }

        _ => raw_body.to_string(),
    };
    Ok(detail)
}

/// `dea: <node>, <state>: <count>, …` counting lower-cased states among the
/// watched app's records, in order of first appearance.
fn heartbeat_summary(payload: &Payload, guid: &str) -> Result<String, WatchError> {
    let node = short_node_id(payload.require_str("dea")?);
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in payload.records("droplets") {
        if record_str(record, "droplet") != Some(guid) {
            continue;
        }
        let Some(state) = record_str(record, "state") else {
            continue;
        };
        let state = state.to_lowercase();
        match counts.iter_mut().find(|(name, _)| *name == state) {
            Some((_, count)) => *count += 1,
            None => counts.push((state, 1)),
        }
    }

    let mut out = format!("dea: {node}");
    for (state, count) in counts {
        out.push_str(&format!(", {state}: {count}"));
    }
    Ok(out)
}

fn route_summary(payload: &Payload) -> Result<String, WatchError> {
    Ok(format!(
        "dea: {}, uris: {}, host: {}, port: {}",
        short_node_id(payload.require_str("dea")?),
        payload.require_str_list("uris")?.join(", "),
        payload.require_str("host")?,
        payload.require_u64("port")?
    ))
}

/// Three mutually exclusive stop shapes: explicit indices, explicit
/// instances, or the whole application.
fn stop_summary(payload: &Payload) -> String {
    if let Some(indices) = payload.u64_list("indices") {
        format!("scaling down indices: {}", joined_u64(&indices))
    } else if let Some(instances) = payload.str_list("instances") {
        format!("killing extra instances: {}", instances.join(", "))
    } else {
        "stopping application".to_string()
    }
}

fn lower_joined(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

fn joined_u64(items: &[u64]) -> String {
    items
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an epoch-seconds value as local calendar time, the same shape
/// regardless of locale.
fn calendar_time(epoch: f64) -> String {
    let secs = epoch.floor() as i64;
    let nanos = ((epoch - epoch.floor()) * 1e9) as u32;
    match DateTime::from_timestamp(secs, nanos) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        None => epoch.to_string(),
    }
}
