//! The per-message dispatch pipeline and its session-scoped state.
//!
//! Every inbound frame runs decode → relevance → classify → correlate →
//! format, strictly in arrival order. The pipeline returns a `Result`; the
//! public entry point converts any fault into one diagnostic line so a
//! single malformed message never stops the stream.

use serde::Deserialize;
use tracing::trace;

use crate::classify::{classify, MessageKind};
use crate::correlate::{Requests, Sequences};
use crate::error::WatchError;
use crate::filter::is_relevant;
use crate::format::{format_message, format_reply};
use crate::payload::Payload;

/// One inbound bus message, as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    pub subject: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl Frame {
    fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref().filter(|r| !r.is_empty())
    }
}

/// One line of output, before timestamping and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A relevant message on its own subject.
    Message {
        subject: String,
        seq: u64,
        detail: String,
        kind: MessageKind,
    },
    /// A reply, nested under the request it answers and reusing its
    /// sequence number.
    Reply {
        subject: String,
        seq: u64,
        detail: String,
    },
    /// A message the pipeline could not deal with.
    Diagnostic { text: String },
}

/// All mutable state of one watch session. Sessions are independent;
/// nothing here is ambient or process-global.
#[derive(Debug)]
pub struct WatchSession {
    guid: String,
    sequences: Sequences,
    requests: Requests,
}

impl WatchSession {
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            sequences: Sequences::default(),
            requests: Requests::default(),
        }
    }

    /// Process one frame, isolating failures: a pipeline fault becomes a
    /// single diagnostic line and the session stays usable.
    pub fn handle(&mut self, frame: &Frame) -> Vec<Line> {
        match self.process(frame) {
            Ok(lines) => lines,
            Err(e) => vec![Line::Diagnostic {
                text: format!(
                    "couldn't deal w/ {} '{}': {}: {}",
                    frame.subject,
                    frame.body,
                    e.kind(),
                    e
                ),
            }],
        }
    }

    fn process(&mut self, frame: &Frame) -> Result<Vec<Line>, WatchError> {
        let pending = self.requests.lookup(&frame.subject).cloned();

        let payload = match Payload::decode(&frame.body) {
            Ok(payload) => payload,
            Err(e) => {
                // A body we can't decode only earns a diagnostic when the
                // message would have been displayed at all.
                if frame.subject.contains(&self.guid) || pending.is_some() {
                    return Err(e);
                }
                trace!(subject = %frame.subject, "dropping undecodable irrelevant message");
                return Ok(Vec::new());
            }
        };

        // A subject matching a registered reply channel is the continuation
        // of an already-relevant exchange: always shown, rendered against
        // the original request's kind.
        if let Some(pending) = pending {
            let request = classify(&pending.subject);
            let detail = format_reply(request.kind, &payload, &frame.body)?;
            return Ok(vec![Line::Reply {
                subject: pending.subject,
                seq: pending.seq,
                detail,
            }]);
        }

        let mut lines = Vec::new();

        if is_relevant(&frame.subject, &payload, &self.guid) {
            let classified = classify(&frame.subject);
            let seq = self.sequences.next(&classified.display_subject);
            let reply_expected = frame.reply_to().is_some();
            if let Some(detail) =
                format_message(&classified, &payload, &frame.body, &self.guid, reply_expected)?
            {
                lines.push(Line::Message {
                    subject: classified.display_subject.clone(),
                    seq,
                    detail,
                    kind: classified.kind,
                });
            }
            if let Some(reply_to) = frame.reply_to() {
                self.requests
                    .register(reply_to, &classified.display_subject, seq);
            }
        } else if let Some(reply_to) = frame.reply_to() {
            // Not worth displaying, but a later reply on this channel may
            // still be: register the exchange anyway.
            let classified = classify(&frame.subject);
            self.requests.register(
                reply_to,
                &classified.display_subject,
                self.sequences.current(&classified.display_subject),
            );
        }

        Ok(lines)
    }
}
