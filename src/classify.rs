//! Subject classification.
//!
//! Subjects are hierarchical dot-separated names. Classification is driven
//! by an ordered table of segment patterns rather than a branch per subject:
//! adding a kind means adding a row, not touching the matcher. The first
//! matching rule wins; anything unmatched is `Unknown` and keeps its raw
//! subject as display text.

/// Semantic category of a message, derived purely from its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    InstanceExited,
    Heartbeat,
    Advertise,
    RouteRegistered,
    RouteUnregistered,
    InstanceStart,
    DropletUpdated,
    InstanceStop,
    InstanceUpdate,
    DropletQuery,
    HealthQuery,
    Unknown,
}

/// One segment of a subject pattern.
#[derive(Debug, Clone, Copy)]
enum Seg {
    /// Must equal this text exactly.
    Lit(&'static str),
    /// Matches any single segment; the raw value is captured and surfaced
    /// to the formatter, with the display subject carrying its short form.
    Cap,
}

struct Rule {
    segments: &'static [Seg],
    kind: MessageKind,
}

use MessageKind::*;
use Seg::*;

/// Pattern table, matched in order.
static RULES: &[Rule] = &[
    Rule { segments: &[Lit("droplet"), Lit("exited")], kind: InstanceExited },
    Rule { segments: &[Lit("droplet"), Lit("updated")], kind: DropletUpdated },
    Rule { segments: &[Lit("dea"), Lit("heartbeat")], kind: Heartbeat },
    Rule { segments: &[Lit("dea"), Lit("advertise")], kind: Advertise },
    Rule { segments: &[Lit("dea"), Lit("stop")], kind: InstanceStop },
    Rule { segments: &[Lit("dea"), Lit("update")], kind: InstanceUpdate },
    Rule { segments: &[Lit("dea"), Lit("find"), Lit("droplet")], kind: DropletQuery },
    Rule { segments: &[Lit("router"), Lit("register")], kind: RouteRegistered },
    Rule { segments: &[Lit("router"), Lit("unregister")], kind: RouteUnregistered },
    Rule { segments: &[Lit("healthmanager"), Lit("status")], kind: HealthQuery },
    Rule { segments: &[Lit("dea"), Cap, Lit("start")], kind: InstanceStart },
];

/// Result of classifying one subject.
#[derive(Debug, Clone)]
pub struct Classified {
    pub kind: MessageKind,
    /// Subject as shown to the operator: captured segments are replaced by
    /// their short node id. Also the sequence-counter key.
    pub display_subject: String,
    /// Raw values of captured segments, in subject order.
    pub captures: Vec<String>,
}

impl Classified {
    pub fn capture(&self) -> Option<&str> {
        self.captures.first().map(String::as_str)
    }
}

/// Node identifiers look like `7-ab12cd…`; only the numeric prefix before
/// the first dash is interesting.
pub fn short_node_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Map a subject to its kind, display form, and captured segments.
pub fn classify(subject: &str) -> Classified {
    let parts: Vec<&str> = subject.split('.').collect();

    for rule in RULES {
        if rule.segments.len() != parts.len() {
            continue;
        }
        let matches = rule
            .segments
            .iter()
            .zip(&parts)
            .all(|(seg, part)| match seg {
                Lit(text) => text == part,
                Cap => true,
            });
        if !matches {
            continue;
        }

        let mut captures = Vec::new();
        let display: Vec<&str> = rule
            .segments
            .iter()
            .zip(&parts)
            .map(|(seg, part)| match seg {
                Lit(text) => *text,
                Cap => {
                    captures.push(part.to_string());
                    short_node_id(part)
                }
            })
            .collect();

        return Classified {
            kind: rule.kind,
            display_subject: display.join("."),
            captures,
        };
    }

    Classified {
        kind: Unknown,
        display_subject: subject.to_string(),
        captures: Vec::new(),
    }
}
