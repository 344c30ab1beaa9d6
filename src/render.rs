//! Plain-text line rendering.
//!
//! Lines carry a 12-hour wall-clock prefix, the display subject padded into
//! a fixed column, the `(N)` occurrence marker, and the detail text after a
//! tab. Replies sit under their request with a continuation marker. Color
//! is applied by the binary's sink, not here.

use chrono::{DateTime, Local};

use crate::watch::Line;

/// Column width for the subject (and reply marker) before `(N)`.
const SUBJECT_WIDTH: usize = 25;

pub fn render(line: &Line, at: DateTime<Local>) -> String {
    let stamp = at.format("%r");
    match line {
        Line::Message {
            subject,
            seq,
            detail,
            ..
        } => format!("{stamp} {subject:<width$}({seq})\t{detail}", width = SUBJECT_WIDTH),
        Line::Reply {
            subject,
            seq,
            detail,
        } => {
            let marker = format!("`- reply to {subject}");
            format!("{stamp} {marker:<width$}({seq})\t{detail}", width = SUBJECT_WIDTH)
        }
        Line::Diagnostic { text } => format!("{stamp} {text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2013, 5, 22, 15, 45, 4).unwrap()
    }

    #[test]
    fn message_line_pads_the_subject_column() {
        let line = Line::Message {
            subject: "some.subject".to_string(),
            seq: 1,
            detail: "foo".to_string(),
            kind: crate::classify::MessageKind::Unknown,
        };
        let text = render(&line, at());
        assert!(
            text.contains("some.subject             (1)\tfoo"),
            "unexpected line: {text:?}"
        );
        assert!(text.starts_with(&at().format("%r").to_string()));
    }

    #[test]
    fn reply_line_is_nested_under_the_request() {
        let line = Line::Reply {
            subject: "some.subject".to_string(),
            seq: 1,
            detail: "some-response".to_string(),
        };
        let text = render(&line, at());
        assert!(
            text.contains("`- reply to some.subject (1)\tsome-response"),
            "unexpected line: {text:?}"
        );
    }

    #[test]
    fn diagnostic_line_is_timestamped_verbatim() {
        let line = Line::Diagnostic {
            text: "couldn't deal w/ x 'y': JsonError: nope".to_string(),
        };
        let text = render(&line, at());
        assert!(text.ends_with("couldn't deal w/ x 'y': JsonError: nope"));
    }

    #[test]
    fn twelve_hour_clock_prefix() {
        let text = render(
            &Line::Diagnostic {
                text: "x".to_string(),
            },
            at(),
        );
        assert!(text.starts_with("03:45:04 PM"), "unexpected prefix: {text:?}");
    }
}
