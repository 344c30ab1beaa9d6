//! Per-message failure taxonomy.
//!
//! A fault while processing one message never terminates the stream: the
//! dispatch loop converts it into a single diagnostic line and moves on.

use thiserror::Error;

/// Faults that can surface while processing a single bus message.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The message body was non-empty but not valid JSON.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// A formatter needed a field the payload does not carry in a usable shape.
    #[error("payload has no usable `{0}` field")]
    MissingField(&'static str),
}

impl WatchError {
    /// Short class name used in diagnostic lines.
    pub fn kind(&self) -> &'static str {
        match self {
            WatchError::Decode(_) => "JsonError",
            WatchError::MissingField(_) => "MissingField",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_kind() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = WatchError::from(err);
        assert_eq!(err.kind(), "JsonError");
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = WatchError::MissingField("uris");
        assert_eq!(err.kind(), "MissingField");
        assert_eq!(err.to_string(), "payload has no usable `uris` field");
    }
}
