//! Loosely-typed message payloads.
//!
//! Bus messages carry JSON bodies with no fixed schema; many are empty.
//! `Payload` wraps the decoded tree behind accessors that return `Option`
//! (or a `MissingField` error for the `require_*` variants) instead of
//! panicking on an unexpected shape, so formatters read fields without
//! defensive branching.

use serde_json::Value;

use crate::error::WatchError;

/// A decoded message body. Absent when the body was empty.
#[derive(Debug, Clone)]
pub struct Payload(Option<Value>);

impl Payload {
    /// The payload of a signal-only message (empty body).
    pub fn absent() -> Self {
        Self(None)
    }

    /// Decode a raw body. Empty bodies are valid and decode to the absent
    /// payload; anything else must parse as JSON.
    pub fn decode(raw: &str) -> Result<Self, WatchError> {
        if raw.trim().is_empty() {
            return Ok(Self(None));
        }
        let value = serde_json::from_str(raw)?;
        Ok(Self(Some(value)))
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.0.as_ref()?.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn u64_field(&self, name: &str) -> Option<u64> {
        self.get(name)?.as_u64()
    }

    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// String entries of a list field. `None` if the field is missing or not
    /// a list; non-string entries are skipped.
    pub fn str_list(&self, name: &str) -> Option<Vec<&str>> {
        let items = self.get(name)?.as_array()?;
        Some(items.iter().filter_map(|v| v.as_str()).collect())
    }

    /// Numeric entries of a list field, with the same shape rules as
    /// [`str_list`](Self::str_list).
    pub fn u64_list(&self, name: &str) -> Option<Vec<u64>> {
        let items = self.get(name)?.as_array()?;
        Some(items.iter().filter_map(|v| v.as_u64()).collect())
    }

    /// Entries of a nested list field (e.g. per-instance records inside a
    /// heartbeat). Empty when the field is missing or not a list.
    pub fn records<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + 'a {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter())
            .unwrap_or_default()
    }

    pub fn require_str(&self, name: &'static str) -> Result<&str, WatchError> {
        self.str_field(name).ok_or(WatchError::MissingField(name))
    }

    pub fn require_u64(&self, name: &'static str) -> Result<u64, WatchError> {
        self.u64_field(name).ok_or(WatchError::MissingField(name))
    }

    pub fn require_f64(&self, name: &'static str) -> Result<f64, WatchError> {
        self.f64_field(name).ok_or(WatchError::MissingField(name))
    }

    pub fn require_str_list(&self, name: &'static str) -> Result<Vec<&str>, WatchError> {
        self.str_list(name).ok_or(WatchError::MissingField(name))
    }

    pub fn require_u64_list(&self, name: &'static str) -> Result<Vec<u64>, WatchError> {
        self.u64_list(name).ok_or(WatchError::MissingField(name))
    }
}

/// String field of a nested record. `Value::get` already tolerates
/// non-object records.
pub fn record_str<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record.get(name)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_absent() {
        assert!(Payload::decode("").unwrap().is_absent());
        assert!(Payload::decode("  \n").unwrap().is_absent());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = Payload::decode("foo-bar-baz").unwrap_err();
        assert_eq!(err.kind(), "JsonError");
    }

    #[test]
    fn scalar_accessors() {
        let payload =
            Payload::decode(r#"{"reason":"STOPPED","index":0,"state_timestamp":1369262704.33}"#)
                .unwrap();
        assert_eq!(payload.str_field("reason"), Some("STOPPED"));
        assert_eq!(payload.u64_field("index"), Some(0));
        assert_eq!(payload.f64_field("state_timestamp"), Some(1369262704.33));
        assert_eq!(payload.str_field("missing"), None);
    }

    #[test]
    fn accessors_tolerate_wrong_shapes() {
        let payload = Payload::decode(r#"{"uris":"not-a-list","index":"zero"}"#).unwrap();
        assert_eq!(payload.str_list("uris"), None);
        assert_eq!(payload.u64_field("index"), None);
        assert_eq!(payload.str_field("uris"), Some("not-a-list"));
    }

    #[test]
    fn accessors_tolerate_non_object_payloads() {
        let payload = Payload::decode("[1, 2, 3]").unwrap();
        assert_eq!(payload.str_field("anything"), None);
        assert_eq!(payload.records("droplets").count(), 0);
    }

    #[test]
    fn list_accessors() {
        let payload = Payload::decode(r#"{"uris":["a.com","b.com"],"indices":[1,2]}"#).unwrap();
        assert_eq!(payload.str_list("uris"), Some(vec!["a.com", "b.com"]));
        assert_eq!(payload.u64_list("indices"), Some(vec![1, 2]));
    }

    #[test]
    fn records_iterates_nested_entries() {
        let payload = Payload::decode(
            r#"{"droplets":[{"droplet":"g1","state":"RUNNING"},{"droplet":"g2"}]}"#,
        )
        .unwrap();
        let states: Vec<_> = payload
            .records("droplets")
            .filter_map(|r| record_str(r, "droplet"))
            .collect();
        assert_eq!(states, vec!["g1", "g2"]);
    }

    #[test]
    fn require_reports_the_missing_field() {
        let payload = Payload::absent();
        let err = payload.require_str("reason").unwrap_err();
        assert!(err.to_string().contains("reason"));
    }
}
