//! Field sanitizer: drops fields that carry no information.
//!
//! A field is dropped when its value is `null`, an empty array, or one of
//! the caller's zero values (empty string, the listing site's `....`
//! placeholder, ...). Records themselves are never dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use vtdex_shared::{Result, VtdexError};

/// Placeholder the listing site shows for unknown profile values.
pub const UNKNOWN_SENTINEL: &str = "....";

/// Set of values that mean "absent" for a given stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroValues(Vec<Value>);

impl ZeroValues {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }

    /// Empty string and [`UNKNOWN_SENTINEL`], used for detail records.
    pub fn detail_defaults() -> Self {
        Self::new([Value::from(""), Value::from(UNKNOWN_SENTINEL)])
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }
}

/// Return a copy of `record` without null, empty-array, or zero-valued fields.
pub fn sanitize(record: &Map<String, Value>, zero_values: &ZeroValues) -> Map<String, Value> {
    record
        .iter()
        .filter(|(_, value)| !is_removable(value, zero_values))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_removable(value: &Value, zero_values: &ZeroValues) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) if items.is_empty() => true,
        other => zero_values.contains(other),
    }
}

/// Sanitize any serde record by round-tripping it through a JSON object.
///
/// The record type must tolerate the removed fields coming back absent
/// (`#[serde(default)]` or `Option`).
pub fn sanitize_record<T>(record: &T, zero_values: &ZeroValues) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let value = serde_json::to_value(record)
        .map_err(|e| VtdexError::parse(format!("record is not serializable: {e}")))?;

    let Value::Object(fields) = value else {
        return Err(VtdexError::parse("record does not serialize to a JSON object"));
    };

    serde_json::from_value(Value::Object(sanitize(&fields, zero_values)))
        .map_err(|e| VtdexError::parse(format!("sanitized record no longer deserializes: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vtdex_shared::{BasicRecord, DetailRecord};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn drops_empty_string_empty_list_and_absent_fields() {
        // An undefined field has no JSON form; it simply never appears.
        let record = object(json!({ "a": "", "b": "x", "c": [] }));
        let zero = ZeroValues::new([json!("")]);

        assert_eq!(sanitize(&record, &zero), object(json!({ "b": "x" })));
    }

    #[test]
    fn drops_null_and_placeholder_but_keeps_other_values() {
        let record = object(json!({
            "weight": "....",
            "height": null,
            "nicknames": ["Peko"],
            "status": "Active",
            "count": 0,
            "flag": false
        }));

        let cleaned = sanitize(&record, &ZeroValues::detail_defaults());
        assert_eq!(
            cleaned,
            object(json!({
                "nicknames": ["Peko"],
                "status": "Active",
                "count": 0,
                "flag": false
            }))
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        let record = object(json!({
            "a": "",
            "b": "....",
            "c": [],
            "d": [""],
            "e": { "nested": "" },
            "f": "kept"
        }));
        let zero = ZeroValues::detail_defaults();

        let once = sanitize(&record, &zero);
        assert_eq!(sanitize(&once, &zero), once);
        // Only top-level fields are inspected.
        assert!(once.contains_key("d"));
        assert!(once.contains_key("e"));
    }

    #[test]
    fn sanitize_record_clears_placeholder_fields() {
        let mut record = DetailRecord::from_basic(BasicRecord {
            name: "Marine".into(),
            url: "https://hololist.net/houshou-marine/".into(),
            image: "https://hololist.net/img/marine.jpg".into(),
            affiliation: String::new(),
        });
        record.height = Some("150 cm".into());
        record.weight = Some(UNKNOWN_SENTINEL.into());
        record.oshi_mark = Some(String::new());

        let cleaned = sanitize_record(&record, &ZeroValues::detail_defaults()).unwrap();
        assert_eq!(cleaned.height.as_deref(), Some("150 cm"));
        assert_eq!(cleaned.weight, None);
        assert_eq!(cleaned.oshi_mark, None);
        assert_eq!(cleaned.basic.affiliation, "");
        assert_eq!(cleaned.basic.url, record.basic.url);
    }

    #[test]
    fn sanitize_record_rejects_non_objects() {
        let list = vec!["a".to_string()];
        let err = sanitize_record(&list, &ZeroValues::detail_defaults()).unwrap_err();
        assert!(matches!(err, VtdexError::Parse { .. }));
    }
}
