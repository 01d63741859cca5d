//! Record codec: normalized records to wire `name_value_list`s and back.
//!
//! Everything here is a pure function. Malformed input never fails; it
//! degrades to passthrough or is skipped.
//!
//! ## Multi-value tokens
//!
//! The CRM stores multi-select fields as one string where every item is
//! wrapped in `^` and items are joined by `,`:
//!
//! ```text
//! ["x", "y"]  <->  "^x^,^y^"
//! ```
//!
//! Decoding drops empty segments, so the encoding is lossy for empty
//! strings and for items that themselves contain `^`.

use serde_json::Value;

use crate::{FieldValue, NameValue, Record, RelationshipSpec};

/// Wraps each item in `^` and joins them with `,`.
///
/// ```rust
/// use sugarbridge_protocol::codec::encode_multi_value;
///
/// assert_eq!(encode_multi_value(&["a", "b"]), "^a^,^b^");
/// ```
pub fn encode_multi_value<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("^{}^", item.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a multi-value token back into its items.
///
/// A `raw` that does not both start and end with `^` is returned
/// unchanged as [`FieldValue::Text`]. Otherwise it is split on `^,^` and
/// on every remaining `^`, and zero-length segments are dropped.
///
/// ```rust
/// use sugarbridge_protocol::codec::decode_multi_value;
/// use sugarbridge_protocol::FieldValue;
///
/// assert_eq!(decode_multi_value("^x^,^y^"), FieldValue::from(vec!["x", "y"]));
/// assert_eq!(decode_multi_value("plain"), FieldValue::from("plain"));
/// assert_eq!(decode_multi_value("^^"), FieldValue::List(vec![]));
/// ```
pub fn decode_multi_value(raw: &str) -> FieldValue {
    if !(raw.starts_with('^') && raw.ends_with('^')) {
        return FieldValue::Text(raw.to_string());
    }
    let items = raw
        .replace("^,^", "^")
        .split('^')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    FieldValue::List(items)
}

/// Escapes `&` as `%26` so the value survives form encoding on the CRM
/// side.
fn escape_scalar(value: &str) -> String {
    value.replace('&', "%26")
}

/// Encodes one record as a wire `name_value_list`.
///
/// Lists become multi-value tokens; scalars pass through with `&`
/// escaped. Pairs come out in the record's key order.
pub fn encode_record(record: &Record) -> Vec<NameValue> {
    record
        .iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Text(s) => escape_scalar(s),
                FieldValue::List(items) => encode_multi_value(items.as_slice()),
            };
            NameValue::new(name.as_str(), value)
        })
        .collect()
}

/// Converts a loosely-typed JSON value into a [`Record`].
///
/// Returns `None` unless `value` is an object. Strings are kept, arrays
/// become lists (non-string items are stringified), `null` becomes `""`,
/// and numbers, booleans, and nested objects are stringified.
pub fn record_from_json(value: &Value) -> Option<Record> {
    let object = value.as_object()?;
    let record = object
        .iter()
        .map(|(name, value)| {
            let field = match value {
                Value::Array(items) => {
                    FieldValue::List(items.iter().map(scalar_to_string).collect())
                }
                other => FieldValue::Text(scalar_to_string(other)),
            };
            (name.clone(), field)
        })
        .collect();
    Some(record)
}

/// Stringifies a JSON value the way the CRM would store it.
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Encodes a batch of records, one `name_value_list` per record.
///
/// Entries that are not JSON objects are skipped, not reported.
pub fn encode_record_batch(records: &[Value]) -> Vec<Vec<NameValue>> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = record_from_json(value);
            if record.is_none() {
                tracing::debug!(index, "skipping non-record batch entry");
            }
            record
        })
        .map(|record| encode_record(&record))
        .collect()
}

/// Flattens a relationship spec into `link_name_to_fields_array` pairs.
///
/// Every field becomes its own pair, named after the module it belongs to.
/// Some PHP wrappers of this endpoint name each pair by the field's
/// position in its list (`"0"`, `"1"`, ...) instead; output from those
/// clients will not match this one pair for pair.
///
/// ```rust
/// use sugarbridge_protocol::codec::encode_relationship_spec;
/// use sugarbridge_protocol::{NameValue, RelationshipSpec};
///
/// let spec = RelationshipSpec::from([(
///     "contacts".to_string(),
///     vec!["id".to_string(), "first_name".to_string()],
/// )]);
///
/// assert_eq!(
///     encode_relationship_spec(&spec),
///     vec![
///         NameValue::new("contacts", "id"),
///         NameValue::new("contacts", "first_name"),
///     ],
/// );
/// ```
pub fn encode_relationship_spec(spec: &RelationshipSpec) -> Vec<NameValue> {
    spec.iter()
        .flat_map(|(module, fields)| {
            fields
                .iter()
                .map(move |field| NameValue::new(module.as_str(), field.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // -- multi-value tokens ----------------------------------------------

    #[test]
    fn test_encode_multi_value_single_item() {
        assert_eq!(encode_multi_value(&["only"]), "^only^");
    }

    #[test]
    fn test_encode_multi_value_empty_is_empty_string() {
        let empty: [&str; 0] = [];
        assert_eq!(encode_multi_value(&empty), "");
    }

    #[test]
    fn test_decode_multi_value_plain_passes_through() {
        assert_eq!(decode_multi_value("plain"), FieldValue::from("plain"));
    }

    #[test]
    fn test_decode_multi_value_only_leading_caret_passes_through() {
        assert_eq!(decode_multi_value("^half"), FieldValue::from("^half"));
    }

    #[test]
    fn test_decode_multi_value_empty_string_passes_through() {
        assert_eq!(decode_multi_value(""), FieldValue::from(""));
    }

    #[test]
    fn test_decode_multi_value_double_caret_is_empty_list() {
        assert_eq!(decode_multi_value("^^"), FieldValue::List(vec![]));
    }

    #[test]
    fn test_decode_multi_value_lone_caret_is_empty_list() {
        assert_eq!(decode_multi_value("^"), FieldValue::List(vec![]));
    }

    #[test]
    fn test_decode_multi_value_drops_empty_segments() {
        assert_eq!(
            decode_multi_value("^a^,^^,^b^"),
            FieldValue::from(vec!["a", "b"])
        );
    }

    #[test]
    fn test_decode_multi_value_keeps_commas_inside_items() {
        assert_eq!(
            decode_multi_value("^a,b^"),
            FieldValue::from(vec!["a,b"])
        );
    }

    #[test]
    fn test_multi_value_round_trip() {
        let items = ["a", "b", "long item"];
        assert_eq!(
            decode_multi_value(&encode_multi_value(&items)),
            FieldValue::from(items.to_vec())
        );
    }

    // -- encode_record ---------------------------------------------------

    #[test]
    fn test_encode_record_scalar_and_list() {
        let rec = record(&[
            ("first_name", "Ann".into()),
            ("tags", vec!["x", "y"].into()),
        ]);

        assert_eq!(
            encode_record(&rec),
            vec![
                NameValue::new("first_name", "Ann"),
                NameValue::new("tags", "^x^,^y^"),
            ]
        );
    }

    #[test]
    fn test_encode_record_escapes_ampersand_in_scalars() {
        let rec = record(&[("name", "Smith & Sons".into())]);
        assert_eq!(encode_record(&rec)[0].value, "Smith %26 Sons");
    }

    #[test]
    fn test_encode_record_leaves_list_items_unescaped() {
        let rec = record(&[("tags", vec!["a&b"].into())]);
        assert_eq!(encode_record(&rec)[0].value, "^a&b^");
    }

    #[test]
    fn test_encode_record_empty_record_is_empty_list() {
        assert!(encode_record(&Record::new()).is_empty());
    }

    // -- record_from_json / encode_record_batch ----------------------------

    #[test]
    fn test_record_from_json_stringifies_scalars() {
        let rec = record_from_json(&json!({
            "name": "Acme",
            "employees": 12,
            "active": true,
            "notes": null,
            "tags": ["a", 1],
        }))
        .expect("object should convert");

        assert_eq!(rec["name"], FieldValue::from("Acme"));
        assert_eq!(rec["employees"], FieldValue::from("12"));
        assert_eq!(rec["active"], FieldValue::from("true"));
        assert_eq!(rec["notes"], FieldValue::from(""));
        assert_eq!(rec["tags"], FieldValue::from(vec!["a", "1"]));
    }

    #[test]
    fn test_record_from_json_non_object_is_none() {
        assert!(record_from_json(&json!("text")).is_none());
        assert!(record_from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_encode_record_batch_skips_non_records() {
        let batch = vec![
            json!({"name": "first"}),
            json!("not a record"),
            json!(null),
            json!({"name": "second", "tags": ["t"]}),
        ];

        let encoded = encode_record_batch(&batch);

        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0], vec![NameValue::new("name", "first")]);
        assert_eq!(
            encoded[1],
            vec![
                NameValue::new("name", "second"),
                NameValue::new("tags", "^t^"),
            ]
        );
    }

    // -- encode_relationship_spec ----------------------------------------

    #[test]
    fn test_encode_relationship_spec_one_pair_per_field() {
        let spec = RelationshipSpec::from([
            (
                "contacts".to_string(),
                vec!["id".to_string(), "email".to_string()],
            ),
            ("opportunities".to_string(), vec!["amount".to_string()]),
        ]);

        assert_eq!(
            encode_relationship_spec(&spec),
            vec![
                NameValue::new("contacts", "id"),
                NameValue::new("contacts", "email"),
                NameValue::new("opportunities", "amount"),
            ]
        );
    }

    #[test]
    fn test_encode_relationship_spec_empty_spec_is_empty() {
        assert!(encode_relationship_spec(&RelationshipSpec::new()).is_empty());
    }

    #[test]
    fn test_encode_relationship_spec_module_without_fields_is_dropped() {
        let spec = RelationshipSpec::from([("contacts".to_string(), vec![])]);
        assert!(encode_relationship_spec(&spec).is_empty());
    }
}
