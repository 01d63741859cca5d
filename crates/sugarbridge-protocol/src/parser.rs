//! Response parser: wire responses back into [`Entry`] values.
//!
//! Entry fetches all answer with an `entry_list`, but the related records
//! that ride along in `relationship_list` come in different shapes
//! depending on which RPC method produced them:
//!
//! ```text
//! link list (get_entry_list, get_entry on v4.1):
//!   relationship_list[i] = { link_list: [ { name, records: [ { link_value: [nv..] } ] } ] }
//!
//! module list (get_entry on older endpoints, get_relationships):
//!   relationship_list[i] = [ { name, records: [ [nv..], [nv..] ] } ]
//! ```
//!
//! [`RelationShape::detect`] picks the shape per entry index, and
//! [`decode_relations_at`] decodes accordingly.

use serde_json::Value;

use crate::codec::{decode_multi_value, scalar_to_string};
use crate::{
    Entry, EntryList, NameValue, ProtocolError, Record, Related, Relationships,
};

/// Stand-in for absent response members.
static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// name_value_list
// ---------------------------------------------------------------------------

/// Decodes a typed `name_value_list` into a record.
///
/// Every value goes through [`decode_multi_value`]. A later pair with the
/// same name replaces an earlier one.
pub fn decode_name_value_list(list: &[NameValue]) -> Record {
    list.iter()
        .map(|pair| (pair.name.clone(), decode_multi_value(&pair.value)))
        .collect()
}

/// Decodes a `name_value_list` straight from response JSON.
///
/// Accepts both forms the endpoint produces: an array of `{name, value}`
/// objects, or an object keyed by field name whose values are
/// `{name, value}` objects. Pairs without a `name` are skipped and
/// non-string values are stringified. Anything else decodes to an empty
/// record.
pub fn decode_name_value_json(list: &Value) -> Record {
    let pairs: Vec<NameValue> = match list {
        Value::Array(items) => items.iter().filter_map(pair_from_json).collect(),
        Value::Object(fields) => {
            fields.values().filter_map(pair_from_json).collect()
        }
        _ => Vec::new(),
    };
    decode_name_value_list(&pairs)
}

fn pair_from_json(value: &Value) -> Option<NameValue> {
    let name = value.get("name")?.as_str()?;
    let value = value.get("value").map(scalar_to_string).unwrap_or_default();
    Some(NameValue::new(name, value))
}

// ---------------------------------------------------------------------------
// Relationship shapes
// ---------------------------------------------------------------------------

/// The shape of the related-records data for one entry.
///
/// Detection order matters: a link list wins over a module list, and a
/// missing or empty slot means no related data at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelationShape<'a> {
    /// `relationship_list[i].link_list`: one record per module, taken from
    /// each record's `link_value`.
    LinkList(&'a Value),

    /// `relationship_list[i]` itself is a non-empty collection of modules,
    /// each holding a list of plain name/value records.
    ModuleList(&'a Value),

    /// No related data for this entry.
    Absent,
}

impl<'a> RelationShape<'a> {
    /// Inspects `response.relationship_list[index]`.
    pub fn detect(response: &'a Value, index: usize) -> Self {
        let Some(slot) = response
            .get("relationship_list")
            .and_then(|list| list.get(index))
        else {
            return Self::Absent;
        };

        if let Some(link_list) = slot.get("link_list") {
            return Self::LinkList(link_list);
        }

        let non_empty = match slot {
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            _ => false,
        };
        if non_empty {
            Self::ModuleList(slot)
        } else {
            Self::Absent
        }
    }
}

/// Iterates the elements of an array, or the values of an object.
fn members(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(fields) => Box::new(fields.values()),
        _ => Box::new(std::iter::empty()),
    }
}

/// Returns a module entry's `name` and its `records`, if it has both.
fn module_parts(module: &Value) -> Option<(&str, &Value)> {
    let name = module.get("name")?.as_str()?;
    let records = module.get("records")?;
    Some((name, records))
}

/// Decodes the related records for the entry at `index`.
///
/// - Link list: each module maps to [`Related::One`]; when a module lists
///   several records, the last one wins.
/// - Module list: each module maps to [`Related::Many`] holding every
///   record in order.
/// - Absent: empty map.
///
/// Modules without a name or without records contribute nothing.
pub fn decode_relations_at(response: &Value, index: usize) -> Relationships {
    let mut relations = Relationships::new();

    match RelationShape::detect(response, index) {
        RelationShape::LinkList(link_list) => {
            for (name, records) in members(link_list).filter_map(module_parts) {
                for record in members(records) {
                    let link_value =
                        record.get("link_value").unwrap_or(&NULL);
                    relations.insert(
                        name.to_string(),
                        Related::One(decode_name_value_json(link_value)),
                    );
                }
            }
        }
        RelationShape::ModuleList(modules) => {
            for (name, records) in members(modules).filter_map(module_parts) {
                let decoded: Vec<Record> =
                    members(records).map(decode_name_value_json).collect();
                if decoded.is_empty() {
                    continue;
                }
                match relations.get_mut(name) {
                    Some(Related::Many(existing)) => existing.extend(decoded),
                    _ => {
                        relations.insert(name.to_string(), Related::Many(decoded));
                    }
                }
            }
        }
        RelationShape::Absent => {}
    }

    relations
}

// ---------------------------------------------------------------------------
// entry_list
// ---------------------------------------------------------------------------

/// Decodes every entry of `response.entry_list`, each merged with its
/// related records.
///
/// A missing `entry_list` yields an empty vector.
pub fn decode_entry_list(response: &Value) -> Vec<Entry> {
    let Some(entries) = response.get("entry_list") else {
        return Vec::new();
    };

    members(entries)
        .enumerate()
        .map(|(index, entry)| Entry {
            record: decode_name_value_json(
                entry.get("name_value_list").unwrap_or(&NULL),
            ),
            relationships: decode_relations_at(response, index),
        })
        .collect()
}

/// Decodes a list-style response into an [`EntryList`] page.
///
/// Empty pages are valid results, not errors.
pub fn decode_entry_page(response: &Value) -> EntryList {
    EntryList {
        result_count: read_count(response, "result_count"),
        total_count: read_count(response, "total_count"),
        next_offset: read_count(response, "next_offset"),
        entries: decode_entry_list(response),
    }
}

/// Decodes a single-entry response and returns its first entry.
///
/// # Errors
/// Returns [`ProtocolError::Shape`] if the response holds no entries.
pub fn decode_single_entry(response: &Value) -> Result<Entry, ProtocolError> {
    decode_entry_list(response).into_iter().next().ok_or_else(|| {
        ProtocolError::Shape("entry_list is missing or empty".into())
    })
}

/// Reads a counter that the endpoint may send as a number or as a numeric
/// string. Missing or unparseable counters read as 0.
pub fn read_count(response: &Value, key: &str) -> u64 {
    match response.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Reads a required string field such as the `id` returned by
/// `set_entry`.
///
/// # Errors
/// Returns [`ProtocolError::Shape`] if `key` is missing or not a
/// non-empty string.
pub fn read_id(response: &Value, key: &str) -> Result<String, ProtocolError> {
    response
        .get(key)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProtocolError::Shape(format!("response has no {key:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldValue;
    use serde_json::json;

    fn nv(pairs: &[(&str, &str)]) -> Value {
        Value::Array(
            pairs
                .iter()
                .map(|(n, v)| json!({"name": n, "value": v}))
                .collect(),
        )
    }

    // =====================================================================
    // name_value_list
    // =====================================================================

    #[test]
    fn test_decode_name_value_list_splits_multi_values() {
        let pairs = vec![
            NameValue::new("first_name", "Ann"),
            NameValue::new("tags", "^x^,^y^"),
        ];

        let record = decode_name_value_list(&pairs);

        assert_eq!(record["first_name"], FieldValue::from("Ann"));
        assert_eq!(record["tags"], FieldValue::from(vec!["x", "y"]));
    }

    #[test]
    fn test_decode_name_value_list_later_duplicate_wins() {
        let pairs = vec![NameValue::new("a", "1"), NameValue::new("a", "2")];
        assert_eq!(decode_name_value_list(&pairs)["a"], FieldValue::from("2"));
    }

    #[test]
    fn test_decode_name_value_json_object_form() {
        let list = json!({
            "id": {"name": "id", "value": "42"},
            "name": {"name": "name", "value": "Acme"},
        });

        let record = decode_name_value_json(&list);

        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], FieldValue::from("42"));
    }

    #[test]
    fn test_decode_name_value_json_stringifies_and_skips_nameless() {
        let list = json!([
            {"name": "count", "value": 3},
            {"name": "empty", "value": null},
            {"value": "orphan"},
        ]);

        let record = decode_name_value_json(&list);

        assert_eq!(record.len(), 2);
        assert_eq!(record["count"], FieldValue::from("3"));
        assert_eq!(record["empty"], FieldValue::from(""));
    }

    #[test]
    fn test_decode_name_value_json_garbage_is_empty() {
        assert!(decode_name_value_json(&json!("nope")).is_empty());
        assert!(decode_name_value_json(&Value::Null).is_empty());
    }

    // =====================================================================
    // RelationShape::detect
    // =====================================================================

    #[test]
    fn test_detect_link_list_wins() {
        let response = json!({"relationship_list": [{"link_list": []}]});
        assert!(matches!(
            RelationShape::detect(&response, 0),
            RelationShape::LinkList(_)
        ));
    }

    #[test]
    fn test_detect_non_empty_module_list() {
        let response =
            json!({"relationship_list": [[{"name": "contacts", "records": []}]]});
        assert!(matches!(
            RelationShape::detect(&response, 0),
            RelationShape::ModuleList(_)
        ));
    }

    #[test]
    fn test_detect_empty_slot_is_absent() {
        let response = json!({"relationship_list": [[]]});
        assert_eq!(RelationShape::detect(&response, 0), RelationShape::Absent);
    }

    #[test]
    fn test_detect_out_of_range_is_absent() {
        let response = json!({"relationship_list": [[{"name": "x"}]]});
        assert_eq!(RelationShape::detect(&response, 3), RelationShape::Absent);
    }

    #[test]
    fn test_detect_no_relationship_list_is_absent() {
        assert_eq!(
            RelationShape::detect(&json!({}), 0),
            RelationShape::Absent
        );
    }

    // =====================================================================
    // decode_relations_at
    // =====================================================================

    #[test]
    fn test_decode_relations_link_list_last_record_wins() {
        let response = json!({
            "relationship_list": [{
                "link_list": [{
                    "name": "contacts",
                    "records": [
                        {"link_value": nv(&[("id", "c1")])},
                        {"link_value": nv(&[("id", "c2")])},
                    ],
                }],
            }],
        });

        let relations = decode_relations_at(&response, 0);

        match &relations["contacts"] {
            Related::One(record) => {
                assert_eq!(record["id"], FieldValue::from("c2"))
            }
            other => panic!("expected One, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_relations_module_list_keeps_every_record() {
        let response = json!({
            "relationship_list": [[{
                "name": "contacts",
                "records": [nv(&[("id", "c1")]), nv(&[("id", "c2")])],
            }]],
        });

        let relations = decode_relations_at(&response, 0);

        match &relations["contacts"] {
            Related::Many(records) => {
                let ids: Vec<_> = records.iter().map(|r| r["id"].clone()).collect();
                assert_eq!(ids, vec![FieldValue::from("c1"), FieldValue::from("c2")]);
            }
            other => panic!("expected Many, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_relations_module_without_records_is_skipped() {
        let response = json!({
            "relationship_list": [[
                {"name": "contacts", "records": []},
                {"name": "notes"},
            ]],
        });

        assert!(decode_relations_at(&response, 0).is_empty());
    }

    #[test]
    fn test_decode_relations_each_index_uses_its_own_shape() {
        let response = json!({
            "relationship_list": [
                {"link_list": [{
                    "name": "contacts",
                    "records": [{"link_value": nv(&[("id", "c1")])}],
                }]},
                [{
                    "name": "contacts",
                    "records": [nv(&[("id", "c2")]), nv(&[("id", "c3")])],
                }],
            ],
        });

        let first = decode_relations_at(&response, 0);
        let second = decode_relations_at(&response, 1);

        assert!(matches!(first["contacts"], Related::One(_)));
        match &second["contacts"] {
            Related::Many(records) => assert_eq!(records.len(), 2),
            other => panic!("expected Many, got {other:?}"),
        }
    }

    // =====================================================================
    // entry_list
    // =====================================================================

    #[test]
    fn test_decode_entry_list_missing_is_empty() {
        assert!(decode_entry_list(&json!({"result_count": 0})).is_empty());
    }

    #[test]
    fn test_decode_entry_list_merges_relations_per_index() {
        let response = json!({
            "entry_list": [
                {"id": "1", "name_value_list": nv(&[("id", "1"), ("name", "Acme")])},
                {"id": "2", "name_value_list": nv(&[("id", "2"), ("name", "Beta")])},
            ],
            "relationship_list": [
                {"link_list": [{
                    "name": "contacts",
                    "records": [{"link_value": nv(&[("id", "c1")])}],
                }]},
                {"link_list": []},
            ],
        });

        let entries = decode_entry_list(&response);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text("name"), Some("Acme"));
        assert!(entries[0].related("contacts").is_some());
        assert_eq!(entries[1].text("name"), Some("Beta"));
        assert!(entries[1].relationships.is_empty());
    }

    #[test]
    fn test_decode_entry_page_reads_string_counts() {
        let response = json!({
            "result_count": 1,
            "total_count": "37",
            "next_offset": 1,
            "entry_list": [{"name_value_list": nv(&[("id", "1")])}],
        });

        let page = decode_entry_page(&response);

        assert_eq!(page.result_count, 1);
        assert_eq!(page.total_count, 37);
        assert_eq!(page.next_offset, 1);
        assert_eq!(page.entries.len(), 1);
    }

    #[test]
    fn test_decode_entry_page_empty_is_valid() {
        let page = decode_entry_page(&json!({
            "result_count": 0,
            "total_count": "0",
            "entry_list": [],
        }));
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_decode_single_entry_empty_is_shape_error() {
        let result = decode_single_entry(&json!({"entry_list": []}));
        assert!(matches!(result, Err(ProtocolError::Shape(_))));
    }

    #[test]
    fn test_read_id_missing_is_shape_error() {
        assert!(matches!(
            read_id(&json!({"id": ""}), "id"),
            Err(ProtocolError::Shape(_))
        ));
        assert_eq!(read_id(&json!({"id": "abc"}), "id").unwrap(), "abc");
    }
}
