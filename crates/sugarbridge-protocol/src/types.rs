//! Record types shared by the codec and the parser.
//!
//! Callers work with [`Record`]s: plain maps from field name to
//! [`FieldValue`]. The wire works with ordered [`NameValue`] lists. The
//! [`codec`](crate::codec) and [`parser`](crate::parser) modules translate
//! between the two.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// FieldValue / Record
// ---------------------------------------------------------------------------

/// The value of one record field: a scalar string, or an ordered list of
/// strings for multi-select fields.
///
/// Serialized untagged, so `Text("Ann")` is `"Ann"` and
/// `List(["x", "y"])` is `["x","y"]` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the scalar value, or `None` for a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the list items, or `None` for a scalar.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A normalized record: field name to value. Any string key is legal.
pub type Record = BTreeMap<String, FieldValue>;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// One `{name, value}` pair of a wire `name_value_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Related module name to the fields to fetch from it.
pub type RelationshipSpec = BTreeMap<String, Vec<String>>;

// ---------------------------------------------------------------------------
// Decoded entries
// ---------------------------------------------------------------------------

/// Records related to an entry through one link.
///
/// The CRM reports related records in two shapes (see
/// [`RelationShape`](crate::parser::RelationShape)): link lists yield a
/// single record per module, bare relationship lists yield every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Related {
    One(Record),
    Many(Vec<Record>),
}

/// Related records keyed by module (link) name.
pub type Relationships = BTreeMap<String, Related>;

/// One decoded entry: its own fields plus whatever related records the
/// response carried for it.
///
/// Serializes as a single flat map, fields first and relationships
/// second, so a relationship named like a field replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub record: Record,
    pub relationships: Relationships,
}

impl Entry {
    /// Looks up a field of the entry itself.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.record.get(name)
    }

    /// Looks up a field and returns it only if it is a scalar.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_str)
    }

    /// Looks up the related records for a module.
    pub fn related(&self, module: &str) -> Option<&Related> {
        self.relationships.get(module)
    }

    /// The entry's `id` field, if present.
    pub fn id(&self) -> Option<&str> {
        self.text("id")
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self
            .record
            .keys()
            .filter(|k| self.relationships.contains_key(*k))
            .count();
        let len = self.record.len() + self.relationships.len() - shadowed;

        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.record {
            if !self.relationships.contains_key(name) {
                map.serialize_entry(name, value)?;
            }
        }
        for (module, related) in &self.relationships {
            map.serialize_entry(module, related)?;
        }
        map.end()
    }
}

/// One page of a list-style fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryList {
    /// Number of entries in this page.
    pub result_count: u64,
    /// Number of entries matching the query across all pages.
    pub total_count: u64,
    /// Offset to pass to fetch the following page.
    pub next_offset: u64,
    pub entries: Vec<Entry>,
}

impl EntryList {
    /// Returns `true` if the page holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
