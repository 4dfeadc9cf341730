//! Employee records and the dual-encoding field abstraction.
//!
//! The remote directory returns the same logical field in up to two shapes:
//! a nested category object (`{"work": {"title": "..."}}`) and a
//! slash-prefixed flat key carrying a value holder
//! (`{"/work/title": {"value": "..."}}`). Both are equivalent views of the
//! field and a record may carry either, both, or neither. All field access
//! goes through [`EmployeeRecord::read_field`] / [`EmployeeRecord::rewrite_field`]
//! so the dual check lives in exactly one place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed two-segment field id such as `work.title`.
///
/// Only ids with exactly two non-empty dot-separated segments are
/// addressable. Bare ids and three-or-more-segment ids are never resolved;
/// this mirrors the remote contract and is a known restriction, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    /// Category segment, e.g. `work`.
    pub category: String,
    /// Field name segment, e.g. `title`.
    pub name: String,
}

impl FieldPath {
    /// Parse a dotted field id, returning `None` unless it has exactly two
    /// non-empty segments.
    pub fn parse(field_id: &str) -> Option<Self> {
        let mut parts = field_id.split('.');
        let category = parts.next()?;
        let name = parts.next()?;
        if parts.next().is_some() || category.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            category: category.to_string(),
            name: name.to_string(),
        })
    }

    /// The flat-encoding key for this path, e.g. `/work/title`.
    pub fn slash_key(&self) -> String {
        format!("/{}/{}", self.category, self.name)
    }
}

/// Render a scalar JSON value as the string the directory uses for
/// identifier comparison. Non-scalar values have no string form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A single employee record as returned by the directory search endpoint.
///
/// Identity is the field at `root.id`, treated as an opaque string. Records
/// are immutable for the lifetime of a snapshot except for the in-place
/// enumeration rewrite performed by the value resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeRecord(Map<String, Value>);

impl EmployeeRecord {
    /// Build a record from a JSON value, returning `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Borrow the underlying JSON object.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Read a field, preferring the nested encoding and falling back to the
    /// slash-encoded value holder.
    pub fn read_field(&self, path: &FieldPath) -> Option<&Value> {
        if let Some(value) = self
            .0
            .get(&path.category)
            .and_then(Value::as_object)
            .and_then(|category| category.get(&path.name))
        {
            return Some(value);
        }
        self.0
            .get(&path.slash_key())
            .and_then(Value::as_object)
            .and_then(|holder| holder.get("value"))
    }

    /// Rewrite a field in place wherever it is present.
    ///
    /// Both encodings are checked and rewritten independently: `rewrite`
    /// is applied to the current value of each encoding, and the encoding
    /// is updated only when it returns a replacement.
    pub fn rewrite_field(&mut self, path: &FieldPath, rewrite: impl Fn(&Value) -> Option<Value>) {
        if let Some(category) = self.0.get_mut(&path.category).and_then(Value::as_object_mut) {
            if let Some(replacement) = category.get(&path.name).and_then(&rewrite) {
                category.insert(path.name.clone(), replacement);
            }
        }
        if let Some(holder) = self.0.get_mut(&path.slash_key()).and_then(Value::as_object_mut) {
            if let Some(replacement) = holder.get("value").and_then(&rewrite) {
                holder.insert("value".to_string(), replacement);
            }
        }
    }

    /// Read a field as a display string.
    pub fn text(&self, field_id: &str) -> Option<String> {
        let path = FieldPath::parse(field_id)?;
        self.read_field(&path).and_then(scalar_to_string)
    }

    /// The employee's opaque id (`root.id`), if present.
    pub fn id(&self) -> Option<String> {
        self.text("root.id")
    }

    /// The id of the employee's manager, read from the `work.reportsTo`
    /// relation. Returns `None` when the relation is absent, is not an
    /// object, or carries no usable id.
    pub fn manager_id(&self) -> Option<String> {
        let path = FieldPath::parse("work.reportsTo")?;
        let relation = self.read_field(&path)?.as_object()?;
        let id = scalar_to_string(relation.get("id")?)?;
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// One-line compact display string: name, title, department, site and
    /// email joined by ` | `, with empty segments omitted.
    pub fn display_line(&self) -> String {
        const DISPLAY_FIELDS: [&str; 5] = [
            "root.fullName",
            "work.title",
            "work.department",
            "work.site",
            "root.email",
        ];
        DISPLAY_FIELDS
            .iter()
            .filter_map(|field_id| self.text(field_id))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
