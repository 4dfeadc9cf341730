//! Field schema and named-list wire models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::employee::scalar_to_string;

/// The type of a directory field.
///
/// Only the enumeration kinds matter for value resolution; every other type
/// the remote schema can report collapses into [`FieldType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    List,
    MultiList,
    HierarchyList,
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Whether values of this type are opaque ids drawn from a named list.
    pub fn is_enumeration(self) -> bool {
        matches!(self, Self::List | Self::MultiList | Self::HierarchyList)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Other
    }
}

/// Enumeration metadata attached to list-typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeData {
    /// The named list this field draws its values from.
    #[serde(default)]
    pub list_id: Option<String>,
}

/// One entry of the field-schema listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchemaEntry {
    /// Dotted field path, e.g. `work.title`.
    #[serde(default)]
    pub id: String,

    /// Field type; unknown types deserialize as [`FieldType::Other`].
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Enumeration metadata, present for list-typed fields.
    #[serde(default)]
    pub type_data: Option<TypeData>,
}

impl FieldSchemaEntry {
    /// The named-list id this field resolves against, when it is an
    /// enumeration field that names one.
    pub fn named_list_id(&self) -> Option<&str> {
        if !self.field_type.is_enumeration() {
            return None;
        }
        self.type_data
            .as_ref()
            .and_then(|data| data.list_id.as_deref())
            .filter(|list_id| !list_id.is_empty())
    }
}

/// A company-defined enumeration mapping item ids to display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedList {
    /// List items. The remote may omit the array entirely on empty lists.
    #[serde(default)]
    pub values: Vec<NamedListItem>,
}

/// One item of a named list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedListItem {
    /// Item id; the remote sends either a string or a number.
    #[serde(default)]
    pub id: Value,

    /// Preferred display value.
    #[serde(default)]
    pub value: Option<String>,

    /// Fallback display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedListItem {
    /// The item id in its stringified comparison form, when non-empty.
    pub fn id_string(&self) -> Option<String> {
        scalar_to_string(&self.id).filter(|id| !id.is_empty())
    }

    /// The display string, preferring a non-empty `value` over a non-empty
    /// `name`.
    pub fn display(&self) -> Option<&str> {
        self.value
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| self.name.as_deref().filter(|name| !name.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_field_types_deserialize_as_other() {
        let entry: FieldSchemaEntry =
            serde_json::from_value(json!({ "id": "root.email", "type": "email" })).unwrap();
        assert_eq!(entry.field_type, FieldType::Other);
        assert_eq!(entry.named_list_id(), None);
    }

    #[test]
    fn enumeration_entry_exposes_its_list_id() {
        let entry: FieldSchemaEntry = serde_json::from_value(json!({
            "id": "work.title",
            "type": "list",
            "typeData": { "listId": "titles" }
        }))
        .unwrap();
        assert!(entry.field_type.is_enumeration());
        assert_eq!(entry.named_list_id(), Some("titles"));
    }

    #[test]
    fn hierarchy_list_counts_as_enumeration() {
        let entry: FieldSchemaEntry = serde_json::from_value(json!({
            "id": "work.department",
            "type": "hierarchy-list",
            "typeData": { "listId": "departments" }
        }))
        .unwrap();
        assert_eq!(entry.named_list_id(), Some("departments"));
    }

    #[test]
    fn item_display_prefers_value_over_name() {
        let item: NamedListItem =
            serde_json::from_value(json!({ "id": 101, "value": "CEO", "name": "Chief" })).unwrap();
        assert_eq!(item.id_string().as_deref(), Some("101"));
        assert_eq!(item.display(), Some("CEO"));

        let fallback: NamedListItem =
            serde_json::from_value(json!({ "id": "7", "value": "", "name": "Chief" })).unwrap();
        assert_eq!(fallback.display(), Some("Chief"));
    }

    #[test]
    fn items_without_id_or_display_are_unusable() {
        let no_id: NamedListItem = serde_json::from_value(json!({ "value": "CEO" })).unwrap();
        assert_eq!(no_id.id_string(), None);

        let no_display: NamedListItem = serde_json::from_value(json!({ "id": "9" })).unwrap();
        assert_eq!(no_display.display(), None);
    }
}
