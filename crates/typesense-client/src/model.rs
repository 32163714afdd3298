//! Wire models for the Typesense admin API
//!
//! Request types carry `skip_serializing_if` on every optional attribute so
//! that unset values are omitted and the server applies its own defaults.
//! Response types accept missing attributes via `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// A document body: arbitrary JSON object keyed by attribute name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The closed set of field types accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "geopoint")]
    Geopoint,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "int32[]")]
    Int32Array,
    #[serde(rename = "int64[]")]
    Int64Array,
    #[serde(rename = "float[]")]
    FloatArray,
    #[serde(rename = "bool[]")]
    BoolArray,
    #[serde(rename = "geopoint[]")]
    GeopointArray,
    #[serde(rename = "object[]")]
    ObjectArray,
    #[serde(rename = "string*")]
    StringStar,
    #[serde(rename = "auto")]
    Auto,
}

impl FieldType {
    /// The wire name of this type, as it appears in schema payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Geopoint => "geopoint",
            FieldType::Object => "object",
            FieldType::StringArray => "string[]",
            FieldType::Int32Array => "int32[]",
            FieldType::Int64Array => "int64[]",
            FieldType::FloatArray => "float[]",
            FieldType::BoolArray => "bool[]",
            FieldType::GeopointArray => "geopoint[]",
            FieldType::ObjectArray => "object[]",
            FieldType::StringStar => "string*",
            FieldType::Auto => "auto",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed attribute descriptor within a collection schema
///
/// Equality is structural: two definitions are equal when every attribute,
/// including the unset ones, matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infix: Option<bool>,
}

impl Field {
    /// A field definition with every boolean attribute left to the server.
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            facet: None,
            index: None,
            optional: None,
            sort: None,
            infix: None,
        }
    }
}

/// Schema submitted when creating a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_nested_fields: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols_to_index: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_separators: Option<Vec<String>>,
    pub fields: Vec<Field>,
}

/// Collection as echoed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_nested_fields: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols_to_index: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_separators: Option<Vec<String>>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_documents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// One entry in a batched schema update
///
/// The server has no in-place field mutation: an update payload is a sequence
/// of full definitions to add and `{name, drop: true}` markers to remove.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldAlteration {
    Drop { name: String, drop: bool },
    Define(Field),
}

impl FieldAlteration {
    /// A drop marker for the named field.
    pub fn drop(name: impl Into<String>) -> Self {
        FieldAlteration::Drop {
            name: name.into(),
            drop: true,
        }
    }
}

/// Batched schema-update payload for an existing collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionUpdate {
    pub fields: Vec<FieldAlteration>,
}

/// Synonym mapping submitted on upsert
///
/// `root` is present only for one-directional mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub synonyms: Vec<String>,
}

/// Synonym as echoed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub synonyms: Vec<String>,
}

/// Alias target submitted on upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDefinition {
    pub collection_name: String,
}

/// Alias as echoed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub collection_name: String,
}
