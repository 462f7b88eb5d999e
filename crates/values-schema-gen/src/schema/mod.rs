//! Draft 7 schema value model.
//!
//! [`Schema`] distinguishes the two boolean schemas (emitted as JSON `true`
//! / `false`) from object schemas. [`SchemaObject`] carries every Draft 7
//! field plus a flattened `x-*` extension map. Property order is the
//! insertion order of the `properties` map and survives serialization
//! unchanged.

pub(crate) mod merge;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use strum::{Display, EnumString};

/// A JSON Schema node: one of the two boolean schemas or an object schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
  Bool(bool),
  Object(Box<SchemaObject>),
}

impl Schema {
  /// The true-schema, allowing any value.
  #[must_use]
  pub fn any() -> Self {
    Schema::Bool(true)
  }

  /// The false-schema, denying any value.
  #[must_use]
  pub fn none() -> Self {
    Schema::Bool(false)
  }

  #[must_use]
  pub fn is_true(&self) -> bool {
    matches!(self, Schema::Bool(true))
  }

  #[must_use]
  pub fn as_object(&self) -> Option<&SchemaObject> {
    match self {
      Schema::Object(object) => Some(object),
      Schema::Bool(_) => None,
    }
  }
}

impl From<SchemaObject> for Schema {
  fn from(object: SchemaObject) -> Self {
    Schema::Object(Box::new(object))
  }
}

/// Draft 7 primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InstanceType {
  Null,
  Boolean,
  Object,
  Array,
  Number,
  String,
  Integer,
}

/// The `type` keyword: a single name or an ordered set of names.
///
/// A one-element set is collapsed to `Single` by [`TypeSet::from_vec`], so a
/// length-one type array emits as a plain string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeSet {
  Single(InstanceType),
  Multiple(Vec<InstanceType>),
}

impl TypeSet {
  #[must_use]
  pub fn from_vec(mut types: Vec<InstanceType>) -> Option<Self> {
    match types.len() {
      0 => None,
      1 => Some(TypeSet::Single(types.remove(0))),
      _ => Some(TypeSet::Multiple(types)),
    }
  }

  #[must_use]
  pub fn contains(&self, instance_type: InstanceType) -> bool {
    match self {
      TypeSet::Single(single) => *single == instance_type,
      TypeSet::Multiple(types) => types.contains(&instance_type),
    }
  }

  #[must_use]
  pub fn single(&self) -> Option<InstanceType> {
    match self {
      TypeSet::Single(single) => Some(*single),
      TypeSet::Multiple(_) => None,
    }
  }
}

/// A `dependencies` entry: either a list of property names or a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dependency {
  Keys(Vec<String>),
  Schema(Schema),
}

/// An object schema carrying every Draft 7 field.
///
/// `default` and `const` distinguish "explicitly null" (`Some(Value::Null)`,
/// emitted as `null`) from "unset" (`None`, omitted).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaObject {
  #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
  pub meta_schema: Option<String>,
  #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
  pub reference: Option<String>,
  #[serde(rename = "$comment", skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub types: Option<TypeSet>,
  #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<Value>,
  #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
  pub const_value: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<Value>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub examples: Vec<Value>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minimum: Option<Number>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum: Option<Number>,
  #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
  pub exclusive_minimum: Option<Number>,
  #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
  pub exclusive_maximum: Option<Number>,
  #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
  pub multiple_of: Option<Number>,
  #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u64>,
  #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u64>,

  #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty")]
  pub all_of: Vec<Schema>,
  #[serde(rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
  pub any_of: Vec<Schema>,
  #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
  pub one_of: Vec<Schema>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub not: Option<Schema>,
  #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
  pub if_schema: Option<Schema>,
  #[serde(rename = "then", skip_serializing_if = "Option::is_none")]
  pub then_schema: Option<Schema>,
  #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
  pub else_schema: Option<Schema>,

  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,
  #[serde(rename = "patternProperties", skip_serializing_if = "IndexMap::is_empty")]
  pub pattern_properties: IndexMap<String, Schema>,
  #[serde(rename = "propertyNames", skip_serializing_if = "Option::is_none")]
  pub property_names: Option<Schema>,
  #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
  pub additional_properties: Option<Schema>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub dependencies: IndexMap<String, Dependency>,
  #[serde(skip_serializing_if = "IndexMap::is_empty")]
  pub definitions: IndexMap<String, Schema>,
  #[serde(rename = "$defs", skip_serializing_if = "IndexMap::is_empty")]
  pub defs: IndexMap<String, Schema>,
  #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
  pub min_properties: Option<u64>,
  #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
  pub max_properties: Option<u64>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub items: Option<Schema>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contains: Option<Schema>,
  #[serde(rename = "additionalItems", skip_serializing_if = "Option::is_none")]
  pub additional_items: Option<Schema>,
  #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
  pub min_items: Option<u64>,
  #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
  pub max_items: Option<u64>,
  #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
  pub unique_items: Option<bool>,

  #[serde(rename = "contentEncoding", skip_serializing_if = "Option::is_none")]
  pub content_encoding: Option<String>,
  #[serde(rename = "contentMediaType", skip_serializing_if = "Option::is_none")]
  pub content_media_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deprecated: Option<bool>,
  #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
  pub read_only: Option<bool>,
  #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
  pub write_only: Option<bool>,

  /// `x-*` extension keys, inlined at the schema level.
  #[serde(flatten)]
  pub extra: IndexMap<String, Value>,
}

impl SchemaObject {
  #[must_use]
  pub fn with_type(instance_type: InstanceType) -> Self {
    Self {
      types: Some(TypeSet::Single(instance_type)),
      ..Self::default()
    }
  }

  /// True when the schema's type set names `instance_type`.
  #[must_use]
  pub fn has_type(&self, instance_type: InstanceType) -> bool {
    self.types.as_ref().is_some_and(|set| set.contains(instance_type))
  }

  /// Copies every field the receiver left unset from `other`. Extension keys
  /// are unioned with the receiver's entries winning on conflict. Used for
  /// priority merging of annotation results.
  pub(crate) fn fill_from(&mut self, other: &SchemaObject) {
    macro_rules! fill_option {
      ($($field:ident),* $(,)?) => {
        $(if self.$field.is_none() { self.$field = other.$field.clone(); })*
      };
    }
    macro_rules! fill_seq {
      ($($field:ident),* $(,)?) => {
        $(if self.$field.is_empty() { self.$field = other.$field.clone(); })*
      };
    }
    fill_option!(
      meta_schema,
      id,
      reference,
      comment,
      title,
      description,
      types,
      const_value,
      default,
      pattern,
      format,
      minimum,
      maximum,
      exclusive_minimum,
      exclusive_maximum,
      multiple_of,
      min_length,
      max_length,
      not,
      if_schema,
      then_schema,
      else_schema,
      property_names,
      additional_properties,
      min_properties,
      max_properties,
      items,
      contains,
      additional_items,
      min_items,
      max_items,
      unique_items,
      content_encoding,
      content_media_type,
      deprecated,
      read_only,
      write_only,
    );
    fill_seq!(
      enum_values,
      examples,
      all_of,
      any_of,
      one_of,
      properties,
      pattern_properties,
      required,
      dependencies,
      definitions,
      defs,
    );
    for (key, value) in &other.extra {
      if !self.extra.contains_key(key) {
        self.extra.insert(key.clone(), value.clone());
      }
    }
  }
}
