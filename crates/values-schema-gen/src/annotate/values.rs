//! Dynamic-value dispatch shared by the block and inline schema grammars.
//!
//! Annotation interiors decode into `serde_json::Value` first; each key is
//! then assigned to the matching Draft 7 field. Unknown keys and values of
//! the wrong shape are dropped silently; annotations are best-effort.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use super::Requiredness;
use crate::schema::{Dependency, InstanceType, Schema, SchemaObject, TypeSet};

/// Applies every key of a decoded mapping to `object`. Returns the
/// `required: <bool>` opinion, if the mapping carried one.
pub(crate) fn apply_keys(object: &mut SchemaObject, map: &serde_json::Map<String, Value>) -> Requiredness {
  let mut required = Requiredness::Unset;
  for (key, value) in map {
    let opinion = apply_key(object, key, value);
    if opinion.is_set() {
      required = opinion;
    }
  }
  required
}

/// Assigns one decoded key to its Draft 7 field.
pub(crate) fn apply_key(object: &mut SchemaObject, key: &str, value: &Value) -> Requiredness {
  match key {
    "type" => object.types = types_from_value(value),
    "title" => object.title = string_from(value),
    "description" => object.description = string_from(value),
    "pattern" => object.pattern = string_from(value),
    "format" => object.format = string_from(value),
    "$ref" => object.reference = string_from(value),
    "$id" => object.id = string_from(value),
    "$comment" => object.comment = string_from(value),
    "contentEncoding" => object.content_encoding = string_from(value),
    "contentMediaType" => object.content_media_type = string_from(value),
    "enum" => {
      if let Value::Array(values) = value {
        object.enum_values = values.clone();
      }
    }
    "const" => object.const_value = Some(value.clone()),
    "default" => object.default = Some(value.clone()),
    "examples" => {
      if let Value::Array(values) = value {
        object.examples = values.clone();
      }
    }
    "minimum" => object.minimum = number_from(value),
    "maximum" => object.maximum = number_from(value),
    "exclusiveMinimum" => object.exclusive_minimum = number_from(value),
    "exclusiveMaximum" => object.exclusive_maximum = number_from(value),
    "multipleOf" => object.multiple_of = number_from(value),
    "minLength" => object.min_length = value.as_u64(),
    "maxLength" => object.max_length = value.as_u64(),
    "minItems" => object.min_items = value.as_u64(),
    "maxItems" => object.max_items = value.as_u64(),
    "minProperties" => object.min_properties = value.as_u64(),
    "maxProperties" => object.max_properties = value.as_u64(),
    "uniqueItems" => object.unique_items = value.as_bool(),
    "deprecated" => object.deprecated = value.as_bool(),
    "readOnly" => object.read_only = value.as_bool(),
    "writeOnly" => object.write_only = value.as_bool(),
    "required" => match value {
      // a boolean is an opinion about this property within its parent
      Value::Bool(flag) => return Requiredness::from_bool(*flag),
      // a list applies to child properties
      Value::Array(names) => {
        object.required = names.iter().filter_map(|name| string_from(name)).collect();
      }
      _ => {}
    },
    "additionalProperties" => object.additional_properties = schema_from_value(value),
    "additionalItems" => object.additional_items = schema_from_value(value),
    "items" => object.items = schema_from_value(value),
    "contains" => object.contains = schema_from_value(value),
    "not" => object.not = schema_from_value(value),
    "if" => object.if_schema = schema_from_value(value),
    "then" => object.then_schema = schema_from_value(value),
    "else" => object.else_schema = schema_from_value(value),
    "propertyNames" => object.property_names = schema_from_value(value),
    "allOf" => object.all_of = schema_seq_from(value),
    "anyOf" => object.any_of = schema_seq_from(value),
    "oneOf" => object.one_of = schema_seq_from(value),
    "properties" => object.properties = schema_map_from(value),
    "patternProperties" => object.pattern_properties = schema_map_from(value),
    "definitions" => object.definitions = schema_map_from(value),
    "$defs" => object.defs = schema_map_from(value),
    "dependencies" => {
      if let Value::Object(map) = value {
        for (name, entry) in map {
          match entry {
            Value::Array(names) => {
              object.dependencies.insert(
                name.clone(),
                Dependency::Keys(names.iter().filter_map(|n| string_from(n)).collect()),
              );
            }
            Value::Object(_) => {
              if let Some(schema) = schema_from_value(entry) {
                object.dependencies.insert(name.clone(), Dependency::Schema(schema));
              }
            }
            _ => {}
          }
        }
      }
    }
    extension if extension.starts_with("x-") => {
      object.extra.insert(extension.to_string(), value.clone());
    }
    _ => {}
  }
  Requiredness::Unset
}

/// `type: string` or `type: [string, null]`. A YAML `null` entry stands for
/// the `"null"` type name; unknown names are dropped.
fn types_from_value(value: &Value) -> Option<TypeSet> {
  match value {
    Value::String(name) => name.parse::<InstanceType>().ok().map(TypeSet::Single),
    Value::Array(names) => TypeSet::from_vec(
      names
        .iter()
        .filter_map(|entry| match entry {
          Value::Null => Some(InstanceType::Null),
          Value::String(name) => name.parse::<InstanceType>().ok(),
          _ => None,
        })
        .collect(),
    ),
    _ => None,
  }
}

fn schema_from_value(value: &Value) -> Option<Schema> {
  match value {
    Value::Bool(allow) => Some(Schema::Bool(*allow)),
    Value::Object(map) => {
      let mut object = SchemaObject::default();
      apply_keys(&mut object, map);
      Some(object.into())
    }
    _ => None,
  }
}

fn schema_seq_from(value: &Value) -> Vec<Schema> {
  match value {
    Value::Array(entries) => entries.iter().filter_map(schema_from_value).collect(),
    _ => Vec::new(),
  }
}

fn schema_map_from(value: &Value) -> IndexMap<String, Schema> {
  match value {
    Value::Object(map) => map
      .iter()
      .filter_map(|(name, entry)| schema_from_value(entry).map(|schema| (name.clone(), schema)))
      .collect(),
    _ => IndexMap::new(),
  }
}

fn string_from(value: &Value) -> Option<String> {
  value.as_str().map(str::to_string)
}

fn number_from(value: &Value) -> Option<Number> {
  match value {
    Value::Number(number) => Some(number.clone()),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn applied(value: Value) -> (SchemaObject, Requiredness) {
    let mut object = SchemaObject::default();
    let required = apply_keys(&mut object, value.as_object().unwrap());
    (object, required)
  }

  #[test]
  fn type_arrays_convert_nulls_and_collapse_singletons() {
    let (object, _) = applied(json!({"type": ["string", null]}));
    assert_eq!(
      object.types,
      Some(TypeSet::Multiple(vec![InstanceType::String, InstanceType::Null]))
    );

    let (object, _) = applied(json!({"type": ["integer"]}));
    assert_eq!(object.types, Some(TypeSet::Single(InstanceType::Integer)));
  }

  #[test]
  fn required_bool_is_an_opinion_and_list_is_a_field() {
    let (object, required) = applied(json!({"required": true}));
    assert_eq!(required, Requiredness::Required);
    assert!(object.required.is_empty());

    let (object, required) = applied(json!({"required": ["a", "b"]}));
    assert_eq!(required, Requiredness::Unset);
    assert_eq!(object.required, vec!["a".to_string(), "b".to_string()]);
  }

  #[test]
  fn const_and_default_keep_explicit_nulls() {
    let (object, _) = applied(json!({"const": null, "default": null}));
    assert_eq!(object.const_value, Some(Value::Null));
    assert_eq!(object.default, Some(Value::Null));
  }

  #[test]
  fn additional_properties_maps_booleans_to_boolean_schemas() {
    let (object, _) = applied(json!({"additionalProperties": false}));
    assert_eq!(object.additional_properties, Some(Schema::none()));

    let (object, _) = applied(json!({"additionalProperties": {"type": "string"}}));
    let schema = object.additional_properties.unwrap();
    assert!(schema.as_object().unwrap().has_type(InstanceType::String));
  }

  #[test]
  fn dependencies_split_into_keys_and_schemas() {
    let (object, _) = applied(json!({
      "dependencies": {"a": ["b", "c"], "d": {"type": "object"}}
    }));
    assert_eq!(
      object.dependencies["a"],
      Dependency::Keys(vec!["b".to_string(), "c".to_string()])
    );
    assert!(matches!(object.dependencies["d"], Dependency::Schema(_)));
  }

  #[test]
  fn unknown_keys_and_extensions() {
    let (object, _) = applied(json!({"x-order": 1, "mystery": true}));
    assert_eq!(object.extra["x-order"], json!(1));
    assert_eq!(object.extra.len(), 1);
  }
}
