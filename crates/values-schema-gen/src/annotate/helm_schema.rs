//! helm-schema `# @schema` block annotations.
//!
//! Paired bare `# @schema` delimiter lines toggle a block inside a head
//! comment; the interior is embedded YAML and each decoded key assigns a
//! Draft 7 field. A line with content after `@schema` belongs to the inline
//! grammar and is skipped here. `# @schema.root` pairs on the first mapping
//! key of a file define root-level fields; on every later key they are
//! ignored.

use std::cell::{Cell, RefCell};

use serde_json::{Map, Value};
use tracing::warn;

use super::{AnnotationResult, Annotator, values};
use crate::{
  generator::infer::{extract_description, strip_comment_marker},
  schema::SchemaObject,
  yaml::MappingEntry,
};

/// Fields a `@schema.root` block may set on the root schema.
const ROOT_KEYS: &[&str] = &[
  "title",
  "description",
  "$ref",
  "examples",
  "deprecated",
  "readOnly",
  "writeOnly",
  "additionalProperties",
];

/// The helm-schema (dadav) grammar.
#[derive(Debug, Default)]
pub struct HelmSchema {
  root: RefCell<Option<SchemaObject>>,
  first_key_seen: Cell<bool>,
}

impl HelmSchema {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl Annotator for HelmSchema {
  fn name(&self) -> &'static str {
    "helm-schema"
  }

  fn for_content(&self, _content: &str) -> anyhow::Result<Box<dyn Annotator>> {
    Ok(Box::new(HelmSchema::new()))
  }

  fn annotate(&self, entry: &MappingEntry, key_path: &str) -> Option<AnnotationResult> {
    let head = entry.key.head_comment.as_deref().unwrap_or_default();
    let head_lines: Vec<&str> = head.lines().collect();

    if !self.first_key_seen.replace(true)
      && let Some(interior) = extract_block(&head_lines, "@schema.root")
    {
      match parse_interior(&interior) {
        Some(map) => *self.root.borrow_mut() = Some(root_subset(&map)),
        None => warn!(key_path, "malformed @schema.root block, skipping"),
      }
    }

    let interior = extract_block(&head_lines, "@schema")?;

    let mut result = AnnotationResult::default();
    let mut schema = SchemaObject::default();
    if !interior.trim().is_empty() {
      match parse_interior(&interior) {
        Some(map) => result.required = values::apply_keys(&mut schema, &map),
        None => warn!(key_path, "malformed @schema block, skipping"),
      }
    }

    if schema.description.is_none() {
      let outside = lines_outside_blocks(&head_lines).join("\n");
      schema.description = extract_description(&outside);
    }

    result.schema = Some(schema);
    Some(result)
  }

  fn root_schema(&self) -> Option<SchemaObject> {
    self.root.borrow().clone()
  }
}

/// Collects the interior of every paired `marker` block. Returns `None`
/// when no delimiter is present at all. Delimiters are bare marker lines;
/// a marker with trailing content is skipped entirely.
fn extract_block(lines: &[&str], marker: &str) -> Option<String> {
  let mut inside = false;
  let mut seen = false;
  let mut collected: Vec<&str> = Vec::new();
  for line in lines {
    let stripped = strip_comment_marker(line);
    let trimmed = stripped.trim();
    if trimmed == marker {
      seen = true;
      inside = !inside;
      continue;
    }
    if trimmed
      .strip_prefix(marker)
      .is_some_and(|rest| rest.starts_with(char::is_whitespace))
    {
      continue;
    }
    if inside {
      collected.push(stripped);
    }
  }
  seen.then(|| collected.join("\n"))
}

/// Head-comment lines that belong to neither block form, for the plain
/// description fallback.
fn lines_outside_blocks<'a>(lines: &[&'a str]) -> Vec<&'a str> {
  let mut outside = Vec::new();
  let mut in_schema = false;
  let mut in_root = false;
  for line in lines {
    let trimmed = strip_comment_marker(line).trim();
    if trimmed == "@schema" && !in_root {
      in_schema = !in_schema;
      continue;
    }
    if trimmed == "@schema.root" && !in_schema {
      in_root = !in_root;
      continue;
    }
    if !in_schema && !in_root {
      outside.push(*line);
    }
  }
  outside
}

/// Decodes a block interior as a YAML mapping of schema fields.
fn parse_interior(interior: &str) -> Option<Map<String, Value>> {
  let document = crate::yaml::parse(interior).ok()?;
  match document.root?.to_json_value() {
    Value::Object(map) => Some(map),
    _ => None,
  }
}

/// Applies only the root-eligible subset of a decoded mapping.
fn root_subset(map: &Map<String, Value>) -> SchemaObject {
  let mut object = SchemaObject::default();
  for (key, value) in map {
    if ROOT_KEYS.contains(&key.as_str()) || key.starts_with("x-") {
      values::apply_key(&mut object, key, value);
    }
  }
  object
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{
    annotate::Requiredness,
    schema::{InstanceType, Schema},
    yaml::parse,
  };

  fn entries(source: &str) -> Vec<MappingEntry> {
    parse(source).unwrap().root.unwrap().as_mapping().unwrap().to_vec()
  }

  fn fresh() -> Box<dyn Annotator> {
    HelmSchema::new().for_content("").unwrap()
  }

  #[test]
  fn block_fields_assign_draft7_keywords() {
    let source = "# @schema\n# type: integer\n# minimum: 1\n# @schema\nreplicas: 3\n";
    let annotator = fresh();
    let result = annotator.annotate(&entries(source)[0], "replicas").unwrap();
    let schema = result.schema.unwrap();
    assert!(schema.has_type(InstanceType::Integer));
    assert_eq!(schema.minimum, Some(serde_json::Number::from(1)));
  }

  #[test]
  fn no_block_means_no_opinion() {
    let source = "# plain comment\nreplicas: 3\n";
    assert!(fresh().annotate(&entries(source)[0], "replicas").is_none());
  }

  #[test]
  fn empty_block_still_produces_an_envelope() {
    let source = "# @schema\n# @schema\nval: 1\n";
    let result = fresh().annotate(&entries(source)[0], "val").unwrap();
    assert!(result.schema.is_some());
  }

  #[test]
  fn inline_form_is_not_a_delimiter() {
    let source = "# @schema type:string\nval: 1\n";
    assert!(fresh().annotate(&entries(source)[0], "val").is_none());
  }

  #[test]
  fn required_bool_feeds_the_tristate() {
    let source = "# @schema\n# required: true\n# @schema\nval: 1\n";
    let result = fresh().annotate(&entries(source)[0], "val").unwrap();
    assert_eq!(result.required, Requiredness::Required);
  }

  #[test]
  fn double_hash_form_is_accepted() {
    let source = "## @schema\n## type: string\n## @schema\nval: x\n";
    let result = fresh().annotate(&entries(source)[0], "val").unwrap();
    assert!(result.schema.unwrap().has_type(InstanceType::String));
  }

  #[test]
  fn description_falls_back_to_prose_outside_blocks() {
    let source = "# The replica count\n# @schema\n# type: integer\n# @schema\nreplicas: 3\n";
    let result = fresh().annotate(&entries(source)[0], "replicas").unwrap();
    assert_eq!(result.schema.unwrap().description.as_deref(), Some("The replica count"));
  }

  #[test]
  fn malformed_block_degrades_to_an_empty_schema() {
    let source = "# @schema\n# [broken\n# @schema\nval: 1\n";
    let result = fresh().annotate(&entries(source)[0], "val").unwrap();
    assert_eq!(result.schema.unwrap().types, None);
  }

  #[test]
  fn root_block_applies_only_on_the_first_key() {
    let source = "# @schema.root\n# title: Chart\n# x-owner: infra\n# @schema.root\nfirst: 1\nsecond: 2\n";
    let annotator = fresh();
    let all = entries(source);
    annotator.annotate(&all[0], "first");
    let root = annotator.root_schema().unwrap();
    assert_eq!(root.title.as_deref(), Some("Chart"));
    assert_eq!(root.extra["x-owner"], json!("infra"));
  }

  #[test]
  fn root_block_on_a_later_key_is_ignored() {
    let source = "plain: 1\n# @schema.root\n# title: Late\n# @schema.root\nsecond: 2\n";
    let annotator = fresh();
    let all = entries(source);
    annotator.annotate(&all[0], "plain");
    annotator.annotate(&all[1], "second");
    assert!(annotator.root_schema().is_none());
  }

  #[test]
  fn root_subset_filters_non_root_fields() {
    let map = json!({"title": "T", "type": "object", "minimum": 3, "readOnly": true});
    let root = root_subset(map.as_object().unwrap());
    assert_eq!(root.title.as_deref(), Some("T"));
    assert_eq!(root.types, None);
    assert_eq!(root.minimum, None);
    assert_eq!(root.read_only, Some(true));
  }

  #[test]
  fn const_null_is_preserved() {
    let source = "# @schema\n# const: null\n# @schema\nval: x\n";
    let result = fresh().annotate(&entries(source)[0], "val").unwrap();
    let schema = result.schema.unwrap();
    assert_eq!(schema.const_value, Some(Value::Null));
    assert_eq!(
      serde_json::to_value(Schema::from(schema.clone())).unwrap()["const"],
      Value::Null
    );
  }
}
