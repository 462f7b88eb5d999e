//! helm-values-schema inline annotations.
//!
//! Single-line grammar: `# @schema type:[string, null];minimum:0`. The line
//! carries content after `@schema`, which is exactly what distinguishes it
//! from a bare block delimiter. Pairs are semicolon-separated, each value
//! parses through the YAML scalar parser, and keys dispatch to the shared
//! Draft 7 assignment table.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{AnnotationResult, Annotator, values};
use crate::{schema::SchemaObject, yaml::MappingEntry};

static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#{1,2}\s*@schema\s+(.+)$").unwrap());

/// The helm-values-schema (losisin) inline grammar.
#[derive(Debug, Default)]
pub struct HelmValues;

impl HelmValues {
  #[must_use]
  pub fn new() -> Self {
    Self
  }
}

impl Annotator for HelmValues {
  fn name(&self) -> &'static str {
    "helm-values-schema"
  }

  fn for_content(&self, _content: &str) -> anyhow::Result<Box<dyn Annotator>> {
    Ok(Box::new(HelmValues::new()))
  }

  fn annotate(&self, entry: &MappingEntry, _key_path: &str) -> Option<AnnotationResult> {
    let comment = entry.comment_text();
    let mut found = false;
    let mut result = AnnotationResult::default();
    let mut schema = SchemaObject::default();

    for line in comment.lines() {
      let Some(captures) = INLINE_RE.captures(line) else {
        continue;
      };
      found = true;
      for pair in captures[1].split(';') {
        let Some((key, raw)) = pair.split_once(':') else {
          continue;
        };
        let value = parse_scalar(raw.trim());
        let opinion = values::apply_key(&mut schema, key.trim(), &value);
        if opinion.is_set() {
          result.required = opinion;
        }
      }
    }

    if !found {
      return None;
    }
    result.schema = Some(schema);
    Some(result)
  }
}

fn parse_scalar(raw: &str) -> Value {
  match crate::yaml::parse(raw) {
    Ok(document) => document.root.map_or(Value::Null, |node| node.to_json_value()),
    Err(_) => Value::String(raw.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    annotate::Requiredness,
    schema::{InstanceType, TypeSet},
    yaml::parse,
  };

  fn first_entry(source: &str) -> MappingEntry {
    parse(source).unwrap().root.unwrap().as_mapping().unwrap()[0].clone()
  }

  fn annotated(source: &str) -> Option<AnnotationResult> {
    HelmValues::new().for_content("").unwrap().annotate(&first_entry(source), "val")
  }

  #[test]
  fn inline_pairs_assign_fields() {
    let result = annotated("# @schema type:[string, null];minLength:1\nval: x\n").unwrap();
    let schema = result.schema.unwrap();
    assert_eq!(
      schema.types,
      Some(TypeSet::Multiple(vec![InstanceType::String, InstanceType::Null]))
    );
    assert_eq!(schema.min_length, Some(1));
  }

  #[test]
  fn trailing_inline_comment_counts_too() {
    let result = annotated("val: x # @schema maxLength:8\n").unwrap();
    assert_eq!(result.schema.unwrap().max_length, Some(8));
  }

  #[test]
  fn required_true_sets_the_tristate() {
    let result = annotated("# @schema required:true;type:string\nval: x\n").unwrap();
    assert_eq!(result.required, Requiredness::Required);
  }

  #[test]
  fn bare_delimiters_do_not_match() {
    assert!(annotated("# @schema\n# type: string\n# @schema\nval: x\n").is_none());
    assert!(annotated("# plain comment\nval: x\n").is_none());
  }

  #[test]
  fn malformed_pairs_are_skipped() {
    let result = annotated("# @schema nocolon;pattern:^a\nval: x\n").unwrap();
    let schema = result.schema.unwrap();
    assert_eq!(schema.pattern.as_deref(), Some("^a"));
  }
}
