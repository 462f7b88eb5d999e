//! Bitnami `## @param` / `## @skip` line annotations.
//!
//! The whole file is scanned up front into a map keyed by normalized key
//! path (array indices stripped). Repeated annotations for one path follow
//! last-wins. Section and description markers are recognized first so that
//! `## @section foo` is never parsed as a parameter.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use super::{AnnotationResult, Annotator};
use crate::{
  schema::{InstanceType, SchemaObject, TypeSet},
  yaml::MappingEntry,
};

static IGNORED_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*##\s*@(?:section|descriptionStart|descriptionEnd|extra)\b").unwrap());
static SKIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*##\s*@skip\s+(\S+)").unwrap());
static PARAM_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*##\s*@param\s+(\S+)(?:\s+\[(.*?)\])?\s*(.*)$").unwrap());
static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

#[derive(Debug, Clone)]
enum Entry {
  Skip,
  Param(Param),
}

#[derive(Debug, Clone, Default)]
struct Param {
  description: String,
  instance_type: Option<InstanceType>,
  nullable: bool,
  default: Option<Value>,
}

/// The bitnami readme-generator grammar.
#[derive(Debug, Default)]
pub struct Bitnami {
  entries: HashMap<String, Entry>,
}

impl Bitnami {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl Annotator for Bitnami {
  fn name(&self) -> &'static str {
    "bitnami"
  }

  fn for_content(&self, content: &str) -> anyhow::Result<Box<dyn Annotator>> {
    let mut entries = HashMap::new();
    for line in content.lines() {
      if IGNORED_RE.is_match(line) {
        continue;
      }
      if let Some(captures) = SKIP_RE.captures(line) {
        entries.insert(normalize_key_path(&captures[1]), Entry::Skip);
        continue;
      }
      if let Some(captures) = PARAM_RE.captures(line) {
        let mut param = Param {
          description: captures[3].trim().to_string(),
          ..Param::default()
        };
        if let Some(modifiers) = captures.get(2) {
          apply_modifiers(modifiers.as_str(), &mut param);
        }
        entries.insert(normalize_key_path(&captures[1]), Entry::Param(param));
      }
    }
    Ok(Box::new(Bitnami { entries }))
  }

  fn annotate(&self, _entry: &MappingEntry, key_path: &str) -> Option<AnnotationResult> {
    match self.entries.get(key_path)? {
      Entry::Skip => Some(AnnotationResult::skipped()),
      Entry::Param(param) => {
        let mut schema = SchemaObject::default();
        if !param.description.is_empty() {
          schema.description = Some(param.description.clone());
        }
        schema.types = match (param.instance_type, param.nullable) {
          (Some(instance_type), true) => Some(TypeSet::Multiple(vec![instance_type, InstanceType::Null])),
          (Some(instance_type), false) => Some(TypeSet::Single(instance_type)),
          (None, _) => None,
        };
        schema.default = param.default.clone();
        Some(AnnotationResult::with_schema(schema))
      }
    }
  }
}

/// Strips bracketed array indices: `jobs[0].image` becomes `jobs.image`.
fn normalize_key_path(raw: &str) -> String {
  INDEX_RE.replace_all(raw, "").into_owned()
}

fn apply_modifiers(modifiers: &str, param: &mut Param) {
  for segment in modifiers.split(',') {
    let segment = segment.trim();
    if segment == "nullable" {
      param.nullable = true;
    } else if let Some(raw) = segment.strip_prefix("default:") {
      param.default = Some(parse_default(raw.trim()));
    } else if let Ok(instance_type) = segment.parse::<InstanceType>()
      && instance_type != InstanceType::Null
    {
      param.instance_type = Some(instance_type);
    }
    // anything else is an unknown modifier, dropped silently
  }
}

/// Parses a `default:` modifier value through the YAML parser so `true`,
/// `42` and friends become their native form. Unparseable values degrade to
/// null.
fn parse_default(raw: &str) -> Value {
  match crate::yaml::parse(raw) {
    Ok(document) => document.root.map_or(Value::Null, |node| node.to_json_value()),
    Err(_) => Value::Null,
  }
}
