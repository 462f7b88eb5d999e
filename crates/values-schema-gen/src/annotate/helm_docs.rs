//! helm-docs comment grammar, both generations.
//!
//! New style puts `# -- description` in the head comment of the pair it
//! documents. Old style writes `# key.path -- description` anywhere in the
//! file; those are collected by a pre-scan into a map keyed by path. Both
//! feed the same block parser, which also understands `@raw`, `@default`,
//! `@notationType`, `@section` and `@ignore` lines. When several `# --`
//! groups pile up in one block only the last group counts, but a `@default`
//! given before it still applies if the last group has none.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use super::{AnnotationResult, Annotator};
use crate::{
  schema::{InstanceType, SchemaObject, TypeSet},
  yaml::MappingEntry,
};

static DESC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s*(.*)\s+--\s*(.*)$").unwrap());
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\((.*?)\)\s*(.*)$").unwrap());
static CONT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#(\s?)(.*)$").unwrap());
static RAW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s+@raw").unwrap());
static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*# @default -- (.*)$").unwrap());
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*# @section -- (.*)$").unwrap());
static NOTATION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*#\s+@notationType\s+--\s+(.*)$").unwrap());

/// Keys that are annotation keywords, never value paths.
const KEYWORDS: &[&str] = &["@section", "@notationType", "@default", "@raw", "@ignore"];

#[derive(Debug, Clone, Default)]
struct DocEntry {
  key: String,
  description: String,
  type_hint: Option<String>,
  default: Option<String>,
  skip: bool,
}

/// The helm-docs (norwoodj) grammar.
#[derive(Debug, Default)]
pub struct HelmDocs {
  entries: HashMap<String, DocEntry>,
}

impl HelmDocs {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl Annotator for HelmDocs {
  fn name(&self) -> &'static str {
    "helm-docs"
  }

  fn for_content(&self, content: &str) -> anyhow::Result<Box<dyn Annotator>> {
    fn store(lines: &[&str], entries: &mut HashMap<String, DocEntry>) {
      let entry = parse_comment_block(lines);
      if !entry.key.is_empty() {
        entries.insert(entry.key.clone(), entry);
      }
    }

    let mut entries = HashMap::new();
    let mut block: Option<Vec<&str>> = None;

    for line in content.lines() {
      match block.take() {
        None => {
          if let Some(captures) = DESC_RE.captures(line) {
            let key = captures[1].trim();
            if !key.is_empty() && !KEYWORDS.contains(&key) {
              block = Some(vec![line]);
            }
          }
        }
        Some(mut lines) => {
          if CONT_RE.is_match(line) {
            lines.push(line);
            block = Some(lines);
          } else {
            store(&lines, &mut entries);
          }
        }
      }
    }
    // a file ending mid-block still contributes its trailing entry
    if let Some(lines) = block {
      store(&lines, &mut entries);
    }

    Ok(Box::new(HelmDocs { entries }))
  }

  fn annotate(&self, entry: &MappingEntry, key_path: &str) -> Option<AnnotationResult> {
    let comment = entry.comment_text();
    if comment.contains("@ignore") {
      return Some(AnnotationResult::skipped());
    }

    let head = entry.key.head_comment.as_deref().unwrap_or_default();
    let head_lines: Vec<&str> = head.lines().collect();

    let mut doc: Option<DocEntry> = None;
    if head_lines.iter().any(|line| line.trim_start().starts_with("# --")) {
      let parsed = parse_comment_block(&head_lines);
      // a non-empty key means an old-style form is embedded here; that
      // belongs to whatever path it names, not to this pair
      if parsed.key.is_empty() {
        doc = Some(parsed);
      }
    } else if let Some(captures) = head_lines.iter().rev().find_map(|line| DEFAULT_RE.captures(line)) {
      doc = Some(DocEntry {
        default: Some(captures[1].to_string()),
        ..DocEntry::default()
      });
    }

    let doc = match doc {
      Some(doc) => doc,
      None => self.entries.get(key_path).cloned()?,
    };

    if doc.skip {
      return Some(AnnotationResult::skipped());
    }

    let mut schema = SchemaObject::default();
    if !doc.description.is_empty() {
      schema.description = Some(doc.description);
    }
    if let Some(hint) = doc.type_hint.as_deref() {
      schema.types = map_type_hint(hint).map(TypeSet::Single);
    }
    if let Some(raw) = doc.default.as_deref() {
      schema.default = Some(default_from_raw(raw));
    }
    Some(AnnotationResult::with_schema(schema))
  }
}

/// Parses one block of comment lines into a documentation entry.
fn parse_comment_block(lines: &[&str]) -> DocEntry {
  let prefix_default = lines
    .iter()
    .rev()
    .find_map(|line| DEFAULT_RE.captures(line))
    .map(|captures| captures[1].to_string());

  // only the last `# --` group counts; an earlier @default still applies
  // when that group has none of its own
  if let Some(last_group) = lines.iter().rposition(|line| line.trim_start().starts_with("# --"))
    && last_group > 0
  {
    let mut entry = parse_comment_block(&lines[last_group..]);
    if entry.default.is_none() {
      entry.default = prefix_default;
    }
    return entry;
  }

  let Some((first, captures)) = lines
    .iter()
    .enumerate()
    .find_map(|(index, line)| DESC_RE.captures(line).map(|captures| (index, captures)))
  else {
    return DocEntry::default();
  };
  let mut entry = DocEntry {
    key: captures[1].trim().to_string(),
    ..DocEntry::default()
  };
  let mut description = captures[2].to_string();
  let hint = TYPE_RE
    .captures(&description)
    .map(|type_captures| (type_captures[1].to_string(), type_captures[2].to_string()));
  if let Some((type_hint, rest)) = hint {
    entry.type_hint = Some(type_hint);
    description = rest;
  }

  let mut raw_mode = false;
  for line in &lines[first + 1..] {
    if !raw_mode && RAW_RE.is_match(line) {
      raw_mode = true;
      continue;
    }
    if let Some(captures) = DEFAULT_RE.captures(line) {
      entry.default = Some(captures[1].to_string());
      continue;
    }
    if NOTATION_RE.is_match(line) || SECTION_RE.is_match(line) {
      continue;
    }
    let Some(captures) = CONT_RE.captures(line) else {
      continue;
    };
    let content = captures.get(2).map_or("", |m| m.as_str());
    let stripped = content.trim_start();
    if stripped.starts_with("@ignore") {
      entry.skip = true;
      continue;
    }
    // keep malformed @notationType / @section lines out of the description
    if stripped.starts_with("@notationType") || stripped.starts_with("@section") {
      continue;
    }
    if raw_mode {
      description.push('\n');
    } else {
      description.push(' ');
    }
    description.push_str(content);
  }

  entry.description = description.trim().to_string();
  entry
}

/// helm-docs type hints onto Draft 7 type names; compound hints like
/// `tpl/string` map on their last segment. Unknown hints yield no type.
fn map_type_hint(hint: &str) -> Option<InstanceType> {
  let last = hint.rsplit('/').next().unwrap_or(hint).trim();
  match last {
    "int" | "integer" => Some(InstanceType::Integer),
    "float" | "number" => Some(InstanceType::Number),
    "bool" | "boolean" => Some(InstanceType::Boolean),
    "list" | "array" => Some(InstanceType::Array),
    "object" | "dict" => Some(InstanceType::Object),
    "string" | "tpl" | "yaml" => Some(InstanceType::String),
    _ => None,
  }
}

/// `@default` values are raw JSON; text that is not valid JSON degrades to
/// a JSON string instead of corrupting the output document.
fn default_from_raw(raw: &str) -> Value {
  serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::yaml::parse;

  fn prepared(content: &str) -> Box<dyn Annotator> {
    HelmDocs::new().for_content(content).unwrap()
  }

  fn first_entry(source: &str) -> MappingEntry {
    parse(source).unwrap().root.unwrap().as_mapping().unwrap()[0].clone()
  }

  #[test]
  fn new_style_head_comment_annotates_the_pair() {
    let source = "# -- (int) Number of replicas\nreplicas: 3\n";
    let annotator = prepared(source);
    let result = annotator.annotate(&first_entry(source), "replicas").unwrap();
    let schema = result.schema.unwrap();
    assert_eq!(schema.description.as_deref(), Some("Number of replicas"));
    assert_eq!(schema.types, Some(TypeSet::Single(InstanceType::Integer)));
  }

  #[test]
  fn raw_mode_joins_continuations_with_newlines() {
    let source = "# -- First line\n# @raw\n# line A\n# line B\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.description.as_deref(), Some("First line\nline A\nline B"));
  }

  #[test]
  fn plain_continuations_join_with_spaces() {
    let source = "# -- First line\n# second line\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.description.as_deref(), Some("First line second line"));
  }

  #[test]
  fn old_style_entries_are_file_scoped() {
    let content = "# image.tag -- The image tag\n# (string) typed\nother: 1\n";
    let annotator = prepared(content);
    let result = annotator.annotate(&first_entry("tag: latest\n"), "image.tag").unwrap();
    let schema = result.schema.unwrap();
    assert!(schema.description.as_deref().unwrap().starts_with("The image tag"));
    assert!(annotator.annotate(&first_entry("tag: latest\n"), "image.other").is_none());
  }

  #[test]
  fn trailing_block_at_eof_is_kept() {
    let annotator = prepared("# image.tag -- kept at eof");
    assert!(annotator.annotate(&first_entry("tag: x\n"), "image.tag").is_some());
  }

  #[test]
  fn at_default_overrides_and_later_defaults_win() {
    let source = "# -- desc\n# @default -- 1\n# @default -- {\"a\":2}\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.default, Some(serde_json::json!({"a": 2})));
  }

  #[test]
  fn unparseable_defaults_become_json_strings() {
    let source = "# -- desc\n# @default -- not json\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.default, Some(Value::String("not json".to_string())));
  }

  #[test]
  fn standalone_default_without_description_synthesizes_an_entry() {
    let source = "# @default -- 42\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.default, Some(Value::from(42)));
    assert_eq!(schema.description, None);
  }

  #[test]
  fn at_ignore_skips_the_pair() {
    let source = "# @ignore\nsecret: x\n";
    let annotator = prepared(source);
    assert!(annotator.annotate(&first_entry(source), "secret").unwrap().skip);
  }

  #[test]
  fn last_description_group_wins_but_earlier_default_survives() {
    let source = "# -- stale group\n# @default -- 7\n# -- final group\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.description.as_deref(), Some("final group"));
    assert_eq!(schema.default, Some(Value::from(7)));
  }

  #[test]
  fn notation_and_section_lines_stay_out_of_descriptions() {
    let source = "# -- desc\n# @notationType -- tpl\n# @section -- General\n# @section malformed\n# tail\nval: x\n";
    let annotator = prepared(source);
    let schema = annotator.annotate(&first_entry(source), "val").unwrap().schema.unwrap();
    assert_eq!(schema.description.as_deref(), Some("desc tail"));
  }

  #[test]
  fn type_hints_map_onto_draft7_names() {
    assert_eq!(map_type_hint("int"), Some(InstanceType::Integer));
    assert_eq!(map_type_hint("dict"), Some(InstanceType::Object));
    assert_eq!(map_type_hint("tpl/string"), Some(InstanceType::String));
    assert_eq!(map_type_hint("yaml"), Some(InstanceType::String));
    assert_eq!(map_type_hint("mystery"), None);
  }
}
