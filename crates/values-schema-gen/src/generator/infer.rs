//! Structural type inference and comment-derived descriptions.
//!
//! This is the fallback layer: it applies wherever no annotator produced a
//! schema (type from the node variant) or a description (final comment
//! group, with annotation grammar lines filtered out).

use itertools::Itertools;

use crate::{
  schema::{InstanceType, merge::widen_single},
  yaml::{Node, NodeKind},
};

/// Maps a node variant to its Draft 7 type. Null carries no constraint.
pub(crate) fn infer_type(node: &Node) -> Option<InstanceType> {
  match &node.kind {
    NodeKind::Null | NodeKind::Alias(_) => None,
    NodeKind::Bool(_) => Some(InstanceType::Boolean),
    NodeKind::Int(_) => Some(InstanceType::Integer),
    NodeKind::Float(_) => Some(InstanceType::Number),
    NodeKind::Str(_) => Some(InstanceType::String),
    NodeKind::Sequence(_) => Some(InstanceType::Array),
    NodeKind::Mapping(_) => Some(InstanceType::Object),
  }
}

/// Folds the widening table over scalar sequence elements. A conflict drops
/// the constraint for the whole sequence.
pub(crate) fn widen_element_types<'a>(items: impl IntoIterator<Item = &'a Node>) -> Option<InstanceType> {
  let mut folded: Option<InstanceType> = None;
  for item in items {
    let Some(next) = infer_type(item) else {
      continue;
    };
    folded = match folded {
      None => Some(next),
      Some(current) => match widen_single(current, next) {
        Some(widened) => Some(widened),
        None => return None,
      },
    };
  }
  folded
}

/// Strips the comment syntax off a line: leading whitespace, up to two `#`
/// characters, and one following space. Further indentation is preserved.
pub(crate) fn strip_comment_marker(line: &str) -> &str {
  let stripped = line.trim_start();
  let stripped = stripped.strip_prefix('#').unwrap_or(stripped);
  let stripped = stripped.strip_prefix('#').unwrap_or(stripped);
  stripped.strip_prefix(' ').unwrap_or(stripped)
}

const ANNOTATION_MARKERS: &[&str] = &[
  "@schema",
  "@param",
  "@skip",
  "@section",
  "@extra",
  "@descriptionStart",
  "@descriptionEnd",
  "@raw",
  "@ignore",
  "@notationType",
  "@default",
  "-- ",
];

/// True when a stripped comment line belongs to one of the supported
/// annotation grammars rather than to prose.
pub(crate) fn is_annotation_marker(content: &str) -> bool {
  if content == "--" {
    return true;
  }
  if ANNOTATION_MARKERS.iter().any(|marker| content.starts_with(marker)) {
    return true;
  }
  // old-style helm-docs: `key.path -- description`
  content
    .find(" -- ")
    .is_some_and(|at| content[..at].contains('.'))
}

/// Extracts a plain description from attached comment text: keep the final
/// group (after the last empty comment line), drop annotation lines, join
/// with single spaces.
pub(crate) fn extract_description(comment: &str) -> Option<String> {
  let lines: Vec<&str> = comment.lines().collect();
  let mut start = 0;
  for (index, line) in lines.iter().enumerate() {
    if strip_comment_marker(line).trim().is_empty() {
      start = index + 1;
    }
  }
  let description = lines[start..]
    .iter()
    .map(|line| strip_comment_marker(line).trim())
    .filter(|content| !content.is_empty() && !is_annotation_marker(content))
    .join(" ");
  if description.is_empty() { None } else { Some(description) }
}
