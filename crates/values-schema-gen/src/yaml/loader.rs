//! Event-stream loader.
//!
//! Drives a [`saphyr_parser::Parser`] over the input and folds its events
//! into an owned [`Node`] tree. Only the first document of a stream is
//! materialized; anything after the first document end is never pulled from
//! the parser. Comments are attached afterwards from the source lines.

use saphyr_parser::{Event, Parser, ScalarStyle};

use super::{
  comments::LineTable,
  node::{MappingEntry, Node, NodeKind, resolve_plain},
};
use crate::error::{Error, Result};

/// A parsed YAML document. `root` is `None` for empty or comment-only input.
#[derive(Debug, Clone, Default)]
pub struct Document {
  pub root: Option<Node>,
}

/// Parses the first document of `source` into a comment-annotated tree.
///
/// Empty or whitespace-only input yields an empty document. Malformed input
/// fails with [`Error::InvalidYaml`] carrying the scanner diagnostic.
pub fn parse(source: &str) -> Result<Document> {
  let mut loader = Loader::default();
  let mut parser = Parser::new_from_str(source);

  for item in &mut parser {
    let (event, span) = item.map_err(|err| Error::InvalidYaml(err.to_string()))?;
    let (start_line, end_line) = (span.start.line(), span.end.line());
    match event {
      Event::Nothing | Event::StreamStart | Event::DocumentStart(_) => {}
      Event::StreamEnd | Event::DocumentEnd => break,
      Event::Scalar(value, style, aid, _) => {
        let kind = match style {
          ScalarStyle::Plain => resolve_plain(&value),
          _ => NodeKind::Str(value.into_owned()),
        };
        loader.push_node(Node::new(kind, start_line, end_line), aid);
      }
      Event::Alias(id) => {
        loader.push_node(Node::new(NodeKind::Alias(id), start_line, end_line), 0);
      }
      Event::SequenceStart(aid, _) => loader.stack.push(Frame::sequence(aid, start_line)),
      Event::MappingStart(aid, _) => loader.stack.push(Frame::mapping(aid, start_line)),
      Event::SequenceEnd | Event::MappingEnd => loader.close_collection(),
    }
  }

  let mut root = loader.root;
  if let Some(node) = root.as_mut() {
    attach_comments(node, &LineTable::new(source));
  }
  Ok(Document { root })
}

enum Frame {
  Sequence {
    items: Vec<Node>,
    aid: usize,
    start_line: usize,
  },
  Mapping {
    entries: Vec<MappingEntry>,
    pending_key: Option<Node>,
    aid: usize,
    start_line: usize,
  },
}

impl Frame {
  fn sequence(aid: usize, start_line: usize) -> Self {
    Frame::Sequence {
      items: Vec::new(),
      aid,
      start_line,
    }
  }

  fn mapping(aid: usize, start_line: usize) -> Self {
    Frame::Mapping {
      entries: Vec::new(),
      pending_key: None,
      aid,
      start_line,
    }
  }
}

#[derive(Default)]
struct Loader {
  stack: Vec<Frame>,
  root: Option<Node>,
}

impl Loader {
  fn push_node(&mut self, mut node: Node, aid: usize) {
    if aid != 0 {
      node.anchor = Some(aid);
    }
    match self.stack.last_mut() {
      None => self.root = Some(node),
      Some(Frame::Sequence { items, .. }) => items.push(node),
      Some(Frame::Mapping {
        entries, pending_key, ..
      }) => match pending_key.take() {
        None => *pending_key = Some(node),
        Some(key) => entries.push(MappingEntry { key, value: node }),
      },
    }
  }

  fn close_collection(&mut self) {
    let Some(frame) = self.stack.pop() else {
      return;
    };
    let (node, aid) = match frame {
      Frame::Sequence { items, aid, start_line } => {
        let end_line = items.last().map_or(start_line, |item| item.end_line);
        (Node::new(NodeKind::Sequence(items), start_line, end_line), aid)
      }
      Frame::Mapping {
        entries,
        aid,
        start_line,
        ..
      } => {
        let end_line = entries.last().map_or(start_line, |entry| entry.value.end_line);
        (Node::new(NodeKind::Mapping(entries), start_line, end_line), aid)
      }
    };
    self.push_node(node, aid);
  }
}

fn attach_comments(node: &mut Node, table: &LineTable) {
  node.head_comment = table.head_comment(node.start_line);
  node.inline_comment = table.inline_comment(node.start_line);
  node.foot_comment = table.foot_comment(node.end_line);
  match &mut node.kind {
    NodeKind::Sequence(items) => {
      for item in items {
        attach_comments(item, table);
      }
    }
    NodeKind::Mapping(entries) => {
      for entry in entries {
        attach_comments(&mut entry.key, table);
        attach_comments(&mut entry.value, table);
      }
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn root(source: &str) -> Node {
    parse(source).unwrap().root.expect("document should have a body")
  }

  #[test]
  fn empty_input_is_an_empty_document() {
    assert!(parse("").unwrap().root.is_none());
    assert!(parse("   \n\t\n").unwrap().root.is_none());
  }

  #[test]
  fn malformed_input_is_rejected() {
    assert!(matches!(parse("a: [1, 2").unwrap_err(), Error::InvalidYaml(_)));
  }

  #[test]
  fn scalars_keep_their_resolved_kinds() {
    let node = root("count: 3\nratio: 0.5\nname: web\nempty:\n");
    let entries = node.as_mapping().unwrap();
    assert_eq!(entries[0].value.kind, NodeKind::Int(3));
    assert_eq!(entries[1].value.kind, NodeKind::Float(0.5));
    assert_eq!(entries[2].value.kind, NodeKind::Str("web".to_string()));
    assert_eq!(entries[3].value.kind, NodeKind::Null);
  }

  #[test]
  fn quoted_scalars_are_strings() {
    let node = root("a: \"123\"\nb: 'true'\n");
    let entries = node.as_mapping().unwrap();
    assert_eq!(entries[0].value.kind, NodeKind::Str("123".to_string()));
    assert_eq!(entries[1].value.kind, NodeKind::Str("true".to_string()));
  }

  #[test]
  fn only_the_first_document_is_read() {
    let node = root("first: 1\n---\nsecond: 2\n");
    let entries = node.as_mapping().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key.key_string().as_deref(), Some("first"));
  }

  #[test]
  fn comments_attach_to_pairs() {
    let node = root("# Number of replicas\nreplicas: 3 # tuned\n");
    let entries = node.as_mapping().unwrap();
    assert_eq!(
      entries[0].key.head_comment.as_deref(),
      Some("# Number of replicas")
    );
    assert_eq!(entries[0].value.inline_comment.as_deref(), Some("# tuned"));
  }

  #[test]
  fn anchors_are_recorded_and_aliases_stay_unresolved() {
    let node = root("base: &b\n  a: 1\nother: *b\n");
    let entries = node.as_mapping().unwrap();
    assert_eq!(entries[0].value.anchor, Some(1));
    assert!(matches!(entries[1].value.kind, NodeKind::Alias(1)));
  }

  #[test]
  fn nested_structures_round_trip() {
    let node = root("image:\n  repository: nginx\n  tags:\n    - a\n    - b\n");
    let image = node.as_mapping().unwrap()[0].value.as_mapping().unwrap();
    assert_eq!(image[0].value.kind, NodeKind::Str("nginx".to_string()));
    let tags = image[1].value.as_sequence().unwrap();
    assert_eq!(tags.len(), 2);
  }
}
