use serde_json::Value;

/// A node of the parsed YAML tree with its attached comments.
///
/// Lines are 1-based source positions taken from the parser's span markers.
/// Comment text keeps the raw `#` prefixes so annotation grammars can match
/// on the original lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub kind: NodeKind,
  /// Anchor id assigned by the parser when this node carried an `&anchor`.
  pub anchor: Option<usize>,
  pub start_line: usize,
  pub end_line: usize,
  pub head_comment: Option<String>,
  pub inline_comment: Option<String>,
  pub foot_comment: Option<String>,
}

/// Node variants after plain-scalar resolution.
///
/// Tags never affect classification (`!!str 123` is still an `Int`), so they
/// are dropped at load time. Infinity and NaN are ordinary `Float` values.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  /// An unresolved alias, carrying the parser's anchor id.
  Alias(usize),
  Sequence(Vec<Node>),
  Mapping(Vec<MappingEntry>),
}

/// One key/value pair of a mapping, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
  pub key: Node,
  pub value: Node,
}

impl Node {
  pub(crate) fn new(kind: NodeKind, start_line: usize, end_line: usize) -> Self {
    Self {
      kind,
      anchor: None,
      start_line,
      end_line,
      head_comment: None,
      inline_comment: None,
      foot_comment: None,
    }
  }

  #[must_use]
  pub fn is_mapping(&self) -> bool {
    matches!(self.kind, NodeKind::Mapping(_))
  }

  #[must_use]
  pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
    match &self.kind {
      NodeKind::Mapping(entries) => Some(entries),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_sequence(&self) -> Option<&[Node]> {
    match &self.kind {
      NodeKind::Sequence(items) => Some(items),
      _ => None,
    }
  }

  /// Renders a scalar node as a mapping-key string. Non-scalar nodes have no
  /// key rendering and yield `None`.
  #[must_use]
  pub fn key_string(&self) -> Option<String> {
    match &self.kind {
      NodeKind::Str(s) => Some(s.clone()),
      NodeKind::Bool(b) => Some(b.to_string()),
      NodeKind::Int(i) => Some(i.to_string()),
      NodeKind::Float(f) => Some(f.to_string()),
      NodeKind::Null => Some("null".to_string()),
      _ => None,
    }
  }

  /// Converts the subtree into a dynamic JSON value. Floats that have no JSON
  /// representation (NaN, infinities) become `null`; aliases are opaque here
  /// and become `null` as well.
  #[must_use]
  pub fn to_json_value(&self) -> Value {
    match &self.kind {
      NodeKind::Null | NodeKind::Alias(_) => Value::Null,
      NodeKind::Bool(b) => Value::Bool(*b),
      NodeKind::Int(i) => Value::from(*i),
      NodeKind::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
      NodeKind::Str(s) => Value::String(s.clone()),
      NodeKind::Sequence(items) => Value::Array(items.iter().map(Node::to_json_value).collect()),
      NodeKind::Mapping(entries) => {
        let mut map = serde_json::Map::new();
        for entry in entries {
          if let Some(key) = entry.key.key_string() {
            map.insert(key, entry.value.to_json_value());
          }
        }
        Value::Object(map)
      }
    }
  }
}

impl MappingEntry {
  /// True for the YAML merge key `<<`.
  #[must_use]
  pub fn is_merge_key(&self) -> bool {
    matches!(&self.key.kind, NodeKind::Str(s) if s == "<<")
  }

  /// All comment text attached to this pair: head, inline-on-value and
  /// inline-on-key, newline-joined. When key and value share a line their
  /// trailing comment is the same and is only counted once.
  #[must_use]
  pub fn comment_text(&self) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(head) = self.key.head_comment.as_deref() {
      parts.push(head);
    }
    if let Some(inline) = self.value.inline_comment.as_deref() {
      parts.push(inline);
    }
    if self.key.start_line != self.value.start_line
      && let Some(inline) = self.key.inline_comment.as_deref()
    {
      parts.push(inline);
    }
    parts.join("\n")
  }
}

/// Resolves an unquoted scalar to its YAML core-schema kind. Quoted and block
/// scalars never go through this; they are always strings.
pub(crate) fn resolve_plain(text: &str) -> NodeKind {
  match text {
    "" | "~" | "null" | "Null" | "NULL" => return NodeKind::Null,
    "true" | "True" | "TRUE" => return NodeKind::Bool(true),
    "false" | "False" | "FALSE" => return NodeKind::Bool(false),
    ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return NodeKind::Float(f64::INFINITY),
    "-.inf" | "-.Inf" | "-.INF" => return NodeKind::Float(f64::NEG_INFINITY),
    ".nan" | ".NaN" | ".NAN" => return NodeKind::Float(f64::NAN),
    _ => {}
  }

  if let Some(int) = parse_int(text) {
    return NodeKind::Int(int);
  }
  if looks_like_float(text)
    && let Ok(float) = text.parse::<f64>()
  {
    return NodeKind::Float(float);
  }

  NodeKind::Str(text.to_string())
}

fn parse_int(text: &str) -> Option<i64> {
  if let Some(hex) = text.strip_prefix("0x") {
    return i64::from_str_radix(hex, 16).ok();
  }
  if let Some(oct) = text.strip_prefix("0o") {
    return i64::from_str_radix(oct, 8).ok();
  }
  text.parse::<i64>().ok()
}

/// Guards `f64::from_str`, which also accepts words like `inf` and `NaN`
/// that YAML treats as plain strings.
fn looks_like_float(text: &str) -> bool {
  let mut chars = text.chars();
  let Some(first) = chars.next() else {
    return false;
  };
  if !(first.is_ascii_digit() || first == '+' || first == '-' || first == '.') {
    return false;
  }
  text.chars().any(|c| c.is_ascii_digit())
    && text
      .chars()
      .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}
