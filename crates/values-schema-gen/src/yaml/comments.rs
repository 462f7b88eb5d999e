//! Line-oriented comment recovery.
//!
//! The event parser does not surface comments, so they are recovered from
//! the source text and attached to nodes by span line: the contiguous run of
//! comment-only lines directly above a node is its head comment, the
//! trailing `#` on its first line is its inline comment, and a run below it
//! that is closed by a blank line (or EOF) is its foot comment. A run that
//! abuts the next content line belongs to that line instead.

enum LineClass {
  Blank,
  Comment,
  Content,
}

struct LineInfo {
  class: LineClass,
  /// For `Comment` lines the whole line; for `Content` lines the trailing
  /// comment, if any. Raw text including the `#` prefix.
  comment: Option<String>,
}

pub(crate) struct LineTable {
  lines: Vec<LineInfo>,
}

impl LineTable {
  pub(crate) fn new(source: &str) -> Self {
    let lines = source.lines().map(classify).collect();
    Self { lines }
  }

  /// The comment block directly above the given 1-based line.
  pub(crate) fn head_comment(&self, line: usize) -> Option<String> {
    if line < 2 || line > self.lines.len() + 1 {
      return None;
    }
    let mut collected: Vec<&str> = Vec::new();
    for info in self.lines[..line - 1].iter().rev() {
      match info.class {
        LineClass::Comment => collected.push(info.comment.as_deref().unwrap_or_default()),
        _ => break,
      }
    }
    if collected.is_empty() {
      return None;
    }
    collected.reverse();
    Some(collected.join("\n"))
  }

  /// The trailing comment on the given 1-based content line.
  pub(crate) fn inline_comment(&self, line: usize) -> Option<String> {
    let info = self.lines.get(line.checked_sub(1)?)?;
    match info.class {
      LineClass::Content => info.comment.clone(),
      _ => None,
    }
  }

  /// The comment block directly below the given 1-based line, provided the
  /// block is closed by a blank line or the end of input.
  pub(crate) fn foot_comment(&self, line: usize) -> Option<String> {
    let mut collected: Vec<&str> = Vec::new();
    let mut index = line;
    while let Some(info) = self.lines.get(index) {
      match info.class {
        LineClass::Comment => {
          collected.push(info.comment.as_deref().unwrap_or_default());
          index += 1;
        }
        LineClass::Blank => break,
        LineClass::Content => return None,
      }
    }
    if collected.is_empty() {
      None
    } else {
      Some(collected.join("\n"))
    }
  }
}

fn classify(raw: &str) -> LineInfo {
  let line = raw.trim_end_matches('\r');
  let trimmed = line.trim_start();
  if trimmed.is_empty() {
    return LineInfo {
      class: LineClass::Blank,
      comment: None,
    };
  }
  if trimmed.starts_with('#') {
    return LineInfo {
      class: LineClass::Comment,
      comment: Some(line.trim_end().to_string()),
    };
  }
  LineInfo {
    class: LineClass::Content,
    comment: trailing_comment_start(line).map(|at| line[at..].trim_end().to_string()),
  }
}

/// Finds the byte offset of a trailing comment on a content line. A `#`
/// starts a comment only outside quotes and only after whitespace.
fn trailing_comment_start(line: &str) -> Option<usize> {
  let mut in_single = false;
  let mut in_double = false;
  let mut prev_is_space = true;
  for (at, c) in line.char_indices() {
    match c {
      '\'' if !in_double => in_single = !in_single,
      '"' if !in_single => in_double = !in_double,
      '#' if !in_single && !in_double && prev_is_space => return Some(at),
      _ => {}
    }
    prev_is_space = c.is_whitespace();
  }
  None
}
