use std::io::IsTerminal;

use clap::ValueEnum;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

pub enum Theme {
  Dark,
  Light,
}

/// Semantic role of a piece of terminal output. Every status line is built
/// from these instead of ad-hoc colors, so both themes stay consistent.
#[derive(Debug, Clone, Copy)]
pub enum Role {
  /// The `[HH:MM:SS]` prefix.
  Timestamp,
  /// Progress messages ("Reading values from ...").
  Status,
  /// Summary-line labels ("Properties:").
  Label,
  /// Summary-line values (counts, paths).
  Value,
  /// The final success line.
  Done,
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  /// Resolves a role against the active theme. Named terminal colors only;
  /// the user's palette decides the exact shades.
  pub fn role(&self, role: Role) -> Color {
    if !self.enabled {
      return Color::Reset;
    }

    match (role, &self.theme) {
      (Role::Timestamp, _) => Color::DarkGrey,
      (Role::Status, Theme::Dark) => Color::Cyan,
      (Role::Status, Theme::Light) => Color::DarkBlue,
      (Role::Label, Theme::Dark) => Color::Yellow,
      (Role::Label, Theme::Light) => Color::DarkYellow,
      (Role::Value, Theme::Dark) => Color::White,
      (Role::Value, Theme::Light) => Color::Black,
      (Role::Done, Theme::Dark) => Color::Green,
      (Role::Done, Theme::Light) => Color::DarkGreen,
    }
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

/// `COLORFGBG` is `"<fg>;<bg>"`; backgrounds 7 and 15 are the two standard
/// light entries. Anything else, or no variable at all, reads as dark.
fn detect_terminal_theme() -> Theme {
  let background = std::env::var("COLORFGBG")
    .ok()
    .and_then(|var| var.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()));
  match background {
    Some(7 | 15) => Theme::Light,
    _ => Theme::Dark,
  }
}
