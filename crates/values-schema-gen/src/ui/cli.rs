use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use super::colors::{ColorMode, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "values-schema-gen")]
#[command(author, version, about = "Best-effort JSON Schema generator for annotated YAML values files")]
pub struct Cli {
  /// YAML input files; multiple inputs union-merge into one schema
  #[arg(
    value_name = "FILE",
    value_hint = ValueHint::AnyPath,
    default_value = "values.yaml",
    display_order = 0
  )]
  pub inputs: Vec<PathBuf>,

  /// Path for the generated schema, or `-` for stdout
  #[arg(
    short,
    long,
    value_name = "FILE",
    value_hint = ValueHint::AnyPath,
    default_value = "values.schema.json",
    display_order = 1,
    help_heading = "Output"
  )]
  pub output: PathBuf,

  /// JSON Schema draft version (only 7 is supported)
  #[arg(long, value_name = "N", default_value_t = 7, display_order = 2, help_heading = "Output")]
  pub draft: u32,

  /// Indentation width of the emitted JSON
  #[arg(long, value_name = "N", default_value_t = 4, display_order = 3, help_heading = "Output")]
  pub indent: usize,

  /// Root schema title
  #[arg(long, value_name = "TEXT", display_order = 10, help_heading = "Root Metadata")]
  pub title: Option<String>,

  /// Root schema description
  #[arg(long, value_name = "TEXT", display_order = 11, help_heading = "Root Metadata")]
  pub description: Option<String>,

  /// Root schema `$id`
  #[arg(long, value_name = "URI", display_order = 12, help_heading = "Root Metadata")]
  pub id: Option<String>,

  /// Comma-separated annotators to run, in priority order
  #[arg(
    long,
    action = ArgAction::Append,
    value_name = "name_1,name_2,...",
    value_delimiter = ',',
    display_order = 20,
    help_heading = "Generation"
  )]
  pub annotators: Option<Vec<String>>,

  /// Deny properties that are not present in the inputs
  #[arg(long, default_value_t = false, display_order = 21, help_heading = "Generation")]
  pub strict: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false, display_order = 100, help_heading = "Terminal Output")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, display_order = 101, help_heading = "Terminal Output")]
  pub quiet: bool,

  /// Coloring
  #[arg(
    long,
    value_enum,
    value_name = "WHEN",
    default_value = "auto",
    display_order = 102,
    help_heading = "Terminal Output"
  )]
  pub color: ColorMode,

  /// Theme
  #[arg(
    long,
    value_enum,
    value_name = "THEME",
    default_value = "auto",
    display_order = 103,
    help_heading = "Terminal Output"
  )]
  pub theme: ThemeMode,
}
