use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the library boundary.
///
/// Only two conditions are fatal to generation itself: input that does not
/// parse as YAML, and an annotator name that is not in the registry. File
/// I/O failures belong to the CLI layer but share this taxonomy so callers
/// see one error type.
#[derive(Debug, Error)]
pub enum Error {
  /// The input could not be parsed as YAML.
  #[error("invalid YAML: {0}")]
  InvalidYaml(String),

  /// A configuration value was rejected (unknown annotator, unsupported draft).
  #[error("invalid option: {0}")]
  InvalidOption(String),

  /// An input file could not be read.
  #[error("failed to read input {path}: {source}")]
  ReadInput {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The output could not be written.
  #[error("failed to write output {path}: {source}")]
  WriteOutput {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
