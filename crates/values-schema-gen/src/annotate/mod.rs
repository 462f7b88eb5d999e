//! Annotator contract, result envelope and the built-in registry.
//!
//! An annotator parses one comment grammar. The registry holds immutable
//! prototypes; `for_content` returns a fresh instance prepared with
//! file-level state, and the generator runs `annotate` against every mapping
//! pair of that file. Results from multiple annotators merge in priority
//! order (first annotator wins on conflicts).

pub(crate) mod values;

mod bitnami;
mod helm_docs;
mod helm_schema;
mod helm_values;

pub use bitnami::Bitnami;
pub use helm_docs::HelmDocs;
pub use helm_schema::HelmSchema;
pub use helm_values::HelmValues;

use crate::{
  error::{Error, Result},
  schema::SchemaObject,
  yaml::MappingEntry,
};

/// A parser for one comment-annotation grammar.
pub trait Annotator {
  /// Stable identifier used in `--annotators` flag values.
  fn name(&self) -> &'static str;

  /// Returns a fresh instance prepared with file-level state (line-scanned
  /// annotation maps). The receiver itself is never mutated; stateless
  /// annotators return a plain new instance.
  fn for_content(&self, content: &str) -> anyhow::Result<Box<dyn Annotator>>;

  /// Inspects one mapping pair. `None` means this grammar has nothing to say
  /// and structural inference applies.
  fn annotate(&self, entry: &MappingEntry, key_path: &str) -> Option<AnnotationResult>;

  /// Root-level fields parsed from annotator-specific constructs, surfaced
  /// once after the walk. Most annotators have none.
  fn root_schema(&self) -> Option<SchemaObject> {
    None
  }
}

/// Tri-state "required" opinion. `Unset` means the annotator said nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requiredness {
  #[default]
  Unset,
  Required,
  NotRequired,
}

impl Requiredness {
  #[must_use]
  pub fn from_bool(required: bool) -> Self {
    if required {
      Requiredness::Required
    } else {
      Requiredness::NotRequired
    }
  }

  #[must_use]
  pub fn is_set(self) -> bool {
    self != Requiredness::Unset
  }
}

/// Envelope returned by an annotator for one mapping pair.
#[derive(Debug, Clone, Default)]
pub struct AnnotationResult {
  pub schema: Option<SchemaObject>,
  pub required: Requiredness,
  /// Omit this property and its whole subtree.
  pub skip: bool,
  /// Keep the property but drop its children.
  pub skip_properties: bool,
  /// Fold child property schemas into `additionalProperties`.
  pub merge_properties: bool,
}

impl AnnotationResult {
  #[must_use]
  pub fn skipped() -> Self {
    Self {
      skip: true,
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_schema(schema: SchemaObject) -> Self {
    Self {
      schema: Some(schema),
      ..Self::default()
    }
  }
}

/// Merges per-annotator results in priority order: the first schema becomes
/// the base and later ones only fill its gaps, the first explicit required
/// opinion wins, and the cross-cutting flags OR together.
pub(crate) fn merge_results(results: Vec<AnnotationResult>) -> Option<AnnotationResult> {
  if results.is_empty() {
    return None;
  }
  let mut merged = AnnotationResult::default();
  for result in results {
    match (&mut merged.schema, result.schema) {
      (base @ None, Some(schema)) => *base = Some(schema),
      (Some(base), Some(schema)) => base.fill_from(&schema),
      _ => {}
    }
    if !merged.required.is_set() {
      merged.required = result.required;
    }
    merged.skip |= result.skip;
    merged.skip_properties |= result.skip_properties;
    merged.merge_properties |= result.merge_properties;
  }
  Some(merged)
}

/// The built-in annotators in default priority order.
#[must_use]
pub fn default_annotators() -> Vec<Box<dyn Annotator>> {
  vec![
    Box::new(HelmSchema::new()),
    Box::new(HelmValues::new()),
    Box::new(HelmDocs::new()),
    Box::new(Bitnami::new()),
  ]
}

/// Resolves `--annotators` names against the registry, preserving the
/// requested order.
pub fn annotators_by_name(names: &[String]) -> Result<Vec<Box<dyn Annotator>>> {
  names
    .iter()
    .map(|name| match name.as_str() {
      "helm-schema" => Ok(Box::new(HelmSchema::new()) as Box<dyn Annotator>),
      "helm-values-schema" => Ok(Box::new(HelmValues::new()) as Box<dyn Annotator>),
      "helm-docs" => Ok(Box::new(HelmDocs::new()) as Box<dyn Annotator>),
      "bitnami" => Ok(Box::new(Bitnami::new()) as Box<dyn Annotator>),
      unknown => Err(Error::InvalidOption(format!("unknown annotator '{unknown}'"))),
    })
    .collect()
}
