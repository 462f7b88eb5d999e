//! Generation pipeline.
//!
//! Each input runs through: YAML parse, per-annotator preparation, a
//! recursive walk that asks every annotator about every mapping pair and
//! falls back to structural inference, then a union merge across inputs and
//! root stamping. Only YAML parse failures are fatal; everything else
//! degrades with a warning.

pub(crate) mod infer;

use std::collections::HashMap;

use bon::Builder;
use tracing::warn;

use crate::{
  annotate::{self, AnnotationResult, Annotator, Requiredness, merge_results},
  error::{Error, Result},
  schema::{
    InstanceType, Schema, SchemaObject, TypeSet,
    merge::{merge_objects, merge_schemas},
  },
  yaml::{self, MappingEntry, Node, NodeKind},
};

/// The only draft this generator emits.
pub const DRAFT7_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Schema generator over zero or more YAML inputs.
///
/// A single instance walks its inputs sequentially; callers that want
/// concurrent generation create independent instances. The configured
/// annotator prototypes are never mutated; each input gets fresh prepared
/// instances via [`Annotator::for_content`].
#[derive(Builder)]
pub struct Generator {
  /// Annotators in priority order, first highest.
  #[builder(default = annotate::default_annotators())]
  annotators: Vec<Box<dyn Annotator>>,
  #[builder(into)]
  title: Option<String>,
  #[builder(into)]
  description: Option<String>,
  #[builder(into)]
  id: Option<String>,
  /// Deny unknown properties instead of allowing them.
  #[builder(default)]
  strict: bool,
}

impl Generator {
  /// Generates one schema from all inputs, union-merged left to right.
  pub fn generate<S: AsRef<[u8]>>(&self, inputs: &[S]) -> Result<Schema> {
    let mut merged: Option<SchemaObject> = None;
    let mut fragments: Vec<SchemaObject> = Vec::new();

    for input in inputs {
      let (schema, mut input_fragments) = self.generate_one(input.as_ref())?;
      fragments.append(&mut input_fragments);
      merged = Some(match merged {
        None => schema,
        Some(previous) => merge_objects(&previous, &schema),
      });
    }

    let mut root = merged.unwrap_or_default();
    self.stamp_root(&mut root, &fragments);
    Ok(root.into())
  }

  /// Processes a single input: parse, prepare annotators, walk. Returns the
  /// input's schema plus any root fragments its annotators surfaced.
  fn generate_one(&self, bytes: &[u8]) -> Result<(SchemaObject, Vec<SchemaObject>)> {
    let text = std::str::from_utf8(bytes).map_err(|err| Error::InvalidYaml(err.to_string()))?;
    let document = yaml::parse(text)?;
    let Some(body) = document.root else {
      return Ok((SchemaObject::default(), Vec::new()));
    };

    let mut prepared: Vec<Box<dyn Annotator>> = Vec::new();
    for annotator in &self.annotators {
      match annotator.for_content(text) {
        Ok(instance) => prepared.push(instance),
        Err(err) => warn!(annotator = annotator.name(), %err, "annotator preparation failed, skipping"),
      }
    }

    let mut anchors = HashMap::new();
    collect_anchors(&body, &mut anchors);

    let walk = Walk {
      annotators: &prepared,
      anchors,
      strict: self.strict,
    };
    let schema = walk.value_schema(&body, "", true);

    let fragments = prepared.iter().filter_map(|annotator| annotator.root_schema()).collect();
    Ok((schema, fragments))
  }

  /// Applies root metadata to the merged schema: the draft URI, annotator
  /// root fragments (gap-filling only), constructor options (overriding),
  /// and finally a permissive `additionalProperties` for object roots.
  fn stamp_root(&self, root: &mut SchemaObject, fragments: &[SchemaObject]) {
    root.meta_schema = Some(DRAFT7_URI.to_string());

    for fragment in fragments {
      if root.title.is_none() {
        root.title = fragment.title.clone();
      }
      if root.description.is_none() {
        root.description = fragment.description.clone();
      }
      if root.reference.is_none() {
        root.reference = fragment.reference.clone();
      }
      if root.examples.is_empty() {
        root.examples = fragment.examples.clone();
      }
      if root.deprecated.is_none() {
        root.deprecated = fragment.deprecated;
      }
      if root.read_only.is_none() {
        root.read_only = fragment.read_only;
      }
      if root.write_only.is_none() {
        root.write_only = fragment.write_only;
      }
      if root.additional_properties.is_none() {
        root.additional_properties = fragment.additional_properties.clone();
      }
      for (key, value) in &fragment.extra {
        if !root.extra.contains_key(key) {
          root.extra.insert(key.clone(), value.clone());
        }
      }
    }

    if self.title.is_some() {
      root.title = self.title.clone();
    }
    if self.description.is_some() {
      root.description = self.description.clone();
    }
    if self.id.is_some() {
      root.id = self.id.clone();
    }

    let object_like = root.has_type(InstanceType::Object) || !root.properties.is_empty();
    if object_like && root.additional_properties.is_none() {
      root.additional_properties = Some(self.permissive());
    }
  }

  fn permissive(&self) -> Schema {
    if self.strict { Schema::none() } else { Schema::any() }
  }
}

fn collect_anchors<'a>(node: &'a Node, anchors: &mut HashMap<usize, &'a Node>) {
  if let Some(id) = node.anchor {
    anchors.insert(id, node);
  }
  match &node.kind {
    NodeKind::Sequence(items) => {
      for item in items {
        collect_anchors(item, anchors);
      }
    }
    NodeKind::Mapping(entries) => {
      for entry in entries {
        collect_anchors(&entry.key, anchors);
        collect_anchors(&entry.value, anchors);
      }
    }
    _ => {}
  }
}

/// One walk over one input's tree.
struct Walk<'a> {
  annotators: &'a [Box<dyn Annotator>],
  anchors: HashMap<usize, &'a Node>,
  strict: bool,
}

impl<'a> Walk<'a> {
  /// Resolves aliases through the anchor map. An unresolvable alias degrades
  /// to nothing, like a null value.
  fn resolve(&self, node: &'a Node) -> Option<&'a Node> {
    match node.kind {
      NodeKind::Alias(id) => {
        let target = self.anchors.get(&id).copied();
        if target.is_none() {
          warn!(anchor = id, "unresolvable alias, treating as null");
        }
        target
      }
      _ => Some(node),
    }
  }

  fn value_schema(&self, node: &'a Node, path: &str, is_root: bool) -> SchemaObject {
    let Some(node) = self.resolve(node) else {
      return SchemaObject::default();
    };
    match &node.kind {
      NodeKind::Mapping(entries) => self.mapping_schema(entries, path, is_root),
      NodeKind::Sequence(items) => {
        let mut schema = SchemaObject::with_type(InstanceType::Array);
        schema.items = self.sequence_items(items, path);
        schema
      }
      _ => SchemaObject {
        types: infer::infer_type(node).map(TypeSet::Single),
        ..SchemaObject::default()
      },
    }
  }

  /// Object schema for a mapping. Nested mappings default to permissive
  /// `additionalProperties`; the root's is decided during stamping so that
  /// a `@schema.root` block can still claim it.
  fn mapping_schema(&self, entries: &'a [MappingEntry], path: &str, is_root: bool) -> SchemaObject {
    let mut object = SchemaObject::with_type(InstanceType::Object);
    if !is_root {
      object.additional_properties = Some(if self.strict { Schema::none() } else { Schema::any() });
    }
    self.fold_entries(&mut object, entries, path, false);
    object
  }

  /// Walks mapping pairs into `object.properties`, in document order.
  /// `skip_existing` implements merge-key semantics: keys already present
  /// win over merged-in ones.
  fn fold_entries(&self, object: &mut SchemaObject, entries: &'a [MappingEntry], path: &str, skip_existing: bool) {
    for entry in entries {
      if entry.is_merge_key() {
        self.fold_merge_value(object, &entry.value, path);
        continue;
      }
      let Some(key) = entry.key.key_string() else {
        continue;
      };
      if skip_existing && object.properties.contains_key(&key) {
        continue;
      }

      let child_path = if path.is_empty() {
        key.clone()
      } else {
        format!("{path}.{key}")
      };

      let results: Vec<AnnotationResult> = self
        .annotators
        .iter()
        .filter_map(|annotator| annotator.annotate(entry, &child_path))
        .collect();
      let merged = merge_results(results);

      if let Some(result) = &merged
        && result.skip
      {
        continue;
      }
      if let Some(result) = &merged
        && result.required == Requiredness::Required
      {
        object.required.push(key.clone());
      }

      let schema = self.pair_schema(entry, merged.as_ref(), &child_path);
      object.properties.insert(key, schema);
    }
  }

  /// Resolves a `<<` merge value (a mapping, or a sequence of mappings) and
  /// folds its pairs in, skipping keys already present.
  fn fold_merge_value(&self, object: &mut SchemaObject, value: &'a Node, path: &str) {
    let Some(resolved) = self.resolve(value) else {
      return;
    };
    match &resolved.kind {
      NodeKind::Mapping(entries) => self.fold_entries(object, entries, path, true),
      NodeKind::Sequence(items) => {
        for item in items {
          if let Some(target) = self.resolve(item)
            && let NodeKind::Mapping(entries) = &target.kind
          {
            self.fold_entries(object, entries, path, true);
          }
        }
      }
      _ => {}
    }
  }

  /// Schema for one mapping pair: the merged annotation is the basis when it
  /// carries a schema, otherwise structural inference with a comment-derived
  /// description.
  fn pair_schema(&self, entry: &'a MappingEntry, merged: Option<&AnnotationResult>, path: &str) -> Schema {
    let annotated = merged.and_then(|result| result.schema.clone());
    let mut schema = match annotated {
      None => {
        let mut schema = self.value_schema(&entry.value, path, false);
        if schema.description.is_none() {
          schema.description = infer::extract_description(&entry.comment_text());
        }
        schema
      }
      Some(mut schema) => {
        let value = self.resolve(&entry.value);
        if schema.types.is_none()
          && let Some(value) = value
        {
          schema.types = infer::infer_type(value).map(TypeSet::Single);
        }
        if schema.has_type(InstanceType::Object)
          && schema.properties.is_empty()
          && let Some(NodeKind::Mapping(entries)) = value.map(|node| &node.kind)
        {
          let walked = self.mapping_schema(entries, path, false);
          schema.properties = walked.properties;
          if schema.additional_properties.is_none() {
            schema.additional_properties = walked.additional_properties;
          }
          if schema.required.is_empty() {
            schema.required = walked.required;
          }
        }
        if schema.has_type(InstanceType::Array)
          && schema.items.is_none()
          && let Some(NodeKind::Sequence(items)) = value.map(|node| &node.kind)
        {
          schema.items = self.sequence_items(items, path);
        }
        schema
      }
    };

    if let Some(result) = merged {
      if result.merge_properties && !schema.properties.is_empty() {
        let folded = schema
          .properties
          .values()
          .cloned()
          .reduce(|left, right| merge_schemas(&left, &right));
        schema.additional_properties = folded;
        schema.properties.clear();
      }
      if result.skip_properties {
        schema.properties.clear();
      }
    }

    schema.into()
  }

  /// Items schema for a sequence: mappings union-merge element-wise, scalar
  /// elements widen, and a mixed or conflicting sequence has no items
  /// constraint at all.
  fn sequence_items(&self, items: &'a [Node], path: &str) -> Option<Schema> {
    let resolved: Vec<&Node> = items.iter().filter_map(|item| self.resolve(item)).collect();
    if resolved.is_empty() {
      return None;
    }
    if resolved.iter().all(|node| node.is_mapping()) {
      return resolved
        .iter()
        .map(|node| self.value_schema(node, path, false))
        .reduce(|left, right| merge_objects(&left, &right))
        .map(Schema::from);
    }
    if resolved.iter().any(|node| node.is_mapping()) {
      return None;
    }
    infer::widen_element_types(resolved.iter().copied())
      .map(|instance_type| SchemaObject::with_type(instance_type).into())
  }
}
