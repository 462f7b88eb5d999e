//! Union merge of schemas.
//!
//! Merging follows union semantics throughout: properties are unioned,
//! required keys intersected, types widened, and `additionalProperties`
//! resolves to the true-schema unless both sides constrain it.

use super::{InstanceType, Schema, SchemaObject, TypeSet};

/// Union-merges two schema nodes. The false-schema is the identity (it
/// admits nothing), the true-schema absorbs everything.
pub(crate) fn merge_schemas(a: &Schema, b: &Schema) -> Schema {
  match (a, b) {
    (Schema::Object(x), Schema::Object(y)) => merge_objects(x, y).into(),
    (Schema::Bool(false), other) | (other, Schema::Bool(false)) => other.clone(),
    // at least one side is the true-schema, which absorbs everything
    _ => Schema::any(),
  }
}

/// Union-merges two object schemas, preferring `a`'s metadata where set.
pub(crate) fn merge_objects(a: &SchemaObject, b: &SchemaObject) -> SchemaObject {
  let mut merged = a.clone();
  merged.fill_from(b);

  merged.types = widen(a.types.as_ref(), b.types.as_ref());

  // Properties union: a's order first, b's novel keys appended.
  let mut properties = a.properties.clone();
  for (key, from_b) in &b.properties {
    match properties.get_mut(key) {
      Some(from_a) => *from_a = merge_schemas(from_a, from_b),
      None => {
        properties.insert(key.clone(), from_b.clone());
      }
    }
  }
  merged.properties = properties;

  // Required intersects: a key stays required only if both sides agree.
  merged.required = b
    .required
    .iter()
    .filter(|key| a.required.contains(key))
    .cloned()
    .collect();

  // fail open: an unset side or a true-schema forces the true-schema,
  // otherwise a's constraint is kept
  merged.additional_properties = match (&a.additional_properties, &b.additional_properties) {
    (Some(x), Some(y)) if !x.is_true() && !y.is_true() => Some(x.clone()),
    _ => Some(Schema::any()),
  };

  if let (Some(x), Some(y)) = (&a.items, &b.items) {
    merged.items = Some(merge_schemas(x, y));
  }

  merged
}

/// Widens two type sets per the union table: identical sets survive,
/// integer widens to number, a missing side yields the other, and any other
/// disagreement drops the constraint entirely.
pub(crate) fn widen(a: Option<&TypeSet>, b: Option<&TypeSet>) -> Option<TypeSet> {
  match (a, b) {
    (None, other) | (other, None) => other.cloned(),
    (Some(x), Some(y)) if x == y => Some(x.clone()),
    (Some(x), Some(y)) => match (x.single(), y.single()) {
      (Some(left), Some(right)) => widen_single(left, right).map(TypeSet::Single),
      _ => None,
    },
  }
}

pub(crate) fn widen_single(a: InstanceType, b: InstanceType) -> Option<InstanceType> {
  match (a, b) {
    _ if a == b => Some(a),
    (InstanceType::Integer, InstanceType::Number) | (InstanceType::Number, InstanceType::Integer) => {
      Some(InstanceType::Number)
    }
    _ => None,
  }
}
