//! End-to-end generation tests over the library surface.

use serde_json::{Value, json};
use values_schema_gen::{DRAFT7_URI, Generator};

fn generate(inputs: &[&str]) -> Value {
  let generator = Generator::builder().build();
  serde_json::to_value(generator.generate(inputs).unwrap()).unwrap()
}

#[test]
fn plain_integer_value() {
  let schema = generate(&["replicas: 3\n"]);
  assert_eq!(schema["$schema"], json!(DRAFT7_URI));
  assert_eq!(schema["type"], json!("object"));
  assert_eq!(schema["properties"]["replicas"]["type"], json!("integer"));
  assert_eq!(schema["additionalProperties"], json!(true));
  assert!(schema.get("required").is_none());
}

#[test]
fn head_comment_becomes_the_description() {
  let schema = generate(&["# Number of replicas\nreplicas: 3\n"]);
  assert_eq!(
    schema["properties"]["replicas"]["description"],
    json!("Number of replicas")
  );
}

#[test]
fn bitnami_nullable_param() {
  let schema = generate(&["## @param val [string, nullable] A nullable\nval: \"\"\n"]);
  assert_eq!(schema["properties"]["val"]["type"], json!(["string", "null"]));
  assert_eq!(schema["properties"]["val"]["description"], json!("A nullable"));
}

#[test]
fn union_of_integer_and_float_widens_to_number() {
  let schema = generate(&["val: 1\n", "val: 1.5\n"]);
  assert_eq!(schema["properties"]["val"]["type"], json!("number"));
}

#[test]
fn helm_schema_block_sets_constraints() {
  let schema = generate(&["# @schema\n# type: integer\n# minimum: 1\n# @schema\nreplicas: 3\n"]);
  assert_eq!(schema["properties"]["replicas"]["type"], json!("integer"));
  assert_eq!(schema["properties"]["replicas"]["minimum"], json!(1));
}

#[test]
fn helm_docs_raw_description() {
  let schema = generate(&["# -- First line\n# @raw\n# line A\n# line B\nval: x\n"]);
  assert_eq!(
    schema["properties"]["val"]["description"],
    json!("First line\nline A\nline B")
  );
}

#[test]
fn schema_root_block_survives_a_merge() {
  let first = "# @schema.root\n# title: Chart\n# @schema.root\nfirst: 1\n";
  let second = "name: test\n";
  let schema = generate(&[first, second]);
  assert_eq!(schema["title"], json!("Chart"));
  assert!(schema["properties"].get("first").is_some());
  assert!(schema["properties"].get("name").is_some());
}

#[test]
fn ignored_keys_are_omitted() {
  let schema = generate(&["# @ignore\nsecret: x\nkept: y\n"]);
  assert!(schema["properties"].get("secret").is_none());
  assert!(schema["properties"].get("kept").is_some());
}

#[test]
fn nothing_is_required_without_an_explicit_annotation() {
  let schema = generate(&["a: 1\nb:\n  c: x\n  d: [1, 2]\n"]);
  assert!(schema.get("required").is_none());
  assert!(schema["properties"]["b"].get("required").is_none());
}

#[test]
fn required_true_in_a_block_marks_the_parent_list() {
  let schema = generate(&["image:\n  # @schema\n  # required: true\n  # @schema\n  repository: nginx\n"]);
  assert_eq!(schema["properties"]["image"]["required"], json!(["repository"]));
  assert!(schema.get("required").is_none());
}

#[test]
fn merged_properties_are_a_union() {
  let schema = generate(&["b: 1\nc: 2\n", "a: 3\nb: 4\n"]);
  let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
  assert_eq!(keys, ["b", "c", "a"]);
}

#[test]
fn widening_across_inputs_follows_the_table() {
  // {T, null} -> T
  let schema = generate(&["v: 1\n", "v: null\n"]);
  assert_eq!(schema["properties"]["v"]["type"], json!("integer"));

  // {T, U} distinct -> unset
  let schema = generate(&["v: text\n", "v: true\n"]);
  assert!(schema["properties"]["v"].get("type").is_none());

  // {object, non-object} -> unset, object shape survives
  let schema = generate(&["v:\n  a: 1\n", "v: 3\n"]);
  assert!(schema["properties"]["v"].get("type").is_none());
  assert!(schema["properties"]["v"]["properties"].get("a").is_some());

  // {same, same} -> same
  let schema = generate(&["v: x\n", "v: y\n"]);
  assert_eq!(schema["properties"]["v"]["type"], json!("string"));
}

#[test]
fn strict_mode_denies_additional_properties_at_the_root() {
  let generator = Generator::builder().strict(true).build();
  let schema = serde_json::to_value(generator.generate(&["a: 1\n"]).unwrap()).unwrap();
  assert_eq!(schema["additionalProperties"], json!(false));
}

#[test]
fn annotator_priority_prefers_helm_schema_and_fills_from_bitnami() {
  let input = "\
## @param val [integer] From bitnami
# @schema
# type: string
# @schema
val: x
";
  let schema = generate(&[input]);
  assert_eq!(schema["properties"]["val"]["type"], json!("string"));
  assert_eq!(schema["properties"]["val"]["description"], json!("From bitnami"));
}

#[test]
fn inline_annotations_compose_with_structural_inference() {
  let schema = generate(&["ports: [80, 443] # @schema minItems:1;uniqueItems:true\n"]);
  let ports = &schema["properties"]["ports"];
  assert_eq!(ports["type"], json!("array"));
  assert_eq!(ports["minItems"], json!(1));
  assert_eq!(ports["uniqueItems"], json!(true));
  assert_eq!(ports["items"]["type"], json!("integer"));
}

#[test]
fn skipped_subtrees_never_surface() {
  let input = "## @skip hidden\nhidden:\n  # @schema\n  # type: string\n  # @schema\n  inner: x\nshown: 1\n";
  let schema = generate(&[input]);
  assert!(schema["properties"].get("hidden").is_none());
  assert!(schema["properties"].get("shown").is_some());
}

#[test]
fn defaults_from_annotations_override_values() {
  let input = "## @param size [integer, default: 10] Queue size\nsize: 3\n";
  let schema = generate(&[input]);
  assert_eq!(schema["properties"]["size"]["default"], json!(10));
}

#[test]
fn yaml_values_never_produce_defaults() {
  let schema = generate(&["replicas: 3\n"]);
  assert!(schema["properties"]["replicas"].get("default").is_none());
}

#[test]
fn anchors_and_merge_keys_resolve() {
  let input = "\
common: &common
  cpu: 1
worker:
  <<: *common
  threads: 4
";
  let schema = generate(&[input]);
  let worker = &schema["properties"]["worker"]["properties"];
  assert_eq!(worker["threads"]["type"], json!("integer"));
  assert_eq!(worker["cpu"]["type"], json!("integer"));
}

#[test]
fn invalid_yaml_is_the_only_fatal_input_error() {
  let generator = Generator::builder().build();
  assert!(generator.generate(&["a: [unclosed\n"]).is_err());
  // empty and comment-only inputs are fine
  assert!(generator.generate(&["", "# only a comment\n"]).is_ok());
}

#[test]
fn zero_inputs_still_produce_a_stamped_schema() {
  let schema = generate(&[]);
  assert_eq!(schema["$schema"], json!(DRAFT7_URI));
}
