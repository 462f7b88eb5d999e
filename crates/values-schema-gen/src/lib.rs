//! Best-effort JSON Schema (Draft 7) generation for annotated YAML values
//! files.
//!
//! The generator never rejects an input it can parse: unannotated values get
//! structurally inferred schemas, annotations in any of the supported
//! comment grammars refine them, and merging multiple inputs follows union
//! semantics (properties unioned, required intersected, types widened,
//! `additionalProperties` permissive unless both sides constrain it).
//!
//! ## Usage
//!
//! ```no_run
//! use values_schema_gen::Generator;
//!
//! # fn example() -> anyhow::Result<()> {
//! let values = std::fs::read("values.yaml")?;
//! let generator = Generator::builder().title("My Chart").build();
//! let schema = generator.generate(&[values])?;
//! println!("{}", serde_json::to_string_pretty(&schema)?);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod annotate;
pub mod error;
pub mod generator;
pub mod schema;
pub mod ui;
pub mod yaml;

pub use error::Error;
pub use generator::{DRAFT7_URI, Generator};
pub use schema::{Dependency, InstanceType, Schema, SchemaObject, TypeSet};
