//! Configuration layer: serde schemas for the package description plus
//! loading and validation.
//!
//! The configuration is the single input of a build. Everything else in the
//! package (ids, sets, categories, descriptors) is derived from it.

pub mod load;
pub mod model;
pub mod validate;

pub use load::load_config;
pub use model::{Configuration, EntitySpec, FieldSpec, MachineSpec, TransformSpec};
