//! Derived package model: transforms expanded from the configuration and the
//! groupings folded over them.

pub mod resolve;
pub mod transform;

pub use resolve::{
    EntityCategory, SetResolution, TransformSet, resolve_categories, resolve_sets,
};
pub use transform::{Transform, expand_transforms};
