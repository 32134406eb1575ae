//! Descriptor renderers. Each takes a fully resolved object and returns the
//! text written to the package; none of them touch the filesystem.
//!
//! Descriptors are fixed-shape XML: optional values render as empty strings
//! rather than dropping the attribute.

pub mod entity;
pub mod machine;
pub mod registry;
pub mod transform;

pub use entity::render_entity;
pub use machine::{render_machine_properties, render_machine_script};
pub use registry::{render_entity_category, render_server_registry, render_transform_set};
pub use transform::{render_transform_descriptor, render_transform_settings};

use std::borrow::Cow;

/// Escape a value for use inside an XML attribute or text node.
pub(crate) fn esc(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// XML boolean literal.
pub(crate) fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
