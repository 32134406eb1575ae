//! Compile a declarative transform-package configuration into a Maltego
//! configuration archive (`.mtz`) plus a WSGI service stub.

pub mod config;
pub mod error;
pub mod icons;
pub mod ids;
pub mod layout;
pub mod model;
pub mod package;
pub mod render;
pub mod stub;

pub use error::{ConfigError, Error, Result};
