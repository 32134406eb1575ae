//! Package configuration as it appears in the YAML/JSON file.
//!
//! YAML shape:
//! ```yaml
//! prefix: ACME                 # optional, random when absent
//! author: ACME Labs
//! script: /opt/acme/trx.py     # optional, defaults to <config stem>.py
//! transforms:
//!   resolve:
//!     input: [maltego.Domain, maltego.IPv4Address]
//!     call: resolve
//!     display: Resolve
//!     set: Network
//! transformsets:
//!   Network: Network lookups
//! entities:
//!   Host:
//!     icon: Acme/host
//!     category: Infrastructure
//!     properties:
//!       fqdn: { display: FQDN, default: localhost }
//! machines:
//!   sweep: { desc: Sweep, instructions: "run(\"ACME.Domain2resolve\")" }
//! icons:
//!   Acme: { host: icons/host.png }
//! ```
//!
//! Every keyed collection is a `BTreeMap`, so iteration follows key order and
//! two runs over the same file walk it identically.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Executable run by the local transform host when no `command` is given.
pub const DEFAULT_COMMAND: &str = "python3";

/// Evaluator attached to a field that has a default but names no evaluator.
pub const DEFAULT_EVALUATOR: &str = "maltego.replace";

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub author: String,

    /// Command line the transform host executes.
    #[serde(default = "default_command")]
    pub command: String,

    /// Transform module passed to `command`; also the module the service
    /// stub imports.
    #[serde(default)]
    pub script: String,

    pub transforms: BTreeMap<String, TransformSpec>,

    #[serde(default)]
    pub entities: BTreeMap<String, EntitySpec>,

    #[serde(default)]
    pub machines: BTreeMap<String, MachineSpec>,

    /// group -> icon name -> source image.
    #[serde(default)]
    pub icons: BTreeMap<String, BTreeMap<String, PathBuf>>,

    /// Set name -> description.
    #[serde(default)]
    pub transformsets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformSpec {
    /// Accepted entity types; one transform is derived per entry.
    pub input: Vec<String>,

    /// Name of the callable that implements the transform.
    pub call: String,

    #[serde(default)]
    pub desc: String,

    #[serde(default)]
    pub display: String,

    #[serde(default)]
    pub set: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    pub icon: String,

    pub category: String,

    /// Defaults to the entity id.
    #[serde(default)]
    pub display: Option<String>,

    #[serde(default)]
    pub desc: String,

    /// Single base entity type.
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, FieldSpec>,

    #[serde(default, rename = "editValue")]
    pub edit_value: Option<String>,

    #[serde(default, rename = "displayValue")]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    #[serde(default = "default_field_type", rename = "type")]
    pub field_type: String,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub readonly: bool,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub sample: String,

    #[serde(default)]
    pub desc: String,

    /// Defaults to the field name.
    #[serde(default)]
    pub display: Option<String>,

    /// Only rendered when `default` is set.
    #[serde(default)]
    pub evaluator: Option<String>,
}

impl FieldSpec {
    /// Evaluator to render, if the field carries a default at all.
    pub fn effective_evaluator(&self) -> Option<&str> {
        self.default
            .as_ref()
            .map(|_| self.evaluator.as_deref().unwrap_or(DEFAULT_EVALUATOR))
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            field_type: default_field_type(),
            nullable: true,
            hidden: false,
            readonly: false,
            default: None,
            sample: String::new(),
            desc: String::new(),
            display: None,
            evaluator: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MachineSpec {
    #[serde(default)]
    pub desc: String,

    /// Machine script body, copied verbatim.
    pub instructions: String,

    #[serde(default)]
    pub favorite: bool,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_field_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}
