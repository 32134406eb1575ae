//! Identifier derivation.
//!
//! `<prefix>.<EntityLocalName>2<key>` for transforms, `<prefix>.<key>` for
//! entities and machines. The prefix is resolved once per run and every id of
//! that run is derived from the same [`Namespace`].

use crate::config::Configuration;
use rand::Rng;

const PREFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated prefix.
pub const RANDOM_PREFIX_LEN: usize = 6;

/// Source of a namespace prefix when the configuration does not name one.
pub trait PrefixProvider {
    fn prefix(&self) -> String;
}

/// Random uppercase-alphanumeric token; a new one on every call.
#[derive(Debug, Clone, Copy)]
pub struct RandomPrefix {
    pub len: usize,
}

impl Default for RandomPrefix {
    fn default() -> Self {
        Self {
            len: RANDOM_PREFIX_LEN,
        }
    }
}

impl PrefixProvider for RandomPrefix {
    fn prefix(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.len)
            .map(|_| PREFIX_CHARSET[rng.gen_range(0..PREFIX_CHARSET.len())] as char)
            .collect()
    }
}

/// Always the same prefix.
#[derive(Debug, Clone)]
pub struct FixedPrefix(pub String);

impl PrefixProvider for FixedPrefix {
    fn prefix(&self) -> String {
        self.0.clone()
    }
}

/// Resolved namespace for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Use the configured prefix, falling back to `provider` exactly once.
    pub fn resolve(cfg: &Configuration, provider: &dyn PrefixProvider) -> Self {
        match &cfg.prefix {
            Some(p) => Self::new(p.clone()),
            None => Self::new(provider.prefix()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn transform_id(&self, key: &str, entity_type: &str) -> String {
        format!("{}.{}2{}", self.prefix, local_name(entity_type), key)
    }

    pub fn entity_id(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    pub fn machine_id(&self, key: &str) -> String {
        self.entity_id(key)
    }
}

/// Last dot-separated segment of an entity type (`maltego.Domain` -> `Domain`).
pub fn local_name(entity_type: &str) -> &str {
    entity_type.rsplit('.').next().unwrap_or(entity_type)
}

/// Machine files are named after the id with dots replaced by underscores.
pub fn machine_file_stem(machine_id: &str) -> String {
    machine_id.replace('.', "_")
}
