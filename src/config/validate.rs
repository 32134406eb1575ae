//! Structural checks that must pass before anything is staged.

use crate::config::Configuration;
use crate::error::ConfigError;
use crate::ids::{Namespace, local_name};
use std::collections::{BTreeMap, BTreeSet};

impl Configuration {
    /// Validate against the namespace the run will use.
    ///
    /// Checks:
    /// - at least one transform, each with a `call` and a non-empty `input`
    /// - the prefix is a usable id/file-name segment
    /// - every name that ends up in a staged path is a single path segment
    /// - derived transform ids are unique
    /// - parent chains between package entities terminate
    pub fn validate(&self, ns: &Namespace) -> Result<(), ConfigError> {
        if !is_valid_prefix(ns.prefix()) {
            return Err(ConfigError::InvalidPrefix {
                prefix: ns.prefix().to_string(),
            });
        }

        if self.transforms.is_empty() {
            return Err(ConfigError::NoTransforms);
        }

        self.check_file_names()?;

        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for (key, trx) in &self.transforms {
            if trx.call.trim().is_empty() {
                return Err(ConfigError::MissingCall { key: key.clone() });
            }
            if trx.input.is_empty() {
                return Err(ConfigError::MissingInput { key: key.clone() });
            }
            for entity in &trx.input {
                let id = ns.transform_id(key, entity);
                let origin = format!("{key}/{entity}");
                if let Some(first) = seen.insert(id.clone(), origin.clone()) {
                    return Err(ConfigError::DuplicateTransformId {
                        id,
                        first,
                        second: origin,
                    });
                }
            }
        }

        self.check_parent_chains(ns)
    }

    fn check_file_names(&self) -> Result<(), ConfigError> {
        for (key, trx) in &self.transforms {
            check_segment("transform", key)?;
            for entity in &trx.input {
                check_segment("input entity", local_name(entity))?;
            }
            if !trx.set.is_empty() {
                check_segment("transform set", &trx.set)?;
            }
        }
        for name in self.transformsets.keys() {
            check_segment("transform set", name)?;
        }
        for (key, entity) in &self.entities {
            check_segment("entity", key)?;
            check_segment("category", &entity.category)?;
        }
        for key in self.machines.keys() {
            check_segment("machine", key)?;
        }
        for (group, icons) in &self.icons {
            check_segment("icon group", group)?;
            for name in icons.keys() {
                check_segment("icon", name)?;
            }
        }
        Ok(())
    }

    fn check_parent_chains(&self, ns: &Namespace) -> Result<(), ConfigError> {
        let parents: BTreeMap<String, Option<&str>> = self
            .entities
            .iter()
            .map(|(key, e)| (ns.entity_id(key), e.parent.as_deref()))
            .collect();

        for start in parents.keys() {
            let mut visited = BTreeSet::from([start.as_str()]);
            let mut cur = parents.get(start).copied().flatten();
            while let Some(parent) = cur {
                if !visited.insert(parent) {
                    return Err(ConfigError::ParentCycle {
                        entity: start.clone(),
                    });
                }
                // Parents outside the package end the chain.
                cur = parents.get(parent).copied().flatten();
            }
        }
        Ok(())
    }
}

/// A name joined onto a staging path must not leave its directory.
fn check_segment(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(ConfigError::PathLikeName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
