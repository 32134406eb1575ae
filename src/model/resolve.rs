//! Groupings that are not declared 1:1 but folded over the whole package.
//!
//! Both folds run in two passes: collect every grouping key with its members,
//! then drop the groupings that ended up empty.

use crate::config::EntitySpec;
use crate::model::Transform;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSet {
    pub name: String,
    pub description: String,
    /// Member transform ids in expansion order.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetResolution {
    /// Sets with at least one member, by name.
    pub sets: Vec<TransformSet>,
    /// Sets declared in `transformsets` that no transform joined. No file is
    /// emitted for them.
    pub empty_declared: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCategory {
    pub name: String,
}

/// Group transforms by their `set` field.
///
/// Set files are named `<set-lowercased>.set`, so names that differ only in
/// case are one set with merged members. A declared spelling wins over one
/// used by a transform, otherwise the first spelling seen wins. Descriptions
/// come from `declared`; a set never declared gets an empty description.
pub fn resolve_sets(transforms: &[Transform], declared: &BTreeMap<String, String>) -> SetResolution {
    struct Group {
        name: String,
        description: Option<String>,
        members: Vec<String>,
    }

    // Pass 1: every known set (by lowercased name) -> members.
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    for (name, description) in declared {
        let group = groups.entry(name.to_lowercase()).or_insert_with(|| Group {
            name: name.clone(),
            description: None,
            members: Vec::new(),
        });
        group.description.get_or_insert_with(|| description.clone());
    }
    for trx in transforms.iter().filter(|t| !t.set.is_empty()) {
        groups
            .entry(trx.set.to_lowercase())
            .or_insert_with(|| Group {
                name: trx.set.clone(),
                description: None,
                members: Vec::new(),
            })
            .members
            .push(trx.id.clone());
    }

    // Pass 2: drop empty groups.
    let mut sets = Vec::new();
    let mut empty_declared = Vec::new();
    for group in groups.into_values() {
        if group.members.is_empty() {
            empty_declared.push(group.name);
            continue;
        }
        sets.push(TransformSet {
            name: group.name,
            description: group.description.unwrap_or_default(),
            members: group.members,
        });
    }

    SetResolution {
        sets,
        empty_declared,
    }
}

/// Distinct entity categories in entity key order.
///
/// Categories are written to `<category-lowercased>.category`, so two
/// spellings that differ only in case are one category. The first spelling
/// in entity key order is kept; a later entity's spelling does not replace
/// it.
pub fn resolve_categories(entities: &BTreeMap<String, EntitySpec>) -> Vec<EntityCategory> {
    let mut seen = BTreeSet::new();
    entities
        .values()
        .filter(|e| seen.insert(e.category.to_lowercase()))
        .map(|e| EntityCategory {
            name: e.category.clone(),
        })
        .collect()
}
