//! Package assembly: one synchronous pass from configuration to archive.
//!
//! 1) resolve the namespace and validate
//! 2) expand transforms, fold sets and categories
//! 3) render and stage every descriptor
//! 4) stage icons when an image processor is available
//! 5) archive the staging tree, then remove it
//!
//! Nothing is archived unless every descriptor was staged. A staging tree is
//! only removed after it has been archived.

pub mod archive;
pub mod staging;

pub use archive::write_archive;
pub use staging::StagingDir;

use crate::config::Configuration;
use crate::error::Result;
use crate::icons::{self, IconProcessor};
use crate::ids::{Namespace, PrefixProvider};
use crate::layout::{self, Layout};
use crate::model::{self, EntityCategory, Transform, TransformSet};
use crate::render;
use chrono::{DateTime, FixedOffset, Local};
use std::path::{Path, PathBuf};

/// Staging directory used when none is given.
pub const DEFAULT_STAGING_DIR: &str = "mtz";

/// Archive written when no output is given.
pub const DEFAULT_ARCHIVE: &str = "config.mtz";

const LAST_SYNC_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

#[derive(Debug, Clone)]
pub struct PackageOptions {
    pub staging_dir: PathBuf,
    pub output: PathBuf,
    /// Server registry sync time; the current local time when unset.
    pub last_sync: Option<DateTime<FixedOffset>>,
    /// Paths the staging tree must never contain, besides `output`.
    pub protect: Vec<PathBuf>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            output: PathBuf::from(DEFAULT_ARCHIVE),
            last_sync: None,
            protect: Vec::new(),
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub prefix: String,
    pub archive: PathBuf,
    pub transforms: Vec<String>,
    pub sets: Vec<String>,
    /// Declared sets that no transform joined; no file was written for them.
    pub empty_sets: Vec<String>,
    pub categories: Vec<String>,
    pub entities: Vec<String>,
    pub machines: Vec<String>,
    pub icons: usize,
    pub files: usize,
}

/// Everything derived from a configuration before any file is written.
#[derive(Debug, Clone)]
pub struct ResolvedPackage<'a> {
    pub config: &'a Configuration,
    pub namespace: Namespace,
    pub transforms: Vec<Transform>,
    pub sets: Vec<TransformSet>,
    pub empty_sets: Vec<String>,
    pub categories: Vec<EntityCategory>,
}

impl<'a> ResolvedPackage<'a> {
    /// Resolve the prefix once, validate, then derive transforms and groupings.
    pub fn resolve(config: &'a Configuration, prefixes: &dyn PrefixProvider) -> Result<Self> {
        let namespace = Namespace::resolve(config, prefixes);
        config.validate(&namespace)?;

        let transforms = model::expand_transforms(config, &namespace);
        let sets = model::resolve_sets(&transforms, &config.transformsets);
        let categories = model::resolve_categories(&config.entities);

        Ok(Self {
            config,
            namespace,
            transforms,
            sets: sets.sets,
            empty_sets: sets.empty_declared,
            categories,
        })
    }

    /// Render and write every descriptor under `layout`. Returns the number
    /// of files written.
    pub fn stage(&self, layout: &Layout, last_sync: &str) -> Result<usize> {
        let mut files = 0;
        let mut put = |path: PathBuf, content: String| -> Result<()> {
            layout::write(&path, &content)?;
            files += 1;
            Ok(())
        };

        for set in &self.sets {
            put(layout.transform_set(&set.name), render::render_transform_set(set))?;
        }
        tracing::debug!(count = self.sets.len(), "staged transform sets");

        let cfg = self.config;
        for (key, machine) in &cfg.machines {
            let id = self.namespace.machine_id(key);
            put(
                layout.machine_properties(&id),
                render::render_machine_properties(machine),
            )?;
            put(
                layout.machine_script(&id),
                render::render_machine_script(&id, key, &cfg.author, machine),
            )?;
        }
        tracing::debug!(count = cfg.machines.len(), "staged machines");

        put(
            layout.server_registry(),
            render::render_server_registry(self.transforms.iter().map(|t| t.id.as_str()), last_sync),
        )?;

        for category in &self.categories {
            put(
                layout.entity_category(&category.name),
                render::render_entity_category(category),
            )?;
        }
        for (key, entity) in &cfg.entities {
            let id = self.namespace.entity_id(key);
            put(layout.entity(&id), render::render_entity(&id, entity))?;
        }
        tracing::debug!(
            categories = self.categories.len(),
            entities = cfg.entities.len(),
            "staged entities"
        );

        for trx in &self.transforms {
            put(
                layout.transform_settings(&trx.id),
                render::render_transform_settings(trx),
            )?;
            put(
                layout.transform_descriptor(&trx.id),
                render::render_transform_descriptor(trx),
            )?;
        }
        tracing::debug!(count = self.transforms.len(), "staged transforms");

        Ok(files)
    }
}

/// Build the package archive described by `config`.
///
/// `icon_processor` resizes icon images; `None` skips icon staging with a
/// warning.
pub fn build_package(
    config: &Configuration,
    prefixes: &dyn PrefixProvider,
    icon_processor: Option<&dyn IconProcessor>,
    options: &PackageOptions,
) -> Result<PackageReport> {
    let resolved = ResolvedPackage::resolve(config, prefixes)?;
    tracing::info!(
        prefix = resolved.namespace.prefix(),
        transforms = resolved.transforms.len(),
        entities = config.entities.len(),
        machines = config.machines.len(),
        "building package"
    );
    for name in &resolved.empty_sets {
        tracing::warn!(set = %name, "transform set has no members; not emitted");
    }

    let last_sync = options
        .last_sync
        .unwrap_or_else(|| Local::now().fixed_offset())
        .format(LAST_SYNC_FORMAT)
        .to_string();

    let protected: Vec<&Path> = std::iter::once(options.output.as_path())
        .chain(options.protect.iter().map(PathBuf::as_path))
        .collect();
    let mut staging = StagingDir::create(&options.staging_dir, &protected)?;
    let mut files = resolved.stage(staging.layout(), &last_sync)?;

    let mut icon_files = 0;
    if !config.icons.is_empty() {
        match icon_processor {
            Some(processor) => {
                icon_files = icons::stage_icons(staging.layout(), &config.icons, processor)?;
                files += icon_files;
            }
            None => tracing::warn!(
                "icons are not supported in this build (enable the `icons` feature); skipping"
            ),
        }
    }

    let entries = write_archive(staging.root(), &options.output)?;
    staging.mark_archived();
    tracing::info!(archive = %options.output.display(), entries, "wrote package");

    if let Err(e) = staging.close() {
        tracing::warn!(error = %e, "failed to remove staging tree");
    }

    Ok(PackageReport {
        prefix: resolved.namespace.prefix().to_string(),
        archive: options.output.clone(),
        transforms: resolved.transforms.iter().map(|t| t.id.clone()).collect(),
        sets: resolved.sets.iter().map(|s| s.name.clone()).collect(),
        empty_sets: resolved.empty_sets,
        categories: resolved.categories.iter().map(|c| c.name.clone()).collect(),
        entities: config
            .entities
            .keys()
            .map(|k| resolved.namespace.entity_id(k))
            .collect(),
        machines: config
            .machines
            .keys()
            .map(|k| resolved.namespace.machine_id(k))
            .collect(),
        icons: icon_files,
        files,
    })
}
