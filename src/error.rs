//! Error taxonomy for a package build.
//!
//! Configuration problems are detected before anything is staged. Staging and
//! archive failures carry the path they were working on so the retained
//! staging tree can be inspected.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to stage {}: {source}", path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to process icon {}: {reason}", path.display())]
    Icon { path: PathBuf, reason: String },

    #[error("refusing to stage into {}: it contains {}", path.display(), conflict.display())]
    StagingRoot { path: PathBuf, conflict: PathBuf },

    #[error("failed to write archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn stage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Stage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Archive {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no transforms declared")]
    NoTransforms,

    #[error("transform '{key}' has an empty `call`")]
    MissingCall { key: String },

    #[error("transform '{key}' declares no input entity types")]
    MissingInput { key: String },

    #[error("prefix {prefix:?} must be non-empty and contain only letters, digits, '.', '_' or '-'")]
    InvalidPrefix { prefix: String },

    #[error("transform id '{id}' is derived more than once (from '{first}' and '{second}')")]
    DuplicateTransformId {
        id: String,
        first: String,
        second: String,
    },

    #[error("{kind} name {name:?} cannot be used as a file name")]
    PathLikeName { kind: &'static str, name: String },

    #[error("entity '{entity}' has a cyclic parent chain")]
    ParentCycle { entity: String },

    #[error("unsupported configuration format {extension:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { extension: String },
}
