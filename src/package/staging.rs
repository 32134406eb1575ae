use crate::error::{Error, Result};
use crate::layout::Layout;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scoped staging tree.
///
/// The tree is removed once it has been archived, on `close` or on drop.
/// Until then it stays on disk so a failed build can be inspected.
#[derive(Debug)]
pub struct StagingDir {
    layout: Layout,
    archived: bool,
}

impl StagingDir {
    /// Create an empty staging tree at `root`, clearing leftovers from an
    /// earlier run.
    ///
    /// Clearing deletes `root` recursively, so it is refused when `root` is
    /// or contains the working directory or any of `protected`.
    pub fn create(root: impl Into<PathBuf>, protected: &[&Path]) -> Result<Self> {
        let root = root.into();
        check_root(&root, protected)?;
        match fs::remove_dir_all(&root) {
            Ok(()) => tracing::warn!(path = %root.display(), "cleared stale staging tree"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::stage(&root, e)),
        }
        fs::create_dir_all(&root).map_err(|e| Error::stage(&root, e))?;

        Ok(Self {
            layout: Layout::new(root),
            archived: false,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Mark the tree as archived; it may be removed from here on.
    pub fn mark_archived(&mut self) {
        self.archived = true;
    }

    /// Remove the tree if it was archived, reporting removal errors.
    pub fn close(mut self) -> Result<()> {
        if self.archived {
            self.archived = false;
            fs::remove_dir_all(self.root()).map_err(|e| Error::stage(self.root(), e))?;
        }
        Ok(())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.archived {
            let _ = fs::remove_dir_all(self.layout.root());
        }
    }
}

fn check_root(root: &Path, protected: &[&Path]) -> Result<()> {
    let base = normalize(root);
    let cwd = std::env::current_dir().map_err(|e| Error::stage(root, e))?;
    for conflict in std::iter::once(cwd.as_path()).chain(protected.iter().copied()) {
        if normalize(conflict).starts_with(&base) {
            return Err(Error::StagingRoot {
                path: root.to_path_buf(),
                conflict: conflict.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Absolute form of `path`, with symlinks resolved in the part that exists.
fn normalize(path: &Path) -> PathBuf {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = abs.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut resolved) = fs::canonicalize(existing) {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return abs.clone(),
        }
    }
}
