//! Staging tree layout and the single file writer every descriptor goes
//! through.
//!
//! ```text
//! Servers/Local.tas
//! TransformRepositories/Local/<id>.transformsettings
//! TransformRepositories/Local/<id>.transform
//! TransformSets/<set-lowercased>.set
//! EntityCategories/<category-lowercased>.category
//! Entities/<id>.entity
//! Icons/<group>/<name>[24|32|48].<ext>
//! Machines/<id_with_underscores>.properties
//! Machines/<id_with_underscores>.machine
//! ```

use crate::error::{Error, Result};
use crate::ids::machine_file_stem;
use std::fs;
use std::path::{Path, PathBuf};

/// Icon edge lengths staged for every icon. 16 carries no size suffix.
pub const ICON_SIZES: [u32; 4] = [16, 24, 32, 48];

/// Create missing parent directories, then write `content` to `path`,
/// replacing any existing file.
pub fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::stage(parent, e))?;
    }
    fs::write(path, content).map_err(|e| Error::stage(path, e))
}

/// Path templates rooted at one staging directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn server_registry(&self) -> PathBuf {
        self.root.join("Servers").join("Local.tas")
    }

    pub fn transform_settings(&self, id: &str) -> PathBuf {
        self.transform_repo().join(format!("{id}.transformsettings"))
    }

    pub fn transform_descriptor(&self, id: &str) -> PathBuf {
        self.transform_repo().join(format!("{id}.transform"))
    }

    pub fn transform_set(&self, name: &str) -> PathBuf {
        self.root
            .join("TransformSets")
            .join(format!("{}.set", name.to_lowercase()))
    }

    pub fn entity_category(&self, name: &str) -> PathBuf {
        self.root
            .join("EntityCategories")
            .join(format!("{}.category", name.to_lowercase()))
    }

    pub fn entity(&self, id: &str) -> PathBuf {
        self.root.join("Entities").join(format!("{id}.entity"))
    }

    pub fn icon_dir(&self, group: &str) -> PathBuf {
        self.root.join("Icons").join(group)
    }

    /// `ext` is the source file's extension without the dot, if it has one.
    pub fn icon(&self, group: &str, name: &str, ext: Option<&str>, size: u32) -> PathBuf {
        let stem = if size == ICON_SIZES[0] {
            name.to_string()
        } else {
            format!("{name}{size}")
        };
        let file = match ext {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };
        self.icon_dir(group).join(file)
    }

    pub fn machine_properties(&self, id: &str) -> PathBuf {
        self.machines().join(format!("{}.properties", machine_file_stem(id)))
    }

    pub fn machine_script(&self, id: &str) -> PathBuf {
        self.machines().join(format!("{}.machine", machine_file_stem(id)))
    }

    fn transform_repo(&self) -> PathBuf {
        self.root.join("TransformRepositories").join("Local")
    }

    fn machines(&self) -> PathBuf {
        self.root.join("Machines")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_templates() {
        let l = Layout::new("mtz");
        assert_eq!(l.server_registry(), Path::new("mtz/Servers/Local.tas"));
        assert_eq!(
            l.transform_settings("A.Domain2x"),
            Path::new("mtz/TransformRepositories/Local/A.Domain2x.transformsettings")
        );
        assert_eq!(
            l.transform_descriptor("A.Domain2x"),
            Path::new("mtz/TransformRepositories/Local/A.Domain2x.transform")
        );
        assert_eq!(l.transform_set("Network"), Path::new("mtz/TransformSets/network.set"));
        assert_eq!(
            l.entity_category("Infra"),
            Path::new("mtz/EntityCategories/infra.category")
        );
        assert_eq!(l.entity("A.Host"), Path::new("mtz/Entities/A.Host.entity"));
        assert_eq!(
            l.machine_properties("A.sweep"),
            Path::new("mtz/Machines/A_sweep.properties")
        );
        assert_eq!(l.machine_script("A.sweep"), Path::new("mtz/Machines/A_sweep.machine"));
    }

    #[test]
    fn icon_names_carry_size_suffix_except_16() {
        let l = Layout::new("mtz");
        let names: Vec<PathBuf> = ICON_SIZES
            .iter()
            .map(|&s| l.icon("Acme", "host", Some("png"), s))
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("mtz/Icons/Acme/host.png"),
                PathBuf::from("mtz/Icons/Acme/host24.png"),
                PathBuf::from("mtz/Icons/Acme/host32.png"),
                PathBuf::from("mtz/Icons/Acme/host48.png"),
            ]
        );
        assert_eq!(l.icon("Acme", "raw", None, 32), Path::new("mtz/Icons/Acme/raw32"));
    }

    #[test]
    fn write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");

        write(&path, "first").unwrap();
        write(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn write_surfaces_filesystem_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        // A regular file where a directory is needed.
        let err = write(&blocker.join("child.txt"), "x").unwrap_err();
        assert!(matches!(err, Error::Stage { .. }), "{err}");
    }
}
