use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Zip every file under `src_dir` into `output`, entry names relative to
/// `src_dir`. Returns the number of entries.
///
/// The archive is built next to `output` and moved into place only once it
/// is complete; a previous archive is removed first, never merged.
pub fn write_archive(src_dir: &Path, output: &Path) -> Result<usize> {
    let partial = partial_path(output);
    let entries = match zip_tree(src_dir, &partial) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(Error::archive(&partial, e));
        }
    };

    match fs::remove_file(output) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::archive(output, e)),
    }
    fs::rename(&partial, output).map_err(|e| Error::archive(output, e))?;

    Ok(entries)
}

fn zip_tree(src_dir: &Path, dest: &Path) -> io::Result<usize> {
    if !src_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("staging tree {} does not exist", src_dir.display()),
        ));
    }
    let mut zip = ZipWriter::new(File::create(dest)?);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry_name(src_dir, entry.path())?;
        zip.start_file(name, options).map_err(io::Error::other)?;
        zip.write_all(&fs::read(entry.path())?)?;
        entries += 1;
    }

    zip.finish().map_err(io::Error::other)?;
    Ok(entries)
}

/// Archive entry name: `/`-separated path relative to the staging root.
fn entry_name(root: &Path, path: &Path) -> io::Result<String> {
    let rel = path.strip_prefix(root).map_err(io::Error::other)?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}
