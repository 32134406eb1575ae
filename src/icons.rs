//! Icon staging. Image processing sits behind [`IconProcessor`]; the
//! default implementation uses the `image` crate and is only compiled with
//! the `icons` feature.

use crate::error::{Error, Result};
use crate::layout::{ICON_SIZES, Layout};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait IconProcessor {
    /// Write `src` cover-cropped to a `size`x`size` square at `dst`, keeping
    /// the source format.
    fn resize(&self, src: &Path, dst: &Path, size: u32) -> Result<()>;
}

/// The processor available in this build, if any.
pub fn default_processor() -> Option<Box<dyn IconProcessor>> {
    #[cfg(feature = "icons")]
    {
        Some(Box::new(ImageResizer))
    }
    #[cfg(not(feature = "icons"))]
    {
        None
    }
}

/// Stage every configured icon in all sizes. Returns the number of files
/// written.
pub fn stage_icons(
    layout: &Layout,
    icons: &BTreeMap<String, BTreeMap<String, PathBuf>>,
    processor: &dyn IconProcessor,
) -> Result<usize> {
    let mut written = 0;
    for (group, entries) in icons {
        let dir = layout.icon_dir(group);
        std::fs::create_dir_all(&dir).map_err(|e| Error::stage(&dir, e))?;

        for (name, src) in entries {
            let ext = src.extension().and_then(|e| e.to_str());
            for size in ICON_SIZES {
                let dst = layout.icon(group, name, ext, size);
                processor.resize(src, &dst, size)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

#[cfg(feature = "icons")]
pub use resizer::ImageResizer;

#[cfg(feature = "icons")]
mod resizer {
    use super::IconProcessor;
    use crate::error::{Error, Result};
    use image::ImageReader;
    use image::imageops::FilterType;
    use std::path::Path;

    /// `image`-backed processor.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ImageResizer;

    impl IconProcessor for ImageResizer {
        fn resize(&self, src: &Path, dst: &Path, size: u32) -> Result<()> {
            let icon_err = |reason: String| Error::Icon {
                path: src.to_path_buf(),
                reason,
            };

            let reader = ImageReader::open(src)
                .map_err(|e| icon_err(e.to_string()))?
                .with_guessed_format()
                .map_err(|e| icon_err(e.to_string()))?;
            let format = reader
                .format()
                .ok_or_else(|| icon_err("unrecognised image format".to_string()))?;
            let image = reader.decode().map_err(|e| icon_err(e.to_string()))?;

            image
                .resize_to_fill(size, size, FilterType::Lanczos3)
                .save_with_format(dst, format)
                .map_err(|e| icon_err(format!("write {}: {e}", dst.display())))
        }
    }
}
