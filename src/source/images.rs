use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{LampreelError, LampreelResult},
    source::frame::{FrameSource, PixelGrid, SourceInfo},
};

const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

pub fn decode_image(bytes: &[u8]) -> LampreelResult<PixelGrid> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_dynamic(dyn_img)
}

/// Load a still picture (cover or sequence frame) as RGB8.
pub fn load_image(path: &Path) -> LampreelResult<PixelGrid> {
    let dyn_img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    from_dynamic(dyn_img)
}

fn from_dynamic(dyn_img: image::DynamicImage) -> LampreelResult<PixelGrid> {
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    PixelGrid::new(width, height, rgb.into_raw())
}

/// Still images in a directory, played in file-name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    info: SourceInfo,
}

impl ImageSequenceSource {
    /// List the directory and read the first image for the sequence dimensions.
    pub fn open(dir: &Path) -> LampreelResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            LampreelError::source_unavailable(format!(
                "cannot read image directory '{}': {e}",
                dir.display()
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.context("list image directory")?.path();
            if path.is_file() && has_still_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let first = paths.first().ok_or_else(|| {
            LampreelError::source_unavailable(format!("no images found in '{}'", dir.display()))
        })?;
        let probe = load_image(first)
            .map_err(|e| LampreelError::source_unavailable(format!("first frame: {e}")))?;

        Ok(Self {
            info: SourceInfo {
                width: probe.width,
                height: probe.height,
                frame_count: paths.len() as u32,
            },
            paths,
            next: 0,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> LampreelResult<Option<PixelGrid>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        load_image(path).map(Some)
    }
}

fn has_still_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| STILL_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/source/images.rs"]
mod tests;
