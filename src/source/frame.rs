use image::imageops::FilterType;

use crate::{
    color::codec,
    foundation::core::GridSize,
    foundation::error::{LampreelError, LampreelResult},
};

/// Row-major RGB8 pixels, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub rgb8: Vec<u8>,
}

impl PixelGrid {
    /// Wrap raw RGB8 bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, rgb8: Vec<u8>) -> LampreelResult<Self> {
        let expected = width as usize * height as usize * 3;
        if expected == 0 {
            return Err(LampreelError::source_unavailable(
                "pixel grid dimensions must be non-zero",
            ));
        }
        if rgb8.len() != expected {
            return Err(LampreelError::source_unavailable(format!(
                "pixel grid has {} bytes, expected {expected} for {width}x{height}",
                rgb8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgb8,
        })
    }

    /// Solid-color grid.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            rgb8: rgb.repeat(n),
        }
    }

    /// Pixel at `(col, row)`. Panics when out of bounds.
    pub fn pixel(&self, col: u32, row: u32) -> [u8; 3] {
        let off = (row as usize * self.width as usize + col as usize) * 3;
        [self.rgb8[off], self.rgb8[off + 1], self.rgb8[off + 2]]
    }

    /// Bilinear resize to the lamp grid. A grid already at the target size is cloned.
    pub fn resized(&self, size: GridSize) -> LampreelResult<Self> {
        if self.width == size.width && self.height == size.height {
            return Ok(self.clone());
        }
        let img = image::RgbImage::from_raw(self.width, self.height, self.rgb8.clone())
            .ok_or_else(|| LampreelError::generation("pixel buffer does not match dimensions"))?;
        let out = image::imageops::resize(&img, size.width, size.height, FilterType::Triangle);
        Ok(Self {
            width: size.width,
            height: size.height,
            rgb8: out.into_raw(),
        })
    }

    /// The grid as the lamps will show it after R3G3B2 compression.
    pub fn quantized(&self) -> Self {
        let mut rgb8 = Vec::with_capacity(self.rgb8.len());
        for px in self.rgb8.chunks_exact(3) {
            let (r, g, b) = codec::decompress(codec::compress(px[0], px[1], px[2]));
            rgb8.extend_from_slice(&[r, g, b]);
        }
        Self {
            width: self.width,
            height: self.height,
            rgb8,
        }
    }
}

/// Static facts about a frame source, known before the scan starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    /// Native frame width.
    pub width: u32,
    /// Native frame height.
    pub height: u32,
    /// Reported frame count. Containers may over- or under-report; the scan is authoritative.
    pub frame_count: u32,
}

impl SourceInfo {
    /// Reject sources with no frames or zero dimensions.
    pub fn validate(&self) -> LampreelResult<()> {
        if self.frame_count < 1 || self.width < 1 || self.height < 1 {
            return Err(LampreelError::source_unavailable(format!(
                "source reports {} frames at {}x{}",
                self.frame_count, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Sequential frame pull. Frames come out in presentation order; `None` ends the stream.
pub trait FrameSource {
    /// Metadata available before the first frame.
    fn info(&self) -> SourceInfo;

    /// Next frame at native size, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> LampreelResult<Option<PixelGrid>>;
}

/// In-memory source for tests and synthetic clips.
#[derive(Debug, Default)]
pub struct MemoryFrameSource {
    frames: std::collections::VecDeque<PixelGrid>,
    info: Option<SourceInfo>,
}

impl MemoryFrameSource {
    /// Source yielding `frames` in order. Metadata is taken from the first frame.
    pub fn new(frames: Vec<PixelGrid>) -> Self {
        let info = frames.first().map(|f| SourceInfo {
            width: f.width,
            height: f.height,
            frame_count: frames.len() as u32,
        });
        Self {
            frames: frames.into(),
            info,
        }
    }
}

impl FrameSource for MemoryFrameSource {
    fn info(&self) -> SourceInfo {
        self.info.unwrap_or(SourceInfo {
            width: 0,
            height: 0,
            frame_count: 0,
        })
    }

    fn next_frame(&mut self) -> LampreelResult<Option<PixelGrid>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/frame.rs"]
mod tests;
