use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    blueprint::model::signals,
    color::codec::CODES_PER_WORD,
    foundation::core::GridSize,
    foundation::error::{LampreelError, LampreelResult},
    network::layout::NetworkLayout,
    network::storage::{CoverPlan, CoverSlot},
    source::frame::PixelGrid,
    source::images::load_image,
};

/// Data channel letters, in assignment order. Word `k` of a column rides `signal-<POOL[k]>`.
pub const DEFAULT_SIGNAL_LETTERS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y",
];

/// Everything the generator needs besides the frames themselves.
///
/// Every field has a default, so a JSON config file only has to name what it changes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Lamp rows. Must be a multiple of 4; the width follows the source aspect ratio.
    pub height: u32,
    /// Full names of the data signals, one per packed word of a column.
    pub signal_pool: Vec<String>,
    /// Gap between the lamp matrix and the decoder/storage modules.
    pub module_distance: u32,
    /// Storage slots per layer before the bus starts a new one.
    pub layer_size: u32,
    /// Horizontal gap between storage layers.
    pub layer_distance: u32,
    /// Full name of the playback clock signal.
    pub clock_signal: String,
    /// Ticks added to every storage address.
    pub frame_delay: u32,
    pub covers: CoverConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            height: 100,
            signal_pool: DEFAULT_SIGNAL_LETTERS
                .iter()
                .map(|l| signals::letter(l))
                .collect(),
            module_distance: 10,
            layer_size: 500,
            layer_distance: 5,
            clock_signal: signals::HEART.to_string(),
            frame_delay: 0,
            covers: CoverConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> LampreelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            LampreelError::serde(format!("config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> LampreelResult<()> {
        if self.height == 0 || !self.height.is_multiple_of(CODES_PER_WORD) {
            return Err(LampreelError::validation(format!(
                "height must be a positive multiple of {CODES_PER_WORD}, got {}",
                self.height
            )));
        }
        let words = (self.height / CODES_PER_WORD) as usize;
        if self.signal_pool.len() < words {
            return Err(LampreelError::validation(format!(
                "height {} needs {words} data signals, pool has {}",
                self.height,
                self.signal_pool.len()
            )));
        }
        let used = &self.signal_pool[..words];
        for (i, name) in used.iter().enumerate() {
            if used[..i].contains(name) {
                return Err(LampreelError::validation(format!(
                    "data signal '{name}' is listed twice"
                )));
            }
        }
        if self.layer_size == 0 {
            return Err(LampreelError::validation("layer_size must be > 0"));
        }
        if self.clock_signal.is_empty() {
            return Err(LampreelError::validation("clock_signal must not be empty"));
        }
        Ok(())
    }

    /// Layout for a grid derived from this config.
    pub fn layout(&self, grid: GridSize) -> LampreelResult<NetworkLayout> {
        if grid.height != self.height {
            return Err(LampreelError::validation(format!(
                "grid height {} does not match configured height {}",
                grid.height, self.height
            )));
        }
        NetworkLayout::new(
            grid,
            self.module_distance,
            self.layer_size,
            self.layer_distance,
            &self.signal_pool,
            self.clock_signal.clone(),
        )
    }
}

/// Still frames shown before playback starts and after it ends.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverConfig {
    pub show_before: bool,
    pub show_after: bool,
    /// 1-based content frame for the before-cover. Defaults to the first frame.
    pub before_frame: Option<u32>,
    /// 1-based content frame for the after-cover. Defaults to the last frame.
    pub after_frame: Option<u32>,
    /// Picture replacing the before-cover frame.
    pub before_picture: Option<PathBuf>,
    /// Picture replacing the after-cover frame.
    pub after_picture: Option<PathBuf>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            show_before: true,
            show_after: true,
            before_frame: None,
            after_frame: None,
            before_picture: None,
            after_picture: None,
        }
    }
}

impl CoverConfig {
    /// Resolve frame indices against the reported frame count and load the cover pictures.
    ///
    /// Out-of-range indices fall back to the first (before) or last (after) frame and an
    /// unreadable picture falls back to the frame index. Both are logged, never fatal.
    pub fn plan(&self, frame_count: u32) -> CoverPlan {
        let (before_frame, after_frame) = self.resolve(frame_count);
        CoverPlan {
            before: CoverSlot {
                enabled: self.show_before,
                frame_index: before_frame,
                picture: self
                    .before_picture
                    .as_deref()
                    .filter(|_| self.show_before)
                    .and_then(picture_or_warn),
            },
            after: CoverSlot {
                enabled: self.show_after,
                frame_index: after_frame,
                picture: self
                    .after_picture
                    .as_deref()
                    .filter(|_| self.show_after)
                    .and_then(picture_or_warn),
            },
        }
    }

    /// 1-based (before, after) frame indices, clamped into `1..=frame_count`.
    pub fn resolve(&self, frame_count: u32) -> (u32, u32) {
        let in_range = |i: u32| (1..=frame_count).contains(&i);

        let before = match self.before_frame {
            Some(i) if !in_range(i) => {
                tracing::warn!(index = i, frame_count, "before-cover index out of range, using 1");
                1
            }
            Some(i) => i,
            None => 1,
        };
        let last = frame_count.max(1);
        let after = match self.after_frame {
            Some(i) if !in_range(i) => {
                tracing::warn!(
                    index = i,
                    frame_count,
                    "after-cover index out of range, using the last frame"
                );
                last
            }
            Some(i) => i,
            None => last,
        };
        (before, after)
    }
}

/// Load a cover picture at native size.
pub fn load_cover_image(path: &Path) -> LampreelResult<PixelGrid> {
    let picture = load_image(path)?;
    tracing::debug!(
        path = %path.display(),
        width = picture.width,
        height = picture.height,
        "cover picture loaded"
    );
    Ok(picture)
}

fn picture_or_warn(path: &Path) -> Option<PixelGrid> {
    match load_cover_image(path) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cover picture unreadable, using frame");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/config.rs"]
mod tests;
