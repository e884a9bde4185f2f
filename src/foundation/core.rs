use crate::foundation::error::{LampreelError, LampreelResult};

/// Blueprint entity number. Dense, 1-based, assigned by the builders' allocation formulas.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Id `n` places after `self`.
    pub fn offset(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile position of an entity center. Two-tile entities sit on half coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Column coordinate.
    #[serde(serialize_with = "serialize_number")]
    pub x: f64,
    /// Row coordinate (grows downwards).
    #[serde(serialize_with = "serialize_number")]
    pub y: f64,
}

/// Largest magnitude below which every integral `f64` is exactly an `i64`.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Write integral floats as JSON integers (`-827`, not `-827.0`), the way the engine does.
pub fn serialize_number<S: serde::Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && v.abs() < EXACT_INT_LIMIT {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

impl Position {
    /// Build a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same column, `dy` tiles further down.
    pub fn down(self, dy: f64) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }
}

/// Circuit connection point on an entity.
///
/// Combinators expose four: red/green on the input side and red/green on the output side.
/// Single-connector entities (lamps, constant combinators) only use the first two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Pole {
    /// Red wire, input side (or the only side).
    RedIn = 1,
    /// Green wire, input side (or the only side).
    GreenIn = 2,
    /// Red wire, output side.
    RedOut = 3,
    /// Green wire, output side.
    GreenOut = 4,
}

impl From<Pole> for u8 {
    fn from(p: Pole) -> Self {
        p as u8
    }
}

impl TryFrom<u8> for Pole {
    type Error = LampreelError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::RedIn),
            2 => Ok(Self::GreenIn),
            3 => Ok(Self::RedOut),
            4 => Ok(Self::GreenOut),
            other => Err(LampreelError::serde(format!(
                "wire pole must be in 1..=4, got {other}"
            ))),
        }
    }
}

/// Lamp matrix dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSize {
    /// Columns (lamps per row).
    pub width: u32,
    /// Rows (lamps per column).
    pub height: u32,
}

impl GridSize {
    /// Build a grid size; both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> LampreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(LampreelError::validation("grid width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Derive the width from a source aspect ratio at a fixed height, truncating.
    pub fn fit_height(height: u32, src_width: u32, src_height: u32) -> LampreelResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(LampreelError::source_unavailable(
                "source reports zero width or height",
            ));
        }
        let width = u32::try_from(u64::from(height) * u64::from(src_width) / u64::from(src_height))
            .map_err(|_| {
                LampreelError::validation(format!(
                    "a {src_width}x{src_height} source is too wide for {height} rows"
                ))
            })?;
        Self::new(width, height)
    }

    /// Total lamp count.
    pub fn cells(self) -> u32 {
        self.width * self.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
