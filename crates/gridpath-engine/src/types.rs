//! Shared types for the gridpath engine.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference the
/// intensity buffer without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can reference the color
/// buffer without depending on `image` directly.
pub use image::RgbImage;

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// A pixel address and graph node identifier.
///
/// Rows grow downwards and columns grow to the right, so `row` indexes
/// the image's `y` axis and `col` its `x` axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Row index (`0..height`).
    pub row: u32,
    /// Column index (`0..width`).
    pub col: u32,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Apply a signed `(d_row, d_col)` offset, returning `None` if the
    /// result would be negative or overflow.
    ///
    /// Upper bounds are not checked here; the caller compares against
    /// the raster dimensions.
    #[must_use]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        let Some(row) = self.row.checked_add_signed(d_row) else {
            return None;
        };
        let Some(col) = self.col.checked_add_signed(d_col) else {
            return None;
        };
        Some(Self { row, col })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which pixels count as adjacent when building the grid graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Up, down, left, right.
    #[default]
    Four,
    /// The four cardinal directions plus the four diagonals.
    Eight,
}

/// `(d_row, d_col)` offsets in neighbor order: up, down, left, right,
/// then up-left, up-right, down-left, down-right.
///
/// The search breaks ties on `(distance, row, col)`, but relaxation order
/// still decides which predecessor wins among equal-cost candidates, so
/// this order is part of the output contract.
const OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

impl Connectivity {
    /// The neighbor offsets for this mode, in fixed order.
    #[must_use]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Four => &OFFSETS[..4],
            Self::Eight => &OFFSETS,
        }
    }

    /// Human-readable label, e.g. `4-connectivity`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Four => "4-connectivity",
            Self::Eight => "8-connectivity",
        }
    }
}

/// Dimensions and graph size of a loaded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of graph nodes (`width * height`).
    pub node_count: u64,
}

impl Metadata {
    /// Build metadata from raster dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            node_count: u64::from(width) * u64::from(height),
        }
    }
}

/// Outcome of a single shortest-path query.
///
/// An empty `path` means the target was not reached. That is a valid
/// result, not an error: `cost` is then 0 and `visited` still reports how
/// much of the graph was explored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Coordinates from start to end, inclusive.
    pub path: Vec<Coordinate>,
    /// Sum of edge weights along `path`.
    pub cost: u64,
    /// Number of nodes popped from the frontier and expanded (or matched
    /// as the target).
    pub visited: usize,
}

impl PathResult {
    /// A result for a target that could not be reached.
    #[must_use]
    pub const fn unreachable(visited: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: 0,
            visited,
        }
    }

    /// Returns `true` if no path was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of coordinates in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }
}

/// Errors produced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The file could not be read or decoded as a supported raster format.
    #[error("failed to decode image {}: {reason}", path.display())]
    Decode {
        /// Path that was being loaded (empty for in-memory input).
        path: PathBuf,
        /// Underlying I/O or codec message.
        reason: String,
    },

    /// The annotated raster could not be written.
    #[error("failed to encode image {}: {reason}", path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O or codec message.
        reason: String,
    },

    /// The input image data was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// `reload` was called before any file was successfully loaded.
    #[error("nothing to reload: no image has been loaded from a file")]
    NoPriorLoad,

    /// A coordinate fell outside the raster.
    #[error("coordinate {coord} is outside the {width}x{height} raster")]
    OutOfBounds {
        /// The offending coordinate.
        coord: Coordinate,
        /// Raster width at the time of the request.
        width: u32,
        /// Raster height at the time of the request.
        height: u32,
    },

    /// An operation needed a raster but none is loaded.
    #[error("no image is loaded")]
    NotLoaded,

    /// `solve` was called before both endpoints were selected.
    #[error("select a start and an end point before solving")]
    SelectionIncomplete,

    /// The search was cancelled through its cancellation flag.
    #[error("search cancelled")]
    Cancelled,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn four_offsets_are_cardinal_in_order() {
        assert_eq!(
            Connectivity::Four.offsets(),
            &[(-1, 0), (1, 0), (0, -1), (0, 1)]
        );
    }

    #[test]
    fn eight_offsets_extend_four() {
        let eight = Connectivity::Eight.offsets();
        assert_eq!(eight.len(), 8);
        assert_eq!(&eight[..4], Connectivity::Four.offsets());
        assert!(eight[4..].iter().all(|&(dr, dc)| dr != 0 && dc != 0));
    }

    #[test]
    fn default_connectivity_is_four() {
        assert_eq!(Connectivity::default(), Connectivity::Four);
    }

    #[test]
    fn connectivity_serializes_lowercase() {
        let json = serde_json::to_string(&Connectivity::Eight).unwrap();
        assert_eq!(json, "\"eight\"");
        let back: Connectivity = serde_json::from_str("\"four\"").unwrap();
        assert_eq!(back, Connectivity::Four);
    }

    #[test]
    fn offset_rejects_negative_results() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(0, -1), None);
        assert_eq!(origin.offset(1, 1), Some(Coordinate::new(1, 1)));
    }

    #[test]
    fn metadata_counts_nodes_without_overflow() {
        let meta = Metadata::new(u32::MAX, 2);
        assert_eq!(meta.node_count, u64::from(u32::MAX) * 2);
    }

    #[test]
    fn out_of_bounds_message_names_coordinate_and_size() {
        let err = EngineError::OutOfBounds {
            coord: Coordinate::new(5, 7),
            width: 3,
            height: 4,
        };
        assert_eq!(err.to_string(), "coordinate (5, 7) is outside the 3x4 raster");
    }

    #[test]
    fn unreachable_result_is_empty_with_zero_cost() {
        let result = PathResult::unreachable(12);
        assert!(result.is_empty());
        assert_eq!(result.cost, 0);
        assert_eq!(result.visited, 12);
    }
}
