//! Engine configuration: connectivity and annotation style.

use serde::{Deserialize, Serialize};

use crate::types::{Connectivity, Rgb};

/// Colors used when drawing a path onto the raster.
///
/// The three must stay visually distinct from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathColors {
    /// Interior path pixels.
    pub path: Rgb,
    /// Disc at the first coordinate.
    pub start: Rgb,
    /// Disc at the last coordinate.
    pub end: Rgb,
}

impl PathColors {
    /// Default interior path color (yellow).
    pub const DEFAULT_PATH: Rgb = [255, 220, 0];
    /// Default start marker color (blue).
    pub const DEFAULT_START: Rgb = [0, 0, 255];
    /// Default end marker color (red).
    pub const DEFAULT_END: Rgb = [255, 0, 0];
}

impl Default for PathColors {
    fn default() -> Self {
        Self {
            path: Self::DEFAULT_PATH,
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
        }
    }
}

/// Settings shared by a query and its annotation.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial JSON object such as `{"connectivity": "eight"}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which pixels are adjacent.
    pub connectivity: Connectivity,

    /// Radius in pixels of the start and end marker discs.
    pub marker_radius: u32,

    /// Annotation colors.
    pub colors: PathColors,
}

impl EngineConfig {
    /// Default connectivity mode.
    pub const DEFAULT_CONNECTIVITY: Connectivity = Connectivity::Four;
    /// Default marker disc radius.
    pub const DEFAULT_MARKER_RADIUS: u32 = 4;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            connectivity: Self::DEFAULT_CONNECTIVITY,
            marker_radius: Self::DEFAULT_MARKER_RADIUS,
            colors: PathColors::default(),
        }
    }
}
