//! gridpath-engine: minimum-contrast paths across raster images.
//!
//! An image becomes an implicit grid graph: every pixel is a node, and
//! pixels adjacent under the chosen [`Connectivity`] are joined by an edge
//! weighted `max(1, |Δintensity|)`. Dijkstra's algorithm then finds the
//! cheapest route between two pixels, which tends to follow regions of
//! uniform brightness and cross edges only where it must.
//!
//! The building blocks are free functions over a borrowed [`Raster`]:
//!
//! 1. [`RasterStore`] decodes an image and derives its grayscale buffer
//! 2. [`neighbors`] lazily yields `(neighbor, weight)` pairs
//! 3. [`shortest_path`] runs the search
//! 4. [`draw_path`] paints the result onto the color buffer
//!
//! [`Session`] strings these together behind a pick-start, pick-end,
//! solve workflow for interactive front ends.

pub mod annotate;
pub mod config;
pub mod diagnostics;
pub mod neighbors;
pub mod raster;
pub mod search;
pub mod session;
pub mod types;

pub use annotate::draw_path;
pub use config::{EngineConfig, PathColors};
pub use diagnostics::{Clock, SearchDiagnostics, solve_with_diagnostics};
pub use neighbors::{Neighbors, contrast_weight, edge_weight, neighbors};
pub use raster::{Raster, RasterStore};
pub use search::{shortest_path, shortest_path_cancellable};
pub use session::{Selection, Session};
pub use types::{
    Connectivity, Coordinate, EngineError, GrayImage, Metadata, PathResult, Rgb, RgbImage,
};
