//! Lazy neighbor and edge-weight generation for the implicit grid graph.
//!
//! Nothing is materialized: each call to [`neighbors`] returns a fresh
//! iterator that walks the connectivity offsets in fixed order and yields
//! only in-bounds candidates.

use crate::raster::Raster;
use crate::types::{Connectivity, Coordinate};

/// Weight of the edge between two adjacent pixels:
/// `max(1, |intensity(a) - intensity(b)|)`.
///
/// Symmetric, and never zero, so every step has a positive cost.
#[must_use]
pub fn contrast_weight(a: u8, b: u8) -> u32 {
    u32::from(a.abs_diff(b)).max(1)
}

/// Edge weight between two in-bounds coordinates of `raster`.
///
/// Adjacency is not checked; this is the weight the search would use if
/// the two were neighbors.
///
/// # Panics
///
/// Panics if either coordinate is outside the raster.
#[must_use]
pub fn edge_weight(raster: &Raster, a: Coordinate, b: Coordinate) -> u32 {
    contrast_weight(raster.intensity_at(a), raster.intensity_at(b))
}

/// Iterate over the in-bounds neighbors of `coord` under `mode`, paired
/// with their edge weights.
///
/// Order is up, down, left, right, then (for [`Connectivity::Eight`])
/// up-left, up-right, down-left, down-right.
///
/// # Panics
///
/// Panics if `coord` is outside the raster. Use
/// [`RasterStore::neighbors`](crate::RasterStore::neighbors) for a checked
/// version.
#[must_use]
pub fn neighbors(raster: &Raster, coord: Coordinate, mode: Connectivity) -> Neighbors<'_> {
    Neighbors {
        raster,
        origin: coord,
        origin_intensity: raster.intensity_at(coord),
        offsets: mode.offsets().iter(),
    }
}

/// Iterator returned by [`neighbors`].
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    raster: &'a Raster,
    origin: Coordinate,
    origin_intensity: u8,
    offsets: std::slice::Iter<'static, (i32, i32)>,
}

impl Iterator for Neighbors<'_> {
    type Item = (Coordinate, u32);

    fn next(&mut self) -> Option<Self::Item> {
        for &(d_row, d_col) in self.offsets.by_ref() {
            let Some(candidate) = self.origin.offset(d_row, d_col) else {
                continue;
            };
            if !self.raster.contains(candidate) {
                continue;
            }
            let weight = contrast_weight(self.origin_intensity, self.raster.intensity_at(candidate));
            return Some((candidate, weight));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.offsets.len()))
    }
}
