//! Dijkstra shortest path over the contrast-weighted grid graph.
//!
//! The frontier is a push-only binary heap keyed by
//! `(distance, row, col)`. Improving a node's distance pushes a new entry
//! rather than updating the old one; entries whose distance is worse than
//! the best known are discarded when popped. The secondary keys make the
//! pop order, and therefore the chosen path among equal-cost
//! alternatives, fully deterministic.
//!
//! Distances and predecessors live in flat row-major arrays sized to the
//! raster, so memory is linear in the pixel count and nothing is boxed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::neighbors::neighbors;
use crate::raster::Raster;
use crate::types::{Connectivity, Coordinate, EngineError, PathResult};

/// Distance of a node that has not been reached.
const UNREACHED: u64 = u64::MAX;

/// Predecessor slot of a node with no recorded predecessor.
const NO_PREDECESSOR: usize = usize::MAX;

/// How many accepted pops pass between checks of the cancellation flag.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Frontier entry. Ordering is lexicographic on `(distance, row, col)`;
/// wrapped in [`Reverse`] to turn the max-heap into a min-heap.
type FrontierEntry = Reverse<(u64, u32, u32)>;

/// Find the minimum-cost path from `start` to `end`.
///
/// Stops as soon as `end` is popped from the frontier. If `end` cannot be
/// reached the result has an empty path and zero cost; that is not an
/// error.
///
/// # Errors
///
/// Returns [`EngineError::OutOfBounds`] if `start` or `end` lies outside
/// `raster`.
pub fn shortest_path(
    raster: &Raster,
    start: Coordinate,
    end: Coordinate,
    mode: Connectivity,
) -> Result<PathResult, EngineError> {
    let never = AtomicBool::new(false);
    shortest_path_cancellable(raster, start, end, mode, &never)
}

/// Like [`shortest_path`], but polls `cancel` while searching so a caller
/// on another thread can abandon a long query.
///
/// # Errors
///
/// Returns [`EngineError::OutOfBounds`] if `start` or `end` lies outside
/// `raster`, or [`EngineError::Cancelled`] if `cancel` was observed set.
pub fn shortest_path_cancellable(
    raster: &Raster,
    start: Coordinate,
    end: Coordinate,
    mode: Connectivity,
    cancel: &AtomicBool,
) -> Result<PathResult, EngineError> {
    raster.check(start)?;
    raster.check(end)?;

    let mut distances = vec![UNREACHED; raster.len()];
    let mut predecessors = vec![NO_PREDECESSOR; raster.len()];
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    let mut visited = 0usize;

    distances[raster.index(start)] = 0;
    frontier.push(Reverse((0, start.row, start.col)));

    while let Some(Reverse((dist, row, col))) = frontier.pop() {
        let current = Coordinate::new(row, col);
        let current_idx = raster.index(current);
        if dist > distances[current_idx] {
            continue;
        }

        visited += 1;
        if current == end {
            break;
        }
        if visited % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            tracing::debug!(visited, "search cancelled");
            return Err(EngineError::Cancelled);
        }

        for (next, weight) in neighbors(raster, current, mode) {
            let next_idx = raster.index(next);
            let candidate = dist + u64::from(weight);
            if candidate < distances[next_idx] {
                distances[next_idx] = candidate;
                predecessors[next_idx] = current_idx;
                frontier.push(Reverse((candidate, next.row, next.col)));
            }
        }
    }

    let cost = distances[raster.index(end)];
    if cost == UNREACHED {
        tracing::debug!(%start, %end, visited, "target not reached");
        return Ok(PathResult::unreachable(visited));
    }

    let Some(path) = reconstruct_path(&predecessors, raster.width(), start, end) else {
        tracing::error!(
            %start,
            %end,
            visited,
            "predecessor chain broken before reaching start"
        );
        return Ok(PathResult::unreachable(visited));
    };

    tracing::debug!(
        %start,
        %end,
        ?mode,
        visited,
        cost,
        path_len = path.len(),
        "shortest path found"
    );
    Ok(PathResult {
        path,
        cost,
        visited,
    })
}

/// Walk predecessor links from `end` back to `start` and return the path
/// in start-to-end order.
///
/// Returns `None` if a node without a predecessor is hit before `start`,
/// or if the chain is longer than the grid (a cycle).
fn reconstruct_path(
    predecessors: &[usize],
    width: u32,
    start: Coordinate,
    end: Coordinate,
) -> Option<Vec<Coordinate>> {
    let width = width as usize;
    let to_coord = |idx: usize| -> Option<Coordinate> {
        let row = u32::try_from(idx / width).ok()?;
        let col = u32::try_from(idx % width).ok()?;
        Some(Coordinate::new(row, col))
    };
    let start_idx = start.row as usize * width + start.col as usize;
    let mut current = end.row as usize * width + end.col as usize;

    let mut path = vec![end];
    while current != start_idx {
        let prev = *predecessors.get(current)?;
        if prev == NO_PREDECESSOR || path.len() > predecessors.len() {
            return None;
        }
        path.push(to_coord(prev)?);
        current = prev;
    }
    path.reverse();
    Some(path)
}
