//! Query diagnostics: timing and exploration counts for one search.
//!
//! The engine never reads a wall clock itself. Callers pass a [`Clock`]
//! so the same code runs natively, in tests with a fixed clock, or on
//! targets where `std::time::Instant` is unavailable.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::raster::Raster;
use crate::search::shortest_path;
use crate::types::{Connectivity, Coordinate, EngineError, PathResult};

/// Source of timestamps for diagnostics.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// `Duration` as a plain `f64` second count in JSON.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(seconds).map_err(|e| {
            serde::de::Error::custom(format_args!("invalid search duration {seconds}: {e}"))
        })
    }
}

/// Diagnostics collected from a single shortest-path query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDiagnostics {
    /// Start coordinate.
    pub start: Coordinate,
    /// End coordinate.
    pub end: Coordinate,
    /// Connectivity mode used.
    pub connectivity: Connectivity,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Total graph nodes.
    pub node_count: u64,
    /// Nodes expanded before the search stopped.
    pub visited: usize,
    /// `visited / node_count`, the share of the graph explored.
    pub visited_ratio: f64,
    /// Whether the target was reached.
    pub found: bool,
    /// Number of coordinates in the path.
    pub path_len: usize,
    /// Total path cost.
    pub cost: u64,
    /// Wall-clock duration of the search (seconds).
    #[serde(with = "duration_serde")]
    pub search_duration: Duration,
}

impl SearchDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Search Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} nodes)",
            self.width, self.height, self.node_count,
        ));
        lines.push(format!(
            "Query: {} -> {} ({})",
            self.start,
            self.end,
            self.connectivity.label(),
        ));
        lines.push(format!(
            "Search duration: {:.3}ms",
            duration_ms(self.search_duration),
        ));
        lines.push(String::new());

        if self.found {
            lines.push("Status: path found".to_owned());
        } else {
            lines.push("Status: no path found".to_owned());
        }
        lines.push(format!("{:<16} {}", "Path length", self.path_len));
        lines.push(format!("{:<16} {}", "Cost", self.cost));
        lines.push(format!(
            "{:<16} {} ({:.1}% of graph)",
            "Visited",
            self.visited,
            self.visited_ratio * 100.0,
        ));

        lines.join("\n")
    }
}

/// Run [`shortest_path`] and record diagnostics alongside the result.
///
/// # Errors
///
/// Propagates errors from [`shortest_path`].
pub fn solve_with_diagnostics<C: Clock>(
    raster: &Raster,
    start: Coordinate,
    end: Coordinate,
    mode: Connectivity,
    clock: &C,
) -> Result<(PathResult, SearchDiagnostics), EngineError> {
    let began = clock.now();
    let result = shortest_path(raster, start, end, mode)?;
    let search_duration = clock.elapsed(&began);

    let meta = raster.metadata();
    #[allow(clippy::cast_precision_loss)]
    let visited_ratio = if meta.node_count > 0 {
        result.visited as f64 / meta.node_count as f64
    } else {
        0.0
    };

    let diagnostics = SearchDiagnostics {
        start,
        end,
        connectivity: mode,
        width: meta.width,
        height: meta.height,
        node_count: meta.node_count,
        visited: result.visited,
        visited_ratio,
        found: !result.is_empty(),
        path_len: result.len(),
        cost: result.cost,
        search_duration,
    };
    Ok((result, diagnostics))
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
