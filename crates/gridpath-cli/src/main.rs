//! gridpath: compute a minimum-contrast path between two pixels.
//!
//! Loads an image, runs Dijkstra over its contrast-weighted pixel grid,
//! prints the path cost and search diagnostics, and optionally writes a
//! copy of the image with the path drawn on it.
//!
//! # Usage
//!
//! ```text
//! gridpath [OPTIONS] --from ROW,COL --to ROW,COL <IMAGE_PATH>
//! ```
//!
//! Set `RUST_LOG=gridpath_engine=debug` to see engine events.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use gridpath_engine::{
    Clock, Connectivity, Coordinate, EngineConfig, Metadata, SearchDiagnostics, Session,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Find the cheapest path between two pixels of an image, where each step
/// costs the intensity difference between neighboring pixels.
#[derive(Parser)]
#[command(name = "gridpath", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP).
    image_path: PathBuf,

    /// Start pixel as "ROW,COL".
    #[arg(long, value_name = "ROW,COL", value_parser = parse_coordinate)]
    from: Coordinate,

    /// End pixel as "ROW,COL".
    #[arg(long, value_name = "ROW,COL", value_parser = parse_coordinate)]
    to: Coordinate,

    /// Pixel adjacency.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_MODE)]
    connectivity: Mode,

    /// Radius of the start and end marker discs in the output image.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_MARKER_RADIUS)]
    marker_radius: u32,

    /// Write the image with the path drawn on it (format from extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output diagnostics and the path as JSON instead of a report.
    #[arg(long)]
    json: bool,

    /// Full engine config as a JSON string.
    ///
    /// When provided, `--connectivity` and `--marker-radius` are ignored.
    /// The JSON must be a valid `EngineConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Connectivity selection.
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Up, down, left, right.
    #[value(alias = "4")]
    Four,
    /// Cardinal directions plus diagonals.
    #[value(alias = "8")]
    Eight,
}

/// Maps an engine [`Connectivity`] to the local CLI [`Mode`] enum.
const fn mode_from_engine(c: Connectivity) -> Mode {
    match c {
        Connectivity::Four => Mode::Four,
        Connectivity::Eight => Mode::Eight,
    }
}

/// The CLI default mode, derived from [`EngineConfig::DEFAULT_CONNECTIVITY`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_MODE: Mode = mode_from_engine(EngineConfig::DEFAULT_CONNECTIVITY);

/// Parse `"ROW,COL"` into a [`Coordinate`].
fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (row_str, col_str) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'ROW,COL', got: '{s}'"))?;
    let row: u32 = row_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{row_str}': {e}"))?;
    let col: u32 = col_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{col_str}': {e}"))?;
    Ok(Coordinate::new(row, col))
}

/// Build an [`EngineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<EngineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(EngineConfig {
        connectivity: match cli.connectivity {
            Mode::Four => Connectivity::Four,
            Mode::Eight => Connectivity::Eight,
        },
        marker_radius: cli.marker_radius,
        ..EngineConfig::default()
    })
}

/// Machine-readable output for `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: Metadata,
    diagnostics: &'a SearchDiagnostics,
    path: &'a [Coordinate],
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "resolved configuration");

    let mut session = Session::new(config);
    let metadata = match session.open(&cli.image_path) {
        Ok(meta) => meta,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "Image: {} ({}x{}, {} nodes)",
        cli.image_path.display(),
        metadata.width,
        metadata.height,
        metadata.node_count,
    );

    for point in [cli.from, cli.to] {
        if let Err(e) = session.select(point) {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let (result, diagnostics) = match session.solve_with_diagnostics(&StdClock) {
        Ok(solved) => solved,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        let report = JsonReport {
            metadata,
            diagnostics: &diagnostics,
            path: &result.path,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
    }

    if result.is_empty() {
        eprintln!("No path found from {} to {}.", cli.from, cli.to);
    }

    if let Some(ref output) = cli.output {
        match session.save(output) {
            Ok(()) => eprintln!("Annotated image written to {}", output.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_col() {
        assert_eq!(parse_coordinate("3,7").unwrap(), Coordinate::new(3, 7));
        assert_eq!(parse_coordinate(" 12 , 0 ").unwrap(), Coordinate::new(12, 0));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coordinate("3").is_err());
        assert!(parse_coordinate("a,1").is_err());
        assert!(parse_coordinate("1,-2").is_err());
        assert!(parse_coordinate("").is_err());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "gridpath",
            "img.png",
            "--from",
            "0,0",
            "--to",
            "1,1",
            "--connectivity",
            "four",
            "--config-json",
            r#"{"connectivity":"eight","marker_radius":9}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.connectivity, Connectivity::Eight);
        assert_eq!(config.marker_radius, 9);
    }

    #[test]
    fn numeric_mode_aliases() {
        let cli = Cli::parse_from([
            "gridpath", "img.png", "--from", "0,0", "--to", "1,1", "--connectivity", "8",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.connectivity, Connectivity::Eight);
    }

    #[test]
    fn invalid_config_json_is_reported() {
        let cli = Cli::parse_from([
            "gridpath",
            "img.png",
            "--from",
            "0,0",
            "--to",
            "1,1",
            "--config-json",
            "{not json",
        ]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.contains("--config-json"), "got: {err}");
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
