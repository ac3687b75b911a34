//! Interactive query workflow without a GUI.
//!
//! A [`Session`] owns a [`RasterStore`] and walks through the usual
//! interaction: open an image, pick a start pixel, pick an end pixel,
//! solve, and draw the result. A third pick starts over. Changing the
//! connectivity mode after a start has been picked discards the
//! selection, since the previous pick was made for a different graph.
//!
//! Whenever the selection is discarded the raster is reloaded from disk
//! so previously drawn paths disappear.

use std::path::Path;

use crate::annotate::draw_path;
use crate::config::EngineConfig;
use crate::diagnostics::{Clock, SearchDiagnostics, solve_with_diagnostics};
use crate::raster::RasterStore;
use crate::search::shortest_path;
use crate::types::{Connectivity, Coordinate, EngineError, Metadata, PathResult};

/// Endpoint selection state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing picked yet.
    #[default]
    Empty,
    /// Start picked, waiting for the end.
    Start(Coordinate),
    /// Both endpoints picked; ready to solve.
    Ready {
        /// First pick.
        start: Coordinate,
        /// Second pick.
        end: Coordinate,
    },
}

/// A raster, a configuration, and the current endpoint selection.
#[derive(Debug, Default)]
pub struct Session {
    store: RasterStore,
    config: EngineConfig,
    selection: Selection,
}

impl Session {
    /// Create a session with nothing loaded.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: RasterStore::new(),
            config,
            selection: Selection::Empty,
        }
    }

    /// The underlying raster store.
    #[must_use]
    pub const fn store(&self) -> &RasterStore {
        &self.store
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Load an image and clear the selection.
    ///
    /// A failed load leaves both the previous raster and the selection in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Decode`] if the file cannot be loaded.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<Metadata, EngineError> {
        let meta = self.store.load(path)?;
        self.selection = Selection::Empty;
        Ok(meta)
    }

    /// Switch connectivity mode.
    ///
    /// Returns `true` if a selection was in progress and has been
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the raster has to be reloaded and that fails.
    pub fn set_connectivity(&mut self, mode: Connectivity) -> Result<bool, EngineError> {
        self.config.connectivity = mode;
        if self.selection == Selection::Empty {
            return Ok(false);
        }
        self.reset()?;
        Ok(true)
    }

    /// Register a picked pixel.
    ///
    /// The first pick sets the start, the second the end, and a third
    /// resets the selection (and clears drawn paths).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] if no image is open, or
    /// [`EngineError::OutOfBounds`] if `coord` is outside it. The
    /// selection is unchanged in both cases.
    pub fn select(&mut self, coord: Coordinate) -> Result<Selection, EngineError> {
        self.store.raster()?.check(coord)?;
        match self.selection {
            Selection::Empty => self.selection = Selection::Start(coord),
            Selection::Start(start) => self.selection = Selection::Ready { start, end: coord },
            Selection::Ready { .. } => self.reset()?,
        }
        Ok(self.selection)
    }

    /// Discard the selection and any drawn paths.
    ///
    /// # Errors
    ///
    /// Returns an error if reloading the raster fails.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.selection = Selection::Empty;
        if self.store.is_loaded() {
            self.store.reload()?;
        }
        Ok(())
    }

    /// Solve between the selected endpoints and draw the path if found.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SelectionIncomplete`] unless both endpoints
    /// are selected, or [`EngineError::NotLoaded`] if no image is open.
    pub fn solve(&mut self) -> Result<PathResult, EngineError> {
        let (start, end) = self.endpoints()?;
        let result = shortest_path(self.store.raster()?, start, end, self.config.connectivity)?;
        self.annotate(&result)?;
        Ok(result)
    }

    /// Like [`solve`](Self::solve), also returning search diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve).
    pub fn solve_with_diagnostics<C: Clock>(
        &mut self,
        clock: &C,
    ) -> Result<(PathResult, SearchDiagnostics), EngineError> {
        let (start, end) = self.endpoints()?;
        let (result, diagnostics) = solve_with_diagnostics(
            self.store.raster()?,
            start,
            end,
            self.config.connectivity,
            clock,
        )?;
        self.annotate(&result)?;
        Ok((result, diagnostics))
    }

    /// Save the (possibly annotated) raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] or [`EngineError::Encode`].
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        self.store.raster()?.save(path)
    }

    fn endpoints(&self) -> Result<(Coordinate, Coordinate), EngineError> {
        match self.selection {
            Selection::Ready { start, end } => Ok((start, end)),
            Selection::Empty | Selection::Start(_) => Err(EngineError::SelectionIncomplete),
        }
    }

    fn annotate(&mut self, result: &PathResult) -> Result<(), EngineError> {
        if result.is_empty() {
            return Ok(());
        }
        let marker_radius = self.config.marker_radius;
        let colors = self.config.colors;
        draw_path(self.store.raster_mut()?, &result.path, marker_radius, &colors);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use image::{Rgb, RgbImage};

    use super::*;
    use crate::config::PathColors;

    fn c(row: u32, col: u32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn write_uniform(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("uniform.png");
        RgbImage::from_pixel(width, height, Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();
        path
    }

    fn opened(width: u32, height: u32) -> (Session, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_uniform(dir.path(), width, height);
        let mut session = Session::new(EngineConfig::default());
        session.open(&path).unwrap();
        (session, dir)
    }

    #[test]
    fn select_walks_through_states() {
        let (mut session, _dir) = opened(8, 8);
        assert_eq!(session.selection(), Selection::Empty);
        assert_eq!(session.select(c(1, 1)).unwrap(), Selection::Start(c(1, 1)));
        assert_eq!(
            session.select(c(6, 5)).unwrap(),
            Selection::Ready {
                start: c(1, 1),
                end: c(6, 5),
            }
        );
        assert_eq!(session.select(c(3, 3)).unwrap(), Selection::Empty);
    }

    #[test]
    fn select_rejects_out_of_bounds_without_changing_state() {
        let (mut session, _dir) = opened(4, 4);
        session.select(c(0, 0)).unwrap();
        assert!(matches!(
            session.select(c(4, 0)),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert_eq!(session.selection(), Selection::Start(c(0, 0)));
    }

    #[test]
    fn select_before_open_is_not_loaded() {
        let mut session = Session::default();
        assert!(matches!(
            session.select(c(0, 0)),
            Err(EngineError::NotLoaded)
        ));
    }

    #[test]
    fn solve_requires_both_endpoints() {
        let (mut session, _dir) = opened(4, 4);
        assert!(matches!(
            session.solve(),
            Err(EngineError::SelectionIncomplete)
        ));
        session.select(c(0, 0)).unwrap();
        assert!(matches!(
            session.solve(),
            Err(EngineError::SelectionIncomplete)
        ));
    }

    #[test]
    fn solve_draws_path_and_reset_clears_it() {
        let (mut session, _dir) = opened(20, 20);
        session.select(c(2, 2)).unwrap();
        session.select(c(2, 17)).unwrap();

        let result = session.solve().unwrap();
        assert_eq!(result.cost, 15);
        let raster = session.store().raster().unwrap();
        assert_eq!(raster.color(c(2, 10)), PathColors::DEFAULT_PATH);
        assert_eq!(raster.color(c(2, 2)), PathColors::DEFAULT_START);
        assert_eq!(raster.color(c(2, 17)), PathColors::DEFAULT_END);

        session.reset().unwrap();
        assert_eq!(session.selection(), Selection::Empty);
        let raster = session.store().raster().unwrap();
        assert_eq!(raster.color(c(2, 10)), [128, 128, 128]);
    }

    #[test]
    fn changing_mode_discards_selection() {
        let (mut session, _dir) = opened(5, 5);
        assert!(!session.set_connectivity(Connectivity::Eight).unwrap());
        assert_eq!(session.config().connectivity, Connectivity::Eight);

        session.select(c(0, 0)).unwrap();
        assert!(session.set_connectivity(Connectivity::Four).unwrap());
        assert_eq!(session.selection(), Selection::Empty);
        assert_eq!(session.config().connectivity, Connectivity::Four);
    }

    #[test]
    fn solve_uses_configured_mode() {
        let (mut session, _dir) = opened(5, 5);
        session.set_connectivity(Connectivity::Eight).unwrap();
        session.select(c(0, 0)).unwrap();
        session.select(c(4, 4)).unwrap();
        assert_eq!(session.solve().unwrap().cost, 4);
    }

    #[test]
    fn failed_open_keeps_previous_state() {
        let (mut session, dir) = opened(5, 5);
        session.select(c(1, 1)).unwrap();
        assert!(session.open(dir.path().join("missing.png")).is_err());
        assert_eq!(session.selection(), Selection::Start(c(1, 1)));
        assert_eq!(
            session.store().metadata().unwrap(),
            Metadata::new(5, 5)
        );
    }
}
