//! Raster storage: decoding, grayscale derivation, and pixel access.
//!
//! A [`Raster`] pairs the decoded RGB color buffer with a grayscale
//! buffer derived from it. The two are always rebuilt together, so their
//! dimensions cannot drift apart. [`RasterStore`] owns at most one raster
//! at a time and remembers the last file it came from so annotations can
//! be discarded with [`RasterStore::reload`].

use std::path::{Path, PathBuf};

use image::{GrayImage, Rgb as RgbPixel, RgbImage};

use crate::neighbors::{Neighbors, neighbors};
use crate::types::{Connectivity, Coordinate, EngineError, Metadata, Rgb};

/// A decoded image held as color plus derived intensity.
#[derive(Debug, Clone)]
pub struct Raster {
    color: RgbImage,
    gray: GrayImage,
}

impl Raster {
    /// Build a raster from an RGB buffer, deriving the grayscale buffer
    /// with the standard luma weights.
    #[must_use]
    pub fn from_rgb(color: RgbImage) -> Self {
        let gray = image::imageops::grayscale(&color);
        Self { color, gray }
    }

    /// Decode raw image bytes (PNG, JPEG, BMP).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] if `bytes` is empty.
    /// Returns [`EngineError::Decode`] if the format is unrecognized or
    /// the data is corrupt.
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let img = image::load_from_memory(bytes).map_err(|e| EngineError::Decode {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_rgb(img.to_rgb8()))
    }

    /// Read and decode an image file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Decode`] if the file cannot be read, is
    /// empty, or cannot be decoded.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path).map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::decode(&bytes).map_err(|e| match e {
            EngineError::EmptyInput => EngineError::Decode {
                path: path.to_path_buf(),
                reason: "file is empty".to_owned(),
            },
            EngineError::Decode { reason, .. } => EngineError::Decode {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Encode the color buffer to `path`. The format follows the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Encode`] if the extension is not a supported
    /// format or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        self.color.save(path).map_err(|e| EngineError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Dimensions and node count.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.width(), self.height())
    }

    /// Returns `true` if `coord` addresses a pixel of this raster.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.height() && coord.col < self.width()
    }

    /// Verify that `coord` is inside the raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] otherwise.
    pub fn check(&self, coord: Coordinate) -> Result<(), EngineError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                coord,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Grayscale intensity at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] if `coord` is outside.
    pub fn intensity(&self, coord: Coordinate) -> Result<u8, EngineError> {
        self.check(coord)?;
        Ok(self.intensity_at(coord))
    }

    /// Intensity of a coordinate already known to be in bounds.
    pub(crate) fn intensity_at(&self, coord: Coordinate) -> u8 {
        self.gray.get_pixel(coord.col, coord.row).0[0]
    }

    /// Color at `coord`.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is outside the raster; callers validate first.
    #[must_use]
    pub fn color(&self, coord: Coordinate) -> Rgb {
        self.color.get_pixel(coord.col, coord.row).0
    }

    /// Overwrite the color at `coord`. The grayscale buffer is untouched.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is outside the raster; callers validate first.
    pub fn set_color(&mut self, coord: Coordinate, color: Rgb) {
        self.color.put_pixel(coord.col, coord.row, RgbPixel(color));
    }

    /// The color buffer.
    #[must_use]
    pub const fn color_image(&self) -> &RgbImage {
        &self.color
    }

    /// Mutable access to the color buffer for drawing.
    pub(crate) const fn color_image_mut(&mut self) -> &mut RgbImage {
        &mut self.color
    }

    /// The grayscale buffer.
    #[must_use]
    pub const fn gray_image(&self) -> &GrayImage {
        &self.gray
    }

    /// Row-major node index of an in-bounds coordinate.
    pub(crate) fn index(&self, coord: Coordinate) -> usize {
        coord.row as usize * self.width() as usize + coord.col as usize
    }

    /// Number of pixels (graph nodes).
    pub(crate) fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

/// Holds the currently loaded raster and the path it was loaded from.
#[derive(Debug, Default)]
pub struct RasterStore {
    raster: Option<Raster>,
    source: Option<PathBuf>,
}

impl RasterStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raster: None,
            source: None,
        }
    }

    /// Load and decode the image at `path`, replacing any current raster.
    ///
    /// On failure the store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Decode`] if the file is missing or cannot
    /// be decoded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Metadata, EngineError> {
        let path = path.as_ref();
        let raster = Raster::open(path)?;
        let meta = raster.metadata();
        tracing::debug!(
            path = %path.display(),
            width = meta.width,
            height = meta.height,
            "loaded raster"
        );
        self.raster = Some(raster);
        self.source = Some(path.to_path_buf());
        Ok(meta)
    }

    /// Decode an in-memory image, replacing any current raster.
    ///
    /// The remembered source path is kept, so a later [`reload`] returns
    /// to the last file rather than to these bytes.
    ///
    /// [`reload`]: Self::reload
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] or [`EngineError::Decode`].
    pub fn load_from_memory(&mut self, bytes: &[u8]) -> Result<Metadata, EngineError> {
        let raster = Raster::decode(bytes)?;
        let meta = raster.metadata();
        tracing::debug!(
            width = meta.width,
            height = meta.height,
            "loaded raster from memory"
        );
        self.raster = Some(raster);
        Ok(meta)
    }

    /// Reload the last successfully loaded file, discarding annotations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoPriorLoad`] if no file was ever loaded,
    /// or [`EngineError::Decode`] if the file can no longer be decoded.
    pub fn reload(&mut self) -> Result<Metadata, EngineError> {
        let path = self.source.clone().ok_or(EngineError::NoPriorLoad)?;
        self.load(path)
    }

    /// Returns `true` if a raster is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.raster.is_some()
    }

    /// The file the current raster was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Metadata of the loaded raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] if nothing is loaded.
    pub fn metadata(&self) -> Result<Metadata, EngineError> {
        self.raster().map(Raster::metadata)
    }

    /// Borrow the loaded raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] if nothing is loaded.
    pub fn raster(&self) -> Result<&Raster, EngineError> {
        self.raster.as_ref().ok_or(EngineError::NotLoaded)
    }

    /// Mutably borrow the loaded raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] if nothing is loaded.
    pub fn raster_mut(&mut self) -> Result<&mut Raster, EngineError> {
        self.raster.as_mut().ok_or(EngineError::NotLoaded)
    }

    /// Grayscale intensity at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] or [`EngineError::OutOfBounds`].
    pub fn intensity(&self, coord: Coordinate) -> Result<u8, EngineError> {
        self.raster()?.intensity(coord)
    }

    /// Neighbors of `coord` in the loaded raster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotLoaded`] if nothing is loaded, or
    /// [`EngineError::OutOfBounds`] if `coord` is outside the raster.
    pub fn neighbors(
        &self,
        coord: Coordinate,
        mode: Connectivity,
    ) -> Result<Neighbors<'_>, EngineError> {
        let raster = self.raster()?;
        raster.check(coord)?;
        Ok(neighbors(raster, coord, mode))
    }
}
