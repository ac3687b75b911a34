//! Draw a computed path and its endpoint markers onto the color buffer.

use image::Rgb as RgbPixel;
use imageproc::drawing::draw_filled_circle_mut;

use crate::config::PathColors;
use crate::raster::Raster;
use crate::types::Coordinate;

/// Paint `path` onto the raster's color buffer.
///
/// Interior coordinates become single pixels in `colors.path`. The first
/// and last coordinates get filled discs of `marker_radius` in
/// `colors.start` and `colors.end`, clipped at the raster edge. An empty
/// path leaves the raster untouched. The grayscale buffer is never
/// modified, so later searches on the same raster are unaffected.
///
/// `marker_radius` is capped at `width + height`: a disc that large
/// already covers every pixel, and the drawing cost grows with the
/// square of the radius.
///
/// # Panics
///
/// Panics if an interior coordinate lies outside the raster. Paths from
/// [`shortest_path`](crate::shortest_path) are always in bounds.
pub fn draw_path(raster: &mut Raster, path: &[Coordinate], marker_radius: u32, colors: &PathColors) {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return;
    };

    if path.len() > 2 {
        for &coord in &path[1..path.len() - 1] {
            raster.set_color(coord, colors.path);
        }
    }

    let cap = raster.width().saturating_add(raster.height());
    let radius = i32::try_from(marker_radius.min(cap)).unwrap_or(i32::MAX);
    draw_marker(raster, first, radius, colors.start);
    draw_marker(raster, last, radius, colors.end);
}

fn draw_marker(raster: &mut Raster, center: Coordinate, radius: i32, color: [u8; 3]) {
    let x = i32::try_from(center.col).unwrap_or(i32::MAX);
    let y = i32::try_from(center.row).unwrap_or(i32::MAX);
    draw_filled_circle_mut(raster.color_image_mut(), (x, y), radius, RgbPixel(color));
}
