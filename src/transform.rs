//! Canvas space to pixel space.
//!
//! Grids are drawn on a shared, pannable canvas; slicing happens in one
//! image's native pixels. Every (grid, image) pair crosses between the two
//! exactly once, here, so the slicing engine only ever sees pixel units.

use crate::slice::{SliceError, SliceErrorKind};
use crate::types::{CanvasImage, Grid, PixelBuffer, Rect};

/// Cheap canvas-space overlap test. No scaling involved.
pub fn intersects<P: PixelBuffer>(grid: &Grid, image: &CanvasImage<P>) -> bool {
    grid.frame.intersects(&image.display_rect())
}

/// Map `grid` into `image`'s pixel space.
///
/// The returned grid covers only the part of the frame that lies over the
/// image, translated to the image's top-left, divided by its scale and
/// clamped to the buffer. A grid that misses the image comes back with a
/// zero frame, which the slicer treats as a no-op. The logical thickness is
/// converted to pixels along with the frame.
pub fn transform_to_image_space<P: PixelBuffer>(grid: &Grid, image: &CanvasImage<P>) -> Grid {
    let display = image.display_rect();
    let intersection = grid.frame.intersection(&display);

    let mut transformed = grid.clone();

    if intersection.is_empty() {
        transformed.frame = Rect::zero();
        return transformed;
    }

    let inverse = 1.0 / image.scale();
    let local = intersection
        .translated(-display.x, -display.y)
        .scaled(inverse);

    transformed.frame = local.clamped_to(&image.pixels.bounds());
    transformed.set_thickness(grid.logical_thickness() * inverse);
    transformed
}

/// Like [`transform_to_image_space`], but a miss is reported as a
/// `NoIntersection` error instead of an empty frame.
pub fn overlap<P: PixelBuffer>(
    grid: &Grid,
    image: &CanvasImage<P>,
) -> Result<Grid, SliceError> {
    let transformed = transform_to_image_space(grid, image);
    if transformed.frame.is_empty() {
        return Err(SliceError::new(SliceErrorKind::NoIntersection, grid)
            .with_image(image.id, image.name.clone()));
    }
    Ok(transformed)
}
