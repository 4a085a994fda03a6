//! gridslice - grid slicing engine
//!
//! Lays rectangular grids over positioned, scaled images on a shared canvas
//! and exports every grid cell that overlaps an image as its own PNG.

pub mod cli;
pub mod error;
pub mod output;
pub mod project;
pub mod slice;
pub mod transform;
pub mod types;
pub mod validation;

pub use error::{Result, SlicerError};
pub use project::{load_project, Manifest, Project};
pub use slice::{
    slice_all, slice_all_with, slice_grid, BatchReport, PairEvent, SliceError, SliceErrorKind,
    SliceOutcome, SliceResult,
};
pub use transform::{intersects, overlap, transform_to_image_space};
pub use types::{
    Board, CanvasImage, CellIndex, Grid, GridId, ImageId, LineStyle, PixelBuffer, PixelRect,
    Point, Rect,
};
pub use validation::{validate_board, validate_grid, Diagnostic, Severity, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_core_types_cross_threads() {
        assert_send_sync::<Grid>();
        assert_send_sync::<CanvasImage>();
        assert_send_sync::<Board>();
        assert_send_sync::<BatchReport>();
        assert_send_sync::<SliceError>();
    }
}
