//! Core data model: geometry, grids, placed images and boards.

mod board;
mod grid;
mod canvas_image;
mod rect;

pub use board::Board;
pub use grid::{CellFrames, CellIndex, Grid, GridId, LineStyle, DEFAULT_GRID_COLOR};
pub use canvas_image::{CanvasImage, CropError, ImageId, PixelBuffer};
pub use rect::{PixelRect, Point, Rect, PIXEL_EPSILON};
