//! Validation for grids and boards.
//!
//! Runs a suite of checks and reports errors and warnings. Used by both
//! `gridslice validate` and `gridslice batch` before any slicing happens.

mod checks;
mod warning;

pub use checks::{
    BLANK_NAME, DUPLICATE_GRID_NAME, EMPTY_FRAME, NO_GRIDS, NO_IMAGES, NO_OVERLAP,
    THICKNESS_CONSUMES_CELL,
};
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::output::Printer;
use crate::types::{Board, Grid, PixelBuffer};

/// Run the single-grid checks.
pub fn validate_grid(grid: &Grid) -> ValidationResult {
    checks::check_grid(grid)
}

/// Run all checks against every grid and image on the board.
pub fn validate_board<P: PixelBuffer>(board: &Board<P>) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_not_empty(board));
    for grid in &board.grids {
        result.merge(checks::check_grid(grid));
    }
    result.merge(checks::check_duplicate_names(board));
    result.merge(checks::check_overlap(board));

    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        eprintln!(
            "{}[{}]: {}",
            printer.severity(&d.severity.to_string(), d.is_error()),
            printer.dim(&d.code),
            d.message
        );
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.cyan("help:"), help);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanvasImage, Point, Rect};
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_validate_board_collects_everything() {
        let mut board = Board::new();
        let pixels = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        board.add_image(CanvasImage::new("img", pixels, Point::ORIGIN, 1.0).unwrap());

        board.add_grid(Grid::new("thick", Rect::new(-50.0, -50.0, 100.0, 100.0), 2, 2).with_thickness(25.0));
        board.add_grid(Grid::new("away", Rect::new(900.0, 900.0, 10.0, 10.0), 1, 1));

        let result = validate_board(&board);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_code(THICKNESS_CONSUMES_CELL));
        assert!(result.has_code(NO_OVERLAP));
        assert!(!result.has_code(NO_IMAGES));
    }

    #[test]
    fn test_validate_grid_clean() {
        let grid = Grid::new("g", Rect::new(0.0, 0.0, 300.0, 300.0), 3, 3).with_thickness(5.0);
        assert!(validate_grid(&grid).is_ok());
    }
}
