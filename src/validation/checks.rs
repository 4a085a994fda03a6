//! Validation checks for grids and boards.
//!
//! Slicing itself never rejects a grid; a too-thick grid just yields
//! degenerate cells. These checks catch the same problems up front.

use std::collections::BTreeMap;

use crate::slice::sanitize_component;
use crate::transform::intersects;
use crate::types::{Board, Grid, PixelBuffer};

use super::warning::{Diagnostic, ValidationResult};

pub const THICKNESS_CONSUMES_CELL: &str = "gridslice::validate::thickness-consumes-cell";
pub const EMPTY_FRAME: &str = "gridslice::validate::empty-frame";
pub const BLANK_NAME: &str = "gridslice::validate::blank-name";
pub const NO_OVERLAP: &str = "gridslice::validate::no-overlap";
pub const DUPLICATE_GRID_NAME: &str = "gridslice::validate::duplicate-grid-name";
pub const NO_IMAGES: &str = "gridslice::validate::no-images";
pub const NO_GRIDS: &str = "gridslice::validate::no-grids";

/// Checks that only need the grid itself.
pub fn check_grid(grid: &Grid) -> ValidationResult {
    let mut result = ValidationResult::new();
    let label = display_name(grid);

    if grid.frame.is_empty() {
        result.push(
            Diagnostic::warning(EMPTY_FRAME, format!("Grid {} has an empty frame", label))
                .with_help("Give the grid a positive width and height"),
        );
    } else if grid.thickness_consumes_cells() {
        let (w, h) = grid.cell_size();
        result.push(
            Diagnostic::error(
                THICKNESS_CONSUMES_CELL,
                format!(
                    "Grid {} thickness {} leaves no area in its {:.1}x{:.1} cells",
                    label,
                    grid.logical_thickness(),
                    w,
                    h
                ),
            )
            .with_help(format!(
                "Thickness must be less than {:.1} for this grid",
                w.min(h) / 2.0
            )),
        );
    }

    if grid.name.trim().is_empty() {
        result.push(
            Diagnostic::warning(BLANK_NAME, "A grid has a blank name")
                .with_help("Name the grid; it is used in output file names"),
        );
    }

    result
}

/// Warn about grids that would not produce any output.
pub fn check_overlap<P: PixelBuffer>(board: &Board<P>) -> ValidationResult {
    let mut result = ValidationResult::new();

    if board.images.is_empty() {
        return result;
    }

    for grid in &board.grids {
        if !board.images.iter().any(|image| intersects(grid, image)) {
            result.push(
                Diagnostic::warning(
                    NO_OVERLAP,
                    format!("Grid {} does not overlap any image", display_name(grid)),
                )
                .with_help("Move the grid over an image, or remove it"),
            );
        }
    }

    result
}

/// Grids whose names sanitize to the same directory share their output.
pub fn check_duplicate_names<P>(board: &Board<P>) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut by_directory: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for grid in &board.grids {
        by_directory
            .entry(sanitize_component(&grid.name, "grid"))
            .or_default()
            .push(grid.name.as_str());
    }

    for (directory, names) in by_directory.into_iter().filter(|(_, n)| n.len() > 1) {
        let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
        result.push(
            Diagnostic::warning(
                DUPLICATE_GRID_NAME,
                format!(
                    "{} grids write to Grid_{}: {}",
                    names.len(),
                    directory,
                    quoted.join(", ")
                ),
            )
            .with_help("Their output would overwrite each other; give each grid a unique name"),
        );
    }

    result
}

pub fn check_not_empty<P>(board: &Board<P>) -> ValidationResult {
    let mut result = ValidationResult::new();

    if board.images.is_empty() {
        result.push(
            Diagnostic::warning(NO_IMAGES, "No images to slice")
                .with_help("Add entries under 'images' or 'image_dirs'"),
        );
    }
    if board.grids.is_empty() {
        result.push(
            Diagnostic::warning(NO_GRIDS, "No grids defined")
                .with_help("Add entries under 'grids'"),
        );
    }

    result
}

fn display_name(grid: &Grid) -> String {
    if grid.name.trim().is_empty() {
        format!("<{}>", grid.id)
    } else {
        format!("'{}'", grid.name)
    }
}
