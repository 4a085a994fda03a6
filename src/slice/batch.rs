//! Slicing every grid against every image.
//!
//! Output is laid out as
//! `<root>/Grid_<grid>/Image_<index>_<image>/<grid>_<row>_<col>.png`.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::transform::{intersects, transform_to_image_space};
use crate::types::{CanvasImage, Grid, PixelBuffer};

use super::engine::{check_output_root, ensure_writable, sanitize_component, slice_cells};
use super::report::{BatchReport, SliceError, SliceErrorKind};

/// Progress notification for one (grid, image) pair.
#[derive(Debug, Clone, Copy)]
pub enum PairEvent<'a> {
    /// The grid does not overlap the image.
    Skipped {
        grid: &'a Grid,
        image_index: usize,
        image_name: &'a str,
    },
    /// The pair was sliced (possibly with per-cell errors).
    Sliced {
        grid: &'a Grid,
        image_index: usize,
        image_name: &'a str,
        directory: &'a Path,
        written: usize,
        failed: usize,
    },
    /// The pair's output directory could not be created.
    Failed {
        grid: &'a Grid,
        image_index: usize,
        image_name: &'a str,
        error: &'a SliceError,
    },
}

/// The directory a pair's cells are written to, relative to the root.
pub fn pair_directory(grid: &Grid, image_index: usize, image_name: &str) -> PathBuf {
    PathBuf::from(format!("Grid_{}", sanitize_component(&grid.name, "grid"))).join(format!(
        "Image_{}_{}",
        image_index,
        sanitize_component(image_name, "image")
    ))
}

/// Slice every grid against every image into `output_root`.
pub fn slice_all<P: PixelBuffer>(
    grids: &[Grid],
    images: &[CanvasImage<P>],
    output_root: &Path,
) -> Result<BatchReport> {
    slice_all_with(grids, images, output_root, |_| ControlFlow::Continue(()))
}

/// [`slice_all`], reporting each pair to `observer` as it completes.
///
/// Returning `ControlFlow::Break` from the observer stops the batch; cells
/// already written stay on disk and the report is marked cancelled.
pub fn slice_all_with<P, F>(
    grids: &[Grid],
    images: &[CanvasImage<P>],
    output_root: &Path,
    mut observer: F,
) -> Result<BatchReport>
where
    P: PixelBuffer,
    F: FnMut(PairEvent<'_>) -> ControlFlow<()>,
{
    check_output_root(output_root)?;

    let mut report = BatchReport::new(output_root);

    for grid in grids {
        for (image_index, image) in images.iter().enumerate() {
            let flow = slice_pair(grid, image_index, image, output_root, &mut report, &mut observer);

            if flow.is_break() {
                report.cancelled = true;
                return Ok(report);
            }
        }
    }

    Ok(report)
}

fn slice_pair<P, F>(
    grid: &Grid,
    image_index: usize,
    image: &CanvasImage<P>,
    output_root: &Path,
    report: &mut BatchReport,
    observer: &mut F,
) -> ControlFlow<()>
where
    P: PixelBuffer,
    F: FnMut(PairEvent<'_>) -> ControlFlow<()>,
{
    let image_name = image.name.as_str();

    let transformed = if intersects(grid, image) {
        Some(transform_to_image_space(grid, image))
    } else {
        None
    };

    let Some(transformed) = transformed.filter(|t| !t.frame.is_empty()) else {
        report.pairs_skipped += 1;
        return observer(PairEvent::Skipped {
            grid,
            image_index,
            image_name,
        });
    };

    let directory = output_root.join(pair_directory(grid, image_index, image_name));

    if let Err(e) = fs::create_dir_all(&directory).and_then(|()| ensure_writable(&directory)) {
        let error = SliceError::new(SliceErrorKind::DirectoryCreationFailure, grid)
            .with_image(image.id, image_name)
            .with_path(&directory)
            .with_message(e.to_string());
        let flow = observer(PairEvent::Failed {
            grid,
            image_index,
            image_name,
            error: &error,
        });
        report.errors.push(error);
        return flow;
    }

    let mut outcome = slice_cells(&transformed, &image.pixels, &directory);
    for error in &mut outcome.errors {
        error.image_id = Some(image.id);
        error.image_name = Some(image.name.clone());
    }

    let written = outcome.results.len();
    let failed = outcome.errors.len();
    report.pairs_sliced += 1;
    report.absorb(outcome);

    observer(PairEvent::Sliced {
        grid,
        image_index,
        image_name,
        directory: &directory,
        written,
        failed,
    })
}
