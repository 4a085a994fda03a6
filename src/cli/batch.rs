//! Batch command implementation.
//!
//! Loads a slice.yaml project and slices every grid against every image.

use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, SlicerError};
use crate::output::{display_path, plural, Printer};
use crate::project::{load_project, MANIFEST_FILENAME};
use crate::slice::{slice_all_with, BatchReport, PairEvent};
use crate::validation::{print_diagnostics, validate_board};

/// Slice every grid in a project against every image
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Manifest file, or a directory containing slice.yaml
    #[arg(default_value = MANIFEST_FILENAME)]
    pub manifest: PathBuf,

    /// Output root (overrides the manifest's `output`)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the batch report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Slice even when validation reports errors
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: BatchArgs, printer: &Printer) -> Result<BatchReport> {
    printer.status("Loading", &display_path(&args.manifest));
    let project = load_project(&args.manifest)?;
    let board = &project.board;

    printer.info(
        "Loaded",
        &format!(
            "{} over {}",
            plural(board.grids.len(), "grid", "grids"),
            plural(board.images.len(), "image", "images")
        ),
    );

    let diagnostics = validate_board(board);
    if !diagnostics.is_ok() {
        print_diagnostics(&diagnostics, printer);
    }
    if diagnostics.has_errors() && !args.force {
        return Err(SlicerError::Validation {
            message: format!(
                "{} in {}",
                plural(diagnostics.error_count(), "error", "errors"),
                display_path(&args.manifest)
            ),
            help: Some("Fix the errors above, or pass --force to slice anyway".to_string()),
        });
    }

    let output_root = args.output.clone().unwrap_or_else(|| project.output_root());
    if !output_root.exists() {
        fs::create_dir_all(&output_root).map_err(|e| SlicerError::Io {
            path: output_root.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let report = slice_all_with(&board.grids, &board.images, &output_root, |event| {
        match event {
            PairEvent::Skipped {
                grid, image_name, ..
            } => printer.verbose(
                "Skipped",
                &format!("{} does not overlap {}", grid.name, image_name),
            ),
            PairEvent::Sliced {
                grid,
                image_name,
                directory,
                written,
                failed,
                ..
            } => {
                let mut message = format!(
                    "{} over {} ({})",
                    grid.name,
                    image_name,
                    plural(written, "cell", "cells")
                );
                if failed > 0 {
                    message.push_str(&format!(", {}", plural(failed, "failure", "failures")));
                }
                printer.status("Sliced", &message);
                printer.verbose("Into", &display_path(directory));
            }
            PairEvent::Failed { error, .. } => printer.error("Failed", &error.to_string()),
        }
        ControlFlow::Continue(())
    })?;

    for error in &report.errors {
        printer.verbose("Error", &error.to_string());
    }

    let summary = format!("{} in {}", report.summary(), display_path(&report.output_root));
    if report.has_errors() {
        printer.warning("Finished", &summary);
    } else {
        printer.status("Finished", &summary);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| SlicerError::Parse {
            message: format!("Failed to serialize report: {}", e),
            help: None,
        })?;
        println!("{}", json);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn project(dir: &std::path::Path, thickness: f64) {
        RgbaImage::from_pixel(20, 20, Rgba([7, 7, 7, 255]))
            .save(dir.join("photo.png"))
            .unwrap();
        fs::write(
            dir.join(MANIFEST_FILENAME),
            format!(
                "output: out\nimages:\n  - path: photo.png\ngrids:\n  - name: tiles\n    frame: [-10, -10, 20, 20]\n    rows: 2\n    columns: 2\n    thickness: {}\n",
                thickness
            ),
        )
        .unwrap();
    }

    fn args(manifest: PathBuf) -> BatchArgs {
        BatchArgs {
            manifest,
            output: None,
            json: false,
            force: false,
        }
    }

    #[test]
    fn test_run_batch() {
        let dir = tempdir().unwrap();
        project(dir.path(), 0.0);

        let report = run(args(dir.path().to_path_buf()), &Printer::new()).unwrap();

        assert_eq!(report.total_sliced, 4);
        assert!(dir
            .path()
            .join("out/Grid_tiles/Image_0_photo/tiles_0_0.png")
            .exists());
    }

    #[test]
    fn test_run_batch_refuses_validation_errors() {
        let dir = tempdir().unwrap();
        project(dir.path(), 5.0);

        let err = run(args(dir.path().to_path_buf()), &Printer::new()).unwrap_err();
        assert!(matches!(err, SlicerError::Validation { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_run_batch_force() {
        let dir = tempdir().unwrap();
        project(dir.path(), 5.0);

        let report = run(
            BatchArgs {
                force: true,
                ..args(dir.path().to_path_buf())
            },
            &Printer::new(),
        )
        .unwrap();

        assert_eq!(report.total_sliced, 0);
        assert_eq!(report.error_count(), 4);
    }
}
