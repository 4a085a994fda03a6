//! Validate command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, SlicerError};
use crate::output::{display_path, plural, Printer};
use crate::project::{load_project, MANIFEST_FILENAME};
use crate::validation::{print_diagnostics, validate_board, ValidationResult};

/// Check a slice.yaml project without writing anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest file, or a directory containing slice.yaml
    #[arg(default_value = MANIFEST_FILENAME)]
    pub manifest: PathBuf,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<ValidationResult> {
    let display = display_path(&args.manifest);
    printer.status("Checking", &display);

    let project = load_project(&args.manifest)?;
    let result = validate_board(&project.board);

    print_diagnostics(&result, printer);

    if result.has_errors() {
        return Err(SlicerError::Validation {
            message: format!(
                "{} and {} in {}",
                plural(result.error_count(), "error", "errors"),
                plural(result.warning_count(), "warning", "warnings"),
                display
            ),
            help: None,
        });
    }

    printer.status(
        "Finished",
        &format!(
            "{} with {} ({} over {})",
            printer.bold(&display),
            plural(result.warning_count(), "warning", "warnings"),
            plural(project.board.grids.len(), "grid", "grids"),
            plural(project.board.images.len(), "image", "images")
        ),
    );

    Ok(result)
}
