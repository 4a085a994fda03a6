//! Slice command implementation.
//!
//! Lays one grid over one image file and writes every cell as a PNG.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, SlicerError};
use crate::output::{display_path, plural, Printer};
use crate::project::load_image;
use crate::slice::{slice_grid, SliceOutcome};
use crate::transform::overlap;
use crate::types::{CanvasImage, Grid, PixelBuffer, Rect};
use crate::validation::{print_diagnostics, validate_grid};

/// Slice one image with one grid
#[derive(Args, Debug)]
pub struct SliceArgs {
    /// Image file to slice
    #[arg(required = true)]
    pub input: PathBuf,

    /// Grid size as ROWSxCOLUMNS (e.g. 2x3)
    #[arg(long, short)]
    pub grid: String,

    /// Margin removed from every cell edge, in pixels
    #[arg(long, short, default_value = "0")]
    pub thickness: f64,

    /// Region to cover as X,Y,WIDTH,HEIGHT in pixels (default: whole image)
    #[arg(long)]
    pub region: Option<String>,

    /// Grid name used in output file names (default: input file stem)
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory for sliced cells
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
}

/// Parse a "ROWSxCOLUMNS" string into (rows, columns).
pub fn parse_grid_size(s: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = s.splitn(2, |c| c == 'x' || c == 'X').collect();
    if parts.len() != 2 {
        return Err(SlicerError::Parse {
            message: format!("Invalid grid size '{}': expected ROWSxCOLUMNS (e.g. 2x3)", s),
            help: Some("Use the format ROWSxCOLUMNS, for example: 2x2, 3x4".to_string()),
        });
    }

    let count = |part: &str, what: &str| -> Result<u32> {
        match part.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(SlicerError::Parse {
                message: format!("Invalid {} '{}' in grid size '{}'", what, part, s),
                help: Some(format!("The {} count must be a positive integer", what)),
            }),
        }
    };

    Ok((count(parts[0], "row")?, count(parts[1], "column")?))
}

/// Parse an "X,Y,WIDTH,HEIGHT" region.
pub fn parse_region(s: &str) -> Result<Rect> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| SlicerError::Parse {
            message: format!("Invalid region '{}': values must be numbers", s),
            help: Some("Use X,Y,WIDTH,HEIGHT, for example: 0,0,64,32".to_string()),
        })?;

    match values.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(Rect::new(*x, *y, *w, *h)),
        [_, _, _, _] => Err(SlicerError::Parse {
            message: format!("Region '{}' must have a positive width and height", s),
            help: None,
        }),
        _ => Err(SlicerError::Parse {
            message: format!("Invalid region '{}': expected 4 values, got {}", s, values.len()),
            help: Some("Use X,Y,WIDTH,HEIGHT, for example: 0,0,64,32".to_string()),
        }),
    }
}

pub fn run(args: SliceArgs, printer: &Printer) -> Result<SliceOutcome> {
    let (rows, columns) = parse_grid_size(&args.grid)?;
    let display = display_path(&args.input);

    printer.status("Loading", &display);
    let pixels = load_image(&args.input)?;

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();

    let region = match &args.region {
        Some(r) => parse_region(r)?,
        None => pixels.bounds(),
    };

    // Top-left at the canvas origin, so the region is in pixels.
    let image = CanvasImage::at_origin(stem.clone(), pixels)?;
    let grid = Grid::new(args.name.clone().unwrap_or(stem), region, rows, columns)
        .with_thickness(args.thickness);

    printer.info(
        "Analyzed",
        &format!(
            "{}x{} image, {}x{} grid ({})",
            image.pixels.width(),
            image.pixels.height(),
            rows,
            columns,
            plural(grid.cell_count(), "cell", "cells")
        ),
    );

    let diagnostics = validate_grid(&grid);
    if !diagnostics.is_ok() {
        print_diagnostics(&diagnostics, printer);
    }

    let transformed = match overlap(&grid, &image) {
        Ok(transformed) => transformed,
        Err(e) => {
            printer.warning("Skipping", &e.to_string());
            return Ok(SliceOutcome::default());
        }
    };

    if !args.output.exists() {
        fs::create_dir_all(&args.output).map_err(|e| SlicerError::Io {
            path: args.output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    printer.status("Slicing", &format!("{} into {}", grid.name, display_path(&args.output)));
    let outcome = slice_grid(&transformed, &image.pixels, &args.output)?;

    for result in &outcome.results {
        printer.verbose("Wrote", &display_path(&result.path));
    }
    for error in &outcome.errors {
        printer.error("Failed", &error.to_string());
    }

    printer.status(
        "Finished",
        &format!(
            "{}{}",
            plural(outcome.results.len(), "cell", "cells"),
            if outcome.errors.is_empty() {
                String::new()
            } else {
                format!(", {}", plural(outcome.errors.len(), "failure", "failures"))
            }
        ),
    );

    Ok(outcome)
}
