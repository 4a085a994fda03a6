//! Results and per-cell errors produced by slicing.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::output::plural;
use crate::types::{CellIndex, Grid, GridId, ImageId};

/// One exported cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceResult {
    pub grid_id: GridId,
    pub row: u32,
    pub column: u32,
    pub path: PathBuf,
}

/// What went wrong with a cell or a (grid, image) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceErrorKind {
    /// The grid does not overlap the image. Expected; batches skip it.
    NoIntersection,
    /// The thickness margin leaves the cell with no area.
    DegenerateCell,
    /// The crop rectangle was rejected by the pixel buffer.
    CropFailure,
    /// Encoding or writing the PNG failed.
    WriteFailure,
    /// The per-pair output directory could not be created.
    DirectoryCreationFailure,
}

impl SliceErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SliceErrorKind::NoIntersection => "no intersection",
            SliceErrorKind::DegenerateCell => "degenerate cell",
            SliceErrorKind::CropFailure => "crop failure",
            SliceErrorKind::WriteFailure => "write failure",
            SliceErrorKind::DirectoryCreationFailure => "directory creation failure",
        }
    }
}

impl fmt::Display for SliceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal slicing failure, tagged with everything needed to find it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceError {
    pub kind: SliceErrorKind,
    pub grid_id: GridId,
    pub grid_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SliceError {
    pub fn new(kind: SliceErrorKind, grid: &Grid) -> Self {
        Self {
            kind,
            grid_id: grid.id,
            grid_name: grid.name.clone(),
            image_id: None,
            image_name: None,
            cell: None,
            path: None,
            message: None,
        }
    }

    pub fn with_image(mut self, id: ImageId, name: impl Into<String>) -> Self {
        self.image_id = Some(id);
        self.image_name = Some(name.into());
        self
    }

    pub fn with_cell(mut self, cell: CellIndex) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in grid '{}'", self.kind, self.grid_name)?;
        if let Some(name) = &self.image_name {
            write!(f, " on image '{}'", name)?;
        }
        if let Some(cell) = &self.cell {
            write!(f, " at cell {}", cell)?;
        }
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for SliceError {}

/// Everything one `slice_grid` call produced. Both lists may be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SliceOutcome {
    pub results: Vec<SliceResult>,
    pub errors: Vec<SliceError>,
}

impl SliceOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The outcome of slicing every grid against every image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Cells written across all pairs.
    pub total_sliced: usize,
    /// Pairs that overlapped and were sliced.
    pub pairs_sliced: usize,
    /// Pairs skipped because the grid missed the image.
    pub pairs_skipped: usize,
    pub results: Vec<SliceResult>,
    pub errors: Vec<SliceError>,
    pub output_root: PathBuf,
    /// Set when the caller stopped the batch early.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            total_sliced: 0,
            pairs_sliced: 0,
            pairs_skipped: 0,
            results: Vec::new(),
            errors: Vec::new(),
            output_root: output_root.into(),
            cancelled: false,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors_of(&self, kind: SliceErrorKind) -> impl Iterator<Item = &SliceError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// A one-line human summary, e.g. "8 cells from 2 pairs, 1 failure".
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{} from {}",
            plural(self.total_sliced, "cell", "cells"),
            plural(self.pairs_sliced, "pair", "pairs")
        );
        if self.pairs_skipped > 0 {
            s.push_str(&format!(", {} skipped", self.pairs_skipped));
        }
        if self.has_errors() {
            s.push_str(&format!(
                ", {}",
                plural(self.errors.len(), "failure", "failures")
            ));
        }
        if self.cancelled {
            s.push_str(" (cancelled)");
        }
        s
    }

    pub(crate) fn absorb(&mut self, outcome: SliceOutcome) {
        self.total_sliced += outcome.results.len();
        self.results.extend(outcome.results);
        self.errors.extend(outcome.errors);
    }
}
