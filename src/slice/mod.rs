//! Slicing engine: per-cell crops, PNG output and batch orchestration.

mod batch;
mod engine;
mod png;
mod report;

pub use batch::{pair_directory, slice_all, slice_all_with, PairEvent};
pub use engine::{cell_crop_rect, cell_file_name, check_output_root, sanitize_component, slice_grid};
pub use png::write_png;
pub use report::{BatchReport, SliceError, SliceErrorKind, SliceOutcome, SliceResult};
