use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gridslice operations.
///
/// Per-cell and per-pair slicing problems are not represented here; they are
/// collected as [`crate::slice::SliceError`] values. This type covers the
/// conditions that stop an operation outright.
#[derive(Error, Diagnostic, Debug)]
pub enum SlicerError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(gridslice::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(gridslice::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(gridslice::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Output directory {path} is not writable: {message}")]
    #[diagnostic(
        code(gridslice::output_root),
        help("Create the directory first, or pick one you can write to")
    )]
    OutputRootUnwritable {
        path: std::path::PathBuf,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SlicerError>;
