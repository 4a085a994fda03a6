//! PNG output for sliced cells.

use std::fs;
use std::path::Path;

use crate::error::{Result, SlicerError};
use crate::types::PixelBuffer;

/// Encode `pixels` as PNG and write it to `path`.
///
/// Output is deterministic: the same pixels always produce the same bytes.
pub fn write_png<P: PixelBuffer>(pixels: &P, path: &Path) -> Result<()> {
    let bytes = pixels.encode_png().map_err(|e| SlicerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to encode PNG: {}", e),
    })?;

    fs::write(path, bytes).map_err(|e| SlicerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}
