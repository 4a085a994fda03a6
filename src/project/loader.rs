//! Turning a manifest into a board of decoded images and grids.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Result, SlicerError};
use crate::types::{Board, CanvasImage, Point};

use super::manifest::Manifest;
use super::scanner::scan_images;

/// Decode an image file into an RGBA buffer.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(SlicerError::Io {
            path: path.to_path_buf(),
            message: "File not found".to_string(),
        });
    }

    let img = image::open(path).map_err(|e| SlicerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to load image: {}", e),
    })?;

    Ok(img.to_rgba8())
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}

/// Build a board from `manifest`. Relative paths resolve against `base_dir`.
///
/// Explicit images come first, in manifest order, followed by images found
/// under `image_dirs`. Grids keep manifest order; blank names are filled in.
pub fn load_board(manifest: &Manifest, base_dir: &Path) -> Result<Board> {
    let mut board = Board::new();

    for entry in &manifest.images {
        let path = resolve(base_dir, &entry.path);
        let pixels = load_image(&path)?;
        board.add_image(CanvasImage::new(
            entry.effective_name(),
            pixels,
            entry.position(),
            entry.scale,
        )?);
    }

    for dir in &manifest.image_dirs {
        for path in scan_images(&resolve(base_dir, dir), manifest) {
            let pixels = load_image(&path)?;
            board.add_image(CanvasImage::new(stem(&path), pixels, Point::ORIGIN, 1.0)?);
        }
    }

    for entry in &manifest.grids {
        board.add_grid(entry.to_grid()?);
    }

    Ok(board)
}
