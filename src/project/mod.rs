//! Slicing projects: the slice.yaml manifest, image discovery and board
//! loading.
//!
//! # Example
//!
//! ```ignore
//! use gridslice::project::{load_project, MANIFEST_FILENAME};
//!
//! let project = load_project("./my-project".as_ref())?;
//! println!("{} grids over {} images", project.board.grids.len(), project.board.images.len());
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Board;

pub use loader::{load_board, load_image};
pub use manifest::{parse_color, GridEntry, ImageEntry, Manifest};
pub use scanner::{is_image_file, scan_images, IMAGE_EXTENSIONS};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "slice.yaml";

/// A loaded project.
#[derive(Debug)]
pub struct Project {
    /// Directory the manifest lives in; relative paths resolve against it.
    pub root: PathBuf,
    pub manifest: Manifest,
    pub board: Board,
}

impl Project {
    /// The output root, resolved against the project directory.
    pub fn output_root(&self) -> PathBuf {
        if self.manifest.output.is_absolute() {
            self.manifest.output.clone()
        } else {
            self.root.join(&self.manifest.output)
        }
    }
}

/// Resolve `path` to a manifest file: directories get `slice.yaml` appended.
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILENAME)
    } else {
        path.to_path_buf()
    }
}

/// Load a manifest (or a directory containing one) and its board.
pub fn load_project(path: &Path) -> Result<Project> {
    let manifest_file = manifest_path(path);
    let manifest = Manifest::load(&manifest_file)?;

    let root = manifest_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let board = load_board(&manifest, &root)?;

    Ok(Project {
        root,
        manifest,
        board,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_project_from_directory() {
        let dir = tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))
            .save(dir.path().join("a.png"))
            .unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "output: out\nimages:\n  - path: a.png\ngrids:\n  - name: g\n    frame: [-2, -2, 4, 4]\n",
        )
        .unwrap();

        let project = load_project(dir.path()).unwrap();
        assert_eq!(project.root, dir.path());
        assert_eq!(project.output_root(), dir.path().join("out"));
        assert_eq!(project.board.images.len(), 1);
        assert_eq!(project.board.grids[0].name, "g");
    }

    #[test]
    fn test_load_project_missing_manifest() {
        let dir = tempdir().unwrap();
        assert!(load_project(dir.path()).is_err());
    }
}
