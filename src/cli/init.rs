//! Init command implementation.
//!
//! Writes a starter `slice.yaml`, placing every image found in the directory
//! side by side on the canvas with a 2x2 grid over the first one.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{Result, SlicerError};
use crate::output::{display_path, plural, Printer};
use crate::project::{load_image, scan_images, Manifest, MANIFEST_FILENAME};

/// Write a starter slice.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan for images (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing slice.yaml
    #[arg(long)]
    pub force: bool,
}

/// An image found while initialising, with its native size.
struct Found {
    relative: String,
    width: u32,
    height: u32,
}

/// Render the starter manifest. Images are laid out left to right with
/// their centers on the x axis.
fn render_manifest(found: &[Found]) -> String {
    let mut yaml = String::new();
    yaml.push_str("# gridslice project\n");
    yaml.push_str("output: slices\n");

    if found.is_empty() {
        yaml.push_str("\n# images:\n#   - path: sheet.png\n#     position: [0, 0]   # display center\n#     scale: 1.0\n");
        yaml.push_str("\ngrids: []\n");
        return yaml;
    }

    yaml.push_str("\nimages:\n");
    let mut left = 0.0;
    for image in found {
        let center = left + f64::from(image.width) / 2.0;
        yaml.push_str(&format!("  - path: \"{}\"\n", image.relative));
        yaml.push_str(&format!("    position: [{}, 0]\n", center));
        yaml.push_str("    scale: 1.0\n");
        left += f64::from(image.width);
    }

    let first = &found[0];
    let (w, h) = (f64::from(first.width), f64::from(first.height));
    yaml.push_str("\ngrids:\n");
    yaml.push_str("  - name: cells\n");
    yaml.push_str(&format!("    frame: [0, {}, {}, {}]\n", -h / 2.0, w, h));
    yaml.push_str("    rows: 2\n");
    yaml.push_str("    columns: 2\n");
    yaml.push_str("    thickness: 0\n");

    yaml
}

fn find_images(root: &Path, printer: &Printer) -> Vec<Found> {
    let manifest = Manifest::default();
    let previous_output = root.join(&manifest.output);

    scan_images(root, &manifest)
        .into_iter()
        .filter(|path| !path.starts_with(&previous_output))
        .filter_map(|path| match load_image(&path) {
            Ok(pixels) => Some(Found {
                relative: path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/"),
                width: pixels.width(),
                height: pixels.height(),
            }),
            Err(e) => {
                printer.warning("Skipping", &e.to_string());
                None
            }
        })
        .collect()
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<PathBuf> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(SlicerError::Validation {
            message: format!("{} already exists", display_path(&manifest_path)),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let found = find_images(&args.path, printer);

    let yaml = render_manifest(&found);

    // Never write something `batch` could not read back.
    Manifest::parse(&yaml)?;

    fs::write(&manifest_path, &yaml).map_err(|e| SlicerError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.status(
        "Created",
        &format!(
            "{} ({})",
            display_path(&manifest_path),
            plural(found.len(), "image", "images")
        ),
    );

    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::load_project;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_init_empty_directory() {
        let dir = tempdir().unwrap();
        let path = run(
            InitArgs {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Printer::new(),
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert!(manifest.images.is_empty());
        assert!(manifest.grids.is_empty());
    }

    #[test]
    fn test_init_lays_out_images() {
        let dir = tempdir().unwrap();
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255]))
            .save(dir.path().join("a.png"))
            .unwrap();
        RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]))
            .save(dir.path().join("b.png"))
            .unwrap();

        run(
            InitArgs {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Printer::new(),
        )
        .unwrap();

        let project = load_project(dir.path()).unwrap();
        let board = &project.board;
        assert_eq!(board.images.len(), 2);
        assert_eq!(board.images[0].display_rect().x, 0.0);
        assert_eq!(board.images[1].display_rect().x, 40.0);

        // The starter grid covers the first image exactly.
        assert_eq!(board.grids[0].frame, board.images[0].display_rect());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: keep\n").unwrap();

        let result = run(
            InitArgs {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Printer::new(),
        );
        assert!(result.is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap(),
            "output: keep\n"
        );
    }
}
