//! Cropping and writing the cells of one pixel-space grid.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{Result, SlicerError};
use crate::types::{CellIndex, Grid, PixelBuffer, PixelRect, Rect};

use super::png::write_png;
use super::report::{SliceError, SliceErrorKind, SliceOutcome, SliceResult};

/// Fail unless `dir` is an existing directory the current user can write to.
///
/// This is the only fatal check in slicing and runs before any file work.
pub fn check_output_root(dir: &Path) -> Result<()> {
    let unwritable = |message: String| SlicerError::OutputRootUnwritable {
        path: dir.to_path_buf(),
        message,
    };

    let metadata = fs::metadata(dir).map_err(|e| unwritable(e.to_string()))?;

    if !metadata.is_dir() {
        return Err(unwritable("not a directory".to_string()));
    }

    ensure_writable(dir).map_err(|e| unwritable(e.to_string()))
}

/// Create and remove a uniquely named scratch file in `dir`.
pub(crate) fn ensure_writable(dir: &Path) -> io::Result<()> {
    let scratch = dir.join(format!(".gridslice-{}", Uuid::new_v4()));
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&scratch)?;
    fs::remove_file(&scratch)
}

/// Make a name safe to use as a single path component.
///
/// Path separators, control characters and whitespace become `_`; a blank
/// name falls back to `fallback`.
pub fn sanitize_component(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// `<grid>_<row>_<col>.png`
pub fn cell_file_name(grid_name: &str, cell: CellIndex) -> String {
    format!(
        "{}_{}_{}.png",
        sanitize_component(grid_name, "grid"),
        cell.row,
        cell.column
    )
}

/// The pixel crop for `cell`: clipped to `bounds`, origin floored, far edge
/// ceiled, clamped again. `None` when nothing is left.
pub fn cell_crop_rect(cell: &Rect, bounds: &Rect) -> Option<PixelRect> {
    let clipped = cell.intersection(bounds);
    PixelRect::enclosing(&clipped, bounds.width as u32, bounds.height as u32)
}

/// Crop every cell of `grid` out of `pixels` and write each to
/// `output_dir/<grid>_<row>_<col>.png`.
///
/// `grid` must already be in the buffer's pixel space. A grid with an empty
/// frame is a no-op. A bad cell is recorded and the remaining cells are still
/// processed, so results and errors can both come back non-empty. Only an
/// unusable `output_dir` is an `Err`.
pub fn slice_grid<P: PixelBuffer>(
    grid: &Grid,
    pixels: &P,
    output_dir: &Path,
) -> Result<SliceOutcome> {
    check_output_root(output_dir)?;
    Ok(slice_cells(grid, pixels, output_dir))
}

/// [`slice_grid`] without the directory check; every failure is per cell.
pub(crate) fn slice_cells<P: PixelBuffer>(
    grid: &Grid,
    pixels: &P,
    output_dir: &Path,
) -> SliceOutcome {
    let mut outcome = SliceOutcome::default();

    if grid.frame.is_empty() {
        return outcome;
    }

    let bounds = pixels.bounds();

    for (index, cell) in grid.cell_frames() {
        if cell.is_empty() {
            outcome.errors.push(
                SliceError::new(SliceErrorKind::DegenerateCell, grid)
                    .with_cell(index)
                    .with_message(format!(
                        "thickness {} leaves no area in a {}x{} cell",
                        grid.logical_thickness(),
                        grid.cell_size().0,
                        grid.cell_size().1
                    )),
            );
            continue;
        }

        let Some(rect) = cell_crop_rect(&cell, &bounds) else {
            outcome.errors.push(
                SliceError::new(SliceErrorKind::CropFailure, grid)
                    .with_cell(index)
                    .with_message("cell lies outside the image"),
            );
            continue;
        };

        let cropped = match pixels.crop(rect) {
            Ok(cropped) => cropped,
            Err(e) => {
                outcome.errors.push(
                    SliceError::new(SliceErrorKind::CropFailure, grid)
                        .with_cell(index)
                        .with_message(e.to_string()),
                );
                continue;
            }
        };

        let path: PathBuf = output_dir.join(cell_file_name(&grid.name, index));

        if let Err(e) = write_png(&cropped, &path) {
            outcome.errors.push(
                SliceError::new(SliceErrorKind::WriteFailure, grid)
                    .with_cell(index)
                    .with_path(&path)
                    .with_message(e.to_string()),
            );
            continue;
        }

        outcome.results.push(SliceResult {
            grid_id: grid.id,
            row: index.row,
            column: index.column,
            path,
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CropError;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn buffer(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("tiles", "grid"), "tiles");
        assert_eq!(sanitize_component("Grid 1", "grid"), "Grid_1");
        assert_eq!(sanitize_component("a/b\\c", "grid"), "a_b_c");
        assert_eq!(sanitize_component("   ", "grid"), "grid");
        assert_eq!(sanitize_component("..", "grid"), "grid");
    }

    #[test]
    fn test_cell_file_name() {
        assert_eq!(cell_file_name("tiles", CellIndex::new(2, 3)), "tiles_2_3.png");
    }

    #[test]
    fn test_cell_crop_rect_clips_to_bounds() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let rect = cell_crop_rect(&Rect::new(90.5, -3.0, 20.0, 10.0), &bounds).unwrap();
        assert_eq!(rect, PixelRect::new(90, 0, 10, 7));
        assert_eq!(cell_crop_rect(&Rect::new(200.0, 0.0, 5.0, 5.0), &bounds), None);
    }

    #[test]
    fn test_slice_grid_writes_cells() {
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 4.0, 4.0), 2, 2);

        let outcome = slice_grid(&grid, &buffer(4, 4), dir.path()).unwrap();

        assert!(outcome.is_clean());
        assert_eq!(outcome.results.len(), 4);
        assert_eq!((outcome.results[1].row, outcome.results[1].column), (0, 1));
        assert_eq!(outcome.results[1].path, dir.path().join("tiles_0_1.png"));

        let cell = image::open(dir.path().join("tiles_1_1.png")).unwrap().to_rgba8();
        assert_eq!(cell.dimensions(), (2, 2));
        assert_eq!(cell.get_pixel(0, 0).0, [2, 2, 0, 255]);
    }

    #[test]
    fn test_slice_grid_empty_frame_is_noop() {
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::zero(), 2, 2);

        let outcome = slice_grid(&grid, &buffer(4, 4), dir.path()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_slice_grid_degenerate_cells() {
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 20.0, 20.0), 2, 2).with_thickness(5.0);

        let outcome = slice_grid(&grid, &buffer(20, 20), dir.path()).unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 4);
        assert!(outcome
            .errors
            .iter()
            .all(|e| e.kind == SliceErrorKind::DegenerateCell));
    }

    #[test]
    fn test_slice_grid_cells_outside_buffer() {
        // A canvas-space grid passed straight in: the right column misses.
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 20.0, 10.0), 1, 2);

        let outcome = slice_grid(&grid, &buffer(10, 10), dir.path()).unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, SliceErrorKind::CropFailure);
        assert_eq!(outcome.errors[0].cell, Some(CellIndex::new(0, 1)));
    }

    #[test]
    fn test_slice_grid_missing_output_dir_is_fatal() {
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 4.0, 4.0), 1, 1);

        let err = slice_grid(&grid, &buffer(4, 4), &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SlicerError::OutputRootUnwritable { .. }));
    }

    #[test]
    fn test_check_output_root_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(check_output_root(&file).is_err());
        assert!(check_output_root(dir.path()).is_ok());
    }

    #[test]
    fn test_check_output_root_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        check_output_root(dir.path()).unwrap();
        check_output_root(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_check_output_root_agrees_with_a_real_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores mode bits, so ask the filesystem what this user can do.
        let can_write = fs::write(locked.join("attempt"), b"x").is_ok();
        let _ = fs::remove_file(locked.join("attempt"));

        let checked = check_output_root(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(checked.is_ok(), can_write);
        if let Err(err) = checked {
            assert!(matches!(err, SlicerError::OutputRootUnwritable { .. }));
        }
    }

    /// A buffer that refuses every crop.
    struct Stubborn;

    impl PixelBuffer for Stubborn {
        fn width(&self) -> u32 {
            8
        }

        fn height(&self) -> u32 {
            8
        }

        fn crop(&self, rect: PixelRect) -> std::result::Result<Self, CropError> {
            Err(CropError {
                rect,
                width: 8,
                height: 8,
            })
        }

        fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_crop_failure_does_not_abort_grid() {
        let dir = tempdir().unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 8.0, 8.0), 2, 2);

        let outcome = slice_grid(&grid, &Stubborn, dir.path()).unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 4);
        assert!(outcome.errors.iter().all(|e| e.kind == SliceErrorKind::CropFailure));
    }

    #[test]
    fn test_write_failure_is_per_cell() {
        let dir = tempdir().unwrap();
        // A directory squatting on one output file name makes that write fail.
        fs::create_dir(dir.path().join("tiles_0_1.png")).unwrap();
        let grid = Grid::new("tiles", Rect::new(0.0, 0.0, 4.0, 2.0), 1, 2);

        let outcome = slice_grid(&grid, &buffer(4, 2), dir.path()).unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, SliceErrorKind::WriteFailure);
        assert_eq!(outcome.errors[0].path, Some(dir.path().join("tiles_0_1.png")));
    }
}
