//! Grid overlays and their per-cell boundaries.
//!
//! A grid is a `rows` x `columns` subdivision of a frame rectangle. Each cell
//! loses `logical_thickness` on every edge before export; that margin is the
//! gap between slices.

use std::fmt;

use palette::Srgb;
use serde::Serialize;
use uuid::Uuid;

use super::rect::Rect;

/// Stable identifier of a grid. Survives moves, resizes and clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GridId(Uuid);

impl GridId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GridId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How grid lines are drawn. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn name(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(LineStyle::Solid),
            "dashed" => Some(LineStyle::Dashed),
            "dotted" => Some(LineStyle::Dotted),
            _ => None,
        }
    }
}

/// Default overlay colour.
pub const DEFAULT_GRID_COLOR: Srgb<u8> = Srgb::new(255, 59, 48);

/// Position of a cell within its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellIndex {
    pub row: u32,
    pub column: u32,
}

impl CellIndex {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Row-major linear index for a grid with `columns` columns.
    pub fn index(&self, columns: u32) -> usize {
        self.row as usize * columns as usize + self.column as usize
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// One slicing overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub id: GridId,

    /// Export label; used in directory and file names.
    pub name: String,

    /// Placement and extent, in canvas space until transformed.
    pub frame: Rect,

    rows: u32,
    columns: u32,
    logical_thickness: f64,

    /// While set, `rows == columns` is kept by every setter.
    square: bool,

    pub line_style: LineStyle,
    pub color: Srgb<u8>,
}

impl Grid {
    /// Create a grid. Zero row or column counts are raised to one.
    pub fn new(name: impl Into<String>, frame: Rect, rows: u32, columns: u32) -> Self {
        Self {
            id: GridId::new(),
            name: name.into(),
            frame,
            rows: rows.max(1),
            columns: columns.max(1),
            logical_thickness: 0.0,
            square: false,
            line_style: LineStyle::default(),
            color: DEFAULT_GRID_COLOR,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.set_thickness(thickness);
        self
    }

    pub fn with_square(mut self, square: bool) -> Self {
        self.set_square(square);
        self
    }

    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.line_style = style;
        self
    }

    pub fn with_color(mut self, color: Srgb<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn logical_thickness(&self) -> f64 {
        self.logical_thickness
    }

    pub fn is_square(&self) -> bool {
        self.square
    }

    /// Set the row count. In square mode the column count follows.
    pub fn set_rows(&mut self, rows: u32) {
        self.rows = rows.max(1);
        if self.square {
            self.columns = self.rows;
        }
    }

    /// Set the column count. In square mode the row count follows.
    pub fn set_columns(&mut self, columns: u32) {
        self.columns = columns.max(1);
        if self.square {
            self.rows = self.columns;
        }
    }

    /// Set both counts. In square mode the row count wins.
    pub fn set_dimensions(&mut self, rows: u32, columns: u32) {
        self.rows = rows.max(1);
        self.columns = if self.square { self.rows } else { columns.max(1) };
    }

    /// Enter or leave square mode. Entering snaps columns to the row count.
    pub fn set_square(&mut self, square: bool) {
        self.square = square;
        if square {
            self.columns = self.rows;
        }
    }

    /// Negative and NaN thicknesses become zero.
    pub fn set_thickness(&mut self, thickness: f64) {
        self.logical_thickness = if thickness.is_finite() && thickness > 0.0 {
            thickness
        } else {
            0.0
        };
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.frame.x = x;
        self.frame.y = y;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.frame.width = width;
        self.frame.height = height;
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Nominal cell size before the thickness margin is removed.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.frame.width / f64::from(self.columns),
            self.frame.height / f64::from(self.rows),
        )
    }

    /// True when the thickness margin leaves no area in any cell.
    pub fn thickness_consumes_cells(&self) -> bool {
        let (w, h) = self.cell_size();
        2.0 * self.logical_thickness >= w.min(h)
    }

    /// Cell rectangles in row-major order, margins already removed.
    ///
    /// Degenerate cells (zero or negative size) are yielded, not skipped.
    pub fn cell_frames(&self) -> CellFrames {
        let (cell_width, cell_height) = self.cell_size();
        CellFrames {
            frame: self.frame,
            rows: self.rows,
            columns: self.columns,
            thickness: self.logical_thickness,
            cell_width,
            cell_height,
            next: 0,
        }
    }
}

/// Iterator over a grid's cells. Clone it to restart.
#[derive(Debug, Clone)]
pub struct CellFrames {
    frame: Rect,
    rows: u32,
    columns: u32,
    thickness: f64,
    cell_width: f64,
    cell_height: f64,
    next: usize,
}

impl CellFrames {
    fn total(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

impl Iterator for CellFrames {
    type Item = (CellIndex, Rect);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total() {
            return None;
        }

        let columns = self.columns as usize;
        let index = CellIndex::new((self.next / columns) as u32, (self.next % columns) as u32);
        self.next += 1;

        let t = self.thickness;
        let rect = Rect::new(
            self.frame.x + f64::from(index.column) * self.cell_width + t,
            self.frame.y + f64::from(index.row) * self.cell_height + t,
            self.cell_width - 2.0 * t,
            self.cell_height - 2.0 * t,
        );

        Some((index, rect))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellFrames {}
