//! Project manifest (slice.yaml) parsing.
//!
//! The manifest places images on the canvas and defines the grids laid over
//! them, plus where sliced output goes.

use std::path::{Path, PathBuf};

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicerError};
use crate::types::{Grid, LineStyle, Point, Rect};

/// Project manifest loaded from slice.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Output root for sliced cells.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Images placed explicitly.
    pub images: Vec<ImageEntry>,

    /// Directories scanned for images. Found images sit at the origin at
    /// scale 1.
    pub image_dirs: Vec<PathBuf>,

    /// Patterns to skip while scanning `image_dirs`.
    pub excludes: Vec<String>,

    pub grids: Vec<GridEntry>,
}

fn default_output() -> PathBuf {
    PathBuf::from("slices")
}

fn default_scale() -> f64 {
    1.0
}

fn default_count() -> u32 {
    1
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: default_output(),
            images: vec![],
            image_dirs: vec![],
            excludes: vec![],
            grids: vec![],
        }
    }
}

/// One placed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Relative to the manifest's directory.
    pub path: PathBuf,

    /// Defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,

    /// Display center in canvas space.
    #[serde(default)]
    pub position: [f64; 2],

    #[serde(default = "default_scale")]
    pub scale: f64,
}

/// One grid overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridEntry {
    /// Blank names are filled in as "Grid N".
    #[serde(default)]
    pub name: String,

    /// `[x, y, width, height]` in canvas space.
    pub frame: [f64; 4],

    #[serde(default = "default_count")]
    pub rows: u32,

    #[serde(default = "default_count")]
    pub columns: u32,

    #[serde(default)]
    pub thickness: f64,

    #[serde(default)]
    pub square: bool,

    #[serde(default)]
    pub line_style: Option<String>,

    /// Hex colour such as "#ff3b30".
    #[serde(default)]
    pub color: Option<String>,
}

impl ImageEntry {
    pub fn position(&self) -> Point {
        Point::new(self.position[0], self.position[1])
    }

    /// The configured name, or the file stem.
    pub fn effective_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| file_stem(&self.path))
    }
}

impl GridEntry {
    /// Build a grid, rejecting values the grid model would otherwise
    /// silently clamp.
    pub fn to_grid(&self) -> Result<Grid> {
        let label = if self.name.trim().is_empty() {
            "unnamed grid".to_string()
        } else {
            format!("grid '{}'", self.name)
        };

        if self.rows == 0 || self.columns == 0 {
            return Err(SlicerError::Validation {
                message: format!(
                    "{} has {} rows and {} columns",
                    label, self.rows, self.columns
                ),
                help: Some("Rows and columns must be at least 1".to_string()),
            });
        }

        if self.square && self.rows != self.columns {
            return Err(SlicerError::Validation {
                message: format!(
                    "{} is square but has {} rows and {} columns",
                    label, self.rows, self.columns
                ),
                help: Some("Use the same count for rows and columns, or drop 'square'".to_string()),
            });
        }

        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(SlicerError::Validation {
                message: format!("{} has invalid thickness {}", label, self.thickness),
                help: Some("Thickness must be zero or a positive number".to_string()),
            });
        }

        let line_style = match &self.line_style {
            Some(name) => LineStyle::from_name(name).ok_or_else(|| SlicerError::Parse {
                message: format!("Unknown line style '{}' on {}", name, label),
                help: Some("Use one of: solid, dashed, dotted".to_string()),
            })?,
            None => LineStyle::default(),
        };

        let [x, y, width, height] = self.frame;
        let mut grid = Grid::new(self.name.clone(), Rect::new(x, y, width, height), self.rows, self.columns)
            .with_thickness(self.thickness)
            .with_square(self.square)
            .with_line_style(line_style);

        if let Some(color) = &self.color {
            grid = grid.with_color(parse_color(color)?);
        }

        Ok(grid)
    }
}

/// Parse a "#rrggbb" or "#rgb" hex colour.
pub fn parse_color(s: &str) -> Result<Srgb<u8>> {
    s.trim().parse::<Srgb<u8>>().map_err(|e| SlicerError::Parse {
        message: format!("Invalid colour '{}': {}", s, e),
        help: Some("Use a hex colour such as \"#ff3b30\"".to_string()),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}

impl Manifest {
    /// Load manifest from a slice.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SlicerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| SlicerError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check slice.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be skipped while scanning `image_dirs`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }
}

/// Simple glob matching: `*.ext` suffixes, `dir/*` and `**/dir/*` directory
/// contents, and plain substrings.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(rest) = pattern.strip_prefix("**/") {
        return match rest.strip_suffix("/*") {
            Some(dir) => path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir)),
            None => path.ends_with(rest) || path.contains(rest),
        };
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    path.contains(pattern)
}
