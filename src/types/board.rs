//! A board: the grids and images of one slicing project.
//!
//! Selection lives on the board as an optional id rather than as a flag on
//! each grid.

use image::RgbaImage;

use super::grid::{Grid, GridId};
use super::canvas_image::{CanvasImage, ImageId};

#[derive(Debug, Clone)]
pub struct Board<P = RgbaImage> {
    pub grids: Vec<Grid>,
    pub images: Vec<CanvasImage<P>>,
    selected: Option<GridId>,
    grid_sequence: usize,
}

impl<P> Default for Board<P> {
    fn default() -> Self {
        Self {
            grids: Vec::new(),
            images: Vec::new(),
            selected: None,
            grid_sequence: 0,
        }
    }
}

impl<P> Board<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The name the next unnamed grid will receive.
    pub fn next_grid_name(&self) -> String {
        format!("Grid {}", self.grid_sequence + 1)
    }

    /// Add a grid, naming it from the sequence when its name is blank.
    pub fn add_grid(&mut self, mut grid: Grid) -> GridId {
        if grid.name.trim().is_empty() {
            grid.name = self.next_grid_name();
        }
        self.grid_sequence += 1;

        let id = grid.id;
        self.grids.push(grid);
        id
    }

    pub fn add_image(&mut self, image: CanvasImage<P>) -> ImageId {
        let id = image.id;
        self.images.push(image);
        id
    }

    /// Remove a grid, clearing the selection if it pointed at it.
    pub fn remove_grid(&mut self, id: GridId) -> Option<Grid> {
        let index = self.grids.iter().position(|g| g.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.grids.remove(index))
    }

    pub fn grid(&self, id: GridId) -> Option<&Grid> {
        self.grids.iter().find(|g| g.id == id)
    }

    pub fn grid_mut(&mut self, id: GridId) -> Option<&mut Grid> {
        self.grids.iter_mut().find(|g| g.id == id)
    }

    /// Select a grid by id, or clear the selection with `None`.
    /// Returns false (and leaves the selection alone) for unknown ids.
    pub fn select(&mut self, id: Option<GridId>) -> bool {
        match id {
            Some(id) if self.grid(id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<GridId> {
        self.selected
    }

    pub fn selected_grid(&self) -> Option<&Grid> {
        self.selected.and_then(|id| self.grid(id))
    }
}
