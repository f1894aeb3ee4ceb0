//! # Occupancy grid
//!
//! Rasterises the walls of an environment into a uniform grid of square cells. A cell is occupied
//! if any wall touches the cell's closed world rectangle.
//!
//! Three coordinate spaces are used:
//! - world: the coordinates the walls are given in,
//! - local: world coordinates relative to the bottom left of the grid bounds,
//! - index: integer cell coordinates in `[0, W) x [0, H)`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashSet;

use log::trace;

use crate::geom::{segment_intersects_rect, Point, Rect, Wall};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A rasterised obstacle field.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    /// Width and height of every cell in world units
    cell_size: i32,

    /// World space region covered by the grid
    bounds: Rect,

    /// Number of cells in each axis
    size: Point,

    /// Indices of all cells touched by a wall
    occupied: HashSet<Point>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("The grid cell size must be positive, got {0}")]
    InvalidCellSize(i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OccupancyGrid {
    /// Rasterise the walls into a grid covering `bounds`.
    ///
    /// Every wall is tested against every cell, the grid has
    /// `floor(bounds.size / cell_size)` cells per axis.
    pub fn build(cell_size: i32, bounds: Rect, walls: &[Wall]) -> Result<Self, GridError> {
        if cell_size <= 0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }

        let size = if bounds.is_empty() {
            Point::zeros()
        } else {
            bounds.size / cell_size
        };

        let mut grid = Self {
            cell_size,
            bounds,
            size,
            occupied: HashSet::new(),
        };

        for index in Rect::new(Point::zeros(), size).cells() {
            let cell = grid.cell_rect(&index);

            if walls.iter().any(|w| w.intersects(&cell)) {
                grid.occupied.insert(index);
            }
        }

        trace!(
            "Built {}x{} grid with {} occupied cells",
            size.x,
            size.y,
            grid.occupied.len()
        );

        Ok(grid)
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Number of cells in each axis.
    pub fn size(&self) -> Point {
        self.size
    }

    /// The grid's index space as a rectangle.
    pub fn index_rect(&self) -> Rect {
        Rect::new(Point::zeros(), self.size)
    }

    pub fn is_in_bounds(&self, index: &Point) -> bool {
        index.x >= 0 && index.x < self.size.x && index.y >= 0 && index.y < self.size.y
    }

    pub fn is_occupied(&self, index: &Point) -> bool {
        self.occupied.contains(index)
    }

    /// True if any cell covered by `rect` is occupied.
    pub fn is_occupied_rect(&self, rect: &Rect) -> bool {
        // Scanning the occupied set is cheaper once the rect is larger than the set
        if rect.area() as usize > self.occupied.len() {
            self.occupied.iter().any(|i| rect.contains(i))
        } else {
            rect.cells().any(|i| self.is_occupied(&i))
        }
    }

    /// True if every cell covered by `rect` is inside the grid and unoccupied.
    pub fn is_free_rect(&self, rect: &Rect) -> bool {
        rect.is_inside(&self.index_rect()) && !self.is_occupied_rect(rect)
    }

    /// Index of the cell containing the world position, or `None` if it is outside the grid.
    pub fn position_to_cell_index(&self, position: &Point) -> Option<Point> {
        self.local_position_to_cell_index(&(position - self.bounds.position))
    }

    /// Index of the cell containing the local position, or `None` if it is outside the grid.
    pub fn local_position_to_cell_index(&self, local: &Point) -> Option<Point> {
        if local.x < 0 || local.y < 0 || local.x >= self.bounds.size.x || local.y >= self.bounds.size.y
        {
            return None;
        }

        let index = local / self.cell_size;

        if self.is_in_bounds(&index) {
            Some(index)
        } else {
            None
        }
    }

    /// Convert a rectangle in index space into a world space rectangle.
    pub fn cell_rect_to_absolute(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.bounds.position + rect.position * self.cell_size,
            rect.size * self.cell_size,
        )
    }

    /// Convert a rectangle in index space into a local space rectangle.
    pub fn cell_rect_to_local(&self, rect: &Rect) -> Rect {
        Rect::new(rect.position * self.cell_size, rect.size * self.cell_size)
    }

    /// World rectangle of a single cell.
    pub fn cell_rect(&self, index: &Point) -> Rect {
        self.cell_rect_to_absolute(&Rect::unit(*index))
    }

    /// Local position of the middle of the cell.
    pub fn cell_index_to_middle_position(&self, index: &Point) -> Point {
        index * self.cell_size + Point::new(self.cell_size, self.cell_size) / 2
    }

    /// Iterate over all occupied cell indices, in no particular order.
    pub fn occupied_indices(&self) -> impl Iterator<Item = &Point> {
        self.occupied.iter()
    }

    pub fn num_occupied(&self) -> usize {
        self.occupied.len()
    }

    /// Reset the grid to an empty, zero size grid.
    pub fn clear(&mut self) {
        self.occupied.clear();
        self.bounds = Rect::empty();
        self.size = Point::zeros();
    }

    /// Every cell whose rectangle touches the segment between two local positions.
    ///
    /// Only cells around the segment's bounding box are tested, this gives the same cells as
    /// testing every cell in the grid.
    pub fn trace_line(&self, local_src: &Point, local_dst: &Point) -> Vec<Point> {
        let mut cells = Vec::new();

        if self.size.x == 0 || self.size.y == 0 {
            return cells;
        }

        let low = Point::new(local_src.x.min(local_dst.x), local_src.y.min(local_dst.y));
        let high = Point::new(local_src.x.max(local_dst.x), local_src.y.max(local_dst.y));

        // A point on a cell edge touches the cells either side of it, so pad the box by one cell
        let first = Point::new(
            (low.x.div_euclid(self.cell_size) - 1).max(0),
            (low.y.div_euclid(self.cell_size) - 1).max(0),
        );
        let last = Point::new(
            (high.x.div_euclid(self.cell_size) + 1).min(self.size.x - 1),
            (high.y.div_euclid(self.cell_size) + 1).min(self.size.y - 1),
        );

        if first.x > last.x || first.y > last.y {
            return cells;
        }

        let world_src = self.bounds.position + local_src;
        let world_dst = self.bounds.position + local_dst;

        for index in Rect::new(first, last - first + Point::new(1, 1)).cells() {
            if segment_intersects_rect(&world_src, &world_dst, &self.cell_rect(&index)) {
                cells.push(index);
            }
        }

        cells
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
