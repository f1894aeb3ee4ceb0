//! # Coverage decomposition
//!
//! Groups the cells of an [`OccupancyGrid`] into coverage cells the size of the robot's
//! footprint, and derives for each of them:
//! - the free space zones inside the cell,
//! - the full coverage zones, squares of `coverage_size` cells the robot can sweep in one pass,
//! - the visit points at the centre of each full coverage zone.
//!
//! Every cache is keyed by coverage cell and is rebuilt as a whole by
//! [`CoverageDecomposer::rebuild`]. The decomposer owns its grid, so the caches can only go stale
//! through [`CoverageDecomposer::rebuild_from`], which rebuilds them immediately.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::{
    geom::{GrowDirection, Point, Rect, GROWTH_ORDER},
    grid::OccupancyGrid,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Decomposes an occupancy grid into coverage cells, zones and visit points.
#[derive(Debug, Clone)]
pub struct CoverageDecomposer {
    grid: OccupancyGrid,

    /// Number of grid cells along each edge of a coverage cell
    coverage_size: i32,

    /// Number of coverage cells in each axis
    coverage_grid_size: Point,

    /// Free space zones of each coverage cell, in grid index space
    zone_decomposition: HashMap<Point, Vec<Rect>>,

    /// Full coverage zones grown from each coverage cell's zones, in grid index space
    full_coverage_zone_decomposition: HashMap<Point, Vec<Rect>>,

    /// Visit points whose local position lies within each coverage cell
    located_visit_points: HashMap<Point, Vec<Point>>,

    /// Visit points produced while decomposing each coverage cell
    produced_visit_points: HashMap<Point, Vec<Point>>,

    /// All unique visit points, in the order they were produced
    visit_points: Vec<Point>,

    /// Visit points located in coverage cells with several zones or any occupied cell
    wall_visit_points: Vec<Point>,

    /// Grid cells from which a full coverage square can be grown
    full_coverage_support: HashSet<Point>,

    /// Rectangles of coverage cells that contain no occupied grid cell
    simple_zones: Vec<Rect>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("The coverage size must be at least one grid cell, got {0}")]
    InvalidCoverageSize(i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverageDecomposer {
    /// Create a new decomposer over the grid and build all caches.
    pub fn new(grid: OccupancyGrid, coverage_size: i32) -> Result<Self, CoverageError> {
        if coverage_size < 1 {
            return Err(CoverageError::InvalidCoverageSize(coverage_size));
        }

        let mut decomposer = Self {
            grid,
            coverage_size,
            coverage_grid_size: Point::zeros(),
            zone_decomposition: HashMap::new(),
            full_coverage_zone_decomposition: HashMap::new(),
            located_visit_points: HashMap::new(),
            produced_visit_points: HashMap::new(),
            visit_points: Vec::new(),
            wall_visit_points: Vec::new(),
            full_coverage_support: HashSet::new(),
            simple_zones: Vec::new(),
        };

        decomposer.rebuild();

        Ok(decomposer)
    }

    /// Replace the grid and rebuild every cache from it.
    pub fn rebuild_from(&mut self, grid: OccupancyGrid) {
        self.grid = grid;
        self.rebuild();
    }

    /// Recompute every cache from the current grid.
    pub fn rebuild(&mut self) {
        self.zone_decomposition.clear();
        self.full_coverage_zone_decomposition.clear();
        self.located_visit_points.clear();
        self.produced_visit_points.clear();
        self.visit_points.clear();
        self.wall_visit_points.clear();
        self.full_coverage_support.clear();
        self.simple_zones.clear();

        let grid_size = self.grid.size();
        self.coverage_grid_size = Point::new(
            (grid_size.x + self.coverage_size - 1) / self.coverage_size,
            (grid_size.y + self.coverage_size - 1) / self.coverage_size,
        );

        // ---- PER CELL PASS ----

        let cells: Vec<Point> = self.coverage_cells().collect();

        for cell in cells.iter() {
            let zones = self.make_zone_decomposition(cell);
            let full_zones = self.to_full_coverage_zones(&zones);
            let produced: Vec<Point> = full_zones.iter().map(|z| self.make_visit_point(z)).collect();

            trace!(
                "Coverage cell ({}, {}): {} zones, {} full coverage zones",
                cell.x,
                cell.y,
                zones.len(),
                full_zones.len()
            );

            self.zone_decomposition.insert(*cell, zones);
            self.full_coverage_zone_decomposition.insert(*cell, full_zones);
            self.produced_visit_points.insert(*cell, produced);
            self.located_visit_points.insert(*cell, Vec::new());
        }

        // ---- RELOCATION ----

        // A full coverage zone may be grown outside of the cell that produced it, so its visit
        // point is filed under the cell it actually lies in.
        let mut seen = HashSet::new();
        for cell in cells.iter() {
            let produced = match self.produced_visit_points.get(cell) {
                Some(p) => p.clone(),
                None => continue,
            };

            for point in produced {
                if !seen.insert(point) {
                    continue;
                }

                match self.local_to_coverage_cell(&point) {
                    Some(located) => {
                        self.visit_points.push(point);
                        self.located_visit_points
                            .entry(located)
                            .or_insert_with(Vec::new)
                            .push(point);
                    }
                    None => trace!("Visit point ({}, {}) lies outside the grid", point.x, point.y),
                }
            }
        }

        // ---- DERIVED CACHES ----

        for cell in cells.iter() {
            let multi_zone = self.zones(cell).map(|z| z.len() > 1).unwrap_or(false);

            if multi_zone || self.has_any_occupied(cell) {
                if let Some(points) = self.located_visit_points.get(cell) {
                    self.wall_visit_points.extend(points.iter().copied());
                }
            }
        }

        let supported: Vec<Point> = self
            .grid
            .index_rect()
            .cells()
            .filter(|i| self.try_extend_until_full_coverage(&Rect::unit(*i)).is_some())
            .collect();
        self.full_coverage_support.extend(supported);

        self.simple_zones = self.make_simple_zones();

        debug!(
            "Coverage rebuilt: {}x{} coverage cells, {} visit points ({} near walls), {} simple \
            zones",
            self.coverage_grid_size.x,
            self.coverage_grid_size.y,
            self.visit_points.len(),
            self.wall_visit_points.len(),
            self.simple_zones.len()
        );
    }

    // ---- ACCESSORS ----

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn coverage_size(&self) -> i32 {
        self.coverage_size
    }

    pub fn coverage_grid_size(&self) -> Point {
        self.coverage_grid_size
    }

    /// Zones of the coverage cell, `None` if the cell is outside the coverage grid.
    pub fn zones(&self, cell: &Point) -> Option<&[Rect]> {
        self.zone_decomposition.get(cell).map(Vec::as_slice)
    }

    pub fn full_coverage_zones(&self, cell: &Point) -> Option<&[Rect]> {
        self.full_coverage_zone_decomposition
            .get(cell)
            .map(Vec::as_slice)
    }

    pub fn located_visit_points(&self, cell: &Point) -> Option<&[Point]> {
        self.located_visit_points.get(cell).map(Vec::as_slice)
    }

    pub fn produced_visit_points(&self, cell: &Point) -> Option<&[Point]> {
        self.produced_visit_points.get(cell).map(Vec::as_slice)
    }

    pub fn visit_points(&self) -> &[Point] {
        &self.visit_points
    }

    pub fn wall_visit_points(&self) -> &[Point] {
        &self.wall_visit_points
    }

    pub fn simple_zones(&self) -> &[Rect] {
        &self.simple_zones
    }

    // ---- COORDINATES ----

    /// Iterate over every coverage cell, row by row.
    pub fn coverage_cells(&self) -> impl Iterator<Item = Point> {
        Rect::new(Point::zeros(), self.coverage_grid_size).cells()
    }

    pub fn is_in_bounds(&self, cell: &Point) -> bool {
        cell.x >= 0
            && cell.x < self.coverage_grid_size.x
            && cell.y >= 0
            && cell.y < self.coverage_grid_size.y
    }

    pub fn grid_to_coverage_cell(&self, index: &Point) -> Point {
        Point::new(
            index.x.div_euclid(self.coverage_size),
            index.y.div_euclid(self.coverage_size),
        )
    }

    /// Coverage cell containing a local position, if it lies inside the grid.
    pub fn local_to_coverage_cell(&self, local: &Point) -> Option<Point> {
        self.grid
            .local_position_to_cell_index(local)
            .map(|i| self.grid_to_coverage_cell(&i))
    }

    /// Grid index space rectangle of the coverage cell. May extend past the edge of the grid.
    pub fn coverage_cell_rect(&self, cell: &Point) -> Rect {
        Rect::new(
            cell * self.coverage_size,
            Point::new(self.coverage_size, self.coverage_size),
        )
    }

    /// Convert a grid index space rectangle into local space.
    pub fn cell_to_local_rect(&self, rect: &Rect) -> Rect {
        self.grid.cell_rect_to_local(rect)
    }

    pub fn coverage_cell_local_rect(&self, cell: &Point) -> Rect {
        self.cell_to_local_rect(&self.coverage_cell_rect(cell))
    }

    /// Convert a simple zone, in coverage cell units, into local space.
    pub fn simple_zone_to_local(&self, zone: &Rect) -> Rect {
        self.cell_to_local_rect(&Rect::new(
            zone.position * self.coverage_size,
            zone.size * self.coverage_size,
        ))
    }

    pub fn has_any_occupied(&self, cell: &Point) -> bool {
        self.grid.is_occupied_rect(&self.coverage_cell_rect(cell))
    }

    // ---- ZONES ----

    fn try_extend_in_coverage_cell(
        &self,
        rect: &Rect,
        direction: GrowDirection,
        cell_rect: &Rect,
    ) -> Option<Rect> {
        let new_rect = rect.extend(direction);

        if new_rect.is_inside(cell_rect) && self.grid.is_free_rect(&new_rect) {
            Some(new_rect)
        } else {
            None
        }
    }

    /// Grow the rectangle as far as possible in each direction in turn, staying inside its
    /// coverage cell.
    pub fn extend_as_much_in_coverage_cell(&self, rect: &Rect) -> Rect {
        let cell_rect = self.coverage_cell_rect(&self.grid_to_coverage_cell(&rect.position));
        let mut rect = *rect;

        for direction in GROWTH_ORDER.iter() {
            while let Some(r) = self.try_extend_in_coverage_cell(&rect, *direction, &cell_rect) {
                rect = r;
            }
        }

        rect
    }

    /// Grow a zone from a single grid cell, `None` if the cell is not free.
    pub fn make_zone_from(&self, index: &Point) -> Option<Rect> {
        let unit = Rect::unit(*index);

        if !self.grid.is_free_rect(&unit) {
            return None;
        }

        Some(self.extend_as_much_in_coverage_cell(&unit))
    }

    /// All distinct zones which can be grown from the free cells of the coverage cell.
    pub fn make_zone_decomposition(&self, cell: &Point) -> Vec<Rect> {
        let cell_rect = self
            .coverage_cell_rect(cell)
            .intersection(&self.grid.index_rect());
        let mut zones = Vec::new();

        for index in cell_rect.cells() {
            if let Some(zone) = self.make_zone_from(&index) {
                if !zones.contains(&zone) {
                    zones.push(zone);
                }
            }
        }

        zones
    }

    /// Grow the rectangle to exactly `coverage_size` cells square, ignoring coverage cell
    /// boundaries.
    ///
    /// Returns `None` if the rectangle is not free to begin with or cannot reach full size.
    pub fn try_extend_until_full_coverage(&self, rect: &Rect) -> Option<Rect> {
        if !self.grid.is_free_rect(rect) {
            return None;
        }

        let mut rect = *rect;

        for direction in GROWTH_ORDER.iter() {
            loop {
                let new_rect = rect.extend(*direction);

                if new_rect.size.x > self.coverage_size
                    || new_rect.size.y > self.coverage_size
                    || !self.grid.is_free_rect(&new_rect)
                {
                    break;
                }

                rect = new_rect;
            }
        }

        if rect.size == Point::new(self.coverage_size, self.coverage_size) {
            Some(rect)
        } else {
            None
        }
    }

    /// Grow each zone to full coverage, dropping those which cannot reach it.
    pub fn to_full_coverage_zones(&self, zones: &[Rect]) -> Vec<Rect> {
        let mut full_zones = Vec::new();

        for zone in zones {
            if let Some(full) = self.try_extend_until_full_coverage(zone) {
                if !full_zones.contains(&full) {
                    full_zones.push(full);
                }
            }
        }

        full_zones
    }

    /// Local position of the centre of a zone.
    pub fn make_visit_point(&self, zone: &Rect) -> Point {
        self.cell_to_local_rect(zone).centre()
    }

    // ---- VISIT POINT QUERIES ----

    /// All visit points located in the `(2 * dims - 1)` square block of coverage cells centred
    /// on `cell`. Cells outside the coverage grid contribute nothing.
    pub fn gather_coverage_visit_points_in_radius(&self, cell: &Point, dims: i32) -> Vec<Point> {
        let reach = dims - 1;
        let mut points = Vec::new();

        if reach < 0 {
            return points;
        }

        let block = Rect::new(
            cell - Point::new(reach, reach),
            Point::new(2 * reach + 1, 2 * reach + 1),
        );

        for c in block.cells() {
            if let Some(located) = self.located_visit_points(&c) {
                points.extend_from_slice(located);
            }
        }

        points
    }

    /// Visit points of the eight surrounding coverage cells.
    pub fn gather_neighbours_visit_points(&self, cell: &Point) -> Vec<Point> {
        let own = self.located_visit_points(cell).unwrap_or(&[]);

        self.gather_coverage_visit_points_in_radius(cell, 2)
            .into_iter()
            .filter(|p| !own.contains(p))
            .collect()
    }

    /// First visit point of the coverage cell containing the local position.
    pub fn local_nearest_visit_point_to(&self, local: &Point) -> Option<Point> {
        let cell = self.local_to_coverage_cell(local)?;

        self.located_visit_points(&cell)
            .and_then(|points| points.first())
            .copied()
    }

    // ---- REACHABILITY ----

    /// True if a full coverage square can be grown from the grid cell.
    pub fn supports_full_coverage(&self, index: &Point) -> bool {
        self.full_coverage_support.contains(index)
    }

    /// True if the robot's footprint fits over every grid cell touched by the straight line
    /// between the two local positions.
    pub fn are_directly_reachable(&self, local_src: &Point, local_dst: &Point) -> bool {
        self.grid
            .trace_line(local_src, local_dst)
            .iter()
            .all(|i| self.supports_full_coverage(i))
    }

    // ---- SIMPLE ZONES ----

    /// Greedy rectangles of coverage cells without any occupied grid cell, grown in +x then +y
    /// from the first unclaimed cell in row order.
    fn make_simple_zones(&self) -> Vec<Rect> {
        let mut claimed = HashSet::new();
        let mut zones = Vec::new();

        let is_open =
            |c: &Point, claimed: &HashSet<Point>| !claimed.contains(c) && !self.has_any_occupied(c);

        for cell in self.coverage_cells() {
            if !is_open(&cell, &claimed) {
                continue;
            }

            let mut zone = Rect::unit(cell);

            loop {
                let next = Point::new(zone.max().x, cell.y);
                if !self.is_in_bounds(&next) || !is_open(&next, &claimed) {
                    break;
                }
                zone = zone.extend(GrowDirection::PosX);
            }

            loop {
                let grown = zone.extend(GrowDirection::PosY);
                let row_y = grown.max().y - 1;

                if row_y >= self.coverage_grid_size.y
                    || !(zone.min().x..zone.max().x).all(|x| is_open(&Point::new(x, row_y), &claimed))
                {
                    break;
                }
                zone = grown;
            }

            claimed.extend(zone.cells());
            zones.push(zone);
        }

        zones
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Wall;
    use util::prng::Pcg32;

    fn room_walls() -> Vec<Wall> {
        vec![
            Wall::new(Point::new(0, 0), Point::new(400, 0)),
            Wall::new(Point::new(400, 0), Point::new(400, 400)),
            Wall::new(Point::new(400, 400), Point::new(0, 400)),
            Wall::new(Point::new(0, 400), Point::new(0, 0)),
        ]
    }

    fn decompose(walls: &[Wall]) -> CoverageDecomposer {
        let grid = OccupancyGrid::build(20, Rect::from_xywh(0, 0, 400, 400), walls).unwrap();
        CoverageDecomposer::new(grid, 3).unwrap()
    }

    fn random_walls(seed: u64) -> Vec<Wall> {
        let mut rng = Pcg32::new(seed, 1);
        let mut walls = room_walls();

        for _ in 0..4 {
            let start = Point::new(rng.next_i32(40, 360), rng.next_i32(40, 360));
            let end = start + Point::new(rng.next_i32(-80, 80), rng.next_i32(-80, 80));
            walls.push(Wall::new(start, end));
        }

        walls
    }

    #[test]
    fn test_open_room() {
        let dec = decompose(&room_walls());

        assert_eq!(dec.coverage_grid_size(), Point::new(7, 7));
        assert_eq!(dec.visit_points().len(), 49);

        // The last column is too thin to hold a footprint, its points are filed under column 5
        assert_eq!(dec.produced_visit_points(&Point::new(6, 0)).map(|p| p.len()), Some(1));
        assert_eq!(dec.located_visit_points(&Point::new(6, 0)), Some(&[][..]));
        assert_eq!(dec.located_visit_points(&Point::new(5, 0)).map(|p| p.len()), Some(2));
        assert_eq!(dec.located_visit_points(&Point::new(5, 5)).map(|p| p.len()), Some(4));
        assert_eq!(dec.located_visit_points(&Point::new(7, 0)), None);

        assert_eq!(
            dec.located_visit_points(&Point::new(0, 0)),
            Some(&[Point::new(50, 50)][..])
        );
        assert_eq!(
            dec.located_visit_points(&Point::new(2, 1)),
            Some(&[Point::new(150, 90)][..])
        );

        // Only the interior block is free of walls
        assert_eq!(dec.simple_zones(), &[Rect::from_xywh(1, 1, 5, 5)]);
        assert_eq!(
            dec.simple_zone_to_local(&dec.simple_zones()[0]),
            Rect::from_xywh(60, 60, 300, 300)
        );

        // Every point in the outer ring of coverage cells is a wall point
        assert!(dec.wall_visit_points().contains(&Point::new(50, 50)));
        assert!(!dec.wall_visit_points().contains(&Point::new(150, 150)));
    }

    #[test]
    fn test_zone_containment() {
        for seed in 0..5 {
            let dec = decompose(&random_walls(seed));

            for cell in dec.coverage_cells() {
                let cell_rect = dec.coverage_cell_rect(&cell);

                for zone in dec.zones(&cell).unwrap() {
                    assert!(zone.is_inside(&cell_rect));
                    assert!(!dec.grid().is_occupied_rect(zone));
                }
            }
        }
    }

    #[test]
    fn test_full_coverage_sizing() {
        for seed in 0..5 {
            let dec = decompose(&random_walls(seed));

            for cell in dec.coverage_cells() {
                for zone in dec.full_coverage_zones(&cell).unwrap() {
                    assert_eq!(zone.size, Point::new(3, 3));
                    assert!(dec.grid().is_free_rect(zone));
                }
            }
        }
    }

    #[test]
    fn test_visit_point_locality() {
        for seed in 0..5 {
            let dec = decompose(&random_walls(seed));
            let mut total = 0;

            for cell in dec.coverage_cells() {
                for point in dec.located_visit_points(&cell).unwrap() {
                    let index = dec
                        .grid()
                        .position_to_cell_index(&(dec.grid().bounds().position + point))
                        .unwrap();

                    assert_eq!(dec.grid_to_coverage_cell(&index), cell);
                    total += 1;
                }
            }

            // Each visit point is located exactly once
            assert_eq!(total, dec.visit_points().len());
        }
    }

    #[test]
    fn test_full_coverage_from_occupied() {
        let dec = decompose(&room_walls());
        assert!(dec
            .try_extend_until_full_coverage(&Rect::unit(Point::new(0, 0)))
            .is_none());
        assert!(dec.make_zone_from(&Point::new(0, 4)).is_none());

        let grid =
            OccupancyGrid::build(20, Rect::from_xywh(0, 0, 400, 400), &room_walls()).unwrap();
        let unit = CoverageDecomposer::new(grid, 1).unwrap();
        assert!(unit
            .try_extend_until_full_coverage(&Rect::unit(Point::new(0, 0)))
            .is_none());
        assert_eq!(
            unit.try_extend_until_full_coverage(&Rect::unit(Point::new(1, 1))),
            Some(Rect::unit(Point::new(1, 1)))
        );
    }

    #[test]
    fn test_reachability_monotonicity() {
        let mut rng = Pcg32::new(99, 2);

        for seed in 0..3 {
            let dec = decompose(&random_walls(seed));
            let points = dec.visit_points();

            for _ in 0..100 {
                let a = points[rng.next_i32(0, points.len() as i32 - 1) as usize];
                let b = points[rng.next_i32(0, points.len() as i32 - 1) as usize];

                if dec.are_directly_reachable(&a, &b) {
                    for cell in dec.grid().trace_line(&a, &b) {
                        assert!(dec
                            .try_extend_until_full_coverage(&Rect::unit(cell))
                            .is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn test_reachability_through_wall() {
        let mut walls = room_walls();
        walls.push(Wall::new(Point::new(200, 0), Point::new(200, 400)));
        let dec = decompose(&walls);

        assert!(dec.are_directly_reachable(&Point::new(50, 50), &Point::new(150, 50)));
        assert!(!dec.are_directly_reachable(&Point::new(150, 50), &Point::new(270, 50)));
        // Too close to the outer wall for the footprint
        assert!(!dec.are_directly_reachable(&Point::new(50, 50), &Point::new(10, 50)));
    }

    #[test]
    fn test_gather_visit_points() {
        let dec = decompose(&room_walls());
        let centre = Point::new(2, 2);

        assert_eq!(dec.gather_coverage_visit_points_in_radius(&centre, 1).len(), 1);
        assert_eq!(dec.gather_coverage_visit_points_in_radius(&centre, 2).len(), 9);
        assert_eq!(dec.gather_neighbours_visit_points(&centre).len(), 8);

        // Corner cell, the window is clipped by the coverage grid
        assert_eq!(
            dec.gather_coverage_visit_points_in_radius(&Point::new(0, 0), 2)
                .len(),
            4
        );
        assert!(dec
            .gather_coverage_visit_points_in_radius(&Point::new(20, 20), 2)
            .is_empty());
    }

    #[test]
    fn test_local_nearest_visit_point() {
        let dec = decompose(&room_walls());

        assert_eq!(
            dec.local_nearest_visit_point_to(&Point::new(200, 200)),
            Some(Point::new(210, 210))
        );
        assert_eq!(dec.local_nearest_visit_point_to(&Point::new(-5, 200)), None);
        // Column 6 has no visit point of its own
        assert_eq!(dec.local_nearest_visit_point_to(&Point::new(370, 200)), None);
    }

    #[test]
    fn test_degenerate() {
        let grid = OccupancyGrid::build(20, Rect::empty(), &[]).unwrap();
        let dec = CoverageDecomposer::new(grid, 3).unwrap();

        assert_eq!(dec.coverage_grid_size(), Point::zeros());
        assert!(dec.visit_points().is_empty());
        assert!(dec.simple_zones().is_empty());
        assert_eq!(dec.local_nearest_visit_point_to(&Point::zeros()), None);
        assert_eq!(dec.zones(&Point::zeros()), None);

        let grid = OccupancyGrid::build(20, Rect::empty(), &[]).unwrap();
        assert!(matches!(
            CoverageDecomposer::new(grid, 0),
            Err(CoverageError::InvalidCoverageSize(0))
        ));
    }

    #[test]
    fn test_rebuild_from() {
        let mut dec = decompose(&room_walls());
        let mut walls = room_walls();
        walls.push(Wall::new(Point::new(200, 0), Point::new(200, 400)));

        dec.rebuild_from(
            OccupancyGrid::build(20, Rect::from_xywh(0, 0, 400, 400), &walls).unwrap(),
        );

        assert_eq!(dec.located_visit_points(&Point::new(3, 3)), Some(&[][..]));
        assert!(!dec.visit_points().contains(&Point::new(210, 210)));
    }
}
