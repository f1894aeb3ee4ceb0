//! # Environment
//!
//! The obstacle field the robot has to cover, and the entry points for baking it into a coverage
//! graph and planning a path over it.
//!
//! Environments are stored on disk as JSON map files, see [`MapFile`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fs, path::Path, time::Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use util::time::std_duration_to_millis;

use crate::{
    coverage::{CoverageDecomposer, CoverageError},
    geom::{Point, Rect},
    graph::CoverageGraph,
    grid::{GridError, OccupancyGrid},
    path::{CoveragePath, PathBuilder},
};

pub use crate::geom::Wall;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Walls, bounds and start position of the robot, together with the results of the last bake and
/// plan.
#[derive(Debug, Default)]
pub struct Environment {
    walls: Vec<Wall>,

    /// Explicit world bounds. If not set the bounds are gathered from the walls.
    bounds: Option<Rect>,

    /// Margin around the walls used when gathering bounds, in grid cells. Defaults to one
    /// coverage cell.
    frame_margin_cells: Option<i32>,

    /// Start position of the robot in world units
    pub start_position: Point,

    /// The last planned path, start in world units and waypoints local to the grid
    path: CoveragePath,

    /// The same path entirely in world units, as stored in map files
    world_path: Vec<Point>,

    baked: Option<Baked>,
}

/// The output of a bake.
#[derive(Debug)]
pub struct Baked {
    pub decomposer: CoverageDecomposer,
    pub graph: CoverageGraph,
    settings: BakeSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BakeSettings {
    cell_size: i32,
    coverage_size: i32,
    optimized: bool,
}

/// The on-disk representation of an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFile {
    pub walls: Vec<Wall>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,

    pub start_position: Point,

    /// The last planned path in world units, if any
    #[serde(default)]
    pub path: Vec<Point>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("The environment must be baked before a path can be planned")]
    NotBaked,

    #[error("The frame margin must not be negative, got {0} cells")]
    InvalidFrameMargin(i32),

    #[error("Could not build the occupancy grid: {0}")]
    GridError(GridError),

    #[error("Could not decompose the grid: {0}")]
    CoverageError(CoverageError),
}

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("Could not access the map file: {0}")]
    IoError(std::io::Error),

    #[error("Could not serialize the map: {0}")]
    SerializeError(serde_json::Error),

    #[error("Could not deserialize the map: {0}")]
    DeserializeError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Environment {
    pub fn new(walls: Vec<Wall>, start_position: Point) -> Self {
        Self {
            walls,
            start_position,
            ..Default::default()
        }
    }

    pub fn from_map_file(map: MapFile) -> Self {
        Self {
            walls: map.walls,
            bounds: map.bounds,
            start_position: map.start_position,
            world_path: map.path,
            ..Default::default()
        }
    }

    pub fn to_map_file(&self) -> MapFile {
        MapFile {
            walls: self.walls.clone(),
            bounds: self.bounds,
            start_position: self.start_position,
            path: self.world_path.clone(),
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Replace all walls, invalidating any previous bake.
    pub fn set_walls(&mut self, walls: Vec<Wall>) {
        self.walls = walls;
        self.invalidate();
    }

    /// Add a wall, invalidating any previous bake.
    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
        self.invalidate();
    }

    pub fn bounds(&self) -> Option<&Rect> {
        self.bounds.as_ref()
    }

    /// Set explicit bounds, or `None` to gather them from the walls.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.invalidate();
    }

    pub fn set_frame_margin_cells(&mut self, cells: Option<i32>) {
        self.frame_margin_cells = cells;
        self.invalidate();
    }

    /// Bounding box of all walls, grown by `frame` world units on every side.
    ///
    /// Without any walls the bounds are empty. `frame` must not be negative.
    pub fn gather_bounds(&self, frame: i32) -> Rect {
        let mut points = self.walls.iter().flat_map(|w| vec![w.start, w.end]);

        let first = match points.next() {
            Some(p) => p,
            None => return Rect::empty(),
        };

        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });

        let frame = Point::new(frame, frame);
        Rect::new(min - frame, max - min + frame * 2)
    }

    /// Build the grid, decomposition and coverage graph.
    ///
    /// Baking again with the same settings and unchanged walls returns the previous result.
    pub fn bake(
        &mut self,
        cell_size: i32,
        coverage_size: i32,
        optimized: bool,
    ) -> Result<&Baked, EnvError> {
        let settings = BakeSettings {
            cell_size,
            coverage_size,
            optimized,
        };

        let up_to_date = matches!(&self.baked, Some(b) if b.settings == settings);

        if up_to_date {
            debug!("Environment already baked with {:?}", settings);
        } else {
            let baked = self.make_baked(settings)?;
            self.baked = Some(baked);
            self.path = CoveragePath::default();
            self.world_path.clear();
        }

        self.baked.as_ref().ok_or(EnvError::NotBaked)
    }

    /// The result of the last bake, if it is still valid.
    pub fn baked(&self) -> Option<&Baked> {
        self.baked.as_ref()
    }

    /// Plan a path from the start position with the given builder.
    pub fn plan(&mut self, builder: &PathBuilder) -> Result<&CoveragePath, EnvError> {
        let baked = self.baked.as_ref().ok_or(EnvError::NotBaked)?;

        let start_time = Instant::now();
        self.path = builder.make_path(&baked.graph, &baked.decomposer, &self.start_position);
        self.world_path = self
            .path
            .to_world(&baked.decomposer.grid().bounds().position);

        info!(
            "Planned {} waypoints in {:.2} ms",
            self.path.len(),
            std_duration_to_millis(start_time.elapsed())
        );

        Ok(&self.path)
    }

    pub fn path(&self) -> &CoveragePath {
        &self.path
    }

    /// The last planned or loaded path in world units.
    pub fn world_path(&self) -> &[Point] {
        &self.world_path
    }

    fn make_baked(&self, settings: BakeSettings) -> Result<Baked, EnvError> {
        let bounds = match self.bounds {
            Some(b) => b,
            None => {
                let margin = self.frame_margin_cells.unwrap_or(settings.coverage_size);
                if margin < 0 {
                    return Err(EnvError::InvalidFrameMargin(margin));
                }
                self.gather_bounds(margin * settings.cell_size)
            }
        };

        info!("Baking {} walls inside {:?}", self.walls.len(), bounds);

        let start_time = Instant::now();
        let grid = OccupancyGrid::build(settings.cell_size, bounds, &self.walls)
            .map_err(EnvError::GridError)?;
        info!(
            "Occupancy grid of {}x{} cells built in {:.2} ms",
            grid.size().x,
            grid.size().y,
            std_duration_to_millis(start_time.elapsed())
        );

        let start_time = Instant::now();
        let decomposer = CoverageDecomposer::new(grid, settings.coverage_size)
            .map_err(EnvError::CoverageError)?;
        info!(
            "Decomposition with {} visit points built in {:.2} ms",
            decomposer.visit_points().len(),
            std_duration_to_millis(start_time.elapsed())
        );

        let start_time = Instant::now();
        let graph = CoverageGraph::make(&decomposer, settings.optimized);
        info!(
            "Coverage graph with {} edges built in {:.2} ms",
            graph.edge_count(),
            std_duration_to_millis(start_time.elapsed())
        );

        Ok(Baked {
            decomposer,
            graph,
            settings,
        })
    }

    fn invalidate(&mut self) {
        self.baked = None;
    }
}

impl MapFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapFileError> {
        let s = fs::read_to_string(path).map_err(MapFileError::IoError)?;

        serde_json::from_str(&s).map_err(MapFileError::DeserializeError)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapFileError> {
        let s = serde_json::to_string_pretty(self).map_err(MapFileError::SerializeError)?;

        fs::write(path, s).map_err(MapFileError::IoError)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn room_walls() -> Vec<Wall> {
        vec![
            Wall::new(Point::new(0, 0), Point::new(400, 0)),
            Wall::new(Point::new(400, 0), Point::new(400, 400)),
            Wall::new(Point::new(400, 400), Point::new(0, 400)),
            Wall::new(Point::new(0, 400), Point::new(0, 0)),
        ]
    }

    #[test]
    fn test_gather_bounds() {
        let env = Environment::new(room_walls(), Point::new(200, 200));
        assert_eq!(env.gather_bounds(60), Rect::from_xywh(-60, -60, 520, 520));
        assert_eq!(env.gather_bounds(0), Rect::from_xywh(0, 0, 400, 400));

        let env = Environment::new(vec![], Point::zeros());
        assert!(env.gather_bounds(60).is_empty());
    }

    #[test]
    fn test_bake_and_plan() {
        let mut env = Environment::new(room_walls(), Point::new(200, 200));

        assert!(matches!(
            env.plan(&PathBuilder::BreadthFirst),
            Err(EnvError::NotBaked)
        ));

        env.set_bounds(Some(Rect::from_xywh(0, 0, 400, 400)));
        let baked = env.bake(20, 3, true).unwrap();
        assert_eq!(baked.decomposer.visit_points().len(), 49);
        assert_eq!(baked.graph.len(), 49);

        let path = env.plan(&PathBuilder::BreadthFirst).unwrap();
        assert_eq!(path.len(), 50);
        assert_eq!(env.path().start(), Some(&Point::new(200, 200)));
    }

    #[test]
    fn test_bake_is_cached() {
        let mut env = Environment::new(room_walls(), Point::new(200, 200));

        let first = env.bake(20, 3, true).unwrap() as *const Baked;
        let second = env.bake(20, 3, true).unwrap() as *const Baked;
        assert_eq!(first, second);

        // Gathered bounds include one coverage cell of margin
        assert_eq!(
            env.baked().unwrap().decomposer.grid().bounds(),
            &Rect::from_xywh(-60, -60, 520, 520)
        );

        env.add_wall(Wall::new(Point::new(200, 0), Point::new(200, 400)));
        assert!(env.baked().is_none());

        let naive = env.bake(20, 3, false).unwrap();
        assert!(naive.graph.len() > 0);
    }

    #[test]
    fn test_bake_errors() {
        let mut env = Environment::new(room_walls(), Point::zeros());

        assert!(matches!(env.bake(0, 3, true), Err(EnvError::GridError(_))));
        assert!(matches!(
            env.bake(20, 0, true),
            Err(EnvError::CoverageError(_))
        ));
    }

    #[test]
    fn test_negative_frame_margin() {
        let mut env = Environment::new(room_walls(), Point::zeros());
        env.set_frame_margin_cells(Some(-1));

        assert!(matches!(
            env.bake(20, 3, true),
            Err(EnvError::InvalidFrameMargin(-1))
        ));

        // Explicit bounds do not use the margin
        env.set_bounds(Some(Rect::from_xywh(0, 0, 400, 400)));
        assert!(env.bake(20, 3, true).is_ok());
    }

    #[test]
    fn test_saved_path_is_in_world_units() {
        let mut env = Environment::new(room_walls(), Point::new(200, 200));
        env.bake(20, 3, true).unwrap();
        env.plan(&PathBuilder::BreadthFirst).unwrap();

        let origin = env.baked().unwrap().decomposer.grid().bounds().position;
        assert_eq!(origin, Point::new(-60, -60));

        let world = env.path().to_world(&origin);
        let map = env.to_map_file();
        assert_eq!(map.path, world);
        assert_eq!(env.world_path(), world.as_slice());

        // Every waypoint lies inside the room
        assert!(map
            .path
            .iter()
            .all(|p| p.x > 0 && p.x < 400 && p.y > 0 && p.y < 400));

        // A loaded path stays in world units until the next bake
        let mut loaded = Environment::from_map_file(map.clone());
        assert_eq!(loaded.to_map_file().path, map.path);
        loaded.bake(20, 3, true).unwrap();
        assert!(loaded.world_path().is_empty());
    }

    #[test]
    fn test_empty_environment() {
        let mut env = Environment::new(vec![], Point::new(5, 5));
        let baked = env.bake(20, 3, true).unwrap();

        assert!(baked.decomposer.visit_points().is_empty());
        assert_eq!(
            env.plan(&PathBuilder::BreadthFirst).unwrap().points,
            vec![Point::new(5, 5)]
        );
    }

    #[test]
    fn test_map_file() {
        let map: MapFile = serde_json::from_str(
            r#"{
                "walls": [{ "start": [0, 0], "end": [400, 0] }],
                "start_position": [10, 20]
            }"#,
        )
        .unwrap();

        assert_eq!(map.walls, vec![Wall::new(Point::new(0, 0), Point::new(400, 0))]);
        assert_eq!(map.bounds, None);
        assert_eq!(map.start_position, Point::new(10, 20));
        assert!(map.path.is_empty());

        let mut env = Environment::from_map_file(map);
        env.set_bounds(Some(Rect::from_xywh(0, 0, 400, 40)));

        let path = std::env::temp_dir().join("cov_exec_test_map_file.json");
        env.to_map_file().save(&path).unwrap();
        let loaded = MapFile::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, env.to_map_file());
        assert!(matches!(
            MapFile::load(std::env::temp_dir().join("cov_exec_no_such_map.json")),
            Err(MapFileError::IoError(_))
        ));
    }
}
