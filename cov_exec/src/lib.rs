//! # Coverage planner library.
//!
//! This library allows other crates in the workspace to access the planning core of the coverage
//! executable. Planning runs as a one-shot pipeline:
//!
//! 1. [`grid::OccupancyGrid`] rasterises the walls of an [`env::Environment`],
//! 2. [`coverage::CoverageDecomposer`] splits the grid into robot sized coverage cells and finds
//!    their visit points,
//! 3. [`graph::CoverageGraph`] connects visit points the robot can drive between,
//! 4. a [`path::PathBuilder`] orders the visit points into a [`path::CoveragePath`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Integer rectangles, walls and intersection tests
pub mod geom;

/// Environment - walls, bounds and start position, baking and planning
pub mod env;

/// Occupancy grid - the rasterised walls
pub mod grid;

/// Coverage decomposition - zones and visit points per coverage cell
pub mod coverage;

/// Coverage graph - adjacency between visit points
pub mod graph;

/// Path builders - tour construction heuristics over the coverage graph
pub mod path;

/// Executable parameters
pub mod params;
