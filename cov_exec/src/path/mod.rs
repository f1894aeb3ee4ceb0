//! # Coverage path builders
//!
//! Tour construction heuristics over a [`CoverageGraph`]. Every builder is a pure function of the
//! graph, the decomposition and the start position, and produces a [`CoveragePath`] whose first
//! element is the start position itself, followed by visit points in the order they should be
//! driven to.
//!
//! Builders never visit a point twice. When a builder has to move back over points it has
//! already visited (see [`BackPathMode`]) those points are emitted as transit points, which are
//! the only repeats a path may contain.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod back_propagation;
mod breadth;
mod direction_sort;
mod right_first;
mod zones;

pub use back_propagation::back_propagate;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashSet;

use log::{debug, warn};
use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    coverage::CoverageDecomposer,
    geom::{distance, to_f64, Point, Rect},
    graph::CoverageGraph,
};

use breadth::NeighbourOrder;
use zones::ZoneSweep;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Direction of travel assumed before the robot has moved.
pub const DEFAULT_DIRECTION: (f64, f64) = (0.0, -1.0);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// How a builder returns to an earlier point once it runs out of unvisited neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackPathMode {
    /// Continue directly from the earlier point, emitting nothing for the way back
    Jump,

    /// Emit the way back exactly as it was driven
    Replay,

    /// Emit the shortest route through the graph back to the earlier point
    ShortestPath,
}

/// The available tour construction heuristics.
///
/// Zones are given in local coordinates, relative to the origin of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathBuilder {
    /// Breadth first order from the visit point nearest the start
    BreadthFirst,

    /// Breadth first order, expanding the nearest neighbours first
    BreadthFirstWithSort,

    /// Breadth first order, expanding neighbours nearest the grid origin first. Only useful as a
    /// baseline for comparison.
    FirstNearWall,

    /// Keep going as straight as possible
    DirectionSort {
        #[serde(default)]
        back_path: BackPathMode,
    },

    /// Follow walls by always preferring the right-most unvisited neighbour
    RightFirst {
        #[serde(default)]
        back_path: BackPathMode,

        /// Only visit points inside this zone
        #[serde(default)]
        zone: Option<Rect>,

        /// Add extra edges between neighbouring wall visit points before planning
        #[serde(default)]
        link_wall_points: bool,
    },

    /// Right first tours of each zone in turn
    RightFirstForZones {
        #[serde(default)]
        zones: Vec<Rect>,

        #[serde(default)]
        back_path: BackPathMode,
    },

    /// Serpentine row sweeps of each zone in turn
    NonOccupied {
        #[serde(default)]
        zones: Vec<Rect>,

        #[serde(default)]
        back_path: BackPathMode,
    },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An ordered sequence of waypoints.
///
/// The first point is the start position in world coordinates, all others are visit points in
/// local coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoveragePath {
    pub points: Vec<Point>,
}

/// A tour under construction.
#[derive(Debug, Clone, Default)]
pub struct Tour {
    /// Every point emitted so far, including transit points
    output: Vec<Point>,

    /// Points in the order they were first visited
    visits: Vec<Point>,

    visited: HashSet<Point>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for BackPathMode {
    fn default() -> Self {
        BackPathMode::Jump
    }
}

impl PathBuilder {
    /// Build a coverage path from the world position `start`.
    ///
    /// If no visit point can be found near the start the path contains only the start.
    pub fn make_path(
        &self,
        graph: &CoverageGraph,
        decomposer: &CoverageDecomposer,
        start: &Point,
    ) -> CoveragePath {
        let local_start = start - decomposer.grid().bounds().position;

        let mut points = vec![*start];

        let first = match nearest_visit_point(graph, decomposer, &local_start) {
            Some(p) => p,
            None => {
                warn!(
                    "No visit point near the start ({}, {}), the path will be empty",
                    start.x, start.y
                );
                return CoveragePath { points };
            }
        };

        let tour = match self {
            PathBuilder::BreadthFirst => {
                breadth::breadth_first(graph, first, NeighbourOrder::Insertion)
            }
            PathBuilder::BreadthFirstWithSort => {
                breadth::breadth_first(graph, first, NeighbourOrder::NearestFirst)
            }
            PathBuilder::FirstNearWall => {
                breadth::breadth_first(graph, first, NeighbourOrder::NearestOrigin)
            }
            PathBuilder::DirectionSort { back_path } => {
                direction_sort::direction_sort(graph, first, *back_path)
            }
            PathBuilder::RightFirst {
                back_path,
                zone,
                link_wall_points,
            } => {
                let linked;
                let graph = if *link_wall_points {
                    let mut g = graph.clone();
                    g.link_wall_visit_points(decomposer);
                    linked = g;
                    &linked
                } else {
                    graph
                };

                let mut tour = Tour::new(first);
                right_first::right_first(&mut tour, graph, *back_path, zone.as_ref());
                tour.into_points()
            }
            PathBuilder::RightFirstForZones { zones, back_path } => zones::zone_tours(
                graph,
                decomposer,
                first,
                zones,
                *back_path,
                ZoneSweep::RightFirst,
            ),
            PathBuilder::NonOccupied { zones, back_path } => zones::zone_tours(
                graph,
                decomposer,
                first,
                zones,
                *back_path,
                ZoneSweep::Serpentine,
            ),
        };

        debug!("{:?} produced {} waypoints", self, tour.len());

        points.extend(tour);

        CoveragePath { points }
    }
}

impl CoveragePath {
    /// The start position, in world coordinates.
    pub fn start(&self) -> Option<&Point> {
        self.points.first()
    }

    /// The waypoints after the start, in local coordinates.
    pub fn waypoints(&self) -> &[Point] {
        if self.points.is_empty() {
            &[]
        } else {
            &self.points[1..]
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in world coordinates, given the origin of the grid.
    pub fn to_world(&self, origin: &Point) -> Vec<Point> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| if i == 0 { *p } else { p + origin })
            .collect()
    }

    /// Total length of the path in world units.
    pub fn length(&self, origin: &Point) -> f64 {
        self.to_world(origin)
            .windows(2)
            .map(|w| distance(&w[0], &w[1]))
            .sum()
    }
}

impl Tour {
    /// Start a tour at the given visit point.
    pub fn new(start: Point) -> Self {
        let mut tour = Self::default();
        tour.visit(start);
        tour
    }

    /// Move to a point for the first time. Returns false, emitting nothing, if it has already
    /// been visited.
    pub fn visit(&mut self, point: Point) -> bool {
        if !self.visited.insert(point) {
            return false;
        }

        self.visits.push(point);
        self.output.push(point);
        true
    }

    /// Move over a point without it counting as a visit.
    pub fn transit(&mut self, point: Point) {
        self.output.push(point);
    }

    /// Move to `target` along the shortest route, or directly when jumping. Unvisited points on
    /// the route are visited on the way.
    pub fn travel_to(&mut self, graph: &CoverageGraph, mode: BackPathMode, target: Point) {
        if self.output.last() == Some(&target) {
            return;
        }

        if mode != BackPathMode::Jump {
            let route = graph.shortest_path(&self.position(), &target);

            if route.len() > 2 {
                for p in route[1..route.len() - 1].iter() {
                    if !self.visit(*p) {
                        self.transit(*p);
                    }
                }
            }
        }

        if !self.visit(target) {
            self.transit(target);
        }
    }

    pub fn is_visited(&self, point: &Point) -> bool {
        self.visited.contains(point)
    }

    /// Points in the order they were first visited.
    pub fn visits(&self) -> &[Point] {
        &self.visits
    }

    pub fn output(&self) -> &[Point] {
        &self.output
    }

    /// The current position.
    pub fn position(&self) -> Point {
        self.output.last().copied().unwrap_or_else(Point::zeros)
    }

    /// Direction of the last move, or [`DEFAULT_DIRECTION`] if the robot has not moved yet.
    pub fn direction(&self) -> Vector2<f64> {
        let n = self.output.len();

        if n >= 2 {
            let d = to_f64(&self.output[n - 1]) - to_f64(&self.output[n - 2]);
            if d.norm() > 0.0 {
                return d;
            }
        }

        Vector2::new(DEFAULT_DIRECTION.0, DEFAULT_DIRECTION.1)
    }

    /// Direction the robot was travelling in when it first arrived at `visits[index]`.
    pub fn direction_at_visit(&self, index: usize) -> Vector2<f64> {
        if index > 0 && index < self.visits.len() {
            let d = to_f64(&self.visits[index]) - to_f64(&self.visits[index - 1]);
            if d.norm() > 0.0 {
                return d;
            }
        }

        Vector2::new(DEFAULT_DIRECTION.0, DEFAULT_DIRECTION.1)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.output
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The visit point a tour should start from.
///
/// This is the first visit point of the coverage cell containing the start. If that cell has
/// none, the nearest vertex of the graph is used instead. `None` if the start is outside the grid
/// or the graph is empty.
fn nearest_visit_point(
    graph: &CoverageGraph,
    decomposer: &CoverageDecomposer,
    local_start: &Point,
) -> Option<Point> {
    decomposer.local_to_coverage_cell(local_start)?;

    match decomposer.local_nearest_visit_point_to(local_start) {
        Some(p) if graph.contains(&p) => Some(p),
        _ => graph
            .vertices()
            .min_by_key(|v| OrderedFloat(distance(v, local_start)))
            .copied(),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
