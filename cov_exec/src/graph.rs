//! # Coverage graph
//!
//! Adjacency between visit points. An edge means the robot's footprint fits along the straight
//! line between its two ends. Vertices are keyed by the visit point's local position, with a
//! separate insertion order so that every traversal is deterministic.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap, HashSet, VecDeque},
};

use log::{debug, warn};
use nalgebra::Vector2;
use ordered_float::{NotNan, OrderedFloat};
use serde::Serialize;
use util::maths::cos_between;

use crate::{
    coverage::CoverageDecomposer,
    geom::{distance, to_f64, Point},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Offsets to the eight coverage cells surrounding a cell.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The neighbours of a single vertex.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Neighbours {
    /// True if the vertex's coverage cell contains any occupied grid cell
    pub has_any_occupied: bool,

    /// Neighbouring visit points in insertion order
    pub points: Vec<Point>,
}

/// Adjacency over visit points.
#[derive(Debug, Clone, Default)]
pub struct CoverageGraph {
    vertices: HashMap<Point, Neighbours>,

    /// Vertices in insertion order
    order: Vec<Point>,
}

/// Summary of a graph, saved into the session reports.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub num_vertices: usize,
    pub num_edges: usize,
}

/// An A* open set entry.
#[derive(Debug, Clone, Copy)]
struct Node {
    point: Point,

    /// Cost so far plus the heuristic to the target
    cost: NotNan<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Neighbours {
    /// Add the point unless it is already a neighbour.
    pub fn add_unique(&mut self, point: Point) {
        if !self.points.contains(&point) {
            self.points.push(point);
        }
    }

    pub fn append_unique(&mut self, points: &[Point]) {
        for p in points {
            self.add_unique(*p);
        }
    }

    pub fn remove(&mut self, point: &Point) {
        self.points.retain(|p| p != point);
    }
}

impl CoverageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build either the optimised or the naive graph.
    pub fn make(decomposer: &CoverageDecomposer, optimized: bool) -> Self {
        if optimized {
            Self::make_optimized_from(decomposer)
        } else {
            Self::make_from(decomposer)
        }
    }

    /// Naive builder.
    ///
    /// Points within a coverage cell are fully connected. Every point is then tested for direct
    /// reachability against every visit point of the eight surrounding cells.
    pub fn make_from(decomposer: &CoverageDecomposer) -> Self {
        let mut graph = Self::new();

        for cell in decomposer.coverage_cells() {
            let points = decomposer.located_visit_points(&cell).unwrap_or(&[]);
            let ring = decomposer.gather_neighbours_visit_points(&cell);
            let has_any_occupied = decomposer.has_any_occupied(&cell);

            for point in points {
                let reachable: Vec<Point> = ring
                    .iter()
                    .filter(|n| decomposer.are_directly_reachable(point, n))
                    .copied()
                    .collect();

                let neighbours = graph.vertex_mut(*point);
                neighbours.has_any_occupied = has_any_occupied;
                neighbours.append_unique(points);
                neighbours.remove(point);
                neighbours.append_unique(&reachable);
            }
        }

        debug!(
            "Naive graph built: {} vertices, {} edges",
            graph.len(),
            graph.edge_count()
        );

        graph
    }

    /// Optimised builder.
    ///
    /// Points within a coverage cell are fully connected. Towards each of the eight surrounding
    /// cells only the points furthest in that direction are linked, each to the nearest directly
    /// reachable point of the neighbour. Edges are always added in both directions.
    pub fn make_optimized_from(decomposer: &CoverageDecomposer) -> Self {
        let mut graph = Self::new();

        for cell in decomposer.coverage_cells() {
            let points = decomposer.located_visit_points(&cell).unwrap_or(&[]);
            let has_any_occupied = decomposer.has_any_occupied(&cell);

            for point in points {
                let neighbours = graph.vertex_mut(*point);
                neighbours.has_any_occupied = has_any_occupied;
                neighbours.append_unique(points);
                neighbours.remove(point);
            }

            if points.is_empty() {
                continue;
            }

            for (dx, dy) in NEIGHBOUR_OFFSETS.iter() {
                let offset = Point::new(*dx, *dy);

                let mut targets = match decomposer.located_visit_points(&(cell + offset)) {
                    Some(t) if !t.is_empty() => t.to_vec(),
                    _ => continue,
                };

                // Representatives are tied on the exact integer projection
                let best = match points.iter().map(|p| p.dot(&offset)).max() {
                    Some(b) => b,
                    None => continue,
                };

                for rep in points.iter().filter(|p| p.dot(&offset) == best) {
                    targets.sort_by_key(|t| OrderedFloat(distance(rep, t)));

                    if let Some(target) = targets
                        .iter()
                        .find(|t| decomposer.are_directly_reachable(rep, t))
                    {
                        graph.add_edge(*rep, *target);
                    }
                }
            }
        }

        debug!(
            "Optimised graph built: {} vertices, {} edges",
            graph.len(),
            graph.edge_count()
        );

        graph
    }

    /// Get the neighbours entry of a vertex, creating it if needed.
    fn vertex_mut(&mut self, point: Point) -> &mut Neighbours {
        let order = &mut self.order;

        self.vertices.entry(point).or_insert_with(|| {
            order.push(point);
            Neighbours::default()
        })
    }

    /// Insert an edge in both directions.
    pub fn add_edge(&mut self, a: Point, b: Point) {
        if a == b {
            return;
        }

        self.vertex_mut(a).add_unique(b);
        self.vertex_mut(b).add_unique(a);
    }

    /// Add edges between the wall visit points of neighbouring coverage cells which are directly
    /// reachable but not already linked. Returns the number of new undirected edges.
    pub fn link_wall_visit_points(&mut self, decomposer: &CoverageDecomposer) -> usize {
        let wall_points = decomposer.wall_visit_points();
        let mut added = 0;

        for (i, a) in wall_points.iter().enumerate() {
            let cell_a = match decomposer.local_to_coverage_cell(a) {
                Some(c) => c,
                None => continue,
            };

            for b in wall_points[i + 1..].iter() {
                let cell_b = match decomposer.local_to_coverage_cell(b) {
                    Some(c) => c,
                    None => continue,
                };

                let delta = cell_b - cell_a;
                if delta.x.abs() > 1 || delta.y.abs() > 1 {
                    continue;
                }

                let linked = self.neighbours(a).map(|n| n.contains(b)).unwrap_or(false);
                if !linked && decomposer.are_directly_reachable(a, b) {
                    self.add_edge(*a, *b);
                    added += 1;
                }
            }
        }

        debug!("Linked {} extra wall visit point edges", added);

        added
    }

    // ---- QUERIES ----

    pub fn contains(&self, point: &Point) -> bool {
        self.vertices.contains_key(point)
    }

    pub fn neighbours(&self, point: &Point) -> Option<&[Point]> {
        self.vertices.get(point).map(|n| n.points.as_slice())
    }

    pub fn has_any_occupied(&self, point: &Point) -> bool {
        self.vertices
            .get(point)
            .map(|n| n.has_any_occupied)
            .unwrap_or(false)
    }

    /// Iterate over the vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Point> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(|n| n.points.len()).sum()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            num_vertices: self.len(),
            num_edges: self.edge_count(),
        }
    }

    // ---- SEARCHES ----

    /// A* search between two vertices.
    ///
    /// Edges cost their euclidean length and the heuristic is the manhattan distance to the
    /// target. The returned walk includes both ends, and is empty if either end is not a vertex
    /// or `dst` cannot be reached.
    pub fn shortest_path(&self, src: &Point, dst: &Point) -> Vec<Point> {
        if !self.contains(src) || !self.contains(dst) {
            return Vec::new();
        }

        if src == dst {
            return vec![*src];
        }

        let heuristic = |p: &Point| ((dst.x - p.x).abs() + (dst.y - p.y).abs()) as f64;

        let mut heap = BinaryHeap::new();
        let mut best_cost: HashMap<Point, f64> = HashMap::new();
        let mut came_from: HashMap<Point, Point> = HashMap::new();

        best_cost.insert(*src, 0.0);
        match Node::new(*src, heuristic(src)) {
            Some(n) => heap.push(n),
            None => return Vec::new(),
        }

        while let Some(node) = heap.pop() {
            if node.point == *dst {
                return Self::reconstruct(&came_from, src, dst);
            }

            let cost_so_far = match best_cost.get(&node.point) {
                Some(c) => *c,
                None => continue,
            };

            // Skip entries superseded by a cheaper route to the same point
            if node.cost.into_inner() > cost_so_far + heuristic(&node.point) {
                continue;
            }

            for next in self.neighbours(&node.point).unwrap_or(&[]) {
                let cost = cost_so_far + distance(&node.point, next);

                let improved = best_cost.get(next).map(|c| cost < *c).unwrap_or(true);
                if !improved {
                    continue;
                }

                match Node::new(*next, cost + heuristic(next)) {
                    Some(n) => {
                        best_cost.insert(*next, cost);
                        came_from.insert(*next, node.point);
                        heap.push(n);
                    }
                    None => warn!("NaN cost reaching ({}, {})", next.x, next.y),
                }
            }
        }

        Vec::new()
    }

    fn reconstruct(came_from: &HashMap<Point, Point>, src: &Point, dst: &Point) -> Vec<Point> {
        let mut path = vec![*dst];
        let mut current = *dst;

        while current != *src {
            current = match came_from.get(&current) {
                Some(p) => *p,
                None => return Vec::new(),
            };
            path.push(current);
        }

        path.reverse();
        path
    }

    /// Number of vertices reachable from `src`, including itself. Zero if `src` is not a vertex.
    pub fn count_reachable_from(&self, src: &Point) -> usize {
        self.reachable_from(src).len()
    }

    /// Every vertex reachable from `src` in breadth first order, starting with `src`. Empty if
    /// `src` is not a vertex.
    pub fn reachable_from(&self, src: &Point) -> Vec<Point> {
        if !self.contains(src) {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        let mut order = vec![*src];
        visited.insert(*src);

        // The result doubles as the queue
        let mut head = 0;
        while head < order.len() {
            let point = order[head];
            head += 1;

            for next in self.neighbours(&point).unwrap_or(&[]) {
                if visited.insert(*next) {
                    order.push(*next);
                }
            }
        }

        order
    }

    /// Breadth first search from `src` for the first other vertex matching the predicate.
    pub fn breadth_search_by_predicate<F>(&self, src: &Point, predicate: F) -> Option<Point>
    where
        F: Fn(&Point) -> bool,
    {
        if !self.contains(src) {
            return None;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(*src);
        queue.push_back(*src);

        while let Some(point) = queue.pop_front() {
            for next in self.neighbours(&point).unwrap_or(&[]) {
                if !visited.insert(*next) {
                    continue;
                }

                if predicate(next) {
                    return Some(*next);
                }

                queue.push_back(*next);
            }
        }

        None
    }

    /// Neighbours of `vertex` ordered from the most to the least aligned with `direction`.
    ///
    /// Alignment is the cosine between `direction` and the vector to the neighbour. Equally
    /// aligned neighbours are ordered nearest first, then by insertion order.
    pub fn sorted_neighbours_in_direction(
        &self,
        vertex: &Point,
        direction: &Vector2<f64>,
    ) -> Vec<Point> {
        let mut neighbours = self.neighbours(vertex).unwrap_or(&[]).to_vec();
        let origin = to_f64(vertex);

        neighbours.sort_by_key(|n| {
            let alignment = cos_between(direction, &(to_f64(n) - origin)).unwrap_or(-1.0);
            (
                Reverse(OrderedFloat(alignment)),
                OrderedFloat(distance(vertex, n)),
            )
        });

        neighbours
    }
}

impl Node {
    fn new(point: Point, cost: f64) -> Option<Self> {
        NotNan::new(cost).ok().map(|cost| Self { point, cost })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped so that the heap pops the cheapest node first
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geom::{Rect, Wall},
        grid::OccupancyGrid,
    };
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

    fn bisected() -> CoverageDecomposer {
        let mut walls = room_walls();
        walls.push(Wall::new(Point::new(200, 0), Point::new(200, 400)));
        decompose(&walls)
    }

    fn assert_symmetric(graph: &CoverageGraph) {
        for v in graph.vertices() {
            for n in graph.neighbours(v).unwrap() {
                assert!(
                    graph.neighbours(n).unwrap().contains(v),
                    "edge {:?} -> {:?} has no reverse",
                    v,
                    n
                );
            }
        }
    }

    fn assert_valid_walk(graph: &CoverageGraph, path: &[Point], src: &Point, dst: &Point) {
        assert_eq!(path.first(), Some(src));
        assert_eq!(path.last(), Some(dst));
        for pair in path.windows(2) {
            assert!(graph.neighbours(&pair[0]).unwrap().contains(&pair[1]));
        }
    }

    #[test]
    fn test_neighbours() {
        let mut n = Neighbours::default();
        n.add_unique(Point::new(1, 1));
        n.append_unique(&[Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)]);
        assert_eq!(n.points.len(), 3);

        n.remove(&Point::new(2, 2));
        assert_eq!(n.points, vec![Point::new(1, 1), Point::new(3, 3)]);
    }

    #[test]
    fn test_open_room_connectivity() {
        let dec = decompose(&room_walls());

        for optimized in [true, false].iter() {
            let graph = CoverageGraph::make(&dec, *optimized);
            let start = dec
                .local_nearest_visit_point_to(&Point::new(200, 200))
                .unwrap();

            assert_eq!(graph.len(), dec.visit_points().len());
            assert_eq!(graph.count_reachable_from(&start), dec.visit_points().len());
        }
    }

    #[test]
    fn test_optimized_symmetry() {
        for seed in 0..5 {
            let mut rng = Pcg32::new(seed, 5);
            let mut walls = room_walls();
            for _ in 0..5 {
                let a = Point::new(rng.next_i32(0, 400), rng.next_i32(0, 400));
                let b = Point::new(rng.next_i32(0, 400), rng.next_i32(0, 400));
                walls.push(Wall::new(a, b));
            }

            let graph = CoverageGraph::make_optimized_from(&decompose(&walls));
            assert_symmetric(&graph);
        }
    }

    #[test]
    fn test_optimized_parity_with_naive_on_convex_room() {
        // Rooms with no interior walls, where both builders must agree on connectivity
        for size in [300, 400, 520].iter() {
            let walls = vec![
                Wall::new(Point::new(0, 0), Point::new(*size, 0)),
                Wall::new(Point::new(*size, 0), Point::new(*size, *size)),
                Wall::new(Point::new(*size, *size), Point::new(0, *size)),
                Wall::new(Point::new(0, *size), Point::new(0, 0)),
            ];
            let grid =
                OccupancyGrid::build(20, Rect::from_xywh(0, 0, *size, *size), &walls).unwrap();
            let dec = CoverageDecomposer::new(grid, 3).unwrap();

            let naive = CoverageGraph::make_from(&dec);
            let optimized = CoverageGraph::make_optimized_from(&dec);

            for v in dec.visit_points() {
                assert_eq!(
                    naive.count_reachable_from(v),
                    optimized.count_reachable_from(v),
                    "builders disagree from {:?} in a {} room",
                    v,
                    size
                );
            }

            assert!(optimized.edge_count() <= naive.edge_count());
        }
    }

    #[test]
    fn test_bisected_room() {
        let dec = bisected();
        let total = dec.visit_points().len();

        for optimized in [true, false].iter() {
            let graph = CoverageGraph::make(&dec, *optimized);
            let left = dec.local_nearest_visit_point_to(&Point::new(100, 200)).unwrap();
            let right = dec.local_nearest_visit_point_to(&Point::new(300, 200)).unwrap();

            assert!(graph.count_reachable_from(&left) < total);
            assert!(graph.count_reachable_from(&right) < total);
            assert!(graph.shortest_path(&left, &right).is_empty());
        }
    }

    #[test]
    fn test_shortest_path_walks() {
        let mut rng = Pcg32::new(3, 3);
        let mut walls = room_walls();
        walls.push(Wall::new(Point::new(130, 0), Point::new(130, 260)));
        walls.push(Wall::new(Point::new(270, 400), Point::new(270, 140)));
        let dec = decompose(&walls);
        let graph = CoverageGraph::make_optimized_from(&dec);
        let vertices: Vec<Point> = graph.vertices().copied().collect();

        for _ in 0..50 {
            let a = vertices[rng.next_i32(0, vertices.len() as i32 - 1) as usize];
            let b = vertices[rng.next_i32(0, vertices.len() as i32 - 1) as usize];

            let path = graph.shortest_path(&a, &b);
            let connected = graph.breadth_search_by_predicate(&a, |p| *p == b).is_some() || a == b;

            if connected {
                assert_valid_walk(&graph, &path, &a, &b);
            } else {
                assert!(path.is_empty());
            }
        }
    }

    #[test]
    fn test_shortest_path_edges() {
        let dec = decompose(&room_walls());
        let graph = CoverageGraph::make_optimized_from(&dec);
        let a = Point::new(150, 150);

        assert_eq!(graph.shortest_path(&a, &a), vec![a]);
        assert!(graph.shortest_path(&a, &Point::new(151, 150)).is_empty());
        assert_eq!(graph.count_reachable_from(&Point::new(151, 150)), 0);

        // Straight along a row of the coverage grid
        let path = graph.shortest_path(&a, &Point::new(270, 150));
        assert_eq!(
            path,
            vec![a, Point::new(210, 150), Point::new(270, 150)]
        );
    }

    #[test]
    fn test_breadth_search_by_predicate() {
        let dec = decompose(&room_walls());
        let graph = CoverageGraph::make_optimized_from(&dec);
        let src = Point::new(150, 150);

        // The source itself never matches
        assert_eq!(graph.breadth_search_by_predicate(&src, |p| *p == src), None);
        // Column 330 is three hops away, column 350 only behind it
        let found = graph.breadth_search_by_predicate(&src, |p| p.x > 300);
        assert_eq!(found.map(|p| p.x), Some(330));
        assert!(graph
            .breadth_search_by_predicate(&src, |p| p.x < 0)
            .is_none());
    }

    #[test]
    fn test_sorted_neighbours_in_direction() {
        let dec = decompose(&room_walls());
        let graph = CoverageGraph::make_optimized_from(&dec);
        let v = Point::new(150, 150);

        let sorted = graph.sorted_neighbours_in_direction(&v, &Vector2::new(1.0, 0.0));
        assert_eq!(sorted.len(), 8);
        assert_eq!(sorted[0], Point::new(210, 150));
        assert_eq!(sorted[7], Point::new(90, 150));

        let sorted = graph.sorted_neighbours_in_direction(&v, &Vector2::new(0.0, -1.0));
        assert_eq!(sorted[0], Point::new(150, 90));
    }

    #[test]
    fn test_add_edge_and_wall_links() {
        let dec = decompose(&room_walls());
        let mut graph = CoverageGraph::make_optimized_from(&dec);
        let edges = graph.edge_count();

        graph.add_edge(Point::new(50, 50), Point::new(50, 50));
        assert_eq!(graph.edge_count(), edges);

        let added = graph.link_wall_visit_points(&dec);
        assert_eq!(graph.edge_count(), edges + 2 * added);
        assert_symmetric(&graph);

        // Linking twice adds nothing new
        assert_eq!(graph.link_wall_visit_points(&dec), 0);
    }
}
