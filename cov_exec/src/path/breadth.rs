//! Breadth first orderings of the graph.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashSet;

use ordered_float::OrderedFloat;

use crate::{
    geom::{distance, Point},
    graph::CoverageGraph,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Order in which the neighbours of each point are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NeighbourOrder {
    /// Graph insertion order
    Insertion,

    /// Nearest to the point being expanded first
    NearestFirst,

    /// Nearest to the grid origin first
    NearestOrigin,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Every point reachable from `start`, in breadth first order.
pub(super) fn breadth_first(graph: &CoverageGraph, start: Point, order: NeighbourOrder) -> Vec<Point> {
    let mut path = vec![start];
    let mut visited = HashSet::new();
    visited.insert(start);

    // The path is its own queue
    let mut head = 0;
    while head < path.len() {
        let source = path[head];
        head += 1;

        let mut neighbours = graph.neighbours(&source).unwrap_or(&[]).to_vec();

        match order {
            NeighbourOrder::Insertion => (),
            NeighbourOrder::NearestFirst => {
                neighbours.sort_by_key(|n| OrderedFloat(distance(&source, n)))
            }
            NeighbourOrder::NearestOrigin => {
                neighbours.sort_by_key(|n| OrderedFloat(distance(&Point::zeros(), n)))
            }
        }

        for n in neighbours {
            if visited.insert(n) {
                path.push(n);
            }
        }
    }

    path
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_orders() {
        let s = Point::new(50, 50);
        let far = Point::new(50, 150);
        let near = Point::new(80, 50);
        let beyond = Point::new(140, 50);

        let mut graph = CoverageGraph::new();
        graph.add_edge(s, far);
        graph.add_edge(s, near);
        graph.add_edge(near, beyond);

        assert_eq!(
            breadth_first(&graph, s, NeighbourOrder::Insertion),
            vec![s, far, near, beyond]
        );
        assert_eq!(
            breadth_first(&graph, s, NeighbourOrder::NearestFirst),
            vec![s, near, far, beyond]
        );
        assert_eq!(
            breadth_first(&graph, s, NeighbourOrder::NearestOrigin),
            vec![s, near, far, beyond]
        );

        // Unconnected start
        assert_eq!(
            breadth_first(&graph, Point::new(1, 1), NeighbourOrder::Insertion),
            vec![Point::new(1, 1)]
        );
    }
}
