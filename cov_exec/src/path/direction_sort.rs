//! Greedy builder which keeps travelling as straight as it can.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::{back_propagate, BackPathMode, Tour};
use crate::{geom::Point, graph::CoverageGraph};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub(super) fn direction_sort(graph: &CoverageGraph, start: Point, mode: BackPathMode) -> Vec<Point> {
    let mut tour = Tour::new(start);

    loop {
        let current = tour.position();

        let ahead = graph
            .sorted_neighbours_in_direction(&current, &tour.direction())
            .into_iter()
            .find(|n| !tour.is_visited(n));

        let next = match ahead {
            Some(n) => n,
            None => {
                let found = back_propagate(&mut tour, graph, mode, 0, |t, i| {
                    graph
                        .sorted_neighbours_in_direction(&t.visits()[i], &t.direction_at_visit(i))
                        .into_iter()
                        .find(|n| !t.is_visited(n))
                });

                match found {
                    Some(n) => n,
                    None => break,
                }
            }
        };

        tour.visit(next);
    }

    tour.into_points()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
