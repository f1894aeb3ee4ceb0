//! Wall following builder, always taking the right-most unvisited neighbour.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use util::maths::{ccw_angle, rotate_cw_90};

use super::{back_propagate, BackPathMode, Tour};
use crate::{
    geom::{distance, to_f64, Point, Rect},
    graph::CoverageGraph,
};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Extend the tour from its current position until nothing is left to visit.
///
/// With a zone only points inside it are visited, and only the part of the tour from the current
/// position onwards is searched when back propagating.
pub(super) fn right_first(
    tour: &mut Tour,
    graph: &CoverageGraph,
    mode: BackPathMode,
    zone: Option<&Rect>,
) {
    let first_index = match zone {
        Some(_) => {
            let position = tour.position();
            tour.visits()
                .iter()
                .rposition(|p| *p == position)
                .unwrap_or(0)
        }
        None => 0,
    };

    loop {
        let current = tour.position();

        let right_most = candidates(graph, &current, &tour.direction(), zone)
            .into_iter()
            .find(|n| !tour.is_visited(n));

        let next = match right_most {
            Some(n) => n,
            None => {
                let found = back_propagate(tour, graph, mode, first_index, |t, i| {
                    candidates(graph, &t.visits()[i], &t.direction_at_visit(i), zone)
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
}

/// Neighbours of `point` inside the zone, ordered counter-clockwise starting from the right of
/// the direction of travel.
fn candidates(
    graph: &CoverageGraph,
    point: &Point,
    direction: &Vector2<f64>,
    zone: Option<&Rect>,
) -> Vec<Point> {
    let reference = rotate_cw_90(direction);
    let origin = to_f64(point);

    let mut candidates: Vec<Point> = graph
        .neighbours(point)
        .unwrap_or(&[])
        .iter()
        .filter(|n| zone.map(|z| z.contains(n)).unwrap_or(true))
        .copied()
        .collect();

    candidates.sort_by_key(|n| {
        (
            OrderedFloat(ccw_angle(&reference, &(to_f64(n) - origin))),
            OrderedFloat(distance(point, n)),
        )
    });

    candidates
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
