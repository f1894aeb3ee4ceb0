//! Return to an earlier point of a tour once the current point has no unvisited neighbours.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use super::{BackPathMode, Tour};
use crate::{geom::Point, graph::CoverageGraph};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Search back through the tour's visits, most recent first, for one from which the tour can
/// continue.
///
/// `try_next(tour, i)` returns the point to continue to from `tour.visits()[i]`, if any. Visits
/// before `first_index` are not considered. On success the way back to the chosen visit is
/// emitted according to `mode` and the point to continue to is returned, the caller is
/// responsible for visiting it. Returns `None` once no visit has anywhere left to go.
pub fn back_propagate<F>(
    tour: &mut Tour,
    graph: &CoverageGraph,
    mode: BackPathMode,
    first_index: usize,
    mut try_next: F,
) -> Option<Point>
where
    F: FnMut(&Tour, usize) -> Option<Point>,
{
    let num_visits = tour.visits().len();

    let (index, next) = (first_index..num_visits)
        .rev()
        .find_map(|i| try_next(&*tour, i).map(|n| (i, n)))?;

    let target = tour.visits()[index];

    trace!(
        "Back propagating {} visits to ({}, {})",
        num_visits - 1 - index,
        target.x,
        target.y
    );

    match mode {
        BackPathMode::Jump => (),
        BackPathMode::Replay => {
            let output = tour.output();
            let last = output.len().saturating_sub(1);
            let from = output.iter().rposition(|p| *p == target).unwrap_or(last);

            let way_back: Vec<Point> = output[from..last].iter().rev().copied().collect();
            for p in way_back {
                tour.transit(p);
            }
        }
        BackPathMode::ShortestPath => tour.travel_to(graph, mode, target),
    }

    Some(next)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
