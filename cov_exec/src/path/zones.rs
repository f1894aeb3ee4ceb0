//! Builders which sweep a list of rectangular zones one after the other.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};

use super::{right_first::right_first, BackPathMode, Tour};
use crate::{
    coverage::CoverageDecomposer,
    geom::{Point, Rect},
    graph::CoverageGraph,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// How the inside of each zone is swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ZoneSweep {
    /// A right first tour restricted to the zone
    RightFirst,

    /// Rows of the zone in turn, alternating direction
    Serpentine,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sweep each zone in the given order.
///
/// Each zone is entered at the nearest reachable unvisited point inside it. If no zones are
/// given the decomposition's simple zones are used, followed by an unrestricted right first
/// tour to pick up the points near walls.
pub(super) fn zone_tours(
    graph: &CoverageGraph,
    decomposer: &CoverageDecomposer,
    start: Point,
    zones: &[Rect],
    mode: BackPathMode,
    sweep: ZoneSweep,
) -> Vec<Point> {
    let use_simple_zones = zones.is_empty();

    let zones: Vec<Rect> = if use_simple_zones {
        decomposer
            .simple_zones()
            .iter()
            .map(|z| decomposer.simple_zone_to_local(z))
            .collect()
    } else {
        zones.to_vec()
    };

    debug!("Sweeping {} zones with {:?}", zones.len(), sweep);

    let mut tour = Tour::new(start);

    for zone in zones.iter() {
        let position = tour.position();

        let entry = if zone.contains(&position) {
            position
        } else {
            let found = graph
                .breadth_search_by_predicate(&position, |p| zone.contains(p) && !tour.is_visited(p));

            match found {
                Some(p) => p,
                None => {
                    trace!("Zone {:?} has nothing reachable left to visit", zone);
                    continue;
                }
            }
        };

        tour.travel_to(graph, mode, entry);

        match sweep {
            ZoneSweep::RightFirst => right_first(&mut tour, graph, mode, Some(zone)),
            ZoneSweep::Serpentine => serpentine(&mut tour, graph, mode, zone),
        }
    }

    if use_simple_zones {
        right_first(&mut tour, graph, mode, None);
    }

    tour.into_points()
}

/// Visit the reachable points of the zone row by row, reversing direction on each row.
fn serpentine(tour: &mut Tour, graph: &CoverageGraph, mode: BackPathMode, zone: &Rect) {
    let from = tour.position();

    let mut points: Vec<Point> = graph
        .reachable_from(&from)
        .into_iter()
        .filter(|p| zone.contains(p) && !tour.is_visited(p))
        .collect();

    if points.is_empty() {
        return;
    }

    points.sort_by_key(|p| (p.y, p.x));

    let mut rows: Vec<Vec<Point>> = Vec::new();
    for p in points {
        match rows.last_mut() {
            Some(row) if row[0].y == p.y => row.push(p),
            _ => rows.push(vec![p]),
        }
    }

    // Start from the row and end nearest to the current position
    let (first_y, last_y) = (rows[0][0].y, rows[rows.len() - 1][0].y);
    if (from.y - first_y).abs() > (from.y - last_y).abs() {
        rows.reverse();
    }

    let first_row = &rows[0];
    let mut forwards =
        (from.x - first_row[0].x).abs() <= (from.x - first_row[first_row.len() - 1].x).abs();

    for mut row in rows {
        if !forwards {
            row.reverse();
        }

        for p in row {
            if !tour.is_visited(&p) {
                tour.travel_to(graph, mode, p);
            }
        }

        forwards = !forwards;
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
