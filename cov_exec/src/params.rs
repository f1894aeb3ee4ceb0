//! # Planner Parameters
//!
//! This module provides parameters for the coverage planner executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::path::PathBuilder;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerParams {
    /// Size of one occupancy grid cell in world units
    pub cell_size: i32,

    /// Number of grid cells along each side of a coverage cell, the robot's footprint
    pub coverage_size: i32,

    /// Use the optimized graph builder rather than the naive one
    #[serde(default = "default_optimized_graph")]
    pub optimized_graph: bool,

    /// Margin left around the walls when the map gives no bounds, in grid cells. Defaults to one
    /// coverage cell.
    #[serde(default)]
    pub frame_margin_cells: Option<i32>,

    /// The tour construction heuristic
    pub builder: PathBuilder,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_optimized_graph() -> bool {
    true
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{geom::Rect, path::BackPathMode};

    #[test]
    fn test_parse() {
        let params: PlannerParams = util::params::from_str(
            r#"
            cell_size = 20
            coverage_size = 3

            [builder]
            kind = "non_occupied"
            back_path = "replay"
            zones = [
                { position = [0, 0], size = [200, 400] },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(params.cell_size, 20);
        assert_eq!(params.coverage_size, 3);
        assert!(params.optimized_graph);
        assert_eq!(params.frame_margin_cells, None);
        assert_eq!(
            params.builder,
            PathBuilder::NonOccupied {
                zones: vec![Rect::from_xywh(0, 0, 200, 400)],
                back_path: BackPathMode::Replay,
            }
        );
    }

    #[test]
    fn test_missing_builder() {
        let res: Result<PlannerParams, _> =
            util::params::from_str("cell_size = 20\ncoverage_size = 3\n");
        assert!(res.is_err());
    }
}
