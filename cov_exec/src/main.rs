//! Coverage planner executable entry point.
//!
//! # Architecture
//!
//! The executable performs a single planning run:
//!
//!     - Initialise the session and logging
//!     - Load the planner parameters and the map file
//!     - Bake the map into an occupancy grid, coverage decomposition and coverage graph
//!     - Plan a coverage path with the configured builder
//!     - Save a report, and optionally the map with its planned path, into the session

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{collections::HashSet, path::PathBuf};

use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use serde::Serialize;
use structopt::StructOpt;

// Internal
use cov_lib::{
    env::{Environment, MapFile},
    geom::Point,
    graph::GraphSummary,
    params::PlannerParams,
    path::PathBuilder,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Plan a coverage path through a map.
#[derive(Debug, StructOpt)]
#[structopt(name = "cov_exec")]
struct Opt {
    /// The JSON map file to plan over
    #[structopt(parse(from_os_str))]
    map: PathBuf,

    /// Parameter file, relative to the `$COV_SW_ROOT/params` directory
    #[structopt(short, long, default_value = "planner.toml")]
    params: String,

    /// Use this builder instead of the one in the parameters, e.g. `right_first`
    #[structopt(short, long)]
    builder: Option<String>,

    /// Build the coverage graph with the naive builder
    #[structopt(long)]
    naive_graph: bool,

    /// Also write the map, including the planned path, to this file
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

/// Summary of a planning run, saved into the session directory.
#[derive(Debug, Serialize)]
struct PlanReport {
    map: PathBuf,
    params: PlannerParams,
    graph: GraphSummary,
    num_visit_points: usize,
    num_wall_visit_points: usize,
    num_waypoints: usize,
    num_unique_visits: usize,
    path_length: f64,

    /// The planned path in world units
    path: Vec<Point>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("cov_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Coverage Planner Executable\n");
    info!(
        "Software root: {:?}",
        host::get_cov_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut params: PlannerParams =
        util::params::load(&opt.params).wrap_err("Could not load planner params")?;

    if let Some(kind) = &opt.builder {
        params.builder = util::params::from_str::<PathBuilder>(&format!("kind = \"{}\"", kind))
            .wrap_err_with(|| format!("Unknown builder \"{}\"", kind))?;
    }
    if opt.naive_graph {
        params.optimized_graph = false;
    }

    info!("Planner parameters loaded: {:?}", params);

    // ---- LOAD MAP ----

    let map = MapFile::load(&opt.map)
        .wrap_err_with(|| format!("Could not load the map from {:?}", opt.map))?;

    info!(
        "Loaded {} walls from {:?}, starting at ({}, {})",
        map.walls.len(),
        opt.map,
        map.start_position.x,
        map.start_position.y
    );

    let mut env = Environment::from_map_file(map);
    env.set_frame_margin_cells(params.frame_margin_cells);

    // ---- BAKE ----

    let baked = env
        .bake(params.cell_size, params.coverage_size, params.optimized_graph)
        .wrap_err("Failed to bake the environment")?;

    let graph = baked.graph.summary();
    let num_visit_points = baked.decomposer.visit_points().len();
    let num_wall_visit_points = baked.decomposer.wall_visit_points().len();
    let origin = baked.decomposer.grid().bounds().position;

    info!(
        "Baked {} visit points ({} near walls), {} graph edges",
        num_visit_points, num_wall_visit_points, graph.num_edges
    );

    // ---- PLAN ----

    let path = env
        .plan(&params.builder)
        .wrap_err("Failed to plan a path")?
        .clone();

    let num_unique_visits = path
        .waypoints()
        .iter()
        .collect::<HashSet<_>>()
        .len();

    if path.waypoints().is_empty() {
        warn!("The planned path is empty, is the start position inside the map?");
    }

    info!(
        "Path visits {} of {} visit points in {} waypoints, {:.1} units long",
        num_unique_visits,
        num_visit_points,
        path.waypoints().len(),
        path.length(&origin)
    );

    // ---- SAVE ----

    session::save_with_timestamp(
        "coverage/report.json",
        PlanReport {
            map: opt.map.clone(),
            params,
            graph,
            num_visit_points,
            num_wall_visit_points,
            num_waypoints: path.waypoints().len(),
            num_unique_visits,
            path_length: path.length(&origin),
            path: path.to_world(&origin),
        },
    );

    if let Some(output) = &opt.output {
        env.to_map_file()
            .save(output)
            .wrap_err_with(|| format!("Could not save the map to {:?}", output))?;
        info!("Map with planned path saved to {:?}", output);
    }

    session.exit();

    Ok(())
}
