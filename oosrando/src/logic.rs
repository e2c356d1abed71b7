pub mod items;
pub mod kill;

use std::sync::OnceLock;

use anyhow::{Context, Result};
use log::info;
use oosrando_logic::{Difficulty, GraphBuilder, RequirementGraph, State};

use crate::settings::LogicSettings;

/// Items that the placement search can put in a state.
pub const ITEM_ATOMS: &[&str] = &[
    "sword L-1",
    "sword L-2",
    "boomerang L-1",
    "boomerang L-2",
    "rod",
    "feather L-1",
    "feather L-2",
    "satchel",
    "slingshot L-1",
    "slingshot L-2",
    "bombs",
    "bracelet",
    "shield L-1",
    "shield L-2",
    "shovel",
    "magnet gloves",
    "fool's ore",
    "toss ring",
    "fist ring",
    "expert's ring",
    "energy ring",
    "ember tree",
    "scent tree",
    "gale tree",
    "pegasus tree",
    "mystery tree",
];

/// Always present: being at the start of the game. Used for options that
/// need nothing at all under hard logic.
pub const START_ATOM: &str = "start";

fn builder(warn_unresolved_atoms: bool) -> Result<GraphBuilder> {
    let mut builder = GraphBuilder::new();
    builder
        .extend(items::item_nodes())
        .context("adding item nodes")?
        .extend(kill::kill_nodes())
        .context("adding kill nodes")?;
    if warn_unresolved_atoms {
        builder.known_atoms(ITEM_ATOMS.iter().copied().chain([START_ATOM]));
    }
    Ok(builder)
}

/// Builds a fresh graph from the game tables. `settings.warn_unresolved_atoms`
/// decides whether atoms outside the item vocabulary are logged. Difficulty
/// is a per-query input and plays no part here.
pub fn build_graph(settings: &LogicSettings) -> Result<RequirementGraph> {
    let graph = builder(settings.warn_unresolved_atoms)?
        .build()
        .context("building requirement graph")?;
    Ok(graph)
}

static GRAPH: OnceLock<RequirementGraph> = OnceLock::new();

/// The process-wide requirement graph, built on first use with the item
/// vocabulary attached. Callers wanting other build options use
/// [`build_graph`].
pub fn graph() -> Result<&'static RequirementGraph> {
    if let Some(graph) = GRAPH.get() {
        return Ok(graph);
    }
    let graph = builder(true)?
        .build()
        .context("building requirement graph")?;
    info!("Initialized logic graph with {} nodes", graph.num_nodes());
    Ok(GRAPH.get_or_init(|| graph))
}

/// Names of the kill and obstacle nodes satisfied by `state`.
pub fn reachable_kills(state: &State, difficulty: Difficulty) -> Result<Vec<&'static str>> {
    let graph = graph()?;
    let names: Vec<&'static str> = kill::kill_nodes().into_iter().map(|(name, _)| name).collect();
    let satisfied = graph.satisfied_all(&names, state, difficulty);
    Ok(names
        .into_iter()
        .zip(satisfied)
        .filter_map(|(name, sat)| sat.then_some(name))
        .collect())
}
