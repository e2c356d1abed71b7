use anyhow::{Context, Result, bail};
use hashbrown::HashSet;
use oosrando_logic::{Difficulty, Evaluator, RequirementGraph, State};
use serde::{Deserialize, Serialize};

use crate::logic::{ITEM_ATOMS, START_ATOM};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LogicSettings {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub starting_items: Vec<String>,
    #[serde(default = "default_warn_unresolved_atoms")]
    pub warn_unresolved_atoms: bool,
}

fn default_warn_unresolved_atoms() -> bool {
    true
}

impl Default for LogicSettings {
    fn default() -> Self {
        LogicSettings {
            difficulty: Difficulty::Normal,
            starting_items: vec![],
            warn_unresolved_atoms: default_warn_unresolved_atoms(),
        }
    }
}

impl LogicSettings {
    /// The state the placement search starts from.
    pub fn initial_state(&self) -> State {
        let mut state = State::new();
        state.insert(START_ATOM);
        state.extend(self.starting_items.iter().cloned());
        state
    }

    /// A memoizing evaluator over `graph` at the configured difficulty.
    pub fn evaluator<'g>(&self, graph: &'g RequirementGraph) -> Evaluator<'g> {
        Evaluator::new(graph, self.difficulty)
    }
}

pub fn parse_logic_settings(settings_json: &str) -> Result<LogicSettings> {
    let settings: LogicSettings =
        serde_json::from_str(settings_json).context("parsing logic settings")?;
    let items: HashSet<&str> = ITEM_ATOMS.iter().copied().collect();
    for item in &settings.starting_items {
        if !items.contains(item.as_str()) {
            bail!("Unknown starting item: {item:?}");
        }
    }
    Ok(settings)
}
