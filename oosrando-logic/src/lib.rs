pub mod evaluate;
pub mod graph;
pub mod requirement;
pub mod state;

use std::hash::Hash;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, VariantNames};

pub use evaluate::{Evaluator, Solution};
pub use graph::{BuildError, GraphBuilder, RequirementGraph};
pub use requirement::{Requirement, and, hard, hard_and, hard_or, or, parse_table};
pub use state::State;

pub type NodeIdx = usize; // Index into RequirementGraph.nodes.keys; also the index of the node's root term
pub type AtomIdx = usize; // Index into RequirementGraph.atoms.keys
pub type TermIdx = usize; // Index into RequirementGraph.terms (named nodes first, then nested expressions)

/// Logic difficulty. Hard logic only ever adds options on top of normal logic.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq + Clone> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        let key = name.to_owned();
        if let Some(&idx) = self.index_by_key.get(&key) {
            return idx;
        }
        let idx = self.keys.len();
        self.index_by_key.insert(key.clone(), idx);
        self.keys.push(key);
        idx
    }
}
