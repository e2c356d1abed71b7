use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// The set of atoms (held items, derived facts, enabled tricks) currently
/// considered true. Owned and mutated by the caller between queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    atoms: HashSet<String>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the atom was not already present.
    pub fn insert(&mut self, atom: impl Into<String>) -> bool {
        self.atoms.insert(atom.into())
    }

    /// Returns true if the atom was present.
    pub fn remove(&mut self, atom: &str) -> bool {
        self.atoms.remove(atom)
    }

    pub fn contains(&self, atom: &str) -> bool {
        self.atoms.contains(atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn is_subset(&self, other: &State) -> bool {
        self.atoms.is_subset(&other.atoms)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(String::as_str)
    }

    /// A copy of this state with one more atom.
    pub fn with(&self, atom: impl Into<String>) -> State {
        let mut state = self.clone();
        state.insert(atom);
        state
    }
}

impl<S: Into<String>> FromIterator<S> for State {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        State {
            atoms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for State {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.atoms.extend(iter.into_iter().map(Into::into));
    }
}
