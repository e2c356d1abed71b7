use hashbrown::HashSet;
use log::{info, warn};
use thiserror::Error;

use crate::{AtomIdx, IndexedVec, NodeIdx, Requirement, TermIdx};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("duplicate node name {0:?}")]
    DuplicateNode(String),
    #[error("node {node:?}: {combinator} combinator has no operands")]
    EmptyCombinator {
        node: String,
        combinator: &'static str,
    },
    #[error("node {node:?}: {combinator} takes exactly {expected} operand(s), found {found}")]
    Arity {
        node: String,
        combinator: &'static str,
        expected: usize,
        found: usize,
    },
    /// A node mentions its own name inside its own expression. Since node
    /// names shadow atoms, this can only have been meant as an atom of the
    /// same name, which would be unreachable. Cycles through other nodes are
    /// legal and evaluate to their least fixpoint.
    #[error("node {0:?} refers to its own name")]
    SelfReference(String),
    #[error("node {node:?}: {message}")]
    Parse { node: String, message: String },
    #[error("invalid logic table: {0}")]
    InvalidTable(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    Atom(AtomIdx),
    Term(TermIdx),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Combinator {
    And,
    Or,
}

/// A flattened combinator. Every named node owns the term with the same index;
/// nested expressions get terms of their own after the named ones.
#[derive(Clone, Debug)]
pub(crate) struct Term {
    pub combinator: Combinator,
    // Only enabled under hard difficulty.
    pub hard: bool,
    pub operands: Vec<Operand>,
}

impl Term {
    /// Number of operands that must hold before the term holds.
    pub fn threshold(&self) -> usize {
        match self.combinator {
            Combinator::And => self.operands.len(),
            Combinator::Or => 1,
        }
    }
}

/// Collects named requirements and compiles them into a [`RequirementGraph`].
///
/// Declaration order does not matter: a reference is resolved against the
/// full set of node names only when the graph is built.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: IndexedVec<String>,
    requirements: Vec<Requirement>,
    known_atoms: Option<HashSet<String>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        requirement: impl Into<Requirement>,
    ) -> Result<&mut Self, BuildError> {
        let name = name.into();
        if self.nodes.index_by_key.contains_key(&name) {
            return Err(BuildError::DuplicateNode(name));
        }
        self.nodes.add(&name);
        self.requirements.push(requirement.into());
        Ok(self)
    }

    pub fn extend<I, S>(&mut self, table: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (S, Requirement)>,
        S: Into<String>,
    {
        for (name, requirement) in table {
            self.add(name, requirement)?;
        }
        Ok(self)
    }

    /// Atom names that callers are expected to supply in states. When set,
    /// building the graph warns about every atom outside this vocabulary.
    pub fn known_atoms<I, S>(&mut self, atoms: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_atoms
            .get_or_insert_with(HashSet::new)
            .extend(atoms.into_iter().map(Into::into));
        self
    }

    pub fn build(&self) -> Result<RequirementGraph, BuildError> {
        for (name, req) in self.nodes.keys.iter().zip(&self.requirements) {
            req.validate(name)?;
            if req.references(name) {
                return Err(BuildError::SelfReference(name.clone()));
            }
        }

        let num_nodes = self.nodes.keys.len();
        let mut compiler = Compiler {
            nodes: &self.nodes,
            atoms: IndexedVec::default(),
            terms: vec![None; num_nodes],
        };
        for (idx, req) in self.requirements.iter().enumerate() {
            let term = compiler.compile_term(req);
            compiler.terms[idx] = Some(term);
        }
        let Compiler { atoms, terms, .. } = compiler;
        // Every named slot was filled by the loop above.
        let terms: Vec<Term> = terms.into_iter().flatten().collect();

        let mut term_parents: Vec<Vec<TermIdx>> = vec![vec![]; terms.len()];
        let mut atom_parents: Vec<Vec<TermIdx>> = vec![vec![]; atoms.keys.len()];
        for (idx, term) in terms.iter().enumerate() {
            for &operand in &term.operands {
                match operand {
                    Operand::Atom(a) => atom_parents[a].push(idx),
                    Operand::Term(t) => term_parents[t].push(idx),
                }
            }
        }

        let graph = RequirementGraph {
            nodes: self.nodes.clone(),
            requirements: self.requirements.clone(),
            atoms,
            terms,
            term_parents,
            atom_parents,
        };
        info!(
            "Built requirement graph: {} nodes, {} atoms, {} terms",
            graph.nodes.keys.len(),
            graph.atoms.keys.len(),
            graph.terms.len()
        );
        if let Some(known) = &self.known_atoms {
            let unresolved = graph.unresolved_atoms(known.iter().map(String::as_str));
            if !unresolved.is_empty() {
                warn!(
                    "Atoms with no matching node and not in the known vocabulary: {:?}",
                    unresolved
                );
            }
        }
        Ok(graph)
    }
}

struct Compiler<'a> {
    nodes: &'a IndexedVec<String>,
    atoms: IndexedVec<String>,
    // `None` only for named slots that have not been compiled yet.
    terms: Vec<Option<Term>>,
}

impl Compiler<'_> {
    fn compile_term(&mut self, req: &Requirement) -> Term {
        let (combinator, hard, reqs) = match req {
            // A bare reference as a node body acts as an alias.
            Requirement::Ref(_) => (Combinator::Or, false, std::slice::from_ref(req)),
            Requirement::And(reqs) => (Combinator::And, false, reqs.as_slice()),
            Requirement::Or(reqs) => (Combinator::Or, false, reqs.as_slice()),
            Requirement::Hard(req) => (Combinator::Or, true, std::slice::from_ref(&**req)),
            Requirement::HardAnd(reqs) => (Combinator::And, true, reqs.as_slice()),
            Requirement::HardOr(reqs) => (Combinator::Or, true, reqs.as_slice()),
        };
        let operands = reqs.iter().map(|r| self.compile_operand(r)).collect();
        Term {
            combinator,
            hard,
            operands,
        }
    }

    fn compile_operand(&mut self, req: &Requirement) -> Operand {
        if let Requirement::Ref(name) = req {
            return match self.nodes.index_by_key.get(name) {
                Some(&idx) => Operand::Term(idx),
                None => Operand::Atom(self.atoms.add(name)),
            };
        }
        let term = self.compile_term(req);
        self.terms.push(Some(term));
        Operand::Term(self.terms.len() - 1)
    }
}

/// An immutable, compiled requirement graph.
///
/// The graph is plain data with no interior mutability, so it can be shared
/// by reference across threads evaluating different states.
#[derive(Clone, Debug)]
pub struct RequirementGraph {
    pub(crate) nodes: IndexedVec<String>,
    pub(crate) requirements: Vec<Requirement>,
    pub(crate) atoms: IndexedVec<String>,
    pub(crate) terms: Vec<Term>,
    pub(crate) term_parents: Vec<Vec<TermIdx>>,
    pub(crate) atom_parents: Vec<Vec<TermIdx>>,
}

impl RequirementGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn from_table<I, S>(table: I) -> Result<RequirementGraph, BuildError>
    where
        I: IntoIterator<Item = (S, Requirement)>,
        S: Into<String>,
    {
        GraphBuilder::new().extend(table)?.build()
    }

    pub fn from_json(json: &str) -> Result<RequirementGraph, BuildError> {
        Self::from_table(crate::requirement::parse_table(json)?)
    }

    pub fn node_idx(&self, name: &str) -> Option<NodeIdx> {
        self.nodes.index_by_key.get(name).copied()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.index_by_key.contains_key(name)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.keys.len()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys.iter().map(String::as_str)
    }

    /// Names referenced somewhere in the graph that are not declared nodes.
    pub fn atoms(&self) -> impl Iterator<Item = &str> {
        self.atoms.keys.iter().map(String::as_str)
    }

    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.node_idx(name).map(|idx| &self.requirements[idx])
    }

    /// Atoms of the graph that are not in `known`, sorted by name.
    pub fn unresolved_atoms<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Vec<&str> {
        let known: HashSet<&str> = known.into_iter().collect();
        let mut out: Vec<&str> = self.atoms().filter(|a| !known.contains(a)).collect();
        out.sort_unstable();
        out
    }

    /// Marks every term reachable from `roots`, following operands.
    pub(crate) fn cone(&self, roots: &[TermIdx]) -> Vec<bool> {
        let mut in_cone = vec![false; self.terms.len()];
        let mut stack: Vec<TermIdx> = Vec::new();
        for &root in roots {
            if !in_cone[root] {
                in_cone[root] = true;
                stack.push(root);
            }
        }
        while let Some(idx) = stack.pop() {
            for &operand in &self.terms[idx].operands {
                if let Operand::Term(t) = operand {
                    if !in_cone[t] {
                        in_cone[t] = true;
                        stack.push(t);
                    }
                }
            }
        }
        in_cone
    }

    /// Node and atom names that `name` depends on, directly or transitively,
    /// including `name` itself. Empty if `name` is not a node.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        let Some(root) = self.node_idx(name) else {
            return vec![];
        };
        let in_cone = self.cone(&[root]);
        let mut out: Vec<&str> = vec![];
        let mut atoms_seen: HashSet<AtomIdx> = HashSet::new();
        for (idx, term) in self.terms.iter().enumerate() {
            if !in_cone[idx] {
                continue;
            }
            if idx < self.nodes.keys.len() {
                out.push(&self.nodes.keys[idx]);
            }
            for &operand in &term.operands {
                if let Operand::Atom(a) = operand {
                    if atoms_seen.insert(a) {
                        out.push(&self.atoms.keys[a]);
                    }
                }
            }
        }
        out
    }
}
