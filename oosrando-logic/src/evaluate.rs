use hashbrown::HashSet;
use log::debug;

use crate::{
    Difficulty, State, TermIdx,
    graph::{Operand, RequirementGraph},
};

/// Computes the least fixpoint of the graph for one state and difficulty.
///
/// Every term starts out false. A term becomes true once enough of its
/// operands are true (all of them for `And`, one for `Or`), and the change is
/// pushed to the terms that use it. Terms only ever go from false to true, so
/// each parent edge is visited at most once, and a cycle with no true atom
/// feeding into it stays false.
///
/// If `scope` is given, terms outside it are never updated. The scope must be
/// closed under operands (see [`RequirementGraph::cone`]) for the values inside
/// it to be exact.
fn propagate(
    graph: &RequirementGraph,
    state: &State,
    difficulty: Difficulty,
    scope: Option<&[bool]>,
) -> (Vec<bool>, Vec<bool>) {
    let num_terms = graph.terms.len();
    let mut values = vec![false; num_terms];
    let mut remaining: Vec<usize> = graph.terms.iter().map(|t| t.threshold()).collect();
    let enabled = |idx: TermIdx| -> bool {
        (!graph.terms[idx].hard || difficulty == Difficulty::Hard)
            && scope.is_none_or(|s| s[idx])
    };

    let mut atoms = vec![false; graph.atoms.keys.len()];
    let mut stack: Vec<TermIdx> = Vec::new();
    let mut edges_visited = 0;
    let mut notify = |parent: TermIdx, values: &mut Vec<bool>, stack: &mut Vec<TermIdx>| {
        edges_visited += 1;
        if values[parent] || !enabled(parent) {
            return;
        }
        remaining[parent] -= 1;
        if remaining[parent] == 0 {
            values[parent] = true;
            stack.push(parent);
        }
    };

    for name in state.iter() {
        if let Some(&a) = graph.atoms.index_by_key.get(name) {
            atoms[a] = true;
            for &parent in &graph.atom_parents[a] {
                notify(parent, &mut values, &mut stack);
            }
        }
    }
    while let Some(idx) = stack.pop() {
        for &parent in &graph.term_parents[idx] {
            notify(parent, &mut values, &mut stack);
        }
    }

    debug!(
        "Fixpoint ({difficulty}): {} of {} terms satisfied, {} edges visited",
        values.iter().filter(|&&v| v).count(),
        num_terms,
        edges_visited
    );
    (atoms, values)
}

impl RequirementGraph {
    /// Whether `root` is satisfied by `state` under `difficulty`.
    ///
    /// Only the part of the graph that `root` depends on is evaluated. A root
    /// that is not a declared node is looked up in the state directly, so
    /// unknown names are simply false.
    pub fn satisfied(&self, root: &str, state: &State, difficulty: Difficulty) -> bool {
        match self.node_idx(root) {
            Some(idx) => {
                let scope = self.cone(&[idx]);
                let (_, values) = propagate(self, state, difficulty, Some(&scope));
                values[idx]
            }
            None => state.contains(root),
        }
    }

    /// Batch form of [`satisfied`](Self::satisfied): one fixpoint over the
    /// union of the roots' dependencies.
    pub fn satisfied_all(&self, roots: &[&str], state: &State, difficulty: Difficulty) -> Vec<bool> {
        let root_terms: Vec<TermIdx> = roots.iter().filter_map(|r| self.node_idx(r)).collect();
        let scope = self.cone(&root_terms);
        let (_, values) = propagate(self, state, difficulty, Some(&scope));
        roots
            .iter()
            .map(|r| match self.node_idx(r) {
                Some(idx) => values[idx],
                None => state.contains(r),
            })
            .collect()
    }

    /// Evaluates every node of the graph at once.
    pub fn solve(&self, state: &State, difficulty: Difficulty) -> Solution<'_> {
        let (atoms, values) = propagate(self, state, difficulty, None);
        let unknown_atoms = state
            .iter()
            .filter(|&a| !self.contains_node(a) && !self.atoms.index_by_key.contains_key(a))
            .map(str::to_string)
            .collect();
        Solution {
            graph: self,
            difficulty,
            atoms,
            values,
            unknown_atoms,
        }
    }
}

/// Truth values of every node and atom of a graph for one state.
#[derive(Clone, Debug)]
pub struct Solution<'g> {
    graph: &'g RequirementGraph,
    difficulty: Difficulty,
    atoms: Vec<bool>,
    values: Vec<bool>,
    // State atoms that the graph never references.
    unknown_atoms: HashSet<String>,
}

impl<'g> Solution<'g> {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Looks up a node or an atom. A name that is not a node is true iff it
    /// was in the solved state, as with [`RequirementGraph::satisfied`].
    pub fn satisfied(&self, name: &str) -> bool {
        if let Some(idx) = self.graph.node_idx(name) {
            self.values[idx]
        } else if let Some(&a) = self.graph.atoms.index_by_key.get(name) {
            self.atoms[a]
        } else {
            self.unknown_atoms.contains(name)
        }
    }

    /// Names of all satisfied nodes, in declaration order.
    pub fn satisfied_nodes(&self) -> Vec<&'g str> {
        self.graph
            .nodes
            .keys
            .iter()
            .enumerate()
            .filter(|&(idx, _)| self.values[idx])
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Atoms that `name` depends on and that were absent from the state,
    /// sorted. Useful when debugging why a location is out of logic.
    pub fn missing_atoms(&self, name: &str) -> Vec<&'g str> {
        let Some(root) = self.graph.node_idx(name) else {
            return vec![];
        };
        let in_cone = self.graph.cone(&[root]);
        let mut out: Vec<&'g str> = vec![];
        for (idx, term) in self.graph.terms.iter().enumerate() {
            if !in_cone[idx] {
                continue;
            }
            for &operand in &term.operands {
                if let Operand::Atom(a) = operand {
                    let atom = self.graph.atoms.keys[a].as_str();
                    if !self.atoms[a] && !out.contains(&atom) {
                        out.push(atom);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }
}

/// A memoizing evaluation session for one graph and difficulty.
///
/// The placement search usually asks about many locations against the same
/// candidate inventory, so the whole graph is solved once per distinct state
/// and later queries are answered from that solution. Supplying a state that
/// differs from the cached one discards the cache.
///
/// Each worker should own its own `Evaluator`; only the graph is shared.
pub struct Evaluator<'g> {
    graph: &'g RequirementGraph,
    difficulty: Difficulty,
    memo: Option<(State, Solution<'g>)>,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g RequirementGraph, difficulty: Difficulty) -> Self {
        Evaluator {
            graph,
            difficulty,
            memo: None,
        }
    }

    pub fn graph(&self) -> &'g RequirementGraph {
        self.graph
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            self.difficulty = difficulty;
            self.memo = None;
        }
    }

    pub fn clear(&mut self) {
        self.memo = None;
    }

    pub fn solution(&mut self, state: &State) -> &Solution<'g> {
        if self.memo.as_ref().is_some_and(|(cached, _)| cached != state) {
            self.memo = None;
        }
        let graph = self.graph;
        let difficulty = self.difficulty;
        &self
            .memo
            .get_or_insert_with(|| (state.clone(), graph.solve(state, difficulty)))
            .1
    }

    pub fn satisfied(&mut self, root: &str, state: &State) -> bool {
        if !self.graph.contains_node(root) {
            return state.contains(root);
        }
        self.solution(state).satisfied(root)
    }

    pub fn satisfied_all(&mut self, roots: &[&str], state: &State) -> Vec<bool> {
        let graph = self.graph;
        let solution = self.solution(state);
        roots
            .iter()
            .map(|r| {
                if graph.contains_node(r) {
                    solution.satisfied(r)
                } else {
                    state.contains(r)
                }
            })
            .collect()
    }

    pub fn reachable_nodes(&mut self, state: &State) -> Vec<&'g str> {
        self.solution(state).satisfied_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, Requirement, and, hard, hard_and, hard_or, or};

    fn state(atoms: &[&str]) -> State {
        atoms.iter().copied().collect()
    }

    fn cycle_graph() -> RequirementGraph {
        RequirementGraph::from_table([("A", or!("atom1", "B")), ("B", or!("atom2", "A"))]).unwrap()
    }

    #[test]
    fn test_or() {
        let graph = RequirementGraph::from_table([("kill", or!("sword", "bombs"))]).unwrap();
        assert!(graph.satisfied("kill", &state(&["bombs"]), Difficulty::Normal));
        assert!(!graph.satisfied("kill", &state(&["shovel"]), Difficulty::Normal));
    }

    #[test]
    fn test_hard() {
        let graph = RequirementGraph::from_table([("dig", or!(hard("shovel")))]).unwrap();
        let s = state(&["shovel"]);
        assert!(!graph.satisfied("dig", &s, Difficulty::Normal));
        assert!(graph.satisfied("dig", &s, Difficulty::Hard));
    }

    #[test]
    fn test_hard_as_node_body() {
        let graph = RequirementGraph::from_table([("dig", hard("shovel"))]).unwrap();
        let s = state(&["shovel"]);
        assert!(!graph.satisfied("dig", &s, Difficulty::Normal));
        assert!(graph.satisfied("dig", &s, Difficulty::Hard));
        assert!(!graph.satisfied("dig", &State::new(), Difficulty::Hard));
    }

    #[test]
    fn test_and() {
        let graph =
            RequirementGraph::from_table([("kill frypolar", and!("bracelet", "mystery seeds"))])
                .unwrap();
        assert!(!graph.satisfied("kill frypolar", &state(&["bracelet"]), Difficulty::Hard));
        assert!(graph.satisfied(
            "kill frypolar",
            &state(&["bracelet", "mystery seeds"]),
            Difficulty::Normal
        ));
    }

    #[test]
    fn test_and_with_repeated_operand() {
        let graph = RequirementGraph::from_table([("x", and!("a", "a", "b"))]).unwrap();
        assert!(!graph.satisfied("x", &state(&["a"]), Difficulty::Normal));
        assert!(graph.satisfied("x", &state(&["a", "b"]), Difficulty::Normal));
    }

    #[test]
    fn test_hard_and_gates_whole_group() {
        let graph = RequirementGraph::from_table([
            ("gated", hard_and!("satchel", "jump")),
            ("wrapped", hard(and!("satchel", "jump"))),
        ])
        .unwrap();
        let full = state(&["satchel", "jump"]);
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            for s in [&full, &state(&["satchel"]), &State::new()] {
                assert_eq!(
                    graph.satisfied("gated", s, difficulty),
                    graph.satisfied("wrapped", s, difficulty)
                );
            }
        }
        assert!(!graph.satisfied("gated", &full, Difficulty::Normal));
        assert!(graph.satisfied("gated", &full, Difficulty::Hard));
    }

    #[test]
    fn test_hard_or_inside_or_adds_options() {
        let graph = RequirementGraph::from_table([(
            "remove bush",
            or!("sword", "bracelet", hard_or!("ember seeds", "bombs")),
        )])
        .unwrap();
        assert!(graph.satisfied("remove bush", &state(&["sword"]), Difficulty::Normal));
        assert!(!graph.satisfied("remove bush", &state(&["bombs"]), Difficulty::Normal));
        assert!(graph.satisfied("remove bush", &state(&["bombs"]), Difficulty::Hard));
    }

    #[test]
    fn test_cycle_grounded() {
        let graph = cycle_graph();
        let s = state(&["atom2"]);
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            assert!(graph.satisfied("A", &s, difficulty));
            assert!(graph.satisfied("B", &s, difficulty));
        }
    }

    #[test]
    fn test_cycle_ungrounded() {
        let graph = cycle_graph();
        assert!(!graph.satisfied("A", &State::new(), Difficulty::Hard));
        assert!(!graph.satisfied("B", &State::new(), Difficulty::Hard));
        assert_eq!(
            graph.solve(&State::new(), Difficulty::Hard).satisfied_nodes(),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn test_and_cycle_stays_false() {
        // Each needs the other, so no state can ground them.
        let graph =
            RequirementGraph::from_table([("A", and!("atom1", "B")), ("B", and!("atom2", "A"))])
                .unwrap();
        let s = state(&["atom1", "atom2"]);
        assert!(!graph.satisfied("A", &s, Difficulty::Hard));
        assert!(!graph.satisfied("B", &s, Difficulty::Hard));
    }

    #[test]
    fn test_unknown_names() {
        let graph = RequirementGraph::from_table([("kill", or!("sword"))]).unwrap();
        let s = state(&["bombs"]);
        assert!(graph.satisfied("bombs", &s, Difficulty::Normal));
        assert!(!graph.satisfied("no such node", &s, Difficulty::Normal));
        assert!(graph.solve(&s, Difficulty::Normal).satisfied("bombs"));
        assert!(!graph.solve(&s, Difficulty::Normal).satisfied("no such node"));
        assert!(graph.solve(&state(&["sword"]), Difficulty::Normal).satisfied("sword"));
    }

    #[test]
    fn test_solution_agrees_with_direct_query_on_foreign_atoms() {
        let graph = RequirementGraph::from_table([("kill", or!("sword"))]).unwrap();
        let s = state(&["flute", "sword"]);
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            let solution = graph.solve(&s, difficulty);
            for name in ["flute", "sword", "kill", "bracelet"] {
                assert_eq!(
                    solution.satisfied(name),
                    graph.satisfied(name, &s, difficulty),
                    "{name}"
                );
            }
        }
        let mut evaluator = Evaluator::new(&graph, Difficulty::Normal);
        assert!(evaluator.solution(&s).satisfied("flute"));
        assert!(evaluator.satisfied("flute", &s));
    }

    #[test]
    fn test_satisfied_all_matches_single_queries() {
        let mut builder = GraphBuilder::new();
        builder
            .add("kill normal", or!("sword", "bombs", "seed kill normal"))
            .unwrap()
            .add("seed kill normal", or!("ember seeds", "scent seeds"))
            .unwrap()
            .add("kill stalfos", or!("kill normal", "rod"))
            .unwrap()
            .add("kill gohma", and!(or!("scent seeds", "ember seeds"), or!("slingshot", hard("start"))))
            .unwrap();
        let graph = builder.build().unwrap();
        let roots = ["kill normal", "kill stalfos", "kill gohma", "rod", "unknown"];
        let s = state(&["rod", "ember seeds", "start"]);
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            let batch = graph.satisfied_all(&roots, &s, difficulty);
            let single: Vec<bool> = roots
                .iter()
                .map(|r| graph.satisfied(r, &s, difficulty))
                .collect();
            assert_eq!(batch, single);
        }
        assert_eq!(
            graph.satisfied_all(&roots, &s, Difficulty::Hard),
            vec![true, true, true, true, false]
        );
        assert_eq!(
            graph.satisfied_all(&roots, &s, Difficulty::Normal),
            vec![true, true, false, true, false]
        );
    }

    #[test]
    fn test_scope_does_not_leak_outside_cone() {
        let graph = RequirementGraph::from_table([
            ("a", or!("x")),
            ("b", and!("a", "y")),
        ])
        .unwrap();
        let s = state(&["x", "y"]);
        assert!(graph.satisfied("a", &s, Difficulty::Normal));
        assert!(graph.satisfied("b", &s, Difficulty::Normal));
    }

    #[test]
    fn test_solution_missing_atoms() {
        let graph = RequirementGraph::from_table([
            ("kill omuai", and!("damage omuai", "bracelet")),
            ("damage omuai", or!("sword", "bombs")),
        ])
        .unwrap();
        let solution = graph.solve(&state(&["bombs"]), Difficulty::Normal);
        assert!(solution.satisfied("damage omuai"));
        assert!(!solution.satisfied("kill omuai"));
        assert_eq!(solution.missing_atoms("kill omuai"), vec!["bracelet", "sword"]);
    }

    #[test]
    fn test_evaluator_memo() {
        let graph = cycle_graph();
        let mut evaluator = Evaluator::new(&graph, Difficulty::Normal);
        let mut s = State::new();
        assert!(!evaluator.satisfied("A", &s));
        s.insert("atom1");
        assert!(evaluator.satisfied("A", &s));
        assert!(evaluator.satisfied("B", &s));
        assert_eq!(evaluator.reachable_nodes(&s), vec!["A", "B"]);
        s.remove("atom1");
        assert!(!evaluator.satisfied("B", &s));
        assert_eq!(evaluator.satisfied_all(&["A", "B", "atom1"], &s), vec![false, false, false]);
    }

    #[test]
    fn test_evaluator_set_difficulty() {
        let graph = RequirementGraph::from_table([("dig", Requirement::from("shovel")), ("hard dig", hard("dig"))])
            .unwrap();
        let s = state(&["shovel"]);
        let mut evaluator = Evaluator::new(&graph, Difficulty::Normal);
        assert!(evaluator.satisfied("dig", &s));
        assert!(!evaluator.satisfied("hard dig", &s));
        evaluator.set_difficulty(Difficulty::Hard);
        assert!(evaluator.satisfied("hard dig", &s));
        assert_eq!(evaluator.solution(&s).difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_shared_graph_across_threads() {
        let graph = cycle_graph();
        let states = [state(&[]), state(&["atom1"]), state(&["atom2"]), state(&["atom1", "atom2"])];
        let results: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = states
                .iter()
                .map(|s| {
                    let graph = &graph;
                    scope.spawn(move || Evaluator::new(graph, Difficulty::Normal).satisfied("B", s))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results, vec![false, true, true, true]);
    }

    #[test]
    fn test_hard_or_node() {
        let graph = RequirementGraph::from_table([("x", hard_or!("a", "b"))]).unwrap();
        assert!(!graph.satisfied("x", &state(&["a", "b"]), Difficulty::Normal));
        assert!(graph.satisfied("x", &state(&["b"]), Difficulty::Hard));
    }

    #[test]
    fn test_hard_and_function_form() {
        let graph = RequirementGraph::from_table([("x", hard_and(["a", "b"]))]).unwrap();
        assert!(!graph.satisfied("x", &state(&["a"]), Difficulty::Hard));
        assert!(graph.satisfied("x", &state(&["a", "b"]), Difficulty::Hard));
    }
}
