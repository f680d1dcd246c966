// Optimizer: epsilon removal, trimming, and equivalent-state merging.
//
// The goal is automaton-size reduction only. Every pass preserves the
// weighted relation: the set of (input, output, weight) triples accepted
// before a pass is accepted after it, so no alternative reading is pruned.
// Classical weighted determinization is deliberately not used here: the
// composed grammars are ambiguous on purpose (several readings per input)
// and determinization does not terminate for such machines.

use hashbrown::{HashMap, HashSet};

use crate::fst::{EPSILON, Fst, Label, StateId, Weight};

impl Fst {
    /// Full optimization pipeline: remove pure-epsilon arcs, drop
    /// disconnected states, then merge equivalent states to a fixpoint.
    pub fn optimize(self) -> Fst {
        self.rm_epsilon().trim().merge_equivalent().trim()
    }

    /// Remove arcs that are epsilon on both tapes, redirecting each state
    /// past its epsilon closure with summed weights. Arcs that insert or
    /// delete symbols are kept: they carry meaning.
    pub fn rm_epsilon(self) -> Fst {
        let n = self.num_states();
        let mut result = Fst::new();
        for _ in 1..n {
            result.add_state();
        }
        result.set_start(self.start());

        let mut on_path = vec![false; n];
        let mut closure = Vec::new();
        for state in self.states() {
            closure.clear();
            eps_closure(&self, state, 0.0, &mut on_path, &mut closure);

            let mut seen: HashSet<(Label, Label, u32, StateId)> = HashSet::new();
            let mut final_weight: Option<Weight> = None;
            for &(member, weight) in &closure {
                for arc in self.arcs(member) {
                    if arc.ilabel == EPSILON && arc.olabel == EPSILON {
                        continue;
                    }
                    let total = weight + arc.weight;
                    if seen.insert((arc.ilabel, arc.olabel, total.to_bits(), arc.target)) {
                        result.add_arc(state, arc.ilabel, arc.olabel, total, arc.target);
                    }
                }
                if let Some(fw) = self.final_weight(member) {
                    let total = weight + fw;
                    final_weight = Some(match final_weight {
                        Some(existing) => existing.min(total),
                        None => total,
                    });
                }
            }
            if let Some(fw) = final_weight {
                result.set_final(state, fw);
            }
        }
        result
    }

    /// Drop states that are unreachable from the start state or that
    /// cannot reach a final state, renumbering the rest.
    pub fn trim(self) -> Fst {
        let n = self.num_states();

        // Forward reachability.
        let mut forward = vec![false; n];
        let mut stack = vec![self.start()];
        forward[self.start()] = true;
        while let Some(state) = stack.pop() {
            for arc in self.arcs(state) {
                if !forward[arc.target] {
                    forward[arc.target] = true;
                    stack.push(arc.target);
                }
            }
        }

        // Backward reachability over reversed arcs.
        let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for state in self.states() {
            for arc in self.arcs(state) {
                reverse[arc.target].push(state);
            }
        }
        let mut backward = vec![false; n];
        let mut stack: Vec<StateId> = self.finals().map(|(s, _)| s).collect();
        for &state in &stack {
            backward[state] = true;
        }
        while let Some(state) = stack.pop() {
            for &source in &reverse[state] {
                if !backward[source] {
                    backward[source] = true;
                    stack.push(source);
                }
            }
        }

        let keep: Vec<bool> = (0..n).map(|s| forward[s] && backward[s]).collect();
        if !keep[self.start()] {
            // The machine accepts nothing.
            return Fst::new();
        }

        let mut remap: Vec<Option<StateId>> = vec![None; n];
        let mut result = Fst::new();
        let mut next_id = 0;
        for state in self.states() {
            if keep[state] {
                let new_state = if next_id == 0 { 0 } else { result.add_state() };
                remap[state] = Some(new_state);
                next_id += 1;
            }
        }
        if let Some(new_start) = remap[self.start()] {
            result.set_start(new_start);
        }
        for state in self.states() {
            let Some(new_state) = remap[state] else {
                continue;
            };
            if let Some(fw) = self.final_weight(state) {
                result.set_final(new_state, fw);
            }
            for arc in self.arcs(state) {
                if let Some(new_target) = remap[arc.target] {
                    result.add_arc(new_state, arc.ilabel, arc.olabel, arc.weight, new_target);
                }
            }
        }
        result
    }

    /// Merge states with identical behavior, iterating to a fixpoint.
    ///
    /// Two states are merged when they agree on finality and on their
    /// (sorted, deduplicated) outgoing arcs after mapping targets through
    /// the current merge classes. Each pass can enable further merges
    /// upstream, so passes repeat until the classes stabilize.
    pub fn merge_equivalent(self) -> Fst {
        let n = self.num_states();
        let mut repr: Vec<StateId> = (0..n).collect();
        loop {
            let mut table: HashMap<Signature, StateId> = HashMap::new();
            let mut next: Vec<StateId> = vec![0; n];
            for state in self.states() {
                let mut arcs: Vec<(Label, Label, u32, StateId)> = self
                    .arcs(state)
                    .iter()
                    .map(|a| (a.ilabel, a.olabel, a.weight.to_bits(), repr[a.target]))
                    .collect();
                arcs.sort_unstable();
                arcs.dedup();
                let signature = (self.final_weight(state).map(f32::to_bits), arcs);
                next[state] = *table.entry(signature).or_insert(state);
            }
            if next == repr {
                break;
            }
            repr = next;
        }

        let mut remap: Vec<Option<StateId>> = vec![None; n];
        let mut result = Fst::new();
        let mut created = 0;
        for state in self.states() {
            if repr[state] == state {
                let new_state = if created == 0 { 0 } else { result.add_state() };
                remap[state] = Some(new_state);
                created += 1;
            }
        }
        let start_repr = repr[self.start()];
        if let Some(new_start) = remap[start_repr] {
            result.set_start(new_start);
        }
        for state in self.states() {
            if repr[state] != state {
                continue;
            }
            let Some(new_state) = remap[state] else {
                continue;
            };
            if let Some(fw) = self.final_weight(state) {
                result.set_final(new_state, fw);
            }
            let mut seen: HashSet<(Label, Label, u32, StateId)> = HashSet::new();
            for arc in self.arcs(state) {
                if let Some(new_target) = remap[repr[arc.target]] {
                    if seen.insert((arc.ilabel, arc.olabel, arc.weight.to_bits(), new_target)) {
                        result.add_arc(new_state, arc.ilabel, arc.olabel, arc.weight, new_target);
                    }
                }
            }
        }
        result
    }

    /// Whether the machine is input-deterministic: no input-epsilon arcs
    /// and no state with two arcs sharing an input label.
    pub fn is_deterministic(&self) -> bool {
        let mut seen: HashSet<Label> = HashSet::new();
        for state in self.states() {
            seen.clear();
            for arc in self.arcs(state) {
                if arc.ilabel == EPSILON || !seen.insert(arc.ilabel) {
                    return false;
                }
            }
        }
        true
    }
}

type Signature = (Option<u32>, Vec<(Label, Label, u32, StateId)>);

/// Enumerate (state, accumulated weight) pairs reachable through arcs that
/// are epsilon on both tapes, including the origin at weight zero. Cycles
/// of pure-epsilon arcs are walked at most once per path.
fn eps_closure(
    fst: &Fst,
    state: StateId,
    weight: Weight,
    on_path: &mut [bool],
    out: &mut Vec<(StateId, Weight)>,
) {
    out.push((state, weight));
    on_path[state] = true;
    for arc in fst.arcs(state) {
        if arc.ilabel == EPSILON && arc.olabel == EPSILON && !on_path[arc.target] {
            eps_closure(fst, arc.target, weight + arc.weight, on_path, out);
        }
    }
    on_path[state] = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;

    fn paths(fst: &Fst, input: &str) -> Vec<Path> {
        fst.transduce(input).collect()
    }

    /// A small money-like grammar with glue epsilons, weights and
    /// alternatives, used to check relation preservation.
    fn sample_grammar() -> Fst {
        let number = Fst::cross("dos", "2")
            .union(Fst::cross("doce", "12"))
            .union(Fst::cross("dos", "II").with_weight(0.5));
        Fst::insert("n: ")
            .concat(number)
            .concat(Fst::delete(" euros").optional())
    }

    #[test]
    fn optimize_preserves_relation() {
        let original = sample_grammar();
        let optimized = original.clone().optimize();

        for input in ["dos", "doce", "dos euros", "doce euros", "tres"] {
            assert_eq!(
                paths(&original, input),
                paths(&optimized, input),
                "relation changed for {input:?}"
            );
        }
    }

    #[test]
    fn optimize_shrinks() {
        let original = sample_grammar();
        let before = original.num_states();
        let optimized = original.optimize();
        assert!(optimized.num_states() < before);
    }

    #[test]
    fn rm_epsilon_removes_glue() {
        let fst = Fst::accept("a").concat(Fst::accept("b")).rm_epsilon();
        for state in fst.states() {
            for arc in fst.arcs(state) {
                assert!(arc.ilabel != EPSILON || arc.olabel != EPSILON);
            }
        }
        assert_eq!(paths(&fst, "ab")[0].output, "ab");
    }

    #[test]
    fn rm_epsilon_keeps_bias_weight() {
        let fst = Fst::cross("a", "x").with_weight(-0.7).rm_epsilon();
        let got = paths(&fst, "a");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].weight, -0.7);
    }

    #[test]
    fn trim_drops_dead_states() {
        let mut fst = Fst::accept("ab");
        // A dangling branch that can never reach a final state.
        let dead = fst.add_state();
        fst.add_arc(fst.start(), Fst::label('z'), Fst::label('z'), 0.0, dead);
        let trimmed = fst.trim();
        assert_eq!(trimmed.num_states(), 3);
        assert_eq!(paths(&trimmed, "ab").len(), 1);
        assert!(paths(&trimmed, "z").is_empty());
    }

    #[test]
    fn trim_empty_language() {
        let fst = Fst::new().trim();
        assert_eq!(fst.num_states(), 1);
        assert!(paths(&fst, "").is_empty());
    }

    #[test]
    fn merge_shares_suffixes() {
        // Two branches ending identically should collapse their tails.
        let fst = Fst::accept("abc")
            .union(Fst::accept("xbc"))
            .rm_epsilon()
            .trim();
        let merged = fst.clone().merge_equivalent();
        assert!(merged.num_states() < fst.num_states());
        assert_eq!(paths(&merged, "abc").len(), 1);
        assert_eq!(paths(&merged, "xbc").len(), 1);
    }

    #[test]
    fn determinism_flag() {
        assert!(Fst::accept("abc").is_deterministic());
        assert!(!Fst::accept("a").union(Fst::accept("b")).is_deterministic());
        // After optimization the union of disjoint literals becomes
        // deterministic again.
        assert!(
            Fst::accept("a")
                .union(Fst::accept("b"))
                .optimize()
                .is_deterministic()
        );
    }

    #[test]
    fn optimize_preserves_distinct_weighted_alternatives() {
        let fst = crate::ops::weighted_union(
            Fst::cross("dos", "2"),
            Fst::cross("dos", "two"),
            -0.7,
        )
        .optimize();
        let got = paths(&fst, "dos");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].output, "2");
        assert_eq!(got[1].output, "two");
    }
}
