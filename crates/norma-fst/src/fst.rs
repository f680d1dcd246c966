// The weighted transducer value type.
//
// Labels are Unicode scalar values stored as u32; label 0 is epsilon.
// A state is final iff it carries a final weight. The accepted relation
// of the machine is the set of (input, output, weight) triples along
// paths from the start state to a final state.

/// State identifier (index into the state table).
pub type StateId = usize;

/// Arc label: a Unicode scalar value, or [`EPSILON`].
pub type Label = u32;

/// Tropical weight: path weight is the sum along the path, lower wins.
pub type Weight = f32;

/// The empty label. Epsilon on the input tape consumes nothing; epsilon
/// on the output tape emits nothing.
pub const EPSILON: Label = 0;

/// A single weighted transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: Weight,
    pub target: StateId,
}

impl Arc {
    pub fn new(ilabel: Label, olabel: Label, weight: Weight, target: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            target,
        }
    }
}

/// A weighted finite-state transducer.
///
/// Freshly constructed machines have a single non-final start state and
/// therefore accept nothing. Grammars are built by the combinators in
/// [`ops`](crate::ops) and frozen by convention: once a grammar is
/// composed and optimized it is only read, so `&Fst` is safe to share
/// across threads ([`Fst`] is `Send + Sync` by construction).
#[derive(Debug, Clone)]
pub struct Fst {
    start: StateId,
    arcs: Vec<Vec<Arc>>,
    finals: Vec<Option<Weight>>,
}

impl Fst {
    /// A machine with one non-final start state (accepts nothing).
    pub fn new() -> Self {
        Self {
            start: 0,
            arcs: vec![Vec::new()],
            finals: vec![None],
        }
    }

    /// Convert a character into its arc label.
    #[inline]
    pub fn label(c: char) -> Label {
        c as u32
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn set_start(&mut self, state: StateId) {
        debug_assert!(state < self.arcs.len());
        self.start = state;
    }

    pub fn add_state(&mut self) -> StateId {
        self.arcs.push(Vec::new());
        self.finals.push(None);
        self.arcs.len() - 1
    }

    pub fn add_arc(
        &mut self,
        from: StateId,
        ilabel: Label,
        olabel: Label,
        weight: Weight,
        target: StateId,
    ) {
        debug_assert!(target < self.arcs.len());
        self.arcs[from].push(Arc::new(ilabel, olabel, weight, target));
    }

    pub fn set_final(&mut self, state: StateId, weight: Weight) {
        self.finals[state] = Some(weight);
    }

    pub fn clear_final(&mut self, state: StateId) {
        self.finals[state] = None;
    }

    pub fn final_weight(&self, state: StateId) -> Option<Weight> {
        self.finals[state]
    }

    pub fn num_states(&self) -> usize {
        self.arcs.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.iter().map(Vec::len).sum()
    }

    pub fn arcs(&self, state: StateId) -> &[Arc] {
        &self.arcs[state]
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + use<> {
        0..self.arcs.len()
    }

    /// Final states with their weights.
    pub fn finals(&self) -> impl Iterator<Item = (StateId, Weight)> + '_ {
        self.finals
            .iter()
            .enumerate()
            .filter_map(|(s, w)| w.map(|w| (s, w)))
    }

    /// Swap the input and output tapes. The inverse of a classification
    /// transducer maps annotations back to surface text, which is how one
    /// rule set serves both directions.
    pub fn invert(mut self) -> Fst {
        for arcs in &mut self.arcs {
            for arc in arcs {
                std::mem::swap(&mut arc.ilabel, &mut arc.olabel);
            }
        }
        self
    }

    /// Apply a transformation to every arc in place.
    pub(crate) fn map_arcs(&mut self, f: impl Fn(&mut Arc)) {
        for arcs in &mut self.arcs {
            for arc in arcs {
                f(arc);
            }
        }
    }

    /// Copy all states, arcs and final weights of `other` into `self`.
    /// Returns the state-id offset: state `s` of `other` becomes state
    /// `s + offset` here. The start state is not changed.
    pub(crate) fn import(&mut self, other: &Fst) -> usize {
        let offset = self.arcs.len();
        for state in other.states() {
            let new_state = self.add_state();
            if let Some(w) = other.final_weight(state) {
                self.set_final(new_state, w);
            }
            for arc in other.arcs(state) {
                self.arcs[new_state].push(Arc::new(
                    arc.ilabel,
                    arc.olabel,
                    arc.weight,
                    arc.target + offset,
                ));
            }
        }
        offset
    }
}

impl Default for Fst {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_machine_accepts_nothing() {
        let fst = Fst::new();
        assert_eq!(fst.num_states(), 1);
        assert_eq!(fst.num_arcs(), 0);
        assert!(fst.transduce("").next().is_none());
        assert!(fst.transduce("a").next().is_none());
    }

    #[test]
    fn manual_construction() {
        let mut fst = Fst::new();
        let s1 = fst.add_state();
        fst.add_arc(fst.start(), Fst::label('a'), Fst::label('x'), 1.5, s1);
        fst.set_final(s1, 0.5);

        assert_eq!(fst.num_states(), 2);
        assert_eq!(fst.num_arcs(), 1);
        assert_eq!(fst.final_weight(s1), Some(0.5));
        assert_eq!(fst.final_weight(fst.start()), None);

        let paths: Vec<_> = fst.transduce("a").collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].output, "x");
        assert_eq!(paths[0].weight, 2.0);
    }

    #[test]
    fn invert_swaps_tapes() {
        let fst = Fst::cross("un", "1").invert();
        let paths: Vec<_> = fst.transduce("1").collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].output, "un");
    }

    #[test]
    fn import_offsets_states() {
        let mut a = Fst::accept("a");
        let b = Fst::accept("b");
        let before = a.num_states();
        let offset = a.import(&b);
        assert_eq!(offset, before);
        assert_eq!(a.num_states(), before + b.num_states());
    }

    #[test]
    fn finals_iterator() {
        let mut fst = Fst::new();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_final(s1, 1.0);
        fst.set_final(s2, 2.0);
        let finals: Vec<_> = fst.finals().collect();
        assert_eq!(finals, vec![(s1, 1.0), (s2, 2.0)]);
    }
}
