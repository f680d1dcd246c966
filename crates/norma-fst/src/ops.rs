// Primitive builders and structural combinators.
//
// Every operator is total: it cannot fail, and it never mutates its
// arguments beyond consuming them by value. Grammars are assembled as
// plain expressions over these operators and frozen afterwards.

use hashbrown::HashMap;

use crate::fst::{EPSILON, Fst, Label, StateId, Weight};

impl Fst {
    /// The empty-string acceptor: accepts "" and emits "".
    pub fn epsilon() -> Fst {
        Fst::accept("")
    }

    /// Acceptor for a literal string: consumes `s` and emits `s`.
    pub fn accept(s: &str) -> Fst {
        let mut fst = Fst::new();
        let mut current = fst.start();
        for c in s.chars() {
            let next = fst.add_state();
            fst.add_arc(current, Fst::label(c), Fst::label(c), 0.0, next);
            current = next;
        }
        fst.set_final(current, 0.0);
        fst
    }

    /// Transducer consuming `input` and emitting `output`.
    pub fn cross(input: &str, output: &str) -> Fst {
        let mut fst = Fst::new();
        let mut current = fst.start();
        for c in input.chars() {
            let next = fst.add_state();
            fst.add_arc(current, Fst::label(c), EPSILON, 0.0, next);
            current = next;
        }
        for c in output.chars() {
            let next = fst.add_state();
            fst.add_arc(current, EPSILON, Fst::label(c), 0.0, next);
            current = next;
        }
        fst.set_final(current, 0.0);
        fst
    }

    /// Literal insertion: accepts empty input and emits `s`.
    pub fn insert(s: &str) -> Fst {
        Fst::cross("", s)
    }

    /// Literal deletion: consumes `s` and emits nothing.
    pub fn delete(s: &str) -> Fst {
        Fst::cross(s, "")
    }

    /// Deletion of any one member of a literal set.
    pub fn delete_one_of<'a>(words: impl IntoIterator<Item = &'a str>) -> Fst {
        Fst::union_all(words.into_iter().map(Fst::delete))
    }

    /// Acceptor for a single ASCII digit (character-class acceptance).
    /// Digit runs are built with [`closure`](Self::closure).
    pub fn digit() -> Fst {
        let mut fst = Fst::new();
        let end = fst.add_state();
        for c in '0'..='9' {
            fst.add_arc(fst.start(), Fst::label(c), Fst::label(c), 0.0, end);
        }
        fst.set_final(end, 0.0);
        fst
    }

    /// Union of two machines: accepts whatever either accepts.
    pub fn union(mut self, other: Fst) -> Fst {
        let offset = self.import(&other);
        let new_start = self.add_state();
        let old_start = self.start();
        self.add_arc(new_start, EPSILON, EPSILON, 0.0, old_start);
        self.add_arc(new_start, EPSILON, EPSILON, 0.0, other.start() + offset);
        self.set_start(new_start);
        self
    }

    /// Union of any number of machines. The empty union accepts nothing.
    pub fn union_all(fsts: impl IntoIterator<Item = Fst>) -> Fst {
        let mut iter = fsts.into_iter();
        let Some(first) = iter.next() else {
            return Fst::new();
        };
        iter.fold(first, Fst::union)
    }

    /// Concatenation: every final state of `self` continues into `other`.
    pub fn concat(mut self, other: Fst) -> Fst {
        let old_finals: Vec<(StateId, Weight)> = self.finals().collect();
        let offset = self.import(&other);
        let other_start = other.start() + offset;
        for (state, weight) in old_finals {
            self.clear_final(state);
            self.add_arc(state, EPSILON, EPSILON, weight, other_start);
        }
        self
    }

    /// Prepend a weight bias to every path through this machine.
    pub fn with_weight(mut self, weight: Weight) -> Fst {
        let new_start = self.add_state();
        let old_start = self.start();
        self.add_arc(new_start, EPSILON, EPSILON, weight, old_start);
        self.set_start(new_start);
        self
    }

    /// Zero-or-one occurrence.
    pub fn optional(self) -> Fst {
        self.union(Fst::epsilon())
    }

    /// Bounded repetition: between `min` and `max` occurrences.
    ///
    /// Realized by unrolling, so the result stays acyclic when `self` is.
    /// Misuse (`min > max`) is a programming error.
    pub fn closure(self, min: usize, max: usize) -> Fst {
        assert!(min <= max, "closure: min {min} exceeds max {max}");
        let mut result = Fst::epsilon();
        for _ in 0..min {
            result = result.concat(self.clone());
        }
        let mut tail = Fst::epsilon();
        for _ in min..max {
            tail = self.clone().concat(tail).optional();
        }
        result.concat(tail)
    }

    /// Zero-or-more occurrences (Kleene star). Introduces cycles; the
    /// traversal loop guard bounds enumeration for pathological inputs.
    pub fn star(mut self) -> Fst {
        let old_start = self.start();
        let old_finals: Vec<(StateId, Weight)> = self.finals().collect();
        for (state, weight) in old_finals {
            self.add_arc(state, EPSILON, EPSILON, weight, old_start);
        }
        let new_start = self.add_state();
        self.set_final(new_start, 0.0);
        self.add_arc(new_start, EPSILON, EPSILON, 0.0, old_start);
        self.set_start(new_start);
        self
    }

    /// Replace the output tape with a constant string: the input language
    /// is kept, everything it would emit is discarded, and `output` is
    /// emitted instead.
    pub fn cross_with(mut self, output: &str) -> Fst {
        self.map_arcs(|arc| arc.olabel = EPSILON);
        self.concat(Fst::insert(output))
    }

    /// Restrict the input tape: paths whose complete input spells one of
    /// `words` are removed, everything else is kept unchanged.
    ///
    /// This is the product of `self` with the complement of the literal
    /// set, tracked as a trie walk; once the input diverges from every
    /// word the trie coordinate collapses to a sink and the path is
    /// unconditionally kept.
    pub fn reject_inputs<'a>(&self, words: impl IntoIterator<Item = &'a str>) -> Fst {
        let trie = LiteralTrie::build(words);

        let mut result = Fst::new();
        let mut pair_map: HashMap<(StateId, Option<usize>), StateId> = HashMap::new();
        let start_pair = (self.start(), Some(0));
        pair_map.insert(start_pair, result.start());
        let mut worklist = vec![start_pair];

        while let Some(pair @ (state, node)) = worklist.pop() {
            let rs = pair_map[&pair];
            if let Some(weight) = self.final_weight(state) {
                let excluded = matches!(node, Some(n) if trie.accepting[n]);
                if !excluded {
                    result.set_final(rs, weight);
                }
            }
            for arc in self.arcs(state) {
                let next_node = if arc.ilabel == EPSILON {
                    node
                } else {
                    node.and_then(|n| trie.children[n].get(&arc.ilabel).copied())
                };
                let next_pair = (arc.target, next_node);
                let rt = match pair_map.get(&next_pair) {
                    Some(&existing) => existing,
                    None => {
                        let created = result.add_state();
                        pair_map.insert(next_pair, created);
                        worklist.push(next_pair);
                        created
                    }
                };
                result.add_arc(rs, arc.ilabel, arc.olabel, arc.weight, rt);
            }
        }
        result
    }
}

/// Weighted alternation: union of two machines where `preferred` gets a
/// fixed weight bias (negative to win ties against `other`).
pub fn weighted_union(preferred: Fst, other: Fst, bias: Weight) -> Fst {
    preferred.with_weight(bias).union(other)
}

/// Trie over literal strings, used by `reject_inputs`.
struct LiteralTrie {
    children: Vec<HashMap<Label, usize>>,
    accepting: Vec<bool>,
}

impl LiteralTrie {
    fn build<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut trie = Self {
            children: vec![HashMap::new()],
            accepting: vec![false],
        };
        for word in words {
            let mut node = 0;
            for c in word.chars() {
                let label = Fst::label(c);
                node = match trie.children[node].get(&label) {
                    Some(&child) => child,
                    None => {
                        trie.children.push(HashMap::new());
                        trie.accepting.push(false);
                        let child = trie.children.len() - 1;
                        trie.children[node].insert(label, child);
                        child
                    }
                };
            }
            trie.accepting[node] = true;
        }
        trie
    }
}
