// Best-first enumeration of accepting paths for a given input.
//
// Traversal is a pure function of (machine, input): it allocates its own
// search state, so any number of threads may query the same machine
// concurrently. An input accepted by no path yields an empty iterator --
// the normal no-match outcome, never an error.

use hashbrown::{HashMap, HashSet};

use crate::fst::{EPSILON, Fst, Label, StateId, Weight};

/// Safety limit on the number of traversal steps, bounding enumeration on
/// pathological machines (e.g. dense unbounded closures).
pub const MAX_STEPS: u32 = 1_000_000;

/// One accepting path: the emitted output string and its total weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub output: String,
    pub weight: Weight,
}

/// Finite best-first sequence of accepting paths.
///
/// Paths are ordered by ascending weight (ties broken by output string for
/// determinism). Re-running the same query yields the same sequence.
pub struct Paths {
    inner: std::vec::IntoIter<Path>,
}

impl Iterator for Paths {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Paths {}

impl Fst {
    /// Enumerate all accepting paths for `input`, best-first.
    ///
    /// Paths producing the same output keep only their cheapest weight;
    /// distinct outputs are all reported, so callers can consume
    /// alternative readings beyond the first.
    pub fn transduce(&self, input: &str) -> Paths {
        let labels: Vec<Label> = input.chars().map(Fst::label).collect();
        let mut search = Search {
            fst: self,
            input: &labels,
            steps: 0,
            results: HashMap::new(),
            on_path: HashSet::new(),
        };
        let mut output = String::new();
        search.run(self.start(), 0, &mut output, 0.0);

        let mut paths: Vec<Path> = search
            .results
            .into_iter()
            .map(|(output, weight)| Path { output, weight })
            .collect();
        paths.sort_by(|a, b| {
            a.weight
                .total_cmp(&b.weight)
                .then_with(|| a.output.cmp(&b.output))
        });
        Paths {
            inner: paths.into_iter(),
        }
    }
}

struct Search<'a> {
    fst: &'a Fst,
    input: &'a [Label],
    steps: u32,
    /// Best weight seen per distinct output.
    results: HashMap<String, Weight>,
    /// (state, input position) pairs on the current path; revisiting one
    /// means a loop that consumes no input, which is cut off.
    on_path: HashSet<(StateId, usize)>,
}

impl Search<'_> {
    fn run(&mut self, state: StateId, pos: usize, output: &mut String, weight: Weight) {
        if self.steps >= MAX_STEPS {
            return;
        }
        self.steps += 1;

        if pos == self.input.len() {
            if let Some(final_weight) = self.fst.final_weight(state) {
                let total = weight + final_weight;
                self.results
                    .entry(output.clone())
                    .and_modify(|best| {
                        if total < *best {
                            *best = total;
                        }
                    })
                    .or_insert(total);
            }
        }

        if !self.on_path.insert((state, pos)) {
            return;
        }
        for arc in self.fst.arcs(state) {
            let next_pos = if arc.ilabel == EPSILON {
                pos
            } else if pos < self.input.len() && self.input[pos] == arc.ilabel {
                pos + 1
            } else {
                continue;
            };
            let emitted = arc.olabel != EPSILON;
            if emitted {
                output.push(char::from_u32(arc.olabel).unwrap_or('\u{FFFD}'));
            }
            self.run(arc.target, next_pos, output, weight + arc.weight);
            if emitted {
                output.pop();
            }
        }
        self.on_path.remove(&(state, pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_is_empty_sequence() {
        let fst = Fst::cross("doce", "12");
        let mut paths = fst.transduce("trece");
        assert!(paths.next().is_none());
    }

    #[test]
    fn best_first_with_negative_bias() {
        let fst = Fst::cross("a", "good")
            .with_weight(-0.7)
            .union(Fst::cross("a", "bad"));
        let paths: Vec<_> = fst.transduce("a").collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].output, "good");
        assert_eq!(paths[1].output, "bad");
        assert!(paths[0].weight < paths[1].weight);
    }

    #[test]
    fn equal_weight_ties_break_on_output() {
        let fst = Fst::cross("a", "zz").union(Fst::cross("a", "aa"));
        let outputs: Vec<_> = fst.transduce("a").map(|p| p.output).collect();
        assert_eq!(outputs, vec!["aa", "zz"]);
    }

    #[test]
    fn duplicate_paths_collapse_to_cheapest() {
        // Same output via two routes with different weights.
        let fst = Fst::cross("a", "x").union(Fst::cross("a", "x").with_weight(1.0));
        let paths: Vec<_> = fst.transduce("a").collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].output, "x");
        assert_eq!(paths[0].weight, 0.0);
    }

    #[test]
    fn restartable_and_deterministic() {
        let fst = Fst::cross("a", "x").union(Fst::cross("a", "y"));
        let first: Vec<_> = fst.transduce("a").collect();
        let second: Vec<_> = fst.transduce("a").collect();
        assert_eq!(first, second);
    }

    #[test]
    fn epsilon_cycles_terminate() {
        // An insertion loop could emit unboundedly; the on-path guard cuts
        // it to a single iteration per visit.
        let fst = Fst::insert("x").star().concat(Fst::accept("a"));
        let paths: Vec<_> = fst.transduce("a").collect();
        assert!(!paths.is_empty());
    }

    #[test]
    fn exact_size_iterator() {
        let fst = Fst::cross("a", "x").union(Fst::cross("a", "y"));
        let paths = fst.transduce("a");
        assert_eq!(paths.len(), 2);
    }
}
