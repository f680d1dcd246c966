// Shared graph helpers used across class grammars: whitespace handling,
// digit padding, capitalized-input variants.

use hashbrown::HashMap;
use norma_core::case::simple_upper;
use norma_fst::{EPSILON, Fst, StateId, Weight};

/// Cost of each whitespace character beyond the canonical single space.
/// Keeps sloppy input acceptable while ranking the tight reading first,
/// and -- since grammars are inverted for verbalization -- makes the
/// canonically spaced rendering the cheapest output as well.
pub const EXTRA_WHITESPACE_COST: Weight = 0.1;

/// Emit a single space (no input consumed).
pub fn insert_space() -> Fst {
    Fst::insert(" ")
}

/// Consume one or more spaces, emitting nothing. The first space is
/// free, every further one costs [`EXTRA_WHITESPACE_COST`].
pub fn delete_space() -> Fst {
    Fst::delete(" ").concat(extra_spaces())
}

/// Consume one or more spaces and emit exactly one.
pub fn delete_extra_space() -> Fst {
    Fst::cross(" ", " ").concat(extra_spaces())
}

fn extra_spaces() -> Fst {
    Fst::delete(" ").with_weight(EXTRA_WHITESPACE_COST).star()
}

/// Pad a digit string to two digits: a double digit passes through, a
/// single digit gains a leading zero.
pub fn add_leading_zero_to_double_digit() -> Fst {
    Fst::digit()
        .concat(Fst::digit())
        .union(Fst::insert("0").concat(Fst::digit()))
}

/// Accept the graph's input with its first consumed character optionally
/// uppercased, emitting the same normalized output.
///
/// The variant duplicates only the epsilon-reachable prefix of the graph:
/// each pre-consumption state gets a shadow whose consuming arcs carry the
/// uppercased label and rejoin the original machine.
pub fn capitalized_input_graph(fst: &Fst) -> Fst {
    let mut result = fst.clone();
    let mut shadow: HashMap<StateId, StateId> = HashMap::new();
    let start_shadow = result.add_state();
    shadow.insert(fst.start(), start_shadow);
    let mut worklist = vec![fst.start()];

    while let Some(state) = worklist.pop() {
        let from = shadow[&state];
        if let Some(weight) = fst.final_weight(state) {
            // Empty-input paths stay accepting from the shadow prefix.
            result.set_final(from, weight);
        }
        for arc in fst.arcs(state) {
            if arc.ilabel == EPSILON {
                let target_shadow = match shadow.get(&arc.target) {
                    Some(&existing) => existing,
                    None => {
                        let created = result.add_state();
                        shadow.insert(arc.target, created);
                        worklist.push(arc.target);
                        created
                    }
                };
                result.add_arc(from, EPSILON, arc.olabel, arc.weight, target_shadow);
            } else if let Some(c) = char::from_u32(arc.ilabel) {
                let upper = simple_upper(c);
                if upper != c {
                    result.add_arc(from, Fst::label(upper), arc.olabel, arc.weight, arc.target);
                }
            }
        }
    }

    result.set_start(start_shadow);
    fst.clone().union(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs(fst: &Fst, input: &str) -> Vec<String> {
        fst.transduce(input).map(|p| p.output).collect()
    }

    #[test]
    fn delete_space_needs_at_least_one() {
        let fst = delete_space().concat(Fst::accept("a"));
        assert_eq!(outputs(&fst, " a"), vec!["a"]);
        assert_eq!(outputs(&fst, "   a"), vec!["a"]);
        assert!(outputs(&fst, "a").is_empty());
    }

    #[test]
    fn delete_extra_space_collapses() {
        let fst = Fst::accept("a")
            .concat(delete_extra_space())
            .concat(Fst::accept("b"));
        assert_eq!(outputs(&fst, "a b"), vec!["a b"]);
        assert_eq!(outputs(&fst, "a   b"), vec!["a b"]);
        assert!(outputs(&fst, "ab").is_empty());
    }

    #[test]
    fn extra_whitespace_costs_more() {
        let fst = delete_space().concat(Fst::accept("a"));
        let tight = fst.transduce("a").next().map(|p| p.weight);
        let sloppy = fst.transduce("  a").next().map(|p| p.weight);
        assert!(tight < sloppy);
    }

    #[test]
    fn leading_zero_padding() {
        let pad = add_leading_zero_to_double_digit();
        assert_eq!(outputs(&pad, "5"), vec!["05"]);
        assert_eq!(outputs(&pad, "63"), vec!["63"]);
        assert!(outputs(&pad, "125").is_empty());
    }

    #[test]
    fn capitalized_variant_accepts_both() {
        let fst = capitalized_input_graph(&Fst::cross("doce", "12"));
        assert_eq!(outputs(&fst, "doce"), vec!["12"]);
        assert_eq!(outputs(&fst, "Doce"), vec!["12"]);
        assert!(outputs(&fst, "DOce").is_empty());
    }

    #[test]
    fn capitalized_variant_skips_leading_insertions() {
        // The first *consumed* character is the one that gets uppercased.
        let fst = capitalized_input_graph(&Fst::insert("x: ").concat(Fst::cross("dos", "2")));
        assert_eq!(outputs(&fst, "Dos"), vec!["x: 2"]);
    }

    #[test]
    fn capitalized_variant_on_accented_initial() {
        let fst = capitalized_input_graph(&Fst::cross("éxito", "e"));
        assert_eq!(outputs(&fst, "Éxito"), vec!["e"]);
    }
}
