// Relation composition: feed the output tape of one machine into the
// input tape of another.
//
// The construction is the pair-state product, built lazily from the start
// pair so only reachable pairs are materialized. Epsilon moves on either
// side are taken independently, which can produce several interleavings of
// the same underlying path; path enumeration collapses such duplicates, so
// the accepted relation is unaffected.

use hashbrown::HashMap;

use crate::fst::{EPSILON, Fst, StateId};

impl Fst {
    /// Compose `self` with `other`: the result maps `x` to `z` with weight
    /// `w1 + w2` whenever `self` maps `x` to some `y` with weight `w1` and
    /// `other` maps `y` to `z` with weight `w2`.
    pub fn compose(&self, other: &Fst) -> Fst {
        let mut result = Fst::new();
        let mut pair_map: HashMap<(StateId, StateId), StateId> = HashMap::new();
        let start_pair = (self.start(), other.start());
        pair_map.insert(start_pair, result.start());
        let mut worklist = vec![start_pair];

        while let Some(pair @ (sa, sb)) = worklist.pop() {
            let rs = pair_map[&pair];

            if let (Some(wa), Some(wb)) = (self.final_weight(sa), other.final_weight(sb)) {
                result.set_final(rs, wa + wb);
            }

            for a in self.arcs(sa) {
                if a.olabel == EPSILON {
                    // The left side emits nothing; the right side stays put.
                    let rt = pair_state(&mut result, &mut pair_map, &mut worklist, (a.target, sb));
                    result.add_arc(rs, a.ilabel, EPSILON, a.weight, rt);
                } else {
                    for b in other.arcs(sb) {
                        if b.ilabel == a.olabel {
                            let rt = pair_state(
                                &mut result,
                                &mut pair_map,
                                &mut worklist,
                                (a.target, b.target),
                            );
                            result.add_arc(rs, a.ilabel, b.olabel, a.weight + b.weight, rt);
                        }
                    }
                }
            }

            // The right side consumes nothing; the left side stays put.
            for b in other.arcs(sb) {
                if b.ilabel == EPSILON {
                    let rt = pair_state(&mut result, &mut pair_map, &mut worklist, (sa, b.target));
                    result.add_arc(rs, EPSILON, b.olabel, b.weight, rt);
                }
            }
        }

        result
    }
}

fn pair_state(
    result: &mut Fst,
    pair_map: &mut HashMap<(StateId, StateId), StateId>,
    worklist: &mut Vec<(StateId, StateId)>,
    pair: (StateId, StateId),
) -> StateId {
    match pair_map.get(&pair) {
        Some(&existing) => existing,
        None => {
            let created = result.add_state();
            pair_map.insert(pair, created);
            worklist.push(pair);
            created
        }
    }
}
