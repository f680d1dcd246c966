// Grammar registry: the single entry point callers normalize through.
//
// All registered class grammars are unioned into one classification
// machine and one verbalization machine (the inverted grammars), so a
// single traversal ranks candidates across classes by weight.

use norma_core::{Annotation, InputCase};
use norma_fst::{Fst, Paths, Weight};

use crate::GrammarError;
use crate::cardinal::CardinalGrammar;
use crate::decimal::DecimalGrammar;
use crate::grammar::Grammar;
use crate::money::MoneyGrammar;

/// One classification reading: a parsed annotation and the weight of the
/// path that produced it. Lower weight ranks first.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub annotation: Annotation,
    pub weight: Weight,
}

/// Ranked classification candidates, cheapest first.
pub struct Candidates {
    paths: Paths,
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for path in &mut self.paths {
            if let Ok(annotation) = Annotation::parse(&path.output) {
                return Some(Candidate {
                    annotation,
                    weight: path.weight,
                });
            }
        }
        None
    }
}

/// The compiled grammar set for one language, in one casing mode.
///
/// Construction is the expensive step; classification and verbalization
/// are traversals over the two prebuilt machines and take `&self`.
pub struct Registry {
    input_case: InputCase,
    grammars: Vec<Grammar>,
    classify_fst: Fst,
    verbalize_fst: Fst,
}

impl Registry {
    /// Build the full Spanish grammar set.
    pub fn new(input_case: InputCase) -> Result<Self, GrammarError> {
        let cardinal = CardinalGrammar::new(input_case)?;
        let decimal = DecimalGrammar::new(&cardinal, input_case)?;
        let money = MoneyGrammar::new(&cardinal, &decimal, input_case)?;
        Ok(Self::from_grammars(input_case, vec![money.into_grammar()]))
    }

    /// Assemble a registry from already-built classification grammars.
    /// Per-grammar weights survive the union, so biases tuned on one
    /// class keep ranking candidates against the other classes.
    pub fn from_grammars(input_case: InputCase, grammars: Vec<Grammar>) -> Self {
        let classify_fst =
            Fst::union_all(grammars.iter().map(|g| g.fst().clone())).optimize();
        let verbalize_fst =
            Fst::union_all(grammars.iter().map(|g| g.inverted().fst().clone())).optimize();
        Self {
            input_case,
            grammars,
            classify_fst,
            verbalize_fst,
        }
    }

    /// Classify surface text into ranked annotations. Text no grammar
    /// accepts yields an empty sequence, never an error.
    pub fn classify(&self, text: &str) -> Candidates {
        Candidates {
            paths: self.classify_fst.transduce(text),
        }
    }

    /// Verbalize an annotation back into ranked surface texts.
    ///
    /// The annotation's fields must appear in the order the classifying
    /// grammar emitted them; a reordered annotation has no reading.
    pub fn verbalize(&self, annotation: &Annotation) -> Paths {
        self.verbalize_fst.transduce(&annotation.format())
    }

    pub fn input_case(&self) -> InputCase {
        self.input_case
    }

    /// The registered class grammars, in registration order.
    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }
}
