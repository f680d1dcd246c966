// Decimal numeral sub-grammar: spoken decimals to signless digit strings
// ("uno coma cinco" -> "1,5"). The fraction is read digit by digit, as it
// is spoken.

use norma_core::InputCase;
use norma_fst::Fst;

use crate::GrammarError;
use crate::cardinal::CardinalGrammar;
use crate::graph::capitalized_input_graph;
use crate::lexicon::Lexicon;

const ZERO_TSV: &str = include_str!("../data/numbers/zero.tsv");
const DIGIT_TSV: &str = include_str!("../data/numbers/digit.tsv");

/// Longest spoken fraction handled, in digits.
const MAX_FRACTION_DIGITS: usize = 4;

/// Decimal numbers as a word-to-digit-string transducer, decimal marker
/// rendered as a comma.
pub struct DecimalGrammar {
    fst: Fst,
}

impl DecimalGrammar {
    pub fn new(cardinal: &CardinalGrammar, input_case: InputCase) -> Result<Self, GrammarError> {
        let zero = Lexicon::from_tsv("numbers/zero.tsv", ZERO_TSV)?.fst();
        let digit = Lexicon::from_tsv("numbers/digit.tsv", DIGIT_TSV)?.fst();
        let mut fraction_digit = zero.union(digit);
        if input_case == InputCase::Cased {
            fraction_digit = capitalized_input_graph(&fraction_digit);
        }

        let graph = cardinal
            .fst()
            .clone()
            .concat(Fst::cross(" coma ", ","))
            .concat(fraction_digit.clone())
            .concat(
                Fst::delete(" ")
                    .concat(fraction_digit)
                    .closure(0, MAX_FRACTION_DIGITS - 1),
            );
        Ok(Self {
            fst: graph.optimize(),
        })
    }

    /// The compiled transducer (word sequence in, `I,F` digit string out).
    pub fn fst(&self) -> &Fst {
        &self.fst
    }
}
