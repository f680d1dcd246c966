// Cardinal numeral sub-grammar: spoken Spanish cardinals to digit
// strings ("setenta y cinco" -> "75"). Consumed by the class grammars as
// an opaque transducer.

use norma_core::InputCase;
use norma_fst::Fst;

use crate::GrammarError;
use crate::graph::capitalized_input_graph;
use crate::lexicon::Lexicon;

const ZERO_TSV: &str = include_str!("../data/numbers/zero.tsv");
const DIGIT_TSV: &str = include_str!("../data/numbers/digit.tsv");
const TEEN_TSV: &str = include_str!("../data/numbers/teen.tsv");
const TWENTIES_TSV: &str = include_str!("../data/numbers/twenties.tsv");
const TIES_TSV: &str = include_str!("../data/numbers/ties.tsv");

/// Cardinal numbers 0-99 as a word-to-digit-string transducer.
///
/// Covers the simple forms (digit, teen, twenties tables), round tens
/// ("sesenta" -> "60") and compound tens ("sesenta y tres" -> "63").
/// The singular determiners "un"/"una" are deliberately absent: they are
/// agreement forms, not cardinal readings, and the class grammars
/// special-case them.
pub struct CardinalGrammar {
    fst: Fst,
}

impl CardinalGrammar {
    pub fn new(input_case: InputCase) -> Result<Self, GrammarError> {
        let zero = Lexicon::from_tsv("numbers/zero.tsv", ZERO_TSV)?.fst();
        let digit = Lexicon::from_tsv("numbers/digit.tsv", DIGIT_TSV)?.fst();
        let teen = Lexicon::from_tsv("numbers/teen.tsv", TEEN_TSV)?.fst();
        let twenties = Lexicon::from_tsv("numbers/twenties.tsv", TWENTIES_TSV)?.fst();
        let ties = Lexicon::from_tsv("numbers/ties.tsv", TIES_TSV)?.fst();

        let mut graph = Fst::union_all([
            zero,
            digit.clone(),
            teen,
            twenties,
            ties.clone().concat(Fst::insert("0")),
            ties.concat(Fst::delete(" y ")).concat(digit),
        ]);
        if input_case == InputCase::Cased {
            graph = capitalized_input_graph(&graph);
        }
        Ok(Self {
            fst: graph.optimize(),
        })
    }

    /// The compiled transducer (word sequence in, digit string out).
    pub fn fst(&self) -> &Fst {
        &self.fst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(grammar: &CardinalGrammar, input: &str) -> Option<String> {
        grammar.fst().transduce(input).next().map(|p| p.output)
    }

    #[test]
    fn simple_forms() {
        let cardinal = CardinalGrammar::new(InputCase::LowerCased).unwrap();
        assert_eq!(best(&cardinal, "cero").as_deref(), Some("0"));
        assert_eq!(best(&cardinal, "cinco").as_deref(), Some("5"));
        assert_eq!(best(&cardinal, "diez").as_deref(), Some("10"));
        assert_eq!(best(&cardinal, "doce").as_deref(), Some("12"));
        assert_eq!(best(&cardinal, "veinte").as_deref(), Some("20"));
        assert_eq!(best(&cardinal, "veintitrés").as_deref(), Some("23"));
    }

    #[test]
    fn round_and_compound_tens() {
        let cardinal = CardinalGrammar::new(InputCase::LowerCased).unwrap();
        assert_eq!(best(&cardinal, "sesenta").as_deref(), Some("60"));
        assert_eq!(best(&cardinal, "sesenta y tres").as_deref(), Some("63"));
        assert_eq!(best(&cardinal, "setenta y cinco").as_deref(), Some("75"));
        assert_eq!(best(&cardinal, "noventa y nueve").as_deref(), Some("99"));
    }

    #[test]
    fn determiners_are_not_cardinals() {
        let cardinal = CardinalGrammar::new(InputCase::LowerCased).unwrap();
        assert_eq!(best(&cardinal, "un"), None);
        assert_eq!(best(&cardinal, "una"), None);
        assert_eq!(best(&cardinal, "uno").as_deref(), Some("1"));
    }

    #[test]
    fn unknown_word_has_no_reading() {
        let cardinal = CardinalGrammar::new(InputCase::LowerCased).unwrap();
        assert_eq!(best(&cardinal, "perro"), None);
        assert_eq!(best(&cardinal, "sesenta y"), None);
    }

    #[test]
    fn cased_mode_accepts_capitalized() {
        let lower = CardinalGrammar::new(InputCase::LowerCased).unwrap();
        let cased = CardinalGrammar::new(InputCase::Cased).unwrap();
        assert_eq!(best(&lower, "Doce"), None);
        assert_eq!(best(&cased, "Doce").as_deref(), Some("12"));
        assert_eq!(best(&cased, "Sesenta y tres").as_deref(), Some("63"));
        assert_eq!(best(&cased, "doce").as_deref(), Some("12"));
    }
}
