// Money class grammar.
//
// Classifies spoken money expressions into tagged annotations:
//
//   doce dólares y cinco céntimos
//     -> money { integer_part: "12" currency: "$"
//                morphosyntactic_features: "," fractional_part: "05" }
//
// The grammar composes the cardinal and decimal sub-grammars with the
// four currency lexicons (major/minor, singular/plural). Singular
// agreement ("un"/"una" + singular unit) is handled apart from the
// general plural reading, cents appear either standalone ("cinco
// céntimos"), as a suffix after the integer amount ("dólares con sesenta
// y tres"), or alone with a synthesized zero integer part.

use norma_core::InputCase;
use norma_fst::{Fst, Weight, weighted_union};

use crate::GrammarError;
use crate::cardinal::CardinalGrammar;
use crate::decimal::DecimalGrammar;
use crate::grammar::{Grammar, GrammarKind};
use crate::graph::{
    add_leading_zero_to_double_digit, delete_extra_space, delete_space, insert_space,
};
use crate::lexicon::Lexicon;

const MAJOR_SINGULAR_TSV: &str = include_str!("../data/money/currency_major_singular.tsv");
const MAJOR_PLURAL_TSV: &str = include_str!("../data/money/currency_major_plural.tsv");
const MINOR_SINGULAR_TSV: &str = include_str!("../data/money/currency_minor_singular.tsv");
const MINOR_PLURAL_TSV: &str = include_str!("../data/money/currency_minor_plural.tsv");

/// Longest digit run accepted when splitting a decimal reading.
const MAX_AMOUNT_DIGITS: usize = 6;

/// Bias preferring spoken-numeral readings over coincidental
/// digit-literal paths when grammars are unioned in the registry. A
/// tuning value, not a correctness requirement; override it through
/// [`MoneyGrammar::with_bias`].
pub const SPOKEN_NUMERAL_BIAS: Weight = -0.7;

/// The compiled money classification grammar.
pub struct MoneyGrammar {
    grammar: Grammar,
}

impl MoneyGrammar {
    pub fn new(
        cardinal: &CardinalGrammar,
        decimal: &DecimalGrammar,
        input_case: InputCase,
    ) -> Result<Self, GrammarError> {
        Self::with_bias(cardinal, decimal, input_case, SPOKEN_NUMERAL_BIAS)
    }

    pub fn with_bias(
        cardinal: &CardinalGrammar,
        decimal: &DecimalGrammar,
        input_case: InputCase,
        bias: Weight,
    ) -> Result<Self, GrammarError> {
        let cardinal_graph = cardinal.fst();
        let cased = input_case == InputCase::Cased;

        // Currency tables map symbol -> word; classification needs the
        // inverted direction, word -> symbol.
        let unit_singular = unit_graph(MAJOR_SINGULAR_TSV, "money/currency_major_singular.tsv", cased)?;
        let unit_plural = unit_graph(MAJOR_PLURAL_TSV, "money/currency_major_plural.tsv", cased)?;
        let unit_minor_singular =
            unit_graph(MINOR_SINGULAR_TSV, "money/currency_minor_singular.tsv", cased)?;
        let unit_minor_plural =
            unit_graph(MINOR_PLURAL_TSV, "money/currency_minor_plural.tsv", cased)?;

        let graph_unit_singular = currency_field(unit_singular);
        let graph_unit_plural = currency_field(unit_plural.clone());
        let graph_unit_minor_singular = currency_field(unit_minor_singular.clone());
        let graph_unit_minor_plural = currency_field(unit_minor_plural.clone());

        let add_leading_zero = add_leading_zero_to_double_digit();

        let mut one_words = vec!["un", "una"];
        if cased {
            one_words.extend(["Un", "Una"]);
        }
        let one_graph = Fst::union_all(one_words.iter().map(|w| Fst::accept(w)));

        // Quantity != 1 spoken number, padded to two digits for cents.
        let cents_number = weighted_union(
            cardinal_graph
                .reject_inputs(one_words.iter().copied())
                .compose(&add_leading_zero),
            // "un céntimo" has irregular singular agreement; route it
            // straight to the padded literal instead of through the
            // general cardinal reading.
            one_graph.clone().cross_with("01"),
            bias,
        );

        // cinco céntimos -> fractional_part "05", always comma-marked.
        let cents_standalone = Fst::insert("morphosyntactic_features: \",\"")
            .concat(insert_space())
            .concat(Fst::insert("fractional_part: \""))
            .concat(cents_number)
            .concat(Fst::insert("\""));

        let mut and_words = vec!["con", "y"];
        if cased {
            and_words.extend(["Con", "Y"]);
        }

        let minor_unit_delete = unit_minor_singular.union(unit_minor_plural).cross_with("");
        let optional_cents_standalone = delete_space()
            .concat(
                Fst::delete_one_of(and_words.iter().copied())
                    .concat(delete_space())
                    .closure(0, 1),
            )
            .concat(insert_space())
            .concat(cents_standalone.clone())
            .concat(delete_space())
            .concat(minor_unit_delete)
            .closure(0, 1);

        // doce dólares (con) sesenta y tres -- no minor unit word follows;
        // distinguished from the standalone clause structurally, not by
        // weight.
        let mut con_words = vec!["con"];
        if cased {
            con_words.push("Con");
        }
        let optional_cents_suffix = delete_extra_space()
            .concat(Fst::insert("morphosyntactic_features: \",\""))
            .concat(insert_space())
            .concat(Fst::insert("fractional_part: \""))
            .concat(
                Fst::delete_one_of(con_words.iter().copied())
                    .concat(delete_space())
                    .closure(0, 1),
            )
            .concat(cardinal_graph.compose(&add_leading_zero).with_weight(bias))
            .concat(Fst::insert("\""))
            .closure(0, 1);

        let cents_clause = optional_cents_standalone.union(optional_cents_suffix);

        // Integer amounts: plural agreement for quantity != 1, the
        // singular determiners for quantity 1.
        let graph_integer = Fst::insert("integer_part: \"")
            .concat(cardinal_graph.reject_inputs(one_words.iter().copied()))
            .concat(Fst::insert("\""))
            .concat(delete_extra_space())
            .concat(graph_unit_plural.clone())
            .concat(cents_clause.clone())
            .union(
                Fst::insert("integer_part: \"")
                    .concat(one_graph.cross_with("1"))
                    .concat(Fst::insert("\""))
                    .concat(delete_extra_space())
                    .concat(graph_unit_singular)
                    .concat(cents_clause),
            );

        // Decimal amounts: the sub-grammar emits a bare "I,F" digit
        // string; split it into tagged fields.
        let digit_run = Fst::digit().closure(1, MAX_AMOUNT_DIGITS);
        let decimal_splitter = Fst::insert("integer_part: \"")
            .concat(digit_run.clone())
            .concat(Fst::cross(
                ",",
                "\" morphosyntactic_features: \",\" fractional_part: \"",
            ))
            .concat(digit_run)
            .concat(Fst::insert("\""));
        let graph_decimal_tagged = decimal.fst().compose(&decimal_splitter);

        // Cents with no integer amount: synthesize integer_part "0" and
        // take the currency from the minor unit.
        let cents_only = Fst::insert("integer_part: \"0\" ")
            .concat(cents_standalone)
            .concat(delete_extra_space())
            .concat(graph_unit_minor_singular.union(graph_unit_minor_plural));

        let graph_decimal = graph_decimal_tagged
            .clone()
            .concat(delete_extra_space())
            .concat(graph_unit_plural.clone())
            .union(cents_only)
            .union(
                // "... coma cinco de dólares"
                graph_decimal_tagged
                    .concat(Fst::delete(" de"))
                    .concat(delete_extra_space())
                    .concat(graph_unit_plural),
            );

        let final_graph = graph_integer.union(graph_decimal);
        Ok(Self {
            grammar: Grammar::build("money", GrammarKind::Classify, final_graph),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn into_grammar(self) -> Grammar {
        self.grammar
    }
}

/// Load a currency table, invert it to word -> symbol, render it as a
/// transducer, and union in the capitalized entry set in cased mode.
fn unit_graph(data: &str, origin: &str, cased: bool) -> Result<Fst, GrammarError> {
    let table = Lexicon::from_tsv(origin, data)?.invert();
    let mut graph = table.fst();
    if cased {
        graph = graph.union(table.capitalized().fst());
    }
    Ok(graph)
}

/// Wrap a unit transducer in the currency field delimiters.
fn currency_field(unit: Fst) -> Fst {
    Fst::insert("currency: \"")
        .concat(unit)
        .concat(Fst::insert("\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use norma_core::Annotation;

    fn money(input_case: InputCase) -> MoneyGrammar {
        let cardinal = CardinalGrammar::new(input_case).unwrap();
        let decimal = DecimalGrammar::new(&cardinal, input_case).unwrap();
        MoneyGrammar::new(&cardinal, &decimal, input_case).unwrap()
    }

    fn classify(grammar: &MoneyGrammar, input: &str) -> Option<Annotation> {
        grammar
            .grammar()
            .fst()
            .transduce(input)
            .next()
            .map(|p| Annotation::parse(&p.output).expect("grammar emitted malformed annotation"))
    }

    #[test]
    fn plural_integer_amount() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "doce dólares").unwrap();
        assert_eq!(a.class(), "money");
        assert_eq!(a.get("integer_part"), Some("12"));
        assert_eq!(a.get("currency"), Some("$"));
        assert_eq!(a.get("fractional_part"), None);
    }

    #[test]
    fn singular_determiner() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "un dólar").unwrap();
        assert_eq!(a.get("integer_part"), Some("1"));
        assert_eq!(a.get("currency"), Some("$"));

        let a = classify(&grammar, "una libra").unwrap();
        assert_eq!(a.get("integer_part"), Some("1"));
        assert_eq!(a.get("currency"), Some("£"));
    }

    #[test]
    fn singular_determiner_needs_singular_unit() {
        let grammar = money(InputCase::LowerCased);
        assert!(classify(&grammar, "un dólares").is_none());
    }

    #[test]
    fn standalone_cents_after_integer() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "doce dólares y cinco céntimos").unwrap();
        assert_eq!(a.get("integer_part"), Some("12"));
        assert_eq!(a.get("currency"), Some("$"));
        assert_eq!(a.get("fractional_part"), Some("05"));
        assert_eq!(a.get("morphosyntactic_features"), Some(","));
    }

    #[test]
    fn suffix_cents() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "setenta y cinco dólares con sesenta y tres").unwrap();
        assert_eq!(a.get("integer_part"), Some("75"));
        assert_eq!(a.get("currency"), Some("$"));
        assert_eq!(a.get("fractional_part"), Some("63"));
        assert_eq!(a.count("morphosyntactic_features"), 1);
    }

    #[test]
    fn cents_only_pads_to_two_digits() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "cinco céntimos").unwrap();
        assert_eq!(a.get("integer_part"), Some("0"));
        assert_eq!(a.get("fractional_part"), Some("05"));
        assert_eq!(a.get("currency"), Some("¢"));
    }

    #[test]
    fn cents_only_double_digit_passes() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "diez céntimos").unwrap();
        assert_eq!(a.get("integer_part"), Some("0"));
        assert_eq!(a.get("fractional_part"), Some("10"));
        assert_eq!(a.get("currency"), Some("¢"));
    }

    #[test]
    fn one_cent_is_irregular() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "un céntimo").unwrap();
        assert_eq!(a.get("integer_part"), Some("0"));
        assert_eq!(a.get("fractional_part"), Some("01"));
    }

    #[test]
    fn decimal_amount() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "uno coma cinco euros").unwrap();
        assert_eq!(a.get("integer_part"), Some("1"));
        assert_eq!(a.get("fractional_part"), Some("5"));
        assert_eq!(a.get("currency"), Some("€"));
    }

    #[test]
    fn decimal_amount_with_de() {
        let grammar = money(InputCase::LowerCased);
        let a = classify(&grammar, "uno coma cinco de euros").unwrap();
        assert_eq!(a.get("integer_part"), Some("1"));
        assert_eq!(a.get("currency"), Some("€"));
    }

    #[test]
    fn no_match_without_unit() {
        let grammar = money(InputCase::LowerCased);
        assert!(classify(&grammar, "doce").is_none());
        assert!(classify(&grammar, "hola mundo").is_none());
        assert!(classify(&grammar, "").is_none());
    }

    #[test]
    fn cased_mode_accepts_capitalized_words() {
        let grammar = money(InputCase::Cased);
        let lower = classify(&grammar, "doce dólares").unwrap();
        let capitalized = classify(&grammar, "Doce Dólares").unwrap();
        assert_eq!(lower, capitalized);

        let a = classify(&grammar, "Un Dólar").unwrap();
        assert_eq!(a.get("integer_part"), Some("1"));
    }

    #[test]
    fn lowercased_mode_rejects_capitalized_words() {
        let grammar = money(InputCase::LowerCased);
        assert!(classify(&grammar, "Doce Dólares").is_none());
    }

    #[test]
    fn spoken_numeral_bias_is_applied() {
        let grammar = money(InputCase::LowerCased);
        let best = grammar
            .grammar()
            .fst()
            .transduce("cinco céntimos")
            .next()
            .unwrap();
        assert!(best.weight < 0.0);
    }
}
