//! Spanish grammar module for inverse text normalization.
//!
//! Builds the per-class classification grammars (money, with the cardinal
//! and decimal sub-grammars they consume) from static lexicon tables and
//! the `norma-fst` composition operators, and exposes them through a
//! registry that classifies surface text into tagged annotations and
//! verbalizes annotations back into surface text.
//!
//! # Architecture
//!
//! - [`lexicon`] -- delimited surface/normalized tables
//! - [`graph`] -- shared graph helpers (spacing, capitalization, padding)
//! - [`cardinal`] -- cardinal numeral sub-grammar (words to digit strings)
//! - [`decimal`] -- decimal numeral sub-grammar
//! - [`money`] -- the money class grammar
//! - [`grammar`] -- named grammar wrapper with annotation framing
//! - [`registry`] -- classification/verbalization entry points

pub mod cardinal;
pub mod decimal;
pub mod grammar;
pub mod graph;
pub mod lexicon;
pub mod money;
pub mod registry;

pub use cardinal::CardinalGrammar;
pub use decimal::DecimalGrammar;
pub use grammar::{Grammar, GrammarKind};
pub use lexicon::Lexicon;
pub use money::MoneyGrammar;
pub use registry::{Candidate, Registry};

/// Error type for grammar construction.
///
/// All variants are configuration errors: they surface before any
/// traversal occurs, and no partially-built grammar is exposed. An input
/// that no path accepts is not an error -- it is an empty result sequence.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}:{line}: expected two tab-separated columns")]
    MalformedLine { origin: String, line: usize },
    #[error("{origin}:{line}: duplicate surface form {surface:?}")]
    DuplicateSurface {
        origin: String,
        line: usize,
        surface: String,
    },
    #[error("lexicon {origin} has no entries")]
    EmptyLexicon { origin: String },
}
