//! Weighted finite-state transducer (WFST) composition engine.
//!
//! This crate provides the transducer value type and the declarative graph
//! operators used to build classification and verbalization grammars:
//! literal insertion and deletion, concatenation, union, weighted
//! alternation, bounded closure, relation composition, input restriction
//! and inversion, plus an optimizer and best-first path enumeration.
//!
//! All operators are total and side-effect-free: they take transducer
//! values and return new transducer values, so grammars stay inspectable
//! and testable as data. Weights are tropical -- the weight of a path is
//! the sum of its arc weights plus the final weight, and a lower total is
//! preferred.
//!
//! # Architecture
//!
//! - [`fst`] -- the transducer value type (states, arcs, final weights)
//! - [`ops`] -- primitive builders and structural combinators
//! - [`compose`] -- relation composition
//! - [`optimize`] -- epsilon removal, trimming, equivalent-state merging
//! - [`paths`] -- best-first enumeration of accepting paths

pub mod compose;
pub mod fst;
pub mod ops;
pub mod optimize;
pub mod paths;

pub use fst::{Arc, EPSILON, Fst, Label, StateId, Weight};
pub use ops::weighted_union;
pub use paths::{MAX_STEPS, Path, Paths};
