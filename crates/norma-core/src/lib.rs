//! Shared types for the norma text normalization system.
//!
//! This crate holds the pieces that both the FST engine and the language
//! modules need to agree on:
//!
//! - [`annotation`] -- the tagged-annotation wire format exchanged between
//!   the classification and verbalization stages
//! - [`case`] -- input-case mode and first-character case helpers

pub mod annotation;
pub mod case;

pub use annotation::{Annotation, AnnotationError};
pub use case::InputCase;
