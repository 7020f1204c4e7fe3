//! # dtdcheck
//!
//! DTD parsing and content-model validation for document trees.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. [`scanner`] tokenizes DTD text, expanding parameter entities through
//!    nested input streams.
//! 2. [`parser`] builds the DTD model by recursive descent: elements with
//!    content models and attribute lists, entities, notations.
//! 3. [`compiler`] turns each content model into a regex over a flat encoding
//!    of child sequences, and persists the compiled table as a cache file.
//! 4. [`validator`] walks a document tree and reports every place where a
//!    node's children do not match its element's compiled pattern.
//!
//! Documents come in through the [`validator::DocumentNode`] trait; the crate
//! never parses XML itself.

pub mod compiler;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod testing;
pub mod validator;

pub use compiler::GrammarTable;
pub use error::DtdError;
pub use parser::{Dtd, DtdParser};
pub use scanner::Scanner;
pub use validator::{ContentValidator, DocumentNode, ValidationReport};
