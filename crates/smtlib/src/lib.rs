//! # imp-fv-smtlib
//!
//! SMT-LIB2 representation for the imp-fv verifier.
//!
//! Verification conditions are built as [`term::Term`] trees, wrapped in
//! [`command::Command`]s and collected into a [`script::Script`], which
//! formats to SMT-LIB2 text via `Display` (see [`formatter`]).
//!
//! The term algebra covers exactly the theories the verifier emits:
//! booleans, unbounded integers, integer-indexed integer arrays,
//! first-order quantifiers, and uninterpreted functions.

pub mod command;
pub mod formatter;
pub mod script;
pub mod sort;
pub mod term;

pub use command::Command;
pub use script::Script;
pub use sort::Sort;
pub use term::Term;
