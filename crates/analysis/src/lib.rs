//! # imp-fv-analysis
//!
//! The verification core: turns an annotated function body plus a
//! postcondition into an SMT script whose negation is checked by the
//! solver oracle.
//!
//! Pipeline (each stage a module, data flowing one way):
//!
//! ```text
//! ast  ->  wp  ->  inline  ->  simplify  ->  encode  ->  Script
//! ```
//!
//! - [`ast`]: immutable expression / predicate / statement trees produced
//!   by the upstream parser, consumed read-only here.
//! - [`wp`]: backward weakest-precondition transformer.
//! - [`inline`]: best-effort elimination of calls whose spec is a simple
//!   equality, to keep VCs quantifier- and call-free where possible.
//! - [`simplify`]: one-pass algebraic normalization of boolean structure.
//! - [`encode`]: translation into the SMT-LIB term algebra, including
//!   uninterpreted function symbols and contract-derived axioms.
//! - [`subst`]: capture-respecting substitution shared by the stages.

pub mod ast;
pub mod encode;
pub mod inline;
pub mod simplify;
pub mod subst;
pub mod wp;

pub use encode::{EncodeError, EncodedVc, SessionState, encode_vc};
