//! # imp-fv-driver
//!
//! Verification driver: runs the WP / inline / simplify / encode
//! pipeline per function, asks the solver oracle whether the negated
//! condition is satisfiable, and reports verdicts.
//!
//! ```no_run
//! use imp_fv_analysis::ast::Module;
//! use imp_fv_driver::{output, Verifier};
//!
//! let module = Module::default();
//! let mut verifier = Verifier::with_default_backend().unwrap();
//! match verifier.verify_module(&module) {
//!     Ok(outcome) => output::print_outcomes(&outcome.outcomes),
//!     Err(error) => output::print_abort(&error),
//! }
//! ```

pub mod error;
pub mod output;
pub mod verify;

pub use error::VerifyError;
pub use verify::{FunctionOutcome, ModuleOutcome, Verdict, Verifier};
