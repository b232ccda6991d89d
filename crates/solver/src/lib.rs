//! # imp-fv-solver
//!
//! SMT solver oracle for the imp-fv verifier.
//!
//! Spawns a solver binary (Z3 by default, CVC5 and Yices selectable) as a
//! subprocess and communicates via SMT-LIB2 text. The [`SolverBackend`]
//! trait is the seam the driver programs against, so tests can substitute
//! a scripted double for the real process.
//!
//! ```no_run
//! use imp_fv_solver::{CliSolver, SolverResult};
//!
//! let solver = CliSolver::with_default_config().unwrap();
//! let result = solver.check_sat_raw("
//!     (declare-const x Int)
//!     (assert (> x 0))
//!     (check-sat)
//!     (get-model)
//! ").unwrap();
//!
//! match result {
//!     SolverResult::Sat(model) => println!("sat: {model:?}"),
//!     SolverResult::Unsat => println!("unsat (proved)"),
//!     SolverResult::Unknown(reason) => println!("unknown: {reason}"),
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
mod parser;
pub mod result;
pub mod solver;

pub use backend::SolverBackend;
pub use config::{SolverConfig, SolverKind};
pub use error::SolverError;
pub use model::Model;
pub use result::SolverResult;
pub use solver::CliSolver;
