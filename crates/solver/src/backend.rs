//! Abstraction over SMT solver backends.
//!
//! The driver programs against [`SolverBackend`] rather than a concrete
//! solver, so subprocess solvers are interchangeable and tests can
//! substitute a scripted double.

use imp_fv_smtlib::script::Script;

use crate::config::SolverKind;
use crate::error::SolverError;
use crate::result::SolverResult;
use crate::solver::CliSolver;

/// Trait abstracting over SMT solver backends.
pub trait SolverBackend {
    /// Check satisfiability of the given SMT script.
    ///
    /// Returns:
    /// - `Ok(SolverResult::Sat(model))` if satisfiable (counterexample found)
    /// - `Ok(SolverResult::Unsat)` if unsatisfiable (property proved)
    /// - `Ok(SolverResult::Unknown(reason))` if the solver couldn't determine
    /// - `Err(SolverError)` if the solver invocation itself failed
    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError>;
}

impl SolverBackend for CliSolver {
    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        CliSolver::check_sat(self, script)
    }
}

/// Create a backend for the specified solver kind.
pub fn create_backend(kind: SolverKind) -> Result<Box<dyn SolverBackend>, SolverError> {
    tracing::debug!("Using {kind} subprocess backend");
    let solver = CliSolver::with_default_config_for(kind)?;
    Ok(Box::new(solver))
}

/// Create the default solver backend (Z3).
pub fn create_default_backend() -> Result<Box<dyn SolverBackend>, SolverError> {
    create_backend(SolverKind::Z3)
}
