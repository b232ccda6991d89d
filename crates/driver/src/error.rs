use std::fmt;

use imp_fv_analysis::EncodeError;
use imp_fv_solver::error::SolverError;
use imp_fv_solver::model::Model;

/// Verification failure for a function.
///
/// `Falsified` and `Inconclusive` are solver verdicts promoted to
/// errors by the fail-fast module driver; the remaining variants are
/// pipeline faults.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyError {
    /// The negated condition is satisfiable: the contract does not hold.
    Falsified {
        function: String,
        model: Option<Model>,
    },
    /// The solver could not decide the condition.
    Inconclusive { function: String, reason: String },
    /// A structural precheck rejected the function body.
    Structural { function: String, message: String },
    /// The condition could not be encoded.
    Encode {
        function: String,
        source: EncodeError,
    },
    /// The solver process failed.
    Solver {
        function: String,
        source: SolverError,
    },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Falsified { function, model } => {
                write!(f, "verification failed for function `{function}`")?;
                if let Some(model) = model {
                    if !model.is_empty() {
                        write!(f, "; counterexample: {}", model.render())?;
                    }
                }
                Ok(())
            }
            VerifyError::Inconclusive { function, reason } => {
                write!(
                    f,
                    "verification inconclusive for function `{function}`: {reason}"
                )
            }
            VerifyError::Structural { function, message } => {
                write!(f, "structural check failed for function `{function}`: {message}")
            }
            VerifyError::Encode { function, source } => {
                write!(f, "could not encode function `{function}`: {source}")
            }
            VerifyError::Solver { function, source } => {
                write!(f, "solver error while checking `{function}`: {source}")
            }
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Encode { source, .. } => Some(source),
            VerifyError::Solver { source, .. } => Some(source),
            _ => None,
        }
    }
}
