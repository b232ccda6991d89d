use std::io::Write;
use std::process::{Command, Stdio};

use imp_fv_smtlib::command::Command as SmtCmd;
use imp_fv_smtlib::script::Script;

use crate::config::{SolverConfig, SolverKind};
use crate::error::SolverError;
use crate::parser::parse_solver_output;
use crate::result::SolverResult;

/// Subprocess-based SMT solver interface.
///
/// Spawns the configured solver binary once per check and pipes the
/// formatted script through stdin. Every check runs in a fresh solver
/// instance, so each script must carry all of its declarations and
/// axioms.
#[derive(Debug)]
pub struct CliSolver {
    config: SolverConfig,
}

impl CliSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Auto-detect Z3 and use default settings.
    pub fn with_default_config() -> Result<Self, SolverError> {
        Ok(Self::new(SolverConfig::auto_detect()?))
    }

    /// Auto-detect the given solver kind and use default settings.
    pub fn with_default_config_for(kind: SolverKind) -> Result<Self, SolverError> {
        Ok(Self::new(SolverConfig::auto_detect_for(kind)?))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Check satisfiability of a script.
    ///
    /// Formats to SMT-LIB2 text, appends `(check-sat)` and `(get-model)`
    /// if the script does not already end with them, and runs the solver.
    pub fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        let mut smtlib = script.to_string();

        let has_check_sat = script
            .commands()
            .iter()
            .any(|c| matches!(c, SmtCmd::CheckSat));
        if !has_check_sat {
            smtlib.push_str("(check-sat)\n");
        }
        let has_get_model = script
            .commands()
            .iter()
            .any(|c| matches!(c, SmtCmd::GetModel));
        if !has_get_model {
            smtlib.push_str("(get-model)\n");
        }

        self.check_sat_raw(&smtlib)
    }

    /// Check satisfiability from a raw SMT-LIB2 string.
    pub fn check_sat_raw(&self, smtlib: &str) -> Result<SolverResult, SolverError> {
        self.config.validate()?;

        tracing::debug!(
            solver = %self.config.kind,
            bytes = smtlib.len(),
            "invoking solver"
        );

        let mut child = Command::new(&self.config.solver_path)
            .args(self.config.build_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SolverError::ProcessError(format!("Failed to start {}: {e}", self.config.kind))
            })?;

        {
            let stdin = child.stdin.as_mut().ok_or_else(|| {
                SolverError::ProcessError("Failed to open solver stdin".to_string())
            })?;
            stdin.write_all(smtlib.as_bytes()).map_err(|e| {
                SolverError::ProcessError(format!("Failed to write to solver stdin: {e}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::ProcessError(format!("Failed to wait for solver: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stderr.contains("timeout") || stdout.trim() == "timeout" {
            return Ok(SolverResult::Unknown("timeout".to_string()));
        }

        parse_solver_output(&stdout, &stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imp_fv_smtlib::sort::Sort;
    use imp_fv_smtlib::term::Term;

    // Integration tests below run only when a Z3 binary is installed;
    // otherwise they exit early rather than fail.
    fn z3() -> Option<CliSolver> {
        CliSolver::with_default_config().ok()
    }

    #[test]
    fn check_sat_appends_check_commands() {
        let Some(solver) = z3() else {
            eprintln!("z3 not found; skipping");
            return;
        };

        let mut script = Script::new();
        script.push(SmtCmd::SetLogic("ALL".to_string()));
        script.push(SmtCmd::DeclareConst("x".to_string(), Sort::Int));
        script.push(SmtCmd::Assert(Term::IntGt(
            Box::new(Term::Const("x".to_string())),
            Box::new(Term::IntLit(0)),
        )));

        let result = solver.check_sat(&script).expect("check_sat failed");
        assert!(result.is_sat());
    }

    #[test]
    fn unsat_script() {
        let Some(solver) = z3() else {
            eprintln!("z3 not found; skipping");
            return;
        };

        let result = solver
            .check_sat_raw(
                "(declare-const x Int)\n(assert (and (> x 0) (< x 0)))\n(check-sat)\n",
            )
            .expect("check_sat_raw failed");
        assert!(result.is_unsat());
    }
}
