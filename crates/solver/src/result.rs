use crate::model::Model;

/// Result from the SMT solver.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// Formula is satisfiable. For a negated VC this means the condition
    /// FAILED and the model is a counterexample.
    Sat(Option<Model>),
    /// Formula is unsatisfiable. For a negated VC this means PROVED.
    Unsat,
    /// Solver couldn't determine (timeout, quantifier instantiation, ...).
    Unknown(String),
}

impl SolverResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolverResult::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolverResult::Unsat)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SolverResult::Unknown(_))
    }

    /// The model, if the result is `Sat` with one.
    pub fn model(&self) -> Option<&Model> {
        match self {
            SolverResult::Sat(Some(model)) => Some(model),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(SolverResult::Sat(None).is_sat());
        assert!(SolverResult::Unsat.is_unsat());
        assert!(SolverResult::Unknown("timeout".to_string()).is_unknown());
        assert!(!SolverResult::Unsat.is_sat());
    }

    #[test]
    fn model_accessor() {
        let model = Model::with_assignments(vec![("x".to_string(), "5".to_string())]);
        assert_eq!(SolverResult::Sat(Some(model.clone())).model(), Some(&model));
        assert_eq!(SolverResult::Sat(None).model(), None);
        assert_eq!(SolverResult::Unsat.model(), None);
    }
}
