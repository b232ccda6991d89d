/// A model (counterexample) from the solver.
///
/// Contains the variable assignments extracted from `(get-model)` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Variable assignments: `(name, value_string)` pairs.
    pub assignments: Vec<(String, String)>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<(String, String)>) -> Self {
        Self { assignments }
    }

    /// Look up a variable's value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Interpret a value string as an integer, handling the SMT-LIB
    /// negative form `(- 3)`.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        let value = self.get(name)?;
        let trimmed = value.trim();
        if let Some(inner) = trimmed.strip_prefix("(-") {
            let digits = inner.trim_end_matches(')').trim();
            digits.parse::<i64>().ok().map(|n| -n)
        } else {
            trimmed.parse().ok()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Render as a single `x = 1, y = (- 2)` line for diagnostics.
    pub fn render(&self) -> String {
        self.assignments
            .iter()
            .map(|(n, v)| format!("{n} = {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
