//! Colored terminal output and machine-readable JSON reports.
//!
//! Per-function result lines with color-coded status:
//!   [OK]      function_name (green)
//!   [FAIL]    function_name - detail (red)
//!   [UNKNOWN] function_name - reason (yellow)
//!   [SKIP]    function_name (cyan)
//!
//! Human-readable lines go to stderr; JSON reports go to stdout only.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::verify::{FunctionOutcome, ModuleOutcome, Verdict};

/// Print per-function result lines followed by a summary line.
pub fn print_outcomes(outcomes: &[FunctionOutcome]) {
    if outcomes.is_empty() {
        eprintln!("{}", "No annotated functions found.".dimmed());
        return;
    }

    eprintln!();
    for outcome in outcomes {
        match &outcome.verdict {
            Verdict::Verified => {
                eprintln!("  {}  {}", "[OK]".green().bold(), outcome.function);
            }
            Verdict::Skipped => {
                eprintln!(
                    "  {}  {} (no postcondition)",
                    "[SKIP]".cyan().bold(),
                    outcome.function
                );
            }
            Verdict::Falsified { model } => {
                let detail = match model {
                    Some(model) if !model.is_empty() => model.render(),
                    _ => "contract violated".to_string(),
                };
                eprintln!(
                    "  {}  {} ({})",
                    "[FAIL]".red().bold(),
                    outcome.function,
                    detail
                );
            }
            Verdict::Inconclusive { reason } => {
                eprintln!(
                    "  {}  {} ({})",
                    "[UNKNOWN]".yellow().bold(),
                    outcome.function,
                    reason
                );
            }
        }
    }

    let ok = count(outcomes, |v| matches!(v, Verdict::Verified));
    let skip = count(outcomes, |v| matches!(v, Verdict::Skipped));
    let fail = count(outcomes, |v| matches!(v, Verdict::Falsified { .. }));
    let unknown = count(outcomes, |v| matches!(v, Verdict::Inconclusive { .. }));

    let mut parts = Vec::new();
    if ok > 0 {
        parts.push(format!("{} {}", ok, "OK".green()));
    }
    if skip > 0 {
        parts.push(format!("{} {}", skip, "SKIP".cyan()));
    }
    if fail > 0 {
        parts.push(format!("{} {}", fail, "FAIL".red()));
    }
    if unknown > 0 {
        parts.push(format!("{} {}", unknown, "UNKNOWN".yellow()));
    }

    eprintln!();
    eprintln!("Summary: {}", parts.join(", "));
    eprintln!();
}

fn count(outcomes: &[FunctionOutcome], pred: impl Fn(&Verdict) -> bool) -> usize {
    outcomes.iter().filter(|o| pred(&o.verdict)).count()
}

/// Print the error that aborted a fail-fast module run.
pub fn print_abort(error: &VerifyError) {
    eprintln!("  {}  {}", "[FAIL]".red().bold(), error);
}

/// Complete verification report in JSON format.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub functions: Vec<JsonFunctionResult>,
    pub summary: JsonSummary,
}

/// Per-function result in JSON format.
#[derive(Serialize, Deserialize)]
pub struct JsonFunctionResult {
    pub name: String,
    /// "verified", "falsified", "inconclusive", "skipped"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<Vec<JsonAssignment>>,
}

/// Variable assignment in a counterexample.
#[derive(Serialize, Deserialize)]
pub struct JsonAssignment {
    pub variable: String,
    pub value: String,
}

/// Summary counts over all functions.
#[derive(Serialize, Deserialize)]
pub struct JsonSummary {
    pub total: usize,
    pub verified: usize,
    pub falsified: usize,
    pub inconclusive: usize,
    pub skipped: usize,
}

impl JsonReport {
    /// Build a report from a completed run.
    pub fn from_outcome(outcome: &ModuleOutcome) -> Self {
        Self::from_outcomes(&outcome.outcomes)
    }

    /// Build a report from individual outcomes, including failures.
    pub fn from_outcomes(outcomes: &[FunctionOutcome]) -> Self {
        let functions: Vec<JsonFunctionResult> =
            outcomes.iter().map(json_function_result).collect();
        let count = |status: &str| functions.iter().filter(|f| f.status == status).count();
        let summary = JsonSummary {
            total: functions.len(),
            verified: count("verified"),
            falsified: count("falsified"),
            inconclusive: count("inconclusive"),
            skipped: count("skipped"),
        };
        Self { functions, summary }
    }
}

fn json_function_result(outcome: &FunctionOutcome) -> JsonFunctionResult {
    let (status, detail, counterexample) = match &outcome.verdict {
        Verdict::Verified => ("verified", None, None),
        Verdict::Skipped => ("skipped", Some("no postcondition".to_string()), None),
        Verdict::Inconclusive { reason } => ("inconclusive", Some(reason.clone()), None),
        Verdict::Falsified { model } => {
            let assignments = model.as_ref().map(|m| {
                m.assignments
                    .iter()
                    .map(|(variable, value)| JsonAssignment {
                        variable: variable.clone(),
                        value: value.clone(),
                    })
                    .collect()
            });
            ("falsified", None, assignments)
        }
    };
    JsonFunctionResult {
        name: outcome.function.clone(),
        status: status.to_string(),
        detail,
        counterexample,
    }
}

/// Print a JSON report to stdout.
pub fn print_json_report(report: &JsonReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error serializing JSON report: {e}");
        }
    }
}
