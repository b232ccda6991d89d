//! Parsing of solver stdout into [`SolverResult`].
//!
//! The first meaningful line is `sat`, `unsat` or `unknown`; a `sat`
//! answer may be followed by a `(get-model)` block whose nullary
//! `define-fun` entries become [`Model`] assignments.

use crate::error::SolverError;
use crate::model::Model;
use crate::result::SolverResult;

pub fn parse_solver_output(stdout: &str, stderr: &str) -> Result<SolverResult, SolverError> {
    let stdout = stdout.trim();

    if stdout.is_empty() {
        if stderr.contains("timeout") {
            return Ok(SolverResult::Unknown("timeout".to_string()));
        }
        return Err(SolverError::ParseError(format!(
            "Empty solver output. stderr: {stderr}"
        )));
    }

    let first_line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    match first_line {
        "unsat" => Ok(SolverResult::Unsat),
        "sat" => Ok(SolverResult::Sat(parse_model(stdout))),
        "unknown" => Ok(SolverResult::Unknown(unknown_reason(stdout, stderr))),
        "timeout" => Ok(SolverResult::Unknown("timeout".to_string())),
        other => Err(SolverError::ParseError(format!(
            "Unexpected solver output: {other}"
        ))),
    }
}

/// Extract the reason string printed after an `unknown` answer.
fn unknown_reason(stdout: &str, stderr: &str) -> String {
    let after_unknown = stdout
        .lines()
        .skip_while(|line| line.trim() != "unknown")
        .skip(1)
        .map(str::trim)
        .find(|line| !line.is_empty());

    if let Some(reason) = after_unknown {
        reason
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string()
    } else if !stderr.is_empty() {
        stderr.trim().to_string()
    } else {
        "unknown".to_string()
    }
}

/// Parse the model block that follows a `sat` answer.
///
/// Handles both model layouts Z3 has printed over time:
///
/// ```text
/// (model                         (
///   (define-fun x () Int 5)        (define-fun x () Int
/// )                                  5)
///                                )
/// ```
///
/// Only nullary `define-fun` entries (constants) are collected.
fn parse_model(output: &str) -> Option<Model> {
    if !output.contains("(define-fun ") {
        return None;
    }

    let mut assignments = Vec::new();
    let mut pos = 0;

    while let Some(offset) = output[pos..].find("(define-fun ") {
        let start = pos + offset;
        match sexp_end(output, start) {
            Some(end) => {
                // strip `(define-fun ` and the closing `)`
                let body = &output[start + "(define-fun ".len()..end - 1];
                if let Some(entry) = parse_define_fun(body) {
                    assignments.push(entry);
                }
                pos = end;
            }
            None => break,
        }
    }

    if assignments.is_empty() {
        None
    } else {
        Some(Model::with_assignments(assignments))
    }
}

/// Parse the body of one `define-fun`: `name () Sort value`.
/// Returns `None` for non-nullary functions.
fn parse_define_fun(body: &str) -> Option<(String, String)> {
    let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let rest = normalized.trim();

    let name_end = rest.find(' ')?;
    let name = rest[..name_end].to_string();
    let rest = rest[name_end..].trim_start();

    // Nullary constants only: expect an empty parameter list
    let rest = rest.strip_prefix("()")?.trim_start();

    // Skip the sort (atom or compound like `(Array Int Int)`)
    let sort_end = skip_sexp(rest, 0)?;
    let value = rest[sort_end..].trim();
    if value.is_empty() {
        return None;
    }
    Some((name, value.to_string()))
}

/// Index just past the S-expression starting at `start` (which must be `(`).
fn sexp_end(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if start >= bytes.len() || bytes[start] != b'(' {
        return None;
    }
    let mut depth = 1;
    let mut i = start + 1;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    if depth == 0 { Some(i) } else { None }
}

/// Skip one S-expression (atom or parenthesized) starting at `pos`.
fn skip_sexp(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() {
        return None;
    }
    if bytes[pos] == b'(' {
        sexp_end(input, pos)
    } else {
        let mut i = pos;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'('
            && bytes[i] != b')'
        {
            i += 1;
        }
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_answers() {
        assert_eq!(parse_solver_output("unsat\n", "").unwrap(), SolverResult::Unsat);
        assert_eq!(parse_solver_output("sat\n", "").unwrap(), SolverResult::Sat(None));
        assert!(parse_solver_output("unknown\n", "").unwrap().is_unknown());
    }

    #[test]
    fn parse_unknown_with_reason() {
        let result = parse_solver_output("unknown\n(incomplete quantifiers)\n", "").unwrap();
        assert_eq!(
            result,
            SolverResult::Unknown("incomplete quantifiers".to_string())
        );
    }

    #[test]
    fn parse_empty_output_is_error() {
        assert!(parse_solver_output("", "").is_err());
    }

    #[test]
    fn parse_garbage_is_error() {
        assert!(parse_solver_output("segfault\n", "").is_err());
    }

    #[test]
    fn parse_model_old_format() {
        let output = "\
sat
(model
  (define-fun x () Int 5)
  (define-fun b () Bool true)
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.get("x"), Some("5"));
        assert_eq!(model.get("b"), Some("true"));
    }

    #[test]
    fn parse_model_new_format_multiline() {
        let output = "\
sat
(
  (define-fun x () Int
    (- 42))
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.get("x"), Some("(- 42)"));
        assert_eq!(model.get_int("x"), Some(-42));
    }

    #[test]
    fn parse_model_skips_non_nullary_entries() {
        let output = "\
sat
(
  (define-fun fn_double ((n!0 Int)) Int (* n!0 2))
  (define-fun x () Int 7)
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.assignments.len(), 1);
        assert_eq!(model.get("x"), Some("7"));
    }

    #[test]
    fn parse_model_with_array_sort() {
        let output = "\
sat
(
  (define-fun a () (Array Int Int)
    ((as const (Array Int Int)) 0))
)";
        let result = parse_solver_output(output, "").unwrap();
        let model = result.model().unwrap();
        assert_eq!(model.get("a"), Some("((as const (Array Int Int)) 0)"));
    }

    #[test]
    fn timeout_detected_in_stderr() {
        let result = parse_solver_output("", "timeout\n").unwrap();
        assert_eq!(result, SolverResult::Unknown("timeout".to_string()));
    }
}
