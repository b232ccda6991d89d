//! Capture-respecting substitution over predicate and expression trees.
//!
//! Two forms are needed by the WP transformer:
//!
//! - scalar: replace free occurrences of a variable with an expression,
//! - array element: replace occurrences `a[i']` whose index is
//!   structurally identical to a given index.
//!
//! The array form is a syntactic approximation of an array store: two
//! indices that are provably but not syntactically equal are NOT
//! rewritten, which makes single-element substitution unsound in that
//! corner. The encoder's array theory is not consulted here.

use crate::ast::{Expr, Predicate};

/// Replace free occurrences of `var` in `expr` with `replacement`.
pub fn subst_var_in_expr(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Number(_) => expr.clone(),
        Expr::Variable(name) => {
            if name == var {
                replacement.clone()
            } else {
                expr.clone()
            }
        }
        Expr::Unary(op, operand) => {
            Expr::Unary(*op, Box::new(subst_var_in_expr(operand, var, replacement)))
        }
        Expr::Binary(op, left, right) => Expr::Binary(
            *op,
            Box::new(subst_var_in_expr(left, var, replacement)),
            Box::new(subst_var_in_expr(right, var, replacement)),
        ),
        Expr::FuncCall(name, args) => Expr::FuncCall(
            name.clone(),
            args.iter()
                .map(|a| subst_var_in_expr(a, var, replacement))
                .collect(),
        ),
        Expr::ArrAccess(name, index) => Expr::ArrAccess(
            name.clone(),
            Box::new(subst_var_in_expr(index, var, replacement)),
        ),
    }
}

/// Replace free occurrences of `var` in `pred` with `replacement`.
///
/// A quantifier binding the same name shadows the outer variable; its
/// body is left untouched.
pub fn subst_var_in_pred(pred: &Predicate, var: &str, replacement: &Expr) -> Predicate {
    match pred {
        Predicate::True | Predicate::False => pred.clone(),
        Predicate::Comparison(op, left, right) => Predicate::Comparison(
            *op,
            subst_var_in_expr(left, var, replacement),
            subst_var_in_expr(right, var, replacement),
        ),
        Predicate::Not(inner) => {
            Predicate::Not(Box::new(subst_var_in_pred(inner, var, replacement)))
        }
        Predicate::And(l, r) => Predicate::And(
            Box::new(subst_var_in_pred(l, var, replacement)),
            Box::new(subst_var_in_pred(r, var, replacement)),
        ),
        Predicate::Or(l, r) => Predicate::Or(
            Box::new(subst_var_in_pred(l, var, replacement)),
            Box::new(subst_var_in_pred(r, var, replacement)),
        ),
        Predicate::Implies(l, r) => Predicate::Implies(
            Box::new(subst_var_in_pred(l, var, replacement)),
            Box::new(subst_var_in_pred(r, var, replacement)),
        ),
        Predicate::Paren(inner) => {
            Predicate::Paren(Box::new(subst_var_in_pred(inner, var, replacement)))
        }
        Predicate::Quantifier(kind, param, body) => {
            if param.name == var {
                pred.clone()
            } else {
                Predicate::Quantifier(
                    *kind,
                    param.clone(),
                    Box::new(subst_var_in_pred(body, var, replacement)),
                )
            }
        }
        Predicate::FormulaRef(name, args) => Predicate::FormulaRef(
            name.clone(),
            args.iter()
                .map(|a| subst_var_in_expr(a, var, replacement))
                .collect(),
        ),
    }
}

/// Replace occurrences `arr[i']` in `expr` where `i'` is structurally
/// identical to `index`, with `value`. Non-matching indices are still
/// descended into.
pub fn subst_array_in_expr(expr: &Expr, arr: &str, index: &Expr, value: &Expr) -> Expr {
    match expr {
        Expr::ArrAccess(name, idx) if name == arr && idx.as_ref() == index => value.clone(),
        Expr::ArrAccess(name, idx) => Expr::ArrAccess(
            name.clone(),
            Box::new(subst_array_in_expr(idx, arr, index, value)),
        ),
        Expr::Number(_) | Expr::Variable(_) => expr.clone(),
        Expr::Unary(op, operand) => Expr::Unary(
            *op,
            Box::new(subst_array_in_expr(operand, arr, index, value)),
        ),
        Expr::Binary(op, left, right) => Expr::Binary(
            *op,
            Box::new(subst_array_in_expr(left, arr, index, value)),
            Box::new(subst_array_in_expr(right, arr, index, value)),
        ),
        Expr::FuncCall(name, args) => Expr::FuncCall(
            name.clone(),
            args.iter()
                .map(|a| subst_array_in_expr(a, arr, index, value))
                .collect(),
        ),
    }
}

/// Replace occurrences `arr[i']` in `pred` where `i'` is structurally
/// identical to `index`, with `value`.
pub fn subst_array_in_pred(pred: &Predicate, arr: &str, index: &Expr, value: &Expr) -> Predicate {
    match pred {
        Predicate::True | Predicate::False => pred.clone(),
        Predicate::Comparison(op, left, right) => Predicate::Comparison(
            *op,
            subst_array_in_expr(left, arr, index, value),
            subst_array_in_expr(right, arr, index, value),
        ),
        Predicate::Not(inner) => {
            Predicate::Not(Box::new(subst_array_in_pred(inner, arr, index, value)))
        }
        Predicate::And(l, r) => Predicate::And(
            Box::new(subst_array_in_pred(l, arr, index, value)),
            Box::new(subst_array_in_pred(r, arr, index, value)),
        ),
        Predicate::Or(l, r) => Predicate::Or(
            Box::new(subst_array_in_pred(l, arr, index, value)),
            Box::new(subst_array_in_pred(r, arr, index, value)),
        ),
        Predicate::Implies(l, r) => Predicate::Implies(
            Box::new(subst_array_in_pred(l, arr, index, value)),
            Box::new(subst_array_in_pred(r, arr, index, value)),
        ),
        Predicate::Paren(inner) => {
            Predicate::Paren(Box::new(subst_array_in_pred(inner, arr, index, value)))
        }
        Predicate::Quantifier(kind, param, body) => {
            if param.name == arr {
                pred.clone()
            } else {
                Predicate::Quantifier(
                    *kind,
                    param.clone(),
                    Box::new(subst_array_in_pred(body, arr, index, value)),
                )
            }
        }
        Predicate::FormulaRef(name, args) => Predicate::FormulaRef(
            name.clone(),
            args.iter()
                .map(|a| subst_array_in_expr(a, arr, index, value))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, CompareOp, Param, QuantifierKind};

    #[test]
    fn scalar_substitution_replaces_free_occurrences() {
        // x > 0  with  x -> y + 1
        let pred = Predicate::compare(CompareOp::Gt, Expr::var("x"), Expr::num(0));
        let replacement = Expr::binary(BinOp::Add, Expr::var("y"), Expr::num(1));
        let result = subst_var_in_pred(&pred, "x", &replacement);
        assert_eq!(
            result,
            Predicate::compare(CompareOp::Gt, replacement, Expr::num(0))
        );
    }

    #[test]
    fn quantifier_shadowing_stops_substitution() {
        // forall x :: x > y, substituting x must leave the body alone
        let pred = Predicate::Quantifier(
            QuantifierKind::Forall,
            Param::int("x"),
            Box::new(Predicate::compare(CompareOp::Gt, Expr::var("x"), Expr::var("y"))),
        );
        let result = subst_var_in_pred(&pred, "x", &Expr::num(7));
        assert_eq!(result, pred);
    }

    #[test]
    fn quantifier_over_other_name_substitutes_body() {
        let pred = Predicate::Quantifier(
            QuantifierKind::Exists,
            Param::int("k"),
            Box::new(Predicate::compare(CompareOp::Eq, Expr::var("k"), Expr::var("y"))),
        );
        let result = subst_var_in_pred(&pred, "y", &Expr::num(3));
        assert_eq!(
            result,
            Predicate::Quantifier(
                QuantifierKind::Exists,
                Param::int("k"),
                Box::new(Predicate::compare(CompareOp::Eq, Expr::var("k"), Expr::num(3))),
            )
        );
    }

    #[test]
    fn array_substitution_requires_identical_index() {
        // a[i] == 0  with  a[i] -> 5  matches
        let pred = Predicate::compare(
            CompareOp::Eq,
            Expr::ArrAccess("a".to_string(), Box::new(Expr::var("i"))),
            Expr::num(0),
        );
        let result = subst_array_in_pred(&pred, "a", &Expr::var("i"), &Expr::num(5));
        assert_eq!(
            result,
            Predicate::compare(CompareOp::Eq, Expr::num(5), Expr::num(0))
        );

        // a[j] is syntactically different; untouched even if i == j holds
        let other = Predicate::compare(
            CompareOp::Eq,
            Expr::ArrAccess("a".to_string(), Box::new(Expr::var("j"))),
            Expr::num(0),
        );
        let result = subst_array_in_pred(&other, "a", &Expr::var("i"), &Expr::num(5));
        assert_eq!(result, other);
    }

    #[test]
    fn array_substitution_descends_into_indices() {
        // a[a[i]]  with  a[i] -> 0  becomes  a[0]
        let expr = Expr::ArrAccess(
            "a".to_string(),
            Box::new(Expr::ArrAccess("a".to_string(), Box::new(Expr::var("i")))),
        );
        let result = subst_array_in_expr(&expr, "a", &Expr::var("i"), &Expr::num(0));
        assert_eq!(
            result,
            Expr::ArrAccess("a".to_string(), Box::new(Expr::num(0)))
        );
    }

    #[test]
    fn formula_ref_args_are_substituted() {
        let pred = Predicate::FormulaRef("positive".to_string(), vec![Expr::var("x")]);
        let result = subst_var_in_pred(&pred, "x", &Expr::num(2));
        assert_eq!(
            result,
            Predicate::FormulaRef("positive".to_string(), vec![Expr::num(2)])
        );
    }
}
