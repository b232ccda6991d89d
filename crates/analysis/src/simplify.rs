//! One-pass algebraic simplification of predicates.
//!
//! A single bottom-up traversal, no fixpoint: children are simplified
//! first, then constant identities are applied at the parent. `Paren`
//! nodes are flattened away. Comparisons, quantified bodies and formula
//! references pass through untouched; the encoder handles them.

use crate::ast::Predicate;

/// Simplify `pred` bottom-up. Preserves logical equivalence.
pub fn simplify(pred: &Predicate) -> Predicate {
    match pred {
        Predicate::And(l, r) => {
            let left = simplify(l);
            let right = simplify(r);
            match (&left, &right) {
                (Predicate::True, _) => right,
                (_, Predicate::True) => left,
                (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
                _ => Predicate::And(Box::new(left), Box::new(right)),
            }
        }
        Predicate::Or(l, r) => {
            let left = simplify(l);
            let right = simplify(r);
            match (&left, &right) {
                (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
                (Predicate::False, _) => right,
                (_, Predicate::False) => left,
                _ => Predicate::Or(Box::new(left), Box::new(right)),
            }
        }
        Predicate::Not(inner) => match simplify(inner) {
            Predicate::Not(p) => *p,
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            other => Predicate::Not(Box::new(other)),
        },
        Predicate::Implies(l, r) => {
            let left = simplify(l);
            let right = simplify(r);
            match (&left, &right) {
                (Predicate::False, _) => Predicate::True,
                (_, Predicate::True) => Predicate::True,
                (Predicate::True, _) => right,
                _ => Predicate::Implies(Box::new(left), Box::new(right)),
            }
        }
        Predicate::Paren(inner) => simplify(inner),
        Predicate::True
        | Predicate::False
        | Predicate::Comparison(..)
        | Predicate::Quantifier(..)
        | Predicate::FormulaRef(..) => pred.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompareOp, Expr};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn cmp() -> Predicate {
        Predicate::compare(CompareOp::Gt, Expr::var("x"), Expr::num(0))
    }

    #[test]
    fn conjunction_identities() {
        let p = cmp();
        assert_eq!(simplify(&Predicate::and(Predicate::True, p.clone())), p);
        assert_eq!(simplify(&Predicate::and(p.clone(), Predicate::True)), p);
        assert_eq!(
            simplify(&Predicate::and(Predicate::False, p.clone())),
            Predicate::False
        );
        assert_eq!(
            simplify(&Predicate::and(p, Predicate::False)),
            Predicate::False
        );
    }

    #[test]
    fn disjunction_identities() {
        let p = cmp();
        assert_eq!(
            simplify(&Predicate::or(Predicate::True, p.clone())),
            Predicate::True
        );
        assert_eq!(simplify(&Predicate::or(Predicate::False, p.clone())), p);
        assert_eq!(simplify(&Predicate::or(p.clone(), Predicate::False)), p);
    }

    #[test]
    fn negation_identities() {
        let p = cmp();
        assert_eq!(simplify(&Predicate::not(Predicate::not(p.clone()))), p);
        assert_eq!(simplify(&Predicate::not(Predicate::True)), Predicate::False);
        assert_eq!(simplify(&Predicate::not(Predicate::False)), Predicate::True);
    }

    #[test]
    fn implication_identities() {
        let p = cmp();
        assert_eq!(
            simplify(&Predicate::implies(Predicate::False, p.clone())),
            Predicate::True
        );
        assert_eq!(
            simplify(&Predicate::implies(p.clone(), Predicate::True)),
            Predicate::True
        );
        assert_eq!(simplify(&Predicate::implies(Predicate::True, p.clone())), p);
    }

    #[test]
    fn parens_flatten_through_nesting() {
        let p = cmp();
        let wrapped = Predicate::Paren(Box::new(Predicate::Paren(Box::new(p.clone()))));
        assert_eq!(simplify(&wrapped), p);
    }

    #[test]
    fn single_pass_does_not_iterate_to_fixpoint() {
        // not (not (p and true)) simplifies fully in one pass because
        // children are simplified before the parent rule fires
        let p = cmp();
        let pred = Predicate::not(Predicate::not(Predicate::and(
            p.clone(),
            Predicate::True,
        )));
        assert_eq!(simplify(&pred), p);
    }

    /// Truth-table evaluator over a closed fragment: comparisons of
    /// variables and literals in a fixed environment, no division.
    fn eval_expr(expr: &Expr, env: &HashMap<&str, i64>) -> i64 {
        use crate::ast::{BinOp, UnaryOp};
        match expr {
            Expr::Number(n) => *n,
            Expr::Variable(name) => env[name.as_str()],
            Expr::Unary(UnaryOp::Neg, operand) => -eval_expr(operand, env),
            Expr::Binary(op, l, r) => {
                let (l, r) = (eval_expr(l, env), eval_expr(r, env));
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => unreachable!("generator never produces division"),
                }
            }
            Expr::FuncCall(..) | Expr::ArrAccess(..) => {
                unreachable!("generator never produces calls or arrays")
            }
        }
    }

    fn eval_pred(pred: &Predicate, env: &HashMap<&str, i64>) -> bool {
        match pred {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Comparison(op, l, r) => {
                let (l, r) = (eval_expr(l, env), eval_expr(r, env));
                match op {
                    CompareOp::Eq => l == r,
                    CompareOp::Ne => l != r,
                    CompareOp::Lt => l < r,
                    CompareOp::Le => l <= r,
                    CompareOp::Gt => l > r,
                    CompareOp::Ge => l >= r,
                }
            }
            Predicate::Not(p) => !eval_pred(p, env),
            Predicate::And(l, r) => eval_pred(l, env) && eval_pred(r, env),
            Predicate::Or(l, r) => eval_pred(l, env) || eval_pred(r, env),
            Predicate::Implies(l, r) => !eval_pred(l, env) || eval_pred(r, env),
            Predicate::Paren(p) => eval_pred(p, env),
            Predicate::Quantifier(..) | Predicate::FormulaRef(..) => {
                unreachable!("generator never produces quantifiers or formula refs")
            }
        }
    }

    fn arb_expr() -> impl Strategy<Value = Expr> {
        use crate::ast::BinOp;
        let leaf = prop_oneof![
            (-20i64..20).prop_map(Expr::num),
            prop_oneof![Just("x"), Just("y")].prop_map(Expr::var),
        ];
        leaf.prop_recursive(3, 16, 2, |inner| {
            (
                prop_oneof![Just(BinOp::Add), Just(BinOp::Sub), Just(BinOp::Mul)],
                inner.clone(),
                inner,
            )
                .prop_map(|(op, l, r)| Expr::binary(op, l, r))
        })
    }

    fn arb_pred() -> impl Strategy<Value = Predicate> {
        let leaf = prop_oneof![
            Just(Predicate::True),
            Just(Predicate::False),
            (
                prop_oneof![
                    Just(CompareOp::Eq),
                    Just(CompareOp::Ne),
                    Just(CompareOp::Lt),
                    Just(CompareOp::Le),
                    Just(CompareOp::Gt),
                    Just(CompareOp::Ge),
                ],
                arb_expr(),
                arb_expr(),
            )
                .prop_map(|(op, l, r)| Predicate::compare(op, l, r)),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Predicate::not),
                inner
                    .clone()
                    .prop_map(|p| Predicate::Paren(Box::new(p))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Predicate::and(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Predicate::or(l, r)),
                (inner.clone(), inner).prop_map(|(l, r)| Predicate::implies(l, r)),
            ]
        })
    }

    proptest! {
        #[test]
        fn simplification_preserves_truth_value(
            pred in arb_pred(),
            x in -10i64..10,
            y in -10i64..10,
        ) {
            let env = HashMap::from([("x", x), ("y", y)]);
            prop_assert_eq!(eval_pred(&simplify(&pred), &env), eval_pred(&pred, &env));
        }

        #[test]
        fn simplified_form_has_no_parens(pred in arb_pred()) {
            fn has_paren(p: &Predicate) -> bool {
                match p {
                    Predicate::Paren(_) => true,
                    Predicate::Not(i) => has_paren(i),
                    Predicate::And(l, r)
                    | Predicate::Or(l, r)
                    | Predicate::Implies(l, r) => has_paren(l) || has_paren(r),
                    _ => false,
                }
            }
            prop_assert!(!has_paren(&simplify(&pred)));
        }
    }
}
