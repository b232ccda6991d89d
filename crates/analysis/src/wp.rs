//! Backward weakest-precondition transformer.
//!
//! `wp(stmt, post)` is the weakest predicate that, holding before
//! `stmt`, guarantees `post` holds after it under partial correctness.
//! No termination obligation is generated anywhere.

use crate::ast::{LValue, Predicate, Statement};
use crate::subst::{subst_array_in_pred, subst_var_in_pred};

/// Compute the weakest precondition of `stmt` with respect to `post`.
pub fn wp(stmt: &Statement, post: &Predicate) -> Predicate {
    match stmt {
        Statement::Assign { targets, exprs } => wp_assign(targets, exprs, post),
        Statement::Block(stmts) => {
            // Right-to-left fold: the postcondition of statement i is the
            // WP of statement i+1 against the running postcondition.
            stmts
                .iter()
                .rev()
                .fold(post.clone(), |current, s| wp(s, &current))
        }
        Statement::If { cond, then, els } => {
            let wp_then = wp(then, post);
            match els {
                Some(els) => Predicate::and(
                    Predicate::implies(cond.clone(), wp_then),
                    Predicate::implies(Predicate::not(cond.clone()), wp(els, post)),
                ),
                None => Predicate::implies(cond.clone(), wp_then),
            }
        }
        Statement::While {
            cond,
            invariant,
            body,
        } => {
            let inv = invariant.clone().unwrap_or(Predicate::True);
            let preservation = Predicate::implies(
                Predicate::and(inv.clone(), cond.clone()),
                wp(body, &inv),
            );
            let exit = Predicate::implies(
                Predicate::and(inv.clone(), Predicate::not(cond.clone())),
                post.clone(),
            );
            // Establishment, preservation and exit folded into one
            // conjunction; the caller combines it with the precondition.
            Predicate::and(inv, Predicate::and(preservation, exit))
        }
    }
}

fn wp_assign(targets: &[LValue], exprs: &[crate::ast::Expr], post: &Predicate) -> Predicate {
    // Tuple assignment from a multi-return call: WP is not computed
    // precisely; the postcondition passes through unchanged.
    if targets.len() != 1 || exprs.len() != 1 {
        tracing::warn!(
            targets = targets.len(),
            "tuple assignment: weakest precondition left as postcondition"
        );
        return post.clone();
    }

    match &targets[0] {
        LValue::Var(name) => subst_var_in_pred(post, name, &exprs[0]),
        LValue::Arr(name, index) => subst_array_in_pred(post, name, index, &exprs[0]),
    }
}
