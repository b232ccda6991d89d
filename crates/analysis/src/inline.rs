//! Best-effort call inlining.
//!
//! A call `f(args)` is replaced by the defining side of `f`'s
//! postcondition when that postcondition is exactly `ret == expr` (in
//! either orientation) over a single return variable, `expr` does not
//! call `f` itself, and the inline depth bound has not been reached.
//! Everything else stays a call and is later encoded as an
//! uninterpreted function symbol.

use crate::ast::{Expr, Module, Predicate};
use crate::subst::subst_var_in_expr;

/// Maximum nesting depth before a call is left opaque.
pub const MAX_INLINE_DEPTH: usize = 3;

/// Inline eligible calls in every expression position of `pred`.
pub fn inline_calls_in_pred(pred: &Predicate, module: &Module) -> Predicate {
    match pred {
        Predicate::True | Predicate::False => pred.clone(),
        Predicate::Comparison(op, left, right) => Predicate::Comparison(
            *op,
            inline_calls_in_expr(left, module, 0),
            inline_calls_in_expr(right, module, 0),
        ),
        Predicate::Not(inner) => Predicate::Not(Box::new(inline_calls_in_pred(inner, module))),
        Predicate::And(l, r) => Predicate::And(
            Box::new(inline_calls_in_pred(l, module)),
            Box::new(inline_calls_in_pred(r, module)),
        ),
        Predicate::Or(l, r) => Predicate::Or(
            Box::new(inline_calls_in_pred(l, module)),
            Box::new(inline_calls_in_pred(r, module)),
        ),
        Predicate::Implies(l, r) => Predicate::Implies(
            Box::new(inline_calls_in_pred(l, module)),
            Box::new(inline_calls_in_pred(r, module)),
        ),
        Predicate::Paren(inner) => {
            Predicate::Paren(Box::new(inline_calls_in_pred(inner, module)))
        }
        Predicate::Quantifier(kind, param, body) => Predicate::Quantifier(
            *kind,
            param.clone(),
            Box::new(inline_calls_in_pred(body, module)),
        ),
        // Formula references are expanded at encode time, after which
        // their calls are handled by the axiom machinery.
        Predicate::FormulaRef(..) => pred.clone(),
    }
}

/// Inline eligible calls in `expr`, tracking nesting depth.
pub fn inline_calls_in_expr(expr: &Expr, module: &Module, depth: usize) -> Expr {
    match expr {
        Expr::FuncCall(name, args) => {
            if depth < MAX_INLINE_DEPTH {
                if let Some((func, definition)) = inlinable_definition(name, module) {
                    let mut inlined = definition.clone();
                    for (param, arg) in func.parameters.iter().zip(args.iter()) {
                        let arg = inline_calls_in_expr(arg, module, depth + 1);
                        inlined = subst_var_in_expr(&inlined, &param.name, &arg);
                    }
                    tracing::debug!(call = %name, depth, "inlined call from contract");
                    return inline_calls_in_expr(&inlined, module, depth + 1);
                }
            }
            Expr::FuncCall(
                name.clone(),
                args.iter()
                    .map(|a| inline_calls_in_expr(a, module, depth))
                    .collect(),
            )
        }
        Expr::Binary(op, left, right) => Expr::Binary(
            *op,
            Box::new(inline_calls_in_expr(left, module, depth)),
            Box::new(inline_calls_in_expr(right, module, depth)),
        ),
        Expr::Unary(op, operand) => {
            Expr::Unary(*op, Box::new(inline_calls_in_expr(operand, module, depth)))
        }
        // Calls under an array index stay opaque.
        Expr::Number(_) | Expr::Variable(_) | Expr::ArrAccess(..) => expr.clone(),
    }
}

/// The defining expression of `name`, if its postcondition has the
/// shape `ret == expr` or `expr == ret` over its single return variable
/// and `expr` is not self-referential.
fn inlinable_definition<'m>(
    name: &str,
    module: &'m Module,
) -> Option<(&'m crate::ast::Function, &'m Expr)> {
    let func = module.function(name)?;
    let post = func.postcondition.as_ref()?;
    if func.returns.len() != 1 {
        return None;
    }
    let ret = func.returns[0].name.as_str();

    let Predicate::Comparison(crate::ast::CompareOp::Eq, left, right) = post else {
        return None;
    };

    let definition = match (left, right) {
        (Expr::Variable(v), other) if v == ret => other,
        (other, Expr::Variable(v)) if v == ret => other,
        _ => return None,
    };

    if contains_call(definition, name) {
        return None;
    }
    Some((func, definition))
}

/// True if `expr` contains a call to `name` anywhere.
fn contains_call(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::FuncCall(n, args) => n == name || args.iter().any(|a| contains_call(a, name)),
        Expr::Binary(_, left, right) => contains_call(left, name) || contains_call(right, name),
        Expr::Unary(_, operand) => contains_call(operand, name),
        Expr::ArrAccess(_, index) => contains_call(index, name),
        Expr::Number(_) | Expr::Variable(_) => false,
    }
}
