//! Translation of predicates into SMT-LIB scripts.
//!
//! The encoder produces a prelude (sort declarations for the function's
//! variables, uninterpreted symbols for opaque calls, contract-derived
//! axioms) and the VC itself as a term. The caller decides what to
//! assert; the verification driver asserts the negation.
//!
//! Bound variables are renamed to fresh names of the form `name!N`
//! before encoding, so a quantifier binding a name that shadows a
//! declared variable cannot capture it.

use std::collections::HashMap;
use std::fmt;

use imp_fv_smtlib::command::Command;
use imp_fv_smtlib::script::Script;
use imp_fv_smtlib::sort::Sort;
use imp_fv_smtlib::term::Term;

use crate::ast::{
    BinOp, CompareOp, Expr, Formula, Function, Module, Predicate, QuantifierKind, UnaryOp,
    VarType,
};
use crate::subst::subst_var_in_pred;

/// Encoding failure. All variants are hard errors for the current
/// verification condition; axiom derivation failures are not (they
/// degrade to warnings upstream of this type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A scalar variable is referenced but not declared in the function.
    UnknownVariable(String),
    /// An array is indexed but not declared in the function.
    UnknownArray(String),
    /// A formula reference names no formula in the module.
    UnresolvedFormula(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnknownVariable(name) => {
                write!(f, "variable `{name}` is not declared")
            }
            EncodeError::UnknownArray(name) => write!(f, "array `{name}` is not declared"),
            EncodeError::UnresolvedFormula(name) => {
                write!(f, "formula `{name}` is not defined in the module")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Per-session caches for uninterpreted symbols and contract axioms.
///
/// Owned by the verification driver and shared across the functions of
/// one module run. [`SessionState::reset`] clears both caches so that
/// independent runs cannot observe each other's symbols or axioms.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Called function name to uninterpreted symbol arity.
    symbols: HashMap<String, usize>,
    /// Called function name to derived axiom terms. An entry with an
    /// empty vector records a failed derivation attempt so it is not
    /// retried (or re-warned) within the session.
    axioms: HashMap<String, Vec<Term>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all cached symbols and axioms.
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.axioms.clear();
    }

    /// Arity of the uninterpreted symbol for `name`, if registered.
    pub fn symbol_arity(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).copied()
    }

    /// Whether an axiom derivation has been attempted for `name`.
    pub fn axioms_attempted(&self, name: &str) -> bool {
        self.axioms.contains_key(name)
    }
}

/// An encoded verification condition: declarations and axioms in
/// `prelude`, the condition itself in `vc`.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVc {
    pub prelude: Script,
    pub vc: Term,
}

/// The SMT-LIB name of the uninterpreted symbol standing for calls to
/// `name`.
pub fn symbol_name(name: &str) -> String {
    format!("fn_{name}")
}

/// Encode `vc` in the scope of `func` against `module`.
///
/// The prelude declares every variable of `func`, then every
/// uninterpreted symbol the VC (or its axioms) references, then asserts
/// the axioms. `session` memoizes symbols and axioms across calls.
pub fn encode_vc(
    vc: &Predicate,
    func: &Function,
    module: &Module,
    session: &mut SessionState,
) -> Result<EncodedVc, EncodeError> {
    let mut encoder = Encoder {
        func,
        module,
        formulas: module.formula_table(),
        session,
        used_symbols: Vec::new(),
        bound: Vec::new(),
        fresh: 0,
    };
    let vc_term = encoder.encode_pred(vc)?;

    // Cached axioms may apply symbols this VC never mentions directly
    // (a contract calling another function). Close `used_symbols` over
    // the applications inside every re-asserted axiom so each one is
    // declared.
    let mut used = std::mem::take(&mut encoder.used_symbols);
    let mut i = 0;
    while i < used.len() {
        let mut referenced = Vec::new();
        if let Some(axioms) = encoder.session.axioms.get(&used[i]) {
            for axiom in axioms {
                collect_applied_symbols(axiom, &mut referenced);
            }
        }
        for (name, arity) in referenced {
            encoder.session.symbols.entry(name.clone()).or_insert(arity);
            if !used.iter().any(|s| s == &name) {
                used.push(name);
            }
        }
        i += 1;
    }

    let mut prelude = Script::new();
    prelude.push(Command::SetLogic("ALL".to_string()));
    for param in func.declared_vars() {
        let sort = match param.ty {
            VarType::Int => Sort::Int,
            VarType::IntArray => Sort::int_array(),
        };
        prelude.push(Command::DeclareConst(param.name.clone(), sort));
    }
    for name in &used {
        let arity = encoder.session.symbols[name];
        prelude.push(Command::DeclareFun(
            symbol_name(name),
            vec![Sort::Int; arity],
            Sort::Int,
        ));
    }
    for name in &used {
        if let Some(axioms) = encoder.session.axioms.get(name) {
            for axiom in axioms {
                prelude.push(Command::Assert(axiom.clone()));
            }
        }
    }

    Ok(EncodedVc {
        prelude,
        vc: vc_term,
    })
}

struct Encoder<'a> {
    func: &'a Function,
    module: &'a Module,
    formulas: HashMap<&'a str, &'a Formula>,
    session: &'a mut SessionState,
    /// Symbols referenced by this VC, in first-encounter order.
    used_symbols: Vec<String>,
    /// Scope stack of bound variables: source name to fresh name.
    bound: Vec<(String, String)>,
    fresh: usize,
}

impl Encoder<'_> {
    fn encode_pred(&mut self, pred: &Predicate) -> Result<Term, EncodeError> {
        match pred {
            Predicate::True => Ok(Term::BoolLit(true)),
            Predicate::False => Ok(Term::BoolLit(false)),
            Predicate::Comparison(op, left, right) => {
                let l = self.encode_expr(left)?;
                let r = self.encode_expr(right)?;
                Ok(match op {
                    CompareOp::Eq => Term::eq(l, r),
                    CompareOp::Ne => Term::Distinct(vec![l, r]),
                    CompareOp::Lt => Term::IntLt(Box::new(l), Box::new(r)),
                    CompareOp::Le => Term::IntLe(Box::new(l), Box::new(r)),
                    CompareOp::Gt => Term::IntGt(Box::new(l), Box::new(r)),
                    CompareOp::Ge => Term::IntGe(Box::new(l), Box::new(r)),
                })
            }
            Predicate::Not(inner) => Ok(Term::not(self.encode_pred(inner)?)),
            Predicate::And(l, r) => {
                Ok(Term::And(vec![self.encode_pred(l)?, self.encode_pred(r)?]))
            }
            Predicate::Or(l, r) => {
                Ok(Term::Or(vec![self.encode_pred(l)?, self.encode_pred(r)?]))
            }
            Predicate::Implies(l, r) => {
                Ok(Term::implies(self.encode_pred(l)?, self.encode_pred(r)?))
            }
            Predicate::Paren(inner) => self.encode_pred(inner),
            Predicate::Quantifier(kind, param, body) => {
                let fresh = self.fresh_name(&param.name);
                self.bound.push((param.name.clone(), fresh.clone()));
                let body = self.encode_pred(body);
                self.bound.pop();
                let body = body?;
                let binders = vec![(fresh, Sort::Int)];
                Ok(match kind {
                    QuantifierKind::Forall => Term::Forall(binders, Box::new(body)),
                    QuantifierKind::Exists => Term::Exists(binders, Box::new(body)),
                })
            }
            Predicate::FormulaRef(name, args) => {
                let formula = self
                    .formulas
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| EncodeError::UnresolvedFormula(name.clone()))?;
                let mut body = formula.body.clone();
                for (param, arg) in formula.parameters.iter().zip(args.iter()) {
                    body = subst_var_in_pred(&body, &param.name, arg);
                }
                self.encode_pred(&body)
            }
        }
    }

    fn encode_expr(&mut self, expr: &Expr) -> Result<Term, EncodeError> {
        match expr {
            Expr::Number(n) => Ok(Term::IntLit(*n)),
            Expr::Variable(name) => self.resolve_scalar(name),
            Expr::Unary(UnaryOp::Neg, operand) => {
                Ok(Term::IntNeg(Box::new(self.encode_expr(operand)?)))
            }
            Expr::Binary(op, left, right) => {
                let l = Box::new(self.encode_expr(left)?);
                let r = Box::new(self.encode_expr(right)?);
                Ok(match op {
                    BinOp::Add => Term::IntAdd(l, r),
                    BinOp::Sub => Term::IntSub(l, r),
                    BinOp::Mul => Term::IntMul(l, r),
                    BinOp::Div => Term::IntDiv(l, r),
                })
            }
            Expr::ArrAccess(name, index) => {
                let declared_as_array = self
                    .func
                    .declared_vars()
                    .any(|p| p.name == *name && p.ty == VarType::IntArray);
                if !declared_as_array {
                    return Err(EncodeError::UnknownArray(name.clone()));
                }
                let index = self.encode_expr(index)?;
                Ok(Term::Select(
                    Box::new(Term::Const(name.clone())),
                    Box::new(index),
                ))
            }
            Expr::FuncCall(name, args) => {
                self.derive_contract_axiom(name);
                if !self.session.symbols.contains_key(name) {
                    self.session.symbols.insert(name.clone(), args.len());
                }
                if !self.used_symbols.iter().any(|s| s == name) {
                    self.used_symbols.push(name.clone());
                }
                let args = args
                    .iter()
                    .map(|a| self.encode_expr(a))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Term::App(symbol_name(name), args))
            }
        }
    }

    /// Resolve a scalar name: innermost bound variable first, then the
    /// function's declared integer variables.
    fn resolve_scalar(&self, name: &str) -> Result<Term, EncodeError> {
        if let Some((_, fresh)) = self.bound.iter().rev().find(|(src, _)| src == name) {
            return Ok(Term::Const(fresh.clone()));
        }
        let declared_as_int = self
            .func
            .declared_vars()
            .any(|p| p.name == name && p.ty == VarType::Int);
        if declared_as_int {
            Ok(Term::Const(name.to_string()))
        } else {
            Err(EncodeError::UnknownVariable(name.to_string()))
        }
    }

    fn fresh_name(&mut self, base: &str) -> String {
        let name = format!("{base}!{}", self.fresh);
        self.fresh += 1;
        name
    }

    /// Derive the contract axiom for `name` once per session:
    ///
    /// ```text
    /// forall params :: pre => post[ret -> fn_name(params)]
    /// ```
    ///
    /// Requires every parameter and the single return to be scalar
    /// integers, and a postcondition to exist. Failures are logged and
    /// leave an empty axiom set; provability degrades but encoding
    /// continues.
    fn derive_contract_axiom(&mut self, name: &str) {
        if self.session.axioms.contains_key(name) {
            return;
        }
        // Inserted before encoding the axiom body so recursive contracts
        // (and the symbol the axiom itself applies) terminate.
        self.session.axioms.insert(name.to_string(), Vec::new());

        let Some(func) = self.module.function(name) else {
            return;
        };
        match build_contract_axiom(func) {
            Some(axiom_pred) => {
                let depth = self.bound.len();
                let encoded = self.encode_pred(&axiom_pred);
                debug_assert_eq!(self.bound.len(), depth);
                match encoded {
                    Ok(term) => {
                        tracing::debug!(function = %name, "derived contract axiom");
                        if let Some(axioms) = self.session.axioms.get_mut(name) {
                            axioms.push(term);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            function = %name,
                            error = %err,
                            "could not encode contract axiom; calls stay uninterpreted"
                        );
                    }
                }
            }
            None => {
                tracing::warn!(
                    function = %name,
                    "contract has no axiomatizable shape; calls stay uninterpreted"
                );
            }
        }
    }
}

/// Collect every uninterpreted function application in `term` as a
/// `(source name, arity)` pair.
fn collect_applied_symbols(term: &Term, out: &mut Vec<(String, usize)>) {
    match term {
        Term::App(sym, args) => {
            if let Some(name) = sym.strip_prefix("fn_") {
                out.push((name.to_string(), args.len()));
            }
            for arg in args {
                collect_applied_symbols(arg, out);
            }
        }
        Term::BoolLit(_) | Term::IntLit(_) | Term::Const(_) => {}
        Term::Not(t) | Term::IntNeg(t) => collect_applied_symbols(t, out),
        Term::And(ts) | Term::Or(ts) | Term::Distinct(ts) => {
            for t in ts {
                collect_applied_symbols(t, out);
            }
        }
        Term::Implies(a, b)
        | Term::Eq(a, b)
        | Term::IntAdd(a, b)
        | Term::IntSub(a, b)
        | Term::IntMul(a, b)
        | Term::IntDiv(a, b)
        | Term::IntLt(a, b)
        | Term::IntLe(a, b)
        | Term::IntGt(a, b)
        | Term::IntGe(a, b)
        | Term::Select(a, b) => {
            collect_applied_symbols(a, out);
            collect_applied_symbols(b, out);
        }
        Term::Store(a, b, c) => {
            collect_applied_symbols(a, out);
            collect_applied_symbols(b, out);
            collect_applied_symbols(c, out);
        }
        Term::Forall(_, body) | Term::Exists(_, body) => collect_applied_symbols(body, out),
    }
}

/// Build the quantified contract axiom for `func`, if its signature and
/// contract allow one: all-Int parameters, a single Int return, and a
/// postcondition.
fn build_contract_axiom(func: &Function) -> Option<Predicate> {
    let post = func.postcondition.as_ref()?;
    if func.returns.len() != 1 || func.returns[0].ty != VarType::Int {
        return None;
    }
    if func.parameters.iter().any(|p| p.ty != VarType::Int) {
        return None;
    }

    let call = Expr::FuncCall(
        func.name.clone(),
        func.parameters
            .iter()
            .map(|p| Expr::var(p.name.clone()))
            .collect(),
    );
    let post = subst_var_in_pred(post, &func.returns[0].name, &call);
    let body = match &func.precondition {
        Some(pre) => Predicate::implies(pre.clone(), post),
        None => post,
    };
    Some(
        func.parameters
            .iter()
            .rev()
            .fold(body, |acc, param| {
                Predicate::Quantifier(QuantifierKind::Forall, param.clone(), Box::new(acc))
            }),
    )
}
