//! Annotated AST for the small imperative input language.
//!
//! Produced by the upstream parser/resolver and consumed read-only here:
//! names are resolved, arities checked, variable names unique per
//! function scope. Transformations in this crate never mutate a tree in
//! place; they always build new ones.

use std::collections::HashMap;

/// Variable type: scalar integer or integer array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    IntArray,
}

/// A typed parameter, return slot, or local.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: VarType,
}

impl Param {
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: VarType::Int,
        }
    }

    pub fn int_array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: VarType::IntArray,
        }
    }
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Arithmetic expression tree. Finite, acyclic; `PartialEq` is deep
/// structural equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Variable(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    FuncCall(String, Vec<Expr>),
    ArrAccess(String, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn num(value: i64) -> Self {
        Expr::Number(value)
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Quantifier kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    Forall,
    Exists,
}

/// First-order boolean predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    False,
    Comparison(CompareOp, Expr, Expr),
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Implies(Box<Predicate>, Box<Predicate>),
    Paren(Box<Predicate>),
    /// `forall x :: body` / `exists x :: body` with an integer-typed
    /// bound parameter.
    Quantifier(QuantifierKind, Param, Box<Predicate>),
    /// Reference to a named formula (a macro over a parameter list),
    /// resolved against the module's formula table.
    FormulaRef(String, Vec<Expr>),
}

impl Predicate {
    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        Predicate::Comparison(op, left, right)
    }

    pub fn not(p: Predicate) -> Self {
        Predicate::Not(Box::new(p))
    }

    pub fn and(l: Predicate, r: Predicate) -> Self {
        Predicate::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Predicate, r: Predicate) -> Self {
        Predicate::Or(Box::new(l), Box::new(r))
    }

    pub fn implies(l: Predicate, r: Predicate) -> Self {
        Predicate::Implies(Box::new(l), Box::new(r))
    }
}

/// Assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    /// `x := ...`
    Var(String),
    /// `a[i] := ...`
    Arr(String, Expr),
}

/// Annotated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Parallel assignment; the common single-target form is
    /// `targets.len() == exprs.len() == 1`. Multi-target assignments
    /// come from multi-return calls.
    Assign {
        targets: Vec<LValue>,
        exprs: Vec<Expr>,
    },
    Block(Vec<Statement>),
    If {
        cond: Predicate,
        then: Box<Statement>,
        els: Option<Box<Statement>>,
    },
    While {
        cond: Predicate,
        /// Loop invariant; `None` is treated as `true`, which weakens
        /// provability rather than causing failure.
        invariant: Option<Predicate>,
        body: Box<Statement>,
    },
}

impl Statement {
    /// Single-target assignment `target := expr`.
    pub fn assign(target: LValue, expr: Expr) -> Self {
        Statement::Assign {
            targets: vec![target],
            exprs: vec![expr],
        }
    }
}

/// An annotated function: typed parameter/return/local lists, optional
/// contracts, and a statement body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Param>,
    pub returns: Vec<Param>,
    pub locals: Vec<Param>,
    pub precondition: Option<Predicate>,
    pub postcondition: Option<Predicate>,
    pub body: Statement,
}

impl Function {
    /// All declared variables in declaration order:
    /// parameters, then returns, then locals.
    pub fn declared_vars(&self) -> impl Iterator<Item = &Param> {
        self.parameters
            .iter()
            .chain(self.returns.iter())
            .chain(self.locals.iter())
    }
}

/// A named formula: a predicate macro over a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub name: String,
    pub parameters: Vec<Param>,
    pub body: Predicate,
}

/// A verified module: named formulas plus functions, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub formulas: Vec<Formula>,
    pub functions: Vec<Function>,
}

impl Module {
    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Order-independent formula lookup table.
    pub fn formula_table(&self) -> HashMap<&str, &Formula> {
        self.formulas
            .iter()
            .map(|f| (f.name.as_str(), f))
            .collect()
    }
}
