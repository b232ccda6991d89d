//! SMT-LIB2 text formatting.
//!
//! `Display` implementations turn [`Sort`], [`Term`], [`Command`] and
//! [`Script`] into concrete SMT-LIB2 syntax ready to be piped into a
//! solver process.

use std::fmt;

use crate::command::Command;
use crate::script::Script;
use crate::sort::Sort;
use crate::term::Term;

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::Array(idx, elem) => write!(f, "(Array {idx} {elem})"),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::BoolLit(true) => write!(f, "true"),
            Term::BoolLit(false) => write!(f, "false"),
            Term::IntLit(n) => {
                if *n < 0 {
                    // SMT-LIB has no negative literals; use unary minus
                    write!(f, "(- {})", n.unsigned_abs())
                } else {
                    write!(f, "{n}")
                }
            }
            Term::Const(name) => write!(f, "{name}"),
            Term::Not(t) => write!(f, "(not {t})"),
            Term::And(ts) => write_nary(f, "and", ts),
            Term::Or(ts) => write_nary(f, "or", ts),
            Term::Implies(a, b) => write!(f, "(=> {a} {b})"),
            Term::Eq(a, b) => write!(f, "(= {a} {b})"),
            Term::Distinct(ts) => write_nary(f, "distinct", ts),
            Term::IntAdd(a, b) => write!(f, "(+ {a} {b})"),
            Term::IntSub(a, b) => write!(f, "(- {a} {b})"),
            Term::IntMul(a, b) => write!(f, "(* {a} {b})"),
            Term::IntDiv(a, b) => write!(f, "(div {a} {b})"),
            Term::IntNeg(a) => write!(f, "(- {a})"),
            Term::IntLt(a, b) => write!(f, "(< {a} {b})"),
            Term::IntLe(a, b) => write!(f, "(<= {a} {b})"),
            Term::IntGt(a, b) => write!(f, "(> {a} {b})"),
            Term::IntGe(a, b) => write!(f, "(>= {a} {b})"),
            Term::Select(arr, idx) => write!(f, "(select {arr} {idx})"),
            Term::Store(arr, idx, val) => write!(f, "(store {arr} {idx} {val})"),
            Term::Forall(bindings, body) => write_quantifier(f, "forall", bindings, body),
            Term::Exists(bindings, body) => write_quantifier(f, "exists", bindings, body),
            Term::App(func, args) => {
                write!(f, "({func}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_nary(f: &mut fmt::Formatter<'_>, op: &str, terms: &[Term]) -> fmt::Result {
    write!(f, "({op}")?;
    for t in terms {
        write!(f, " {t}")?;
    }
    write!(f, ")")
}

fn write_quantifier(
    f: &mut fmt::Formatter<'_>,
    kind: &str,
    bindings: &[(String, Sort)],
    body: &Term,
) -> fmt::Result {
    write!(f, "({kind} (")?;
    for (i, (name, sort)) in bindings.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "({name} {sort})")?;
    }
    write!(f, ") {body})")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetLogic(logic) => write!(f, "(set-logic {logic})"),
            Command::SetOption(key, value) => write!(f, "(set-option :{key} {value})"),
            Command::DeclareConst(name, sort) => write!(f, "(declare-const {name} {sort})"),
            Command::DeclareFun(name, params, ret) => {
                write!(f, "(declare-fun {name} (")?;
                for (i, s) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ") {ret})")
            }
            Command::Assert(term) => write!(f, "(assert {term})"),
            Command::CheckSat => write!(f, "(check-sat)"),
            Command::GetModel => write!(f, "(get-model)"),
            Command::Comment(text) => write!(f, ";; {text}"),
            Command::Exit => write!(f, "(exit)"),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in self.commands() {
            writeln!(f, "{cmd}")?;
        }
        Ok(())
    }
}
