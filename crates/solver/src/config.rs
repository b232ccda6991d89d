use std::path::{Path, PathBuf};
use std::{fmt, str};

use crate::error::SolverError;

/// Supported SMT solver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    Z3,
    Cvc5,
    Yices,
}

/// Install prefixes checked when the PATH lookup comes up empty, in
/// order. The binary name is appended per kind.
const INSTALL_PREFIXES: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];

impl SolverKind {
    /// Binary name used for PATH lookup and prefix probing.
    pub fn binary_name(&self) -> &'static str {
        match self {
            SolverKind::Z3 => "z3",
            SolverKind::Cvc5 => "cvc5",
            SolverKind::Yices => "yices-smt2",
        }
    }

    /// Flags that switch the binary to reading SMT-LIB2 from stdin.
    pub fn stdin_args(&self) -> &'static [&'static str] {
        match self {
            SolverKind::Z3 => &["-in"],
            SolverKind::Cvc5 => &["--lang", "smt2", "--produce-models"],
            SolverKind::Yices => &["--incremental"],
        }
    }

    /// Per-check timeout flag; each solver spells it differently and
    /// Yices only takes whole seconds. `0` disables the flag.
    pub fn timeout_arg(&self, timeout_ms: u64) -> Option<String> {
        if timeout_ms == 0 {
            return None;
        }
        Some(match self {
            SolverKind::Z3 => format!("-t:{timeout_ms}"),
            SolverKind::Cvc5 => format!("--tlimit={timeout_ms}"),
            SolverKind::Yices => format!("--timeout={}", timeout_ms.div_ceil(1000)),
        })
    }

    fn install_candidates(&self) -> impl Iterator<Item = PathBuf> {
        let binary = self.binary_name();
        INSTALL_PREFIXES
            .iter()
            .map(move |prefix| Path::new(prefix).join(binary))
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::Z3 => "Z3",
            SolverKind::Cvc5 => "CVC5",
            SolverKind::Yices => "Yices",
        };
        f.write_str(name)
    }
}

impl str::FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "z3" => Ok(SolverKind::Z3),
            "cvc5" => Ok(SolverKind::Cvc5),
            "yices" | "yices2" | "yices-smt2" => Ok(SolverKind::Yices),
            _ => Err(format!(
                "Unknown solver: {s}. Valid options: z3, cvc5, yices"
            )),
        }
    }
}

/// Default per-check timeout. VCs over linear integer arithmetic answer
/// quickly; anything that runs longer is effectively Unknown.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// One solver invocation's configuration: which binary, where, how long
/// it may run, and any extra flags.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub kind: SolverKind,
    pub solver_path: PathBuf,
    /// Timeout in milliseconds (0 = no timeout).
    pub timeout_ms: u64,
    pub extra_args: Vec<String>,
}

impl SolverConfig {
    pub fn new(kind: SolverKind, solver_path: PathBuf) -> Self {
        Self {
            kind,
            solver_path,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            extra_args: Vec::new(),
        }
    }

    /// Override the timeout (in milliseconds; 0 disables it).
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Append extra arguments to the solver invocation.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Locate the binary for `kind`: PATH lookup via `which` first,
    /// then the known install prefixes.
    pub fn auto_detect_for(kind: SolverKind) -> Result<Self, SolverError> {
        let found = path_lookup(kind.binary_name())
            .or_else(|| kind.install_candidates().find(|p| p.exists()));
        match found {
            Some(path) => Ok(Self::new(kind, path)),
            None => Err(SolverError::NotFound(
                kind,
                PathBuf::from(kind.binary_name()),
            )),
        }
    }

    /// Auto-detect Z3, the default solver.
    pub fn auto_detect() -> Result<Self, SolverError> {
        Self::auto_detect_for(SolverKind::Z3)
    }

    /// Full argument list for one invocation: stdin mode, timeout,
    /// extras, in that order.
    pub fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .kind
            .stdin_args()
            .iter()
            .map(|a| a.to_string())
            .collect();
        args.extend(self.kind.timeout_arg(self.timeout_ms));
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Check that the configured binary exists before spawning it.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.solver_path.exists() {
            Ok(())
        } else {
            Err(SolverError::NotFound(self.kind, self.solver_path.clone()))
        }
    }
}

fn path_lookup(binary: &str) -> Option<PathBuf> {
    let output = std::process::Command::new("which")
        .arg(binary)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if line.is_empty() {
        return None;
    }
    let path = PathBuf::from(line);
    path.exists().then_some(path)
}
