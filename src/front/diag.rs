//! Diagnostics: one variant per message family, printed the moment they
//! are raised. The reporter only formats and counts; it never reads
//! input and never aborts the pipeline.

use thiserror::Error;

use super::token::Loc;

#[derive(Error, Debug, Clone)]
pub enum Diag {
    #[error("expected {expected}, found '{found}'")]
    Expected { expected: String, found: String },

    #[error("undefined symbol '{0}'")]
    UndefinedSymbol(String),

    #[error("cannot break when not in loop or switch")]
    IllegalBreak,

    #[error("identifier given outside declaration")]
    IdentOutsideDecl,

    #[error("duplicated identifier '{0}'")]
    DuplicateSymbol(String),

    #[error("{site} expected {expected}, found {found}")]
    ExpectedType { site: String, expected: String, found: String },

    #[error("{op} requires {requires}, found {found}")]
    OperatorRequires { op: String, requires: String, found: String },

    #[error("type mismatch between {left} and {right} for {op}")]
    TypeMismatch { op: String, left: String, right: String },

    #[error("{expected} {thing} expected, {found} given to {site}")]
    DegreeMismatch { thing: String, expected: usize, found: usize, site: String },

    #[error("type mismatch at parameter {n} of {site}: expected {expected}, found {found}")]
    ParamMismatch { n: usize, site: String, expected: String, found: String },

    #[error("'{op}' expected field of {record}, found {field}")]
    MissingMember { op: String, record: String, field: String },

    #[error("expression value is not used")]
    UnusedValue,

    #[error("unhandled {what} in {site}")]
    Unhandled { site: String, what: String },
}

/// Counts diagnostics and flushes each one as a single
/// `error(LINE:COL): message.` line the moment it is reported.
#[derive(Debug, Default)]
pub struct Reporter {
    errors: usize,
    warnings: usize,
}

impl Reporter {
    pub fn new() -> Reporter {
        Reporter::default()
    }

    pub fn error(&mut self, loc: Loc, diag: Diag) {
        println!("error({}): {}.", loc, diag);
        self.errors += 1;
    }

    pub fn warning(&mut self, loc: Loc, diag: Diag) {
        println!("warning({}): {}.", loc, diag);
        self.warnings += 1;
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.errors == 0
    }
}
