//! Driver that wires the front-end stages together.

use crate::front::analyzer;
use crate::front::ast::Ast;
use crate::front::diag::Reporter;
use crate::front::parser;
use crate::front::sym::SymTable;

/// Everything a later stage (or a test) wants from a run: the typed AST,
/// the symbol table, and the diagnostic counts.
pub struct Outcome {
    pub module: Ast,
    pub tab: SymTable,
    pub errors: usize,
    pub warnings: usize,
}

pub struct Driver {
    source: String,
    dump_ast: bool,
    dump_symbols: bool,
}

impl Driver {
    pub fn new(source: String) -> Driver {
        Driver { source, dump_ast: false, dump_symbols: false }
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    pub fn set_dump_symbols(&mut self, enabled: bool) {
        self.dump_symbols = enabled;
    }

    /// Run lex → parse → analyze. Diagnostics are printed as they are
    /// found; the outcome carries the totals.
    pub fn run(&self) -> Outcome {
        let mut tab = SymTable::new();
        let mut reporter = Reporter::new();

        let mut module = parser::parse(&self.source, &mut tab, &mut reporter);
        analyzer::analyze(&mut module, &mut tab, &mut reporter);

        if self.dump_ast {
            eprintln!("{:#?}", module);
        }
        if self.dump_symbols {
            eprintln!("{:#?}", tab);
        }

        Outcome { module, tab, errors: reporter.errors(), warnings: reporter.warnings() }
    }
}

/// One-shot convenience over [`Driver`].
pub fn compile(source: &str) -> Outcome {
    Driver::new(source.to_string()).run()
}
