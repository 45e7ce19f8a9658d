//! Command line entry point.

use clap::Parser;
use colored::Colorize;
use mcc::driver::Driver;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mcc")]
#[command(about = "Front-end for a small statically typed C dialect", long_about = None)]
#[command(version)]
struct Args {
    /// Input source file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Print the analyzed AST
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    /// Print the symbol table
    #[arg(long, default_value_t = false)]
    dump_symbols: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "{}: could not read '{}': {}",
                "error".red().bold(),
                args.input.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(source);
    driver.set_dump_ast(args.dump_ast);
    driver.set_dump_symbols(args.dump_symbols);
    let outcome = driver.run();

    if outcome.errors > 0 {
        eprintln!(
            "{} generated",
            format!("{} error{}", outcome.errors, if outcome.errors == 1 { "" } else { "s" })
                .red()
                .bold()
        );
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
