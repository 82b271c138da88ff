//! Thin CLI wiring [`j2p_transform::generate`] to a file or stdin: reads an
//! IL AST JSON document, transpiles it, and prints the PHP source.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use j2p_transform::{generate, GenerateOptions, GenerateResult};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "j2p")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpiles a JS-derived IL AST into PHP source")]
struct Cli {
    /// IL AST JSON file to read (reads stdin if omitted)
    input: Option<PathBuf>,

    /// Indent string used by the emitter
    #[arg(long, default_value = "    ")]
    indent: String,

    /// Line-ending string used by the emitter
    #[arg(long, default_value = "\n")]
    newline: String,

    /// Emit `declare(strict_types=1);`
    #[arg(long, default_value_t = true)]
    strict_types: bool,

    /// Add PHP type hints
    #[arg(long, default_value_t = true)]
    add_type_hints: bool,

    /// Add doc-comment blocks
    #[arg(long, default_value_t = true)]
    add_doc_blocks: bool,

    /// Use `[]` instead of `array()`
    #[arg(long, default_value_t = true)]
    use_short_array_syntax: bool,

    /// Wrap emitted code in this namespace
    #[arg(long)]
    namespace: Option<String>,

    /// Skip prepending framework stub classes
    #[arg(long)]
    skip_framework_stubs: bool,

    /// Lower single-expression closures to `fn(...) => ...`
    #[arg(long)]
    use_arrow_functions: bool,

    /// Print warnings to stderr even on success
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn options_from(cli: &Cli) -> GenerateOptions {
    GenerateOptions {
        indent: cli.indent.clone(),
        newline: cli.newline.clone(),
        strict_types: cli.strict_types,
        add_type_hints: cli.add_type_hints,
        add_doc_blocks: cli.add_doc_blocks,
        use_short_array_syntax: cli.use_short_array_syntax,
        namespace: cli.namespace.clone(),
        skip_framework_stubs: cli.skip_framework_stubs,
        use_arrow_functions: cli.use_arrow_functions,
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {err:#}", "Error".red());
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let source = read_input(&cli.input)?;
    let ast: serde_json::Value = serde_json::from_str(&source).context("parsing IL AST JSON")?;

    match generate(ast, options_from(&cli)) {
        GenerateResult::Ok { code, warnings, .. } => {
            print!("{code}");
            if cli.verbose {
                for warning in &warnings {
                    eprintln!("{}: {warning}", "Warning".yellow());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        GenerateResult::Err { error, warnings } => {
            eprintln!("{}: {error}", "Error".red());
            for warning in &warnings {
                eprintln!("{}: {warning}", "Warning".yellow());
            }
            Ok(ExitCode::from(1))
        }
    }
}
