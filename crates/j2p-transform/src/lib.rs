//! The IL-to-PHP transformer: the only stateful stage in the pipeline
//! (§5 "one `transform(ilAst, options)` invocation owns its analysis state
//! exclusively").
//!
//! [`generate`] is the single entry point (§6) and the only place an
//! `IlError` or [`error::TransformError`] is turned into a
//! [`GenerateResult::Err`] — everything beneath it propagates with `?`.

mod analysis;
mod class_transform;
mod constant;
mod error;
mod lower;
mod method;
mod naming;
mod ops;
mod options;
mod prepass;
mod program;
mod property;
mod sets;
mod validator;
mod warning;

pub use error::TransformError;
pub use options::{Failure, GenerateOptions, GenerateResult, Success, BASE_DEPENDENCIES};
pub use validator::{SyntaxValidator, ValidationMethod, ValidationResult};
pub use warning::{Warning, WarningPhase};

use analysis::FileAnalysis;
use j2p_emit::EmitOptions;
use j2p_il::Program;
use j2p_php_ast::{File, Namespace};

fn build_file(program: &Program, options: &GenerateOptions, warnings: &mut Vec<Warning>) -> Result<File, TransformError> {
    let mut analysis = FileAnalysis::new();
    let prepass_result = prepass::prepass(program);
    analysis.declared_constants = prepass_result.declared_constants;
    analysis.reassigned_variables = prepass_result.reassigned_variables;

    let items = program::transform_program(program, &mut analysis, options, warnings)?;

    let mut file = File::new();
    file.strict_types = options.strict_types;
    file.namespace = options.namespace.clone().map(|name| Namespace { name });
    file.items = items;
    Ok(file)
}

fn emit_options_from(options: &GenerateOptions) -> EmitOptions {
    EmitOptions {
        indent: options.indent.clone(),
        newline: options.newline.clone(),
        strict_types: options.strict_types,
        add_doc_blocks: options.add_doc_blocks,
        use_short_array_syntax: options.use_short_array_syntax,
    }
}

/// `generate(ast, options)` (§6). `ast` is the raw IL AST JSON value; an
/// invalid shape is the only case handled before any analysis state is
/// created (§7.1). Everything past that point is infallible except for the
/// single structural `TransformError` case (§7.2); unrecognized node kinds
/// never fail the call, only warn (§7.3).
pub fn generate(ast: serde_json::Value, options: GenerateOptions) -> GenerateResult {
    let mut warnings = Vec::new();

    let program = match Program::from_value(ast) {
        Ok(program) => program,
        Err(err) => return GenerateResult::Err { error: err.to_string(), warnings },
    };

    match build_file(&program, &options, &mut warnings) {
        Ok(file) => {
            let code = j2p_emit::emit(&file, emit_options_from(&options));
            let dependencies = BASE_DEPENDENCIES.iter().map(|s| s.to_string()).collect();
            GenerateResult::Ok { code, dependencies, warnings }
        }
        Err(err) => GenerateResult::Err { error: err.to_string(), warnings },
    }
}
