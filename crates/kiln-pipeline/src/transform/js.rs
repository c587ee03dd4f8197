use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_compat::EngineTargets;
use oxc_minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::{Result, TaskError};

/// Syntax level of the bundle. Minified codegen may quote strings with
/// backticks, so output never goes below ES2015; the compressor is held there
/// too so it cannot introduce `??`, `?.` or other later syntax.
const OUTPUT_TARGET: &str = "es2015";

/// Compress and mangle a classic browser script.
///
/// Top-level names survive so concatenated scripts can still reach each
/// other's globals.
pub fn minify_js(file: &Path, source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if let Some(error) = ret.errors.first() {
        return Err(TaskError::Minify {
            file: file.to_path_buf(),
            message: error.to_string(),
        });
    }

    let target = EngineTargets::from_target(OUTPUT_TARGET).map_err(|message| TaskError::Minify {
        file: file.to_path_buf(),
        message,
    })?;
    let options = MinifierOptions {
        compress: Some(CompressOptions {
            target,
            ..CompressOptions::smallest()
        }),
        ..MinifierOptions::default()
    };

    let mut program = ret.program;
    let minified = Minifier::new(options).minify(&allocator, &mut program);

    let code = Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .build(&program)
        .code;

    Ok(code)
}
