use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Once,
    time::Instant,
};

use quill::{
    interpreter::{interpreter::Interpreter, stdlib::default_builtins},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_snippet,
    runtime::object::Object,
    Position,
};

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn usage() -> ExitCode {
    eprintln!("Usage: quill [--ast] <file>");
    eprintln!("       quill --builtins");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let (print_ast, file_path) = match args.as_slice() {
        [flag] if flag == "--builtins" => {
            for (name, description) in default_builtins().descriptions() {
                println!("{:<10} {}", name, description);
            }
            return ExitCode::SUCCESS;
        }
        [flag, path] if flag == "--ast" => (true, PathBuf::from(path)),
        [path] if !path.starts_with("--") => (false, PathBuf::from(path)),
        _ => return usage(),
    };

    let source = match read_to_string(&file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: failed to read {}: {}", file_path.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&format!("Lex Error: {}", error), &error.position, &source, &file_path);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(elapsed = ?start.elapsed(), "tokenized");

    let program = match parse(tokens) {
        Ok(program) => program,
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                display_error(&diagnostic.to_string(), &diagnostic.position, &source, &file_path);
            }
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(elapsed = ?start.elapsed(), "parsed");

    if print_ast {
        println!("{}", program);
        return ExitCode::SUCCESS;
    }

    let result = Interpreter::default().run(&program);
    tracing::debug!(elapsed = ?start.elapsed(), "evaluated");

    match result {
        Object::Error(error) => {
            eprintln!("Runtime Error: {}", error);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}

fn display_error(header: &str, position: &Position, source: &str, file: &Path) {
    /*
        Parse Error at line 20, column 9: message
        -> final.ql
           |
        20 | let a = ;
           | --------^
    */
    eprintln!("{}", header);
    eprintln!("-> {}", file.display());
    if let Some(snippet) = render_snippet(source, position) {
        eprintln!("{}", snippet);
    }
}
