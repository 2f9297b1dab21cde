mod render;
mod repl;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use sponge_interpreter::{Env, EvalConfig, Interpreter, Value};
use sponge_parser::Parser;
use sponge_syntax::render_tokens;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{render_error, DriverError};

/// Run a Spongelang program.
#[derive(Debug, ClapParser)]
#[command(name = "sponge", version, about)]
struct Cli {
    /// Source file to run; reads stdin when omitted or '-'
    file: Option<PathBuf>,

    /// Start an interactive session instead of running a file
    #[arg(short, long, conflicts_with = "file")]
    interactive: bool,

    /// Print the token stream and exit
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed program and exit
    #[arg(long)]
    ast: bool,

    /// Print the global bindings after the run
    #[arg(long)]
    globals: bool,

    /// Deepest allowed function call nesting
    #[arg(long, default_value_t = EvalConfig::DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Abort after this many evaluation steps
    #[arg(long)]
    step_limit: Option<u64>,

    /// Log pipeline progress (overridden by SPONGE_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> EvalConfig {
        EvalConfig::default()
            .with_max_call_depth(self.max_depth)
            .with_step_limit(self.step_limit)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SPONGE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn read_source(file: Option<&PathBuf>) -> Result<String, DriverError> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).map_err(|source| DriverError::Io {
                path: path.clone(),
                source,
            })
        }
        _ => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .map_err(|source| DriverError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(src)
        }
    }
}

fn run(cli: &Cli, src: &str) -> Result<(), DriverError> {
    let tokens = sponge_lexer::tokenize(src)?;
    if cli.tokens {
        for tk in &tokens {
            println!("{:>4}:{:<3} {:?}", tk.line, tk.col, tk.kind);
        }
        debug!(rendered = %render_tokens(&tokens), "token stream");
        return Ok(());
    }

    let program = Parser::new(tokens).parse_program()?;
    if cli.ast {
        println!("{:#?}", program);
        return Ok(());
    }

    let globals = Env::new_root();
    let mut interp = Interpreter::with_config(cli.config());
    debug!(
        max_call_depth = interp.config().max_call_depth,
        step_limit = ?interp.config().step_limit,
        "evaluating program"
    );
    let result = interp.evaluate(&program, &globals);
    let stats = interp.stats();
    debug!(steps = stats.steps, calls = stats.calls, max_depth = stats.max_depth, "run complete");

    let outcome = result.map(|value| {
        if value != Value::Unit {
            println!("{}", value);
        }
        if cli.globals {
            for (name, value) in globals.bindings_snapshot() {
                println!("{} = {}", name, value);
            }
        }
    });
    globals.clear();
    outcome.map_err(DriverError::from)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.interactive {
        repl::start_repl(cli.config());
        return ExitCode::SUCCESS;
    }

    let src = match read_source(cli.file.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            render_error("", &e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &src) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render_error(&src, &e);
            ExitCode::FAILURE
        }
    }
}
