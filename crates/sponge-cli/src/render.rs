use std::path::PathBuf;

use owo_colors::OwoColorize;
use sponge_interpreter::RuntimeError;
use sponge_syntax::error::{LexError, ParseError, Position};
use thiserror::Error;

/// Everything that can stop a run, one variant per pipeline stage.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl DriverError {
    fn kind(&self) -> &'static str {
        match self {
            DriverError::Io { .. } => "error",
            DriverError::Lex(_) => "Lex error",
            DriverError::Parse(_) => "Parse error",
            DriverError::Runtime(_) => "Runtime error",
        }
    }

    fn position(&self) -> Option<Position> {
        match self {
            DriverError::Lex(e) => Some(e.position()),
            DriverError::Parse(e) => Some(e.position()),
            DriverError::Io { .. } | DriverError::Runtime(_) => None,
        }
    }
}

pub fn render_error(source: &str, err: &DriverError) {
    eprintln!("{}: {}", err.kind().red().bold(), err.to_string().red());
    if let Some(Position { line, col }) = err.position() {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len());
            if col > 1 {
                marker.push_str(&" ".repeat(col - 1));
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    if let Some(hint) = hint(err) {
        eprintln!("{}", format!("Help: {}", hint).yellow());
    }
}

fn hint(err: &DriverError) -> Option<&'static str> {
    match err {
        DriverError::Runtime(RuntimeError::UndefinedVariable { .. }) => {
            Some("Did you forget to declare it with 'let' or 'fn'?")
        }
        DriverError::Runtime(RuntimeError::ArityMismatch { .. }) => {
            Some("Check the function's parameter list and pass one argument per parameter.")
        }
        DriverError::Runtime(RuntimeError::ReturnOutsideFunction) => {
            Some("'return' is only allowed inside a function body.")
        }
        DriverError::Runtime(RuntimeError::StackOverflow { .. }) => {
            Some("Make sure recursive functions reach a base case, or raise --max-depth.")
        }
        DriverError::Runtime(RuntimeError::DivisionByZero) => {
            Some("Check the divisor with 'if' before dividing.")
        }
        DriverError::Lex(LexError::UnterminatedString { .. }) => {
            Some("Make sure every \" has a matching closing \".")
        }
        DriverError::Parse(ParseError::UnexpectedEndOfInput { .. }) => {
            Some("Is a ';', ')' or '}' missing at the end?")
        }
        _ => None,
    }
}
