use std::io::{self, Write};

use owo_colors::OwoColorize;
use sponge_interpreter::{Env, EvalConfig, Interpreter, Value};
use sponge_syntax::token::TokenKind;

use crate::render::{render_error, DriverError};

pub fn start_repl(config: EvalConfig) {
    println!("{}", "Spongelang REPL. Type :help for help, :quit to exit.".bold().green());

    let mut interpreter = Interpreter::with_config(config);
    let mut env = Env::new_root();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "sponge> ".cyan().to_string() } else { "  ... > ".cyan().to_string() };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => { println!("<input error>"); break; }
        };
        if n == 0 { // EOF
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => { println!("Goodbye."); break; }
                ":help" | ":h" => {
                    println!("{}\n  {}  {}\n  {}  {}\n  {}  {}\n  {}  {}",
                        "Commands:".bold(),
                        ":help ".yellow(), "Show this help",
                        ":quit ".yellow(), "Exit the REPL",
                        ":vars ".yellow(), "List global bindings",
                        ":reset".yellow(), "Start over with an empty global scope");
                    println!("Statements end with ';'. Input continues until braces and parentheses balance.");
                    continue;
                }
                ":vars" => { print_vars(&env); continue; }
                ":reset" => {
                    env.clear();
                    env = Env::new_root();
                    println!("{}", "State reset.".yellow());
                    continue;
                }
                _ => { println!("{}", "Unknown command. Type :help.".red()); continue; }
            }
        }

        buffer.push_str(&line);

        if !is_complete(&buffer) {
            continue;
        }

        match eval_chunk(&mut interpreter, &env, &buffer) {
            Ok(val) => {
                if val != Value::Unit { println!("{}", format!("{}", val).bright_blue()); }
            }
            Err(e) => render_error(&buffer, &e),
        }

        buffer.clear();
    }
    env.clear();
}

fn eval_chunk(interpreter: &mut Interpreter, env: &Env, src: &str) -> Result<Value, DriverError> {
    let tokens = sponge_lexer::tokenize(src)?;
    let program = sponge_parser::parse(tokens)?;
    Ok(interpreter.evaluate(&program, env)?)
}

fn print_vars(env: &Env) {
    let vars = env.bindings_snapshot();
    if vars.is_empty() { println!("{}", "<no vars>".dimmed()); return; }
    for (k, v) in vars { println!("{} = {}", k.yellow(), format!("{}", v).bright_blue()); }
}

/// True once every `(` and `{` in `input` is closed. Input that does not lex
/// is considered complete so the error gets reported.
fn is_complete(input: &str) -> bool {
    let tokens = match sponge_lexer::tokenize(input) {
        Ok(t) => t,
        Err(sponge_syntax::error::LexError::UnterminatedString { .. }) => return false,
        Err(_) => return true,
    };
    let mut depth = 0i32;
    for tk in tokens.iter() {
        match &tk.kind {
            TokenKind::LParen | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBrace => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}
