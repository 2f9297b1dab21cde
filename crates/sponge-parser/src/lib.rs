pub mod parser;

pub use parser::Parser;

use sponge_syntax::ast::Program;
use sponge_syntax::error::ParseError;
use sponge_syntax::token::Token;

/// Parse a complete token sequence into a [`Program`].
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}
