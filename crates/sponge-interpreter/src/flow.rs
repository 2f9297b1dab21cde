//! Control flow for the interpreter.

use crate::value::Value;

#[derive(Debug)]
pub(crate) enum Flow {
    /// Keep executing siblings; carries the statement's value
    Normal(Value),
    /// Unwind to the nearest enclosing call with the given value
    Return(Value),
}
