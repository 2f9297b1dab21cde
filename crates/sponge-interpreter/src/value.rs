//! Value types for the Spongelang interpreter.

use std::fmt;
use std::rc::Rc;

use sponge_syntax::ast::Block;

use crate::env::Env;

#[derive(Clone)]
pub enum Value {
    /// A 64-bit signed integer; the only thing arithmetic produces
    Int(i64),
    /// A function together with the scope it was declared in
    Function(Rc<Closure>),
    /// The result of statements that produce nothing
    Unit,
}

/// A function value.
///
/// `env` is the scope that was current at the declaration site. Holding it
/// keeps that scope (and its parents) alive for as long as the function is
/// reachable.
pub struct Closure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub env: Env,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Function(_) => "function",
            Value::Unit => "unit",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

/// Functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

// Hand-written so a closure never prints its captured scope, which may
// contain the closure itself.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Function(c) => f
                .debug_struct("Function")
                .field("name", &c.name)
                .field("params", &c.params)
                .finish_non_exhaustive(),
            Value::Unit => f.write_str("Unit"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Function(c) => write!(f, "<fn {}>", c.name),
            Value::Unit => write!(f, "<unit>"),
        }
    }
}
