//! Main interpreter engine.

use std::rc::Rc;

use sponge_stack::ensure_sufficient_stack;
use sponge_syntax::ast::*;
use tracing::{debug, trace};

use crate::config::EvalConfig;
use crate::env::Env;
use crate::error::RuntimeError;
use crate::flow::Flow;
use crate::value::{Closure, Value};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Counters from the most recent [`Interpreter::evaluate`] call.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalStats {
    /// Statements and expressions evaluated
    pub steps: u64,
    /// Function calls made
    pub calls: u64,
    /// Deepest call nesting reached
    pub max_depth: usize,
}

pub struct Interpreter {
    config: EvalConfig,
    /// Current call nesting
    depth: usize,
    stats: EvalStats,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            depth: 0,
            stats: EvalStats::default(),
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    /// Run `program` with `env` as its global scope.
    ///
    /// Top-level bindings land in `env` itself, so they remain visible to the
    /// caller afterwards. The result is the value of the last top-level
    /// statement, or `Unit` for an empty program.
    pub fn evaluate(&mut self, program: &Program, env: &Env) -> Result<Value> {
        self.depth = 0;
        self.stats = EvalStats::default();
        let result = self.exec_stmts(env, &program.stmts);
        debug!(
            steps = self.stats.steps,
            calls = self.stats.calls,
            max_depth = self.stats.max_depth,
            "evaluation finished"
        );
        match result? {
            Flow::Normal(v) => Ok(v),
            Flow::Return(_) => Err(RuntimeError::ReturnOutsideFunction),
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.stats.steps += 1;
        match self.config.step_limit {
            Some(limit) if self.stats.steps > limit => Err(RuntimeError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    /// Runs statements in `env` without opening a new scope.
    fn exec_stmts(&mut self, env: &Env, stmts: &[Stmt]) -> Result<Flow> {
        let mut last = Value::Unit;
        for s in stmts {
            match self.exec_stmt(env, s)? {
                Flow::Normal(v) => last = v,
                Flow::Return(v) => return Ok(Flow::Return(v)),
            }
        }
        Ok(Flow::Normal(last))
    }

    fn exec_block(&mut self, env: &Env, block: &Block) -> Result<Flow> {
        let scope = env.child_scope();
        self.exec_stmts(&scope, &block.stmts)
    }

    fn exec_stmt(&mut self, env: &Env, stmt: &Stmt) -> Result<Flow> {
        ensure_sufficient_stack(|| {
            self.tick()?;
            match stmt {
                Stmt::Let { name, init } => {
                    let v = self.eval_expr(env, init)?;
                    env.define(name.clone(), v);
                    Ok(Flow::Normal(Value::Unit))
                }
                Stmt::If { cond, then_block, else_block } => {
                    let taken = match self.eval_expr(env, cond)? {
                        Value::Int(n) => n != 0,
                        other => {
                            return Err(RuntimeError::TypeMismatch {
                                expected: "int",
                                found: other.type_name(),
                            })
                        }
                    };
                    if taken {
                        self.exec_block(env, then_block)
                    } else if let Some(else_block) = else_block {
                        self.exec_block(env, else_block)
                    } else {
                        Ok(Flow::Normal(Value::Unit))
                    }
                }
                Stmt::Block(block) => self.exec_block(env, block),
                Stmt::Expr(e) => Ok(Flow::Normal(self.eval_expr(env, e)?)),
                Stmt::FnDecl(decl) => {
                    let closure = Closure {
                        name: decl.name.clone(),
                        params: decl.params.clone(),
                        body: decl.body.clone(),
                        env: env.clone(),
                    };
                    env.define(decl.name.clone(), Value::Function(Rc::new(closure)));
                    Ok(Flow::Normal(Value::Unit))
                }
                Stmt::Return(opt) => {
                    let v = match opt {
                        Some(e) => self.eval_expr(env, e)?,
                        None => Value::Unit,
                    };
                    Ok(Flow::Return(v))
                }
            }
        })
    }

    fn eval_expr(&mut self, env: &Env, expr: &Expr) -> Result<Value> {
        ensure_sufficient_stack(|| {
            self.tick()?;
            match expr {
                Expr::NumberLiteral(n) => Ok(Value::Int(*n)),
                Expr::Identifier(name) => Ok(env.resolve(name)?),
                Expr::Binary { op, left, right } => {
                    let l = self.eval_expr(env, left)?;
                    let r = self.eval_expr(env, right)?;
                    match (l, r) {
                        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(apply_binary(*op, x, y)?)),
                        (Value::Int(_), other) | (other, _) => Err(RuntimeError::TypeMismatch {
                            expected: "int",
                            found: other.type_name(),
                        }),
                    }
                }
                Expr::Negate(operand) => match self.eval_expr(env, operand)? {
                    Value::Int(n) => n
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or(RuntimeError::IntegerOverflow { operation: "negation" }),
                    other => Err(RuntimeError::TypeMismatch {
                        expected: "int",
                        found: other.type_name(),
                    }),
                },
                Expr::Call { callee, args } => {
                    let closure = match env.resolve(callee)? {
                        Value::Function(c) => c,
                        other => {
                            return Err(RuntimeError::TypeMismatch {
                                expected: "function",
                                found: other.type_name(),
                            })
                        }
                    };
                    let mut evaluated_args = Vec::with_capacity(args.len());
                    for a in args {
                        evaluated_args.push(self.eval_expr(env, a)?);
                    }
                    self.call(&closure, evaluated_args)
                }
            }
        })
    }

    fn call(&mut self, func: &Closure, args: Vec<Value>) -> Result<Value> {
        if func.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: func.name.clone(),
                expected: func.params.len(),
                got: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow { depth: self.config.max_call_depth });
        }
        self.depth += 1;
        self.stats.calls += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
        trace!(function = %func.name, depth = self.depth, "call");

        let scope = func.env.child_scope();
        for (param, value) in func.params.iter().zip(args) {
            scope.define(param.clone(), value);
        }
        let flow = self.exec_stmts(&scope, &func.body.stmts);
        self.depth -= 1;
        match flow? {
            Flow::Return(v) => Ok(v),
            Flow::Normal(_) => Ok(Value::Unit),
        }
    }
}

fn apply_binary(op: BinaryOp, x: i64, y: i64) -> Result<i64> {
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div => {
            if y == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            x.checked_div(y)
        }
    };
    result.ok_or(RuntimeError::IntegerOverflow { operation: op.symbol() })
}

/// Evaluate `program` against `env` with the default limits.
pub fn evaluate(program: &Program, env: &Env) -> Result<Value> {
    Interpreter::new().evaluate(program, env)
}
