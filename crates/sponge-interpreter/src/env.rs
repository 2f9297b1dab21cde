//! Environment and bindings for the Spongelang interpreter.
//!
//! An [`Env`] is a handle to one scope. Scopes are reference counted: a
//! block or call scope is freed when the block or call that opened it
//! finishes, unless a function declared inside it still holds it.
//!
//! Every scope created under a root is registered with that root, so
//! [`Env::clear`] on the root can reach scopes kept alive only by a
//! function stored in the scope it captured.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("undefined variable '{name}'")]
    Undefined { name: String },
}

struct Scope {
    /// Variables defined in this scope
    vars: HashMap<String, Value>,
    /// Enclosing scope used for resolution (None for the global scope)
    parent: Option<Env>,
    /// Every scope opened under the same root
    registry: Registry,
}

type Registry = Rc<RefCell<Vec<Weak<RefCell<Scope>>>>>;

#[derive(Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// A fresh global scope with no parent.
    pub fn new_root() -> Self {
        Env(Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: None,
            registry: Rc::new(RefCell::new(Vec::new())),
        })))
    }

    /// A new empty scope whose parent is `self`.
    pub fn child_scope(&self) -> Env {
        let registry = self.0.borrow().registry.clone();
        let child = Env(Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: Some(self.clone()),
            registry: registry.clone(),
        })));
        let mut scopes = registry.borrow_mut();
        if scopes.len() == scopes.capacity() {
            scopes.retain(|w| w.strong_count() > 0);
        }
        scopes.push(Rc::downgrade(&child.0));
        child
    }

    /// Bind `name` in this scope, replacing any earlier binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().vars.insert(name.into(), value);
    }

    /// Look `name` up in this scope, then each parent outward.
    pub fn resolve(&self, name: &str) -> Result<Value, NameError> {
        let mut scope = self.clone();
        loop {
            let parent = {
                let inner = scope.0.borrow();
                if let Some(v) = inner.vars.get(name) {
                    return Ok(v.clone());
                }
                inner.parent.clone()
            };
            match parent {
                Some(p) => scope = p,
                None => {
                    return Err(NameError::Undefined {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// True if `name` is bound in this scope itself (parents are not searched).
    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().vars.contains_key(name)
    }

    /// This scope's bindings, sorted by name.
    pub fn bindings_snapshot(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .0
            .borrow()
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// Drop every binding in this scope. On a root scope, also drop the
    /// bindings of every scope still alive beneath it.
    ///
    /// A function stored in the scope it captured forms a reference cycle;
    /// clearing the root at the end of a run breaks all of them, including
    /// cycles left behind in finished block and call scopes.
    pub fn clear(&self) {
        let mut taken = vec![std::mem::take(&mut self.0.borrow_mut().vars)];
        let is_root = self.0.borrow().parent.is_none();
        if is_root {
            let registry = self.0.borrow().registry.clone();
            let live: Vec<Rc<RefCell<Scope>>> = std::mem::take(&mut *registry.borrow_mut())
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            for scope in &live {
                taken.push(std::mem::take(&mut scope.borrow_mut().vars));
            }
            drop(taken);
            drop(live);
        }
    }

    #[cfg(test)]
    fn registered_scopes(&self) -> usize {
        self.0.borrow().registry.borrow().len()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let mut names: Vec<&String> = inner.vars.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("names", &names)
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}
