use std::{cell::RefCell, collections::HashMap, rc::Rc};
use super::{
    value::{Symbol, Value},
    ExecError,
};

struct Frame {
    bindings: RefCell<HashMap<Symbol, Value>>,
    outer: Option<Env>,
}

/// A shared handle to one frame of the scope chain. Cloning the handle does
/// not copy the frame, so closures keep their defining frame alive.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl Env {
    pub fn root() -> Self {
        Env(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        }))
    }

    pub fn child(&self) -> Self {
        Env(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(self.clone()),
        }))
    }

    pub fn outer(&self) -> Option<&Env> {
        self.0.outer.as_ref()
    }

    /// Bind `key` in this frame. A key already bound in this same frame is a
    /// conflict; shadowing a binding of an outer frame is fine.
    pub fn bind(&self, key: Symbol, value: Value) -> Result<(), ExecError> {
        let mut bindings = self.0.bindings.borrow_mut();
        if bindings.contains_key(&key) {
            return Err(ExecError::Redefinition(key.to_string()));
        }
        bindings.insert(key, value);
        Ok(())
    }

    pub fn lookup(&self, key: Symbol) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.0.bindings.borrow().get(&key) {
                return Some(value.clone());
            }
            env = env.outer()?;
        }
    }

    pub fn is_bound_here(&self, key: Symbol) -> bool {
        self.0.bindings.borrow().contains_key(&key)
    }
}
