pub mod builtins;
pub mod env;
pub mod value;

use std::rc::Rc;
use log::trace;
use thiserror::Error;
use self::{
    env::Env,
    value::{Procedure, Value},
};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ExecError {
    #[error("unbound symbol `{0}`")]
    Unbound(String),
    #[error("{op}: expected {expected}, found {found}")]
    TypeMismatch {
        op: String,
        expected: &'static str,
        found: String,
    },
    #[error("`{0}` is already defined in this scope")]
    Redefinition(String),
    #[error("{op}: expected {expected} argument(s), found {found}")]
    Arity {
        op: String,
        expected: String,
        found: usize,
    },
    #[error("{op}: {reason}")]
    BadForm {
        op: String,
        reason: &'static str,
    },
    #[error("{0} is not applicable")]
    NotApplicable(String),
    #[error("{0}: integer overflow")]
    Overflow(&'static str),
    #[error("recursion depth exceeded the limit of {0}")]
    RecursionLimit(usize),
}

impl ExecError {
    pub fn type_mismatch(op: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        ExecError::TypeMismatch {
            op: op.into(),
            expected,
            found: found.to_string(),
        }
    }

    pub fn arity(op: impl Into<String>, expected: impl Into<String>, found: usize) -> Self {
        ExecError::Arity {
            op: op.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn bad_form(op: impl Into<String>, reason: &'static str) -> Self {
        ExecError::BadForm {
            op: op.into(),
            reason,
        }
    }
}

/// Tree-walking evaluator. Holds only the bookkeeping needed to guard the host
/// stack; all bindings live in [`Env`] frames.
pub struct AbstractMachine {
    depth: usize,
    max_depth: Option<usize>,
}

impl Default for AbstractMachine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AbstractMachine {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Evaluate `expr` in `env`. In quoted mode the expression is returned as is.
    pub fn eval(&mut self, expr: &Value, env: &Env, quoted: bool) -> Result<Value, ExecError> {
        if quoted {
            return Ok(expr.clone());
        }

        match expr {
            Value::Number(_)
            | Value::Bool(_)
            | Value::Nil
            | Value::Primitive(_)
            | Value::Procedure(_)
            | Value::Undefined => Ok(expr.clone()),
            Value::Symbol(sym) => env
                .lookup(*sym)
                .ok_or_else(|| ExecError::Unbound(sym.to_string())),
            Value::Pair(head, tail) => {
                self.enter()?;
                let result = self
                    .eval(head, env, false)
                    .and_then(|func| self.apply(&func, tail, env));
                self.depth -= 1;
                result
            },
        }
    }

    /// Apply an operator to its unevaluated argument forms.
    pub fn apply(&mut self, func: &Value, args: &Value, env: &Env) -> Result<Value, ExecError> {
        match func {
            Value::Primitive(prim) => (prim.func)(self, args, env),
            Value::Procedure(procedure) => self.call(procedure, args, env),
            Value::Number(_)
            | Value::Bool(_)
            | Value::Symbol(_)
            | Value::Pair(_, _)
            | Value::Nil
            | Value::Undefined => Err(ExecError::NotApplicable(func.to_string())),
        }
    }

    /// Evaluate every form of a proper argument list in `env`, left to right.
    pub fn eval_args(&mut self, op: &str, args: &Value, env: &Env) -> Result<Vec<Value>, ExecError> {
        args_of(op, args)?
            .iter()
            .map(|arg| self.eval(arg, env, false))
            .collect()
    }

    fn call(&mut self, procedure: &Rc<Procedure>, args: &Value, env: &Env) -> Result<Value, ExecError> {
        let args = self.eval_args("procedure", args, env)?;
        if args.len() != procedure.params.len() {
            return Err(ExecError::arity("procedure", procedure.params.len().to_string(), args.len()));
        }

        trace!("applying procedure {:?} to {:?}", procedure.params, args);

        let frame = procedure.env.child();
        for (param, arg) in procedure.params.iter().zip(args.into_iter()) {
            frame.bind(*param, arg)?;
        }
        self.eval(&procedure.body, &frame, false)
    }

    fn enter(&mut self) -> Result<(), ExecError> {
        match self.max_depth {
            Some(max) if self.depth >= max => Err(ExecError::RecursionLimit(max)),
            _ => {
                self.depth += 1;
                Ok(())
            },
        }
    }
}

/// Split a form's argument list into its elements, rejecting dotted tails.
pub fn args_of(op: &str, args: &Value) -> Result<Vec<Value>, ExecError> {
    args.to_vec()
        .ok_or_else(|| ExecError::bad_form(op, "argument list is not a proper list"))
}

/// Like [`args_of`] but also checks the number of forms.
pub fn exact_args(op: &str, args: &Value, n: usize) -> Result<Vec<Value>, ExecError> {
    let args = args_of(op, args)?;
    if args.len() == n {
        Ok(args)
    } else {
        Err(ExecError::arity(op, n.to_string(), args.len()))
    }
}
