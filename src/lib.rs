pub mod config;
pub mod error;
pub mod lex;
pub mod parse;
pub mod util;
pub mod walker;

use log::debug;
use thiserror::Error;

pub use self::{
    config::Config,
    walker::{
        env::Env,
        value::{Symbol, Value},
        AbstractMachine,
        ExecError,
    },
};

/// Which of the failure classes an [`EngineError`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Syntax,
    Unbound,
    Type,
    Redefinition,
    Arity,
    RecursionLimit,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("syntax error: {0}")]
    Syntax(#[from] error::Error),
    #[error("evaluation error: {0}")]
    Exec(#[from] ExecError),
}

impl EngineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::Syntax(_) => FailureKind::Syntax,
            EngineError::Exec(err) => match err {
                ExecError::Unbound(_) => FailureKind::Unbound,
                ExecError::TypeMismatch { .. }
                | ExecError::NotApplicable(_)
                | ExecError::Overflow(_) => FailureKind::Type,
                ExecError::Redefinition(_) => FailureKind::Redefinition,
                ExecError::Arity { .. } | ExecError::BadForm { .. } => FailureKind::Arity,
                ExecError::RecursionLimit(_) => FailureKind::RecursionLimit,
            },
        }
    }

    /// Like `Display`, but syntax errors carry a `line:col` prefix from `code`.
    pub fn in_context(&self, code: &str) -> String {
        match self {
            EngineError::Syntax(err) => format!("syntax error at {}", err.in_context(code)),
            EngineError::Exec(_) => self.to_string(),
        }
    }
}

/// Evaluates one top-level form per call against a global frame that lives as
/// long as the engine.
pub struct Engine {
    config: Config,
    env: Env,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            env: walker::builtins::root_env(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn execute(&mut self, code: &str) -> Result<Value, EngineError> {
        let tokens = lex::lex(code);
        debug!("scanned {} tokens", tokens.len());
        if self.config.dump_tokens {
            lex::print_debug(&tokens, code);
        }

        let ast = parse::parse(&tokens, code)?;
        drop(tokens);
        if self.config.dump_tree {
            parse::print_debug(&ast);
        }

        let result = AbstractMachine::new(self.config.max_depth).eval(&ast, &self.env, false)?;
        debug!("evaluated to {}", result);
        Ok(result)
    }
}
