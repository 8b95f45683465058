#![allow(dead_code)]

use pr7rs::{Config, Engine, EngineError, FailureKind, Value};

pub fn run(code: &str) -> Result<Value, EngineError> {
    Engine::default().execute(code)
}

/// Evaluate and render the result the way the command line prints it.
pub fn run_str(code: &str) -> String {
    match run(code) {
        Ok(value) => value.to_string(),
        Err(err) => panic!("evaluating {:?} failed: {}", code, err),
    }
}

pub fn failure(code: &str) -> FailureKind {
    match run(code) {
        Ok(value) => panic!("evaluating {:?} unexpectedly gave {}", code, value),
        Err(err) => err.kind(),
    }
}

/// Run several programs in order against one engine, returning the last result.
pub fn run_session(programs: &[&str]) -> Result<Value, EngineError> {
    let mut engine = Engine::new(Config::default());
    let mut last = Ok(Value::Undefined);
    for code in programs {
        last = engine.execute(code);
        if last.is_err() {
            break;
        }
    }
    last
}
