use std::rc::Rc;
use super::{
    env::Env,
    exact_args,
    value::{Primitive, PrimitiveFn, Procedure, Symbol, Value},
    AbstractMachine,
    ExecError,
};

const PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("+", add),
    ("-", sub),
    ("*", mul),
    ("=", num_eq),
    ("<", less),
    (">", greater),
    ("if", if_),
    ("quote", quote),
    ("define", define),
    ("lambda", lambda),
    ("car", car),
    ("cdr", cdr),
    ("cons", cons),
    ("list", list),
    ("not", not),
    ("eq?", eq),
    ("boolean?", is_boolean),
    ("number?", is_number),
    ("procedure?", is_procedure),
    ("null?", is_null),
    ("pair?", is_pair),
    ("symbol?", is_symbol),
];

/// Build the global frame with every primitive bound.
pub fn root_env() -> Env {
    let env = Env::root();
    for &(name, func) in PRIMITIVES {
        let bound = env.bind(Symbol::new(name), Value::Primitive(Primitive { name, func }));
        debug_assert!(bound.is_ok(), "primitive `{}` is listed twice", name);
    }
    env
}

fn numbers(m: &mut AbstractMachine, op: &'static str, args: &Value, env: &Env) -> Result<Vec<i64>, ExecError> {
    m.eval_args(op, args, env)?
        .into_iter()
        .map(|arg| match arg {
            Value::Number(x) => Ok(x),
            other => Err(ExecError::type_mismatch(op, "number", &other)),
        })
        .collect()
}

/// Left fold over at least one number.
fn fold_numbers(
    m: &mut AbstractMachine,
    op: &'static str,
    args: &Value,
    env: &Env,
    f: fn(i64, i64) -> Option<i64>,
) -> Result<Value, ExecError> {
    let nums = numbers(m, op, args, env)?;
    let (first, rest) = nums
        .split_first()
        .ok_or_else(|| ExecError::arity(op, "at least 1", 0))?;
    rest.iter()
        .try_fold(*first, |acc, x| f(acc, *x))
        .map(Value::Number)
        .ok_or(ExecError::Overflow(op))
}

fn add(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    numbers(m, "+", args, env)?
        .into_iter()
        .try_fold(0i64, i64::checked_add)
        .map(Value::Number)
        .ok_or(ExecError::Overflow("+"))
}

fn sub(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    fold_numbers(m, "-", args, env, i64::checked_sub)
}

fn mul(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    fold_numbers(m, "*", args, env, i64::checked_mul)
}

fn compare(
    m: &mut AbstractMachine,
    op: &'static str,
    args: &Value,
    env: &Env,
    f: fn(&i64, &i64) -> bool,
) -> Result<Value, ExecError> {
    let nums = numbers(m, op, args, env)?;
    if nums.is_empty() {
        return Err(ExecError::arity(op, "at least 1", 0));
    }
    Ok(Value::Bool(nums.windows(2).all(|w| f(&w[0], &w[1]))))
}

fn num_eq(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    compare(m, "=", args, env, i64::eq)
}

fn less(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    compare(m, "<", args, env, i64::lt)
}

fn greater(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    compare(m, ">", args, env, i64::gt)
}

fn if_(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    let forms = exact_args("if", args, 3)?;
    if m.eval(&forms[0], env, false)?.is_truthy() {
        m.eval(&forms[1], env, false)
    } else {
        m.eval(&forms[2], env, false)
    }
}

fn quote(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    let forms = exact_args("quote", args, 1)?;
    m.eval(&forms[0], env, true)
}

fn define(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    let forms = exact_args("define", args, 2)?;
    let name = match &forms[0] {
        Value::Symbol(sym) => *sym,
        _ => return Err(ExecError::bad_form("define", "first argument must be a symbol")),
    };
    if env.is_bound_here(name) {
        return Err(ExecError::Redefinition(name.to_string()));
    }
    let value = m.eval(&forms[1], env, false)?;
    env.bind(name, value)?;
    Ok(Value::Undefined)
}

fn lambda(_: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    let forms = exact_args("lambda", args, 2)?;
    let params = forms[0]
        .to_vec()
        .ok_or_else(|| ExecError::bad_form("lambda", "parameters must be a proper list"))?
        .into_iter()
        .map(|param| match param {
            Value::Symbol(sym) => Ok(sym),
            _ => Err(ExecError::bad_form("lambda", "parameters must be symbols")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (i, param) in params.iter().enumerate() {
        if params[..i].contains(param) {
            return Err(ExecError::Redefinition(param.to_string()));
        }
    }

    Ok(Value::Procedure(Rc::new(Procedure {
        params,
        body: forms[1].clone(),
        env: env.clone(),
    })))
}

/// Evaluate the single argument of a one-argument primitive.
fn single(m: &mut AbstractMachine, op: &str, args: &Value, env: &Env) -> Result<Value, ExecError> {
    let forms = exact_args(op, args, 1)?;
    m.eval(&forms[0], env, false)
}

fn car(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    match single(m, "car", args, env)? {
        Value::Pair(car, _) => Ok((*car).clone()),
        other => Err(ExecError::type_mismatch("car", "pair", &other)),
    }
}

fn cdr(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    match single(m, "cdr", args, env)? {
        Value::Pair(_, cdr) => Ok((*cdr).clone()),
        other => Err(ExecError::type_mismatch("cdr", "pair", &other)),
    }
}

fn cons(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    exact_args("cons", args, 2)?;
    let vals = m.eval_args("cons", args, env)?;
    Ok(Value::cons(vals[0].clone(), vals[1].clone()))
}

fn list(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::list(m.eval_args("list", args, env)?))
}

fn not(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(!single(m, "not", args, env)?.is_truthy()))
}

fn eq(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    exact_args("eq?", args, 2)?;
    let vals = m.eval_args("eq?", args, env)?;
    let same = match (&vals[0], &vals[1]) {
        (Value::Pair(car_a, cdr_a), Value::Pair(car_b, cdr_b)) =>
            Rc::ptr_eq(car_a, car_b) && Rc::ptr_eq(cdr_a, cdr_b),
        (a, b) => a == b,
    };
    Ok(Value::Bool(same))
}

fn is_boolean(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "boolean?", args, env)?, Value::Bool(_))))
}

fn is_number(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "number?", args, env)?, Value::Number(_))))
}

fn is_procedure(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "procedure?", args, env)?, Value::Primitive(_) | Value::Procedure(_))))
}

fn is_null(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "null?", args, env)?, Value::Nil)))
}

fn is_pair(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "pair?", args, env)?, Value::Pair(_, _))))
}

fn is_symbol(m: &mut AbstractMachine, args: &Value, env: &Env) -> Result<Value, ExecError> {
    Ok(Value::Bool(matches!(single(m, "symbol?", args, env)?, Value::Symbol(_))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(form: Value) -> Result<Value, ExecError> {
        AbstractMachine::default().eval(&form, &root_env(), false)
    }

    fn call(op: &str, args: Vec<Value>) -> Result<Value, ExecError> {
        eval(Value::cons(Value::symbol(op), Value::list(args)))
    }

    #[test]
    fn every_primitive_is_bound() {
        let env = root_env();
        for (name, _) in PRIMITIVES {
            assert!(env.is_bound_here(Symbol::new(name)), "{} is not bound", name);
        }
        assert!(env.outer().is_none());
    }

    #[test]
    fn primitive_names_are_distinct() {
        let mut names = PRIMITIVES.iter().map(|(name, _)| *name).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PRIMITIVES.len());
    }

    #[test]
    fn arithmetic_folds_left() {
        let nums = |xs: &[i64]| xs.iter().copied().map(Value::Number).collect::<Vec<_>>();
        assert_eq!(call("+", nums(&[1, 2, 3])), Ok(Value::Number(6)));
        assert_eq!(call("+", nums(&[])), Ok(Value::Number(0)));
        assert_eq!(call("-", nums(&[10, 3, 2])), Ok(Value::Number(5)));
        assert_eq!(call("-", nums(&[4])), Ok(Value::Number(4)));
        assert_eq!(call("*", nums(&[2, 3, 4])), Ok(Value::Number(24)));
    }

    #[test]
    fn minus_and_times_need_an_argument() {
        assert_eq!(call("-", vec![]), Err(ExecError::arity("-", "at least 1", 0)));
        assert_eq!(call("*", vec![]), Err(ExecError::arity("*", "at least 1", 0)));
    }

    #[test]
    fn arithmetic_rejects_non_numbers() {
        let err = call("+", vec![Value::Number(1), Value::Bool(true)]).unwrap_err();
        assert!(matches!(err, ExecError::TypeMismatch { expected: "number", .. }));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            call("*", vec![Value::Number(i64::MAX), Value::Number(2)]),
            Err(ExecError::Overflow("*")),
        );
    }

    #[test]
    fn comparisons_chain() {
        let nums = |xs: &[i64]| xs.iter().copied().map(Value::Number).collect::<Vec<_>>();
        assert_eq!(call("<", nums(&[1, 2, 3])), Ok(Value::Bool(true)));
        assert_eq!(call("<", nums(&[1, 3, 2])), Ok(Value::Bool(false)));
        assert_eq!(call("=", nums(&[7, 7])), Ok(Value::Bool(true)));
        assert_eq!(call(">", nums(&[3])), Ok(Value::Bool(true)));
    }

    #[test]
    fn define_binds_in_current_frame() {
        let env = root_env();
        let mut m = AbstractMachine::default();
        let form = Value::list(vec![Value::symbol("define"), Value::symbol("x"), Value::Number(5)]);
        assert_eq!(m.eval(&form, &env, false), Ok(Value::Undefined));
        assert_eq!(env.lookup(Symbol::new("x")), Some(Value::Number(5)));
        assert_eq!(m.eval(&form, &env, false), Err(ExecError::Redefinition("x".into())));
    }

    #[test]
    fn lambda_rejects_duplicate_params() {
        let params = Value::list(vec![Value::symbol("a"), Value::symbol("a")]);
        let err = call("lambda", vec![params, Value::symbol("a")]).unwrap_err();
        assert_eq!(err, ExecError::Redefinition("a".into()));
    }

    #[test]
    fn car_of_non_pair_is_a_type_error() {
        let err = call("car", vec![Value::Number(1)]).unwrap_err();
        assert!(matches!(err, ExecError::TypeMismatch { expected: "pair", .. }));
    }
}
