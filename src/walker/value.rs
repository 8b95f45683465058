use std::{fmt, rc::Rc};
use internment::Intern;
use super::{env::Env, AbstractMachine, ExecError};

/// An interned symbol name. Two symbols are equal exactly when their text is.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Intern<String>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Intern::new(name.to_owned()))
    }

    pub fn quote() -> Self {
        Symbol::new("quote")
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Primitives receive their argument forms unevaluated.
pub type PrimitiveFn = fn(&mut AbstractMachine, &Value, &Env) -> Result<Value, ExecError>;

#[derive(Copy, Clone)]
pub struct Primitive {
    pub name: &'static str,
    pub func: PrimitiveFn,
}

pub struct Procedure {
    pub params: Vec<Symbol>,
    pub body: Value,
    pub env: Env,
}

#[derive(Clone)]
pub enum Value {
    Number(i64),
    Bool(bool),
    Symbol(Symbol),
    Pair(Rc<Value>, Rc<Value>),
    Nil,
    Primitive(Primitive),
    Procedure(Rc<Procedure>),
    Undefined,
}

impl Value {
    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Rc::new(car), Rc::new(cdr))
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    /// Build a proper list ending in `Nil`.
    pub fn list(items: impl IntoIterator<Item=Value>) -> Self {
        let items = items.into_iter().collect::<Vec<_>>();
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, item| Value::cons(item, tail))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(false) => false,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::Pair(_, _) => "pair",
            Value::Nil => "nil",
            Value::Primitive(_) => "primitive",
            Value::Procedure(_) => "procedure",
            Value::Undefined => "undefined",
        }
    }

    /// Collect the elements of a proper list, or `None` if this is not one.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        let mut cur = self;
        loop {
            match cur {
                Value::Pair(car, cdr) => {
                    items.push((**car).clone());
                    cur = &**cdr;
                },
                Value::Nil => return Some(items),
                _ => return None,
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(car_a, cdr_a), Value::Pair(car_b, cdr_b)) => car_a == car_b && cdr_a == cdr_b,
            (Value::Nil, Value::Nil) => true,
            (Value::Primitive(a), Value::Primitive(b)) => a.name == b.name,
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{}", x),
            Value::Bool(x) => write!(f, "{}", if *x { "#t" } else { "#f" }),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Nil => write!(f, "()"),
            Value::Primitive(_) => write!(f, "<function>"),
            Value::Procedure(_) => write!(f, "<procedure>"),
            Value::Undefined => write!(f, "<undefined>"),
            Value::Pair(car, cdr) => {
                write!(f, "({}", car)?;
                let mut tail = &**cdr;
                loop {
                    match tail {
                        Value::Pair(car, cdr) => {
                            write!(f, " {}", car)?;
                            tail = &**cdr;
                        },
                        Value::Nil => break,
                        other => {
                            write!(f, " . {}", other)?;
                            break;
                        },
                    }
                }
                write!(f, ")")
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "Number({})", x),
            Value::Bool(x) => write!(f, "Bool({})", x),
            Value::Symbol(sym) => write!(f, "Symbol({})", sym),
            Value::Pair(_, _) => write!(f, "Pair{}", self),
            Value::Nil => write!(f, "Nil"),
            Value::Primitive(prim) => write!(f, "Primitive({})", prim.name),
            Value::Procedure(procedure) => write!(f, "Procedure({:?})", procedure.params),
            Value::Undefined => write!(f, "Undefined"),
        }
    }
}
