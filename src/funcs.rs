use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::errors::*;
use crate::value::*;

/// Every function an expression may call. Nothing outside this set is
/// reachable from the evaluator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Log,
    Ln,
    Log10,
    Sqrt,
    Exp,
    Pow,
    Abs,
    Factorial,
}

lazy_static! {
    static ref STD_FUNCS: HashMap<&'static str, Func> = [
        ("sin", Func::Sin),
        ("cos", Func::Cos),
        ("tan", Func::Tan),
        ("asin", Func::Asin),
        ("acos", Func::Acos),
        ("atan", Func::Atan),
        ("sinh", Func::Sinh),
        ("cosh", Func::Cosh),
        ("tanh", Func::Tanh),
        ("asinh", Func::Asinh),
        ("acosh", Func::Acosh),
        ("atanh", Func::Atanh),
        ("log", Func::Log),
        ("ln", Func::Ln),
        ("log10", Func::Log10),
        ("sqrt", Func::Sqrt),
        ("exp", Func::Exp),
        ("pow", Func::Pow),
        ("abs", Func::Abs),
        ("factorial", Func::Factorial),
    ]
    .iter()
    .cloned()
    .collect();
}

/// Returns a constant value by its name
pub fn constant(name: &str) -> Option<Value> {
    match name {
        "pi" => Some(Value::pi()),
        "e" => Some(Value::e()),
        _ => None,
    }
}

impl Func {
    pub fn lookup(name: &str) -> Option<Func> {
        STD_FUNCS.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        STD_FUNCS
            .iter()
            .find(|(_, f)| **f == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// minimal and maximal number of arguments
    fn arity(self) -> (usize, usize) {
        match self {
            Func::Pow => (2, 2),
            Func::Log => (1, 2),
            _ => (1, 1),
        }
    }

    pub fn apply(self, args: Vec<Value>) -> CalcResult {
        let (lo, hi) = self.arity();
        if args.len() < lo || args.len() > hi {
            let expected = if lo == hi { lo.to_string() } else { format!("{}..{}", lo, hi) };
            return Err(CalcError::WrongArgCount(self.name().to_owned(), expected));
        }

        let mut args = args.into_iter();
        // arity is checked above, the first argument always exists
        let v = args.next().unwrap_or_default();
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Asin => v.asin(),
            Func::Acos => v.acos(),
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Asinh => v.asinh(),
            Func::Acosh => v.acosh(),
            Func::Atanh => v.atanh(),
            Func::Log => match args.next() {
                Some(base) => v.log(base),
                None => v.ln(),
            },
            Func::Ln => v.ln(),
            Func::Log10 => v.log10(),
            Func::Sqrt => v.sqrt(),
            Func::Exp => v.exp(),
            Func::Pow => v.power(args.next().unwrap_or_default()),
            Func::Abs => v.abs(),
            Func::Factorial => v.fact(),
        }
    }
}
