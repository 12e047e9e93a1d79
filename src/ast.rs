use crate::funcs::Func;
use crate::value::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Factorial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Parsed expression. Leaves are literal numbers, constants are already
/// replaced with their values
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(Value),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    pub fn eval(&self) -> CalcResult {
        match self {
            Expr::Number(v) => Ok(v.clone()),
            Expr::Unary(op, e) => {
                let v = e.eval()?;
                match op {
                    UnaryOp::Neg => v.negate(),
                    UnaryOp::Plus => Ok(v),
                    UnaryOp::Factorial => v.fact(),
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let v1 = lhs.eval()?;
                let v2 = rhs.eval()?;
                match op {
                    BinaryOp::Add => v1.addition(v2),
                    BinaryOp::Sub => v1.subtract(v2),
                    BinaryOp::Mul => v1.multiply(v2),
                    BinaryOp::Div => v1.divide(v2),
                    BinaryOp::Rem => v1.reminder(v2),
                    BinaryOp::Pow => v1.power(v2),
                }
            }
            Expr::Call(f, args) => {
                let args = args.iter().map(Expr::eval).collect::<Result<Vec<_>, _>>()?;
                f.apply(args)
            }
        }
    }
}
