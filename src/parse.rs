use lazy_static::lazy_static;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use regex::Regex;
use tracing::debug;

use crate::ast::*;
use crate::errors::*;
use crate::funcs::{constant, Func};
use crate::value::*;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

// longer input is rejected before it reaches the recursive parser
const MAX_EXPR_LEN: usize = 4096;

lazy_static! {
    static ref PRATT: PrattParser<Rule> = PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left) | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
        .op(Op::infix(Rule::pow, Assoc::Right))
        .op(Op::postfix(Rule::fact));
    static ref SQUARE: Regex = Regex::new(r"(\d+(?:\.\d+)?|\))²").expect("square pattern");
    static ref RADICAL: Regex = Regex::new(r"√(\d+(?:\.\d+)?)").expect("radical pattern");
}

/// Replaces display glyphs with the operators and functions the grammar
/// understands: `×`, `÷`, `−`, `π`, `ℯ`, postfix `²` and radical `√`
pub fn normalize(expr: &str) -> String {
    let s = expr
        .replace('×', "*")
        .replace('÷', "/")
        .replace('−', "-")
        .replace('π', PI_STR)
        .replace('ℯ', E_STR);
    let s = SQUARE.replace_all(&s, "$1**2");
    let s = RADICAL.replace_all(&s, "sqrt($1)");
    s.replace("√(", "sqrt(")
}

fn parse_primary(pair: Pair<Rule>) -> Result<Expr, CalcError> {
    match pair.as_rule() {
        Rule::number => Ok(Expr::Number(Value::from_str_number(pair.as_str())?)),
        Rule::group => match pair.into_inner().next() {
            Some(inner) => parse_expr(inner.into_inner()),
            None => Err(CalcError::EmptyExpression),
        },
        Rule::ident => {
            let name = pair.as_str().to_lowercase();
            if let Some(v) = constant(&name) {
                Ok(Expr::Number(v))
            } else if Func::lookup(&name).is_some() {
                Err(CalcError::InvalidExpression(format!("function '{}' requires arguments in brackets", name)))
            } else {
                Err(CalcError::UnknownIdentifier(name))
            }
        }
        Rule::call => {
            let mut inner = pair.into_inner();
            let name = match inner.next() {
                Some(p) => p.as_str().to_lowercase(),
                None => return Err(CalcError::EmptyExpression),
            };
            let func = match Func::lookup(&name) {
                Some(f) => f,
                None if constant(&name).is_some() => {
                    return Err(CalcError::InvalidExpression(format!("'{}' is not a function", name)));
                }
                None => return Err(CalcError::UnknownIdentifier(name)),
            };
            let mut args = Vec::new();
            if let Some(list) = inner.next() {
                for arg in list.into_inner() {
                    args.push(parse_expr(arg.into_inner())?);
                }
            }
            Ok(Expr::Call(func, args))
        }
        _ => Err(CalcError::InvalidExpression(pair.as_str().to_owned())),
    }
}

fn parse_expr(pairs: Pairs<Rule>) -> Result<Expr, CalcError> {
    PRATT
        .map_primary(parse_primary)
        .map_prefix(|op, rhs| {
            let op = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                _ => UnaryOp::Plus,
            };
            Ok(Expr::Unary(op, Box::new(rhs?)))
        })
        .map_postfix(|lhs, _op| Ok(Expr::Unary(UnaryOp::Factorial, Box::new(lhs?))))
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::rem => BinaryOp::Rem,
                Rule::pow => BinaryOp::Pow,
                _ => return Err(CalcError::InvalidExpression(op.as_str().to_owned())),
            };
            Ok(Expr::Binary(op, Box::new(lhs?), Box::new(rhs?)))
        })
        .parse(pairs)
}

/// Normalizes and parses an expression into a tree without evaluating it
pub fn parse(expr: &str) -> Result<Expr, CalcError> {
    if expr.len() > MAX_EXPR_LEN {
        return Err(CalcError::InvalidExpression("expression is too long".to_owned()));
    }
    let normalized = normalize(expr);
    if normalized.trim().is_empty() {
        return Err(CalcError::EmptyExpression);
    }

    let mut pairs = match CalcParser::parse(Rule::calculation, &normalized) {
        Ok(p) => p,
        Err(e) => {
            let pos = match e.location {
                InputLocation::Pos(p) => p,
                InputLocation::Span((p, _)) => p,
            };
            return Err(CalcError::InvalidExpression(format!("unexpected input at position {}", pos)));
        }
    };
    match pairs.next() {
        Some(p) => parse_expr(p.into_inner()),
        None => Err(CalcError::EmptyExpression),
    }
}

/// evaluates a given expression and returns either result or error
pub fn evaluate(expr: &str) -> CalcResult {
    let res = parse(expr).and_then(|tree| tree.eval());
    match &res {
        Ok(v) => debug!(expression = expr, result = %v, "evaluated"),
        Err(e) => debug!(expression = expr, error = %e, "evaluation failed"),
    }
    res
}
