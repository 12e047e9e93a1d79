//! # Multi-mode calculator core
//!
//! The crate contains the engines behind a desktop-style calculator and a
//! keypad state machine that drives them:
//! * [`parse::evaluate`] - safe evaluation of a textual arithmetic expression
//! * [`programmer::IntegerEngine`] - fixed-width integers: base conversion and bitwise operators
//! * [`convert::Catalog`] - unit conversion tables (plus [`plugins`] and [`currency`])
//! * [`session::CalculatorSession`] - keypad input, memory register, error state and history
//!
//! Expressions are evaluated with decimal numbers of 50 significant digits,
//! so `0.1 + 0.2` is exactly `0.3`. Only a fixed set of functions and
//! constants is reachable: anything else is an error, never code.
//!
//! The list of supported functions:
//! * trigonometric functions (including inverted ones): sin, cos, tan, asin, acos, atan
//! * hyperbolic functions (including inverted ones): sinh, cosh, tanh, asinh, acosh, atanh
//! * logarithms: log (natural, or `log(x, base)`), ln, log10
//! * sqrt, exp, abs, factorial
//! * power: pow(x, y)
//!
//! Trigonometric functions take radians: `sin(pi/2)` returns `1`. The
//! session keypad takes degrees.
//!
//! Operators (starting from highest priority):
//! * `!` - factorial (when used after a number or closing bracket)
//! * `**` - power, right-associative
//! * `-`, `+` - unary minus and plus
//! * `*`, `/`, `%` - multiplication, division, modulo
//! * `+`, `-` - addition, subtraction
//!
//! Display glyphs are accepted as well: `×`, `÷`, `−`, `π`, `ℯ`, `²` and `√`.
//!
//! Predefined constants:
//! * `PI` - 3.14159...
//! * `E` - 2.71828...
//!
//! Function and constant names are case-insensitive.

#[macro_use]
extern crate pest_derive;

pub mod ast;
pub mod config;
pub mod convert;
pub mod currency;
pub mod errors;
pub mod funcs;
pub mod history;
pub mod parse;
pub mod plugins;
pub mod programmer;
mod proptests;
pub mod session;
pub mod value;

pub use config::{ConfigError, SessionConfig};
pub use convert::Catalog;
pub use errors::{CalcError, ErrorKind};
pub use history::{Evaluation, History};
pub use parse::evaluate;
pub use programmer::{Base, BitwiseOp, IntegerEngine, WordSize};
pub use session::{CalculatorSession, Key, Mode};
pub use value::Value;
