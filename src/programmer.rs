use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::errors::*;

/// Numeral bases the programmer mode works in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    Bin,
    Oct,
    Dec,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Bin => 2,
            Base::Oct => 8,
            Base::Dec => 10,
            Base::Hex => 16,
        }
    }

    pub fn from_radix(radix: u32) -> Result<Base, CalcError> {
        match radix {
            2 => Ok(Base::Bin),
            8 => Ok(Base::Oct),
            10 => Ok(Base::Dec),
            16 => Ok(Base::Hex),
            _ => Err(CalcError::InvalidBase(radix)),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Base::Bin => "0b",
            Base::Oct => "0o",
            Base::Dec => "",
            Base::Hex => "0x",
        }
    }

    /// Whether a key glyph is a valid digit in this base
    pub fn is_digit(self, c: char) -> bool {
        c.is_digit(self.radix())
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Base::Bin => "BIN",
            Base::Oct => "OCT",
            Base::Dec => "DEC",
            Base::Hex => "HEX",
        };
        write!(f, "{}", name)
    }
}

/// Width of the integer register
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum WordSize {
    Byte,
    Word,
    DWord,
    QWord,
}

impl WordSize {
    pub fn bits(self) -> u32 {
        match self {
            WordSize::Byte => 8,
            WordSize::Word => 16,
            WordSize::DWord => 32,
            WordSize::QWord => 64,
        }
    }
}

impl TryFrom<u32> for WordSize {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(WordSize::Byte),
            16 => Ok(WordSize::Word),
            32 => Ok(WordSize::DWord),
            64 => Ok(WordSize::QWord),
            _ => Err(format!("word size must be 8, 16, 32 or 64 bits, got {}", bits)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
}

impl BitwiseOp {
    pub fn is_unary(self) -> bool {
        self == BitwiseOp::Not
    }
}

impl fmt::Display for BitwiseOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            BitwiseOp::And => "AND",
            BitwiseOp::Or => "OR",
            BitwiseOp::Xor => "XOR",
            BitwiseOp::Not => "NOT",
            BitwiseOp::Shl => "<<",
            BitwiseOp::Shr => ">>",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BitwiseOp {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" | "&" => Ok(BitwiseOp::And),
            "OR" | "|" => Ok(BitwiseOp::Or),
            "XOR" | "^" => Ok(BitwiseOp::Xor),
            "NOT" | "~" => Ok(BitwiseOp::Not),
            "SHL" | "<<" => Ok(BitwiseOp::Shl),
            "SHR" | ">>" => Ok(BitwiseOp::Shr),
            _ => Err(CalcError::InvalidExpression(format!("unknown bitwise operator '{}'", s))),
        }
    }
}

/// Fixed-width integer arithmetic. Every result is reduced modulo
/// 2^word_size bits, so it always fits the active register
#[derive(Clone, Debug)]
pub struct IntegerEngine {
    pub word_size: WordSize,
    pub signed: bool,
}

impl Default for IntegerEngine {
    fn default() -> Self {
        IntegerEngine {
            word_size: WordSize::QWord,
            signed: true,
        }
    }
}

impl IntegerEngine {
    pub fn new(word_size: WordSize, signed: bool) -> Self {
        IntegerEngine { word_size, signed }
    }

    fn modulus(&self) -> BigInt {
        BigInt::one() << self.word_size.bits()
    }

    /// Reduces a value into `[0, 2^bits)`
    pub fn wrap(&self, v: &BigInt) -> BigInt {
        let m = self.modulus();
        let r = v % &m;
        if r.is_negative() {
            r + m
        } else {
            r
        }
    }

    /// Two's complement reading of a wrapped value. Unsigned context returns
    /// the value unchanged
    pub fn to_signed(&self, v: &BigInt) -> BigInt {
        let v = self.wrap(v);
        if !self.signed {
            return v;
        }
        let half = BigInt::one() << (self.word_size.bits() - 1);
        if v >= half {
            v - self.modulus()
        } else {
            v
        }
    }

    /// Parses an integer written in the given base.
    /// Accepted: surrounding spaces, a sign, the base prefix (`0b`, `0o`,
    /// `0x`) and `_` between digits. The value is not wrapped
    pub fn parse(&self, text: &str, base: Base) -> Result<BigInt, CalcError> {
        let err = || CalcError::StrToInt(text.to_owned(), base.radix());
        let s = text.trim().replace('_', "");
        let (neg, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest.to_owned()),
            None => (false, s.trim_start_matches('+').to_owned()),
        };
        let prefix = base.prefix();
        let digits = if !prefix.is_empty() && s.to_lowercase().starts_with(prefix) {
            &s[prefix.len()..]
        } else {
            &s[..]
        };
        if digits.is_empty() || !digits.chars().all(|c| base.is_digit(c)) {
            return Err(err());
        }
        let v = BigInt::parse_bytes(digits.as_bytes(), base.radix()).ok_or_else(err)?;
        Ok(if neg { -v } else { v })
    }

    /// Wraps the value and writes it without a prefix, hex digits uppercase
    pub fn render(&self, v: &BigInt, base: Base) -> String {
        self.wrap(v).to_str_radix(base.radix()).to_uppercase()
    }

    /// Display text of a register value. Signed decimal shows the two's
    /// complement reading, other bases show the raw bits
    pub fn format(&self, v: &BigInt, base: Base) -> String {
        if self.signed && base == Base::Dec {
            self.to_signed(v).to_string()
        } else {
            self.render(v, base)
        }
    }

    pub fn convert_base(&self, text: &str, from: Base, to: Base) -> Result<String, CalcError> {
        let v = self.parse(text, from)?;
        let out = self.render(&v, to);
        trace!(input = text, %from, %to, output = %out, "base converted");
        Ok(out)
    }

    /// Applies a bitwise operator. `b` is ignored by NOT and is the shift
    /// count for SHL and SHR
    pub fn bitwise_op(&self, a: &BigInt, b: &BigInt, op: BitwiseOp) -> Result<BigInt, CalcError> {
        let bits = self.word_size.bits() as usize;
        let res = match op {
            BitwiseOp::And => a & b,
            BitwiseOp::Or => a | b,
            BitwiseOp::Xor => a ^ b,
            BitwiseOp::Not => !a,
            BitwiseOp::Shl | BitwiseOp::Shr => {
                if b.sign() == Sign::Minus {
                    return Err(CalcError::InvalidShift(b.to_string()));
                }
                // anything shifted past the register (or past the value) is lost anyway
                let limit = if op == BitwiseOp::Shl { bits } else { a.bits() as usize + 1 };
                let shift = b.to_usize().map_or(limit, |s| s.min(limit));
                if op == BitwiseOp::Shl {
                    a << shift
                } else {
                    a >> shift
                }
            }
        };
        Ok(self.wrap(&res))
    }
}
