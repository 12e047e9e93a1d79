use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

use crate::errors::*;

/// Expression calculation result: either value or error
pub type CalcResult = Result<Value, CalcError>;

/// Number of significant decimal digits every result is rounded to
pub const PRECISION: u64 = 50;
// intermediate steps of a power series keep a few guard digits
const WORK_PRECISION: u64 = PRECISION + 10;

// bounds that keep a single evaluation fast
const MAX_FACTORIAL: u64 = 3000;
const MAX_POWER: u64 = 100_000;
const MAX_POWER_BITS: u64 = 130_000;
// decimal exponent limit of any value, in both directions
const MAX_EXPONENT: i64 = 40_000;

pub(crate) const PI_STR: &str = "3.1415926535897932384626433832795028841971693993751";
pub(crate) const E_STR: &str = "2.7182818284590452353602874713526624977572470936999";

/// Arbitrary precision decimal number
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Value(BigDecimal);

fn trim_digits(d: BigDecimal, prec: u64) -> BigDecimal {
    if d.digits() > prec {
        d.with_prec(prec)
    } else {
        d
    }
}

/// Keeps a number inside the supported magnitude: too large values are an
/// error, values too close to zero underflow to zero
fn bounded(d: BigDecimal, op: &str) -> Result<BigDecimal, CalcError> {
    if d.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let exp = d.digits() as i64 - 1 - d.fractional_digit_count();
    if exp > MAX_EXPONENT {
        Err(CalcError::TooLarge(op.to_owned()))
    } else if exp < -MAX_EXPONENT {
        Ok(BigDecimal::zero())
    } else {
        Ok(d)
    }
}

macro_rules! float_fn {
    ($id:ident) => {
        pub fn $id(self) -> CalcResult {
            let f = self.to_f64()?;
            Value::from_f64(f.$id(), stringify!($id))
        }
    };
}

macro_rules! float_fn_range {
    ($id:ident, $lo:expr, $hi:expr, $range:expr) => {
        pub fn $id(self) -> CalcResult {
            let f = self.to_f64()?;
            if f < $lo || f > $hi {
                return Err(CalcError::ArgumentOutOfRange(
                    stringify!($id).to_owned(),
                    self.to_string(),
                    $range.to_owned(),
                ));
            }
            Value::from_f64(f.$id(), stringify!($id))
        }
    };
}

macro_rules! positive_log {
    ($id:ident, $fname:expr) => {
        pub fn $id(self) -> CalcResult {
            let f = self.to_f64()?;
            if f <= 0.0 {
                return Err(CalcError::ArgumentOutOfRange($fname.to_owned(), self.to_string(), "x > 0".to_owned()));
            }
            Value::from_f64(f.$id(), $fname)
        }
    };
}

impl Default for Value {
    fn default() -> Value {
        Value(BigDecimal::zero())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value(BigDecimal::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value(BigDecimal::new(i, 0))
    }
}

impl FromStr for Value {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult {
        Value::from_str_number(s)
    }
}

impl Value {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn pi() -> Self {
        Value(BigDecimal::from_str(PI_STR).unwrap_or_default())
    }

    pub fn e() -> Self {
        Value(BigDecimal::from_str(E_STR).unwrap_or_default())
    }

    /// Convert &str to a decimal number
    /// Supported formats:
    /// * Integer - `1234`
    /// * Decimal fraction - `12.5`, `.5`, `5.`
    /// * With exponent - `1.02e-5`
    ///
    /// For convenience digits can be separated with underscores:
    /// `3_005.245_1` is the same as `3005.2451`
    pub fn from_str_number(s: &str) -> CalcResult {
        let s = s.trim().replace('_', "");
        let s = if s.ends_with('.') { format!("{}0", s) } else { s };
        let s = if s.starts_with('.') { format!("0{}", s) } else { s };
        match BigDecimal::from_str(&s) {
            Ok(d) => Ok(Value(bounded(d, &s)?)),
            Err(..) => Err(CalcError::StrToNumber(s)),
        }
    }

    /// Imports a double. The shortest text that round-trips the double is
    /// used, so `0.1f64` becomes exactly `0.1`
    pub fn from_f64(f: f64, op: &str) -> CalcResult {
        if !f.is_finite() {
            return Err(CalcError::NotFinite(op.to_owned()));
        }
        let mut buf = dtoa::Buffer::new();
        let s = buf.format_finite(f);
        match BigDecimal::from_str(s) {
            Ok(d) => Ok(Value(d)),
            Err(..) => Err(CalcError::StrToNumber(s.to_owned())),
        }
    }

    pub fn to_f64(&self) -> Result<f64, CalcError> {
        match self.0.to_f64() {
            Some(f) if f.is_finite() => Ok(f),
            _ => Err(CalcError::TooLarge(self.to_string())),
        }
    }

    /// Integer part of the number, the fraction is truncated
    pub fn to_bigint(&self) -> BigInt {
        let (i, _) = self.0.with_scale(0).as_bigint_and_exponent();
        i
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    fn rounded(self, op: &str) -> CalcResult {
        Ok(Value(bounded(trim_digits(self.0, PRECISION), op)?))
    }

    /// Plain notation (never exponent form) without trailing zeros
    pub fn render(&self) -> String {
        if self.0.is_zero() {
            return "0".to_owned();
        }
        let (digits, scale) = self.0.normalized().as_bigint_and_exponent();
        let neg = digits.is_negative();
        let digits = digits.abs().to_string();
        let mut out = String::new();
        if neg {
            out.push('-');
        }
        if scale <= 0 {
            out.push_str(&digits);
            out.push_str(&"0".repeat((-scale) as usize));
        } else {
            let scale = scale as usize;
            if digits.len() > scale {
                let (int_part, frac_part) = digits.split_at(digits.len() - scale);
                out.push_str(int_part);
                out.push('.');
                out.push_str(frac_part);
            } else {
                out.push_str("0.");
                out.push_str(&"0".repeat(scale - digits.len()));
                out.push_str(&digits);
            }
        }
        out
    }

    // ---------------- arithmetic ----------------

    pub fn addition(self, rhs: Value) -> CalcResult {
        Value(self.0 + rhs.0).rounded("+")
    }

    pub fn subtract(self, rhs: Value) -> CalcResult {
        Value(self.0 - rhs.0).rounded("-")
    }

    pub fn multiply(self, rhs: Value) -> CalcResult {
        Value(self.0 * rhs.0).rounded("*")
    }

    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(self.to_string()));
        }
        Value(self.0 / rhs.0).rounded("/")
    }

    /// Remainder with the sign of the divisor: `-7 % 3 == 2`
    pub fn reminder(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(self.to_string()));
        }
        let q = &self.0 / &rhs.0;
        let mut whole = q.with_scale(0);
        if whole > q {
            whole -= BigDecimal::one();
        }
        Value(self.0 - whole * rhs.0).rounded("%")
    }

    pub fn negate(self) -> CalcResult {
        Ok(Value(-self.0))
    }

    pub fn abs(self) -> CalcResult {
        Ok(Value(self.0.abs()))
    }

    pub fn sqr(self) -> CalcResult {
        let v = self.clone();
        self.multiply(v)
    }

    pub fn reciprocal(self) -> CalcResult {
        Value::from(1).divide(self)
    }

    pub fn percent(self) -> CalcResult {
        self.divide(Value::from(100))
    }

    /// Degrees to radians
    pub fn rad(self) -> CalcResult {
        self.multiply(Value::pi())?.divide(Value::from(180))
    }

    fn fast_power(self, pow: u64) -> CalcResult {
        let mut pow = pow;
        let mut res = BigDecimal::one();
        let mut base = self.0;
        while pow > 0 {
            if pow % 2 == 0 {
                pow /= 2;
                base = trim_digits(&base * &base, WORK_PRECISION);
            } else {
                pow -= 1;
                res = trim_digits(&res * &base, WORK_PRECISION);
            }
        }
        Value(res).rounded("**")
    }

    /// Raises a number into arbitrary power.
    /// Integer base with non-negative integer power is calculated exactly,
    /// other integer powers use fast exponentiation, and fractional powers
    /// are calculated in double precision
    pub fn power(self, rhs: Value) -> CalcResult {
        if rhs.is_integer() {
            let n = rhs.to_bigint();
            if self.is_zero() && n.is_negative() {
                return Err(CalcError::DividedByZero(self.to_string()));
            }
            let e = match n.abs().to_u64() {
                Some(e) if e <= MAX_POWER => e,
                _ => return Err(CalcError::TooLarge("**".to_owned())),
            };
            if self.is_integer() && !n.is_negative() {
                let base = self.to_bigint();
                if base.bits().saturating_mul(e) > MAX_POWER_BITS {
                    return Err(CalcError::TooLarge("**".to_owned()));
                }
                // the bit limit keeps the result inside MAX_EXPONENT
                return Ok(Value::from(base.pow(e as u32)));
            }
            let v = self.fast_power(e)?;
            if n.is_negative() {
                return Value::from(1).divide(v);
            }
            return Ok(v);
        }

        let base = self.to_f64()?;
        let pow = rhs.to_f64()?;
        if base < 0.0 {
            return Err(CalcError::ArgumentOutOfRange(
                "**".to_owned(),
                self.to_string(),
                "fractional power of a negative number".to_owned(),
            ));
        }
        if base == 0.0 && pow < 0.0 {
            return Err(CalcError::DividedByZero(self.to_string()));
        }
        Value::from_f64(base.powf(pow), "**")
    }

    pub fn sqrt(self) -> CalcResult {
        if self.is_negative() {
            return Err(CalcError::NotForNegative("sqrt".to_owned()));
        }
        if self.is_integer() {
            let i = self.to_bigint();
            let sq = i.sqrt();
            if &sq * &sq == i {
                return Ok(Value::from(sq));
            }
        }
        match self.0.sqrt() {
            Some(d) => Value(d).rounded("sqrt"),
            None => Err(CalcError::NotForNegative("sqrt".to_owned())),
        }
    }

    /// Returns factorial of a non-negative integer number.
    /// The result is exact
    pub fn fact(self) -> CalcResult {
        if !self.is_integer() {
            return Err(CalcError::OnlyInt("factorial".to_owned()));
        }
        if self.is_negative() {
            return Err(CalcError::NotForNegative("factorial".to_owned()));
        }
        let n = match self.to_bigint().to_u64() {
            Some(n) if n <= MAX_FACTORIAL => n,
            _ => return Err(CalcError::TooLarge("factorial".to_owned())),
        };
        let mut res = BigInt::one();
        for i in 2..=n {
            res *= i;
        }
        Ok(Value::from(res))
    }

    float_fn!(sin);
    float_fn!(cos);
    float_fn!(tan);
    float_fn_range!(asin, -1.0, 1.0, "-1..1");
    float_fn_range!(acos, -1.0, 1.0, "-1..1");
    float_fn!(atan);

    float_fn!(sinh);
    float_fn!(cosh);
    float_fn!(tanh);
    float_fn!(asinh);
    float_fn_range!(acosh, 1.0, f64::INFINITY, "x >= 1");
    pub fn atanh(self) -> CalcResult {
        let f = self.to_f64()?;
        if f <= -1.0 || f >= 1.0 {
            return Err(CalcError::ArgumentOutOfRange("atanh".to_owned(), self.to_string(), "-1 < x < 1".to_owned()));
        }
        Value::from_f64(f.atanh(), "atanh")
    }

    float_fn!(exp);
    positive_log!(ln, "ln");
    positive_log!(log10, "log10");

    /// Logarithm of a number for an arbitrary base
    pub fn log(self, base: Value) -> CalcResult {
        let b = base.clone().ln()?;
        if b.is_zero() {
            return Err(CalcError::DividedByZero(format!("log base {}", base)));
        }
        self.ln()?.divide(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Value {
        Value::from_str_number(s).unwrap()
    }

    #[test]
    fn test_number_str() {
        assert_eq!(num("1234"), Value::from(1234));
        assert_eq!(num("1_000"), Value::from(1000));
        assert_eq!(num("12e2"), Value::from(1200));
        assert_eq!(num(".5").to_string(), "0.5");
        assert_eq!(num("5.").to_string(), "5");
        assert!(Value::from_str_number("1.2.3").is_err());
        assert!(Value::from_str_number("abc").is_err());
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::from(14).to_string(), "14");
        assert_eq!(num("1200").to_string(), "1200");
        assert_eq!(num("2.50").to_string(), "2.5");
        assert_eq!(num("-0.0012").to_string(), "-0.0012");
        assert_eq!(num("1e-5").to_string(), "0.00001");
        assert_eq!(num("-3e3").to_string(), "-3000");
        assert_eq!(Value::new().to_string(), "0");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Value::from_f64(0.1, "t").unwrap().to_string(), "0.1");
        assert_eq!(Value::from_f64(1609.344, "t").unwrap().to_string(), "1609.344");
        assert_eq!(Value::from_f64(f64::NAN, "t"), Err(CalcError::NotFinite("t".to_owned())));
        assert_eq!(Value::from_f64(f64::INFINITY, "t"), Err(CalcError::NotFinite("t".to_owned())));
    }

    #[test]
    fn test_arith() {
        let v = num("0.1").addition(num("0.2"));
        assert_eq!(v, Ok(num("0.3")));
        let v = num("5").subtract(num("7.5"));
        assert_eq!(v, Ok(num("-2.5")));
        let v = num("1.5").multiply(num("4"));
        assert_eq!(v, Ok(Value::from(6)));
        let v = Value::from(1).divide(Value::from(0));
        assert_eq!(v, Err(CalcError::DividedByZero("1".to_owned())));
        let v = Value::from(10).divide(Value::from(4));
        assert_eq!(v, Ok(num("2.5")));
    }

    #[test]
    fn test_div_precision() {
        let v = Value::from(1).divide(Value::from(3)).unwrap();
        let s = v.to_string();
        assert!(s.starts_with("0.3333333333"));
        // 50 significant digits after the leading zero
        assert_eq!(s.len(), 2 + PRECISION as usize);
    }

    #[test]
    fn test_reminder() {
        assert_eq!(Value::from(7).reminder(Value::from(3)), Ok(Value::from(1)));
        assert_eq!(Value::from(-7).reminder(Value::from(3)), Ok(Value::from(2)));
        assert_eq!(num("5.5").reminder(Value::from(2)), Ok(num("1.5")));
        assert!(Value::from(7).reminder(Value::from(0)).is_err());
    }

    #[test]
    fn test_power() {
        assert_eq!(Value::from(2).power(Value::from(10)), Ok(Value::from(1024)));
        assert_eq!(
            Value::from(2).power(Value::from(100)).unwrap().to_string(),
            "1267650600228229401496703205376"
        );
        assert_eq!(Value::from(2).power(Value::from(-2)), Ok(num("0.25")));
        assert_eq!(num("1.5").power(Value::from(2)), Ok(num("2.25")));
        assert_eq!(Value::from(9).power(num("0.5")), Ok(Value::from(3)));
        assert!(Value::from(0).power(Value::from(-1)).is_err());
        assert!(Value::from(-8).power(num("0.5")).is_err());
        assert_eq!(Value::from(2).power(Value::from(10_000_000)), Err(CalcError::TooLarge("**".to_owned())));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(Value::from(9).sqrt(), Ok(Value::from(3)));
        let v = Value::from(2).sqrt().unwrap();
        assert!(v.to_string().starts_with("1.41421356237309504880168872420969807856967187537"));
        assert_eq!(Value::from(-1).sqrt(), Err(CalcError::NotForNegative("sqrt".to_owned())));
    }

    #[test]
    fn test_factorial() {
        assert_eq!(Value::from(0).fact(), Ok(Value::from(1)));
        assert_eq!(Value::from(5).fact(), Ok(Value::from(120)));
        assert_eq!(num("3.0").fact(), Ok(Value::from(6)));
        assert_eq!(
            Value::from(25).fact().unwrap().to_string(),
            "15511210043330985984000000"
        );
        assert_eq!(num("2.5").fact(), Err(CalcError::OnlyInt("factorial".to_owned())));
        assert_eq!(Value::from(-3).fact(), Err(CalcError::NotForNegative("factorial".to_owned())));
        assert_eq!(Value::from(100_000).fact(), Err(CalcError::TooLarge("factorial".to_owned())));
    }

    #[test]
    fn test_logs() {
        let v = Value::from(1000).log10().unwrap().to_f64().unwrap();
        assert!((v - 3.0).abs() < 1e-12);
        assert_eq!(Value::from(1).ln(), Ok(Value::from(0)));
        assert!(Value::from(0).ln().is_err());
        assert!(Value::from(-5).log10().is_err());
        assert_eq!(Value::from(8).log(Value::from(2)).unwrap().to_f64().unwrap().round(), 3.0);
        assert!(Value::from(8).log(Value::from(1)).is_err());
    }

    #[test]
    fn test_trigonometry() {
        let v = Value::from_f64(0.5, "t").unwrap();
        let r = v.clone().sin().unwrap().asin().unwrap();
        assert!((r.to_f64().unwrap() - 0.5).abs() < 1e-12);
        assert!(Value::from(2).asin().is_err());
        assert!(Value::from(0).acosh().is_err());
        assert!(Value::from(1).atanh().is_err());
        let r = Value::from(180).rad().unwrap();
        assert!(r.to_string().starts_with("3.14159265358979323846"));
    }

    #[test]
    fn test_magnitude_limit() {
        assert_eq!(
            Value::from_str_number("1e999999999"),
            Err(CalcError::TooLarge("1e999999999".to_owned()))
        );
        assert_eq!(num("1e40000").to_string().len(), 40001);
        assert_eq!(num("1e-999999999"), Value::new());
        assert_eq!(num("0e-999999999").to_string(), "0");

        let big = num("1e39999");
        assert_eq!(big.clone().multiply(Value::from(100)), Err(CalcError::TooLarge("*".to_owned())));
        assert!(num("1.5").power(Value::from(100_000)).is_ok());
        let chained = num("1.5").power(Value::from(100_000)).unwrap().power(Value::from(100_000));
        assert_eq!(chained, Err(CalcError::TooLarge("**".to_owned())));
        assert!(!Value::from(1).divide(big.clone()).unwrap().is_zero());
        assert_eq!(Value::from(1).divide(big).unwrap().divide(num("1e10")), Ok(Value::new()));
        assert_eq!(Value::from(2).power(Value::from(99_999)), Err(CalcError::TooLarge("**".to_owned())));
    }

    #[test]
    fn test_exp_overflow() {
        assert_eq!(Value::from(1000).exp(), Err(CalcError::NotFinite("exp".to_owned())));
    }
}
