use calcore::convert::Catalog;
use calcore::errors::ErrorKind;
use calcore::programmer::{Base, BitwiseOp, IntegerEngine, WordSize};
use calcore::{evaluate, Value};
use num_bigint::BigInt;

fn byte_engine() -> IntegerEngine {
    IntegerEngine::new(WordSize::Byte, false)
}

#[test]
fn precedence() {
    assert_eq!(evaluate("2 + 3 * 4"), Ok(Value::from(14)));
    assert_eq!(evaluate("(2 + 3) * 4"), Ok(Value::from(20)));
    assert_eq!(evaluate("2 ** 3 ** 2"), Ok(Value::from(512)));
    assert_eq!(evaluate("-2 ** 2"), Ok(Value::from(-4)));
    assert_eq!(evaluate("3! + 1"), Ok(Value::from(7)));
    assert_eq!(evaluate("7 % 3"), Ok(Value::from(1)));
}

#[test]
fn display_glyphs() {
    assert_eq!(evaluate("6 × 7"), Ok(Value::from(42)));
    assert_eq!(evaluate("9 ÷ 4"), evaluate("2.25"));
    assert_eq!(evaluate("5²"), Ok(Value::from(25)));
    assert_eq!(evaluate("√16 + √(9)"), Ok(Value::from(7)));
}

#[test]
fn decimal_results() {
    assert_eq!(evaluate("0.1 + 0.2").unwrap().render(), "0.3");
    assert_eq!(evaluate("1 / 8").unwrap().render(), "0.125");
    assert_eq!(evaluate("10 / 4").unwrap().render(), "2.5");
}

#[test]
fn evaluation_errors() {
    assert_eq!(evaluate("sqrt(-1)").unwrap_err().kind(), ErrorKind::Domain);
    assert_eq!(evaluate("1 / 0").unwrap_err().kind(), ErrorKind::Domain);
    assert_eq!(evaluate("log(0)").unwrap_err().kind(), ErrorKind::Domain);
    assert_eq!(evaluate("2 +").unwrap_err().kind(), ErrorKind::InvalidExpression);
    assert_eq!(evaluate("").unwrap_err().kind(), ErrorKind::InvalidExpression);
    assert_eq!(evaluate("(1 + 2").unwrap_err().kind(), ErrorKind::InvalidExpression);
}

#[test]
fn huge_magnitudes_are_rejected() {
    for expr in ["1e999999999 + 1", "1e99999999", "1e40001 % 7", "(1.5 ** 100000) ** 100000", "9 ** 99999"] {
        assert_eq!(evaluate(expr).unwrap_err().kind(), ErrorKind::Domain, "{}", expr);
    }
    assert_eq!(evaluate("1e-999999999 + 1"), Ok(Value::from(1)));
    assert_eq!(evaluate("2 ** 1000 / 2 ** 999"), Ok(Value::from(2)));
}

#[test]
fn only_known_names() {
    for expr in [
        "__import__('os')",
        "open(1)",
        "x + 1",
        "sin.__class__",
        "exec(1)",
        "[1, 2]",
        "\"abc\"",
    ] {
        let err = evaluate(expr).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidExpression, "{}", expr);
    }
    assert_eq!(evaluate("SQRT(16) + Pi - PI"), Ok(Value::from(4)));
}

#[test]
fn base_conversion() {
    let e = byte_engine();
    assert_eq!(e.convert_base("FF", Base::Hex, Base::Bin), Ok("11111111".to_owned()));
    assert_eq!(e.convert_base("11111111", Base::Bin, Base::Oct), Ok("377".to_owned()));
    assert_eq!(e.convert_base("300", Base::Dec, Base::Dec), Ok("44".to_owned()));
    assert_eq!(e.convert_base("FG", Base::Hex, Base::Dec).unwrap_err().kind(), ErrorKind::Parse);
}

#[test]
fn bitwise() {
    let e = byte_engine();
    let op = |a: i64, b: i64, op: BitwiseOp| e.bitwise_op(&BigInt::from(a), &BigInt::from(b), op);
    assert_eq!(op(5, 3, BitwiseOp::Xor), Ok(BigInt::from(6)));
    assert_eq!(op(5, 3, BitwiseOp::And), Ok(BigInt::from(1)));
    assert_eq!(op(5, 3, BitwiseOp::Or), Ok(BigInt::from(7)));
    assert_eq!(op(0, 0, BitwiseOp::Not), Ok(BigInt::from(255)));
    assert_eq!(op(1, 8, BitwiseOp::Shl), Ok(BigInt::from(0)));
    assert_eq!(op(128, 7, BitwiseOp::Shr), Ok(BigInt::from(1)));
    assert_eq!(op(1, -1, BitwiseOp::Shl).unwrap_err().kind(), ErrorKind::Domain);

    let signed = IntegerEngine::new(WordSize::Byte, true);
    let not_zero = signed.bitwise_op(&BigInt::from(0), &BigInt::from(0), BitwiseOp::Not).unwrap();
    assert_eq!(signed.to_signed(&not_zero), BigInt::from(-1));
}

#[test]
fn unit_conversion() {
    let cat = Catalog::builtin();
    let f = cat.convert(100.0, "Temperature", "Celsius", "Fahrenheit").unwrap();
    assert!((f - 212.0).abs() < 1e-9);
    let k = cat.convert(32.0, "Temperature", "Fahrenheit", "Kelvin").unwrap();
    assert!((k - 273.15).abs() < 1e-9);
    let m = cat.convert(1.0, "Length", "Miles", "Meters").unwrap();
    assert!((m - 1609.344).abs() < 1e-3);
    let kb = cat.convert(1.0, "Data", "Megabytes", "Kilobytes").unwrap();
    assert!((kb - 1024.0).abs() < 1e-9);

    assert_eq!(
        cat.categories(),
        vec!["Length", "Weight", "Temperature", "Volume", "Time", "Speed", "Data"]
    );
    assert_eq!(cat.units("Temperature").unwrap(), vec!["Celsius", "Fahrenheit", "Kelvin"]);
    assert_eq!(
        cat.convert(1.0, "Energy", "Joules", "Calories").unwrap_err().kind(),
        ErrorKind::UnknownCategoryOrUnit
    );
    assert_eq!(
        cat.convert(1.0, "Temperature", "Celsius", "Rankine").unwrap_err().kind(),
        ErrorKind::UnknownCategoryOrUnit
    );
}
