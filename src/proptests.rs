//! Property-based tests for the engines.

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use proptest::prelude::*;

    use crate::convert::Catalog;
    use crate::parse::evaluate;
    use crate::programmer::{Base, BitwiseOp, IntegerEngine, WordSize};
    use crate::value::Value;

    fn base() -> impl Strategy<Value = Base> {
        prop_oneof![Just(Base::Bin), Just(Base::Oct), Just(Base::Dec), Just(Base::Hex)]
    }

    fn word_size() -> impl Strategy<Value = WordSize> {
        prop_oneof![
            Just(WordSize::Byte),
            Just(WordSize::Word),
            Just(WordSize::DWord),
            Just(WordSize::QWord)
        ]
    }

    fn bitwise_op() -> impl Strategy<Value = BitwiseOp> {
        prop_oneof![
            Just(BitwiseOp::And),
            Just(BitwiseOp::Or),
            Just(BitwiseOp::Xor),
            Just(BitwiseOp::Not),
            Just(BitwiseOp::Shl),
            Just(BitwiseOp::Shr)
        ]
    }

    fn linear_category() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("Length"),
            Just("Weight"),
            Just("Volume"),
            Just("Time"),
            Just("Speed"),
            Just("Data")
        ]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    proptest! {
        #[test]
        fn base_round_trip(v in any::<i64>(), ws in word_size(), signed in any::<bool>(), from in base(), to in base()) {
            let e = IntegerEngine::new(ws, signed);
            let v = BigInt::from(v);
            let text = e.render(&v, from);
            let converted = e.convert_base(&text, from, to).unwrap();
            let back = e.parse(&converted, to).unwrap();
            prop_assert_eq!(back, e.wrap(&v));
        }

        #[test]
        fn bitwise_in_range(a in any::<i64>(), b in 0i64..100, ws in word_size(), op in bitwise_op()) {
            let e = IntegerEngine::new(ws, true);
            let r = e.bitwise_op(&BigInt::from(a), &BigInt::from(b), op).unwrap();
            prop_assert!(r >= BigInt::from(0));
            prop_assert!(r < (BigInt::from(1) << ws.bits()));
        }

        #[test]
        fn xor_self_is_zero(a in any::<u64>(), ws in word_size()) {
            let e = IntegerEngine::new(ws, false);
            let a = BigInt::from(a);
            prop_assert_eq!(e.bitwise_op(&a, &a, BitwiseOp::Xor).unwrap(), BigInt::from(0));
        }

        #[test]
        fn temperature_identity(v in -1000.0f64..1000.0, unit in 0usize..3) {
            let units = Catalog::builtin().units("Temperature").unwrap();
            let u = units[unit];
            let r = Catalog::builtin().convert(v, "Temperature", u, u).unwrap();
            prop_assert!(close(r, v));
        }

        #[test]
        fn linear_round_trip(v in -1.0e6f64..1.0e6, cat in linear_category(), i in 0usize..5, j in 0usize..5) {
            let cat_units = Catalog::builtin().units(cat).unwrap();
            let (from, to) = (cat_units[i], cat_units[j]);
            let there = Catalog::builtin().convert(v, cat, from, to).unwrap();
            let back = Catalog::builtin().convert(there, cat, to, from).unwrap();
            prop_assert!(close(back, v));
        }

        #[test]
        fn evaluation_deterministic(a in -10000i64..10000, b in 1i64..10000, op in prop_oneof![Just('+'), Just('-'), Just('*'), Just('/'), Just('%')]) {
            let expr = format!("{} {} {}", a, op, b);
            prop_assert_eq!(evaluate(&expr), evaluate(&expr));
        }

        #[test]
        fn decimal_sum_is_exact(a in 0i64..100000, b in 0i64..100000) {
            // cents: a/100 + b/100 has no binary rounding error
            let expr = format!("{}.{:02} + {}.{:02}", a / 100, a % 100, b / 100, b % 100);
            let expected = Value::from(a + b).divide(Value::from(100)).unwrap();
            prop_assert_eq!(evaluate(&expr).unwrap(), expected);
        }
    }
}
