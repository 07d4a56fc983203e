//! Property-based tests for calculation semantics

use proptest::prelude::*;
use reckon::{CalcError, Calculation, Calculator, Operator};

fn finite() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e9f64..1.0e9,
        (-1_000_000i64..1_000_000).prop_map(|v| v as f64),
    ]
}

fn unsupported_operator() -> impl Strategy<Value = String> {
    "\\PC{1,4}".prop_filter("must not be a supported operator", |s| {
        s.parse::<Operator>().is_err()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// +, - and * never fail and match the native operation
    #[test]
    fn non_division_never_fails(a in finite(), b in finite()) {
        for (op, expected) in [("+", a + b), ("-", a - b), ("*", a * b)] {
            let mut calc = Calculation::new(a, b, op);
            prop_assert_eq!(calc.compute(), Ok(expected));
            prop_assert_eq!(calc.result(), Some(expected));
        }
    }

    /// Division by a non-zero divisor matches native division
    #[test]
    fn division_by_non_zero(a in finite(), b in finite().prop_filter("non-zero", |b| *b != 0.0)) {
        let mut calc = Calculation::new(a, b, "/");
        prop_assert_eq!(calc.compute(), Ok(a / b));
    }

    /// Division by zero always fails carrying both operands
    #[test]
    fn division_by_zero_fails(a in finite()) {
        let mut calc = Calculation::new(a, 0.0, "/");
        prop_assert_eq!(
            calc.compute(),
            Err(CalcError::DivisionByZero { operand1: a, operand2: 0.0 })
        );
        prop_assert!(!calc.is_computed());
    }

    /// Unsupported operators are echoed in the message
    #[test]
    fn unsupported_operator_message(a in finite(), b in finite(), op in unsupported_operator()) {
        let mut calc = Calculation::new(a, b, op.clone());
        let err = calc.compute().unwrap_err();
        prop_assert!(err.message().contains(&op));
        prop_assert_eq!(err.message(), format!("Unsupported operation: {op}"));
    }

    /// The formatted text always reflects the stored operands and result
    #[test]
    fn formatted_result_matches_fields(a in finite(), b in finite()) {
        let mut calc = Calculation::new(a, b, "*");
        let value = calc.compute().unwrap();
        prop_assert_eq!(calc.formatted_result().unwrap(), format!("{a} * {b} = {value}"));
    }

    /// History length grows only with successful calculations
    #[test]
    fn history_counts_successes(ops in proptest::collection::vec(("[-+*/%]", finite(), finite()), 0..32)) {
        let mut calculator = Calculator::new();
        let mut successes = 0;
        for (op, a, b) in &ops {
            if calculator.calculate(*a, *b, op).is_ok() {
                successes += 1;
            }
        }
        prop_assert_eq!(calculator.history().len(), successes);
    }
}
