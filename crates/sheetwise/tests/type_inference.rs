//! Type inference properties over generated columns.
//!
//! INTEGER when every present cell is an `i64`, REAL once any cell needs a
//! float, TEXT as soon as one cell is neither.

use proptest::prelude::*;
use sheetwise::type_mapper::{coerce, infer_sql_type, is_missing};
use sheetwise_db::{SqlType, Value};

/// Finite floats with a fractional part, so they never parse as `i64`.
fn fractional() -> impl Strategy<Value = f64> {
    (-1.0e9f64..1.0e9f64).prop_filter("needs a fractional part", |f| f.fract() != 0.0)
}

/// Words that are neither numbers nor missing markers.
fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,11}".prop_filter("must not read as a number or NA", |w| {
        !is_missing(w) && w.parse::<f64>().is_err()
    })
}

fn infer(cells: &[String]) -> SqlType {
    infer_sql_type(cells.iter().map(String::as_str))
}

#[test]
fn test_known_float_spellings_are_not_text() {
    // "inf" and "nan" spellings parse as floats, hence the filter in word().
    assert_eq!(infer_sql_type(["inf", "1"]), SqlType::Real);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_integer_columns(values in prop::collection::vec(any::<i64>(), 1..40)) {
        let cells: Vec<String> = values.iter().map(i64::to_string).collect();
        prop_assert_eq!(infer(&cells), SqlType::Integer);
    }

    #[test]
    fn test_mixed_columns_are_real(
        ints in prop::collection::vec(any::<i64>(), 0..20),
        floats in prop::collection::vec(fractional(), 1..20),
        rotate in 0usize..40,
    ) {
        let mut cells: Vec<String> = ints.iter().map(i64::to_string).collect();
        cells.extend(floats.iter().map(f64::to_string));
        let shift = rotate % cells.len();
        cells.rotate_left(shift);

        prop_assert_eq!(infer(&cells), SqlType::Real);
    }

    #[test]
    fn test_one_word_makes_text(
        ints in prop::collection::vec(any::<i64>(), 0..20),
        floats in prop::collection::vec(fractional(), 0..20),
        token in word(),
        position in 0usize..41,
    ) {
        let mut cells: Vec<String> = ints.iter().map(i64::to_string).collect();
        cells.extend(floats.iter().map(f64::to_string));
        let position = position % (cells.len() + 1);
        cells.insert(position, token);

        prop_assert_eq!(infer(&cells), SqlType::Text);
    }

    #[test]
    fn test_coerce_keeps_integers(value in any::<i64>()) {
        prop_assert_eq!(coerce(&value.to_string(), SqlType::Integer), Value::Integer(value));
    }

    #[test]
    fn test_coerce_keeps_reals(value in fractional()) {
        prop_assert_eq!(coerce(&value.to_string(), SqlType::Real), Value::Real(value));
    }

    #[test]
    fn test_coerce_keeps_text(token in word()) {
        prop_assert_eq!(coerce(&token, SqlType::Text), Value::Text(token.clone()));
    }
}
