//! Column type inference.
//!
//! A column is `INTEGER` if every present value parses as an `i64`, `REAL` if
//! every present value parses as an `f64`, and `TEXT` otherwise. Missing
//! values are skipped during inference and stored as `NULL`.
//!
//! A whole-number column with gaps therefore stays `INTEGER` with `NULL`
//! cells. Dataframe loaders widen such a column to a float; we deliberately
//! keep the integers exact instead.

use sheetwise_db::{ColumnDescriptor, SqlType, Value};

use crate::tabular::TabularData;

/// Cell contents treated as missing data.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True if the cell holds no value.
pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

/// Tracks which storage types are still possible for one column.
#[derive(Debug, Clone, Default)]
struct TypeTracker {
    seen_value: bool,
    all_integer: bool,
    all_real: bool,
}

impl TypeTracker {
    fn new() -> Self {
        Self {
            seen_value: false,
            all_integer: true,
            all_real: true,
        }
    }

    fn observe(&mut self, value: &str) {
        if is_missing(value) {
            return;
        }
        self.seen_value = true;

        // Once a column is TEXT nothing can bring it back.
        if !self.all_real {
            return;
        }

        let trimmed = value.trim();
        if self.all_integer && trimmed.parse::<i64>().is_err() {
            self.all_integer = false;
        }
        if !self.all_integer && trimmed.parse::<f64>().is_err() {
            self.all_real = false;
        }
    }

    fn inferred_type(&self) -> SqlType {
        if !self.seen_value {
            return SqlType::Text;
        }
        if self.all_integer {
            SqlType::Integer
        } else if self.all_real {
            SqlType::Real
        } else {
            SqlType::Text
        }
    }
}

/// Infer the storage type for a column's values.
pub fn infer_sql_type<'a>(values: impl IntoIterator<Item = &'a str>) -> SqlType {
    let mut tracker = TypeTracker::new();
    for value in values {
        tracker.observe(value);
    }
    tracker.inferred_type()
}

/// One descriptor per header, in header order.
pub fn infer_columns(data: &TabularData) -> Vec<ColumnDescriptor> {
    data.headers
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnDescriptor::new(name.clone(), infer_sql_type(data.column(idx))))
        .collect()
}

/// Convert a raw cell to a value of the column's type.
///
/// Cells that do not parse fall back to text; for an inferred column this
/// cannot happen, since inference saw every cell.
pub fn coerce(value: &str, sql_type: SqlType) -> Value {
    if is_missing(value) {
        return Value::Null;
    }
    let trimmed = value.trim();
    match sql_type {
        SqlType::Integer => trimmed
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(value.to_string())),
        SqlType::Real => trimmed
            .parse::<f64>()
            .map(Value::Real)
            .unwrap_or_else(|_| Value::Text(value.to_string())),
        SqlType::Text => Value::Text(value.to_string()),
    }
}

/// Typed rows ready for insertion.
pub fn coerce_rows(data: &TabularData, columns: &[ColumnDescriptor]) -> Vec<Vec<Value>> {
    data.rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let cell = row.get(idx).map(String::as_str).unwrap_or("");
                    coerce(cell, column.sql_type)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_integers() {
        assert_eq!(infer_sql_type(["1", "-2", "+30", " 4 "]), SqlType::Integer);
    }

    #[test]
    fn test_mixed_integer_and_decimal() {
        assert_eq!(infer_sql_type(["1", "2.5", "3"]), SqlType::Real);
        assert_eq!(infer_sql_type(["1e3", "7"]), SqlType::Real);
    }

    #[test]
    fn test_any_text_value() {
        assert_eq!(infer_sql_type(["1", "2.5", "three"]), SqlType::Text);
        assert_eq!(infer_sql_type(["abc", "1"]), SqlType::Text);
        assert_eq!(infer_sql_type(["true", "false"]), SqlType::Text);
    }

    #[test]
    fn test_missing_values_ignored() {
        assert_eq!(infer_sql_type(["1", "", "NA", "3"]), SqlType::Integer);
        assert_eq!(infer_sql_type(["", "2.5", "null"]), SqlType::Real);
    }

    #[test]
    fn test_integer_column_with_gaps_stays_integer() {
        let cells = ["7", "", "NA", "-2"];
        let sql_type = infer_sql_type(cells);
        assert_eq!(sql_type, SqlType::Integer);

        let stored: Vec<Value> = cells.iter().map(|c| coerce(c, sql_type)).collect();
        assert_eq!(
            stored,
            vec![Value::Integer(7), Value::Null, Value::Null, Value::Integer(-2)]
        );
    }

    #[test]
    fn test_all_missing_is_text() {
        assert_eq!(infer_sql_type(["", "NaN"]), SqlType::Text);
        assert_eq!(infer_sql_type(std::iter::empty::<&str>()), SqlType::Text);
    }

    #[test]
    fn test_integer_overflow_becomes_real() {
        assert_eq!(infer_sql_type(["99999999999999999999"]), SqlType::Real);
    }

    #[test]
    fn test_text_after_real_stays_text() {
        assert_eq!(infer_sql_type(["1.5", "x", "2.5"]), SqlType::Text);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(" 42 ", SqlType::Integer), Value::Integer(42));
        assert_eq!(coerce("2", SqlType::Real), Value::Real(2.0));
        assert_eq!(coerce(" padded ", SqlType::Text), Value::from(" padded "));
        assert_eq!(coerce("", SqlType::Text), Value::Null);
        assert_eq!(coerce("NA", SqlType::Integer), Value::Null);
    }

    #[test]
    fn test_infer_columns_and_rows() {
        let data = TabularData {
            headers: vec!["id".into(), "name".into(), "score".into()],
            rows: vec![
                vec!["1".into(), "a".into(), "1.5".into()],
                vec!["2".into(), "b".into(), "".into()],
            ],
        };
        let columns = infer_columns(&data);
        assert_eq!(
            columns,
            vec![
                ColumnDescriptor::new("id", SqlType::Integer),
                ColumnDescriptor::new("name", SqlType::Text),
                ColumnDescriptor::new("score", SqlType::Real),
            ]
        );

        let rows = coerce_rows(&data, &columns);
        assert_eq!(
            rows,
            vec![
                vec![Value::Integer(1), Value::from("a"), Value::Real(1.5)],
                vec![Value::Integer(2), Value::from("b"), Value::Null],
            ]
        );
    }
}
