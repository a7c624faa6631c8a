//! Coercion of single Polars cells into typed attribute values.
//!
//! Static attributes are read cell by cell. A missing cell and a cell that
//! holds something of the wrong shape are different outcomes: the first is a
//! legitimate "not applicable", the second is logged as a parse problem.

use polars::prelude::AnyValue;

/// Result of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<T> {
    Missing,
    Value(T),
    /// The cell held a value that could not be coerced; carries its text.
    Invalid(String),
}

impl<T> Cell<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing | Self::Invalid(_) => None,
        }
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Numeric cell; NaN counts as missing.
pub fn cell_f64(value: &AnyValue<'_>) -> Cell<f64> {
    let number = match value {
        AnyValue::Null => return Cell::Missing,
        AnyValue::Int8(v) => f64::from(*v),
        AnyValue::Int16(v) => f64::from(*v),
        AnyValue::Int32(v) => f64::from(*v),
        AnyValue::Int64(v) => *v as f64,
        AnyValue::UInt8(v) => f64::from(*v),
        AnyValue::UInt16(v) => f64::from(*v),
        AnyValue::UInt32(v) => f64::from(*v),
        AnyValue::UInt64(v) => *v as f64,
        AnyValue::Float32(v) => f64::from(*v),
        AnyValue::Float64(v) => *v,
        AnyValue::String(s) => return text_to_f64(s),
        AnyValue::StringOwned(s) => return text_to_f64(s.as_str()),
        other => return Cell::Invalid(other.to_string()),
    };
    if number.is_nan() {
        Cell::Missing
    } else {
        Cell::Value(number)
    }
}

fn text_to_f64(text: &str) -> Cell<f64> {
    if text.trim().is_empty() {
        return Cell::Missing;
    }
    match parse_f64(text) {
        Some(number) if number.is_nan() => Cell::Missing,
        Some(number) => Cell::Value(number),
        None => Cell::Invalid(text.to_string()),
    }
}

/// Integer cell; floats are accepted when they hold a whole number.
pub fn cell_i64(value: &AnyValue<'_>) -> Cell<i64> {
    match value {
        AnyValue::Null => Cell::Missing,
        AnyValue::Int8(v) => Cell::Value(i64::from(*v)),
        AnyValue::Int16(v) => Cell::Value(i64::from(*v)),
        AnyValue::Int32(v) => Cell::Value(i64::from(*v)),
        AnyValue::Int64(v) => Cell::Value(*v),
        AnyValue::UInt8(v) => Cell::Value(i64::from(*v)),
        AnyValue::UInt16(v) => Cell::Value(i64::from(*v)),
        AnyValue::UInt32(v) => Cell::Value(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v)
            .map(Cell::Value)
            .unwrap_or_else(|_| Cell::Invalid(v.to_string())),
        AnyValue::Float32(_) | AnyValue::Float64(_) => match cell_f64(value) {
            Cell::Value(v) if v.fract() == 0.0 => Cell::Value(v as i64),
            Cell::Value(v) => Cell::Invalid(v.to_string()),
            Cell::Missing => Cell::Missing,
            Cell::Invalid(text) => Cell::Invalid(text),
        },
        AnyValue::String(s) => text_to_i64(s),
        AnyValue::StringOwned(s) => text_to_i64(s.as_str()),
        other => Cell::Invalid(other.to_string()),
    }
}

fn text_to_i64(text: &str) -> Cell<i64> {
    if text.trim().is_empty() {
        return Cell::Missing;
    }
    parse_i64(text)
        .map(Cell::Value)
        .unwrap_or_else(|| Cell::Invalid(text.to_string()))
}

/// Text cell; numbers and booleans are rendered, empty strings are missing.
pub fn cell_text(value: &AnyValue<'_>) -> Cell<String> {
    let text = match value {
        AnyValue::Null => return Cell::Missing,
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other if other.is_primitive_numeric() => other.to_string(),
        other => return Cell::Invalid(other.to_string()),
    };
    if text.trim().is_empty() {
        Cell::Missing
    } else {
        Cell::Value(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells() {
        assert_eq!(cell_f64(&AnyValue::Null), Cell::Missing);
        assert_eq!(cell_f64(&AnyValue::Int32(42)), Cell::Value(42.0));
        assert_eq!(cell_f64(&AnyValue::Float64(f64::NAN)), Cell::Missing);
        assert_eq!(cell_f64(&AnyValue::String("2.5")), Cell::Value(2.5));
        assert_eq!(cell_f64(&AnyValue::String(" ")), Cell::Missing);
        assert_eq!(
            cell_f64(&AnyValue::String("n/a")),
            Cell::Invalid("n/a".to_string())
        );
    }

    #[test]
    fn integer_cells() {
        assert_eq!(cell_i64(&AnyValue::Int64(-3)), Cell::Value(-3));
        assert_eq!(cell_i64(&AnyValue::Float64(12.0)), Cell::Value(12));
        assert!(matches!(cell_i64(&AnyValue::Float64(1.5)), Cell::Invalid(_)));
        assert_eq!(cell_i64(&AnyValue::String("100")), Cell::Value(100));
    }

    #[test]
    fn text_cells() {
        assert_eq!(
            cell_text(&AnyValue::String("dead")),
            Cell::Value("dead".to_string())
        );
        assert_eq!(cell_text(&AnyValue::String("")), Cell::Missing);
        assert_eq!(cell_text(&AnyValue::Null), Cell::Missing);
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_f64("  3.5 "), Some(3.5));
        assert_eq!(parse_f64("x"), None);
        assert_eq!(parse_i64(" -7 "), Some(-7));
        assert_eq!(parse_i64(""), None);
    }
}
