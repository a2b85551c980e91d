use chrono::NaiveDateTime;
use std::fmt;

/// A single scalar cell of a [`super::Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDateTime),
    Missing,
}

impl Value {
    /// Infers the cell type of a raw delimited-text field.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "nan" | "na" | "n/a" | "null" | "none" => return Self::Missing,
            "true" => return Self::Boolean(true),
            "false" => return Self::Boolean(false),
            _ => {}
        }

        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric view used by score and sales columns. Booleans and text are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Additive view used when summing conversion counts: `true` counts as one.
    pub fn as_count(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Boolean(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_truthy_flag(&self) -> bool {
        match self {
            Self::Boolean(flag) => *flag,
            Self::Number(number) => *number == 1.0,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::Boolean(flag) => write!(f, "{flag}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
            Self::Missing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_distinguishes_cell_kinds() {
        assert_eq!(Value::infer("  "), Value::Missing);
        assert_eq!(Value::infer("NaN"), Value::Missing);
        assert_eq!(Value::infer("TRUE"), Value::Boolean(true));
        assert_eq!(Value::infer("false"), Value::Boolean(false));
        assert_eq!(Value::infer("9"), Value::Number(9.0));
        assert_eq!(Value::infer("-12.5"), Value::Number(-12.5));
        assert_eq!(Value::infer("Activo"), Value::Text("Activo".to_string()));
        assert_eq!(
            Value::infer("2024-01-01"),
            Value::Text("2024-01-01".to_string())
        );
    }

    #[test]
    fn count_view_treats_true_as_one() {
        assert_eq!(Value::Boolean(true).as_count(), Some(1.0));
        assert_eq!(Value::Boolean(false).as_count(), Some(0.0));
        assert_eq!(Value::Number(3.0).as_count(), Some(3.0));
        assert_eq!(Value::Text("x".into()).as_count(), None);
        assert_eq!(Value::Boolean(true).as_number(), None);
    }
}
