//! Typed representation of parsed configuration values.

use std::fmt;

/// Base type of a configuration value, independent of cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Real,
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Real => f.write_str("real"),
            ValueKind::Str => f.write_str("string"),
        }
    }
}

/// Whether a value is a single scalar or a same-typed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    Array,
}

/// A parsed configuration value.
///
/// Arrays get their own variants so that a mixed-type array is
/// unrepresentable; the parser rejects such input before this type is
/// ever constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Integer(i64),
    Real(f64),
    Str(String),
    IntegerArray(Vec<i64>),
    RealArray(Vec<f64>),
    StrArray(Vec<String>),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Integer(_) | ConfigValue::IntegerArray(_) => ValueKind::Integer,
            ConfigValue::Real(_) | ConfigValue::RealArray(_) => ValueKind::Real,
            ConfigValue::Str(_) | ConfigValue::StrArray(_) => ValueKind::Str,
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            ConfigValue::Integer(_) | ConfigValue::Real(_) | ConfigValue::Str(_) => {
                Cardinality::Scalar
            }
            ConfigValue::IntegerArray(_)
            | ConfigValue::RealArray(_)
            | ConfigValue::StrArray(_) => Cardinality::Array,
        }
    }

    /// Number of elements held: 1 for scalars, the array length otherwise.
    pub fn count(&self) -> usize {
        match self {
            ConfigValue::Integer(_) | ConfigValue::Real(_) | ConfigValue::Str(_) => 1,
            ConfigValue::IntegerArray(items) => items.len(),
            ConfigValue::RealArray(items) => items.len(),
            ConfigValue::StrArray(items) => items.len(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            ConfigValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    /// Renders the value back in config-file syntax, so that a displayed
    /// value re-parses to the same kind and content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Integer(value) => write!(f, "{value}"),
            // {:?} keeps the decimal point on whole reals (2.0, not 2),
            // which the grammar requires for a real literal.
            ConfigValue::Real(value) => write!(f, "{value:?}"),
            ConfigValue::Str(value) => write!(f, "\"{value}\""),
            ConfigValue::IntegerArray(items) => write_array(f, items, |f, v| write!(f, "{v}")),
            ConfigValue::RealArray(items) => write_array(f, items, |f, v| write!(f, "{v:?}")),
            ConfigValue::StrArray(items) => write_array(f, items, |f, v| write!(f, "\"{v}\"")),
        }
    }
}

fn write_array<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    f.write_str("]")
}

/// A named configuration variable as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigVariable {
    pub name: String,
    pub description: String,
    pub value: ConfigValue,
}

impl ConfigVariable {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value: ConfigValue,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_cardinality() {
        assert_eq!(ConfigValue::Integer(1).kind(), ValueKind::Integer);
        assert_eq!(ConfigValue::Integer(1).cardinality(), Cardinality::Scalar);

        let arr = ConfigValue::RealArray(vec![0.5, 1.5]);
        assert_eq!(arr.kind(), ValueKind::Real);
        assert_eq!(arr.cardinality(), Cardinality::Array);
        assert_eq!(arr.count(), 2);
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(ConfigValue::Integer(-7).to_string(), "-7");
        assert_eq!(ConfigValue::Real(2.0).to_string(), "2.0");
        assert_eq!(ConfigValue::Str("hi".into()).to_string(), "\"hi\"");
    }

    #[test]
    fn test_display_arrays() {
        assert_eq!(
            ConfigValue::IntegerArray(vec![1, 2, 3]).to_string(),
            "[1, 2, 3]"
        );
        assert_eq!(
            ConfigValue::StrArray(vec!["a".into(), "b".into()]).to_string(),
            "[\"a\", \"b\"]"
        );
    }
}
