//! Typed values and the conversions that produce them from raw tokens.
//!
//! Every declared parameter carries a [`ValueType`] describing what its raw
//! tokens convert into. Conversion happens once, at the end of a parse pass,
//! and produces a [`Value`] that the command target reads back out.

use serde::{Deserialize, Serialize};

/// Conversion applied to each raw value token of a parameter.
///
/// # Examples
///
/// ```
/// use argot_core::ValueType;
///
/// let vt = ValueType::default();
/// assert_eq!(vt, ValueType::Str);
///
/// let level = ValueType::choice(["debug", "info", "warn"]);
/// assert!(matches!(level, ValueType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Token is taken verbatim (the default).
    #[default]
    Str,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// `true`/`false` (also accepts `1`/`0`, `yes`/`no`, `on`/`off`).
    Bool,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
}

impl ValueType {
    /// Creates a `Choice` type from anything yielding string-likes.
    pub fn choice<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Choice(items.into_iter().map(Into::into).collect())
    }

    /// Converts one raw token, returning a reason string on failure.
    ///
    /// The caller wraps the reason into a user-facing usage error that names
    /// the parameter and the offending token.
    pub(crate) fn convert(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Str => Ok(Value::Str(raw.to_string())),
            ValueType::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("'{raw}' is not a valid integer")),
            ValueType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("'{raw}' is not a valid number")),
            ValueType::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
                "false" | "f" | "0" | "no" | "n" | "off" => Ok(Value::Bool(false)),
                _ => Err(format!("'{raw}' is not a valid boolean")),
            },
            ValueType::Choice(items) => {
                if items.iter().any(|item| item == raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(format!(
                        "'{raw}' is not one of {}",
                        items.join(", ")
                    ))
                }
            }
        }
    }

    /// Placeholder shown in help output when no explicit metavar is set.
    pub(crate) fn metavar(&self) -> String {
        match self {
            ValueType::Str => "TEXT".to_string(),
            ValueType::Int => "INT".to_string(),
            ValueType::Float => "FLOAT".to_string(),
            ValueType::Bool => "BOOL".to_string(),
            ValueType::Choice(items) => format!("[{}]", items.join("|")),
        }
    }
}

/// A value bound from parsed tokens, or supplied as a parameter default.
///
/// Multi-arity and repeatable parameters bind a `List`; everything else
/// binds a scalar variant.
///
/// # Examples
///
/// ```
/// use argot_core::Value;
///
/// let v = Value::Int(7);
/// assert_eq!(v.as_int(), Some(7));
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    /// Returns the string content, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float content, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the item slice, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_conversion() {
        assert_eq!(ValueType::Int.convert("42"), Ok(Value::Int(42)));
        assert_eq!(ValueType::Int.convert("-7"), Ok(Value::Int(-7)));
        assert!(ValueType::Int.convert("blah").is_err());
    }

    #[test]
    fn test_bool_conversion_accepts_common_spellings() {
        for raw in ["true", "YES", "1", "on"] {
            assert_eq!(ValueType::Bool.convert(raw), Ok(Value::Bool(true)));
        }
        for raw in ["false", "No", "0", "off"] {
            assert_eq!(ValueType::Bool.convert(raw), Ok(Value::Bool(false)));
        }
        assert!(ValueType::Bool.convert("maybe").is_err());
    }

    #[test]
    fn test_choice_rejects_unknown_item() {
        let vt = ValueType::choice(["json", "yaml"]);
        assert_eq!(vt.convert("json"), Ok(Value::Str("json".to_string())));
        let err = vt.convert("toml").unwrap_err();
        assert!(err.contains("json, yaml"));
    }

    #[test]
    fn test_metavar_defaults() {
        assert_eq!(ValueType::Int.metavar(), "INT");
        assert_eq!(ValueType::choice(["a", "b"]).metavar(), "[a|b]");
    }
}
