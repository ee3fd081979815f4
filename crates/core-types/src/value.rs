use crate::dates::format_iso;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// A single typed cell of a `Table`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An empty cell.
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDateTime),
}

/// A hashable identity for a non-null `Value`, used for grouping and distinct counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Int(i64),
    Float(u64),
    Text(String),
    Date(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// The numeric reading of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<ValueKey> {
        match self {
            Value::Null => None,
            Value::Int(v) => Some(ValueKey::Int(*v)),
            Value::Float(v) if v.is_nan() => None,
            // -0.0 and 0.0 are the same group.
            Value::Float(v) if *v == 0.0 => Some(ValueKey::Float(0f64.to_bits())),
            Value::Float(v) => Some(ValueKey::Float(v.to_bits())),
            Value::Text(s) => Some(ValueKey::Text(s.clone())),
            Value::Date(dt) => Some(ValueKey::Date(*dt)),
        }
    }

    /// Compares two values of the same kind. Numbers compare with numbers,
    /// text lexicographically and dates chronologically; any other pairing is
    /// not comparable.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// The JSON rendering used for table records. Dates become ISO strings and
    /// non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(dt) => serde_json::Value::String(format_iso(dt)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&float_repr(*v)),
            Value::Text(s) => f.write_str(s),
            Value::Date(dt) => f.write_str(&format_iso(dt)),
        }
    }
}

/// Renders a float the way a dashboard user expects to read a raw number: the
/// shortest round-tripping digits, always with a fractional part (`1234.0`), and
/// scientific notation with a signed two-digit exponent outside `[1e-4, 1e16)`.
pub fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = v.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let sci = format!("{v:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => sci,
        };
    }

    let plain = format!("{v}");
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
