//! Execution parameters and their ledger keys.
//!
//! A [`Parameter`] is one element of a test case's declared parameter list. The ledger never keys on its
//! string form: `1`, `1.0` and `"1"` are three different parameters. [`ParameterKey`] is the structural,
//! totally ordered identity used instead.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// One input value for a parameterized test case.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Parameter {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Parameter>),
    Map(BTreeMap<String, Parameter>),
}

impl Parameter {
    /// Derive the ledger key for this value.
    pub fn key(&self) -> ParameterKey {
        ParameterKey::from(self)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Parameter::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Parameter::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parameter::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Null => f.write_str("null"),
            Parameter::Bool(b) => write!(f, "{b}"),
            Parameter::Int(n) => write!(f, "{n}"),
            Parameter::Float(x) => write!(f, "{x:?}"),
            Parameter::Str(s) => write!(f, "{s:?}"),
            Parameter::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Parameter::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<()> for Parameter {
    fn from(_: ()) -> Self {
        Parameter::Null
    }
}

impl From<bool> for Parameter {
    fn from(b: bool) -> Self {
        Parameter::Bool(b)
    }
}

impl From<i32> for Parameter {
    fn from(n: i32) -> Self {
        Parameter::Int(i64::from(n))
    }
}

impl From<i64> for Parameter {
    fn from(n: i64) -> Self {
        Parameter::Int(n)
    }
}

impl From<u32> for Parameter {
    fn from(n: u32) -> Self {
        Parameter::Int(i64::from(n))
    }
}

impl From<f64> for Parameter {
    fn from(x: f64) -> Self {
        Parameter::Float(x)
    }
}

impl From<&str> for Parameter {
    fn from(s: &str) -> Self {
        Parameter::Str(s.to_string())
    }
}

impl From<String> for Parameter {
    fn from(s: String) -> Self {
        Parameter::Str(s)
    }
}

impl<T: Into<Parameter>> From<Vec<T>> for Parameter {
    fn from(items: Vec<T>) -> Self {
        Parameter::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map_or(Parameter::Null, Into::into)
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Parameter::Null,
            Value::Bool(b) => Parameter::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Parameter::Int(i),
                None => Parameter::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Parameter::Str(s),
            Value::Array(items) => Parameter::List(items.into_iter().map(Parameter::from).collect()),
            Value::Object(map) => Parameter::Map(map.into_iter().map(|(k, v)| (k, Parameter::from(v))).collect()),
        }
    }
}

/// Structural identity of a [`Parameter`], usable as a map key.
///
/// Floats are compared by bit pattern (all NaNs collapse to one key), so the key is `Eq + Ord + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
    List(Vec<ParameterKey>),
    Map(Vec<(String, ParameterKey)>),
}

impl From<&Parameter> for ParameterKey {
    fn from(param: &Parameter) -> Self {
        match param {
            Parameter::Null => ParameterKey::Null,
            Parameter::Bool(b) => ParameterKey::Bool(*b),
            Parameter::Int(n) => ParameterKey::Int(*n),
            Parameter::Float(x) if x.is_nan() => ParameterKey::Float(f64::NAN.to_bits()),
            Parameter::Float(x) => ParameterKey::Float(x.to_bits()),
            Parameter::Str(s) => ParameterKey::Str(s.clone()),
            Parameter::List(items) => ParameterKey::List(items.iter().map(ParameterKey::from).collect()),
            Parameter::Map(entries) => {
                ParameterKey::Map(entries.iter().map(|(k, v)| (k.clone(), ParameterKey::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKey::Null => f.write_str("null"),
            ParameterKey::Bool(b) => write!(f, "{b}"),
            ParameterKey::Int(n) => write!(f, "{n}"),
            ParameterKey::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            ParameterKey::Str(s) => write!(f, "{s:?}"),
            ParameterKey::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ParameterKey::Map(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k:?}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}
