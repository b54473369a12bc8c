//! Caller-owned state attached to a history entry.
//!
//! [`StateValue`] is an opaque, JSON-like tree. Two values are equal when
//! they are deeply equal: containers compare element by element, integers
//! and floats compare by exact numeric value, and `NaN` equals `NaN`.
//!
//! JSON has no `NaN`: through `serde_json` a `Float(NaN)` is written as
//! `null` and reads back as [`StateValue::Null`].

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// State stored alongside a [`Location`](crate::Location).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum StateValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<StateValue>),
    Map(BTreeMap<String, StateValue>),
}

impl StateValue {
    /// Build a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<StateValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        StateValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        match self {
            StateValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Exact: no rounding of large integers through `f64`.
fn int_equals_float(int: i64, float: f64) -> bool {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    float.fract() == 0.0 && (-BOUND..BOUND).contains(&float) && float as i64 == int
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        use StateValue::*;

        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => numbers_equal(*a, *b),
            (Int(a), Float(b)) | (Float(b), Int(a)) => int_equals_float(*a, *b),
            (Text(a), Text(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Int(value)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        StateValue::Int(i64::from(value))
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Float(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl<T: Into<StateValue>> From<Vec<T>> for StateValue {
    fn from(values: Vec<T>) -> Self {
        StateValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, StateValue>> for StateValue {
    fn from(map: BTreeMap<String, StateValue>) -> Self {
        StateValue::Map(map)
    }
}
