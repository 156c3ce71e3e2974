//! Wire and model values
//!
//! Wire values are plain `serde_json::Value` trees produced by an external
//! parser. Model values are the typed host-domain values a transform yields.
//! Every wire value has a natural model counterpart ([`ModelValue::from_wire`]),
//! and every model value of a wire kind lowers back ([`ModelValue::to_wire`]).

use crate::kind::Kind;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// A parsed JSON value
pub type WireValue = Value;

/// Time zone carried by a model value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// IANA region such as `Europe/Paris`
    Region(Tz),
    /// Fixed offset from UTC
    Fixed(FixedOffset),
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Region(tz) => f.write_str(tz.name()),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// A value in the host application's typed domain
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    MutableString(String),
    Decimal(BigDecimal),
    Url(Url),
    TimeZone(Zone),
    Date(DateTime<Utc>),
    Array(Vec<ModelValue>),
    MutableArray(Vec<ModelValue>),
    Object(BTreeMap<String, ModelValue>),
    MutableObject(BTreeMap<String, ModelValue>),
    /// Distinct elements; iteration order is unspecified
    Set(Vec<ModelValue>),
    MutableSet(Vec<ModelValue>),
    /// Host kind owned by a user-registered transformer
    Extension {
        kind: String,
        payload: Value,
    },
}

impl ModelValue {
    /// Lift a wire value into its natural model value
    pub fn from_wire(wire: &WireValue) -> Self {
        match wire {
            Value::Null => ModelValue::Null,
            Value::Bool(b) => ModelValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ModelValue::Integer(i),
                None => ModelValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ModelValue::String(s.clone()),
            Value::Array(items) => ModelValue::Array(items.iter().map(Self::from_wire).collect()),
            Value::Object(map) => ModelValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_wire(v)))
                    .collect(),
            ),
        }
    }

    /// Lower this value to the wire.
    ///
    /// Returns `None` for kinds that need a transformer to reach the wire
    /// (decimals, URLs, dates, sets, extensions), or for containers holding
    /// such values. Non-finite floats lower to `null`.
    pub fn to_wire(&self) -> Option<WireValue> {
        match self {
            ModelValue::Null => Some(Value::Null),
            ModelValue::Bool(b) => Some(Value::Bool(*b)),
            ModelValue::Integer(i) => Some(Value::from(*i)),
            ModelValue::Float(f) => Some(
                Number::from_f64(*f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            ),
            ModelValue::String(s) | ModelValue::MutableString(s) => Some(Value::String(s.clone())),
            ModelValue::Array(items) | ModelValue::MutableArray(items) => items
                .iter()
                .map(Self::to_wire)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            ModelValue::Object(map) | ModelValue::MutableObject(map) => map
                .iter()
                .map(|(k, v)| v.to_wire().map(|w| (k.clone(), w)))
                .collect::<Option<Map<String, Value>>>()
                .map(Value::Object),
            _ => None,
        }
    }

    /// Concrete kind of this value
    pub fn kind(&self) -> Kind {
        match self {
            ModelValue::Null => Kind::Null,
            ModelValue::Bool(_) => Kind::Bool,
            ModelValue::Integer(_) => Kind::Integer,
            ModelValue::Float(_) => Kind::Float,
            ModelValue::String(_) => Kind::String,
            ModelValue::MutableString(_) => Kind::MutableString,
            ModelValue::Decimal(_) => Kind::Decimal,
            ModelValue::Url(_) => Kind::Url,
            ModelValue::TimeZone(_) => Kind::TimeZone,
            ModelValue::Date(_) => Kind::Date,
            ModelValue::Array(_) => Kind::Array,
            ModelValue::MutableArray(_) => Kind::MutableArray,
            ModelValue::Object(_) => Kind::Object,
            ModelValue::MutableObject(_) => Kind::MutableObject,
            ModelValue::Set(_) => Kind::Set,
            ModelValue::MutableSet(_) => Kind::MutableSet,
            ModelValue::Extension { kind, .. } => Kind::Named(kind.clone()),
        }
    }

    /// Re-tag a string, array, object or set with the mutability of `target`.
    ///
    /// Values outside those clusters are returned unchanged.
    pub fn with_mutability_of(self, target: &Kind) -> Self {
        let mutable = target.is_mutable();
        match self {
            ModelValue::String(s) | ModelValue::MutableString(s) => {
                if mutable {
                    ModelValue::MutableString(s)
                } else {
                    ModelValue::String(s)
                }
            }
            ModelValue::Array(v) | ModelValue::MutableArray(v) => {
                if mutable {
                    ModelValue::MutableArray(v)
                } else {
                    ModelValue::Array(v)
                }
            }
            ModelValue::Object(m) | ModelValue::MutableObject(m) => {
                if mutable {
                    ModelValue::MutableObject(m)
                } else {
                    ModelValue::Object(m)
                }
            }
            ModelValue::Set(v) | ModelValue::MutableSet(v) => {
                if mutable {
                    ModelValue::MutableSet(v)
                } else {
                    ModelValue::Set(v)
                }
            }
            other => other,
        }
    }

    /// Fit this value to the concrete variant `target` names.
    ///
    /// Applies [`ModelValue::with_mutability_of`], then moves numbers to the
    /// declared numeric variant. A float only becomes an integer when it is
    /// integral and in `i64` range; otherwise it stays a float.
    pub fn conform_to(self, target: &Kind) -> Self {
        match (self, target) {
            (ModelValue::Integer(i), Kind::Float) => ModelValue::Float(i as f64),
            (ModelValue::Float(f), Kind::Integer) if is_integral(f) => {
                ModelValue::Integer(f as i64)
            }
            (value, _) => value.with_mutability_of(target),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ModelValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of integer and float values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ModelValue::Integer(i) => Some(*i as f64),
            ModelValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) | ModelValue::MutableString(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an array or set, in storage order
    pub fn as_elements(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::Array(v)
            | ModelValue::MutableArray(v)
            | ModelValue::Set(v)
            | ModelValue::MutableSet(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        ModelValue::Bool(b)
    }
}

impl From<i64> for ModelValue {
    fn from(i: i64) -> Self {
        ModelValue::Integer(i)
    }
}

impl From<f64> for ModelValue {
    fn from(f: f64) -> Self {
        ModelValue::Float(f)
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        ModelValue::String(s.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        ModelValue::String(s)
    }
}

/// Concrete kind of a wire value; numbers report `Integer` or `Float`
pub fn wire_kind(wire: &WireValue) -> Kind {
    match wire {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(n) if n.is_i64() => Kind::Integer,
        Value::Number(_) => Kind::Float,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
    }
}

fn is_integral(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// True when a property value is absent or JSON `null`
pub fn is_null(value: Option<&WireValue>) -> bool {
    value.map_or(true, Value::is_null)
}

/// Like [`is_null`], but also true for the textual placeholders `"null"` and
/// `"<null>"` (any case) that some producers write in place of a real `null`
pub fn is_null_string(value: Option<&WireValue>) -> bool {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("<null>")
        }
        other => is_null(other),
    }
}
