//! Collection adapters
//!
//! Mutability conversions copy content and only change the tag. Set
//! conversions deduplicate by value equality; the order of set elements is
//! unspecified and callers needing a stable order must sort themselves.
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

use crate::kind::Kind;
use crate::value::{ModelValue, WireValue};
use serde_json::Value;
use std::collections::HashSet;

pub fn mutable_string_from_string(wire: &WireValue) -> ModelValue {
    match wire.as_str() {
        Some(s) => ModelValue::MutableString(s.to_string()),
        None => ModelValue::Null,
    }
}

pub fn mutable_array_from_array(wire: &WireValue) -> ModelValue {
    match wire {
        Value::Array(_) => ModelValue::from_wire(wire).with_mutability_of(&Kind::MutableArray),
        _ => ModelValue::Null,
    }
}

pub fn mutable_object_from_object(wire: &WireValue) -> ModelValue {
    match wire {
        Value::Object(_) => {
            ModelValue::from_wire(wire).with_mutability_of(&Kind::MutableObject)
        }
        _ => ModelValue::Null,
    }
}

/// Immutable wire copy of a mutable string, array or object
pub fn immutable_copy(model: &ModelValue) -> WireValue {
    model.to_wire().unwrap_or(Value::Null)
}

/// Hashable identity of a model value under value equality.
///
/// Numbers compare by numeric value, so `1` and `1.0` share a key. All NaNs
/// share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum ElementKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Nan,
    Text(String),
    Decimal(String),
    Url(String),
    Zone(String),
    Date(i64, u32),
    Seq(Vec<ElementKey>),
    Map(Vec<(String, ElementKey)>),
    Extension(String, String),
}

impl ElementKey {
    fn of(value: &ModelValue) -> Self {
        match value {
            ModelValue::Null => ElementKey::Null,
            ModelValue::Bool(b) => ElementKey::Bool(*b),
            ModelValue::Integer(i) => ElementKey::Int(*i),
            ModelValue::Float(f) => Self::of_float(*f),
            ModelValue::String(s) | ModelValue::MutableString(s) => ElementKey::Text(s.clone()),
            ModelValue::Decimal(d) => ElementKey::Decimal(d.normalized().to_plain_string()),
            ModelValue::Url(url) => ElementKey::Url(url.as_str().to_string()),
            ModelValue::TimeZone(zone) => ElementKey::Zone(zone.to_string()),
            ModelValue::Date(date) => {
                ElementKey::Date(date.timestamp(), date.timestamp_subsec_nanos())
            }
            ModelValue::Array(items) | ModelValue::MutableArray(items) => {
                ElementKey::Seq(items.iter().map(Self::of).collect())
            }
            ModelValue::Set(items) | ModelValue::MutableSet(items) => {
                let mut keys: Vec<ElementKey> = items.iter().map(Self::of).collect();
                keys.sort();
                ElementKey::Seq(keys)
            }
            ModelValue::Object(map) | ModelValue::MutableObject(map) => ElementKey::Map(
                map.iter().map(|(k, v)| (k.clone(), Self::of(v))).collect(),
            ),
            ModelValue::Extension { kind, payload } => {
                ElementKey::Extension(kind.clone(), payload.to_string())
            }
        }
    }

    fn of_float(f: f64) -> Self {
        if f.is_nan() {
            ElementKey::Nan
        } else if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            ElementKey::Int(f as i64)
        } else {
            ElementKey::Float(f.to_bits())
        }
    }
}

/// Keep the first occurrence of every distinct element
pub fn dedup(items: impl IntoIterator<Item = ModelValue>) -> Vec<ModelValue> {
    let mut seen: HashSet<ElementKey> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(ElementKey::of(item)))
        .collect()
}

pub fn set_from_array(wire: &WireValue) -> ModelValue {
    match wire {
        Value::Array(items) => ModelValue::Set(dedup(items.iter().map(ModelValue::from_wire))),
        _ => ModelValue::Null,
    }
}

pub fn mutable_set_from_array(wire: &WireValue) -> ModelValue {
    match wire {
        Value::Array(items) => {
            ModelValue::MutableSet(dedup(items.iter().map(ModelValue::from_wire)))
        }
        _ => ModelValue::Null,
    }
}

/// Enumerate a set into a wire array.
///
/// Elements that cannot reach the wire on their own become `null`.
pub fn array_from_set(model: &ModelValue) -> WireValue {
    match model {
        ModelValue::Set(items) | ModelValue::MutableSet(items) => Value::Array(
            items
                .iter()
                .map(|item| item.to_wire().unwrap_or(Value::Null))
                .collect(),
        ),
        _ => Value::Null,
    }
}
