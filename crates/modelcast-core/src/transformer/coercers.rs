//! Primitive coercers
//!
//! Each coercer converts one kind into another and is total: content that
//! cannot be converted becomes a sentinel (`null` for reference-like kinds,
//! NaN for numbers) instead of an error. Input of an unexpected variant also
//! yields the null sentinel.
//!
//! Forward coercers read a [`WireValue`] and produce a [`ModelValue`];
//! reverse coercers do the opposite.
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

use crate::config::DateFormat;
use crate::value::{ModelValue, WireValue, Zone};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde_json::{Number, Value};
use std::str::FromStr;
use std::sync::OnceLock;
use url::Url;

// Bool

/// Nonzero numbers are true, zero is false
pub fn bool_from_number(wire: &WireValue) -> ModelValue {
    match wire.as_f64() {
        Some(n) => ModelValue::Bool(n != 0.0),
        None => ModelValue::Null,
    }
}

/// Only the literal `"0"` is false; every other string, empty included, is true
pub fn bool_from_string(wire: &WireValue) -> ModelValue {
    match wire.as_str() {
        Some(s) => ModelValue::Bool(s != "0"),
        None => ModelValue::Null,
    }
}

/// Serialize a boolean as `1` or `0`
pub fn number_from_bool(model: &ModelValue) -> WireValue {
    match model.as_bool() {
        Some(b) => Value::from(u8::from(b)),
        None => Value::Null,
    }
}

// Number

fn number_pattern() -> &'static Regex {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
            .expect("valid number regex")
    })
}

/// Parse a decimal numeric literal, integer when it fits in `i64`.
///
/// Only digit-based notation is accepted; words such as `inf` or `nan` and
/// any other malformed text yield NaN.
pub fn parse_number(text: &str) -> ModelValue {
    let text = text.trim();
    if !number_pattern().is_match(text) {
        log::trace!("unparsable number {:?}", text);
        return ModelValue::Float(f64::NAN);
    }
    if let Ok(i) = text.parse::<i64>() {
        return ModelValue::Integer(i);
    }
    text.parse::<f64>()
        .map_or(ModelValue::Float(f64::NAN), ModelValue::Float)
}

pub fn number_from_string(wire: &WireValue) -> ModelValue {
    match wire.as_str() {
        Some(s) => parse_number(s),
        None => ModelValue::Float(f64::NAN),
    }
}

/// Base-10 text for a float.
///
/// Integral values print without a fraction. Exponent notation is used only
/// at magnitudes of 1e21 and above or below 1e-6.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        format!("{:e}", n)
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

pub fn string_from_number(wire: &WireValue) -> ModelValue {
    let Value::Number(n) = wire else {
        return ModelValue::Null;
    };
    let text = if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format_number(n.as_f64().unwrap_or(f64::NAN))
    };
    ModelValue::String(text)
}

// Decimal

/// Arbitrary-precision decimal parse keeping the input's digits and scale.
///
/// Plain and scientific notation are both accepted.
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim()).ok()
}

/// Plain notation with the value's full scale, never an exponent
pub fn format_decimal(decimal: &BigDecimal) -> String {
    decimal.to_plain_string()
}

pub fn decimal_from_string(wire: &WireValue) -> ModelValue {
    wire.as_str()
        .and_then(parse_decimal)
        .map_or(ModelValue::Null, ModelValue::Decimal)
}

/// Decimal from the number's own textual form, so no binary rounding is added
pub fn decimal_from_number(wire: &WireValue) -> ModelValue {
    match wire {
        Value::Number(n) => {
            parse_decimal(&n.to_string()).map_or(ModelValue::Null, ModelValue::Decimal)
        }
        _ => ModelValue::Null,
    }
}

pub fn string_from_decimal(model: &ModelValue) -> WireValue {
    match model {
        ModelValue::Decimal(d) => Value::String(format_decimal(d)),
        _ => Value::Null,
    }
}

// URL

pub fn url_from_string(wire: &WireValue) -> ModelValue {
    let Some(text) = wire.as_str() else {
        return ModelValue::Null;
    };
    match Url::parse(text.trim()) {
        Ok(url) => ModelValue::Url(url),
        Err(e) => {
            log::trace!("unparsable url {:?}: {}", text, e);
            ModelValue::Null
        }
    }
}

pub fn string_from_url(model: &ModelValue) -> WireValue {
    match model {
        ModelValue::Url(url) => Value::String(url.as_str().to_string()),
        _ => Value::Null,
    }
}

// Time zone

const MAX_OFFSET_HOURS: i32 = 18;

fn offset_pattern() -> &'static Regex {
    static OFFSET_REGEX: OnceLock<Regex> = OnceLock::new();
    OFFSET_REGEX.get_or_init(|| {
        Regex::new(r"^(?:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset regex")
    })
}

/// Resolve an IANA region identifier or a fixed offset notation
pub fn parse_zone(text: &str) -> Option<Zone> {
    let text = text.trim();
    if let Ok(tz) = text.parse::<Tz>() {
        return Some(Zone::Region(tz));
    }
    if text.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).map(Zone::Fixed);
    }

    let captures = offset_pattern().captures(text)?;
    let sign = if &captures[1] == "-" { -1 } else { 1 };
    let hours: i32 = captures[2].parse().ok()?;
    let minutes: i32 = captures
        .get(3)
        .map_or(Ok(0), |m| m.as_str().parse())
        .ok()?;
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Zone::Fixed)
}

pub fn zone_from_string(wire: &WireValue) -> ModelValue {
    match wire.as_str().and_then(parse_zone) {
        Some(zone) => ModelValue::TimeZone(zone),
        None => {
            log::trace!("unknown time zone {}", wire);
            ModelValue::Null
        }
    }
}

pub fn string_from_zone(model: &ModelValue) -> WireValue {
    match model {
        ModelValue::TimeZone(zone) => Value::String(zone.to_string()),
        _ => Value::Null,
    }
}

// Date

/// Seconds since the Unix epoch, fractional seconds allowed
pub fn date_from_number(wire: &WireValue) -> ModelValue {
    let Value::Number(n) = wire else {
        return ModelValue::Null;
    };
    let date = match n.as_i64() {
        Some(secs) => DateTime::from_timestamp(secs, 0),
        None => n.as_f64().and_then(date_from_float_seconds),
    };
    date.map_or(ModelValue::Null, ModelValue::Date)
}

fn date_from_float_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

pub fn number_from_date(model: &ModelValue) -> WireValue {
    let ModelValue::Date(date) = model else {
        return Value::Null;
    };
    let nanos = date.timestamp_subsec_nanos();
    if nanos == 0 {
        Value::from(date.timestamp())
    } else {
        let secs = date.timestamp() as f64 + f64::from(nanos) / 1e9;
        Number::from_f64(secs).map_or(Value::Null, Value::Number)
    }
}

fn parse_with(text: &str, format: DateFormat) -> Option<DateTime<Utc>> {
    let utc = |d: DateTime<FixedOffset>| d.with_timezone(&Utc);
    match format {
        DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).ok().map(utc),
        DateFormat::IsoCompactOffset => {
            DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z").ok().map(utc)
        }
        DateFormat::IsoBasicTime => {
            DateTime::parse_from_str(text, "%Y-%m-%dT%H%M%S%z").ok().map(utc)
        }
        DateFormat::IsoLocal => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|d| d.and_utc()),
        DateFormat::SpaceSeparated => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|d| d.and_utc()),
        DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(text).ok().map(utc),
        DateFormat::CalendarDate => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc()),
    }
}

/// Try each format in order; the first that parses wins
pub fn parse_date(text: &str, formats: &[DateFormat]) -> Option<DateTime<Utc>> {
    let text = text.trim();
    formats.iter().find_map(|format| parse_with(text, *format))
}

/// RFC 3339 in UTC with a `Z` suffix
pub fn format_date(date: &DateTime<Utc>, fractional_seconds: bool) -> String {
    let precision = if fractional_seconds {
        SecondsFormat::AutoSi
    } else {
        SecondsFormat::Secs
    };
    date.to_rfc3339_opts(precision, true)
}

pub fn date_from_string(wire: &WireValue, formats: &[DateFormat]) -> ModelValue {
    let Some(text) = wire.as_str() else {
        return ModelValue::Null;
    };
    match parse_date(text, formats) {
        Some(date) => ModelValue::Date(date),
        None => {
            log::trace!("no date format matched {:?}", text);
            ModelValue::Null
        }
    }
}

pub fn string_from_date(model: &ModelValue, fractional_seconds: bool) -> WireValue {
    match model {
        ModelValue::Date(date) => Value::String(format_date(date, fractional_seconds)),
        _ => Value::Null,
    }
}
