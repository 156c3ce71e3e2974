//! Integration tests for wire-to-model and model-to-wire dispatch
//!
//! These tests drive the public API the way a mapping layer would: one value
//! and one declared kind per call.

use chrono::{TimeZone, Utc};
use modelcast_core::{
    is_null_string, resolve_cluster, DateEncoding, DateFormat, Error, Kind, ModelValue,
    TransformerConfig, TransformerEntry, TransformerRegistry, ValueTransformer, WireValue, Zone,
};
use serde_json::json;

fn transformer() -> ValueTransformer {
    ValueTransformer::with_defaults()
}

#[test]
fn test_bool_from_string_only_zero_is_false() {
    let t = transformer();
    assert_eq!(t.transform_to_model(&json!("0"), &Kind::Bool).unwrap(), ModelValue::Bool(false));
    assert_eq!(t.transform_to_model(&json!(""), &Kind::Bool).unwrap(), ModelValue::Bool(true));
    assert_eq!(t.transform_to_model(&json!("no"), &Kind::Bool).unwrap(), ModelValue::Bool(true));
}

#[test]
fn test_bool_from_number() {
    let t = transformer();
    assert_eq!(t.transform_to_model(&json!(0), &Kind::Bool).unwrap(), ModelValue::Bool(false));
    assert_eq!(t.transform_to_model(&json!(2), &Kind::Bool).unwrap(), ModelValue::Bool(true));
    assert_eq!(t.transform_to_model(&json!(-0.5), &Kind::Bool).unwrap(), ModelValue::Bool(true));
}

#[test]
fn test_wire_bool_passes_through_and_serializes_as_number() {
    let t = transformer();
    let value = t.transform_to_model(&json!(true), &Kind::Bool).unwrap();
    assert_eq!(value, ModelValue::Bool(true));
    assert_eq!(t.transform_to_wire(&value, &Kind::Bool).unwrap(), json!(1));
    assert_eq!(t.transform_to_wire(&ModelValue::Bool(false), &Kind::Bool).unwrap(), json!(0));
}

#[test]
fn test_number_string_round() {
    let t = transformer();
    assert_eq!(t.transform_to_model(&json!("15"), &Kind::Number).unwrap(), ModelValue::Integer(15));
    assert_eq!(
        t.transform_to_model(&json!("1.25"), &Kind::Float).unwrap(),
        ModelValue::Float(1.25)
    );
    match t.transform_to_model(&json!("abc"), &Kind::Number).unwrap() {
        ModelValue::Float(f) => assert!(f.is_nan()),
        other => panic!("expected NaN sentinel, got {:?}", other),
    }
    assert_eq!(
        t.transform_to_model(&json!(1.5), &Kind::String).unwrap(),
        ModelValue::from("1.5")
    );
    assert_eq!(
        t.transform_to_model(&json!(42), &Kind::MutableString).unwrap(),
        ModelValue::MutableString("42".to_string())
    );
}

#[test]
fn test_nan_serializes_as_null() {
    let t = transformer();
    let nan = t.transform_to_model(&json!("n/a"), &Kind::Number).unwrap();
    assert_eq!(t.transform_to_wire(&nan, &Kind::Number).unwrap(), WireValue::Null);
}

#[test]
fn test_decimal_round_trip_keeps_scale() {
    let t = transformer();
    let value = t.transform_to_model(&json!("19.990"), &Kind::Decimal).unwrap();
    assert!(matches!(value, ModelValue::Decimal(_)));
    assert_eq!(t.transform_to_wire(&value, &Kind::Decimal).unwrap(), json!("19.990"));
    assert_eq!(t.transform_to_model(&json!("nineteen"), &Kind::Decimal).unwrap(), ModelValue::Null);
}

#[test]
fn test_url_round_trip() {
    let t = transformer();
    let value = t
        .transform_to_model(&json!("https://example.com/path?q=1"), &Kind::Url)
        .unwrap();
    assert_eq!(
        t.transform_to_wire(&value, &Kind::Url).unwrap(),
        json!("https://example.com/path?q=1")
    );
    assert_eq!(t.transform_to_model(&json!("::::"), &Kind::Url).unwrap(), ModelValue::Null);
}

#[test]
fn test_time_zone_round_trip() {
    let t = transformer();
    let value = t.transform_to_model(&json!("Asia/Tokyo"), &Kind::TimeZone).unwrap();
    assert_eq!(value, ModelValue::TimeZone(Zone::Region(chrono_tz::Asia::Tokyo)));
    assert_eq!(t.transform_to_wire(&value, &Kind::TimeZone).unwrap(), json!("Asia/Tokyo"));
    assert_eq!(
        t.transform_to_model(&json!("Atlantis/Capital"), &Kind::TimeZone).unwrap(),
        ModelValue::Null
    );
}

#[test]
fn test_date_from_epoch_seconds() {
    let t = transformer();
    let value = t.transform_to_model(&json!(1_700_000_000), &Kind::Date).unwrap();
    assert_eq!(
        value,
        ModelValue::Date(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    );
    // Dates serialize through the string default
    assert_eq!(
        t.transform_to_wire(&value, &Kind::Date).unwrap(),
        json!("2023-11-14T22:13:20Z")
    );
}

#[test]
fn test_date_from_string_default_formats() {
    let t = transformer();
    let expected = ModelValue::Date(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap());
    for text in ["2021-03-04T05:06:07Z", "2021-03-04T050607+0000", "2021-03-04 05:06:07"] {
        assert_eq!(t.transform_to_model(&json!(text), &Kind::Date).unwrap(), expected);
    }
    assert_eq!(t.transform_to_model(&json!("yesterday"), &Kind::Date).unwrap(), ModelValue::Null);
}

#[test]
fn test_date_override_wins_and_unregister_restores_default() {
    let mut registry = TransformerRegistry::new();
    let previous = registry.register_fn(
        Kind::String,
        Kind::Date,
        |_| ModelValue::Date(Utc.timestamp_opt(0, 0).unwrap()),
        |_| json!("epoch"),
    );
    assert!(previous.is_none(), "hidden default is never reported as previous");

    let overridden = ValueTransformer::new(registry.clone());
    let date = overridden
        .transform_to_model(&json!("2021-03-04T05:06:07Z"), &Kind::Date)
        .unwrap();
    assert_eq!(date, ModelValue::Date(Utc.timestamp_opt(0, 0).unwrap()));
    assert_eq!(overridden.transform_to_wire(&date, &Kind::Date).unwrap(), json!("epoch"));

    registry.unregister(&Kind::String, &Kind::Date);
    let restored = ValueTransformer::new(registry);
    assert_eq!(
        restored
            .transform_to_model(&json!("2021-03-04T05:06:07Z"), &Kind::Date)
            .unwrap(),
        ModelValue::Date(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
    );
    assert_eq!(
        restored.transform_to_wire(&date, &Kind::Date).unwrap(),
        json!("1970-01-01T00:00:00Z")
    );
}

#[test]
fn test_custom_number_to_bool_and_unregister() {
    let mut registry = TransformerRegistry::new();
    registry.register_fn(
        Kind::Number,
        Kind::Bool,
        |wire| ModelValue::Bool(wire.as_f64().map_or(false, |n| n > 10.0)),
        |model| WireValue::from(if model.as_bool() == Some(true) { 11 } else { 0 }),
    );

    let custom = ValueTransformer::new(registry.clone());
    assert_eq!(custom.transform_to_model(&json!(5), &Kind::Bool).unwrap(), ModelValue::Bool(false));
    assert_eq!(custom.transform_to_model(&json!(0), &Kind::Bool).unwrap(), ModelValue::Bool(false));
    assert_eq!(custom.transform_to_wire(&ModelValue::Bool(true), &Kind::Bool).unwrap(), json!(11));

    registry.unregister(&Kind::Number, &Kind::Bool);
    let restored = ValueTransformer::new(registry);
    assert_eq!(
        restored.transform_to_model(&json!(5), &Kind::Bool).unwrap(),
        ModelValue::Bool(true)
    );
    assert_eq!(
        restored.transform_to_model(&json!(0), &Kind::Bool).unwrap(),
        ModelValue::Bool(false)
    );
    assert_eq!(restored.transform_to_wire(&ModelValue::Bool(true), &Kind::Bool).unwrap(), json!(1));
}

#[test]
fn test_url_to_time_zone_is_unsupported() {
    let t = transformer();
    let url = t
        .transform_to_model(&json!("https://example.com"), &Kind::Url)
        .unwrap();
    let err = t.transform_to_wire(&url, &Kind::TimeZone).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedConversion { from: Kind::Url, to: Kind::TimeZone }
    ));

    let object = json!({"href": "https://example.com"});
    let err = t.transform_to_model(&object, &Kind::TimeZone).unwrap_err();
    assert!(matches!(err, Error::UnsupportedConversion { .. }));
}

#[test]
fn test_extension_kind_round_trip() {
    let mut registry = TransformerRegistry::new();
    let previous = registry.register(
        TransformerEntry::new(Kind::String, Kind::named("Color"), |wire| {
            match wire.as_str().and_then(|s| s.strip_prefix('#')) {
                Some(hex) => ModelValue::Extension {
                    kind: "Color".to_string(),
                    payload: json!(hex.to_ascii_lowercase()),
                },
                None => ModelValue::Null,
            }
        })
        .with_reverse(|model| match model {
            ModelValue::Extension { payload, .. } => {
                json!(format!("#{}", payload.as_str().unwrap_or_default()))
            }
            _ => WireValue::Null,
        }),
    );
    assert!(previous.is_none());

    let t = ValueTransformer::new(registry);
    let color = t.transform_to_model(&json!("#FFAA00"), &Kind::named("Color")).unwrap();
    assert_eq!(color.kind(), Kind::named("Color"));
    assert_eq!(t.transform_to_wire(&color, &Kind::named("Color")).unwrap(), json!("#ffaa00"));
    assert_eq!(
        t.transform_to_model(&json!("orange"), &Kind::named("Color")).unwrap(),
        ModelValue::Null
    );
}

#[test]
fn test_unregistered_host_kind_is_unsupported() {
    let t = transformer();
    let err = t
        .transform_to_model(&json!("https://example.com"), &Kind::named("Link"))
        .unwrap_err();
    match err {
        Error::UnsupportedConversion { from, to } => {
            assert_eq!(from, Kind::String);
            assert_eq!(to, Kind::named("Link"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_collections() {
    let t = transformer();
    let mutable = t.transform_to_model(&json!(["b", "a"]), &Kind::MutableArray).unwrap();
    assert_eq!(
        mutable,
        ModelValue::MutableArray(vec![ModelValue::from("b"), ModelValue::from("a")])
    );
    assert_eq!(t.transform_to_wire(&mutable, &Kind::MutableArray).unwrap(), json!(["b", "a"]));

    let object = t.transform_to_model(&json!({"k": 1}), &Kind::MutableObject).unwrap();
    assert!(matches!(object, ModelValue::MutableObject(_)));
    assert_eq!(t.transform_to_wire(&object, &Kind::MutableObject).unwrap(), json!({"k": 1}));

    let set = t.transform_to_model(&json!([1, 1, 2]), &Kind::Set).unwrap();
    assert_eq!(set.as_elements().map(<[ModelValue]>::len), Some(2));
    let mut back: Vec<i64> = t
        .transform_to_wire(&set, &Kind::Set)
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_i64())
        .collect();
    back.sort_unstable();
    assert_eq!(back, vec![1, 2]);

    let mutable_set = t.transform_to_model(&json!(["x", "x"]), &Kind::MutableSet).unwrap();
    assert_eq!(mutable_set, ModelValue::MutableSet(vec![ModelValue::from("x")]));
}

#[test]
fn test_cluster_resolution_is_exposed() {
    assert_eq!(resolve_cluster(&Kind::MutableString), resolve_cluster(&Kind::String));
    assert_eq!(resolve_cluster(&Kind::named("Unknown")), Kind::named("Unknown"));
}

#[test]
fn test_config_from_json() {
    let config = TransformerConfig::from_json_str(
        r#"{"date_formats": ["calendar_date"], "date_fractional_seconds": false}"#,
    )
    .unwrap();
    assert_eq!(config.date_formats, vec![DateFormat::CalendarDate]);

    let t = ValueTransformer::from_config(&config).unwrap();
    let date = t.transform_to_model(&json!("2020-02-29"), &Kind::Date).unwrap();
    assert_eq!(t.transform_to_wire(&date, &Kind::Date).unwrap(), json!("2020-02-29T00:00:00Z"));
    assert_eq!(
        t.transform_to_model(&json!("2020-02-29T10:00:00Z"), &Kind::Date).unwrap(),
        ModelValue::Null
    );
}

#[test]
fn test_concurrent_dispatch_on_frozen_registry() {
    let t = std::sync::Arc::new(transformer());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let t = std::sync::Arc::clone(&t);
            std::thread::spawn(move || {
                for n in 0..100 {
                    let value = t.transform_to_model(&json!(n * i), &Kind::Bool).unwrap();
                    assert_eq!(value, ModelValue::Bool(n * i != 0));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_long_decimals_keep_every_digit() {
    let t = transformer();
    for text in [
        "12345678901234567890123456789.5",
        "0.1000000000000000000000000000001",
        "1234567890123456789012345678901234",
    ] {
        let value = t.transform_to_model(&json!(text), &Kind::Decimal).unwrap();
        assert!(matches!(value, ModelValue::Decimal(_)), "{} became {:?}", text, value);
        assert_eq!(t.transform_to_wire(&value, &Kind::Decimal).unwrap(), json!(text));
    }
}

#[test]
fn test_set_treats_equal_numbers_as_one_element() {
    let t = transformer();
    let set = t.transform_to_model(&json!([1, 1.0]), &Kind::Set).unwrap();
    assert_eq!(set, ModelValue::Set(vec![ModelValue::Integer(1)]));
    assert_eq!(t.transform_to_wire(&set, &Kind::Set).unwrap(), json!([1]));
}

#[test]
fn test_forward_only_override_keeps_builtin_serialization() {
    let mut registry = TransformerRegistry::new();
    registry.register(TransformerEntry::new(Kind::String, Kind::Url, |wire: &WireValue| {
        match wire.as_str().map(|s| format!("https://{}", s)) {
            Some(text) => url::Url::parse(&text).map_or(ModelValue::Null, ModelValue::Url),
            None => ModelValue::Null,
        }
    }));
    registry.register(TransformerEntry::new(Kind::Number, Kind::Bool, |wire: &WireValue| {
        ModelValue::Bool(wire.as_f64().map_or(false, |n| n > 0.0))
    }));
    let t = ValueTransformer::new(registry);

    let url = t.transform_to_model(&json!("example.com/a"), &Kind::Url).unwrap();
    assert_eq!(t.transform_to_wire(&url, &Kind::Url).unwrap(), json!("https://example.com/a"));

    assert_eq!(t.transform_to_model(&json!(-1), &Kind::Bool).unwrap(), ModelValue::Bool(false));
    assert_eq!(t.transform_to_wire(&ModelValue::Bool(true), &Kind::Bool).unwrap(), json!(1));
}

#[test]
fn test_epoch_seconds_date_encoding() {
    let config = TransformerConfig::default().with_date_encoding(DateEncoding::EpochSeconds);
    let t = ValueTransformer::from_config(&config).unwrap();

    let date = t.transform_to_model(&json!("2023-11-14T22:13:20Z"), &Kind::Date).unwrap();
    assert_eq!(t.transform_to_wire(&date, &Kind::Date).unwrap(), json!(1_700_000_000));

    let fractional = ModelValue::Date(Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap());
    assert_eq!(t.transform_to_wire(&fractional, &Kind::Date).unwrap(), json!(1_700_000_000.5));
}

#[test]
fn test_number_words_become_nan() {
    let t = transformer();
    for text in ["inf", "infinity", "nan"] {
        match t.transform_to_model(&json!(text), &Kind::Number).unwrap() {
            ModelValue::Float(f) => assert!(f.is_nan(), "{} became {}", text, f),
            other => panic!("expected NaN sentinel, got {:?}", other),
        }
    }
    assert_eq!(t.transform_to_model(&json!("15"), &Kind::Float).unwrap(), ModelValue::Float(15.0));
}

#[test]
fn test_null_string_placeholders() {
    assert!(is_null_string(Some(&json!("<null>"))));
    assert!(is_null_string(None));
    assert!(!is_null_string(Some(&json!("value"))));
}
