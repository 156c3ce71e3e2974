//! Built-in transformer table
//!
//! Order matters only for reverse selection: the first entry with a reverse
//! for a target kind becomes that kind's default serializer.
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

use super::coercers;
use super::collections;
use super::registry::{TransformerEntry, TransformerRegistry};
use crate::config::{DateEncoding, TransformerConfig};
use crate::kind::Kind;
use crate::value::{ModelValue, WireValue};

pub(crate) fn install(registry: &mut TransformerRegistry, config: &TransformerConfig) {
    // Bool serializes as 1/0, the (String, Bool) entry has no reverse.
    registry.add_default(
        TransformerEntry::new(Kind::Number, Kind::Bool, coercers::bool_from_number)
            .with_reverse(coercers::number_from_bool),
    );
    registry.add_default(TransformerEntry::new(
        Kind::String,
        Kind::Bool,
        coercers::bool_from_string,
    ));

    registry.add_default(TransformerEntry::new(
        Kind::String,
        Kind::Number,
        coercers::number_from_string,
    ));
    registry.add_default(TransformerEntry::new(
        Kind::Number,
        Kind::String,
        coercers::string_from_number,
    ));

    registry.add_default(
        TransformerEntry::new(Kind::String, Kind::Decimal, coercers::decimal_from_string)
            .with_reverse(coercers::string_from_decimal),
    );
    registry.add_default(TransformerEntry::new(
        Kind::Number,
        Kind::Decimal,
        coercers::decimal_from_number,
    ));

    registry.add_default(
        TransformerEntry::new(Kind::String, Kind::Url, coercers::url_from_string)
            .with_reverse(coercers::string_from_url),
    );
    registry.add_default(
        TransformerEntry::new(Kind::String, Kind::TimeZone, coercers::zone_from_string)
            .with_reverse(coercers::string_from_zone),
    );

    install_dates(registry, config);

    registry.add_default(
        TransformerEntry::new(
            Kind::String,
            Kind::MutableString,
            collections::mutable_string_from_string,
        )
        .with_reverse(collections::immutable_copy),
    );
    registry.add_default(
        TransformerEntry::new(
            Kind::Array,
            Kind::MutableArray,
            collections::mutable_array_from_array,
        )
        .with_reverse(collections::immutable_copy),
    );
    registry.add_default(
        TransformerEntry::new(
            Kind::Object,
            Kind::MutableObject,
            collections::mutable_object_from_object,
        )
        .with_reverse(collections::immutable_copy),
    );
    registry.add_default(
        TransformerEntry::new(Kind::Array, Kind::Set, collections::set_from_array)
            .with_reverse(collections::array_from_set),
    );
    registry.add_default(
        TransformerEntry::new(Kind::Array, Kind::MutableSet, collections::mutable_set_from_array)
            .with_reverse(collections::array_from_set),
    );
}

/// The two hidden date defaults.
///
/// Only one of them carries a reverse, chosen by the configured encoding.
fn install_dates(registry: &mut TransformerRegistry, config: &TransformerConfig) {
    let formats = config.date_formats.clone();
    let fractional = config.date_fractional_seconds;

    let parse = move |wire: &WireValue| coercers::date_from_string(wire, &formats);
    let mut from_string = TransformerEntry::new(Kind::String, Kind::Date, parse).hidden();
    let mut from_number =
        TransformerEntry::new(Kind::Number, Kind::Date, coercers::date_from_number).hidden();

    match config.date_encoding {
        DateEncoding::Rfc3339 => {
            let format = move |model: &ModelValue| coercers::string_from_date(model, fractional);
            from_string = from_string.with_reverse(format);
        }
        DateEncoding::EpochSeconds => {
            from_number = from_number.with_reverse(coercers::number_from_date);
        }
    }

    registry.add_default(from_string);
    registry.add_default(from_number);
}
