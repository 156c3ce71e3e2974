//! Value transformation between wire and model values
//!
//! # Module Organization
//!
//! - [`coercers`] - total primitive conversions (bool, number, decimal, URL, time zone, date)
//! - [`collections`] - mutability and set/array adapters
//! - [`registry`] - two-tier transformer registry and the extension point
//! - [`dispatcher`] - [`ValueTransformer`], the public entry point
//! - `built_in` - the default entry table
//!
//! # Examples
//!
//! ```
//! use modelcast_core::{Kind, ModelValue, TransformerEntry, TransformerRegistry, ValueTransformer};
//! use serde_json::json;
//!
//! let mut registry = TransformerRegistry::new();
//!
//! // Hex colors arrive as strings and live in the model as an extension kind
//! registry.register(
//!     TransformerEntry::new(Kind::String, Kind::named("Color"), |wire| ModelValue::Extension {
//!         kind: "Color".to_string(),
//!         payload: wire.clone(),
//!     })
//!     .with_reverse(|model| match model {
//!         ModelValue::Extension { payload, .. } => payload.clone(),
//!         _ => serde_json::Value::Null,
//!     }),
//! );
//!
//! let transformer = ValueTransformer::new(registry);
//! let color = transformer
//!     .transform_to_model(&json!("#ff8800"), &Kind::named("Color"))
//!     .unwrap();
//! assert_eq!(
//!     transformer.transform_to_wire(&color, &Kind::named("Color")).unwrap(),
//!     json!("#ff8800")
//! );
//! ```
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

pub mod coercers;
pub mod collections;
pub mod registry;
pub mod dispatcher;

mod built_in;

pub use dispatcher::ValueTransformer;
pub use registry::{EntryOrigin, ForwardFn, ReverseFn, TransformerEntry, TransformerRegistry};
