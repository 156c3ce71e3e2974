//! modelcast core - value transformation between JSON wire values and typed model values
//!
//! This crate converts parsed JSON values into strongly-typed model property
//! values and back. It does not parse JSON text or walk object graphs; a
//! mapping layer hands it one value and one declared kind at a time.
//!
//! # Main Components
//!
//! - **Kinds**: [`Kind`] and the class cluster resolver [`resolve_cluster`]
//! - **Values**: [`WireValue`] (a `serde_json::Value`) and [`ModelValue`]
//! - **Registry**: [`TransformerRegistry`], built during setup and extended with
//!   [`TransformerRegistry::register`] / [`TransformerRegistry::unregister`]
//! - **Dispatcher**: [`ValueTransformer`], frozen after construction
//! - **Error Handling**: [`Error`] built on `thiserror`
//!
//! # Example
//!
//! ```
//! use modelcast_core::{Kind, ModelValue, Result, ValueTransformer};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let transformer = ValueTransformer::with_defaults();
//!
//!     let flag = transformer.transform_to_model(&json!("0"), &Kind::Bool)?;
//!     assert_eq!(flag, ModelValue::Bool(false));
//!
//!     let wire = transformer.transform_to_wire(&ModelValue::Bool(true), &Kind::Bool)?;
//!     assert_eq!(wire, json!(1));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod kind;
pub mod transformer;
pub mod value;

// Re-export main types for convenience
pub use config::{DateEncoding, DateFormat, TransformerConfig};
pub use error::{Error, Result};
pub use kind::{resolve_cluster, Kind, KindPair};
pub use transformer::{
    EntryOrigin, TransformerEntry, TransformerRegistry, ValueTransformer,
};
pub use value::{is_null, is_null_string, wire_kind, ModelValue, WireValue, Zone};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
