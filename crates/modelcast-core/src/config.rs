//! Configuration for building a transformer registry
//!
//! Configuration is read once during setup, typically from JSON embedded in
//! the host application's settings, and is not consulted after the registry
//! is frozen.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Textual date layouts understood by the default string-to-date coercer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `2023-11-14T22:13:20Z`, `2023-11-14T22:13:20.5+01:00`
    Rfc3339,
    /// `2023-11-14T22:13:20+0100`
    IsoCompactOffset,
    /// `2023-11-14T221320+0000`
    IsoBasicTime,
    /// `2023-11-14T22:13:20`, read as UTC
    IsoLocal,
    /// `2023-11-14 22:13:20`, read as UTC
    SpaceSeparated,
    /// `Tue, 14 Nov 2023 22:13:20 +0000`
    Rfc2822,
    /// `2023-11-14`, midnight UTC
    CalendarDate,
}

impl DateFormat {
    /// Default priority order; the first format that parses wins
    pub const DEFAULT_ORDER: [DateFormat; 7] = [
        DateFormat::Rfc3339,
        DateFormat::IsoCompactOffset,
        DateFormat::IsoBasicTime,
        DateFormat::IsoLocal,
        DateFormat::SpaceSeparated,
        DateFormat::Rfc2822,
        DateFormat::CalendarDate,
    ];
}

/// Wire form produced when a date is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateEncoding {
    /// RFC 3339 text in UTC
    #[default]
    Rfc3339,
    /// Seconds since the Unix epoch, fractional when needed
    EpochSeconds,
}

/// Registry construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Formats tried, in order, when turning a string into a date
    pub date_formats: Vec<DateFormat>,

    /// Register the built-in coercers
    pub include_builtins: bool,

    /// Emit fractional seconds when serializing dates that have them
    pub date_fractional_seconds: bool,

    /// Wire form of serialized dates
    pub date_encoding: DateEncoding,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            date_formats: DateFormat::DEFAULT_ORDER.to_vec(),
            include_builtins: true,
            date_fractional_seconds: true,
            date_encoding: DateEncoding::Rfc3339,
        }
    }
}

impl TransformerConfig {
    /// Parse a configuration from JSON text and validate it
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TransformerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.include_builtins && self.date_formats.is_empty() {
            return Err(Error::Configuration {
                message: "date_formats must list at least one format when builtins are enabled"
                    .to_string(),
                source: None,
            });
        }
        Ok(())
    }

    pub fn with_date_formats(mut self, formats: Vec<DateFormat>) -> Self {
        self.date_formats = formats;
        self
    }

    pub fn with_date_encoding(mut self, encoding: DateEncoding) -> Self {
        self.date_encoding = encoding;
        self
    }

    pub fn without_builtins(mut self) -> Self {
        self.include_builtins = false;
        self
    }
}
