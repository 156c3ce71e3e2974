//! Dispatcher
//!
//! [`ValueTransformer`] is the entry point used by mapping layers. It owns a
//! frozen [`TransformerRegistry`] and answers two questions: how does this wire
//! value become a model value of the declared kind, and how does this model
//! value go back to the wire.
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

use super::registry::{TransformerEntry, TransformerRegistry};
use crate::config::TransformerConfig;
use crate::error::{Error, Result};
use crate::kind::{resolve_cluster, Kind, KindPair};
use crate::value::{wire_kind, ModelValue, WireValue};
use std::sync::{Arc, OnceLock};

static SHARED: OnceLock<ValueTransformer> = OnceLock::new();

/// Name reported as the target when a model value cannot reach the wire
const WIRE_KIND_NAME: &str = "json";

/// Converts values between the wire and the model using a frozen registry
#[derive(Debug, Clone)]
pub struct ValueTransformer {
    registry: Arc<TransformerRegistry>,
}

impl ValueTransformer {
    /// Freeze a registry into a transformer
    pub fn new(registry: TransformerRegistry) -> Self {
        log::debug!(
            "Freezing transformer registry with {} visible entries ({} overrides)",
            registry.len(),
            registry.override_count()
        );
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Transformer over the built-in coercers only
    pub fn with_defaults() -> Self {
        Self::new(TransformerRegistry::new())
    }

    pub fn from_config(config: &TransformerConfig) -> Result<Self> {
        Ok(Self::new(TransformerRegistry::with_config(config)?))
    }

    /// Read-only view of the frozen registry
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Install this transformer as the process-wide instance.
    ///
    /// Succeeds once. Fails with [`Error::AlreadyInstalled`] if an instance was
    /// installed before or [`ValueTransformer::shared`] already created the
    /// default one.
    pub fn install(self) -> Result<&'static ValueTransformer> {
        SHARED.set(self).map_err(|_| Error::AlreadyInstalled)?;
        Ok(Self::shared())
    }

    /// Process-wide instance, created with defaults on first use
    pub fn shared() -> &'static ValueTransformer {
        SHARED.get_or_init(Self::with_defaults)
    }

    fn lookup(&self, source: &Kind, target: &Kind) -> Option<(&TransformerEntry, bool)> {
        let exact = KindPair::new(source.clone(), target.clone());
        if let Some(entry) = self.registry.resolve(&exact) {
            return Some((entry, false));
        }
        let canonical = resolve_cluster(target);
        if canonical == *target {
            return None;
        }
        self.registry
            .resolve(&KindPair::new(source.clone(), canonical))
            .map(|entry| (entry, true))
    }

    /// Convert a wire value into a model value of the `target` kind.
    ///
    /// `null` becomes [`ModelValue::Null`] for every target. Malformed content
    /// yields a sentinel; only a kind pair with no transformer and no
    /// pass-through fails.
    pub fn transform_to_model(&self, wire: &WireValue, target: &Kind) -> Result<ModelValue> {
        if wire.is_null() {
            return Ok(ModelValue::Null);
        }
        let source = resolve_cluster(&wire_kind(wire));

        if let Some((entry, retag)) = self.lookup(&source, target) {
            log::trace!("Transforming {} via {:?} entry {}", source, entry.origin(), entry.pair());
            let value = entry.forward(wire);
            return Ok(if retag { value.conform_to(target) } else { value });
        }

        if resolve_cluster(target) == source {
            log::trace!("Passing {} through unchanged to {}", source, target);
            return Ok(ModelValue::from_wire(wire).conform_to(target));
        }

        log::debug!("No transformer from {} to {}", source, target);
        Err(Error::unsupported(source, target.clone()))
    }

    /// Convert a model value declared as `source` back to the wire.
    ///
    /// The value's own kind must belong to the same cluster as `source`.
    pub fn transform_to_wire(&self, model: &ModelValue, source: &Kind) -> Result<WireValue> {
        if model.is_null() {
            return Ok(WireValue::Null);
        }

        let canonical = resolve_cluster(source);
        if resolve_cluster(&model.kind()) != canonical {
            log::debug!("Model value of kind {} declared as {}", model.kind(), source);
            return Err(Error::unsupported(model.kind(), source.clone()));
        }

        let entry = self.registry.reverse_for(source).or_else(|| {
            if canonical != *source {
                self.registry.reverse_for(&canonical)
            } else {
                None
            }
        });
        if let Some(wire) = entry.and_then(|entry| {
            log::trace!("Serializing {} via {:?} entry {}", source, entry.origin(), entry.pair());
            entry.reverse(model)
        }) {
            return Ok(wire);
        }

        if source.is_wire() {
            if let Some(wire) = model.to_wire() {
                return Ok(wire);
            }
        }

        log::debug!("No serializer for {} (value kind {})", source, model.kind());
        Err(Error::unsupported(source.clone(), Kind::named(WIRE_KIND_NAME)))
    }
}

impl Default for ValueTransformer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
