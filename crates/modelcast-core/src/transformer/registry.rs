//! Transformer registry
//!
//! The registry keeps two tiers of entries keyed by [`KindPair`]:
//!
//! - the **override tier**, filled by [`TransformerRegistry::register`];
//! - the **default tier**, filled once with the built-in coercers.
//!
//! Lookups consult the override tier first. Registering a pair that has a
//! built-in entry shadows it, and [`TransformerRegistry::unregister`] brings it
//! back. The two built-in date entries are hidden: they never show up as the
//! "previous" entry of a registration and are not listed by
//! [`TransformerRegistry::entries`], but still act as the fallback whenever no
//! override covers their pair.
//!
//! A registry is mutable only while it is owned; once handed to a
//! [`ValueTransformer`](super::ValueTransformer) it is frozen behind an `Arc`.
//!
//! Copyright (c) 2025 modelcast contributors
//! Licensed under the Apache-2.0 license

use super::built_in;
use crate::config::TransformerConfig;
use crate::error::Result;
use crate::kind::{Kind, KindPair};
use crate::value::{ModelValue, WireValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Wire-to-model conversion
pub type ForwardFn = Arc<dyn Fn(&WireValue) -> ModelValue + Send + Sync>;

/// Model-to-wire conversion
pub type ReverseFn = Arc<dyn Fn(&ModelValue) -> WireValue + Send + Sync>;

/// Where an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    BuiltIn,
    Registered,
}

/// A coercer pair for one (source, target) kind pair
#[derive(Clone)]
pub struct TransformerEntry {
    pair: KindPair,
    forward: ForwardFn,
    reverse: Option<ReverseFn>,
    overridable: bool,
    origin: EntryOrigin,
    seq: u64,
}

impl TransformerEntry {
    /// Create an entry converting `source` wire values into `target` model values
    pub fn new<F>(source: Kind, target: Kind, forward: F) -> Self
    where
        F: Fn(&WireValue) -> ModelValue + Send + Sync + 'static,
    {
        Self {
            pair: KindPair::new(source, target),
            forward: Arc::new(forward),
            reverse: None,
            overridable: true,
            origin: EntryOrigin::Registered,
            seq: 0,
        }
    }

    /// Attach the model-to-wire direction
    pub fn with_reverse<R>(mut self, reverse: R) -> Self
    where
        R: Fn(&ModelValue) -> WireValue + Send + Sync + 'static,
    {
        self.reverse = Some(Arc::new(reverse));
        self
    }

    /// Mark a built-in entry as a hidden fallback
    pub(crate) fn hidden(mut self) -> Self {
        self.overridable = false;
        self
    }

    pub fn pair(&self) -> &KindPair {
        &self.pair
    }

    pub fn source(&self) -> &Kind {
        &self.pair.source
    }

    pub fn target(&self) -> &Kind {
        &self.pair.target
    }

    pub fn origin(&self) -> EntryOrigin {
        self.origin
    }

    /// False only for the hidden built-in date entries
    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    pub fn has_reverse(&self) -> bool {
        self.reverse.is_some()
    }

    /// Run the forward coercer
    pub fn forward(&self, wire: &WireValue) -> ModelValue {
        (self.forward)(wire)
    }

    /// Run the reverse coercer, if this entry has one
    pub fn reverse(&self, model: &ModelValue) -> Option<WireValue> {
        self.reverse.as_ref().map(|reverse| reverse(model))
    }
}

impl fmt::Debug for TransformerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerEntry")
            .field("pair", &self.pair)
            .field("has_reverse", &self.reverse.is_some())
            .field("overridable", &self.overridable)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Registry of active transformers
#[derive(Debug, Clone, Default)]
pub struct TransformerRegistry {
    overrides: HashMap<KindPair, TransformerEntry>,
    defaults: HashMap<KindPair, TransformerEntry>,
    /// Built-in entry providing the reverse for each model kind
    default_reverse: HashMap<Kind, KindPair>,
    next_seq: u64,
}

impl TransformerRegistry {
    /// Registry holding every built-in coercer
    pub fn new() -> Self {
        let mut registry = Self::empty();
        built_in::install(&mut registry, &TransformerConfig::default());
        registry
    }

    /// Registry with no entries at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry built from a validated configuration
    pub fn with_config(config: &TransformerConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = Self::empty();
        if config.include_builtins {
            built_in::install(&mut registry, config);
        }
        Ok(registry)
    }

    fn stamp(&mut self, mut entry: TransformerEntry, origin: EntryOrigin) -> TransformerEntry {
        self.next_seq += 1;
        entry.seq = self.next_seq;
        entry.origin = origin;
        entry
    }

    /// Add a built-in entry.
    ///
    /// The first built-in with a reverse for a target kind provides that
    /// kind's default serialization.
    pub(crate) fn add_default(&mut self, entry: TransformerEntry) {
        let entry = self.stamp(entry, EntryOrigin::BuiltIn);
        if entry.has_reverse() {
            self.default_reverse
                .entry(entry.target().clone())
                .or_insert_with(|| entry.pair.clone());
        }
        self.defaults.insert(entry.pair.clone(), entry);
    }

    /// Install an override and return the entry it replaces.
    ///
    /// The previous entry is the earlier override for the pair or, failing
    /// that, an overridable built-in. Hidden defaults are never returned; they
    /// stay in place as the fallback.
    pub fn register(&mut self, entry: TransformerEntry) -> Option<TransformerEntry> {
        let entry = self.stamp(entry, EntryOrigin::Registered);
        let pair = entry.pair.clone();
        let previous = self
            .overrides
            .insert(pair.clone(), entry)
            .or_else(|| self.defaults.get(&pair).filter(|e| e.overridable).cloned());

        match &previous {
            Some(prev) => {
                log::debug!("Registered transformer {} replacing {:?} entry", pair, prev.origin)
            }
            None if self.defaults.contains_key(&pair) => {
                log::debug!("Registered transformer {} shadowing the built-in default", pair)
            }
            None => log::debug!("Registered transformer {}", pair),
        }
        previous
    }

    /// Register forward and reverse closures for a pair
    pub fn register_fn<F, R>(
        &mut self,
        source: Kind,
        target: Kind,
        forward: F,
        reverse: R,
    ) -> Option<TransformerEntry>
    where
        F: Fn(&WireValue) -> ModelValue + Send + Sync + 'static,
        R: Fn(&ModelValue) -> WireValue + Send + Sync + 'static,
    {
        self.register(TransformerEntry::new(source, target, forward).with_reverse(reverse))
    }

    /// Remove the override for a pair, re-exposing any built-in entry
    pub fn unregister(&mut self, source: &Kind, target: &Kind) -> Option<TransformerEntry> {
        let pair = KindPair::new(source.clone(), target.clone());
        let removed = self.overrides.remove(&pair);
        if removed.is_some() {
            log::debug!(
                "Unregistered transformer {}; built-in fallback {}",
                pair,
                if self.defaults.contains_key(&pair) { "restored" } else { "absent" }
            );
        }
        removed
    }

    /// Effective entry for a pair, hidden defaults included
    pub fn resolve(&self, pair: &KindPair) -> Option<&TransformerEntry> {
        self.overrides.get(pair).or_else(|| self.defaults.get(pair))
    }

    /// Visible entry for a pair
    pub fn get(&self, source: &Kind, target: &Kind) -> Option<&TransformerEntry> {
        self.resolve(&KindPair::new(source.clone(), target.clone()))
            .filter(|entry| entry.overridable)
    }

    /// Whether any entry, hidden or not, handles the pair
    pub fn contains(&self, source: &Kind, target: &Kind) -> bool {
        self.resolve(&KindPair::new(source.clone(), target.clone())).is_some()
    }

    /// Entry that serializes model values of `kind`.
    ///
    /// The most recent override targeting `kind` with a reverse wins. Otherwise
    /// the kind's built-in reverse applies, even when a forward-only override
    /// shadows that built-in's pair: the two directions are replaced
    /// independently.
    pub fn reverse_for(&self, kind: &Kind) -> Option<&TransformerEntry> {
        let registered = self
            .overrides
            .values()
            .filter(|entry| entry.target() == kind && entry.has_reverse())
            .max_by_key(|entry| entry.seq);
        if registered.is_some() {
            return registered;
        }

        let pair = self.default_reverse.get(kind)?;
        self.defaults.get(pair)
    }

    /// Active visible entries, ordered by pair
    pub fn entries(&self) -> Vec<&TransformerEntry> {
        let mut entries: Vec<&TransformerEntry> = self
            .overrides
            .values()
            .chain(
                self.defaults
                    .values()
                    .filter(|e| e.overridable && !self.overrides.contains_key(&e.pair)),
            )
            .collect();
        entries.sort_by(|a, b| a.pair.cmp(&b.pair));
        entries
    }

    /// Number of visible active entries
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
