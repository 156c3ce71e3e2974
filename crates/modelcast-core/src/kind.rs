//! Value kinds and the class cluster resolver
//!
//! A [`Kind`] names the category of a wire or model value. Several concrete
//! kinds (mutable variants, integer and float numbers) belong to the same
//! cluster and share one canonical umbrella kind; [`resolve_cluster`] performs
//! that mapping from a fixed table owned by this crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a value, used as the key of every transformer lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Null,
    Bool,
    /// Umbrella kind for every numeric variant
    Number,
    Integer,
    Float,
    String,
    MutableString,
    Decimal,
    Url,
    TimeZone,
    Date,
    Array,
    MutableArray,
    Object,
    MutableObject,
    Set,
    MutableSet,
    /// Host-domain kind introduced by a user registration
    Named(String),
}

/// Ordered (source, target) pair of kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindPair {
    pub source: Kind,
    pub target: Kind,
}

impl KindPair {
    pub fn new(source: Kind, target: Kind) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for KindPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Cluster membership table: concrete kind to its umbrella kind.
const CLUSTERS: &[(Kind, Kind)] = &[
    (Kind::MutableString, Kind::String),
    (Kind::MutableArray, Kind::Array),
    (Kind::MutableObject, Kind::Object),
    (Kind::MutableSet, Kind::Set),
    (Kind::Integer, Kind::Number),
    (Kind::Float, Kind::Number),
];

/// Return the umbrella kind for any member of a class cluster.
///
/// Kinds that belong to no cluster, including every [`Kind::Named`] kind,
/// are returned unchanged.
pub fn resolve_cluster(kind: &Kind) -> Kind {
    CLUSTERS
        .iter()
        .find(|(member, _)| member == kind)
        .map(|(_, umbrella)| umbrella.clone())
        .unwrap_or_else(|| kind.clone())
}

impl Kind {
    /// Build a host-domain kind
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    /// Canonical kind of this kind's cluster
    pub fn canonical(&self) -> Kind {
        resolve_cluster(self)
    }

    /// Whether this is a mutable variant of a cluster
    pub fn is_mutable(&self) -> bool {
        matches!(
            self,
            Kind::MutableString | Kind::MutableArray | Kind::MutableObject | Kind::MutableSet
        )
    }

    /// Whether values of this kind lower to the wire without a coercer
    pub fn is_wire(&self) -> bool {
        matches!(
            self.canonical(),
            Kind::Null | Kind::Bool | Kind::Number | Kind::String | Kind::Array | Kind::Object
        )
    }

    /// Mutable counterpart of an immutable cluster umbrella, if one exists
    pub fn mutable_variant(&self) -> Option<Kind> {
        match self {
            Kind::String => Some(Kind::MutableString),
            Kind::Array => Some(Kind::MutableArray),
            Kind::Object => Some(Kind::MutableObject),
            Kind::Set => Some(Kind::MutableSet),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Named(name) => f.write_str(name),
            other => write!(f, "{:?}", other),
        }
    }
}
