//! Identifiers carried by scene snapshots

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Category of a component facet (transform, mesh, layout, ...)
///
/// Kinds are stable per category rather than per payload type: two payload
/// types may share a kind, in which case they replace each other on a node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKind {
    name: &'static str,
}

impl ComponentKind {
    /// Create a kind from its category name
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Get the category name
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity a node exposes so other nodes can reference it within a pass
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublishToken(u64);

impl PublishToken {
    /// Create a token from a raw value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PublishToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublishToken({})", self.0)
    }
}

impl fmt::Display for PublishToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session-scoped token allocator
///
/// Each presentation session owns one, so independent sessions never share
/// counters.
pub struct TokenAllocator {
    next: AtomicU64,
}

impl TokenAllocator {
    /// Create a new allocator
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next unique token
    pub fn next(&self) -> PublishToken {
        PublishToken(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of tokens handed out so far
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAllocator")
            .field("allocated", &self.allocated())
            .finish()
    }
}

/// Opaque key attached to a node for hit-testing and lookup
///
/// The presenter only compares keys and hands them to the host; what they
/// mean is up to whoever reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityKey {
    /// Signed integer key
    Int(i64),
    /// Unsigned integer key
    Uint(u64),
    /// String key
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl IdentityKey {
    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for IdentityKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for IdentityKey {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for IdentityKey {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<u32> for IdentityKey {
    fn from(v: u32) -> Self {
        Self::Uint(v as u64)
    }
}

impl From<&str> for IdentityKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<u8>> for IdentityKey {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}
