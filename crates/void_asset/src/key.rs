//! Keys identifying resources and the callbacks waiting on them

use core::fmt;

/// Category of a loadable resource
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKind(&'static str);

impl ResourceKind {
    /// Mesh geometry
    pub const MESH: Self = Self("mesh");
    /// Material / shader parameters
    pub const MATERIAL: Self = Self("material");
    /// Texture image
    pub const TEXTURE: Self = Self("texture");
    /// 2D sprite
    pub const SPRITE: Self = Self("sprite");
    /// Font face
    pub const FONT: Self = Self("font");
    /// Prefabricated node hierarchy
    pub const PREFAB: Self = Self("prefab");

    /// Create a custom kind
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Get the kind name
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKind({})", self.0)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Cache key: an address plus the kind of resource expected there
///
/// The same address loaded as two different kinds is two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey {
    address: String,
    kind: ResourceKind,
}

impl LoadKey {
    /// Create a new key
    pub fn new(address: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            address: address.into(),
            kind,
        }
    }

    /// Get the address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the resource kind
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.address)
    }
}

/// Identity of a callback site
///
/// Together with the requesting node this is what makes a pending load
/// unique: a second request from the same node through the same slot replaces
/// the first, while identical requests from different nodes are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackSlot {
    name: &'static str,
    index: u64,
}

impl CallbackSlot {
    /// Create a slot for a single callback site
    pub const fn new(name: &'static str) -> Self {
        Self { name, index: 0 }
    }

    /// Create a slot for one element of an indexed callback site
    pub const fn indexed(name: &'static str, index: u64) -> Self {
        Self { name, index }
    }

    /// Create a slot keyed by a dynamic label
    pub fn labeled(name: &'static str, label: &str) -> Self {
        // FNV-1a
        let mut hash = 0xcbf29ce484222325u64;
        for byte in label.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        Self { name, index: hash }
    }

    /// Get the site name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the index within the site
    pub fn index(&self) -> u64 {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_key_identity() {
        let mesh = LoadKey::new("addr/cube", ResourceKind::MESH);
        let same = LoadKey::new(String::from("addr/cube"), ResourceKind::MESH);
        let other_kind = LoadKey::new("addr/cube", ResourceKind::MATERIAL);

        assert_eq!(mesh, same);
        assert_ne!(mesh, other_kind);
        assert_eq!(mesh.to_string(), "mesh:addr/cube");
    }

    #[test]
    fn test_callback_slots() {
        assert_ne!(CallbackSlot::indexed("materials", 0), CallbackSlot::indexed("materials", 1));
        assert_eq!(CallbackSlot::labeled("fields", "sprite"), CallbackSlot::labeled("fields", "sprite"));
        assert_ne!(CallbackSlot::labeled("fields", "sprite"), CallbackSlot::labeled("fields", "font"));
    }
}
