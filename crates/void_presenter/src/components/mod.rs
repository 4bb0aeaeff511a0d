//! Built-in component kinds
//!
//! Each kind brings its own host facet trait. A host implements the facets
//! it supports and can only present scenes using those kinds.

pub mod fields;
pub mod mesh;
pub mod renderer;
pub mod transform;

pub use fields::{FieldHost, FieldValue, Fields};
pub use mesh::{MeshFilter, MeshHost};
pub use renderer::{MeshRenderer, RendererHost, ShadowCasting};
pub use transform::{Transform, TransformHost};
