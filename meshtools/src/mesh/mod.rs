//! CPU-side mesh types.
//!
//! This module provides the mesh container the interleaving operations work
//! on:
//!
//! - [`CpuMesh`] - Vertex bytes, attribute placements and optional indices
//! - [`LayoutEntry`] / [`ResolvedAttribute`] - Attribute placement, unbound and
//!   bound to vertex bytes
//! - [`MeshBuffer`] - Owned or borrowed bytes
//! - [`StridedView`] / [`StridedViewMut`] - 2D views on strided bytes

mod buffer;
mod data;
mod layout;
mod strided;

pub(crate) use data::MeshParts;
pub use buffer::{DataFlags, MeshBuffer};
pub use data::{CpuMesh, IndexFormat, MeshIndices, PrimitiveTopology};
pub use layout::{
    AttributeDesc, LayoutEntry, ResolvedAttribute, VertexAttributeFormat, VertexAttributeSemantic,
};
pub use strided::{StridedView, StridedViewMut};
