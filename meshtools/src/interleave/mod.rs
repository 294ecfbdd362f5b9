//! Vertex attribute interleaving.
//!
//! This module checks whether the attributes of a [`CpuMesh`] share one
//! interleaved layout and produces interleaved copies of meshes:
//!
//! - [`is_interleaved`], [`interleaved_data`], [`interleaved_mutable_data`] -
//!   Detection and access to the interleaved bytes
//! - [`interleaved_layout`], [`interleaved_layout_ref`] - A mesh with the
//!   planned layout and an allocated but unfilled vertex buffer
//! - [`interleave`], [`interleave_ref`], [`interleave_attributes`] - Fully
//!   interleaved meshes
//! - [`plan_interleaved_layout`] - Just the offsets and stride
//!
//! Functions taking a mesh by value may reuse its owned buffers. The `_ref`
//! variants never do and always copy.
//!
//! # Extra attributes
//!
//! Every operation that builds a layout accepts a list of
//! [`ExtraAttribute`]s appended after the existing attributes. Padding entries
//! move the placement cursor by a signed number of bytes, so a negative
//! padding followed by an attribute makes it alias the bytes before it:
//!
//! ```
//! use redlilium_meshtools::interleave::{self, ExtraAttribute, InterleaveFlags};
//! use redlilium_meshtools::mesh::{
//!     AttributeDesc, CpuMesh, LayoutEntry, PrimitiveTopology, VertexAttributeFormat,
//!     VertexAttributeSemantic,
//! };
//!
//! let positions: [[f32; 3]; 2] = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let mesh = CpuMesh::from_vertices(
//!     PrimitiveTopology::LineList,
//!     &positions,
//!     vec![LayoutEntry::new(VertexAttributeSemantic::Position, VertexAttributeFormat::Float3, 0, 12)],
//! )?;
//!
//! // View the position bytes as integers as well
//! let extras = [
//!     ExtraAttribute::padding(-12),
//!     ExtraAttribute::reserved(
//!         AttributeDesc::new(VertexAttributeSemantic::Custom(0), VertexAttributeFormat::Uint3),
//!         2,
//!     ),
//! ];
//! let layout = interleave::interleaved_layout_ref(&mesh, 2, &extras, InterleaveFlags::default())?;
//! assert_eq!(layout.attributes()[1].offset, 0);
//! assert_eq!(layout.attributes()[1].stride, 12);
//! # Ok::<(), redlilium_meshtools::MeshError>(())
//! ```

mod detect;
mod indices;
mod materialize;
mod plan;

pub use detect::{detect_span, Interleaving, RowSpan};
pub use indices::{apply_index_policy, resolve_index_policy, IndexPolicy};
pub use plan::LayoutPlan;

use bitflags::bitflags;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{
    AttributeDesc, CpuMesh, LayoutEntry, MeshIndices, PrimitiveTopology, StridedView,
    StridedViewMut, VertexAttributeFormat, VertexAttributeSemantic,
};

bitflags! {
    /// Options for the interleaving operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InterleaveFlags: u8 {
        /// Keep an already interleaved layout, including its padding, instead
        /// of packing it tightly. Needed for implementation-specific formats.
        const PRESERVE_INTERLEAVED_ATTRIBUTES = 1 << 0;
        /// Keep strided index data as it is instead of packing it. Has no
        /// effect on the layout-only operations.
        const PRESERVE_STRIDED_INDICES = 1 << 1;
    }
}

impl Default for InterleaveFlags {
    fn default() -> Self {
        Self::PRESERVE_INTERLEAVED_ATTRIBUTES
    }
}

/// Where the values of an extra attribute come from.
#[derive(Debug, Clone, Copy)]
pub enum ExtraData<'a> {
    /// One row per vertex, copied into place.
    View(StridedView<'a>),
    /// Space is reserved for `len` vertices but nothing is copied. The
    /// contents of the reserved bytes are unspecified.
    Reserved { len: usize },
}

impl ExtraData<'_> {
    /// Number of vertices the data is for.
    pub fn len(&self) -> usize {
        match self {
            Self::View(view) => view.len(),
            Self::Reserved { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An entry appended after the existing attributes of a mesh.
#[derive(Debug, Clone, Copy)]
pub enum ExtraAttribute<'a> {
    /// An attribute with its data or reserved space.
    Attribute {
        desc: AttributeDesc,
        data: ExtraData<'a>,
    },
    /// An attribute placement without data. Only the layout operations
    /// accept these.
    OffsetOnly(LayoutEntry),
    /// Signed number of bytes to skip, negative values step back.
    Padding(isize),
}

impl<'a> ExtraAttribute<'a> {
    /// Extra attribute copied from `data`, one row per vertex.
    pub fn new(desc: AttributeDesc, data: StridedView<'a>) -> Self {
        Self::Attribute {
            desc,
            data: ExtraData::View(data),
        }
    }

    /// Extra attribute with space for `len` vertices and no data.
    pub fn reserved(desc: AttributeDesc, len: usize) -> Self {
        Self::Attribute {
            desc,
            data: ExtraData::Reserved { len },
        }
    }

    /// Extra attribute copied from a slice of plain values.
    pub fn from_slice<T: bytemuck::Pod>(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        values: &'a [T],
    ) -> Self {
        Self::new(
            AttributeDesc::new(semantic, format),
            StridedView::from_slice(values),
        )
    }

    /// Offset-only extra attribute.
    pub fn offset_only(entry: LayoutEntry) -> Self {
        Self::OffsetOnly(entry)
    }

    /// Padding of `bytes`, negative to step back.
    pub fn padding(bytes: isize) -> Self {
        Self::Padding(bytes)
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, Self::Padding(_))
    }

    /// Vertex count this entry implies, `None` for padding.
    pub fn vertex_count(&self) -> Option<usize> {
        match self {
            Self::Attribute { data, .. } => Some(data.len()),
            Self::OffsetOnly(_) => Some(0),
            Self::Padding(_) => None,
        }
    }
}

/// Check if all attributes of `mesh` share one interleaved layout.
///
/// True for meshes without attributes. Zero and negative strides are never
/// interleaved.
pub fn is_interleaved(mesh: &CpuMesh<'_>) -> bool {
    detect_span(mesh.attributes()).is_interleaved()
}

/// 2D view on the interleaved vertex bytes of `mesh`.
///
/// The first dimension is the vertex count, the second spans from the lowest
/// attribute offset to the end of the furthest attribute. For meshes without
/// attributes the second dimension is zero.
pub fn interleaved_data<'m>(mesh: &'m CpuMesh<'_>) -> MeshResult<StridedView<'m>> {
    let span = detect_span(mesh.attributes())
        .span()
        .ok_or(MeshError::NotInterleaved)?;
    detect::span_view(mesh.vertex_data(), span, mesh.vertex_count())
}

/// Mutable variant of [`interleaved_data`].
pub fn interleaved_mutable_data<'m>(
    mesh: &'m mut CpuMesh<'_>,
) -> MeshResult<StridedViewMut<'m>> {
    let span = detect_span(mesh.attributes())
        .span()
        .ok_or(MeshError::NotInterleaved)?;
    let vertex_count = mesh.vertex_count();
    let bytes = mesh
        .mutable_vertex_data()
        .ok_or(MeshError::VertexDataNotMutable)?;
    detect::span_view_mut(bytes, span, vertex_count)
}

/// Compute offsets and stride for `attributes` followed by `extras`.
///
/// The attribute vector is reused for the result.
pub fn plan_interleaved_layout(
    attributes: Vec<LayoutEntry>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<LayoutPlan> {
    plan::plan_layout(attributes, extras, flags)
}

/// Mesh with the interleaved layout of `mesh` plus `extras` and room for
/// `vertex_count` vertices.
///
/// No vertex data is copied and the result is never indexed. The attribute
/// list of `mesh` is reused. A mesh with neither attributes nor non-padding
/// extras gives an attribute-less mesh with `vertex_count` vertices.
pub fn interleaved_layout(
    mesh: CpuMesh<'_>,
    vertex_count: usize,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    materialize::layout_mesh(mesh, vertex_count, extras, flags)
}

/// See [`interleaved_layout`].
pub fn interleaved_layout_ref(
    mesh: &CpuMesh<'_>,
    vertex_count: usize,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    materialize::layout_mesh(mesh.borrowed(), vertex_count, extras, flags)
}

/// Interleave `mesh`, appending `extras`.
///
/// If the mesh is already interleaved, has owned vertex data and there are no
/// extras, its buffers are moved into the result as they are (with
/// [`InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES`]). Index data is
/// handled according to [`resolve_index_policy`].
///
/// Extras, the planned layout and the index data are all checked before any
/// buffer is moved or allocated.
pub fn interleave(
    mesh: CpuMesh<'_>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    materialize::interleave_mesh(mesh, extras, flags)
}

/// See [`interleave`]. All data is copied.
pub fn interleave_ref(
    mesh: &CpuMesh<'_>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    materialize::interleave_mesh(mesh.borrowed(), extras, flags)
}

/// Build an interleaved mesh from loose attributes.
///
/// The vertex count comes from the first non-padding entry of `attributes`,
/// [`MeshError::NoVertexCount`] if there's none.
pub fn interleave_attributes(
    topology: PrimitiveTopology,
    indices: Option<MeshIndices<'_>>,
    attributes: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    materialize::build_from_attributes(topology, indices, attributes, flags)
}
