//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format
//! - [`MeshIndices`] - Index buffer with format, offset and stride
//! - [`CpuMesh`] - CPU-side mesh holding vertex bytes and attribute placements

use crate::error::{MeshError, MeshResult};

use super::buffer::{DataFlags, MeshBuffer};
use super::layout::{LayoutEntry, ResolvedAttribute, VertexAttributeSemantic};
use super::strided::{StridedView, StridedViewMut};

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Like a line strip, with the last vertex connected back to the first.
    LineLoop,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Triangles sharing the first vertex.
    TriangleFan,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::LineStrip | Self::LineLoop | Self::TriangleStrip | Self::TriangleFan => None, // Variable
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 8-bit unsigned integers.
    Uint8,
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
    /// Backend-defined index type whose size can't be computed generically.
    ImplementationSpecific(u32),
}

impl IndexFormat {
    /// Get the size in bytes of each index, `None` for implementation-specific
    /// types.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Uint8 => Some(1),
            Self::Uint16 => Some(2),
            Self::Uint32 => Some(4),
            Self::ImplementationSpecific(_) => None,
        }
    }

    /// Check whether this is a backend-defined type of unknown size.
    pub fn is_implementation_specific(&self) -> bool {
        matches!(self, Self::ImplementationSpecific(_))
    }
}

/// Index data of a mesh.
///
/// Indices don't need to be tightly packed: they start `offset` bytes into
/// the buffer and consecutive indices are `stride` bytes apart.
#[derive(Debug)]
pub struct MeshIndices<'a> {
    pub(crate) format: IndexFormat,
    pub(crate) data: MeshBuffer<'a>,
    pub(crate) offset: usize,
    pub(crate) stride: usize,
    pub(crate) count: usize,
}

impl<'a> MeshIndices<'a> {
    /// Create strided indices.
    ///
    /// Fails with [`MeshError::IndexDataOutOfBounds`] if the last index
    /// reaches past the end of `data`. Implementation-specific types are
    /// checked as if they were one byte large.
    pub fn new(
        format: IndexFormat,
        data: impl Into<MeshBuffer<'a>>,
        offset: usize,
        stride: usize,
        count: usize,
    ) -> MeshResult<Self> {
        let data = data.into();
        let size = format.size().unwrap_or(1);
        if count > 0 {
            let end = (count - 1)
                .checked_mul(stride)
                .and_then(|last| last.checked_add(offset))
                .and_then(|last| last.checked_add(size));
            if end.map_or(true, |end| end > data.len()) {
                return Err(MeshError::IndexDataOutOfBounds);
            }
        }
        Ok(Self {
            format,
            data,
            offset,
            stride,
            count,
        })
    }

    /// Create tightly packed indices covering the whole buffer.
    pub fn packed(format: IndexFormat, data: impl Into<MeshBuffer<'a>>) -> MeshResult<Self> {
        let size = match format {
            IndexFormat::ImplementationSpecific(id) => {
                return Err(MeshError::ImplementationSpecificIndexType(id))
            }
            known => known.size().unwrap_or(1),
        };
        let data = data.into();
        let count = data.len() / size;
        Self::new(format, data, 0, size, count)
    }

    /// Borrow u16 indices.
    pub fn from_u16(indices: &'a [u16]) -> Self {
        Self {
            format: IndexFormat::Uint16,
            data: MeshBuffer::Borrowed(bytemuck::cast_slice(indices)),
            offset: 0,
            stride: 2,
            count: indices.len(),
        }
    }

    /// Borrow u32 indices.
    pub fn from_u32(indices: &'a [u32]) -> Self {
        Self {
            format: IndexFormat::Uint32,
            data: MeshBuffer::Borrowed(bytemuck::cast_slice(indices)),
            offset: 0,
            stride: 4,
            count: indices.len(),
        }
    }

    /// Get the index format.
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// Byte offset of the first index.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte distance between consecutive indices.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Get the number of indices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The whole index buffer, including any bytes around the indices.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Ownership and mutability of the index buffer.
    pub fn data_flags(&self) -> DataFlags {
        self.data.flags()
    }

    /// Check if the indices are tightly packed.
    pub fn is_packed(&self) -> bool {
        self.format.size() == Some(self.stride)
    }

    /// Strided view on the indices, `None` for implementation-specific types.
    pub fn view(&self) -> Option<StridedView<'_>> {
        let size = self.format.size()?;
        StridedView::new(
            self.data.as_slice(),
            self.offset,
            self.count,
            size,
            self.stride as isize,
        )
        .ok()
    }

    /// Read index `index` widened to u32.
    pub fn get(&self, index: usize) -> Option<u32> {
        let view = self.view()?;
        if index >= view.len() {
            return None;
        }
        let row = view.row(index);
        Some(match self.format {
            IndexFormat::Uint8 => row[0] as u32,
            IndexFormat::Uint16 => bytemuck::pod_read_unaligned::<u16>(row) as u32,
            _ => bytemuck::pod_read_unaligned::<u32>(row),
        })
    }

    /// All indices widened to u32, `None` for implementation-specific types.
    pub fn to_u32_vec(&self) -> Option<Vec<u32>> {
        (0..self.count).map(|i| self.get(i)).collect()
    }

    /// A non-owning view of the same indices.
    pub fn borrowed(&self) -> MeshIndices<'_> {
        MeshIndices {
            format: self.format,
            data: self.data.borrowed(),
            offset: self.offset,
            stride: self.stride,
            count: self.count,
        }
    }

    /// Detach from the borrowed lifetime, copying the buffer if needed.
    pub fn into_owned(self) -> MeshIndices<'static> {
        MeshIndices {
            format: self.format,
            data: self.data.into_owned(),
            offset: self.offset,
            stride: self.stride,
            count: self.count,
        }
    }
}

/// Parts of a mesh, used to take it apart without copying.
pub(crate) struct MeshParts<'a> {
    pub topology: PrimitiveTopology,
    pub indices: Option<MeshIndices<'a>>,
    pub vertex_data: MeshBuffer<'a>,
    pub attributes: Vec<LayoutEntry>,
    pub vertex_count: usize,
    pub label: Option<String>,
}

/// A CPU-side mesh holding raw vertex and index data.
///
/// Vertex data is a single byte buffer; each attribute is a [`LayoutEntry`]
/// giving its offset from the buffer start and its stride. Attributes may be
/// interleaved, stored in separate blocks, or overlap each other.
///
/// Buffers are either owned by the mesh or borrowed, see [`MeshBuffer`].
/// Operations that consume a mesh by value can reuse owned buffers without
/// copying.
pub struct CpuMesh<'a> {
    topology: PrimitiveTopology,
    indices: Option<MeshIndices<'a>>,
    vertex_data: MeshBuffer<'a>,
    attributes: Vec<LayoutEntry>,
    vertex_count: usize,
    label: Option<String>,
}

impl<'a> CpuMesh<'a> {
    /// Create a mesh from vertex bytes and attribute placements.
    ///
    /// Fails with [`MeshError::AttributeOutOfBounds`] if any attribute reaches
    /// past the end of `vertex_data`. Implementation-specific formats are
    /// checked as if they were one byte large.
    pub fn new(
        topology: PrimitiveTopology,
        vertex_data: impl Into<MeshBuffer<'a>>,
        attributes: Vec<LayoutEntry>,
        vertex_count: usize,
    ) -> MeshResult<Self> {
        let vertex_data = vertex_data.into();
        for (index, entry) in attributes.iter().enumerate() {
            StridedView::new(
                vertex_data.as_slice(),
                entry.offset,
                vertex_count,
                entry.pessimistic_size(),
                entry.stride,
            )
            .map_err(|_| MeshError::AttributeOutOfBounds { index })?;
        }
        Ok(Self::from_parts(MeshParts {
            topology,
            indices: None,
            vertex_data,
            attributes,
            vertex_count,
            label: None,
        }))
    }

    /// Create a mesh without attributes.
    pub fn empty(topology: PrimitiveTopology, vertex_count: usize) -> Self {
        Self::from_parts(MeshParts {
            topology,
            indices: None,
            vertex_data: MeshBuffer::default(),
            attributes: Vec::new(),
            vertex_count,
            label: None,
        })
    }

    /// Create a mesh borrowing a slice of plain vertex structs.
    ///
    /// Attribute offsets are relative to the start of the slice.
    pub fn from_vertices<T: bytemuck::Pod>(
        topology: PrimitiveTopology,
        vertices: &'a [T],
        attributes: Vec<LayoutEntry>,
    ) -> MeshResult<Self> {
        let bytes: &'a [u8] = bytemuck::cast_slice(vertices);
        Self::new(topology, bytes, attributes, vertices.len())
    }

    /// Assemble a mesh from parts that are known to be consistent.
    pub(crate) fn from_parts(parts: MeshParts<'a>) -> Self {
        Self {
            topology: parts.topology,
            indices: parts.indices,
            vertex_data: parts.vertex_data,
            attributes: parts.attributes,
            vertex_count: parts.vertex_count,
            label: parts.label,
        }
    }

    /// Take the mesh apart.
    pub(crate) fn into_parts(self) -> MeshParts<'a> {
        MeshParts {
            topology: self.topology,
            indices: self.indices,
            vertex_data: self.vertex_data,
            attributes: self.attributes,
            vertex_count: self.vertex_count,
            label: self.label,
        }
    }

    /// Set index data.
    pub fn with_indices(mut self, indices: MeshIndices<'a>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Get the raw vertex data.
    pub fn vertex_data(&self) -> &[u8] {
        self.vertex_data.as_slice()
    }

    /// Get the raw vertex data mutably, `None` if it's borrowed read-only.
    pub fn mutable_vertex_data(&mut self) -> Option<&mut [u8]> {
        self.vertex_data.as_mut_slice()
    }

    /// Ownership and mutability of the vertex buffer.
    pub fn vertex_data_flags(&self) -> DataFlags {
        self.vertex_data.flags()
    }

    /// Get the attribute placements.
    pub fn attributes(&self) -> &[LayoutEntry] {
        &self.attributes
    }

    /// Get the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get the index data.
    pub fn indices(&self) -> Option<&MeshIndices<'a>> {
        self.indices.as_ref()
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Resolve attribute `index` against the vertex data.
    ///
    /// For implementation-specific formats each row is a single byte.
    pub fn attribute(&self, index: usize) -> Option<ResolvedAttribute<'_>> {
        let entry = *self.attributes.get(index)?;
        let data = StridedView::new(
            self.vertex_data.as_slice(),
            entry.offset,
            self.vertex_count,
            entry.pessimistic_size(),
            entry.stride,
        )
        .ok()?;
        Some(ResolvedAttribute { entry, data })
    }

    /// Find the first attribute with the given semantic.
    pub fn attribute_id(&self, semantic: VertexAttributeSemantic) -> Option<usize> {
        self.attributes.iter().position(|a| a.semantic() == semantic)
    }

    /// Resolve the first attribute with the given semantic.
    pub fn attribute_by_semantic(
        &self,
        semantic: VertexAttributeSemantic,
    ) -> Option<ResolvedAttribute<'_>> {
        self.attribute(self.attribute_id(semantic)?)
    }

    /// Mutable view on attribute `index`.
    pub fn attribute_mut(&mut self, index: usize) -> MeshResult<StridedViewMut<'_>> {
        let entry = *self
            .attributes
            .get(index)
            .ok_or(MeshError::AttributeOutOfBounds { index })?;
        let vertex_count = self.vertex_count;
        let bytes = self
            .vertex_data
            .as_mut_slice()
            .ok_or(MeshError::VertexDataNotMutable)?;
        StridedViewMut::new(
            bytes,
            entry.offset,
            vertex_count,
            entry.pessimistic_size(),
            entry.stride,
        )
    }

    /// A non-owning view of the same mesh.
    pub fn borrowed(&self) -> CpuMesh<'_> {
        CpuMesh {
            topology: self.topology,
            indices: self.indices.as_ref().map(MeshIndices::borrowed),
            vertex_data: self.vertex_data.borrowed(),
            attributes: self.attributes.clone(),
            vertex_count: self.vertex_count,
            label: self.label.clone(),
        }
    }

    /// Detach from the borrowed lifetime.
    ///
    /// Owned buffers are kept as they are, borrowed ones are copied.
    pub fn into_owned(self) -> CpuMesh<'static> {
        CpuMesh {
            topology: self.topology,
            indices: self.indices.map(MeshIndices::into_owned),
            vertex_data: self.vertex_data.into_owned(),
            attributes: self.attributes,
            vertex_count: self.vertex_count,
            label: self.label,
        }
    }
}

impl std::fmt::Debug for CpuMesh<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertex_count)
            .field("vertex_bytes", &self.vertex_data.len())
            .field("vertex_flags", &self.vertex_data.flags())
            .field("attribute_count", &self.attributes.len())
            .field(
                "index_count",
                &self.indices.as_ref().map(MeshIndices::count),
            )
            .finish()
    }
}
