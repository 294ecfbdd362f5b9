//! Vertex attribute descriptions.
//!
//! An attribute is described in two stages:
//!
//! - [`LayoutEntry`] - the **offset-only** form. It knows where an attribute
//!   lives relative to the start of a vertex buffer and how far apart
//!   consecutive elements are, but it is not bound to any buffer. Mesh
//!   attribute lists and layout plans both store this form.
//! - [`ResolvedAttribute`] - a [`LayoutEntry`] bound to concrete vertex bytes
//!   and a vertex count, obtained from [`CpuMesh::attribute`](super::CpuMesh::attribute).
//!
//! # Example
//!
//! ```
//! use redlilium_meshtools::mesh::{LayoutEntry, VertexAttributeFormat, VertexAttributeSemantic};
//!
//! // Position + normal sharing one 24-byte stride
//! let position = LayoutEntry::new(
//!     VertexAttributeSemantic::Position,
//!     VertexAttributeFormat::Float3,
//!     0,  // offset
//!     24, // stride
//! );
//! let normal = LayoutEntry::new(
//!     VertexAttributeSemantic::Normal,
//!     VertexAttributeFormat::Float3,
//!     12,
//!     24,
//! );
//! assert_eq!(position.element_size(), Some(12));
//! assert_eq!(normal.offset, 12);
//! ```

use super::strided::StridedView;

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position.
    Position,
    /// Vertex normal.
    Normal,
    /// Vertex tangent (typically float4, w = handedness).
    Tangent,
    /// Vertex bitangent.
    Bitangent,
    /// Texture coordinates set 0.
    TexCoord0,
    /// Texture coordinates set 1.
    TexCoord1,
    /// Vertex color.
    Color,
    /// Bone indices for skinning.
    Joints,
    /// Bone weights for skinning.
    Weights,
    /// Per-vertex object ID.
    ObjectId,
    /// Application-defined attribute.
    Custom(u16),
}

impl VertexAttributeSemantic {
    /// Get a unique index for this semantic (used for matching).
    pub fn index(&self) -> u32 {
        match self {
            Self::Position => 0,
            Self::Normal => 1,
            Self::Tangent => 2,
            Self::Bitangent => 3,
            Self::TexCoord0 => 4,
            Self::TexCoord1 => 5,
            Self::Color => 6,
            Self::Joints => 7,
            Self::Weights => 8,
            Self::ObjectId => 9,
            Self::Custom(id) => 0x8000 + *id as u32,
        }
    }
}

/// Format of a single vertex attribute element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Single 8-bit unsigned integer.
    Uint8,
    /// Single 8-bit signed integer.
    Sint8,
    /// Two 8-bit unsigned integers.
    Uint8x2,
    /// Four 8-bit unsigned integers.
    Uint8x4,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
    /// Four 8-bit signed integers (normalized to -1.0-1.0).
    Snorm8x4,
    /// Single 16-bit unsigned integer.
    Uint16,
    /// Single 16-bit signed integer.
    Sint16,
    /// Two 16-bit unsigned integers.
    Uint16x2,
    /// Four 16-bit unsigned integers.
    Uint16x4,
    /// Two 16-bit unsigned integers (normalized to 0.0-1.0).
    Unorm16x2,
    /// Four 16-bit unsigned integers (normalized to 0.0-1.0).
    Unorm16x4,
    /// Two 16-bit floats.
    Half2,
    /// Four 16-bit floats.
    Half4,
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Single 32-bit signed integer.
    Int,
    /// Two 32-bit signed integers.
    Int2,
    /// Three 32-bit signed integers.
    Int3,
    /// Four 32-bit signed integers.
    Int4,
    /// Single 32-bit unsigned integer.
    Uint,
    /// Two 32-bit unsigned integers.
    Uint2,
    /// Three 32-bit unsigned integers.
    Uint3,
    /// Four 32-bit unsigned integers.
    Uint4,
    /// Backend-defined format whose size can't be computed generically.
    ImplementationSpecific(u32),
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    ///
    /// Returns `None` for [`ImplementationSpecific`](Self::ImplementationSpecific).
    pub fn size(&self) -> Option<usize> {
        let size = match self {
            Self::Uint8 | Self::Sint8 => 1,
            Self::Uint8x2 | Self::Uint16 | Self::Sint16 => 2,
            Self::Uint8x4 | Self::Unorm8x4 | Self::Snorm8x4 => 4,
            Self::Uint16x2 | Self::Unorm16x2 | Self::Half2 => 4,
            Self::Uint16x4 | Self::Unorm16x4 | Self::Half4 => 8,
            Self::Float | Self::Int | Self::Uint => 4,
            Self::Float2 | Self::Int2 | Self::Uint2 => 8,
            Self::Float3 | Self::Int3 | Self::Uint3 => 12,
            Self::Float4 | Self::Int4 | Self::Uint4 => 16,
            Self::ImplementationSpecific(_) => return None,
        };
        Some(size)
    }

    /// Check whether this is a backend-defined format of unknown size.
    pub fn is_implementation_specific(&self) -> bool {
        matches!(self, Self::ImplementationSpecific(_))
    }
}

/// Name, format and array-ness of an attribute, without any placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeDesc {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Data format of one element.
    pub format: VertexAttributeFormat,
    /// Array size, `0` for non-array attributes.
    pub array_size: u16,
    /// Morph target this attribute belongs to, if any.
    pub morph_target_id: Option<u32>,
}

impl AttributeDesc {
    /// Create a non-array attribute description.
    pub fn new(semantic: VertexAttributeSemantic, format: VertexAttributeFormat) -> Self {
        Self {
            semantic,
            format,
            array_size: 0,
            morph_target_id: None,
        }
    }

    /// Set the array size.
    pub fn with_array_size(mut self, array_size: u16) -> Self {
        self.array_size = array_size;
        self
    }

    /// Set the morph target ID.
    pub fn with_morph_target(mut self, id: u32) -> Self {
        self.morph_target_id = Some(id);
        self
    }

    /// Size in bytes of one element, including all array items.
    ///
    /// Returns `None` for implementation-specific formats.
    pub fn element_size(&self) -> Option<usize> {
        self.format
            .size()
            .map(|size| size * self.array_size.max(1) as usize)
    }
}

/// Offset-only attribute placement: a description plus where it lives in a
/// vertex buffer, not yet bound to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutEntry {
    /// What the attribute is.
    pub desc: AttributeDesc,
    /// Byte offset of the first element from the vertex buffer start.
    pub offset: usize,
    /// Byte distance between consecutive elements.
    ///
    /// Zero and negative strides are representable but never interleaved.
    pub stride: isize,
}

impl LayoutEntry {
    /// Create a non-array entry.
    pub fn new(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        offset: usize,
        stride: isize,
    ) -> Self {
        Self::from_desc(AttributeDesc::new(semantic, format), offset, stride)
    }

    /// Create an entry from an existing description.
    pub fn from_desc(desc: AttributeDesc, offset: usize, stride: isize) -> Self {
        Self {
            desc,
            offset,
            stride,
        }
    }

    /// Set the array size.
    pub fn with_array_size(mut self, array_size: u16) -> Self {
        self.desc.array_size = array_size;
        self
    }

    /// Set the morph target ID.
    pub fn with_morph_target(mut self, id: u32) -> Self {
        self.desc.morph_target_id = Some(id);
        self
    }

    /// Semantic of the entry.
    pub fn semantic(&self) -> VertexAttributeSemantic {
        self.desc.semantic
    }

    /// Format of the entry.
    pub fn format(&self) -> VertexAttributeFormat {
        self.desc.format
    }

    /// See [`AttributeDesc::element_size`].
    pub fn element_size(&self) -> Option<usize> {
        self.desc.element_size()
    }

    /// Element size used for bounds checks, 1 byte for opaque formats.
    pub(crate) fn pessimistic_size(&self) -> usize {
        self.element_size().unwrap_or(1)
    }
}

/// An attribute bound to concrete vertex bytes.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAttribute<'m> {
    /// The placement this attribute was resolved from.
    pub entry: LayoutEntry,
    /// One row per vertex, each row being one element.
    pub data: StridedView<'m>,
}

impl ResolvedAttribute<'_> {
    /// Semantic of the attribute.
    pub fn semantic(&self) -> VertexAttributeSemantic {
        self.entry.desc.semantic
    }

    /// Format of the attribute.
    pub fn format(&self) -> VertexAttributeFormat {
        self.entry.desc.format
    }

    /// Read element `index` as a plain value.
    ///
    /// Returns `None` if the index is out of range or `T` doesn't match the
    /// element size.
    pub fn read<T: bytemuck::Pod>(&self, index: usize) -> Option<T> {
        if index >= self.data.len() {
            return None;
        }
        let row = self.data.row(index);
        if row.len() != std::mem::size_of::<T>() {
            return None;
        }
        Some(bytemuck::pod_read_unaligned(row))
    }
}
