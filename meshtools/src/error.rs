//! Error types for mesh construction and interleaving.

use thiserror::Error;

use crate::mesh::VertexAttributeFormat;

/// Errors reported by mesh containers and the interleaving operations.
///
/// Every error is reported before any caller-visible buffer is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("the mesh is not interleaved")]
    NotInterleaved,
    #[error("vertex data is not mutable")]
    VertexDataNotMutable,
    #[error("negative padding {padding} in extra attribute {index} too large for stride {stride}")]
    NegativePaddingTooLarge {
        index: usize,
        padding: isize,
        stride: usize,
    },
    #[error("attribute {index} has implementation-specific format {format:?}, its size is unknown")]
    ImplementationSpecificFormat {
        index: usize,
        format: VertexAttributeFormat,
    },
    #[error("index type is implementation-specific ({0:#x}), can't repack it")]
    ImplementationSpecificIndexType(u32),
    #[error("attribute {index} at offset {offset} with size {size} doesn't fit into stride {stride}")]
    AttributeExceedsStride {
        index: usize,
        offset: usize,
        size: usize,
        stride: usize,
    },
    #[error("extra attribute {index} expected to have {expected} items but got {got}")]
    ExtraAttributeCountMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("extra attribute {index} expected to have {expected} bytes per item but got {got}")]
    ExtraAttributeSizeMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("extra attribute {index} is offset-only, which is not supported")]
    OffsetOnlyExtraAttribute { index: usize },
    #[error("at least one attribute has to be specified to infer the vertex count")]
    NoVertexCount,
    #[error("attribute {index} reaches past the end of vertex data")]
    AttributeOutOfBounds { index: usize },
    #[error("indices reach past the end of index data")]
    IndexDataOutOfBounds,
    #[error("{vertex_count} vertices with stride {stride} don't fit into addressable memory")]
    VertexDataTooLarge { stride: usize, vertex_count: usize },
    #[error("strided view of {len} items reaches past the end of {size} bytes")]
    ViewOutOfBounds { len: usize, size: usize },
}

pub type MeshResult<T> = Result<T, MeshError>;
