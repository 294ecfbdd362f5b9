//! Interleaved layout detection.

use crate::error::MeshResult;
use crate::mesh::{LayoutEntry, StridedView, StridedViewMut};

/// Byte range every vertex occupies in an interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// Lowest attribute offset.
    pub min_offset: usize,
    /// Bytes from `min_offset` to the end of the furthest attribute.
    pub width: usize,
    /// Stride shared by all attributes.
    pub stride: usize,
}

/// Result of inspecting an attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleaving {
    /// All attributes share one stride and fit inside it.
    Interleaved(RowSpan),
    /// Strides differ, are not positive, or attributes spread past one stride.
    NotInterleaved,
}

impl Interleaving {
    /// The row span, if interleaved.
    pub fn span(self) -> Option<RowSpan> {
        match self {
            Self::Interleaved(span) => Some(span),
            Self::NotInterleaved => None,
        }
    }

    pub fn is_interleaved(self) -> bool {
        matches!(self, Self::Interleaved(_))
    }
}

/// Check whether `attributes` form a single interleaved layout.
///
/// An attribute list with no attributes is trivially interleaved. Attributes
/// of implementation-specific formats count as one byte, but once any of them
/// is present the span covers the whole stride.
pub fn detect_span(attributes: &[LayoutEntry]) -> Interleaving {
    let Some(first) = attributes.first() else {
        return Interleaving::Interleaved(RowSpan {
            min_offset: 0,
            width: 0,
            stride: 0,
        });
    };

    // Zero and negative strides are never interleaved
    if first.stride <= 0 {
        return Interleaving::NotInterleaved;
    }
    let stride = first.stride as usize;

    let mut min_offset = usize::MAX;
    let mut max_extent = 0;
    let mut has_opaque = false;
    for entry in attributes {
        if entry.stride != first.stride {
            return Interleaving::NotInterleaved;
        }
        min_offset = min_offset.min(entry.offset);
        let size = match entry.element_size() {
            Some(size) => size,
            None => {
                has_opaque = true;
                1
            }
        };
        max_extent = max_extent.max(entry.offset.saturating_add(size));
    }

    if has_opaque {
        max_extent = max_extent.max(min_offset.saturating_add(stride));
    }

    if max_extent - min_offset > stride {
        return Interleaving::NotInterleaved;
    }

    Interleaving::Interleaved(RowSpan {
        min_offset,
        width: max_extent - min_offset,
        stride,
    })
}

/// Row width of `span` clipped so the last of `vertex_count` rows stays
/// inside `buffer_len` bytes.
///
/// Only the whole-stride claim of implementation-specific formats can run
/// past the buffer end, the known attribute bytes are always inside.
fn clipped_width(span: RowSpan, vertex_count: usize, buffer_len: usize) -> usize {
    if vertex_count == 0 {
        return span.width;
    }
    let last_row = span.min_offset + (vertex_count - 1) * span.stride;
    span.width.min(buffer_len.saturating_sub(last_row))
}

/// 2D view on the vertex bytes covered by `span`.
pub(crate) fn span_view(
    bytes: &[u8],
    span: RowSpan,
    vertex_count: usize,
) -> MeshResult<StridedView<'_>> {
    let width = clipped_width(span, vertex_count, bytes.len());
    StridedView::new(
        bytes,
        span.min_offset,
        vertex_count,
        width,
        span.stride as isize,
    )
}

/// Mutable 2D view on the vertex bytes covered by `span`.
pub(crate) fn span_view_mut(
    bytes: &mut [u8],
    span: RowSpan,
    vertex_count: usize,
) -> MeshResult<StridedViewMut<'_>> {
    let width = clipped_width(span, vertex_count, bytes.len());
    StridedViewMut::new(
        bytes,
        span.min_offset,
        vertex_count,
        width,
        span.stride as isize,
    )
}
