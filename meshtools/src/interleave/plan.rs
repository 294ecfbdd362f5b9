//! Interleaved layout planning.
//!
//! Planning only computes offsets and the shared stride, it never touches
//! vertex bytes. The result is a list of offset-only [`LayoutEntry`] values:
//! the original attributes first, followed by every non-padding extra.

use crate::error::{MeshError, MeshResult};
use crate::mesh::LayoutEntry;
use crate::profiling::profile_function;

use super::detect::{detect_span, RowSpan};
use super::{ExtraAttribute, InterleaveFlags};

/// Offsets and stride of an interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Stride shared by all entries.
    pub stride: usize,
    /// Original attributes followed by the extras, all with `stride`.
    pub entries: Vec<LayoutEntry>,
    /// Number of entries that came from the original attribute list.
    pub original_count: usize,
    /// Span of the original attributes when their interleaved layout was
    /// kept, `None` when they were packed anew.
    pub preserved: Option<RowSpan>,
}

impl LayoutPlan {
    /// Entries that came from the extras.
    pub fn extra_entries(&self) -> &[LayoutEntry] {
        &self.entries[self.original_count..]
    }
}

/// Compute an interleaved layout for `attributes` followed by `extras`.
///
/// With [`InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES`] an already
/// interleaved attribute list keeps its stride and relative offsets, including
/// any padding, only the initial offset is removed. Otherwise the attributes are
/// packed tightly in declaration order. Extras continue after that: padding
/// moves the cursor by its signed length, everything else is placed at the
/// cursor.
///
/// The attribute vector is rewritten in place.
pub fn plan_layout(
    attributes: Vec<LayoutEntry>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<LayoutPlan> {
    profile_function!();

    let original_count = attributes.len();
    let preserved = if flags.contains(InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES)
        && !attributes.is_empty()
    {
        detect_span(&attributes).span()
    } else {
        None
    };

    let mut entries = attributes;
    entries.reserve(extras.iter().filter(|e| !e.is_padding()).count());

    let mut cursor = match preserved {
        Some(span) => {
            for entry in &mut entries {
                entry.offset -= span.min_offset;
            }
            span.stride
        }
        None => {
            let mut offset = 0;
            for (index, entry) in entries.iter_mut().enumerate() {
                let size = entry.element_size().ok_or_else(|| {
                    log::warn!("Can't pack attribute {index} of format {:?}", entry.format());
                    MeshError::ImplementationSpecificFormat {
                        index,
                        format: entry.format(),
                    }
                })?;
                entry.offset = offset;
                offset += size;
            }
            offset
        }
    };

    for (index, extra) in extras.iter().enumerate() {
        let desc = match extra {
            ExtraAttribute::Padding(padding) => {
                let padding = *padding;
                if padding < 0 && padding.unsigned_abs() > cursor {
                    log::warn!("Negative padding {padding} in extra {index} exceeds stride {cursor}");
                    return Err(MeshError::NegativePaddingTooLarge {
                        index,
                        padding,
                        stride: cursor,
                    });
                }
                cursor = cursor.saturating_add_signed(padding);
                continue;
            }
            ExtraAttribute::Attribute { desc, .. } => *desc,
            ExtraAttribute::OffsetOnly(entry) => entry.desc,
        };

        let size = desc.element_size().ok_or_else(|| {
            log::warn!("Can't place extra attribute {index} of format {:?}", desc.format);
            MeshError::ImplementationSpecificFormat {
                index,
                format: desc.format,
            }
        })?;
        entries.push(LayoutEntry::from_desc(desc, cursor, 0));
        cursor += size;
    }

    let stride = cursor;
    for (index, entry) in entries.iter_mut().enumerate() {
        // Opaque formats only survive when preserved, and then claim the rest
        // of the original row
        let size = entry.element_size().unwrap_or_else(|| {
            preserved.map_or(1, |span| span.width.saturating_sub(entry.offset).max(1))
        });
        if entry.offset + size > stride {
            log::warn!(
                "Attribute {index} at offset {} doesn't fit into stride {stride}",
                entry.offset
            );
            return Err(MeshError::AttributeExceedsStride {
                index,
                offset: entry.offset,
                size,
                stride,
            });
        }
        entry.stride = stride as isize;
    }

    log::trace!(
        "Planned {} attributes ({} extra) with stride {stride}, preserved: {}",
        entries.len(),
        entries.len() - original_count,
        preserved.is_some()
    );

    Ok(LayoutPlan {
        stride,
        entries,
        original_count,
        preserved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{AttributeDesc, VertexAttributeFormat, VertexAttributeSemantic};

    fn entry(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        offset: usize,
        stride: isize,
    ) -> LayoutEntry {
        LayoutEntry::new(semantic, format, offset, stride)
    }

    fn offsets(plan: &LayoutPlan) -> Vec<usize> {
        plan.entries.iter().map(|e| e.offset).collect()
    }

    #[test]
    fn test_pack_non_interleaved() {
        let attributes = vec![
            entry(
                VertexAttributeSemantic::Position,
                VertexAttributeFormat::Float3,
                0,
                12,
            ),
            entry(
                VertexAttributeSemantic::Normal,
                VertexAttributeFormat::Float3,
                120,
                16,
            ),
        ];
        let plan = plan_layout(attributes, &[], InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 24);
        assert_eq!(offsets(&plan), vec![0, 12]);
        assert!(plan.entries.iter().all(|e| e.stride == 24));
        assert_eq!(plan.preserved, None);
    }

    #[test]
    fn test_preserve_removes_initial_offset() {
        let attributes = vec![
            entry(
                VertexAttributeSemantic::TexCoord0,
                VertexAttributeFormat::Float2,
                10,
                40,
            ),
            entry(
                VertexAttributeSemantic::Position,
                VertexAttributeFormat::Float3,
                24,
                40,
            ),
        ];
        let plan = plan_layout(attributes.clone(), &[], InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 40);
        assert_eq!(offsets(&plan), vec![0, 14]);

        // Without the flag the padding is dropped
        let plan = plan_layout(attributes, &[], InterleaveFlags::empty()).unwrap();
        assert_eq!(plan.stride, 20);
        assert_eq!(offsets(&plan), vec![0, 8]);
    }

    #[test]
    fn test_extras_and_padding() {
        let attributes = vec![
            entry(
                VertexAttributeSemantic::TexCoord0,
                VertexAttributeFormat::Float2,
                0,
                8,
            ),
            entry(
                VertexAttributeSemantic::Normal,
                VertexAttributeFormat::Float3,
                80,
                12,
            ),
        ];
        let extras = [
            ExtraAttribute::padding(1),
            ExtraAttribute::reserved(
                AttributeDesc::new(
                    VertexAttributeSemantic::Custom(15),
                    VertexAttributeFormat::Uint8,
                )
                .with_array_size(6),
                10,
            ),
            ExtraAttribute::padding(1),
            ExtraAttribute::reserved(
                AttributeDesc::new(VertexAttributeSemantic::Color, VertexAttributeFormat::Float3),
                10,
            ),
            ExtraAttribute::padding(4),
        ];
        let plan = plan_layout(attributes, &extras, InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 44);
        assert_eq!(offsets(&plan), vec![0, 8, 21, 28]);
        assert_eq!(plan.original_count, 2);
        assert_eq!(plan.extra_entries().len(), 2);
        assert_eq!(plan.entries[2].desc.array_size, 6);
    }

    #[test]
    fn test_negative_padding_aliases() {
        let attributes = vec![entry(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            0,
            12,
        )];
        let extras = [
            ExtraAttribute::padding(-12),
            ExtraAttribute::reserved(
                AttributeDesc::new(VertexAttributeSemantic::Normal, VertexAttributeFormat::Float3),
                3,
            ),
        ];
        let plan = plan_layout(attributes, &extras, InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 12);
        assert_eq!(offsets(&plan), vec![0, 0]);
    }

    #[test]
    fn test_negative_padding_too_large() {
        let attributes = vec![entry(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            0,
            12,
        )];
        let result = plan_layout(
            attributes,
            &[ExtraAttribute::padding(-13)],
            InterleaveFlags::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            MeshError::NegativePaddingTooLarge {
                index: 0,
                padding: -13,
                stride: 12
            }
        );
    }

    #[test]
    fn test_trailing_negative_padding_cuts_attribute() {
        let attributes = vec![entry(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            0,
            12,
        )];
        let result = plan_layout(
            attributes,
            &[ExtraAttribute::padding(-4)],
            InterleaveFlags::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            MeshError::AttributeExceedsStride {
                index: 0,
                offset: 0,
                size: 12,
                stride: 8
            }
        );
    }

    #[test]
    fn test_opaque_format() {
        let opaque = VertexAttributeFormat::ImplementationSpecific(0xcafe);
        let attributes = vec![
            entry(VertexAttributeSemantic::Position, VertexAttributeFormat::Float3, 0, 50),
            entry(VertexAttributeSemantic::Normal, opaque, 12, 50),
        ];

        // Preserved as-is
        let plan = plan_layout(attributes.clone(), &[], InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 50);
        assert_eq!(offsets(&plan), vec![0, 12]);

        // Can't be packed
        assert_eq!(
            plan_layout(attributes.clone(), &[], InterleaveFlags::empty()).unwrap_err(),
            MeshError::ImplementationSpecificFormat {
                index: 1,
                format: opaque
            }
        );

        // Trailing negative padding can't cut into its row
        assert!(matches!(
            plan_layout(attributes, &[ExtraAttribute::padding(-1)], InterleaveFlags::default()),
            Err(MeshError::AttributeExceedsStride { index: 1, .. })
        ));
    }

    #[test]
    fn test_opaque_extra() {
        let opaque = VertexAttributeFormat::ImplementationSpecific(0xcafe);
        let extras = [
            ExtraAttribute::padding(4),
            ExtraAttribute::reserved(AttributeDesc::new(VertexAttributeSemantic::Color, opaque), 2),
        ];
        assert_eq!(
            plan_layout(Vec::new(), &extras, InterleaveFlags::default()).unwrap_err(),
            MeshError::ImplementationSpecificFormat {
                index: 1,
                format: opaque
            }
        );
    }

    #[test]
    fn test_reuses_allocation() {
        let mut attributes = Vec::with_capacity(4);
        attributes.push(entry(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            0,
            12,
        ));
        let ptr = attributes.as_ptr();
        let plan = plan_layout(attributes, &[], InterleaveFlags::default()).unwrap();
        assert_eq!(plan.entries.as_ptr(), ptr);
    }

    #[test]
    fn test_empty() {
        let plan = plan_layout(Vec::new(), &[], InterleaveFlags::default()).unwrap();
        assert_eq!(plan.stride, 0);
        assert!(plan.entries.is_empty());
    }
}
