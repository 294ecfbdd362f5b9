//! Building interleaved vertex buffers.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{
    CpuMesh, DataFlags, LayoutEntry, MeshBuffer, MeshIndices, MeshParts, PrimitiveTopology,
    StridedView, StridedViewMut,
};
use crate::profiling::{profile_function, profile_plot, profile_scope};

use super::detect::{detect_span, span_view};
use super::indices::{apply_index_policy, resolve_index_policy};
use super::plan::{plan_layout, LayoutPlan};
use super::{ExtraAttribute, ExtraData, InterleaveFlags};

/// Check extras against the vertex count before anything is touched.
fn validate_extras(extras: &[ExtraAttribute<'_>], vertex_count: usize) -> MeshResult<()> {
    for (index, extra) in extras.iter().enumerate() {
        match extra {
            ExtraAttribute::Padding(_) => {}
            ExtraAttribute::OffsetOnly(_) => {
                log::warn!("Extra attribute {index} is offset-only");
                return Err(MeshError::OffsetOnlyExtraAttribute { index });
            }
            // Reserved space has no data to check
            ExtraAttribute::Attribute {
                data: ExtraData::Reserved { .. },
                ..
            } => {}
            ExtraAttribute::Attribute {
                desc,
                data: ExtraData::View(view),
            } => {
                if view.len() != vertex_count {
                    log::warn!(
                        "Extra attribute {index} has {} items, expected {vertex_count}",
                        view.len()
                    );
                    return Err(MeshError::ExtraAttributeCountMismatch {
                        index,
                        expected: vertex_count,
                        got: view.len(),
                    });
                }
                if let Some(expected) = desc.element_size() {
                    if view.width() != expected {
                        return Err(MeshError::ExtraAttributeSizeMismatch {
                            index,
                            expected,
                            got: view.width(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Allocate zeroed vertex bytes for `plan`.
fn allocate(plan: &LayoutPlan, vertex_count: usize) -> MeshResult<Vec<u8>> {
    let size = plan.stride.checked_mul(vertex_count).ok_or_else(|| {
        log::warn!(
            "{vertex_count} vertices with stride {} overflow the vertex buffer size",
            plan.stride
        );
        MeshError::VertexDataTooLarge {
            stride: plan.stride,
            vertex_count,
        }
    })?;
    profile_plot!("interleave: vertex bytes", size);
    Ok(vec![0u8; size])
}

/// Destination view for an entry of `plan` inside `bytes`.
fn entry_view_mut<'b>(
    bytes: &'b mut [u8],
    entry: &LayoutEntry,
    vertex_count: usize,
    width: usize,
) -> MeshResult<StridedViewMut<'b>> {
    StridedViewMut::new(bytes, entry.offset, vertex_count, width, entry.stride)
}

/// Copy the original attributes from `source` into `out`.
///
/// A preserved layout is copied one whole row span at a time, which also
/// carries implementation-specific formats and any padding between
/// attributes. Otherwise each attribute is copied on its own.
fn copy_originals(
    out: &mut [u8],
    source: &[u8],
    originals: &[LayoutEntry],
    plan: &LayoutPlan,
    vertex_count: usize,
) -> MeshResult<()> {
    profile_scope!("copy_originals");

    if let Some(span) = plan.preserved {
        let src = span_view(source, span, vertex_count)?;
        let mut dst = StridedViewMut::new(
            out,
            0,
            vertex_count,
            src.width(),
            plan.stride as isize,
        )?;
        src.copy_into(&mut dst);
        return Ok(());
    }

    for (index, (original, planned)) in originals.iter().zip(&plan.entries).enumerate() {
        let size = original
            .element_size()
            .ok_or(MeshError::ImplementationSpecificFormat {
                index,
                format: original.format(),
            })?;
        let src = StridedView::new(source, original.offset, vertex_count, size, original.stride)?;
        let mut dst = entry_view_mut(out, planned, vertex_count, size)?;
        src.copy_into(&mut dst);
    }
    Ok(())
}

/// Copy extras that carry data into their planned slots.
fn copy_extras(
    out: &mut [u8],
    extras: &[ExtraAttribute<'_>],
    plan: &LayoutPlan,
    vertex_count: usize,
) -> MeshResult<()> {
    profile_scope!("copy_extras");

    let placed = extras.iter().filter(|extra| !extra.is_padding());
    for (extra, planned) in placed.zip(plan.extra_entries()) {
        // Reserved space stays as allocated
        if let ExtraAttribute::Attribute {
            data: ExtraData::View(view),
            ..
        } = extra
        {
            let mut dst = entry_view_mut(out, planned, vertex_count, view.width())?;
            view.copy_into(&mut dst);
        }
    }
    Ok(())
}

/// Interleave `mesh` with `extras` appended.
///
/// An interleaved mesh with no extras, an owned vertex buffer and
/// [`InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES`] set is passed
/// through without copying. Otherwise a new vertex buffer is planned and
/// filled, reusing the attribute vector of the mesh for the new layout.
/// Borrowed buffers are never reused. On error no output is produced and a
/// mesh passed by value is dropped.
pub(crate) fn interleave_mesh(
    mesh: CpuMesh<'_>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    profile_function!();

    let vertex_count = mesh.vertex_count();
    validate_extras(extras, vertex_count)?;
    let index_policy = mesh
        .indices()
        .map(|indices| resolve_index_policy(indices, flags))
        .transpose()?;

    let steal = extras.is_empty()
        && flags.contains(InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES)
        && mesh.vertex_data_flags().contains(DataFlags::OWNED)
        && detect_span(mesh.attributes()).is_interleaved();

    let MeshParts {
        topology,
        indices,
        vertex_data,
        attributes,
        vertex_count,
        label,
    } = mesh.into_parts();

    let (vertex_data, attributes) = if steal {
        log::debug!(
            "Mesh {:?} is already interleaved, reusing its {} vertex bytes",
            label,
            vertex_data.len()
        );
        (vertex_data.into_owned(), attributes)
    } else {
        // The planner rewrites the attribute vector in place, the original
        // offsets are only needed again when attributes get packed one by one
        let packed = !(flags.contains(InterleaveFlags::PRESERVE_INTERLEAVED_ATTRIBUTES)
            && detect_span(&attributes).is_interleaved());
        let originals = if packed {
            attributes.clone()
        } else {
            Vec::new()
        };
        let plan = plan_layout(attributes, extras, flags)?;
        log::debug!(
            "Interleaving mesh {:?}: {} vertices, stride {}, {} extras",
            label,
            vertex_count,
            plan.stride,
            plan.extra_entries().len()
        );
        let mut out = allocate(&plan, vertex_count)?;
        copy_originals(
            &mut out,
            vertex_data.as_slice(),
            &originals,
            &plan,
            vertex_count,
        )?;
        copy_extras(&mut out, extras, &plan, vertex_count)?;
        (MeshBuffer::Owned(out), plan.entries)
    };

    let indices = match (indices, index_policy) {
        (Some(indices), Some(policy)) => Some(apply_index_policy(indices, policy)?),
        _ => None,
    };

    Ok(CpuMesh::from_parts(MeshParts {
        topology,
        indices,
        vertex_data,
        attributes,
        vertex_count,
        label,
    }))
}

/// Plan the interleaved layout of `mesh` and allocate a buffer for it,
/// without copying any vertex data.
pub(crate) fn layout_mesh(
    mesh: CpuMesh<'_>,
    vertex_count: usize,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    profile_function!();

    let MeshParts {
        topology,
        attributes,
        label,
        ..
    } = mesh.into_parts();

    let plan = plan_layout(attributes, extras, flags)?;
    let mut layout = if plan.entries.is_empty() {
        CpuMesh::empty(topology, vertex_count)
    } else {
        let out = allocate(&plan, vertex_count)?;
        CpuMesh::from_parts(MeshParts {
            topology,
            indices: None,
            vertex_data: MeshBuffer::Owned(out),
            attributes: plan.entries,
            vertex_count,
            label: None,
        })
    };
    if let Some(label) = label {
        layout = layout.with_label(label);
    }
    Ok(layout)
}

/// Build an interleaved mesh from loose attributes.
///
/// The vertex count is taken from the first extra that isn't padding.
pub(crate) fn build_from_attributes(
    topology: PrimitiveTopology,
    indices: Option<MeshIndices<'_>>,
    extras: &[ExtraAttribute<'_>],
    flags: InterleaveFlags,
) -> MeshResult<CpuMesh<'static>> {
    let vertex_count = extras
        .iter()
        .find_map(ExtraAttribute::vertex_count)
        .ok_or_else(|| {
            log::warn!("No attribute to take the vertex count from");
            MeshError::NoVertexCount
        })?;

    let mut mesh = CpuMesh::empty(topology, vertex_count);
    if let Some(indices) = indices {
        mesh = mesh.with_indices(indices);
    }
    interleave_mesh(mesh, extras, flags)
}
