//! What happens to index data when a mesh is interleaved.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{IndexFormat, MeshBuffer, MeshIndices};
use crate::profiling::profile_scope;

use super::InterleaveFlags;

/// How index data is carried into the output mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Move the owned buffer as-is, keeping offset and stride.
    Steal,
    /// Copy the whole buffer, keeping offset, stride and surrounding bytes.
    CopyWhole,
    /// Copy just the indices into a tightly packed buffer.
    Repack,
}

/// Decide what to do with `indices`.
///
/// Owned buffers are moved when they're either tightly packed already or
/// [`InterleaveFlags::PRESERVE_STRIDED_INDICES`] asks to keep them as they
/// are. With the flag, other buffers are copied whole. Everything else is
/// repacked, which isn't possible for implementation-specific index types.
pub fn resolve_index_policy(
    indices: &MeshIndices<'_>,
    flags: InterleaveFlags,
) -> MeshResult<IndexPolicy> {
    let preserve = flags.contains(InterleaveFlags::PRESERVE_STRIDED_INDICES);
    let policy = if indices.data.is_owned() && (preserve || indices.is_packed()) {
        IndexPolicy::Steal
    } else if preserve {
        IndexPolicy::CopyWhole
    } else if let IndexFormat::ImplementationSpecific(id) = indices.format {
        log::warn!("Can't repack indices of implementation-specific type {id:#x}");
        return Err(MeshError::ImplementationSpecificIndexType(id));
    } else {
        IndexPolicy::Repack
    };

    log::debug!(
        "Index policy for {} {:?} indices with stride {}: {policy:?}",
        indices.count,
        indices.format,
        indices.stride
    );
    Ok(policy)
}

/// Carry `indices` over according to `policy`.
pub fn apply_index_policy(
    indices: MeshIndices<'_>,
    policy: IndexPolicy,
) -> MeshResult<MeshIndices<'static>> {
    profile_scope!("apply_index_policy");

    match policy {
        IndexPolicy::Steal => Ok(indices.into_owned()),
        IndexPolicy::CopyWhole => Ok(MeshIndices {
            format: indices.format,
            data: MeshBuffer::Owned(indices.data().to_vec()),
            offset: indices.offset,
            stride: indices.stride,
            count: indices.count,
        }),
        IndexPolicy::Repack => {
            if let IndexFormat::ImplementationSpecific(id) = indices.format {
                return Err(MeshError::ImplementationSpecificIndexType(id));
            }
            let view = indices.view().ok_or(MeshError::IndexDataOutOfBounds)?;
            let size = view.width();
            let mut data = Vec::with_capacity(indices.count * size);
            for row in view.rows() {
                data.extend_from_slice(row);
            }
            Ok(MeshIndices {
                format: indices.format,
                data: MeshBuffer::Owned(data),
                offset: 0,
                stride: size,
                count: indices.count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::DataFlags;

    /// u32 indices with 4 bytes of padding after each, after a 4-byte header.
    fn strided_bytes(values: &[u32]) -> Vec<u8> {
        let mut data = vec![0xffu8; 4 + values.len() * 8];
        for (i, value) in values.iter().enumerate() {
            let start = 4 + i * 8;
            data[start..start + 4].copy_from_slice(&value.to_ne_bytes());
        }
        data
    }

    #[test]
    fn test_steal_owned_packed() {
        let indices = MeshIndices::packed(IndexFormat::Uint16, vec![0u8; 12]).unwrap();
        assert_eq!(
            resolve_index_policy(&indices, InterleaveFlags::empty()).unwrap(),
            IndexPolicy::Steal
        );
    }

    #[test]
    fn test_steal_owned_strided_when_preserving() {
        let bytes = strided_bytes(&[1, 2, 3]);
        let indices = MeshIndices::new(IndexFormat::Uint32, bytes, 4, 8, 3).unwrap();
        let ptr = indices.data().as_ptr();
        assert_eq!(
            resolve_index_policy(&indices, InterleaveFlags::PRESERVE_STRIDED_INDICES).unwrap(),
            IndexPolicy::Steal
        );

        let out = apply_index_policy(indices, IndexPolicy::Steal).unwrap();
        assert_eq!(out.data().as_ptr(), ptr);
        assert_eq!((out.offset(), out.stride()), (4, 8));
    }

    #[test]
    fn test_copy_whole_borrowed() {
        let bytes = strided_bytes(&[4, 5]);
        let indices = MeshIndices::new(IndexFormat::Uint32, &bytes[..], 4, 8, 2).unwrap();
        let policy =
            resolve_index_policy(&indices, InterleaveFlags::PRESERVE_STRIDED_INDICES).unwrap();
        assert_eq!(policy, IndexPolicy::CopyWhole);

        let out = apply_index_policy(indices, policy).unwrap();
        assert_eq!(out.data(), bytes.as_slice());
        assert_ne!(out.data().as_ptr(), bytes.as_ptr());
        assert!(out.data_flags().contains(DataFlags::OWNED));
        assert_eq!(out.to_u32_vec(), Some(vec![4, 5]));
    }

    #[test]
    fn test_repack_strided() {
        let bytes = strided_bytes(&[7, 8, 9]);
        let indices = MeshIndices::new(IndexFormat::Uint32, bytes, 4, 8, 3).unwrap();
        let policy = resolve_index_policy(&indices, InterleaveFlags::empty()).unwrap();
        assert_eq!(policy, IndexPolicy::Repack);

        let out = apply_index_policy(indices, policy).unwrap();
        assert_eq!(out.data().len(), 12);
        assert!(out.is_packed());
        assert_eq!(out.offset(), 0);
        assert_eq!(out.to_u32_vec(), Some(vec![7, 8, 9]));
    }

    #[test]
    fn test_repack_borrowed_packed() {
        let values: [u16; 3] = [2, 1, 0];
        let indices = MeshIndices::from_u16(&values);
        let policy = resolve_index_policy(&indices, InterleaveFlags::empty()).unwrap();
        assert_eq!(policy, IndexPolicy::Repack);
        let out = apply_index_policy(indices, policy).unwrap();
        assert_eq!(out.to_u32_vec(), Some(vec![2, 1, 0]));
    }

    #[test]
    fn test_implementation_specific() {
        let format = IndexFormat::ImplementationSpecific(0xcaca);
        let indices = MeshIndices::new(format, vec![0u8; 12], 0, 4, 3).unwrap();

        // Owned and preserved is fine, the size doesn't matter
        assert_eq!(
            resolve_index_policy(&indices, InterleaveFlags::PRESERVE_STRIDED_INDICES).unwrap(),
            IndexPolicy::Steal
        );
        assert_eq!(
            resolve_index_policy(&indices, InterleaveFlags::empty()).unwrap_err(),
            MeshError::ImplementationSpecificIndexType(0xcaca)
        );
    }
}
