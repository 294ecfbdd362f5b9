//! Common fixtures for the interleaving integration tests.

use redlilium_meshtools::mesh::{
    CpuMesh, LayoutEntry, PrimitiveTopology, ResolvedAttribute, VertexAttributeFormat,
    VertexAttributeSemantic,
};

/// Initialize logging for test output.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Bytes counting up from `start`, wrapping at 256.
pub fn pattern(len: usize, start: u8) -> Vec<u8> {
    (0..len).map(|i| start.wrapping_add(i as u8)).collect()
}

pub fn position(offset: usize, stride: isize) -> LayoutEntry {
    LayoutEntry::new(
        VertexAttributeSemantic::Position,
        VertexAttributeFormat::Float3,
        offset,
        stride,
    )
}

pub fn normal(offset: usize, stride: isize) -> LayoutEntry {
    LayoutEntry::new(
        VertexAttributeSemantic::Normal,
        VertexAttributeFormat::Float3,
        offset,
        stride,
    )
}

// ============================================================================
// Meshes
// ============================================================================

/// Position and normal interleaved with a 24-byte stride.
pub fn interleaved_mesh(vertex_count: usize) -> CpuMesh<'static> {
    CpuMesh::new(
        PrimitiveTopology::TriangleList,
        pattern(vertex_count * 24, 0),
        vec![position(0, 24), normal(12, 24)],
        vertex_count,
    )
    .expect("valid interleaved mesh")
}

/// Positions with a 12-byte stride followed by normals with a 16-byte stride.
pub fn separate_mesh(vertex_count: usize) -> CpuMesh<'static> {
    let normals_offset = vertex_count * 12;
    CpuMesh::new(
        PrimitiveTopology::TriangleList,
        pattern(normals_offset + vertex_count * 16, 7),
        vec![position(0, 12), normal(normals_offset, 16)],
        vertex_count,
    )
    .expect("valid separate mesh")
}

/// Position and normal sharing a 40-byte stride, starting 4 bytes in, with
/// padding between and after them.
pub fn padded_mesh(vertex_count: usize) -> CpuMesh<'static> {
    CpuMesh::new(
        PrimitiveTopology::TriangleList,
        pattern(4 + vertex_count * 40, 3),
        vec![position(4, 40), normal(20, 40)],
        vertex_count,
    )
    .expect("valid padded mesh")
}

/// All rows of an attribute, copied out.
pub fn rows(attribute: &ResolvedAttribute<'_>) -> Vec<Vec<u8>> {
    attribute.data.rows().map(|row| row.to_vec()).collect()
}

/// All rows of every attribute of `mesh`.
pub fn all_rows(mesh: &CpuMesh<'_>) -> Vec<Vec<Vec<u8>>> {
    (0..mesh.attribute_count())
        .map(|i| rows(&mesh.attribute(i).expect("attribute in range")))
        .collect()
}
