use criterion::{Criterion, black_box, criterion_group, criterion_main};

use redlilium_meshtools::interleave::{
    ExtraAttribute, InterleaveFlags, interleave, interleave_ref, interleaved_layout_ref,
    is_interleaved,
};
use redlilium_meshtools::mesh::{
    AttributeDesc, CpuMesh, LayoutEntry, PrimitiveTopology, VertexAttributeFormat,
    VertexAttributeSemantic,
};

const VERTEX_COUNT: usize = 10_000;

/// Position, normal and texture coordinates in three separate blocks.
fn separate_mesh() -> CpuMesh<'static> {
    let normals = VERTEX_COUNT * 12;
    let texcoords = normals + VERTEX_COUNT * 12;
    CpuMesh::new(
        PrimitiveTopology::TriangleList,
        vec![0u8; texcoords + VERTEX_COUNT * 8],
        vec![
            LayoutEntry::new(
                VertexAttributeSemantic::Position,
                VertexAttributeFormat::Float3,
                0,
                12,
            ),
            LayoutEntry::new(
                VertexAttributeSemantic::Normal,
                VertexAttributeFormat::Float3,
                normals,
                12,
            ),
            LayoutEntry::new(
                VertexAttributeSemantic::TexCoord0,
                VertexAttributeFormat::Float2,
                texcoords,
                8,
            ),
        ],
        VERTEX_COUNT,
    )
    .unwrap()
}

/// Same attributes, already interleaved with a 32-byte stride.
fn interleaved_mesh() -> CpuMesh<'static> {
    CpuMesh::new(
        PrimitiveTopology::TriangleList,
        vec![0u8; VERTEX_COUNT * 32],
        vec![
            LayoutEntry::new(
                VertexAttributeSemantic::Position,
                VertexAttributeFormat::Float3,
                0,
                32,
            ),
            LayoutEntry::new(
                VertexAttributeSemantic::Normal,
                VertexAttributeFormat::Float3,
                12,
                32,
            ),
            LayoutEntry::new(
                VertexAttributeSemantic::TexCoord0,
                VertexAttributeFormat::Float2,
                24,
                32,
            ),
        ],
        VERTEX_COUNT,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

fn bench_is_interleaved(c: &mut Criterion) {
    let mesh = interleaved_mesh();
    c.bench_function("is_interleaved", |b| {
        b.iter(|| is_interleaved(black_box(&mesh)));
    });
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn bench_layout_with_extras(c: &mut Criterion) {
    let mesh = separate_mesh();
    let extras = [
        ExtraAttribute::padding(4),
        ExtraAttribute::reserved(
            AttributeDesc::new(VertexAttributeSemantic::Color, VertexAttributeFormat::Unorm8x4),
            VERTEX_COUNT,
        ),
    ];
    c.bench_function("interleaved_layout_10k_extras", |b| {
        b.iter(|| {
            interleaved_layout_ref(
                black_box(&mesh),
                VERTEX_COUNT,
                &extras,
                InterleaveFlags::default(),
            )
        });
    });
}

// ---------------------------------------------------------------------------
// Interleaving
// ---------------------------------------------------------------------------

fn bench_interleave_separate(c: &mut Criterion) {
    let mesh = separate_mesh();
    c.bench_function("interleave_separate_10k", |b| {
        b.iter(|| interleave_ref(black_box(&mesh), &[], InterleaveFlags::default()));
    });
}

fn bench_interleave_copy_interleaved(c: &mut Criterion) {
    let mesh = interleaved_mesh();
    c.bench_function("interleave_copy_interleaved_10k", |b| {
        b.iter(|| interleave_ref(black_box(&mesh), &[], InterleaveFlags::default()));
    });
}

fn bench_interleave_steal(c: &mut Criterion) {
    c.bench_function("interleave_steal_10k", |b| {
        b.iter_batched(
            interleaved_mesh,
            |mesh| interleave(mesh, &[], InterleaveFlags::default()),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_is_interleaved,
    bench_layout_with_extras,
    bench_interleave_separate,
    bench_interleave_copy_interleaved,
    bench_interleave_steal,
);
criterion_main!(benches);
