//! # RedLilium Mesh Tools
//!
//! Vertex attribute interleaving for CPU-side meshes.
//!
//! A [`CpuMesh`](mesh::CpuMesh) stores all its vertex attributes in one byte
//! buffer, each attribute described by an offset and a stride. The
//! [`interleave`] module checks whether those attributes already share a
//! single interleaved layout, plans a new one (optionally with extra
//! attributes and padding appended) and builds the resulting vertex buffer,
//! reusing owned buffers instead of copying them where possible.
//!
//! ```
//! use redlilium_meshtools::interleave::{self, ExtraAttribute, InterleaveFlags};
//! use redlilium_meshtools::mesh::{
//!     CpuMesh, LayoutEntry, PrimitiveTopology, VertexAttributeFormat, VertexAttributeSemantic,
//! };
//!
//! // Positions followed by normals, two separate blocks
//! let mesh = CpuMesh::new(
//!     PrimitiveTopology::TriangleList,
//!     vec![0u8; 3 * 24],
//!     vec![
//!         LayoutEntry::new(VertexAttributeSemantic::Position, VertexAttributeFormat::Float3, 0, 12),
//!         LayoutEntry::new(VertexAttributeSemantic::Normal, VertexAttributeFormat::Float3, 36, 12),
//!     ],
//!     3,
//! )?;
//! assert!(!interleave::is_interleaved(&mesh));
//!
//! let interleaved = interleave::interleave(mesh, &[ExtraAttribute::padding(8)], InterleaveFlags::default())?;
//! assert!(interleave::is_interleaved(&interleaved));
//! assert_eq!(interleaved.attributes()[1].offset, 12);
//! assert_eq!(interleaved.attributes()[1].stride, 32);
//! # Ok::<(), redlilium_meshtools::error::MeshError>(())
//! ```

pub mod error;
pub mod interleave;
pub mod mesh;
pub mod profiling;

pub use error::{MeshError, MeshResult};

/// Mesh tools library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
