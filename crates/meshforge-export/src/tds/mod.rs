// meshforge-export/src/tds/mod.rs
//! 3DS chunk file writer
//!
//! Serializes a flattened scene snapshot into the classic length-prefixed
//! chunk tree.
//!
//! # File Structure
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ Primary chunk 0x4D4D                                      │
//! │ ├── Version chunk 0x0002       u32 = 3                    │
//! │ └── Object info chunk 0x3D3D                              │
//! │     └── Object chunk 0x4000    name (z-string)            │
//! │         └── Mesh chunk 0x4100                             │
//! │             ├── Vertex list 0x4110  u16 count + 3f each   │
//! │             ├── Face list   0x4120  u16 count + 4H each   │
//! │             └── Transform   0x4160  12 floats             │
//! └───────────────────────────────────────────────────────────┘
//! ```
//! Every chunk: u16 tag, u32 total size including the 6-byte header, then
//! fields, then child chunks; all numerics little-endian.

pub mod chunk;
pub mod codec;
pub mod mesh;
pub mod triangulate;
pub mod writer;

pub use chunk::{Chunk, ChunkTag, Field, MAX_ARRAY_LEN};
pub use codec::{Encode, TriFace, ZString};
pub use mesh::make_mesh_chunk;
pub use triangulate::{build_tri_mesh, extract_triangles, TriMesh, Triangle, UvKey};
pub use writer::{
    export_scene, export_scene_to_path, ExportError, ExportOptions, ExportResult, ExportStats,
    NameRegistry, FILE_VERSION,
};
