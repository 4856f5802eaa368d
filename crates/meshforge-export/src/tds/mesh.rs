// meshforge-export/src/tds/mesh.rs
//! Mesh chunk assembly
//!
//! Wraps a de-duplicated [`TriMesh`] and its local transform into the
//! 0x4100 mesh subtree: vertex list, face list, then the 4x3 transform,
//! in that fixed order.

use meshforge_core::types::Mat4x3;

use super::chunk::{Chunk, ChunkTag, Field};
use super::codec::TriFace;
use super::triangulate::{TriMesh, Triangle};

/// Vertex list chunk: u16 count + count x 3 floats
pub fn make_vertex_chunk(mesh: &TriMesh) -> Chunk {
    let mut chunk = Chunk::new(ChunkTag::VertexList);
    chunk.add_field(Field::Points(mesh.vertices.clone()));
    chunk
}

/// Face list chunk: u16 count + count x (3 indices + reserved zero).
///
/// Indices are narrowed to u16 here; an object whose vertex array outgrew
/// the format limit never reaches `write` because the array validation
/// gate drops it first.
pub fn make_face_chunk(triangles: &[Triangle]) -> Chunk {
    let faces = triangles
        .iter()
        .map(|tri| {
            TriFace::new(
                tri.indices[0] as u16,
                tri.indices[1] as u16,
                tri.indices[2] as u16,
            )
        })
        .collect();

    let mut chunk = Chunk::new(ChunkTag::FaceList);
    chunk.add_field(Field::Faces(faces));
    chunk
}

/// Transform chunk: 12 floats, column-major, homogeneous row dropped
pub fn make_matrix_chunk(transform: &Mat4x3) -> Chunk {
    let mut chunk = Chunk::new(ChunkTag::TransformMatrix);
    for value in transform.to_flat() {
        chunk.add_field(Field::Float(value));
    }
    chunk
}

/// Assemble the mesh chunk subtree.
///
/// The de-duplicated UV array on `mesh` drives vertex splitting but is not
/// emitted as a chunk of its own; the on-disk mesh carries vertices, faces
/// and the transform only.
pub fn make_mesh_chunk(mesh: &TriMesh, transform: &Mat4x3) -> Chunk {
    let mut chunk = Chunk::new(ChunkTag::Mesh);
    chunk.add_child(make_vertex_chunk(mesh));
    chunk.add_child(make_face_chunk(&mesh.triangles));
    chunk.add_child(make_matrix_chunk(transform));
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshforge_core::types::Vec3;

    fn single_triangle() -> TriMesh {
        TriMesh {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            uvs: None,
            triangles: vec![Triangle {
                indices: [0, 1, 2],
                material: 0,
                uvs: None,
            }],
        }
    }

    #[test]
    fn test_vertex_chunk_size() {
        let mut chunk = make_vertex_chunk(&single_triangle());
        // header + count + 3 points
        assert_eq!(chunk.size(), 6 + 2 + 3 * 12);
        assert_eq!(chunk.tag(), ChunkTag::VertexList);
    }

    #[test]
    fn test_face_chunk_size() {
        let mesh = single_triangle();
        let mut chunk = make_face_chunk(&mesh.triangles);
        // header + count + one 4-short face record
        assert_eq!(chunk.size(), 6 + 2 + 8);
        assert_eq!(chunk.tag(), ChunkTag::FaceList);
    }

    #[test]
    fn test_matrix_chunk_is_twelve_floats() {
        let mut chunk = make_matrix_chunk(&Mat4x3::IDENTITY);
        assert_eq!(chunk.size(), 6 + 12 * 4);
    }

    #[test]
    fn test_mesh_chunk_child_order() {
        let mesh = single_triangle();
        let mut chunk = make_mesh_chunk(&mesh, &Mat4x3::IDENTITY);
        let total = chunk.size();

        let mut bytes = Vec::new();
        chunk.write(&mut bytes).unwrap();
        assert_eq!(bytes.len() as u32, total);

        // children appear back to back in fixed order
        assert_eq!(&bytes[0..2], &[0x00, 0x41]);
        let vertex_at = 6;
        assert_eq!(&bytes[vertex_at..vertex_at + 2], &[0x10, 0x41]);
        let face_at = vertex_at + (6 + 2 + 3 * 12);
        assert_eq!(&bytes[face_at..face_at + 2], &[0x20, 0x41]);
        let matrix_at = face_at + (6 + 2 + 8);
        assert_eq!(&bytes[matrix_at..matrix_at + 2], &[0x60, 0x41]);
    }
}
