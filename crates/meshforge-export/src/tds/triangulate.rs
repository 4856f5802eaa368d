// meshforge-export/src/tds/triangulate.rs
//! Triangulation and per-vertex UV splitting
//!
//! The 3DS format stores one UV pair per vertex, while the snapshot
//! carries one UV per face corner. Converting between the two means
//! duplicating every source vertex once per distinct UV value that
//! references it, then remapping all triangle corners onto the duplicated
//! array.

use meshforge_core::error::{Error, Result};
use meshforge_core::snapshot::MeshObject;
use meshforge_core::types::{Vec2, Vec3};
use std::collections::HashMap;
use tracing::debug;

/// UV identity: the coordinate rounded to six fractional digits.
///
/// Stored as micro-unit integers so hashing and equality are exact. The
/// rounded value is also what gets written to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UvKey {
    u: i64,
    v: i64,
}

impl UvKey {
    const SCALE: f64 = 1_000_000.0;

    pub fn new(uv: Vec2) -> Self {
        Self {
            u: (uv.x as f64 * Self::SCALE).round() as i64,
            v: (uv.y as f64 * Self::SCALE).round() as i64,
        }
    }

    /// The rounded UV value this key stands for
    pub fn value(&self) -> Vec2 {
        Vec2::new(
            (self.u as f64 / Self::SCALE) as f32,
            (self.v as f64 / Self::SCALE) as f32,
        )
    }
}

/// A triangle with per-corner attributes, pre- or post-remap
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub material: u32,
    pub uvs: Option<[UvKey; 3]>,
}

/// De-duplicated mesh ready for chunk assembly: positions and UVs are
/// parallel arrays, triangle indices point into them
#[derive(Debug, Clone)]
pub struct TriMesh {
    pub vertices: Vec<Vec3>,
    pub uvs: Option<Vec<Vec2>>,
    pub triangles: Vec<Triangle>,
}

/// Split quads into triangles, preserving corner order.
///
/// A quad (v0,v1,v2,v3) becomes (v0,v1,v2) and (v0,v2,v3); per-corner UVs
/// follow the same diagonal. Triangles pass through unchanged. The object
/// must already satisfy [`MeshObject::check`]; mixed UV coverage (some
/// faces with UVs, some without) is rejected as malformed.
pub fn extract_triangles(object: &MeshObject) -> Result<Vec<Triangle>> {
    let do_uv = object.has_uvs();
    let mut tris = Vec::with_capacity(object.triangle_count());

    for (i, face) in object.faces.iter().enumerate() {
        if do_uv && face.uvs.is_none() {
            return Err(Error::malformed_object(
                &object.name,
                format!("face {} is missing UVs while other faces carry them", i),
            ));
        }

        let keys: Option<Vec<UvKey>> = face
            .uvs
            .as_ref()
            .map(|uvs| uvs.iter().map(|&uv| UvKey::new(uv)).collect());

        let corner = |c: usize| face.indices[c];
        let key = |c: usize| keys.as_ref().map(|k| k[c]);
        let pick = |a: usize, b: usize, c: usize| Triangle {
            indices: [corner(a), corner(b), corner(c)],
            material: face.material,
            uvs: key(a).map(|ka| {
                // key() is uniform across corners of one face
                [ka, key(b).unwrap_or(ka), key(c).unwrap_or(ka)]
            }),
        };

        tris.push(pick(0, 1, 2));
        if face.is_quad() {
            tris.push(pick(0, 2, 3));
        }
    }

    Ok(tris)
}

/// Convert per-corner UVs to per-vertex UVs by splitting shared vertices.
///
/// Every source vertex referenced with N distinct rounded UV values yields
/// exactly N output vertices; corners with equal rounded UVs share one.
/// Output vertices are grouped by source vertex in original order, and
/// ordered by local UV index within each group.
pub fn split_face_uvs(positions: &[Vec3], mut tris: Vec<Triangle>) -> TriMesh {
    // per-source-vertex dictionary: UV key -> local index, in first-seen order
    let mut unique_uvs: Vec<HashMap<UvKey, usize>> = vec![HashMap::new(); positions.len()];
    // per-triangle-corner local offsets
    let mut offsets: Vec<[usize; 3]> = Vec::with_capacity(tris.len());

    for tri in &tris {
        let mut tri_offsets = [0usize; 3];
        if let Some(keys) = tri.uvs {
            for c in 0..3 {
                let per_vertex = &mut unique_uvs[tri.indices[c] as usize];
                let next = per_vertex.len();
                tri_offsets[c] = *per_vertex.entry(keys[c]).or_insert(next);
            }
        }
        offsets.push(tri_offsets);
    }

    // emit one duplicate per accumulated UV, re-ordered by local index
    // before appending (map iteration order is not local-index order)
    let mut vertices = Vec::new();
    let mut uvs = Vec::new();
    let mut base_offsets = Vec::with_capacity(positions.len());
    let mut vert_index = 0usize;

    for (i, position) in positions.iter().enumerate() {
        base_offsets.push(vert_index);

        let per_vertex = &unique_uvs[i];
        let mut uvmap: Vec<Option<UvKey>> = vec![None; per_vertex.len()];
        for (key, &local) in per_vertex {
            uvmap[local] = Some(*key);
        }

        for key in uvmap.into_iter().flatten() {
            vertices.push(*position);
            uvs.push(key.value());
        }

        vert_index += per_vertex.len();
    }

    // remap triangle corners onto the duplicated array
    for (tri, tri_offsets) in tris.iter_mut().zip(&offsets) {
        for c in 0..3 {
            tri.indices[c] = (base_offsets[tri.indices[c] as usize] + tri_offsets[c]) as u32;
        }
    }

    TriMesh {
        vertices,
        uvs: Some(uvs),
        triangles: tris,
    }
}

/// Triangulate an object and, when it carries UV data, split shared
/// vertices per distinct UV. Without UV data the source vertices pass
/// through untouched and no UV array is produced.
pub fn build_tri_mesh(object: &MeshObject) -> Result<TriMesh> {
    object.check()?;
    let tris = extract_triangles(object)?;

    if object.has_uvs() {
        Ok(split_face_uvs(&object.positions, tris))
    } else {
        debug!(object = %object.name, "no UV data, skipping vertex duplication");
        Ok(TriMesh {
            vertices: object.positions.clone(),
            uvs: None,
            triangles: tris,
        })
    }
}
