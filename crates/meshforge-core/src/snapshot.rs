//! Flattened scene snapshot
//!
//! The collaborator-facing data contract: a host application (or a test)
//! hands meshforge a fully flattened scene: positions, faces with
//! per-corner UVs, material indices, and local transforms. Nothing in here
//! calls back into a live scene; the snapshot is a plain value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result, ResultExt};
use crate::types::{Mat4x3, Vec2, Vec3};

/// A whole scene, flattened: one entry per mesh object plus the scene's
/// material name table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Material names, indexed by `SourceFace::material`
    #[serde(default)]
    pub materials: Vec<MaterialInfo>,
    /// All mesh objects in scene order
    pub objects: Vec<MeshObject>,
}

/// A material as the host scene saw it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub name: String,
    /// Base-name of the diffuse texture, if the material had one
    #[serde(default)]
    pub diffuse: String,
}

/// One flattened mesh object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshObject {
    /// Object name as the host knew it (may contain non-ASCII characters)
    pub name: String,
    /// Source vertex positions
    pub positions: Vec<Vec3>,
    /// Faces referencing `positions` by index
    pub faces: Vec<SourceFace>,
    /// Local-to-world transform
    #[serde(default)]
    pub transform: Mat4x3,
}

/// A source face: a triangle or a quad
///
/// `indices` has 3 or 4 entries; `uvs`, when present, has exactly as many.
/// Anything else is a malformed object and is rejected by [`MeshObject::check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFace {
    pub indices: Vec<u32>,
    #[serde(default)]
    pub material: u32,
    #[serde(default)]
    pub uvs: Option<Vec<Vec2>>,
}

impl SourceFace {
    pub fn tri(indices: [u32; 3]) -> Self {
        Self {
            indices: indices.to_vec(),
            material: 0,
            uvs: None,
        }
    }

    pub fn quad(indices: [u32; 4]) -> Self {
        Self {
            indices: indices.to_vec(),
            material: 0,
            uvs: None,
        }
    }

    pub fn with_uvs(mut self, uvs: &[Vec2]) -> Self {
        self.uvs = Some(uvs.to_vec());
        self
    }

    pub fn with_material(mut self, material: u32) -> Self {
        self.material = material;
        self
    }

    pub fn is_quad(&self) -> bool {
        self.indices.len() == 4
    }
}

impl MeshObject {
    /// Check the object's structural integrity.
    ///
    /// Failures here are per-object: the exporter logs and skips the
    /// object, and the rest of the scene still exports.
    pub fn check(&self) -> Result<()> {
        let vert_count = self.positions.len();

        for (i, face) in self.faces.iter().enumerate() {
            let arity = face.indices.len();
            if arity != 3 && arity != 4 {
                return Err(Error::malformed_object(
                    &self.name,
                    format!("face {} has {} corners, expected 3 or 4", i, arity),
                ));
            }

            if let Some(uvs) = &face.uvs {
                if uvs.len() != arity {
                    return Err(Error::malformed_object(
                        &self.name,
                        format!("face {} has {} corners but {} UVs", i, arity, uvs.len()),
                    ));
                }
            }

            for &index in &face.indices {
                if index as usize >= vert_count {
                    return Err(Error::malformed_object(
                        &self.name,
                        format!(
                            "face {} references vertex {} of {}",
                            i, index, vert_count
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Whether any face carries per-corner UV data
    pub fn has_uvs(&self) -> bool {
        self.faces.iter().any(|f| f.uvs.is_some())
    }

    /// Triangle count after quad splitting
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| if f.is_quad() { 2 } else { 1 })
            .sum()
    }
}

impl SceneSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(Error::from)
            .with_context(|| format!("decoding snapshot {}", path.display()))
    }

    /// Decode a snapshot from in-memory JSON
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Look up a material name, falling back to a synthetic one
    pub fn material_name(&self, index: u32) -> String {
        self.materials
            .get(index as usize)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("material_{}", index))
    }

    /// Total source vertex count across all objects
    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.positions.len()).sum()
    }

    /// Total face count across all objects (before quad splitting)
    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }
}
