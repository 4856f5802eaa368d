// meshforge-export/src/dump.rs
//! Plain-text mesh dump
//!
//! The sibling format to the 3DS writer: a line-oriented dump with one
//! line per triangle corner, `x y z - nx ny nz - u v`. Positions and UVs
//! are rounded to six decimals, normals to two. Normals are recomputed
//! flat per triangle from the corner positions, matching the flat-shading
//! output of the original toolchain.

use std::collections::HashMap;
use std::io::Write;

use meshforge_core::error::Result;
use meshforge_core::snapshot::{MeshObject, SceneSnapshot};
use meshforge_core::types::Vec3;
use tracing::warn;

use crate::tds::extract_triangles;
use crate::tds::Triangle;

/// Format a value rounded to `decimals` places, trailing zeros trimmed
fn fmt_rounded(value: f32, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Flat normal of a triangle: normalized cross product of its edges,
/// zero for degenerate triangles
fn flat_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    p1.sub(&p0).cross(&p2.sub(&p0)).normalize()
}

/// Group triangles by material index, preserving first-seen order
fn group_by_material(triangles: Vec<Triangle>) -> Vec<(u32, Vec<Triangle>)> {
    let mut groups: Vec<(u32, Vec<Triangle>)> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for tri in triangles {
        let slot = *index.entry(tri.material).or_insert_with(|| {
            groups.push((tri.material, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(tri);
    }

    groups
}

fn dump_object<W: Write>(
    scene: &SceneSnapshot,
    object: &MeshObject,
    writer: &mut W,
) -> Result<()> {
    object.check()?;
    let triangles = extract_triangles(object)?;

    writeln!(writer, "obj: \"{}\"", object.name)?;

    for (material, tris) in group_by_material(triangles) {
        writeln!(writer, "material: \"{}\"", scene.material_name(material))?;

        for tri in tris {
            let positions = [
                object.positions[tri.indices[0] as usize],
                object.positions[tri.indices[1] as usize],
                object.positions[tri.indices[2] as usize],
            ];
            let normal = flat_normal(positions[0], positions[1], positions[2]);

            for (c, pos) in positions.iter().enumerate() {
                let uv = tri
                    .uvs
                    .map(|keys| keys[c].value())
                    .unwrap_or_default();
                writeln!(
                    writer,
                    "{} {} {} - {} {} {} - {} {}",
                    fmt_rounded(pos.x, 6),
                    fmt_rounded(pos.y, 6),
                    fmt_rounded(pos.z, 6),
                    fmt_rounded(normal.x, 2),
                    fmt_rounded(normal.y, 2),
                    fmt_rounded(normal.z, 2),
                    fmt_rounded(uv.x, 6),
                    fmt_rounded(uv.y, 6),
                )?;
            }
        }
    }

    Ok(())
}

/// Dump a whole scene as text: a material preamble, then one block per
/// object. Objects that fail extraction are skipped with a warning; the
/// dump continues. Returns the number of objects dumped.
pub fn dump_scene<W: Write>(scene: &SceneSnapshot, writer: &mut W) -> Result<usize> {
    for material in &scene.materials {
        writeln!(writer, "material: \"{}\"", material.name)?;
        writeln!(writer, "diffuse: \"{}\"", material.diffuse)?;
        writeln!(writer)?;
    }

    let mut dumped = 0;
    for object in &scene.objects {
        match dump_object(scene, object, writer) {
            Ok(()) => {
                writeln!(writer)?;
                dumped += 1;
            }
            Err(err) if err.is_per_object() => {
                warn!(object = %object.name, error = %err, "skipping object in dump");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(dumped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshforge_core::snapshot::{MaterialInfo, SourceFace};
    use meshforge_core::types::{Mat4x3, Vec2};

    fn dump_to_string(scene: &SceneSnapshot) -> String {
        let mut buf = Vec::new();
        dump_scene(scene, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn flat_triangle() -> MeshObject {
        MeshObject {
            name: "tri".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![SourceFace::tri([0, 1, 2]).with_uvs(&[
                Vec2::new(0.0, 0.0),
                Vec2::new(0.5, 0.0),
                Vec2::new(0.123_456_7, 1.0),
            ])],
            transform: Mat4x3::IDENTITY,
        }
    }

    #[test]
    fn test_fmt_rounded_trims_zeros() {
        assert_eq!(fmt_rounded(1.0, 6), "1");
        assert_eq!(fmt_rounded(0.5, 6), "0.5");
        assert_eq!(fmt_rounded(0.123_456_7, 6), "0.123457");
        assert_eq!(fmt_rounded(-0.000_000_4, 6), "0");
        assert_eq!(fmt_rounded(-1.25, 2), "-1.25");
    }

    #[test]
    fn test_corner_lines() {
        let scene = SceneSnapshot {
            materials: vec![],
            objects: vec![flat_triangle()],
        };

        let text = dump_to_string(&scene);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "obj: \"tri\"");
        assert_eq!(lines[1], "material: \"material_0\"");
        // triangle in the XY plane: flat normal is +Z
        assert_eq!(lines[2], "0 0 0 - 0 0 1 - 0 0");
        assert_eq!(lines[3], "1 0 0 - 0 0 1 - 0.5 0");
        assert_eq!(lines[4], "0 1 0 - 0 0 1 - 0.123457 1");
    }

    #[test]
    fn test_material_preamble_and_names() {
        let mut obj = flat_triangle();
        obj.faces[0].material = 0;

        let scene = SceneSnapshot {
            materials: vec![MaterialInfo {
                name: "steel".into(),
                diffuse: "steel_d.png".into(),
            }],
            objects: vec![obj],
        };

        let text = dump_to_string(&scene);
        assert!(text.starts_with("material: \"steel\"\ndiffuse: \"steel_d.png\"\n\n"));
        assert!(text.contains("material: \"steel\"\n0 0 0"));
    }

    #[test]
    fn test_groups_preserve_first_seen_material_order() {
        let mut obj = flat_triangle();
        obj.positions.push(Vec3::new(1.0, 1.0, 0.0));
        obj.faces = vec![
            SourceFace::tri([0, 1, 2]).with_uvs(&[Vec2::ZERO; 3]).with_material(2),
            SourceFace::tri([1, 3, 2]).with_uvs(&[Vec2::ZERO; 3]).with_material(0),
            SourceFace::tri([0, 2, 1]).with_uvs(&[Vec2::ZERO; 3]).with_material(2),
        ];

        let scene = SceneSnapshot {
            materials: vec![],
            objects: vec![obj],
        };

        let text = dump_to_string(&scene);
        let mat_2 = text.find("material: \"material_2\"").unwrap();
        let mat_0 = text.find("material: \"material_0\"").unwrap();
        assert!(mat_2 < mat_0);
        // material 2's group holds both its triangles: 6 corner lines
        let between = &text[mat_2..mat_0];
        assert_eq!(between.lines().count() - 1, 6);
    }

    #[test]
    fn test_degenerate_triangle_gets_zero_normal() {
        let mut obj = flat_triangle();
        obj.positions[1] = obj.positions[0];

        let scene = SceneSnapshot {
            materials: vec![],
            objects: vec![obj],
        };

        let text = dump_to_string(&scene);
        assert!(text.contains("- 0 0 0 -"));
    }

    #[test]
    fn test_bad_object_skipped_dump_continues() {
        let mut bad = flat_triangle();
        bad.name = "bad".into();
        bad.faces[0].indices[0] = 42;

        let scene = SceneSnapshot {
            materials: vec![],
            objects: vec![bad, flat_triangle()],
        };

        let mut buf = Vec::new();
        let dumped = dump_scene(&scene, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(dumped, 1);
        assert!(!text.contains("obj: \"bad\""));
        assert!(text.contains("obj: \"tri\""));
    }
}
