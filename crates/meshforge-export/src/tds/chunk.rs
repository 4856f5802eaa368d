// meshforge-export/src/tds/chunk.rs
//! Tagged, length-prefixed chunk tree
//!
//! A chunk owns an ordered list of scalar/array fields and an ordered list
//! of child chunks. Field and child order is the on-disk order. The
//! lifecycle is strict: build (add fields/children), then `size()` once at
//! the root, then `validate()`, then `write()`. No mutation after `write`
//! begins; re-writing an already-sized tree is not supported.

use meshforge_core::types::{Vec2, Vec3};
use std::io::{self, Write};

use super::codec::{Encode, TriFace, ZString, SZ_INT, SZ_SHORT};

/// Hard format limit on array element counts (u16 count prefix)
pub const MAX_ARRAY_LEN: usize = 65535;

/// Chunk tags used by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkTag {
    /// Primary chunk, the single file root
    Primary,
    /// File version marker
    Version,
    /// Object/mesh information container
    ObjectInfo,
    /// Named object
    Object,
    /// Triangle mesh
    Mesh,
    /// Vertex position array
    VertexList,
    /// Face index array
    FaceList,
    /// 4x3 local transform
    TransformMatrix,
    /// Unrecognized tag, preserved as-is
    Unknown(u16),
}

impl ChunkTag {
    /// Convert from a raw u16 tag
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x4D4D => ChunkTag::Primary,
            0x0002 => ChunkTag::Version,
            0x3D3D => ChunkTag::ObjectInfo,
            0x4000 => ChunkTag::Object,
            0x4100 => ChunkTag::Mesh,
            0x4110 => ChunkTag::VertexList,
            0x4120 => ChunkTag::FaceList,
            0x4160 => ChunkTag::TransformMatrix,
            other => ChunkTag::Unknown(other),
        }
    }

    /// Convert to the raw u16 tag
    pub fn to_u16(&self) -> u16 {
        match self {
            ChunkTag::Primary => 0x4D4D,
            ChunkTag::Version => 0x0002,
            ChunkTag::ObjectInfo => 0x3D3D,
            ChunkTag::Object => 0x4000,
            ChunkTag::Mesh => 0x4100,
            ChunkTag::VertexList => 0x4110,
            ChunkTag::FaceList => 0x4120,
            ChunkTag::TransformMatrix => 0x4160,
            ChunkTag::Unknown(v) => *v,
        }
    }
}

/// A chunk field: one of the primitive kinds, or a count-prefixed array
#[derive(Debug, Clone)]
pub enum Field {
    Short(u16),
    Int(u32),
    Float(f32),
    Point(Vec3),
    Uv(Vec2),
    Name(ZString),
    /// u16 count + count x 3 floats
    Points(Vec<Vec3>),
    /// u16 count + count x 4 shorts (3 indices + reserved zero)
    Faces(Vec<TriFace>),
    /// u16 count + count x 2 floats
    Uvs(Vec<Vec2>),
}

impl Field {
    /// Exact encoded byte length, computed without writing
    pub fn encoded_len(&self) -> u32 {
        match self {
            Field::Short(v) => v.encoded_len(),
            Field::Int(v) => v.encoded_len(),
            Field::Float(v) => v.encoded_len(),
            Field::Point(v) => v.encoded_len(),
            Field::Uv(v) => v.encoded_len(),
            Field::Name(v) => v.encoded_len(),
            Field::Points(v) => SZ_SHORT + v.len() as u32 * 3 * 4,
            Field::Faces(v) => SZ_SHORT + v.len() as u32 * 4 * SZ_SHORT,
            Field::Uvs(v) => SZ_SHORT + v.len() as u32 * 2 * 4,
        }
    }

    /// False iff an array field exceeds the u16 count limit
    pub fn validate(&self) -> bool {
        match self {
            Field::Points(v) => v.len() <= MAX_ARRAY_LEN,
            Field::Faces(v) => v.len() <= MAX_ARRAY_LEN,
            Field::Uvs(v) => v.len() <= MAX_ARRAY_LEN,
            _ => true,
        }
    }

    fn encode_array<W: Write, T: Encode>(writer: &mut W, items: &[T]) -> io::Result<()> {
        (items.len() as u16).encode(writer)?;
        for item in items {
            item.encode(writer)?;
        }
        Ok(())
    }

    /// Write the field's bytes
    pub fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Field::Short(v) => v.encode(writer),
            Field::Int(v) => v.encode(writer),
            Field::Float(v) => v.encode(writer),
            Field::Point(v) => v.encode(writer),
            Field::Uv(v) => v.encode(writer),
            Field::Name(v) => v.encode(writer),
            Field::Points(v) => Self::encode_array(writer, v),
            Field::Faces(v) => Self::encode_array(writer, v),
            Field::Uvs(v) => Self::encode_array(writer, v),
        }
    }
}

/// A node in the chunk tree
#[derive(Debug, Clone)]
pub struct Chunk {
    tag: ChunkTag,
    /// Total byte size of this subtree; cached by `size()`, zero until then
    size: u32,
    fields: Vec<Field>,
    children: Vec<Chunk>,
}

impl Chunk {
    /// Tag (2 bytes) + size prefix (4 bytes)
    pub const HEADER_LEN: u32 = SZ_SHORT + SZ_INT;

    pub fn new(tag: ChunkTag) -> Self {
        Self {
            tag,
            size: 0,
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> ChunkTag {
        self.tag
    }

    /// Append a field; order is preserved and is the on-disk order
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a child chunk; order is preserved
    pub fn add_child(&mut self, child: Chunk) {
        self.children.push(child);
    }

    /// Recompute and cache the total byte size of this subtree.
    ///
    /// Called once, at the root, after the whole tree is built. The cached
    /// value is what `write` emits as this chunk's length prefix; it covers
    /// the chunk itself and all descendants.
    pub fn size(&mut self) -> u32 {
        let mut total = Self::HEADER_LEN;
        for field in &self.fields {
            total += field.encoded_len();
        }
        for child in &mut self.children {
            total += child.size();
        }
        self.size = total;
        total
    }

    /// Recursively check array-length limits.
    ///
    /// Returns false rather than erroring, so a caller can drop one
    /// malformed object without aborting the whole file.
    pub fn validate(&self) -> bool {
        if !self.fields.iter().all(Field::validate) {
            return false;
        }
        self.children.iter().all(Chunk::validate)
    }

    /// Write the subtree: tag, cached size, fields in order, children in
    /// order. Each chunk's bytes are contiguous with its descendants fully
    /// nested inside.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.tag.to_u16().encode(writer)?;
        self.size.encode(writer)?;
        for field in &self.fields {
            field.encode(writer)?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sized_bytes(chunk: &mut Chunk) -> (u32, Vec<u8>) {
        let size = chunk.size();
        let mut buf = Vec::new();
        chunk.write(&mut buf).unwrap();
        (size, buf)
    }

    #[test]
    fn test_tag_roundtrip() {
        let tags = [
            ChunkTag::Primary,
            ChunkTag::Mesh,
            ChunkTag::TransformMatrix,
            ChunkTag::Unknown(0xBEEF),
        ];

        for tag in tags {
            assert_eq!(ChunkTag::from_u16(tag.to_u16()), tag);
        }
    }

    #[test]
    fn test_empty_chunk_size() {
        let mut chunk = Chunk::new(ChunkTag::ObjectInfo);
        let (size, bytes) = sized_bytes(&mut chunk);

        assert_eq!(size, 6);
        assert_eq!(bytes, vec![0x3D, 0x3D, 6, 0, 0, 0]);
    }

    #[test]
    fn test_version_chunk_layout() {
        let mut chunk = Chunk::new(ChunkTag::Version);
        chunk.add_field(Field::Int(3));
        let (size, bytes) = sized_bytes(&mut chunk);

        assert_eq!(size, 10);
        assert_eq!(bytes, vec![0x02, 0x00, 10, 0, 0, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn test_nested_size_covers_descendants() {
        let mut root = Chunk::new(ChunkTag::Primary);
        let mut version = Chunk::new(ChunkTag::Version);
        version.add_field(Field::Int(3));
        root.add_child(version);
        root.add_child(Chunk::new(ChunkTag::ObjectInfo));

        let (size, bytes) = sized_bytes(&mut root);
        assert_eq!(size, 6 + 10 + 6);
        assert_eq!(bytes.len() as u32, size);
        // child size prefixes land where the header math says they do
        assert_eq!(bytes[6..8], [0x02, 0x00]);
        assert_eq!(bytes[16..18], [0x3D, 0x3D]);
    }

    #[test]
    fn test_array_field_sizes() {
        assert_eq!(Field::Points(vec![Vec3::ZERO; 4]).encoded_len(), 2 + 4 * 12);
        assert_eq!(Field::Faces(vec![TriFace::new(0, 1, 2); 2]).encoded_len(), 2 + 2 * 8);
        assert_eq!(Field::Uvs(vec![Vec2::ZERO; 3]).encoded_len(), 2 + 3 * 8);
    }

    #[test]
    fn test_validate_at_array_limit() {
        let at_limit = Field::Faces(vec![TriFace::new(0, 0, 0); MAX_ARRAY_LEN]);
        assert!(at_limit.validate());

        let over = Field::Faces(vec![TriFace::new(0, 0, 0); MAX_ARRAY_LEN + 1]);
        assert!(!over.validate());
    }

    #[test]
    fn test_validate_recurses_into_children() {
        let mut root = Chunk::new(ChunkTag::Object);
        let mut mesh = Chunk::new(ChunkTag::Mesh);
        let mut faces = Chunk::new(ChunkTag::FaceList);
        faces.add_field(Field::Faces(vec![TriFace::new(0, 0, 0); MAX_ARRAY_LEN + 1]));
        mesh.add_child(faces);
        root.add_child(mesh);

        assert!(!root.validate());
    }

    fn arb_field() -> impl Strategy<Value = Field> {
        prop_oneof![
            any::<u16>().prop_map(Field::Short),
            any::<u32>().prop_map(Field::Int),
            any::<f32>().prop_map(Field::Float),
            "[a-zA-Z0-9_ ]{0,24}".prop_map(|s| Field::Name(ZString::new(&s))),
            prop::collection::vec(any::<(f32, f32, f32)>(), 0..12)
                .prop_map(|v| Field::Points(v.into_iter().map(|(x, y, z)| Vec3::new(x, y, z)).collect())),
            prop::collection::vec(any::<(u16, u16, u16)>(), 0..12)
                .prop_map(|v| Field::Faces(v.into_iter().map(|(a, b, c)| TriFace::new(a, b, c)).collect())),
            prop::collection::vec(any::<(f32, f32)>(), 0..12)
                .prop_map(|v| Field::Uvs(v.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())),
        ]
    }

    fn arb_chunk() -> impl Strategy<Value = Chunk> {
        let leaf = (any::<u16>(), prop::collection::vec(arb_field(), 0..4)).prop_map(
            |(tag, fields)| {
                let mut chunk = Chunk::new(ChunkTag::from_u16(tag));
                for field in fields {
                    chunk.add_field(field);
                }
                chunk
            },
        );

        leaf.prop_recursive(3, 24, 4, |inner| {
            (
                any::<u16>(),
                prop::collection::vec(arb_field(), 0..3),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(tag, fields, children)| {
                    let mut chunk = Chunk::new(ChunkTag::from_u16(tag));
                    for field in fields {
                        chunk.add_field(field);
                    }
                    for child in children {
                        chunk.add_child(child);
                    }
                    chunk
                })
        })
    }

    proptest! {
        #[test]
        fn prop_size_equals_bytes_written(mut chunk in arb_chunk()) {
            let size = chunk.size();
            let mut buf = Vec::new();
            chunk.write(&mut buf).unwrap();
            prop_assert_eq!(buf.len() as u32, size);
        }

        #[test]
        fn prop_child_subtrees_are_contiguous(mut chunk in arb_chunk()) {
            let size = chunk.size();
            let mut whole = Vec::new();
            chunk.write(&mut whole).unwrap();

            // every child's own serialization appears verbatim inside the
            // parent's byte range
            let mut offset = whole.len();
            for child in chunk.children.iter().rev() {
                let mut child_bytes = Vec::new();
                child.write(&mut child_bytes).unwrap();
                offset -= child_bytes.len();
                prop_assert_eq!(&whole[offset..offset + child_bytes.len()], &child_bytes[..]);
            }
            prop_assert!(size >= Chunk::HEADER_LEN);
        }
    }
}
