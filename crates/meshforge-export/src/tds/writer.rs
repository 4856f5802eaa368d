// meshforge-export/src/tds/writer.rs
//! File assembly and writing
//!
//! Builds the primary chunk (version marker + object info), attaches one
//! object chunk per mesh that survives triangulation and validation, then
//! sizes the whole tree exactly once and streams it out. Per-object
//! failures are logged and skipped; only I/O failures abort the export.

use std::collections::{HashMap, HashSet};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use meshforge_core::snapshot::SceneSnapshot;
use thiserror::Error;
use tracing::{debug, warn};

use super::chunk::{Chunk, ChunkTag, Field};
use super::codec::ZString;
use super::mesh::make_mesh_chunk;
use super::triangulate::build_tri_mesh;

/// Version marker written into the 0x0002 chunk
pub const FILE_VERSION: u32 = 3;

/// Legacy 3DS Max name length limit
const LEGACY_NAME_LEN: usize = 12;

/// Export errors; everything here is fatal for the whole file.
///
/// A failed write leaves a partially-written file behind and propagates.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Export configuration
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Run object names through the legacy registry (unique, ASCII,
    /// truncated to 12 characters) for strict 3DS Max compatibility.
    /// Off by default: full ASCII-replaced names are written.
    pub legacy_names: bool,
}

/// Outcome counts for one export call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Objects written into the file
    pub written: usize,
    /// Objects dropped (malformed or over the array limit)
    pub skipped: usize,
}

/// Per-export name uniquing state.
///
/// Owned by one export call and discarded with it; two exports never share
/// name state. Names are ASCII-replaced, truncated to 12 characters, and
/// disambiguated with a `.NNN` suffix when already taken.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
    mapping: HashMap<String, ZString>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sane_name(&mut self, name: &str) -> ZString {
        if let Some(fixed) = self.mapping.get(name) {
            return fixed.clone();
        }

        let clean: String = name
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .take(LEGACY_NAME_LEN)
            .collect();

        let mut candidate = clean.clone();
        let mut counter = 0;
        while self.used.contains(&candidate) {
            candidate = format!("{}.{:03}", clean, counter);
            counter += 1;
        }

        self.used.insert(candidate.clone());
        let fixed = ZString::new(&candidate);
        self.mapping.insert(name.to_string(), fixed.clone());
        fixed
    }
}

/// Serialize a whole scene into a 3DS byte stream.
///
/// Build, size, validate, write, in that order, once. Objects that fail
/// triangulation or the array-limit validation are dropped with a warning
/// and the export continues; the returned stats say how many made it.
pub fn export_scene<W: Write>(
    scene: &SceneSnapshot,
    options: &ExportOptions,
    writer: &mut W,
) -> ExportResult<ExportStats> {
    let mut primary = Chunk::new(ChunkTag::Primary);

    let mut version = Chunk::new(ChunkTag::Version);
    version.add_field(Field::Int(FILE_VERSION));
    primary.add_child(version);

    let mut object_info = Chunk::new(ChunkTag::ObjectInfo);
    let mut names = NameRegistry::new();
    let mut stats = ExportStats::default();

    for object in &scene.objects {
        let mesh = match build_tri_mesh(object) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!(object = %object.name, error = %err, "skipping object");
                stats.skipped += 1;
                continue;
            }
        };

        let mut object_chunk = Chunk::new(ChunkTag::Object);
        let name = if options.legacy_names {
            names.sane_name(&object.name)
        } else {
            ZString::new(&object.name)
        };
        object_chunk.add_field(Field::Name(name));
        object_chunk.add_child(make_mesh_chunk(&mesh, &object.transform));

        // the size field is u16-count limited; an oversized object would
        // corrupt the file, so it is dropped instead
        if object_chunk.validate() {
            object_info.add_child(object_chunk);
            stats.written += 1;
        } else {
            warn!(object = %object.name, "arrays exceed 65535 elements, dropping object");
            stats.skipped += 1;
        }
    }

    primary.add_child(object_info);

    // the chunk hierarchy is complete; one sizing pass at the root
    primary.size();
    primary.write(writer)?;

    debug!(written = stats.written, skipped = stats.skipped, "scene serialized");
    Ok(stats)
}

/// Export a scene to a file path.
///
/// The file is created immediately before writing and closed on every
/// exit path; a failed write leaves the partial file in place and returns
/// the error.
pub fn export_scene_to_path(
    scene: &SceneSnapshot,
    options: &ExportOptions,
    path: impl AsRef<Path>,
) -> ExportResult<ExportStats> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let stats = export_scene(scene, options, &mut writer)?;
    writer.flush()?;
    Ok(stats)
}
