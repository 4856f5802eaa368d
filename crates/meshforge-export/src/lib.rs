//! Meshforge Export Pipeline
//!
//! Serializers for flattened scene snapshots:
//! - 3DS chunk files (binary, length-prefixed chunk tree)
//! - plain-text triangle dumps (one line per corner)

pub mod dump;
pub mod tds;

pub use dump::dump_scene;
pub use tds::{export_scene, export_scene_to_path, ExportError, ExportOptions, ExportStats};
