//! meshforge CLI
//!
//! Command-line interface for converting scene snapshots to 3DS files
//! and plain-text mesh dumps.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use meshforge_core::snapshot::SceneSnapshot;
use meshforge_export::{dump_scene, export_scene_to_path, ExportOptions};

/// meshforge - scene snapshot to 3DS converter
#[derive(Parser)]
#[command(name = "meshforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a snapshot as a 3DS file
    Export(ExportArgs),

    /// Write a snapshot as a plain-text mesh dump
    Dump(DumpArgs),

    /// Show information about a snapshot
    Info(InfoArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Path to the scene snapshot (JSON)
    snapshot: PathBuf,

    /// Output 3DS file path
    #[arg(short, long)]
    output: PathBuf,

    /// Truncate and uniquify object names for legacy tooling
    #[arg(long)]
    legacy_names: bool,
}

#[derive(Args)]
struct DumpArgs {
    /// Path to the scene snapshot (JSON)
    snapshot: PathBuf,

    /// Output text file path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
    /// Path to the scene snapshot (JSON)
    snapshot: PathBuf,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Dump(args) => cmd_dump(args),
        Commands::Info(args) => cmd_info(args),
    }
}

fn load_snapshot(path: &PathBuf) -> Result<SceneSnapshot> {
    SceneSnapshot::from_json_file(path)
        .with_context(|| format!("Failed to load snapshot {:?}", path))
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let scene = load_snapshot(&args.snapshot)?;
    info!(
        objects = scene.objects.len(),
        output = ?args.output,
        "exporting scene"
    );

    let options = ExportOptions {
        legacy_names: args.legacy_names,
    };
    let stats = export_scene_to_path(&scene, &options, &args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    println!("Export complete:");
    println!("  Written: {}", stats.written);
    println!("  Skipped: {}", stats.skipped);

    Ok(())
}

fn cmd_dump(args: DumpArgs) -> Result<()> {
    let scene = load_snapshot(&args.snapshot)?;

    let dumped = match args.output {
        Some(path) => {
            let file = fs::File::create(&path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            let mut writer = io::BufWriter::new(file);
            let dumped = dump_scene(&scene, &mut writer)?;
            writer.flush()?;
            dumped
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            dump_scene(&scene, &mut lock)?
        }
    };

    info!(dumped, "dump complete");
    Ok(())
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let scene = load_snapshot(&args.snapshot)?;

    if args.json {
        let objects: Vec<_> = scene
            .objects
            .iter()
            .map(|object| {
                serde_json::json!({
                    "name": object.name,
                    "vertices": object.positions.len(),
                    "faces": object.faces.len(),
                    "triangles": object.triangle_count(),
                    "has_uvs": object.has_uvs(),
                })
            })
            .collect();
        let json = serde_json::json!({
            "path": args.snapshot,
            "materials": scene.materials.len(),
            "objects": objects,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("Snapshot: {:?}", args.snapshot);
    println!("  Materials: {}", scene.materials.len());
    println!("  Objects:   {}", scene.objects.len());

    for object in &scene.objects {
        let uvs = if object.has_uvs() { "uv" } else { "no uv" };
        println!(
            "  - {} ({} vertices, {} faces, {} triangles, {})",
            object.name,
            object.positions.len(),
            object.faces.len(),
            object.triangle_count(),
            uvs
        );
    }

    Ok(())
}
