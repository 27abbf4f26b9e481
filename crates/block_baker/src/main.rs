//! Voxel scene baker.
//!
//! Reads TOML scene descriptions, builds the voxel map from the edit list,
//! plans blocks and assembles them against the configured mesh libraries.
//! Each scene is written as one JSON document:
//!
//! - `mesh`: positions, normals, uvs, indices, sub-meshes and bounds
//! - `stats`: block counts and the library entries that were missing

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use web_time::Instant;

use config::Scene;
use voxel_blocks::{build_mesh, LibraryKey, MeshBuffers};

/// Block mesh baker for voxel scenes.
#[derive(Parser, Debug)]
#[command(name = "bake_blocks")]
#[command(about = "Bakes voxel scene descriptions into block meshes")]
struct Args {
  /// Scene TOML file; repeat to bake several scenes in parallel.
  #[arg(short, long, required = true)]
  scene: Vec<PathBuf>,

  /// Output JSON path (single scene only; default: from the scene file).
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,

  /// Worker threads for parallel baking (default: number of CPUs).
  #[arg(short = 'j', long)]
  threads: Option<usize>,
}

#[derive(Serialize)]
struct BakeStats {
  voxels: usize,
  kinds: usize,
  blocks: usize,
  drawn: usize,
  skipped: usize,
  missing: Vec<LibraryKey>,
  timing_us: u64,
}

#[derive(Serialize)]
struct BakeOutput<'a> {
  stats: BakeStats,
  mesh: &'a MeshBuffers,
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();

  if args.output.is_some() && args.scene.len() > 1 {
    anyhow::bail!("--output can only be used with a single --scene");
  }
  if let Some(threads) = args.threads {
    rayon::ThreadPoolBuilder::new()
      .num_threads(threads)
      .build_global()
      .context("Failed to configure thread pool")?;
  }

  let results: Vec<Result<PathBuf>> = args
    .scene
    .par_iter()
    .map(|scene_path| bake_scene(scene_path, args.output.as_deref(), args.pretty))
    .collect();

  let mut failed = 0;
  for (scene_path, result) in args.scene.iter().zip(results) {
    match result {
      Ok(output) => log::info!("{} -> {}", scene_path.display(), output.display()),
      Err(err) => {
        failed += 1;
        log::error!("{}: {:#}", scene_path.display(), err);
      }
    }
  }
  if failed > 0 {
    anyhow::bail!("{failed} of {} scenes failed", args.scene.len());
  }
  Ok(())
}

/// Bake one scene and return the path written.
fn bake_scene(scene_path: &Path, output: Option<&Path>, pretty: bool) -> Result<PathBuf> {
  let scene = Scene::load(scene_path)?;
  let base_dir = scene_path.parent().unwrap_or(Path::new("."));
  let libraries = scene.load_libraries(base_dir)?;
  let map = scene.build_map()?;

  let start = Instant::now();
  let build = build_mesh(map.as_ref(), &scene.classification, &libraries, &scene.assembly());
  let timing_us = start.elapsed().as_micros() as u64;

  log::info!(
    "{}: {} voxels, {} blocks, {} triangles in {} us",
    scene_path.display(),
    map.filled_count(),
    build.stats.blocks,
    build.buffers.triangle_count(),
    timing_us
  );

  let document = BakeOutput {
    stats: BakeStats {
      voxels: map.filled_count(),
      kinds: build.kind_count,
      blocks: build.stats.blocks,
      drawn: build.stats.drawn,
      skipped: build.stats.skipped,
      missing: build.stats.missing.iter().copied().collect(),
      timing_us,
    },
    mesh: &build.buffers,
  };
  let json = if pretty {
    serde_json::to_string_pretty(&document)
  } else {
    serde_json::to_string(&document)
  }
  .context("Failed to serialize mesh")?;

  let output_path = match output {
    Some(path) => path.to_path_buf(),
    None => scene.output_path(scene_path),
  };
  if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("Failed to create output dir: {}", dir.display()))?;
  }
  std::fs::write(&output_path, json)
    .with_context(|| format!("Failed to write: {}", output_path.display()))?;

  Ok(output_path)
}
