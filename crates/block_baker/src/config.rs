//! Scene description parsing for block baking.

use anyhow::{Context, Result};
use glam::{IVec3, Vec3};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use voxel_blocks::{
  AssemblyConfig, Axis, BlockMeshLibrary, ClassificationConfig, Direction, EditAction, IBox3,
  LibraryFile, ShapeLibraries, SparseVoxelOctree, VoxelCell, VoxelGrid, VoxelMap,
};

/// Root scene description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
  /// Map size in voxels.
  pub size: [i32; 3],
  /// Backing storage for the map.
  #[serde(default)]
  pub storage: Storage,
  /// Edge lengths of one voxel in world units.
  #[serde(default = "default_voxel_size")]
  pub voxel_size: [f32; 3],
  /// Classification flags; missing fields keep their defaults.
  #[serde(default)]
  pub classification: ClassificationConfig,
  /// Default mesh library JSON, relative to the scene file.
  pub library: Option<String>,
  /// Per-shape library overrides.
  #[serde(default)]
  pub shape_libraries: Vec<ShapeLibraryConfig>,
  /// Output JSON path, relative to the scene file.
  pub output: Option<String>,
  /// Edits applied in order to an empty map.
  #[serde(default)]
  pub edits: Vec<Edit>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
  #[default]
  Dense,
  Octree,
}

/// Library used for voxels of one shape id.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeLibraryConfig {
  pub shape: u16,
  pub path: String,
}

/// Cell written by fill edits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paint {
  #[serde(default)]
  pub material: u16,
  #[serde(default)]
  pub shape: u16,
  /// Defaults to every side closed.
  pub side_closed_mask: Option<u8>,
}

impl Paint {
  pub fn cell(&self) -> VoxelCell {
    let cell = VoxelCell::filled(self.material, self.shape);
    match self.side_closed_mask {
      Some(mask) => cell.with_side_closed_mask(mask),
      None => cell,
    }
  }
}

/// One step of the edit list.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
  /// Apply `action` over the inclusive box `[min, max]`.
  Fill {
    min: [i32; 3],
    max: [i32; 3],
    #[serde(default = "default_action")]
    action: EditAction,
    #[serde(flatten)]
    paint: Paint,
  },
  /// Apply `action` to every voxel whose centre lies within the sphere.
  Sphere {
    center: [f32; 3],
    radius: f32,
    #[serde(default = "default_action")]
    action: EditAction,
    #[serde(flatten)]
    paint: Paint,
  },
  Turn {
    axis: Axis,
    #[serde(default)]
    left_hand_positive: bool,
  },
  Mirror {
    axis: Axis,
  },
  Resize {
    direction: Direction,
    steps: i32,
  },
  ResizeCanvas {
    direction: Direction,
    steps: i32,
    #[serde(default)]
    repeat: bool,
  },
}

fn default_voxel_size() -> [f32; 3] {
  [1.0; 3]
}

fn default_action() -> EditAction {
  EditAction::Overwrite
}

impl Scene {
  /// Load and validate a scene from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    Self::parse(&content).with_context(|| format!("Invalid scene: {}", path.display()))
  }

  /// Parse and validate scene TOML.
  pub fn parse(content: &str) -> Result<Self> {
    let scene: Scene = toml::from_str(content).context("Failed to parse scene TOML")?;

    if scene.size.iter().any(|&s| s <= 0) {
      anyhow::bail!("size must be positive on every axis, got {:?}", scene.size);
    }
    if scene.voxel_size.iter().any(|&s| !s.is_finite() || s <= 0.0) {
      anyhow::bail!("voxel_size must be positive on every axis, got {:?}", scene.voxel_size);
    }
    for (i, edit) in scene.edits.iter().enumerate() {
      match edit {
        Edit::Sphere { radius, .. } if !radius.is_finite() || *radius <= 0.0 => {
          anyhow::bail!("edit {i}: sphere radius must be positive, got {radius}");
        }
        Edit::ResizeCanvas { steps: 0, .. } | Edit::Resize { steps: 0, .. } => {
          anyhow::bail!("edit {i}: resize steps must not be zero");
        }
        _ => {}
      }
    }

    Ok(scene)
  }

  pub fn assembly(&self) -> AssemblyConfig {
    AssemblyConfig::default().with_voxel_size(Vec3::from_array(self.voxel_size))
  }

  /// Allocate the map and run the edit list on it.
  pub fn build_map(&self) -> Result<Box<dyn VoxelMap + Send + Sync>> {
    let size = IVec3::from_array(self.size);
    let mut map: Box<dyn VoxelMap + Send + Sync> = match self.storage {
      Storage::Dense => Box::new(VoxelGrid::empty(size)?),
      Storage::Octree => Box::new(SparseVoxelOctree::new(size, VoxelCell::EMPTY)?),
    };
    for (i, edit) in self.edits.iter().enumerate() {
      apply_edit(map.as_mut(), edit).with_context(|| format!("Failed to apply edit {i}"))?;
    }
    Ok(map)
  }

  /// Load the default and per-shape libraries. Paths resolve against
  /// `base_dir`. Without a default library every block is reported missing.
  pub fn load_libraries(&self, base_dir: &Path) -> Result<ShapeLibraries> {
    let default = match &self.library {
      Some(path) => load_library(&base_dir.join(path))?,
      None => BlockMeshLibrary::new(),
    };
    let mut libraries = ShapeLibraries::new(default);
    for entry in &self.shape_libraries {
      let library = load_library(&base_dir.join(&entry.path))?;
      if libraries.insert(entry.shape, library).is_some() {
        anyhow::bail!("shape {} has more than one library", entry.shape);
      }
    }
    Ok(libraries)
  }

  /// Where the mesh JSON goes when no path is given on the command line.
  pub fn output_path(&self, scene_path: &Path) -> PathBuf {
    let base_dir = scene_path.parent().unwrap_or(Path::new("."));
    match &self.output {
      Some(output) => base_dir.join(output),
      None => scene_path.with_extension("mesh.json"),
    }
  }
}

fn apply_edit(map: &mut (dyn VoxelMap + Send + Sync), edit: &Edit) -> Result<()> {
  match edit {
    Edit::Fill {
      min,
      max,
      action,
      paint,
    } => {
      map.set_range(IVec3::from_array(*min), IVec3::from_array(*max), *action, paint.cell());
    }
    Edit::Sphere {
      center,
      radius,
      action,
      paint,
    } => {
      let center = Vec3::from_array(*center);
      let lo = (center - *radius).floor().as_ivec3();
      let hi = (center + *radius).ceil().as_ivec3();
      let cell = paint.cell();
      let Some(region) = IBox3::from_corners(lo, hi).intersection(&map.bounds()) else {
        return Ok(());
      };
      for p in region.iter() {
        if (p.as_vec3() + 0.5).distance(center) <= *radius {
          map.set_range(p, p, *action, cell);
        }
      }
    }
    Edit::Turn {
      axis,
      left_hand_positive,
    } => map.turn(*axis, *left_hand_positive),
    Edit::Mirror { axis } => map.mirror(*axis),
    Edit::Resize { direction, steps } => map.resize(*direction, *steps)?,
    Edit::ResizeCanvas {
      direction,
      steps,
      repeat,
    } => map.resize_canvas(*direction, *steps, *repeat)?,
  }
  Ok(())
}

fn load_library(path: &Path) -> Result<BlockMeshLibrary> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read library file: {}", path.display()))?;
  let library = LibraryFile::from_json(&content)
    .and_then(LibraryFile::into_library)
    .with_context(|| format!("Failed to load library: {}", path.display()))?;
  if let Some(report) = library.missing_report() {
    log::info!("{}: {}", path.display(), report);
  }
  Ok(library)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
