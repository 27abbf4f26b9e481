//! Block mesh library: the geometry drawn for each classified block.
//!
//! Fragments are authored around the centre of one octant, in voxel units
//! (an octant spans `[-0.25, 0.25]³`). Entries are keyed by block type,
//! axis and octant:
//!
//! ```text
//! LibraryKey { block_type, axis, octant }
//!
//! octant bits (binary: ZYX), bit set = positive corner component
//!   0 = (-,-,-)  1 = (+,-,-)  2 = (-,+,-)  3 = (+,+,-)
//!   4 = (-,-,+)  5 = (+,-,+)  6 = (-,+,+)  7 = (+,+,+)
//! ```
//!
//! [`BlockMeshLibrary::insert_symmetric`] derives every variant of a block
//! from one fragment authored for axis X and octant 7: the axis variants are
//! cyclic relabelings (X→Y→Z) and the octant variants are reflections, with
//! triangle winding reversed whenever an odd number of reflections is applied.

use std::collections::HashMap;

use glam::{IVec3, Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::blocks::BlockType;
use crate::cell::CellTransform;
use crate::constants::{octant_of, CORNER_OFFSETS};
use crate::error::{Result, VoxelError};
use crate::types::Axis;

/// Octant of the corner every symmetric fragment is authored for.
pub const AUTHORED_OCTANT: u8 = 7;

/// Lookup key for one fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LibraryKey {
  pub block_type: BlockType,
  pub axis: Option<Axis>,
  pub octant: u8,
}

impl LibraryKey {
  pub fn new(block_type: BlockType, axis: Option<Axis>, corner: IVec3) -> Self {
    Self {
      block_type,
      axis,
      octant: octant_of(corner),
    }
  }

  /// Corner offset of the key's octant.
  pub fn corner(&self) -> IVec3 {
    CORNER_OFFSETS[(self.octant & 7) as usize]
  }
}

/// Triangle-list geometry for one block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshFragment {
  pub positions: Vec<Vec3>,
  pub normals: Vec<Vec3>,
  pub uvs: Vec<Vec2>,
  pub indices: Vec<u32>,
}

impl MeshFragment {
  /// Build and validate a fragment.
  pub fn new(
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
  ) -> Result<Self> {
    let fragment = Self {
      positions,
      normals,
      uvs,
      indices,
    };
    fragment.validate()?;
    Ok(fragment)
  }

  /// Attribute arrays must agree in length, indices must form whole
  /// triangles and reference existing vertices.
  pub fn validate(&self) -> Result<()> {
    let vertices = self.positions.len();
    if self.normals.len() != vertices || self.uvs.len() != vertices {
      return Err(VoxelError::InvalidFragment {
        reason: format!(
          "{} positions, {} normals, {} uvs",
          vertices,
          self.normals.len(),
          self.uvs.len()
        ),
      });
    }
    if self.indices.len() % 3 != 0 {
      return Err(VoxelError::InvalidFragment {
        reason: format!("{} indices is not a whole number of triangles", self.indices.len()),
      });
    }
    if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vertices) {
      return Err(VoxelError::InvalidFragment {
        reason: format!("index {bad} out of range for {vertices} vertices"),
      });
    }
    Ok(())
  }

  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Copy with positions and normals mapped through `transform`. Winding is
  /// reversed for mirroring transforms so faces keep pointing outwards.
  pub fn transformed(&self, transform: &CellTransform) -> Self {
    let mut indices = self.indices.clone();
    if transform.is_mirrored() {
      for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
      }
    }
    Self {
      positions: self.positions.iter().map(|p| transform.apply_vec3(*p)).collect(),
      normals: self.normals.iter().map(|n| transform.apply_vec3(*n)).collect(),
      uvs: self.uvs.clone(),
      indices,
    }
  }
}

/// Transform taking the authored variant (axis X, octant 7) to `axis` and
/// `corner`.
pub fn variant_transform(axis: Axis, corner: IVec3) -> CellTransform {
  let mut transform = CellTransform::cycle(axis);
  for mirrored in Axis::ALL {
    if corner[mirrored.index()] < 0 {
      transform = transform.then(&CellTransform::mirror(mirrored));
    }
  }
  transform
}

/// Fragments for every block variant a mesh may need.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockMeshLibrary {
  fragments: HashMap<LibraryKey, MeshFragment>,
}

impl BlockMeshLibrary {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.fragments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fragments.is_empty()
  }

  /// Store a fragment, returning the one it replaced.
  pub fn insert(&mut self, key: LibraryKey, fragment: MeshFragment) -> Result<Option<MeshFragment>> {
    fragment.validate()?;
    if key.block_type.has_axis() != key.axis.is_some() {
      return Err(VoxelError::InvalidArgument(format!(
        "{:?} with axis {:?}",
        key.block_type, key.axis
      )));
    }
    Ok(self.fragments.insert(key, fragment))
  }

  /// Store every axis and octant variant of a fragment authored for axis X
  /// (or no axis) and octant 7.
  pub fn insert_symmetric(&mut self, block_type: BlockType, fragment: MeshFragment) -> Result<()> {
    fragment.validate()?;
    let axes: &[Option<Axis>] = if block_type.has_axis() {
      &[Some(Axis::X), Some(Axis::Y), Some(Axis::Z)]
    } else {
      &[None]
    };

    for &axis in axes {
      for corner in CORNER_OFFSETS {
        let transform = variant_transform(axis.unwrap_or(Axis::X), corner);
        self
          .fragments
          .insert(LibraryKey::new(block_type, axis, corner), fragment.transformed(&transform));
      }
    }
    Ok(())
  }

  pub fn get(&self, key: &LibraryKey) -> Option<&MeshFragment> {
    self.fragments.get(key)
  }

  /// Fragment for a block, if one was authored.
  pub fn find(&self, block_type: BlockType, axis: Option<Axis>, corner: IVec3) -> Option<&MeshFragment> {
    self.fragments.get(&LibraryKey::new(block_type, axis, corner))
  }

  pub fn keys(&self) -> impl Iterator<Item = &LibraryKey> {
    self.fragments.keys()
  }

  /// Every drawable `(type, axis, octant)` combination with no fragment,
  /// sorted.
  pub fn missing_entries(&self) -> Vec<LibraryKey> {
    let mut missing = Vec::new();
    for block_type in BlockType::ALL.into_iter().filter(|t| t.is_meshed()) {
      let axes: &[Option<Axis>] = if block_type.has_axis() {
        &[Some(Axis::X), Some(Axis::Y), Some(Axis::Z)]
      } else {
        &[None]
      };
      for &axis in axes {
        for octant in 0..8u8 {
          let key = LibraryKey {
            block_type,
            axis,
            octant,
          };
          if !self.fragments.contains_key(&key) {
            missing.push(key);
          }
        }
      }
    }
    missing
  }

  /// One-line summary of [`Self::missing_entries`], `None` when complete.
  pub fn missing_report(&self) -> Option<String> {
    let missing = self.missing_entries();
    if missing.is_empty() {
      return None;
    }
    let entries: Vec<String> = missing.iter().map(describe_key).collect();
    Some(format!(
      "{} block mesh entries missing: {}",
      missing.len(),
      entries.join(", ")
    ))
  }
}

pub(crate) fn describe_key(key: &LibraryKey) -> String {
  match key.axis {
    Some(axis) => format!("{:?}/{:?}/{}", key.block_type, axis, key.octant),
    None => format!("{:?}/{}", key.block_type, key.octant),
  }
}

/// Mesh libraries per shape id with a fallback for unknown shapes.
#[derive(Clone, Debug, Default)]
pub struct ShapeLibraries {
  default: BlockMeshLibrary,
  by_shape: HashMap<u16, BlockMeshLibrary>,
}

impl ShapeLibraries {
  pub fn new(default: BlockMeshLibrary) -> Self {
    Self {
      default,
      by_shape: HashMap::new(),
    }
  }

  pub fn insert(&mut self, shape_id: u16, library: BlockMeshLibrary) -> Option<BlockMeshLibrary> {
    self.by_shape.insert(shape_id, library)
  }

  /// Library for `shape_id`, or the default one.
  pub fn get(&self, shape_id: u16) -> &BlockMeshLibrary {
    self.by_shape.get(&shape_id).unwrap_or(&self.default)
  }

  pub fn default_library(&self) -> &BlockMeshLibrary {
    &self.default
  }
}

/// One entry of a library file.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
  pub block_type: BlockType,
  #[serde(default)]
  pub axis: Option<Axis>,
  /// Explicit octant; ignored for symmetric entries.
  #[serde(default)]
  pub octant: Option<u8>,
  /// Expand to every axis and octant variant.
  #[serde(default)]
  pub symmetric: bool,
  pub fragment: MeshFragment,
}

/// JSON document describing a [`BlockMeshLibrary`].
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryFile {
  pub entries: Vec<LibraryEntry>,
}

#[cfg(feature = "serde")]
impl LibraryFile {
  pub fn from_json(text: &str) -> Result<Self> {
    serde_json::from_str(text).map_err(|e| VoxelError::InvalidLibrary(e.to_string()))
  }

  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string_pretty(self).map_err(|e| VoxelError::InvalidLibrary(e.to_string()))
  }

  /// Build the library. Explicit entries are applied after symmetric ones
  /// so they override generated variants.
  pub fn into_library(self) -> Result<BlockMeshLibrary> {
    let mut library = BlockMeshLibrary::new();
    let (symmetric, explicit): (Vec<_>, Vec<_>) = self.entries.into_iter().partition(|e| e.symmetric);

    for entry in symmetric {
      library.insert_symmetric(entry.block_type, entry.fragment)?;
    }
    for entry in explicit {
      let octant = entry.octant.unwrap_or(AUTHORED_OCTANT);
      if octant > 7 {
        return Err(VoxelError::InvalidLibrary(format!(
          "octant {octant} of {:?} is out of range",
          entry.block_type
        )));
      }
      let key = LibraryKey {
        block_type: entry.block_type,
        axis: entry.axis,
        octant,
      };
      library.insert(key, entry.fragment)?;
    }
    Ok(library)
  }
}

#[cfg(test)]
#[path = "library_test.rs"]
mod library_test;
