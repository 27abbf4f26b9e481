//! Sparse voxel octree.
//!
//! The map is a power-of-two cube (edge `2^level_count`) of which only the
//! logical `size` is addressable. Uniform regions are stored as a single
//! [`Node::Homogeneous`]; a write splits uniform nodes on the way down and
//! collapses uniform siblings on the way back up, so memory follows surface
//! complexity rather than volume.
//!
//! ```text
//! write (p, v):
//!
//!   level L   Homogeneous(a)  ──split──►  Mixed[a a a a a a a a]
//!                                               │
//!   level L-1                               descend into octant(p)
//!                                               │
//!   level 0                                 Homogeneous(v)
//!
//!   back up:  Mixed[v v v v v v v v]  ──collapse──►  Homogeneous(v)
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `Node` - the homogeneous/mixed tree node and octant math

pub mod node;

pub use node::Node;

use glam::IVec3;

use crate::cell::VoxelCell;
use crate::error::{Result, VoxelError};
use crate::map::{check_size, edit, IBox3, VoxelMap};
use crate::types::EditAction;

use node::{child_octant, child_origin};

/// Deepest supported tree (cube edge 65536).
pub const MAX_LEVEL_COUNT: u32 = 16;

/// Voxel map backed by an 8-way tree of uniform regions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseVoxelOctree {
  size: IVec3,
  level_count: u32,
  root: Node,
}

/// Smallest level count whose cube covers `size`.
fn levels_for(size: IVec3) -> u32 {
  (size.max_element().max(1) as u32)
    .next_power_of_two()
    .trailing_zeros()
}

impl SparseVoxelOctree {
  /// Create an octree addressing `size` cells, all equal to `fill`. The
  /// padding of the power-of-two cube is empty.
  pub fn new(size: IVec3, fill: VoxelCell) -> Result<Self> {
    check_size(size)?;
    let level_count = levels_for(size);
    if level_count > MAX_LEVEL_COUNT {
      return Err(VoxelError::InvalidArgument(format!(
        "map size {size} needs {level_count} octree levels, at most {MAX_LEVEL_COUNT} supported"
      )));
    }
    let mut octree = Self {
      size,
      level_count,
      root: Node::Homogeneous(VoxelCell::EMPTY),
    };
    // Cells of the cube beyond `size` stay empty.
    let bounds = octree.bounds();
    Self::fill(&mut octree.root, IVec3::ZERO, level_count, &bounds, fill);
    Ok(octree)
  }

  /// Create a full cube of edge `2^level_count`.
  pub fn with_level_count(level_count: u32, fill: VoxelCell) -> Result<Self> {
    if level_count > MAX_LEVEL_COUNT {
      return Err(VoxelError::InvalidArgument(format!(
        "level count {level_count} exceeds {MAX_LEVEL_COUNT}"
      )));
    }
    Self::new(IVec3::splat(1 << level_count), fill)
  }

  /// Tree depth; the cube edge is `2^level_count`.
  pub fn level_count(&self) -> u32 {
    self.level_count
  }

  pub fn root(&self) -> &Node {
    &self.root
  }

  /// Nodes currently allocated, including the root.
  pub fn node_count(&self) -> usize {
    self.root.count()
  }

  /// True when no mixed node could collapse.
  pub fn is_canonical(&self) -> bool {
    self.root.is_canonical()
  }

  fn write(node: &mut Node, origin: IVec3, level: u32, p: IVec3, value: VoxelCell) -> bool {
    if let Node::Homogeneous(old) = *node {
      if old == value {
        return false;
      }
      if level == 0 {
        *node = Node::Homogeneous(value);
        return true;
      }
      *node = Node::Mixed(Node::split(old));
    }

    let changed = match node {
      Node::Mixed(children) => {
        let half = 1 << (level - 1);
        let octant = child_octant(origin, half, p);
        let child = child_origin(origin, half, octant);
        Self::write(&mut children[octant], child, level - 1, p, value)
      }
      Node::Homogeneous(_) => false,
    };
    if changed {
      node.collapse();
    }
    changed
  }

  /// Overwrite every cell of `range` (already clamped to the map).
  fn fill(node: &mut Node, origin: IVec3, level: u32, range: &IBox3, value: VoxelCell) -> bool {
    let edge = 1 << level;
    let cube = IBox3::new(origin, origin + IVec3::splat(edge - 1));
    if cube.intersection(range).is_none() {
      return false;
    }
    if range.contains_box(&cube) {
      if node.uniform_value() == Some(value) {
        return false;
      }
      *node = Node::Homogeneous(value);
      return true;
    }

    if let Node::Homogeneous(old) = *node {
      if old == value {
        return false;
      }
      *node = Node::Mixed(Node::split(old));
    }

    let mut changed = false;
    if let Node::Mixed(children) = node {
      let half = edge / 2;
      for (octant, child) in children.iter_mut().enumerate() {
        changed |= Self::fill(child, child_origin(origin, half, octant), level - 1, range, value);
      }
    }
    // A split that touched nothing still has to fold back.
    node.collapse();
    changed
  }

  fn visit_filled(
    node: &Node,
    origin: IVec3,
    level: u32,
    bounds: &IBox3,
    f: &mut dyn FnMut(IVec3, VoxelCell),
  ) {
    match node {
      Node::Homogeneous(cell) => {
        if !cell.filled {
          return;
        }
        let cube = IBox3::new(origin, origin + IVec3::splat((1 << level) - 1));
        if let Some(visible) = cube.intersection(bounds) {
          for p in visible.iter() {
            f(p, *cell);
          }
        }
      }
      Node::Mixed(children) => {
        let half = 1 << (level - 1);
        for (octant, child) in children.iter().enumerate() {
          Self::visit_filled(child, child_origin(origin, half, octant), level - 1, bounds, f);
        }
      }
    }
  }
}

impl VoxelMap for SparseVoxelOctree {
  #[inline]
  fn size(&self) -> IVec3 {
    self.size
  }

  fn get(&self, p: IVec3) -> VoxelCell {
    debug_assert!(self.contains(p), "{p} outside octree of size {}", self.size);
    let mut node = &self.root;
    let mut origin = IVec3::ZERO;
    let mut level = self.level_count;
    loop {
      match node {
        Node::Homogeneous(value) => return *value,
        Node::Mixed(children) => {
          let half = 1 << (level - 1);
          let octant = child_octant(origin, half, p);
          origin = child_origin(origin, half, octant);
          node = &children[octant];
          level -= 1;
        }
      }
    }
  }

  fn set(&mut self, p: IVec3, value: VoxelCell) -> bool {
    debug_assert!(self.contains(p), "{p} outside octree of size {}", self.size);
    Self::write(&mut self.root, IVec3::ZERO, self.level_count, p, value)
  }

  fn reset(&mut self, size: IVec3, fill: VoxelCell) -> Result<()> {
    *self = Self::new(size, fill)?;
    Ok(())
  }

  fn for_each_filled(&self, f: &mut dyn FnMut(IVec3, VoxelCell)) {
    let bounds = self.bounds();
    Self::visit_filled(&self.root, IVec3::ZERO, self.level_count, &bounds, f);
  }

  fn set_range(&mut self, min: IVec3, max: IVec3, action: EditAction, value: VoxelCell) -> bool {
    if action != EditAction::Overwrite {
      return edit::set_range_cellwise(self, min, max, action, value);
    }
    match IBox3::from_corners(min, max).intersection(&self.bounds()) {
      Some(range) => Self::fill(&mut self.root, IVec3::ZERO, self.level_count, &range, value),
      None => false,
    }
  }
}
