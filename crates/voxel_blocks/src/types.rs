//! Core value types shared by maps, the planner and the assembler.

use glam::{IVec3, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Principal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
  X,
  Y,
  Z,
}

impl Axis {
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  #[inline]
  pub const fn from_index(index: usize) -> Self {
    match index % 3 {
      0 => Axis::X,
      1 => Axis::Y,
      _ => Axis::Z,
    }
  }

  /// Cyclic successor: X → Y → Z → X.
  #[inline]
  pub const fn next(self) -> Self {
    Self::from_index(self.index() + 1)
  }

  /// Unit vector along the axis.
  #[inline]
  pub fn unit(self) -> IVec3 {
    let mut v = IVec3::ZERO;
    v[self.index()] = 1;
    v
  }

  /// The axis of a vector with exactly one non-zero component.
  pub fn of_unit(v: IVec3) -> Option<Self> {
    match (v.x != 0, v.y != 0, v.z != 0) {
      (true, false, false) => Some(Axis::X),
      (false, true, false) => Some(Axis::Y),
      (false, false, true) => Some(Axis::Z),
      _ => None,
    }
  }
}

/// One of the six cardinal directions.
///
/// The discriminant is the bit index used by [`crate::VoxelCell`]'s side mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
  /// +X
  Right,
  /// -X
  Left,
  /// +Y
  Up,
  /// -Y
  Down,
  /// +Z
  Forward,
  /// -Z
  Back,
}

impl Direction {
  pub const ALL: [Direction; 6] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
    Direction::Forward,
    Direction::Back,
  ];

  pub fn new(axis: Axis, positive: bool) -> Self {
    match (axis, positive) {
      (Axis::X, true) => Direction::Right,
      (Axis::X, false) => Direction::Left,
      (Axis::Y, true) => Direction::Up,
      (Axis::Y, false) => Direction::Down,
      (Axis::Z, true) => Direction::Forward,
      (Axis::Z, false) => Direction::Back,
    }
  }

  #[inline]
  pub fn axis(self) -> Axis {
    Axis::from_index(self as usize / 2)
  }

  #[inline]
  pub fn is_positive(self) -> bool {
    (self as usize) % 2 == 0
  }

  /// +1 or -1.
  #[inline]
  pub fn sign(self) -> i32 {
    if self.is_positive() {
      1
    } else {
      -1
    }
  }

  #[inline]
  pub fn offset(self) -> IVec3 {
    self.axis().unit() * self.sign()
  }

  #[inline]
  pub fn opposite(self) -> Self {
    Self::new(self.axis(), !self.is_positive())
  }

  /// Bit of this direction in a side mask.
  #[inline]
  pub const fn bit(self) -> u8 {
    1 << (self as u8)
  }

  /// Direction of a unit offset, `None` for anything else.
  pub fn from_offset(offset: IVec3) -> Option<Self> {
    let axis = Axis::of_unit(offset)?;
    match offset[axis.index()] {
      1 => Some(Self::new(axis, true)),
      -1 => Some(Self::new(axis, false)),
      _ => None,
    }
  }
}

/// How a range edit treats the cells it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EditAction {
  /// Replace every cell.
  Overwrite,
  /// Write only into empty cells.
  Attach,
  /// Clear filled cells.
  Erase,
  /// Replace material, shape and extra data of filled cells.
  Repaint,
  /// Replace only the material of filled cells.
  RepaintMaterialOnly,
  /// Replace only the shape (and its side mask) of filled cells.
  RepaintShapeOnly,
}

/// Treatment of neighbours that fall outside the map.
///
/// Hosts with a boolean "skip corners at the map edge" switch map it as
/// `true => Open` and `false => Close`. `Close` never skips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MapEdgePolicy {
  /// Outside counts as empty. Every corner facing the map edge gets a
  /// block, so the mesh is closed there.
  #[default]
  Close,
  /// Skip a corner when all seven neighbours are the same kind or outside
  /// the map. Nothing is drawn against the map edge, leaving the surface
  /// open there.
  Open,
  /// Coordinates are clamped back into the map, as if the border layer
  /// continued forever.
  Continue,
}

/// Flags threaded through block classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassificationConfig {
  /// Fold nearby convex edges into negative edges where a diagonal
  /// neighbour closes the gap.
  pub merge_close_edges: bool,

  /// Behaviour at the map boundary.
  pub map_edge: MapEdgePolicy,

  /// Emit surfaces between voxels of different kinds. When off, corners
  /// surrounded only by filled voxels are skipped.
  pub draw_between_different_types: bool,

  /// Consult the neighbour's side mask for face neighbours of a different
  /// kind (cube shapes only).
  pub use_side_closed_mask: bool,
}

impl Default for ClassificationConfig {
  fn default() -> Self {
    Self {
      merge_close_edges: false,
      map_edge: MapEdgePolicy::Close,
      draw_between_different_types: true,
      use_side_closed_mask: false,
    }
  }
}

impl ClassificationConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_merge_close_edges(mut self, merge: bool) -> Self {
    self.merge_close_edges = merge;
    self
  }

  pub fn with_map_edge(mut self, policy: MapEdgePolicy) -> Self {
    self.map_edge = policy;
    self
  }

  pub fn with_draw_between_different_types(mut self, draw: bool) -> Self {
    self.draw_between_different_types = draw;
    self
  }

  pub fn with_side_closed_mask(mut self, use_mask: bool) -> Self {
    self.use_side_closed_mask = use_mask;
    self
  }
}

/// World scale applied while assembling meshes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssemblyConfig {
  /// Edge lengths of one voxel in world units.
  pub voxel_size: Vec3,
}

impl Default for AssemblyConfig {
  fn default() -> Self {
    Self {
      voxel_size: Vec3::ONE,
    }
  }
}

impl AssemblyConfig {
  pub fn with_voxel_size(mut self, size: Vec3) -> Self {
    self.voxel_size = size;
    self
  }
}

/// Material and shape pair; voxels of one kind merge into one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelKind {
  pub material_index: u16,
  pub shape_id: u16,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MinMaxAABB {
  pub min: Vec3,
  pub max: Vec3,
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::INFINITY,
      max: Vec3::NEG_INFINITY,
    }
  }

  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
