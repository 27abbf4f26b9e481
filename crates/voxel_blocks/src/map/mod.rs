//! Voxel map capability shared by the dense grid and the sparse octree.
//!
//! Both storages expose the same contract: bounds-checked reads by the
//! caller, change-reporting writes, range edits with [`EditAction`]
//! semantics, and whole-map geometric transforms (turn, mirror, resize).
//! Storages only implement the primitive accessors; the edits are written
//! once in [`edit`] on top of them.
//!
//! # Coordinate System
//!
//! ```text
//!         +Y
//!          │
//!          │
//!          └───────── +X
//!         /
//!        +Z
//!
//! Cells live at integer coordinates in [0, size) on every axis.
//! ```

pub mod bounds;
pub mod edit;
pub mod grid;

pub use bounds::IBox3;
pub use grid::VoxelGrid;

use glam::IVec3;

use crate::cell::VoxelCell;
use crate::error::Result;
use crate::types::{Axis, Direction, EditAction};

/// Read/write access to a bounded 3D field of [`VoxelCell`]s.
pub trait VoxelMap {
  /// Cell count along each axis; every component is positive.
  fn size(&self) -> IVec3;

  /// Read a cell. `p` must be inside the map.
  fn get(&self, p: IVec3) -> VoxelCell;

  /// Write a cell. `p` must be inside the map. Returns false and leaves the
  /// map untouched when the stored value already equals `value`.
  fn set(&mut self, p: IVec3, value: VoxelCell) -> bool;

  /// Reallocate as `size` with every cell equal to `fill`.
  fn reset(&mut self, size: IVec3, fill: VoxelCell) -> Result<()>;

  /// Visit every filled cell.
  fn for_each_filled(&self, f: &mut dyn FnMut(IVec3, VoxelCell)) {
    for p in self.bounds().iter() {
      let cell = self.get(p);
      if cell.filled {
        f(p, cell);
      }
    }
  }

  /// Apply `action` over the inclusive box spanned by `min` and `max`,
  /// clamped to the map. Returns true if any cell changed.
  fn set_range(&mut self, min: IVec3, max: IVec3, action: EditAction, value: VoxelCell) -> bool {
    edit::set_range_cellwise(self, min, max, action, value)
  }

  #[inline]
  fn bounds(&self) -> IBox3 {
    IBox3::from_size(self.size())
  }

  #[inline]
  fn contains(&self, p: IVec3) -> bool {
    p.cmpge(IVec3::ZERO).all() && p.cmplt(self.size()).all()
  }

  fn try_get(&self, p: IVec3) -> Option<VoxelCell> {
    self.contains(p).then(|| self.get(p))
  }

  fn filled_count(&self) -> usize {
    let mut count = 0;
    self.for_each_filled(&mut |_, _| count += 1);
    count
  }

  /// Quarter turn about `axis`, see [`edit::turn`].
  fn turn(&mut self, axis: Axis, left_hand_positive: bool) {
    edit::turn(self, axis, left_hand_positive)
  }

  /// Reflection along `axis`, see [`edit::mirror`].
  fn mirror(&mut self, axis: Axis) {
    edit::mirror(self, axis)
  }

  /// Stretch or squeeze the content along `direction`'s axis.
  fn resize(&mut self, direction: Direction, steps: i32) -> Result<()> {
    edit::resize(self, direction, steps)
  }

  /// Grow or crop the map on the side `direction` points to.
  fn resize_canvas(&mut self, direction: Direction, steps: i32, repeat: bool) -> Result<()> {
    edit::resize_canvas(self, direction, steps, repeat)
  }
}

/// Validate a map size; every component must be positive.
pub(crate) fn check_size(size: IVec3) -> Result<()> {
  if size.cmpgt(IVec3::ZERO).all() {
    Ok(())
  } else {
    Err(crate::error::VoxelError::InvalidArgument(format!(
      "map size must be positive on every axis, got {size}"
    )))
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
