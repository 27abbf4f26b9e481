//! Dense voxel storage.
//!
//! ```text
//! index = x + y * size.x + z * size.x * size.y
//! ```

use glam::IVec3;

use super::{check_size, VoxelMap};
use crate::cell::VoxelCell;
use crate::error::Result;

/// Flat 3D array of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
  size: IVec3,
  cells: Vec<VoxelCell>,
}

impl VoxelGrid {
  /// Create a grid of `size` cells, all equal to `fill`.
  pub fn new(size: IVec3, fill: VoxelCell) -> Result<Self> {
    check_size(size)?;
    Ok(Self {
      size,
      cells: vec![fill; Self::cell_count(size)],
    })
  }

  /// Create an empty grid.
  pub fn empty(size: IVec3) -> Result<Self> {
    Self::new(size, VoxelCell::EMPTY)
  }

  /// Dense copy of any map.
  pub fn snapshot<M: VoxelMap + ?Sized>(map: &M) -> Result<Self> {
    let mut grid = Self::empty(map.size())?;
    map.for_each_filled(&mut |p, cell| {
      let i = grid.index(p);
      grid.cells[i] = cell;
    });
    Ok(grid)
  }

  fn cell_count(size: IVec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
  }

  #[inline(always)]
  fn index(&self, p: IVec3) -> usize {
    debug_assert!(self.contains(p), "{p} outside grid of size {}", self.size);
    p.x as usize + p.y as usize * self.size.x as usize
      + p.z as usize * self.size.x as usize * self.size.y as usize
  }

  /// Raw cells in index order.
  pub fn cells(&self) -> &[VoxelCell] {
    &self.cells
  }
}

impl VoxelMap for VoxelGrid {
  #[inline]
  fn size(&self) -> IVec3 {
    self.size
  }

  #[inline]
  fn get(&self, p: IVec3) -> VoxelCell {
    self.cells[self.index(p)]
  }

  fn set(&mut self, p: IVec3, value: VoxelCell) -> bool {
    let i = self.index(p);
    if self.cells[i] == value {
      return false;
    }
    self.cells[i] = value;
    true
  }

  fn reset(&mut self, size: IVec3, fill: VoxelCell) -> Result<()> {
    check_size(size)?;
    self.size = size;
    self.cells.clear();
    self.cells.resize(Self::cell_count(size), fill);
    Ok(())
  }

  fn for_each_filled(&self, f: &mut dyn FnMut(IVec3, VoxelCell)) {
    let (sx, sy) = (self.size.x as usize, self.size.y as usize);
    for (i, cell) in self.cells.iter().enumerate() {
      if cell.filled {
        let p = IVec3::new((i % sx) as i32, ((i / sx) % sy) as i32, (i / (sx * sy)) as i32);
        f(p, *cell);
      }
    }
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
