//! Inclusive integer box used for map bounds and range edits.

use glam::IVec3;

/// Integer axis-aligned box with inclusive corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IBox3 {
  /// Minimum corner (inclusive).
  pub min: IVec3,
  /// Maximum corner (inclusive).
  pub max: IVec3,
}

impl IBox3 {
  /// Create a box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: IVec3, max: IVec3) -> Self {
    debug_assert!(min.cmple(max).all(), "box min must be <= max on all axes");
    Self { min, max }
  }

  /// Box spanning two arbitrary corners.
  pub fn from_corners(a: IVec3, b: IVec3) -> Self {
    Self {
      min: a.min(b),
      max: a.max(b),
    }
  }

  /// Box covering `[0, size)`.
  pub fn from_size(size: IVec3) -> Self {
    Self {
      min: IVec3::ZERO,
      max: size - IVec3::ONE,
    }
  }

  /// Overlapping part of two boxes, if any.
  pub fn intersection(&self, other: &IBox3) -> Option<IBox3> {
    let min = self.min.max(other.min);
    let max = self.max.min(other.max);
    min.cmple(max).all().then_some(IBox3 { min, max })
  }

  #[inline]
  pub fn contains(&self, point: IVec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Box fully inside this one.
  #[inline]
  pub fn contains_box(&self, other: &IBox3) -> bool {
    self.contains(other.min) && self.contains(other.max)
  }

  /// Cell count along each axis.
  #[inline]
  pub fn size(&self) -> IVec3 {
    self.max - self.min + IVec3::ONE
  }

  pub fn volume(&self) -> i64 {
    let s = self.size().as_i64vec3();
    s.x * s.y * s.z
  }

  /// Every point in the box, X fastest.
  pub fn iter(&self) -> impl Iterator<Item = IVec3> {
    let IBox3 { min, max } = *self;
    (min.z..=max.z).flat_map(move |z| {
      (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
    })
  }

  /// Nearest point inside the box.
  #[inline]
  pub fn clamp(&self, point: IVec3) -> IVec3 {
    point.clamp(self.min, self.max)
  }
}

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;
