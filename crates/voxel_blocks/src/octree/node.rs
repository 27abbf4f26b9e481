//! Octree node - a cube that is either uniform or split into 8 octants.
//!
//! Child index bits match [`crate::constants::CORNER_OFFSETS`]:
//! - bit 0: X offset (0 or 1)
//! - bit 1: Y offset (0 or 1)
//! - bit 2: Z offset (0 or 1)

use glam::IVec3;

use crate::cell::VoxelCell;

/// Node of the sparse voxel octree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
  /// Every cell in the cube holds the same value.
  Homogeneous(VoxelCell),
  /// The cube is split into 8 children.
  Mixed(Box<[Node; 8]>),
}

impl Node {
  /// Eight homogeneous children holding `value`.
  pub fn split(value: VoxelCell) -> Box<[Node; 8]> {
    Box::new(std::array::from_fn(|_| Node::Homogeneous(value)))
  }

  /// Value of a homogeneous node.
  #[inline]
  pub fn uniform_value(&self) -> Option<VoxelCell> {
    match self {
      Node::Homogeneous(value) => Some(*value),
      Node::Mixed(_) => None,
    }
  }

  /// Replace a mixed node by a homogeneous one when all 8 children are
  /// homogeneous with one value. Returns true if the node collapsed.
  pub fn collapse(&mut self) -> bool {
    let Node::Mixed(children) = self else {
      return false;
    };
    let Some(first) = children[0].uniform_value() else {
      return false;
    };
    if children[1..]
      .iter()
      .all(|child| child.uniform_value() == Some(first))
    {
      *self = Node::Homogeneous(first);
      true
    } else {
      false
    }
  }

  /// Total nodes in this subtree, including itself.
  pub fn count(&self) -> usize {
    match self {
      Node::Homogeneous(_) => 1,
      Node::Mixed(children) => 1 + children.iter().map(Node::count).sum::<usize>(),
    }
  }

  /// True when no mixed node in the subtree could collapse.
  pub fn is_canonical(&self) -> bool {
    match self {
      Node::Homogeneous(_) => true,
      Node::Mixed(children) => {
        let first = children[0].uniform_value();
        let collapsible = first.is_some() && children.iter().all(|c| c.uniform_value() == first);
        !collapsible && children.iter().all(Node::is_canonical)
      }
    }
  }
}

/// Child octant of `p` inside a cube at `origin` with children of edge
/// `half`.
#[inline]
pub fn child_octant(origin: IVec3, half: i32, p: IVec3) -> usize {
  let local = p - origin;
  (local.x >= half) as usize | ((local.y >= half) as usize) << 1 | ((local.z >= half) as usize) << 2
}

/// Origin of child `octant` of a cube at `origin` with children of edge
/// `half`.
#[inline]
pub fn child_origin(origin: IVec3, half: i32, octant: usize) -> IVec3 {
  origin
    + IVec3::new(
      (octant & 1) as i32,
      ((octant >> 1) & 1) as i32,
      ((octant >> 2) & 1) as i32,
    ) * half
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
