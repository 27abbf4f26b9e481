//! Error types for voxel maps and mesh libraries.

use thiserror::Error;

/// Errors raised by map construction, resizing and library authoring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoxelError {
  /// A size, step count or level count that cannot describe a valid map.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A mesh fragment whose buffers do not describe a triangle list.
  #[error("invalid mesh fragment: {reason}")]
  InvalidFragment { reason: String },

  /// A library file that could not be parsed.
  #[error("invalid library file: {0}")]
  InvalidLibrary(String),
}

pub type Result<T> = std::result::Result<T, VoxelError>;
