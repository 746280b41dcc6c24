//! Error types for the core.

use thiserror::Error;

use crate::transform::TransformKind;
use crate::vector::Vector3;

/// Main error type for scene resolution and presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// A transformation reference points past the end of its table
    #[error("{kind} index {index} is out of range (table has {len} entries)")]
    TransformIndex {
        kind: TransformKind,
        index: usize,
        len: usize,
    },

    /// A mesh references a material that does not exist
    #[error("mesh {mesh} references material {index}, but only {len} materials exist")]
    MaterialIndex { mesh: usize, index: usize, len: usize },

    /// A face references a vertex that does not exist
    #[error("mesh {mesh} references vertex {index}, but only {len} vertices exist")]
    VertexIndex { mesh: usize, index: usize, len: usize },

    /// The camera's up vector has no component perpendicular to its gaze
    #[error("camera up {up} is parallel to gaze {gaze}")]
    DegenerateCamera { gaze: Vector3, up: Vector3 },

    /// IO errors raised while presenting a frame
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
