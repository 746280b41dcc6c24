/// Transformation tables, per-mesh transform chains and their composition
use std::fmt;

use nalgebra::{Matrix4, Vector3 as NaVector3};

use crate::backend::RenderBackend;
use crate::error::{Error, Result};
use crate::rotation;
use crate::vector::Vector3;

/// Which shared table a transformation reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Translation,
    Rotation,
    Scaling,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::Translation => "translation",
            TransformKind::Rotation => "rotation",
            TransformKind::Scaling => "scaling",
        };
        f.write_str(name)
    }
}

/// A `(kind, index)` pair referencing a shared table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRef {
    pub kind: TransformKind,
    pub index: usize,
}

impl TransformRef {
    pub fn translation(index: usize) -> Self {
        Self {
            kind: TransformKind::Translation,
            index,
        }
    }

    pub fn rotation(index: usize) -> Self {
        Self {
            kind: TransformKind::Rotation,
            index,
        }
    }

    pub fn scaling(index: usize) -> Self {
        Self {
            kind: TransformKind::Scaling,
            index,
        }
    }
}

/// Axis-angle rotation as stored in the scene, angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    pub axis: Vector3,
}

impl Rotation {
    pub fn new(degrees: f32, axis: Vector3) -> Self {
        Self { degrees, axis }
    }
}

/// `(angle, ax, ay, az)` tuple layout
impl From<[f32; 4]> for Rotation {
    fn from([degrees, x, y, z]: [f32; 4]) -> Self {
        Self::new(degrees, Vector3::new(x, y, z))
    }
}

/// Scene-wide transformation tables, shared by every mesh
#[derive(Debug, Clone, Default)]
pub struct TransformTables {
    pub translations: Vec<Vector3>,
    pub rotations: Vec<Rotation>,
    pub scalings: Vec<Vector3>,
}

impl TransformTables {
    pub fn new() -> Self {
        Self::default()
    }

    fn len_of(&self, kind: TransformKind) -> usize {
        match kind {
            TransformKind::Translation => self.translations.len(),
            TransformKind::Rotation => self.rotations.len(),
            TransformKind::Scaling => self.scalings.len(),
        }
    }

    /// Look up the table entry a reference points at.
    pub fn resolve(&self, reference: TransformRef) -> Result<TransformOp> {
        let TransformRef { kind, index } = reference;
        let op = match kind {
            TransformKind::Translation => self.translations.get(index).copied().map(TransformOp::Translate),
            TransformKind::Rotation => self.rotations.get(index).map(|r| TransformOp::Rotate {
                degrees: r.degrees,
                axis: r.axis,
            }),
            TransformKind::Scaling => self.scalings.get(index).copied().map(TransformOp::Scale),
        };

        op.ok_or(Error::TransformIndex {
            kind,
            index,
            len: self.len_of(kind),
        })
    }

    /// Resolve a mesh's declared transformations into emission order.
    ///
    /// The result is the reverse of the declaration, and operations are
    /// applied to geometry in the order they are emitted: for `[T0, T1, T2]`
    /// the emitted chain is `[T2, T1, T0]` and `T2` acts on the vertices first.
    pub fn chain(&self, declared: &[TransformRef]) -> Result<Vec<TransformOp>> {
        declared.iter().rev().map(|&r| self.resolve(r)).collect()
    }
}

/// An elementary transformation ready to hand to a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate(Vector3),
    Rotate { degrees: f32, axis: Vector3 },
    Scale(Vector3),
}

impl TransformOp {
    /// Homogeneous matrix of this single operation.
    pub fn matrix(&self) -> Matrix4<f32> {
        match *self {
            TransformOp::Translate(t) => Transform::translation_matrix(t.x, t.y, t.z),
            TransformOp::Rotate { degrees, axis } => rotation::rotation_matrix_degrees(axis, degrees),
            TransformOp::Scale(s) => Transform::scale_matrix(s.x, s.y, s.z),
        }
    }

    /// Forward this operation to the matching backend call.
    pub fn apply<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        match *self {
            TransformOp::Translate(t) => backend.translate(t),
            TransformOp::Rotate { degrees, axis } => backend.rotate(degrees, axis),
            TransformOp::Scale(s) => backend.scale(s),
        }
    }
}

/// Fold an emitted chain into one model matrix.
///
/// `ops[0]` is applied to geometry first, so the product is
/// `ops[n-1] · … · ops[1] · ops[0]`.
pub fn compose(ops: &[TransformOp]) -> Matrix4<f32> {
    ops.iter()
        .fold(Matrix4::identity(), |model, op| op.matrix() * model)
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&NaVector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&NaVector3::new(sx, sy, sz))
    }

    /// Inverse transpose of the model matrix, for transforming normals.
    ///
    /// Falls back to the identity when the model is not invertible, e.g. a
    /// zero scale.
    pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
        model
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }
}
