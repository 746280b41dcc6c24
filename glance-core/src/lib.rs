//! Glance Core Library - camera basis, rotation and transform-chain engine
//!
//! This library provides the backend-independent part of the viewer: vector
//! algebra, arbitrary-axis rotation matrices, camera frame maintenance,
//! per-mesh transform chains, light switching and the scene model. Side
//! effects go through the [`RenderBackend`] trait.

pub mod backend;
pub mod camera;
pub mod error;
pub mod frame;
pub mod light;
pub mod rotation;
pub mod scene;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use backend::{LightParameters, RenderBackend};
pub use camera::{Camera, CameraBasis, CameraControls, Frustum, NearPlane, ViewParameters};
pub use error::{Error, Result};
pub use light::{LightSwitch, PointLight};
pub use scene::{Face, Material, Mesh, MeshMode, Scene, Vertex};
pub use session::{Flow, InputAction, Session};
pub use transform::{Rotation, Transform, TransformKind, TransformOp, TransformRef, TransformTables};
pub use vector::Vector3;
