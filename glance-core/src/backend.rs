/// The interface the core drives to get pixels on screen
use crate::camera::Frustum;
use crate::error::Result;
use crate::scene::{Material, MeshMode, Vertex};
use crate::vector::Vector3;

/// Fixed-function parameters uploaded for one light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParameters {
    pub position: Vector3,
    pub ambient: Vector3,
    pub diffuse: Vector3,
    pub specular: Vector3,
}

/// A rendering backend.
///
/// The core never rasterizes or shades; it only issues these calls.
/// Transform calls made between [`push_transform`](Self::push_transform) and
/// [`pop_transform`](Self::pop_transform) act on geometry in call order: the
/// first call made after a push is applied to vertices first.
pub trait RenderBackend {
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Camera at `eye` looking at `target` with the given up direction.
    fn set_view(&mut self, eye: Vector3, target: Vector3, up: Vector3);

    fn set_projection(&mut self, frustum: &Frustum);

    /// Save the current model transform.
    fn push_transform(&mut self);

    /// Restore the model transform saved by the matching push.
    fn pop_transform(&mut self);

    fn translate(&mut self, offset: Vector3);

    /// Axis-angle rotation, angle in degrees.
    fn rotate(&mut self, degrees: f32, axis: Vector3);

    fn scale(&mut self, factors: Vector3);

    fn set_polygon_mode(&mut self, mode: MeshMode);

    fn set_material(&mut self, material: &Material);

    fn enable_light(&mut self, index: usize);

    fn disable_light(&mut self, index: usize);

    fn set_light_parameters(&mut self, index: usize, parameters: &LightParameters);

    /// One triangle, each vertex carrying its position and normal.
    fn emit_triangle(&mut self, vertices: [&Vertex; 3]);

    /// Clear to an RGB color with components in `[0, 1]`.
    fn clear_frame(&mut self, color: Vector3);

    fn present_frame(&mut self) -> Result<()>;
}
