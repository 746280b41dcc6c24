//! A backend that records every call, for testing code that drives a
//! [`RenderBackend`] without a real display.

use crate::backend::{LightParameters, RenderBackend};
use crate::camera::Frustum;
use crate::error::Result;
use crate::scene::{Material, MeshMode, Vertex};
use crate::vector::Vector3;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Viewport(u32, u32),
    View {
        eye: Vector3,
        target: Vector3,
        up: Vector3,
    },
    Projection(Frustum),
    Push,
    Pop,
    Translate(Vector3),
    Rotate(f32, Vector3),
    Scale(Vector3),
    PolygonMode(MeshMode),
    Material(Material),
    EnableLight(usize),
    DisableLight(usize),
    LightParameters(usize, LightParameters),
    Triangle([Vertex; 3]),
    Clear(Vector3),
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the transform calls, in order.
    pub fn transform_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::Translate(_) | Call::Rotate(..) | Call::Scale(_) | Call::Push | Call::Pop
                )
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn set_view(&mut self, eye: Vector3, target: Vector3, up: Vector3) {
        self.calls.push(Call::View { eye, target, up });
    }

    fn set_projection(&mut self, frustum: &Frustum) {
        self.calls.push(Call::Projection(*frustum));
    }

    fn push_transform(&mut self) {
        self.calls.push(Call::Push);
    }

    fn pop_transform(&mut self) {
        self.calls.push(Call::Pop);
    }

    fn translate(&mut self, offset: Vector3) {
        self.calls.push(Call::Translate(offset));
    }

    fn rotate(&mut self, degrees: f32, axis: Vector3) {
        self.calls.push(Call::Rotate(degrees, axis));
    }

    fn scale(&mut self, factors: Vector3) {
        self.calls.push(Call::Scale(factors));
    }

    fn set_polygon_mode(&mut self, mode: MeshMode) {
        self.calls.push(Call::PolygonMode(mode));
    }

    fn set_material(&mut self, material: &Material) {
        self.calls.push(Call::Material(*material));
    }

    fn enable_light(&mut self, index: usize) {
        self.calls.push(Call::EnableLight(index));
    }

    fn disable_light(&mut self, index: usize) {
        self.calls.push(Call::DisableLight(index));
    }

    fn set_light_parameters(&mut self, index: usize, parameters: &LightParameters) {
        self.calls.push(Call::LightParameters(index, *parameters));
    }

    fn emit_triangle(&mut self, vertices: [&Vertex; 3]) {
        self.calls.push(Call::Triangle(vertices.map(|v| *v)));
    }

    fn clear_frame(&mut self, color: Vector3) {
        self.calls.push(Call::Clear(color));
    }

    fn present_frame(&mut self) -> Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}
