/// Interactive session: owns the scene and turns input actions into core operations
use tracing::{debug, info};

use crate::backend::RenderBackend;
use crate::camera::CameraControls;
use crate::error::Result;
use crate::frame::{apply_camera, render_scene};
use crate::scene::Scene;

/// A discrete user input the session knows how to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
    MoveForward,
    MoveBackward,
    /// The master light key
    ToggleAllLights,
    /// Toggle the light with this 1-based number
    ToggleLight(usize),
    Quit,
}

/// Whether the driver should keep running after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything mutable during a run, owned in one place.
///
/// An action is fully applied, camera frame included, before `handle`
/// returns, so the next [`frame`](Self::frame) always sees consistent state.
#[derive(Debug, Clone)]
pub struct Session {
    scene: Scene,
    controls: CameraControls,
}

impl Session {
    /// Validate the scene and take ownership of it.
    pub fn new(scene: Scene, controls: CameraControls) -> Result<Self> {
        scene.validate()?;
        info!(
            meshes = scene.meshes.len(),
            vertices = scene.vertices.len(),
            lights = scene.lights.len(),
            "scene loaded"
        );
        Ok(Self { scene, controls })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Set up the camera, switch every light on and present the first frame.
    pub fn start<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        apply_camera(&mut self.scene.camera, backend);
        self.scene.lights.turn_on_lights(backend);
        self.frame(backend)
    }

    /// Apply one input action and refresh the camera on the backend.
    pub fn handle<B: RenderBackend + ?Sized>(&mut self, action: InputAction, backend: &mut B) -> Flow {
        let camera = &mut self.scene.camera;
        let CameraControls {
            rotation_step,
            translation_speed,
        } = self.controls;

        match action {
            InputAction::LookLeft => camera.look_left(rotation_step),
            InputAction::LookRight => camera.look_right(rotation_step),
            InputAction::LookUp => camera.look_up(rotation_step),
            InputAction::LookDown => camera.look_down(rotation_step),
            InputAction::MoveForward => camera.move_forward(translation_speed),
            InputAction::MoveBackward => camera.move_backward(translation_speed),
            InputAction::ToggleAllLights => self.scene.lights.toggle_all(backend),
            InputAction::ToggleLight(id) => {
                self.scene.lights.toggle_light(id, backend);
            }
            InputAction::Quit => {
                debug!("quit requested");
                return Flow::Quit;
            }
        }

        apply_camera(&mut self.scene.camera, backend);
        Flow::Continue
    }

    /// Render the scene and present it.
    pub fn frame<B: RenderBackend + ?Sized>(&self, backend: &mut B) -> Result<()> {
        render_scene(&self.scene, backend)?;
        backend.present_frame()
    }
}
