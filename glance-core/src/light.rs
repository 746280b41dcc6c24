/// Point lights and the on/off state machine driven by user input
use tracing::{debug, warn};

use crate::backend::{LightParameters, RenderBackend};
use crate::vector::Vector3;

/// An omnidirectional light. Only `status` changes after load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3,
    pub intensity: Vector3,
    pub status: bool,
}

impl PointLight {
    /// A light that starts switched on.
    pub fn new(position: Vector3, intensity: Vector3) -> Self {
        Self {
            position,
            intensity,
            status: true,
        }
    }

    /// Parameters uploaded to the backend: diffuse and specular both carry
    /// the light's intensity, ambient comes from the scene.
    pub fn parameters(&self, ambient: Vector3) -> LightParameters {
        LightParameters {
            position: self.position,
            ambient,
            diffuse: self.intensity,
            specular: self.intensity,
        }
    }
}

/// Per-light on/off state plus the master "all lights" flag.
///
/// Indices are 0-based everywhere except [`toggle_light`](Self::toggle_light),
/// which takes the 1-based number shown to users. The master flag only
/// remembers which bulk action ran last; it is not recomputed from the
/// individual lights, so toggling single lights can leave it stale.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSwitch {
    lights: Vec<PointLight>,
    ambient: Vector3,
    all_on: bool,
}

impl LightSwitch {
    /// Take ownership of the scene's lights. Every light starts on.
    pub fn new(mut lights: Vec<PointLight>, ambient: Vector3) -> Self {
        for light in &mut lights {
            light.status = true;
        }
        Self {
            lights,
            ambient,
            all_on: true,
        }
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PointLight> {
        self.lights.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    /// What the last bulk action was: `true` after "all on".
    pub fn all_on(&self) -> bool {
        self.all_on
    }

    /// Switch light `index` on and upload its parameters. Out of range is a no-op.
    pub fn turn_on_light<B: RenderBackend + ?Sized>(&mut self, index: usize, backend: &mut B) {
        let ambient = self.ambient;
        let Some(light) = self.lights.get_mut(index) else {
            return;
        };

        light.status = true;
        backend.enable_light(index);
        backend.set_light_parameters(index, &light.parameters(ambient));
        debug!(light = index, "light on");
    }

    /// Switch light `index` off. Out of range is a no-op.
    pub fn turn_off_light<B: RenderBackend + ?Sized>(&mut self, index: usize, backend: &mut B) {
        let ambient = self.ambient;
        let Some(light) = self.lights.get_mut(index) else {
            return;
        };

        light.status = false;
        backend.set_light_parameters(index, &light.parameters(ambient));
        backend.disable_light(index);
        debug!(light = index, "light off");
    }

    /// Flip the light with 1-based number `id`.
    ///
    /// Returns `false`, and logs a warning, when no such light exists.
    pub fn toggle_light<B: RenderBackend + ?Sized>(&mut self, id: usize, backend: &mut B) -> bool {
        let Some(index) = id.checked_sub(1).filter(|&index| index < self.lights.len()) else {
            warn!(id, count = self.lights.len(), "no light with this number");
            return false;
        };

        if self.lights[index].status {
            self.turn_off_light(index, backend);
        } else {
            self.turn_on_light(index, backend);
        }
        true
    }

    pub fn turn_on_lights<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.all_on = true;
        for index in 0..self.lights.len() {
            self.turn_on_light(index, backend);
        }
    }

    pub fn turn_off_lights<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.all_on = false;
        for index in 0..self.lights.len() {
            self.turn_off_light(index, backend);
        }
    }

    /// The master key: all off if the last bulk action was "all on", else all on.
    pub fn toggle_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if self.all_on {
            self.turn_off_lights(backend);
        } else {
            self.turn_on_lights(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingBackend};

    fn switch() -> LightSwitch {
        LightSwitch::new(
            vec![
                PointLight::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.5, 0.5, 0.5)),
                PointLight::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
            ],
            Vector3::new(0.1, 0.1, 0.1),
        )
    }

    fn statuses(switch: &LightSwitch) -> Vec<bool> {
        switch.iter().map(|light| light.status).collect()
    }

    #[test]
    fn test_new_starts_all_on() {
        let mut lights = vec![PointLight::new(Vector3::ZERO, Vector3::X)];
        lights[0].status = false;
        let switch = LightSwitch::new(lights, Vector3::ZERO);
        assert_eq!(statuses(&switch), vec![true]);
        assert!(switch.all_on());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut switch = switch();
        let mut backend = RecordingBackend::default();

        assert!(switch.toggle_light(2, &mut backend));
        assert_eq!(statuses(&switch), vec![true, false]);
        assert!(switch.toggle_light(2, &mut backend));
        assert_eq!(statuses(&switch), vec![true, true]);
    }

    #[test]
    fn test_toggle_out_of_range_changes_nothing() {
        let mut switch = switch();
        let before = switch.clone();
        let mut backend = RecordingBackend::default();

        assert!(!switch.toggle_light(999, &mut backend));
        assert!(!switch.toggle_light(0, &mut backend));
        assert_eq!(switch, before);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_explicit_out_of_range_is_silent() {
        let mut switch = switch();
        let mut backend = RecordingBackend::default();
        switch.turn_on_light(5, &mut backend);
        switch.turn_off_light(5, &mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_status_change_uploads_parameters() {
        let mut switch = switch();
        let mut backend = RecordingBackend::default();

        switch.turn_off_light(0, &mut backend);
        switch.turn_on_light(0, &mut backend);

        let expected = LightParameters {
            position: Vector3::new(1.0, 2.0, 3.0),
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(0.5, 0.5, 0.5),
        };
        assert_eq!(
            backend.calls,
            vec![
                Call::LightParameters(0, expected),
                Call::DisableLight(0),
                Call::EnableLight(0),
                Call::LightParameters(0, expected),
            ]
        );
    }

    #[test]
    fn test_toggle_never_moves_lights() {
        let mut switch = switch();
        let before: Vec<_> = switch.iter().map(|l| (l.position, l.intensity)).collect();
        let mut backend = RecordingBackend::default();

        switch.toggle_light(1, &mut backend);
        switch.toggle_all(&mut backend);

        let after: Vec<_> = switch.iter().map(|l| (l.position, l.intensity)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_master_toggle_twice_restores_all_on() {
        let mut switch = switch();
        let mut backend = RecordingBackend::default();

        switch.toggle_all(&mut backend);
        assert_eq!(statuses(&switch), vec![false, false]);
        assert!(!switch.all_on());

        switch.toggle_all(&mut backend);
        assert_eq!(statuses(&switch), vec![true, true]);
        assert!(switch.all_on());
    }

    #[test]
    fn test_master_flag_can_go_stale() {
        let mut switch = switch();
        let mut backend = RecordingBackend::default();

        switch.toggle_light(1, &mut backend);
        switch.toggle_light(2, &mut backend);
        assert_eq!(statuses(&switch), vec![false, false]);

        // Flag still says "all on", so the master key turns everything off
        assert!(switch.all_on());
        switch.toggle_all(&mut backend);
        assert_eq!(statuses(&switch), vec![false, false]);
        assert!(!switch.all_on());
    }
}
