/// Terminal frontend: key mapping, configuration and the event loop
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self},
};
use std::env;
use std::io::stdout;
use tracing::{info, warn};

use glance_core::{CameraControls, Flow, InputAction, Scene, Session};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Overrides the look step, in degrees
pub const ROTATION_STEP_VAR: &str = "GLANCE_ROTATION_STEP_DEG";

/// Overrides the distance moved per key press
pub const TRANSLATION_SPEED_VAR: &str = "GLANCE_TRANSLATION_SPEED";

const HELP: &str = "A/D look left/right | U/J look up/down | W/S move | 0 all lights | 1-9 light | Q quit";

/// Map a key to the session action it triggers.
pub fn action_for_key(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('a') => InputAction::LookLeft,
        KeyCode::Char('d') => InputAction::LookRight,
        KeyCode::Char('u') => InputAction::LookUp,
        KeyCode::Char('j') => InputAction::LookDown,
        KeyCode::Char('w') => InputAction::MoveForward,
        KeyCode::Char('s') => InputAction::MoveBackward,
        KeyCode::Char('0') => InputAction::ToggleAllLights,
        KeyCode::Char(c @ '1'..='9') => InputAction::ToggleLight(c as usize - '0' as usize),
        _ => return None,
    };
    Some(action)
}

/// Camera controls with any environment overrides applied.
pub fn controls_from_env() -> CameraControls {
    controls_from_lookup(|name| env::var(name).ok())
}

fn controls_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CameraControls {
    let mut controls = CameraControls::default();

    if let Some(raw) = lookup(ROTATION_STEP_VAR) {
        match raw.trim().parse::<f32>() {
            Ok(degrees) => controls = controls.with_rotation_step(degrees.to_radians()),
            Err(_) => warn!(var = ROTATION_STEP_VAR, value = %raw, "ignoring unparsable override"),
        }
    }

    if let Some(raw) = lookup(TRANSLATION_SPEED_VAR) {
        match raw.trim().parse::<f32>() {
            Ok(speed) => controls = controls.with_translation_speed(speed),
            Err(_) => warn!(var = TRANSLATION_SPEED_VAR, value = %raw, "ignoring unparsable override"),
        }
    }

    controls
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    session: Session,
    renderer: AsciiRenderer,
}

impl TerminalApp {
    pub fn new(scene: Scene, controls: CameraControls) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut renderer = AsciiRenderer::new(width as usize, height as usize);
        renderer.set_status(HELP);

        Ok(Self {
            session: Session::new(scene, controls)?,
            renderer,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        self.session.start(&mut self.renderer)?;
        info!("entering event loop");

        loop {
            // Block until something happens, then render once
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    let Some(action) = action_for_key(code) else {
                        continue;
                    };
                    if self.session.handle(action, &mut self.renderer) == Flow::Quit {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    self.renderer.resize(width as usize, height as usize);
                }
                _ => continue,
            }

            self.session.frame(&mut self.renderer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key(KeyCode::Char('a')), Some(InputAction::LookLeft));
        assert_eq!(action_for_key(KeyCode::Char('d')), Some(InputAction::LookRight));
        assert_eq!(action_for_key(KeyCode::Char('u')), Some(InputAction::LookUp));
        assert_eq!(action_for_key(KeyCode::Char('j')), Some(InputAction::LookDown));
        assert_eq!(action_for_key(KeyCode::Char('w')), Some(InputAction::MoveForward));
        assert_eq!(action_for_key(KeyCode::Char('s')), Some(InputAction::MoveBackward));
        assert_eq!(action_for_key(KeyCode::Char('0')), Some(InputAction::ToggleAllLights));
        assert_eq!(action_for_key(KeyCode::Char('1')), Some(InputAction::ToggleLight(1)));
        assert_eq!(action_for_key(KeyCode::Char('9')), Some(InputAction::ToggleLight(9)));
        assert_eq!(action_for_key(KeyCode::Esc), Some(InputAction::Quit));
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
        assert_eq!(action_for_key(KeyCode::Up), None);
    }

    #[test]
    fn test_controls_defaults_without_overrides() {
        let controls = controls_from_lookup(|_| None);
        assert_eq!(controls, CameraControls::default());
    }

    #[test]
    fn test_controls_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ROTATION_STEP_VAR, "2"), (TRANSLATION_SPEED_VAR, " 0.5 ")]);
        let controls = controls_from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        approx::assert_relative_eq!(controls.rotation_step, 2.0_f32.to_radians());
        assert_eq!(controls.translation_speed, 0.5);
    }

    #[test]
    fn test_controls_ignore_garbage() {
        let controls = controls_from_lookup(|name| {
            (name == TRANSLATION_SPEED_VAR).then(|| "fast".to_string())
        });
        assert_eq!(controls, CameraControls::default());
    }
}
