/// Glance Terminal Viewer - demo scene
///
/// Renders the built-in demo scene in the terminal.
/// Controls:
///   - A/D: Look left/right
///   - U/J: Look up/down
///   - W/S: Move forward/backward
///   - 0: Toggle all lights, 1-9: toggle one light
///   - Q/ESC: Quit
///
/// Logs go to stderr (`RUST_LOG`, default `warn`); redirect it to keep the
/// picture clean, e.g. `glance-terminal 2>glance.log`.
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glance_core::Scene;
use glance_terminal::{controls_from_env, TerminalApp};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let controls = controls_from_env();
    info!(?controls, "starting terminal viewer");

    let mut app = TerminalApp::new(Scene::demo(), controls)?;
    app.run()?;

    Ok(())
}
