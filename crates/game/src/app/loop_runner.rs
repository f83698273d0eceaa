use std::io;
use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::replay::run_session;

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    let stdin = io::stdin();
    match run_session(&mut app.session, stdin.lock()) {
        Ok(summary) => {
            info!(
                commands = summary.commands,
                keys_consumed = summary.keys_consumed,
                invalid_lines = summary.invalid_lines,
                tick = app.session.world().current_tick(),
                pending_orders = app.session.world().pending_orders().len(),
                messages = app.session.messages().lines().len(),
                voices = app.session.feedback().played().len(),
                camera_x = app.session.camera().position.x,
                camera_y = app.session.camera().position.y,
                status_bars = app
                    .session
                    .dispatcher()
                    .settings()
                    .game
                    .always_show_status_bars,
                "replay_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "stdin_read_failed");
            ExitCode::FAILURE
        }
    }
}
