//! Opens a window and draws a red triangle until it is closed or Escape is
//! pressed.

use std::process::ExitCode;

use glow_triangle::{init_logging, run, LoggingConfig, WindowConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run(&WindowConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_reported() {
                log::error!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}
