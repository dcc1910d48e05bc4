mod app;
mod bootstrap;
mod clap_app;
mod directories;

use app::App;
use std::process;
use tmaker::error::*;

/// Runs the requested command.
///
/// `Ok(false)` means the command completed but reported a problem of its own
/// (for instance a custom tree that failed to parse).
fn run() -> Result<bool> {
    App::new()?.start()
}

fn main() {
    let exit_code = match run() {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            default_error_handler(&error, &mut std::io::stderr().lock());
            1
        }
    };
    process::exit(exit_code);
}
