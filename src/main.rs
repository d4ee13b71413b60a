use std::process::ExitCode;

use bookctl::ui::output;

fn main() -> ExitCode {
    match bookctl::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
