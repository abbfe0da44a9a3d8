//! kbx - knowledge-base cross-referencing CLI

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = kb_xref::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
