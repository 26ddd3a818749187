use std::process::ExitCode;

fn main() -> ExitCode {
    match docsift_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
