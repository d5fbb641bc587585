use std::process::ExitCode;

fn main() -> ExitCode {
    kihsa_cli::run()
}
