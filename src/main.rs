use std::process::ExitCode;

fn main() -> ExitCode {
    shadow_demo::run()
}
