use std::io;

fn main() {
    clockpatience_cli::logging::init_logging();
    let code = clockpatience_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
