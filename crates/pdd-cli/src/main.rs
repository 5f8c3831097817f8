use pdd_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // log file is unavailable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = cli::run_from_args() {
        eprintln!("pdd error: {:#}", err);
        std::process::exit(1);
    }
}
