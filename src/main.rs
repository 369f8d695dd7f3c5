// Entrypoint for the CLI application.
// - Keeps `main` small: init logging, parse the CLI and dispatch.
// - Failures print to stderr and exit with code 1.

use gistit::cli::CliCommand;
use gistit::logging;

fn main() {
    // Initialize logging as early as possible.
    logging::init();

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("gistit error: {:#}", err);
        std::process::exit(1);
    }
}
