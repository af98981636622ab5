use clap::Parser;

use folio::cli::{dispatch, Cli};
use folio::error::ExitCode;
use folio::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose);
    }

    match dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
