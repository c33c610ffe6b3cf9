// src/bin/socindex.rs
use clap::Parser;
use colored::Colorize;
use socindex_core::cli::{self, Cli, Commands};
use socindex_core::exit::SocIndexExit;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> SocIndexExit {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Some(Commands::Calculate(args)) if args.verbose);
    init_logging(verbose);

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(SocIndexExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            SocIndexExit::for_error(&e)
        }
    }
}
