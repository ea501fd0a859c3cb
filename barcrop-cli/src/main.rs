// barcrop-cli/src/main.rs
//
// Entry point of the barcrop binary: parses the arguments, installs the
// logger and dispatches to the selected command. Any error returned by a
// command is printed to stderr and turns into exit code 1.

use barcrop_cli::cli::{Cli, Commands};
use barcrop_cli::logging::init_logging;
use barcrop_cli::{run_crop, run_detect};

use clap::Parser;
use owo_colors::OwoColorize;
use std::process;

fn print_fatal(message: &str) {
    if std::env::var_os("NO_COLOR").is_none() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {message}");
    }
}

fn main() {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Crop(args) => args.log_dir.clone(),
        Commands::Detect(_) => None,
    };

    let log_path = match init_logging(cli.verbose, log_dir.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            print_fatal(&e.to_string());
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Crop(args) => run_crop(args, log_path),
        Commands::Detect(args) => run_detect(args),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {:?}", e);
        print_fatal(&e.to_string());
        process::exit(1);
    }
}
