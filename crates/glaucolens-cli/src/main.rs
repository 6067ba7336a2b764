//! GLAUCOLens CLI - fundus glaucoma screening web app and tools.

use clap::Parser;
use glaucolens_cli::config::AppConfig;
use glaucolens_cli::logging;

mod commands;
mod output;

use commands::{Cli, Commands, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let config = AppConfig::load();
    let models_dir = cli.models_dir.as_deref();

    let exit_code = match cli.command {
        Commands::Serve(ref args) => match commands::serve::run(args, models_dir, &config) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        Commands::Classify(ref args) => {
            let args = args.clone().with_config(&config);
            match commands::classify::run(&args, models_dir, &config) {
                Ok(result) => result.exit_code,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Commands::Risk(ref args) => match commands::risk::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        Commands::Models(ref args) => match commands::models::run(args, models_dir, &config) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
    };

    exit_code.into()
}
