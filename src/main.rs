use image_position_finder::args::{Args, Command, print_help};
use std::process::ExitCode;

fn main() -> ExitCode {
    let command = match Args::parse() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("❌ {}", e);
            if e.is_usage() {
                eprintln!();
                print_help();
            }
            return ExitCode::FAILURE;
        }
    };

    let args = match command {
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("Image Position Finder v{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Command::Run(args) => args,
    };

    init_logging(args.debug_mode);
    log::info!(
        "🚀 Searching {:?} for {:?} (tolerance {})",
        args.haystack,
        args.needle,
        args.config.tolerance
    );

    match image_position_finder::run(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level
fn init_logging(debug_mode: bool) {
    let default_level = if debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
