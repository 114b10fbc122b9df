// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (toml, env, flags) --> Logging --> Command Dispatch
//!   Version | Options | Configs | git commands
//! ```

use std::io::Write;
use std::process::ExitCode;

use gitrun::cli::global::GlobalOptions;
use gitrun::cli::{self, Command};
use gitrun::cmd::config::{run_configs_command, run_options_command};
use gitrun::cmd::git::{build_runner, run_git_command};
use gitrun::config::Config;
use gitrun::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };
    if matches!(command, Command::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.log.to_log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(command, &cli.global, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch_command(
    command: &Command,
    global: &GlobalOptions,
    config: &Config,
) -> gitrun::error::Result<()> {
    match command {
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::Configs => {
            let loader = global.config_loader()?;
            run_configs_command(&loader.format_loaded_files());
            Ok(())
        }
        command => {
            let git = build_runner(config, global);
            let mut stdout = std::io::stdout().lock();
            run_git_command(command, &git, &mut stdout).await?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn load_config(global: &GlobalOptions) -> gitrun::error::Result<Config> {
    global.config_loader()?.build()
}
