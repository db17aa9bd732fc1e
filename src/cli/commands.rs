//! Command dispatch and implementations

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::batch::run_batch;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::driver::CollectionRequest;
use crate::processor::PreflightProcessor;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        // No subcommand: preflight the whole configured batch, like the
        // original unconditional six-collection run.
        None => check(&settings, &[]),
        Some(Commands::Check { names }) => check(&settings, names),
        Some(Commands::List) => list(&settings),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_show(&settings),
            ConfigCommands::Init { global } => config_init(*global),
        },
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
    }
}

/// Run the driver pipeline over the selected collections with the
/// preflight engine. Every collection is attempted; the exit status
/// reflects whether all of them passed.
#[instrument(skip(settings))]
fn check(settings: &Settings, names: &[String]) -> CliResult<()> {
    let requests = select_requests(settings, names)?;
    let options = settings.driver_options()?;
    debug!(collections = requests.len(), "starting preflight batch");

    let create_output_dir = settings.create_output_dir;
    let summary = run_batch(
        || PreflightProcessor::new().create_output_dir(create_output_dir),
        &requests,
        &options,
    );

    for request in &requests {
        if summary.succeeded_for(&request.name) {
            output::success(&request.name);
        } else {
            output::failure(&request.name);
        }
    }

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            failed: summary.failed.len(),
            total: summary.total(),
        })
    }
}

fn select_requests(settings: &Settings, names: &[String]) -> CliResult<Vec<CollectionRequest>> {
    let all = settings.requests()?;
    if names.is_empty() {
        return Ok(all);
    }
    names
        .iter()
        .map(|name| {
            all.iter()
                .find(|r| &r.name == name)
                .cloned()
                .ok_or_else(|| CliError::UnknownCollection(name.clone()))
        })
        .collect()
}

#[instrument(skip(settings))]
fn list(settings: &Settings) -> CliResult<()> {
    let requests = settings.requests()?;
    output::header("configured collections");
    for request in &requests {
        output::detail(&format!(
            "{:10} {} -> {}",
            request.name,
            request.main_file.display(),
            request.output_file().display()
        ));
    }
    Ok(())
}

fn config_show(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

#[instrument]
fn config_init(global: bool) -> CliResult<()> {
    let path = if global {
        config::global_config_path().ok_or(CliError::NoConfigDir)?
    } else {
        PathBuf::from(config::LOCAL_CONFIG_FILE)
    };
    if path.exists() {
        return Err(CliError::ConfigExists(path));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CliError::Io {
                context: format!("create {}", parent.display()),
                source,
            })?;
        }
    }
    fs::write(&path, Settings::template()).map_err(|source| CliError::Io {
        context: format!("write {}", path.display()),
        source,
    })?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
