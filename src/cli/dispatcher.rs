//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

use crate::cli::args::{Cli, Command, SettingsAction, TaskArgs};
use crate::commands;
use crate::commands::apply::ApplyOptions;
use crate::commands::settings::SettingsCommand;
use crate::config::settings::{Effective, Overrides, Settings};
use crate::core::types::{HelperChoice, InvocationRequest};
use crate::error::{AurError, Result};
use crate::ui as output;
use crate::utils::machine_output::OutputFormat;
use crate::utils::{paths, sanitize};

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    match &args.command {
        Some(command) => {
            if args.task.is_set() {
                return Err(AurError::InvalidRequest(
                    "package options cannot be combined with a subcommand".to_string(),
                ));
            }
            dispatch_subcommand(args, command)
        }
        None => {
            let settings = Settings::load()?;
            let effective = settings.effective(&overrides(args), |key| std::env::var(key).ok())?;
            output::init_colors(&effective.color);
            commands::apply::run(apply_options(&args.task, effective)?)
        }
    }
}

fn dispatch_subcommand(args: &Cli, command: &Command) -> Result<()> {
    // settings must stay usable even when the stored file is broken
    output::init_colors(args.global.color.as_deref().unwrap_or("auto"));
    let format = cli_format(args)?;

    match command {
        Command::Helpers => commands::helpers::run(format),
        Command::Settings { action } => commands::settings::run(settings_command(action), format),
        Command::Completions { shell } => commands::completions::run(*shell),
    }
}

fn overrides(args: &Cli) -> Overrides {
    Overrides {
        helper: args.task.helper.clone(),
        timeout: args.task.timeout,
        color: args.global.color.clone(),
        format: args.global.format.clone(),
    }
}

fn cli_format(args: &Cli) -> Result<OutputFormat> {
    args.global
        .format
        .as_deref()
        .map(str::parse::<OutputFormat>)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Turn parsed arguments plus resolved settings into an immutable request.
pub fn apply_options(task: &TaskArgs, effective: Effective) -> Result<ApplyOptions> {
    let request = InvocationRequest {
        packages: task.names.clone(),
        upgrade: task.upgrade,
        state: task.state,
        helper: effective.helper,
        extra_args: sanitize::split_extra_args(&task.extra_args)?,
        aur_only: task.aur_only,
        skip_pgp_check: task.skip_pgp_check,
        ignore_arch: task.ignore_arch,
        local_pkgbuild: task
            .local_pkgbuild
            .as_deref()
            .map(paths::expand_home)
            .transpose()?,
        update_cache: task.update_cache,
    };
    if let HelperChoice::Named(name) = &request.helper {
        output::verbose(&format!("helper requested: {}", name));
    }

    Ok(ApplyOptions {
        request,
        check: task.check,
        timeout: effective.timeout,
        format: effective.format,
    })
}

fn settings_command(action: &SettingsAction) -> SettingsCommand {
    match action {
        SettingsAction::Show => SettingsCommand::Show,
        SettingsAction::Get { key } => SettingsCommand::Get { key: key.clone() },
        SettingsAction::Set { key, value } => SettingsCommand::Set {
            key: key.clone(),
            value: value.clone(),
        },
        SettingsAction::Reset { key } => SettingsCommand::Reset { key: key.clone() },
    }
}
