//! Entry point of the horizon binary.
//!
//! Parses the command line, applies the global options and hands off to the
//! command handlers in [`horizon::commands`]. Errors from a handler end the
//! output with an error line and exit status 1.

use anyhow::Result;
use horizon::args::{self, CliAction, ParsedArgs};
use horizon::commands;
use horizon::config;
use horizon::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use horizon::{log_error_exit, log_warning};

fn run(parsed_args: ParsedArgs) -> Result<i32> {
    let debug_enabled = parsed_args.debug_enabled;

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            return Ok(EXIT_SUCCESS);
        }
        CliAction::Help { command } => {
            commands::help::run_help_command(command.as_deref());
            return Ok(EXIT_SUCCESS);
        }
        CliAction::ShowHelpDueToError => {
            commands::help::show_usage();
            return Ok(EXIT_FAILURE);
        }
        _ => {}
    }

    if let Some(dir) = parsed_args.config_dir.as_deref()
        && !std::path::Path::new(dir).is_dir()
    {
        log_warning!("Configuration directory {dir} does not exist yet, it will be created");
    }
    config::set_config_dir(parsed_args.config_dir)?;

    match parsed_args.action {
        CliAction::Apps { reload } => commands::apps::handle_apps_command(reload, debug_enabled)?,
        CliAction::Favorites(operation) => {
            commands::favorites::handle_favorites_command(operation, debug_enabled)?
        }
        CliAction::Label { id, text } => {
            commands::label::handle_label_command(&id, text.as_deref(), debug_enabled)?
        }
        CliAction::Weather => commands::weather::handle_weather_command(debug_enabled)?,
        CliAction::Sun { date } => commands::sun::handle_sun_command(date.as_deref(), debug_enabled)?,
        CliAction::Dark { value } => commands::dark::handle_dark_command(value, debug_enabled)?,
        CliAction::Monitor { json } => commands::monitor::handle_monitor_command(json, debug_enabled)?,
        CliAction::Simulate {
            start_time,
            end_time,
            multiplier,
            log_to_file,
        } => commands::simulate::handle_simulate_command(
            &start_time,
            &end_time,
            multiplier,
            log_to_file,
            debug_enabled,
        )?,
        CliAction::ShowVersion | CliAction::Help { .. } | CliAction::ShowHelpDueToError => {}
    }

    Ok(EXIT_SUCCESS)
}

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match run(parsed_args) {
        Ok(code) => code,
        Err(e) => {
            horizon::logger::Log::set_enabled(true);
            log_error_exit!("{e:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
