//! `horizon help`: general and per-command help.

/// Show general help, or detailed help for `command`.
pub fn run_help_command(command: Option<&str>) {
    match command {
        None => display_general_help(),
        Some(command) => match command_help(command) {
            Some((usage, details)) => {
                log_version!();
                log_block_start!("Usage: {usage}");
                for line in details {
                    log_indented!("{line}");
                }
                log_end!();
            }
            None => {
                log_warning!("Unknown command: {command}");
                display_general_help();
            }
        },
    }
}

/// Brief usage shown after invalid arguments.
pub fn show_usage() {
    log_block_start!("Usage: horizon [OPTIONS] <COMMAND>");
    log_indented!("Run 'horizon help' for the list of commands");
    log_end!();
}

/// Command name, usage line and details.
const COMMAND_HELP: &[(&str, &str, &[&str])] = &[
    (
        "apps",
        "horizon apps [--reload]",
        &[
            "List installed applications with their label overrides.",
            "--reload  Rebuild the list instead of using the cached one",
        ],
    ),
    (
        "favorites",
        "horizon favorites [add <id> | remove <id> | move <id> <position>]",
        &[
            "Show or edit the favorites. Ids have the form package/activity,",
            "as printed by 'horizon apps'. Positions start at 1.",
            "Uninstalled favorites are removed when the list is shown.",
        ],
    ),
    (
        "label",
        "horizon label <id> [text]",
        &[
            "Show <id> as [text] instead of its own name.",
            "Without text the override is removed.",
        ],
    ),
    (
        "weather",
        "horizon weather",
        &[
            "Current weather at the configured location.",
            "Readings are reused for weather_freshness minutes.",
        ],
    ),
    (
        "sun",
        "horizon sun [--date YYYY-MM-DD]",
        &["Sunrise and sunset at the configured location."],
    ),
    (
        "dark",
        "horizon dark [on|off]",
        &[
            "Show whether dark mode is active now.",
            "With on/off, store the manual value in horizon.toml.",
        ],
    ),
    (
        "monitor",
        "horizon monitor [--json]",
        &[
            "Report dark-mode transitions until interrupted.",
            "--json  Print each transition as a JSON object",
            "Configuration changes are applied while running.",
        ],
    ),
    (
        "simulate",
        "horizon simulate <start> <end> [multiplier] [--log]",
        &[
            "Run the monitor with simulated time.",
            "<start>, <end>  \"YYYY-MM-DD HH:MM:SS\"",
            "[multiplier]    Speed-up factor (default 3600), 0 or 'fast' to skip waits",
            "--log           Write the output to a file",
        ],
    ),
    (
        "help",
        "horizon help [command]",
        &["Show help for a command."],
    ),
];

fn command_help(command: &str) -> Option<(&'static str, &'static [&'static str])> {
    COMMAND_HELP
        .iter()
        .find(|(name, _, _)| *name == command)
        .map(|(_, usage, details)| (*usage, *details))
}

fn display_general_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("horizon [OPTIONS] <COMMAND>");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>  Use custom configuration directory");
    log_indented!("-d, --debug         Enable detailed debug output");
    log_indented!("-h, --help          Print help information");
    log_indented!("-V, --version       Print version information");
    log_block_start!("Commands:");
    log_indented!("apps                List installed applications");
    log_indented!("favorites           Show or edit favorites");
    log_indented!("label <id> [text]   Set or clear a label override");
    log_indented!("weather             Current weather");
    log_indented!("sun                 Sunrise and sunset times");
    log_indented!("dark [on|off]       Show or set dark mode");
    log_indented!("monitor             Report dark-mode transitions");
    log_indented!("simulate            Run the monitor with simulated time");
    log_indented!("help [command]      Detailed help for a command");
    log_end!();
}
