//! Command-line argument parsing.
//!
//! Global options (`--debug`, `--config <dir>`, `--help`, `--version`) may appear
//! anywhere on the command line. The first positional argument selects the
//! command, the remaining positionals and `--flags` belong to it.

/// Change requested by `horizon favorites`.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesOperation {
    List,
    Add(String),
    Remove(String),
    Move { id: String, position: usize },
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// List the application catalog
    Apps { reload: bool },
    Favorites(FavoritesOperation),
    /// Set or clear (`text: None`) a label override
    Label { id: String, text: Option<String> },
    Weather,
    /// Sunrise/sunset for today or `date` (YYYY-MM-DD)
    Sun { date: Option<String> },
    /// Report the dark-mode decision, or persist a manual value
    Dark { value: Option<bool> },
    Monitor { json: bool },
    /// Run the monitor against a simulated clock. `multiplier` 0.0 is fast-forward.
    Simulate {
        start_time: String,
        end_time: String,
        multiplier: f64,
        log_to_file: bool,
    },
    /// General help, or help for one command
    Help { command: Option<String> },
    ShowVersion,
    /// Invalid arguments; a warning has already been printed
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
#[derive(Debug, PartialEq)]
pub struct ParsedArgs {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    pub action: CliAction,
}

const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;

impl ParsedArgs {
    /// Parse command-line arguments, including the program name in first position.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut display_help = false;
        let mut display_version = false;
        let mut invalid = false;
        let mut date: Option<String> = None;
        let mut flags: Vec<String> = Vec::new();
        let mut positionals: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();
            match arg {
                "--debug" | "-d" => debug_enabled = true,
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--config" | "-c" => {
                    if let Some(dir) = args_vec.get(i + 1).filter(|next| !next.starts_with('-')) {
                        config_dir = Some(dir.clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        invalid = true;
                    }
                }
                "--date" => {
                    if let Some(value) = args_vec.get(i + 1) {
                        date = Some(value.clone());
                        i += 1;
                    } else {
                        log_warning!("Missing value for --date. Usage: --date YYYY-MM-DD");
                        invalid = true;
                    }
                }
                _ if arg.starts_with('-') && arg.len() > 1 => flags.push(arg.to_string()),
                _ => positionals.push(arg.to_string()),
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::Help {
                command: positionals.first().cloned(),
            }
        } else if invalid {
            CliAction::ShowHelpDueToError
        } else {
            match parse_command(&positionals, &flags, date) {
                Ok(action) => action,
                Err(message) => {
                    log_warning!("{}", message);
                    CliAction::ShowHelpDueToError
                }
            }
        };

        ParsedArgs {
            debug_enabled,
            config_dir,
            action,
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn parse_command(
    positionals: &[String],
    flags: &[String],
    date: Option<String>,
) -> Result<CliAction, String> {
    let Some((command, rest)) = positionals.split_first() else {
        return Ok(CliAction::Help { command: None });
    };

    let allowed: &[&str] = match command.as_str() {
        "apps" => &["--reload"],
        "monitor" => &["--json"],
        "simulate" => &["--log"],
        _ => &[],
    };
    if let Some(flag) = flags.iter().find(|flag| !allowed.contains(&flag.as_str())) {
        return Err(format!("Unknown option for '{command}': {flag}"));
    }
    if date.is_some() && command != "sun" {
        return Err(format!("--date is only valid for 'sun', not '{command}'"));
    }

    let has_flag = |name: &str| flags.iter().any(|flag| flag == name);
    let no_arguments = |action: CliAction| {
        if rest.is_empty() {
            Ok(action)
        } else {
            Err(format!("'{command}' takes no arguments"))
        }
    };

    match command.as_str() {
        "apps" => no_arguments(CliAction::Apps {
            reload: has_flag("--reload"),
        }),
        "favorites" => parse_favorites(rest).map(CliAction::Favorites),
        "label" => match rest {
            [id] => Ok(CliAction::Label {
                id: id.clone(),
                text: None,
            }),
            [id, words @ ..] => Ok(CliAction::Label {
                id: id.clone(),
                text: Some(words.join(" ")),
            }),
            [] => Err("Missing application. Usage: horizon label <package/activity> [text]".into()),
        },
        "weather" => no_arguments(CliAction::Weather),
        "sun" => no_arguments(CliAction::Sun { date }),
        "dark" => match rest {
            [] => Ok(CliAction::Dark { value: None }),
            [value] => match value.as_str() {
                "on" | "true" => Ok(CliAction::Dark { value: Some(true) }),
                "off" | "false" => Ok(CliAction::Dark { value: Some(false) }),
                other => Err(format!("Invalid dark mode value '{other}'. Use 'on' or 'off'")),
            },
            _ => Err("Too many arguments. Usage: horizon dark [on|off]".into()),
        },
        "monitor" => no_arguments(CliAction::Monitor {
            json: has_flag("--json"),
        }),
        "simulate" => parse_simulate(rest, has_flag("--log")),
        "help" => match rest {
            [] => Ok(CliAction::Help { command: None }),
            [topic] => Ok(CliAction::Help {
                command: Some(topic.clone()),
            }),
            _ => Err("Usage: horizon help [command]".into()),
        },
        other => Err(format!("Unknown command: {other}")),
    }
}

fn parse_favorites(rest: &[String]) -> Result<FavoritesOperation, String> {
    match rest {
        [] => Ok(FavoritesOperation::List),
        [op, id] if op == "add" => Ok(FavoritesOperation::Add(id.clone())),
        [op, id] if op == "remove" => Ok(FavoritesOperation::Remove(id.clone())),
        [op, id, position] if op == "move" => {
            let position = position
                .parse::<usize>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| format!("Invalid position '{position}'. Positions start at 1"))?;
            Ok(FavoritesOperation::Move {
                id: id.clone(),
                position: position - 1,
            })
        }
        _ => Err(
            "Usage: horizon favorites [add <id> | remove <id> | move <id> <position>]".into(),
        ),
    }
}

fn parse_simulate(rest: &[String], log_to_file: bool) -> Result<CliAction, String> {
    let (start_time, end_time, multiplier) = match rest {
        [start, end] => (start, end, DEFAULT_SIMULATION_MULTIPLIER),
        [start, end, multiplier] => {
            let multiplier = match multiplier.as_str() {
                "fast" | "ff" => 0.0,
                value => value
                    .parse::<f64>()
                    .ok()
                    .filter(|m| m.is_finite() && *m >= 0.0)
                    .ok_or_else(|| format!("Invalid multiplier '{value}'"))?,
            };
            (start, end, multiplier)
        }
        _ => {
            return Err(
                "Usage: horizon simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier]"
                    .into(),
            );
        }
    };

    Ok(CliAction::Simulate {
        start_time: start_time.clone(),
        end_time: end_time.clone(),
        multiplier,
        log_to_file,
    })
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}
