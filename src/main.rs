//! BuildTrack Dashboard - CLI entry point
//!
//! This binary launches the terminal dashboard and exposes the layout
//! operations (add, remove, move, resize, settings, flags, reset) as
//! scriptable subcommands acting on the same local storage.

use buildtrack_dashboard::{
    auth::{AuthError, MockAuth, Session},
    config::{default, error::ConfigError, loader::ConfigLoader, schema::Config, xdg},
    i18n::Translator,
    layout::{LayoutError, LayoutManager, Position, WidgetFlags},
    logging,
    tui::app::App,
    widgets::{Settings, WidgetRegistry, WidgetSize, WidgetType},
};
use buildtrack_storage::FileStorage;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// BuildTrack construction dashboard
#[derive(Parser)]
#[command(name = "btd")]
#[command(version, about = "BuildTrack construction dashboard")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/buildtrack-dashboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage file, overriding `storage.path` from the configuration
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Email of the user whose dashboard to use (default: `user.default_email`)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the btd CLI
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui,

    /// List the widget types that can be placed on a dashboard
    Widgets,

    /// List the users of the mock user database
    Users,

    /// Inspect or change the user's dashboard layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `layout` subcommand.
#[derive(Subcommand)]
enum LayoutAction {
    /// Print the placed widgets
    Show {
        /// Print the stored layout document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a widget at the bottom of the layout
    Add {
        /// Widget type, e.g. task_list
        widget_type: WidgetType,
    },
    /// Remove a widget
    Remove {
        /// Widget id, e.g. task_list-2
        id: String,
    },
    /// Move a widget to a grid cell, keeping its size
    Move {
        /// Widget id
        id: String,
        /// Column of the top-left cell
        x: u16,
        /// Row of the top-left cell
        y: u16,
    },
    /// Change a widget's size class
    Resize {
        /// Widget id
        id: String,
        /// small, medium, large or extra_large
        size: WidgetSize,
    },
    /// Merge settings into a widget (`key=value`, values parsed as JSON)
    Set {
        /// Widget id
        id: String,
        /// Settings such as `limit=8` or `project_id=P-200`
        #[arg(required = true, value_parser = parse_setting)]
        settings: Vec<(String, Value)>,
    },
    /// Show or hide a widget, lock or unlock it
    Flags {
        /// Widget id
        id: String,
        /// Whether the widget is drawn outside edit mode
        #[arg(long)]
        visible: Option<bool>,
        /// Whether the widget can be moved or resized
        #[arg(long)]
        locked: Option<bool>,
    },
    /// Replace the layout with the default one
    Reset,
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("no storage path configured and no data directory found; pass --storage")]
    NoStoragePath,

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TUI error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses `key=value`; the value is JSON when it parses as such, else text.
fn parse_setting(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty setting key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { ref action } => run_config_command(action, &cli),
        _ => run(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs every command that needs configuration, storage and a user.
fn run(cli: &Cli) -> Result<(), CliError> {
    let config = ConfigLoader::load(cli.config.as_deref())?;

    let log_file = match cli.command {
        Commands::Tui => Some(config.log_file().unwrap_or_else(xdg::tui_log_path)),
        _ => config.log_file(),
    };
    if let Err(e) = logging::init(config.log.level, log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let path = cli
        .storage
        .clone()
        .or_else(|| config.storage_path())
        .ok_or(CliError::NoStoragePath)?;
    tracing::debug!(path = %path.display(), "using storage");
    let mut storage = FileStorage::new(path);

    match &cli.command {
        Commands::Widgets => {
            print_widgets(&WidgetRegistry::new());
            Ok(())
        }
        Commands::Users => {
            for user in MockAuth::users(&mut storage)? {
                println!(
                    "{:<8} {:<26} {:<16} {}",
                    user.id, user.email, user.role, user.name
                );
            }
            Ok(())
        }
        Commands::Tui => {
            let (manager, session) = open_dashboard(storage, cli, &config)?;
            run_tui(manager, session, &config)
        }
        Commands::Layout { action } => {
            let (mut manager, _) = open_dashboard(storage, cli, &config)?;
            run_layout_command(action, &mut manager)
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// Logs in and loads that user's layout.
fn open_dashboard(
    mut storage: FileStorage,
    cli: &Cli,
    config: &Config,
) -> Result<(LayoutManager<FileStorage>, Session), CliError> {
    let email = cli.user.as_deref().unwrap_or(&config.user.default_email);
    let session = MockAuth::login(&mut storage, email)?;
    let manager = LayoutManager::load(
        storage,
        WidgetRegistry::new(),
        config.grid_bounds(),
        &session.user_id,
    );
    Ok((manager, session))
}

fn run_tui(
    manager: LayoutManager<FileStorage>,
    session: Session,
    config: &Config,
) -> Result<(), CliError> {
    let mut app = App::new(manager, session, Translator::new(config.user.locale));
    app.row_height = config.dashboard.row_height;
    app.tick_rate = config.tick_rate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app.run())?;
    Ok(())
}

fn print_widgets(registry: &WidgetRegistry) {
    for widget_type in registry.available_types() {
        let Some(def) = registry.get(widget_type) else {
            continue;
        };
        let sizes: Vec<&str> = def.available_sizes.iter().map(|s| s.as_str()).collect();
        let settings: Vec<&str> = def.settings_schema.iter().map(|f| f.key).collect();
        println!(
            "{:<20} default {:<12} sizes {:<28} settings {}",
            widget_type,
            def.default_size,
            sizes.join(","),
            settings.join(",")
        );
    }
}

fn run_layout_command(
    action: &LayoutAction,
    manager: &mut LayoutManager<FileStorage>,
) -> Result<(), CliError> {
    match action {
        LayoutAction::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(manager.layout())?);
            } else {
                print_layout(manager);
            }
        }
        LayoutAction::Add { widget_type } => {
            let id = manager.add_widget(*widget_type)?;
            println!("{id}");
        }
        LayoutAction::Remove { id } => {
            manager.remove_widget(id)?;
        }
        LayoutAction::Move { id, x, y } => {
            let current = manager
                .widget(id)
                .ok_or_else(|| LayoutError::WidgetNotFound(id.clone()))?
                .position;
            manager.update_widget_position(id, Position::new(*x, *y, current.w, current.h))?;
        }
        LayoutAction::Resize { id, size } => {
            manager.resize_widget(id, *size)?;
        }
        LayoutAction::Set { id, settings } => {
            let partial: Settings = settings.iter().cloned().collect();
            manager.update_widget_settings(id, partial)?;
        }
        LayoutAction::Flags {
            id,
            visible,
            locked,
        } => {
            let current = manager
                .widget(id)
                .ok_or_else(|| LayoutError::WidgetNotFound(id.clone()))?
                .flags;
            let flags = WidgetFlags {
                visible: visible.unwrap_or(current.visible),
                locked: locked.unwrap_or(current.locked),
            };
            manager.set_widget_flags(id, flags)?;
        }
        LayoutAction::Reset => manager.reset_to_default(),
    }
    Ok(())
}

fn print_layout(manager: &LayoutManager<FileStorage>) {
    let layout = manager.layout();
    if layout.is_empty() {
        println!("(no widgets)");
        return;
    }
    for widget in layout.reading_order() {
        let mut flags = Vec::new();
        if !widget.flags.visible {
            flags.push("hidden");
        }
        if widget.flags.locked {
            flags.push("locked");
        }
        println!(
            "{:<24} {:<20} {:<12} {:<12} {}",
            widget.id,
            widget.widget_type,
            widget.size,
            widget.position.to_string(),
            flags.join(",")
        );
    }
}

fn run_config_command(action: &ConfigAction, cli: &Cli) -> Result<(), CliError> {
    match action {
        ConfigAction::Init { force } => {
            let path = match &cli.config {
                Some(path) => {
                    default::create_default_config_at(path, *force)?;
                    path.clone()
                }
                None => default::create_default_config(*force)?,
            };
            println!("Created configuration at {}", path.display());
        }
        ConfigAction::Path => {
            let path = cli.config.clone().unwrap_or_else(xdg::config_path);
            println!("{}", path.display());
        }
        ConfigAction::Validate => {
            let config = ConfigLoader::load(cli.config.as_deref())?;
            println!("Configuration is valid");
            println!("{config:#?}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_json_values() {
        assert_eq!(
            parse_setting("limit=8"),
            Ok(("limit".to_string(), Value::from(8)))
        );
        assert_eq!(
            parse_setting("show_completed=true"),
            Ok(("show_completed".to_string(), Value::Bool(true)))
        );
    }

    #[test]
    fn test_parse_setting_falls_back_to_text() {
        assert_eq!(
            parse_setting("project_id=P-200"),
            Ok(("project_id".to_string(), Value::from("P-200")))
        );
        assert_eq!(
            parse_setting("location=Site B"),
            Ok(("location".to_string(), Value::from("Site B")))
        );
    }

    #[test]
    fn test_parse_setting_rejects_malformed() {
        assert!(parse_setting("limit").is_err());
        assert!(parse_setting("=5").is_err());
    }

    #[test]
    fn test_cli_parses_layout_move() {
        let cli = Cli::try_parse_from([
            "btd",
            "--user",
            "tom@buildtrack.test",
            "layout",
            "move",
            "task_list-2",
            "3",
            "4",
        ])
        .expect("valid args");
        assert_eq!(cli.user.as_deref(), Some("tom@buildtrack.test"));
        assert!(matches!(
            cli.command,
            Commands::Layout {
                action: LayoutAction::Move { x: 3, y: 4, .. }
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_widget_type() {
        assert!(Cli::try_parse_from(["btd", "layout", "add", "gantt_chart"]).is_err());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
