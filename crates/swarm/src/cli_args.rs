//! All the CLI arguments for Swarm

/// The name of the main config file when none is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "swarm.toml";

/// Interactive particles in your terminal. Move the mouse to spawn particles, click for a burst.
#[derive(clap::Parser, Debug, Clone)]
#[command(version, about)]
#[non_exhaustive]
pub(crate) struct CliArgs {
    /// Use a custom config directory. Defaults to your system's standard config directory.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// The name of the main config file inside the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// Override the log level from the config.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Override the log path from the config.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}
