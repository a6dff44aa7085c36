//! Main entrypoint for running Swarm

use std::sync::Arc;

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::CliArgs;
use crate::raw_input::RawInput;
use crate::shared_state::SharedState;

/// How many protocol messages can be queued before slow receivers start missing them. Mouse
/// movement generates a lot of input.
pub const PROTOCOL_CAPACITY: usize = 1024;

/// Commands to control the various tasks/threads
#[derive(Clone, Debug)]
pub(crate) enum Protocol {
    /// The entire application is exiting.
    End,
    /// Parsed input from STDIN.
    Input(crate::raw_input::ParsedInput),
    /// Swarm's configuration, sent whenever it's edited.
    Config(crate::config::main::Config),
}

/// Main entrypoint
pub(crate) async fn run(state: &Arc<SharedState>) -> Result<()> {
    let protocol_tx = state.protocol_tx.clone();
    setup(state).await?;

    let protocol_rx = protocol_tx.subscribe();
    let config_handle = crate::config::main::Config::watch(Arc::clone(state));
    let input_thread_handle = RawInput::start(protocol_tx.clone());

    let config = state.config.read().await.clone();
    let result = crate::playground::Playground::start(config, protocol_rx).await;
    tracing::debug!("Left the playground, exiting Swarm...");
    broadcast_protocol_end(&protocol_tx);

    if input_thread_handle.is_finished() {
        // The STDIN loop doesn't listen to the protocol, so it can't exit its loop. Therefore we
        // should only join it if it finished because of its own error.
        input_thread_handle
            .join()
            .map_err(|err| color_eyre::eyre::eyre!("STDIN handle: {err:?}"))??;
    }
    config_handle.await??;

    tracing::trace!("Leaving Swarm's main `run()` function");
    result
}

/// Signal all task/thread loops to exit.
///
/// We keep it in its own function because we need to handle the error separately. If the error
/// were to be bubbled with `?` as usual, there's a chance it would never be logged, because the
/// protocol end signal is itself what allows the central error handler to even be reached.
pub(crate) fn broadcast_protocol_end(protocol_tx: &tokio::sync::broadcast::Sender<Protocol>) {
    tracing::debug!("Broadcasting the protocol `End` message to all listeners");
    let result = protocol_tx.send(Protocol::End);
    if let Err(error) = result {
        tracing::error!("{error:?}");
    }
}

/// Prepare the application to start.
async fn setup(state: &Arc<SharedState>) -> Result<()> {
    let cli_args = CliArgs::parse();

    let mut main_config_file = state.main_config_file.write().await;
    (*main_config_file).clone_from(&cli_args.main_config);
    drop(main_config_file);

    let directory_result =
        crate::config::main::Config::setup_directory(cli_args.config_dir.clone(), state).await;
    if let Err(directory_error) = directory_result {
        color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
    }

    let config_result = crate::config::main::Config::load_config_into_shared_state(state).await;
    if let Err(config_error) = config_result {
        let path = crate::config::main::Config::main_config_path(state).await;
        color_eyre::eyre::bail!(
            "Bad config file: {config_error:?}\n\nConfig path: {}",
            path.display()
        );
    }

    setup_logging(cli_args, state).await?;

    // Everything we draw is true colour. The vast majority of terminals support it anyway.
    std::env::set_var("COLORTERM", "truecolor");

    tracing::info!("Starting Swarm");
    tracing::debug!("Loaded config: {:?}", state.config.read().await);

    Ok(())
}

/// Setup logging
async fn setup_logging(cli_args: CliArgs, state: &Arc<SharedState>) -> Result<()> {
    let are_log_filters_manually_set = std::env::var("SWARM_LOG").is_ok();
    let mut path = state.config.read().await.log_path.clone();

    if let Some(cli_override_path) = cli_args.log_path {
        path = cli_override_path;
    }

    let mut level = state.config.read().await.log_level.clone();
    if let Some(cli_override_level) = cli_args.log_level {
        level = cli_override_level;
    }
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable =
        !matches!(level, crate::config::main::LogLevel::Off) || are_log_filters_manually_set;

    if !is_loggable {
        return Ok(());
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(path.clone())?;

    let filters = if are_log_filters_manually_set {
        if let Ok(user_filters) = std::env::var("SWARM_LOG") {
            std::env::set_var("RUST_LOG", user_filters);
        }

        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("swarm={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    state.config.write().await.log_path = path;
    *state.is_logging.write().await = true;

    Ok(())
}
