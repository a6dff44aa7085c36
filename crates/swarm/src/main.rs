//! Just `main()`. Keep as small as possible.

pub mod animation;
pub mod backdrop;
pub mod canvas;
pub mod cli_args;
pub mod compositor;
/// All the user-configurable settings.
pub mod config {
    pub mod input;
    pub mod main;
}
pub mod input_handler;
pub mod playground;
pub mod raw_input;
pub mod renderer;
pub mod run;
pub mod scene;
pub mod shared_state;
/// The particles themselves. Nothing in here knows about terminals.
pub mod simulation {
    pub mod field;
    pub mod mode;
    pub mod particle;
    pub mod swatch;
}
pub mod surface;

use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let (protocol_tx, _) = tokio::sync::broadcast::channel(run::PROTOCOL_CAPACITY);
    let state = shared_state::SharedState::init(protocol_tx);
    let result = run::run(&state).await;

    let logpath = state.config.read().await.log_path.clone();
    let is_logging = *state.is_logging.read().await;
    tracing::debug!("Swarm is exiting");

    match result {
        Ok(()) => {
            if is_logging {
                println!("Logs saved to {}", logpath.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error}");
            if is_logging {
                eprintln!("See {} for more details", logpath.display());
            }
            #[expect(clippy::exit, reason = "Errors should be visible to scripts")]
            std::process::exit(1);
        }
    }

    Ok(())
}
