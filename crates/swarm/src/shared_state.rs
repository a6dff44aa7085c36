//! The little data that needs sharing between the config watcher, the app and `main()`.
//! Access is mediated with locks to support asynchronicity.

use std::sync::Arc;

use tokio::sync::RwLock;

/// All the shared data the app uses
#[non_exhaustive]
pub(crate) struct SharedState {
    /// The channel on which all protocol messages are sent.
    pub protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
    /// Location of the config directory.
    pub config_path: RwLock<std::path::PathBuf>,
    /// Name of the main config file.
    pub main_config_file: RwLock<std::path::PathBuf>,
    /// User config
    pub config: RwLock<crate::config::main::Config>,
    /// Is the application logging?
    pub is_logging: RwLock<bool>,
}

impl SharedState {
    /// Initialise the shared state
    #[must_use]
    pub fn init(protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>) -> Arc<Self> {
        Arc::new(Self {
            protocol_tx,
            config_path: RwLock::default(),
            main_config_file: RwLock::default(),
            config: RwLock::default(),
            is_logging: RwLock::default(),
        })
    }
}
