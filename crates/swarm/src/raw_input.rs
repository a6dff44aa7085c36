//! Keyboard and mouse input, read straight from the user's terminal.

use std::io::Read as _;

use color_eyre::eyre::Result;

/// How many bytes of STDIN are parsed at a time.
const STDIN_CHUNK_SIZE: usize = 128;

/// A single keyboard or mouse event.
#[derive(Debug, Clone)]
pub(crate) struct ParsedInput {
    /// The event as termwiz understood it
    pub event: termwiz::input::InputEvent,
}

/// Turns the bytes arriving on STDIN into `Protocol::Input` messages.
pub(crate) struct RawInput {
    /// Where parsed events are sent.
    protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
}

impl RawInput {
    /// Read STDIN on a dedicated OS thread, reads block and would otherwise stall the runtime.
    /// Any failure, including STDIN closing, ends the whole app.
    pub fn start(
        protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
    ) -> std::thread::JoinHandle<Result<()>> {
        std::thread::spawn(move || -> Result<()> {
            let input = Self {
                protocol_tx: protocol_tx.clone(),
            };
            input.read_until_closed().inspect_err(|error| {
                tracing::debug!("Stopped reading STDIN: {error:?}");
                crate::run::broadcast_protocol_end(&protocol_tx);
            })
        })
    }

    /// Parse chunks of STDIN for as long as it's open. Escape sequences split across chunks are
    /// held by the parser until the rest arrives.
    fn read_until_closed(&self) -> Result<()> {
        tracing::debug!("Reading STDIN");

        let mut stdin = std::io::stdin().lock();
        let mut parser = termwiz::input::InputParser::new();
        let mut buffer = [0; STDIN_CHUNK_SIZE];

        loop {
            let count = stdin.read(&mut buffer)?;
            if count == 0 {
                color_eyre::eyre::bail!("STDIN closed");
            }

            let Some(bytes) = buffer.get(..count) else {
                tracing::warn!("STDIN reported more bytes than fit in its buffer: {count}");
                continue;
            };
            tracing::trace!("STDIN bytes: {bytes:x?}");
            parser.parse(bytes, |event| self.send(event), false);
        }
    }

    /// Forward a parsed event to the rest of the app.
    fn send(&self, event: termwiz::input::InputEvent) {
        tracing::trace!("Input event: {event:?}");

        let message = crate::run::Protocol::Input(ParsedInput { event });
        if let Err(error) = self.protocol_tx.send(message) {
            tracing::error!("Couldn't forward input event: {error:?}");
        }
    }
}
