//! The interactive app: input goes in, frames come out.

use std::collections::VecDeque;

use color_eyre::eyre::Result;
use rand::SeedableRng as _;

use crate::animation::{AnimationLoop, LoopHandle};
use crate::compositor::Compositor;
use crate::config::main::Config;
use crate::input_handler::{Action, InputHandler};
use crate::renderer::Renderer;
use crate::run::Protocol;
use crate::scene::Scene;

/// The backdrop's hue rotates once per frame at this rate, whatever the particle frame rate.
const BACKDROP_FRAME_RATE: u32 = 60;

/// Owns the scene and drives it with two independent animation loops.
pub(crate) struct Playground {
    /// Everything being animated
    scene: Scene,
    /// The current user config
    config: Config,
    /// Turns raw input events into actions.
    input: InputHandler,
    /// Paces the particle simulation.
    particles_loop: AnimationLoop,
    /// Stops the particle simulation.
    particles_handle: LoopHandle,
    /// Paces the backdrop's hue rotation.
    backdrop_loop: AnimationLoop,
    /// Stops the backdrop's hue rotation.
    backdrop_handle: LoopHandle,
    /// When recent frames were rendered, for measuring the frame rate.
    frame_times: VecDeque<tokio::time::Instant>,
}

impl Playground {
    /// Instantiate for a terminal of the given size.
    pub fn new(config: Config, width: u16, height: u16) -> Result<Self> {
        let input = InputHandler::new(config.keybindings_as_events()?);
        let mut scene = Scene::new(
            width,
            height,
            config.pixel_scale,
            rand::rngs::StdRng::from_entropy(),
        );
        scene.resize(width, height, config.initial_particles);

        let (particles_loop, particles_handle) = AnimationLoop::new(config.frame_rate);
        let (backdrop_loop, backdrop_handle) = AnimationLoop::new(BACKDROP_FRAME_RATE);

        Ok(Self {
            scene,
            config,
            input,
            particles_loop,
            particles_handle,
            backdrop_loop,
            backdrop_handle,
            frame_times: VecDeque::new(),
        })
    }

    /// Take over the user's terminal and run until the user quits or the app ends. The terminal
    /// is always restored, even when the loop errors.
    pub async fn start(
        config: Config,
        protocol_rx: tokio::sync::broadcast::Receiver<Protocol>,
    ) -> Result<()> {
        let mut renderer = Renderer::new()?;
        let result = match Self::new(config, renderer.width, renderer.height) {
            Ok(mut playground) => playground.event_loop(&mut renderer, protocol_rx).await,
            Err(error) => Err(error),
        };

        let restore_result = renderer.restore();
        result?;
        restore_result
    }

    /// Interleave frames of both loops with messages from the rest of the app.
    async fn event_loop(
        &mut self,
        renderer: &mut Renderer,
        mut protocol_rx: tokio::sync::broadcast::Receiver<Protocol>,
    ) -> Result<()> {
        tracing::debug!("Starting animation loops");

        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        loop {
            tokio::select! {
                is_running = self.particles_loop.next_frame() => {
                    if !is_running {
                        break;
                    }
                    self.render_frame(renderer)?;
                }
                is_running = self.backdrop_loop.next_frame() => {
                    if !is_running {
                        break;
                    }
                    self.scene.advance_backdrop();
                }
                result = protocol_rx.recv() => {
                    match result {
                        Ok(Protocol::End) | Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            break;
                        }
                        Ok(message) => self.handle_protocol_message(message),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(count)) => {
                            tracing::warn!("Dropped {count} protocol messages");
                        }
                    }
                }
            }
        }

        tracing::debug!("Exited animation loops");
        Ok(())
    }

    /// Handle messages from the global protocol.
    fn handle_protocol_message(&mut self, message: Protocol) {
        match message {
            Protocol::Input(input) => {
                for action in self.input.handle(&input.event) {
                    self.apply(action);
                }
            }
            Protocol::Config(config) => {
                if let Err(error) = self.apply_config(config) {
                    tracing::error!("Couldn't apply new config: {error:?}");
                }
            }
            Protocol::End => (),
        }
    }

    /// Do what the user asked for.
    pub fn apply(&mut self, action: Action) {
        tracing::trace!("Applying action: {action:?}");
        match action {
            Action::SetMode(mode) => self.scene.set_mode(mode),
            Action::Clear => self.scene.clear(),
            Action::Quit => self.stop(),
            Action::PointerMoved { column, row } => {
                self.scene
                    .pointer_moved(column, row, self.config.spawn_on_move);
            }
            Action::PointerClicked { column, row } => {
                self.scene.clicked(column, row, self.config.spawn_on_click);
            }
        }
    }

    /// Use a freshly edited config. The pixel scale is only read on startup.
    pub fn apply_config(&mut self, config: Config) -> Result<()> {
        self.input.set_keybindings(config.keybindings_as_events()?);
        self.particles_loop.set_frame_rate(config.frame_rate);
        self.config = config;
        Ok(())
    }

    /// Stop both loops.
    pub fn stop(&self) {
        tracing::debug!("Stopping animation loops");
        self.particles_handle.stop();
        self.backdrop_handle.stop();
    }

    #[cfg(test)]
    /// Has the app been asked to stop?
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.particles_handle.is_stopped() && self.backdrop_handle.is_stopped()
    }

    /// Step the simulation and send the result to the user's terminal.
    fn render_frame(&mut self, renderer: &mut Renderer) -> Result<()> {
        if let Some((width, height)) = renderer.check_for_resize()? {
            self.scene
                .resize(width, height, self.config.initial_particles);
        }

        let frame = self.frame()?;
        renderer.render(&frame)
    }

    /// Step the simulation and composite it into a terminal frame.
    pub fn frame(&mut self) -> Result<crate::surface::Surface> {
        self.scene.step();
        self.track_frame_time(tokio::time::Instant::now());

        let status = self.config.show_status.then(|| self.status());
        Compositor::compose(
            self.scene.canvas(),
            self.scene.backdrop(),
            status.as_deref(),
        )
    }

    /// Remember when a frame was made, forgetting frames older than a second.
    fn track_frame_time(&mut self, now: tokio::time::Instant) {
        self.frame_times.push_back(now);
        while let Some(oldest) = self.frame_times.front() {
            if now.duration_since(*oldest) <= std::time::Duration::from_secs(1) {
                break;
            }
            self.frame_times.pop_front();
        }
    }

    /// The frames rendered in the last second.
    #[must_use]
    pub fn fps(&self) -> usize {
        self.frame_times.len()
    }

    /// The mode, the number of particles and the frame rate.
    #[must_use]
    pub fn status(&self) -> String {
        format!(
            "{} | {} particles | {} fps",
            self.scene.mode().name(),
            self.scene.field().len(),
            self.fps()
        )
    }

    #[cfg(test)]
    /// Everything being animated.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }
}
