//! Frame pacing. Each `AnimationLoop` ticks at a target frame rate until its `LoopHandle` is
//! stopped.

use std::sync::Arc;

/// The number of microseconds in a second
pub const ONE_MICROSECOND: u64 = 1_000_000;

/// Paces a sequence of frames.
pub(crate) struct AnimationLoop {
    /// Target frames per second
    frame_rate: u32,
    /// The time at which the previous frame was ticked.
    last_frame_tick: tokio::time::Instant,
    /// Number of frames ticked so far
    frame_count: u64,
    /// Flips to `true` when the loop should stop.
    stop: tokio::sync::watch::Receiver<bool>,
    /// Whether the loop has already seen a stop signal.
    is_stopped: bool,
}

/// Stops an `AnimationLoop` from anywhere. Cheap to clone.
#[derive(Clone)]
pub(crate) struct LoopHandle {
    /// The stop signal
    stop: Arc<tokio::sync::watch::Sender<bool>>,
}

impl LoopHandle {
    /// Stop the loop. Its next call to `next_frame()`, or the one currently waiting, returns
    /// `false`. Stopping more than once is harmless.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    #[cfg(test)]
    /// Has the loop been asked to stop?
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

impl AnimationLoop {
    /// Instantiate a loop and the handle that stops it.
    #[must_use]
    pub fn new(frame_rate: u32) -> (Self, LoopHandle) {
        let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
        let animation = Self {
            frame_rate: frame_rate.max(1),
            last_frame_tick: tokio::time::Instant::now(),
            frame_count: 0,
            stop: stop_rx,
            is_stopped: false,
        };
        let handle = LoopHandle {
            stop: Arc::new(stop_tx),
        };
        (animation, handle)
    }

    /// Change the target frame rate, takes effect from the next frame.
    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        self.frame_rate = frame_rate.max(1);
        tracing::debug!("Frame rate set to {}", self.frame_rate);
    }

    /// The time budget for a single frame.
    #[must_use]
    pub fn frame_duration(&self) -> std::time::Duration {
        let target = ONE_MICROSECOND.wrapping_div(self.frame_rate.into());
        std::time::Duration::from_micros(target)
    }

    #[cfg(test)]
    /// Number of frames ticked so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sleep until the next frame is due. Returns `false` once the loop has been stopped, in
    /// which case no frame should be rendered.
    ///
    /// This is cancel safe, so it can be used in `tokio::select!`.
    pub async fn next_frame(&mut self) -> bool {
        if self.check_stopped() {
            return false;
        }

        if let Some(wait) = self
            .frame_duration()
            .checked_sub(self.last_frame_tick.elapsed())
        {
            #[expect(
                clippy::integer_division_remainder_used,
                reason = "This is caused by the `tokio::select!`"
            )]
            let is_handle_dropped = tokio::select! {
                () = tokio::time::sleep(wait) => false,
                result = self.stop.changed() => result.is_err(),
            };
            if is_handle_dropped {
                self.is_stopped = true;
            }
        }

        if self.check_stopped() {
            return false;
        }

        self.last_frame_tick = tokio::time::Instant::now();
        self.frame_count += 1;
        true
    }

    /// Remember and report whether a stop has been requested.
    fn check_stopped(&mut self) -> bool {
        if !self.is_stopped && *self.stop.borrow() {
            tracing::debug!("Animation loop stopped after {} frames", self.frame_count);
            self.is_stopped = true;
        }
        self.is_stopped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_duration_follows_the_frame_rate() {
        let (animation, _handle) = AnimationLoop::new(50);
        assert_eq!(
            animation.frame_duration(),
            std::time::Duration::from_millis(20)
        );

        let (animation, _handle) = AnimationLoop::new(0);
        assert_eq!(animation.frame_duration(), std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn runs_a_bounded_number_of_frames() {
        let (mut animation, handle) = AnimationLoop::new(1000);
        let mut frames = 0;
        while animation.next_frame().await {
            frames += 1;
            if frames == 5 {
                handle.stop();
            }
        }

        assert_eq!(frames, 5);
        assert_eq!(animation.frame_count(), 5);
        assert!(handle.is_stopped());
        assert!(!animation.next_frame().await);
    }

    #[tokio::test]
    async fn stopping_wakes_a_waiting_loop() {
        let (mut animation, handle) = AnimationLoop::new(1);
        assert!(animation.next_frame().await);

        let stopper = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            stopper.stop();
        });

        let started = std::time::Instant::now();
        assert!(!animation.next_frame().await);
        assert!(started.elapsed() < std::time::Duration::from_millis(900));
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_loop() {
        let (mut animation, handle) = AnimationLoop::new(10);
        drop(handle);
        assert!(!animation.next_frame().await);
    }

    #[tokio::test]
    async fn two_loops_are_independent() {
        let (mut particles, particles_handle) = AnimationLoop::new(1000);
        let (mut backdrop, _backdrop_handle) = AnimationLoop::new(1000);

        particles_handle.stop();

        assert!(!particles.next_frame().await);
        assert!(backdrop.next_frame().await);
    }
}
