//! The active simulation mode and the only place that changes it.

use super::field::ParticleField;
use super::particle::GRAVITY;

/// How particles currently behave. Exactly one mode is active at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimulationMode {
    /// Particles drift freely along their initial velocity.
    #[default]
    Trails,
    /// Particles accelerate downwards and bounce off the bottom of the surface.
    Gravity,
    /// Particles are pulled towards the pointer and are drawn as squares.
    Attraction,
    /// Particles are pushed away from the pointer.
    Repulsion,
}

impl SimulationMode {
    /// The gravity that a particle created in this mode starts with.
    #[must_use]
    pub const fn particle_gravity(self) -> f32 {
        match self {
            Self::Gravity => GRAVITY,
            Self::Trails | Self::Attraction | Self::Repulsion => 0.0,
        }
    }

    /// A short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trails => "trails",
            Self::Gravity => "gravity",
            Self::Attraction => "attraction",
            Self::Repulsion => "repulsion",
        }
    }
}

/// Owns the active mode.
#[derive(Debug, Default)]
pub(crate) struct ModeController {
    /// The currently active mode.
    mode: SimulationMode,
}

impl ModeController {
    /// The currently active mode.
    #[must_use]
    pub const fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Switch mode. Entering gravity retroactively gives every existing particle gravity, and
    /// leaving gravity takes it away again. Switching between any other modes leaves per-particle
    /// gravity alone.
    pub fn set_mode(&mut self, new_mode: SimulationMode, field: &mut ParticleField) {
        let previous = self.mode;
        self.mode = new_mode;

        if new_mode == SimulationMode::Gravity {
            field.set_gravity(GRAVITY);
        } else if previous == SimulationMode::Gravity {
            field.set_gravity(0.0);
        }

        tracing::debug!(
            "Mode changed from {} to {} ({} particles)",
            previous.name(),
            new_mode.name(),
            field.len()
        );
    }
}
