//! The whole swarm of particles and the rules for growing it.

use glam::Vec2;
use rand::Rng;

use super::mode::SimulationMode;
use super::particle::{Bounds, Particle, SimulationContext};
use crate::canvas::Canvas;

/// All the particles, in draw order. Faded particles are recycled in place, so the collection only
/// ever grows, except when it's cleared or rebuilt after a resize.
#[derive(Debug, Default)]
pub(crate) struct ParticleField {
    /// All the particles
    particles: Vec<Particle>,
    /// Size of the surface the particles live on
    bounds: Bounds,
}

impl ParticleField {
    /// Instantiate an empty field.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            particles: Vec::new(),
            bounds,
        }
    }

    #[cfg(test)]
    /// The size of the surface.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Track a new surface size. Existing particles are left where they are.
    pub const fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    #[cfg(test)]
    /// All the particles, in draw order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    /// Mutable access to all the particles.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[cfg(test)]
    /// Are there no particles at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Set the gravity of every existing particle.
    pub fn set_gravity(&mut self, gravity: f32) {
        for particle in &mut self.particles {
            particle.gravity = gravity;
        }
    }

    /// Add `count` new particles, all starting at the same position.
    pub fn spawn_at(
        &mut self,
        position: Vec2,
        count: usize,
        mode: SimulationMode,
        rng: &mut impl Rng,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::new_at(position, mode, rng));
        }
        tracing::trace!(
            "Spawned {count} particles at {position}, now {} in total",
            self.particles.len()
        );
    }

    /// Replace every particle with `count` fresh ones scattered over the whole surface.
    pub fn initialize(&mut self, count: usize, mode: SimulationMode, rng: &mut impl Rng) {
        let bounds = self.bounds;
        self.particles = (0..count)
            .map(|_| Particle::new_random(bounds, mode, rng))
            .collect();
        tracing::debug!(
            "Initialised {count} particles over {}x{}",
            bounds.width,
            bounds.height
        );
    }

    /// Remove every particle and wipe the canvas.
    pub fn clear(&mut self, canvas: &mut impl Canvas) {
        self.particles.clear();
        canvas.clear();
        tracing::debug!("Cleared all particles");
    }

    /// One frame: wipe the canvas, then update and draw every particle in order.
    pub fn step(
        &mut self,
        canvas: &mut impl Canvas,
        mode: SimulationMode,
        pointer: Option<Vec2>,
        rng: &mut impl Rng,
    ) {
        canvas.clear();

        let context = SimulationContext {
            mode,
            pointer,
            bounds: self.bounds,
        };
        for particle in &mut self.particles {
            *particle = particle.update(&context, rng);
            particle.draw(canvas, mode);
        }
    }
}
