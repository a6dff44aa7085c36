//! A single particle: how it moves, pulses, fades and gets recycled.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::mode::SimulationMode;
use super::swatch::Swatch;
use crate::canvas::Canvas;

/// Downwards acceleration per frame whilst in gravity mode.
pub const GRAVITY: f32 = 0.2;
/// Multiplier for the vertical velocity when bouncing off the floor.
const BOUNCE_DAMPING: f32 = -0.8;
/// How much opacity is lost every frame.
pub const FADE_PER_FRAME: f32 = 0.005;
/// How far the pulsation phase advances every frame.
pub const PULSE_STEP: f32 = 0.05;
/// How much the size grows and shrinks around its original size.
pub const PULSE_AMPLITUDE: f32 = 2.0;
/// Smallest size of a fresh particle.
pub const MIN_SIZE: f32 = 2.0;
/// Largest size of a fresh particle (exclusive).
pub const MAX_SIZE: f32 = 12.0;
/// Largest speed of a fresh particle on either axis.
const MAX_SPEED: f32 = 2.0;
/// The distance at which the pointer force has its nominal strength.
const FORCE_FALLOFF: f32 = 100.0;
/// Nominal strength of the pull towards the pointer.
const ATTRACTION_STRENGTH: f32 = 1.0;
/// Nominal strength of the push away from the pointer.
const REPULSION_STRENGTH: f32 = 100.0;
/// Scales forces down to a per-frame change in velocity.
const FORCE_TO_VELOCITY: f32 = 0.01;

/// The size of the drawing surface, in simulation units.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    /// Width of the surface
    pub width: f32,
    /// Height of the surface
    pub height: f32,
}

impl Bounds {
    /// Instantiate
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A uniformly random point inside the bounds.
    pub fn random_point(self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            random_up_to(self.width, rng),
            random_up_to(self.height, rng),
        )
    }
}

/// A random number in `[0, max)`, or just 0 for an empty range.
fn random_up_to(max: f32, rng: &mut impl Rng) -> f32 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}

/// Everything outside of a particle that affects how it updates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulationContext {
    /// The active mode
    pub mode: SimulationMode,
    /// The last known pointer position, if the pointer has ever moved.
    pub pointer: Option<Vec2>,
    /// The size of the surface
    pub bounds: Bounds,
}

/// A single particle in the swarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Particle {
    /// Centre of the particle
    pub position: Vec2,
    /// Change in position per frame
    pub velocity: Vec2,
    /// The current, pulsating size. Radius for circles, side length for squares.
    pub size: f32,
    /// The size that pulsation oscillates around.
    pub original_size: f32,
    /// Colour from the fixed palette
    pub colour: Swatch,
    /// From 1 (opaque) down to 0, at which point the particle is recycled.
    pub opacity: f32,
    /// Downwards acceleration, only used in gravity mode.
    pub gravity: f32,
    /// Radians, drives the pulsation.
    pub phase: f32,
}

impl Particle {
    /// A fresh particle at the given position with random size, colour, velocity and phase.
    pub fn new_at(position: Vec2, mode: SimulationMode, rng: &mut impl Rng) -> Self {
        let size = rng.gen_range(MIN_SIZE..MAX_SIZE);
        Self {
            position,
            velocity: random_velocity(rng),
            size,
            original_size: size,
            colour: rng.gen(),
            opacity: 1.0,
            gravity: mode.particle_gravity(),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    /// A fresh particle somewhere random inside the bounds.
    pub fn new_random(bounds: Bounds, mode: SimulationMode, rng: &mut impl Rng) -> Self {
        let position = bounds.random_point(rng);
        Self::new_at(position, mode, rng)
    }

    /// Advance the particle by one frame.
    ///
    /// The only randomness is in recycling a fully faded particle, hence the `rng`.
    #[must_use]
    pub fn update(mut self, context: &SimulationContext, rng: &mut impl Rng) -> Self {
        self.position += self.velocity;

        match context.mode {
            SimulationMode::Gravity => {
                self.velocity.y += self.gravity;
                let floor = context.bounds.height;
                if self.position.y + self.size > floor {
                    self.velocity.y *= BOUNCE_DAMPING;
                    self.position.y = floor - self.size;
                }
            }
            SimulationMode::Attraction => {
                if let Some(pointer) = context.pointer {
                    self.apply_force(pointer - self.position, ATTRACTION_STRENGTH);
                }
            }
            SimulationMode::Repulsion => {
                if let Some(pointer) = context.pointer {
                    self.apply_force(self.position - pointer, REPULSION_STRENGTH);
                }
            }
            SimulationMode::Trails => (),
        }

        self.size = self.original_size + self.phase.sin() * PULSE_AMPLITUDE;
        self.phase += PULSE_STEP;

        self.opacity -= FADE_PER_FRAME;
        if self.opacity <= 0.0 {
            self.reset(context.pointer, context.bounds, rng);
        }

        self
    }

    /// Push the particle along `direction`. The force gets stronger the closer the particle is to
    /// the pointer. A particle exactly on the pointer has no direction to go in, so nothing
    /// happens.
    fn apply_force(&mut self, direction: Vec2, strength: f32) {
        let distance = direction.length();
        if distance <= 0.0 {
            return;
        }

        let force = strength / (distance / FORCE_FALLOFF);
        self.velocity += direction * force * FORCE_TO_VELOCITY;
    }

    /// Bring a faded particle back to life, preferably at the pointer. Gravity is deliberately
    /// untouched, it's owned by the mode controller.
    pub fn reset(&mut self, pointer: Option<Vec2>, bounds: Bounds, rng: &mut impl Rng) {
        self.position = match pointer {
            Some(position) => position,
            None => bounds.random_point(rng),
        };
        let size = rng.gen_range(MIN_SIZE..MAX_SIZE);
        self.size = size;
        self.original_size = size;
        self.colour = rng.gen();
        self.velocity = random_velocity(rng);
        self.opacity = 1.0;
        self.phase = rng.gen_range(0.0..TAU);
    }

    /// Draw the particle: a square in attraction mode, a circle otherwise.
    pub fn draw(&self, canvas: &mut impl Canvas, mode: SimulationMode) {
        let colour = self.colour.with_opacity(self.opacity);
        if mode == SimulationMode::Attraction {
            canvas.fill_square(self.position, self.size, colour);
        } else {
            canvas.fill_circle(self.position, self.size, colour);
        }
    }
}

/// A velocity in `[-2, 2)` on each axis.
fn random_velocity(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(-MAX_SPEED..MAX_SPEED),
        rng.gen_range(-MAX_SPEED..MAX_SPEED),
    )
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "Tests check exact arithmetic on purpose")]
pub(crate) mod test {
    use rand::SeedableRng as _;

    use super::*;

    /// A canvas that just remembers what it was asked to draw.
    #[derive(Default)]
    pub(crate) struct RecordingCanvas {
        /// How many times the canvas was cleared
        pub clears: usize,
        /// Every shape drawn, in order
        pub shapes: Vec<(&'static str, Vec2, f32)>,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self) {
            self.clears += 1;
            self.shapes.clear();
        }

        fn fill_circle(&mut self, centre: Vec2, radius: f32, _colour: crate::surface::Colour) {
            self.shapes.push(("circle", centre, radius));
        }

        fn fill_square(&mut self, centre: Vec2, side: f32, _colour: crate::surface::Colour) {
            self.shapes.push(("square", centre, side));
        }
    }

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    fn context(mode: SimulationMode, pointer: Option<Vec2>) -> SimulationContext {
        SimulationContext {
            mode,
            pointer,
            bounds: Bounds::new(800.0, 600.0),
        }
    }

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: 5.0,
            original_size: 5.0,
            colour: Swatch::Sky,
            opacity: 1.0,
            gravity: 0.0,
            phase: 0.0,
        }
    }

    #[test]
    fn fresh_particles_are_within_their_ranges() {
        let mut rng = rng();
        for _ in 0..200 {
            let particle = Particle::new_random(
                Bounds::new(100.0, 50.0),
                SimulationMode::Trails,
                &mut rng,
            );
            assert!((0.0..100.0).contains(&particle.position.x));
            assert!((0.0..50.0).contains(&particle.position.y));
            assert!((MIN_SIZE..MAX_SIZE).contains(&particle.size));
            assert_eq!(particle.size, particle.original_size);
            assert!((-2.0..2.0).contains(&particle.velocity.x));
            assert!((-2.0..2.0).contains(&particle.velocity.y));
            assert!((0.0..TAU).contains(&particle.phase));
            assert_eq!(particle.opacity, 1.0);
            assert_eq!(particle.gravity, 0.0);
        }
    }

    #[test]
    fn moves_by_its_velocity() {
        let mut particle = still_particle(10.0, 10.0);
        particle.velocity = Vec2::new(1.5, -0.5);
        let particle = particle.update(&context(SimulationMode::Trails, None), &mut rng());
        assert_eq!(particle.position, Vec2::new(11.5, 9.5));
    }

    #[test]
    fn opacity_fades_by_a_fixed_amount_every_frame() {
        let mut rng = rng();
        let context = context(SimulationMode::Trails, None);
        let mut particle = Particle::new_at(Vec2::new(5.0, 5.0), SimulationMode::Trails, &mut rng);

        let mut previous = particle.opacity;
        for _ in 0..150 {
            particle = particle.update(&context, &mut rng);
            assert_eq!(particle.opacity, previous - FADE_PER_FRAME);
            previous = particle.opacity;
        }
    }

    #[test]
    fn size_always_follows_the_pulsation() {
        let mut rng = rng();
        let context = context(SimulationMode::Trails, None);
        let mut particle = Particle::new_at(Vec2::new(5.0, 5.0), SimulationMode::Trails, &mut rng);

        for _ in 0..190 {
            let phase_before = particle.phase;
            let original_size = particle.original_size;
            particle = particle.update(&context, &mut rng);
            if particle.opacity < 1.0 {
                assert_eq!(
                    particle.size,
                    original_size + phase_before.sin() * PULSE_AMPLITUDE
                );
                assert_eq!(particle.phase, phase_before + PULSE_STEP);
            }
            assert!(particle.size >= particle.original_size - PULSE_AMPLITUDE);
            assert!(particle.size <= particle.original_size + PULSE_AMPLITUDE);
        }
    }

    #[test]
    fn fully_faded_particles_are_reset_at_the_pointer() {
        let mut particle = still_particle(10.0, 10.0);
        particle.opacity = FADE_PER_FRAME;
        particle.gravity = GRAVITY;
        let pointer = Vec2::new(321.0, 123.0);

        let particle = particle.update(&context(SimulationMode::Trails, Some(pointer)), &mut rng());

        assert_eq!(particle.opacity, 1.0);
        assert_eq!(particle.position, pointer);
        assert_eq!(particle.size, particle.original_size);
        assert_eq!(particle.gravity, GRAVITY);
    }

    #[test]
    fn reset_without_a_pointer_lands_inside_the_bounds() {
        let mut rng = rng();
        let mut particle = still_particle(-500.0, -500.0);
        particle.opacity = 0.0;
        particle.reset(None, Bounds::new(80.0, 40.0), &mut rng);
        assert!((0.0..80.0).contains(&particle.position.x));
        assert!((0.0..40.0).contains(&particle.position.y));
        assert_eq!(particle.opacity, 1.0);
    }

    #[test]
    fn gravity_accelerates_downwards() {
        let mut particle = still_particle(10.0, 10.0);
        particle.gravity = GRAVITY;
        let particle = particle.update(&context(SimulationMode::Gravity, None), &mut rng());
        assert_eq!(particle.velocity.y, GRAVITY);
    }

    #[test]
    fn gravity_is_ignored_outside_of_gravity_mode() {
        let mut particle = still_particle(10.0, 10.0);
        particle.gravity = GRAVITY;
        let particle = particle.update(&context(SimulationMode::Trails, None), &mut rng());
        assert_eq!(particle.velocity.y, 0.0);
    }

    #[test]
    fn bounces_off_the_floor_in_gravity_mode() {
        let mut particle = still_particle(10.0, 597.0);
        particle.velocity = Vec2::new(0.0, 3.0);
        particle.gravity = GRAVITY;

        let particle = particle.update(&context(SimulationMode::Gravity, None), &mut rng());

        assert_eq!(particle.velocity.y, (3.0 + GRAVITY) * -0.8);
        assert!(particle.velocity.y < 0.0);
        // The clamp uses the size from before this frame's pulsation.
        assert_eq!(particle.position.y, 600.0 - 5.0);
    }

    #[test]
    fn attraction_pulls_towards_the_pointer() {
        let particle = still_particle(100.0, 0.0);
        let particle = particle.update(
            &context(SimulationMode::Attraction, Some(Vec2::ZERO)),
            &mut rng(),
        );
        assert!(particle.velocity.x < 0.0);
        assert_eq!(particle.velocity.y, 0.0);
    }

    #[test]
    fn repulsion_pushes_away_from_the_pointer() {
        let particle = still_particle(100.0, 0.0);
        let particle = particle.update(
            &context(SimulationMode::Repulsion, Some(Vec2::ZERO)),
            &mut rng(),
        );
        assert!(particle.velocity.x > 0.0);
        assert_eq!(particle.velocity.y, 0.0);
    }

    #[test]
    fn repulsion_is_stronger_than_attraction() {
        let attracted = still_particle(100.0, 0.0).update(
            &context(SimulationMode::Attraction, Some(Vec2::ZERO)),
            &mut rng(),
        );
        let repulsed = still_particle(100.0, 0.0).update(
            &context(SimulationMode::Repulsion, Some(Vec2::ZERO)),
            &mut rng(),
        );
        assert!(repulsed.velocity.x.abs() > attracted.velocity.x.abs() * 50.0);
    }

    #[test]
    fn force_grows_as_distance_shrinks() {
        let near = still_particle(10.0, 0.0).update(
            &context(SimulationMode::Attraction, Some(Vec2::ZERO)),
            &mut rng(),
        );
        let far = still_particle(200.0, 0.0).update(
            &context(SimulationMode::Attraction, Some(Vec2::ZERO)),
            &mut rng(),
        );
        let near_force = near.velocity.x.abs() / 10.0;
        let far_force = far.velocity.x.abs() / 200.0;
        assert!(near_force > far_force);
    }

    #[test]
    fn no_force_when_on_top_of_the_pointer() {
        for mode in [SimulationMode::Attraction, SimulationMode::Repulsion] {
            let particle = still_particle(50.0, 50.0)
                .update(&context(mode, Some(Vec2::new(50.0, 50.0))), &mut rng());
            assert_eq!(particle.velocity, Vec2::ZERO);
            assert!(particle.position.is_finite());
        }
    }

    #[test]
    fn no_force_without_a_pointer() {
        for mode in [SimulationMode::Attraction, SimulationMode::Repulsion] {
            let particle = still_particle(50.0, 50.0).update(&context(mode, None), &mut rng());
            assert_eq!(particle.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn pointer_at_the_origin_still_counts() {
        let particle = still_particle(3.0, 4.0).update(
            &context(SimulationMode::Attraction, Some(Vec2::ZERO)),
            &mut rng(),
        );
        assert!(particle.velocity.x < 0.0);
        assert!(particle.velocity.y < 0.0);
    }

    #[test]
    fn drawn_as_squares_only_in_attraction_mode() {
        let particle = still_particle(1.0, 2.0);
        let mut canvas = RecordingCanvas::default();

        particle.draw(&mut canvas, SimulationMode::Attraction);
        particle.draw(&mut canvas, SimulationMode::Trails);
        particle.draw(&mut canvas, SimulationMode::Gravity);
        particle.draw(&mut canvas, SimulationMode::Repulsion);

        let kinds: Vec<&str> = canvas.shapes.iter().map(|shape| shape.0).collect();
        assert_eq!(kinds, vec!["square", "circle", "circle", "circle"]);
        assert_eq!(canvas.shapes.first().map(|shape| shape.2), Some(5.0));
    }
}
