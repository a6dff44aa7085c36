//! Everything that's being animated, and the translation from terminal cells to simulation space.

use glam::Vec2;
use rand::rngs::StdRng;

use crate::backdrop::Backdrop;
use crate::canvas::PixelCanvas;
use crate::simulation::field::ParticleField;
use crate::simulation::mode::{ModeController, SimulationMode};
use crate::simulation::particle::Bounds;

/// The particles, the active mode, the pointer and the backdrop, all sized to the terminal.
pub(crate) struct Scene {
    /// All the particles
    field: ParticleField,
    /// The active mode
    modes: ModeController,
    /// The last known pointer position, in simulation units.
    pointer: Option<Vec2>,
    /// The pixels that particles are drawn onto.
    canvas: PixelCanvas,
    /// The rotating gradient behind the particles.
    backdrop: Backdrop,
    /// Simulation units per terminal pixel
    pixel_scale: f32,
    /// All randomness comes from here, so that tests can seed it.
    rng: StdRng,
}

impl Scene {
    /// Instantiate an empty scene for a terminal of the given size in cells.
    #[must_use]
    pub fn new(columns: u16, rows: u16, pixel_scale: f32, rng: StdRng) -> Self {
        let pixel_scale = if pixel_scale > 0.0 { pixel_scale } else { 1.0 };
        let (width, height) = Self::pixel_size(columns, rows);
        Self {
            field: ParticleField::new(Self::bounds_for(width, height, pixel_scale)),
            modes: ModeController::default(),
            pointer: None,
            canvas: PixelCanvas::new(width, height, pixel_scale),
            backdrop: Backdrop::default(),
            pixel_scale,
            rng,
        }
    }

    /// The size in pixels of a terminal of the given size in cells.
    fn pixel_size(columns: u16, rows: u16) -> (usize, usize) {
        (usize::from(columns), usize::from(rows) * 2)
    }

    /// Simulation bounds for a canvas of the given size in pixels.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminals are never anywhere near big enough to lose precision"
    )]
    fn bounds_for(width: usize, height: usize, pixel_scale: f32) -> Bounds {
        Bounds::new(width as f32 * pixel_scale, height as f32 * pixel_scale)
    }

    /// Fit the scene to a new terminal size and repopulate it from scratch.
    pub fn resize(&mut self, columns: u16, rows: u16, initial_particles: usize) {
        let (width, height) = Self::pixel_size(columns, rows);
        self.canvas = PixelCanvas::new(width, height, self.pixel_scale);
        self.field
            .resize(Self::bounds_for(width, height, self.pixel_scale));
        self.field
            .initialize(initial_particles, self.modes.mode(), &mut self.rng);
        tracing::debug!("Scene resized to {columns}x{rows}");
    }

    /// Advance every particle by one frame and redraw them.
    pub fn step(&mut self) {
        self.field.step(
            &mut self.canvas,
            self.modes.mode(),
            self.pointer,
            &mut self.rng,
        );
    }

    /// The centre of a terminal cell in simulation units.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminals are never anywhere near big enough to lose precision"
    )]
    fn cell_centre(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(column as f32 + 0.5, (row * 2) as f32 + 1.0) * self.pixel_scale
    }

    /// The pointer moved to a cell: remember where it is and spawn particles there.
    pub fn pointer_moved(&mut self, column: usize, row: usize, count: usize) {
        let position = self.cell_centre(column, row);
        self.pointer = Some(position);
        self.field
            .spawn_at(position, count, self.modes.mode(), &mut self.rng);
    }

    /// The pointer was clicked on a cell: spawn a burst of particles there. The remembered pointer
    /// position only changes on movement.
    pub fn clicked(&mut self, column: usize, row: usize, count: usize) {
        let position = self.cell_centre(column, row);
        self.field
            .spawn_at(position, count, self.modes.mode(), &mut self.rng);
    }

    /// Switch simulation mode.
    pub fn set_mode(&mut self, mode: SimulationMode) {
        self.modes.set_mode(mode, &mut self.field);
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.field.clear(&mut self.canvas);
    }

    /// Rotate the backdrop's hue.
    pub const fn advance_backdrop(&mut self) {
        self.backdrop.advance();
    }

    /// The active mode
    #[must_use]
    pub const fn mode(&self) -> SimulationMode {
        self.modes.mode()
    }

    #[cfg(test)]
    /// The last known pointer position
    #[must_use]
    pub const fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// All the particles
    #[must_use]
    pub const fn field(&self) -> &ParticleField {
        &self.field
    }

    /// The particles as they were last drawn.
    #[must_use]
    pub const fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    /// The rotating gradient
    #[must_use]
    pub const fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    clippy::indexing_slicing,
    reason = "Tests check exact arithmetic on purpose"
)]
mod test {
    use rand::SeedableRng as _;

    use super::*;
    use crate::simulation::particle::GRAVITY;

    fn scene() -> Scene {
        let mut scene = Scene::new(80, 24, 4.0, StdRng::seed_from_u64(9));
        scene.resize(80, 24, 100);
        scene
    }

    #[test]
    fn resizing_fits_the_canvas_and_repopulates() {
        let mut scene = scene();
        assert_eq!(scene.field().len(), 100);
        assert_eq!(scene.canvas().width(), 80);
        assert_eq!(scene.canvas().height(), 48);
        assert_eq!(scene.field().bounds(), Bounds::new(320.0, 192.0));

        scene.pointer_moved(1, 1, 5);
        scene.resize(40, 10, 100);
        assert_eq!(scene.field().len(), 100);
        assert_eq!(scene.canvas().height(), 20);
    }

    #[test]
    fn moving_the_pointer_spawns_five_and_tracks_it() {
        let mut scene = scene();
        scene.pointer_moved(10, 5, 5);

        assert_eq!(scene.field().len(), 105);
        assert_eq!(scene.pointer(), Some(Vec2::new(42.0, 44.0)));
        assert!(scene.field().particles()[100..]
            .iter()
            .all(|particle| particle.position == Vec2::new(42.0, 44.0)));
    }

    #[test]
    fn clicking_spawns_twenty_without_moving_the_pointer() {
        let mut scene = scene();
        scene.clicked(3, 3, 20);

        assert_eq!(scene.field().len(), 120);
        assert_eq!(scene.pointer(), None);
    }

    #[test]
    fn clearing_removes_everything() {
        let mut scene = scene();
        scene.step();
        assert!(scene.canvas().filled_count() > 0);

        scene.clear();
        assert!(scene.field().is_empty());
        assert_eq!(scene.canvas().filled_count(), 0);

        scene.step();
        assert_eq!(scene.canvas().filled_count(), 0);
    }

    #[test]
    fn switching_to_gravity_affects_existing_particles() {
        let mut scene = scene();
        scene.set_mode(SimulationMode::Gravity);

        assert_eq!(scene.mode(), SimulationMode::Gravity);
        assert!(scene
            .field()
            .particles()
            .iter()
            .all(|particle| particle.gravity == GRAVITY));
    }

    #[test]
    fn backdrop_advances_independently() {
        let mut scene = scene();
        scene.advance_backdrop();
        scene.advance_backdrop();
        assert_eq!(scene.backdrop().hue(), 2);
    }
}
