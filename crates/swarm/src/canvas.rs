//! The raster surface that particles are drawn onto.
//!
//! Shapes are given in simulation units. The pixel canvas divides them by its scale to find the
//! terminal pixels to fill. Terminal pixels are half a cell tall, see `crate::surface`.

use std::ops::Range;

use glam::Vec2;

use crate::surface::Colour;

/// Anything particles can be drawn onto.
pub(crate) trait Canvas {
    /// Wipe everything that has been drawn.
    fn clear(&mut self);

    /// Fill a circle centred on `centre`.
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Colour);

    /// Fill an axis-aligned square centred on `centre`.
    fn fill_square(&mut self, centre: Vec2, side: f32, colour: Colour);
}

/// A grid of terminal pixels, each either empty or holding a possibly translucent colour.
#[derive(Debug, Clone)]
pub(crate) struct PixelCanvas {
    /// Width in pixels
    width: usize,
    /// Height in pixels
    height: usize,
    /// Simulation units per pixel
    scale: f32,
    /// Row-major pixel data
    pixels: Vec<Option<Colour>>,
}

impl PixelCanvas {
    /// Instantiate an empty canvas.
    #[must_use]
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale: if scale > 0.0 { scale } else { 1.0 },
            pixels: vec![None; width * height],
        }
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The colour at the given pixel, if anything has been drawn there.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied().flatten()
    }

    #[cfg(test)]
    /// How many pixels have something drawn on them.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.is_some()).count()
    }

    /// Paint `colour` over whatever is already at the pixel, honouring its alpha.
    fn blend_pixel(&mut self, x: usize, y: usize, colour: Colour) {
        if x >= self.width {
            return;
        }
        let Some(pixel) = self.pixels.get_mut(y * self.width + x) else {
            return;
        };

        *pixel = Some(match *pixel {
            Some(existing) => {
                let mut blended = existing.interpolate(colour, f64::from(colour.3));
                blended.3 = colour.3 + existing.3 * (1.0 - colour.3);
                blended
            }
            None => colour,
        });
    }

    /// The pixel containing a point in simulation space, if it's on the canvas.
    fn pixel_containing(&self, point: Vec2) -> Option<(usize, usize)> {
        let pixel = point / self.scale;
        if pixel.x < 0.0 || pixel.y < 0.0 {
            return None;
        }
        let x = Self::span(pixel.x, pixel.x + 1.0, self.width).start;
        let y = Self::span(pixel.y, pixel.y + 1.0, self.height).start;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// The pixel indices touched by `[start, end]`, in pixel units, clipped to `[0, limit)`.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Float to usize casts saturate, and we clamp to the canvas anyway"
    )]
    fn span(start: f32, end: f32, limit: usize) -> Range<usize> {
        let first = (start.floor().max(0.0) as usize).min(limit);
        let last = (end.ceil().max(0.0) as usize).min(limit);
        first..last.max(first)
    }

    /// The centre of a pixel in simulation space.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Canvases are never anywhere near big enough to lose precision"
    )]
    fn pixel_centre(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * self.scale
    }

    /// Fill every pixel whose centre passes `is_inside`. The pixel under the shape's centre is
    /// always filled, so tiny shapes never vanish.
    fn fill_where(
        &mut self,
        centre: Vec2,
        extent: f32,
        colour: Colour,
        is_inside: impl Fn(Vec2) -> bool,
    ) {
        let min = (centre - Vec2::splat(extent)) / self.scale;
        let max = (centre + Vec2::splat(extent)) / self.scale;
        let centre_pixel = self.pixel_containing(centre);
        let mut is_centre_filled = false;

        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                if is_inside(self.pixel_centre(x, y)) {
                    self.blend_pixel(x, y, colour);
                    is_centre_filled |= centre_pixel == Some((x, y));
                }
            }
        }

        if let (Some((x, y)), false) = (centre_pixel, is_centre_filled) {
            self.blend_pixel(x, y, colour);
        }
    }
}

impl Canvas for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        let radius_squared = radius * radius;
        self.fill_where(centre, radius, colour, |point| {
            point.distance_squared(centre) <= radius_squared
        });
    }

    fn fill_square(&mut self, centre: Vec2, side: f32, colour: Colour) {
        let half = side / 2.0;
        self.fill_where(centre, half, colour, |point| {
            let offset = (point - centre).abs();
            offset.x <= half && offset.y <= half
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RED: Colour = termwiz::color::SrgbaTuple(1.0, 0.0, 0.0, 1.0);
    const HALF_BLUE: Colour = termwiz::color::SrgbaTuple(0.0, 0.0, 1.0, 0.5);

    #[test]
    fn starts_empty() {
        let canvas = PixelCanvas::new(4, 4, 1.0);
        assert_eq!(canvas.filled_count(), 0);
        assert_eq!(canvas.pixel(0, 0), None);
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn circle_fills_a_disc() {
        let mut canvas = PixelCanvas::new(20, 20, 1.0);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 3.0, RED);

        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(12, 10), Some(RED));
        assert_eq!(canvas.pixel(14, 10), None);
        // Corner of the bounding box is outside the circle
        assert_eq!(canvas.pixel(12, 12), None);
        assert!(canvas.filled_count() > 20);
        assert!(canvas.filled_count() < 36);
    }

    #[test]
    fn square_fills_its_whole_bounding_box() {
        let mut canvas = PixelCanvas::new(20, 20, 1.0);
        canvas.fill_square(Vec2::new(10.0, 10.0), 4.0, RED);

        assert_eq!(canvas.filled_count(), 16);
        assert_eq!(canvas.pixel(8, 8), Some(RED));
        assert_eq!(canvas.pixel(11, 11), Some(RED));
        assert_eq!(canvas.pixel(12, 12), None);
    }

    #[test]
    fn scale_shrinks_shapes_into_fewer_pixels() {
        let mut canvas = PixelCanvas::new(20, 20, 4.0);
        canvas.fill_square(Vec2::new(40.0, 40.0), 8.0, RED);

        assert_eq!(canvas.filled_count(), 4);
        assert_eq!(canvas.pixel(9, 9), Some(RED));
        assert_eq!(canvas.pixel(10, 10), Some(RED));
    }

    #[test]
    fn tiny_shapes_still_show_up() {
        let mut canvas = PixelCanvas::new(20, 20, 4.0);
        canvas.fill_circle(Vec2::new(41.0, 41.0), 0.1, RED);
        assert_eq!(canvas.filled_count(), 1);
        assert_eq!(canvas.pixel(10, 10), Some(RED));
    }

    #[test]
    fn shapes_are_clipped_at_the_edges() {
        let mut canvas = PixelCanvas::new(5, 5, 1.0);
        canvas.fill_circle(Vec2::new(0.0, 0.0), 3.0, RED);
        canvas.fill_square(Vec2::new(5.0, 5.0), 4.0, RED);
        canvas.fill_circle(Vec2::new(-100.0, 300.0), 3.0, RED);

        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(4, 4), Some(RED));
        assert!(canvas.filled_count() < 25);
    }

    #[test]
    fn translucent_colours_blend_over_existing_pixels() {
        let mut canvas = PixelCanvas::new(3, 3, 1.0);
        canvas.fill_square(Vec2::new(1.5, 1.5), 1.0, RED);
        canvas.fill_square(Vec2::new(1.5, 1.5), 1.0, HALF_BLUE);

        let blended = canvas.pixel(1, 1).unwrap_or(RED);
        assert!(blended.0 < 1.0);
        assert!(blended.2 > 0.0);
        assert!((blended.3 - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn clearing_empties_every_pixel() {
        let mut canvas = PixelCanvas::new(10, 10, 1.0);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 4.0, RED);
        assert!(canvas.filled_count() > 0);

        canvas.clear();
        assert_eq!(canvas.filled_count(), 0);
    }
}
