//! The slowly rotating gradient that sits behind the particles.

use palette::FromColor as _;

use crate::surface::Colour;

/// Degrees between the two colours of the gradient.
const HUE_SPREAD: u16 = 60;
/// Direction of the gradient, in degrees clockwise from "up", like CSS's `linear-gradient()`.
const GRADIENT_ANGLE: f32 = 120.0;

/// A two-colour linear gradient whose hue rotates one degree per frame.
#[derive(Debug, Default, Clone)]
pub(crate) struct Backdrop {
    /// The hue, in degrees, of the gradient's starting colour.
    hue: u16,
}

impl Backdrop {
    #[cfg(test)]
    /// The current hue, in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Rotate the hue by a single degree.
    pub const fn advance(&mut self) {
        self.hue = (self.hue + 1) % 360;
    }

    /// The start and end colours of the gradient.
    #[must_use]
    pub fn colours(&self) -> (Colour, Colour) {
        (
            Self::hue_to_colour(self.hue),
            Self::hue_to_colour((self.hue + HUE_SPREAD) % 360),
        )
    }

    /// A fully saturated, medium lightness colour.
    fn hue_to_colour(hue: u16) -> Colour {
        let hsl: palette::Hsl = palette::Hsl::new(f32::from(hue), 1.0, 0.5);
        let rgb = palette::Srgb::from_color(hsl);
        termwiz::color::SrgbaTuple(rgb.red, rgb.green, rgb.blue, 1.0)
    }

    /// Freeze the current colours into a gradient over a surface of the given size in pixels.
    #[must_use]
    pub fn gradient(&self, width: usize, height: usize) -> Gradient {
        let (start, end) = self.colours();
        Gradient::new(start, end, width, height)
    }
}

/// A linear gradient laid over a fixed size surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gradient {
    /// Colour at the start of the gradient line
    start: Colour,
    /// Colour at the end of the gradient line
    end: Colour,
    /// Unit vector along the gradient line
    direction: glam::Vec2,
    /// Centre of the surface
    centre: glam::Vec2,
    /// Length of the gradient line, such that the corners get the pure start and end colours.
    length: f32,
}

impl Gradient {
    /// Instantiate
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Surfaces are never anywhere near big enough to lose precision"
    )]
    fn new(start: Colour, end: Colour, width: usize, height: usize) -> Self {
        let angle = GRADIENT_ANGLE.to_radians();
        let direction = glam::Vec2::new(angle.sin(), -angle.cos());
        let size = glam::Vec2::new(width as f32, height as f32);
        let length = size.x.mul_add(direction.x.abs(), size.y * direction.y.abs());
        Self {
            start,
            end,
            direction,
            centre: size / 2.0,
            length,
        }
    }

    /// The colour at the centre of the given pixel.
    #[must_use]
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Surfaces are never anywhere near big enough to lose precision"
    )]
    pub fn colour_at(&self, x: usize, y: usize) -> Colour {
        if self.length <= 0.0 {
            return self.start;
        }
        let point = glam::Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - self.centre;
        let progress = (point.dot(self.direction) / self.length + 0.5).clamp(0.0, 1.0);
        let mut colour = self.start.interpolate(self.end, f64::from(progress));
        colour.3 = 1.0;
        colour
    }
}
