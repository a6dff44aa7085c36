//! Composite the particles over the backdrop into the final renderable frame.
use color_eyre::eyre::Result;

use crate::backdrop::{Backdrop, Gradient};
use crate::canvas::PixelCanvas;
use crate::surface::{Colour, Surface};

/// Background for the status line, so that it's readable over any part of the gradient.
const STATUS_BACKGROUND: Colour = termwiz::color::SrgbaTuple(0.0, 0.0, 0.0, 0.6);

/// Composite particle pixels over the backdrop, honouring alpha blending.
#[derive(Default)]
pub(crate) struct Compositor;

impl Compositor {
    /// Build a whole terminal frame. The canvas is twice as tall in pixels as the frame is in
    /// rows.
    pub fn compose(
        canvas: &PixelCanvas,
        backdrop: &Backdrop,
        maybe_status: Option<&str>,
    ) -> Result<Surface> {
        let width = canvas.width();
        let height = canvas.height().div_ceil(2);
        let gradient = backdrop.gradient(width, height * 2);
        let mut surface = Surface::new(width, height);

        for row in 0..height {
            for col in 0..width {
                let upper = Self::pixel_colour(canvas, &gradient, col, row * 2);
                let lower = Self::pixel_colour(canvas, &gradient, col, row * 2 + 1);
                surface.add_pixels(col, row, upper, lower)?;
            }
        }

        if let Some(status) = maybe_status {
            Self::add_status(&mut surface, &gradient, status);
        }

        Ok(surface)
    }

    /// A single pixel of a particle, if any, over the backdrop.
    fn pixel_colour(canvas: &PixelCanvas, gradient: &Gradient, x: usize, y: usize) -> Colour {
        let background = gradient.colour_at(x, y);
        canvas
            .pixel(x, y)
            .map_or(background, |particle| Self::blend(background, particle))
    }

    /// Blend a colour over an opaque background.
    fn blend(background: Colour, above: Colour) -> Colour {
        let mut blended = background.interpolate(above, f64::from(above.3.clamp(0.0, 1.0)));
        blended.3 = 1.0;
        blended
    }

    /// Add the status text to the top-right of the frame, truncated if the terminal is too
    /// narrow.
    fn add_status(surface: &mut Surface, gradient: &Gradient, status: &str) {
        if surface.height == 0 || surface.width == 0 {
            return;
        }

        let text = format!(" {status} ");
        let visible: String = text.chars().take(surface.width).collect();
        let length = visible.chars().count();
        let x = surface.width - length;
        let background = Self::blend(gradient.colour_at(x, 0), STATUS_BACKGROUND);
        surface.add_text(
            x,
            0,
            &visible,
            Some(background),
            Some(crate::surface::WHITE),
        );
    }
}
