//! Pairs of pixels and lines of text on a surface the size of the user's terminal.
//!
//! Every terminal cell holds two pixels stacked vertically using the upper half block "▀": the
//! upper pixel is the cell's foreground colour and the lower pixel is its background colour.

use color_eyre::eyre::bail;
use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::surface::Position as TermwizPosition;

/// An RGBA colour, each channel in `0.0..=1.0`.
pub(crate) type Colour = termwiz::color::SrgbaTuple;

/// A default pure white.
pub const WHITE: Colour = termwiz::color::SrgbaTuple(1.0, 1.0, 1.0, 1.0);

/// A whole frame, ready to be handed to the renderer.
pub(crate) struct Surface {
    /// The terminal's width
    pub width: usize,
    /// The terminal's height
    pub height: usize,
    /// A surface of terminal cells
    pub surface: termwiz::surface::Surface,
}

impl Surface {
    /// Instantiate
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            surface: termwiz::surface::Surface::new(width, height),
        }
    }

    /// Paint both pixels of a single cell.
    pub fn add_pixels(
        &mut self,
        col: usize,
        row: usize,
        upper: Colour,
        lower: Colour,
    ) -> Result<()> {
        if col >= self.width {
            bail!("Tried to add pixels to column: {col}")
        }
        if row >= self.height {
            bail!("Tried to add pixels to row: {row}")
        }

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(col),
                y: TermwizPosition::Absolute(row),
            },
            Self::make_fg_colour(upper),
            Self::make_bg_colour(lower),
        ]);
        self.surface.add_change("▀");

        Ok(())
    }

    /// Overlay text at a given coord with the given colours.
    pub fn add_text(
        &mut self,
        x: usize,
        y: usize,
        text: &str,
        maybe_background_colour: Option<Colour>,
        maybe_foreground_colour: Option<Colour>,
    ) {
        let bg_colour = maybe_background_colour
            .map_or_else(Self::make_default_bg_colour, Self::make_bg_colour);

        let fg_colour = maybe_foreground_colour
            .map_or_else(|| Self::make_fg_colour(WHITE), Self::make_fg_colour);

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(x),
                y: TermwizPosition::Absolute(y),
            },
            bg_colour,
            fg_colour,
        ]);
        self.surface.add_change(text);
    }

    /// Make a Termwiz colour attribute
    #[must_use]
    pub const fn make_colour_attribute(colour: Colour) -> termwiz::color::ColorAttribute {
        termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(colour)
    }

    /// Make a Termwiz background colour
    #[must_use]
    pub const fn make_bg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make the default Termwiz background colour, whatever the user's terminal shows when no
    /// colour has been set.
    #[must_use]
    pub const fn make_default_bg_colour() -> TermwizChange {
        let colour_attribute = termwiz::color::ColorAttribute::Default;
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make a Termwiz foreground colour
    #[must_use]
    pub const fn make_fg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(colour_attribute))
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    clippy::shadow_unrelated,
    reason = "Tests aren't so strict"
)]
mod test {
    use super::*;

    const GREY: Colour = termwiz::color::SrgbaTuple(0.5, 0.5, 0.5, 1.0);
    const BLACK: Colour = termwiz::color::SrgbaTuple(0.0, 0.0, 0.0, 1.0);

    #[test]
    fn add_pixel_pairs() {
        let mut surface = Surface::new(2, 2);

        let cell = &surface.surface.screen_cells()[0][0];
        assert_eq!(cell.str(), " ");
        assert_eq!(
            cell.attrs().foreground(),
            termwiz::color::ColorAttribute::Default
        );

        surface.add_pixels(0, 0, WHITE, GREY).unwrap();
        let cell = &surface.surface.screen_cells()[0][0];
        assert_eq!(cell.str(), "▀");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(WHITE)
        );
        assert_eq!(
            cell.attrs().background(),
            Surface::make_colour_attribute(GREY)
        );

        surface.add_pixels(1, 1, BLACK, WHITE).unwrap();
        let cell = &surface.surface.screen_cells()[1][1];
        assert_eq!(cell.str(), "▀");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(BLACK)
        );
    }

    #[test]
    fn pixels_outside_the_surface_are_errors() {
        let mut surface = Surface::new(2, 2);

        let result = surface.add_pixels(1, 2, WHITE, WHITE).unwrap_err();
        assert_eq!(
            format!("{}", result.root_cause()),
            "Tried to add pixels to row: 2"
        );

        let result = surface.add_pixels(2, 0, WHITE, WHITE).unwrap_err();
        assert_eq!(
            format!("{}", result.root_cause()),
            "Tried to add pixels to column: 2"
        );
    }

    #[test]
    fn add_text_over_pixels() {
        let mut surface = Surface::new(4, 1);
        surface.add_pixels(0, 0, GREY, GREY).unwrap();
        surface.add_text(0, 0, "hi", None, Some(BLACK));

        let cells = surface.surface.screen_cells();
        assert_eq!(cells[0][0].str(), "h");
        assert_eq!(cells[0][1].str(), "i");
        assert_eq!(
            cells[0][0].attrs().foreground(),
            Surface::make_colour_attribute(BLACK)
        );
        assert_eq!(
            cells[0][0].attrs().background(),
            termwiz::color::ColorAttribute::Default
        );
    }
}
