//! The fixed set of colours that particles are painted with.

use rand::Rng;

/// One of the five colours a particle can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Swatch {
    /// `255, 126, 95`
    Coral,
    /// `254, 180, 123`
    Peach,
    /// `30, 144, 255`
    DodgerBlue,
    /// `0, 195, 255`
    Sky,
    /// `255, 215, 0`
    Gold,
}

impl Swatch {
    #[cfg(test)]
    /// Every swatch, in palette order.
    pub const ALL: [Self; 5] = [
        Self::Coral,
        Self::Peach,
        Self::DodgerBlue,
        Self::Sky,
        Self::Gold,
    ];

    /// The 8-bit RGB triple of the swatch.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Coral => (255, 126, 95),
            Self::Peach => (254, 180, 123),
            Self::DodgerBlue => (30, 144, 255),
            Self::Sky => (0, 195, 255),
            Self::Gold => (255, 215, 0),
        }
    }

    /// The swatch as a true colour with the given opacity. Opacity is clamped to `[0, 1]` because
    /// a fading particle can briefly dip below zero before it's reset.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> crate::surface::Colour {
        let (red, green, blue) = self.rgb();
        termwiz::color::SrgbaTuple(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            opacity.clamp(0.0, 1.0),
        )
    }
}

impl rand::distributions::Distribution<Swatch> for rand::distributions::Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Swatch {
        match rng.gen_range(0u8..5u8) {
            0 => Swatch::Coral,
            1 => Swatch::Peach,
            2 => Swatch::DodgerBlue,
            3 => Swatch::Sky,
            _ => Swatch::Gold,
        }
    }
}
