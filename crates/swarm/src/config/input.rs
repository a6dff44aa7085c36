//! Supporting user-defined keybindings.

use crate::simulation::mode::SimulationMode;

/// The user config for defining keybindings.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone)]
pub(crate) struct KeybindingConfigRaw {
    /// The modifier keys, like `CTRL`, `SHIFT`, etc.
    pub mods: Option<String>,
    /// The actual key, like a 'x' or `PageUp`.
    pub key: String,
}

/// All the possible actions a user can trigger with the keyboard.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub(crate) enum KeybindingAction {
    /// Particles drift freely.
    Trails,
    /// Particles fall and bounce.
    Gravity,
    /// Particles are pulled towards the pointer.
    Attraction,
    /// Particles are pushed away from the pointer.
    Repulsion,
    /// Remove every particle.
    Clear,
    /// Exit the app.
    Quit,
}

impl KeybindingAction {
    /// The simulation mode that this action switches to, if it's a mode switch at all.
    #[must_use]
    pub const fn mode(self) -> Option<SimulationMode> {
        match self {
            Self::Trails => Some(SimulationMode::Trails),
            Self::Gravity => Some(SimulationMode::Gravity),
            Self::Attraction => Some(SimulationMode::Attraction),
            Self::Repulsion => Some(SimulationMode::Repulsion),
            Self::Clear | Self::Quit => None,
        }
    }
}

/// All the active user-configured keybindings.
pub(crate) type KeybindingsRaw = std::collections::HashMap<KeybindingAction, KeybindingConfigRaw>;

/// The user keybindings converted to native `termwiz::input::KeyEvent`s.
pub(crate) type KeybindingsAsEvents =
    std::collections::HashMap<KeybindingAction, termwiz::input::KeyEvent>;

impl KeybindingConfigRaw {
    /// The key in the TOML shape that `termwiz::input::KeyCode` deserialises from. A single
    /// character is a `Char`, anything longer names a key like `PageUp`.
    fn key_as_toml(&self) -> String {
        if self.key.chars().count() == 1 {
            format!("{{ Char = \"{}\" }}", self.key)
        } else {
            format!("\"{}\"", self.key)
        }
    }
}

/// A keybinding that doesn't describe a real key.
fn invalid_keybinding(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

impl TryFrom<KeybindingConfigRaw> for termwiz::input::KeyEvent {
    type Error = std::io::Error;

    /// Keys go through termwiz's own `serde::Deserialize`, via a two-line TOML document.
    /// Modifiers start empty and are then parsed from `mods`.
    fn try_from(binding: KeybindingConfigRaw) -> std::result::Result<Self, Self::Error> {
        let document = format!("modifiers = {{ bits = 0 }}\nkey = {}", binding.key_as_toml());
        let mut key_event: Self = toml::from_str(&document).map_err(|error| {
            invalid_keybinding(format!("Unknown key in {binding:?}: {}", error.message()))
        })?;

        if let Some(mods) = binding.mods.clone() {
            key_event.modifiers = mods.try_into().map_err(|error| {
                invalid_keybinding(format!("Unknown modifiers in {binding:?}: {error:?}"))
            })?;
        }

        Ok(key_event)
    }
}

#[cfg(test)]
mod test {
    use termwiz::input::{KeyCode, KeyEvent, Modifiers};

    use super::*;

    fn parse(config: &str) -> std::result::Result<KeyEvent, std::io::Error> {
        let raw: KeybindingConfigRaw = toml::from_str(config).unwrap();
        raw.try_into()
    }

    fn assert_parses_to(config: &str, modifiers: Modifiers, key: KeyCode) {
        assert_eq!(parse(config).unwrap(), KeyEvent { key, modifiers }, "{config}");
    }

    #[test]
    fn single_characters() {
        assert_parses_to(r#"key = "2""#, Modifiers::NONE, KeyCode::Char('2'));
        assert_parses_to(r#"key = "C""#, Modifiers::NONE, KeyCode::Char('C'));
        assert_parses_to(r#"key = "é""#, Modifiers::NONE, KeyCode::Char('é'));
    }

    #[test]
    fn named_keys() {
        assert_parses_to(r#"key = "Escape""#, Modifiers::NONE, KeyCode::Escape);
        assert_parses_to(r#"key = "PageUp""#, Modifiers::NONE, KeyCode::PageUp);
    }

    #[test]
    fn keys_with_modifiers() {
        assert_parses_to(
            "mods = \"ALT\"\nkey = \"g\"",
            Modifiers::ALT,
            KeyCode::Char('g'),
        );
        assert_parses_to(
            "mods = \"CTRL|SHIFT\"\nkey = \"r\"",
            Modifiers::CTRL | Modifiers::SHIFT,
            KeyCode::Char('r'),
        );
    }

    #[test]
    fn unknown_keys_are_errors() {
        let error = parse(r#"key = "NotAKey""#).unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
        assert!(error.to_string().starts_with("Unknown key"), "{error}");
    }

    #[test]
    fn unknown_modifiers_are_errors() {
        let error = parse("mods = \"HYPERDRIVE\"\nkey = \"x\"").unwrap_err();
        assert!(error.to_string().starts_with("Unknown modifiers"), "{error}");
    }

    #[test]
    fn actions_map_to_modes() {
        assert_eq!(
            KeybindingAction::Gravity.mode(),
            Some(SimulationMode::Gravity)
        );
        assert_eq!(KeybindingAction::Clear.mode(), None);
        assert_eq!(KeybindingAction::Quit.mode(), None);
    }
}
