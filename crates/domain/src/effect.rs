//! Effects: what a light panel shows.
//!
//! An effect is referenced by name only. Names starting with
//! [`CUSTOM_EFFECT_PREFIX`] belong to software-driven custom effects; every
//! other name is passed through to the device's own effect list.

use serde::{Deserialize, Serialize};

/// Reserved prefix keeping custom effect names apart from device effects.
pub const CUSTOM_EFFECT_PREFIX: &str = "PanelHub - ";

/// Continuous ambient capture custom effect.
pub const AMBILIGHT_EFFECT: &str = "PanelHub - Ambilight";

/// Custom effect that switches the panel off.
pub const TURN_OFF_EFFECT: &str = "PanelHub - Turn lights off";

/// Whether `name` uses the reserved custom effect prefix.
#[must_use]
pub fn has_custom_prefix(name: &str) -> bool {
    name.starts_with(CUSTOM_EFFECT_PREFIX)
}

/// A named effect reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
}

impl Effect {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// An 8-bit RGB colour pushed to a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
