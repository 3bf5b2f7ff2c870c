//! Colour sampler port: where the ambilight effect gets its colours.

use panelhub_domain::effect::Rgb;

/// Produces the colour the panels should currently mirror.
///
/// Sampling is synchronous and cheap; `None` means no colour is available
/// right now and the previous one stays on the panel.
pub trait ColorSampler: Send + Sync {
    fn sample(&self) -> Option<Rgb>;
}
