//! Hue cycle sampler: a stand-in for screen capture.

use std::sync::atomic::{AtomicU16, Ordering};

use panelhub_app::ports::ColorSampler;
use panelhub_domain::effect::Rgb;

const FULL_TURN: u16 = 360;

/// Advances around the colour wheel by a fixed number of degrees per sample.
pub struct HueCycleSampler {
    hue: AtomicU16,
    step: u16,
}

impl HueCycleSampler {
    #[must_use]
    pub fn new(step: u16) -> Self {
        Self {
            hue: AtomicU16::new(0),
            step: step % FULL_TURN,
        }
    }
}

impl Default for HueCycleSampler {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ColorSampler for HueCycleSampler {
    fn sample(&self) -> Option<Rgb> {
        let step = self.step;
        let previous = self
            .hue
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |hue| {
                Some((hue + step) % FULL_TURN)
            })
            .unwrap_or_else(|hue| hue);
        Some(hue_to_rgb(previous))
    }
}

/// Fully saturated colour at `hue` degrees.
fn hue_to_rgb(hue: u16) -> Rgb {
    let hue = hue % FULL_TURN;
    let rising = u8::try_from(u32::from(hue % 60) * 255 / 60).unwrap_or(u8::MAX);
    let falling = u8::MAX - rising;
    match hue / 60 {
        0 => Rgb::new(u8::MAX, rising, 0),
        1 => Rgb::new(falling, u8::MAX, 0),
        2 => Rgb::new(0, u8::MAX, rising),
        3 => Rgb::new(0, falling, u8::MAX),
        4 => Rgb::new(rising, 0, u8::MAX),
        _ => Rgb::new(u8::MAX, 0, falling),
    }
}
