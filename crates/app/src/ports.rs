//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod color_sampler;
pub mod device_client;
pub mod settings_store;

pub use clock::{Clock, LocalClock};
pub use color_sampler::ColorSampler;
pub use device_client::{ClientFactory, DeviceClient};
pub use settings_store::SettingsStore;
