use panelhub_domain::error::PanelHubError;

/// Failures of a simulated panel.
#[derive(Debug, thiserror::Error)]
pub enum VirtualDeviceError {
    #[error("virtual panel '{0}' is unreachable")]
    Unreachable(String),
}

impl From<VirtualDeviceError> for PanelHubError {
    fn from(err: VirtualDeviceError) -> Self {
        Self::Device(Box::new(err))
    }
}
