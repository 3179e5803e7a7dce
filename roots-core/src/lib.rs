pub mod app_config;
pub mod device;
pub mod surface;

pub use app_config::{Config, NotifierConfig};
pub use device::DeviceClass;
pub use surface::{NavigationSurface, OpenTarget, TriggerId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("Please allow popups to send order details to WhatsApp.")]
    PopupBlocked,
    #[error("Navigation trigger failed: {0}")]
    TriggerFailed(String),
    #[error("Destination number has no digits: {0:?}")]
    InvalidDestination(String),
    #[error("Delivery link is not a valid URL: {0}")]
    InvalidLink(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
