// Error types
//
// Every failing driver call surfaces as `Error::Vulkan`, which carries the
// raw result code so callers can react to specific codes (out of date
// swapchains, timeouts).

use ash::vk;
use std::fmt;
use thiserror::Error;

/// A failed Vulkan call, carrying the result code the driver returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanError {
    vk_result: vk::Result,
}

impl VulkanError {
    pub fn new(vk_result: vk::Result) -> Self {
        Self { vk_result }
    }

    pub fn vk_result(&self) -> vk::Result {
        self.vk_result
    }
}

impl fmt::Display for VulkanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VulkanError. Error code: {} ({})",
            self.vk_result.as_raw(),
            self.vk_result
        )
    }
}

impl std::error::Error for VulkanError {}

impl From<vk::Result> for VulkanError {
    fn from(vk_result: vk::Result) -> Self {
        Self::new(vk_result)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Vulkan(#[from] VulkanError),
    #[error("Failed to load the Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),
    #[error("Invalid SPIR-V code: {0}")]
    Spirv(#[source] std::io::Error),
    #[error("Window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("No Vulkan surface support for window system: {0}")]
    UnsupportedPlatform(&'static str),
    #[error("String contains an interior NUL byte: {0:?}")]
    InvalidName(String),
    #[error("Range {offset}+{size} exceeds allocation of {capacity} bytes")]
    OutOfBounds {
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        capacity: vk::DeviceSize,
    },
}

impl Error {
    /// The driver result code, if this error came from a Vulkan call.
    pub fn vk_result(&self) -> Option<vk::Result> {
        match self {
            Error::Vulkan(e) => Some(e.vk_result()),
            _ => None,
        }
    }
}

impl From<vk::Result> for Error {
    fn from(vk_result: vk::Result) -> Self {
        Error::Vulkan(VulkanError::new(vk_result))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vulkan_error_keeps_result_code() {
        let err = VulkanError::new(vk::Result::ERROR_OUT_OF_DATE_KHR);
        assert_eq!(err.vk_result(), vk::Result::ERROR_OUT_OF_DATE_KHR);

        let message = err.to_string();
        assert!(message.starts_with("VulkanError. Error code: -1000001004"));
    }

    #[test]
    fn crate_error_exposes_vk_result() {
        let err: Error = vk::Result::ERROR_DEVICE_LOST.into();
        assert_eq!(err.vk_result(), Some(vk::Result::ERROR_DEVICE_LOST));

        let err = Error::UnsupportedPlatform("Web");
        assert_eq!(err.vk_result(), None);
        assert_eq!(
            err.to_string(),
            "No Vulkan surface support for window system: Web"
        );
    }
}
