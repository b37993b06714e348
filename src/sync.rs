// Semaphores and fences

use ash::vk;

use crate::device::Device;
use crate::error::Result;
use crate::handle::Handle;

#[derive(Debug, Clone, Copy, Default)]
pub struct SemaphoreCreateInfo {
    info: vk::SemaphoreCreateInfo,
}

impl SemaphoreCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &vk::SemaphoreCreateInfo {
        &self.info
    }
}

#[derive(Debug, Clone)]
pub struct Semaphore {
    handle: Handle<vk::Semaphore>,
}

impl Semaphore {
    pub(crate) fn new(handle: Handle<vk::Semaphore>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::Semaphore {
        self.handle.raw()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FenceCreateInfo {
    info: vk::FenceCreateInfo,
}

impl FenceCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `vk::FenceCreateFlags::SIGNALED` creates the fence already signaled,
    /// so the first wait on it returns immediately.
    pub fn flags(mut self, flags: vk::FenceCreateFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn raw(&self) -> &vk::FenceCreateInfo {
        &self.info
    }
}

#[derive(Clone)]
pub struct Fence {
    handle: Handle<vk::Fence>,
    device: Device,
}

impl Fence {
    pub(crate) fn new(handle: Handle<vk::Fence>, device: Device) -> Self {
        Self { handle, device }
    }

    /// `true` once the fence is signaled.
    pub fn status(&self) -> Result<bool> {
        let signaled = unsafe { self.device.ash().get_fence_status(self.c_ptr()) }?;
        Ok(signaled)
    }

    pub fn c_ptr(&self) -> vk::Fence {
        self.handle.raw()
    }
}
