// Queues: submission and presentation

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::command_buffer::CommandBuffer;
use crate::device::Device;
use crate::error::Result;
use crate::swapchain::Swapchain;
use crate::sync::{Fence, Semaphore};

/// Builder for `VkSubmitInfo`.
///
/// `wait_dst_stage_mask` pairs with `wait_semaphores` entry by entry.
#[derive(Debug, Default)]
pub struct SubmitInfo {
    info: vk::SubmitInfo,
    wait_semaphores: Vec<vk::Semaphore>,
    wait_dst_stage_mask: Vec<vk::PipelineStageFlags>,
    command_buffers: Vec<vk::CommandBuffer>,
    signal_semaphores: Vec<vk::Semaphore>,
}

impl SubmitInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_semaphores(mut self, semaphores: &[&Semaphore]) -> Self {
        self.wait_semaphores = semaphores.iter().map(|s| s.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn wait_dst_stage_mask(mut self, stages: &[vk::PipelineStageFlags]) -> Self {
        self.wait_dst_stage_mask = stages.to_vec();
        self.repoint();
        self
    }

    pub fn command_buffers(mut self, buffers: &[&CommandBuffer]) -> Self {
        self.command_buffers = buffers.iter().map(|b| b.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn signal_semaphores(mut self, semaphores: &[&Semaphore]) -> Self {
        self.signal_semaphores = semaphores.iter().map(|s| s.c_ptr()).collect();
        self.repoint();
        self
    }

    pub(crate) fn wait_lists_match(&self) -> bool {
        self.wait_semaphores.len() == self.wait_dst_stage_mask.len()
    }

    pub fn raw(&self) -> &vk::SubmitInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.wait_semaphore_count = count(&self.wait_semaphores);
        self.info.p_wait_semaphores = ptr_or_null(&self.wait_semaphores);
        self.info.p_wait_dst_stage_mask = ptr_or_null(&self.wait_dst_stage_mask);
        self.info.command_buffer_count = count(&self.command_buffers);
        self.info.p_command_buffers = ptr_or_null(&self.command_buffers);
        self.info.signal_semaphore_count = count(&self.signal_semaphores);
        self.info.p_signal_semaphores = ptr_or_null(&self.signal_semaphores);
    }
}

impl Clone for SubmitInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            wait_semaphores: self.wait_semaphores.clone(),
            wait_dst_stage_mask: self.wait_dst_stage_mask.clone(),
            command_buffers: self.command_buffers.clone(),
            signal_semaphores: self.signal_semaphores.clone(),
        };
        copy.repoint();
        copy
    }
}

/// Builder for `VkPresentInfoKHR`. `image_indices` pairs with `swapchains`.
#[derive(Debug, Default)]
pub struct PresentInfo {
    info: vk::PresentInfoKHR,
    wait_semaphores: Vec<vk::Semaphore>,
    swapchains: Vec<vk::SwapchainKHR>,
    image_indices: Vec<u32>,
}

impl PresentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_semaphores(mut self, semaphores: &[&Semaphore]) -> Self {
        self.wait_semaphores = semaphores.iter().map(|s| s.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn swapchains(mut self, swapchains: &[&Swapchain]) -> Self {
        self.swapchains = swapchains.iter().map(|s| s.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn image_indices(mut self, indices: &[u32]) -> Self {
        self.image_indices = indices.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::PresentInfoKHR {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.wait_semaphore_count = count(&self.wait_semaphores);
        self.info.p_wait_semaphores = ptr_or_null(&self.wait_semaphores);
        self.info.swapchain_count = count(&self.swapchains);
        self.info.p_swapchains = ptr_or_null(&self.swapchains);
        self.info.p_image_indices = ptr_or_null(&self.image_indices);
    }
}

impl Clone for PresentInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            wait_semaphores: self.wait_semaphores.clone(),
            swapchains: self.swapchains.clone(),
            image_indices: self.image_indices.clone(),
        };
        copy.repoint();
        copy
    }
}

/// A device queue. Queues are owned by the device and never destroyed.
#[derive(Clone)]
pub struct Queue {
    raw: vk::Queue,
    family_index: u32,
    device: Device,
}

impl Queue {
    pub(crate) fn new(raw: vk::Queue, family_index: u32, device: Device) -> Self {
        Self {
            raw,
            family_index,
            device,
        }
    }

    pub fn submit(&self, submits: &[SubmitInfo], fence: Option<&Fence>) -> Result<()> {
        debug_assert!(
            submits.iter().all(SubmitInfo::wait_lists_match),
            "each wait semaphore needs a wait stage"
        );

        let raw: Vec<vk::SubmitInfo> = submits.iter().map(|submit| *submit.raw()).collect();
        let fence = fence.map_or(vk::Fence::null(), Fence::c_ptr);
        unsafe { self.device.ash().queue_submit(self.raw, &raw, fence) }?;
        Ok(())
    }

    /// Queue images for presentation. Returns `true` when the swapchain is
    /// suboptimal for the surface.
    pub fn present(&self, info: &PresentInfo) -> Result<bool> {
        debug_assert_eq!(info.swapchains.len(), info.image_indices.len());
        let suboptimal = unsafe {
            self.device
                .swapchain_loader()
                .queue_present(self.raw, info.raw())
        }?;
        Ok(suboptimal)
    }

    pub fn wait_idle(&self) -> Result<()> {
        unsafe { self.device.ash().queue_wait_idle(self.raw) }?;
        Ok(())
    }

    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    pub fn c_ptr(&self) -> vk::Queue {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;
    use ash::vk::Handle as _;

    #[test]
    fn empty_submit_is_null() {
        let info = SubmitInfo::new();
        assert_eq!(info.raw().wait_semaphore_count, 0);
        assert!(info.raw().p_wait_semaphores.is_null());
        assert!(info.raw().p_wait_dst_stage_mask.is_null());
        assert!(info.raw().p_command_buffers.is_null());
        assert!(info.wait_lists_match());
    }

    #[test]
    fn wait_stages_must_pair_with_semaphores() {
        let info = SubmitInfo::new()
            .wait_dst_stage_mask(&[vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT]);
        assert!(!info.wait_lists_match());
    }

    #[test]
    fn present_indices_survive_clone() {
        let info = PresentInfo::new().image_indices(&[2]);
        let copy = info.clone();
        drop(info);
        assert_eq!(unsafe { *copy.raw().p_image_indices }, 2);
        assert_eq!(copy.raw().swapchain_count, 0);
    }

    #[test]
    fn submit_lists_are_counted() {
        let acquired = Semaphore::new(Handle::unowned(vk::Semaphore::from_raw(3)));
        let rendered = Semaphore::new(Handle::unowned(vk::Semaphore::from_raw(4)));

        let info = SubmitInfo::new()
            .wait_semaphores(&[&acquired])
            .wait_dst_stage_mask(&[vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT])
            .signal_semaphores(&[&rendered, &acquired]);
        let copy = info.clone();
        drop(info);

        let raw = copy.raw();
        assert!(copy.wait_lists_match());
        assert_eq!(raw.wait_semaphore_count, 1);
        assert_eq!(unsafe { *raw.p_wait_semaphores }, acquired.c_ptr());
        assert_eq!(
            unsafe { *raw.p_wait_dst_stage_mask },
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
        );
        assert_eq!(raw.signal_semaphore_count, 2);
        let signals = unsafe { std::slice::from_raw_parts(raw.p_signal_semaphores, 2) };
        assert_eq!(signals, &[rendered.c_ptr(), acquired.c_ptr()]);
        assert_eq!(raw.command_buffer_count, 0);
    }
}
