// Logical device
//
// Responsibilities:
// - Device creation from an owned create-info
// - Creating every device-level object, with its destroy call bound as the
//   handle's deleter
// - Device-wide waits (fences, idle) and image acquisition

use ash::extensions::khr;
use ash::vk;
use std::sync::Arc;

use crate::base::{count, ptr_or_null, NameList};
use crate::buffer::{Buffer, BufferCreateInfo};
use crate::command_buffer::{CommandBuffer, CommandBufferAllocateInfo};
use crate::command_pool::{CommandPool, CommandPoolCreateInfo};
use crate::descriptor::{
    DescriptorPool, DescriptorPoolCreateInfo, DescriptorSet, DescriptorSetAllocateInfo,
    DescriptorSetLayout, DescriptorSetLayoutCreateInfo, WriteDescriptorSet,
};
use crate::error::{Error, Result};
use crate::framebuffer::{Framebuffer, FramebufferCreateInfo};
use crate::handle::Handle;
use crate::memory::{DeviceMemory, MemoryAllocateInfo, MemoryRequirements};
use crate::physical_device::PhysicalDevice;
use crate::pipeline::{GraphicsPipelineCreateInfo, Pipeline, PipelineLayout, PipelineLayoutCreateInfo};
use crate::queue::Queue;
use crate::render_pass::{RenderPass, RenderPassCreateInfo};
use crate::shader_module::{ShaderModule, ShaderModuleCreateInfo};
use crate::swapchain::{Image, ImageView, ImageViewCreateInfo, Swapchain, SwapchainCreateInfo};
use crate::sync::{Fence, FenceCreateInfo, Semaphore, SemaphoreCreateInfo};

/// Builder for `VkDeviceQueueCreateInfo`.
#[derive(Debug, Default)]
pub struct QueueCreateInfo {
    info: vk::DeviceQueueCreateInfo,
    priorities: Vec<f32>,
}

impl QueueCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_family_index(mut self, index: u32) -> Self {
        self.info.queue_family_index = index;
        self
    }

    /// One priority per queue; also sets the queue count.
    pub fn queue_priorities(mut self, priorities: &[f32]) -> Self {
        self.priorities = priorities.to_vec();
        self.info.queue_count = count(&self.priorities);
        self.repoint();
        self
    }

    /// Must not exceed the number of priorities.
    pub fn queue_count(mut self, queue_count: u32) -> Self {
        self.info.queue_count = queue_count;
        self
    }

    pub fn raw(&self) -> &vk::DeviceQueueCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.p_queue_priorities = ptr_or_null(&self.priorities);
    }
}

impl Clone for QueueCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            priorities: self.priorities.clone(),
        };
        copy.repoint();
        copy
    }
}

/// Builder for `VkDeviceCreateInfo`.
#[derive(Debug, Default)]
pub struct DeviceCreateInfo {
    info: vk::DeviceCreateInfo,
    queue_create_infos: Vec<QueueCreateInfo>,
    raw_queue_create_infos: Vec<vk::DeviceQueueCreateInfo>,
    enabled_features: Option<Box<vk::PhysicalDeviceFeatures>>,
    extension_names: NameList,
}

impl DeviceCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_create_infos(mut self, infos: &[QueueCreateInfo]) -> Self {
        self.queue_create_infos = infos.to_vec();
        self.repoint();
        self
    }

    pub fn enabled_features(mut self, features: vk::PhysicalDeviceFeatures) -> Self {
        self.enabled_features = Some(Box::new(features));
        self.repoint();
        self
    }

    pub fn enabled_extension_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.extension_names = NameList::new(names)?;
        self.repoint();
        Ok(self)
    }

    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extension_names.names()
    }

    pub fn raw(&self) -> &vk::DeviceCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.raw_queue_create_infos = self.queue_create_infos.iter().map(|q| *q.raw()).collect();
        self.info.queue_create_info_count = count(&self.raw_queue_create_infos);
        self.info.p_queue_create_infos = ptr_or_null(&self.raw_queue_create_infos);
        self.info.p_enabled_features = self
            .enabled_features
            .as_deref()
            .map_or(std::ptr::null(), |f| f as *const _);
        self.info.enabled_extension_count = self.extension_names.count();
        self.info.pp_enabled_extension_names = self.extension_names.as_ptr();
    }
}

impl Clone for DeviceCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            queue_create_infos: self.queue_create_infos.clone(),
            raw_queue_create_infos: Vec::new(),
            enabled_features: self.enabled_features.clone(),
            extension_names: self.extension_names.clone(),
        };
        copy.repoint();
        copy
    }
}

type DestroyFn<T> = unsafe fn(&ash::Device, T, Option<&vk::AllocationCallbacks>);

pub(crate) struct DeviceShared {
    raw: ash::Device,
    swapchain_loader: khr::Swapchain,
    physical_device: PhysicalDevice,
}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan device...");
        unsafe {
            let _ = self.raw.device_wait_idle();
            self.raw.destroy_device(None);
        }
    }
}

/// A logical device. Cloning shares ownership; every object created from
/// the device keeps it alive.
#[derive(Clone)]
pub struct Device {
    shared: Arc<DeviceShared>,
}

impl Device {
    pub(crate) fn new(physical_device: &PhysicalDevice, info: &DeviceCreateInfo) -> Result<Self> {
        let instance = physical_device.instance();

        log::info!(
            "Creating logical device on {} ({} queue families)",
            physical_device.properties().device_name(),
            info.raw().queue_create_info_count
        );
        for name in info.extension_names() {
            log::debug!(" - extension: {}", name);
        }

        let raw = unsafe {
            instance
                .ash()
                .create_device(physical_device.c_ptr(), info.raw(), None)
        }?;
        let swapchain_loader = khr::Swapchain::new(instance.ash(), &raw);

        Ok(Self {
            shared: Arc::new(DeviceShared {
                raw,
                swapchain_loader,
                physical_device: physical_device.clone(),
            }),
        })
    }

    /// Wrap a freshly created handle so `destroy` runs when the last owner
    /// drops. The deleter keeps the device alive until then.
    fn own<T>(&self, raw: T, destroy: DestroyFn<T>) -> Handle<T>
    where
        T: Copy + std::fmt::Debug + Send + Sync + 'static,
    {
        let shared = Arc::clone(&self.shared);
        Handle::new(raw, move |raw| {
            log::debug!("Destroying {:?}", raw);
            unsafe { destroy(&shared.raw, raw, None) }
        })
    }

    pub fn queue_for(&self, queue_family_index: u32, queue_index: u32) -> Queue {
        let raw = unsafe { self.shared.raw.get_device_queue(queue_family_index, queue_index) };
        Queue::new(raw, queue_family_index, self.clone())
    }

    pub fn create_swapchain(&self, info: &SwapchainCreateInfo) -> Result<Swapchain> {
        let raw = unsafe { self.shared.swapchain_loader.create_swapchain(info.raw(), None) }?;
        log::info!(
            "Created swapchain {}x{}",
            info.raw().image_extent.width,
            info.raw().image_extent.height
        );

        let shared = Arc::clone(&self.shared);
        let handle = Handle::new(raw, move |swapchain| {
            log::debug!("Destroying {:?}", swapchain);
            unsafe { shared.swapchain_loader.destroy_swapchain(swapchain, None) }
        });

        Ok(Swapchain::new(handle, info))
    }

    pub fn images_for(&self, swapchain: &Swapchain) -> Result<Vec<Image>> {
        let images = unsafe {
            self.shared
                .swapchain_loader
                .get_swapchain_images(swapchain.c_ptr())
        }?;

        Ok(images
            .into_iter()
            .map(|raw| Image::new(raw, swapchain))
            .collect())
    }

    pub fn create_image_view(&self, info: &ImageViewCreateInfo) -> Result<ImageView> {
        let raw = unsafe { self.shared.raw.create_image_view(info.raw(), None) }?;
        Ok(ImageView::new(self.own(raw, ash::Device::destroy_image_view)))
    }

    pub fn create_shader_module(&self, info: &ShaderModuleCreateInfo) -> Result<ShaderModule> {
        let raw = unsafe { self.shared.raw.create_shader_module(info.raw(), None) }?;
        Ok(ShaderModule::new(self.own(raw, ash::Device::destroy_shader_module)))
    }

    pub fn create_pipeline_layout(&self, info: &PipelineLayoutCreateInfo) -> Result<PipelineLayout> {
        let raw = unsafe { self.shared.raw.create_pipeline_layout(info.raw(), None) }?;
        Ok(PipelineLayout::new(self.own(raw, ash::Device::destroy_pipeline_layout)))
    }

    /// One pipeline per create-info, in order. On failure, any pipelines
    /// the driver did create are destroyed before the error is returned.
    pub fn create_graphics_pipelines(
        &self,
        infos: &[GraphicsPipelineCreateInfo],
    ) -> Result<Vec<Pipeline>> {
        let raw_infos: Vec<vk::GraphicsPipelineCreateInfo> =
            infos.iter().map(|info| *info.raw()).collect();

        let result = unsafe {
            self.shared
                .raw
                .create_graphics_pipelines(vk::PipelineCache::null(), &raw_infos, None)
        };

        match result {
            Ok(pipelines) => {
                log::info!("Created {} graphics pipeline(s)", pipelines.len());
                Ok(pipelines
                    .into_iter()
                    .map(|raw| Pipeline::new(self.own(raw, ash::Device::destroy_pipeline)))
                    .collect())
            }
            Err((pipelines, err)) => {
                for raw in pipelines.into_iter().filter(|p| *p != vk::Pipeline::null()) {
                    drop(self.own(raw, ash::Device::destroy_pipeline));
                }
                Err(Error::from(err))
            }
        }
    }

    pub fn create_render_pass(&self, info: &RenderPassCreateInfo) -> Result<RenderPass> {
        let raw = unsafe { self.shared.raw.create_render_pass(info.raw(), None) }?;
        Ok(RenderPass::new(self.own(raw, ash::Device::destroy_render_pass)))
    }

    pub fn create_framebuffer(&self, info: &FramebufferCreateInfo) -> Result<Framebuffer> {
        let raw = unsafe { self.shared.raw.create_framebuffer(info.raw(), None) }?;
        Ok(Framebuffer::new(self.own(raw, ash::Device::destroy_framebuffer)))
    }

    pub fn create_command_pool(&self, info: &CommandPoolCreateInfo) -> Result<CommandPool> {
        let raw = unsafe { self.shared.raw.create_command_pool(info.raw(), None) }?;
        Ok(CommandPool::new(self.own(raw, ash::Device::destroy_command_pool)))
    }

    /// Each buffer returns to the pool named in `info` when its last clone
    /// drops.
    pub fn allocate_command_buffers(
        &self,
        info: &CommandBufferAllocateInfo,
    ) -> Result<Vec<CommandBuffer>> {
        let buffers = unsafe { self.shared.raw.allocate_command_buffers(info.raw()) }?;

        Ok(buffers
            .into_iter()
            .map(|raw| {
                let shared = Arc::clone(&self.shared);
                let pool = info.command_pool().clone();
                let handle = Handle::new(raw, move |buffer| unsafe {
                    shared.raw.free_command_buffers(pool.c_ptr(), &[buffer]);
                });
                CommandBuffer::new(handle, self.clone())
            })
            .collect())
    }

    pub fn create_semaphore(&self, info: &SemaphoreCreateInfo) -> Result<Semaphore> {
        let raw = unsafe { self.shared.raw.create_semaphore(info.raw(), None) }?;
        Ok(Semaphore::new(self.own(raw, ash::Device::destroy_semaphore)))
    }

    pub fn create_fence(&self, info: &FenceCreateInfo) -> Result<Fence> {
        let raw = unsafe { self.shared.raw.create_fence(info.raw(), None) }?;
        Ok(Fence::new(self.own(raw, ash::Device::destroy_fence), self.clone()))
    }

    pub fn create_buffer(&self, info: &BufferCreateInfo) -> Result<Buffer> {
        let raw = unsafe { self.shared.raw.create_buffer(info.raw(), None) }?;
        Ok(Buffer::new(
            self.own(raw, ash::Device::destroy_buffer),
            info.raw().size,
        ))
    }

    pub fn buffer_memory_requirements(&self, buffer: &Buffer) -> MemoryRequirements {
        MemoryRequirements::from_raw(unsafe {
            self.shared
                .raw
                .get_buffer_memory_requirements(buffer.c_ptr())
        })
    }

    pub fn allocate_memory(&self, info: &MemoryAllocateInfo) -> Result<DeviceMemory> {
        let raw = unsafe { self.shared.raw.allocate_memory(info.raw(), None) }?;
        log::debug!(
            "Allocated {} bytes from memory type {}",
            info.raw().allocation_size,
            info.raw().memory_type_index
        );
        Ok(DeviceMemory::new(
            self.own(raw, ash::Device::free_memory),
            self.clone(),
            info.raw().allocation_size,
        ))
    }

    pub fn bind_buffer_memory(
        &self,
        buffer: &Buffer,
        memory: &DeviceMemory,
        offset: vk::DeviceSize,
    ) -> Result<()> {
        unsafe {
            self.shared
                .raw
                .bind_buffer_memory(buffer.c_ptr(), memory.c_ptr(), offset)
        }?;
        Ok(())
    }

    pub fn create_descriptor_set_layout(
        &self,
        info: &DescriptorSetLayoutCreateInfo,
    ) -> Result<DescriptorSetLayout> {
        let raw = unsafe { self.shared.raw.create_descriptor_set_layout(info.raw(), None) }?;
        Ok(DescriptorSetLayout::new(
            self.own(raw, ash::Device::destroy_descriptor_set_layout),
        ))
    }

    pub fn create_descriptor_pool(&self, info: &DescriptorPoolCreateInfo) -> Result<DescriptorPool> {
        let raw = unsafe { self.shared.raw.create_descriptor_pool(info.raw(), None) }?;
        Ok(DescriptorPool::new(
            self.own(raw, ash::Device::destroy_descriptor_pool),
        ))
    }

    pub fn allocate_descriptor_sets(
        &self,
        info: &DescriptorSetAllocateInfo,
    ) -> Result<Vec<DescriptorSet>> {
        let sets = unsafe { self.shared.raw.allocate_descriptor_sets(info.raw()) }?;

        Ok(sets
            .into_iter()
            .map(|raw| DescriptorSet::new(raw, info.descriptor_pool().clone()))
            .collect())
    }

    pub fn update_descriptor_sets(&self, writes: &[WriteDescriptorSet]) {
        let raw: Vec<vk::WriteDescriptorSet> = writes.iter().map(|write| *write.raw()).collect();
        unsafe { self.shared.raw.update_descriptor_sets(&raw, &[]) }
    }

    pub fn wait_for_fences(&self, fences: &[&Fence], wait_all: bool, timeout: u64) -> Result<()> {
        let raw: Vec<vk::Fence> = fences.iter().map(|fence| fence.c_ptr()).collect();
        unsafe { self.shared.raw.wait_for_fences(&raw, wait_all, timeout) }?;
        Ok(())
    }

    pub fn reset_fences(&self, fences: &[&Fence]) -> Result<()> {
        let raw: Vec<vk::Fence> = fences.iter().map(|fence| fence.c_ptr()).collect();
        unsafe { self.shared.raw.reset_fences(&raw) }?;
        Ok(())
    }

    /// Returns the image index and whether the swapchain is suboptimal.
    /// `ERROR_OUT_OF_DATE_KHR` comes back as an error.
    pub fn acquire_next_image(
        &self,
        swapchain: &Swapchain,
        timeout: u64,
        semaphore: Option<&Semaphore>,
        fence: Option<&Fence>,
    ) -> Result<(u32, bool)> {
        let result = unsafe {
            self.shared.swapchain_loader.acquire_next_image(
                swapchain.c_ptr(),
                timeout,
                semaphore.map_or(vk::Semaphore::null(), Semaphore::c_ptr),
                fence.map_or(vk::Fence::null(), Fence::c_ptr),
            )
        }?;
        Ok(result)
    }

    pub fn wait_idle(&self) -> Result<()> {
        unsafe { self.shared.raw.device_wait_idle() }?;
        Ok(())
    }

    pub fn physical_device(&self) -> &PhysicalDevice {
        &self.shared.physical_device
    }

    pub(crate) fn swapchain_loader(&self) -> &khr::Swapchain {
        &self.shared.swapchain_loader
    }

    pub fn ash(&self) -> &ash::Device {
        &self.shared.raw
    }

    pub fn c_ptr(&self) -> vk::Device {
        self.shared.raw.handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_set_queue_count() {
        let info = QueueCreateInfo::new()
            .queue_family_index(1)
            .queue_priorities(&[1.0, 0.5]);
        assert_eq!(info.raw().queue_count, 2);
        assert_eq!(info.raw().queue_family_index, 1);

        let info = info.queue_count(1);
        assert_eq!(info.raw().queue_count, 1);
    }

    #[test]
    fn device_info_points_at_owned_queue_infos() {
        let queue = QueueCreateInfo::new()
            .queue_family_index(0)
            .queue_priorities(&[1.0]);
        let info = DeviceCreateInfo::new()
            .queue_create_infos(&[queue])
            .enabled_extension_names(&["VK_KHR_swapchain"])
            .unwrap();
        let copy = info.clone();
        drop(info);

        let raw = copy.raw();
        assert_eq!(raw.queue_create_info_count, 1);
        assert_eq!(raw.enabled_extension_count, 1);
        assert!(raw.p_enabled_features.is_null());

        let queue = unsafe { *raw.p_queue_create_infos };
        assert_eq!(unsafe { *queue.p_queue_priorities }, 1.0);
    }

    #[test]
    fn features_are_boxed() {
        let features = vk::PhysicalDeviceFeatures {
            fill_mode_non_solid: vk::TRUE,
            ..Default::default()
        };
        let info = DeviceCreateInfo::new().enabled_features(features);
        let moved = info;
        let stored = unsafe { *moved.raw().p_enabled_features };
        assert_eq!(stored.fill_mode_non_solid, vk::TRUE);
    }
}
