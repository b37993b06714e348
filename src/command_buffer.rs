// Command buffer allocation and recording
//
// Each recording method forwards to one `vkCmd*` call. Buffers are freed
// back to their pool when the last clone drops.

use ash::vk;

use crate::buffer::Buffer;
use crate::command_pool::CommandPool;
use crate::descriptor::DescriptorSet;
use crate::device::Device;
use crate::error::Result;
use crate::handle::Handle;
use crate::pipeline::{Pipeline, PipelineLayout};
use crate::render_pass::RenderPassBeginInfo;

/// Builder for `VkCommandBufferAllocateInfo`. Keeps the pool so allocated
/// buffers can return to it.
#[derive(Debug, Clone)]
pub struct CommandBufferAllocateInfo {
    info: vk::CommandBufferAllocateInfo,
    pool: CommandPool,
}

impl CommandBufferAllocateInfo {
    pub fn new(pool: &CommandPool) -> Self {
        Self {
            info: vk::CommandBufferAllocateInfo {
                command_pool: pool.c_ptr(),
                level: vk::CommandBufferLevel::PRIMARY,
                command_buffer_count: 1,
                ..Default::default()
            },
            pool: pool.clone(),
        }
    }

    pub fn level(mut self, level: vk::CommandBufferLevel) -> Self {
        self.info.level = level;
        self
    }

    pub fn command_buffer_count(mut self, count: u32) -> Self {
        self.info.command_buffer_count = count;
        self
    }

    pub fn command_pool(&self) -> &CommandPool {
        &self.pool
    }

    pub fn raw(&self) -> &vk::CommandBufferAllocateInfo {
        &self.info
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBufferBeginInfo {
    info: vk::CommandBufferBeginInfo,
}

impl CommandBufferBeginInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: vk::CommandBufferUsageFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn raw(&self) -> &vk::CommandBufferBeginInfo {
        &self.info
    }
}

/// One region of a buffer-to-buffer copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferCopy {
    region: vk::BufferCopy,
}

impl BufferCopy {
    pub fn new(src_offset: vk::DeviceSize, dst_offset: vk::DeviceSize, size: vk::DeviceSize) -> Self {
        Self {
            region: vk::BufferCopy {
                src_offset,
                dst_offset,
                size,
            },
        }
    }

    pub fn raw(&self) -> &vk::BufferCopy {
        &self.region
    }
}

#[derive(Clone)]
pub struct CommandBuffer {
    handle: Handle<vk::CommandBuffer>,
    device: Device,
}

impl CommandBuffer {
    pub(crate) fn new(handle: Handle<vk::CommandBuffer>, device: Device) -> Self {
        Self { handle, device }
    }

    pub fn begin(&self, info: &CommandBufferBeginInfo) -> Result<()> {
        unsafe { self.device.ash().begin_command_buffer(self.c_ptr(), info.raw()) }?;
        Ok(())
    }

    pub fn reset(&self, flags: vk::CommandBufferResetFlags) -> Result<()> {
        unsafe { self.device.ash().reset_command_buffer(self.c_ptr(), flags) }?;
        Ok(())
    }

    /// Finish recording.
    pub fn end(&self) -> Result<()> {
        unsafe { self.device.ash().end_command_buffer(self.c_ptr()) }?;
        Ok(())
    }

    pub fn begin_render_pass(&self, info: &RenderPassBeginInfo, contents: vk::SubpassContents) {
        unsafe {
            self.device
                .ash()
                .cmd_begin_render_pass(self.c_ptr(), info.raw(), contents)
        }
    }

    pub fn end_render_pass(&self) {
        unsafe { self.device.ash().cmd_end_render_pass(self.c_ptr()) }
    }

    pub fn bind_pipeline(&self, bind_point: vk::PipelineBindPoint, pipeline: &Pipeline) {
        unsafe {
            self.device
                .ash()
                .cmd_bind_pipeline(self.c_ptr(), bind_point, pipeline.c_ptr())
        }
    }

    pub fn set_viewport(&self, first_viewport: u32, viewports: &[vk::Viewport]) {
        unsafe {
            self.device
                .ash()
                .cmd_set_viewport(self.c_ptr(), first_viewport, viewports)
        }
    }

    pub fn set_scissor(&self, first_scissor: u32, scissors: &[vk::Rect2D]) {
        unsafe {
            self.device
                .ash()
                .cmd_set_scissor(self.c_ptr(), first_scissor, scissors)
        }
    }

    pub fn draw(
        &self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) {
        unsafe {
            self.device.ash().cmd_draw(
                self.c_ptr(),
                vertex_count,
                instance_count,
                first_vertex,
                first_instance,
            )
        }
    }

    pub fn draw_indexed(
        &self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        unsafe {
            self.device.ash().cmd_draw_indexed(
                self.c_ptr(),
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            )
        }
    }

    /// `buffers` and `offsets` must have the same length.
    pub fn bind_vertex_buffers(
        &self,
        first_binding: u32,
        buffers: &[&Buffer],
        offsets: &[vk::DeviceSize],
    ) {
        debug_assert_eq!(buffers.len(), offsets.len());
        let raw: Vec<vk::Buffer> = buffers.iter().map(|buffer| buffer.c_ptr()).collect();
        unsafe {
            self.device
                .ash()
                .cmd_bind_vertex_buffers(self.c_ptr(), first_binding, &raw, offsets)
        }
    }

    pub fn bind_index_buffer(
        &self,
        buffer: &Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    ) {
        unsafe {
            self.device
                .ash()
                .cmd_bind_index_buffer(self.c_ptr(), buffer.c_ptr(), offset, index_type)
        }
    }

    pub fn bind_descriptor_sets(
        &self,
        bind_point: vk::PipelineBindPoint,
        layout: &PipelineLayout,
        first_set: u32,
        sets: &[&DescriptorSet],
        dynamic_offsets: &[u32],
    ) {
        let raw: Vec<vk::DescriptorSet> = sets.iter().map(|set| set.c_ptr()).collect();
        unsafe {
            self.device.ash().cmd_bind_descriptor_sets(
                self.c_ptr(),
                bind_point,
                layout.c_ptr(),
                first_set,
                &raw,
                dynamic_offsets,
            )
        }
    }

    pub fn copy_buffer(&self, src: &Buffer, dst: &Buffer, regions: &[BufferCopy]) {
        let raw: Vec<vk::BufferCopy> = regions.iter().map(|region| *region.raw()).collect();
        unsafe {
            self.device
                .ash()
                .cmd_copy_buffer(self.c_ptr(), src.c_ptr(), dst.c_ptr(), &raw)
        }
    }

    pub fn c_ptr(&self) -> vk::CommandBuffer {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_copy_region() {
        let region = BufferCopy::new(16, 32, 64);
        assert_eq!(region.raw().src_offset, 16);
        assert_eq!(region.raw().dst_offset, 32);
        assert_eq!(region.raw().size, 64);
    }

    #[test]
    fn begin_info_flags() {
        let info = CommandBufferBeginInfo::new()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        assert_eq!(info.raw().flags, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        assert!(info.raw().p_inheritance_info.is_null());
    }
}
