// Buffers

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::handle::Handle;

/// Builder for `VkBufferCreateInfo`. Owns the queue family index list.
#[derive(Debug)]
pub struct BufferCreateInfo {
    info: vk::BufferCreateInfo,
    queue_family_indices: Vec<u32>,
}

impl BufferCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::BufferCreateInfo {
                sharing_mode: vk::SharingMode::EXCLUSIVE,
                ..Default::default()
            },
            queue_family_indices: Vec::new(),
        }
    }

    pub fn flags(mut self, flags: vk::BufferCreateFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn size(mut self, size: vk::DeviceSize) -> Self {
        self.info.size = size;
        self
    }

    pub fn usage(mut self, usage: vk::BufferUsageFlags) -> Self {
        self.info.usage = usage;
        self
    }

    pub fn sharing_mode(mut self, mode: vk::SharingMode) -> Self {
        self.info.sharing_mode = mode;
        self
    }

    pub fn queue_family_indices(mut self, indices: &[u32]) -> Self {
        self.queue_family_indices = indices.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::BufferCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.queue_family_index_count = count(&self.queue_family_indices);
        self.info.p_queue_family_indices = ptr_or_null(&self.queue_family_indices);
    }
}

impl Default for BufferCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BufferCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            queue_family_indices: self.queue_family_indices.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    handle: Handle<vk::Buffer>,
    size: vk::DeviceSize,
}

impl Buffer {
    pub(crate) fn new(handle: Handle<vk::Buffer>, size: vk::DeviceSize) -> Self {
        Self { handle, size }
    }

    /// Size requested at creation.
    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }

    pub fn c_ptr(&self) -> vk::Buffer {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_by_default() {
        let info = BufferCreateInfo::new()
            .size(256)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER);
        assert_eq!(info.raw().sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert_eq!(info.raw().size, 256);
        assert_eq!(info.raw().queue_family_index_count, 0);
        assert!(info.raw().p_queue_family_indices.is_null());
    }

    #[test]
    fn concurrent_indices_are_owned() {
        let indices = vec![0, 2];
        let info = BufferCreateInfo::new()
            .sharing_mode(vk::SharingMode::CONCURRENT)
            .queue_family_indices(&indices);
        drop(indices);

        let copy = info.clone();
        drop(info);
        let raw = copy.raw();
        let stored = unsafe {
            std::slice::from_raw_parts(raw.p_queue_family_indices, raw.queue_family_index_count as usize)
        };
        assert_eq!(stored, &[0, 2]);
    }
}
