// Descriptor set layouts, pools, and sets

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::buffer::Buffer;
use crate::handle::Handle;

#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorSetLayoutBinding {
    binding: vk::DescriptorSetLayoutBinding,
}

impl DescriptorSetLayoutBinding {
    pub fn new() -> Self {
        Self {
            binding: vk::DescriptorSetLayoutBinding {
                descriptor_count: 1,
                ..Default::default()
            },
        }
    }

    pub fn binding(mut self, binding: u32) -> Self {
        self.binding.binding = binding;
        self
    }

    pub fn descriptor_type(mut self, descriptor_type: vk::DescriptorType) -> Self {
        self.binding.descriptor_type = descriptor_type;
        self
    }

    pub fn descriptor_count(mut self, count: u32) -> Self {
        self.binding.descriptor_count = count;
        self
    }

    pub fn stage_flags(mut self, flags: vk::ShaderStageFlags) -> Self {
        self.binding.stage_flags = flags;
        self
    }

    pub fn raw(&self) -> &vk::DescriptorSetLayoutBinding {
        &self.binding
    }
}

#[derive(Debug, Default)]
pub struct DescriptorSetLayoutCreateInfo {
    info: vk::DescriptorSetLayoutCreateInfo,
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(mut self, bindings: &[DescriptorSetLayoutBinding]) -> Self {
        self.bindings = bindings.iter().map(|b| *b.raw()).collect();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::DescriptorSetLayoutCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.binding_count = count(&self.bindings);
        self.info.p_bindings = ptr_or_null(&self.bindings);
    }
}

impl Clone for DescriptorSetLayoutCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            bindings: self.bindings.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct DescriptorSetLayout {
    handle: Handle<vk::DescriptorSetLayout>,
}

impl DescriptorSetLayout {
    pub(crate) fn new(handle: Handle<vk::DescriptorSetLayout>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::DescriptorSetLayout {
        self.handle.raw()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DescriptorPoolSize {
    size: vk::DescriptorPoolSize,
}

impl DescriptorPoolSize {
    pub fn new(descriptor_type: vk::DescriptorType, descriptor_count: u32) -> Self {
        Self {
            size: vk::DescriptorPoolSize {
                ty: descriptor_type,
                descriptor_count,
            },
        }
    }

    pub fn raw(&self) -> &vk::DescriptorPoolSize {
        &self.size
    }
}

#[derive(Debug, Default)]
pub struct DescriptorPoolCreateInfo {
    info: vk::DescriptorPoolCreateInfo,
    pool_sizes: Vec<vk::DescriptorPoolSize>,
}

impl DescriptorPoolCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: vk::DescriptorPoolCreateFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn max_sets(mut self, max_sets: u32) -> Self {
        self.info.max_sets = max_sets;
        self
    }

    pub fn pool_sizes(mut self, sizes: &[DescriptorPoolSize]) -> Self {
        self.pool_sizes = sizes.iter().map(|s| *s.raw()).collect();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::DescriptorPoolCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.pool_size_count = count(&self.pool_sizes);
        self.info.p_pool_sizes = ptr_or_null(&self.pool_sizes);
    }
}

impl Clone for DescriptorPoolCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            pool_sizes: self.pool_sizes.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct DescriptorPool {
    handle: Handle<vk::DescriptorPool>,
}

impl DescriptorPool {
    pub(crate) fn new(handle: Handle<vk::DescriptorPool>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::DescriptorPool {
        self.handle.raw()
    }
}

/// Builder for `VkDescriptorSetAllocateInfo`. One set is allocated per
/// layout.
#[derive(Debug)]
pub struct DescriptorSetAllocateInfo {
    info: vk::DescriptorSetAllocateInfo,
    set_layouts: Vec<vk::DescriptorSetLayout>,
    pool: DescriptorPool,
}

impl DescriptorSetAllocateInfo {
    pub fn new(pool: &DescriptorPool) -> Self {
        Self {
            info: vk::DescriptorSetAllocateInfo {
                descriptor_pool: pool.c_ptr(),
                ..Default::default()
            },
            set_layouts: Vec::new(),
            pool: pool.clone(),
        }
    }

    pub fn set_layouts(mut self, layouts: &[&DescriptorSetLayout]) -> Self {
        self.set_layouts = layouts.iter().map(|l| l.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn descriptor_pool(&self) -> &DescriptorPool {
        &self.pool
    }

    pub fn raw(&self) -> &vk::DescriptorSetAllocateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.descriptor_set_count = count(&self.set_layouts);
        self.info.p_set_layouts = ptr_or_null(&self.set_layouts);
    }
}

impl Clone for DescriptorSetAllocateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            set_layouts: self.set_layouts.clone(),
            pool: self.pool.clone(),
        };
        copy.repoint();
        copy
    }
}

/// A descriptor set. Released together with its pool, which it keeps
/// alive.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    handle: Handle<vk::DescriptorSet>,
    _pool: DescriptorPool,
}

impl DescriptorSet {
    pub(crate) fn new(raw: vk::DescriptorSet, pool: DescriptorPool) -> Self {
        Self {
            handle: Handle::unowned(raw),
            _pool: pool,
        }
    }

    pub fn c_ptr(&self) -> vk::DescriptorSet {
        self.handle.raw()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DescriptorBufferInfo {
    info: vk::DescriptorBufferInfo,
}

impl DescriptorBufferInfo {
    /// `range` may be `vk::WHOLE_SIZE`.
    pub fn new(buffer: &Buffer, offset: vk::DeviceSize, range: vk::DeviceSize) -> Self {
        Self {
            info: vk::DescriptorBufferInfo {
                buffer: buffer.c_ptr(),
                offset,
                range,
            },
        }
    }

    pub fn raw(&self) -> &vk::DescriptorBufferInfo {
        &self.info
    }
}

/// Builder for `VkWriteDescriptorSet` with buffer descriptors. The
/// descriptor count follows the buffer info list.
#[derive(Debug, Default)]
pub struct WriteDescriptorSet {
    info: vk::WriteDescriptorSet,
    buffer_infos: Vec<vk::DescriptorBufferInfo>,
}

impl WriteDescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dst_set(mut self, set: &DescriptorSet) -> Self {
        self.info.dst_set = set.c_ptr();
        self
    }

    pub fn dst_binding(mut self, binding: u32) -> Self {
        self.info.dst_binding = binding;
        self
    }

    pub fn dst_array_element(mut self, element: u32) -> Self {
        self.info.dst_array_element = element;
        self
    }

    pub fn descriptor_type(mut self, descriptor_type: vk::DescriptorType) -> Self {
        self.info.descriptor_type = descriptor_type;
        self
    }

    pub fn buffer_info(mut self, infos: &[DescriptorBufferInfo]) -> Self {
        self.buffer_infos = infos.iter().map(|i| *i.raw()).collect();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::WriteDescriptorSet {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.descriptor_count = count(&self.buffer_infos);
        self.info.p_buffer_info = ptr_or_null(&self.buffer_infos);
    }
}

impl Clone for WriteDescriptorSet {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            buffer_infos: self.buffer_infos.clone(),
        };
        copy.repoint();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle as _;

    fn pool(raw: u64) -> DescriptorPool {
        DescriptorPool::new(Handle::unowned(vk::DescriptorPool::from_raw(raw)))
    }

    fn layout(raw: u64) -> DescriptorSetLayout {
        DescriptorSetLayout::new(Handle::unowned(vk::DescriptorSetLayout::from_raw(raw)))
    }

    #[test]
    fn binding_defaults_to_one_descriptor() {
        let binding = DescriptorSetLayoutBinding::new()
            .binding(0)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
            .stage_flags(vk::ShaderStageFlags::VERTEX);
        assert_eq!(binding.raw().descriptor_count, 1);
        assert!(binding.raw().p_immutable_samplers.is_null());
    }

    #[test]
    fn pool_sizes_are_counted() {
        let info = DescriptorPoolCreateInfo::new().max_sets(2).pool_sizes(&[
            DescriptorPoolSize::new(vk::DescriptorType::UNIFORM_BUFFER, 2),
            DescriptorPoolSize::new(vk::DescriptorType::STORAGE_BUFFER, 1),
        ]);
        let copy = info.clone();
        drop(info);

        assert_eq!(copy.raw().pool_size_count, 2);
        assert_eq!(copy.raw().max_sets, 2);
        let second = unsafe { *copy.raw().p_pool_sizes.add(1) };
        assert_eq!(second.ty, vk::DescriptorType::STORAGE_BUFFER);
    }

    #[test]
    fn write_without_buffers_is_empty() {
        let write = WriteDescriptorSet::new()
            .dst_binding(3)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(write.raw().descriptor_count, 0);
        assert!(write.raw().p_buffer_info.is_null());
        assert_eq!(write.raw().dst_binding, 3);
    }

    #[test]
    fn pool_size_fields() {
        let size = DescriptorPoolSize::new(vk::DescriptorType::STORAGE_BUFFER, 4);
        let copy = size;
        assert_eq!(copy.raw().ty, vk::DescriptorType::STORAGE_BUFFER);
        assert_eq!(copy.raw().descriptor_count, 4);
    }

    #[test]
    fn set_count_follows_layouts() {
        let pool = pool(7);
        let (first, second) = (layout(11), layout(12));

        let info = DescriptorSetAllocateInfo::new(&pool).set_layouts(&[&first, &second, &first]);
        let copy = info.clone();
        drop(info);

        let raw = copy.raw();
        assert_eq!(raw.descriptor_set_count, 3);
        assert_eq!(raw.descriptor_pool, vk::DescriptorPool::from_raw(7));
        let layouts = unsafe { std::slice::from_raw_parts(raw.p_set_layouts, 3) };
        assert_eq!(layouts[1], second.c_ptr());
        assert_eq!(layouts[2], first.c_ptr());
        assert_eq!(copy.descriptor_pool().c_ptr(), pool.c_ptr());
    }

    #[test]
    fn write_count_follows_buffer_infos() {
        let buffer = Buffer::new(Handle::unowned(vk::Buffer::from_raw(21)), 256);
        let set = DescriptorSet::new(vk::DescriptorSet::from_raw(5), pool(7));

        let write = WriteDescriptorSet::new()
            .dst_set(&set)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
            .buffer_info(&[
                DescriptorBufferInfo::new(&buffer, 0, 128),
                DescriptorBufferInfo::new(&buffer, 128, vk::WHOLE_SIZE),
            ]);
        let copy = write.clone();
        drop(write);

        let raw = copy.raw();
        assert_eq!(raw.descriptor_count, 2);
        assert_eq!(raw.dst_set, vk::DescriptorSet::from_raw(5));
        let second = unsafe { *raw.p_buffer_info.add(1) };
        assert_eq!(second.offset, 128);
        assert_eq!(second.range, vk::WHOLE_SIZE);
    }
}
