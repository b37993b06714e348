// Device memory allocation and host access

use ash::vk;
use std::ffi::c_void;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::handle::Handle;

#[derive(Debug, Clone, Copy)]
pub struct MemoryRequirements {
    raw: vk::MemoryRequirements,
}

impl MemoryRequirements {
    pub fn from_raw(raw: vk::MemoryRequirements) -> Self {
        Self { raw }
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.raw.size
    }

    pub fn alignment(&self) -> vk::DeviceSize {
        self.raw.alignment
    }

    /// Bit `i` is set when memory type `i` can back the resource.
    pub fn memory_type_bits(&self) -> u32 {
        self.raw.memory_type_bits
    }

    pub fn raw(&self) -> &vk::MemoryRequirements {
        &self.raw
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAllocateInfo {
    info: vk::MemoryAllocateInfo,
}

impl MemoryAllocateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocation_size(mut self, size: vk::DeviceSize) -> Self {
        self.info.allocation_size = size;
        self
    }

    pub fn memory_type_index(mut self, index: u32) -> Self {
        self.info.memory_type_index = index;
        self
    }

    pub fn raw(&self) -> &vk::MemoryAllocateInfo {
        &self.info
    }
}

/// A `VkDeviceMemory` allocation, freed when the last clone drops.
#[derive(Clone)]
pub struct DeviceMemory {
    handle: Handle<vk::DeviceMemory>,
    device: Device,
    size: vk::DeviceSize,
}

impl DeviceMemory {
    pub(crate) fn new(handle: Handle<vk::DeviceMemory>, device: Device, size: vk::DeviceSize) -> Self {
        Self {
            handle,
            device,
            size,
        }
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }

    /// Map a range of host-visible memory. Pair with `unmap`.
    pub fn map(&self, offset: vk::DeviceSize, size: vk::DeviceSize) -> Result<*mut c_void> {
        let ptr = unsafe {
            self.device
                .ash()
                .map_memory(self.c_ptr(), offset, size, vk::MemoryMapFlags::empty())
        }?;
        Ok(ptr)
    }

    pub fn unmap(&self) {
        unsafe { self.device.ash().unmap_memory(self.c_ptr()) }
    }

    /// Copy `data` into the allocation at `offset`. The memory must be
    /// host-visible and host-coherent, and not currently mapped.
    pub fn write<T: Copy>(&self, offset: vk::DeviceSize, data: &[T]) -> Result<()> {
        let size = std::mem::size_of_val(data) as vk::DeviceSize;
        check_range(offset, size, self.size)?;
        if size == 0 {
            return Ok(());
        }

        // Byte copy: the mapped pointer is only as aligned as `offset`
        let dst = self.map(offset, size)? as *mut u8;
        unsafe {
            dst.copy_from_nonoverlapping(data.as_ptr() as *const u8, size as usize);
        }
        self.unmap();

        Ok(())
    }

    pub fn c_ptr(&self) -> vk::DeviceMemory {
        self.handle.raw()
    }
}

/// `offset..offset + size` must lie inside an allocation of `capacity` bytes.
fn check_range(
    offset: vk::DeviceSize,
    size: vk::DeviceSize,
    capacity: vk::DeviceSize,
) -> Result<()> {
    match offset.checked_add(size) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(Error::OutOfBounds {
            offset,
            size,
            capacity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_info_fields() {
        let info = MemoryAllocateInfo::new()
            .allocation_size(4096)
            .memory_type_index(3);
        assert_eq!(info.raw().allocation_size, 4096);
        assert_eq!(info.raw().memory_type_index, 3);
        assert_eq!(info.raw().s_type, vk::StructureType::MEMORY_ALLOCATE_INFO);
    }

    #[test]
    fn requirements_accessors() {
        let reqs = MemoryRequirements::from_raw(vk::MemoryRequirements {
            size: 1024,
            alignment: 256,
            memory_type_bits: 0b1010,
        });
        assert_eq!(reqs.size(), 1024);
        assert_eq!(reqs.alignment(), 256);
        assert_eq!(reqs.memory_type_bits(), 0b1010);
    }

    #[test]
    fn range_must_fit_allocation() {
        assert!(check_range(0, 64, 64).is_ok());
        assert!(check_range(2, 16, 64).is_ok());
        assert!(check_range(64, 0, 64).is_ok());

        let err = check_range(60, 8, 64).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds {
                offset: 60,
                size: 8,
                capacity: 64
            }
        ));
        assert_eq!(err.to_string(), "Range 60+8 exceeds allocation of 64 bytes");
    }

    #[test]
    fn range_overflow_is_rejected() {
        let err = check_range(u64::MAX, 1, u64::MAX).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert_eq!(err.vk_result(), None);
    }
}
