// Physical device enumeration and property queries

use ash::vk;
use std::fmt;

use crate::base::{fixed_cstr_to_string, queue_flags_to_string};
use crate::device::{Device, DeviceCreateInfo};
use crate::error::Result;
use crate::instance::Instance;
use crate::surface::{Surface, SurfaceCapabilities, SurfaceFormat};

#[derive(Debug, Clone, Copy)]
pub struct QueueFamilyProperties {
    raw: vk::QueueFamilyProperties,
}

impl QueueFamilyProperties {
    pub fn from_raw(raw: vk::QueueFamilyProperties) -> Self {
        Self { raw }
    }

    pub fn queue_flags(&self) -> vk::QueueFlags {
        self.raw.queue_flags
    }

    pub fn queue_count(&self) -> u32 {
        self.raw.queue_count
    }

    pub fn raw(&self) -> &vk::QueueFamilyProperties {
        &self.raw
    }
}

impl fmt::Display for QueueFamilyProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queue(s): {}",
            self.raw.queue_count,
            queue_flags_to_string(self.raw.queue_flags)
        )
    }
}

/// Memory heaps and types of a physical device.
#[derive(Debug, Clone, Copy)]
pub struct MemoryProperties {
    raw: vk::PhysicalDeviceMemoryProperties,
}

impl MemoryProperties {
    pub fn from_raw(raw: vk::PhysicalDeviceMemoryProperties) -> Self {
        Self { raw }
    }

    pub fn memory_types(&self) -> &[vk::MemoryType] {
        &self.raw.memory_types[..self.raw.memory_type_count as usize]
    }

    pub fn memory_heaps(&self) -> &[vk::MemoryHeap] {
        &self.raw.memory_heaps[..self.raw.memory_heap_count as usize]
    }

    /// First memory type allowed by `type_bits` that has all of `flags`.
    pub fn find_memory_type(&self, type_bits: u32, flags: vk::MemoryPropertyFlags) -> Option<u32> {
        self.memory_types()
            .iter()
            .enumerate()
            .find(|(index, memory_type)| {
                type_bits & (1 << index) != 0 && memory_type.property_flags.contains(flags)
            })
            .map(|(index, _)| index as u32)
    }

    pub fn raw(&self) -> &vk::PhysicalDeviceMemoryProperties {
        &self.raw
    }
}

#[derive(Debug, Clone)]
pub struct PhysicalDeviceProperties {
    device_name: String,
    device_type: vk::PhysicalDeviceType,
    api_version: u32,
    raw: vk::PhysicalDeviceProperties,
}

impl PhysicalDeviceProperties {
    pub fn from_raw(raw: vk::PhysicalDeviceProperties) -> Self {
        Self {
            device_name: fixed_cstr_to_string(&raw.device_name),
            device_type: raw.device_type,
            api_version: raw.api_version,
            raw,
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn device_type(&self) -> vk::PhysicalDeviceType {
        self.device_type
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    pub fn limits(&self) -> &vk::PhysicalDeviceLimits {
        &self.raw.limits
    }
}

/// A GPU visible to an instance. Keeps the instance alive.
#[derive(Clone)]
pub struct PhysicalDevice {
    instance: Instance,
    raw: vk::PhysicalDevice,
}

impl PhysicalDevice {
    pub fn enumerate(instance: &Instance) -> Result<Vec<PhysicalDevice>> {
        let devices = unsafe { instance.ash().enumerate_physical_devices() }?;
        log::info!("Found {} physical device(s)", devices.len());

        Ok(devices
            .into_iter()
            .map(|raw| PhysicalDevice {
                instance: instance.clone(),
                raw,
            })
            .collect())
    }

    pub fn queue_family_properties(&self) -> Vec<QueueFamilyProperties> {
        unsafe {
            self.instance
                .ash()
                .get_physical_device_queue_family_properties(self.raw)
        }
        .into_iter()
        .map(QueueFamilyProperties::from_raw)
        .collect()
    }

    pub fn memory_properties(&self) -> MemoryProperties {
        MemoryProperties::from_raw(unsafe {
            self.instance
                .ash()
                .get_physical_device_memory_properties(self.raw)
        })
    }

    pub fn properties(&self) -> PhysicalDeviceProperties {
        PhysicalDeviceProperties::from_raw(unsafe {
            self.instance.ash().get_physical_device_properties(self.raw)
        })
    }

    pub fn features(&self) -> vk::PhysicalDeviceFeatures {
        unsafe { self.instance.ash().get_physical_device_features(self.raw) }
    }

    pub fn create_device(&self, info: &DeviceCreateInfo) -> Result<Device> {
        Device::new(self, info)
    }

    pub fn surface_capabilities_for(&self, surface: &Surface) -> Result<SurfaceCapabilities> {
        let raw = unsafe {
            self.instance
                .shared
                .surface_loader
                .get_physical_device_surface_capabilities(self.raw, surface.c_ptr())
        }?;
        Ok(SurfaceCapabilities::from_raw(raw))
    }

    pub fn surface_formats_for(&self, surface: &Surface) -> Result<Vec<SurfaceFormat>> {
        let formats = unsafe {
            self.instance
                .shared
                .surface_loader
                .get_physical_device_surface_formats(self.raw, surface.c_ptr())
        }?;
        Ok(formats.into_iter().map(SurfaceFormat::from_raw).collect())
    }

    pub fn present_modes_for(&self, surface: &Surface) -> Result<Vec<vk::PresentModeKHR>> {
        let modes = unsafe {
            self.instance
                .shared
                .surface_loader
                .get_physical_device_surface_present_modes(self.raw, surface.c_ptr())
        }?;
        Ok(modes)
    }

    pub fn surface_support_for(&self, queue_family_index: u32, surface: &Surface) -> Result<bool> {
        let supported = unsafe {
            self.instance
                .shared
                .surface_loader
                .get_physical_device_surface_support(self.raw, queue_family_index, surface.c_ptr())
        }?;
        Ok(supported)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn c_ptr(&self) -> vk::PhysicalDevice {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties() -> MemoryProperties {
        let mut raw = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: 3,
            memory_heap_count: 1,
            ..Default::default()
        };
        raw.memory_types[0].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
        raw.memory_types[1].property_flags =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        raw.memory_types[2].property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE
            | vk::MemoryPropertyFlags::HOST_COHERENT
            | vk::MemoryPropertyFlags::HOST_CACHED;
        // Outside the reported count; never considered.
        raw.memory_types[3].property_flags = vk::MemoryPropertyFlags::LAZILY_ALLOCATED;
        MemoryProperties::from_raw(raw)
    }

    #[test]
    fn find_memory_type_honours_type_bits() {
        let props = memory_properties();
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;

        assert_eq!(props.find_memory_type(0b111, host), Some(1));
        assert_eq!(props.find_memory_type(0b100, host), Some(2));
        assert_eq!(props.find_memory_type(0b001, host), None);
        assert_eq!(
            props.find_memory_type(0b1111, vk::MemoryPropertyFlags::LAZILY_ALLOCATED),
            None
        );
    }

    #[test]
    fn memory_slices_follow_counts() {
        let props = memory_properties();
        assert_eq!(props.memory_types().len(), 3);
        assert_eq!(props.memory_heaps().len(), 1);
    }

    #[test]
    fn queue_family_display() {
        let family = QueueFamilyProperties::from_raw(vk::QueueFamilyProperties {
            queue_flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE,
            queue_count: 16,
            ..Default::default()
        });
        assert_eq!(family.to_string(), "16 queue(s): GRAPHICS | COMPUTE");
    }

    #[test]
    fn queue_family_accessors() {
        let family = QueueFamilyProperties::from_raw(vk::QueueFamilyProperties {
            queue_flags: vk::QueueFlags::TRANSFER,
            queue_count: 2,
            ..Default::default()
        });
        let copy = family;
        assert_eq!(copy.queue_flags(), vk::QueueFlags::TRANSFER);
        assert_eq!(copy.queue_count(), family.raw().queue_count);
    }
}
