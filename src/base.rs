// Shared helpers: enum-to-string conversions used for logging and the
// array plumbing every create-info builder relies on.

use ash::vk;
use std::ffi::{c_char, CString};

use crate::error::{Error, Result};

/// Name of a swapchain-relevant format, or "Unknown".
pub fn format_to_string(format: vk::Format) -> &'static str {
    match format {
        vk::Format::R5G6B5_UNORM_PACK16 => "VK_FORMAT_R5G6B5_UNORM_PACK16",
        vk::Format::R8G8B8A8_UNORM => "VK_FORMAT_R8G8B8A8_UNORM",
        vk::Format::R8G8B8A8_SRGB => "VK_FORMAT_R8G8B8A8_SRGB",
        vk::Format::B8G8R8A8_UNORM => "VK_FORMAT_B8G8R8A8_UNORM",
        vk::Format::B8G8R8A8_SRGB => "VK_FORMAT_B8G8R8A8_SRGB",
        vk::Format::A2R10G10B10_UNORM_PACK32 => "VK_FORMAT_A2R10G10B10_UNORM_PACK32",
        vk::Format::A2B10G10R10_UNORM_PACK32 => "VK_FORMAT_A2B10G10R10_UNORM_PACK32",
        _ => "Unknown",
    }
}

pub fn present_mode_to_string(mode: vk::PresentModeKHR) -> &'static str {
    match mode {
        vk::PresentModeKHR::IMMEDIATE => "VK_PRESENT_MODE_IMMEDIATE_KHR",
        vk::PresentModeKHR::MAILBOX => "VK_PRESENT_MODE_MAILBOX_KHR",
        vk::PresentModeKHR::FIFO => "VK_PRESENT_MODE_FIFO_KHR",
        vk::PresentModeKHR::FIFO_RELAXED => "VK_PRESENT_MODE_FIFO_RELAXED_KHR",
        _ => "Unknown",
    }
}

/// Set bits of a queue family's flags, e.g. "GRAPHICS | COMPUTE".
pub fn queue_flags_to_string(flags: vk::QueueFlags) -> String {
    const NAMES: [(vk::QueueFlags, &str); 5] = [
        (vk::QueueFlags::GRAPHICS, "GRAPHICS"),
        (vk::QueueFlags::COMPUTE, "COMPUTE"),
        (vk::QueueFlags::TRANSFER, "TRANSFER"),
        (vk::QueueFlags::SPARSE_BINDING, "SPARSE_BINDING"),
        (vk::QueueFlags::PROTECTED, "PROTECTED"),
    ];

    let names: Vec<&str> = NAMES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|&(_, name)| name)
        .collect();

    if names.is_empty() {
        "NONE".to_string()
    } else {
        names.join(" | ")
    }
}

/// Pointer to the first element, or null for an empty slice.
pub(crate) fn ptr_or_null<T>(items: &[T]) -> *const T {
    if items.is_empty() {
        std::ptr::null()
    } else {
        items.as_ptr()
    }
}

pub(crate) fn count<T>(items: &[T]) -> u32 {
    items.len() as u32
}

/// Owned list of NUL-terminated names plus the `const char**` view Vulkan
/// wants. The pointer array points into the `CString` heap buffers, so it
/// stays valid when the list moves.
#[derive(Debug, Default)]
pub(crate) struct NameList {
    names: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl NameList {
    pub(crate) fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let names = names
            .iter()
            .map(|name| {
                CString::new(name.as_ref())
                    .map_err(|_| Error::InvalidName(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_cstrings(names))
    }

    pub(crate) fn from_cstrings(names: Vec<CString>) -> Self {
        let pointers = names.iter().map(|name| name.as_ptr()).collect();
        Self { names, pointers }
    }

    pub(crate) fn as_ptr(&self) -> *const *const c_char {
        ptr_or_null(&self.pointers)
    }

    pub(crate) fn count(&self) -> u32 {
        count(&self.pointers)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.to_str().unwrap_or_default())
    }
}

impl Clone for NameList {
    fn clone(&self) -> Self {
        Self::from_cstrings(self.names.clone())
    }
}

/// Converts a fixed-size, NUL-terminated `char` array from a properties
/// struct into an owned string.
pub(crate) fn fixed_cstr_to_string(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_have_names() {
        assert_eq!(
            format_to_string(vk::Format::B8G8R8A8_SRGB),
            "VK_FORMAT_B8G8R8A8_SRGB"
        );
        assert_eq!(
            format_to_string(vk::Format::A2B10G10R10_UNORM_PACK32),
            "VK_FORMAT_A2B10G10R10_UNORM_PACK32"
        );
        assert_eq!(format_to_string(vk::Format::D32_SFLOAT), "Unknown");
    }

    #[test]
    fn present_mode_names() {
        assert_eq!(
            present_mode_to_string(vk::PresentModeKHR::MAILBOX),
            "VK_PRESENT_MODE_MAILBOX_KHR"
        );
        assert_eq!(
            present_mode_to_string(vk::PresentModeKHR::SHARED_DEMAND_REFRESH),
            "Unknown"
        );
    }

    #[test]
    fn queue_flags_join_set_bits() {
        let flags = vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER;
        assert_eq!(queue_flags_to_string(flags), "GRAPHICS | TRANSFER");
        assert_eq!(queue_flags_to_string(vk::QueueFlags::empty()), "NONE");
    }

    #[test]
    fn empty_slices_give_null() {
        let empty: [u32; 0] = [];
        assert!(ptr_or_null(&empty).is_null());
        assert_eq!(count(&empty), 0);

        let values = [1u32, 2, 3];
        assert_eq!(ptr_or_null(&values), values.as_ptr());
        assert_eq!(count(&values), 3);
    }

    #[test]
    fn name_list_survives_clone() {
        let list = NameList::new(&["VK_KHR_surface", "VK_KHR_wayland_surface"]).unwrap();
        let copy = list.clone();
        drop(list);

        assert_eq!(copy.count(), 2);
        let first = unsafe { std::ffi::CStr::from_ptr(*copy.as_ptr()) };
        assert_eq!(first.to_str().unwrap(), "VK_KHR_surface");
        assert_eq!(
            copy.names().collect::<Vec<_>>(),
            vec!["VK_KHR_surface", "VK_KHR_wayland_surface"]
        );
    }

    #[test]
    fn name_list_rejects_interior_nul() {
        assert!(matches!(
            NameList::new(&["bad\0name"]),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn fixed_cstr_stops_at_nul() {
        let mut raw = [0 as c_char; 8];
        for (dst, src) in raw.iter_mut().zip(b"abc") {
            *dst = *src as c_char;
        }
        assert_eq!(fixed_cstr_to_string(&raw), "abc");
    }
}
