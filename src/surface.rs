// Presentation surfaces and their queried properties.

use ash::vk;
use std::ffi::c_void;

use crate::handle::Handle;

/// A `VkSurfaceKHR`, destroyed when the last clone drops.
#[derive(Clone, Debug)]
pub struct Surface {
    handle: Handle<vk::SurfaceKHR>,
}

impl Surface {
    pub(crate) fn new(handle: Handle<vk::SurfaceKHR>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::SurfaceKHR {
        self.handle.raw()
    }
}

/// Builder for `VkWaylandSurfaceCreateInfoKHR`.
#[derive(Debug, Clone, Copy)]
pub struct WaylandSurfaceCreateInfo {
    info: vk::WaylandSurfaceCreateInfoKHR,
}

impl WaylandSurfaceCreateInfo {
    pub fn new(display: *mut c_void, surface: *mut c_void) -> Self {
        Self {
            info: vk::WaylandSurfaceCreateInfoKHR {
                display: display as *mut vk::wl_display,
                surface: surface as *mut vk::wl_surface,
                ..Default::default()
            },
        }
    }

    pub fn display(mut self, display: *mut c_void) -> Self {
        self.info.display = display as *mut vk::wl_display;
        self
    }

    pub fn surface(mut self, surface: *mut c_void) -> Self {
        self.info.surface = surface as *mut vk::wl_surface;
        self
    }

    pub fn raw(&self) -> &vk::WaylandSurfaceCreateInfoKHR {
        &self.info
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SurfaceCapabilities {
    raw: vk::SurfaceCapabilitiesKHR,
}

impl SurfaceCapabilities {
    pub fn from_raw(raw: vk::SurfaceCapabilitiesKHR) -> Self {
        Self { raw }
    }

    pub fn current_transform(&self) -> vk::SurfaceTransformFlagsKHR {
        self.raw.current_transform
    }

    pub fn supported_composite_alpha(&self) -> vk::CompositeAlphaFlagsKHR {
        self.raw.supported_composite_alpha
    }

    pub fn min_image_count(&self) -> u32 {
        self.raw.min_image_count
    }

    /// Zero means no upper limit.
    pub fn max_image_count(&self) -> u32 {
        self.raw.max_image_count
    }

    pub fn current_extent(&self) -> vk::Extent2D {
        self.raw.current_extent
    }

    pub fn min_image_extent(&self) -> vk::Extent2D {
        self.raw.min_image_extent
    }

    pub fn max_image_extent(&self) -> vk::Extent2D {
        self.raw.max_image_extent
    }

    /// The surface's fixed extent if it has one, otherwise the window size
    /// clamped to the supported range.
    pub fn choose_extent(&self, width: u32, height: u32) -> vk::Extent2D {
        if self.raw.current_extent.width != u32::MAX {
            return self.raw.current_extent;
        }

        let min = self.raw.min_image_extent;
        let max = self.raw.max_image_extent;
        vk::Extent2D {
            width: width.clamp(min.width, max.width.max(min.width)),
            height: height.clamp(min.height, max.height.max(min.height)),
        }
    }

    /// One image more than the minimum, capped by the maximum.
    pub fn choose_image_count(&self) -> u32 {
        let desired = self.raw.min_image_count + 1;
        if self.raw.max_image_count > 0 {
            desired.min(self.raw.max_image_count)
        } else {
            desired
        }
    }

    pub fn raw(&self) -> &vk::SurfaceCapabilitiesKHR {
        &self.raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFormat {
    raw: vk::SurfaceFormatKHR,
}

impl SurfaceFormat {
    pub fn from_raw(raw: vk::SurfaceFormatKHR) -> Self {
        Self { raw }
    }

    pub fn format(&self) -> vk::Format {
        self.raw.format
    }

    pub fn color_space(&self) -> vk::ColorSpaceKHR {
        self.raw.color_space
    }

    pub fn raw(&self) -> &vk::SurfaceFormatKHR {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities(current: (u32, u32), min_count: u32, max_count: u32) -> SurfaceCapabilities {
        SurfaceCapabilities::from_raw(vk::SurfaceCapabilitiesKHR {
            min_image_count: min_count,
            max_image_count: max_count,
            current_extent: vk::Extent2D {
                width: current.0,
                height: current.1,
            },
            min_image_extent: vk::Extent2D {
                width: 1,
                height: 1,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 2048,
            },
            ..Default::default()
        })
    }

    #[test]
    fn fixed_extent_wins() {
        let caps = capabilities((800, 600), 2, 8);
        let extent = caps.choose_extent(1920, 1080);
        assert_eq!((extent.width, extent.height), (800, 600));
    }

    #[test]
    fn window_size_is_clamped() {
        let caps = capabilities((u32::MAX, u32::MAX), 2, 8);
        let extent = caps.choose_extent(5000, 0);
        assert_eq!((extent.width, extent.height), (4096, 1));

        let extent = caps.choose_extent(800, 600);
        assert_eq!((extent.width, extent.height), (800, 600));
    }

    #[test]
    fn image_count_respects_maximum() {
        assert_eq!(capabilities((1, 1), 2, 8).choose_image_count(), 3);
        assert_eq!(capabilities((1, 1), 3, 3).choose_image_count(), 3);
        assert_eq!(capabilities((1, 1), 2, 0).choose_image_count(), 3);
    }

    #[test]
    fn wayland_info_stores_pointers() {
        let mut display = 0u8;
        let mut surface = 0u8;
        let info = WaylandSurfaceCreateInfo::new(
            &mut display as *mut u8 as *mut c_void,
            &mut surface as *mut u8 as *mut c_void,
        );
        assert_eq!(info.raw().display as *mut u8, &mut display as *mut u8);
        assert_eq!(info.raw().surface as *mut u8, &mut surface as *mut u8);
    }
}
