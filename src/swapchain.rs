// Swapchains, their images, and image views

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::handle::Handle;
use crate::surface::Surface;

/// Builder for `VkSwapchainCreateInfoKHR`.
///
/// Holds on to the target surface so a swapchain created from it keeps the
/// surface alive. The retired swapchain is held until the builder drops.
#[derive(Debug)]
pub struct SwapchainCreateInfo {
    info: vk::SwapchainCreateInfoKHR,
    queue_family_indices: Vec<u32>,
    surface: Option<Surface>,
    old_swapchain: Option<Swapchain>,
}

impl SwapchainCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::SwapchainCreateInfoKHR {
                image_array_layers: 1,
                image_usage: vk::ImageUsageFlags::COLOR_ATTACHMENT,
                image_sharing_mode: vk::SharingMode::EXCLUSIVE,
                composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
                present_mode: vk::PresentModeKHR::FIFO,
                clipped: vk::TRUE,
                ..Default::default()
            },
            queue_family_indices: Vec::new(),
            surface: None,
            old_swapchain: None,
        }
    }

    pub fn surface(mut self, surface: &Surface) -> Self {
        self.info.surface = surface.c_ptr();
        self.surface = Some(surface.clone());
        self
    }

    pub fn min_image_count(mut self, count: u32) -> Self {
        self.info.min_image_count = count;
        self
    }

    pub fn image_format(mut self, format: vk::Format) -> Self {
        self.info.image_format = format;
        self
    }

    pub fn image_color_space(mut self, color_space: vk::ColorSpaceKHR) -> Self {
        self.info.image_color_space = color_space;
        self
    }

    pub fn image_extent(mut self, extent: vk::Extent2D) -> Self {
        self.info.image_extent = extent;
        self
    }

    pub fn image_array_layers(mut self, layers: u32) -> Self {
        self.info.image_array_layers = layers;
        self
    }

    pub fn image_usage(mut self, usage: vk::ImageUsageFlags) -> Self {
        self.info.image_usage = usage;
        self
    }

    pub fn image_sharing_mode(mut self, mode: vk::SharingMode) -> Self {
        self.info.image_sharing_mode = mode;
        self
    }

    /// Only consulted with `vk::SharingMode::CONCURRENT`.
    pub fn queue_family_indices(mut self, indices: &[u32]) -> Self {
        self.queue_family_indices = indices.to_vec();
        self.repoint();
        self
    }

    pub fn pre_transform(mut self, transform: vk::SurfaceTransformFlagsKHR) -> Self {
        self.info.pre_transform = transform;
        self
    }

    pub fn composite_alpha(mut self, alpha: vk::CompositeAlphaFlagsKHR) -> Self {
        self.info.composite_alpha = alpha;
        self
    }

    pub fn present_mode(mut self, mode: vk::PresentModeKHR) -> Self {
        self.info.present_mode = mode;
        self
    }

    pub fn clipped(mut self, clipped: bool) -> Self {
        self.info.clipped = clipped.into();
        self
    }

    pub fn old_swapchain(mut self, old: &Swapchain) -> Self {
        self.info.old_swapchain = old.c_ptr();
        self.old_swapchain = Some(old.clone());
        self
    }

    pub(crate) fn target_surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn raw(&self) -> &vk::SwapchainCreateInfoKHR {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.queue_family_index_count = count(&self.queue_family_indices);
        self.info.p_queue_family_indices = ptr_or_null(&self.queue_family_indices);
    }
}

impl Default for SwapchainCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SwapchainCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            queue_family_indices: self.queue_family_indices.clone(),
            surface: self.surface.clone(),
            old_swapchain: self.old_swapchain.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct Swapchain {
    handle: Handle<vk::SwapchainKHR>,
    format: vk::Format,
    extent: vk::Extent2D,
    _surface: Option<Surface>,
}

impl Swapchain {
    pub(crate) fn new(handle: Handle<vk::SwapchainKHR>, info: &SwapchainCreateInfo) -> Self {
        Self {
            handle,
            format: info.raw().image_format,
            extent: info.raw().image_extent,
            _surface: info.target_surface().cloned(),
        }
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn c_ptr(&self) -> vk::SwapchainKHR {
        self.handle.raw()
    }
}

/// A presentable image. Owned by its swapchain, which it keeps alive.
#[derive(Debug, Clone)]
pub struct Image {
    handle: Handle<vk::Image>,
    _swapchain: Swapchain,
}

impl Image {
    pub(crate) fn new(raw: vk::Image, swapchain: &Swapchain) -> Self {
        Self {
            handle: Handle::unowned(raw),
            _swapchain: swapchain.clone(),
        }
    }

    pub fn c_ptr(&self) -> vk::Image {
        self.handle.raw()
    }
}

/// Builder for `VkImageViewCreateInfo`. Defaults to a 2D color view of one
/// mip level and one layer.
#[derive(Debug, Clone, Copy)]
pub struct ImageViewCreateInfo {
    info: vk::ImageViewCreateInfo,
}

impl ImageViewCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::ImageViewCreateInfo {
                view_type: vk::ImageViewType::TYPE_2D,
                components: vk::ComponentMapping {
                    r: vk::ComponentSwizzle::IDENTITY,
                    g: vk::ComponentSwizzle::IDENTITY,
                    b: vk::ComponentSwizzle::IDENTITY,
                    a: vk::ComponentSwizzle::IDENTITY,
                },
                subresource_range: vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                },
                ..Default::default()
            },
        }
    }

    pub fn image(mut self, image: &Image) -> Self {
        self.info.image = image.c_ptr();
        self
    }

    pub fn view_type(mut self, view_type: vk::ImageViewType) -> Self {
        self.info.view_type = view_type;
        self
    }

    pub fn format(mut self, format: vk::Format) -> Self {
        self.info.format = format;
        self
    }

    pub fn components(mut self, components: vk::ComponentMapping) -> Self {
        self.info.components = components;
        self
    }

    pub fn subresource_range(mut self, range: vk::ImageSubresourceRange) -> Self {
        self.info.subresource_range = range;
        self
    }

    pub fn raw(&self) -> &vk::ImageViewCreateInfo {
        &self.info
    }
}

impl Default for ImageViewCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ImageView {
    handle: Handle<vk::ImageView>,
}

impl ImageView {
    pub(crate) fn new(handle: Handle<vk::ImageView>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::ImageView {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle as _;

    #[test]
    fn swapchain_defaults() {
        let info = SwapchainCreateInfo::new();
        let raw = info.raw();
        assert_eq!(raw.image_array_layers, 1);
        assert_eq!(raw.image_sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert_eq!(raw.clipped, vk::TRUE);
        assert_eq!(raw.queue_family_index_count, 0);
        assert!(raw.p_queue_family_indices.is_null());
        assert!(info.target_surface().is_none());
    }

    #[test]
    fn swapchain_queue_families_survive_clone() {
        let info = SwapchainCreateInfo::new()
            .image_sharing_mode(vk::SharingMode::CONCURRENT)
            .queue_family_indices(&[1, 3])
            .clipped(false)
            .image_extent(vk::Extent2D {
                width: 800,
                height: 600,
            });
        let copy = info.clone();
        drop(info);

        let raw = copy.raw();
        assert_eq!(raw.queue_family_index_count, 2);
        let indices = unsafe { std::slice::from_raw_parts(raw.p_queue_family_indices, 2) };
        assert_eq!(indices, &[1, 3]);
        assert_eq!(raw.clipped, vk::FALSE);
        assert_eq!(raw.image_extent.width, 800);
    }

    #[test]
    fn image_view_defaults_to_color_2d() {
        let info = ImageViewCreateInfo::new().format(vk::Format::B8G8R8A8_SRGB);
        let raw = info.raw();
        assert_eq!(raw.view_type, vk::ImageViewType::TYPE_2D);
        assert_eq!(raw.subresource_range.aspect_mask, vk::ImageAspectFlags::COLOR);
        assert_eq!(raw.subresource_range.level_count, 1);
        assert_eq!(raw.format, vk::Format::B8G8R8A8_SRGB);
    }

    #[test]
    fn builder_keeps_old_swapchain_alive() {
        let old = Swapchain::new(
            Handle::unowned(vk::SwapchainKHR::from_raw(9)),
            &SwapchainCreateInfo::new(),
        );
        assert_eq!(old.handle.owner_count(), 1);

        let info = SwapchainCreateInfo::new().old_swapchain(&old);
        let copy = info.clone();
        assert_eq!(old.handle.owner_count(), 3);
        assert_eq!(copy.raw().old_swapchain, old.c_ptr());

        drop(info);
        drop(copy);
        assert_eq!(old.handle.owner_count(), 1);
    }
}
