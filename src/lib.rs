//! Reference-counted wrappers over the Vulkan API.
//!
//! Handle types (`Instance`, `Device`, `Buffer`, ...) destroy their Vulkan
//! object when the last clone drops, and keep their parent alive until then.
//! Create-info builders own every array they point at, so they can be moved
//! and cloned freely before being passed to a creation call.

pub mod base;
pub mod buffer;
pub mod command_buffer;
pub mod command_pool;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod framebuffer;
pub mod handle;
pub mod instance;
pub mod memory;
pub mod physical_device;
pub mod pipeline;
pub mod queue;
pub mod render_pass;
pub mod shader_module;
pub mod surface;
pub mod swapchain;
pub mod sync;

pub use ash::vk;

pub use buffer::{Buffer, BufferCreateInfo};
pub use command_buffer::{BufferCopy, CommandBuffer, CommandBufferAllocateInfo, CommandBufferBeginInfo};
pub use command_pool::{CommandPool, CommandPoolCreateInfo};
pub use descriptor::{
    DescriptorBufferInfo, DescriptorPool, DescriptorPoolCreateInfo, DescriptorPoolSize,
    DescriptorSet, DescriptorSetAllocateInfo, DescriptorSetLayout, DescriptorSetLayoutBinding,
    DescriptorSetLayoutCreateInfo, WriteDescriptorSet,
};
pub use device::{Device, DeviceCreateInfo, QueueCreateInfo};
pub use error::{Error, Result, VulkanError};
pub use framebuffer::{Framebuffer, FramebufferCreateInfo};
pub use handle::Handle;
pub use instance::{
    required_surface_extensions, ApplicationInfo, DebugMessenger, ExtensionProperties, Instance,
    InstanceCreateInfo, LayerProperties,
};
pub use memory::{DeviceMemory, MemoryAllocateInfo, MemoryRequirements};
pub use physical_device::{
    MemoryProperties, PhysicalDevice, PhysicalDeviceProperties, QueueFamilyProperties,
};
pub use pipeline::{
    ColorBlendAttachmentState, ColorBlendStateCreateInfo, DepthStencilStateCreateInfo,
    DynamicStateCreateInfo, GraphicsPipelineCreateInfo, InputAssemblyStateCreateInfo,
    MultisampleStateCreateInfo, Pipeline, PipelineLayout, PipelineLayoutCreateInfo,
    RasterizationStateCreateInfo, ShaderStageCreateInfo, VertexInputStateCreateInfo,
    ViewportStateCreateInfo,
};
pub use queue::{PresentInfo, Queue, SubmitInfo};
pub use render_pass::{
    AttachmentDescription, AttachmentReference, RenderPass, RenderPassBeginInfo,
    RenderPassCreateInfo, SubpassDependency, SubpassDescription,
};
pub use shader_module::{ShaderModule, ShaderModuleCreateInfo};
pub use surface::{Surface, SurfaceCapabilities, SurfaceFormat, WaylandSurfaceCreateInfo};
pub use swapchain::{Image, ImageView, ImageViewCreateInfo, Swapchain, SwapchainCreateInfo};
pub use sync::{Fence, FenceCreateInfo, Semaphore, SemaphoreCreateInfo};
