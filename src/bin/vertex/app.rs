// Application state and the winit event handler
//
// `Renderer` owns every Vulkan object. Objects created from the library keep
// their parents alive, so field order only matters for the GPU being idle
// before anything drops (see `Drop for App`).

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use prime_vulkan::base::{format_to_string, present_mode_to_string, queue_flags_to_string};
use prime_vulkan::vk;
use prime_vulkan::{
    required_surface_extensions, ApplicationInfo, AttachmentDescription, AttachmentReference,
    Buffer, BufferCreateInfo, ColorBlendAttachmentState, ColorBlendStateCreateInfo,
    CommandBuffer, CommandBufferAllocateInfo, CommandBufferBeginInfo, CommandPool,
    CommandPoolCreateInfo, DebugMessenger, Device, DeviceCreateInfo, DeviceMemory,
    DynamicStateCreateInfo, Fence, FenceCreateInfo, Framebuffer, FramebufferCreateInfo,
    GraphicsPipelineCreateInfo, ImageView, ImageViewCreateInfo, InputAssemblyStateCreateInfo,
    Instance, InstanceCreateInfo, LayerProperties, MemoryAllocateInfo,
    MultisampleStateCreateInfo, PhysicalDevice, Pipeline, PipelineLayout,
    PipelineLayoutCreateInfo, PresentInfo, Queue, QueueCreateInfo,
    RasterizationStateCreateInfo, RenderPass, RenderPassBeginInfo, RenderPassCreateInfo,
    Semaphore, SemaphoreCreateInfo, ShaderModule, ShaderModuleCreateInfo,
    ShaderStageCreateInfo, SubmitInfo, SubpassDependency, SubpassDescription, Surface,
    SurfaceFormat, Swapchain, SwapchainCreateInfo, VertexInputStateCreateInfo,
    ViewportStateCreateInfo,
};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::path::Path;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::Config;

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Interleaved vertex: position then color
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub pos: Vec2,
    pub color: Vec3,
}

impl Vertex {
    fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<Vertex>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 2] {
        [
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::R32G32_SFLOAT,
                offset: std::mem::offset_of!(Vertex, pos) as u32,
            },
            vk::VertexInputAttributeDescription {
                location: 1,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: std::mem::offset_of!(Vertex, color) as u32,
            },
        ]
    }
}

const VERTICES: [Vertex; 3] = [
    Vertex {
        pos: Vec2::new(0.0, -0.5),
        color: Vec3::new(1.0, 0.0, 0.0),
    },
    Vertex {
        pos: Vec2::new(0.5, 0.5),
        color: Vec3::new(0.0, 1.0, 0.0),
    },
    Vertex {
        pos: Vec2::new(-0.5, 0.5),
        color: Vec3::new(0.0, 0.0, 1.0),
    },
];

/// Sync objects for one frame in flight
struct FrameSync {
    image_available: Semaphore,
    in_flight: Fence,
}

impl FrameSync {
    fn new(device: &Device) -> Result<Self> {
        let semaphore_info = SemaphoreCreateInfo::new();
        // Start signaled so the first wait returns immediately
        let fence_info = FenceCreateInfo::new().flags(vk::FenceCreateFlags::SIGNALED);

        Ok(Self {
            image_available: device.create_semaphore(&semaphore_info)?,
            in_flight: device.create_fence(&fence_info)?,
        })
    }
}

/// Everything that has to be rebuilt when the window size changes.
///
/// `render_finished` is indexed by swapchain image: a present may still be
/// waiting on an image's semaphore when the next frame in flight starts.
struct SwapchainTargets {
    render_finished: Vec<Semaphore>,
    framebuffers: Vec<Framebuffer>,
    _image_views: Vec<ImageView>,
    swapchain: Swapchain,
}

/// Queue family indices chosen for the physical device
#[derive(Debug, Clone, Copy)]
struct QueueFamilies {
    graphics: u32,
    present: u32,
}

/// Swapchain parameters picked once at startup and reused on every resize
#[derive(Debug, Clone, Copy)]
struct SwapchainSettings {
    surface_format: SurfaceFormat,
    present_mode: vk::PresentModeKHR,
    families: QueueFamilies,
}

struct Renderer {
    frames: Vec<FrameSync>,
    command_buffers: Vec<CommandBuffer>,
    targets: SwapchainTargets,
    _vertex_memory: DeviceMemory,
    vertex_buffer: Buffer,
    pipeline: Pipeline,
    _pipeline_layout: PipelineLayout,
    render_pass: RenderPass,
    _command_pool: CommandPool,
    graphics_queue: Queue,
    present_queue: Queue,
    settings: SwapchainSettings,
    device: Device,
    physical_device: PhysicalDevice,
    surface: Surface,
    _debug_messenger: Option<DebugMessenger>,
    _instance: Instance,
    current_frame: usize,
    clear_color: [f32; 4],
}

impl Renderer {
    fn new(config: &Config, window: &Window) -> Result<Self> {
        log::info!("Initializing Vulkan...");

        let display = window
            .display_handle()
            .context("Failed to get display handle")?
            .as_raw();
        let window_handle = window
            .window_handle()
            .context("Failed to get window handle")?
            .as_raw();

        // Step 1: Instance with the surface extensions for this window system
        let enable_validation = config.debug.validation_layers && validation_available();
        let instance = create_instance(&config.window.title, display, enable_validation)?;

        let debug_messenger = if enable_validation {
            Some(instance.create_debug_messenger(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )?)
        } else {
            None
        };

        // Step 2: Surface
        let surface = unsafe { instance.create_surface(display, window_handle) }
            .context("Failed to create surface")?;

        // Step 3: Physical device and queue families
        let (physical_device, families) = pick_physical_device(&instance, &surface)?;
        let properties = physical_device.properties();
        log::info!("Selected GPU: {}", properties.device_name());
        log::info!(
            "API Version: {}.{}.{}",
            vk::api_version_major(properties.api_version()),
            vk::api_version_minor(properties.api_version()),
            vk::api_version_patch(properties.api_version())
        );

        // Step 4: Logical device and queues
        let device = create_device(&physical_device, families)?;
        let graphics_queue = device.queue_for(families.graphics, 0);
        let present_queue = device.queue_for(families.present, 0);

        // Step 5: Surface format and present mode
        let formats = physical_device.surface_formats_for(&surface)?;
        let surface_format = formats
            .iter()
            .copied()
            .find(|f| {
                f.format() == vk::Format::B8G8R8A8_SRGB
                    && f.color_space() == vk::ColorSpaceKHR::SRGB_NONLINEAR
            })
            .or_else(|| formats.first().copied())
            .context("No suitable surface format")?;
        log::info!("Surface format: {}", format_to_string(surface_format.format()));

        let present_modes = physical_device.present_modes_for(&surface)?;
        let wanted = config.present_mode();
        // FIFO is always supported
        let present_mode = if present_modes.contains(&wanted) {
            wanted
        } else {
            vk::PresentModeKHR::FIFO
        };
        log::info!("Present mode: {}", present_mode_to_string(present_mode));

        // Step 6: Render pass and pipeline
        let render_pass = create_render_pass(&device, surface_format.format())?;
        let vert = load_shader(&device, &config.shaders.vertex)?;
        let frag = load_shader(&device, &config.shaders.fragment)?;
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutCreateInfo::new())?;
        let pipeline = create_pipeline(&device, &render_pass, &pipeline_layout, &vert, &frag)?;

        // Step 7: Vertex buffer
        let (vertex_buffer, vertex_memory) = create_vertex_buffer(&device, &physical_device)?;

        // Step 8: Command buffers and per-frame sync
        let command_pool = device.create_command_pool(
            &CommandPoolCreateInfo::new()
                .queue_family_index(families.graphics)
                .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER),
        )?;
        let frames_in_flight = config.graphics.max_frames_in_flight;
        let command_buffers = device.allocate_command_buffers(
            &CommandBufferAllocateInfo::new(&command_pool)
                .command_buffer_count(frames_in_flight as u32),
        )?;
        let frames = (0..frames_in_flight)
            .map(|_| FrameSync::new(&device))
            .collect::<Result<Vec<_>>>()?;

        let settings = SwapchainSettings {
            surface_format,
            present_mode,
            families,
        };
        let size = window.inner_size();
        let targets = create_targets(
            &device,
            &physical_device,
            &surface,
            &render_pass,
            &settings,
            (size.width, size.height),
            None,
        )?;

        log::info!("Vulkan initialized successfully!");

        Ok(Self {
            frames,
            command_buffers,
            targets,
            _vertex_memory: vertex_memory,
            vertex_buffer,
            pipeline,
            _pipeline_layout: pipeline_layout,
            render_pass,
            _command_pool: command_pool,
            graphics_queue,
            present_queue,
            settings,
            device,
            physical_device,
            surface,
            _debug_messenger: debug_messenger,
            _instance: instance,
            current_frame: 0,
            clear_color: config.graphics.clear_color,
        })
    }

    fn recreate_swapchain(&mut self, width: u32, height: u32) -> Result<()> {
        log::info!("Recreating swapchain: {}x{}", width, height);
        self.device.wait_idle()?;

        let targets = create_targets(
            &self.device,
            &self.physical_device,
            &self.surface,
            &self.render_pass,
            &self.settings,
            (width, height),
            Some(&self.targets.swapchain),
        )?;
        // Old image views and framebuffers drop here, after the new chain exists
        self.targets = targets;
        Ok(())
    }

    fn record(&self, command_buffer: &CommandBuffer, image_index: u32) -> Result<()> {
        let extent = self.targets.swapchain.extent();

        command_buffer.begin(&CommandBufferBeginInfo::new())?;

        let clear = vk::ClearValue {
            color: vk::ClearColorValue {
                float32: self.clear_color,
            },
        };
        let begin_info = RenderPassBeginInfo::new()
            .render_pass(&self.render_pass)
            .framebuffer(image_slot(&self.targets.framebuffers, image_index)?)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .clear_values(&[clear]);

        command_buffer.begin_render_pass(&begin_info, vk::SubpassContents::INLINE);
        command_buffer.bind_pipeline(vk::PipelineBindPoint::GRAPHICS, &self.pipeline);

        command_buffer.set_viewport(
            0,
            &[vk::Viewport {
                x: 0.0,
                y: 0.0,
                width: extent.width as f32,
                height: extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            }],
        );
        command_buffer.set_scissor(
            0,
            &[vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            }],
        );

        command_buffer.bind_vertex_buffers(0, &[&self.vertex_buffer], &[0]);
        command_buffer.draw(VERTICES.len() as u32, 1, 0, 0);

        command_buffer.end_render_pass();
        command_buffer.end()?;

        Ok(())
    }

    /// Render one frame. Returns `false` when the swapchain has to be
    /// recreated first.
    fn draw_frame(&mut self) -> Result<bool> {
        let frame = &self.frames[self.current_frame];

        // Step 1: Wait for the frame that last used this slot
        self.device
            .wait_for_fences(&[&frame.in_flight], true, u64::MAX)?;

        // Step 2: Acquire
        let image_index = match self.device.acquire_next_image(
            &self.targets.swapchain,
            u64::MAX,
            Some(&frame.image_available),
            None,
        ) {
            Ok((index, _suboptimal)) => index,
            Err(e) if e.vk_result() == Some(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                return Ok(false);
            }
            Err(e) => return Err(e).context("Failed to acquire swapchain image"),
        };

        // Only reset once work is guaranteed to be submitted
        self.device.reset_fences(&[&frame.in_flight])?;

        let render_finished = image_slot(&self.targets.render_finished, image_index)?;

        // Step 3: Record
        let command_buffer = &self.command_buffers[self.current_frame];
        command_buffer.reset(vk::CommandBufferResetFlags::empty())?;
        self.record(command_buffer, image_index)?;

        // Step 4: Submit
        let submit = SubmitInfo::new()
            .wait_semaphores(&[&frame.image_available])
            .wait_dst_stage_mask(&[vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT])
            .command_buffers(&[command_buffer])
            .signal_semaphores(&[render_finished]);
        self.graphics_queue
            .submit(&[submit], Some(&frame.in_flight))
            .context("Failed to submit draw command buffer")?;

        // Step 5: Present
        let present = PresentInfo::new()
            .wait_semaphores(&[render_finished])
            .swapchains(&[&self.targets.swapchain])
            .image_indices(&[image_index]);
        let up_to_date = match self.present_queue.present(&present) {
            Ok(suboptimal) => !suboptimal,
            Err(e) if e.vk_result() == Some(vk::Result::ERROR_OUT_OF_DATE_KHR) => false,
            Err(e) => return Err(e).context("Failed to present"),
        };

        // Step 6: Advance
        self.current_frame = (self.current_frame + 1) % self.frames.len();

        Ok(up_to_date)
    }
}

/// The per-image entry for a swapchain image index.
fn image_slot<T>(items: &[T], image_index: u32) -> Result<&T> {
    items.get(image_index as usize).with_context(|| {
        format!(
            "Swapchain image index {} out of range ({} images)",
            image_index,
            items.len()
        )
    })
}

fn validation_available() -> bool {
    match LayerProperties::enumerate() {
        Ok(layers) => {
            let found = layers.iter().any(|l| l.layer_name() == VALIDATION_LAYER);
            if !found {
                log::warn!("{} not installed, validation disabled", VALIDATION_LAYER);
            }
            found
        }
        Err(e) => {
            log::warn!("Could not enumerate instance layers: {}", e);
            false
        }
    }
}

fn create_instance(
    app_name: &str,
    display: raw_window_handle::RawDisplayHandle,
    enable_validation: bool,
) -> Result<Instance> {
    let app_info = ApplicationInfo::new()
        .application_name(app_name)?
        .application_version(vk::make_api_version(0, 0, 1, 0))
        .engine_name("prime-vulkan")?
        .engine_version(vk::make_api_version(0, 0, 1, 0))
        .api_version(vk::API_VERSION_1_0);

    let mut extensions: Vec<String> = required_surface_extensions(display)?
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let mut layers = Vec::new();
    if enable_validation {
        extensions.push(
            ash::extensions::ext::DebugUtils::name()
                .to_string_lossy()
                .into_owned(),
        );
        layers.push(VALIDATION_LAYER);
    }

    let info = InstanceCreateInfo::new()
        .application_info(app_info)
        .enabled_extension_names(&extensions)?
        .enabled_layer_names(&layers)?;

    Instance::new(&info).context("Failed to create Vulkan instance")
}

/// First device with a graphics queue and a queue that can present to
/// `surface`.
fn pick_physical_device(
    instance: &Instance,
    surface: &Surface,
) -> Result<(PhysicalDevice, QueueFamilies)> {
    let devices = PhysicalDevice::enumerate(instance)?;
    if devices.is_empty() {
        anyhow::bail!("No Vulkan-capable GPU found");
    }

    for device in devices {
        let families = device.queue_family_properties();
        for (index, family) in families.iter().enumerate() {
            log::debug!(
                "{} family {}: {}",
                device.properties().device_name(),
                index,
                queue_flags_to_string(family.queue_flags())
            );
        }

        let graphics = families
            .iter()
            .position(|f| f.queue_flags().contains(vk::QueueFlags::GRAPHICS));

        let mut present = None;
        for index in 0..families.len() as u32 {
            if device.surface_support_for(index, surface)? {
                present = Some(index);
                break;
            }
        }

        if let (Some(graphics), Some(present)) = (graphics, present) {
            let families = QueueFamilies {
                graphics: graphics as u32,
                present,
            };
            return Ok((device, families));
        }
    }

    anyhow::bail!("No GPU can render and present to this surface")
}

fn create_device(physical_device: &PhysicalDevice, families: QueueFamilies) -> Result<Device> {
    let mut queue_infos = vec![QueueCreateInfo::new()
        .queue_family_index(families.graphics)
        .queue_priorities(&[1.0])];
    if families.present != families.graphics {
        queue_infos.push(
            QueueCreateInfo::new()
                .queue_family_index(families.present)
                .queue_priorities(&[1.0]),
        );
    }

    let swapchain_extension = ash::extensions::khr::Swapchain::name().to_string_lossy();
    let info = DeviceCreateInfo::new()
        .queue_create_infos(&queue_infos)
        .enabled_features(vk::PhysicalDeviceFeatures::default())
        .enabled_extension_names(&[swapchain_extension])?;

    physical_device
        .create_device(&info)
        .context("Failed to create logical device")
}

fn create_render_pass(device: &Device, format: vk::Format) -> Result<RenderPass> {
    let color = AttachmentDescription::new()
        .format(format)
        .samples(vk::SampleCountFlags::TYPE_1)
        .load_op(vk::AttachmentLoadOp::CLEAR)
        .store_op(vk::AttachmentStoreOp::STORE)
        .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
        .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
        .initial_layout(vk::ImageLayout::UNDEFINED)
        .final_layout(vk::ImageLayout::PRESENT_SRC_KHR);

    let subpass = SubpassDescription::new()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&[AttachmentReference::new(
            0,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        )]);

    let dependency = SubpassDependency::new()
        .subpass_src_dst(vk::SUBPASS_EXTERNAL, 0)
        .stage_mask_src_dst(
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
        )
        .access_mask_src_dst(
            vk::AccessFlags::empty(),
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        );

    let info = RenderPassCreateInfo::new()
        .attachments(&[color])
        .subpasses(&[subpass])
        .dependencies(&[dependency]);

    device
        .create_render_pass(&info)
        .context("Failed to create render pass")
}

fn load_shader(device: &Device, path: &Path) -> Result<ShaderModule> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read shader {:?}. Was it compiled?", path))?;
    let info = ShaderModuleCreateInfo::from_spirv_bytes(&bytes)
        .with_context(|| format!("Invalid SPIR-V in {:?}", path))?;

    Ok(device.create_shader_module(&info)?)
}

fn create_pipeline(
    device: &Device,
    render_pass: &RenderPass,
    layout: &PipelineLayout,
    vert: &ShaderModule,
    frag: &ShaderModule,
) -> Result<Pipeline> {
    let stages = vec![
        ShaderStageCreateInfo::new()
            .stage(vk::ShaderStageFlags::VERTEX)
            .module(vert),
        ShaderStageCreateInfo::new()
            .stage(vk::ShaderStageFlags::FRAGMENT)
            .module(frag),
    ];

    let info = GraphicsPipelineCreateInfo::new()
        .stages(stages)
        .vertex_input_state(
            VertexInputStateCreateInfo::new()
                .vertex_binding_descriptions(&[Vertex::binding_description()])
                .vertex_attribute_descriptions(&Vertex::attribute_descriptions()),
        )
        .input_assembly_state(
            InputAssemblyStateCreateInfo::new()
                .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
                .primitive_restart_enable(false),
        )
        // Viewport and scissor are set per frame
        .viewport_state(ViewportStateCreateInfo::new().viewport_count(1).scissor_count(1))
        .rasterization_state(
            RasterizationStateCreateInfo::new()
                .depth_clamp_enable(false)
                .rasterizer_discard_enable(false)
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(1.0)
                .cull_mode(vk::CullModeFlags::BACK)
                .front_face(vk::FrontFace::CLOCKWISE)
                .depth_bias_enable(false),
        )
        .multisample_state(
            MultisampleStateCreateInfo::new()
                .sample_shading_enable(false)
                .rasterization_samples(vk::SampleCountFlags::TYPE_1),
        )
        .color_blend_state(
            ColorBlendStateCreateInfo::new()
                .logic_op(None)
                .attachments(&[ColorBlendAttachmentState::new().blend_enable(false)]),
        )
        .dynamic_state(
            DynamicStateCreateInfo::new()
                .dynamic_states(&[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]),
        )
        .layout(layout)
        .render_pass(render_pass)
        .subpass(0);

    let mut pipelines = device
        .create_graphics_pipelines(&[info])
        .context("Failed to create graphics pipeline")?;

    pipelines.pop().context("Driver returned no pipeline")
}

fn create_vertex_buffer(
    device: &Device,
    physical_device: &PhysicalDevice,
) -> Result<(Buffer, DeviceMemory)> {
    let size = std::mem::size_of_val(&VERTICES) as vk::DeviceSize;

    let buffer = device.create_buffer(
        &BufferCreateInfo::new()
            .size(size)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER)
            .sharing_mode(vk::SharingMode::EXCLUSIVE),
    )?;

    let requirements = device.buffer_memory_requirements(&buffer);
    let memory_type = physical_device
        .memory_properties()
        .find_memory_type(
            requirements.memory_type_bits(),
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )
        .context("Failed to find suitable memory type")?;

    let memory = device.allocate_memory(
        &MemoryAllocateInfo::new()
            .allocation_size(requirements.size())
            .memory_type_index(memory_type),
    )?;
    device.bind_buffer_memory(&buffer, &memory, 0)?;
    memory.write(0, &VERTICES)?;

    Ok((buffer, memory))
}

/// Swapchain, one view per image and one framebuffer per view.
fn create_targets(
    device: &Device,
    physical_device: &PhysicalDevice,
    surface: &Surface,
    render_pass: &RenderPass,
    settings: &SwapchainSettings,
    (width, height): (u32, u32),
    old: Option<&Swapchain>,
) -> Result<SwapchainTargets> {
    let capabilities = physical_device.surface_capabilities_for(surface)?;
    let extent = capabilities.choose_extent(width, height);
    let format = settings.surface_format.format();
    let families = settings.families;

    let mut info = SwapchainCreateInfo::new()
        .surface(surface)
        .min_image_count(capabilities.choose_image_count())
        .image_format(format)
        .image_color_space(settings.surface_format.color_space())
        .image_extent(extent)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
        .pre_transform(capabilities.current_transform())
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(settings.present_mode)
        .clipped(true);

    if families.graphics != families.present {
        info = info
            .image_sharing_mode(vk::SharingMode::CONCURRENT)
            .queue_family_indices(&[families.graphics, families.present]);
    }
    if let Some(old) = old {
        info = info.old_swapchain(old);
    }

    let swapchain = device.create_swapchain(&info)?;

    let image_views = device
        .images_for(&swapchain)?
        .iter()
        .map(|image| device.create_image_view(&ImageViewCreateInfo::new().image(image).format(format)))
        .collect::<prime_vulkan::Result<Vec<_>>>()?;

    let framebuffers = image_views
        .iter()
        .map(|view| {
            device.create_framebuffer(
                &FramebufferCreateInfo::new()
                    .render_pass(render_pass)
                    .attachments(&[view])
                    .width(extent.width)
                    .height(extent.height)
                    .layers(1),
            )
        })
        .collect::<prime_vulkan::Result<Vec<_>>>()?;

    let render_finished = image_views
        .iter()
        .map(|_| device.create_semaphore(&SemaphoreCreateInfo::new()))
        .collect::<prime_vulkan::Result<Vec<_>>>()?;

    log::info!(
        "Swapchain ready: {} images, {}x{}",
        image_views.len(),
        extent.width,
        extent.height
    );

    Ok(SwapchainTargets {
        render_finished,
        framebuffers,
        _image_views: image_views,
        swapchain,
    })
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

pub struct App {
    config: Config,
    renderer: Option<Renderer>,
    window: Option<Arc<Window>>,
    needs_resize: bool,
    is_minimized: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            renderer: None,
            window: None,
            needs_resize: false,
            is_minimized: false,
        }
    }

    fn render(&mut self) -> Result<()> {
        if self.is_minimized {
            return Ok(());
        }
        let (Some(renderer), Some(window)) = (self.renderer.as_mut(), self.window.as_ref()) else {
            return Ok(());
        };

        if self.needs_resize {
            let size = window.inner_size();
            renderer.recreate_swapchain(size.width, size.height)?;
            self.needs_resize = false;
        }

        if !renderer.draw_frame()? {
            self.needs_resize = true;
        }

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {:?}", e);
                event_loop.exit();
                return;
            }
        };

        match Renderer::new(&self.config, &window) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                log::error!("Failed to initialize Vulkan: {:?}", e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Window resized to {}x{}", size.width, size.height);
                if size.width == 0 || size.height == 0 {
                    self.is_minimized = true;
                } else {
                    self.is_minimized = false;
                    self.needs_resize = true;
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    log::error!("Render error: {:?}", e);
                    event_loop.exit();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{KeyCode, PhysicalKey};

                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    log::info!("ESC pressed, exiting...");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        log::info!("Cleaning up Vulkan resources...");

        // Nothing may still be in use on the GPU when the handles drop
        if let Some(ref renderer) = self.renderer {
            if let Err(e) = renderer.device.wait_idle() {
                log::warn!("wait_idle failed during shutdown: {}", e);
            }
        }
        self.renderer = None;

        log::info!("Cleanup complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_attributes_match_layout() {
        let binding = Vertex::binding_description();
        assert_eq!(binding.stride, 20);

        let [pos, color] = Vertex::attribute_descriptions();
        assert_eq!((pos.location, pos.offset), (0, 0));
        assert_eq!((color.location, color.offset), (1, 8));
        assert_eq!(color.format, vk::Format::R32G32B32_SFLOAT);
    }

    #[test]
    fn image_slot_indexes_by_image() {
        let per_image = ["image 0", "image 1", "image 2"];
        for image_index in 0..3u32 {
            let slot = image_slot(&per_image, image_index).unwrap();
            assert_eq!(*slot, per_image[image_index as usize]);
        }

        let err = image_slot(&per_image, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Swapchain image index 3 out of range (3 images)"
        );
    }
}
