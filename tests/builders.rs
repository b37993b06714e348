// Builders assembled through the public API, the way an application
// describes a frame's resources. None of these need a GPU.

use prime_vulkan::vk;
use prime_vulkan::{
    AttachmentDescription, AttachmentReference, ColorBlendAttachmentState,
    ColorBlendStateCreateInfo, DeviceCreateInfo, DynamicStateCreateInfo, Error,
    GraphicsPipelineCreateInfo, InputAssemblyStateCreateInfo, InstanceCreateInfo,
    ApplicationInfo, QueueCreateInfo, RasterizationStateCreateInfo, RenderPassCreateInfo,
    SubpassDependency, SubpassDescription, VertexInputStateCreateInfo, ViewportStateCreateInfo,
};
use std::ffi::CStr;

fn triangle_pipeline() -> GraphicsPipelineCreateInfo {
    let binding = vk::VertexInputBindingDescription {
        binding: 0,
        stride: 20,
        input_rate: vk::VertexInputRate::VERTEX,
    };
    let attributes = [
        vk::VertexInputAttributeDescription {
            location: 0,
            binding: 0,
            format: vk::Format::R32G32_SFLOAT,
            offset: 0,
        },
        vk::VertexInputAttributeDescription {
            location: 1,
            binding: 0,
            format: vk::Format::R32G32B32_SFLOAT,
            offset: 8,
        },
    ];

    GraphicsPipelineCreateInfo::new()
        .vertex_input_state(
            VertexInputStateCreateInfo::new()
                .vertex_binding_descriptions(&[binding])
                .vertex_attribute_descriptions(&attributes),
        )
        .input_assembly_state(
            InputAssemblyStateCreateInfo::new().topology(vk::PrimitiveTopology::TRIANGLE_LIST),
        )
        .viewport_state(ViewportStateCreateInfo::new().viewport_count(1).scissor_count(1))
        .rasterization_state(
            RasterizationStateCreateInfo::new()
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(1.0),
        )
        .color_blend_state(
            ColorBlendStateCreateInfo::new()
                .attachments(&[ColorBlendAttachmentState::new().blend_enable(false)]),
        )
        .dynamic_state(
            DynamicStateCreateInfo::new()
                .dynamic_states(&[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]),
        )
        .subpass(0)
}

#[test]
fn pipeline_description_survives_moves() {
    // Build in a helper, then move through a Vec as create_graphics_pipelines expects
    let infos = vec![triangle_pipeline(), triangle_pipeline().clone()];

    for info in &infos {
        let raw = info.raw();

        let vertex_input = unsafe { &*raw.p_vertex_input_state };
        assert_eq!(vertex_input.vertex_binding_description_count, 1);
        assert_eq!(vertex_input.vertex_attribute_description_count, 2);
        let attributes = unsafe {
            std::slice::from_raw_parts(vertex_input.p_vertex_attribute_descriptions, 2)
        };
        assert_eq!(attributes[1].format, vk::Format::R32G32B32_SFLOAT);
        assert_eq!(attributes[1].offset, 8);

        let dynamic = unsafe { &*raw.p_dynamic_state };
        let states =
            unsafe { std::slice::from_raw_parts(dynamic.p_dynamic_states, 2) };
        assert_eq!(states, &[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]);

        let blend = unsafe { &*raw.p_color_blend_state };
        assert_eq!(blend.attachment_count, 1);

        assert!(raw.p_depth_stencil_state.is_null());
        assert!(raw.p_multisample_state.is_null());
        assert_eq!(raw.stage_count, 0);
    }
}

#[test]
fn render_pass_with_depth_subpass() {
    let color = AttachmentDescription::new()
        .format(vk::Format::B8G8R8A8_SRGB)
        .load_op(vk::AttachmentLoadOp::CLEAR)
        .final_layout(vk::ImageLayout::PRESENT_SRC_KHR);
    let depth = AttachmentDescription::new()
        .format(vk::Format::D32_SFLOAT)
        .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);

    let subpass = SubpassDescription::new()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&[AttachmentReference::new(
            0,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        )])
        .depth_stencil_attachment(AttachmentReference::new(
            1,
            vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ));

    let dependency = SubpassDependency::new().subpass_src_dst(vk::SUBPASS_EXTERNAL, 0);

    let info = RenderPassCreateInfo::new()
        .attachments(&[color, depth])
        .subpasses(&[subpass])
        .dependencies(&[dependency]);
    let info = info.clone();
    let raw = info.raw();

    assert_eq!(raw.attachment_count, 2);
    assert_eq!(raw.subpass_count, 1);
    assert_eq!(raw.dependency_count, 1);

    let subpass = unsafe { &*raw.p_subpasses };
    assert_eq!(subpass.color_attachment_count, 1);
    let depth_ref = unsafe { &*subpass.p_depth_stencil_attachment };
    assert_eq!(depth_ref.attachment, 1);

    let dependency = unsafe { &*raw.p_dependencies };
    assert_eq!(dependency.src_subpass, vk::SUBPASS_EXTERNAL);
}

#[test]
fn instance_description_lists_names() {
    let info = InstanceCreateInfo::new()
        .application_info(
            ApplicationInfo::new()
                .application_name("builders")
                .unwrap()
                .api_version(vk::API_VERSION_1_1),
        )
        .enabled_extension_names(&["VK_KHR_surface", "VK_KHR_wayland_surface"])
        .unwrap()
        .enabled_layer_names(&["VK_LAYER_KHRONOS_validation"])
        .unwrap();

    let raw = info.raw();
    assert_eq!(raw.enabled_extension_count, 2);
    assert_eq!(raw.enabled_layer_count, 1);

    let second = unsafe { CStr::from_ptr(*raw.pp_enabled_extension_names.add(1)) };
    assert_eq!(second.to_str().unwrap(), "VK_KHR_wayland_surface");

    let app = unsafe { &*raw.p_application_info };
    assert_eq!(app.api_version, vk::API_VERSION_1_1);
    let name = unsafe { CStr::from_ptr(app.p_application_name) };
    assert_eq!(name.to_str().unwrap(), "builders");
}

#[test]
fn interior_nul_is_rejected() {
    let err = DeviceCreateInfo::new()
        .enabled_extension_names(&["VK_KHR_swap\0chain"])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidName(_)));
    assert_eq!(err.vk_result(), None);
}

#[test]
fn device_description_with_two_families() {
    let queues = [
        QueueCreateInfo::new()
            .queue_family_index(0)
            .queue_priorities(&[1.0]),
        QueueCreateInfo::new()
            .queue_family_index(2)
            .queue_priorities(&[1.0, 0.5]),
    ];

    let info = DeviceCreateInfo::new()
        .queue_create_infos(&queues)
        .enabled_extension_names(&["VK_KHR_swapchain"])
        .unwrap();
    drop(queues);

    let raw = info.raw();
    assert_eq!(raw.queue_create_info_count, 2);
    let second = unsafe { &*raw.p_queue_create_infos.add(1) };
    assert_eq!(second.queue_family_index, 2);
    assert_eq!(second.queue_count, 2);
    let priorities = unsafe { std::slice::from_raw_parts(second.p_queue_priorities, 2) };
    assert_eq!(priorities, &[1.0, 0.5]);

    assert_eq!(info.extension_names().collect::<Vec<_>>(), ["VK_KHR_swapchain"]);
}
