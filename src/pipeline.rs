// Graphics pipelines and pipeline layouts
//
// Every fixed-function stage has its own builder. `GraphicsPipelineCreateInfo`
// takes ownership of the stage builders it is given and points the final
// `VkGraphicsPipelineCreateInfo` at them.

use ash::vk;
use std::ffi::CString;

use crate::base::{count, ptr_or_null};
use crate::descriptor::DescriptorSetLayout;
use crate::error::{Error, Result};
use crate::handle::Handle;
use crate::render_pass::RenderPass;
use crate::shader_module::ShaderModule;

/// Builder for `VkPipelineShaderStageCreateInfo`. The entry point defaults
/// to `main`.
#[derive(Debug)]
pub struct ShaderStageCreateInfo {
    info: vk::PipelineShaderStageCreateInfo,
    name: CString,
}

impl ShaderStageCreateInfo {
    pub fn new() -> Self {
        let mut stage = Self {
            info: vk::PipelineShaderStageCreateInfo::default(),
            name: CString::from(c"main"),
        };
        stage.repoint();
        stage
    }

    pub fn stage(mut self, stage: vk::ShaderStageFlags) -> Self {
        self.info.stage = stage;
        self
    }

    pub fn module(mut self, module: &ShaderModule) -> Self {
        self.info.module = module.c_ptr();
        self
    }

    pub fn name(mut self, name: &str) -> Result<Self> {
        self.name = CString::new(name).map_err(|_| Error::InvalidName(name.to_string()))?;
        self.repoint();
        Ok(self)
    }

    pub fn raw(&self) -> &vk::PipelineShaderStageCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.p_name = self.name.as_ptr();
    }
}

impl Default for ShaderStageCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ShaderStageCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            name: self.name.clone(),
        };
        copy.repoint();
        copy
    }
}

/// States that are set on the command buffer instead of baked into the
/// pipeline.
#[derive(Debug, Default)]
pub struct DynamicStateCreateInfo {
    info: vk::PipelineDynamicStateCreateInfo,
    states: Vec<vk::DynamicState>,
}

impl DynamicStateCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dynamic_states(mut self, states: &[vk::DynamicState]) -> Self {
        self.states = states.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::PipelineDynamicStateCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.dynamic_state_count = count(&self.states);
        self.info.p_dynamic_states = ptr_or_null(&self.states);
    }
}

impl Clone for DynamicStateCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            states: self.states.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Default)]
pub struct VertexInputStateCreateInfo {
    info: vk::PipelineVertexInputStateCreateInfo,
    bindings: Vec<vk::VertexInputBindingDescription>,
    attributes: Vec<vk::VertexInputAttributeDescription>,
}

impl VertexInputStateCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_binding_descriptions(
        mut self,
        bindings: &[vk::VertexInputBindingDescription],
    ) -> Self {
        self.bindings = bindings.to_vec();
        self.repoint();
        self
    }

    pub fn vertex_attribute_descriptions(
        mut self,
        attributes: &[vk::VertexInputAttributeDescription],
    ) -> Self {
        self.attributes = attributes.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::PipelineVertexInputStateCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.vertex_binding_description_count = count(&self.bindings);
        self.info.p_vertex_binding_descriptions = ptr_or_null(&self.bindings);
        self.info.vertex_attribute_description_count = count(&self.attributes);
        self.info.p_vertex_attribute_descriptions = ptr_or_null(&self.attributes);
    }
}

impl Clone for VertexInputStateCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            bindings: self.bindings.clone(),
            attributes: self.attributes.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InputAssemblyStateCreateInfo {
    info: vk::PipelineInputAssemblyStateCreateInfo,
}

impl InputAssemblyStateCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::PipelineInputAssemblyStateCreateInfo {
                topology: vk::PrimitiveTopology::TRIANGLE_LIST,
                ..Default::default()
            },
        }
    }

    pub fn topology(mut self, topology: vk::PrimitiveTopology) -> Self {
        self.info.topology = topology;
        self
    }

    pub fn primitive_restart_enable(mut self, enable: bool) -> Self {
        self.info.primitive_restart_enable = enable.into();
        self
    }

    pub fn raw(&self) -> &vk::PipelineInputAssemblyStateCreateInfo {
        &self.info
    }
}

impl Default for InputAssemblyStateCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Either counts only (viewport and scissor are dynamic) or static lists,
/// in which case the counts follow the lists.
#[derive(Debug, Default)]
pub struct ViewportStateCreateInfo {
    info: vk::PipelineViewportStateCreateInfo,
    viewports: Vec<vk::Viewport>,
    scissors: Vec<vk::Rect2D>,
}

impl ViewportStateCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport_count(mut self, count: u32) -> Self {
        self.viewports.clear();
        self.repoint();
        self.info.viewport_count = count;
        self
    }

    pub fn scissor_count(mut self, count: u32) -> Self {
        self.scissors.clear();
        self.repoint();
        self.info.scissor_count = count;
        self
    }

    pub fn viewports(mut self, viewports: &[vk::Viewport]) -> Self {
        self.viewports = viewports.to_vec();
        self.repoint();
        self.info.viewport_count = count(&self.viewports);
        self
    }

    pub fn scissors(mut self, scissors: &[vk::Rect2D]) -> Self {
        self.scissors = scissors.to_vec();
        self.repoint();
        self.info.scissor_count = count(&self.scissors);
        self
    }

    pub fn raw(&self) -> &vk::PipelineViewportStateCreateInfo {
        &self.info
    }

    // Counts are left alone: with dynamic state they are set without lists.
    fn repoint(&mut self) {
        self.info.p_viewports = ptr_or_null(&self.viewports);
        self.info.p_scissors = ptr_or_null(&self.scissors);
    }
}

impl Clone for ViewportStateCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            viewports: self.viewports.clone(),
            scissors: self.scissors.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RasterizationStateCreateInfo {
    info: vk::PipelineRasterizationStateCreateInfo,
}

impl RasterizationStateCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::PipelineRasterizationStateCreateInfo {
                polygon_mode: vk::PolygonMode::FILL,
                line_width: 1.0,
                cull_mode: vk::CullModeFlags::BACK,
                front_face: vk::FrontFace::CLOCKWISE,
                ..Default::default()
            },
        }
    }

    pub fn depth_clamp_enable(mut self, enable: bool) -> Self {
        self.info.depth_clamp_enable = enable.into();
        self
    }

    pub fn rasterizer_discard_enable(mut self, enable: bool) -> Self {
        self.info.rasterizer_discard_enable = enable.into();
        self
    }

    pub fn polygon_mode(mut self, mode: vk::PolygonMode) -> Self {
        self.info.polygon_mode = mode;
        self
    }

    pub fn line_width(mut self, width: f32) -> Self {
        self.info.line_width = width;
        self
    }

    pub fn cull_mode(mut self, cull_mode: vk::CullModeFlags) -> Self {
        self.info.cull_mode = cull_mode;
        self
    }

    pub fn front_face(mut self, front_face: vk::FrontFace) -> Self {
        self.info.front_face = front_face;
        self
    }

    pub fn depth_bias_enable(mut self, enable: bool) -> Self {
        self.info.depth_bias_enable = enable.into();
        self
    }

    pub fn raw(&self) -> &vk::PipelineRasterizationStateCreateInfo {
        &self.info
    }
}

impl Default for RasterizationStateCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MultisampleStateCreateInfo {
    info: vk::PipelineMultisampleStateCreateInfo,
}

impl MultisampleStateCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::PipelineMultisampleStateCreateInfo {
                rasterization_samples: vk::SampleCountFlags::TYPE_1,
                min_sample_shading: 1.0,
                ..Default::default()
            },
        }
    }

    pub fn sample_shading_enable(mut self, enable: bool) -> Self {
        self.info.sample_shading_enable = enable.into();
        self
    }

    pub fn rasterization_samples(mut self, samples: vk::SampleCountFlags) -> Self {
        self.info.rasterization_samples = samples;
        self
    }

    pub fn raw(&self) -> &vk::PipelineMultisampleStateCreateInfo {
        &self.info
    }
}

impl Default for MultisampleStateCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthStencilStateCreateInfo {
    info: vk::PipelineDepthStencilStateCreateInfo,
}

impl DepthStencilStateCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth_test_enable(mut self, enable: bool) -> Self {
        self.info.depth_test_enable = enable.into();
        self
    }

    pub fn depth_write_enable(mut self, enable: bool) -> Self {
        self.info.depth_write_enable = enable.into();
        self
    }

    pub fn depth_compare_op(mut self, op: vk::CompareOp) -> Self {
        self.info.depth_compare_op = op;
        self
    }

    pub fn depth_bounds_test_enable(mut self, enable: bool) -> Self {
        self.info.depth_bounds_test_enable = enable.into();
        self
    }

    pub fn stencil_test_enable(mut self, enable: bool) -> Self {
        self.info.stencil_test_enable = enable.into();
        self
    }

    pub fn raw(&self) -> &vk::PipelineDepthStencilStateCreateInfo {
        &self.info
    }
}

/// Per-attachment blend state. Defaults to blending disabled with all color
/// components written.
#[derive(Debug, Clone, Copy)]
pub struct ColorBlendAttachmentState {
    state: vk::PipelineColorBlendAttachmentState,
}

impl ColorBlendAttachmentState {
    pub fn new() -> Self {
        Self {
            state: vk::PipelineColorBlendAttachmentState {
                color_write_mask: vk::ColorComponentFlags::RGBA,
                src_color_blend_factor: vk::BlendFactor::ONE,
                dst_color_blend_factor: vk::BlendFactor::ZERO,
                src_alpha_blend_factor: vk::BlendFactor::ONE,
                dst_alpha_blend_factor: vk::BlendFactor::ZERO,
                ..Default::default()
            },
        }
    }

    pub fn blend_enable(mut self, enable: bool) -> Self {
        self.state.blend_enable = enable.into();
        self
    }

    pub fn src_color_blend_factor(mut self, factor: vk::BlendFactor) -> Self {
        self.state.src_color_blend_factor = factor;
        self
    }

    pub fn dst_color_blend_factor(mut self, factor: vk::BlendFactor) -> Self {
        self.state.dst_color_blend_factor = factor;
        self
    }

    pub fn color_blend_op(mut self, op: vk::BlendOp) -> Self {
        self.state.color_blend_op = op;
        self
    }

    pub fn src_alpha_blend_factor(mut self, factor: vk::BlendFactor) -> Self {
        self.state.src_alpha_blend_factor = factor;
        self
    }

    pub fn dst_alpha_blend_factor(mut self, factor: vk::BlendFactor) -> Self {
        self.state.dst_alpha_blend_factor = factor;
        self
    }

    pub fn alpha_blend_op(mut self, op: vk::BlendOp) -> Self {
        self.state.alpha_blend_op = op;
        self
    }

    pub fn color_write_mask(mut self, mask: vk::ColorComponentFlags) -> Self {
        self.state.color_write_mask = mask;
        self
    }

    pub fn raw(&self) -> &vk::PipelineColorBlendAttachmentState {
        &self.state
    }
}

impl Default for ColorBlendAttachmentState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct ColorBlendStateCreateInfo {
    info: vk::PipelineColorBlendStateCreateInfo,
    attachments: Vec<vk::PipelineColorBlendAttachmentState>,
}

impl ColorBlendStateCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` disables the logic op.
    pub fn logic_op(mut self, op: Option<vk::LogicOp>) -> Self {
        match op {
            Some(op) => {
                self.info.logic_op_enable = vk::TRUE;
                self.info.logic_op = op;
            }
            None => {
                self.info.logic_op_enable = vk::FALSE;
                self.info.logic_op = vk::LogicOp::COPY;
            }
        }
        self
    }

    pub fn attachments(mut self, attachments: &[ColorBlendAttachmentState]) -> Self {
        self.attachments = attachments.iter().map(|a| *a.raw()).collect();
        self.repoint();
        self
    }

    pub fn blend_constants(mut self, constants: [f32; 4]) -> Self {
        self.info.blend_constants = constants;
        self
    }

    pub fn raw(&self) -> &vk::PipelineColorBlendStateCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.attachment_count = count(&self.attachments);
        self.info.p_attachments = ptr_or_null(&self.attachments);
    }
}

impl Clone for ColorBlendStateCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            attachments: self.attachments.clone(),
        };
        copy.repoint();
        copy
    }
}

/// Builder for `VkGraphicsPipelineCreateInfo`.
///
/// State builders are boxed so the pointers into them survive moves of the
/// outer builder.
#[derive(Debug, Default)]
pub struct GraphicsPipelineCreateInfo {
    info: vk::GraphicsPipelineCreateInfo,
    stages: Vec<ShaderStageCreateInfo>,
    raw_stages: Vec<vk::PipelineShaderStageCreateInfo>,
    vertex_input_state: Option<Box<VertexInputStateCreateInfo>>,
    input_assembly_state: Option<Box<InputAssemblyStateCreateInfo>>,
    viewport_state: Option<Box<ViewportStateCreateInfo>>,
    rasterization_state: Option<Box<RasterizationStateCreateInfo>>,
    multisample_state: Option<Box<MultisampleStateCreateInfo>>,
    depth_stencil_state: Option<Box<DepthStencilStateCreateInfo>>,
    color_blend_state: Option<Box<ColorBlendStateCreateInfo>>,
    dynamic_state: Option<Box<DynamicStateCreateInfo>>,
}

impl GraphicsPipelineCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(mut self, stages: Vec<ShaderStageCreateInfo>) -> Self {
        self.stages = stages;
        self.repoint();
        self
    }

    pub fn vertex_input_state(mut self, state: VertexInputStateCreateInfo) -> Self {
        self.vertex_input_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn input_assembly_state(mut self, state: InputAssemblyStateCreateInfo) -> Self {
        self.input_assembly_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn viewport_state(mut self, state: ViewportStateCreateInfo) -> Self {
        self.viewport_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn rasterization_state(mut self, state: RasterizationStateCreateInfo) -> Self {
        self.rasterization_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn multisample_state(mut self, state: MultisampleStateCreateInfo) -> Self {
        self.multisample_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn depth_stencil_state(mut self, state: DepthStencilStateCreateInfo) -> Self {
        self.depth_stencil_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn color_blend_state(mut self, state: ColorBlendStateCreateInfo) -> Self {
        self.color_blend_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn dynamic_state(mut self, state: DynamicStateCreateInfo) -> Self {
        self.dynamic_state = Some(Box::new(state));
        self.repoint();
        self
    }

    pub fn layout(mut self, layout: &PipelineLayout) -> Self {
        self.info.layout = layout.c_ptr();
        self
    }

    pub fn render_pass(mut self, render_pass: &RenderPass) -> Self {
        self.info.render_pass = render_pass.c_ptr();
        self
    }

    pub fn subpass(mut self, subpass: u32) -> Self {
        self.info.subpass = subpass;
        self
    }

    pub fn raw(&self) -> &vk::GraphicsPipelineCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        // Each stage's name pointer lives in that stage's own heap buffer.
        self.raw_stages = self.stages.iter().map(|stage| *stage.raw()).collect();
        self.info.stage_count = count(&self.raw_stages);
        self.info.p_stages = ptr_or_null(&self.raw_stages);

        self.info.p_vertex_input_state = state_ptr(&self.vertex_input_state, |s| s.raw());
        self.info.p_input_assembly_state = state_ptr(&self.input_assembly_state, |s| s.raw());
        self.info.p_viewport_state = state_ptr(&self.viewport_state, |s| s.raw());
        self.info.p_rasterization_state = state_ptr(&self.rasterization_state, |s| s.raw());
        self.info.p_multisample_state = state_ptr(&self.multisample_state, |s| s.raw());
        self.info.p_depth_stencil_state = state_ptr(&self.depth_stencil_state, |s| s.raw());
        self.info.p_color_blend_state = state_ptr(&self.color_blend_state, |s| s.raw());
        self.info.p_dynamic_state = state_ptr(&self.dynamic_state, |s| s.raw());
    }
}

fn state_ptr<S, T>(state: &Option<Box<S>>, raw: impl Fn(&S) -> &T) -> *const T {
    state
        .as_deref()
        .map_or(std::ptr::null(), |state| raw(state) as *const T)
}

impl Clone for GraphicsPipelineCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            stages: self.stages.clone(),
            raw_stages: Vec::new(),
            vertex_input_state: self.vertex_input_state.clone(),
            input_assembly_state: self.input_assembly_state.clone(),
            viewport_state: self.viewport_state.clone(),
            rasterization_state: self.rasterization_state.clone(),
            multisample_state: self.multisample_state.clone(),
            depth_stencil_state: self.depth_stencil_state.clone(),
            color_blend_state: self.color_blend_state.clone(),
            dynamic_state: self.dynamic_state.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    handle: Handle<vk::Pipeline>,
}

impl Pipeline {
    pub(crate) fn new(handle: Handle<vk::Pipeline>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::Pipeline {
        self.handle.raw()
    }
}

#[derive(Debug, Default)]
pub struct PipelineLayoutCreateInfo {
    info: vk::PipelineLayoutCreateInfo,
    set_layouts: Vec<vk::DescriptorSetLayout>,
    push_constant_ranges: Vec<vk::PushConstantRange>,
}

impl PipelineLayoutCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layouts(mut self, layouts: &[DescriptorSetLayout]) -> Self {
        self.set_layouts = layouts.iter().map(DescriptorSetLayout::c_ptr).collect();
        self.repoint();
        self
    }

    pub fn push_constant_ranges(mut self, ranges: &[vk::PushConstantRange]) -> Self {
        self.push_constant_ranges = ranges.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::PipelineLayoutCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.set_layout_count = count(&self.set_layouts);
        self.info.p_set_layouts = ptr_or_null(&self.set_layouts);
        self.info.push_constant_range_count = count(&self.push_constant_ranges);
        self.info.p_push_constant_ranges = ptr_or_null(&self.push_constant_ranges);
    }
}

impl Clone for PipelineLayoutCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            set_layouts: self.set_layouts.clone(),
            push_constant_ranges: self.push_constant_ranges.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct PipelineLayout {
    handle: Handle<vk::PipelineLayout>,
}

impl PipelineLayout {
    pub(crate) fn new(handle: Handle<vk::PipelineLayout>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::PipelineLayout {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn shader_stage_entry_defaults_to_main() {
        let stage = ShaderStageCreateInfo::new().stage(vk::ShaderStageFlags::VERTEX);
        let copy = stage.clone();
        drop(stage);
        let name = unsafe { CStr::from_ptr(copy.raw().p_name) };
        assert_eq!(name.to_str().unwrap(), "main");
    }

    #[test]
    fn dynamic_viewport_counts_without_lists() {
        let state = ViewportStateCreateInfo::new()
            .viewport_count(1)
            .scissor_count(1);
        assert_eq!(state.raw().viewport_count, 1);
        assert_eq!(state.raw().scissor_count, 1);
        assert!(state.raw().p_viewports.is_null());
        assert!(state.raw().p_scissors.is_null());
    }

    #[test]
    fn logic_op_toggles_enable() {
        let on = ColorBlendStateCreateInfo::new().logic_op(Some(vk::LogicOp::XOR));
        assert_eq!(on.raw().logic_op_enable, vk::TRUE);
        assert_eq!(on.raw().logic_op, vk::LogicOp::XOR);

        let off = on.logic_op(None);
        assert_eq!(off.raw().logic_op_enable, vk::FALSE);
    }

    #[test]
    fn unset_states_are_null() {
        let info = GraphicsPipelineCreateInfo::new()
            .input_assembly_state(InputAssemblyStateCreateInfo::new());
        assert!(!info.raw().p_input_assembly_state.is_null());
        assert!(info.raw().p_depth_stencil_state.is_null());
        assert!(info.raw().p_dynamic_state.is_null());
        assert!(info.raw().p_stages.is_null());
        assert_eq!(info.raw().stage_count, 0);
    }

    #[test]
    fn static_viewports_set_counts() {
        let extent = vk::Extent2D {
            width: 640,
            height: 480,
        };
        let state = ViewportStateCreateInfo::new()
            .viewports(&[vk::Viewport {
                width: 640.0,
                height: 480.0,
                max_depth: 1.0,
                ..Default::default()
            }])
            .scissors(&[
                vk::Rect2D {
                    extent,
                    ..Default::default()
                },
                vk::Rect2D {
                    offset: vk::Offset2D { x: 10, y: 20 },
                    extent,
                },
            ]);
        let copy = state.clone();
        drop(state);

        let raw = copy.raw();
        assert_eq!(raw.viewport_count, 1);
        assert_eq!(raw.scissor_count, 2);
        assert_eq!(unsafe { (*raw.p_viewports).width }, 640.0);
        let second = unsafe { *raw.p_scissors.add(1) };
        assert_eq!(second.offset.y, 20);

        let dynamic = copy.viewport_count(1);
        assert!(dynamic.raw().p_viewports.is_null());
        assert_eq!(dynamic.raw().scissor_count, 2);
    }
}
