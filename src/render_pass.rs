// Render passes: attachments, subpasses, dependencies

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::framebuffer::Framebuffer;
use crate::handle::Handle;

#[derive(Debug, Clone, Copy)]
pub struct AttachmentDescription {
    description: vk::AttachmentDescription,
}

impl AttachmentDescription {
    pub fn new() -> Self {
        Self {
            description: vk::AttachmentDescription {
                samples: vk::SampleCountFlags::TYPE_1,
                ..Default::default()
            },
        }
    }

    pub fn format(mut self, format: vk::Format) -> Self {
        self.description.format = format;
        self
    }

    pub fn samples(mut self, samples: vk::SampleCountFlags) -> Self {
        self.description.samples = samples;
        self
    }

    pub fn load_op(mut self, op: vk::AttachmentLoadOp) -> Self {
        self.description.load_op = op;
        self
    }

    pub fn store_op(mut self, op: vk::AttachmentStoreOp) -> Self {
        self.description.store_op = op;
        self
    }

    pub fn stencil_load_op(mut self, op: vk::AttachmentLoadOp) -> Self {
        self.description.stencil_load_op = op;
        self
    }

    pub fn stencil_store_op(mut self, op: vk::AttachmentStoreOp) -> Self {
        self.description.stencil_store_op = op;
        self
    }

    pub fn initial_layout(mut self, layout: vk::ImageLayout) -> Self {
        self.description.initial_layout = layout;
        self
    }

    pub fn final_layout(mut self, layout: vk::ImageLayout) -> Self {
        self.description.final_layout = layout;
        self
    }

    pub fn raw(&self) -> &vk::AttachmentDescription {
        &self.description
    }
}

impl Default for AttachmentDescription {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentReference {
    reference: vk::AttachmentReference,
}

impl AttachmentReference {
    pub fn new(attachment: u32, layout: vk::ImageLayout) -> Self {
        Self {
            reference: vk::AttachmentReference { attachment, layout },
        }
    }

    pub fn raw(&self) -> &vk::AttachmentReference {
        &self.reference
    }
}

/// Builder for `VkSubpassDescription`. Owns the attachment reference lists.
#[derive(Debug)]
pub struct SubpassDescription {
    description: vk::SubpassDescription,
    input_attachments: Vec<vk::AttachmentReference>,
    color_attachments: Vec<vk::AttachmentReference>,
    depth_stencil_attachment: Option<Box<vk::AttachmentReference>>,
}

impl SubpassDescription {
    pub fn new() -> Self {
        Self {
            description: vk::SubpassDescription {
                pipeline_bind_point: vk::PipelineBindPoint::GRAPHICS,
                ..Default::default()
            },
            input_attachments: Vec::new(),
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
        }
    }

    pub fn pipeline_bind_point(mut self, bind_point: vk::PipelineBindPoint) -> Self {
        self.description.pipeline_bind_point = bind_point;
        self
    }

    pub fn input_attachments(mut self, attachments: &[AttachmentReference]) -> Self {
        self.input_attachments = attachments.iter().map(|a| *a.raw()).collect();
        self.repoint();
        self
    }

    pub fn color_attachments(mut self, attachments: &[AttachmentReference]) -> Self {
        self.color_attachments = attachments.iter().map(|a| *a.raw()).collect();
        self.repoint();
        self
    }

    pub fn depth_stencil_attachment(mut self, attachment: AttachmentReference) -> Self {
        self.depth_stencil_attachment = Some(Box::new(*attachment.raw()));
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::SubpassDescription {
        &self.description
    }

    fn repoint(&mut self) {
        self.description.input_attachment_count = count(&self.input_attachments);
        self.description.p_input_attachments = ptr_or_null(&self.input_attachments);
        self.description.color_attachment_count = count(&self.color_attachments);
        self.description.p_color_attachments = ptr_or_null(&self.color_attachments);
        self.description.p_depth_stencil_attachment = self
            .depth_stencil_attachment
            .as_deref()
            .map_or(std::ptr::null(), |r| r as *const _);
    }
}

impl Default for SubpassDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SubpassDescription {
    fn clone(&self) -> Self {
        let mut copy = Self {
            description: self.description,
            input_attachments: self.input_attachments.clone(),
            color_attachments: self.color_attachments.clone(),
            depth_stencil_attachment: self.depth_stencil_attachment.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubpassDependency {
    dependency: vk::SubpassDependency,
}

impl SubpassDependency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `vk::SUBPASS_EXTERNAL` for operations outside the render pass.
    pub fn subpass_src_dst(mut self, src: u32, dst: u32) -> Self {
        self.dependency.src_subpass = src;
        self.dependency.dst_subpass = dst;
        self
    }

    pub fn stage_mask_src_dst(
        mut self,
        src: vk::PipelineStageFlags,
        dst: vk::PipelineStageFlags,
    ) -> Self {
        self.dependency.src_stage_mask = src;
        self.dependency.dst_stage_mask = dst;
        self
    }

    pub fn access_mask_src_dst(mut self, src: vk::AccessFlags, dst: vk::AccessFlags) -> Self {
        self.dependency.src_access_mask = src;
        self.dependency.dst_access_mask = dst;
        self
    }

    pub fn raw(&self) -> &vk::SubpassDependency {
        &self.dependency
    }
}

/// Builder for `VkRenderPassCreateInfo`.
#[derive(Debug, Default)]
pub struct RenderPassCreateInfo {
    info: vk::RenderPassCreateInfo,
    attachments: Vec<vk::AttachmentDescription>,
    subpasses: Vec<SubpassDescription>,
    raw_subpasses: Vec<vk::SubpassDescription>,
    dependencies: Vec<vk::SubpassDependency>,
}

impl RenderPassCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(mut self, attachments: &[AttachmentDescription]) -> Self {
        self.attachments = attachments.iter().map(|a| *a.raw()).collect();
        self.repoint();
        self
    }

    pub fn subpasses(mut self, subpasses: &[SubpassDescription]) -> Self {
        self.subpasses = subpasses.to_vec();
        self.repoint();
        self
    }

    pub fn dependencies(mut self, dependencies: &[SubpassDependency]) -> Self {
        self.dependencies = dependencies.iter().map(|d| *d.raw()).collect();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::RenderPassCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.raw_subpasses = self.subpasses.iter().map(|s| *s.raw()).collect();

        self.info.attachment_count = count(&self.attachments);
        self.info.p_attachments = ptr_or_null(&self.attachments);
        self.info.subpass_count = count(&self.raw_subpasses);
        self.info.p_subpasses = ptr_or_null(&self.raw_subpasses);
        self.info.dependency_count = count(&self.dependencies);
        self.info.p_dependencies = ptr_or_null(&self.dependencies);
    }
}

impl Clone for RenderPassCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            attachments: self.attachments.clone(),
            subpasses: self.subpasses.clone(),
            raw_subpasses: Vec::new(),
            dependencies: self.dependencies.clone(),
        };
        copy.repoint();
        copy
    }
}

/// Builder for `VkRenderPassBeginInfo`.
#[derive(Default)]
pub struct RenderPassBeginInfo {
    info: vk::RenderPassBeginInfo,
    clear_values: Vec<vk::ClearValue>,
}

impl RenderPassBeginInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_pass(mut self, render_pass: &RenderPass) -> Self {
        self.info.render_pass = render_pass.c_ptr();
        self
    }

    pub fn framebuffer(mut self, framebuffer: &Framebuffer) -> Self {
        self.info.framebuffer = framebuffer.c_ptr();
        self
    }

    pub fn render_area(mut self, area: vk::Rect2D) -> Self {
        self.info.render_area = area;
        self
    }

    pub fn clear_values(mut self, values: &[vk::ClearValue]) -> Self {
        self.clear_values = values.to_vec();
        self.repoint();
        self
    }

    pub fn raw(&self) -> &vk::RenderPassBeginInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.clear_value_count = count(&self.clear_values);
        self.info.p_clear_values = ptr_or_null(&self.clear_values);
    }
}

impl Clone for RenderPassBeginInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            clear_values: self.clear_values.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct RenderPass {
    handle: Handle<vk::RenderPass>,
}

impl RenderPass {
    pub(crate) fn new(handle: Handle<vk::RenderPass>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::RenderPass {
        self.handle.raw()
    }
}
