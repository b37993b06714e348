// Framebuffers

use ash::vk;

use crate::base::{count, ptr_or_null};
use crate::handle::Handle;
use crate::render_pass::RenderPass;
use crate::swapchain::ImageView;

#[derive(Debug)]
pub struct FramebufferCreateInfo {
    info: vk::FramebufferCreateInfo,
    attachments: Vec<vk::ImageView>,
}

impl FramebufferCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::FramebufferCreateInfo {
                layers: 1,
                ..Default::default()
            },
            attachments: Vec::new(),
        }
    }

    pub fn render_pass(mut self, render_pass: &RenderPass) -> Self {
        self.info.render_pass = render_pass.c_ptr();
        self
    }

    pub fn attachments(mut self, attachments: &[&ImageView]) -> Self {
        self.attachments = attachments.iter().map(|view| view.c_ptr()).collect();
        self.repoint();
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.info.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.info.height = height;
        self
    }

    pub fn layers(mut self, layers: u32) -> Self {
        self.info.layers = layers;
        self
    }

    pub fn raw(&self) -> &vk::FramebufferCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        self.info.attachment_count = count(&self.attachments);
        self.info.p_attachments = ptr_or_null(&self.attachments);
    }
}

impl Default for FramebufferCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FramebufferCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            attachments: self.attachments.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct Framebuffer {
    handle: Handle<vk::Framebuffer>,
}

impl Framebuffer {
    pub(crate) fn new(handle: Handle<vk::Framebuffer>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::Framebuffer {
        self.handle.raw()
    }
}
