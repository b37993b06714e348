// Command pools

use ash::vk;

use crate::handle::Handle;

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandPoolCreateInfo {
    info: vk::CommandPoolCreateInfo,
}

impl CommandPoolCreateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_family_index(mut self, index: u32) -> Self {
        self.info.queue_family_index = index;
        self
    }

    /// `RESET_COMMAND_BUFFER` allows buffers to be reset one at a time.
    pub fn flags(mut self, flags: vk::CommandPoolCreateFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn raw(&self) -> &vk::CommandPoolCreateInfo {
        &self.info
    }
}

#[derive(Debug, Clone)]
pub struct CommandPool {
    handle: Handle<vk::CommandPool>,
}

impl CommandPool {
    pub(crate) fn new(handle: Handle<vk::CommandPool>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::CommandPool {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_info_fields() {
        let info = CommandPoolCreateInfo::new()
            .queue_family_index(2)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
        assert_eq!(info.raw().queue_family_index, 2);
        assert_eq!(info.raw().flags, vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
    }
}
