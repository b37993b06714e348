// Shader modules from SPIR-V

use ash::vk;
use std::io::Cursor;

use crate::base::{count, ptr_or_null};
use crate::error::{Error, Result};
use crate::handle::Handle;

/// Builder for `VkShaderModuleCreateInfo`. Owns the SPIR-V words.
#[derive(Debug)]
pub struct ShaderModuleCreateInfo {
    info: vk::ShaderModuleCreateInfo,
    code: Vec<u32>,
}

impl ShaderModuleCreateInfo {
    pub fn new() -> Self {
        Self {
            info: vk::ShaderModuleCreateInfo::default(),
            code: Vec::new(),
        }
    }

    /// Read a SPIR-V binary as produced by `glslc`. Checks the magic number
    /// and copies the bytes into word-aligned storage.
    pub fn from_spirv_bytes(bytes: &[u8]) -> Result<Self> {
        let words = ash::util::read_spv(&mut Cursor::new(bytes)).map_err(Error::Spirv)?;
        Ok(Self::new().code(&words))
    }

    pub fn code(mut self, words: &[u32]) -> Self {
        self.code = words.to_vec();
        self.repoint();
        self
    }

    pub fn flags(mut self, flags: vk::ShaderModuleCreateFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn raw(&self) -> &vk::ShaderModuleCreateInfo {
        &self.info
    }

    fn repoint(&mut self) {
        // codeSize is in bytes.
        self.info.code_size = count(&self.code) as usize * std::mem::size_of::<u32>();
        self.info.p_code = ptr_or_null(&self.code);
    }
}

impl Default for ShaderModuleCreateInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ShaderModuleCreateInfo {
    fn clone(&self) -> Self {
        let mut copy = Self {
            info: self.info,
            code: self.code.clone(),
        };
        copy.repoint();
        copy
    }
}

#[derive(Debug, Clone)]
pub struct ShaderModule {
    handle: Handle<vk::ShaderModule>,
}

impl ShaderModule {
    pub(crate) fn new(handle: Handle<vk::ShaderModule>) -> Self {
        Self { handle }
    }

    pub fn c_ptr(&self) -> vk::ShaderModule {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPIRV_MAGIC: u32 = 0x0723_0203;

    #[test]
    fn code_size_is_in_bytes() {
        let info = ShaderModuleCreateInfo::new().code(&[SPIRV_MAGIC, 0x0001_0000, 0, 1, 0]);
        assert_eq!(info.raw().code_size, 20);
        assert_eq!(unsafe { *info.raw().p_code }, SPIRV_MAGIC);
    }

    #[test]
    fn reads_little_endian_spirv() {
        let mut bytes = Vec::new();
        for word in [SPIRV_MAGIC, 0x0001_0000, 0, 8, 0] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        let info = ShaderModuleCreateInfo::from_spirv_bytes(&bytes).unwrap();
        assert_eq!(info.raw().code_size, bytes.len());

        let copy = info.clone();
        drop(info);
        let words = unsafe { std::slice::from_raw_parts(copy.raw().p_code, 5) };
        assert_eq!(words[3], 8);
    }

    #[test]
    fn rejects_truncated_input() {
        let result = ShaderModuleCreateInfo::from_spirv_bytes(&[0x03, 0x02, 0x23]);
        assert!(matches!(result, Err(Error::Spirv(_))));
    }

    #[test]
    fn empty_code_is_null() {
        let info = ShaderModuleCreateInfo::new().code(&[]);
        assert_eq!(info.raw().code_size, 0);
        assert!(info.raw().p_code.is_null());

        let copy = info.clone();
        assert!(copy.raw().p_code.is_null());
    }
}
