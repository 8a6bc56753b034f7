// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Shader
//!
//! Shader modules only live long enough to build a pipeline.

use ash::vk;
use hellovk_assets::AssetDirs;

use crate::prelude::*;

pub fn create_module(device: &ash::Device, words: &[u32]) -> Result<vk::ShaderModule, VulkanError> {
    let module_ci = vk::ShaderModuleCreateInfo::default().code(words);
    Ok(unsafe { device.create_shader_module(&module_ci, None)? })
}

/// Look up `name` (such as `"quad/vertex"`) in the asset directories and create a module from it.
pub fn load_module(
    device: &ash::Device,
    assets: &AssetDirs,
    name: &str,
) -> Result<vk::ShaderModule, VulkanError> {
    let words = assets.find_shader(name)?;
    log::debug!("shader {name}: {} words", words.len());
    create_module(device, &words)
}
