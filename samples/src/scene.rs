// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Scene
//!
//! What one sample draws.  The renderer owns the bootstrap and calls into the scene at fixed
//! points:
//!
//! - `init` once the context exists
//! - `attach` after each swapchain is created, before the pipeline
//! - `record` once per swapchain image, with the pipeline already bound
//! - `update` every frame, after the image is acquired and before it is submitted
//! - `detach` before each swapchain is destroyed
//! - `destroy` once, after the last `detach`
//!
//! The device is idle whenever `attach`, `detach` or `destroy` run.

use ash::vk;

use hellovk_vulkan::{pipeline::GraphicsPipeline, prelude::*, swapchain::Swapchain};

pub trait Scene {
    fn vertex_shader(&self) -> &'static str;

    fn fragment_shader(&self) -> &'static str {
        "color/fragment"
    }

    fn vertex_bindings(&self) -> Vec<vk::VertexInputBindingDescription> {
        Vec::new()
    }

    fn vertex_attributes(&self) -> Vec<vk::VertexInputAttributeDescription> {
        Vec::new()
    }

    fn front_face(&self) -> vk::FrontFace {
        vk::FrontFace::CLOCKWISE
    }

    /// Valid after `init`.
    fn set_layouts(&self) -> Vec<vk::DescriptorSetLayout> {
        Vec::new()
    }

    fn init(&mut self, _context: &VkContext) -> Result<(), VulkanError> {
        Ok(())
    }

    fn attach(&mut self, _context: &VkContext, _swapchain: &Swapchain) -> Result<(), VulkanError> {
        Ok(())
    }

    fn record(
        &self,
        device: &ash::Device,
        cb: vk::CommandBuffer,
        pipeline: &GraphicsPipeline,
        image_index: usize,
    );

    fn update(&mut self, _image_index: usize, _extent: vk::Extent2D) {}

    fn detach(&mut self, _device: &ash::Device) {}

    fn destroy(&mut self, _device: &ash::Device) {}
}
