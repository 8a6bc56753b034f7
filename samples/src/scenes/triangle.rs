// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Triangle
//!
//! No buffers at all.  The vertex shader generates the positions and colors.

use ash::vk;

use hellovk_vulkan::pipeline::GraphicsPipeline;

use crate::scene::Scene;

#[derive(Debug, Default)]
pub struct TriangleScene;

impl Scene for TriangleScene {
    fn vertex_shader(&self) -> &'static str {
        "triangle/vertex"
    }

    fn record(
        &self,
        device: &ash::Device,
        cb: vk::CommandBuffer,
        _pipeline: &GraphicsPipeline,
        _image_index: usize,
    ) {
        // The triangle ▲
        unsafe { device.cmd_draw(cb, 3, 1, 0, 0) };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_vertex_input() {
        let scene = TriangleScene;
        assert!(scene.vertex_bindings().is_empty());
        assert!(scene.vertex_attributes().is_empty());
        assert!(scene.set_layouts().is_empty());
        assert_eq!(scene.front_face(), vk::FrontFace::CLOCKWISE);
    }
}
