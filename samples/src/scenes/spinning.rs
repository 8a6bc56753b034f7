// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Spinning Quad
//!
//! The quad, transformed by a model-view-projection block in a uniform buffer.  Each swapchain
//! image has its own buffer and descriptor set, written right before that image is submitted.

use std::time::Instant;

use ash::vk;

use hellovk_vulkan::{
    buffer::HostBuffer,
    descriptors::{self, UniformSets},
    pipeline::GraphicsPipeline,
    prelude::*,
    swapchain::Swapchain,
};

use crate::geometry::{UniformBufferObject, Vertex};
use crate::scene::Scene;
use crate::scenes::Geometry;

pub struct SpinningQuadScene {
    start: Instant,
    geometry: Option<Geometry>,
    layout: vk::DescriptorSetLayout,
    uniforms: Vec<HostBuffer<UniformBufferObject>>,
    sets: Option<UniformSets>,
}

impl Default for SpinningQuadScene {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            geometry: None,
            layout: vk::DescriptorSetLayout::null(),
            uniforms: Vec::new(),
            sets: None,
        }
    }
}

impl SpinningQuadScene {
    fn release_uniforms(&mut self, device: &ash::Device) {
        if let Some(sets) = self.sets.take() {
            sets.destroy(device);
        }
        self.uniforms.drain(..).for_each(|u| u.destroy(device));
    }
}

impl Scene for SpinningQuadScene {
    fn vertex_shader(&self) -> &'static str {
        "spinning/vertex"
    }

    fn vertex_bindings(&self) -> Vec<vk::VertexInputBindingDescription> {
        vec![Vertex::binding_description()]
    }

    fn vertex_attributes(&self) -> Vec<vk::VertexInputAttributeDescription> {
        Vertex::attribute_descriptions().to_vec()
    }

    /// The Y flip in the projection mirrors the winding.
    fn front_face(&self) -> vk::FrontFace {
        vk::FrontFace::COUNTER_CLOCKWISE
    }

    fn set_layouts(&self) -> Vec<vk::DescriptorSetLayout> {
        vec![self.layout]
    }

    fn init(&mut self, context: &VkContext) -> Result<(), VulkanError> {
        self.layout = descriptors::create_uniform_layout(context.device())?;
        self.geometry = Some(Geometry::upload(context)?);
        self.start = Instant::now();
        Ok(())
    }

    fn attach(&mut self, context: &VkContext, swapchain: &Swapchain) -> Result<(), VulkanError> {
        for _ in 0..swapchain.image_count() {
            let mut uniform = HostBuffer::new(context, vk::BufferUsageFlags::UNIFORM_BUFFER)?;
            uniform.write(&UniformBufferObject::at(0.0, swapchain.extent));
            self.uniforms.push(uniform);
        }
        let buffers: Vec<vk::Buffer> = self.uniforms.iter().map(|u| u.buffer()).collect();
        self.sets = Some(UniformSets::new(context.device(), self.layout, &buffers)?);
        Ok(())
    }

    fn record(
        &self,
        device: &ash::Device,
        cb: vk::CommandBuffer,
        pipeline: &GraphicsPipeline,
        image_index: usize,
    ) {
        let (Some(geometry), Some(sets)) = (&self.geometry, &self.sets) else {
            return;
        };
        unsafe {
            device.cmd_bind_descriptor_sets(
                cb,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline.layout,
                0,
                &[sets.sets[image_index]],
                &[],
            );
        }
        geometry.draw(device, cb);
    }

    fn update(&mut self, image_index: usize, extent: vk::Extent2D) {
        let elapsed = self.start.elapsed().as_secs_f32();
        if let Some(uniform) = self.uniforms.get_mut(image_index) {
            uniform.write(&UniformBufferObject::at(elapsed, extent));
        }
    }

    fn detach(&mut self, device: &ash::Device) {
        self.release_uniforms(device);
    }

    fn destroy(&mut self, device: &ash::Device) {
        self.release_uniforms(device);
        if let Some(geometry) = self.geometry.take() {
            geometry.destroy(device);
        }
        unsafe { device.destroy_descriptor_set_layout(self.layout, None) };
        self.layout = vk::DescriptorSetLayout::null();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pipeline_inputs() {
        let scene = SpinningQuadScene::default();
        assert_eq!(scene.front_face(), vk::FrontFace::COUNTER_CLOCKWISE);
        assert_eq!(scene.set_layouts().len(), 1);
        assert_eq!(scene.vertex_bindings().len(), 1);
        assert_eq!(scene.vertex_shader(), "spinning/vertex");
        assert_eq!(scene.fragment_shader(), "color/fragment");
    }
}
