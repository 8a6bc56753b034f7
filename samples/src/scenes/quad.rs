// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Quad
//!
//! Four vertices and six indices in device-local buffers.

use ash::vk;

use hellovk_vulkan::{buffer::Buffer, pipeline::GraphicsPipeline, prelude::*};

use crate::geometry::{INDICES, VERTICES, Vertex};
use crate::scene::Scene;

/// The quad's vertex and index buffers.
pub struct Geometry {
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
}

impl Geometry {
    pub fn upload(context: &VkContext) -> Result<Self, VulkanError> {
        let vertices =
            Buffer::device_local_with(context, vk::BufferUsageFlags::VERTEX_BUFFER, &VERTICES)?;
        let indices =
            match Buffer::device_local_with(context, vk::BufferUsageFlags::INDEX_BUFFER, &INDICES)
            {
                Ok(indices) => indices,
                Err(e) => {
                    vertices.destroy(context.device());
                    return Err(e);
                }
            };
        log::debug!(
            "uploaded {} vertices, {} indices",
            VERTICES.len(),
            INDICES.len()
        );
        Ok(Self {
            vertices,
            indices,
            index_count: INDICES.len() as u32,
        })
    }

    pub fn draw(&self, device: &ash::Device, cb: vk::CommandBuffer) {
        unsafe {
            device.cmd_bind_vertex_buffers(cb, 0, &[self.vertices.buffer], &[0]);
            device.cmd_bind_index_buffer(cb, self.indices.buffer, 0, vk::IndexType::UINT16);
            device.cmd_draw_indexed(cb, self.index_count, 1, 0, 0, 0);
        }
    }

    pub fn destroy(&self, device: &ash::Device) {
        self.indices.destroy(device);
        self.vertices.destroy(device);
    }
}

#[derive(Default)]
pub struct QuadScene {
    geometry: Option<Geometry>,
}

impl Scene for QuadScene {
    fn vertex_shader(&self) -> &'static str {
        "quad/vertex"
    }

    fn vertex_bindings(&self) -> Vec<vk::VertexInputBindingDescription> {
        vec![Vertex::binding_description()]
    }

    fn vertex_attributes(&self) -> Vec<vk::VertexInputAttributeDescription> {
        Vertex::attribute_descriptions().to_vec()
    }

    fn init(&mut self, context: &VkContext) -> Result<(), VulkanError> {
        self.geometry = Some(Geometry::upload(context)?);
        Ok(())
    }

    fn record(
        &self,
        device: &ash::Device,
        cb: vk::CommandBuffer,
        _pipeline: &GraphicsPipeline,
        _image_index: usize,
    ) {
        if let Some(geometry) = &self.geometry {
            geometry.draw(device, cb);
        }
    }

    fn destroy(&mut self, device: &ash::Device) {
        if let Some(geometry) = self.geometry.take() {
            geometry.destroy(device);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vertex_input() {
        let scene = QuadScene::default();
        let bindings = scene.vertex_bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].stride as usize, std::mem::size_of::<Vertex>());
        let attributes = scene.vertex_attributes();
        assert_eq!(attributes.len(), 2);
        assert!(attributes.iter().all(|a| a.binding == bindings[0].binding));
        assert_eq!(scene.front_face(), vk::FrontFace::CLOCKWISE);
    }
}
