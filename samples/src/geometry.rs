// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Geometry
//!
//! Vertex layout, the quad, and the uniform block the spinning sample feeds its vertex shader.

use std::f32::consts::FRAC_PI_2;
use std::mem::{offset_of, size_of};

use ash::vk;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: size_of::<Vertex>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 2] {
        [
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::R32G32_SFLOAT,
                offset: offset_of!(Vertex, pos) as u32,
            },
            vk::VertexInputAttributeDescription {
                location: 1,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: offset_of!(Vertex, color) as u32,
            },
        ]
    }
}

pub const VERTICES: [Vertex; 4] = [
    Vertex {
        pos: [-0.5, -0.5],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        pos: [0.5, -0.5],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        pos: [0.5, 0.5],
        color: [0.0, 0.0, 1.0],
    },
    Vertex {
        pos: [-0.5, 0.5],
        color: [1.0, 1.0, 1.0],
    },
];

/// Two clockwise triangles in framebuffer coordinates.
pub const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Column-major matrices, matching `-matrix-layout-column-major` in the shader build.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct UniformBufferObject {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

pub const DEGREES_PER_SECOND: f32 = 90.0;
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 10.0;

pub fn model_at(elapsed: f32) -> Matrix4<f32> {
    // 90 degrees per second
    Matrix4::from_axis_angle(&Vector3::z_axis(), elapsed * FRAC_PI_2)
}

pub fn view() -> Matrix4<f32> {
    Matrix4::look_at_rh(
        &Point3::new(2.0, 2.0, 2.0),
        &Point3::origin(),
        &Vector3::z(),
    )
}

/// Vulkan clip space has Y pointing down.
pub fn proj(aspect: f32) -> Matrix4<f32> {
    let mut proj = Matrix4::new_perspective(aspect, FOV_Y, Z_NEAR, Z_FAR);
    proj[(1, 1)] *= -1.0;
    proj
}

impl UniformBufferObject {
    /// Uniforms `elapsed` seconds after start for a target of `extent`.
    pub fn at(elapsed: f32, extent: vk::Extent2D) -> Self {
        let aspect = extent.width as f32 / extent.height.max(1) as f32;
        Self {
            model: model_at(elapsed).into(),
            view: view().into(),
            proj: proj(aspect).into(),
        }
    }
}

#[cfg(test)]
mod test {
    use nalgebra::Vector4;

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(size_of::<Vertex>(), 20);
        let binding = Vertex::binding_description();
        assert_eq!(binding.stride, 20);
        let [pos, color] = Vertex::attribute_descriptions();
        assert_eq!((pos.location, pos.offset), (0, 0));
        assert_eq!(pos.format, vk::Format::R32G32_SFLOAT);
        assert_eq!((color.location, color.offset), (1, 8));
        assert_eq!(color.format, vk::Format::R32G32B32_SFLOAT);
    }

    #[test]
    fn test_quad_indices() {
        assert_eq!(INDICES, [0, 1, 2, 2, 3, 0]);
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));
        let bytes: &[u8] = bytemuck::cast_slice(&VERTICES);
        assert_eq!(bytes.len(), 80);
    }

    #[test]
    fn test_model_rotates_quarter_turn_per_second() {
        let identity = Matrix4::<f32>::identity();
        assert!(model_at(0.0).iter().zip(identity.iter()).all(|(a, b)| close(*a, *b)));
        let x = model_at(1.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(close(x.x, 0.0) && close(x.y, 1.0) && close(x.z, 0.0));
    }

    #[test]
    fn test_view_looks_at_origin() {
        let origin = view() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(close(origin.x, 0.0) && close(origin.y, 0.0));
        assert!(close(origin.z, -(12.0f32).sqrt()));
    }

    #[test]
    fn test_proj_flips_y() {
        let flipped = proj(1.0);
        let plain = Matrix4::new_perspective(1.0, FOV_Y, Z_NEAR, Z_FAR);
        assert!(flipped[(1, 1)] < 0.0);
        assert!(close(flipped[(1, 1)], -plain[(1, 1)]));
        assert!(close(flipped[(0, 0)], plain[(0, 0)]));
    }

    #[test]
    fn test_ubo_columns() {
        let extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        let ubo = UniformBufferObject::at(0.0, extent);
        // Translation lives in the last column.
        let v = view();
        assert_eq!(ubo.view[3], [v[(0, 3)], v[(1, 3)], v[(2, 3)], v[(3, 3)]]);
        let p = proj(800.0 / 600.0);
        assert!(close(ubo.proj[0][0], p[(0, 0)]));
        assert_eq!(size_of::<UniformBufferObject>(), 192);
    }
}
