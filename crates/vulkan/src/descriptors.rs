// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Descriptors
//!
//! One uniform buffer at binding 0, read by the vertex stage.  Each swapchain image gets its own
//! set pointing at its own buffer, so a frame can write its uniforms while another image is still
//! being drawn.
//!
//! The layout outlives swapchain recreation because the pipeline layout is built from it.  The
//! pool and sets are rebuilt with the swapchain since their count follows the image count.

use ash::vk;

use crate::prelude::*;

pub const UNIFORM_BINDING: u32 = 0;

fn uniform_bindings() -> [vk::DescriptorSetLayoutBinding<'static>; 1] {
    [vk::DescriptorSetLayoutBinding::default()
        .binding(UNIFORM_BINDING)
        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
        .descriptor_count(1)
        .stage_flags(vk::ShaderStageFlags::VERTEX)]
}

/// Pool able to hand out `sets` sets of the uniform layout.
fn pool_sizes(sets: u32) -> [vk::DescriptorPoolSize; 1] {
    [vk::DescriptorPoolSize {
        ty: vk::DescriptorType::UNIFORM_BUFFER,
        descriptor_count: sets,
    }]
}

pub fn create_uniform_layout(
    device: &ash::Device,
) -> Result<vk::DescriptorSetLayout, VulkanError> {
    let bindings = uniform_bindings();
    let layout_ci = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);
    Ok(unsafe { device.create_descriptor_set_layout(&layout_ci, None)? })
}

pub struct UniformSets {
    pool: vk::DescriptorPool,
    pub sets: Vec<vk::DescriptorSet>,
}

impl UniformSets {
    /// One set per buffer, each bound to the whole of its buffer.
    pub fn new(
        device: &ash::Device,
        layout: vk::DescriptorSetLayout,
        buffers: &[vk::Buffer],
    ) -> Result<Self, VulkanError> {
        let count = buffers.len() as u32;
        let sizes = pool_sizes(count);
        let pool_ci = vk::DescriptorPoolCreateInfo::default()
            .max_sets(count)
            .pool_sizes(&sizes);
        let pool = unsafe { device.create_descriptor_pool(&pool_ci, None)? };

        let layouts = vec![layout; buffers.len()];
        let alloc_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(pool)
            .set_layouts(&layouts);
        let sets = match unsafe { device.allocate_descriptor_sets(&alloc_info) } {
            Ok(sets) => sets,
            Err(e) => {
                unsafe { device.destroy_descriptor_pool(pool, None) };
                return Err(e.into());
            }
        };

        for (set, buffer) in sets.iter().zip(buffers) {
            let buffer_infos = [vk::DescriptorBufferInfo {
                buffer: *buffer,
                offset: 0,
                range: vk::WHOLE_SIZE,
            }];
            let write = vk::WriteDescriptorSet::default()
                .dst_set(*set)
                .dst_binding(UNIFORM_BINDING)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&buffer_infos);
            unsafe { device.update_descriptor_sets(&[write], &[]) };
        }

        Ok(Self { pool, sets })
    }

    /// Sets are freed with their pool.
    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.destroy_descriptor_pool(self.pool, None) };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_uniform_binding() {
        let [binding] = uniform_bindings();
        assert_eq!(binding.binding, 0);
        assert_eq!(binding.descriptor_type, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(binding.descriptor_count, 1);
        assert_eq!(binding.stage_flags, vk::ShaderStageFlags::VERTEX);
    }

    #[test]
    fn test_pool_follows_image_count() {
        let [size] = pool_sizes(3);
        assert_eq!(size.ty, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(size.descriptor_count, 3);
    }
}
