// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Commands
//!
//! Draw command buffers are recorded once per swapchain and resubmitted every frame.  Uploads use
//! a throwaway buffer that is submitted and waited on immediately.

use ash::vk;

use crate::prelude::*;

pub const CLEAR_BLACK: vk::ClearValue = vk::ClearValue {
    color: vk::ClearColorValue {
        float32: [0.0, 0.0, 0.0, 1.0],
    },
};

pub fn allocate(
    device: &ash::Device,
    pool: vk::CommandPool,
    count: u32,
) -> Result<Vec<vk::CommandBuffer>, VulkanError> {
    let alloc_info = vk::CommandBufferAllocateInfo::default()
        .command_pool(pool)
        .level(vk::CommandBufferLevel::PRIMARY)
        .command_buffer_count(count);
    Ok(unsafe { device.allocate_command_buffers(&alloc_info)? })
}

pub fn free(device: &ash::Device, pool: vk::CommandPool, buffers: &[vk::CommandBuffer]) {
    if buffers.is_empty() {
        return;
    }
    unsafe { device.free_command_buffers(pool, buffers) };
}

/// Record one render pass instance into `cb`.  `draw` issues the binds and draws between the
/// pass begin and end.
pub fn record_pass<F>(
    device: &ash::Device,
    cb: vk::CommandBuffer,
    render_pass: vk::RenderPass,
    framebuffer: vk::Framebuffer,
    extent: vk::Extent2D,
    draw: F,
) -> Result<(), VulkanError>
where
    F: FnOnce(&ash::Device, vk::CommandBuffer),
{
    // Recorded once and possibly pending on several frames at a time.
    let begin_info =
        vk::CommandBufferBeginInfo::default().flags(vk::CommandBufferUsageFlags::SIMULTANEOUS_USE);

    let clear_values = [CLEAR_BLACK];
    let pass_info = vk::RenderPassBeginInfo::default()
        .render_pass(render_pass)
        .framebuffer(framebuffer)
        .render_area(vk::Rect2D {
            offset: vk::Offset2D::default(),
            extent,
        })
        .clear_values(&clear_values);

    unsafe {
        device.begin_command_buffer(cb, &begin_info)?;
        device.cmd_begin_render_pass(cb, &pass_info, vk::SubpassContents::INLINE);
    }
    draw(device, cb);
    unsafe {
        device.cmd_end_render_pass(cb);
        device.end_command_buffer(cb)?;
    }
    Ok(())
}

/// Record with `record`, submit to `queue`, wait for the queue to go idle, then free.
pub fn one_time_submit<F>(
    device: &ash::Device,
    pool: vk::CommandPool,
    queue: vk::Queue,
    record: F,
) -> Result<(), VulkanError>
where
    F: FnOnce(&ash::Device, vk::CommandBuffer),
{
    let buffers = allocate(device, pool, 1)?;
    let result = submit_and_wait(device, queue, buffers[0], record);
    free(device, pool, &buffers);
    result
}

fn submit_and_wait<F>(
    device: &ash::Device,
    queue: vk::Queue,
    cb: vk::CommandBuffer,
    record: F,
) -> Result<(), VulkanError>
where
    F: FnOnce(&ash::Device, vk::CommandBuffer),
{
    let begin_info =
        vk::CommandBufferBeginInfo::default().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
    unsafe { device.begin_command_buffer(cb, &begin_info)? };
    record(device, cb);
    unsafe { device.end_command_buffer(cb)? };

    let command_buffers = [cb];
    let submit = vk::SubmitInfo::default().command_buffers(&command_buffers);
    unsafe {
        device.queue_submit(queue, &[submit], vk::Fence::null())?;
        device.queue_wait_idle(queue)?;
    }
    Ok(())
}
