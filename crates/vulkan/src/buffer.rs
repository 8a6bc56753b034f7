// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Buffer
//!
//! Plain buffers with their own dedicated allocation.  Geometry goes to device-local memory
//! through a staging copy.  Uniforms stay host visible and coherent, persistently mapped, and are
//! rewritten every frame.
//!
//! This treatment does not use any kind of RAII.  You have validation layers and other Vulkan
//! debugging tools to spot lifecycle issues.

use std::marker::PhantomData;
use std::ptr::NonNull;

use ash::vk;
use bytemuck::Pod;

use crate::commands;
use crate::prelude::*;

const HOST_COHERENT: vk::MemoryPropertyFlags = vk::MemoryPropertyFlags::from_raw(
    vk::MemoryPropertyFlags::HOST_VISIBLE.as_raw() | vk::MemoryPropertyFlags::HOST_COHERENT.as_raw(),
);

// DEBT memory management.  One allocation per buffer is fine for a handful of buffers.
pub struct Buffer {
    pub buffer: vk::Buffer,
    pub memory: vk::DeviceMemory,
    pub size: vk::DeviceSize,
}

impl Buffer {
    pub fn new(
        context: &VkContext,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> Result<Self, VulkanError> {
        let device = context.device();
        let buffer_ci = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer = unsafe { device.create_buffer(&buffer_ci, None)? };

        let mem_req = unsafe { device.get_buffer_memory_requirements(buffer) };
        let allocated = context
            .find_memory_type(&mem_req, properties)
            .and_then(|memory_type_index| {
                let alloc_info = vk::MemoryAllocateInfo::default()
                    .allocation_size(mem_req.size)
                    .memory_type_index(memory_type_index);
                Ok(unsafe { device.allocate_memory(&alloc_info, None)? })
            });
        let memory = match allocated {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        if let Err(e) = unsafe { device.bind_buffer_memory(buffer, memory, 0) } {
            unsafe {
                device.destroy_buffer(buffer, None);
                device.free_memory(memory, None);
            }
            return Err(e.into());
        }

        Ok(Self {
            buffer,
            memory,
            size,
        })
    }

    /// Device-local buffer holding `data`, uploaded through a staging buffer that is freed before
    /// returning.
    pub fn device_local_with<T: Pod>(
        context: &VkContext,
        usage: vk::BufferUsageFlags,
        data: &[T],
    ) -> Result<Self, VulkanError> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let size = bytes.len() as vk::DeviceSize;

        let staging = Buffer::new(
            context,
            size,
            vk::BufferUsageFlags::TRANSFER_SRC,
            HOST_COHERENT,
        )?;
        let uploaded = staging
            .fill(context.device(), bytes)
            .and_then(|_| {
                Buffer::new(
                    context,
                    size,
                    usage | vk::BufferUsageFlags::TRANSFER_DST,
                    vk::MemoryPropertyFlags::DEVICE_LOCAL,
                )
            })
            .and_then(|target| match copy_buffer(context, &staging, &target) {
                Ok(()) => Ok(target),
                Err(e) => {
                    target.destroy(context.device());
                    Err(e)
                }
            });
        staging.destroy(context.device());
        uploaded
    }

    /// Write `bytes` at the start of host-visible memory.
    fn fill(&self, device: &ash::Device, bytes: &[u8]) -> Result<(), VulkanError> {
        unsafe {
            let ptr = device.map_memory(self.memory, 0, self.size, vk::MemoryMapFlags::empty())?;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr as *mut u8, bytes.len());
            device.unmap_memory(self.memory);
        }
        Ok(())
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            device.destroy_buffer(self.buffer, None);
            device.free_memory(self.memory, None);
        }
    }
}

fn copy_buffer(context: &VkContext, src: &Buffer, dst: &Buffer) -> Result<(), VulkanError> {
    let region = vk::BufferCopy {
        src_offset: 0,
        dst_offset: 0,
        size: src.size,
    };
    commands::one_time_submit(
        context.device(),
        context.queues.graphics_pool(),
        context.queues.graphics_queue(),
        |device, cb| unsafe { device.cmd_copy_buffer(cb, src.buffer, dst.buffer, &[region]) },
    )
}

/// A persistently mapped, coherent buffer holding one `T`.
pub struct HostBuffer<T> {
    pub inner: Buffer,
    ptr: NonNull<T>,
    _marker: PhantomData<T>,
}

impl<T: Pod> HostBuffer<T> {
    pub fn new(context: &VkContext, usage: vk::BufferUsageFlags) -> Result<Self, VulkanError> {
        let size = std::mem::size_of::<T>() as vk::DeviceSize;
        let inner = Buffer::new(context, size, usage, HOST_COHERENT)?;
        let device = context.device();
        let mapped =
            unsafe { device.map_memory(inner.memory, 0, size, vk::MemoryMapFlags::empty()) };
        let ptr = match mapped {
            Ok(raw) => NonNull::new(raw as *mut T),
            Err(e) => {
                inner.destroy(device);
                return Err(e.into());
            }
        };
        match ptr {
            Some(ptr) => Ok(Self {
                inner,
                ptr,
                _marker: PhantomData,
            }),
            None => {
                unsafe { device.unmap_memory(inner.memory) };
                inner.destroy(device);
                Err(vk::Result::ERROR_MEMORY_MAP_FAILED.into())
            }
        }
    }

    pub fn buffer(&self) -> vk::Buffer {
        self.inner.buffer
    }

    /// Coherent memory, so no flush.  The caller must know the GPU is not reading this buffer.
    pub fn write(&mut self, value: &T) {
        unsafe { self.ptr.as_ptr().write_unaligned(*value) };
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.unmap_memory(self.inner.memory) };
        self.inner.destroy(device);
    }
}
