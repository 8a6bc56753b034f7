// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Sync
//!
//! Frames in flight are bounded by a fixed number of semaphore pairs and fences.  The frame index
//! is independent of the swapchain image index.  Acquisition may hand out images in any order.

use ash::vk;

use crate::prelude::*;

pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Cycles through frame slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    current: usize,
    count: usize,
}

impl FrameCursor {
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.count;
    }
}

pub struct FrameSync {
    pub image_available: Vec<vk::Semaphore>,
    pub render_finished: Vec<vk::Semaphore>,
    pub in_flight: Vec<vk::Fence>,
    pub cursor: FrameCursor,
}

/// The handles one frame slot uses.
#[derive(Debug, Clone, Copy)]
pub struct FrameSlot {
    pub image_available: vk::Semaphore,
    pub render_finished: vk::Semaphore,
    pub in_flight: vk::Fence,
}

impl FrameSync {
    pub fn new(device: &ash::Device) -> Result<Self, VulkanError> {
        let mut sync = Self {
            image_available: Vec::with_capacity(MAX_FRAMES_IN_FLIGHT),
            render_finished: Vec::with_capacity(MAX_FRAMES_IN_FLIGHT),
            in_flight: Vec::with_capacity(MAX_FRAMES_IN_FLIGHT),
            cursor: FrameCursor::new(MAX_FRAMES_IN_FLIGHT),
        };
        if let Err(e) = sync.fill(device) {
            sync.destroy(device);
            return Err(e);
        }
        Ok(sync)
    }

    fn fill(&mut self, device: &ash::Device) -> Result<(), VulkanError> {
        let semaphore_ci = vk::SemaphoreCreateInfo::default();
        // Signaled so the first wait on each slot returns immediately.
        let fence_ci = vk::FenceCreateInfo::default().flags(vk::FenceCreateFlags::SIGNALED);
        for _ in 0..MAX_FRAMES_IN_FLIGHT {
            unsafe {
                self.image_available
                    .push(device.create_semaphore(&semaphore_ci, None)?);
                self.render_finished
                    .push(device.create_semaphore(&semaphore_ci, None)?);
                self.in_flight.push(device.create_fence(&fence_ci, None)?);
            }
        }
        Ok(())
    }

    pub fn current(&self) -> FrameSlot {
        let i = self.cursor.current();
        FrameSlot {
            image_available: self.image_available[i],
            render_finished: self.render_finished[i],
            in_flight: self.in_flight[i],
        }
    }

    pub fn advance(&mut self) {
        self.cursor.advance();
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            self.image_available.iter().for_each(|s| {
                device.destroy_semaphore(*s, None);
            });
            self.render_finished.iter().for_each(|s| {
                device.destroy_semaphore(*s, None);
            });
            self.in_flight.iter().for_each(|f| {
                device.destroy_fence(*f, None);
            });
        }
    }
}
