// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Queue
//!
//! Samples need a queue that can draw and a queue that can present to the window surface.  They
//! may or may not be the same family.  The command pool lives next to the graphics queue because
//! every command buffer we record is submitted there.

use ash::vk;

use crate::prelude::*;

/// Partial result of a queue family search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scan families in order, stopping as soon as both a graphics and a present capable family
    /// have been seen.  `supports_present` asks the surface about one family index.
    pub fn find<F>(
        families: &[vk::QueueFamilyProperties],
        mut supports_present: F,
    ) -> Result<Self, VulkanError>
    where
        F: FnMut(u32) -> Result<bool, VulkanError>,
    {
        let mut indices = Self::default();
        for (i, family) in families.iter().enumerate() {
            let i = i as u32;
            if family.queue_count > 0 && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics = Some(i);
            }
            if family.queue_count > 0 && supports_present(i)? {
                indices.present = Some(i);
            }
            if indices.is_complete() {
                break;
            }
        }
        Ok(indices)
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    pub fn resolve(&self) -> Option<QueueFamilies> {
        Some(QueueFamilies {
            graphics: self.graphics?,
            present: self.present?,
        })
    }
}

/// Family indices of a suitable device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilies {
    /// Each family once, as required by device creation.
    pub fn unique(&self) -> Vec<u32> {
        if self.graphics == self.present {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }

    pub fn is_shared(&self) -> bool {
        self.graphics == self.present
    }

    /// `priorities` must outlive device creation.
    pub fn queue_cis<'a>(&self, priorities: &'a [f32]) -> Vec<vk::DeviceQueueCreateInfo<'a>> {
        self.unique()
            .into_iter()
            .map(|index| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(index)
                    .queue_priorities(priorities)
            })
            .collect()
    }
}

pub struct Queues {
    graphics: vk::Queue,
    present: vk::Queue,
    command_pool: vk::CommandPool,

    pub families: QueueFamilies,
}

impl Queues {
    pub fn new(device: &ash::Device, families: QueueFamilies) -> Result<Self, VulkanError> {
        let graphics = unsafe { device.get_device_queue(families.graphics, 0) };
        let present = unsafe { device.get_device_queue(families.present, 0) };

        // Buffers are recorded once per swapchain and never reset individually.
        let command_pool_ci =
            vk::CommandPoolCreateInfo::default().queue_family_index(families.graphics);
        let command_pool = unsafe { device.create_command_pool(&command_pool_ci, None)? };

        Ok(Queues {
            graphics,
            present,
            command_pool,
            families,
        })
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present
    }

    pub fn graphics_pool(&self) -> vk::CommandPool {
        self.command_pool
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            device.destroy_command_pool(self.command_pool, None);
        }
        // NOTE device owns queues.  Just drop handles.
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn family(flags: vk::QueueFlags, queue_count: u32) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_shared_family() {
        let families = [
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 1),
            family(vk::QueueFlags::TRANSFER, 1),
        ];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(true)).unwrap();
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, Some(0));
        let resolved = indices.resolve().unwrap();
        assert!(resolved.is_shared());
        assert_eq!(resolved.unique(), vec![0]);
    }

    #[test]
    fn test_find_split_families() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::COMPUTE, 1),
        ];
        let mut asked = Vec::new();
        let indices = QueueFamilyIndices::find(&families, |i| {
            asked.push(i);
            Ok(i == 1)
        })
        .unwrap();
        assert_eq!(asked, vec![0, 1]);
        let resolved = indices.resolve().unwrap();
        assert_eq!(resolved.graphics, 0);
        assert_eq!(resolved.present, 1);
        assert_eq!(resolved.unique(), vec![0, 1]);
        assert_eq!(resolved.queue_cis(&[1.0]).len(), 2);
    }

    #[test]
    fn test_find_skips_empty_and_stops_early() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 0),
            family(vk::QueueFlags::GRAPHICS, 2),
            family(vk::QueueFlags::GRAPHICS, 2),
        ];
        let mut asked = 0;
        let indices = QueueFamilyIndices::find(&families, |_| {
            asked += 1;
            Ok(true)
        })
        .unwrap();
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(1));
        // Family 0 has no queues so the surface is never asked about it.
        assert_eq!(asked, 1);
    }

    #[test]
    fn test_incomplete_without_present() {
        let families = [family(vk::QueueFlags::GRAPHICS, 1)];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(false)).unwrap();
        assert!(!indices.is_complete());
        assert_eq!(indices.resolve(), None);
    }
}
