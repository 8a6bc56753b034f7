// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Swapchain
//!
//! A swapchain exists when we are presenting to a surface.  Creation negotiates format, present
//! mode, extent and image count with whatever the surface reports.  The choices are plain
//! functions over the queried support so they can be checked without a device.
//!
//! Recreation is whole: the owner destroys the old swapchain and every object derived from its
//! images, then builds a new one.  There is no `old_swapchain` handoff.

use ash::vk;

use crate::prelude::*;
use crate::queue::QueueFamilies;
use crate::util;

/// What the surface can do for one physical device.
#[derive(Debug, Clone, Default)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub fn query(
        surface_loader: &ash::khr::surface::Instance,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Self, VulkanError> {
        unsafe {
            Ok(Self {
                capabilities: surface_loader
                    .get_physical_device_surface_capabilities(physical_device, surface)?,
                formats: surface_loader
                    .get_physical_device_surface_formats(physical_device, surface)?,
                present_modes: surface_loader
                    .get_physical_device_surface_present_modes(physical_device, surface)?,
            })
        }
    }

    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// How eager presentation should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresentPreference {
    /// Mailbox, then immediate, then FIFO.
    #[default]
    LowLatency,
    /// Always FIFO.
    Vsync,
}

const PREFERRED_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// `formats` must not be empty, which device selection guarantees.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    // A lone UNDEFINED entry means the surface has no preference.
    if let [only] = formats
        && only.format == vk::Format::UNDEFINED
    {
        return PREFERRED_FORMAT;
    }
    formats
        .iter()
        .find(|f| {
            f.format == PREFERRED_FORMAT.format && f.color_space == PREFERRED_FORMAT.color_space
        })
        .or(formats.first())
        .copied()
        .unwrap_or(PREFERRED_FORMAT)
}

pub fn choose_present_mode(
    modes: &[vk::PresentModeKHR],
    preference: PresentPreference,
) -> vk::PresentModeKHR {
    match preference {
        PresentPreference::Vsync => vk::PresentModeKHR::FIFO,
        PresentPreference::LowLatency => [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::IMMEDIATE]
            .into_iter()
            .find(|m| modes.contains(m))
            // FIFO support is required of every implementation.
            .unwrap_or(vk::PresentModeKHR::FIFO),
    }
}

/// The surface dictates the extent unless it reports the `u32::MAX` wildcard, in which case the
/// window size is used within the surface limits.
pub fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, window: vk::Extent2D) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        return caps.current_extent;
    }
    vk::Extent2D {
        width: window
            .width
            .clamp(caps.min_image_extent.width, caps.max_image_extent.width),
        height: window
            .height
            .clamp(caps.min_image_extent.height, caps.max_image_extent.height),
    }
}

/// One more than the minimum.  A zero maximum means unlimited.
pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = caps.min_image_count + 1;
    if caps.max_image_count > 0 {
        count.min(caps.max_image_count)
    } else {
        count
    }
}

/// Images are shared between families only when drawing and presenting happen on different ones.
pub fn sharing(families: &QueueFamilies) -> (vk::SharingMode, Vec<u32>) {
    if families.is_shared() {
        (vk::SharingMode::EXCLUSIVE, Vec::new())
    } else {
        (
            vk::SharingMode::CONCURRENT,
            vec![families.graphics, families.present],
        )
    }
}

pub struct Swapchain {
    loader: ash::khr::swapchain::Device,
    handle: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    views: Vec<vk::ImageView>,

    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
}

impl Swapchain {
    pub fn new(
        context: &VkContext,
        window_size: vk::Extent2D,
        preference: PresentPreference,
    ) -> Result<Self, VulkanError> {
        let support = SwapchainSupport::query(
            &context.surface_loader,
            context.physical_device,
            context.surface,
        )?;
        let format = choose_surface_format(&support.formats);
        let present_mode = choose_present_mode(&support.present_modes, preference);
        let extent = choose_extent(&support.capabilities, window_size);
        let image_count = choose_image_count(&support.capabilities);
        let (sharing_mode, family_indices) = sharing(&context.queues.families);

        let swapchain_ci = vk::SwapchainCreateInfoKHR::default()
            .surface(context.surface)
            .min_image_count(image_count)
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(sharing_mode)
            .queue_family_indices(&family_indices)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true);

        let loader = ash::khr::swapchain::Device::new(&context.instance, &context.device);
        let handle = unsafe { loader.create_swapchain(&swapchain_ci, None)? };
        let device = &context.device;
        let created = unsafe { loader.get_swapchain_images(handle) }.and_then(|images| {
            let views = util::create_each(
                &images,
                |&image| {
                    let view_ci = vk::ImageViewCreateInfo::default()
                        .image(image)
                        .view_type(vk::ImageViewType::TYPE_2D)
                        .format(format.format)
                        .components(vk::ComponentMapping::default())
                        .subresource_range(vk::ImageSubresourceRange {
                            aspect_mask: vk::ImageAspectFlags::COLOR,
                            base_mip_level: 0,
                            level_count: 1,
                            base_array_layer: 0,
                            layer_count: 1,
                        });
                    unsafe { device.create_image_view(&view_ci, None) }
                },
                |view| unsafe { device.destroy_image_view(*view, None) },
            )?;
            Ok((images, views))
        });
        let (images, views) = match created {
            Ok(created) => created,
            Err(e) => {
                unsafe { loader.destroy_swapchain(handle, None) };
                return Err(e.into());
            }
        };

        log::info!(
            "swapchain: {} images {:?} {:?} {}x{}",
            images.len(),
            format.format,
            present_mode,
            extent.width,
            extent.height
        );

        Ok(Self {
            loader,
            handle,
            images,
            views,
            format,
            present_mode,
            extent,
        })
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn views(&self) -> &[vk::ImageView] {
        &self.views
    }

    /// `Ok(None)` when the swapchain no longer matches the surface.  Suboptimal images are still
    /// returned and the flag is reported with them.
    pub fn acquire(&self, signal: vk::Semaphore) -> Result<Option<(u32, bool)>, VulkanError> {
        let acquired = unsafe {
            self.loader
                .acquire_next_image(self.handle, u64::MAX, signal, vk::Fence::null())
        };
        match acquired {
            Ok(acquired) => Ok(Some(acquired)),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// `Ok(true)` when the swapchain should be recreated.
    pub fn present(
        &self,
        queue: vk::Queue,
        image_index: u32,
        wait: vk::Semaphore,
    ) -> Result<bool, VulkanError> {
        let wait_semaphores = [wait];
        let swapchains = [self.handle];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        match unsafe { self.loader.queue_present(queue, &present_info) } {
            Ok(suboptimal) => Ok(suboptimal),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            for view in &self.views {
                device.destroy_image_view(*view, None);
            }
            self.loader.destroy_swapchain(self.handle, None);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    #[test]
    fn test_undefined_format_means_anything() {
        let formats = [format(
            vk::Format::UNDEFINED,
            vk::ColorSpaceKHR::SRGB_NONLINEAR,
        )];
        assert_eq!(choose_surface_format(&formats), PREFERRED_FORMAT);
    }

    #[test]
    fn test_preferred_format_found() {
        let formats = [
            format(vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(
                vk::Format::B8G8R8A8_UNORM,
                vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
            ),
            PREFERRED_FORMAT,
        ];
        assert_eq!(choose_surface_format(&formats), PREFERRED_FORMAT);
    }

    #[test]
    fn test_fallback_to_first_format() {
        let first = format(vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR);
        let formats = [
            first,
            format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(choose_surface_format(&formats), first);
    }

    #[test]
    fn test_present_mode_order() {
        use vk::PresentModeKHR as M;
        let low = PresentPreference::LowLatency;
        assert_eq!(
            choose_present_mode(&[M::FIFO, M::IMMEDIATE, M::MAILBOX], low),
            M::MAILBOX
        );
        assert_eq!(choose_present_mode(&[M::FIFO, M::IMMEDIATE], low), M::IMMEDIATE);
        assert_eq!(choose_present_mode(&[M::FIFO_RELAXED, M::FIFO], low), M::FIFO);
        assert_eq!(
            choose_present_mode(&[M::MAILBOX, M::FIFO], PresentPreference::Vsync),
            M::FIFO
        );
    }

    #[test]
    fn test_extent_from_surface() {
        let caps = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: 1024,
                height: 768,
            },
            ..Default::default()
        };
        let window = vk::Extent2D {
            width: 800,
            height: 600,
        };
        assert_eq!(choose_extent(&caps, window), caps.current_extent);
    }

    #[test]
    fn test_extent_clamped_window() {
        let caps = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 100,
                height: 100,
            },
            max_image_extent: vk::Extent2D {
                width: 640,
                height: 4096,
            },
            ..Default::default()
        };
        let window = vk::Extent2D {
            width: 800,
            height: 50,
        };
        assert_eq!(
            choose_extent(&caps, window),
            vk::Extent2D {
                width: 640,
                height: 100,
            }
        );
    }

    #[test]
    fn test_image_count() {
        let mut caps = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&caps), 3);
        caps.max_image_count = 8;
        assert_eq!(choose_image_count(&caps), 3);
        caps.max_image_count = 2;
        assert_eq!(choose_image_count(&caps), 2);
    }

    #[test]
    fn test_sharing_mode() {
        let same = QueueFamilies {
            graphics: 0,
            present: 0,
        };
        assert_eq!(sharing(&same), (vk::SharingMode::EXCLUSIVE, vec![]));
        let split = QueueFamilies {
            graphics: 0,
            present: 2,
        };
        assert_eq!(sharing(&split), (vk::SharingMode::CONCURRENT, vec![0, 2]));
    }

    #[test]
    fn test_adequate_support() {
        let mut support = SwapchainSupport::default();
        assert!(!support.is_adequate());
        support.formats.push(PREFERRED_FORMAT);
        assert!(!support.is_adequate());
        support.present_modes.push(vk::PresentModeKHR::FIFO);
        assert!(support.is_adequate());
    }
}
