// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Device
//!
//! Physical device selection is a first-match scan in enumeration order.  A device qualifies when
//! it has graphics and present queues, supports every required extension, and offers at least one
//! surface format and present mode.  There is no scoring.

use std::ffi::CStr;

use ash::vk;

use crate::prelude::*;
use crate::queue::{QueueFamilies, QueueFamilyIndices};
use crate::swapchain::SwapchainSupport;
use crate::util;

pub const DEVICE_EXTENSIONS: [&CStr; 1] = [ash::khr::swapchain::NAME];

/// A device that passed selection, with the queue families it will be created with.
pub struct Selected {
    pub physical_device: vk::PhysicalDevice,
    pub families: QueueFamilies,
}

pub fn device_name(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> String {
    let props = unsafe { instance.get_physical_device_properties(physical_device) };
    unsafe { util::name_of(&props.device_name) }
        .to_string_lossy()
        .into_owned()
}

pub fn find_queue_families(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    physical_device: vk::PhysicalDevice,
) -> Result<QueueFamilyIndices, VulkanError> {
    let families =
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
    QueueFamilyIndices::find(&families, |i| {
        Ok(unsafe {
            surface_loader.get_physical_device_surface_support(physical_device, i, surface)?
        })
    })
}

pub fn missing_extensions(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> Result<Vec<&'static CStr>, VulkanError> {
    let props = unsafe { instance.enumerate_device_extension_properties(physical_device)? };
    let available: Vec<&CStr> = props
        .iter()
        .map(|p| unsafe { util::name_of(&p.extension_name) })
        .collect();
    Ok(util::missing_names(&DEVICE_EXTENSIONS, &available))
}

/// `None` when the device does not qualify.
pub fn is_device_suitable(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    physical_device: vk::PhysicalDevice,
) -> Result<Option<QueueFamilies>, VulkanError> {
    let missing = missing_extensions(instance, physical_device)?;
    if !missing.is_empty() {
        log::debug!("  missing extensions: {}", util::join_names(&missing));
        return Ok(None);
    }

    let support = SwapchainSupport::query(surface_loader, physical_device, surface)?;
    if !support.is_adequate() {
        log::debug!("  no surface formats or present modes");
        return Ok(None);
    }

    Ok(find_queue_families(instance, surface_loader, surface, physical_device)?.resolve())
}

pub fn pick_physical_device(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
) -> Result<Selected, VulkanError> {
    let physical_devices = unsafe { instance.enumerate_physical_devices()? };
    for physical_device in physical_devices {
        let name = device_name(instance, physical_device);
        log::debug!("Device: {name}");
        if let Some(families) =
            is_device_suitable(instance, surface_loader, surface, physical_device)?
        {
            log::info!(
                "using {name} (graphics family {}, present family {})",
                families.graphics,
                families.present
            );
            return Ok(Selected {
                physical_device,
                families,
            });
        }
    }
    Err(VulkanError::NoSuitableDevice)
}
