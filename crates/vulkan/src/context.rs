// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Context
//!
//! Fundamentally required resources, including the entry, instance, surface and hardware devices,
//! are encapsulated by `VkContext`.  Everything created later borrows the logical device from
//! here.
//!
//! The surface belongs to the context rather than the swapchain.  Device selection has to ask the
//! surface about presentation support, so it must exist before a device does.

use std::ffi::{CStr, CString, c_char};

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::debug::{DebugMessenger, VALIDATION_LAYER};
use crate::device::{self, DEVICE_EXTENSIONS};
use crate::prelude::*;
use crate::queue::Queues;
use crate::util;

#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub application_name: CString,
    /// Enable the Khronos validation layer and route its messages into the log.
    pub validation: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            application_name: c"hellovk".to_owned(),
            validation: cfg!(debug_assertions),
        }
    }
}

pub struct VkContext {
    pub entry: ash::Entry,
    pub instance: ash::Instance,
    debug: Option<DebugMessenger>,
    /// Used to access surface query functions
    pub surface_loader: ash::khr::surface::Instance,
    pub surface: vk::SurfaceKHR,

    pub physical_device: vk::PhysicalDevice,
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
    /// Vulkan logical device
    pub device: ash::Device,
    /// Queues and command pool for device in use.
    pub queues: Queues,
}

impl VkContext {
    /// Obtain an entry, instance, surface for `window`, and an initialized device.
    pub fn new<W>(window: &W, options: &ContextOptions) -> Result<Self, VulkanError>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        let entry = unsafe { ash::Entry::load()? };

        if options.validation {
            check_validation_layer(&entry)?;
        }

        let display_handle = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        let available_exts = unsafe { entry.enumerate_instance_extension_properties(None)? };
        log::debug!("available instance extensions:");
        for ext in &available_exts {
            log::debug!("  {:?}", unsafe { util::name_of(&ext.extension_name) });
        }

        let mut required_exts: Vec<*const c_char> =
            ash_window::enumerate_required_extensions(display_handle)?.to_vec();
        if options.validation {
            required_exts.push(ash::ext::debug_utils::NAME.as_ptr());
        }

        let layers = validation_layers(options.validation);

        let app_info = vk::ApplicationInfo::default()
            .application_name(&options.application_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(c"No Engine")
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let instance_ci = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&required_exts)
            .enabled_layer_names(&layers);

        let instance = unsafe { entry.create_instance(&instance_ci, None)? };

        let debug = if options.validation {
            Some(DebugMessenger::new(&entry, &instance)?)
        } else {
            None
        };

        let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);
        let surface = unsafe {
            ash_window::create_surface(&entry, &instance, display_handle, window_handle, None)?
        };

        let selected = device::pick_physical_device(&instance, &surface_loader, surface)?;
        let physical_device = selected.physical_device;
        let memory_properties =
            unsafe { instance.get_physical_device_memory_properties(physical_device) };

        let queue_priorities = [1.0];
        let queue_cis = selected.families.queue_cis(&queue_priorities);
        let device_exts: Vec<*const c_char> =
            DEVICE_EXTENSIONS.iter().map(|e| e.as_ptr()).collect();
        let features = vk::PhysicalDeviceFeatures::default();

        // Device layers are ignored by current loaders but older ones still read them.
        #[allow(deprecated)]
        let device_ci = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_cis)
            .enabled_extension_names(&device_exts)
            .enabled_layer_names(&layers)
            .enabled_features(&features);

        let device = unsafe { instance.create_device(physical_device, &device_ci, None)? };
        let queues = Queues::new(&device, selected.families)?;

        Ok(Self {
            entry,
            instance,
            debug,
            surface_loader,
            surface,
            physical_device,
            memory_properties,
            device,
            queues,
        })
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }

    pub fn wait_idle(&self) -> Result<(), VulkanError> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }

    pub fn find_memory_type(
        &self,
        requirements: &vk::MemoryRequirements,
        flags: vk::MemoryPropertyFlags,
    ) -> Result<u32, VulkanError> {
        util::find_memory_type_index(requirements, &self.memory_properties, flags)
    }

    // XXX in reality, this consumes the context, but ownership friction needs worked out.
    pub fn destroy(&self) {
        self.queues.destroy(&self.device);
        unsafe {
            self.device.destroy_device(None);
            self.surface_loader.destroy_surface(self.surface, None);
        }
        if let Some(debug) = &self.debug {
            debug.destroy();
        }
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}

fn validation_layers(validation: bool) -> Vec<*const c_char> {
    if validation {
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        Vec::new()
    }
}

fn check_validation_layer(entry: &ash::Entry) -> Result<(), VulkanError> {
    let props = unsafe { entry.enumerate_instance_layer_properties()? };
    let available: Vec<&CStr> = props
        .iter()
        .map(|p| unsafe { util::name_of(&p.layer_name) })
        .collect();
    let missing = util::missing_names(&[VALIDATION_LAYER], &available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(VulkanError::MissingLayers(util::join_names(&missing)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validation_layer_list() {
        assert!(validation_layers(false).is_empty());
        let layers = validation_layers(true);
        assert_eq!(layers.len(), 1);
        assert_eq!(unsafe { CStr::from_ptr(layers[0]) }, VALIDATION_LAYER);
    }

    #[test]
    fn test_default_options() {
        let options = ContextOptions::default();
        assert_eq!(options.application_name.as_c_str(), c"hellovk");
        assert_eq!(options.validation, cfg!(debug_assertions));
    }
}
