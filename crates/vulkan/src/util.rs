// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vulkan Utils
//!
//! Junk drawer.  Move things out when there is a place for them to belong.

use std::ffi::{CStr, c_char};

use ash::vk;

use crate::VulkanError;

/// First memory type allowed by `mem_req` that has all of the `required` properties.
pub fn find_memory_type_index(
    mem_req: &vk::MemoryRequirements,
    mem_props: &vk::PhysicalDeviceMemoryProperties,
    required: vk::MemoryPropertyFlags,
) -> Result<u32, VulkanError> {
    (0..mem_props.memory_type_count)
        .find(|&i| {
            let type_supported = (mem_req.memory_type_bits & (1 << i)) != 0;
            let props = mem_props.memory_types[i as usize].property_flags;
            type_supported && props.contains(required)
        })
        .ok_or(VulkanError::NoMemoryType)
}

/// The `required` names that do not appear in `available`.
pub fn missing_names<'a>(required: &[&'a CStr], available: &[&CStr]) -> Vec<&'a CStr> {
    required
        .iter()
        .filter(|name| !available.iter().any(|a| a == *name))
        .copied()
        .collect()
}

/// Read a fixed size, nul terminated name array as handed out by property queries.
///
/// # Safety
///
/// `raw` must contain a nul terminator, which Vulkan guarantees for its name arrays.
pub unsafe fn name_of(raw: &[c_char]) -> &CStr {
    unsafe { CStr::from_ptr(raw.as_ptr()) }
}

/// Create one object per input.  On the first failure, everything already created is handed to
/// `destroy` before the error comes back.
pub fn create_each<I, T, E>(
    inputs: impl IntoIterator<Item = I>,
    mut create: impl FnMut(I) -> Result<T, E>,
    mut destroy: impl FnMut(&T),
) -> Result<Vec<T>, E> {
    let mut created = Vec::new();
    for input in inputs {
        match create(input) {
            Ok(item) => created.push(item),
            Err(e) => {
                created.iter().for_each(&mut destroy);
                return Err(e);
            }
        }
    }
    Ok(created)
}

pub fn join_names(names: &[&CStr]) -> String {
    names
        .iter()
        .map(|n| n.to_string_lossy())
        .collect::<Vec<_>>()
        .join(", ")
}
