// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vulkan
//!
//! The bootstrap every sample runs, in creation order:
//!
//! - `VkContext`: instance, debug messenger, surface, physical device, logical device, queues and
//!   the command pool
//! - `Swapchain`: images and image views
//! - `render_pass`: the render pass and one framebuffer per image view
//! - `GraphicsPipeline`
//! - `commands`: command buffers recorded once per swapchain
//! - `FrameSync`: semaphores and fences for frames in flight
//!
//! `buffer` and `descriptors` hold what the samples bind into the pipeline.  Teardown runs in the
//! reverse order.  Nothing here uses RAII.  Each type has a `destroy` that the owner calls while
//! the device is idle, and the validation layers catch lifecycle mistakes.

pub mod buffer;
pub mod commands;
pub mod context;
pub mod debug;
pub mod descriptors;
pub mod device;
pub mod pipeline;
pub mod queue;
pub mod render_pass;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod util;

use ash::vk;

pub use ash;

pub mod prelude {
    pub use super::VulkanError;
    pub use crate::context::{ContextOptions, VkContext};
}

#[derive(thiserror::Error, Debug)]
pub enum VulkanError {
    #[error("Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("Ash: {0}")]
    Ash(#[from] vk::Result),

    #[error("window handle: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error("asset: {0}")]
    Asset(#[from] hellovk_assets::AssetError),

    #[error("requested layers are not available: {0}")]
    MissingLayers(String),

    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,

    #[error("failed to find suitable memory type")]
    NoMemoryType,
}
