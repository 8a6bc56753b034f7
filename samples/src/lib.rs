// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Samples
//!
//! Three progressively larger Vulkan programs sharing one bootstrap:
//!
//! - `triangle`: a shader-generated triangle
//! - `vertex_buffers`: an indexed quad from device-local buffers
//! - `uniform_buffers`: the quad spinning under a model-view-projection uniform
//!
//! Each binary picks a `Scene` and hands it to `run`.

pub mod config;
pub mod geometry;
pub mod renderer;
pub mod scene;
pub mod scenes;

use clap::Parser;

use hellovk_assets::AssetDirs;
use hellovk_vulkan::VulkanError;
use hellovk_window::{Application, EventKind, KeyCode, Signal, WindowError};

use crate::config::{Args, ConfigError, Settings};
use crate::renderer::SwapchainRenderer;
use crate::scene::Scene;

#[derive(thiserror::Error, Debug)]
pub enum SampleError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Window(#[from] WindowError),

    #[error("vulkan: {0}")]
    Vulkan(#[from] VulkanError),
}

/// Parse arguments, load settings, and run `scene` in a window until it is closed.
pub fn run<S: Scene>(scene: S, title: &str) -> Result<(), SampleError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::load(&args, title)?;
    log::info!(
        "{} {}x{}, validation {}, {:?}",
        settings.window.title,
        settings.window.width,
        settings.window.height,
        if settings.context.validation { "on" } else { "off" },
        settings.present
    );

    let assets = AssetDirs::packaged(option_env!("HELLOVK_BUILD_ASSETS_DIR"));
    let renderer = SwapchainRenderer::new(scene, settings.context, settings.present, assets);

    let mut app = Application::new(settings.window, renderer);
    app.observe(EventKind::Key(KeyCode::KeyQ), Signal::exit);
    app.run()?;
    Ok(())
}
