// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Window
//!
//! The platform side of a sample.  `Application` owns the event loop and one window, dispatches
//! window events to observers, and drives a `Renderer` through its lifecycle.  Nothing in here
//! knows about Vulkan.  A renderer only sees an `AppWindow`, which hands out raw window and
//! display handles for surface creation.

pub mod app;
pub mod observe;
pub mod window;

pub use app::{Application, Renderer, Signal};
pub use observe::Observers;
pub use window::{AppWindow, EventKind, Size, WindowSettings};
pub use winit::keyboard::KeyCode;

pub mod prelude {
    pub use super::WindowError;
    pub use super::app::{Application, Renderer, Signal};
    pub use super::window::{AppWindow, EventKind, Size, WindowSettings};
}

#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("renderer: {0}")]
    Renderer(Box<dyn std::error::Error + Send + Sync>),
}
