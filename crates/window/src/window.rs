// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # App Window
//!
//! Thin wrapper over a winit window.  Sizes are physical pixels throughout since that is what a
//! swapchain extent is measured in.

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "hellovk".to_owned(),
            width: 800,
            height: 600,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimized windows report a zero dimension.  Nothing can be presented at that size.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for Size {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// The events observers can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The window exists and the renderer has been created for it.
    Created,
    Resized,
    CloseRequested,
    Destroyed,
    /// Gained focus.
    Focused,
    /// A key went down.  Repeats are not reported.
    Key(KeyCode),
}

impl EventKind {
    pub fn of(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::Resized(_) => Some(Self::Resized),
            WindowEvent::CloseRequested => Some(Self::CloseRequested),
            WindowEvent::Destroyed => Some(Self::Destroyed),
            WindowEvent::Focused(true) => Some(Self::Focused),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(code) => Some(Self::Key(code)),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        }
    }
}

pub struct AppWindow {
    window: Window,
}

impl AppWindow {
    pub fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> Result<Self, WindowError> {
        let attrs = Window::default_attributes()
            .with_title(settings.title.as_str())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height))
            .with_visible(settings.visible);
        let window = event_loop.create_window(attrs)?;
        log::debug!(
            "created window {:?} {}x{}",
            settings.title,
            settings.width,
            settings.height
        );
        Ok(Self { window })
    }

    pub fn size(&self) -> Size {
        self.window.inner_size().into()
    }

    /// The platform may pick a different size.  A `Resized` event follows either way.
    pub fn set_size(&self, width: u32, height: u32) {
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(width, height));
    }

    pub fn show(&self) {
        self.window.set_visible(true);
    }

    pub fn hide(&self) {
        self.window.set_visible(false);
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl HasWindowHandle for AppWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.window.window_handle()
    }
}

impl HasDisplayHandle for AppWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.window.display_handle()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_size() {
        assert!(Size::new(0, 600).is_empty());
        assert!(Size::new(800, 0).is_empty());
        assert!(!Size::new(800, 600).is_empty());
        assert_eq!(Size::from(PhysicalSize::new(3, 4)), Size::new(3, 4));
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(
            EventKind::of(&WindowEvent::Resized(PhysicalSize::new(0, 0))),
            Some(EventKind::Resized)
        );
        assert_eq!(
            EventKind::of(&WindowEvent::CloseRequested),
            Some(EventKind::CloseRequested)
        );
        assert_eq!(
            EventKind::of(&WindowEvent::Destroyed),
            Some(EventKind::Destroyed)
        );
        assert_eq!(
            EventKind::of(&WindowEvent::Focused(true)),
            Some(EventKind::Focused)
        );
        assert_eq!(EventKind::of(&WindowEvent::Focused(false)), None);
        assert_eq!(EventKind::of(&WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn test_default_settings() {
        let settings = WindowSettings::default();
        assert_eq!((settings.width, settings.height), (800, 600));
        assert!(settings.visible);
    }
}
