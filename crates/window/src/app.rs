// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # App
//!
//! The frame loop.  The event loop polls, so `about_to_wait` fires whenever the platform queue is
//! drained, and that is where a frame gets rendered.  Rendering is synchronous.  A renderer that
//! blocks on its fences paces the loop.
//!
//! Lifecycle, in order:
//!
//! 1. `resumed` creates the window and then the renderer.  Observers see `Created`.
//! 2. `Resized` events resize the renderer before observers see them.
//! 3. Every drained queue renders once.
//! 4. Exit destroys the renderer exactly once, before the window is dropped.
//!
//! A renderer error stops the loop and comes back out of `run`.

use std::marker::PhantomData;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::WindowId,
};

use crate::observe::Observers;
use crate::prelude::*;

/// The graphics side of an application.  `W` is the window it draws into.
pub trait Renderer<W = AppWindow> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The window was just created.
    fn create(&mut self, window: &W) -> Result<(), Self::Error>;

    /// `size` may be empty while the window is minimized.
    fn resize(&mut self, window: &W, size: Size) -> Result<(), Self::Error>;

    fn render(&mut self, window: &W) -> Result<(), Self::Error>;

    /// Release everything.  Called once, and only after a successful `create`.
    fn destroy(&mut self);
}

/// Handed to observers so they can act on the loop.
#[derive(Debug, Default)]
pub struct Signal {
    exit: bool,
}

impl Signal {
    /// Leave the loop after this handler returns.
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// What the event loop should do after a lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl Flow {
    fn apply(self, event_loop: &ActiveEventLoop) {
        if self == Flow::Exit {
            event_loop.exit();
        }
    }
}

/// Renderer state and observers, independent of any running event loop.
struct Lifecycle<R, W> {
    renderer: R,
    observers: Observers<EventKind, Signal>,

    created: bool,
    destroyed: bool,
    error: Option<WindowError>,
    window: PhantomData<fn(&W)>,
}

impl<W, R: Renderer<W>> Lifecycle<R, W> {
    fn new(renderer: R) -> Self {
        let mut observers = Observers::new();
        observers.observe(EventKind::CloseRequested, Signal::exit);
        observers.observe(EventKind::Key(KeyCode::Escape), Signal::exit);
        Self {
            renderer,
            observers,
            created: false,
            destroyed: false,
            error: None,
            window: PhantomData,
        }
    }

    fn is_live(&self) -> bool {
        self.created && !self.destroyed
    }

    fn create(&mut self, window: &W) -> Flow {
        if let Err(e) = self.renderer.create(window) {
            return self.renderer_failed(e);
        }
        self.created = true;
        self.dispatch(EventKind::Created)
    }

    /// The renderer sees a resize before any observer does.
    fn window_event(&mut self, window: &W, event: &WindowEvent) -> Flow {
        if !self.is_live() {
            return Flow::Continue;
        }

        if let WindowEvent::Resized(size) = event
            && let Err(e) = self.renderer.resize(window, (*size).into())
        {
            return self.renderer_failed(e);
        }

        match EventKind::of(event) {
            Some(kind) => self.dispatch(kind),
            None => Flow::Continue,
        }
    }

    fn frame(&mut self, window: &W) -> Flow {
        if !self.is_live() {
            return Flow::Continue;
        }
        match self.renderer.render(window) {
            Ok(()) => Flow::Continue,
            Err(e) => self.renderer_failed(e),
        }
    }

    fn dispatch(&mut self, kind: EventKind) -> Flow {
        let mut signal = Signal::default();
        if self.observers.invoke(&kind, &mut signal) {
            log::trace!("handled {kind:?}");
        }
        if signal.exit_requested() {
            self.shutdown();
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    fn fail(&mut self, error: WindowError) -> Flow {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.shutdown();
        Flow::Exit
    }

    fn renderer_failed(&mut self, error: R::Error) -> Flow {
        self.fail(WindowError::Renderer(Box::new(error)))
    }

    fn shutdown(&mut self) {
        if self.is_live() {
            log::debug!("destroying renderer");
            self.renderer.destroy();
            self.destroyed = true;
        }
    }

    /// Hands the renderer back unless something failed.
    fn finish(mut self) -> Result<R, WindowError> {
        self.shutdown();
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self.renderer),
        }
    }
}

pub struct Application<R: Renderer> {
    settings: WindowSettings,
    window: Option<AppWindow>,
    lifecycle: Lifecycle<R, AppWindow>,
}

impl<R: Renderer> Application<R> {
    /// Closing the window and pressing escape both exit.  Observe those kinds to override.
    pub fn new(settings: WindowSettings, renderer: R) -> Self {
        Self {
            settings,
            window: None,
            lifecycle: Lifecycle::new(renderer),
        }
    }

    pub fn observe<F>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: FnMut(&mut Signal) + 'static,
    {
        self.lifecycle.observers.observe(kind, handler);
        self
    }

    pub fn forget(&mut self, kind: EventKind) -> &mut Self {
        self.lifecycle.observers.forget(&kind);
        self
    }

    /// Block until the loop exits.  Hands the renderer back on a clean exit.
    pub fn run(mut self) -> Result<R, WindowError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        // Platforms may end the loop without going through `exiting`.
        self.lifecycle.finish()
    }
}

impl<R: Renderer> ApplicationHandler for Application<R> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Desktop platforms resume once.  The window and renderer are not rebuilt.
        if self.window.is_some() || self.lifecycle.error.is_some() {
            return;
        }
        let flow = match AppWindow::new(event_loop, &self.settings) {
            Ok(window) => self.lifecycle.create(self.window.insert(window)),
            Err(e) => self.lifecycle.fail(e),
        };
        flow.apply(event_loop);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(window) = &self.window {
            self.lifecycle.window_event(window, &event).apply(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            self.lifecycle.frame(window).apply(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.lifecycle.shutdown();
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use winit::dpi::PhysicalSize;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("device lost")]
    struct Lost;

    /// Stands in for a platform window.
    struct Headless;

    /// Renders until `fail_after` frames have succeeded.
    #[derive(Default)]
    struct Scripted {
        log: Rc<RefCell<Vec<String>>>,
        fail_create: bool,
        fail_after: Option<u32>,
        rendered: u32,
        destroyed: u32,
    }

    impl Renderer<Headless> for Scripted {
        type Error = Lost;

        fn create(&mut self, _window: &Headless) -> Result<(), Lost> {
            if self.fail_create { Err(Lost) } else { Ok(()) }
        }

        fn resize(&mut self, _window: &Headless, size: Size) -> Result<(), Lost> {
            self.log
                .borrow_mut()
                .push(format!("resize {}x{}", size.width, size.height));
            Ok(())
        }

        fn render(&mut self, _window: &Headless) -> Result<(), Lost> {
            if self.fail_after == Some(self.rendered) {
                return Err(Lost);
            }
            self.rendered += 1;
            Ok(())
        }

        fn destroy(&mut self) {
            self.destroyed += 1;
        }
    }

    fn resized(width: u32, height: u32) -> WindowEvent {
        WindowEvent::Resized(PhysicalSize::new(width, height))
    }

    #[test]
    fn test_default_exit_observers() {
        let mut lifecycle = Lifecycle::<_, Headless>::new(Scripted::default());
        for kind in [EventKind::CloseRequested, EventKind::Key(KeyCode::Escape)] {
            let mut signal = Signal::default();
            assert!(lifecycle.observers.invoke(&kind, &mut signal));
            assert!(signal.exit_requested());
        }
        assert!(!lifecycle.observers.is_observed(&EventKind::Resized));
    }

    #[test]
    fn test_override_close() {
        let mut lifecycle = Lifecycle::new(Scripted::default());
        lifecycle.observers.observe(EventKind::CloseRequested, |_| {});
        assert_eq!(lifecycle.create(&Headless), Flow::Continue);
        assert_eq!(
            lifecycle.window_event(&Headless, &WindowEvent::CloseRequested),
            Flow::Continue
        );
        assert!(lifecycle.is_live());

        lifecycle.observers.forget(&EventKind::Key(KeyCode::Escape));
        assert!(!lifecycle.observers.is_observed(&EventKind::Key(KeyCode::Escape)));
    }

    #[test]
    fn test_nothing_renders_before_create() {
        let mut lifecycle = Lifecycle::new(Scripted::default());
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(lifecycle.window_event(&Headless, &resized(4, 4)), Flow::Continue);
        assert_eq!(lifecycle.renderer.rendered, 0);
        assert!(lifecycle.renderer.log.borrow().is_empty());

        // Never created, never destroyed.
        lifecycle.shutdown();
        assert_eq!(lifecycle.renderer.destroyed, 0);
    }

    #[test]
    fn test_close_destroys_once() {
        let mut lifecycle = Lifecycle::new(Scripted::default());
        assert_eq!(lifecycle.create(&Headless), Flow::Continue);
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(
            lifecycle.window_event(&Headless, &WindowEvent::CloseRequested),
            Flow::Exit
        );
        assert_eq!(lifecycle.renderer.destroyed, 1);

        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(lifecycle.renderer.rendered, 1);
        lifecycle.shutdown();

        let renderer = lifecycle.finish().unwrap();
        assert_eq!(renderer.destroyed, 1);
    }

    #[test]
    fn test_resize_reaches_renderer_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = Lifecycle::new(Scripted {
            log: log.clone(),
            ..Default::default()
        });
        let seen = log.clone();
        lifecycle.observers.observe(EventKind::Resized, move |_| {
            seen.borrow_mut().push("observer".to_owned());
        });

        lifecycle.create(&Headless);
        assert_eq!(lifecycle.window_event(&Headless, &resized(640, 480)), Flow::Continue);
        assert_eq!(*log.borrow(), ["resize 640x480", "observer"]);
    }

    #[test]
    fn test_render_error_stops_loop() {
        let mut lifecycle = Lifecycle::new(Scripted {
            fail_after: Some(2),
            ..Default::default()
        });
        lifecycle.create(&Headless);
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(lifecycle.frame(&Headless), Flow::Exit);
        assert_eq!(lifecycle.renderer.destroyed, 1);
        assert!(!lifecycle.is_live());

        // Nothing reaches the renderer after the failure.
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        lifecycle.window_event(&Headless, &resized(1, 1));
        assert_eq!(lifecycle.renderer.rendered, 2);
        assert!(lifecycle.renderer.log.borrow().is_empty());
        assert_eq!(lifecycle.renderer.destroyed, 1);

        match lifecycle.finish() {
            Err(WindowError::Renderer(e)) => assert_eq!(e.to_string(), "device lost"),
            other => panic!("unexpected: {:?}", other.err()),
        }
    }

    #[test]
    fn test_create_error_skips_destroy() {
        let mut lifecycle = Lifecycle::new(Scripted {
            fail_create: true,
            ..Default::default()
        });
        assert_eq!(lifecycle.create(&Headless), Flow::Exit);
        assert!(!lifecycle.is_live());
        assert_eq!(lifecycle.frame(&Headless), Flow::Continue);
        assert_eq!(lifecycle.renderer.rendered, 0);
        assert_eq!(lifecycle.renderer.destroyed, 0);
        assert!(matches!(lifecycle.finish(), Err(WindowError::Renderer(_))));
    }
}
