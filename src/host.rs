//! Desktop window acting as the frame source.
//!
//! Instead of handing control to `EventLoop::run_app`, the host pumps winit
//! events from the frame loop and reports a frame once a redraw is due.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use crate::frame_loop::{FrameSource, FrameTick, StopFlag};
use crate::params::RenderConfig;
use crate::viewport::Viewport;

/// Window plus the event loop feeding it
pub struct WindowHost {
    event_loop: EventLoop<()>,
    handler: HostHandler,
    window: Arc<Window>,
    started: Instant,
    index: u64,
}

impl WindowHost {
    /// Create the event loop and pump it until the window exists
    pub fn new(title: &str, config: &RenderConfig, stop: StopFlag) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut handler = HostHandler {
            title: title.to_string(),
            size: PhysicalSize::new(config.window_width, config.window_height),
            window: None,
            create_error: None,
            redraw_requested: false,
            resized: None,
            closed: false,
            stop,
        };

        let window = loop {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(16)), &mut handler);
            if let Some(e) = handler.create_error.take() {
                return Err(e);
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before a window was created");
            }
            if let Some(window) = &handler.window {
                break Arc::clone(window);
            }
        };

        Ok(Self {
            event_loop,
            handler,
            window,
            started: Instant::now(),
            index: 0,
        })
    }

    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }
}

impl FrameSource for WindowHost {
    fn next_frame(&mut self) -> Option<FrameTick> {
        loop {
            if self.handler.closed {
                return None;
            }

            if std::mem::take(&mut self.handler.redraw_requested) {
                let tick = FrameTick {
                    index: self.index,
                    elapsed: self.started.elapsed(),
                    resized: self.handler.resized.take(),
                };
                self.index += 1;
                return Some(tick);
            }

            // Blocks until winit has events; about_to_wait keeps redraws coming
            if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(None, &mut self.handler)
            {
                log::debug!("event loop exited with code {code}");
                self.handler.closed = true;
            }
        }
    }
}

/// Event state collected between frames
struct HostHandler {
    title: String,
    size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,
    redraw_requested: bool,
    resized: Option<Viewport>,
    closed: bool,
    stop: StopFlag,
}

impl ApplicationHandler for HostHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size);

        match event_loop.create_window(attributes) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.create_error = Some(anyhow::Error::new(e).context("failed to create window"));
                self.closed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.closed = true;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                log::info!("escape pressed, stopping");
                self.stop.stop();
            }
            WindowEvent::Resized(size) => {
                self.resized = Some(Viewport::new(size.width, size.height));
            }
            WindowEvent::RedrawRequested => {
                self.redraw_requested = true;
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
