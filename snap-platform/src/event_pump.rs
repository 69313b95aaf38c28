//! Non-blocking winit event loop shared by the native backends.
//!
//! The application owns the frame loop, so winit is driven with
//! `pump_app_events` and a zero timeout instead of `run_app`. The window and
//! graphics stack are built from the first `resumed` callback, which is where
//! winit 0.30 expects windows to be created.

use crate::config::WindowConfig;
use crate::error::{PlatformError, PlatformResult};
use crate::native::NativeWindow;
use std::time::Duration;
use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

/// Upper bound on startup pumps while waiting for `resumed`
const STARTUP_PUMP_LIMIT: usize = 64;

pub(crate) fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.width as f64,
            config.height as f64,
        ))
        .with_resizable(config.resizable)
}

struct PumpState<W> {
    config: WindowConfig,
    native: Option<W>,
    create_error: Option<PlatformError>,
    close_requested: bool,
}

impl<W: NativeWindow> ApplicationHandler for PumpState<W> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.native.is_some() || self.create_error.is_some() {
            return;
        }
        match W::create(event_loop, &self.config) {
            Ok(native) => {
                info!("Window created ({}x{})", self.config.width, self.config.height);
                self.native = Some(native);
            }
            Err(err) => {
                self.create_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        if native.window().id() != window_id {
            return;
        }

        let full_event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        native.handle_event(&full_event);

        match event {
            WindowEvent::Resized(size) => native.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = native.window().inner_size();
                native.resize(size);
            }
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                if !self.close_requested {
                    debug!("Window close requested");
                }
                self.close_requested = true;
            }
            _ => {}
        }
    }
}

/// Owns the event loop and the backend window created from it.
///
/// Field order is drop order: the window stack goes before the event loop.
pub(crate) struct EventPump<W> {
    state: PumpState<W>,
    event_loop: EventLoop<()>,
}

impl<W: NativeWindow> EventPump<W> {
    /// Create the event loop and pump it until the backend window exists
    pub(crate) fn start(config: &WindowConfig) -> PlatformResult<Self> {
        let event_loop =
            EventLoop::new().map_err(|err| PlatformError::EventLoop(err.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut pump = Self {
            state: PumpState {
                config: config.clone(),
                native: None,
                create_error: None,
                close_requested: false,
            },
            event_loop,
        };

        for _ in 0..STARTUP_PUMP_LIMIT {
            pump.pump();
            if pump.state.native.is_some() || pump.state.create_error.is_some() {
                break;
            }
        }

        if let Some(err) = pump.state.create_error.take() {
            return Err(err);
        }
        if pump.state.native.is_none() {
            return Err(PlatformError::WindowCreation(
                "event loop never resumed".to_string(),
            ));
        }
        Ok(pump)
    }

    /// Dispatch every pending event once, without waiting
    pub(crate) fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            if !self.state.close_requested {
                debug!("Event loop exited with code {code}");
            }
            self.state.close_requested = true;
        }
    }

    pub(crate) fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    pub(crate) fn native(&self) -> Option<&W> {
        self.state.native.as_ref()
    }

    pub(crate) fn native_mut(&mut self) -> Option<&mut W> {
        self.state.native.as_mut()
    }

    /// Detach the window stack so it can be torn down before the event loop
    pub(crate) fn take_native(&mut self) -> Option<W> {
        self.state.native.take()
    }
}
