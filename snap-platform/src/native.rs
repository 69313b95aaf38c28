//! Generic winit-based backend.
//!
//! [`NativePlatform`] owns the event loop, the frame sequencing and the close
//! flag; each OS supplies only its window and graphics stack through
//! [`NativeWindow`].

use crate::config::{RendererType, WindowConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::event_pump::EventPump;
use crate::frame::FramePhase;
use crate::{NativeRenderer, Platform};
use dear_imgui_rs::Ui;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// Window, graphics context and Dear ImGui renderer of one OS backend
pub trait NativeWindow: Sized {
    const RENDERER: RendererType;

    /// Build the whole stack. Anything created before a failure is dropped on return.
    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> PlatformResult<Self>;

    fn window(&self) -> &Window;

    /// Forward a window event to Dear ImGui
    fn handle_event(&mut self, event: &Event<()>);

    /// Resize the swap chain or surface; `size` is in physical pixels
    fn resize(&mut self, size: PhysicalSize<u32>);

    fn clear(&mut self, color: [f32; 4]);

    fn begin_frame(&mut self) -> PlatformResult<&mut Ui>;

    fn end_frame(&mut self);

    /// Draw the finalized draw data and present it
    fn present(&mut self) -> PlatformResult<()>;

    fn framerate(&self) -> f32;

    fn native_renderer(&self) -> Option<NativeRenderer<'_>>;

    /// Tear down Dear ImGui, then the graphics objects, then the window
    fn destroy(self);
}

/// A [`Platform`] driving winit plus one [`NativeWindow`] stack
pub struct NativePlatform<W: NativeWindow> {
    pump: Option<EventPump<W>>,
    phase: FramePhase,
    should_close: bool,
}

impl<W: NativeWindow> Default for NativePlatform<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: NativeWindow> NativePlatform<W> {
    /// Create an uninitialized backend; no OS resources are touched
    pub fn new() -> Self {
        Self {
            pump: None,
            phase: FramePhase::Idle,
            should_close: false,
        }
    }

    fn native(&self) -> Option<&W> {
        self.pump.as_ref().and_then(EventPump::native)
    }

    fn native_mut(&mut self) -> Option<&mut W> {
        self.pump.as_mut().and_then(EventPump::native_mut)
    }
}

impl<W: NativeWindow> Platform for NativePlatform<W> {
    fn initialize(&mut self, config: &WindowConfig) -> PlatformResult<()> {
        if self.pump.is_some() {
            return Err(PlatformError::AlreadyInitialized);
        }
        config.validate()?;

        let pump = EventPump::<W>::start(config)?;
        self.pump = Some(pump);
        self.phase = FramePhase::Idle;
        info!("{} platform initialized", W::RENDERER);
        Ok(())
    }

    fn shutdown(&mut self) {
        let Some(mut pump) = self.pump.take() else {
            return;
        };
        if let Some(native) = pump.take_native() {
            native.destroy();
        }
        drop(pump);
        self.phase = FramePhase::Idle;
        info!("{} platform shut down", W::RENDERER);
    }

    fn is_initialized(&self) -> bool {
        self.pump.is_some()
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn poll_events(&mut self) {
        if let Some(pump) = self.pump.as_mut() {
            pump.pump();
            if pump.close_requested() {
                self.should_close = true;
            }
        }
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(native) = self.native() {
            native.window().set_title(title);
        }
    }

    fn window_size(&self) -> Option<(u32, u32)> {
        self.native().map(|native| {
            let size = native.window().inner_size();
            (size.width, size.height)
        })
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!("Ignoring zero window size {width}x{height}");
            return;
        }
        if let Some(native) = self.native_mut() {
            // Some platforms apply the size synchronously and send no Resized event
            if let Some(size) = native
                .window()
                .request_inner_size(PhysicalSize::new(width, height))
            {
                native.resize(size);
            }
        }
    }

    fn clear_background(&mut self, color: [f32; 4]) {
        if let Some(native) = self.native_mut() {
            native.clear(color);
        }
    }

    fn new_frame(&mut self) -> PlatformResult<&mut Ui> {
        let native = self
            .pump
            .as_mut()
            .and_then(EventPump::native_mut)
            .ok_or(PlatformError::NotInitialized)?;
        self.phase.begin()?;
        native.begin_frame()
    }

    fn imgui_render(&mut self) -> PlatformResult<()> {
        let native = self
            .pump
            .as_mut()
            .and_then(EventPump::native_mut)
            .ok_or(PlatformError::NotInitialized)?;
        self.phase.finalize()?;
        native.end_frame();
        Ok(())
    }

    fn render_frame(&mut self) -> PlatformResult<()> {
        let native = self
            .pump
            .as_mut()
            .and_then(EventPump::native_mut)
            .ok_or(PlatformError::NotInitialized)?;
        self.phase.present()?;
        native.present()
    }

    fn renderer_type(&self) -> RendererType {
        W::RENDERER
    }

    fn framerate(&self) -> f32 {
        self.native().map(W::framerate).unwrap_or(0.0)
    }

    fn native_window(&self) -> Option<RawWindowHandle> {
        let native = self.native()?;
        native
            .window()
            .window_handle()
            .ok()
            .map(|handle| handle.as_raw())
    }

    fn native_renderer(&self) -> Option<NativeRenderer<'_>> {
        self.native().and_then(W::native_renderer)
    }
}

impl<W: NativeWindow> Drop for NativePlatform<W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
