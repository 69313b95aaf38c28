//! snap-platform: native window, graphics context and Dear ImGui bridge
//!
//! One [`Platform`] implementation is compiled per target OS and handed out by
//! [`create_platform`]:
//!
//! | target  | backend            | graphics API                  |
//! |---------|--------------------|-------------------------------|
//! | Linux   | [`LinuxPlatform`]  | OpenGL 3.3 core (glutin/glow) |
//! | Windows | [`WindowsPlatform`]| Direct3D 11                   |
//! | macOS   | [`MacPlatform`]    | Metal (through wgpu)          |
//!
//! [`HeadlessPlatform`] is available everywhere and drives a real Dear ImGui
//! context without a window or GPU.
//!
//! A frame is always driven in the same order:
//!
//! ```no_run
//! use snap_platform::{create_platform, WindowConfig};
//!
//! let mut platform = create_platform();
//! platform.initialize(&WindowConfig::default())?;
//! while !platform.should_close() {
//!     platform.poll_events();
//!     platform.clear_background([0.45, 0.55, 0.60, 1.0]);
//!     let ui = platform.new_frame()?;
//!     ui.text("Hello from Snap Tools");
//!     platform.imgui_render()?;
//!     platform.render_frame()?;
//! }
//! platform.shutdown();
//! # Ok::<(), snap_platform::PlatformError>(())
//! ```

use dear_imgui_rs::Ui;
use raw_window_handle::RawWindowHandle;

mod config;
mod error;
mod factory;
mod frame;
mod headless;
#[cfg(test)]
mod test_util;

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
mod event_pump;
#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
mod imgui_bridge;
#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
mod native;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod win32;

pub use config::{RendererType, WindowConfig};
pub use error::{PlatformError, PlatformResult};
pub use factory::create_platform;
pub use headless::{HeadlessPlatform, HeadlessProbe};

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub use native::{NativePlatform, NativeWindow};

#[cfg(target_os = "linux")]
pub use linux::{GlWindow, LinuxPlatform};
#[cfg(target_os = "macos")]
pub use macos::{MacPlatform, MetalWindow};
#[cfg(target_os = "windows")]
pub use win32::{D3d11Window, WindowsPlatform};

/// Borrowed access to the graphics objects owned by a backend
#[non_exhaustive]
pub enum NativeRenderer<'a> {
    #[cfg(target_os = "linux")]
    OpenGl(&'a dear_imgui_glow::glow::Context),
    #[cfg(target_os = "windows")]
    Direct3D11 {
        device: &'a ::windows::Win32::Graphics::Direct3D11::ID3D11Device,
        context: &'a ::windows::Win32::Graphics::Direct3D11::ID3D11DeviceContext,
    },
    #[cfg(target_os = "macos")]
    Metal {
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    },
    /// The headless backend only owns a Dear ImGui context
    Headless(&'a dear_imgui_rs::Context),
}

/// Window, renderer and Dear ImGui lifecycle of one backend.
///
/// Per-frame calls must follow `clear_background → new_frame → (UI calls) →
/// imgui_render → render_frame`. Calls made before [`initialize`](Self::initialize)
/// or after [`shutdown`](Self::shutdown) return [`PlatformError::NotInitialized`]
/// or do nothing.
pub trait Platform {
    /// Create the window, the graphics context and the Dear ImGui context.
    ///
    /// On failure everything acquired so far is released before returning.
    fn initialize(&mut self, config: &WindowConfig) -> PlatformResult<()>;

    /// Release Dear ImGui, then the graphics context, then the window.
    ///
    /// Idempotent and safe on a backend that was never initialized.
    fn shutdown(&mut self);

    fn is_initialized(&self) -> bool;

    /// True once a close request or event-loop exit has been observed. Never resets.
    fn should_close(&self) -> bool;

    /// Drain pending native events without blocking and forward them to Dear ImGui
    fn poll_events(&mut self);

    fn set_window_title(&mut self, title: &str);

    /// Current client area size in physical pixels
    fn window_size(&self) -> Option<(u32, u32)>;

    fn set_window_size(&mut self, width: u32, height: u32);

    /// Clear the color target; `color` is RGBA in `0.0..=1.0`
    fn clear_background(&mut self, color: [f32; 4]);

    /// Begin a renderer frame and a Dear ImGui frame
    fn new_frame(&mut self) -> PlatformResult<&mut Ui>;

    /// Finalize the Dear ImGui draw data for the current frame
    fn imgui_render(&mut self) -> PlatformResult<()>;

    /// Submit the finalized draw data and present it
    fn render_frame(&mut self) -> PlatformResult<()>;

    fn renderer_type(&self) -> RendererType;

    /// Instantaneous framerate reported by Dear ImGui, `0.0` when not initialized
    fn framerate(&self) -> f32;

    fn native_window(&self) -> Option<RawWindowHandle>;

    fn native_renderer(&self) -> Option<NativeRenderer<'_>>;
}
