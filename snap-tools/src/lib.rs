//! Snap Tools: a cross-platform Dear ImGui desktop shell
//!
//! [`Application`] owns a [`snap_platform::Platform`] backend and a
//! [`UiManager`], and drives them one frame at a time:
//!
//! ```text
//! poll_events → update (frame statistics) → render
//!   render = clear_background → new_frame → UiManager::render → imgui_render → render_frame
//! ```
//!
//! The backend comes from [`snap_platform::create_platform`] unless one is
//! injected with [`Application::with_platform`].

pub mod application;
pub mod config;
pub mod error;
pub mod frame_stats;
pub mod logging;
pub mod ui_manager;

#[cfg(test)]
mod test_util;

pub use application::{AppState, Application};
pub use config::{AppConfig, Theme};
pub use error::AppError;
pub use frame_stats::{FRAME_HISTORY_LEN, FrameTimeHistory};
pub use ui_manager::{DemoState, SettingsState, UiActions, UiManager};

pub use snap_platform::{RendererType, WindowConfig};
