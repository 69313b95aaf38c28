//! Window configuration and renderer identification

use crate::error::{PlatformError, PlatformResult};
use std::fmt;

/// Requested properties of the native window.
///
/// Passed to [`Platform::initialize`](crate::Platform::initialize) and read once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    /// Synchronize presentation with the display refresh where the API allows it
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "Snap Tools".to_string(),
            resizable: true,
            vsync: true,
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Reject configurations no backend can honor
    pub fn validate(&self) -> PlatformResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlatformError::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.title.is_empty() {
            return Err(PlatformError::InvalidConfig(
                "window title must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Graphics API driving a backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RendererType {
    OpenGl3,
    DirectX11,
    Metal,
    /// No GPU; frames are built but never presented
    Headless,
}

impl RendererType {
    pub fn name(self) -> &'static str {
        match self {
            RendererType::OpenGl3 => "OpenGL 3",
            RendererType::DirectX11 => "DirectX 11",
            RendererType::Metal => "Metal",
            RendererType::Headless => "Headless",
        }
    }
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_shell_window() {
        let cfg = WindowConfig::default();
        assert_eq!((cfg.width, cfg.height), (1200, 800));
        assert_eq!(cfg.title, "Snap Tools");
        assert!(cfg.resizable);
        assert!(cfg.vsync);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let cfg = WindowConfig::default().with_size(0, 600);
        assert!(matches!(
            cfg.validate(),
            Err(PlatformError::InvalidConfig(_))
        ));
        let cfg = WindowConfig::default().with_size(800, 0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        let cfg = WindowConfig::default().with_title("");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn renderer_names_are_human_readable() {
        assert_eq!(RendererType::OpenGl3.to_string(), "OpenGL 3");
        assert_eq!(RendererType::DirectX11.to_string(), "DirectX 11");
        assert_eq!(RendererType::Metal.to_string(), "Metal");
        assert_eq!(RendererType::Headless.name(), "Headless");
    }
}
