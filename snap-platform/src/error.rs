//! Error types for the platform layer

use thiserror::Error;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors raised while bringing up or driving a native backend
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Invalid window configuration: {0}")]
    InvalidConfig(String),

    #[error("Platform is already initialized")]
    AlreadyInitialized,

    #[error("Platform is not initialized")]
    NotInitialized,

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Graphics context creation failed: {0}")]
    ContextCreation(String),

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Dear ImGui error: {0}")]
    ImGui(#[from] dear_imgui_rs::ImGuiError),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Frame sequencing error: {0}")]
    FrameSequence(&'static str),
}

impl PlatformError {
    /// Wrap any displayable renderer failure
    pub fn renderer(err: impl std::fmt::Display) -> Self {
        Self::Renderer(err.to_string())
    }

    /// Wrap any displayable graphics context failure
    pub fn context(err: impl std::fmt::Display) -> Self {
        Self::ContextCreation(err.to_string())
    }

    /// Wrap any displayable window creation failure
    pub fn window(err: impl std::fmt::Display) -> Self {
        Self::WindowCreation(err.to_string())
    }
}
