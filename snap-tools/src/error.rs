use snap_platform::PlatformError;
use thiserror::Error;

/// Errors surfaced by [`Application`](crate::Application)
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("Application is not initialized")]
    NotInitialized,
    #[error("Application is already initialized")]
    AlreadyRunning,
}
