use crate::Platform;
use tracing::debug;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        fn native_platform() -> Box<dyn Platform> {
            Box::new(crate::linux::LinuxPlatform::new())
        }
    } else if #[cfg(target_os = "windows")] {
        fn native_platform() -> Box<dyn Platform> {
            Box::new(crate::win32::WindowsPlatform::new())
        }
    } else if #[cfg(target_os = "macos")] {
        fn native_platform() -> Box<dyn Platform> {
            Box::new(crate::macos::MacPlatform::new())
        }
    } else {
        compile_error!("snap-platform supports Linux, Windows and macOS only");
    }
}

/// Create the backend compiled for the current target OS.
///
/// The returned backend is uninitialized; call
/// [`Platform::initialize`](crate::Platform::initialize) before use.
pub fn create_platform() -> Box<dyn Platform> {
    let platform = native_platform();
    debug!("Selected {} backend", platform.renderer_type());
    platform
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RendererType;

    #[test]
    fn factory_returns_uninitialized_native_backend() {
        let platform = create_platform();
        assert!(!platform.is_initialized());
        assert!(!platform.should_close());
        assert!(platform.native_window().is_none());

        let expected = if cfg!(target_os = "linux") {
            RendererType::OpenGl3
        } else if cfg!(target_os = "windows") {
            RendererType::DirectX11
        } else {
            RendererType::Metal
        };
        assert_eq!(platform.renderer_type(), expected);
    }
}
