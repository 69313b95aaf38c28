//! Dear ImGui context plus winit platform glue shared by the native backends

use crate::error::PlatformResult;
use dear_imgui_rs::{ConfigFlags, Context, Ui};
use dear_imgui_winit::{HiDpiMode, WinitPlatform};
use tracing::debug;
use winit::event::Event;
use winit::window::Window;

pub(crate) struct ImguiBridge {
    pub(crate) platform: WinitPlatform,
    pub(crate) context: Context,
}

impl ImguiBridge {
    /// Create the context and bind it to `window`.
    ///
    /// Settings are never persisted and keyboard/gamepad navigation is on.
    pub(crate) fn new(window: &Window) -> PlatformResult<Self> {
        let mut context = Context::try_create()?;
        context.set_ini_filename(None::<String>)?;
        {
            let io = context.io_mut();
            let mut flags = io.config_flags();
            flags.insert(ConfigFlags::NAV_ENABLE_KEYBOARD | ConfigFlags::NAV_ENABLE_GAMEPAD);
            io.set_config_flags(flags);
        }

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(window, HiDpiMode::Default, &mut context);
        debug!(
            "Dear ImGui attached to window (scale factor {:.2})",
            platform.hidpi_factor()
        );

        Ok(Self { platform, context })
    }

    pub(crate) fn handle_event(&mut self, window: &Window, event: &Event<()>) {
        self.platform
            .handle_event(&mut self.context, window, event);
    }

    /// Update delta time and display size, then start a Dear ImGui frame
    pub(crate) fn begin_frame(&mut self, window: &Window) -> &mut Ui {
        self.platform.prepare_frame(window, &mut self.context);
        self.context.frame()
    }

    pub(crate) fn end_frame(&mut self) {
        self.context.render();
    }

    pub(crate) fn framerate(&self) -> f32 {
        self.context.io().framerate()
    }
}
