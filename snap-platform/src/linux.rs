//! Linux backend: winit window, glutin OpenGL 3.3 core context, glow renderer

use crate::config::{RendererType, WindowConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::event_pump::window_attributes;
use crate::imgui_bridge::ImguiBridge;
use crate::native::{NativePlatform, NativeWindow};
use crate::NativeRenderer;
use dear_imgui_glow::glow::{self, HasContext};
use dear_imgui_glow::GlowRenderer;
use dear_imgui_rs::Ui;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// OpenGL 3 backend
pub type LinuxPlatform = NativePlatform<GlWindow>;

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

/// Window plus current GL context and the glow Dear ImGui renderer
pub struct GlWindow {
    renderer: GlowRenderer,
    imgui: ImguiBridge,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Arc<Window>,
}

impl NativeWindow for GlWindow {
    const RENDERER: RendererType = RendererType::OpenGl3;

    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> PlatformResult<Self> {
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes(config)))
            .build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs
                    .next()
                    .expect("glutin always offers at least one config")
            })
            .map_err(PlatformError::context)?;
        let window = Arc::new(window.ok_or_else(|| {
            PlatformError::WindowCreation("glutin did not create a window".to_string())
        })?);

        let raw_handle = window
            .window_handle()
            .map_err(PlatformError::window)?
            .as_raw();
        let context_attribs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));
        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &context_attribs) }
            .map_err(PlatformError::context)?;

        let size = window.inner_size();
        let surface_attribs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            non_zero(size.width),
            non_zero(size.height),
        );
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attribs) }
            .map_err(PlatformError::context)?;
        let context = not_current
            .make_current(&surface)
            .map_err(PlatformError::context)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            warn!("Failed to set swap interval: {err}");
        }

        let mut imgui = ImguiBridge::new(&window)?;
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name).cast())
        };
        let renderer =
            GlowRenderer::new(gl, &mut imgui.context).map_err(PlatformError::renderer)?;
        debug!("OpenGL 3.3 core context ready");

        Ok(Self {
            renderer,
            imgui,
            surface,
            context,
            window,
        })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn handle_event(&mut self, event: &Event<()>) {
        self.imgui.handle_event(&self.window, event);
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width > 0 && size.height > 0 {
            self.surface
                .resize(&self.context, non_zero(size.width), non_zero(size.height));
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        let size = self.window.inner_size();
        if let Some(gl) = self.renderer.gl_context() {
            unsafe {
                gl.viewport(0, 0, size.width as i32, size.height as i32);
                gl.clear_color(color[0], color[1], color[2], color[3]);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }
    }

    fn begin_frame(&mut self) -> PlatformResult<&mut Ui> {
        self.renderer.new_frame().map_err(PlatformError::renderer)?;
        Ok(self.imgui.begin_frame(&self.window))
    }

    fn end_frame(&mut self) {
        self.imgui.end_frame();
    }

    fn present(&mut self) -> PlatformResult<()> {
        if let Some(draw_data) = self.imgui.context.draw_data() {
            self.renderer
                .render(draw_data)
                .map_err(PlatformError::renderer)?;
        }
        self.surface
            .swap_buffers(&self.context)
            .map_err(|err| PlatformError::Surface(err.to_string()))
    }

    fn framerate(&self) -> f32 {
        self.imgui.framerate()
    }

    fn native_renderer(&self) -> Option<NativeRenderer<'_>> {
        self.renderer
            .gl_context()
            .map(|gl| NativeRenderer::OpenGl(gl.as_ref()))
    }

    fn destroy(self) {
        let GlWindow {
            renderer,
            imgui,
            surface,
            context,
            window,
        } = self;
        // GL objects are released while the context is still current
        drop(renderer);
        drop(imgui);
        drop(surface);
        drop(context);
        drop(window);
        debug!("OpenGL window destroyed");
    }
}
