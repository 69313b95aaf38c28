//! macOS backend: winit window, wgpu restricted to Metal, wgpu Dear ImGui renderer

use crate::config::{RendererType, WindowConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::event_pump::window_attributes;
use crate::imgui_bridge::ImguiBridge;
use crate::native::{NativePlatform, NativeWindow};
use crate::NativeRenderer;
use dear_imgui_rs::Ui;
use dear_imgui_wgpu::{GammaMode, WgpuInitInfo, WgpuRenderer};
use pollster::block_on;
use std::sync::Arc;
use tracing::{debug, warn};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// Metal backend
pub type MacPlatform = NativePlatform<MetalWindow>;

/// Window plus Metal device, CAMetalLayer surface and the wgpu Dear ImGui renderer
pub struct MetalWindow {
    renderer: WgpuRenderer,
    imgui: ImguiBridge,
    surface: wgpu::Surface<'static>,
    surface_desc: wgpu::SurfaceConfiguration,
    queue: wgpu::Queue,
    device: wgpu::Device,
    window: Arc<Window>,
    clear_color: wgpu::Color,
}

impl NativeWindow for MetalWindow {
    const RENDERER: RendererType = RendererType::Metal;

    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> PlatformResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::METAL,
            ..Default::default()
        });

        let window = Arc::new(
            event_loop
                .create_window(window_attributes(config))
                .map_err(PlatformError::window)?,
        );

        let surface = instance
            .create_surface(window.clone())
            .map_err(|err| PlatformError::Surface(err.to_string()))?;

        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(PlatformError::context)?;
        debug!("Metal adapter: {}", adapter.get_info().name);

        let (device, queue) = block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
            .map_err(PlatformError::context)?;

        let physical_size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let preferred_srgb = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        let format = preferred_srgb
            .iter()
            .copied()
            .find(|format| caps.formats.contains(format))
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                PlatformError::Surface("surface reports no supported formats".to_string())
            })?;

        let surface_desc = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: physical_size.width.max(1),
            height: physical_size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_desc);

        let mut imgui = ImguiBridge::new(&window)?;
        let init_info = WgpuInitInfo::new(device.clone(), queue.clone(), surface_desc.format);
        let mut renderer =
            WgpuRenderer::new(init_info, &mut imgui.context).map_err(PlatformError::renderer)?;
        renderer.set_gamma_mode(GammaMode::Auto);

        Ok(Self {
            renderer,
            imgui,
            surface,
            surface_desc,
            queue,
            device,
            window,
            clear_color: wgpu::Color::BLACK,
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
            self.surface_desc.width = size.width;
            self.surface_desc.height = size.height;
            self.surface.configure(&self.device, &self.surface_desc);
        }
    }

    // The clear happens as the load op of the render pass in `present`
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn begin_frame(&mut self) -> PlatformResult<&mut Ui> {
        self.renderer.new_frame().map_err(PlatformError::renderer)?;
        Ok(self.imgui.begin_frame(&self.window))
    }

    fn end_frame(&mut self) {
        self.imgui.end_frame();
    }

    fn present(&mut self) -> PlatformResult<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("Surface lost or outdated; reconfiguring and skipping frame");
                self.surface.configure(&self.device, &self.surface_desc);
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                debug!("Surface acquire timed out; skipping frame");
                return Ok(());
            }
            Err(err) => return Err(PlatformError::Surface(err.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snap Tools Frame Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Snap Tools Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(draw_data) = self.imgui.context.draw_data() {
                self.renderer
                    .render_draw_data(draw_data, &mut rpass)
                    .map_err(PlatformError::renderer)?;
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn framerate(&self) -> f32 {
        self.imgui.framerate()
    }

    fn native_renderer(&self) -> Option<NativeRenderer<'_>> {
        Some(NativeRenderer::Metal {
            device: &self.device,
            queue: &self.queue,
        })
    }

    fn destroy(self) {
        let MetalWindow {
            renderer,
            imgui,
            surface,
            surface_desc: _,
            queue,
            device,
            window,
            clear_color: _,
        } = self;
        drop(renderer);
        drop(imgui);
        drop(surface);
        drop(queue);
        drop(device);
        drop(window);
        debug!("Metal window destroyed");
    }
}
