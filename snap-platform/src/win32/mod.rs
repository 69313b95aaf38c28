//! Windows backend: winit window, Direct3D 11 device and DXGI flip swap chain

mod renderer;

use crate::config::{RendererType, WindowConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::event_pump::window_attributes;
use crate::imgui_bridge::ImguiBridge;
use crate::native::{NativePlatform, NativeWindow};
use crate::NativeRenderer;
use dear_imgui_rs::Ui;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use renderer::Dx11Renderer;
use tracing::{debug, warn};
use windows::Win32::Foundation::{FALSE, HMODULE, HWND};
use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::Interface;
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// Direct3D 11 backend
pub type WindowsPlatform = NativePlatform<D3d11Window>;

fn create_device() -> PlatformResult<(ID3D11Device, ID3D11DeviceContext)> {
    let mut device = None;
    let mut context = None;
    let mut feature_level = Default::default();
    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE(std::ptr::null_mut()),
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            None,
            D3D11_SDK_VERSION,
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )
    }
    .map_err(PlatformError::context)?;
    debug!("Direct3D 11 device created (feature level {:#x})", feature_level.0);

    match (device, context) {
        (Some(device), Some(context)) => Ok((device, context)),
        _ => Err(PlatformError::ContextCreation(
            "D3D11CreateDevice returned no device".to_string(),
        )),
    }
}

fn create_swap_chain(
    device: &ID3D11Device,
    hwnd: HWND,
    size: PhysicalSize<u32>,
) -> PlatformResult<IDXGISwapChain1> {
    let desc = DXGI_SWAP_CHAIN_DESC1 {
        Width: size.width.max(1),
        Height: size.height.max(1),
        Format: DXGI_FORMAT_R8G8B8A8_UNORM,
        Stereo: FALSE,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: 2,
        Scaling: DXGI_SCALING_STRETCH,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        AlphaMode: DXGI_ALPHA_MODE_IGNORE,
        Flags: 0,
    };
    unsafe {
        let dxgi_device: IDXGIDevice = device.cast().map_err(PlatformError::context)?;
        let adapter = dxgi_device.GetAdapter().map_err(PlatformError::context)?;
        let factory: IDXGIFactory2 = adapter.GetParent().map_err(PlatformError::context)?;
        factory
            .CreateSwapChainForHwnd(device, hwnd, &desc, None, None)
            .map_err(PlatformError::context)
    }
}

fn create_render_target(
    device: &ID3D11Device,
    swap_chain: &IDXGISwapChain1,
) -> PlatformResult<ID3D11RenderTargetView> {
    let mut rtv = None;
    unsafe {
        let back_buffer: ID3D11Texture2D = swap_chain.GetBuffer(0).map_err(PlatformError::context)?;
        device
            .CreateRenderTargetView(&back_buffer, None, Some(&mut rtv))
            .map_err(PlatformError::context)?;
    }
    rtv.ok_or_else(|| PlatformError::ContextCreation("render target view was not created".into()))
}

/// Window plus D3D11 device, swap chain and the Dear ImGui renderer
pub struct D3d11Window {
    renderer: Dx11Renderer,
    imgui: ImguiBridge,
    render_target: Option<ID3D11RenderTargetView>,
    swap_chain: IDXGISwapChain1,
    context: ID3D11DeviceContext,
    device: ID3D11Device,
    window: Window,
    vsync: bool,
}

impl D3d11Window {
    fn bind_render_target(&self) {
        let size = self.window.inner_size();
        let viewport = D3D11_VIEWPORT {
            TopLeftX: 0.0,
            TopLeftY: 0.0,
            Width: size.width as f32,
            Height: size.height as f32,
            MinDepth: 0.0,
            MaxDepth: 1.0,
        };
        unsafe {
            self.context
                .OMSetRenderTargets(Some(&[self.render_target.clone()]), None);
            self.context.RSSetViewports(Some(&[viewport]));
        }
    }
}

impl NativeWindow for D3d11Window {
    const RENDERER: RendererType = RendererType::DirectX11;

    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> PlatformResult<Self> {
        let window = event_loop
            .create_window(window_attributes(config))
            .map_err(PlatformError::window)?;
        let hwnd = match window.window_handle().map_err(PlatformError::window)?.as_raw() {
            RawWindowHandle::Win32(handle) => HWND(handle.hwnd.get() as *mut _),
            other => {
                return Err(PlatformError::WindowCreation(format!(
                    "expected a Win32 window handle, got {other:?}"
                )));
            }
        };

        let (device, context) = create_device()?;
        let swap_chain = create_swap_chain(&device, hwnd, window.inner_size())?;
        let render_target = create_render_target(&device, &swap_chain)?;

        let mut imgui = ImguiBridge::new(&window)?;
        let renderer = Dx11Renderer::new(&device, &context, &mut imgui.context)?;

        Ok(Self {
            renderer,
            imgui,
            render_target: Some(render_target),
            swap_chain,
            context,
            device,
            window,
            vsync: config.vsync,
        })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn handle_event(&mut self, event: &Event<()>) {
        self.imgui.handle_event(&self.window, event);
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        // Every reference to the back buffer must be gone before ResizeBuffers
        self.render_target = None;
        unsafe { self.context.OMSetRenderTargets(None, None) };
        let resized = unsafe {
            self.swap_chain.ResizeBuffers(
                0,
                size.width,
                size.height,
                DXGI_FORMAT_UNKNOWN,
                DXGI_SWAP_CHAIN_FLAG(0),
            )
        };
        if let Err(err) = resized {
            warn!("ResizeBuffers failed: {err}");
        }
        match create_render_target(&self.device, &self.swap_chain) {
            Ok(rtv) => self.render_target = Some(rtv),
            Err(err) => warn!("Failed to recreate render target: {err}"),
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        if let Some(rtv) = self.render_target.as_ref() {
            unsafe { self.context.ClearRenderTargetView(rtv, &color) };
        }
        self.bind_render_target();
    }

    fn begin_frame(&mut self) -> PlatformResult<&mut Ui> {
        Ok(self.imgui.begin_frame(&self.window))
    }

    fn end_frame(&mut self) {
        self.imgui.end_frame();
    }

    fn present(&mut self) -> PlatformResult<()> {
        self.bind_render_target();
        if let Some(draw_data) = self.imgui.context.draw_data() {
            self.renderer.render(draw_data)?;
        }
        let interval = if self.vsync { 1 } else { 0 };
        unsafe { self.swap_chain.Present(interval, DXGI_PRESENT(0)) }
            .ok()
            .map_err(|err| PlatformError::Surface(err.to_string()))
    }

    fn framerate(&self) -> f32 {
        self.imgui.framerate()
    }

    fn native_renderer(&self) -> Option<NativeRenderer<'_>> {
        Some(NativeRenderer::Direct3D11 {
            device: &self.device,
            context: &self.context,
        })
    }

    fn destroy(self) {
        let D3d11Window {
            renderer,
            imgui,
            render_target,
            swap_chain,
            context,
            device,
            window,
            vsync: _,
        } = self;
        drop(renderer);
        drop(imgui);
        drop(render_target);
        drop(swap_chain);
        drop(context);
        drop(device);
        drop(window);
        debug!("Direct3D 11 window destroyed");
    }
}
