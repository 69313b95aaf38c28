//! Direct3D 11 renderer for Dear ImGui draw data
//!
//! All draw lists of a frame are merged into one dynamic vertex buffer and one
//! dynamic index buffer, which grow on demand. Textures requested through
//! `DrawData::textures()` are uploaded as RGBA8 shader resource views.

use crate::error::{PlatformError, PlatformResult};
use bytemuck::{Pod, Zeroable};
use dear_imgui_rs::render::{DrawCmd, DrawData, DrawIdx, DrawVert};
use dear_imgui_rs::{
    BackendFlags, Context, TextureData, TextureFormat, TextureId, TextureStatus,
};
use std::collections::HashMap;
use std::mem::size_of;
use tracing::{debug, warn};
use windows::Win32::Foundation::{FALSE, RECT, TRUE};
use windows::Win32::Graphics::Direct3D::Fxc::D3DCompile;
use windows::Win32::Graphics::Direct3D::{D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST, ID3DBlob};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT, DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_FORMAT_R16_UINT, DXGI_FORMAT_R32_UINT,
    DXGI_FORMAT_R32G32_FLOAT, DXGI_SAMPLE_DESC,
};
use windows::core::s;

const VERTEX_SHADER: &str = r#"
cbuffer vertexBuffer : register(b0)
{
    float4x4 ProjectionMatrix;
};
struct VS_INPUT
{
    float2 pos : POSITION;
    float4 col : COLOR0;
    float2 uv  : TEXCOORD0;
};
struct PS_INPUT
{
    float4 pos : SV_POSITION;
    float4 col : COLOR0;
    float2 uv  : TEXCOORD0;
};
PS_INPUT main(VS_INPUT input)
{
    PS_INPUT output;
    output.pos = mul(ProjectionMatrix, float4(input.pos.xy, 0.f, 1.f));
    output.col = input.col;
    output.uv  = input.uv;
    return output;
}
"#;

const PIXEL_SHADER: &str = r#"
struct PS_INPUT
{
    float4 pos : SV_POSITION;
    float4 col : COLOR0;
    float2 uv  : TEXCOORD0;
};
sampler sampler0;
Texture2D texture0;
float4 main(PS_INPUT input) : SV_Target
{
    return input.col * texture0.Sample(sampler0, input.uv);
}
"#;

/// Extra room allocated when a buffer has to grow
const VERTEX_SLACK: usize = 5000;
const INDEX_SLACK: usize = 10000;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct VertexConstants {
    mvp: [[f32; 4]; 4],
}

impl VertexConstants {
    fn orthographic(display_pos: [f32; 2], display_size: [f32; 2]) -> Self {
        let l = display_pos[0];
        let r = display_pos[0] + display_size[0];
        let t = display_pos[1];
        let b = display_pos[1] + display_size[1];
        Self {
            mvp: [
                [2.0 / (r - l), 0.0, 0.0, 0.0],
                [0.0, 2.0 / (t - b), 0.0, 0.0],
                [0.0, 0.0, 0.5, 0.0],
                [(r + l) / (l - r), (t + b) / (b - t), 0.5, 1.0],
            ],
        }
    }
}

fn index_format() -> DXGI_FORMAT {
    if size_of::<DrawIdx>() == 2 {
        DXGI_FORMAT_R16_UINT
    } else {
        DXGI_FORMAT_R32_UINT
    }
}

fn compile_shader(source: &str, target: windows::core::PCSTR) -> PlatformResult<ID3DBlob> {
    let mut blob: Option<ID3DBlob> = None;
    let mut error_blob: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompile(
            source.as_ptr() as *const _,
            source.len(),
            None,
            None,
            None,
            s!("main"),
            target,
            0,
            0,
            &mut blob,
            Some(&mut error_blob),
        )
    };

    if let Err(err) = result {
        let details = error_blob
            .map(|blob| String::from_utf8_lossy(blob_bytes(&blob)).into_owned())
            .unwrap_or_else(|| err.to_string());
        return Err(PlatformError::Renderer(format!(
            "shader compilation failed: {details}"
        )));
    }
    blob.ok_or_else(|| PlatformError::Renderer("shader compiler returned no bytecode".into()))
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn created<T>(slot: Option<T>, what: &str) -> PlatformResult<T> {
    slot.ok_or_else(|| PlatformError::Renderer(format!("{what} was not created")))
}

fn dynamic_buffer(device: &ID3D11Device, bytes: usize, bind: D3D11_BIND_FLAG) -> PlatformResult<ID3D11Buffer> {
    let desc = D3D11_BUFFER_DESC {
        ByteWidth: bytes as u32,
        Usage: D3D11_USAGE_DYNAMIC,
        BindFlags: bind.0 as u32,
        CPUAccessFlags: D3D11_CPU_ACCESS_WRITE.0 as u32,
        MiscFlags: 0,
        StructureByteStride: 0,
    };
    let mut buffer = None;
    unsafe { device.CreateBuffer(&desc, None, Some(&mut buffer)) }
        .map_err(PlatformError::renderer)?;
    created(buffer, "dynamic buffer")
}

struct GrowableBuffer {
    buffer: Option<ID3D11Buffer>,
    capacity: usize,
}

impl GrowableBuffer {
    fn new() -> Self {
        Self {
            buffer: None,
            capacity: 0,
        }
    }

    fn ensure<T>(
        &mut self,
        device: &ID3D11Device,
        needed: usize,
        slack: usize,
        bind: D3D11_BIND_FLAG,
    ) -> PlatformResult<&ID3D11Buffer> {
        if self.buffer.is_none() || self.capacity < needed {
            self.capacity = needed + slack;
            self.buffer = Some(dynamic_buffer(device, self.capacity * size_of::<T>(), bind)?);
        }
        created(self.buffer.as_ref(), "dynamic buffer")
    }
}

/// Dear ImGui renderer on top of an existing Direct3D 11 device
pub struct Dx11Renderer {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
    vertex_shader: ID3D11VertexShader,
    pixel_shader: ID3D11PixelShader,
    input_layout: ID3D11InputLayout,
    constant_buffer: ID3D11Buffer,
    blend_state: ID3D11BlendState,
    rasterizer_state: ID3D11RasterizerState,
    depth_stencil_state: ID3D11DepthStencilState,
    sampler: ID3D11SamplerState,
    vertex_buffer: GrowableBuffer,
    index_buffer: GrowableBuffer,
    textures: HashMap<u64, ID3D11ShaderResourceView>,
    next_texture_id: u64,
}

impl Dx11Renderer {
    pub fn new(
        device: &ID3D11Device,
        context: &ID3D11DeviceContext,
        imgui: &mut Context,
    ) -> PlatformResult<Self> {
        let vs_blob = compile_shader(VERTEX_SHADER, s!("vs_4_0"))?;
        let ps_blob = compile_shader(PIXEL_SHADER, s!("ps_4_0"))?;
        let vs_bytecode = blob_bytes(&vs_blob);
        let ps_bytecode = blob_bytes(&ps_blob);

        let mut vertex_shader = None;
        let mut pixel_shader = None;
        unsafe {
            device
                .CreateVertexShader(vs_bytecode, None, Some(&mut vertex_shader))
                .map_err(PlatformError::renderer)?;
            device
                .CreatePixelShader(ps_bytecode, None, Some(&mut pixel_shader))
                .map_err(PlatformError::renderer)?;
        }

        let layout = [
            D3D11_INPUT_ELEMENT_DESC {
                SemanticName: s!("POSITION"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R32G32_FLOAT,
                InputSlot: 0,
                AlignedByteOffset: memoffset::offset_of!(DrawVert, pos) as u32,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
            D3D11_INPUT_ELEMENT_DESC {
                SemanticName: s!("TEXCOORD"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R32G32_FLOAT,
                InputSlot: 0,
                AlignedByteOffset: memoffset::offset_of!(DrawVert, uv) as u32,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
            D3D11_INPUT_ELEMENT_DESC {
                SemanticName: s!("COLOR"),
                SemanticIndex: 0,
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                InputSlot: 0,
                AlignedByteOffset: memoffset::offset_of!(DrawVert, col) as u32,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            },
        ];
        let mut input_layout = None;
        unsafe { device.CreateInputLayout(&layout, vs_bytecode, Some(&mut input_layout)) }
            .map_err(PlatformError::renderer)?;

        let constant_desc = D3D11_BUFFER_DESC {
            ByteWidth: size_of::<VertexConstants>() as u32,
            Usage: D3D11_USAGE_DYNAMIC,
            BindFlags: D3D11_BIND_CONSTANT_BUFFER.0 as u32,
            CPUAccessFlags: D3D11_CPU_ACCESS_WRITE.0 as u32,
            MiscFlags: 0,
            StructureByteStride: 0,
        };
        let mut constant_buffer = None;
        unsafe { device.CreateBuffer(&constant_desc, None, Some(&mut constant_buffer)) }
            .map_err(PlatformError::renderer)?;

        let mut blend_desc = D3D11_BLEND_DESC {
            AlphaToCoverageEnable: FALSE,
            IndependentBlendEnable: FALSE,
            ..Default::default()
        };
        blend_desc.RenderTarget[0] = D3D11_RENDER_TARGET_BLEND_DESC {
            BlendEnable: TRUE,
            SrcBlend: D3D11_BLEND_SRC_ALPHA,
            DestBlend: D3D11_BLEND_INV_SRC_ALPHA,
            BlendOp: D3D11_BLEND_OP_ADD,
            SrcBlendAlpha: D3D11_BLEND_ONE,
            DestBlendAlpha: D3D11_BLEND_INV_SRC_ALPHA,
            BlendOpAlpha: D3D11_BLEND_OP_ADD,
            RenderTargetWriteMask: D3D11_COLOR_WRITE_ENABLE_ALL.0 as u8,
        };
        let mut blend_state = None;
        unsafe { device.CreateBlendState(&blend_desc, Some(&mut blend_state)) }
            .map_err(PlatformError::renderer)?;

        let rasterizer_desc = D3D11_RASTERIZER_DESC {
            FillMode: D3D11_FILL_SOLID,
            CullMode: D3D11_CULL_NONE,
            ScissorEnable: TRUE,
            DepthClipEnable: TRUE,
            ..Default::default()
        };
        let mut rasterizer_state = None;
        unsafe { device.CreateRasterizerState(&rasterizer_desc, Some(&mut rasterizer_state)) }
            .map_err(PlatformError::renderer)?;

        let stencil_op = D3D11_DEPTH_STENCILOP_DESC {
            StencilFailOp: D3D11_STENCIL_OP_KEEP,
            StencilDepthFailOp: D3D11_STENCIL_OP_KEEP,
            StencilPassOp: D3D11_STENCIL_OP_KEEP,
            StencilFunc: D3D11_COMPARISON_ALWAYS,
        };
        let depth_desc = D3D11_DEPTH_STENCIL_DESC {
            DepthEnable: FALSE,
            DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ALL,
            DepthFunc: D3D11_COMPARISON_ALWAYS,
            StencilEnable: FALSE,
            FrontFace: stencil_op,
            BackFace: stencil_op,
            ..Default::default()
        };
        let mut depth_stencil_state = None;
        unsafe { device.CreateDepthStencilState(&depth_desc, Some(&mut depth_stencil_state)) }
            .map_err(PlatformError::renderer)?;

        let sampler_desc = D3D11_SAMPLER_DESC {
            Filter: D3D11_FILTER_MIN_MAG_MIP_LINEAR,
            AddressU: D3D11_TEXTURE_ADDRESS_CLAMP,
            AddressV: D3D11_TEXTURE_ADDRESS_CLAMP,
            AddressW: D3D11_TEXTURE_ADDRESS_CLAMP,
            MipLODBias: 0.0,
            MaxAnisotropy: 1,
            ComparisonFunc: D3D11_COMPARISON_ALWAYS,
            BorderColor: [0.0, 0.0, 0.0, 0.0],
            MinLOD: 0.0,
            MaxLOD: 0.0,
        };
        let mut sampler = None;
        unsafe { device.CreateSamplerState(&sampler_desc, Some(&mut sampler)) }
            .map_err(PlatformError::renderer)?;

        let io = imgui.io_mut();
        let mut flags = io.backend_flags();
        flags.insert(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        flags.insert(BackendFlags::RENDERER_HAS_TEXTURES);
        io.set_backend_flags(flags);

        debug!("Direct3D 11 Dear ImGui renderer created");
        Ok(Self {
            device: device.clone(),
            context: context.clone(),
            vertex_shader: created(vertex_shader, "vertex shader")?,
            pixel_shader: created(pixel_shader, "pixel shader")?,
            input_layout: created(input_layout, "input layout")?,
            constant_buffer: created(constant_buffer, "constant buffer")?,
            blend_state: created(blend_state, "blend state")?,
            rasterizer_state: created(rasterizer_state, "rasterizer state")?,
            depth_stencil_state: created(depth_stencil_state, "depth stencil state")?,
            sampler: created(sampler, "sampler state")?,
            vertex_buffer: GrowableBuffer::new(),
            index_buffer: GrowableBuffer::new(),
            textures: HashMap::new(),
            next_texture_id: 0,
        })
    }

    /// Draw `draw_data` into the currently bound render target
    pub fn render(&mut self, draw_data: &DrawData) -> PlatformResult<()> {
        for texture in draw_data.textures() {
            if texture.status() != TextureStatus::OK {
                self.update_texture(texture)?;
            }
        }

        let fb_width = draw_data.display_size[0] * draw_data.framebuffer_scale[0];
        let fb_height = draw_data.display_size[1] * draw_data.framebuffer_scale[1];
        if !(fb_width > 0.0 && fb_height > 0.0) || draw_data.draw_lists_count() == 0 {
            return Ok(());
        }

        self.upload_geometry(draw_data)?;
        self.upload_constants(draw_data)?;
        self.setup_render_state(fb_width, fb_height);

        let clip_off = draw_data.display_pos;
        let clip_scale = draw_data.framebuffer_scale;
        let mut global_vtx_offset = 0usize;
        let mut global_idx_offset = 0usize;

        for draw_list in draw_data.draw_lists() {
            for command in draw_list.commands() {
                match command {
                    DrawCmd::Elements {
                        count,
                        cmd_params,
                        raw_cmd,
                    } => {
                        let clip_min_x = ((cmd_params.clip_rect[0] - clip_off[0]) * clip_scale[0]).max(0.0);
                        let clip_min_y = ((cmd_params.clip_rect[1] - clip_off[1]) * clip_scale[1]).max(0.0);
                        let clip_max_x = ((cmd_params.clip_rect[2] - clip_off[0]) * clip_scale[0]).min(fb_width);
                        let clip_max_y = ((cmd_params.clip_rect[3] - clip_off[1]) * clip_scale[1]).min(fb_height);
                        if clip_max_x <= clip_min_x || clip_max_y <= clip_min_y {
                            continue;
                        }

                        let tex_id = unsafe {
                            let mut cmd_copy = *raw_cmd;
                            dear_imgui_rs::sys::ImDrawCmd_GetTexID(&mut cmd_copy)
                        } as u64;
                        let Some(view) = self.textures.get(&tex_id) else {
                            warn!("Skipping draw with unknown texture {tex_id}");
                            continue;
                        };

                        let scissor = RECT {
                            left: clip_min_x as i32,
                            top: clip_min_y as i32,
                            right: clip_max_x as i32,
                            bottom: clip_max_y as i32,
                        };
                        unsafe {
                            self.context.RSSetScissorRects(Some(&[scissor]));
                            self.context
                                .PSSetShaderResources(0, Some(&[Some(view.clone())]));
                            self.context.DrawIndexed(
                                count as u32,
                                (cmd_params.idx_offset + global_idx_offset) as u32,
                                (cmd_params.vtx_offset + global_vtx_offset) as i32,
                            );
                        }
                    }
                    DrawCmd::ResetRenderState => self.setup_render_state(fb_width, fb_height),
                    DrawCmd::RawCallback { .. } => {
                        warn!("Raw draw callbacks are not supported by the Direct3D 11 renderer");
                    }
                }
            }
            global_idx_offset += draw_list.idx_buffer().len();
            global_vtx_offset += draw_list.vtx_buffer().len();
        }

        Ok(())
    }

    fn upload_geometry(&mut self, draw_data: &DrawData) -> PlatformResult<()> {
        let total_vtx: usize = draw_data.draw_lists().map(|l| l.vtx_buffer().len()).sum();
        let total_idx: usize = draw_data.draw_lists().map(|l| l.idx_buffer().len()).sum();

        let vb = self
            .vertex_buffer
            .ensure::<DrawVert>(&self.device, total_vtx, VERTEX_SLACK, D3D11_BIND_VERTEX_BUFFER)?
            .clone();
        let ib = self
            .index_buffer
            .ensure::<DrawIdx>(&self.device, total_idx, INDEX_SLACK, D3D11_BIND_INDEX_BUFFER)?
            .clone();

        let mut vtx_map = D3D11_MAPPED_SUBRESOURCE::default();
        let mut idx_map = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context
                .Map(&vb, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut vtx_map))
                .map_err(PlatformError::renderer)?;
            if let Err(err) = self
                .context
                .Map(&ib, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut idx_map))
            {
                self.context.Unmap(&vb, 0);
                return Err(PlatformError::renderer(err));
            }

            let mut vtx_dst = vtx_map.pData as *mut DrawVert;
            let mut idx_dst = idx_map.pData as *mut DrawIdx;
            for draw_list in draw_data.draw_lists() {
                let vertices = draw_list.vtx_buffer();
                let indices = draw_list.idx_buffer();
                std::ptr::copy_nonoverlapping(vertices.as_ptr(), vtx_dst, vertices.len());
                std::ptr::copy_nonoverlapping(indices.as_ptr(), idx_dst, indices.len());
                vtx_dst = vtx_dst.add(vertices.len());
                idx_dst = idx_dst.add(indices.len());
            }

            self.context.Unmap(&vb, 0);
            self.context.Unmap(&ib, 0);
        }
        Ok(())
    }

    fn upload_constants(&mut self, draw_data: &DrawData) -> PlatformResult<()> {
        let constants = VertexConstants::orthographic(draw_data.display_pos, draw_data.display_size);
        let bytes = bytemuck::bytes_of(&constants);
        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context
                .Map(&self.constant_buffer, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))
                .map_err(PlatformError::renderer)?;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapped.pData as *mut u8, bytes.len());
            self.context.Unmap(&self.constant_buffer, 0);
        }
        Ok(())
    }

    fn setup_render_state(&self, fb_width: f32, fb_height: f32) {
        let viewport = D3D11_VIEWPORT {
            TopLeftX: 0.0,
            TopLeftY: 0.0,
            Width: fb_width,
            Height: fb_height,
            MinDepth: 0.0,
            MaxDepth: 1.0,
        };
        let stride = size_of::<DrawVert>() as u32;
        let offset = 0u32;
        unsafe {
            self.context.RSSetViewports(Some(&[viewport]));
            self.context.IASetInputLayout(&self.input_layout);
            self.context.IASetVertexBuffers(
                0,
                1,
                Some(&self.vertex_buffer.buffer.clone()),
                Some(&stride),
                Some(&offset),
            );
            if let Some(ib) = self.index_buffer.buffer.as_ref() {
                self.context.IASetIndexBuffer(ib, index_format(), 0);
            }
            self.context
                .IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            self.context.VSSetShader(&self.vertex_shader, None);
            self.context
                .VSSetConstantBuffers(0, Some(&[Some(self.constant_buffer.clone())]));
            self.context.PSSetShader(&self.pixel_shader, None);
            self.context
                .PSSetSamplers(0, Some(&[Some(self.sampler.clone())]));
            self.context
                .OMSetBlendState(&self.blend_state, Some(&[0.0; 4]), 0xffff_ffff);
            self.context
                .OMSetDepthStencilState(&self.depth_stencil_state, 0);
            self.context.RSSetState(&self.rasterizer_state);
        }
    }

    fn update_texture(&mut self, texture: &mut TextureData) -> PlatformResult<()> {
        match texture.status() {
            TextureStatus::WantCreate | TextureStatus::WantUpdates => {
                let existing = texture.tex_id().id();
                let view = self.create_texture(texture)?;
                let id = if existing != 0 && self.textures.contains_key(&existing) {
                    existing
                } else {
                    self.next_texture_id += 1;
                    self.next_texture_id
                };
                self.textures.insert(id, view);
                texture.set_tex_id(TextureId::from(id));
                texture.set_status(TextureStatus::OK);
            }
            TextureStatus::WantDestroy => {
                if texture.unused_frames() > 0 {
                    self.textures.remove(&texture.tex_id().id());
                    texture.set_status(TextureStatus::Destroyed);
                }
            }
            TextureStatus::OK | TextureStatus::Destroyed => {}
        }
        Ok(())
    }

    fn create_texture(&self, texture: &TextureData) -> PlatformResult<ID3D11ShaderResourceView> {
        let width = texture.width() as u32;
        let height = texture.height() as u32;
        let pixels = texture
            .pixels()
            .ok_or_else(|| PlatformError::Renderer("texture has no pixel data".into()))?;

        let rgba: Vec<u8> = match texture.format() {
            TextureFormat::RGBA32 => pixels.to_vec(),
            TextureFormat::Alpha8 => pixels
                .iter()
                .flat_map(|&alpha| [255, 255, 255, alpha])
                .collect(),
        };
        if rgba.len() != (width * height * 4) as usize {
            return Err(PlatformError::Renderer(format!(
                "texture data size mismatch: {width}x{height} needs {} bytes, got {}",
                width * height * 4,
                rgba.len()
            )));
        }

        let desc = D3D11_TEXTURE2D_DESC {
            Width: width,
            Height: height,
            MipLevels: 1,
            ArraySize: 1,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_SHADER_RESOURCE.0 as u32,
            CPUAccessFlags: 0,
            MiscFlags: 0,
        };
        let initial = D3D11_SUBRESOURCE_DATA {
            pSysMem: rgba.as_ptr() as *const _,
            SysMemPitch: width * 4,
            SysMemSlicePitch: 0,
        };

        let mut tex = None;
        unsafe { self.device.CreateTexture2D(&desc, Some(&initial), Some(&mut tex)) }
            .map_err(PlatformError::renderer)?;
        let tex = created(tex, "texture")?;

        let mut view = None;
        unsafe { self.device.CreateShaderResourceView(&tex, None, Some(&mut view)) }
            .map_err(PlatformError::renderer)?;
        created(view, "shader resource view")
    }
}

impl Drop for Dx11Renderer {
    fn drop(&mut self) {
        unsafe { self.context.ClearState() };
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthographic_maps_display_corners_to_clip_space() {
        let m = VertexConstants::orthographic([0.0, 0.0], [800.0, 600.0]).mvp;
        let project = |x: f32, y: f32| {
            [
                m[0][0] * x + m[1][0] * y + m[3][0],
                m[0][1] * x + m[1][1] * y + m[3][1],
            ]
        };
        assert_eq!(project(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(project(800.0, 600.0), [1.0, -1.0]);
    }

    #[test]
    fn draw_vertex_layout_matches_input_elements() {
        assert_eq!(memoffset::offset_of!(DrawVert, pos), 0);
        assert_eq!(memoffset::offset_of!(DrawVert, uv), 8);
        assert_eq!(memoffset::offset_of!(DrawVert, col), 16);
        assert_eq!(index_format(), DXGI_FORMAT_R16_UINT);
    }
}
