//! OpenGL-backed 2D drawing surface bound to the window's default framebuffer

use glow::HasContext;
use thiserror::Error;

use crate::render::atlas::GlyphAtlas;
use crate::render::font::Typeface;
use crate::render::paint::{Color, Paint};

/// Canvas errors
#[derive(Error, Debug)]
pub enum CanvasError {
    /// GL object creation failed
    #[error("GL object creation failed: {0}")]
    GlCreate(String),

    /// Vertex shader compilation failed
    #[error("vertex shader compile error: {0}")]
    VertexCompile(String),

    /// Fragment shader compilation failed
    #[error("fragment shader compile error: {0}")]
    FragmentCompile(String),

    /// Shader program link failed
    #[error("program link error: {0}")]
    Link(String),

    /// The glyph atlas page has no room left
    #[error("glyph atlas page is full")]
    AtlasFull,

    /// Font data could not be read or parsed
    #[error("font load failed: {0}")]
    FontLoad(String),

    /// No usable font was found
    #[error("no usable font found; set canvas.font_path to a TTF/OTF file")]
    FontNotFound,
}

/// Parameters of the framebuffer the canvas targets, queried from the live
/// GL context at construction
#[derive(Debug, Clone, Copy)]
pub struct FramebufferInfo {
    /// Bound framebuffer object id (0 for the window's default framebuffer)
    pub framebuffer: i32,
    /// Stencil bits of the target
    pub stencil_bits: i32,
    /// MSAA sample count of the target
    pub samples: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlyphVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

const GLYPH_VS: &str = r"#version 330 core
layout (location = 0) in vec2 a_pos;
layout (location = 1) in vec2 a_uv;
uniform vec2 u_screen;
out vec2 v_uv;
void main() {
    vec2 ndc = vec2(a_pos.x / u_screen.x * 2.0 - 1.0,
                    1.0 - a_pos.y / u_screen.y * 2.0);
    gl_Position = vec4(ndc, 0.0, 1.0);
    v_uv = a_uv;
}
";

const GLYPH_FS: &str = r"#version 330 core
in vec2 v_uv;
uniform sampler2D u_atlas;
uniform vec4 u_color;
uniform int u_anti_alias;
out vec4 frag_color;
void main() {
    float coverage = texture(u_atlas, v_uv).r;
    if (u_anti_alias == 0) {
        coverage = step(0.5, coverage);
    }
    frag_color = vec4(u_color.rgb, u_color.a * coverage);
}
";

unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, CanvasError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| CanvasError::GlCreate(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(CanvasError::VertexCompile(log));
    }

    let fs = gl
        .create_shader(glow::FRAGMENT_SHADER)
        .map_err(|e| CanvasError::GlCreate(format!("create_shader(FS) failed: {e:?}")))?;
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(CanvasError::FragmentCompile(log));
    }

    let program = gl
        .create_program()
        .map_err(|e| CanvasError::GlCreate(format!("create_program failed: {e:?}")))?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(CanvasError::Link(log));
    }

    Ok(program)
}

/// 2D drawing surface
///
/// Issues clear and text-draw commands against the framebuffer that was
/// bound when the canvas was created (the window's default framebuffer).
/// Draw positions are in drawable pixels, origin at the top-left; text `y`
/// positions are baselines.
pub struct Canvas {
    gl: glow::Context,
    program: glow::NativeProgram,
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    atlas: GlyphAtlas,
    typeface: Typeface,
    framebuffer_info: FramebufferInfo,
    width: i32,
    height: i32,
    u_screen: Option<glow::NativeUniformLocation>,
    u_color: Option<glow::NativeUniformLocation>,
    u_anti_alias: Option<glow::NativeUniformLocation>,
    u_atlas: Option<glow::NativeUniformLocation>,
}

impl Canvas {
    /// Create a canvas targeting the currently bound framebuffer
    ///
    /// Queries the target's framebuffer id, stencil bit count and sample
    /// count, compiles the glyph shader program, and allocates the vertex
    /// buffer and glyph atlas.
    pub fn new(
        gl: glow::Context,
        width: i32,
        height: i32,
        typeface: Typeface,
    ) -> Result<Self, CanvasError> {
        unsafe {
            let framebuffer_info = FramebufferInfo {
                framebuffer: gl.get_parameter_i32(glow::FRAMEBUFFER_BINDING),
                stencil_bits: gl.get_framebuffer_attachment_parameter_i32(
                    glow::FRAMEBUFFER,
                    glow::STENCIL,
                    glow::FRAMEBUFFER_ATTACHMENT_STENCIL_SIZE,
                ),
                samples: gl.get_parameter_i32(glow::SAMPLES),
            };
            log::debug!(
                "Canvas target: framebuffer {} ({} stencil bits, {} samples)",
                framebuffer_info.framebuffer,
                framebuffer_info.stencil_bits,
                framebuffer_info.samples
            );

            let program = compile_program(&gl, GLYPH_VS, GLYPH_FS)?;
            let u_screen = gl.get_uniform_location(program, "u_screen");
            let u_color = gl.get_uniform_location(program, "u_color");
            let u_anti_alias = gl.get_uniform_location(program, "u_anti_alias");
            let u_atlas = gl.get_uniform_location(program, "u_atlas");

            let vao = gl
                .create_vertex_array()
                .map_err(|e| CanvasError::GlCreate(format!("create_vertex_array failed: {e:?}")))?;
            let vbo = gl
                .create_buffer()
                .map_err(|e| CanvasError::GlCreate(format!("create_buffer failed: {e:?}")))?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            let stride = std::mem::size_of::<GlyphVertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 8);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            let atlas = GlyphAtlas::new(&gl)?;

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                atlas,
                typeface,
                framebuffer_info,
                width: width.max(1),
                height: height.max(1),
                u_screen,
                u_color,
                u_anti_alias,
                u_atlas,
            })
        }
    }

    /// Clear the whole surface to the given color (stencil is cleared too)
    pub fn clear(&mut self, color: Color) {
        unsafe {
            self.gl.viewport(0, 0, self.width, self.height);
            self.gl.clear_color(color.r, color.g, color.b, color.a);
            self.gl.clear_stencil(0);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        }
    }

    /// Draw a text run
    ///
    /// `x` is interpreted per `paint.align`; `y` is the baseline. Glyphs are
    /// rasterized into the atlas on first use and drawn as an alpha-blended
    /// quad batch.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Ok(());
        }

        let advance_width = self.typeface.measure_text(text, paint.text_size);
        let origin_x = paint.align.origin_x(x, advance_width);

        let mut vertices: Vec<GlyphVertex> = Vec::with_capacity(text.len() * 6);
        let mut pen_x = origin_x;
        for ch in text.chars() {
            let glyph = unsafe {
                self.atlas
                    .get_or_rasterize(&self.gl, &self.typeface, ch, paint.text_size)?
            };

            if glyph.width > 0.0 && glyph.height > 0.0 {
                let x0 = pen_x + glyph.left;
                let y0 = y + glyph.top;
                let x1 = x0 + glyph.width;
                let y1 = y0 + glyph.height;
                let [u0, v0] = glyph.uv_min;
                let [u1, v1] = glyph.uv_max;

                vertices.extend_from_slice(&[
                    GlyphVertex { pos: [x0, y0], uv: [u0, v0] },
                    GlyphVertex { pos: [x1, y0], uv: [u1, v0] },
                    GlyphVertex { pos: [x1, y1], uv: [u1, v1] },
                    GlyphVertex { pos: [x0, y0], uv: [u0, v0] },
                    GlyphVertex { pos: [x1, y1], uv: [u1, v1] },
                    GlyphVertex { pos: [x0, y1], uv: [u0, v1] },
                ]);
            }

            pen_x += glyph.advance;
        }

        if vertices.is_empty() {
            return Ok(());
        }

        unsafe {
            self.gl.use_program(Some(self.program));
            self.gl
                .uniform_2_f32(self.u_screen.as_ref(), self.width as f32, self.height as f32);
            self.gl.uniform_4_f32(
                self.u_color.as_ref(),
                paint.color.r,
                paint.color.g,
                paint.color.b,
                paint.color.a,
            );
            self.gl
                .uniform_1_i32(self.u_anti_alias.as_ref(), i32::from(paint.anti_alias));
            self.gl.uniform_1_i32(self.u_atlas.as_ref(), 0);

            self.gl.active_texture(glow::TEXTURE0);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.atlas.texture()));

            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STREAM_DRAW,
            );
            self.gl
                .draw_arrays(glow::TRIANGLES, 0, vertices.len() as i32);

            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_vertex_array(None);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            self.gl.use_program(None);
        }

        Ok(())
    }

    /// Measure a text run's advance width at the given size
    pub fn measure_text(&self, text: &str, text_size: f32) -> f32 {
        self.typeface.measure_text(text, text_size)
    }

    /// Flush pending draw commands to the GPU
    pub fn flush(&mut self) {
        unsafe {
            self.gl.flush();
        }
    }

    /// Retarget the surface after a framebuffer resize
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Current target width in drawable pixels
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Current target height in drawable pixels
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Current target size in drawable pixels
    pub const fn target_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Parameters of the framebuffer the canvas targets
    pub const fn framebuffer_info(&self) -> FramebufferInfo {
        self.framebuffer_info
    }

    /// The canvas typeface
    pub const fn typeface(&self) -> &Typeface {
        &self.typeface
    }
}

impl Drop for Canvas {
    // Explicit GL-object release keeps repeated create/destroy cycles sound.
    // The window guarantees the context is current while the canvas drops.
    fn drop(&mut self) {
        unsafe {
            self.atlas.destroy(&self.gl);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_program(self.program);
        }
    }
}
