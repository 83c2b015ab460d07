//! Driver bindings.
//!
//! A [`Binding`] is the raw command set of a graphics driver, expressed in terms of the
//! driver's own resource objects. It performs no caching and no validation; every call
//! goes straight to the driver. [`crate::Gfx`] sits on top and decides which calls are
//! worth making.
//!
//! Object types differ per driver:
//! - desktop GL names every object with a `u32` (such bindings implement [`Named`])
//! - browser bindings hand out opaque object references

use std::fmt::Debug;

mod error;
#[cfg(feature = "glow")]
mod glow_binding;

pub use error::GlError;
#[cfg(feature = "glow")]
pub use glow_binding::GlowBinding;

/// A driver object identified by a plain integer name.
///
/// Implemented for the object types of bindings whose driver already uses integer
/// names, so [`crate::handles::Direct`] can pass names through without a table.
pub trait Named: Sized {
    /// Integer name of the object.
    fn name(&self) -> u32;

    /// Rebuilds an object from its name. Returns `None` when `name` can never denote an
    /// object of this type (0 for most categories).
    fn from_name(name: u32) -> Option<Self>;
}

/// Raw driver command set.
///
/// Method names follow the GL entry points they stand for. Every method takes
/// `&mut self`: a binding belongs to exactly one context and one thread.
pub trait Binding {
    type Shader: Clone + Debug;
    type Program: Clone + Debug;
    type Buffer: Clone + Debug;
    type Texture: Clone + Debug;
    type VertexArray: Clone + Debug;
    type Framebuffer: Clone + Debug;
    type Renderbuffer: Clone + Debug;
    type UniformLocation: Clone + Debug;

    // ── queries ───────────────────────────────────────────────────────────

    /// Returns and clears the oldest pending error code (`NO_ERROR` when clear).
    fn get_error(&mut self) -> u32;
    fn get_string(&mut self, name: u32) -> String;

    // ── fixed-function state ──────────────────────────────────────────────

    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn active_texture(&mut self, unit: u32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn line_width(&mut self, width: f32);
    fn front_face(&mut self, mode: u32);
    fn cull_face(&mut self, mode: u32);
    fn depth_func(&mut self, func: u32);
    fn depth_mask(&mut self, flag: bool);
    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool);
    fn blend_equation(&mut self, mode: u32);
    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32);
    fn blend_func(&mut self, src: u32, dst: u32);
    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn polygon_mode(&mut self, face: u32, mode: u32);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&mut self, depth: f32);
    fn clear_stencil(&mut self, stencil: i32);
    fn clear(&mut self, mask: u32);

    // ── shaders and programs ──────────────────────────────────────────────

    fn create_shader(&mut self, stage: u32) -> Result<Self::Shader, String>;
    fn shader_source(&mut self, shader: &Self::Shader, source: &str);
    fn compile_shader(&mut self, shader: &Self::Shader);
    fn shader_compile_status(&mut self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&mut self, shader: &Self::Shader) -> String;
    fn delete_shader(&mut self, shader: Self::Shader);

    fn create_program(&mut self) -> Result<Self::Program, String>;
    fn attach_shader(&mut self, program: &Self::Program, shader: &Self::Shader);
    fn detach_shader(&mut self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&mut self, program: &Self::Program);
    fn program_link_status(&mut self, program: &Self::Program) -> bool;
    fn program_info_log(&mut self, program: &Self::Program) -> String;
    fn use_program(&mut self, program: Option<&Self::Program>);
    fn delete_program(&mut self, program: Self::Program);

    fn attrib_location(&mut self, program: &Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(
        &mut self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&mut self, target: u32, buffer: Option<&Self::Buffer>);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]);
    fn delete_buffer(&mut self, buffer: Self::Buffer);

    /// Deletes several buffers. Drivers with a batched entry point override this.
    fn delete_buffers(&mut self, buffers: Vec<Self::Buffer>) {
        for buffer in buffers {
            self.delete_buffer(buffer);
        }
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&mut self, vertex_array: Option<&Self::VertexArray>);
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);

    fn delete_vertex_arrays(&mut self, vertex_arrays: Vec<Self::VertexArray>) {
        for vertex_array in vertex_arrays {
            self.delete_vertex_array(vertex_array);
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32);

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self) -> Result<Self::Texture, String>;
    fn bind_texture(&mut self, target: u32, texture: Option<&Self::Texture>);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32);
    fn generate_mipmap(&mut self, target: u32);
    fn delete_texture(&mut self, texture: Self::Texture);

    fn delete_textures(&mut self, textures: Vec<Self::Texture>) {
        for texture in textures {
            self.delete_texture(texture);
        }
    }

    // ── framebuffers ─────────────────────────────────────────────────────

    fn create_framebuffer(&mut self) -> Result<Self::Framebuffer, String>;
    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&Self::Framebuffer>);
    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&Self::Texture>,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&Self::Renderbuffer>,
    );
    fn check_framebuffer_status(&mut self, target: u32) -> u32;
    fn delete_framebuffer(&mut self, framebuffer: Self::Framebuffer);

    fn create_renderbuffer(&mut self) -> Result<Self::Renderbuffer, String>;
    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&Self::Renderbuffer>);
    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32);
    fn delete_renderbuffer(&mut self, renderbuffer: Self::Renderbuffer);

    // ── draws ─────────────────────────────────────────────────────────────

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instances: i32);
    fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instances: i32,
    );

    // ── uniforms ──────────────────────────────────────────────────────────

    fn uniform_1i(&mut self, location: &Self::UniformLocation, x: i32);
    fn uniform_1f(&mut self, location: &Self::UniformLocation, x: f32);
    fn uniform_2f(&mut self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3f(&mut self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4f(&mut self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1fv(&mut self, location: &Self::UniformLocation, values: &[f32]);
    fn uniform_2fv(&mut self, location: &Self::UniformLocation, values: &[f32]);
    fn uniform_3fv(&mut self, location: &Self::UniformLocation, values: &[f32]);
    fn uniform_4fv(&mut self, location: &Self::UniformLocation, values: &[f32]);
    fn uniform_matrix_3fv(&mut self, location: &Self::UniformLocation, transpose: bool, values: &[f32]);
    fn uniform_matrix_4fv(&mut self, location: &Self::UniformLocation, transpose: bool, values: &[f32]);
}
