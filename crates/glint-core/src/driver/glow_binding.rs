use ::glow::{HasContext, PixelUnpackData};

use super::{Binding, Named};

/// [`Binding`] over any `glow` context.
///
/// On desktop targets glow's objects are integer names, so the binding works with both
/// [`crate::Gfx::native`] and [`crate::Gfx::virtualized`]. On `wasm32` the objects are
/// WebGL references and only the virtualized model applies.
///
/// The wrapped context must be current on the calling thread for the lifetime of the
/// binding; every method issues the matching glow call directly.
pub struct GlowBinding<C: HasContext> {
    gl: C,
}

impl<C: HasContext> GlowBinding<C> {
    pub fn new(gl: C) -> Self {
        Self { gl }
    }

    /// Returns the wrapped context.
    pub fn context(&self) -> &C {
        &self.gl
    }

    pub fn into_inner(self) -> C {
        self.gl
    }
}

impl<C: HasContext> Binding for GlowBinding<C> {
    type Shader = C::Shader;
    type Program = C::Program;
    type Buffer = C::Buffer;
    type Texture = C::Texture;
    type VertexArray = C::VertexArray;
    type Framebuffer = C::Framebuffer;
    type Renderbuffer = C::Renderbuffer;
    type UniformLocation = C::UniformLocation;

    // ── queries ───────────────────────────────────────────────────────────

    fn get_error(&mut self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn get_string(&mut self, name: u32) -> String {
        unsafe { self.gl.get_parameter_string(name) }
    }

    // ── fixed-function state ──────────────────────────────────────────────

    fn enable(&mut self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&mut self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) }
    }

    fn front_face(&mut self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn cull_face(&mut self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn depth_func(&mut self, func: u32) {
        unsafe { self.gl.depth_func(func) }
    }

    fn depth_mask(&mut self, flag: bool) {
        unsafe { self.gl.depth_mask(flag) }
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { self.gl.color_mask(red, green, blue, alpha) }
    }

    fn blend_equation(&mut self, mode: u32) {
        unsafe { self.gl.blend_equation(mode) }
    }

    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) }
    }

    fn blend_func(&mut self, src: u32, dst: u32) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe { self.gl.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    fn polygon_mode(&mut self, face: u32, mode: u32) {
        unsafe { self.gl.polygon_mode(face, mode) }
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) }
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) }
    }

    fn clear_stencil(&mut self, stencil: i32) {
        unsafe { self.gl.clear_stencil(stencil) }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    // ── shaders and programs ──────────────────────────────────────────────

    fn create_shader(&mut self, stage: u32) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage) }
    }

    fn shader_source(&mut self, shader: &Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(*shader, source) }
    }

    fn compile_shader(&mut self, shader: &Self::Shader) {
        unsafe { self.gl.compile_shader(*shader) }
    }

    fn shader_compile_status(&mut self, shader: &Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(*shader) }
    }

    fn shader_info_log(&mut self, shader: &Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(*shader) }
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&mut self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&mut self, program: &Self::Program, shader: &Self::Shader) {
        unsafe { self.gl.attach_shader(*program, *shader) }
    }

    fn detach_shader(&mut self, program: &Self::Program, shader: &Self::Shader) {
        unsafe { self.gl.detach_shader(*program, *shader) }
    }

    fn link_program(&mut self, program: &Self::Program) {
        unsafe { self.gl.link_program(*program) }
    }

    fn program_link_status(&mut self, program: &Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(*program) }
    }

    fn program_info_log(&mut self, program: &Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(*program) }
    }

    fn use_program(&mut self, program: Option<&Self::Program>) {
        unsafe { self.gl.use_program(program.copied()) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&mut self, program: &Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(*program, name) }
    }

    fn uniform_location(
        &mut self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(*program, name) }
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&mut self, target: u32, buffer: Option<&Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target, buffer.copied()) }
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32) {
        unsafe { self.gl.buffer_data_size(target, size, usage) }
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<&Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array.copied()) }
    }

    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset)
        }
    }

    fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(index, divisor) }
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn bind_texture(&mut self, target: u32, texture: Option<&Self::Texture>) {
        unsafe { self.gl.bind_texture(target, texture.copied()) }
    }

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
    ) {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                data_type,
                PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, value) }
    }

    fn generate_mipmap(&mut self, target: u32) {
        unsafe { self.gl.generate_mipmap(target) }
    }

    fn delete_texture(&mut self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    // ── framebuffers ─────────────────────────────────────────────────────

    fn create_framebuffer(&mut self) -> Result<Self::Framebuffer, String> {
        unsafe { self.gl.create_framebuffer() }
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&Self::Framebuffer>) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer.copied()) }
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&Self::Texture>,
        level: i32,
    ) {
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, texture_target, texture.copied(), level)
        }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&Self::Renderbuffer>,
    ) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                target,
                attachment,
                renderbuffer_target,
                renderbuffer.copied(),
            )
        }
    }

    fn check_framebuffer_status(&mut self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn delete_framebuffer(&mut self, framebuffer: Self::Framebuffer) {
        unsafe { self.gl.delete_framebuffer(framebuffer) }
    }

    fn create_renderbuffer(&mut self) -> Result<Self::Renderbuffer, String> {
        unsafe { self.gl.create_renderbuffer() }
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&Self::Renderbuffer>) {
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer.copied()) }
    }

    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        unsafe { self.gl.renderbuffer_storage(target, internal_format, width, height) }
    }

    fn delete_renderbuffer(&mut self, renderbuffer: Self::Renderbuffer) {
        unsafe { self.gl.delete_renderbuffer(renderbuffer) }
    }

    // ── draws ─────────────────────────────────────────────────────────────

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }

    fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instances: i32) {
        unsafe { self.gl.draw_arrays_instanced(mode, first, count, instances) }
    }

    fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instances: i32,
    ) {
        unsafe {
            self.gl
                .draw_elements_instanced(mode, count, element_type, offset, instances)
        }
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    fn uniform_1i(&mut self, location: &Self::UniformLocation, x: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), x) }
    }

    fn uniform_1f(&mut self, location: &Self::UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), x) }
    }

    fn uniform_2f(&mut self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(location), x, y) }
    }

    fn uniform_3f(&mut self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(Some(location), x, y, z) }
    }

    fn uniform_4f(&mut self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.uniform_4_f32(Some(location), x, y, z, w) }
    }

    fn uniform_1fv(&mut self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { self.gl.uniform_1_f32_slice(Some(location), values) }
    }

    fn uniform_2fv(&mut self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { self.gl.uniform_2_f32_slice(Some(location), values) }
    }

    fn uniform_3fv(&mut self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { self.gl.uniform_3_f32_slice(Some(location), values) }
    }

    fn uniform_4fv(&mut self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { self.gl.uniform_4_f32_slice(Some(location), values) }
    }

    fn uniform_matrix_3fv(&mut self, location: &Self::UniformLocation, transpose: bool, values: &[f32]) {
        unsafe { self.gl.uniform_matrix_3_f32_slice(Some(location), transpose, values) }
    }

    fn uniform_matrix_4fv(&mut self, location: &Self::UniformLocation, transpose: bool, values: &[f32]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), transpose, values) }
    }
}

// ── integer names (desktop) ───────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
mod native_names {
    use std::num::NonZeroU32;

    use super::Named;

    macro_rules! named_object {
        ($($ty:ident),* $(,)?) => {
            $(
                impl Named for ::glow::$ty {
                    #[inline]
                    fn name(&self) -> u32 {
                        self.0.get()
                    }

                    #[inline]
                    fn from_name(name: u32) -> Option<Self> {
                        NonZeroU32::new(name).map(::glow::$ty)
                    }
                }
            )*
        };
    }

    named_object!(
        NativeShader,
        NativeProgram,
        NativeBuffer,
        NativeTexture,
        NativeVertexArray,
        NativeFramebuffer,
        NativeRenderbuffer,
    );

    // Location 0 is a valid uniform slot.
    impl Named for ::glow::NativeUniformLocation {
        #[inline]
        fn name(&self) -> u32 {
            self.0
        }

        #[inline]
        fn from_name(name: u32) -> Option<Self> {
            Some(::glow::NativeUniformLocation(name))
        }
    }
}
