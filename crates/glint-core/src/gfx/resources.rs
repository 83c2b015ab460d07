use bytemuck::Pod;

use crate::driver::Binding;
use crate::handles::{
    BufferId, Buffers, Category, FramebufferId, Framebuffers, HandleModel, Registry,
    RenderbufferId, Renderbuffers, TextureId, Textures, VertexArrayId, VertexArrays,
};

use super::{Gfx, GfxError, GfxResult};

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    /// Creates a driver object through `create` and registers it.
    fn create<C: Category<B>>(
        &mut self,
        command: &'static str,
        create: fn(&mut B) -> Result<C::Object, String>,
        destroy: fn(&mut B, C::Object),
    ) -> GfxResult<C::Id>
    where
        H: Registry<B, C>,
    {
        let object = create(&mut self.binding).map_err(|reason| GfxError::CreateFailed {
            kind: C::KIND,
            reason,
        })?;
        self.check(command);
        let id = self.register::<C>(object, destroy)?;
        log::trace!("{command}: {} {id:?}", C::KIND);
        Ok(id)
    }

    /// Validates every handle, destroys the objects, then drops the handles. Returns the
    /// number of objects destroyed.
    fn delete_batch<C: Category<B>>(
        &mut self,
        command: &'static str,
        ids: &[C::Id],
        one: fn(&mut B, C::Object),
        batch: fn(&mut B, Vec<C::Object>),
    ) -> GfxResult<usize>
    where
        H: Registry<B, C>,
    {
        let (ids, objects) = self.resolve_all::<C>(command, ids)?;
        if objects.is_empty() {
            return Ok(0);
        }

        if H::COALESCES_DELETES {
            batch(&mut self.binding, objects);
        } else {
            for object in objects {
                one(&mut self.binding, object);
            }
        }
        self.check(command);

        for &id in &ids {
            self.release::<C>(id);
        }
        log::trace!("{command}: {} {} object(s)", ids.len(), C::KIND);
        Ok(ids.len())
    }

    // ── buffers ───────────────────────────────────────────────────────────

    pub fn create_buffer(&mut self) -> GfxResult<BufferId> {
        let id = self.create::<Buffers>("create_buffer", B::create_buffer, B::delete_buffer)?;
        self.stats.buffers += 1;
        Ok(id)
    }

    pub fn bind_buffer(&mut self, target: u32, buffer: Option<BufferId>) -> GfxResult<()> {
        let object = self.resolve_opt::<Buffers>("bind_buffer", buffer)?;
        self.binding.bind_buffer(target, object.as_ref());
        self.check("bind_buffer");
        Ok(())
    }

    /// Uploads `data` to the buffer bound at `target`.
    pub fn buffer_data<T: Pod>(&mut self, target: u32, data: &[T], usage: u32) {
        self.binding.buffer_data(target, bytemuck::cast_slice(data), usage);
        self.check("buffer_data");
    }

    /// Allocates `size` bytes of uninitialized storage for the buffer bound at `target`.
    pub fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32) {
        self.binding.buffer_data_size(target, size, usage);
        self.check("buffer_data_size");
    }

    pub fn buffer_sub_data<T: Pod>(&mut self, target: u32, offset: i32, data: &[T]) {
        self.binding.buffer_sub_data(target, offset, bytemuck::cast_slice(data));
        self.check("buffer_sub_data");
    }

    /// Deletes every buffer in `buffers`. Nothing is deleted when any handle is invalid.
    pub fn delete_buffers(&mut self, buffers: &[BufferId]) -> GfxResult<()> {
        let n = self.delete_batch::<Buffers>(
            "delete_buffers",
            buffers,
            B::delete_buffer,
            B::delete_buffers,
        )?;
        self.stats.buffers = self.stats.buffers.saturating_sub(n);
        Ok(())
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    pub fn create_vertex_array(&mut self) -> GfxResult<VertexArrayId> {
        let id = self.create::<VertexArrays>(
            "create_vertex_array",
            B::create_vertex_array,
            B::delete_vertex_array,
        )?;
        self.stats.vertex_arrays += 1;
        Ok(id)
    }

    pub fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> GfxResult<()> {
        let object = self.resolve_opt::<VertexArrays>("bind_vertex_array", vertex_array)?;
        self.binding.bind_vertex_array(object.as_ref());
        self.check("bind_vertex_array");
        Ok(())
    }

    pub fn delete_vertex_arrays(&mut self, vertex_arrays: &[VertexArrayId]) -> GfxResult<()> {
        let n = self.delete_batch::<VertexArrays>(
            "delete_vertex_arrays",
            vertex_arrays,
            B::delete_vertex_array,
            B::delete_vertex_arrays,
        )?;
        self.stats.vertex_arrays = self.stats.vertex_arrays.saturating_sub(n);
        Ok(())
    }

    pub fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.binding.enable_vertex_attrib_array(index);
        self.check("enable_vertex_attrib_array");
    }

    pub fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.binding.disable_vertex_attrib_array(index);
        self.check("disable_vertex_attrib_array");
    }

    /// Describes attribute `index` within the bound `ARRAY_BUFFER`. `stride` and
    /// `offset` are in bytes.
    pub fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.binding
            .vertex_attrib_pointer(index, size, data_type, normalized, stride, offset);
        self.check("vertex_attrib_pointer");
    }

    pub fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) {
        self.binding.vertex_attrib_divisor(index, divisor);
        self.check("vertex_attrib_divisor");
    }

    // ── textures ──────────────────────────────────────────────────────────

    pub fn create_texture(&mut self) -> GfxResult<TextureId> {
        let id = self.create::<Textures>("create_texture", B::create_texture, B::delete_texture)?;
        self.stats.textures += 1;
        Ok(id)
    }

    pub fn bind_texture(&mut self, target: u32, texture: Option<TextureId>) -> GfxResult<()> {
        let object = self.resolve_opt::<Textures>("bind_texture", texture)?;
        self.binding.bind_texture(target, object.as_ref());
        self.check("bind_texture");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
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
        self.binding.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            format,
            data_type,
            pixels,
        );
        self.check("tex_image_2d");
    }

    pub fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32) {
        self.binding.tex_parameter_i32(target, pname, value);
        self.check("tex_parameter_i32");
    }

    pub fn generate_mipmap(&mut self, target: u32) {
        self.binding.generate_mipmap(target);
        self.check("generate_mipmap");
    }

    /// Deletes every texture in `textures`. Nothing is deleted when any handle is invalid.
    pub fn delete_textures(&mut self, textures: &[TextureId]) -> GfxResult<()> {
        let n = self.delete_batch::<Textures>(
            "delete_textures",
            textures,
            B::delete_texture,
            B::delete_textures,
        )?;
        self.stats.textures = self.stats.textures.saturating_sub(n);
        Ok(())
    }

    // ── framebuffers ──────────────────────────────────────────────────────

    pub fn create_framebuffer(&mut self) -> GfxResult<FramebufferId> {
        self.create::<Framebuffers>(
            "create_framebuffer",
            B::create_framebuffer,
            B::delete_framebuffer,
        )
    }

    /// Binds `framebuffer`, or the default framebuffer for `None`.
    pub fn bind_framebuffer(
        &mut self,
        target: u32,
        framebuffer: Option<FramebufferId>,
    ) -> GfxResult<()> {
        let object = self.resolve_opt::<Framebuffers>("bind_framebuffer", framebuffer)?;
        self.binding.bind_framebuffer(target, object.as_ref());
        self.check("bind_framebuffer");
        Ok(())
    }

    pub fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<TextureId>,
        level: i32,
    ) -> GfxResult<()> {
        let object = self.resolve_opt::<Textures>("framebuffer_texture_2d", texture)?;
        self.binding
            .framebuffer_texture_2d(target, attachment, texture_target, object.as_ref(), level);
        self.check("framebuffer_texture_2d");
        Ok(())
    }

    pub fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<RenderbufferId>,
    ) -> GfxResult<()> {
        let object = self.resolve_opt::<Renderbuffers>("framebuffer_renderbuffer", renderbuffer)?;
        self.binding.framebuffer_renderbuffer(
            target,
            attachment,
            renderbuffer_target,
            object.as_ref(),
        );
        self.check("framebuffer_renderbuffer");
        Ok(())
    }

    pub fn check_framebuffer_status(&mut self, target: u32) -> u32 {
        let status = self.binding.check_framebuffer_status(target);
        self.check("check_framebuffer_status");
        status
    }

    pub fn delete_framebuffer(&mut self, framebuffer: FramebufferId) -> GfxResult<()> {
        let object = self.resolve::<Framebuffers>("delete_framebuffer", framebuffer)?;
        self.binding.delete_framebuffer(object);
        self.check("delete_framebuffer");
        self.release::<Framebuffers>(framebuffer);
        Ok(())
    }

    pub fn create_renderbuffer(&mut self) -> GfxResult<RenderbufferId> {
        self.create::<Renderbuffers>(
            "create_renderbuffer",
            B::create_renderbuffer,
            B::delete_renderbuffer,
        )
    }

    pub fn bind_renderbuffer(
        &mut self,
        target: u32,
        renderbuffer: Option<RenderbufferId>,
    ) -> GfxResult<()> {
        let object = self.resolve_opt::<Renderbuffers>("bind_renderbuffer", renderbuffer)?;
        self.binding.bind_renderbuffer(target, object.as_ref());
        self.check("bind_renderbuffer");
        Ok(())
    }

    pub fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.binding
            .renderbuffer_storage(target, internal_format, width, height);
        self.check("renderbuffer_storage");
    }

    pub fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId) -> GfxResult<()> {
        let object = self.resolve::<Renderbuffers>("delete_renderbuffer", renderbuffer)?;
        self.binding.delete_renderbuffer(object);
        self.check("delete_renderbuffer");
        self.release::<Renderbuffers>(renderbuffer);
        Ok(())
    }
}
