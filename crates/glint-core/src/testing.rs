//! In-memory driver for tests.
//!
//! [`Recorder`] implements [`Binding`] without a GPU. It records every command, hands
//! out integer names per category and emulates the GL error rules the façade relies
//! on:
//! - binding or using a name that is not live raises `INVALID_OPERATION`
//! - querying a uniform of an unknown or unlinked program raises `INVALID_OPERATION`
//! - shader sources containing `#error` fail to compile

use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroU32;

use crate::consts;
use crate::driver::{Binding, Named};
use crate::handles::ResourceKind;

/// Recorded driver object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MockObject(NonZeroU32);

impl MockObject {
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Named for MockObject {
    #[inline]
    fn name(&self) -> u32 {
        self.0.get()
    }

    #[inline]
    fn from_name(name: u32) -> Option<Self> {
        NonZeroU32::new(name).map(Self)
    }
}

/// Recorded uniform location. 0 is a valid location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MockLocation(pub u32);

impl Named for MockLocation {
    #[inline]
    fn name(&self) -> u32 {
        self.0
    }

    #[inline]
    fn from_name(name: u32) -> Option<Self> {
        Some(Self(name))
    }
}

/// One recorded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: &'static str,
    pub args: String,
}

#[derive(Debug, Default)]
struct Namespace {
    next: u32,
    live: HashSet<u32>,
}

#[derive(Debug)]
pub struct Recorder {
    calls: Vec<Call>,
    errors: VecDeque<u32>,

    name_base: u32,
    recycle_names: bool,
    names: HashMap<ResourceKind, Namespace>,
    fail_next_create: bool,

    sources: HashMap<u32, String>,
    compiled: HashMap<u32, bool>,
    attached: HashMap<u32, HashSet<u32>>,
    linked: HashSet<u32>,
    fail_links: bool,

    uniforms: HashMap<String, u32>,
    strings: HashMap<u32, String>,
    framebuffer_status: u32,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub fn new() -> Self {
        let strings = HashMap::from([
            (consts::VENDOR, "glint".to_owned()),
            (consts::RENDERER, "recorder".to_owned()),
            (consts::VERSION, "3.3 recorder".to_owned()),
            (consts::SHADING_LANGUAGE_VERSION, "3.30".to_owned()),
        ]);

        Self {
            calls: Vec::new(),
            errors: VecDeque::new(),
            name_base: 1,
            recycle_names: false,
            names: HashMap::new(),
            fail_next_create: false,
            sources: HashMap::new(),
            compiled: HashMap::new(),
            attached: HashMap::new(),
            linked: HashSet::new(),
            fail_links: false,
            uniforms: HashMap::new(),
            strings,
            framebuffer_status: consts::FRAMEBUFFER_COMPLETE,
        }
    }

    // ── configuration ─────────────────────────────────────────────────────

    /// First name handed out in every category.
    pub fn with_name_base(mut self, base: u32) -> Self {
        self.name_base = base.max(1);
        self
    }

    /// Hands out the lowest free name instead of a fresh one, like most GL drivers.
    pub fn with_name_recycling(mut self) -> Self {
        self.recycle_names = true;
        self
    }

    /// Reported `GL_VERSION`. An empty string simulates a missing context.
    pub fn with_version(mut self, version: &str) -> Self {
        self.strings.insert(consts::VERSION, version.to_owned());
        self
    }

    /// Makes every program declare uniform `name` at `location`.
    pub fn set_uniform(&mut self, name: &str, location: u32) {
        self.uniforms.insert(name.to_owned(), location);
    }

    pub fn fail_links(&mut self, fail: bool) {
        self.fail_links = fail;
    }

    /// Makes the next `create_*` call fail.
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    pub fn set_framebuffer_status(&mut self, status: u32) {
        self.framebuffer_status = status;
    }

    /// Queues an error code for the next error query.
    pub fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    // ── inspection ────────────────────────────────────────────────────────

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls to `command`.
    pub fn count(&self, command: &str) -> usize {
        self.calls.iter().filter(|c| c.command == command).count()
    }

    pub fn is_live(&self, kind: ResourceKind, name: u32) -> bool {
        self.names.get(&kind).is_some_and(|ns| ns.live.contains(&name))
    }

    /// Live objects across all categories.
    pub fn live_count(&self) -> usize {
        self.names.values().map(|ns| ns.live.len()).sum()
    }

    pub fn pending_errors(&self) -> usize {
        self.errors.len()
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn record(&mut self, command: &'static str, args: String) {
        self.calls.push(Call { command, args });
    }

    fn create(&mut self, command: &'static str, kind: ResourceKind) -> Result<MockObject, String> {
        if std::mem::take(&mut self.fail_next_create) {
            self.record(command, "failed".to_owned());
            return Err("out of memory".to_owned());
        }

        let base = self.name_base;
        let recycle = self.recycle_names;
        let ns = self.names.entry(kind).or_insert_with(|| Namespace {
            next: base,
            live: HashSet::new(),
        });
        let name = if recycle {
            (base..).find(|n| !ns.live.contains(n)).unwrap_or(base)
        } else {
            let name = ns.next;
            ns.next += 1;
            name
        };
        ns.live.insert(name);

        self.record(command, name.to_string());
        Ok(MockObject::from_name(name).unwrap_or(MockObject(NonZeroU32::MIN)))
    }

    fn destroy(&mut self, command: &'static str, kind: ResourceKind, object: MockObject) {
        self.record(command, object.get().to_string());
        if let Some(ns) = self.names.get_mut(&kind) {
            ns.live.remove(&object.get());
        }
    }

    /// Raises `INVALID_OPERATION` when `object` is not live.
    fn require(&mut self, kind: ResourceKind, object: Option<&MockObject>) {
        if let Some(object) = object {
            if !self.is_live(kind, object.get()) {
                self.raise(consts::INVALID_OPERATION);
            }
        }
    }
}

fn opt(object: Option<&MockObject>) -> String {
    object.map_or_else(|| "0".to_owned(), |o| o.get().to_string())
}

impl Binding for Recorder {
    type Shader = MockObject;
    type Program = MockObject;
    type Buffer = MockObject;
    type Texture = MockObject;
    type VertexArray = MockObject;
    type Framebuffer = MockObject;
    type Renderbuffer = MockObject;
    type UniformLocation = MockLocation;

    // ── queries ───────────────────────────────────────────────────────────

    fn get_error(&mut self) -> u32 {
        self.errors.pop_front().unwrap_or(consts::NO_ERROR)
    }

    fn get_string(&mut self, name: u32) -> String {
        self.strings.get(&name).cloned().unwrap_or_default()
    }

    // ── fixed-function state ──────────────────────────────────────────────

    fn enable(&mut self, cap: u32) {
        self.record("enable", format!("{cap:#06x}"));
    }

    fn disable(&mut self, cap: u32) {
        self.record("disable", format!("{cap:#06x}"));
    }

    fn active_texture(&mut self, unit: u32) {
        self.record("active_texture", format!("{unit:#06x}"));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record("viewport", format!("{x} {y} {width} {height}"));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record("scissor", format!("{x} {y} {width} {height}"));
    }

    fn line_width(&mut self, width: f32) {
        self.record("line_width", width.to_string());
    }

    fn front_face(&mut self, mode: u32) {
        self.record("front_face", format!("{mode:#06x}"));
    }

    fn cull_face(&mut self, mode: u32) {
        self.record("cull_face", format!("{mode:#06x}"));
    }

    fn depth_func(&mut self, func: u32) {
        self.record("depth_func", format!("{func:#06x}"));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.record("depth_mask", flag.to_string());
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.record("color_mask", format!("{red} {green} {blue} {alpha}"));
    }

    fn blend_equation(&mut self, mode: u32) {
        self.record("blend_equation", format!("{mode:#06x}"));
    }

    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.record("blend_equation_separate", format!("{mode_rgb:#06x} {mode_alpha:#06x}"));
    }

    fn blend_func(&mut self, src: u32, dst: u32) {
        self.record("blend_func", format!("{src:#06x} {dst:#06x}"));
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(
            "blend_func_separate",
            format!("{src_rgb:#06x} {dst_rgb:#06x} {src_alpha:#06x} {dst_alpha:#06x}"),
        );
    }

    fn polygon_mode(&mut self, face: u32, mode: u32) {
        self.record("polygon_mode", format!("{face:#06x} {mode:#06x}"));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.record("polygon_offset", format!("{factor} {units}"));
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record("clear_color", format!("{red} {green} {blue} {alpha}"));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.record("clear_depth", depth.to_string());
    }

    fn clear_stencil(&mut self, stencil: i32) {
        self.record("clear_stencil", stencil.to_string());
    }

    fn clear(&mut self, mask: u32) {
        self.record("clear", format!("{mask:#06x}"));
    }

    // ── shaders and programs ──────────────────────────────────────────────

    fn create_shader(&mut self, _stage: u32) -> Result<MockObject, String> {
        self.create("create_shader", ResourceKind::Shader)
    }

    fn shader_source(&mut self, shader: &MockObject, source: &str) {
        self.record("shader_source", shader.get().to_string());
        self.require(ResourceKind::Shader, Some(shader));
        self.sources.insert(shader.get(), source.to_owned());
    }

    fn compile_shader(&mut self, shader: &MockObject) {
        self.record("compile_shader", shader.get().to_string());
        self.require(ResourceKind::Shader, Some(shader));
        let ok = self
            .sources
            .get(&shader.get())
            .is_some_and(|src| !src.contains("#error"));
        self.compiled.insert(shader.get(), ok);
    }

    fn shader_compile_status(&mut self, shader: &MockObject) -> bool {
        self.compiled.get(&shader.get()).copied().unwrap_or(false)
    }

    fn shader_info_log(&mut self, shader: &MockObject) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:2: error: #error directive".to_owned()
        }
    }

    fn delete_shader(&mut self, shader: MockObject) {
        self.sources.remove(&shader.get());
        self.compiled.remove(&shader.get());
        self.destroy("delete_shader", ResourceKind::Shader, shader);
    }

    fn create_program(&mut self) -> Result<MockObject, String> {
        self.create("create_program", ResourceKind::Program)
    }

    fn attach_shader(&mut self, program: &MockObject, shader: &MockObject) {
        self.record("attach_shader", format!("{} {}", program.get(), shader.get()));
        self.require(ResourceKind::Program, Some(program));
        self.require(ResourceKind::Shader, Some(shader));
        self.attached.entry(program.get()).or_default().insert(shader.get());
    }

    fn detach_shader(&mut self, program: &MockObject, shader: &MockObject) {
        self.record("detach_shader", format!("{} {}", program.get(), shader.get()));
        if let Some(shaders) = self.attached.get_mut(&program.get()) {
            shaders.remove(&shader.get());
        }
    }

    fn link_program(&mut self, program: &MockObject) {
        self.record("link_program", program.get().to_string());
        self.require(ResourceKind::Program, Some(program));
        let ok = !self.fail_links
            && self.attached.get(&program.get()).is_some_and(|shaders| {
                !shaders.is_empty()
                    && shaders
                        .iter()
                        .all(|s| self.compiled.get(s).copied().unwrap_or(false))
            });
        if ok {
            self.linked.insert(program.get());
        } else {
            self.linked.remove(&program.get());
        }
    }

    fn program_link_status(&mut self, program: &MockObject) -> bool {
        self.linked.contains(&program.get())
    }

    fn program_info_log(&mut self, program: &MockObject) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking failed".to_owned()
        }
    }

    fn use_program(&mut self, program: Option<&MockObject>) {
        self.record("use_program", opt(program));
        self.require(ResourceKind::Program, program);
    }

    fn delete_program(&mut self, program: MockObject) {
        self.linked.remove(&program.get());
        self.attached.remove(&program.get());
        self.destroy("delete_program", ResourceKind::Program, program);
    }

    fn attrib_location(&mut self, program: &MockObject, name: &str) -> Option<u32> {
        self.record("attrib_location", format!("{} {name}", program.get()));
        self.require(ResourceKind::Program, Some(program));
        None
    }

    fn uniform_location(&mut self, program: &MockObject, name: &str) -> Option<MockLocation> {
        self.record("uniform_location", format!("{} {name}", program.get()));
        if !self.is_live(ResourceKind::Program, program.get())
            || !self.linked.contains(&program.get())
        {
            self.raise(consts::INVALID_OPERATION);
            return None;
        }
        self.uniforms.get(name).copied().map(MockLocation)
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<MockObject, String> {
        self.create("create_buffer", ResourceKind::Buffer)
    }

    fn bind_buffer(&mut self, target: u32, buffer: Option<&MockObject>) {
        self.record("bind_buffer", format!("{target:#06x} {}", opt(buffer)));
        self.require(ResourceKind::Buffer, buffer);
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.record("buffer_data", format!("{target:#06x} {} {usage:#06x}", data.len()));
    }

    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32) {
        self.record("buffer_data_size", format!("{target:#06x} {size} {usage:#06x}"));
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        self.record("buffer_sub_data", format!("{target:#06x} {offset} {}", data.len()));
    }

    fn delete_buffer(&mut self, buffer: MockObject) {
        self.destroy("delete_buffer", ResourceKind::Buffer, buffer);
    }

    fn delete_buffers(&mut self, buffers: Vec<MockObject>) {
        let names: Vec<String> = buffers.iter().map(|b| b.get().to_string()).collect();
        self.record("delete_buffers", names.join(" "));
        if let Some(ns) = self.names.get_mut(&ResourceKind::Buffer) {
            for b in &buffers {
                ns.live.remove(&b.get());
            }
        }
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<MockObject, String> {
        self.create("create_vertex_array", ResourceKind::VertexArray)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<&MockObject>) {
        self.record("bind_vertex_array", opt(vertex_array));
        self.require(ResourceKind::VertexArray, vertex_array);
    }

    fn delete_vertex_array(&mut self, vertex_array: MockObject) {
        self.destroy("delete_vertex_array", ResourceKind::VertexArray, vertex_array);
    }

    fn delete_vertex_arrays(&mut self, vertex_arrays: Vec<MockObject>) {
        let names: Vec<String> = vertex_arrays.iter().map(|v| v.get().to_string()).collect();
        self.record("delete_vertex_arrays", names.join(" "));
        if let Some(ns) = self.names.get_mut(&ResourceKind::VertexArray) {
            for v in &vertex_arrays {
                ns.live.remove(&v.get());
            }
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.record("enable_vertex_attrib_array", index.to_string());
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.record("disable_vertex_attrib_array", index.to_string());
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
        self.record(
            "vertex_attrib_pointer",
            format!("{index} {size} {data_type:#06x} {normalized} {stride} {offset}"),
        );
    }

    fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) {
        self.record("vertex_attrib_divisor", format!("{index} {divisor}"));
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self) -> Result<MockObject, String> {
        self.create("create_texture", ResourceKind::Texture)
    }

    fn bind_texture(&mut self, target: u32, texture: Option<&MockObject>) {
        self.record("bind_texture", format!("{target:#06x} {}", opt(texture)));
        self.require(ResourceKind::Texture, texture);
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
        self.record(
            "tex_image_2d",
            format!(
                "{target:#06x} {level} {internal_format:#06x} {width}x{height} {format:#06x} {data_type:#06x} {}",
                pixels.map_or(0, <[u8]>::len)
            ),
        );
    }

    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32) {
        self.record("tex_parameter_i32", format!("{target:#06x} {pname:#06x} {value}"));
    }

    fn generate_mipmap(&mut self, target: u32) {
        self.record("generate_mipmap", format!("{target:#06x}"));
    }

    fn delete_texture(&mut self, texture: MockObject) {
        self.destroy("delete_texture", ResourceKind::Texture, texture);
    }

    fn delete_textures(&mut self, textures: Vec<MockObject>) {
        let names: Vec<String> = textures.iter().map(|t| t.get().to_string()).collect();
        self.record("delete_textures", names.join(" "));
        if let Some(ns) = self.names.get_mut(&ResourceKind::Texture) {
            for t in &textures {
                ns.live.remove(&t.get());
            }
        }
    }

    // ── framebuffers ─────────────────────────────────────────────────────

    fn create_framebuffer(&mut self) -> Result<MockObject, String> {
        self.create("create_framebuffer", ResourceKind::Framebuffer)
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&MockObject>) {
        self.record("bind_framebuffer", format!("{target:#06x} {}", opt(framebuffer)));
        self.require(ResourceKind::Framebuffer, framebuffer);
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&MockObject>,
        level: i32,
    ) {
        self.record(
            "framebuffer_texture_2d",
            format!("{target:#06x} {attachment:#06x} {texture_target:#06x} {} {level}", opt(texture)),
        );
        self.require(ResourceKind::Texture, texture);
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&MockObject>,
    ) {
        self.record(
            "framebuffer_renderbuffer",
            format!(
                "{target:#06x} {attachment:#06x} {renderbuffer_target:#06x} {}",
                opt(renderbuffer)
            ),
        );
        self.require(ResourceKind::Renderbuffer, renderbuffer);
    }

    fn check_framebuffer_status(&mut self, target: u32) -> u32 {
        self.record("check_framebuffer_status", format!("{target:#06x}"));
        self.framebuffer_status
    }

    fn delete_framebuffer(&mut self, framebuffer: MockObject) {
        self.destroy("delete_framebuffer", ResourceKind::Framebuffer, framebuffer);
    }

    fn create_renderbuffer(&mut self) -> Result<MockObject, String> {
        self.create("create_renderbuffer", ResourceKind::Renderbuffer)
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&MockObject>) {
        self.record("bind_renderbuffer", format!("{target:#06x} {}", opt(renderbuffer)));
        self.require(ResourceKind::Renderbuffer, renderbuffer);
    }

    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.record(
            "renderbuffer_storage",
            format!("{target:#06x} {internal_format:#06x} {width}x{height}"),
        );
    }

    fn delete_renderbuffer(&mut self, renderbuffer: MockObject) {
        self.destroy("delete_renderbuffer", ResourceKind::Renderbuffer, renderbuffer);
    }

    // ── draws ─────────────────────────────────────────────────────────────

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.record("draw_arrays", format!("{mode:#06x} {first} {count}"));
    }

    fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record("draw_elements", format!("{mode:#06x} {count} {element_type:#06x} {offset}"));
    }

    fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instances: i32) {
        self.record("draw_arrays_instanced", format!("{mode:#06x} {first} {count} {instances}"));
    }

    fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instances: i32,
    ) {
        self.record(
            "draw_elements_instanced",
            format!("{mode:#06x} {count} {element_type:#06x} {offset} {instances}"),
        );
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    fn uniform_1i(&mut self, location: &MockLocation, x: i32) {
        self.record("uniform_1i", format!("{} {x}", location.0));
    }

    fn uniform_1f(&mut self, location: &MockLocation, x: f32) {
        self.record("uniform_1f", format!("{} {x}", location.0));
    }

    fn uniform_2f(&mut self, location: &MockLocation, x: f32, y: f32) {
        self.record("uniform_2f", format!("{} {x} {y}", location.0));
    }

    fn uniform_3f(&mut self, location: &MockLocation, x: f32, y: f32, z: f32) {
        self.record("uniform_3f", format!("{} {x} {y} {z}", location.0));
    }

    fn uniform_4f(&mut self, location: &MockLocation, x: f32, y: f32, z: f32, w: f32) {
        self.record("uniform_4f", format!("{} {x} {y} {z} {w}", location.0));
    }

    fn uniform_1fv(&mut self, location: &MockLocation, values: &[f32]) {
        self.record("uniform_1fv", format!("{} {}", location.0, values.len()));
    }

    fn uniform_2fv(&mut self, location: &MockLocation, values: &[f32]) {
        self.record("uniform_2fv", format!("{} {}", location.0, values.len()));
    }

    fn uniform_3fv(&mut self, location: &MockLocation, values: &[f32]) {
        self.record("uniform_3fv", format!("{} {}", location.0, values.len()));
    }

    fn uniform_4fv(&mut self, location: &MockLocation, values: &[f32]) {
        self.record("uniform_4fv", format!("{} {}", location.0, values.len()));
    }

    fn uniform_matrix_3fv(&mut self, location: &MockLocation, transpose: bool, values: &[f32]) {
        self.record(
            "uniform_matrix_3fv",
            format!("{} {transpose} {}", location.0, values.len()),
        );
    }

    fn uniform_matrix_4fv(&mut self, location: &MockLocation, transpose: bool, values: &[f32]) {
        self.record(
            "uniform_matrix_4fv",
            format!("{} {transpose} {}", location.0, values.len()),
        );
    }
}
