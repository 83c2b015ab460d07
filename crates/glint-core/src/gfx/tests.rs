use std::panic::{self, AssertUnwindSafe};

use super::*;
use crate::consts::*;
use crate::handles::{
    BufferId, Buffers, ResourceKind, Shaders, Slot, TextureId, Textures, Uniforms, VertexArrayId,
    VertexArrays,
};
use crate::program::{ProgramBuilder, ShaderStage};
use crate::testing::Recorder;

fn config() -> GfxConfig {
    GfxConfig {
        default_state: false,
        ..GfxConfig::default()
    }
}

fn unchecked() -> GfxConfig {
    GfxConfig {
        check_errors: false,
        ..config()
    }
}

fn native() -> NativeGfx<Recorder> {
    Gfx::native(Recorder::new(), config()).unwrap()
}

fn virtualized() -> VirtualGfx<Recorder> {
    Gfx::virtualized(Recorder::new(), config()).unwrap()
}

fn linked<H: HandleModel<Recorder>>(gfx: &mut Gfx<Recorder, H>) -> ProgramId {
    ProgramBuilder::new()
        .vertex("void main() {}")
        .fragment("void main() {}")
        .build(gfx)
        .unwrap()
}

// ── construction ──────────────────────────────────────────────────────────

#[test]
fn construction_reads_context_info() {
    let gfx = native();
    assert_eq!(gfx.context_info().version, "3.3 recorder");
    assert!(!gfx.context_info().is_embedded());
    assert!(gfx.binding().calls().is_empty());
}

#[test]
fn missing_context_fails_construction() {
    let err = Gfx::native(Recorder::new().with_version(""), config())
        .err()
        .unwrap();
    let root = err.downcast_ref::<GfxError>().unwrap();
    assert!(matches!(root, GfxError::ContextUnavailable(_)));
    assert!(format!("{err:#}").contains("failed to query the graphics context"));
}

#[test]
fn stale_errors_are_drained_at_construction() {
    let mut rec = Recorder::new();
    rec.raise(INVALID_ENUM);
    let mut gfx = Gfx::native(rec, config()).unwrap();
    assert_eq!(gfx.binding().pending_errors(), 0);
    gfx.enable(BLEND);
}

#[test]
fn default_state_is_applied_and_cached() {
    let mut gfx = Gfx::native(Recorder::new(), GfxConfig::default()).unwrap();
    assert_eq!(gfx.is_enabled(DEPTH_TEST), Some(true));
    assert_eq!(gfx.is_enabled(CULL_FACE), Some(true));
    assert_eq!(gfx.is_enabled(BLEND), Some(true));
    assert!(gfx.state().depth_func.is(&LEQUAL));
    assert!(gfx.state().front_face.is(&CCW));
    assert!(gfx.state().cull_face.is(&BACK));
    assert!(gfx.state().blend_equation.is(&(FUNC_ADD, FUNC_ADD)));
    assert!(gfx.state().blend_func.is(&(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, SRC_ALPHA, ONE_MINUS_SRC_ALPHA)));
    assert_eq!(gfx.binding().count("clear_color"), 1);

    gfx.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
    gfx.depth_func(LEQUAL);
    assert_eq!(gfx.binding().count("blend_func"), 1);
    assert_eq!(gfx.binding().count("depth_func"), 1);
}

// ── state cache ───────────────────────────────────────────────────────────

#[test]
fn enable_twice_issues_once() {
    let mut gfx = native();
    gfx.enable(DEPTH_TEST);
    gfx.enable(DEPTH_TEST);
    assert_eq!(gfx.binding().count("enable"), 1);
    assert_eq!(gfx.stats().capability_hits, 1);

    gfx.disable(DEPTH_TEST);
    gfx.enable(DEPTH_TEST);
    assert_eq!(gfx.binding().count("enable"), 2);
    assert_eq!(gfx.binding().count("disable"), 1);
}

#[test]
fn unset_capability_is_always_issued() {
    let mut gfx = native();
    gfx.disable(STENCIL_TEST);
    assert_eq!(gfx.binding().count("disable"), 1);
    assert_eq!(gfx.stats().capability_hits, 0);
}

#[test]
fn scalar_setters_skip_repeats() {
    let mut gfx = virtualized();
    for _ in 0..3 {
        gfx.depth_func(LESS);
        gfx.depth_mask(false);
        gfx.front_face(CW);
        gfx.cull_face(FRONT);
        gfx.line_width(2.0);
        gfx.active_texture(TEXTURE0 + 1);
    }

    let rec = gfx.binding();
    for command in [
        "depth_func",
        "depth_mask",
        "front_face",
        "cull_face",
        "line_width",
        "active_texture",
    ] {
        assert_eq!(rec.count(command), 1, "{command}");
    }
}

#[test]
fn group_partial_match_still_issues() {
    let mut gfx = native();
    gfx.blend_func(SRC_ALPHA, ONE);
    gfx.blend_func(SRC_ALPHA, ZERO);
    gfx.blend_func(SRC_ALPHA, ZERO);
    assert_eq!(gfx.binding().count("blend_func"), 2);

    gfx.polygon_offset(1.0, 1.0);
    gfx.polygon_offset(1.0, 2.0);
    assert_eq!(gfx.binding().count("polygon_offset"), 2);

    gfx.polygon_mode(FRONT_AND_BACK, LINE);
    gfx.polygon_mode(FRONT_AND_BACK, LINE);
    assert_eq!(gfx.binding().count("polygon_mode"), 1);
}

#[test]
fn combined_and_separate_blend_share_cache() {
    let mut gfx = native();
    gfx.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
    gfx.blend_func_separate(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
    assert_eq!(gfx.binding().count("blend_func_separate"), 0);

    gfx.blend_func_separate(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, ONE, ZERO);
    gfx.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
    assert_eq!(gfx.binding().count("blend_func_separate"), 1);
    assert_eq!(gfx.binding().count("blend_func"), 2);

    gfx.blend_equation(FUNC_ADD);
    gfx.blend_equation_separate(FUNC_ADD, FUNC_ADD);
    assert_eq!(gfx.binding().count("blend_equation_separate"), 0);
}

#[test]
fn viewport_is_cached_and_readable() {
    let mut gfx = native();
    assert_eq!(gfx.viewport(), None);

    let vp = Viewport::new(0, 0, 800, 600);
    gfx.set_viewport(vp);
    gfx.set_viewport(vp);
    assert_eq!(gfx.viewport(), Some(vp));
    assert_eq!(gfx.binding().count("viewport"), 1);

    gfx.set_viewport(Viewport::new(0, 0, 800, 601));
    assert_eq!(gfx.binding().count("viewport"), 2);
}

#[test]
fn uncached_commands_always_pass_through() {
    let mut gfx = native();
    gfx.clear(COLOR_BUFFER_BIT);
    gfx.clear(COLOR_BUFFER_BIT);
    gfx.scissor(0, 0, 4, 4);
    gfx.scissor(0, 0, 4, 4);
    assert_eq!(gfx.binding().count("clear"), 2);
    assert_eq!(gfx.binding().count("scissor"), 2);
}

#[test]
fn invalidate_state_reissues_everything() {
    let mut gfx = native();
    gfx.enable(BLEND);
    gfx.depth_func(LESS);
    gfx.invalidate_state();

    gfx.enable(BLEND);
    gfx.depth_func(LESS);
    assert_eq!(gfx.binding().count("enable"), 2);
    assert_eq!(gfx.binding().count("depth_func"), 2);
}

#[test]
#[should_panic(expected = "depth_func: GL_INVALID_ENUM")]
fn driver_error_is_fatal_with_checks_on() {
    let mut gfx = native();
    gfx.binding_mut().raise(INVALID_ENUM);
    gfx.depth_func(0xdead);
}

#[test]
fn fatal_driver_error_leaves_cache_untouched() {
    let mut gfx = native();
    gfx.binding_mut().raise(INVALID_ENUM);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| gfx.depth_func(GREATER)));
    assert!(outcome.is_err());
    assert!(!gfx.state().depth_func.is(&GREATER));

    gfx.depth_func(GREATER);
    assert_eq!(gfx.binding().count("depth_func"), 2);
    assert!(gfx.state().depth_func.is(&GREATER));
}

#[test]
fn unchecked_mode_leaves_errors_queued() {
    let mut gfx = Gfx::native(Recorder::new(), unchecked()).unwrap();
    gfx.depth_func(LESS);
    gfx.depth_func(LESS);
    assert_eq!(gfx.binding().count("depth_func"), 1);
    // Without checks the error stays queued for whoever asks.
    gfx.binding_mut().raise(INVALID_ENUM);
    gfx.depth_func(GREATER);
    assert_eq!(gfx.binding().pending_errors(), 1);
}

// ── handles ───────────────────────────────────────────────────────────────

#[test]
fn virtual_handles_are_sequential_from_one() {
    let mut gfx = Gfx::virtualized(Recorder::new().with_name_base(500), config()).unwrap();
    let ids: Vec<u32> = (0..5).map(|_| gfx.create_buffer().unwrap().raw()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(gfx.stats().buffers, 5);
}

#[test]
fn native_handles_are_driver_names() {
    let mut gfx = Gfx::native(Recorder::new().with_name_base(500), config()).unwrap();
    let id = gfx.create_texture().unwrap();
    assert_eq!(id.raw(), 500);
    assert!(gfx.binding().is_live(ResourceKind::Texture, 500));
}

#[test]
fn deleted_texture_handle_is_never_reused() {
    let mut gfx = Gfx::virtualized(Recorder::new(), unchecked()).unwrap();
    let t: Vec<TextureId> = (0..3).map(|_| gfx.create_texture().unwrap()).collect();
    assert_eq!(t.iter().map(|t| t.raw()).collect::<Vec<_>>(), vec![1, 2, 3]);

    gfx.delete_textures(&[t[1]]).unwrap();
    let fourth = gfx.create_texture().unwrap();
    assert_eq!(fourth.raw(), 4);

    let err = gfx.bind_texture(TEXTURE_2D, Some(t[1])).unwrap_err();
    assert_eq!(
        err,
        GfxError::InvalidHandle {
            kind: ResourceKind::Texture,
            handle: 2
        }
    );
    assert_eq!(gfx.binding().count("bind_texture"), 0);
    assert_eq!(gfx.stats().textures, 3);
}

#[test]
#[should_panic(expected = "bind_texture")]
fn binding_unknown_handle_is_fatal_virtualized() {
    let mut gfx = virtualized();
    gfx.bind_texture(TEXTURE_2D, TextureId::from_raw(9)).unwrap();
}

#[test]
#[should_panic(expected = "bind_texture")]
fn binding_unknown_handle_is_fatal_native() {
    let mut gfx = native();
    gfx.bind_texture(TEXTURE_2D, TextureId::from_raw(9)).unwrap();
}

#[test]
fn binding_none_needs_no_handle() {
    let mut gfx = virtualized();
    gfx.bind_buffer(ARRAY_BUFFER, None).unwrap();
    gfx.bind_framebuffer(FRAMEBUFFER, None).unwrap();
    assert_eq!(gfx.binding().calls()[0].args, format!("{ARRAY_BUFFER:#06x} 0"));
}

#[test]
fn failed_creation_is_reported() {
    let mut gfx = virtualized();
    gfx.binding_mut().fail_next_create();
    let err = gfx.create_buffer().unwrap_err();
    assert!(matches!(
        err,
        GfxError::CreateFailed {
            kind: ResourceKind::Buffer,
            ..
        }
    ));
    assert_eq!(gfx.stats().buffers, 0);
    assert!(gfx.handles().table::<Buffers>().is_empty());

    assert_eq!(gfx.create_buffer().unwrap().raw(), 1);
}

// ── batch deletes ─────────────────────────────────────────────────────────

#[test]
fn native_batch_delete_is_one_call() {
    let mut gfx = native();
    let b: Vec<BufferId> = (0..3).map(|_| gfx.create_buffer().unwrap()).collect();
    gfx.delete_buffers(&b).unwrap();

    let rec = gfx.binding();
    assert_eq!(rec.count("delete_buffers"), 1);
    assert_eq!(rec.count("delete_buffer"), 0);
    assert_eq!(rec.live_count(), 0);
    assert_eq!(gfx.stats().buffers, 0);
}

#[test]
fn virtual_batch_delete_is_one_call_per_object() {
    let mut gfx = virtualized();
    let v: Vec<VertexArrayId> = (0..3).map(|_| gfx.create_vertex_array().unwrap()).collect();
    gfx.delete_vertex_arrays(&v).unwrap();

    let rec = gfx.binding();
    assert_eq!(rec.count("delete_vertex_arrays"), 0);
    assert_eq!(rec.count("delete_vertex_array"), 3);
    assert_eq!(gfx.stats().vertex_arrays, 0);
    assert!(gfx.handles().table::<VertexArrays>().is_empty());
}

#[test]
fn batch_with_invalid_handle_deletes_nothing() {
    let mut gfx = Gfx::virtualized(Recorder::new(), unchecked()).unwrap();
    let a = gfx.create_texture().unwrap();
    let b = gfx.create_texture().unwrap();
    let bogus = TextureId::from_raw(77).unwrap();

    let err = gfx.delete_textures(&[a, bogus, b]).unwrap_err();
    assert!(matches!(err, GfxError::InvalidHandle { handle: 77, .. }));
    assert_eq!(gfx.binding().count("delete_texture"), 0);
    assert_eq!(gfx.stats().textures, 2);
    assert!(gfx.handles().table::<Textures>().contains(a.raw()));
}

#[test]
fn native_double_delete_is_rejected() {
    let mut gfx = Gfx::native(Recorder::new(), unchecked()).unwrap();
    let a = gfx.create_buffer().unwrap();
    let _b = gfx.create_buffer().unwrap();
    gfx.delete_buffers(&[a]).unwrap();

    let err = gfx.delete_buffers(&[a]).unwrap_err();
    assert_eq!(
        err,
        GfxError::InvalidHandle {
            kind: ResourceKind::Buffer,
            handle: a.raw()
        }
    );
    assert_eq!(gfx.binding().count("delete_buffers"), 1);
    assert_eq!(gfx.stats().buffers, 1);
    assert_eq!(gfx.binding().live_count(), 1);
}

#[test]
#[should_panic(expected = "delete_program: invalid program handle")]
fn native_double_delete_is_fatal_with_checks_on() {
    let mut gfx = native();
    let p = linked(&mut gfx);
    gfx.delete_program(p).unwrap();
    let _ = gfx.delete_program(p);
}

#[test]
fn duplicate_handles_in_batch_count_once() {
    let mut gfx = virtualized();
    let a = gfx.create_buffer().unwrap();
    let b = gfx.create_buffer().unwrap();
    gfx.delete_buffers(&[a, a, b]).unwrap();
    assert_eq!(gfx.binding().count("delete_buffer"), 2);
    assert_eq!(gfx.stats().buffers, 0);
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut gfx = native();
    gfx.delete_buffers(&[]).unwrap();
    assert!(gfx.binding().calls().is_empty());
}

// ── programs ──────────────────────────────────────────────────────────────

#[test]
fn use_program_is_cached() {
    let mut gfx = virtualized();
    let p = linked(&mut gfx);
    gfx.binding_mut().take_calls();

    gfx.use_program(Some(p)).unwrap();
    gfx.use_program(Some(p)).unwrap();
    gfx.use_program(None).unwrap();
    gfx.use_program(None).unwrap();
    assert_eq!(gfx.binding().count("use_program"), 2);
}

#[test]
fn deleting_active_program_clears_it() {
    let mut gfx = native();
    let p = linked(&mut gfx);
    gfx.use_program(Some(p)).unwrap();
    assert_eq!(gfx.active_program().map(|k| k.id), Some(p));

    gfx.delete_program(p).unwrap();
    assert_eq!(gfx.active_program(), None);
    assert_eq!(gfx.stats().programs, 0);
}

#[test]
fn program_serials_never_repeat() {
    let mut gfx = Gfx::native(Recorder::new().with_name_recycling(), config()).unwrap();
    let first = linked(&mut gfx);
    gfx.use_program(Some(first)).unwrap();
    let key1 = gfx.active_program().unwrap();
    gfx.delete_program(first).unwrap();

    let second = linked(&mut gfx);
    gfx.use_program(Some(second)).unwrap();
    let key2 = gfx.active_program().unwrap();

    assert_eq!(key1.id, key2.id);
    assert_ne!(key1.serial, key2.serial);
}

#[test]
fn compile_returns_log_and_cleans_up() {
    let mut gfx = virtualized();
    let err = gfx.compile(ShaderStage::Vertex, "#error broken").unwrap_err();
    match err {
        GfxError::Compile { stage, log } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(log.contains("#error"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(gfx.handles().table::<Shaders>().is_empty());
}

// ── uniforms ──────────────────────────────────────────────────────────────

#[test]
fn virtual_uniform_lookups_are_memoized_per_program() {
    let mut rec = Recorder::new();
    rec.set_uniform("Color", 3);
    let mut gfx = Gfx::virtualized(rec, config()).unwrap();
    let p = linked(&mut gfx);

    let a = gfx.uniform_location(p, "Color").unwrap();
    let b = gfx.uniform_location(p, "Color").unwrap();
    assert_eq!(a, b);
    assert_eq!(gfx.binding().count("uniform_location"), 1);
    assert_eq!(gfx.handles().table::<Uniforms>().len(), 1);
}

#[test]
fn deleting_program_releases_its_uniforms() {
    let mut rec = Recorder::new();
    rec.set_uniform("Color", 3);
    rec.set_uniform("Model", 4);
    let mut gfx = Gfx::virtualized(rec, config()).unwrap();
    let p = linked(&mut gfx);
    gfx.uniform_location(p, "Color").unwrap();
    gfx.uniform_location(p, "Model").unwrap();
    gfx.uniform_location(p, "Missing").unwrap();
    assert_eq!(gfx.handles().table::<Uniforms>().len(), 2);

    gfx.delete_program(p).unwrap();
    assert!(gfx.handles().table::<Uniforms>().is_empty());
}

#[test]
fn native_uniform_slot_is_the_driver_location() {
    let mut rec = Recorder::new();
    rec.set_uniform("Time", 0);
    let mut gfx = Gfx::native(rec, config()).unwrap();
    let p = linked(&mut gfx);
    assert_eq!(gfx.uniform_location(p, "Time").unwrap(), Slot::new(0));
}

#[test]
fn uploads_count_and_skip_missing_slots() {
    let mut rec = Recorder::new();
    rec.set_uniform("Model", 5);
    let mut gfx = Gfx::virtualized(rec, config()).unwrap();
    let p = linked(&mut gfx);
    gfx.use_program(Some(p)).unwrap();

    let model = gfx.uniform_location(p, "Model").unwrap();
    let identity = [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];
    gfx.uniform_matrix_4fv(model, false, &[identity, identity]).unwrap();
    gfx.uniform_3fv(model, &[[1.0, 2.0, 3.0]]).unwrap();
    gfx.uniform_1i(Slot::NOT_FOUND, 7).unwrap();

    let rec = gfx.binding();
    let upload = rec.calls().iter().find(|c| c.command == "uniform_matrix_4fv").unwrap();
    assert_eq!(upload.args, "5 false 32");
    assert_eq!(rec.count("uniform_3fv"), 1);
    assert_eq!(rec.count("uniform_1i"), 0);
    assert_eq!(gfx.stats().uniform_sets, 2);
}

#[test]
#[should_panic(expected = "uniform_1f: no program is active")]
fn upload_without_program_is_fatal() {
    let mut gfx = native();
    gfx.uniform_1f(Slot::new(0), 1.0).unwrap();
}

#[test]
fn upload_without_program_is_rejected_when_unchecked() {
    let mut gfx = Gfx::virtualized(Recorder::new(), unchecked()).unwrap();
    assert_eq!(gfx.uniform_1f(Slot::NOT_FOUND, 1.0), Err(GfxError::NoActiveProgram));
    assert_eq!(gfx.stats().uniform_sets, 0);
}

// ── draws and stats ───────────────────────────────────────────────────────

#[test]
fn draws_are_counted() {
    let mut gfx = native();
    gfx.draw_arrays(TRIANGLES, 0, 3);
    gfx.draw_elements(TRIANGLES, 6, UNSIGNED_SHORT, 0);
    gfx.draw_arrays_instanced(TRIANGLES, 0, 3, 10);
    gfx.draw_elements_instanced(TRIANGLES, 6, UNSIGNED_INT, 0, 10);
    assert_eq!(gfx.stats().draw_calls, 4);

    let frame = *gfx.stats();
    gfx.draw_arrays(LINES, 0, 2);
    assert_eq!(gfx.stats().since(&frame).draw_calls, 1);
}

#[test]
fn reset_stats_keeps_gauges() {
    let mut gfx = virtualized();
    gfx.create_buffer().unwrap();
    gfx.draw_arrays(POINTS, 0, 1);
    gfx.reset_stats();
    assert_eq!(gfx.stats().draw_calls, 0);
    assert_eq!(gfx.stats().buffers, 1);
}

#[test]
fn buffer_data_reinterprets_pod_slices() {
    let mut gfx = native();
    let vbo = gfx.create_buffer().unwrap();
    gfx.bind_buffer(ARRAY_BUFFER, Some(vbo)).unwrap();
    gfx.buffer_data(ARRAY_BUFFER, &[[0.0f32, 1.0, 2.0]; 4], STATIC_DRAW);
    gfx.buffer_sub_data(ARRAY_BUFFER, 12, &[7u16, 8]);

    let rec = gfx.binding();
    let data = rec.calls().iter().find(|c| c.command == "buffer_data").unwrap();
    assert_eq!(data.args, format!("{ARRAY_BUFFER:#06x} 48 {STATIC_DRAW:#06x}"));
    let sub = rec.calls().iter().find(|c| c.command == "buffer_sub_data").unwrap();
    assert_eq!(sub.args, format!("{ARRAY_BUFFER:#06x} 12 4"));
}

// ── framebuffers ──────────────────────────────────────────────────────────

#[test]
fn render_target_setup() {
    let mut gfx = virtualized();
    let color = gfx.create_texture().unwrap();
    let depth = gfx.create_renderbuffer().unwrap();
    let fbo = gfx.create_framebuffer().unwrap();

    gfx.bind_texture(TEXTURE_2D, Some(color)).unwrap();
    gfx.tex_image_2d(TEXTURE_2D, 0, RGBA8 as i32, 256, 256, RGBA, UNSIGNED_BYTE, None);
    gfx.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR as i32);
    gfx.bind_renderbuffer(RENDERBUFFER, Some(depth)).unwrap();
    gfx.renderbuffer_storage(RENDERBUFFER, DEPTH24_STENCIL8, 256, 256);
    gfx.bind_framebuffer(FRAMEBUFFER, Some(fbo)).unwrap();
    gfx.framebuffer_texture_2d(FRAMEBUFFER, COLOR_ATTACHMENT0, TEXTURE_2D, Some(color), 0)
        .unwrap();
    gfx.framebuffer_renderbuffer(FRAMEBUFFER, DEPTH_STENCIL_ATTACHMENT, RENDERBUFFER, Some(depth))
        .unwrap();
    assert_eq!(gfx.check_framebuffer_status(FRAMEBUFFER), FRAMEBUFFER_COMPLETE);

    gfx.bind_framebuffer(FRAMEBUFFER, None).unwrap();
    gfx.delete_framebuffer(fbo).unwrap();
    gfx.delete_renderbuffer(depth).unwrap();
    gfx.delete_textures(&[color]).unwrap();
    assert_eq!(gfx.binding().live_count(), 0);
}
