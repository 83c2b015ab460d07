//! Program building.

use std::fmt;

use crate::consts;
use crate::driver::Binding;
use crate::gfx::{Gfx, GfxError, GfxResult};
use crate::handles::{HandleModel, ProgramId, ShaderId};

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    #[inline]
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => consts::VERTEX_SHADER,
            Self::Fragment => consts::FRAGMENT_SHADER,
            Self::Geometry => consts::GEOMETRY_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
        })
    }
}

/// Compiles and links a program from source.
///
/// Stage objects only live for the duration of [`ProgramBuilder::build`]; on success the
/// program is all that remains, on failure nothing remains.
///
/// ```ignore
/// let program = ProgramBuilder::new()
///     .vertex(VERTEX_SRC)
///     .fragment(FRAGMENT_SRC)
///     .build(&mut gfx)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder<'a> {
    stages: Vec<(ShaderStage, &'a str)>,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: ShaderStage, source: &'a str) -> Self {
        self.stages.push((stage, source));
        self
    }

    pub fn vertex(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Vertex, source)
    }

    pub fn fragment(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Fragment, source)
    }

    pub fn geometry(self, source: &'a str) -> Self {
        self.stage(ShaderStage::Geometry, source)
    }

    pub fn build<B: Binding, H: HandleModel<B>>(&self, gfx: &mut Gfx<B, H>) -> GfxResult<ProgramId> {
        if self.stages.is_empty() {
            return Err(GfxError::Link {
                log: "no shader stages".to_owned(),
            });
        }

        let mut shaders = Vec::with_capacity(self.stages.len());
        for &(stage, source) in &self.stages {
            match gfx.compile(stage, source) {
                Ok(shader) => shaders.push(shader),
                Err(err) => {
                    if let GfxError::Compile { log, .. } = &err {
                        log::error!(
                            "{stage} shader failed to compile:\n{}\n{}",
                            log.trim_end(),
                            numbered_source(source)
                        );
                    }
                    discard(gfx, &shaders);
                    return Err(err);
                }
            }
        }

        let program = match gfx.create_program() {
            Ok(program) => program,
            Err(err) => {
                discard(gfx, &shaders);
                return Err(err);
            }
        };

        let linked = link(gfx, program, &shaders);
        discard(gfx, &shaders);

        if let Err(err) = linked {
            if let GfxError::Link { log } = &err {
                log::error!("program failed to link:\n{}", log.trim_end());
            }
            if let Err(cleanup) = gfx.delete_program(program) {
                log::warn!("failed to delete unlinked program {program}: {cleanup}");
            }
            return Err(err);
        }

        log::debug!("built program {program} from {} stage(s)", shaders.len());
        Ok(program)
    }
}

fn link<B: Binding, H: HandleModel<B>>(
    gfx: &mut Gfx<B, H>,
    program: ProgramId,
    shaders: &[ShaderId],
) -> GfxResult<()> {
    for &shader in shaders {
        gfx.attach_shader(program, shader)?;
    }
    gfx.link_program(program)?;
    let ok = gfx.program_link_status(program)?;
    for &shader in shaders {
        gfx.detach_shader(program, shader)?;
    }

    if ok {
        Ok(())
    } else {
        Err(GfxError::Link {
            log: gfx.program_info_log(program)?,
        })
    }
}

fn discard<B: Binding, H: HandleModel<B>>(gfx: &mut Gfx<B, H>, shaders: &[ShaderId]) {
    for &shader in shaders {
        if let Err(err) = gfx.delete_shader(shader) {
            log::warn!("failed to delete shader {shader}: {err}");
        }
    }
}

/// Prefixes every line of `source` with its 1-based line number, the way compiler
/// logs refer to them.
pub fn numbered_source(source: &str) -> String {
    let width = source.lines().count().max(1).to_string().len();
    let mut out = String::with_capacity(source.len() + source.len() / 4);
    for (i, line) in source.lines().enumerate() {
        out.push_str(&format!("{:>width$} | {line}\n", i + 1));
    }
    out
}
