use crate::consts;
use crate::driver::Binding;

use super::GfxError;

/// Identification strings reported by the context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language_version: String,
}

impl ContextInfo {
    /// Reads the context strings. Fails when the driver reports no version, which only
    /// happens without a current context.
    pub(crate) fn query<B: Binding>(binding: &mut B) -> Result<Self, GfxError> {
        let version = binding.get_string(consts::VERSION);
        if version.trim().is_empty() {
            return Err(GfxError::ContextUnavailable(
                "driver reported an empty GL_VERSION".to_owned(),
            ));
        }

        Ok(Self {
            vendor: binding.get_string(consts::VENDOR),
            renderer: binding.get_string(consts::RENDERER),
            version,
            shading_language_version: binding.get_string(consts::SHADING_LANGUAGE_VERSION),
        })
    }

    /// True for OpenGL ES and WebGL contexts.
    pub fn is_embedded(&self) -> bool {
        self.version.starts_with("OpenGL ES") || self.version.starts_with("WebGL")
    }
}
