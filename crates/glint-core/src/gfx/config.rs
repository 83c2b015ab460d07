/// Construction parameters for [`crate::Gfx`].
#[derive(Debug, Clone)]
pub struct GfxConfig {
    /// Query the driver's error status after every call and treat any error as fatal.
    ///
    /// Meant for development builds; it costs a driver round trip per call.
    pub check_errors: bool,

    /// Apply the default render state at construction:
    /// - depth test on, `LEQUAL`
    /// - counter-clockwise front faces, back faces culled
    /// - alpha blending on (`FUNC_ADD`, `SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`)
    pub default_state: bool,

    /// Clear color set along with the default state.
    pub clear_color: [f32; 4],
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            check_errors: true,
            default_state: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
