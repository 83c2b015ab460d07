use std::fmt;

use crate::consts;

/// Status reported by the driver's error query.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    ContextLost,
    /// A code outside the core set (vendor extensions).
    Unknown(u32),
}

impl GlError {
    /// Maps a raw status code. Returns `None` for `NO_ERROR`.
    pub fn from_code(code: u32) -> Option<Self> {
        let err = match code {
            consts::NO_ERROR => return None,
            consts::INVALID_ENUM => Self::InvalidEnum,
            consts::INVALID_VALUE => Self::InvalidValue,
            consts::INVALID_OPERATION => Self::InvalidOperation,
            consts::STACK_OVERFLOW => Self::StackOverflow,
            consts::STACK_UNDERFLOW => Self::StackUnderflow,
            consts::OUT_OF_MEMORY => Self::OutOfMemory,
            consts::INVALID_FRAMEBUFFER_OPERATION => Self::InvalidFramebufferOperation,
            consts::CONTEXT_LOST => Self::ContextLost,
            other => Self::Unknown(other),
        };
        Some(err)
    }

    pub fn code(self) -> u32 {
        match self {
            Self::InvalidEnum => consts::INVALID_ENUM,
            Self::InvalidValue => consts::INVALID_VALUE,
            Self::InvalidOperation => consts::INVALID_OPERATION,
            Self::StackOverflow => consts::STACK_OVERFLOW,
            Self::StackUnderflow => consts::STACK_UNDERFLOW,
            Self::OutOfMemory => consts::OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => consts::INVALID_FRAMEBUFFER_OPERATION,
            Self::ContextLost => consts::CONTEXT_LOST,
            Self::Unknown(code) => code,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::InvalidEnum => "GL_INVALID_ENUM",
            Self::InvalidValue => "GL_INVALID_VALUE",
            Self::InvalidOperation => "GL_INVALID_OPERATION",
            Self::StackOverflow => "GL_STACK_OVERFLOW",
            Self::StackUnderflow => "GL_STACK_UNDERFLOW",
            Self::OutOfMemory => "GL_OUT_OF_MEMORY",
            Self::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            Self::ContextLost => "GL_CONTEXT_LOST",
            Self::Unknown(_) => "unknown GL error",
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.symbol(), self.code())
    }
}

impl std::error::Error for GlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_error_maps_to_none() {
        assert_eq!(GlError::from_code(consts::NO_ERROR), None);
    }

    #[test]
    fn known_codes_round_trip() {
        let err = GlError::from_code(0x0502).unwrap();
        assert_eq!(err, GlError::InvalidOperation);
        assert_eq!(err.code(), 0x0502);
    }

    #[test]
    fn unknown_code_is_preserved() {
        let err = GlError::from_code(0x9999).unwrap();
        assert_eq!(err, GlError::Unknown(0x9999));
        assert_eq!(err.to_string(), "unknown GL error (0x9999)");
    }

    #[test]
    fn display_names_the_symbol() {
        assert_eq!(GlError::InvalidValue.to_string(), "GL_INVALID_VALUE (0x0501)");
    }
}
