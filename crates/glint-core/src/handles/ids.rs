use std::fmt;
use std::num::NonZeroU32;

/// Typed handle handed out by [`crate::Gfx`].
pub trait HandleId: Copy + PartialEq + fmt::Debug {
    /// Wraps a raw handle. `None` when `raw` can never name a resource.
    fn from_raw(raw: u32) -> Option<Self>;

    fn raw(self) -> u32;
}

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wraps a raw handle. Returns `None` for 0, which never names a resource.
            #[inline]
            pub fn from_raw(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }

        impl HandleId for $name {
            #[inline]
            fn from_raw(raw: u32) -> Option<Self> {
                $name::from_raw(raw)
            }

            #[inline]
            fn raw(self) -> u32 {
                $name::raw(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

handle_id!(
    /// Linked shader program.
    ProgramId
);
handle_id!(
    /// Single shader stage object.
    ShaderId
);
handle_id!(BufferId);
handle_id!(TextureId);
handle_id!(VertexArrayId);
handle_id!(FramebufferId);
handle_id!(RenderbufferId);

/// Binding slot of a uniform within a linked program.
///
/// `Slot::NOT_FOUND` (-1) marks a uniform the program does not declare; uploads to it
/// are skipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Slot(i32);

impl Slot {
    pub const NOT_FOUND: Slot = Slot(-1);

    #[inline]
    pub const fn new(slot: i32) -> Self {
        Self(slot)
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_found(self) -> bool {
        self.0 >= 0
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

impl HandleId for Slot {
    #[inline]
    fn from_raw(raw: u32) -> Option<Self> {
        i32::try_from(raw).ok().map(Slot)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
