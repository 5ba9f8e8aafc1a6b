use crate::utils::{Size, coords::ScreenPoint};

// ----------------------------------------------
// PictureHandle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PictureHandle {
    #[default]
    Invalid,    // Backend draws its built-in placeholder picture.
    Index(u32), // Index into the backend's picture storage.
}

impl PictureHandle {
    #[inline]
    pub const fn invalid() -> Self {
        PictureHandle::Invalid
    }

    #[inline]
    pub const fn from_index(index: u32) -> Self {
        PictureHandle::Index(index)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, PictureHandle::Invalid)
    }
}

impl std::fmt::Display for PictureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PictureHandle::Invalid => write!(f, "Invalid"),
            PictureHandle::Index(index) => write!(f, "#{index}"),
        }
    }
}

// ----------------------------------------------
// RenderSystem
// ----------------------------------------------

// Drawing surface the tile map is composited onto.
pub trait RenderSystem {
    fn viewport_size(&self) -> Size;

    // Blits `picture` with its anchor at `position`. Pictures carry their
    // own offsets, so tall buildings extend upwards from the anchor.
    fn draw_picture(&mut self, picture: PictureHandle, position: ScreenPoint);
}

// ----------------------------------------------
// PictureCache
// ----------------------------------------------

// Named picture lookup, e.g. ("land1a", 1).
pub trait PictureCache {
    // Returns PictureHandle::Invalid if no such picture is loaded.
    fn find_picture(&self, group: &str, index: u32) -> PictureHandle;
}
