use slab::Slab;

use crate::{
    render::PictureHandle,
    tile::Tilemap,
    utils::coords::{Cell, Footprint, ScreenPoint},
};

// ----------------------------------------------
// OverlayKey / OverlayRef
// ----------------------------------------------

// Key into the city's overlay storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayKey(u32);

impl OverlayKey {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

// What a terrain tile's overlay slot points at. Never owns the overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverlayRef {
    // A structure placed in the authoritative map.
    Placed(OverlayKey),
    // The build instance currently armed in the view.
    // Only preview tile copies carry this.
    BuildCandidate,
}

// ----------------------------------------------
// InfoBox / InfoBoxHost
// ----------------------------------------------

pub trait InfoBox {
    fn width(&self) -> i32;
    fn position(&self) -> ScreenPoint;
    fn set_position(&mut self, position: ScreenPoint);
}

// The screen that owns and displays info popups.
pub trait InfoBoxHost {
    fn set_info_box(&mut self, info_box: Box<dyn InfoBox>);
}

// ----------------------------------------------
// LandOverlay / Construction
// ----------------------------------------------

// A structure occupying a square footprint anchored at its master cell.
pub trait LandOverlay {
    fn size(&self) -> i32;

    fn master_cell(&self) -> Cell;

    fn picture(&self) -> PictureHandle;

    // Animation frames and other sprites drawn over the base picture, in
    // order. Entries can be None for an empty animation slot.
    fn foreground_pictures(&self) -> &[Option<PictureHandle>] {
        &[]
    }

    fn make_info_box(&self) -> Option<Box<dyn InfoBox>> {
        None
    }

    #[inline]
    fn footprint(&self) -> Footprint {
        Footprint::new(self.master_cell(), self.size())
    }
}

// A buildable overlay prototype, the "build instance" the player arms.
pub trait Construction: LandOverlay {
    // Whether the footprint anchored at `cell` accepts this construction.
    fn can_build(&self, tilemap: &Tilemap, cell: Cell) -> bool;
}

// ----------------------------------------------
// OverlayStore
// ----------------------------------------------

// Owning storage for placed overlays, for city model implementations.
// Keys stay stable until the overlay is removed.
#[derive(Default)]
pub struct OverlayStore {
    overlays: Slab<Box<dyn LandOverlay>>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self { overlays: Slab::new() }
    }

    pub fn insert(&mut self, overlay: Box<dyn LandOverlay>) -> OverlayKey {
        let index = self.overlays.insert(overlay);
        debug_assert!(index <= u32::MAX as usize);
        OverlayKey::new(index as u32)
    }

    pub fn remove(&mut self, key: OverlayKey) -> Option<Box<dyn LandOverlay>> {
        self.overlays.try_remove(key.index())
    }

    #[inline]
    pub fn get(&self, key: OverlayKey) -> Option<&dyn LandOverlay> {
        self.overlays.get(key.index()).map(|overlay| &**overlay)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
