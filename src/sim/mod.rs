use smallvec::SmallVec;

use crate::{
    render::PictureHandle,
    tile::Tilemap,
    utils::coords::Cell,
};

pub mod overlay;
pub use overlay::{
    Construction,
    InfoBox,
    InfoBoxHost,
    LandOverlay,
    OverlayKey,
    OverlayRef,
    OverlayStore,
};

// ----------------------------------------------
// Walker
// ----------------------------------------------

pub type WalkerPictureList = SmallVec<[Option<PictureHandle>; 4]>;

// A moving actor (citizen, cart, animal...).
pub trait Walker {
    // Cell the walker is currently in.
    fn cell(&self) -> Cell;

    // Position in sub-tile units (see coords::SUBTILES_PER_CELL).
    fn subtile_pos(&self) -> (i32, i32);

    // Pictures for the current animation frame, back to front.
    fn pictures(&self, list: &mut WalkerPictureList);

    #[inline]
    fn depth(&self) -> i32 {
        self.cell().depth()
    }
}

// ----------------------------------------------
// CityModel
// ----------------------------------------------

// The authoritative world state the view reads from and commits edits to.
pub trait CityModel {
    fn tilemap(&self) -> &Tilemap;

    fn overlay(&self, key: OverlayKey) -> Option<&dyn LandOverlay>;

    // Walkers in simulation order. The list must not change while it is
    // being visited.
    fn visit_walkers(&self, visitor: &mut dyn FnMut(&dyn Walker));

    fn build(&mut self, construction: &dyn Construction, cell: Cell);

    fn clear_land(&mut self, cell: Cell);
}
