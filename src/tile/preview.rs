use smallvec::SmallVec;
use strum::Display;

use super::{Tile, Tilemap};
use crate::{
    log,
    render::PictureHandle,
    sim::{CityModel, Construction, LandOverlay, OverlayRef},
    utils::coords::{Cell, Footprint},
};

// ----------------------------------------------
// PreviewTiles
// ----------------------------------------------

// Shadow copies of authoritative tiles describing a pending edit.
// Kept in creation order; lookups are by cell.
#[derive(Default)]
pub struct PreviewTiles {
    tiles: SmallVec<[Tile; 16]>,
}

impl PreviewTiles {
    #[inline]
    pub fn find(&self, cell: Cell) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.cell() == cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    #[inline]
    fn push(&mut self, tile: Tile) {
        debug_assert!(self.find(tile.cell()).is_none(), "Duplicate preview tile at {}", tile.cell());
        self.tiles.push(tile);
    }
}

// ----------------------------------------------
// ToolState
// ----------------------------------------------

// At most one tool is armed at any time.
#[derive(Default, Display)]
pub enum ToolState {
    #[default]
    None,
    Build(Box<dyn Construction>),
    Remove,
}

// ----------------------------------------------
// is_buildable
// ----------------------------------------------

// Whole footprint inside the map and accepted by the construction.
// Build previews and build commits both go through this check.
#[inline]
pub fn is_buildable(construction: &dyn Construction, tilemap: &Tilemap, cell: Cell) -> bool {
    Footprint::new(cell, construction.size()).is_within_bounds(tilemap.size())
        && construction.can_build(tilemap, cell)
}

// ----------------------------------------------
// PreviewOverlay
// ----------------------------------------------

pub struct PreviewOverlay {
    tool: ToolState,
    tiles: PreviewTiles,
    cleared_land_picture: PictureHandle,
}

impl PreviewOverlay {
    pub fn new(cleared_land_picture: PictureHandle) -> Self {
        Self {
            tool: ToolState::None,
            tiles: PreviewTiles::default(),
            cleared_land_picture,
        }
    }

    #[inline]
    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    #[inline]
    pub fn tiles(&self) -> &PreviewTiles {
        &self.tiles
    }

    #[inline]
    pub fn cleared_land_picture(&self) -> PictureHandle {
        self.cleared_land_picture
    }

    #[inline]
    pub fn build_instance(&self) -> Option<&dyn Construction> {
        match &self.tool {
            ToolState::Build(construction) => Some(&**construction),
            _ => None,
        }
    }

    #[inline]
    pub fn is_build_armed(&self) -> bool {
        matches!(self.tool, ToolState::Build(_))
    }

    #[inline]
    pub fn is_remove_armed(&self) -> bool {
        matches!(self.tool, ToolState::Remove)
    }

    pub fn set_build_instance(&mut self, construction: Box<dyn Construction>) {
        self.discard();
        self.tool = ToolState::Build(construction);
    }

    pub fn set_remove_tool(&mut self) {
        self.discard();
        self.tool = ToolState::Remove;
    }

    // Disarms whichever tool is armed. Returns the previous tool state.
    pub fn clear_tool(&mut self) -> ToolState {
        self.discard();
        std::mem::take(&mut self.tool)
    }

    pub fn discard(&mut self) {
        self.tiles = PreviewTiles::default();
    }

    // Refreshes the preview for whichever tool is armed.
    pub fn update(&mut self, city: &dyn CityModel, cell: Cell) {
        self.preview_build(city.tilemap(), cell);
        self.preview_remove(city, cell);
    }

    // Previews the armed build instance anchored at `cell`. Nothing is
    // previewed unless the whole footprint is inside the map and buildable.
    pub fn preview_build(&mut self, tilemap: &Tilemap, cell: Cell) {
        let ToolState::Build(construction) = &self.tool else {
            return;
        };

        self.tiles = PreviewTiles::default();

        if !is_buildable(&**construction, tilemap, cell) {
            return;
        }

        let footprint = Footprint::new(cell, construction.size());

        let picture = construction.picture();

        for footprint_cell in &footprint {
            let mut tile = *tilemap.tile(footprint_cell);
            tile.set_picture(picture);
            tile.set_master_cell(Some(footprint.anchor));
            tile.terrain_mut().set_overlay(Some(OverlayRef::BuildCandidate));
            self.tiles.push(tile);
        }

        debug_assert!(self.tiles.len() == footprint.cell_count());
    }

    // Previews what clearing the land at `cell` would leave behind.
    pub fn preview_remove(&mut self, city: &dyn CityModel, cell: Cell) {
        if !self.is_remove_armed() {
            return;
        }

        self.discard();

        let tilemap = city.tilemap();
        let Some(cursor_tile) = tilemap.try_tile(cell) else {
            return;
        };

        if !cursor_tile.terrain().is_destructible() {
            return;
        }

        let overlay_footprint = cursor_tile.terrain().overlay().and_then(|overlay_ref| {
            match overlay_ref {
                OverlayRef::Placed(key) => {
                    let overlay = city.overlay(key);
                    if overlay.is_none() {
                        log::warn!(log::channel!("preview"), "Tile {cell} references missing {key}.");
                    }
                    overlay.map(|overlay| overlay.footprint())
                }
                OverlayRef::BuildCandidate => {
                    log::warn!(log::channel!("preview"), "Authoritative tile {cell} references the build candidate.");
                    None
                }
            }
        });

        match overlay_footprint {
            // Lonely decoration, e.g. a tree.
            None => {
                let mut tile = *cursor_tile;
                tile.set_picture(self.cleared_land_picture);
                tile.set_master_cell(None);
                self.tiles.push(tile);
            }
            // Whole structure goes away; each cell becomes single cleared land.
            Some(footprint) => {
                for footprint_cell in &footprint {
                    if let Some(authoritative) = tilemap.try_tile(footprint_cell) {
                        let mut tile = *authoritative;
                        tile.set_picture(self.cleared_land_picture);
                        tile.set_master_cell(None);
                        tile.terrain_mut().set_overlay(None);
                        self.tiles.push(tile);
                    }
                }
            }
        }
    }
}

// ----------------------------------------------
// TileSource
// ----------------------------------------------

// Read-only view of the map with the preview copies layered on top.
// Borrowing the preview keeps tile references from outliving a rebuild.
#[derive(Copy, Clone)]
pub struct TileSource<'a> {
    city: &'a dyn CityModel,
    preview: Option<&'a PreviewTiles>,
    build_instance: Option<&'a dyn Construction>,
}

impl<'a> TileSource<'a> {
    pub fn new(city: &'a dyn CityModel, preview: &'a PreviewOverlay, preview_enabled: bool) -> Self {
        Self {
            city,
            preview: if preview_enabled { Some(preview.tiles()) } else { None },
            build_instance: preview.build_instance(),
        }
    }

    // Authoritative tiles only.
    pub fn without_preview(city: &'a dyn CityModel) -> Self {
        Self { city, preview: None, build_instance: None }
    }

    #[inline]
    pub fn tilemap(&self) -> &'a Tilemap {
        self.city.tilemap()
    }

    #[inline]
    pub fn map_size(&self) -> i32 {
        self.city.tilemap().size()
    }

    // Caller guarantees `cell` is within bounds.
    #[inline]
    pub fn resolve(&self, cell: Cell) -> &'a Tile {
        if let Some(tile) = self.preview.and_then(|preview| preview.find(cell)) {
            return tile;
        }
        self.city.tilemap().tile(cell)
    }

    #[inline]
    pub fn try_resolve(&self, cell: Cell) -> Option<&'a Tile> {
        if self.city.tilemap().is_cell_within_bounds(cell) {
            Some(self.resolve(cell))
        } else {
            None
        }
    }

    // Resolves the master tile of a multi-tile footprint, or the tile
    // itself for single tiles.
    #[inline]
    pub fn resolve_master(&self, tile: &'a Tile) -> &'a Tile {
        match tile.master_cell() {
            Some(master_cell) if master_cell != tile.cell() => self.resolve(master_cell),
            _ => tile,
        }
    }

    pub fn overlay(&self, overlay_ref: OverlayRef) -> Option<&'a dyn LandOverlay> {
        match overlay_ref {
            OverlayRef::Placed(key) => self.city.overlay(key),
            OverlayRef::BuildCandidate => self.build_instance.map(|construction| construction as &dyn LandOverlay),
        }
    }

    #[inline]
    pub fn tile_overlay(&self, tile: &Tile) -> Option<&'a dyn LandOverlay> {
        tile.terrain().overlay().and_then(|overlay_ref| self.overlay(overlay_ref))
    }
}
