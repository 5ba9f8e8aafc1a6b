use serde::{Deserialize, Serialize};

use crate::{
    bitflags_with_display,
    render::PictureHandle,
    sim::{OverlayKey, OverlayRef},
    utils::coords::{Cell, Footprint},
};

pub mod map_area;
pub mod preview;
pub mod rendering;
pub mod view;

#[cfg(test)]
mod test_utils;

// ----------------------------------------------
// TerrainFlags
// ----------------------------------------------

bitflags_with_display! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TerrainFlags: u16 {
        const Tree     = 1 << 0;
        const Rock     = 1 << 1;
        const Water    = 1 << 2;
        const Road     = 1 << 3;
        const Building = 1 << 4;
        const Aqueduct = 1 << 5;
        const Meadow   = 1 << 6;
        const Garden   = 1 << 7;
    }
}

impl TerrainFlags {
    // Anything sticking up from the ground. These are depth sorted
    // together with walkers instead of going into the flat ground pass.
    pub const RAISED: TerrainFlags = TerrainFlags::Tree
        .union(TerrainFlags::Rock)
        .union(TerrainFlags::Building)
        .union(TerrainFlags::Aqueduct);

    pub const DESTRUCTIBLE: TerrainFlags = TerrainFlags::Tree
        .union(TerrainFlags::Building)
        .union(TerrainFlags::Road);
}

// ----------------------------------------------
// TerrainTile
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainTile {
    flags: TerrainFlags,
    overlay: Option<OverlayRef>,
}

impl TerrainTile {
    #[inline]
    pub const fn new(flags: TerrainFlags) -> Self {
        Self { flags, overlay: None }
    }

    #[inline]
    pub fn flags(&self) -> TerrainFlags {
        self.flags
    }

    #[inline]
    pub fn has_flags(&self, flags: TerrainFlags) -> bool {
        self.flags.intersects(flags)
    }

    #[inline]
    pub fn set_flags(&mut self, flags: TerrainFlags, value: bool) {
        self.flags.set(flags, value);
    }

    #[inline]
    pub fn overlay(&self) -> Option<OverlayRef> {
        self.overlay
    }

    #[inline]
    pub fn set_overlay(&mut self, overlay: Option<OverlayRef>) {
        self.overlay = overlay;
    }

    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.flags.intersects(TerrainFlags::DESTRUCTIBLE)
    }
}

// ----------------------------------------------
// Tile
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    cell: Cell,
    picture: PictureHandle,
    // Master cell of the multi-tile footprint this tile belongs to.
    // The master tile points to itself. None for single tiles.
    master: Option<Cell>,
    terrain: TerrainTile,
}

impl Tile {
    #[inline]
    pub fn new(cell: Cell, picture: PictureHandle, terrain: TerrainTile) -> Self {
        Self { cell, picture, master: None, terrain }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    #[inline]
    pub fn i(&self) -> i32 {
        self.cell.i
    }

    #[inline]
    pub fn j(&self) -> i32 {
        self.cell.j
    }

    #[inline]
    pub fn depth(&self) -> i32 {
        self.cell.depth()
    }

    #[inline]
    pub fn picture(&self) -> PictureHandle {
        self.picture
    }

    #[inline]
    pub fn set_picture(&mut self, picture: PictureHandle) {
        self.picture = picture;
    }

    #[inline]
    pub fn master_cell(&self) -> Option<Cell> {
        self.master
    }

    #[inline]
    pub fn set_master_cell(&mut self, master: Option<Cell>) {
        self.master = master;
    }

    #[inline]
    pub fn is_master(&self) -> bool {
        self.master == Some(self.cell)
    }

    #[inline]
    pub fn terrain(&self) -> &TerrainTile {
        &self.terrain
    }

    #[inline]
    pub fn terrain_mut(&mut self) -> &mut TerrainTile {
        &mut self.terrain
    }

    // Walkable or boatable ground.
    #[inline]
    pub fn is_flat(&self) -> bool {
        !self.terrain.has_flags(TerrainFlags::RAISED)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Tile{} {} [{}]", self.cell, self.picture, self.terrain.flags)
    }
}

// ----------------------------------------------
// Tilemap
// ----------------------------------------------

// Authoritative square grid of tiles, N x N cells.
#[derive(Clone)]
pub struct Tilemap {
    size: i32,
    tiles: Vec<Tile>,
}

impl Tilemap {
    pub fn new(size: i32, ground_picture: PictureHandle) -> Self {
        debug_assert!(size > 0);
        let size = size.max(0);

        let mut tiles = Vec::with_capacity((size * size) as usize);
        for j in 0..size {
            for i in 0..size {
                tiles.push(Tile::new(Cell::new(i, j),
                                     ground_picture,
                                     TerrainTile::new(TerrainFlags::Meadow)));
            }
        }

        Self { size, tiles }
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn is_cell_within_bounds(&self, cell: Cell) -> bool {
        cell.i >= 0 && cell.j >= 0 && cell.i < self.size && cell.j < self.size
    }

    #[inline]
    pub fn try_tile(&self, cell: Cell) -> Option<&Tile> {
        self.cell_index(cell).map(|index| &self.tiles[index])
    }

    #[inline]
    pub fn try_tile_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        self.cell_index(cell).map(|index| &mut self.tiles[index])
    }

    // Caller guarantees `cell` is within bounds.
    #[inline]
    pub fn tile(&self, cell: Cell) -> &Tile {
        debug_assert!(self.is_cell_within_bounds(cell), "Cell {cell} out of bounds!");
        &self.tiles[(cell.j * self.size + cell.i) as usize]
    }

    // Stamps a placed overlay over its footprint: every cell links to the
    // anchor as master and takes the overlay picture. Returns false, leaving
    // the map untouched, if the footprint is not fully inside the map.
    pub fn place_overlay(&mut self,
                         footprint: Footprint,
                         key: OverlayKey,
                         picture: PictureHandle,
                         flags: TerrainFlags) -> bool {
        if !footprint.is_within_bounds(self.size) {
            return false;
        }

        for cell in &footprint {
            if let Some(tile) = self.try_tile_mut(cell) {
                tile.picture = picture;
                tile.master = Some(footprint.anchor);
                tile.terrain.flags = flags;
                tile.terrain.overlay = Some(OverlayRef::Placed(key));
            }
        }

        true
    }

    // Turns every in-bounds cell of the footprint back into plain single
    // tile ground.
    pub fn clear_footprint(&mut self, footprint: Footprint, ground_picture: PictureHandle) {
        for cell in &footprint {
            if let Some(tile) = self.try_tile_mut(cell) {
                tile.picture = ground_picture;
                tile.master = None;
                tile.terrain = TerrainTile::new(TerrainFlags::Meadow);
            }
        }
    }

    #[inline]
    fn cell_index(&self, cell: Cell) -> Option<usize> {
        if self.is_cell_within_bounds(cell) {
            Some((cell.j * self.size + cell.i) as usize)
        } else {
            None
        }
    }
}
