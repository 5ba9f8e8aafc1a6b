use serde::{Deserialize, Serialize};

use super::{Tile, preview::TileSource};
use crate::{
    bitflags_with_display,
    render::RenderSystem,
    sim::{CityModel, WalkerPictureList},
    utils::{
        coords::{self, Cell, MapOrigin, ScreenPoint},
        hash::SmallSet,
    },
};

// ----------------------------------------------
// TileMapRenderFlags
// ----------------------------------------------

bitflags_with_display! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TileMapRenderFlags: u32 {
        const DrawTerrain     = 1 << 0; // Flat ground pass.
        const DrawStructures  = 1 << 1; // Trees, rocks, buildings, aqueducts.
        const DrawWalkers     = 1 << 2;
        const DrawForegrounds = 1 << 3; // Overlay animation frames.
    }
}

impl Default for TileMapRenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

// ----------------------------------------------
// TileMapRenderStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default)]
pub struct TileMapRenderStats {
    // Current frame totals:
    pub tiles_drawn: u32,
    pub multi_tiles_drawn: u32,
    pub foregrounds_drawn: u32,
    pub walkers_drawn: u32,
    // Peaks for the whole run:
    pub peak_tiles_drawn: u32,
    pub peak_multi_tiles_drawn: u32,
    pub peak_foregrounds_drawn: u32,
    pub peak_walkers_drawn: u32,
}

// ----------------------------------------------
// WalkerDrawEntry
// ----------------------------------------------

// Per-frame snapshot of a walker. Holds no reference to the walker itself.
struct WalkerDrawEntry {
    depth: i32,
    position: ScreenPoint,
    pictures: WalkerPictureList,
}

// ----------------------------------------------
// TileMapRenderer
// ----------------------------------------------

pub struct TileMapRenderer {
    stats: TileMapRenderStats,
    // Masters of multi-tile footprints already drawn this frame.
    drawn_masters: SmallSet<64, Cell>,
    // Sorted by depth.
    walker_draw_list: Vec<WalkerDrawEntry>,
}

impl TileMapRenderer {
    pub fn new() -> Self {
        Self {
            stats: TileMapRenderStats::default(),
            drawn_masters: SmallSet::new(),
            walker_draw_list: Vec::with_capacity(128),
        }
    }

    #[inline]
    pub fn stats(&self) -> TileMapRenderStats {
        self.stats
    }

    // Draws one frame. `visible_cells` must be in painter's order (far rows
    // first); both passes walk it in the same order.
    pub fn draw_map(&mut self,
                    render_sys: &mut impl RenderSystem,
                    city: &dyn CityModel,
                    tiles: &TileSource,
                    visible_cells: &[Cell],
                    origin: MapOrigin,
                    flags: TileMapRenderFlags)
                    -> TileMapRenderStats {
        self.reset_stats();
        self.drawn_masters.clear();

        if flags.contains(TileMapRenderFlags::DrawWalkers) {
            self.collect_walkers(city, origin);
        } else {
            self.walker_draw_list.clear();
        }

        if flags.contains(TileMapRenderFlags::DrawTerrain) {
            self.draw_flat_terrain_pass(render_sys, tiles, visible_cells, origin, flags);
        }

        self.draw_depth_sorted_pass(render_sys, tiles, visible_cells, origin, flags);

        self.walker_draw_list.clear();
        self.update_stats()
    }

    // Walkable/boatable ground goes first so nothing flat can ever paint
    // over a structure or walker.
    fn draw_flat_terrain_pass(&mut self,
                              render_sys: &mut impl RenderSystem,
                              tiles: &TileSource,
                              visible_cells: &[Cell],
                              origin: MapOrigin,
                              flags: TileMapRenderFlags) {
        for &cell in visible_cells {
            let tile = tiles.resolve(cell);
            if !tile.is_flat() {
                continue;
            }

            match tile.master_cell() {
                None => {
                    Self::draw_tile(render_sys, &mut self.stats, tiles, tile, origin, flags);
                }
                Some(master_cell) => {
                    if self.mark_master_drawn(master_cell) {
                        let master = tiles.resolve_master(tile);
                        Self::draw_tile(render_sys, &mut self.stats, tiles, master, origin, flags);
                    }
                }
            }
        }
    }

    // Structures and walkers interleaved by depth row.
    fn draw_depth_sorted_pass(&mut self,
                              render_sys: &mut impl RenderSystem,
                              tiles: &TileSource,
                              visible_cells: &[Cell],
                              origin: MapOrigin,
                              flags: TileMapRenderFlags) {
        let draw_structures = flags.contains(TileMapRenderFlags::DrawStructures);
        let mut last_depth: Option<i32> = None;

        for &cell in visible_cells {
            let depth = cell.depth();

            if last_depth != Some(depth) {
                last_depth = Some(depth);
                self.draw_walkers_above(render_sys, depth);
            }

            let tile = tiles.resolve(cell);
            if tile.is_flat() || !draw_structures {
                continue; // Flat tiles were drawn in the first pass.
            }

            match tile.master_cell() {
                None => {
                    Self::draw_tile(render_sys, &mut self.stats, tiles, tile, origin, flags);
                }
                Some(master_cell) => {
                    // A footprint spans several rows; draw it once its
                    // master row comes up.
                    if master_cell.depth() == depth && self.mark_master_drawn(master_cell) {
                        let master = tiles.resolve_master(tile);
                        Self::draw_tile(render_sys, &mut self.stats, tiles, master, origin, flags);
                    }
                }
            }
        }
    }

    fn collect_walkers(&mut self, city: &dyn CityModel, origin: MapOrigin) {
        let draw_list = &mut self.walker_draw_list;
        draw_list.clear();

        city.visit_walkers(&mut |walker| {
            let mut pictures = WalkerPictureList::new();
            walker.pictures(&mut pictures);

            let (ii, jj) = walker.subtile_pos();
            draw_list.push(WalkerDrawEntry {
                depth: walker.depth(),
                position: coords::subtile_to_screen(ii, jj, origin),
                pictures,
            });
        });

        // Stable, so walkers sharing a depth keep simulation order.
        draw_list.sort_by_key(|entry| entry.depth);
    }

    // Draws walkers with `depth < walker_depth <= depth + 1`. A walker exactly
    // at `depth` belongs to the row before, never to this one.
    fn draw_walkers_above(&mut self, render_sys: &mut impl RenderSystem, depth: i32) {
        let start = self.walker_draw_list.partition_point(|entry| entry.depth <= depth);
        let end = self.walker_draw_list.partition_point(|entry| entry.depth <= depth + 1);

        for entry in &self.walker_draw_list[start..end] {
            for picture in entry.pictures.iter().flatten() {
                render_sys.draw_picture(*picture, entry.position);
            }
            self.stats.walkers_drawn += 1;
        }
    }

    // Returns true the first time a master is seen this frame.
    #[inline]
    fn mark_master_drawn(&mut self, master_cell: Cell) -> bool {
        if !self.drawn_masters.insert(master_cell) {
            return false;
        }
        self.stats.multi_tiles_drawn += 1;
        true
    }

    fn draw_tile(render_sys: &mut impl RenderSystem,
                 stats: &mut TileMapRenderStats,
                 tiles: &TileSource,
                 tile: &Tile,
                 origin: MapOrigin,
                 flags: TileMapRenderFlags) {
        let position = coords::cell_to_screen(tile.cell(), origin);

        render_sys.draw_picture(tile.picture(), position);
        stats.tiles_drawn += 1;

        // Building foregrounds and animations:
        if flags.contains(TileMapRenderFlags::DrawForegrounds) {
            if let Some(overlay) = tiles.tile_overlay(tile) {
                for picture in overlay.foreground_pictures().iter().flatten() {
                    render_sys.draw_picture(*picture, position);
                    stats.foregrounds_drawn += 1;
                }
            }
        }
    }

    #[inline]
    fn reset_stats(&mut self) {
        self.stats.tiles_drawn = 0;
        self.stats.multi_tiles_drawn = 0;
        self.stats.foregrounds_drawn = 0;
        self.stats.walkers_drawn = 0;
    }

    #[inline]
    fn update_stats(&mut self) -> TileMapRenderStats {
        self.stats.peak_tiles_drawn       = self.stats.tiles_drawn.max(self.stats.peak_tiles_drawn);
        self.stats.peak_multi_tiles_drawn = self.stats.multi_tiles_drawn.max(self.stats.peak_multi_tiles_drawn);
        self.stats.peak_foregrounds_drawn = self.stats.foregrounds_drawn.max(self.stats.peak_foregrounds_drawn);
        self.stats.peak_walkers_drawn     = self.stats.walkers_drawn.max(self.stats.peak_walkers_drawn);
        self.stats
    }
}
