use super::*;
use crate::{
    render::{PictureCache, RenderSystem},
    sim::{CityModel, Construction, InfoBox, InfoBoxHost, LandOverlay, OverlayStore, Walker, WalkerPictureList},
    utils::{Size, coords::ScreenPoint},
};

// ----------------------------------------------
// Pictures
// ----------------------------------------------

pub const GROUND_PICTURE: PictureHandle = PictureHandle::from_index(1);
pub const CLEARED_LAND_PICTURE: PictureHandle = PictureHandle::from_index(2);
pub const TREE_PICTURE: PictureHandle = PictureHandle::from_index(3);

pub struct TestPictureCache;

impl PictureCache for TestPictureCache {
    fn find_picture(&self, group: &str, index: u32) -> PictureHandle {
        match (group, index) {
            ("land1a", 1) => CLEARED_LAND_PICTURE,
            _ => PictureHandle::invalid(),
        }
    }
}

// ----------------------------------------------
// TestInfoBox / TestInfoBoxHost
// ----------------------------------------------

pub struct TestInfoBox {
    width: i32,
    position: ScreenPoint,
}

impl InfoBox for TestInfoBox {
    fn width(&self) -> i32 {
        self.width
    }

    fn position(&self) -> ScreenPoint {
        self.position
    }

    fn set_position(&mut self, position: ScreenPoint) {
        self.position = position;
    }
}

#[derive(Default)]
pub struct TestInfoBoxHost {
    pub info_boxes: Vec<Box<dyn InfoBox>>,
}

impl InfoBoxHost for TestInfoBoxHost {
    fn set_info_box(&mut self, info_box: Box<dyn InfoBox>) {
        self.info_boxes.push(info_box);
    }
}

// ----------------------------------------------
// TestOverlay
// ----------------------------------------------

#[derive(Clone)]
pub struct TestOverlay {
    pub master: Cell,
    pub size: i32,
    pub picture: PictureHandle,
    pub foregrounds: Vec<Option<PictureHandle>>,
    pub info_box_width: Option<i32>,
}

impl TestOverlay {
    pub fn new(master: Cell, size: i32, picture: PictureHandle) -> Self {
        Self { master, size, picture, foregrounds: Vec::new(), info_box_width: None }
    }
}

impl LandOverlay for TestOverlay {
    fn size(&self) -> i32 {
        self.size
    }

    fn master_cell(&self) -> Cell {
        self.master
    }

    fn picture(&self) -> PictureHandle {
        self.picture
    }

    fn foreground_pictures(&self) -> &[Option<PictureHandle>] {
        &self.foregrounds
    }

    fn make_info_box(&self) -> Option<Box<dyn InfoBox>> {
        self.info_box_width.map(|width| {
            Box::new(TestInfoBox { width, position: ScreenPoint::default() }) as Box<dyn InfoBox>
        })
    }
}

// ----------------------------------------------
// TestConstruction
// ----------------------------------------------

// Buildable on plain meadow only.
pub struct TestConstruction {
    pub size: i32,
    pub picture: PictureHandle,
}

impl TestConstruction {
    pub fn new(size: i32, picture: PictureHandle) -> Self {
        Self { size, picture }
    }
}

impl LandOverlay for TestConstruction {
    fn size(&self) -> i32 {
        self.size
    }

    fn master_cell(&self) -> Cell {
        Cell::zero()
    }

    fn picture(&self) -> PictureHandle {
        self.picture
    }
}

impl Construction for TestConstruction {
    fn can_build(&self, tilemap: &Tilemap, cell: Cell) -> bool {
        let footprint = Footprint::new(cell, self.size);
        if !footprint.is_within_bounds(tilemap.size()) {
            return false;
        }
        footprint.iter().all(|footprint_cell| {
            let terrain = tilemap.tile(footprint_cell).terrain();
            terrain.flags() == TerrainFlags::Meadow && terrain.overlay().is_none()
        })
    }
}

// Accepts any anchor, in bounds or not. Bounds are left to the caller.
pub struct AnywhereConstruction {
    pub size: i32,
    pub picture: PictureHandle,
}

impl LandOverlay for AnywhereConstruction {
    fn size(&self) -> i32 {
        self.size
    }

    fn master_cell(&self) -> Cell {
        Cell::zero()
    }

    fn picture(&self) -> PictureHandle {
        self.picture
    }
}

impl Construction for AnywhereConstruction {
    fn can_build(&self, _tilemap: &Tilemap, _cell: Cell) -> bool {
        true
    }
}

// ----------------------------------------------
// TestWalker
// ----------------------------------------------

pub struct TestWalker {
    pub cell: Cell,
    pub picture: PictureHandle,
}

impl TestWalker {
    pub fn new(cell: Cell, picture: PictureHandle) -> Self {
        Self { cell, picture }
    }
}

impl Walker for TestWalker {
    fn cell(&self) -> Cell {
        self.cell
    }

    fn subtile_pos(&self) -> (i32, i32) {
        (self.cell.i * 15 + 7, self.cell.j * 15 + 7)
    }

    fn pictures(&self, list: &mut WalkerPictureList) {
        list.push(Some(self.picture));
    }
}

// ----------------------------------------------
// TestCity
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Commit {
    Build { cell: Cell, size: i32 },
    ClearLand { cell: Cell },
}

pub struct TestCity {
    pub tilemap: Tilemap,
    pub overlays: OverlayStore,
    pub walkers: Vec<TestWalker>,
    pub commits: Vec<Commit>,
}

impl TestCity {
    pub fn new(map_size: i32) -> Self {
        Self {
            tilemap: Tilemap::new(map_size, GROUND_PICTURE),
            overlays: OverlayStore::new(),
            walkers: Vec::new(),
            commits: Vec::new(),
        }
    }

    pub fn place_overlay(&mut self, overlay: TestOverlay, flags: TerrainFlags) -> OverlayKey {
        let footprint = overlay.footprint();
        let picture = overlay.picture;

        let key = self.overlays.insert(Box::new(overlay));
        assert!(self.tilemap.place_overlay(footprint, key, picture, flags));
        key
    }

    // Decoration with no overlay, like a tree or rock.
    pub fn place_decoration(&mut self, cell: Cell, picture: PictureHandle, flags: TerrainFlags) {
        self.tilemap.try_tile_mut(cell).unwrap().set_picture(picture);
        self.set_tile_flags(cell, flags);
    }

    pub fn set_tile_flags(&mut self, cell: Cell, flags: TerrainFlags) {
        let tile = self.tilemap.try_tile_mut(cell).unwrap();
        tile.terrain_mut().set_flags(TerrainFlags::all(), false);
        tile.terrain_mut().set_flags(flags, true);
    }
}

impl CityModel for TestCity {
    fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    fn overlay(&self, key: OverlayKey) -> Option<&dyn LandOverlay> {
        self.overlays.get(key)
    }

    fn visit_walkers(&self, visitor: &mut dyn FnMut(&dyn Walker)) {
        for walker in &self.walkers {
            visitor(walker);
        }
    }

    fn build(&mut self, construction: &dyn Construction, cell: Cell) {
        let overlay = TestOverlay::new(cell, construction.size(), construction.picture());
        self.place_overlay(overlay, TerrainFlags::Building);
        self.commits.push(Commit::Build { cell, size: construction.size() });
    }

    fn clear_land(&mut self, cell: Cell) {
        self.commits.push(Commit::ClearLand { cell });

        let Some(tile) = self.tilemap.try_tile(cell) else {
            return;
        };

        let footprint = match tile.terrain().overlay() {
            Some(OverlayRef::Placed(key)) => {
                match self.overlays.remove(key) {
                    Some(overlay) => overlay.footprint(),
                    None => Footprint::new(cell, 1),
                }
            }
            _ => Footprint::new(cell, 1),
        };

        self.tilemap.clear_footprint(footprint, CLEARED_LAND_PICTURE);
    }
}

// ----------------------------------------------
// RecordingRenderSystem
// ----------------------------------------------

pub struct RecordingRenderSystem {
    pub viewport: Size,
    pub draws: Vec<(PictureHandle, ScreenPoint)>,
}

impl RecordingRenderSystem {
    pub fn new(viewport: Size) -> Self {
        Self { viewport, draws: Vec::new() }
    }

    pub fn count(&self, picture: PictureHandle) -> usize {
        self.draws.iter().filter(|(drawn, _)| *drawn == picture).count()
    }

    // Index of the first draw of `picture`.
    pub fn first_draw(&self, picture: PictureHandle) -> Option<usize> {
        self.draws.iter().position(|(drawn, _)| *drawn == picture)
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl RenderSystem for RecordingRenderSystem {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn draw_picture(&mut self, picture: PictureHandle, position: ScreenPoint) {
        self.draws.push((picture, position));
    }
}
