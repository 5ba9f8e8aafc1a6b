use crate::utils::{
    Size,
    coords::{Cell, TILE_WIDTH, HALF_TILE_HEIGHT},
};

// ----------------------------------------------
// MapArea
// ----------------------------------------------

// The window of the map currently on screen.
//
// Center coordinates use the diamond's own axes: `x = i + j` runs left to
// right and `z = j - i + N - 1` runs bottom to top, so both are >= 0 for any
// in-bounds cell.
pub trait MapArea {
    // Visible cells in draw order, far (top) rows first.
    fn tiles(&self) -> &[Cell];

    fn center_x(&self) -> i32;
    fn center_z(&self) -> i32;

    fn set_center_ij(&mut self, cell: Cell);
}

// ----------------------------------------------
// TilemapArea
// ----------------------------------------------

pub struct TilemapArea {
    map_size: i32,
    viewport_size: Size,
    center_x: i32,
    center_z: i32,
    tiles: Vec<Cell>,
}

impl TilemapArea {
    pub fn new(map_size: i32, viewport_size: Size) -> Self {
        let mut area = Self {
            map_size,
            viewport_size,
            center_x: 0,
            center_z: 0,
            tiles: Vec::new(),
        };
        let half = map_size / 2;
        area.set_center_ij(Cell::new(half, half));
        area
    }

    pub fn set_viewport_size(&mut self, new_size: Size) {
        self.viewport_size = new_size;
        self.update_visible_tiles();
    }

    #[inline]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    #[inline]
    pub fn map_size(&self) -> i32 {
        self.map_size
    }

    // Half extents of the visible window, in diamond x/z units, plus a
    // margin so partially visible edge tiles are kept.
    #[inline]
    fn half_extents(&self) -> (i32, i32) {
        let half_x = self.viewport_size.width / TILE_WIDTH + 2;
        let half_z = self.viewport_size.height / (2 * HALF_TILE_HEIGHT) + 2;
        (half_x, half_z)
    }

    fn update_visible_tiles(&mut self) {
        self.tiles.clear();

        let n = self.map_size;
        let (half_x, half_z) = self.half_extents();

        // Far rows (larger z) first so that nearer rows paint over them.
        for z in (self.center_z - half_z..=self.center_z + half_z).rev() {
            for x in (self.center_x - half_x)..=(self.center_x + half_x) {
                // Only every other x lands on a cell center for a given row.
                if (x + z - n + 1).rem_euclid(2) != 0 {
                    continue;
                }

                let i = (x - z + n - 1) / 2;
                let j = (x + z - n + 1) / 2;

                if i >= 0 && j >= 0 && i < n && j < n {
                    self.tiles.push(Cell::new(i, j));
                }
            }
        }
    }
}

impl MapArea for TilemapArea {
    #[inline]
    fn tiles(&self) -> &[Cell] {
        &self.tiles
    }

    #[inline]
    fn center_x(&self) -> i32 {
        self.center_x
    }

    #[inline]
    fn center_z(&self) -> i32 {
        self.center_z
    }

    fn set_center_ij(&mut self, cell: Cell) {
        self.center_x = cell.i + cell.j;
        self.center_z = cell.j - cell.i + self.map_size - 1;
        self.update_visible_tiles();
    }
}
