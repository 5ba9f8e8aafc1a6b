use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::Size;

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Screen pixels per cell step along the diamond's horizontal (i+j) axis.
pub const HALF_TILE_WIDTH: i32 = 30;
// Screen pixels per cell step along the diamond's vertical (i-j) axis.
pub const HALF_TILE_HEIGHT: i32 = 15;
// Full tile width. Hit-testing divides by this.
pub const TILE_WIDTH: i32 = 2 * HALF_TILE_WIDTH;

// Walker sub-tile positions are expressed in 1/15th of a cell.
pub const SUBTILES_PER_CELL: i32 = 15;

// ----------------------------------------------
// Cell
// ----------------------------------------------

// I,J indices into the square tile map grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    #[inline]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { i: 0, j: 0 }
    }

    #[inline]
    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self { i: self.i + di, j: self.j + dj }
    }

    // Depth used for painter's ordering. Rows of equal depth run
    // horizontally across the screen; larger depth is further up.
    #[inline]
    pub const fn depth(self) -> i32 {
        self.j - self.i
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

// ----------------------------------------------
// Footprint
// ----------------------------------------------

// Square block of cells anchored at its master (lowest i,j) cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub anchor: Cell,
    pub size: i32,
}

impl Footprint {
    #[inline]
    pub const fn new(anchor: Cell, size: i32) -> Self {
        Self { anchor, size }
    }

    #[inline]
    pub fn is_within_bounds(&self, map_size: i32) -> bool {
        self.size > 0
            && self.anchor.i >= 0
            && self.anchor.j >= 0
            && self.anchor.i + self.size <= map_size
            && self.anchor.j + self.size <= map_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.size.max(0) * self.size.max(0)) as usize
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.i >= self.anchor.i && cell.i < self.anchor.i + self.size &&
        cell.j >= self.anchor.j && cell.j < self.anchor.j + self.size
    }

    // Visits j rows in the outer loop and i columns in the inner loop,
    // starting at the anchor.
    #[inline]
    pub fn iter(&self) -> FootprintIter {
        FootprintIter { footprint: *self, di: 0, dj: 0 }
    }
}

pub struct FootprintIter {
    footprint: Footprint,
    di: i32,
    dj: i32,
}

impl Iterator for FootprintIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.footprint.size <= 0 || self.dj >= self.footprint.size {
            return None;
        }

        let cell = self.footprint.anchor.offset(self.di, self.dj);

        self.di += 1;
        if self.di >= self.footprint.size {
            self.di = 0;
            self.dj += 1;
        }

        Some(cell)
    }
}

impl FusedIterator for FootprintIter {}

impl IntoIterator for &Footprint {
    type Item = Cell;
    type IntoIter = FootprintIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ----------------------------------------------
// ScreenPoint
// ----------------------------------------------

// Integer pixel position, top-left origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

// ----------------------------------------------
// MapOrigin
// ----------------------------------------------

// Screen position of cell (0,0). Recomputed once per frame from the
// viewport size and the map area center, then shared by drawing and
// hit-testing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MapOrigin {
    pub dx: i32,
    pub dy: i32,
}

impl MapOrigin {
    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    // Places the diamond grid so that the map area center lands in the
    // middle of the viewport.
    pub fn centered(viewport_size: Size, center_x: i32, center_z: i32, map_size: i32) -> Self {
        let dx = viewport_size.width / 2 - HALF_TILE_WIDTH * (center_x + 1) + 1;
        let dy = viewport_size.height / 2 + HALF_TILE_HEIGHT * (center_z - map_size + 1) - 30;
        Self { dx, dy }
    }
}

// +-----------------------------------------------+
// |     COORDINATE SPACE TRANSFORMS REFERENCE     |
// +-----------------------------------------------+
// | Operation           | Function                |
// | ------------------- | ----------------------- |
// | Cell -> Screen      | cell_to_screen()        |
// | Screen -> Cell      | screen_to_cell()        |
// | Sub-tile -> Screen  | subtile_to_screen()     |
// +-----------------------------------------------+

#[inline]
pub fn cell_to_screen(cell: Cell, origin: MapOrigin) -> ScreenPoint {
    ScreenPoint::new(
        HALF_TILE_WIDTH  * (cell.i + cell.j) + origin.dx,
        HALF_TILE_HEIGHT * (cell.i - cell.j) + origin.dy,
    )
}

// Inverse of cell_to_screen(). Division truncates toward zero, same as the
// forward transform, so any pixel less than one tile width to the left of or
// above the origin still resolves to index 0.
#[inline]
pub fn screen_to_cell(point: ScreenPoint, origin: MapOrigin, map_size: i32) -> Option<Cell> {
    // Widened so any pointer position is safe to project.
    let dx = point.x as i64 - origin.dx as i64;
    let dy = point.y as i64 - origin.dy as i64;

    let i = (dx + 2 * dy) / TILE_WIDTH as i64;
    let j = (dx - 2 * dy) / TILE_WIDTH as i64;

    let n = map_size as i64;
    if i >= 0 && j >= 0 && i < n && j < n {
        Some(Cell::new(i as i32, j as i32))
    } else {
        None
    }
}

// Walkers move in sub-tile steps: `ii = 15 * i + fraction`, same for `jj`.
#[inline]
pub fn subtile_to_screen(ii: i32, jj: i32, origin: MapOrigin) -> ScreenPoint {
    ScreenPoint::new(
        2 * (ii + jj) + origin.dx,
        (ii - jj) + origin.dy,
    )
}
