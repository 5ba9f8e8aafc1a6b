use super::*;
use coords::*;
use hash::SmallSet;

#[test]
fn test_cell_screen_round_trip() {
    const MAP_SIZE: i32 = 16;

    let origins = [
        MapOrigin::new(0, 0),
        MapOrigin::new(371, 270),
        MapOrigin::new(-512, 83),
    ];

    for origin in origins {
        for j in 0..MAP_SIZE {
            for i in 0..MAP_SIZE {
                let cell = Cell::new(i, j);
                let point = cell_to_screen(cell, origin);
                assert_eq!(screen_to_cell(point, origin, MAP_SIZE), Some(cell), "origin: {origin:?}");
            }
        }
    }
}

#[test]
fn test_screen_to_cell_boundaries() {
    let origin = MapOrigin::new(0, 0);

    // The origin pixel is cell (0,0).
    assert_eq!(screen_to_cell(ScreenPoint::new(0, 0), origin, 8), Some(Cell::new(0, 0)));

    // Truncating division: just left of the origin still resolves to (0,0).
    assert_eq!(screen_to_cell(ScreenPoint::new(-1, 0), origin, 8), Some(Cell::new(0, 0)));
    assert_eq!(screen_to_cell(ScreenPoint::new(-59, 0), origin, 8), Some(Cell::new(0, 0)));

    // A full tile width away goes negative.
    assert_eq!(screen_to_cell(ScreenPoint::new(-60, 0), origin, 8), None);

    // Past the far corners.
    assert_eq!(screen_to_cell(cell_to_screen(Cell::new(8, 0), origin), origin, 8), None);
    assert_eq!(screen_to_cell(cell_to_screen(Cell::new(0, 8), origin), origin, 8), None);
    assert_eq!(screen_to_cell(cell_to_screen(Cell::new(7, 7), origin), origin, 8), Some(Cell::new(7, 7)));
}

#[test]
fn test_screen_to_cell_extreme_points() {
    let origins = [MapOrigin::new(0, 0), MapOrigin::new(-371, 270), MapOrigin::new(1000, -1000)];
    let extremes = [
        ScreenPoint::new(i32::MAX, i32::MAX),
        ScreenPoint::new(i32::MIN, i32::MIN),
        ScreenPoint::new(i32::MAX, i32::MIN),
        ScreenPoint::new(i32::MIN, i32::MAX),
    ];

    for origin in origins {
        for point in extremes {
            assert_eq!(screen_to_cell(point, origin, 8), None, "point: {point}, origin: {origin:?}");
        }
    }
}

#[test]
fn test_subtile_to_screen() {
    let origin = MapOrigin::new(12, -7);

    // Whole-cell sub-tile positions land on the cell anchor.
    for (i, j) in [(0, 0), (3, 1), (5, 9)] {
        let cell = Cell::new(i, j);
        let point = subtile_to_screen(i * SUBTILES_PER_CELL, j * SUBTILES_PER_CELL, origin);
        assert_eq!(point, cell_to_screen(cell, origin));
    }

    // 2 pixels across and 1 pixel down per ii step.
    assert_eq!(subtile_to_screen(1, 0, origin), ScreenPoint::new(14, -6));
    assert_eq!(subtile_to_screen(0, 1, origin), ScreenPoint::new(14, -8));
}

#[test]
fn test_centered_origin() {
    const MAP_SIZE: i32 = 40;
    let viewport = Size::new(800, 600);

    // Whatever the center cell, it always lands at the same screen spot.
    for (i, j) in [(20, 20), (0, 0), (39, 0), (5, 31)] {
        let center_x = i + j;
        let center_z = j - i + MAP_SIZE - 1;
        let origin = MapOrigin::centered(viewport, center_x, center_z, MAP_SIZE);
        assert_eq!(cell_to_screen(Cell::new(i, j), origin), ScreenPoint::new(371, 270));
    }
}

#[test]
fn test_footprint_iteration() {
    let footprint = Footprint::new(Cell::new(2, 3), 2);
    let cells: Vec<Cell> = footprint.iter().collect();

    assert_eq!(cells, vec![
        Cell::new(2, 3), Cell::new(3, 3),
        Cell::new(2, 4), Cell::new(3, 4),
    ]);
    assert_eq!(footprint.cell_count(), 4);

    assert!(footprint.contains(Cell::new(3, 4)));
    assert!(!footprint.contains(Cell::new(4, 4)));
    assert!(!footprint.contains(Cell::new(1, 3)));

    assert!(footprint.is_within_bounds(5));
    assert!(!footprint.is_within_bounds(4));
    assert!(!Footprint::new(Cell::new(-1, 0), 1).is_within_bounds(4));

    assert_eq!(Footprint::new(Cell::new(0, 0), 0).iter().count(), 0);
}

#[test]
fn test_cell_depth() {
    assert_eq!(Cell::new(0, 0).depth(), 0);
    assert_eq!(Cell::new(2, 5).depth(), 3);
    assert_eq!(Cell::new(5, 2).depth(), -3);
}

#[test]
fn test_small_set() {
    let mut set = SmallSet::<16, Cell>::new();
    assert!(set.is_empty());

    assert!(set.insert(Cell::new(1, 2)));
    assert!(!set.insert(Cell::new(1, 2)));
    assert!(set.contains(&Cell::new(1, 2)));
    assert!(!set.contains(&Cell::new(2, 1)));

    // Spills past the inline capacity.
    for i in 0..24 {
        set.insert(Cell::new(i, 0));
    }
    assert_eq!(set.len(), 25);

    set.clear();
    assert!(set.is_empty());
    assert!(!set.contains(&Cell::new(1, 2)));
}
