use crate::constants::MAX_ADVERSARIES;
use crate::types::{Cell, PickupKind, Rect, Vec2};

/// Rectangular grid of layout codes, row-major.
pub type LevelLayout = Vec<Vec<i32>>;

#[derive(Clone, Debug, PartialEq)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub pos: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdversarySpawn {
    pub slot: u8,
    pub pos: Vec2,
}

/// Static decoded level: cells, one wall rectangle per wall cell, and the
/// spawn points found in the layout.
#[derive(Clone, Debug)]
pub struct Maze {
    pub width: f32,
    pub height: f32,
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cells: Vec<Vec<Cell>>,
    pub walls: Vec<Rect>,
    pub player_spawn: Option<Vec2>,
    pub adversary_spawns: Vec<AdversarySpawn>,
    pub pickups: Vec<PickupSpawn>,
}

pub fn decode_layout(layout: &[Vec<i32>], width: f32, height: f32) -> Maze {
    // Cell size comes from the first row; ragged rows are decoded as given.
    let cols = layout.first().map(|row| row.len()).unwrap_or(0);
    let rows = layout.len();
    let cell_width = if cols == 0 {
        width
    } else {
        (width / cols as f32).floor()
    };
    let cell_height = if rows == 0 {
        height
    } else {
        (height / rows as f32).floor()
    };

    let mut maze = Maze {
        width,
        height,
        cols,
        rows,
        cell_width,
        cell_height,
        cells: Vec::with_capacity(rows),
        walls: Vec::new(),
        player_spawn: None,
        adversary_spawns: Vec::new(),
        pickups: Vec::new(),
    };

    for (row, codes) in layout.iter().enumerate() {
        let mut decoded = Vec::with_capacity(codes.len());
        for (col, &code) in codes.iter().enumerate() {
            let cell = Cell::from_code(code);
            let center = maze.cell_center(col as i32, row as i32);
            match cell {
                Cell::Wall => maze.walls.push(Rect::new(
                    col as f32 * cell_width,
                    row as f32 * cell_height,
                    cell_width,
                    cell_height,
                )),
                Cell::Pickup => maze.pickups.push(PickupSpawn {
                    kind: PickupKind::Dot,
                    pos: center,
                }),
                Cell::PowerPickup => maze.pickups.push(PickupSpawn {
                    kind: PickupKind::Power,
                    pos: center,
                }),
                Cell::PlayerSpawn => {
                    if maze.player_spawn.is_none() {
                        maze.player_spawn = Some(center);
                    }
                }
                Cell::AdversarySpawn(slot) => {
                    let taken = maze.adversary_spawns.iter().any(|s| s.slot == slot);
                    if !taken && maze.adversary_spawns.len() < MAX_ADVERSARIES {
                        maze.adversary_spawns.push(AdversarySpawn { slot, pos: center });
                    }
                }
                Cell::Empty => {}
            }
            decoded.push(cell);
        }
        maze.cells.push(decoded);
    }

    maze
}

impl Maze {
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|wall| wall.intersects(rect))
    }

    pub fn cell_at(&self, col: i32, row: i32) -> Option<Cell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
    }

    /// Cells outside the decoded grid count as open so tunnels off a ragged
    /// or short row stay traversable.
    pub fn is_open_cell(&self, col: i32, row: i32) -> bool {
        !self.cell_at(col, row).is_some_and(Cell::is_wall)
    }

    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_width).floor() as i32,
            (pos.y / self.cell_height).floor() as i32,
        )
    }

    pub fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        Vec2::new(
            col as f32 * self.cell_width + (self.cell_width / 2.0).floor(),
            row as f32 * self.cell_height + (self.cell_height / 2.0).floor(),
        )
    }

    /// Center of the cell containing `pos`.
    pub fn center_of(&self, pos: Vec2) -> Vec2 {
        let (col, row) = self.cell_of(pos);
        self.cell_center(col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::decode_layout;
    use crate::levels::builtin_levels;
    use crate::types::{PickupKind, Rect, Vec2};

    #[test]
    fn builtin_level_decodes_cell_size_and_spawns() {
        let levels = builtin_levels();
        let maze = decode_layout(&levels[0], 800.0, 600.0);

        assert_eq!(maze.cols, 20);
        assert_eq!(maze.rows, 20);
        assert_eq!(maze.cell_width, 40.0);
        assert_eq!(maze.cell_height, 30.0);
        assert_eq!(maze.player_spawn, Some(Vec2::new(380.0, 375.0)));
        assert_eq!(maze.adversary_spawns.len(), 4);

        let wall_cells = levels[0]
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&code| code == 1)
            .count();
        assert_eq!(maze.walls.len(), wall_cells);
    }

    #[test]
    fn one_wall_rectangle_per_wall_cell() {
        let layout = vec![vec![1, 1, 0], vec![0, 1, 0]];
        let maze = decode_layout(&layout, 300.0, 200.0);

        assert_eq!(
            maze.walls,
            vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 100.0, 100.0, 100.0),
            ]
        );
    }

    #[test]
    fn is_blocked_ignores_edge_contact() {
        let layout = vec![vec![0, 1, 0]];
        let maze = decode_layout(&layout, 300.0, 100.0);

        assert!(!maze.is_blocked(&Rect::new(70.0, 10.0, 30.0, 30.0)));
        assert!(maze.is_blocked(&Rect::new(71.0, 10.0, 30.0, 30.0)));
        assert!(!maze.is_blocked(&Rect::new(200.0, 10.0, 30.0, 30.0)));
        assert!(maze.is_blocked(&Rect::new(199.5, 10.0, 30.0, 30.0)));
    }

    #[test]
    fn layout_without_spawns_leaves_fallbacks_to_the_engine() {
        let layout = vec![vec![2, 3, 0], vec![0, 0, 2]];
        let maze = decode_layout(&layout, 300.0, 200.0);

        assert!(maze.player_spawn.is_none());
        assert!(maze.adversary_spawns.is_empty());
        assert_eq!(maze.pickups.len(), 3);
        assert_eq!(maze.pickups[1].kind, PickupKind::Power);
        assert_eq!(maze.pickups[1].pos, Vec2::new(150.0, 50.0));
    }

    #[test]
    fn duplicate_adversary_slots_keep_first_occurrence() {
        let layout = vec![vec![5, 5, 6], vec![7, 8, 8]];
        let maze = decode_layout(&layout, 300.0, 200.0);

        let slots: Vec<u8> = maze.adversary_spawns.iter().map(|s| s.slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(maze.adversary_spawns[0].pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn ragged_rows_decode_without_panicking() {
        let layout = vec![vec![1, 1, 1, 1], vec![1, 4], vec![1, 2, 2, 2, 1]];
        let maze = decode_layout(&layout, 400.0, 300.0);

        assert_eq!(maze.cell_width, 100.0);
        assert_eq!(maze.player_spawn, Some(Vec2::new(150.0, 150.0)));
        assert!(maze.is_open_cell(3, 1));
        assert!(!maze.is_open_cell(4, 2));
        assert_eq!(maze.pickups.len(), 3);
    }

    #[test]
    fn empty_layout_is_all_open() {
        let maze = decode_layout(&[], 800.0, 600.0);
        assert!(maze.walls.is_empty());
        assert!(maze.pickups.is_empty());
        assert!(!maze.is_blocked(&Rect::new(0.0, 0.0, 800.0, 600.0)));
    }
}
