use std::collections::{HashSet, VecDeque};

use crate::maze::Maze;
use crate::types::{Direction, Vec2};

/// First heading of a shortest grid path from `from` to the nearest cell
/// holding one of `targets`. Paths may leave one edge of the grid and
/// re-enter on the opposite one. Targets in the starting cell are treated
/// as reached.
pub fn plan_direction(maze: &Maze, from: Vec2, targets: &[Vec2]) -> Option<Direction> {
    if maze.cols == 0 || maze.rows == 0 {
        return None;
    }
    let start = grid_cell(maze, from);
    let goals: HashSet<(i32, i32)> = targets
        .iter()
        .map(|&target| grid_cell(maze, target))
        .filter(|&cell| cell != start)
        .collect();
    if goals.is_empty() {
        return None;
    }

    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::new();
    for dir in Direction::ALL {
        let next = neighbor(maze, start, dir);
        if maze.is_open_cell(next.0, next.1) && visited.insert(next) {
            queue.push_back((next, dir));
        }
    }

    while let Some((cell, first)) = queue.pop_front() {
        if goals.contains(&cell) {
            return Some(first);
        }
        for dir in Direction::ALL {
            let next = neighbor(maze, cell, dir);
            if maze.is_open_cell(next.0, next.1) && visited.insert(next) {
                queue.push_back((next, first));
            }
        }
    }
    None
}

fn grid_cell(maze: &Maze, pos: Vec2) -> (i32, i32) {
    let (col, row) = maze.cell_of(pos);
    (
        col.rem_euclid(maze.cols as i32),
        row.rem_euclid(maze.rows as i32),
    )
}

fn neighbor(maze: &Maze, (col, row): (i32, i32), dir: Direction) -> (i32, i32) {
    let (dx, dy) = dir.unit();
    (
        (col + dx as i32).rem_euclid(maze.cols as i32),
        (row + dy as i32).rem_euclid(maze.rows as i32),
    )
}

#[cfg(test)]
mod tests {
    use super::plan_direction;
    use crate::maze::decode_layout;
    use crate::types::{Direction, Vec2};

    // 6x5 cells of 40x30 px.
    fn maze(layout: Vec<Vec<i32>>) -> crate::maze::Maze {
        decode_layout(&layout, 240.0, 150.0)
    }

    #[test]
    fn heads_toward_the_nearest_target() {
        let maze = maze(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);
        let from = Vec2::new(100.0, 45.0);

        assert_eq!(
            plan_direction(&maze, from, &[Vec2::new(180.0, 45.0), Vec2::new(60.0, 45.0)]),
            Some(Direction::Left)
        );
        assert_eq!(
            plan_direction(&maze, from, &[Vec2::new(180.0, 45.0)]),
            Some(Direction::Right)
        );
    }

    #[test]
    fn routes_around_walls() {
        let maze = maze(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);

        assert_eq!(
            plan_direction(&maze, Vec2::new(60.0, 45.0), &[Vec2::new(140.0, 45.0)]),
            Some(Direction::Down)
        );
    }

    #[test]
    fn uses_edge_tunnels() {
        let maze = maze(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![0, 0, 1, 1, 0, 0],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);

        assert_eq!(
            plan_direction(&maze, Vec2::new(60.0, 45.0), &[Vec2::new(180.0, 45.0)]),
            Some(Direction::Left)
        );
    }

    #[test]
    fn unreachable_or_reached_targets_yield_none() {
        let maze = maze(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 1, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);
        let from = Vec2::new(60.0, 45.0);

        assert_eq!(plan_direction(&maze, from, &[Vec2::new(140.0, 45.0)]), None);
        assert_eq!(plan_direction(&maze, from, &[Vec2::new(62.0, 47.0)]), None);
        assert_eq!(plan_direction(&maze, from, &[]), None);
    }

    #[test]
    fn positions_on_the_far_edge_map_back_into_the_grid() {
        let maze = maze(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![0, 0, 1, 1, 0, 0],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);

        // x = 240 lies one column past the grid and wraps to column 0.
        assert_eq!(
            plan_direction(&maze, Vec2::new(240.0, 45.0), &[Vec2::new(60.0, 45.0)]),
            Some(Direction::Right)
        );
    }
}
