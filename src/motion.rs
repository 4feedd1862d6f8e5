use crate::maze::Maze;
use crate::types::{Direction, Rect, Vec2};

pub fn advance(pos: Vec2, dir: Direction, speed: f32) -> Vec2 {
    let (ux, uy) = dir.unit();
    Vec2::new(pos.x + ux * speed, pos.y + uy * speed)
}

/// Square enclosing the entity's collision circle.
pub fn bounding_box(pos: Vec2, radius: f32) -> Rect {
    Rect::centered(pos, radius)
}

pub fn is_free(maze: &Maze, pos: Vec2, radius: f32) -> bool {
    !maze.is_blocked(&bounding_box(pos, radius))
}

/// One step along `dir`, already wrapped through the screen edges. Walls
/// are tested against this position, so a blocked tunnel exit is a
/// blocked move.
pub fn step_target(maze: &Maze, pos: Vec2, dir: Direction, speed: f32) -> Vec2 {
    wrap(advance(pos, dir, speed), maze.width, maze.height)
}

/// Candidate position one step along `dir`, or `None` if it hits a wall.
pub fn try_step(maze: &Maze, pos: Vec2, dir: Direction, speed: f32, radius: f32) -> Option<Vec2> {
    let candidate = step_target(maze, pos, dir, speed);
    is_free(maze, candidate, radius).then_some(candidate)
}

/// Keeps the x component of a blocked move, then the y component, each
/// tested against `from`. Components with no displacement are skipped.
pub fn slide(maze: &Maze, from: Vec2, to: Vec2, radius: f32) -> Option<Vec2> {
    if to.x != from.x {
        let keep_x = Vec2::new(to.x, from.y);
        if is_free(maze, keep_x, radius) {
            return Some(keep_x);
        }
    }
    if to.y != from.y {
        let keep_y = Vec2::new(from.x, to.y);
        if is_free(maze, keep_y, radius) {
            return Some(keep_y);
        }
    }
    None
}

pub fn first_open_direction(maze: &Maze, pos: Vec2, speed: f32, radius: f32) -> Option<Direction> {
    Direction::FALLBACK_ORDER
        .into_iter()
        .find(|&dir| try_step(maze, pos, dir, speed, radius).is_some())
}

/// Teleports a position that left `[0, width] x [0, height]` to the
/// opposite edge. The perpendicular coordinate is untouched.
pub fn wrap(pos: Vec2, width: f32, height: f32) -> Vec2 {
    let mut out = pos;
    if out.x < 0.0 {
        out.x = width;
    } else if out.x > width {
        out.x = 0.0;
    }
    if out.y < 0.0 {
        out.y = height;
    } else if out.y > height {
        out.y = 0.0;
    }
    out
}
