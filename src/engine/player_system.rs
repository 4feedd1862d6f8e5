use super::*;
use crate::motion::{first_open_direction, is_free, slide, step_target, try_step};

impl<R: RandomSource> GameEngine<R> {
    /// Two phases: take a buffered turn if the geometry allows it, else move
    /// forward with slide and bounce fallbacks.
    pub(super) fn update_player(&mut self) {
        let maze = &self.maze;
        let player = &mut self.player;
        let before = player.pos;

        let turned = if player.next_dir != player.dir {
            match turn_candidate(maze, player) {
                Some(candidate) => {
                    player.dir = player.next_dir;
                    player.pos = candidate;
                    true
                }
                None => false,
            }
        } else {
            false
        };

        if !turned {
            let target = step_target(maze, before, player.dir, player.speed);
            if is_free(maze, target, player.radius) {
                player.pos = target;
            } else if let Some(slid) = slide(maze, before, target, player.radius) {
                player.pos = slid;
            } else {
                player.pos = before;
                if let Some(dir) = first_open_direction(maze, before, player.speed, player.radius) {
                    player.dir = dir;
                }
                // A bounce consumes the buffered intent.
                player.next_dir = player.dir;
            }
        }
    }
}

/// Reversals are always attempted. Perpendicular turns are only attempted
/// within one speed-step of the current cell's center on the axis being
/// left, and the candidate snaps onto that center line.
fn turn_candidate(maze: &Maze, player: &PlayerInternal) -> Option<Vec2> {
    let next = player.next_dir;
    if next == player.dir.opposite() {
        return try_step(maze, player.pos, next, player.speed, player.radius);
    }

    let center = maze.center_of(player.pos);
    let aligned = if next.is_horizontal() {
        if (player.pos.y - center.y).abs() > player.speed {
            return None;
        }
        Vec2::new(player.pos.x, center.y)
    } else {
        if (player.pos.x - center.x).abs() > player.speed {
            return None;
        }
        Vec2::new(center.x, player.pos.y)
    };
    try_step(maze, aligned, next, player.speed, player.radius)
}
