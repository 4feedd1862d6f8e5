use crate::rng::RandomSource;
use crate::types::{Direction, Vec2};

pub(super) fn random_direction<R: RandomSource>(rng: &mut R) -> Direction {
    Direction::ALL[rng.pick_index(Direction::ALL.len())]
}

/// Heads along the axis with the larger gap to `target`; an exact tie
/// goes horizontal.
pub(super) fn chase_direction(from: Vec2, target: Vec2) -> Direction {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}
