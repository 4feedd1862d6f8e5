use crate::types::PickupKind;

pub const TICK_RATE: u32 = 60;
pub const TICK_MICROS: u64 = 1_000_000 / TICK_RATE as u64;

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

pub const PLAYER_SPEED: f32 = 3.0;
pub const ADVERSARY_SPEED: f32 = 2.0;
pub const ENTITY_RADIUS: f32 = 15.0;

pub const DOT_SIZE: f32 = 8.0;
pub const DOT_RADIUS: f32 = DOT_SIZE / 2.0;
pub const POWER_PICKUP_RADIUS: f32 = DOT_SIZE;

pub const DOT_SCORE: u32 = 10;
pub const POWER_PICKUP_SCORE: u32 = 50;
pub const STARTING_LIVES: u32 = 3;

pub const ADVERSARY_RETHINK_TICKS: u32 = 60;
pub const ADVERSARY_CHASE_PROBABILITY: f32 = 0.7;
pub const MAX_ADVERSARIES: usize = 4;

pub const AUTOPILOT_REPLAN_TICKS: u64 = 8;

/// Positions used when a layout declares no adversary spawns, as offsets
/// from the screen corners.
pub fn default_adversary_positions(width: f32, height: f32) -> [(f32, f32); MAX_ADVERSARIES] {
    [
        (100.0, 100.0),
        (width - 100.0, 100.0),
        (100.0, height - 100.0),
        (width - 100.0, height - 100.0),
    ]
}

pub fn pickup_score(kind: PickupKind) -> u32 {
    match kind {
        PickupKind::Dot => DOT_SCORE,
        PickupKind::Power => POWER_PICKUP_SCORE,
    }
}

pub fn pickup_radius(kind: PickupKind) -> f32 {
    match kind {
        PickupKind::Dot => DOT_RADIUS,
        PickupKind::Power => POWER_PICKUP_RADIUS,
    }
}
