use crate::constants::{
    default_adversary_positions, pickup_radius, ADVERSARY_SPEED, ENTITY_RADIUS, PLAYER_SPEED,
    SCREEN_HEIGHT, SCREEN_WIDTH, STARTING_LIVES,
};
use crate::maze::{decode_layout, LevelLayout, Maze};
use crate::motion::bounding_box;
use crate::rng::{RandomSource, Rng};
use crate::types::{
    AdversaryView, Direction, GameState, GameSummary, InputEvent, PickupKind, PickupView,
    PlayerView, RuntimeEvent, Snapshot, Vec2,
};

mod adversary_system;
mod pickup_system;
mod player_system;
mod utils;

use self::utils::random_direction;

#[derive(Clone, Debug)]
struct PlayerInternal {
    pos: Vec2,
    dir: Direction,
    next_dir: Direction,
    speed: f32,
    radius: f32,
}

#[derive(Clone, Debug)]
struct AdversaryInternal {
    slot: u8,
    pos: Vec2,
    dir: Direction,
    speed: f32,
    radius: f32,
    direction_change_counter: u32,
}

#[derive(Clone, Debug)]
struct PickupInternal {
    kind: PickupKind,
    pos: Vec2,
    radius: f32,
    collected: bool,
}

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub screen_width: f32,
    pub screen_height: f32,
    pub starting_lives: u32,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            starting_lives: STARTING_LIVES,
        }
    }
}

/// Single-player session: owns the current maze, every entity and pickup,
/// and the menu/playing/level-complete/game-over/win state machine.
#[derive(Clone, Debug)]
pub struct GameEngine<R = Rng> {
    pub options: GameEngineOptions,
    pub maze: Maze,

    levels: Vec<LevelLayout>,
    rng: R,
    state: GameState,
    level_index: usize,
    score: u32,
    lives: u32,
    levels_cleared: usize,
    player: PlayerInternal,
    adversaries: Vec<AdversaryInternal>,
    pickups: Vec<PickupInternal>,
    events: Vec<RuntimeEvent>,
    tick_counter: u64,
    quit_requested: bool,
}

impl GameEngine<Rng> {
    pub fn new(levels: Vec<LevelLayout>, seed: u32, options: GameEngineOptions) -> Self {
        Self::with_random_source(levels, Rng::new(seed), options)
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub fn with_random_source(levels: Vec<LevelLayout>, rng: R, options: GameEngineOptions) -> Self {
        let maze = decode_layout(&[], options.screen_width, options.screen_height);
        let center = Vec2::new(
            (options.screen_width / 2.0).floor(),
            (options.screen_height / 2.0).floor(),
        );
        let mut engine = Self {
            maze,
            levels,
            rng,
            state: GameState::Menu,
            level_index: 0,
            score: 0,
            lives: options.starting_lives,
            levels_cleared: 0,
            player: new_player(center),
            adversaries: Vec::new(),
            pickups: Vec::new(),
            events: Vec::new(),
            tick_counter: 0,
            quit_requested: false,
            options,
        };
        engine.reset();
        engine
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_ended(&self) -> bool {
        self.quit_requested
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.pos
    }

    pub fn remaining_pickups(&self) -> Vec<Vec2> {
        self.pickups
            .iter()
            .filter(|pickup| !pickup.collected)
            .map(|pickup| pickup.pos)
            .collect()
    }

    pub fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Quit => self.quit_requested = true,
            InputEvent::Move(dir) => {
                if self.state == GameState::Playing {
                    self.player.next_dir = dir;
                }
            }
            InputEvent::Confirm => match self.state {
                GameState::Menu => self.set_state(GameState::Playing),
                GameState::LevelComplete => {
                    self.level_index += 1;
                    self.set_state(GameState::Playing);
                    self.load_level(self.level_index);
                }
                GameState::GameOver | GameState::Win => self.reset(),
                GameState::Playing => {}
            },
        }
    }

    /// Advances one fixed-cadence tick. Only the Playing state simulates.
    pub fn step(&mut self) {
        if self.quit_requested {
            return;
        }
        self.tick_counter += 1;
        if self.state != GameState::Playing {
            return;
        }

        self.update_player();
        for idx in 0..self.adversaries.len() {
            self.update_adversary(idx);
            if self.player_touches_adversary(idx) {
                let slot = self.adversaries[idx].slot;
                self.lose_life(slot);
                return;
            }
        }
        self.resolve_pickups();
        self.check_level_complete();
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let dots_left = self
            .pickups
            .iter()
            .filter(|p| !p.collected && p.kind == PickupKind::Dot)
            .count();
        let power_pickups_left = self
            .pickups
            .iter()
            .filter(|p| !p.collected && p.kind == PickupKind::Power)
            .count();
        let snapshot = Snapshot {
            tick: self.tick_counter,
            state: self.state,
            level_index: self.level_index,
            level_number: self.level_index + 1,
            score: self.score,
            lives: self.lives,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                dir: self.player.dir,
                next_dir: self.player.next_dir,
                speed: self.player.speed,
                radius: self.player.radius,
            },
            adversaries: self
                .adversaries
                .iter()
                .map(|a| AdversaryView {
                    slot: a.slot,
                    x: a.pos.x,
                    y: a.pos.y,
                    dir: a.dir,
                    speed: a.speed,
                    radius: a.radius,
                })
                .collect(),
            pickups: self
                .pickups
                .iter()
                .map(|p| PickupView {
                    kind: p.kind,
                    x: p.pos.x,
                    y: p.pos.y,
                    collected: p.collected,
                })
                .collect(),
            dots_left,
            power_pickups_left,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> GameSummary {
        GameSummary {
            state: self.state,
            score: self.score,
            lives: self.lives,
            level_index: self.level_index,
            levels_cleared: self.levels_cleared,
            ticks: self.tick_counter,
        }
    }

    fn reset(&mut self) {
        self.set_state(GameState::Menu);
        self.level_index = 0;
        self.score = 0;
        self.lives = self.options.starting_lives;
        self.levels_cleared = 0;
        self.load_level(0);
    }

    /// Rebuilds maze, pickups and entities from scratch. An index past the
    /// last level is a win.
    fn load_level(&mut self, index: usize) {
        let Some(layout) = self.levels.get(index) else {
            self.set_state(GameState::Win);
            return;
        };
        let width = self.options.screen_width;
        let height = self.options.screen_height;
        self.maze = decode_layout(layout, width, height);

        self.pickups = self
            .maze
            .pickups
            .iter()
            .map(|spawn| PickupInternal {
                kind: spawn.kind,
                pos: spawn.pos,
                radius: pickup_radius(spawn.kind),
                collected: false,
            })
            .collect();

        let player_pos = self
            .maze
            .player_spawn
            .unwrap_or_else(|| Vec2::new((width / 2.0).floor(), (height / 2.0).floor()));
        self.player = new_player(player_pos);

        let spawns: Vec<(u8, Vec2)> = if self.maze.adversary_spawns.is_empty() {
            default_adversary_positions(width, height)
                .iter()
                .enumerate()
                .map(|(slot, &(x, y))| (slot as u8, Vec2::new(x, y)))
                .collect()
        } else {
            self.maze
                .adversary_spawns
                .iter()
                .map(|spawn| (spawn.slot, spawn.pos))
                .collect()
        };
        self.adversaries = spawns
            .into_iter()
            .map(|(slot, pos)| AdversaryInternal {
                slot,
                pos,
                dir: random_direction(&mut self.rng),
                speed: ADVERSARY_SPEED,
                radius: ENTITY_RADIUS,
                direction_change_counter: 0,
            })
            .collect();

        self.events.push(RuntimeEvent::LevelLoaded { level: index });
    }

    fn lose_life(&mut self, adversary_slot: u8) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(RuntimeEvent::LifeLost {
            adversary_slot,
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.set_state(GameState::GameOver);
        } else {
            self.load_level(self.level_index);
        }
    }

    fn player_touches_adversary(&self, idx: usize) -> bool {
        let Some(adversary) = self.adversaries.get(idx) else {
            return false;
        };
        bounding_box(self.player.pos, self.player.radius)
            .intersects(&bounding_box(adversary.pos, adversary.radius))
    }

    fn set_state(&mut self, next: GameState) {
        if self.state == next {
            return;
        }
        self.events.push(RuntimeEvent::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
    }
}

fn new_player(pos: Vec2) -> PlayerInternal {
    PlayerInternal {
        pos,
        dir: Direction::Right,
        next_dir: Direction::Right,
        speed: PLAYER_SPEED,
        radius: ENTITY_RADIUS,
    }
}
