use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Probe order used when a blocked entity looks for any open heading.
    pub const FALLBACK_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" | "w" => Some(Self::Up),
            "down" | "s" => Some(Self::Down),
            "left" | "a" => Some(Self::Left),
            "right" | "d" => Some(Self::Right),
            _ => None,
        }
    }

    /// Unit step in screen space, y grows downward.
    pub fn unit(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Menu,
    Playing,
    LevelComplete,
    GameOver,
    Win,
}

/// Decoded layout cell. Codes: 0 open, 1 wall, 2 dot, 3 power pickup,
/// 4 player spawn, 5..=8 adversary slots 0..=3. Anything else reads as open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Pickup,
    PowerPickup,
    PlayerSpawn,
    AdversarySpawn(u8),
}

impl Cell {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Wall,
            2 => Self::Pickup,
            3 => Self::PowerPickup,
            4 => Self::PlayerSpawn,
            5..=8 => Self::AdversarySpawn((code - 5) as u8),
            _ => Self::Empty,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Self::Wall
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Dot,
    Power,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        Self {
            x: center.x - half_extent,
            y: center.y - half_extent,
            w: half_extent * 2.0,
            h: half_extent * 2.0,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    Confirm,
    Quit,
}

impl InputEvent {
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        if let Some(dir) = Direction::parse_move(&normalized) {
            return Some(Self::Move(dir));
        }
        match normalized.as_str() {
            "confirm" | "start" | "continue" | "restart" | "space" | "enter" => {
                Some(Self::Confirm)
            }
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Direction,
    pub speed: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdversaryView {
    pub slot: u8,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub speed: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    LevelLoaded {
        level: usize,
    },
    DotEaten {
        x: f32,
        y: f32,
    },
    PowerPickupTaken {
        x: f32,
        y: f32,
    },
    LifeLost {
        #[serde(rename = "adversarySlot")]
        adversary_slot: u8,
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    LevelCleared {
        level: usize,
    },
    StateChanged {
        from: GameState,
        to: GameState,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub state: GameState,
    #[serde(rename = "levelIndex")]
    pub level_index: usize,
    #[serde(rename = "levelNumber")]
    pub level_number: usize,
    pub score: u32,
    pub lives: u32,
    pub player: PlayerView,
    pub adversaries: Vec<AdversaryView>,
    pub pickups: Vec<PickupView>,
    #[serde(rename = "dotsLeft")]
    pub dots_left: usize,
    #[serde(rename = "powerPickupsLeft")]
    pub power_pickups_left: usize,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub state: GameState,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "levelIndex")]
    pub level_index: usize,
    #[serde(rename = "levelsCleared")]
    pub levels_cleared: usize,
    pub ticks: u64,
}
