use arcade_maze::autopilot::plan_direction;
use arcade_maze::constants::{AUTOPILOT_REPLAN_TICKS, STARTING_LIVES, TICK_RATE};
use arcade_maze::engine::{GameEngine, GameEngineOptions};
use arcade_maze::levels::load_levels;
use arcade_maze::logging::{emit_log, now_iso, now_ms, LogContext};
use arcade_maze::maze::{LevelLayout, Maze};
use arcade_maze::motion::bounding_box;
use arcade_maze::types::{GameState, InputEvent, RuntimeEvent, Snapshot, Vec2};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Headless batch runner: an autopilot plays seeded scenarios while every
/// tick is checked for broken game invariants.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    lives: Option<u32>,
    /// JSON file holding an array of integer grids.
    #[arg(long)]
    levels: Option<PathBuf>,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seed: u32,
    lives: u32,
    #[serde(rename = "maxTicks")]
    max_ticks: u64,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    #[serde(rename = "startingLives")]
    starting_lives: u32,
    #[serde(rename = "finalState")]
    final_state: GameState,
    score: u32,
    #[serde(rename = "livesLeft")]
    lives_left: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: usize,
    ticks: u64,
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "powerPickupsTaken")]
    power_pickups_taken: u32,
    #[serde(rename = "livesLost")]
    lives_lost: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "stateCounts")]
    state_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

/// Score and lives from the previous tick, for monotonicity checks.
#[derive(Clone, Copy, Debug)]
struct Progress {
    score: u32,
    lives: u32,
}

#[derive(Debug, Default)]
struct Anomalies {
    messages: Vec<String>,
    records: Vec<AnomalyRecord>,
    seen: HashSet<String>,
}

impl Anomalies {
    /// Every occurrence is recorded; the message list stays deduplicated.
    fn push(&mut self, tick: u64, message: String) {
        self.records.push(AnomalyRecord {
            tick,
            message: message.clone(),
        });
        if self.seen.insert(message.clone()) {
            self.messages.push(message);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms));
    let run_ctx = LogContext::run(&run_id);

    let levels = match load_levels(cli.levels.as_deref()) {
        Ok(levels) => levels,
        Err(error) => {
            emit_log(
                "error",
                "levels_load_failed",
                &run_ctx,
                json!({
                    "path": cli.levels.as_ref().map(|path| path.to_string_lossy().to_string()),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut state_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        let scenario_ctx = run_ctx.clone().scenario(&scenario.name, scenario.seed);
        emit_log(
            "info",
            "scenario_started",
            &scenario_ctx,
            json!({
                "lives": scenario.lives,
                "maxTicks": scenario.max_ticks,
                "levelCount": levels.len(),
            }),
        );
        let scenario_run = run_scenario(&scenario, &levels);

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &scenario_ctx.clone().at_tick(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        *state_counts
            .entry(state_key(scenario_run.result.final_state).to_string())
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &scenario_ctx.clone().at_tick(scenario_run.result.ticks),
            json!({
                "finalState": scenario_run.result.final_state,
                "score": scenario_run.result.score,
                "levelsCleared": scenario_run.result.levels_cleared,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&scenario_run.result).expect("scenario result should serialize")
        );
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        scenario_results,
        state_counts,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_ctx,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_ctx,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "stateCounts": summary.state_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario, levels: &[LevelLayout]) -> ScenarioRunResult {
    let mut engine = GameEngine::new(
        levels.to_vec(),
        scenario.seed,
        GameEngineOptions {
            starting_lives: scenario.lives,
            ..GameEngineOptions::default()
        },
    );

    let mut anomalies = Anomalies::default();
    let mut dots_eaten = 0;
    let mut power_pickups_taken = 0;
    let mut lives_lost = 0;
    let mut previous = Progress {
        score: engine.score(),
        lives: engine.lives(),
    };

    while engine.tick() < scenario.max_ticks {
        match engine.state() {
            GameState::GameOver | GameState::Win => break,
            state @ (GameState::Menu | GameState::LevelComplete) => {
                engine.handle_input(InputEvent::Confirm);
                if engine.state() == state {
                    anomalies.push(
                        engine.tick(),
                        format!("confirm ignored in {} state", state_key(state)),
                    );
                    break;
                }
            }
            GameState::Playing => {
                if engine.tick() % AUTOPILOT_REPLAN_TICKS == 0 {
                    let targets = engine.remaining_pickups();
                    if let Some(dir) =
                        plan_direction(&engine.maze, engine.player_position(), &targets)
                    {
                        engine.handle_input(InputEvent::Move(dir));
                    }
                }
            }
        }

        engine.step();
        let snapshot = engine.build_snapshot(true);
        for message in collect_snapshot_anomalies(&snapshot, &engine.maze, previous) {
            anomalies.push(snapshot.tick, message);
        }
        previous = Progress {
            score: snapshot.score,
            lives: snapshot.lives,
        };

        for event in &snapshot.events {
            match event {
                RuntimeEvent::DotEaten { .. } => dots_eaten += 1,
                RuntimeEvent::PowerPickupTaken { .. } => power_pickups_taken += 1,
                RuntimeEvent::LifeLost { .. } => lives_lost += 1,
                _ => {}
            }
        }
    }

    let summary = engine.build_summary();
    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            starting_lives: scenario.lives,
            final_state: summary.state,
            score: summary.score,
            lives_left: summary.lives,
            levels_cleared: summary.levels_cleared,
            ticks: summary.ticks,
            dots_eaten,
            power_pickups_taken,
            lives_lost,
            anomalies: anomalies.messages,
        },
        anomaly_records: anomalies.records,
    }
}

fn collect_snapshot_anomalies(
    snapshot: &Snapshot,
    maze: &Maze,
    previous: Progress,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    if snapshot.score < previous.score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            previous.score, snapshot.score
        ));
    }
    if snapshot.lives > previous.lives {
        anomalies.push(format!(
            "lives increased: {} -> {}",
            previous.lives, snapshot.lives
        ));
    }

    let player = Vec2::new(snapshot.player.x, snapshot.player.y);
    check_entity(&mut anomalies, maze, "player", player, snapshot.player.radius);
    for adversary in &snapshot.adversaries {
        check_entity(
            &mut anomalies,
            maze,
            &format!("adversary {}", adversary.slot),
            Vec2::new(adversary.x, adversary.y),
            adversary.radius,
        );
    }
    anomalies
}

fn check_entity(anomalies: &mut Vec<String>, maze: &Maze, label: &str, pos: Vec2, radius: f32) {
    if !pos.x.is_finite()
        || !pos.y.is_finite()
        || pos.x < 0.0
        || pos.x > maze.width
        || pos.y < 0.0
        || pos.y > maze.height
    {
        anomalies.push(format!("{label} out of bounds: ({}, {})", pos.x, pos.y));
    }
    if maze.is_blocked(&bounding_box(pos, radius)) {
        anomalies.push(format!("{label} overlaps a wall"));
    }
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(now_ms));
    let lives = cli.lives.unwrap_or(STARTING_LIVES).max(1);
    let minutes = |m: u64| m * 60 * TICK_RATE as u64;

    if cli.single || cli.lives.is_some() || cli.max_ticks.is_some() {
        return vec![Scenario {
            name: format!("custom-lives{lives}"),
            seed,
            lives,
            max_ticks: cli.max_ticks.unwrap_or(minutes(3)),
        }];
    }

    vec![
        Scenario {
            name: "quick-check".to_string(),
            seed,
            lives,
            max_ticks: minutes(2),
        },
        Scenario {
            name: "endurance-check".to_string(),
            seed: normalize_seed(seed as u64 + 1),
            lives: lives + 2,
            max_ticks: minutes(6),
        },
    ]
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn state_key(state: GameState) -> &'static str {
    match state {
        GameState::Menu => "menu",
        GameState::Playing => "playing",
        GameState::LevelComplete => "level_complete",
        GameState::GameOver => "game_over",
        GameState::Win => "win",
    }
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    state_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let total_score: u64 = scenarios.iter().map(|s| s.score as u64).sum();
    let average_score = if scenario_count == 0 {
        0
    } else {
        (total_score / scenario_count as u64) as u32
    };
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        generated_at_iso: now_iso(),
        scenario_count,
        anomaly_count,
        average_score,
        state_counts,
        scenarios,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
