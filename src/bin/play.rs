use std::path::PathBuf;
use std::time::Duration;

use arcade_maze::constants::{STARTING_LIVES, TICK_MICROS};
use arcade_maze::engine::{GameEngine, GameEngineOptions};
use arcade_maze::levels::load_levels;
use arcade_maze::logging::{emit_log, now_ms, LogContext};
use arcade_maze::types::{GameSummary, InputEvent, Snapshot};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Realtime stdio host. Reads one command per stdin line and writes JSON
/// snapshot lines to stdout at a fixed 60 Hz cadence.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    lives: Option<u32>,
    /// JSON file holding an array of integer grids.
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Print a snapshot every N ticks even when nothing happened.
    #[arg(long, default_value_t = 6)]
    snapshot_every: u64,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    run_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostMessage<'a> {
    State { snapshot: &'a Snapshot },
    Summary { summary: &'a GameSummary },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random::<u32>);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| format!("play-{seed}-{}", now_ms()));
    let ctx = LogContext::run(&run_id);

    let levels = match load_levels(cli.levels.as_deref()) {
        Ok(levels) => levels,
        Err(error) => {
            emit_log(
                "error",
                "levels_load_failed",
                &ctx,
                json!({
                    "path": cli.levels.as_ref().map(|path| path.to_string_lossy().to_string()),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let mut engine = GameEngine::new(
        levels,
        seed,
        GameEngineOptions {
            starting_lives: cli.lives.unwrap_or(STARTING_LIVES).max(1),
            ..GameEngineOptions::default()
        },
    );
    emit_log(
        "info",
        "session_started",
        &ctx,
        json!({
            "seed": seed,
            "levelCount": engine.level_count(),
            "snapshotEvery": cli.snapshot_every,
        }),
    );
    publish(&HostMessage::State {
        snapshot: &engine.build_snapshot(true),
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(Duration::from_micros(TICK_MICROS));
    let reason = loop {
        tokio::select! {
            _ = interval.tick() => {
                engine.step();
                let snapshot = engine.build_snapshot(true);
                if should_publish(&snapshot, cli.snapshot_every) {
                    publish(&HostMessage::State { snapshot: &snapshot });
                }
                if cli.max_ticks.is_some_and(|limit| engine.tick() >= limit) {
                    break "max_ticks";
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(raw)) => match InputEvent::parse(&raw) {
                        Some(input) => engine.handle_input(input),
                        None => emit_log(
                            "warn",
                            "unknown_input",
                            &ctx.clone().at_tick(engine.tick()),
                            json!({ "input": raw }),
                        ),
                    },
                    Ok(None) => break "stdin_closed",
                    Err(error) => {
                        emit_log(
                            "error",
                            "stdin_read_failed",
                            &ctx,
                            json!({ "error": error.to_string() }),
                        );
                        std::process::exit(2);
                    }
                }
                if engine.is_ended() {
                    break "quit";
                }
            }
        }
    };

    let summary = engine.build_summary();
    publish(&HostMessage::Summary { summary: &summary });
    emit_log(
        "info",
        "session_finished",
        &ctx.clone().at_tick(summary.ticks),
        json!({
            "reason": reason,
            "state": summary.state,
            "score": summary.score,
            "levelsCleared": summary.levels_cleared,
        }),
    );
}

/// Ticks that produced events are always published; quiet ticks only on
/// the configured cadence.
fn should_publish(snapshot: &Snapshot, every: u64) -> bool {
    !snapshot.events.is_empty() || (every > 0 && snapshot.tick % every == 0)
}

fn publish(message: &HostMessage<'_>) {
    println!(
        "{}",
        serde_json::to_string(message).expect("host message should serialize")
    );
}
