use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// One JSON object per line on stderr. Optional context is omitted when
/// absent so run-level lines stay short.
#[derive(Clone, Debug, Serialize)]
pub struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: u64,
    pub level: String,
    pub event: String,
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<u64>,
    pub details: Value,
}

/// Context shared by every line a binary writes.
#[derive(Clone, Debug, Default)]
pub struct LogContext<'a> {
    pub run_id: &'a str,
    pub scenario: Option<&'a str>,
    pub seed: Option<u32>,
    pub tick: Option<u64>,
}

impl<'a> LogContext<'a> {
    pub fn run(run_id: &'a str) -> Self {
        Self {
            run_id,
            ..Self::default()
        }
    }

    pub fn scenario(self, name: &'a str, seed: u32) -> Self {
        Self {
            scenario: Some(name),
            seed: Some(seed),
            ..self
        }
    }

    pub fn at_tick(self, tick: u64) -> Self {
        Self {
            tick: Some(tick),
            ..self
        }
    }
}

pub fn build_log_line(
    level: &str,
    event: &str,
    ctx: &LogContext<'_>,
    details: Value,
) -> StructuredLogLine {
    StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: ctx.run_id.to_string(),
        scenario: ctx.scenario.map(|value| value.to_string()),
        seed: ctx.seed,
        tick: ctx.tick,
        details,
    }
}

pub fn emit_log(level: &str, event: &str, ctx: &LogContext<'_>, details: Value) {
    let log_line = build_log_line(level, event, ctx, details);
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Wall-clock time for summaries, e.g. `2026-01-31T12:00:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_level_lines_omit_scenario_context() {
        let line = build_log_line("info", "run_finished", &LogContext::run("sim-1"), json!({}));
        let value = serde_json::to_value(&line).expect("log line should serialize");

        assert_eq!(value["runId"], "sim-1");
        assert_eq!(value["event"], "run_finished");
        assert!(value.get("scenario").is_none());
        assert!(value.get("seed").is_none());
        assert!(value.get("tick").is_none());
    }

    #[test]
    fn scenario_lines_carry_seed_and_tick() {
        let ctx = LogContext::run("sim-1").scenario("quick", 7).at_tick(42);
        let line = build_log_line("warn", "anomaly_detected", &ctx, json!({ "message": "x" }));
        let value = serde_json::to_value(&line).expect("log line should serialize");

        assert_eq!(value["scenario"], "quick");
        assert_eq!(value["seed"], 7);
        assert_eq!(value["tick"], 42);
        assert_eq!(value["details"]["message"], "x");
    }

    #[test]
    fn iso_timestamp_is_rfc3339_utc() {
        let stamp = now_iso();
        assert!(stamp.ends_with('Z'), "unexpected timestamp: {stamp}");
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
