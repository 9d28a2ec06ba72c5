//! Replay a recorded trace through the engine on a synthetic clock.
//!
//! A trace is JSON Lines, one event per line:
//!
//! ```text
//! {"type":"move","t_ms":0,"x":500,"y":540}
//! {"type":"find","t_ms":900}
//! {"type":"log","t_ms":1500,"line":"[INFO] switching to macbook-pro"}
//! ```
//!
//! Tracking ticks are interleaved at the configured rate.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use cursorhome_common::clock::interval_from_hz;
use cursorhome_common::config::AppConfig;
use cursorhome_engine::{Engine, EngineCommand};
use cursorhome_highlight::{CoordinatorOutcome, CoordinatorState, IgnoreReason, SurfaceRenderer};
use cursorhome_model::{CursorSample, Point};
use cursorhome_platform_core::VirtualPointer;
use serde::Deserialize;

use crate::displays::topology_from_args;
use crate::renderer::LoggingRenderer;

/// One line of a trace file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    Move { t_ms: u64, x: f64, y: f64 },
    Find { t_ms: u64 },
    Hide { t_ms: u64 },
    Log { t_ms: u64, line: String },
}

impl TraceEvent {
    pub fn t_ms(&self) -> u64 {
        match self {
            TraceEvent::Move { t_ms, .. }
            | TraceEvent::Find { t_ms }
            | TraceEvent::Hide { t_ms }
            | TraceEvent::Log { t_ms, .. } => *t_ms,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TraceEvent::Move { .. } => "move",
            TraceEvent::Find { .. } => "find",
            TraceEvent::Hide { .. } => "hide",
            TraceEvent::Log { .. } => "log",
        }
    }
}

/// An outcome and what caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub t_ms: u64,
    pub cause: &'static str,
    pub outcome: CoordinatorOutcome,
}

impl Step {
    /// Ticks that changed nothing.
    fn is_quiet(&self) -> bool {
        self.cause == "tick"
            && matches!(
                self.outcome,
                CoordinatorOutcome::Tracked | CoordinatorOutcome::Ignored(IgnoreReason::NoSession)
            )
    }
}

pub fn run(config: AppConfig, trace: PathBuf, displays: Vec<String>, all: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&trace)
        .with_context(|| format!("failed to read trace {}", trace.display()))?;
    let events = read_trace(&text)?;
    let topology = topology_from_args(&displays)?;
    let start_at = topology
        .primary()
        .map(|display| display.center())
        .unwrap_or_default();

    let mut engine = Engine::new(
        config,
        topology,
        LoggingRenderer::new(),
        VirtualPointer::new(start_at),
    );

    println!("Replaying {} events from {}", events.len(), trace.display());
    let steps = replay(&mut engine, &events, Instant::now());

    for step in steps.iter().filter(|step| all || !step.is_quiet()) {
        println!(
            "{:>8.3}s  {:<5} {}",
            step.t_ms as f64 / 1000.0,
            step.cause,
            super::describe(&step.outcome)
        );
    }
    println!(
        "Done: {} surfaces left, {} frames drawn",
        engine.coordinator().renderer().live_count(),
        engine.coordinator().renderer().frames()
    );
    Ok(())
}

/// Parse a JSONL trace. Blank lines and `#` comments are skipped; times
/// must not go backwards.
pub fn read_trace(text: &str) -> anyhow::Result<Vec<TraceEvent>> {
    let mut events: Vec<TraceEvent> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: TraceEvent = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid trace event", index + 1))?;
        if let Some(previous) = events.last() {
            if event.t_ms() < previous.t_ms() {
                bail!(
                    "line {}: time {} ms is before {} ms",
                    index + 1,
                    event.t_ms(),
                    previous.t_ms()
                );
            }
        }
        events.push(event);
    }
    Ok(events)
}

/// Feed `events` to the engine, ticking at the configured rate, and keep
/// ticking after the last event until the highlight is gone.
pub fn replay<R: SurfaceRenderer>(
    engine: &mut Engine<R, VirtualPointer>,
    events: &[TraceEvent],
    start: Instant,
) -> Vec<Step> {
    let interval = interval_from_hz(engine.config().tracking.tick_hz);
    let mut next_tick = interval;
    let mut steps = Vec::new();

    for event in events {
        let offset = Duration::from_millis(event.t_ms());
        while next_tick <= offset {
            tick(engine, start, next_tick, &mut steps);
            next_tick += interval;
        }

        let now = start + offset;
        let outcomes: Vec<CoordinatorOutcome> = match event {
            TraceEvent::Move { x, y, .. } => {
                let point = Point::new(*x, *y);
                engine.coordinator().pointer().move_to(point);
                engine
                    .handle(EngineCommand::PointerMoved(CursorSample::new(point, now)), now)
                    .into_iter()
                    .collect()
            }
            TraceEvent::Find { .. } => engine.handle(EngineCommand::FindCursor, now).into_iter().collect(),
            TraceEvent::Hide { .. } => engine.handle(EngineCommand::HideAll, now).into_iter().collect(),
            TraceEvent::Log { line, .. } => engine.apply_log_lines(std::slice::from_ref(line), now),
        };
        steps.extend(outcomes.into_iter().map(|outcome| Step {
            t_ms: event.t_ms(),
            cause: event.label(),
            outcome,
        }));
    }

    let last = events.last().map_or(0, TraceEvent::t_ms);
    let end = Duration::from_millis(last) + engine.config().highlight.duration() + Duration::from_secs(1);
    while next_tick <= end && engine.state() == CoordinatorState::Active {
        tick(engine, start, next_tick, &mut steps);
        next_tick += interval;
    }
    steps
}

fn tick<R: SurfaceRenderer>(
    engine: &mut Engine<R, VirtualPointer>,
    start: Instant,
    offset: Duration,
    steps: &mut Vec<Step>,
) {
    let outcome = engine.tick(start + offset);
    steps.push(Step {
        t_ms: u64::try_from(offset.as_millis()).unwrap_or(u64::MAX),
        cause: "tick",
        outcome,
    });
}
