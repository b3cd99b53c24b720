use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use trimline_engine::{AnimationId, Command, CommitPhase, Engine, EngineConfig, EngineError, Event, Segment};

use crate::error::{CliError, Result};
use crate::scenario::{Scenario, Step};

/// Placeholder frames handed back for every detail request.
const DETAIL_FRAMES: u32 = 8;

/// One emitted event, tagged with the index of the step that caused it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLine {
    pub step: usize,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub lines: Vec<EventLine>,
    pub segments: Vec<Segment>,
}

/// Runs `scenario` against a fresh engine and checks the final store.
///
/// A merge fade still pending after the last step is settled with one extra
/// tick, whose events carry the step index `steps.len()`.
pub fn replay(scenario: &Scenario, config: EngineConfig) -> Result<Replay> {
    let min_len = config.min_segment_len;
    let settle = config.merge_fade_ms;
    let mut engine: Engine<u32> =
        Engine::with_config(scenario.duration, scenario.track_width, config);
    if !scenario.segments.is_empty() {
        engine.handle_command(Command::ReplaceSegments(scenario.segments.clone()));
    }

    let mut lines = Vec::new();
    let mut last_started: Option<AnimationId> = None;
    let mut clock = 0_u64;
    for (index, step) in scenario.steps.iter().enumerate() {
        if let Some(at_ms) = step_clock(step) {
            clock = clock.max(at_ms);
        }
        let command = match step.to_command() {
            Some(command) => command,
            None => match last_started.take() {
                Some(animation) => Command::AnimationFinished {
                    animation,
                    at: Duration::from_millis(clock),
                },
                None => {
                    warn!(step = index, "no started animation to finish");
                    continue;
                }
            },
        };
        run_step(
            &mut engine,
            command,
            index,
            scenario.serve_thumbnails,
            &mut last_started,
            &mut lines,
        );
    }

    if matches!(engine.commit_phase(), CommitPhase::Committing(_)) {
        debug!("settling pending merge fade");
        run_step(
            &mut engine,
            Command::Tick {
                at: Duration::from_millis(clock + settle),
            },
            scenario.steps.len(),
            scenario.serve_thumbnails,
            &mut last_started,
            &mut lines,
        );
    }

    engine
        .store()
        .check_invariants(engine.geometry().duration, min_len)
        .map_err(EngineError::from)?;

    Ok(Replay {
        lines,
        segments: engine.segments().to_vec(),
    })
}

fn step_clock(step: &Step) -> Option<u64> {
    match step {
        Step::Down { at_ms, .. }
        | Step::Move { at_ms, .. }
        | Step::Up { at_ms }
        | Step::Tick { at_ms }
        | Step::FinishAnimation { at_ms } => Some(*at_ms),
        _ => None,
    }
}

fn run_step(
    engine: &mut Engine<u32>,
    command: Command<u32>,
    step: usize,
    serve_thumbnails: bool,
    last_started: &mut Option<AnimationId>,
    lines: &mut Vec<EventLine>,
) {
    let mut queue = VecDeque::from([command]);
    while let Some(command) = queue.pop_front() {
        for event in engine.handle_command(command) {
            match &event {
                Event::AnimationStarted { animation, .. } => *last_started = Some(*animation),
                Event::RequestDetailThumbnails { request, .. } if serve_thumbnails => {
                    queue.push_back(Command::DetailThumbnailsReady {
                        request: *request,
                        thumbnails: (0..DETAIL_FRAMES).collect(),
                    });
                }
                _ => {}
            }
            lines.push(EventLine { step, event });
        }
    }
}

/// Writes each line as one JSON object per line.
pub fn write_lines(lines: &[EventLine], mut out: impl Write) -> Result<()> {
    for line in lines {
        let json = serde_json::to_string(line).map_err(|source| CliError::Output(source.into()))?;
        writeln!(out, "{json}").map_err(CliError::Output)?;
    }
    out.flush().map_err(CliError::Output)
}
