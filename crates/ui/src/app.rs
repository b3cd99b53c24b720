use std::collections::VecDeque;
use std::time::{Duration, Instant};

use iced::widget::{button, column, row, text};
use iced::{Color, Element, Subscription, Task, keyboard, time};
use tracing::{debug, info};
use trimline_engine::{Command, Engine, Event, SceneBoundary};

use crate::swatch::{DETAIL_SWATCHES, TRACK_SWATCHES, swatches};
use crate::widgets::timeline::{self, TimelineInput};

const DEMO_DURATION: f64 = 60.0;
const DEFAULT_TRACK_WIDTH: f64 = 960.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    Timeline(TimelineInput),
    Frame(Instant),
    MarkIn,
    MarkOut,
    ToggleSegment,
    Reset,
}

/// Root UI state. Owns the engine and plays the host role for it.
pub struct AppState {
    engine: Engine<Color>,
    started: Instant,
    now: Duration,
    playhead: f64,
    mark_in: Option<f64>,
    status: String,
}

impl AppState {
    /// Boots the app with a demo shot list.
    pub fn boot() -> (Self, Task<Message>) {
        let mut app = Self::with_engine(Engine::new(DEMO_DURATION, DEFAULT_TRACK_WIDTH));
        app.dispatch(Command::SetThumbnails(swatches(
            0.0,
            DEMO_DURATION,
            DEMO_DURATION,
            TRACK_SWATCHES,
        )));
        app.dispatch(Command::ImportShots(demo_shots()));
        (app, Task::none())
    }

    fn with_engine(engine: Engine<Color>) -> Self {
        Self {
            engine,
            started: Instant::now(),
            now: Duration::ZERO,
            playhead: 0.0,
            mark_in: None,
            status: String::from("ready"),
        }
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Timeline(input) => {
                self.now = self.started.elapsed();
                let at = self.now;
                match input {
                    TimelineInput::Pressed { x, width } => {
                        self.sync_width(width);
                        self.dispatch(Command::PointerDown { x, at });
                    }
                    TimelineInput::Moved { x, width } => {
                        self.sync_width(width);
                        self.dispatch(Command::PointerMove { x, at });
                    }
                    TimelineInput::Released => {
                        self.dispatch(Command::PointerUp { at });
                    }
                }
            }
            Message::Frame(instant) => {
                let at = instant.saturating_duration_since(self.started);
                self.now = self.now.max(at);
                self.dispatch(Command::Tick { at: self.now });
                let finished = self
                    .engine
                    .collapse()
                    .filter(|collapse| collapse.is_finished(self.now))
                    .map(|collapse| collapse.id);
                if let Some(animation) = finished {
                    self.dispatch(Command::AnimationFinished {
                        animation,
                        at: self.now,
                    });
                }
            }
            Message::MarkIn => {
                self.mark_in = Some(self.playhead);
                self.status = format!("in mark at {:.2}s", self.playhead);
            }
            Message::MarkOut => match self.mark_in.take() {
                Some(start) => {
                    self.dispatch(Command::InsertSegment {
                        start,
                        end: self.playhead,
                    });
                }
                None => {
                    self.status = String::from("set an in mark first");
                }
            },
            Message::ToggleSegment => {
                let index = self.engine.segments().iter().position(|segment| {
                    segment.start <= self.playhead && self.playhead <= segment.end
                });
                match index {
                    Some(index) => {
                        self.dispatch(Command::ToggleActive { index });
                    }
                    None => {
                        self.status = String::from("no segment under the playhead");
                    }
                }
            }
            Message::Reset => {
                self.mark_in = None;
                self.dispatch(Command::ReplaceSegments(Vec::new()));
            }
        }

        Task::none()
    }

    fn sync_width(&mut self, width: f64) {
        if width > 0.0 && width != self.engine.geometry().width {
            self.dispatch(Command::SetTrackWidth { width });
        }
    }

    /// Sends `command` and serves every follow-up the engine asks for.
    fn dispatch(&mut self, command: Command<Color>) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            for event in self.engine.handle_command(command) {
                if let Some(follow_up) = self.apply_engine_event(event) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    fn apply_engine_event(&mut self, event: Event) -> Option<Command<Color>> {
        match event {
            Event::SegmentsChanged { segments } => {
                self.status = format!("{} segments", segments.len());
                None
            }
            Event::Seek { time } => {
                self.playhead = time;
                None
            }
            Event::ScrubStarted | Event::ScrubEnded | Event::ClearDetailThumbnails => {
                debug!(?event, "engine event");
                None
            }
            Event::RequestDetailThumbnails {
                request,
                start,
                end,
            } => {
                let duration = self.engine.geometry().duration;
                Some(Command::DetailThumbnailsReady {
                    request,
                    thumbnails: swatches(start, end, duration, DETAIL_SWATCHES),
                })
            }
            Event::AnimationStarted {
                animation,
                duration_ms,
            } => {
                info!(animation = animation.0, duration_ms, "collapse animation started");
                None
            }
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let controls = row![
            button("Mark in").on_press(Message::MarkIn),
            button("Mark out").on_press(Message::MarkOut),
            button("Toggle").on_press(Message::ToggleSegment),
            button("Reset").on_press(Message::Reset),
        ]
        .spacing(12);

        let mark = self
            .mark_in
            .map(|start| format!("In: {start:.2}s"))
            .unwrap_or_else(|| String::from("In: -"));

        column![
            timeline::view(
                self.engine.view(self.now),
                self.playhead,
                Message::Timeline
            ),
            controls,
            text(format!("Playhead: {:.2}s", self.playhead)),
            text(mark),
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Frame clock plus in/out keyboard shortcuts.
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            time::every(FRAME_INTERVAL).map(Message::Frame),
            keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
                keyboard::Key::Character("i") => Some(Message::MarkIn),
                keyboard::Key::Character("o") => Some(Message::MarkOut),
                keyboard::Key::Character("t") => Some(Message::ToggleSegment),
                _ => None,
            }),
        ])
    }
}

fn demo_shots() -> Vec<SceneBoundary> {
    [(0.0, 11.5), (11.5, 24.0), (24.0, 37.25), (37.25, 49.0), (49.0, 60.0)]
        .into_iter()
        .map(|(start, end)| SceneBoundary { start, end })
        .collect()
}
