use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::commit::{AnimationId, CarpetGeometry, Collapse, CollapseKind, CommitEngine, CommitPhase};
use crate::config::EngineConfig;
use crate::coords::TrackGeometry;
use crate::detail::{DetailMode, DetailRequestId, DetailRequests, DetailWindow, detail_window};
use crate::drag::{DeleteIntent, Intent, MergeIntent, MoveOutcome, clamp_boundary, classify_move};
use crate::gesture::{DragTarget, Edge, HandleRef, resolve_press};
use crate::proximity::blend_scores;
use crate::render::{DetailView, TimelineView, carpet_for, layout_strips};
use crate::scheduler::{Scheduler, TimerKind};
use crate::shots::{SceneBoundary, segments_from_scenes};
use crate::timeline::{Segment, SegmentId, SegmentPatch, SegmentStore};

/// Commands accepted by the engine.
///
/// `T` is the host's thumbnail handle type. Every time-sensitive command
/// carries the host's monotonic clock as `at`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<T> {
    /// Pointer pressed at `x` pixels from the left edge of the track.
    PointerDown {
        x: f64,
        at: Duration,
    },
    PointerMove {
        x: f64,
        at: Duration,
    },
    PointerUp {
        at: Duration,
    },
    /// Fires due detail timers and the merge-fade deadline.
    Tick {
        at: Duration,
    },
    /// The host finished playing the collapse animation `animation`.
    AnimationFinished {
        animation: AnimationId,
        at: Duration,
    },
    DetailThumbnailsReady {
        request: DetailRequestId,
        thumbnails: Vec<T>,
    },
    /// Full-track thumbnails.
    SetThumbnails(Vec<T>),
    SetDuration {
        duration: f64,
    },
    SetTrackWidth {
        width: f64,
    },
    ReplaceSegments(Vec<Segment>),
    /// Replaces the segments with one segment per detected shot.
    ImportShots(Vec<SceneBoundary>),
    /// Inserts a segment from keyboard in/out marks.
    InsertSegment {
        start: f64,
        end: f64,
    },
    ToggleActive {
        index: usize,
    },
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SegmentsChanged {
        segments: Vec<Segment>,
    },
    Seek {
        time: f64,
    },
    ScrubStarted,
    ScrubEnded,
    RequestDetailThumbnails {
        request: DetailRequestId,
        start: f64,
        end: f64,
    },
    ClearDetailThumbnails,
    /// Play the collapse animation and report back with
    /// [`Command::AnimationFinished`].
    AnimationStarted {
        animation: AnimationId,
        duration_ms: u64,
    },
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Scrubbing,
    /// Pressed on two coincident handles; waiting for motion to pick one.
    Shared {
        left: usize,
        right: usize,
        press_x: f64,
    },
    Handle(HandleDrag),
}

/// A drag of one concrete segment boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDrag {
    pub handle: HandleRef,
    pub segment_id: SegmentId,
    pub mode: DragMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    /// Normal dragging. `prefetched` is the window requested by the prefetch
    /// timer, reused when the dwell timer activates the magnifier.
    Tracking { prefetched: Option<DetailWindow> },
    Overshoot(Intent),
    Detail(DetailMode),
}

/// Segment timeline gesture engine.
///
/// Owns the segment store and every piece of ephemeral gesture state. All
/// input arrives through [`Engine::handle_command`], which never blocks.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use trimline_engine::{Command, Engine, Event};
///
/// let mut engine: Engine<()> = Engine::new(10.0, 1_000.0);
/// let events = engine.handle_command(Command::PointerDown {
///     x: 250.0,
///     at: Duration::ZERO,
/// });
/// assert_eq!(events, vec![Event::ScrubStarted, Event::Seek { time: 2.5 }]);
/// ```
#[derive(Debug)]
pub struct Engine<T> {
    config: EngineConfig,
    geometry: TrackGeometry,
    store: SegmentStore,
    gesture: Gesture,
    scheduler: Scheduler,
    detail: DetailRequests<T>,
    commit: CommitEngine,
    thumbnails: Vec<T>,
    /// `None` once every id up to `u64::MAX` has been handed out.
    next_segment_id: Option<u64>,
}

impl<T> Engine<T> {
    /// Creates an engine holding one segment over the whole `duration`.
    pub fn new(duration: f64, track_width: f64) -> Self {
        Self::with_config(duration, track_width, EngineConfig::default())
    }

    pub fn with_config(duration: f64, track_width: f64, config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            geometry: TrackGeometry::new(duration, track_width),
            store: SegmentStore::default(),
            gesture: Gesture::Idle,
            scheduler: Scheduler::default(),
            detail: DetailRequests::default(),
            commit: CommitEngine::default(),
            thumbnails: Vec::new(),
            next_segment_id: Some(1),
        };
        engine.store = engine.normalize(Vec::new());
        engine
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command<T>) -> Vec<Event> {
        match command {
            Command::PointerDown { x, at } => self.pointer_down(x, at),
            Command::PointerMove { x, at } => self.pointer_move(x, at),
            Command::PointerUp { at } => self.pointer_up(at),
            Command::Tick { at } => self.tick(at),
            Command::AnimationFinished { animation, at } => self.animation_finished(animation, at),
            Command::DetailThumbnailsReady {
                request,
                thumbnails,
            } => {
                self.detail.accept(request, thumbnails);
                Vec::new()
            }
            Command::SetThumbnails(thumbnails) => {
                self.thumbnails = thumbnails;
                Vec::new()
            }
            Command::SetDuration { duration } => self.set_duration(duration),
            Command::SetTrackWidth { width } => {
                self.geometry.width = width;
                Vec::new()
            }
            Command::ReplaceSegments(segments) => self.replace_segments(segments),
            Command::ImportShots(scenes) => self.import_shots(&scenes),
            Command::InsertSegment { start, end } => self.insert_segment(start, end),
            Command::ToggleActive { index } => self.toggle_active(index),
        }
    }

    /// Begins a drag of `target` without press resolution.
    ///
    /// Ignored while a collapse animation plays. A pending merge fade is
    /// completed first.
    pub fn start_drag(&mut self, target: DragTarget, x: f64, at: Duration) -> Vec<Event> {
        if self.commit.is_animating() {
            warn!(x, "press ignored during collapse animation");
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(next) = self.commit.flush(&self.store) {
            self.publish(next, &mut events);
        }
        self.end_gesture(&mut events);

        match target {
            DragTarget::Playhead => {
                self.gesture = Gesture::Scrubbing;
                events.push(Event::ScrubStarted);
                events.push(Event::Seek {
                    time: self.geometry.clamp_time(self.geometry.px_to_time(x)),
                });
            }
            DragTarget::Shared {
                left,
                right,
                press_x,
            } => {
                debug!(left, right, press_x, "shared handle pressed");
                self.gesture = Gesture::Shared {
                    left,
                    right,
                    press_x,
                };
                events.push(Event::ScrubStarted);
            }
            DragTarget::StartHandle(_) | DragTarget::EndHandle(_) => {
                let Some(handle) = target.handle() else {
                    return events;
                };
                let Some(time) = self.boundary_time(handle) else {
                    warn!(segment = handle.segment, "drag of missing segment ignored");
                    return events;
                };
                self.begin_handle_drag(handle, at);
                events.push(Event::ScrubStarted);
                events.push(Event::Seek { time });
            }
        }
        events
    }

    /// Immutable render model at `now`.
    pub fn view(&self, now: Duration) -> TimelineView<'_, T> {
        let intent = self.intent().copied();
        let phase = self.commit.phase();
        let detail = self.detail_mode().map(|mode| DetailView {
            window: mode.window(),
            handle_time: mode.handle_time,
            handle_x: self
                .geometry
                .time_to_px_in(mode.handle_time, mode.view_start, mode.view_end),
            segment: mode.segment,
            edge: mode.edge,
            thumbnails: self.detail.thumbnails(),
        });
        TimelineView {
            geometry: self.geometry,
            segments: layout_strips(&self.store, &self.geometry, phase, now),
            blends: blend_scores(&self.store, &self.geometry, self.config.handle_width_px),
            intent,
            carpet: carpet_for(intent.as_ref(), phase, now),
            collapsing: self.commit.collapse().map(|collapse| collapse.kind),
            detail,
            thumbnails: &self.thumbnails,
            scrubbing: !matches!(self.gesture, Gesture::Idle),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn intent(&self) -> Option<&Intent> {
        match &self.gesture {
            Gesture::Handle(HandleDrag {
                mode: DragMode::Overshoot(intent),
                ..
            }) => Some(intent),
            _ => None,
        }
    }

    pub fn detail_mode(&self) -> Option<&DetailMode> {
        match &self.gesture {
            Gesture::Handle(HandleDrag {
                mode: DragMode::Detail(mode),
                ..
            }) => Some(mode),
            _ => None,
        }
    }

    pub fn detail_thumbnails(&self) -> Option<&[T]> {
        self.detail.thumbnails()
    }

    pub fn commit_phase(&self) -> &CommitPhase {
        self.commit.phase()
    }

    pub fn collapse(&self) -> Option<&Collapse> {
        self.commit.collapse()
    }

    fn pointer_down(&mut self, x: f64, at: Duration) -> Vec<Event> {
        let target = resolve_press(&self.store, &self.geometry, x, &self.config);
        self.start_drag(target, x, at)
    }

    fn pointer_move(&mut self, x: f64, at: Duration) -> Vec<Event> {
        if self.commit.is_animating() {
            return Vec::new();
        }
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Scrubbing => vec![Event::Seek {
                time: self.geometry.clamp_time(self.geometry.px_to_time(x)),
            }],
            Gesture::Shared {
                left,
                right,
                press_x,
            } => {
                if (x - press_x).abs() <= self.config.shared_resolve_px {
                    return Vec::new();
                }
                let handle = if x > press_x {
                    HandleRef::start(right)
                } else {
                    HandleRef::end(left)
                };
                debug!(segment = handle.segment, edge = ?handle.edge, "shared handle resolved");
                let mut events = Vec::new();
                self.tear_down_detail(&mut events);
                self.begin_handle_drag(handle, at);
                events.extend(self.handle_move(x, at));
                events
            }
            Gesture::Handle(_) => self.handle_move(x, at),
        }
    }

    fn handle_move(&mut self, x: f64, at: Duration) -> Vec<Event> {
        let Gesture::Handle(drag) = self.gesture else {
            return Vec::new();
        };
        let handle = drag.handle;
        let segment_id = drag.segment_id;
        let mut events = Vec::new();

        if let DragMode::Detail(mode) = drag.mode {
            if mode.segment == handle.segment && mode.edge == handle.edge {
                let time = clamp_boundary(
                    &self.store,
                    self.geometry.duration,
                    handle,
                    self.geometry.px_to_time_in(x, mode.view_start, mode.view_end),
                    self.config.min_segment_len,
                );
                self.move_boundary(handle, segment_id, time, &mut events);
                events.push(Event::Seek { time });
                if let Gesture::Handle(HandleDrag {
                    mode: DragMode::Detail(mode),
                    ..
                }) = &mut self.gesture
                {
                    mode.handle_time = time;
                }
                return events;
            }
        }

        match classify_move(&self.store, &self.geometry, handle, x, &self.config) {
            MoveOutcome::Normal { time } => {
                if let DragMode::Overshoot(intent) = drag.mode {
                    debug!(segment_id = %segment_id, kind = intent_kind(&intent), "intent cleared");
                }
                self.detail.retire();
                self.set_mode(DragMode::Tracking { prefetched: None });
                self.move_boundary(handle, segment_id, time, &mut events);
                events.push(Event::Seek { time });
                self.arm_detail_timers(at);
            }
            MoveOutcome::SelfOvershoot(overshoot) => {
                let intent = Intent::Delete(DeleteIntent {
                    segment: handle.segment,
                    segment_id,
                    edge: handle.edge,
                    overshoot,
                });
                self.enter_intent(handle, segment_id, x, intent, at, &mut events);
            }
            MoveOutcome::NeighborOvershoot { target, overshoot } => {
                let Some(target_id) = self.store.get(target).map(|segment| segment.id) else {
                    return events;
                };
                let intent = Intent::Merge(MergeIntent {
                    segment: handle.segment,
                    segment_id,
                    target,
                    target_id,
                    edge: handle.edge,
                    overshoot,
                });
                self.enter_intent(handle, segment_id, x, intent, at, &mut events);
            }
        }
        events
    }

    fn enter_intent(
        &mut self,
        handle: HandleRef,
        segment_id: SegmentId,
        x: f64,
        intent: Intent,
        at: Duration,
        events: &mut Vec<Event>,
    ) {
        if self.intent().is_none() {
            debug!(segment_id = %segment_id, kind = intent_kind(&intent), "intent entered");
            self.scheduler.advance();
            self.tear_down_detail(events);
        }
        let time = clamp_boundary(
            &self.store,
            self.geometry.duration,
            handle,
            self.geometry.px_to_time(x),
            self.config.min_segment_len,
        );
        self.move_boundary(handle, segment_id, time, events);

        if !intent.overshoot().is_complete() {
            self.set_mode(DragMode::Overshoot(intent));
            return;
        }

        let kind = match intent {
            Intent::Delete(delete) => CollapseKind::Delete {
                segment: delete.segment_id,
            },
            Intent::Merge(merge) => CollapseKind::Merge {
                survivor: merge.segment_id,
                absorbed: merge.target_id,
            },
        };
        self.gesture = Gesture::Idle;
        self.scheduler.advance();
        events.push(self.begin_collapse(kind, true, &intent, at));
        events.push(Event::ScrubEnded);
    }

    fn pointer_up(&mut self, at: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => return events,
            Gesture::Scrubbing | Gesture::Shared { .. } => {}
            Gesture::Handle(drag) => {
                self.tear_down_detail(&mut events);
                if let DragMode::Overshoot(intent) = drag.mode {
                    let kind = match intent {
                        Intent::Delete(delete) => CollapseKind::Delete {
                            segment: delete.segment_id,
                        },
                        Intent::Merge(merge) => CollapseKind::Merge {
                            survivor: merge.segment_id,
                            absorbed: merge.target_id,
                        },
                    };
                    events.push(self.begin_collapse(kind, false, &intent, at));
                }
            }
        }
        self.scheduler.advance();
        events.push(Event::ScrubEnded);
        events
    }

    fn tick(&mut self, at: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(next) = self.commit.poll_fade(at, &self.store) {
            self.publish(next, &mut events);
        }
        for timer in self.scheduler.poll(at) {
            match timer {
                TimerKind::Prefetch => self.fire_prefetch(&mut events),
                TimerKind::Dwell => self.fire_dwell(&mut events),
            }
        }
        events
    }

    fn fire_prefetch(&mut self, events: &mut Vec<Event>) {
        let Gesture::Handle(HandleDrag {
            handle,
            mode: DragMode::Tracking { prefetched: None },
            ..
        }) = self.gesture
        else {
            return;
        };
        let Some(time) = self.boundary_time(handle) else {
            return;
        };
        let window = detail_window(time, self.geometry.duration);
        events.push(self.request_detail(window));
        self.set_mode(DragMode::Tracking {
            prefetched: Some(window),
        });
    }

    fn fire_dwell(&mut self, events: &mut Vec<Event>) {
        let Gesture::Handle(HandleDrag {
            handle,
            segment_id,
            mode: DragMode::Tracking { prefetched },
        }) = self.gesture
        else {
            return;
        };
        let Some(time) = self.boundary_time(handle) else {
            return;
        };
        let window = match prefetched {
            Some(window) => window,
            None => {
                let window = detail_window(time, self.geometry.duration);
                events.push(self.request_detail(window));
                window
            }
        };
        debug!(
            segment_id = %segment_id,
            edge = ?handle.edge,
            start = window.start,
            end = window.end,
            "detail view activated"
        );
        self.set_mode(DragMode::Detail(DetailMode {
            view_start: window.start,
            view_end: window.end,
            handle_time: time,
            segment: handle.segment,
            edge: handle.edge,
        }));
    }

    fn animation_finished(&mut self, animation: AnimationId, at: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(next) =
            self.commit
                .finish_animation(animation, at, &self.store, self.config.merge_fade())
        {
            self.publish(next, &mut events);
        }
        events
    }

    fn set_duration(&mut self, duration: f64) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(next) = self.commit.flush(&self.store) {
            self.store = next;
        }
        self.cancel_for_bulk_write(&mut events);
        self.geometry.duration = duration;
        let next = self.normalize(self.store.to_vec());
        debug!(duration, segment_count = next.len(), "duration changed");
        self.store = next;
        events.push(self.segments_changed());
        events
    }

    fn replace_segments(&mut self, segments: Vec<Segment>) -> Vec<Event> {
        let mut events = Vec::new();
        self.cancel_for_bulk_write(&mut events);
        self.store = self.normalize(segments);
        if let Some(max_id) = self.store.iter().map(|segment| segment.id.0).max() {
            self.next_segment_id = match (self.next_segment_id, max_id.checked_add(1)) {
                (Some(next), Some(after_max)) => Some(next.max(after_max)),
                _ => None,
            };
        }
        debug!(segment_count = self.store.len(), "segments replaced");
        events.push(self.segments_changed());
        events
    }

    fn import_shots(&mut self, scenes: &[SceneBoundary]) -> Vec<Event> {
        let mut events = Vec::new();
        self.cancel_for_bulk_write(&mut events);
        let segments = segments_from_scenes(scenes, || self.allocate_segment_id());
        if segments.len() < scenes.len() {
            warn!(
                scene_count = scenes.len(),
                segment_count = segments.len(),
                "segment ids exhausted, trailing shots dropped"
            );
        }
        self.store = self.normalize(segments);
        info!(
            scene_count = scenes.len(),
            segment_count = self.store.len(),
            "shots imported"
        );
        events.push(self.segments_changed());
        events
    }

    fn insert_segment(&mut self, start: f64, end: f64) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(next) = self.commit.flush(&self.store) {
            self.publish(next, &mut events);
        }
        self.end_gesture(&mut events);

        let Some(next_segment_id) = self.next_segment_id.map(SegmentId) else {
            warn!(start, end, "insert rejected: segment ids exhausted");
            return events;
        };
        let next = self.store.insert_sorted(
            Segment::new(next_segment_id, start, end),
            self.geometry.duration,
            self.config.min_segment_len,
        );
        if next == self.store {
            return events;
        }
        let allocated = self.allocate_segment_id();
        debug_assert_eq!(
            allocated,
            Some(next_segment_id),
            "allocated segment id diverged from the inserted segment id"
        );
        debug!(segment_id = %next_segment_id, start, end, "segment inserted");
        self.publish(next, &mut events);
        events
    }

    fn toggle_active(&mut self, index: usize) -> Vec<Event> {
        let mut events = Vec::new();
        let next = self.store.toggle_active(index);
        if next != self.store {
            debug!(index, "segment active toggled");
            self.publish(next, &mut events);
        }
        events
    }

    fn begin_handle_drag(&mut self, handle: HandleRef, at: Duration) {
        let Some(segment_id) = self.store.get(handle.segment).map(|segment| segment.id) else {
            return;
        };
        debug!(segment_id = %segment_id, edge = ?handle.edge, "handle drag started");
        self.gesture = Gesture::Handle(HandleDrag {
            handle,
            segment_id,
            mode: DragMode::Tracking { prefetched: None },
        });
        self.arm_detail_timers(at);
    }

    fn arm_detail_timers(&mut self, at: Duration) {
        self.scheduler.rearm(
            at,
            &[
                (TimerKind::Prefetch, self.config.prefetch_delay()),
                (TimerKind::Dwell, self.config.dwell_delay()),
            ],
        );
    }

    fn set_mode(&mut self, mode: DragMode) {
        if let Gesture::Handle(drag) = &mut self.gesture {
            drag.mode = mode;
        }
    }

    fn request_detail(&mut self, window: DetailWindow) -> Event {
        let request = self.detail.issue(window);
        Event::RequestDetailThumbnails {
            request,
            start: window.start,
            end: window.end,
        }
    }

    /// Cancels timers and drops detail state, leaving the gesture itself.
    fn tear_down_detail(&mut self, events: &mut Vec<Event>) {
        self.scheduler.advance();
        if let Gesture::Handle(drag) = &mut self.gesture {
            if !matches!(drag.mode, DragMode::Overshoot(_)) {
                drag.mode = DragMode::Tracking { prefetched: None };
            }
        }
        if self.detail.clear() {
            events.push(Event::ClearDetailThumbnails);
        }
    }

    /// Ends any gesture without committing an intent.
    fn end_gesture(&mut self, events: &mut Vec<Event>) {
        self.tear_down_detail(events);
        if !matches!(std::mem::take(&mut self.gesture), Gesture::Idle) {
            events.push(Event::ScrubEnded);
        }
    }

    fn cancel_for_bulk_write(&mut self, events: &mut Vec<Event>) {
        self.end_gesture(events);
        self.commit.cancel();
    }

    fn begin_collapse(
        &mut self,
        kind: CollapseKind,
        commit: bool,
        intent: &Intent,
        at: Duration,
    ) -> Event {
        let duration = self.config.collapse_duration();
        let animation = self.commit.begin(
            kind,
            commit,
            CarpetGeometry::from_overshoot(intent.overshoot()),
            at,
            duration,
        );
        Event::AnimationStarted {
            animation,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn move_boundary(
        &mut self,
        handle: HandleRef,
        segment_id: SegmentId,
        time: f64,
        events: &mut Vec<Event>,
    ) {
        let patch = match handle.edge {
            Edge::Start => SegmentPatch::start(time),
            Edge::End => SegmentPatch::end(time),
        };
        let next = self.store.update_one(handle.segment, patch);
        if next != self.store {
            debug!(segment_id = %segment_id, edge = ?handle.edge, time, "boundary moved");
            self.publish(next, events);
        }
    }

    fn boundary_time(&self, handle: HandleRef) -> Option<f64> {
        self.store.get(handle.segment).map(|segment| match handle.edge {
            Edge::Start => segment.start,
            Edge::End => segment.end,
        })
    }

    fn publish(&mut self, next: SegmentStore, events: &mut Vec<Event>) {
        self.store = next;
        events.push(self.segments_changed());
    }

    fn segments_changed(&self) -> Event {
        Event::SegmentsChanged {
            segments: self.store.to_vec(),
        }
    }

    /// Normalises `segments`, seeding one full-duration segment when nothing
    /// survives on a positive duration.
    fn normalize(&mut self, segments: Vec<Segment>) -> SegmentStore {
        let store = SegmentStore::replace_all(
            segments,
            self.geometry.duration,
            self.config.min_segment_len,
        );
        if !store.is_empty() {
            return store;
        }
        if !(self.geometry.duration.is_finite() && self.geometry.duration > 0.0) {
            return store;
        }
        match self.allocate_segment_id() {
            Some(id) => SegmentStore::full_duration(id, self.geometry.duration),
            None => {
                warn!("segment ids exhausted, store left empty");
                store
            }
        }
    }

    /// Hands out the next segment id, or `None` once ids are exhausted.
    fn allocate_segment_id(&mut self) -> Option<SegmentId> {
        let id = self.next_segment_id?;
        self.next_segment_id = id.checked_add(1);
        Some(SegmentId(id))
    }
}

fn intent_kind(intent: &Intent) -> &'static str {
    match intent {
        Intent::Delete(_) => "delete",
        Intent::Merge(_) => "merge",
    }
}
