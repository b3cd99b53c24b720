use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::drag::OvershootGeometry;
use crate::timeline::{SegmentId, SegmentPatch, SegmentStore};

/// Identifies one collapse animation for its completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(pub u64);

/// Back ease-out over a progress value in `0.0..=1.0`: overshoots the end
/// value slightly before settling.
pub fn back_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    let t_minus_1 = t - 1.0;
    1.0 + c3 * t_minus_1 * t_minus_1 * t_minus_1 + c1 * t_minus_1 * t_minus_1
}

/// The "carpet" drawn across an overshoot region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarpetGeometry {
    pub left_px: f64,
    pub width_px: f64,
    pub opacity: f64,
}

impl CarpetGeometry {
    pub fn from_overshoot(overshoot: &OvershootGeometry) -> Self {
        Self {
            left_px: overshoot.anchor_px.min(overshoot.cursor_px),
            width_px: (overshoot.cursor_px - overshoot.anchor_px).abs(),
            opacity: 1.0,
        }
    }
}

/// Store mutation a collapse leads to when it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseKind {
    Delete { segment: SegmentId },
    Merge { survivor: SegmentId, absorbed: SegmentId },
}

/// Collapse animation of an intent's carpet, committing or snapping back.
#[derive(Debug, Clone, PartialEq)]
pub struct Collapse {
    pub id: AnimationId,
    pub kind: CollapseKind,
    /// Mutate the store once the animation finishes.
    pub commit: bool,
    pub started_at: Duration,
    pub duration: Duration,
    pub from: CarpetGeometry,
}

impl Collapse {
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// True once the host may report completion for this animation.
    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.duration
    }

    /// Carpet frame at `now`, shrinking towards the anchor side.
    pub fn sample(&self, now: Duration) -> CarpetGeometry {
        let eased = back_out(self.progress(now));
        let remaining = (1.0 - eased).max(0.0);
        CarpetGeometry {
            left_px: self.from.left_px,
            width_px: self.from.width_px * remaining,
            opacity: (self.from.opacity * remaining).clamp(0.0, 1.0),
        }
    }
}

/// Second merge phase: the absorbed segment fades out over the survivor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeFade {
    pub survivor: SegmentId,
    pub absorbed: SegmentId,
    pub started_at: Duration,
    pub until: Duration,
}

impl MergeFade {
    pub fn opacity(&self, now: Duration) -> f64 {
        let total = self.until.saturating_sub(self.started_at);
        if total.is_zero() {
            return 0.0;
        }
        let remaining = self.until.saturating_sub(now);
        (remaining.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Where the commit flow currently is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommitPhase {
    #[default]
    Idle,
    Animating(Collapse),
    Committing(MergeFade),
}

/// Two-phase commit of delete and merge intents.
///
/// A collapse always runs to its completion signal, whether it commits or
/// snaps back, so intent and feedback state end deterministically.
#[derive(Debug, Default)]
pub struct CommitEngine {
    phase: CommitPhase,
    next_animation: u64,
}

impl CommitEngine {
    pub fn phase(&self) -> &CommitPhase {
        &self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, CommitPhase::Animating(_))
    }

    pub fn collapse(&self) -> Option<&Collapse> {
        match &self.phase {
            CommitPhase::Animating(collapse) => Some(collapse),
            _ => None,
        }
    }

    /// Starts a collapse animation. Any previous phase is replaced, so the
    /// caller flushes a pending merge fade first.
    pub fn begin(
        &mut self,
        kind: CollapseKind,
        commit: bool,
        from: CarpetGeometry,
        now: Duration,
        duration: Duration,
    ) -> AnimationId {
        self.next_animation += 1;
        let id = AnimationId(self.next_animation);
        debug!(animation = id.0, ?kind, commit, "collapse animation started");
        self.phase = CommitPhase::Animating(Collapse {
            id,
            kind,
            commit,
            started_at: now,
            duration,
            from,
        });
        id
    }

    /// Handles the completion signal of `animation`.
    ///
    /// Returns the store to publish, if the completion mutates it. A merge
    /// only expands the survivor here and moves to the fade phase; the
    /// absorbed segment is removed by [`CommitEngine::poll_fade`].
    pub fn finish_animation(
        &mut self,
        animation: AnimationId,
        at: Duration,
        store: &SegmentStore,
        merge_fade: Duration,
    ) -> Option<SegmentStore> {
        let CommitPhase::Animating(collapse) = &self.phase else {
            warn!(animation = animation.0, "animation finished while no collapse is running");
            return None;
        };
        if collapse.id != animation {
            warn!(
                animation = animation.0,
                running = collapse.id.0,
                "stale animation completion ignored"
            );
            return None;
        }
        let kind = collapse.kind;
        let commit = collapse.commit;
        self.phase = CommitPhase::Idle;

        if !commit {
            debug!(animation = animation.0, "snap back finished");
            return None;
        }

        match kind {
            CollapseKind::Delete { segment } => {
                if store.len() <= 1 {
                    warn!(segment_id = %segment, "delete skipped: last remaining segment");
                    return None;
                }
                let next = store.remove_one(|candidate| candidate.id == segment);
                info!(
                    segment_id = %segment,
                    segment_count = next.len(),
                    "delete committed"
                );
                Some(next)
            }
            CollapseKind::Merge { survivor, absorbed } => {
                let (Some(survivor_index), Some(absorbed_index)) =
                    (store.position(survivor), store.position(absorbed))
                else {
                    warn!(
                        survivor = %survivor,
                        absorbed = %absorbed,
                        "merge skipped: segment missing"
                    );
                    return None;
                };
                let kept = &store.segments()[survivor_index];
                let gone = &store.segments()[absorbed_index];
                let next = store.update_one(
                    survivor_index,
                    SegmentPatch::bounds(kept.start.min(gone.start), kept.end.max(gone.end)),
                );
                debug!(survivor = %survivor, absorbed = %absorbed, "merge survivor expanded");
                self.phase = CommitPhase::Committing(MergeFade {
                    survivor,
                    absorbed,
                    started_at: at,
                    until: at + merge_fade,
                });
                Some(next)
            }
        }
    }

    /// Finishes a merge whose fade deadline has passed.
    pub fn poll_fade(&mut self, now: Duration, store: &SegmentStore) -> Option<SegmentStore> {
        match &self.phase {
            CommitPhase::Committing(fade) if now >= fade.until => self.flush(store),
            _ => None,
        }
    }

    /// Completes a pending merge fade immediately.
    pub fn flush(&mut self, store: &SegmentStore) -> Option<SegmentStore> {
        let CommitPhase::Committing(fade) = self.phase else {
            return None;
        };
        self.phase = CommitPhase::Idle;
        let next = store.remove_one(|candidate| candidate.id == fade.absorbed);
        info!(
            survivor = %fade.survivor,
            absorbed = %fade.absorbed,
            segment_count = next.len(),
            "merge committed"
        );
        Some(next)
    }

    /// Drops any animation or fade without mutating the store.
    pub fn cancel(&mut self) {
        if !matches!(self.phase, CommitPhase::Idle) {
            debug!("commit flow cancelled");
        }
        self.phase = CommitPhase::Idle;
    }
}
