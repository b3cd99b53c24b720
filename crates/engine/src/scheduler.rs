use std::time::Duration;

/// Timers owned by the detail magnifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Prefetch,
    Dwell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask {
    kind: TimerKind,
    due: Duration,
    generation: u64,
}

/// Cancellable one-shot timers keyed by a gesture generation.
///
/// Tasks remember the generation they were scheduled in. [`Scheduler::advance`]
/// moves to a new generation, after which older tasks never fire, so no
/// individual cancellation is needed on any path that ends or redirects a
/// drag.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use trimline_engine::scheduler::{Scheduler, TimerKind};
///
/// let mut scheduler = Scheduler::default();
/// scheduler.schedule(TimerKind::Dwell, Duration::from_millis(600));
/// scheduler.advance();
/// assert!(scheduler.poll(Duration::from_secs(1)).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new generation and drops every pending task.
    pub fn advance(&mut self) -> u64 {
        self.generation += 1;
        self.tasks.clear();
        self.generation
    }

    /// Schedules `kind` to fire at `due` in the current generation.
    pub fn schedule(&mut self, kind: TimerKind, due: Duration) {
        self.tasks.push(ScheduledTask {
            kind,
            due,
            generation: self.generation,
        });
    }

    /// Invalidates pending tasks and schedules a fresh set relative to `now`.
    pub fn rearm(&mut self, now: Duration, timers: &[(TimerKind, Duration)]) {
        self.advance();
        for (kind, delay) in timers {
            self.schedule(*kind, now + *delay);
        }
    }

    /// Returns the tasks due at `now`, earliest first, and drops them.
    pub fn poll(&mut self, now: Duration) -> Vec<TimerKind> {
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|task| {
            if task.due <= now {
                due.push(*task);
                return false;
            }
            true
        });
        due.sort_by_key(|task| task.due);
        due.into_iter().map(|task| task.kind).collect()
    }

    /// Number of live tasks in the current generation.
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.generation == self.generation)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Scheduler, TimerKind};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn poll_fires_due_tasks_in_due_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(TimerKind::Dwell, ms(600));
        scheduler.schedule(TimerKind::Prefetch, ms(200));

        assert!(scheduler.poll(ms(199)).is_empty());
        assert_eq!(
            scheduler.poll(ms(600)),
            vec![TimerKind::Prefetch, TimerKind::Dwell]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn tasks_fire_once() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(TimerKind::Prefetch, ms(200));

        assert_eq!(scheduler.poll(ms(250)), vec![TimerKind::Prefetch]);
        assert!(scheduler.poll(ms(300)).is_empty());
    }

    #[test]
    fn rearm_discards_previous_generation() {
        let mut scheduler = Scheduler::default();
        scheduler.rearm(
            ms(0),
            &[(TimerKind::Prefetch, ms(200)), (TimerKind::Dwell, ms(600))],
        );
        scheduler.rearm(
            ms(300),
            &[(TimerKind::Prefetch, ms(200)), (TimerKind::Dwell, ms(600))],
        );

        assert!(scheduler.poll(ms(450)).is_empty());
        assert_eq!(scheduler.poll(ms(500)), vec![TimerKind::Prefetch]);
        assert!(scheduler.poll(ms(899)).is_empty());
        assert_eq!(scheduler.poll(ms(900)), vec![TimerKind::Dwell]);
    }

    #[test]
    fn repeated_rearm_keeps_only_the_latest_pair() {
        let mut scheduler = Scheduler::default();
        for step in 0..10 {
            scheduler.rearm(
                ms(step * 16),
                &[(TimerKind::Prefetch, ms(200)), (TimerKind::Dwell, ms(600))],
            );
        }

        assert_eq!(scheduler.tasks.len(), 2);
        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn advance_cancels_without_touching_future_schedules() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(TimerKind::Dwell, ms(600));
        let generation = scheduler.advance();
        scheduler.schedule(TimerKind::Prefetch, ms(700));

        assert_eq!(scheduler.generation(), generation);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.poll(ms(700)), vec![TimerKind::Prefetch]);
    }
}
