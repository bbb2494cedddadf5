use launch_check_core::{TimerGeneration, TimerKind};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DueTimer {
    pub timer: TimerKind,
    pub generation: TimerGeneration,
    pub deadline: Instant,
}

/// Deadlines for the timers a check currently owns, at most one per kind.
#[derive(Debug, Default)]
pub(crate) struct TimerTable {
    slots: [Option<(TimerGeneration, Instant)>; 3],
}

fn index(timer: TimerKind) -> usize {
    match timer {
        TimerKind::Timeout => 0,
        TimerKind::FirstFrame => 1,
        TimerKind::InitGrace => 2,
    }
}

impl TimerTable {
    /// Replaces any deadline already held for `timer`.
    pub fn arm(&mut self, timer: TimerKind, generation: TimerGeneration, deadline: Instant) {
        self.slots[index(timer)] = Some((generation, deadline));
    }

    pub fn cancel(&mut self, timer: TimerKind) -> bool {
        self.slots[index(timer)].take().is_some()
    }

    pub fn clear(&mut self) {
        self.slots = [None; 3];
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Earliest deadline; on ties the timeout wins.
    pub fn next_due(&self) -> Option<DueTimer> {
        TimerKind::ALL
            .into_iter()
            .filter_map(|timer| {
                self.slots[index(timer)].map(|(generation, deadline)| DueTimer {
                    timer,
                    generation,
                    deadline,
                })
            })
            .min_by_key(|due| due.deadline)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn next_due_picks_earliest_deadline() {
        let now = Instant::now();
        let mut table = TimerTable::default();
        table.arm(TimerKind::Timeout, 1, now + Duration::from_secs(10));
        table.arm(TimerKind::FirstFrame, 2, now + Duration::from_millis(16));

        let due = table.next_due().expect("armed");
        assert_eq!(due.timer, TimerKind::FirstFrame);
        assert_eq!(due.generation, 2);

        assert!(table.cancel(TimerKind::FirstFrame));
        assert!(!table.cancel(TimerKind::FirstFrame));
        assert_eq!(table.next_due().map(|due| due.timer), Some(TimerKind::Timeout));
    }

    #[test]
    fn rearming_replaces_generation() {
        let now = Instant::now();
        let mut table = TimerTable::default();
        table.arm(TimerKind::FirstFrame, 2, now + Duration::from_millis(16));
        table.arm(TimerKind::FirstFrame, 5, now + Duration::from_millis(32));

        let due = table.next_due().expect("armed");
        assert_eq!(due.generation, 5);
        assert_eq!(due.deadline, now + Duration::from_millis(32));

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn ties_prefer_timeout() {
        let deadline = Instant::now() + Duration::from_millis(100);
        let mut table = TimerTable::default();
        table.arm(TimerKind::InitGrace, 3, deadline);
        table.arm(TimerKind::Timeout, 1, deadline);

        assert_eq!(table.next_due().map(|due| due.timer), Some(TimerKind::Timeout));
    }
}
