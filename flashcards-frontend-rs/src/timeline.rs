//! Delayed work for the session.
//!
//! Nothing here touches a real clock. The host reports the current time (in milliseconds, on any
//! monotonic scale) and the timeline hands back whatever has come due. That keeps every delay in the
//! game cancellable and lets tests step time explicitly.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle for cancelling a scheduled task
    pub struct TimerKey;
}

#[derive(Debug)]
struct Entry<T> {
    due_ms: f64,
    // breaks ties between entries due at the same instant, in scheduling order
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct Timeline<T> {
    now_ms: f64,
    next_seq: u64,
    entries: SlotMap<TimerKey, Entry<T>>,
}

impl<T> Timeline<T> {
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms,
            next_seq: 0,
            entries: SlotMap::with_key(),
        }
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Schedules `task` to come due `delay_ms` after the timeline's current time.
    pub fn schedule(&mut self, delay_ms: f64, task: T) -> TimerKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(Entry {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            task,
        })
    }

    /// Returns the task if it was still pending.
    pub fn cancel(&mut self, key: TimerKey) -> Option<T> {
        self.entries.remove(key).map(|entry| entry.task)
    }

    /// Cancels every pending task matching `predicate`, returning how many were removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !predicate(&entry.task));
        before - self.entries.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The earliest deadline of any pending task.
    pub fn next_deadline(&self) -> Option<f64> {
        self.earliest().map(|(_, entry)| entry.due_ms)
    }

    /// Removes and returns the earliest task due at or before `now_ms`.
    ///
    /// The timeline's clock moves to that task's deadline, so anything the task schedules is measured from
    /// when it was due rather than from when the host got around to reporting the time. Once nothing is
    /// due, the clock moves to `now_ms` (it never goes backwards).
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerKey, T)> {
        let due = self
            .earliest()
            .filter(|(_, entry)| entry.due_ms <= now_ms)
            .map(|(key, _)| key);

        match due {
            Some(key) => {
                let entry = self.entries.remove(key)?;
                self.now_ms = self.now_ms.max(entry.due_ms);
                Some((key, entry.task))
            }
            None => {
                self.now_ms = self.now_ms.max(now_ms);
                None
            }
        }
    }

    fn earliest(&self) -> Option<(TimerKey, &Entry<T>)> {
        self.entries.iter().min_by(|(_, a), (_, b)| {
            a.due_ms
                .total_cmp(&b.due_ms)
                .then_with(|| a.seq.cmp(&b.seq))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timeline: &mut Timeline<&'static str>, now_ms: f64) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some((_, task)) = timeline.pop_due(now_ms) {
            fired.push(task);
        }
        fired
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timeline = Timeline::new(0.0);
        timeline.schedule(2000.0, "advance");
        timeline.schedule(500.0, "clear");
        timeline.schedule(1500.0, "fade");

        assert_eq!(timeline.next_deadline(), Some(500.0));
        assert_eq!(drain(&mut timeline, 1600.0), vec!["clear", "fade"]);
        assert_eq!(timeline.now(), 1600.0);
        assert_eq!(drain(&mut timeline, 5000.0), vec!["advance"]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut timeline = Timeline::new(0.0);
        timeline.schedule(100.0, "first");
        timeline.schedule(100.0, "second");
        timeline.schedule(100.0, "third");
        assert_eq!(drain(&mut timeline, 100.0), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_nothing_due_early() {
        let mut timeline = Timeline::new(0.0);
        timeline.schedule(1000.0, "prompt");
        assert!(timeline.pop_due(999.0).is_none());
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_chained_delay_measured_from_deadline() {
        let mut timeline = Timeline::new(0.0);
        timeline.schedule(1500.0, "fade");

        // the host reports time late
        let (_, task) = timeline.pop_due(1900.0).unwrap();
        assert_eq!(task, "fade");
        assert_eq!(timeline.now(), 1500.0);

        timeline.schedule(500.0, "clear");
        assert_eq!(timeline.next_deadline(), Some(2000.0));
        assert_eq!(drain(&mut timeline, 1900.0), Vec::<&str>::new());
        assert_eq!(drain(&mut timeline, 2000.0), vec!["clear"]);
    }

    #[test]
    fn test_cancel() {
        let mut timeline = Timeline::new(0.0);
        let prompt = timeline.schedule(1000.0, "prompt");
        timeline.schedule(5000.0, "new set");

        assert_eq!(timeline.cancel(prompt), Some("prompt"));
        assert_eq!(timeline.cancel(prompt), None);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.next_deadline(), Some(5000.0));

        assert_eq!(drain(&mut timeline, 10_000.0), vec!["new set"]);
    }

    #[test]
    fn test_cancel_where_and_all() {
        let mut timeline = Timeline::new(0.0);
        timeline.schedule(1000.0, "prompt");
        timeline.schedule(2000.0, "listen");
        timeline.schedule(5000.0, "new set");

        assert_eq!(timeline.cancel_where(|task| *task != "new set"), 2);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.cancel_all(), 1);
        assert_eq!(timeline.next_deadline(), None);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut timeline: Timeline<&str> = Timeline::new(100.0);
        assert!(timeline.pop_due(50.0).is_none());
        assert_eq!(timeline.now(), 100.0);
    }
}
