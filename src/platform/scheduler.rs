//! Cooperative frame and timeout scheduler
//!
//! Stands in for `requestAnimationFrame` / `setTimeout`. Callers keep the
//! returned [`StepHandle`]s and the host drains due work once per frame, so
//! tests can advance a fake clock and run frames synchronously.

/// Handle to a pending frame request or timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepHandle(u64);

#[derive(Debug, Clone)]
struct Timeout<T> {
    handle: StepHandle,
    due_ms: f64,
    task: T,
}

/// Pending frame requests and timeouts, keyed by handle
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    frames: Vec<(StepHandle, T)>,
    timeouts: Vec<Timeout<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            frames: Vec::new(),
            timeouts: Vec::new(),
        }
    }

    fn allocate(&mut self) -> StepHandle {
        let handle = StepHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Run `task` on the next frame
    pub fn request_frame(&mut self, task: T) -> StepHandle {
        let handle = self.allocate();
        self.frames.push((handle, task));
        handle
    }

    /// Run `task` once `delay_ms` has elapsed after `now_ms`
    pub fn set_timeout(&mut self, task: T, now_ms: f64, delay_ms: f64) -> StepHandle {
        let handle = self.allocate();
        self.timeouts.push(Timeout {
            handle,
            due_ms: now_ms + delay_ms.max(0.0),
            task,
        });
        handle
    }

    /// Cancel a pending request. Unknown or already fired handles are ignored,
    /// so cancelling twice is safe. Returns whether anything was removed.
    pub fn cancel(&mut self, handle: StepHandle) -> bool {
        let before = self.frames.len() + self.timeouts.len();
        self.frames.retain(|(h, _)| *h != handle);
        self.timeouts.retain(|t| t.handle != handle);
        before != self.frames.len() + self.timeouts.len()
    }

    /// Cancel the handle stored in `slot` (if any) and clear it
    pub fn cancel_slot(&mut self, slot: &mut Option<StepHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    /// Take every frame request queued so far, in request order.
    /// Requests made while running these land on the following frame.
    pub fn take_frames(&mut self) -> Vec<(StepHandle, T)> {
        std::mem::take(&mut self.frames)
    }

    /// Take the timeouts due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(StepHandle, T)> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.timeouts.len());
        for timeout in self.timeouts.drain(..) {
            if timeout.due_ms <= now_ms {
                due.push(timeout);
            } else {
                pending.push(timeout);
            }
        }
        self.timeouts = pending;
        due.sort_by(|a, b| {
            a.due_ms
                .partial_cmp(&b.due_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.handle.0.cmp(&b.handle.0))
        });
        due.into_iter().map(|t| (t.handle, t.task)).collect()
    }

    pub fn is_pending(&self, handle: StepHandle) -> bool {
        self.frames.iter().any(|(h, _)| *h == handle)
            || self.timeouts.iter().any(|t| t.handle == handle)
    }

    pub fn has_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Earliest pending timeout
    pub fn next_deadline(&self) -> Option<f64> {
        self.timeouts
            .iter()
            .map(|t| t.due_ms)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.timeouts.is_empty()
    }

    /// Drop everything (teardown)
    pub fn clear(&mut self) {
        self.frames.clear();
        self.timeouts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_run_once() {
        let mut sched = Scheduler::new();
        sched.request_frame("a");
        sched.request_frame("b");
        let frames: Vec<_> = sched.take_frames().into_iter().map(|(_, t)| t).collect();
        assert_eq!(frames, vec!["a", "b"]);
        assert!(sched.take_frames().is_empty());
    }

    #[test]
    fn test_timeouts_fire_in_due_order() {
        let mut sched = Scheduler::new();
        sched.set_timeout("late", 0.0, 200.0);
        sched.set_timeout("early", 0.0, 50.0);
        assert!(sched.take_due(10.0).is_empty());
        assert_eq!(sched.next_deadline(), Some(50.0));

        let due: Vec<_> = sched.take_due(250.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec!["early", "late"]);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_cancel_twice_is_safe() {
        let mut sched = Scheduler::new();
        let handle = sched.set_timeout((), 0.0, 10.0);
        assert!(sched.is_pending(handle));
        assert!(sched.cancel(handle));
        assert!(!sched.cancel(handle));
        assert!(sched.take_due(100.0).is_empty());
    }

    #[test]
    fn test_cancel_slot_clears_handle() {
        let mut sched = Scheduler::new();
        let mut slot = Some(sched.request_frame(1));
        sched.cancel_slot(&mut slot);
        assert!(slot.is_none());
        sched.cancel_slot(&mut slot);
        assert!(!sched.has_frames());
    }
}
