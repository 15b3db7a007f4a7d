//! Work coalescing for high-frequency browser events.
//!
//! Scroll events are folded into at most one recomputation per animation
//! frame; resize events are debounced behind a quiet window.

/// Folds any number of scroll events into a single pending frame.
#[derive(Debug, Default, Clone)]
pub struct FrameThrottle {
    ticking: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that work is needed. Returns `true` when the caller must
    /// schedule a frame callback; `false` when one is already pending.
    pub fn request(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    /// Called from the frame callback before doing the work.
    pub fn complete(&mut self) {
        self.ticking = false;
    }

    pub fn is_pending(&self) -> bool {
        self.ticking
    }
}

/// Identifies one resize timer. Only the most recently issued ticket fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTicket {
    generation: u64,
    /// How long the host should wait before calling back.
    pub wait_ms: u32,
}

/// Trailing-edge debounce for timer-driven hosts.
///
/// Each trigger supersedes the previous one; the host arms a timer per
/// ticket and hands the ticket back when the timer fires. Stale tickets
/// are ignored, so a burst of triggers produces exactly one firing after
/// the last of them.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait_ms: u32,
    generation: u64,
    armed: bool,
}

impl Debounce {
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            generation: 0,
            armed: false,
        }
    }

    pub fn trigger(&mut self) -> ResizeTicket {
        self.generation += 1;
        self.armed = true;
        ResizeTicket {
            generation: self.generation,
            wait_ms: self.wait_ms,
        }
    }

    /// Returns `true` exactly once, for the latest ticket.
    pub fn fire(&mut self, ticket: ResizeTicket) -> bool {
        if !self.armed || ticket.generation != self.generation {
            return false;
        }
        self.armed = false;
        true
    }

    /// Drop any pending firing.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    pub fn is_pending(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_coalesces_until_frame_runs() {
        let mut t = FrameThrottle::new();
        assert!(t.request());
        assert!(!t.request());
        assert!(!t.request());
        t.complete();
        assert!(!t.is_pending());
        assert!(t.request());
    }

    #[test]
    fn burst_of_triggers_fires_once() {
        let mut d = Debounce::new(250);
        let first = d.trigger();
        let second = d.trigger();
        let last = d.trigger();
        assert_eq!(last.wait_ms, 250);
        assert!(!d.fire(first));
        assert!(!d.fire(second));
        assert!(d.fire(last));
        assert!(!d.fire(last));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_invalidates_outstanding_ticket() {
        let mut d = Debounce::new(250);
        let ticket = d.trigger();
        d.cancel();
        assert!(!d.fire(ticket));
    }
}
