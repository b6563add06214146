//! Tick scheduling and the Idle → Running → Stopped lifecycle
//!
//! A [`TickSource`] hands out one-shot callbacks identified by [`TickId`].
//! The loop keeps at most one outstanding and reschedules after every tick
//! it accepts. Stopping cancels the outstanding callback at the source, and
//! any id that is not the one currently pending is ignored, so no tick can
//! run after `stop()` even if the host delivers a late callback.

/// Handle of one scheduled tick callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Host refresh signal: one-shot, cancellable callbacks
pub trait TickSource {
    /// Request a single callback on the next refresh
    fn schedule(&mut self) -> TickId;

    /// Cancel a callback that has not fired yet; unknown ids are ignored
    fn cancel(&mut self, id: TickId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Lifecycle and pending-tick bookkeeping for one scene
#[derive(Debug)]
pub struct RenderLoop<T: TickSource> {
    ticker: T,
    state: LoopState,
    pending: Option<TickId>,
}

impl<T: TickSource> RenderLoop<T> {
    pub fn new(ticker: T) -> Self {
        Self {
            ticker,
            state: LoopState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Id of the callback currently outstanding, if any
    pub fn pending(&self) -> Option<TickId> {
        self.pending
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    /// Idle/Stopped → Running and schedule the first tick.
    /// Returns false (and does nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        self.state = LoopState::Running;
        self.pending = Some(self.ticker.schedule());
        true
    }

    /// Running → Stopped, cancelling the outstanding callback.
    /// Returns false (and does nothing) when not running.
    pub fn stop(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.state = LoopState::Stopped;
        if let Some(id) = self.pending.take() {
            self.ticker.cancel(id);
        }
        true
    }

    /// Accept a fired callback. Only the pending id is accepted, and only
    /// while running; the caller runs the tick body on `true` and then calls
    /// [`Self::reschedule`].
    pub fn accept(&mut self, id: TickId) -> bool {
        if self.state != LoopState::Running || self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Schedule the next tick after an accepted one
    pub fn reschedule(&mut self) {
        if self.state == LoopState::Running && self.pending.is_none() {
            self.pending = Some(self.ticker.schedule());
        }
    }
}

/// Fake clock for headless runs and tests: callbacks fire only when the
/// driver says so
#[derive(Debug, Default)]
pub struct ManualTicker {
    next_id: u64,
    scheduled: Vec<TickId>,
    cancelled: u64,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks scheduled and neither fired nor cancelled
    pub fn outstanding(&self) -> usize {
        self.scheduled.len()
    }

    /// Total cancellations seen
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Pop the oldest outstanding callback as if the host had fired it
    pub fn fire_next(&mut self) -> Option<TickId> {
        if self.scheduled.is_empty() {
            return None;
        }
        Some(self.scheduled.remove(0))
    }
}

impl TickSource for ManualTicker {
    fn schedule(&mut self) -> TickId {
        let id = TickId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.scheduled.push(id);
        id
    }

    fn cancel(&mut self, id: TickId) {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| *s != id);
        if self.scheduled.len() != before {
            self.cancelled += 1;
        }
    }
}
