//! Timestamp-driven debounce for the query input path.
//!
//! The UI thread coalesces keystrokes before posting QUERY_REQUEST messages.
//! `Debouncer` holds the schedule only; the caller supplies every timestamp
//! and owns the timer, so the logic is deterministic and runs under native
//! tests without a clock. `on_call` reports whether the action should run at
//! the moment of the call (leading edge, overdue trailing edge, or max-wait
//! bound); `on_tick` reports whether a quiet period has elapsed and the
//! coalesced trailing run is due.

use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceConfig {
    /// Quiet period that must elapse after the last call.
    pub wait_ms: f64,
    /// Run on the first call of a fresh window.
    pub leading: bool,
    /// Run once the window goes quiet.
    pub trailing: bool,
    /// Upper bound on how long a busy window may defer the trailing run.
    pub max_wait_ms: Option<f64>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        DebounceConfig {
            wait_ms: 200.0,
            leading: false,
            trailing: true,
            max_wait_ms: None,
        }
    }
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct Debouncer {
    config: DebounceConfig,
    /// First call of the active window; `None` while idle.
    window_start: Option<f64>,
    last_call: Option<f64>,
    /// A trailing run is owed for the active window.
    pending: bool,
}

#[wasm_bindgen]
impl Debouncer {
    #[wasm_bindgen(constructor)]
    pub fn new(wait_ms: f64, leading: bool, trailing: bool, max_wait_ms: Option<f64>) -> Debouncer {
        Debouncer::from_config(DebounceConfig {
            wait_ms,
            leading,
            trailing,
            max_wait_ms,
        })
    }

    /// Records a call at `now_ms`. True means the action runs now.
    #[wasm_bindgen(js_name = onCall)]
    pub fn on_call(&mut self, now_ms: f64) -> bool {
        // A window whose quiet period already passed settles lazily: no tick
        // arrived, so any owed trailing run fires with this call instead.
        let mut overdue = false;
        if self.in_window() && self.quiescent(now_ms) {
            overdue = self.pending;
            self.close();
        }

        if !self.in_window() {
            self.window_start = Some(now_ms);
            self.last_call = Some(now_ms);
            if self.config.leading {
                self.pending = false;
                return true;
            }
            self.pending = self.config.trailing;
            return overdue;
        }

        self.last_call = Some(now_ms);
        if self.config.trailing {
            self.pending = true;
        }
        if let (Some(max_wait), Some(start)) = (self.config.max_wait_ms, self.window_start) {
            if self.pending && now_ms - start >= max_wait {
                self.pending = false;
                self.window_start = Some(now_ms);
                return true;
            }
        }
        false
    }

    /// Checks the schedule at `now_ms`. True means the quiet period elapsed
    /// and the owed trailing run fires now; the window closes either way.
    #[wasm_bindgen(js_name = onTick)]
    pub fn on_tick(&mut self, now_ms: f64) -> bool {
        if !self.in_window() || !self.quiescent(now_ms) {
            return false;
        }
        let fire = self.pending;
        self.close();
        fire
    }

    /// Next timestamp worth ticking at, if a window is open.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        let start = self.window_start?;
        let last = self.last_call.unwrap_or(start);
        let mut deadline = last + self.config.wait_ms;
        if let (true, Some(max_wait)) = (self.pending, self.config.max_wait_ms) {
            deadline = deadline.min(start + max_wait);
        }
        Some(deadline)
    }

    pub fn reset(&mut self) {
        self.close();
    }
}

impl Debouncer {
    pub fn from_config(config: DebounceConfig) -> Self {
        Debouncer {
            config,
            window_start: None,
            last_call: None,
            pending: false,
        }
    }

    fn in_window(&self) -> bool {
        self.window_start.is_some()
    }

    fn quiescent(&self, now_ms: f64) -> bool {
        match self.last_call {
            Some(last) => now_ms - last >= self.config.wait_ms,
            None => true,
        }
    }

    fn close(&mut self) {
        self.window_start = None;
        self.last_call = None;
        self.pending = false;
    }
}
