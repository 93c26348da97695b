use std::time::SystemTime;

/// Tracks when the user started and stopped writing.
///
/// `start` is set once, on the first stroke's begin event, and only cleared
/// when the committed history becomes empty again. `end` follows the latest
/// stroke-end event.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionTimer {
    start: Option<SystemTime>,
    end: Option<SystemTime>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.start
    }

    pub fn ended_at(&self) -> Option<SystemTime> {
        self.end
    }

    pub fn on_stroke_begin(&mut self) {
        self.on_stroke_begin_at(SystemTime::now());
    }

    pub fn on_stroke_begin_at(&mut self, now: SystemTime) {
        if self.start.is_none() {
            self.start = Some(now);
        }
    }

    pub fn on_stroke_end(&mut self) {
        self.on_stroke_end_at(SystemTime::now());
    }

    pub fn on_stroke_end_at(&mut self, now: SystemTime) {
        self.end = Some(now);
    }

    /// The canvas is blank again; the next stroke starts a new session.
    pub fn on_history_empty(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Elapsed writing time in minutes, or `None` while either timestamp is
    /// unset (or the clock went backwards between them).
    pub fn elapsed_minutes(&self) -> Option<f64> {
        let start = self.start?;
        let end = self.end?;
        let elapsed = end.duration_since(start).ok()?;
        Some(elapsed.as_secs_f64() / 60.0)
    }
}
