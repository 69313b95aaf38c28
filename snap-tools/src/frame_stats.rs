//! Rolling frame-time statistics

/// Number of samples kept in [`FrameTimeHistory`]
pub const FRAME_HISTORY_LEN: usize = 120;

/// Average reported until the first sample is recorded (60 FPS)
pub const INITIAL_FRAME_TIME_MS: f32 = 1000.0 / 60.0;

/// Fixed-size ring buffer of frame times in milliseconds.
///
/// Unfilled slots hold zero and still count toward the average, so the
/// mean ramps up over the first [`FRAME_HISTORY_LEN`] samples.
#[derive(Clone, Debug)]
pub struct FrameTimeHistory {
    samples: [f32; FRAME_HISTORY_LEN],
    next: usize,
    len: usize,
    average: f32,
}

impl Default for FrameTimeHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimeHistory {
    pub fn new() -> Self {
        Self {
            samples: [0.0; FRAME_HISTORY_LEN],
            next: 0,
            len: 0,
            average: INITIAL_FRAME_TIME_MS,
        }
    }

    /// Record a framerate; non-finite or non-positive values are ignored.
    ///
    /// Returns `true` if a sample was stored.
    pub fn record_framerate(&mut self, framerate: f32) -> bool {
        if !framerate.is_finite() || framerate <= 0.0 {
            return false;
        }
        self.push_ms(1000.0 / framerate)
    }

    /// Store a frame time in milliseconds, overwriting the oldest sample when full
    pub fn push_ms(&mut self, frame_ms: f32) -> bool {
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return false;
        }
        self.samples[self.next] = frame_ms;
        self.next = (self.next + 1) % FRAME_HISTORY_LEN;
        self.len = (self.len + 1).min(FRAME_HISTORY_LEN);

        let sum: f64 = self.samples.iter().map(|&s| s as f64).sum();
        self.average = (sum / FRAME_HISTORY_LEN as f64) as f32;
        true
    }

    /// Mean of all [`FRAME_HISTORY_LEN`] slots in milliseconds
    pub fn average_ms(&self) -> f32 {
        self.average
    }

    /// Frames per second matching [`average_ms`](Self::average_ms)
    pub fn average_fps(&self) -> f32 {
        1000.0 / self.average
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Samples from oldest to newest
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = if self.len < FRAME_HISTORY_LEN { 0 } else { self.next };
        (0..self.len).map(move |i| self.samples[(start + i) % FRAME_HISTORY_LEN])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_at_sixty_fps() {
        let history = FrameTimeHistory::new();
        assert!(history.is_empty());
        assert_relative_eq!(history.average_ms(), 16.666_666, epsilon = 1e-4);
    }

    #[test]
    fn constant_framerate_converges_to_its_frame_time() {
        let mut history = FrameTimeHistory::new();
        for _ in 0..FRAME_HISTORY_LEN + 7 {
            history.record_framerate(50.0);
        }
        assert_eq!(history.len(), FRAME_HISTORY_LEN);
        assert_relative_eq!(history.average_ms(), 20.0, epsilon = 1e-4);
        assert_relative_eq!(history.average_fps(), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn average_covers_only_the_last_window() {
        let mut history = FrameTimeHistory::new();
        for _ in 0..FRAME_HISTORY_LEN {
            history.push_ms(100.0);
        }
        for i in 0..FRAME_HISTORY_LEN {
            history.push_ms(1.0 + i as f32);
        }
        // Mean of 1..=120
        assert_relative_eq!(history.average_ms(), 60.5, epsilon = 1e-3);
        assert_eq!(history.iter().next(), Some(1.0));
        assert_eq!(history.iter().last(), Some(120.0));
    }

    #[test]
    fn partial_history_averages_over_the_whole_window() {
        let mut history = FrameTimeHistory::new();
        history.push_ms(10.0);
        assert_relative_eq!(history.average_ms(), 10.0 / 120.0, epsilon = 1e-6);

        history.push_ms(20.0);
        assert_eq!(history.len(), 2);
        assert_relative_eq!(history.average_ms(), 0.25, epsilon = 1e-6);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![10.0, 20.0]);
    }

    #[test]
    fn invalid_framerates_are_ignored() {
        let mut history = FrameTimeHistory::new();
        assert!(!history.record_framerate(0.0));
        assert!(!history.record_framerate(-30.0));
        assert!(!history.record_framerate(f32::NAN));
        assert!(!history.record_framerate(f32::INFINITY));
        assert!(history.is_empty());
        assert_relative_eq!(history.average_ms(), INITIAL_FRAME_TIME_MS);
    }
}
