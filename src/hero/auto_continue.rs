#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Finishes a half-done expansion after the user stops scrolling.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoContinue {
    delay_ms: u32,
    step: f64,
    last_direction: Option<Direction>,
    running: bool,
}

impl AutoContinue {
    pub fn new(delay_ms: u32, step: f64) -> Self {
        Self {
            delay_ms,
            step: step.max(f64::EPSILON),
            last_direction: None,
            running: false,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Records user input. Stops a running continuation.
    pub fn note_input(&mut self, delta: f64) {
        self.running = false;
        self.last_direction = Some(if delta > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        });
    }

    /// Called when the quiet period elapsed. Returns true when the frame loop should start.
    pub fn quiet_elapsed(&mut self) -> bool {
        self.running = self.last_direction == Some(Direction::Forward);
        self.running
    }

    /// Virtual-scroll distance to add on one frame.
    pub fn frame_delta(&self, threshold: f64) -> f64 {
        self.step * threshold
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_input_continues() {
        let mut auto = AutoContinue::new(500, 0.02);
        auto.note_input(30.0);
        assert!(auto.quiet_elapsed());

        auto.note_input(-30.0);
        assert!(!auto.is_running());
        assert!(!auto.quiet_elapsed());
    }

    #[test]
    fn no_input_means_no_continuation() {
        let mut auto = AutoContinue::new(500, 0.02);
        assert!(!auto.quiet_elapsed());
    }

    #[test]
    fn frame_delta_scales_with_threshold() {
        let auto = AutoContinue::new(500, 0.02);
        assert!((auto.frame_delta(800.0) - 16.0).abs() < 1e-9);
        assert!((auto.frame_delta(400.0) - 8.0).abs() < 1e-9);
    }
}
