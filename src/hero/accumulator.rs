/// Scroll distance accumulated while the page itself is pinned at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualScroll {
    virtual_y: f64,
    threshold: f64,
    span: f64,
}

impl VirtualScroll {
    /// `threshold` is the viewport height, `span` the progress domain width (1 or 2).
    pub fn new(threshold: f64, span: f64) -> Self {
        Self {
            virtual_y: 0.0,
            threshold: threshold.max(0.0),
            span,
        }
    }

    pub fn virtual_y(&self) -> f64 {
        self.virtual_y
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Adds a delta. The total never drops below zero or past the end of the domain.
    pub fn apply(&mut self, delta: f64) {
        let ceiling = self.threshold * self.span;
        self.virtual_y = (self.virtual_y + delta).clamp(0.0, ceiling.max(0.0));
    }

    /// Jumps straight to the end of the domain.
    pub fn complete(&mut self) {
        self.virtual_y = self.threshold * self.span;
    }

    /// Recomputed on resize. Progress is preserved across the change.
    pub fn set_threshold(&mut self, threshold: f64) {
        let progress = self.progress();
        self.threshold = threshold.max(0.0);
        self.virtual_y = progress * self.threshold;
    }

    /// `virtual_y / threshold`, clamped to `[0, span]`. Zero until a viewport has been measured.
    pub fn progress(&self) -> f64 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        (self.virtual_y / self.threshold).clamp(0.0, self.span)
    }

    pub fn is_complete(&self) -> bool {
        self.threshold > 0.0 && self.progress() >= self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_negative() {
        let mut scroll = VirtualScroll::new(800.0, 1.0);
        scroll.apply(-50.0);
        assert_eq!(scroll.virtual_y(), 0.0);
        assert_eq!(scroll.progress(), 0.0);
    }

    #[test]
    fn progress_is_clamped_to_span() {
        let mut scroll = VirtualScroll::new(800.0, 1.0);
        scroll.apply(400.0);
        assert_eq!(scroll.progress(), 0.5);
        scroll.apply(5000.0);
        assert_eq!(scroll.progress(), 1.0);
        assert!(scroll.is_complete());

        let mut extended = VirtualScroll::new(800.0, 2.0);
        extended.apply(1200.0);
        assert_eq!(extended.progress(), 1.5);
        assert!(!extended.is_complete());
    }

    #[test]
    fn unmeasured_viewport_degrades_to_zero() {
        let mut scroll = VirtualScroll::new(0.0, 1.0);
        scroll.apply(300.0);
        assert_eq!(scroll.progress(), 0.0);
        assert!(!scroll.is_complete());
    }

    #[test]
    fn resize_keeps_progress() {
        let mut scroll = VirtualScroll::new(800.0, 1.0);
        scroll.apply(200.0);
        scroll.set_threshold(400.0);
        assert_eq!(scroll.progress(), 0.25);
        assert_eq!(scroll.virtual_y(), 100.0);
    }

    #[test]
    fn progress_stays_in_bounds_for_mixed_deltas() {
        let mut scroll = VirtualScroll::new(640.0, 1.0);
        for delta in [120.0, -900.0, 33.3, 1e6, -1e6, 0.5, -0.25, 700.0] {
            scroll.apply(delta);
            let p = scroll.progress();
            assert!((0.0..=1.0).contains(&p), "progress {} out of range", p);
        }
    }
}
