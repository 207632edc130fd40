use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use yew::Callback;

use super::machine::Phase;

struct Inner {
    last: Option<bool>,
    next_id: usize,
    subscribers: Vec<(usize, Callback<bool>)>,
}

/// "Should the site navigation be visible", written by the hero and read by the header.
/// Cloning shares the same channel.
#[derive(Clone)]
pub struct NavSignal {
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for NavSignal {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for NavSignal {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                last: None,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }
}

/// Unsubscribes on drop.
pub struct NavSubscription {
    id: usize,
    inner: Rc<RefCell<Inner>>,
}

impl Drop for NavSubscription {
    fn drop(&mut self) {
        self.inner.borrow_mut().subscribers.retain(|(id, _)| *id != self.id);
    }
}

impl NavSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last broadcast value; visible if nothing was ever sent.
    pub fn current(&self) -> bool {
        self.inner.borrow().last.unwrap_or(true)
    }

    pub fn subscribe(&self, callback: Callback<bool>) -> NavSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        NavSubscription {
            id,
            inner: self.inner.clone(),
        }
    }

    /// Broadcasts `visible` unless it equals the last broadcast value. Returns whether it was sent.
    pub fn publish(&self, visible: bool) -> bool {
        if self.inner.borrow().last == Some(visible) {
            return false;
        }
        self.emit(visible);
        true
    }

    /// Broadcasts "visible" regardless of the cache. Used on teardown.
    pub fn force_visible(&self) {
        self.emit(true);
    }

    fn emit(&self, visible: bool) {
        // Subscribers may touch the signal again; release the borrow before calling out.
        let subscribers: Vec<Callback<bool>> = {
            let mut inner = self.inner.borrow_mut();
            inner.last = Some(visible);
            inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        debug!("nav visibility -> {}", visible);
        for cb in subscribers {
            cb.emit(visible);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavDecision {
    Unchanged,
    ShowNow,
    HideNow,
    /// A show is pending until the returned deadline (ms).
    ShowAt(f64),
}

/// Scroll-direction rules for the navigation bar, with time passed in explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct NavPolicy {
    top_threshold: f64,
    show_debounce_ms: f64,
    last_scroll_y: f64,
    visible: bool,
    pending_show_at: Option<f64>,
}

impl NavPolicy {
    pub fn new(top_threshold: f64, show_debounce_ms: u32) -> Self {
        Self {
            top_threshold,
            show_debounce_ms: f64::from(show_debounce_ms),
            last_scroll_y: 0.0,
            visible: true,
            pending_show_at: None,
        }
    }

    #[cfg(test)]
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn observe(&mut self, phase: Phase, scroll_y: f64, now_ms: f64) -> NavDecision {
        let previous_y = std::mem::replace(&mut self.last_scroll_y, scroll_y);

        if phase != Phase::Expanded || scroll_y <= self.top_threshold {
            return self.show_now();
        }

        if scroll_y > previous_y {
            self.pending_show_at = None;
            if self.visible {
                self.visible = false;
                return NavDecision::HideNow;
            }
            NavDecision::Unchanged
        } else if scroll_y < previous_y {
            if self.visible || self.pending_show_at.is_some() {
                return NavDecision::Unchanged;
            }
            // Armed once per reversal; further upward events keep the deadline.
            let at = now_ms + self.show_debounce_ms;
            self.pending_show_at = Some(at);
            NavDecision::ShowAt(at)
        } else {
            NavDecision::Unchanged
        }
    }

    /// Releases a pending show once its deadline has passed.
    pub fn tick(&mut self, now_ms: f64) -> NavDecision {
        match self.pending_show_at {
            Some(at) if now_ms >= at => self.show_now(),
            _ => NavDecision::Unchanged,
        }
    }

    /// Makes the bar visible immediately, dropping any pending show.
    pub fn show_now(&mut self) -> NavDecision {
        self.pending_show_at = None;
        if self.visible {
            NavDecision::Unchanged
        } else {
            self.visible = true;
            NavDecision::ShowNow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(signal: &NavSignal) -> (Rc<RefCell<Vec<bool>>>, NavSubscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let seen = seen.clone();
            signal.subscribe(Callback::from(move |v| seen.borrow_mut().push(v)))
        };
        (seen, sub)
    }

    #[test]
    fn publish_deduplicates() {
        let signal = NavSignal::new();
        let (seen, _sub) = recorder(&signal);
        assert!(signal.publish(false));
        assert!(!signal.publish(false));
        assert!(signal.publish(true));
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn force_visible_always_emits() {
        let signal = NavSignal::new();
        let (seen, _sub) = recorder(&signal);
        signal.publish(true);
        signal.force_visible();
        assert_eq!(*seen.borrow(), vec![true, true]);
    }

    #[test]
    fn dropped_subscription_stops_receiving() {
        let signal = NavSignal::new();
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            signal.subscribe(Callback::from(move |_| count.set(count.get() + 1)))
        };
        signal.publish(false);
        drop(sub);
        signal.publish(true);
        assert_eq!(count.get(), 1);
        assert!(signal.current());
    }

    #[test]
    fn defaults_to_visible() {
        assert!(NavSignal::new().current());
    }

    #[test]
    fn visible_before_expansion_and_near_top() {
        let mut policy = NavPolicy::new(60.0, 150);
        assert_eq!(policy.observe(Phase::Initial, 500.0, 0.0), NavDecision::Unchanged);
        assert_eq!(policy.observe(Phase::Expanded, 400.0, 10.0), NavDecision::Unchanged);
        assert_eq!(policy.observe(Phase::Expanded, 800.0, 20.0), NavDecision::HideNow);
        assert_eq!(policy.observe(Phase::Expanded, 60.0, 30.0), NavDecision::ShowNow);
        assert!(policy.visible());
    }

    #[test]
    fn hide_is_immediate_and_show_is_debounced() {
        let mut policy = NavPolicy::new(60.0, 150);
        assert_eq!(policy.observe(Phase::Expanded, 0.0, 0.0), NavDecision::Unchanged);
        assert_eq!(policy.observe(Phase::Expanded, 200.0, 16.0), NavDecision::HideNow);
        assert!(!policy.visible());

        assert_eq!(policy.observe(Phase::Expanded, 180.0, 100.0), NavDecision::ShowAt(250.0));
        assert_eq!(policy.tick(200.0), NavDecision::Unchanged);
        assert!(!policy.visible());
        assert_eq!(policy.tick(250.0), NavDecision::ShowNow);
        assert!(policy.visible());
    }

    #[test]
    fn reversal_back_down_cancels_pending_show() {
        let mut policy = NavPolicy::new(60.0, 150);
        policy.observe(Phase::Expanded, 100.0, 0.0);
        policy.observe(Phase::Expanded, 300.0, 10.0);
        policy.observe(Phase::Expanded, 250.0, 20.0);
        assert_eq!(policy.observe(Phase::Expanded, 280.0, 50.0), NavDecision::Unchanged);
        assert_eq!(policy.tick(1000.0), NavDecision::Unchanged);
        assert!(!policy.visible());
    }

    #[test]
    fn repeated_reversals_restart_the_window() {
        let mut policy = NavPolicy::new(60.0, 150);
        policy.observe(Phase::Expanded, 100.0, 0.0);
        policy.observe(Phase::Expanded, 400.0, 10.0);
        assert_eq!(policy.observe(Phase::Expanded, 350.0, 100.0), NavDecision::ShowAt(250.0));
        assert_eq!(policy.observe(Phase::Expanded, 380.0, 150.0), NavDecision::Unchanged);
        assert_eq!(policy.observe(Phase::Expanded, 330.0, 200.0), NavDecision::ShowAt(350.0));
        assert_eq!(policy.tick(260.0), NavDecision::Unchanged);
        assert_eq!(policy.tick(350.0), NavDecision::ShowNow);
    }

    #[test]
    fn continuous_upward_scroll_shows_after_one_debounce() {
        let mut policy = NavPolicy::new(60.0, 150);
        let (mut y, mut t) = (0.0, 0.0);
        policy.observe(Phase::Expanded, y, t);
        y = 2000.0;
        t = 16.0;
        assert_eq!(policy.observe(Phase::Expanded, y, t), NavDecision::HideNow);

        let reversal_at = t + 16.0;
        let mut shown_at = None;
        while t < 1000.0 {
            y -= 10.0;
            t += 16.0;
            let decision = policy.observe(Phase::Expanded, y, t);
            if t == reversal_at {
                assert_eq!(decision, NavDecision::ShowAt(reversal_at + 150.0));
            } else {
                assert_eq!(decision, NavDecision::Unchanged);
            }
            if policy.tick(t) == NavDecision::ShowNow {
                shown_at = Some(t);
                break;
            }
        }
        let shown_at = shown_at.expect("nav stayed hidden while scrolling up");
        assert!(shown_at >= reversal_at + 150.0 && shown_at < reversal_at + 150.0 + 16.0);
        assert!(policy.visible());
    }

    #[test]
    fn near_top_wins_over_any_prior_state() {
        for phase in [Phase::Initial, Phase::Expanding, Phase::Expanded] {
            let mut policy = NavPolicy::new(60.0, 150);
            policy.observe(Phase::Expanded, 100.0, 0.0);
            policy.observe(Phase::Expanded, 900.0, 1.0);
            policy.observe(phase, 30.0, 2.0);
            assert!(policy.visible());
        }
    }
}
