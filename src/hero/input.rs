use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

/// Marker attribute for subtrees whose events must reach the browser untouched
/// (links, buttons, video controls, the site header).
pub const PASSTHROUGH_ATTR: &str = "data-hero-passthrough";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawInput {
    Wheel { delta_y: f64 },
    TouchStart { y: f64 },
    TouchMove { y: f64 },
    TouchEnd,
}

/// Turns wheel and touch events into one signed movement value.
/// Positive means "scroll down".
#[derive(Clone, Debug)]
pub struct InputNormalizer {
    wheel_sensitivity: f64,
    touch_down_scale: f64,
    touch_up_scale: f64,
    last_touch_y: Option<f64>,
}

impl InputNormalizer {
    pub fn new(wheel_sensitivity: f64, touch_down_scale: f64, touch_up_scale: f64) -> Self {
        Self {
            wheel_sensitivity,
            touch_down_scale,
            touch_up_scale,
            last_touch_y: None,
        }
    }

    pub fn normalize(&mut self, raw: RawInput, passthrough: bool) -> Option<f64> {
        if passthrough {
            return None;
        }
        match raw {
            RawInput::Wheel { delta_y } => {
                let delta = delta_y * self.wheel_sensitivity;
                (delta != 0.0).then_some(delta)
            }
            RawInput::TouchStart { y } => {
                self.last_touch_y = Some(y);
                None
            }
            RawInput::TouchMove { y } => {
                // A move without a start (gesture began on a passthrough element) becomes the baseline.
                let previous = self.last_touch_y.replace(y)?;
                let raw_delta = previous - y;
                let scale = if raw_delta >= 0.0 {
                    self.touch_down_scale
                } else {
                    self.touch_up_scale
                };
                let delta = raw_delta * scale;
                (delta != 0.0).then_some(delta)
            }
            RawInput::TouchEnd => {
                self.last_touch_y = None;
                None
            }
        }
    }
}

/// True when the event target sits inside a subtree tagged with [`PASSTHROUGH_ATTR`].
pub fn is_passthrough(target: Option<EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(&format!("[{}]", PASSTHROUGH_ATTR)).ok().flatten())
        .is_some()
}
