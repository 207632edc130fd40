use serde::Deserialize;

#[cfg(debug_assertions)]
pub fn get_cms_url() -> &'static str {
    "http://localhost:1337"  // Local CMS while developing
}

#[cfg(not(debug_assertions))]
pub fn get_cms_url() -> &'static str {
    ""  // Same origin in production
}

/// Whether the hero runs a single expansion or an entry/expand/exit sequence.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stages {
    Single,
    EntryExit,
}

impl Stages {
    /// Width of the virtual progress domain, in units of one expansion threshold.
    pub fn span(self) -> f64 {
        match self {
            Stages::Single => 1.0,
            Stages::EntryExit => 2.0,
        }
    }
}

/// Named hero behaviours the CMS can pick without spelling out every tunable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroVariant {
    #[default]
    Single,
    Collapsible,
    EntryExit,
}

impl HeroVariant {
    pub fn preset(self) -> HeroConfig {
        match self {
            HeroVariant::Single => HeroConfig::single_stage(),
            HeroVariant::Collapsible => HeroConfig::collapsible(),
            HeroVariant::EntryExit => HeroConfig::entry_exit(),
        }
    }
}

/// Tunables shared by every scroll-expansion hero. The CMS may override any of them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub wheel_sensitivity: f64,
    pub touch_down_scale: f64,
    pub touch_up_scale: f64,
    pub collapse_on_scroll_up: bool,
    pub stages: Stages,
    pub auto_continue_delay_ms: u32,
    /// Fraction of the expansion threshold added per animation frame.
    pub auto_continue_step: f64,
    pub initial_media_width: f64,
    pub max_media_width_ratio: f64,
    pub aspect_ratio: f64,
    pub overlay_start_opacity: f64,
    pub overlay_fade_rate: f64,
    pub text_spread_ratio: f64,
    pub nav_top_threshold: f64,
    pub nav_show_debounce_ms: u32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: 1.0,
            touch_down_scale: 1.0,
            touch_up_scale: 1.0,
            collapse_on_scroll_up: false,
            stages: Stages::Single,
            auto_continue_delay_ms: 500,
            auto_continue_step: 0.02,
            initial_media_width: 300.0,
            max_media_width_ratio: 0.95,
            aspect_ratio: 16.0 / 9.0,
            overlay_start_opacity: 0.7,
            overlay_fade_rate: 0.7,
            text_spread_ratio: 0.5,
            nav_top_threshold: 60.0,
            nav_show_debounce_ms: 150,
        }
    }
}

impl HeroConfig {
    pub fn single_stage() -> Self {
        Self::default()
    }

    /// Scrolling up at the top of the page shrinks the media again.
    pub fn collapsible() -> Self {
        Self {
            collapse_on_scroll_up: true,
            overlay_start_opacity: 0.5,
            overlay_fade_rate: 0.5,
            ..Self::default()
        }
    }

    pub fn entry_exit() -> Self {
        Self {
            stages: Stages::EntryExit,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let config: HeroConfig =
            serde_json::from_str(r#"{"collapse_on_scroll_up": true, "touch_up_scale": 1.5}"#).unwrap();
        assert_eq!(
            config,
            HeroConfig {
                collapse_on_scroll_up: true,
                touch_up_scale: 1.5,
                ..HeroConfig::default()
            }
        );
    }

    #[test]
    fn stages_parse_snake_case() {
        let config: HeroConfig = serde_json::from_str(r#"{"stages": "entry_exit"}"#).unwrap();
        assert_eq!(config.stages, Stages::EntryExit);
        assert_eq!(config.stages.span(), 2.0);
    }
}
