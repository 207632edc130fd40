use log::{debug, info};

use super::accumulator::VirtualScroll;
use super::auto_continue::AutoContinue;
use crate::config::{HeroConfig, Stages};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Expanding,
    Expanded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeroEvent {
    Mount { viewport: Viewport },
    /// Normalized movement; `page_scroll_y` is the real document scroll at the time.
    Input { delta: f64, page_scroll_y: f64 },
    QuietElapsed,
    Frame,
    Resize { viewport: Viewport },
    MediaFailed,
    Unmount,
}

/// Work the host must carry out after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    PreventDefault,
    LockScroll,
    UnlockScroll,
    ScrollToTop,
    ArmQuietTimer(u32),
    CancelQuietTimer,
    RequestFrame,
    CancelFrame,
    UnmuteMedia,
    ShowNav,
    ForceNavVisible,
    RevealContent,
    HideContent,
}

/// Everything the hero needs to paint one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visuals {
    pub phase: Phase,
    pub progress: f64,
    pub media_width: f64,
    pub media_height: f64,
    pub media_opacity: f64,
    pub overlay_opacity: f64,
    pub text_offset: f64,
    pub content_open: bool,
}

pub struct HeroMachine {
    config: HeroConfig,
    phase: Phase,
    scroll: VirtualScroll,
    auto: AutoContinue,
    viewport: Viewport,
    has_video: bool,
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + t.clamp(0.0, 1.0) * (to - from)
}

impl HeroMachine {
    pub fn new(config: HeroConfig, has_video: bool) -> Self {
        let scroll = VirtualScroll::new(0.0, config.stages.span());
        let auto = AutoContinue::new(config.auto_continue_delay_ms, config.auto_continue_step);
        Self {
            config,
            phase: Phase::Initial,
            scroll,
            auto,
            viewport: Viewport::default(),
            has_video,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.scroll.progress()
    }

    /// Whether expanded video may play with sound. Entry/exit ends with the media faded out.
    pub fn media_audible(&self) -> bool {
        self.phase == Phase::Expanded && self.config.stages == Stages::Single
    }

    pub fn handle(&mut self, event: HeroEvent) -> Vec<Effect> {
        match event {
            HeroEvent::Mount { viewport } => self.mount(viewport),
            HeroEvent::Input { delta, page_scroll_y } => self.input(delta, page_scroll_y),
            HeroEvent::QuietElapsed => self.quiet_elapsed(),
            HeroEvent::Frame => self.frame(),
            HeroEvent::Resize { viewport } => {
                self.viewport = viewport;
                self.scroll.set_threshold(viewport.height);
                Vec::new()
            }
            HeroEvent::MediaFailed => {
                self.has_video = false;
                if self.phase == Phase::Expanded {
                    Vec::new()
                } else {
                    info!("media failed, releasing hero");
                    self.complete()
                }
            }
            HeroEvent::Unmount => {
                self.auto.stop();
                vec![
                    Effect::CancelQuietTimer,
                    Effect::CancelFrame,
                    Effect::UnlockScroll,
                    Effect::ForceNavVisible,
                ]
            }
        }
    }

    fn mount(&mut self, viewport: Viewport) -> Vec<Effect> {
        self.phase = Phase::Initial;
        self.viewport = viewport;
        self.scroll = VirtualScroll::new(viewport.height, self.config.stages.span());
        self.auto = AutoContinue::new(self.config.auto_continue_delay_ms, self.config.auto_continue_step);
        vec![Effect::ScrollToTop, Effect::LockScroll, Effect::HideContent, Effect::ShowNav]
    }

    fn input(&mut self, delta: f64, page_scroll_y: f64) -> Vec<Effect> {
        match self.phase {
            Phase::Expanded => {
                let collapse = self.config.collapse_on_scroll_up && delta < 0.0 && page_scroll_y <= 0.0;
                if !collapse {
                    return Vec::new();
                }
                debug!("collapsing hero");
                self.phase = Phase::Expanding;
                self.auto.note_input(delta);
                self.scroll.apply(delta);
                let mut effects = vec![Effect::PreventDefault, Effect::LockScroll, Effect::HideContent];
                if self.scroll.progress() <= 0.0 {
                    self.phase = Phase::Initial;
                }
                effects.push(Effect::ShowNav);
                effects
            }
            Phase::Initial if delta <= 0.0 => vec![Effect::PreventDefault],
            Phase::Initial | Phase::Expanding => {
                self.phase = Phase::Expanding;
                self.auto.note_input(delta);
                self.scroll.apply(delta);

                let mut effects = vec![Effect::PreventDefault, Effect::CancelQuietTimer, Effect::CancelFrame];
                if self.scroll.is_complete() {
                    effects.extend(self.complete());
                } else if self.scroll.progress() <= 0.0 {
                    self.phase = Phase::Initial;
                } else if delta > 0.0 {
                    effects.push(Effect::ArmQuietTimer(self.auto.delay_ms()));
                }
                effects
            }
        }
    }

    fn quiet_elapsed(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Expanding && self.auto.quiet_elapsed() {
            debug!(
                "auto-continuing from {:.0}px (progress {:.2})",
                self.scroll.virtual_y(),
                self.scroll.progress()
            );
            vec![Effect::RequestFrame]
        } else {
            Vec::new()
        }
    }

    fn frame(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Expanding || !self.auto.is_running() {
            return Vec::new();
        }
        if self.scroll.threshold() <= 0.0 {
            self.auto.stop();
            return Vec::new();
        }
        self.scroll.apply(self.auto.frame_delta(self.scroll.threshold()));
        if self.scroll.is_complete() {
            self.complete()
        } else {
            vec![Effect::RequestFrame]
        }
    }

    fn complete(&mut self) -> Vec<Effect> {
        self.phase = Phase::Expanded;
        self.auto.stop();
        self.scroll.complete();
        info!("hero expanded");
        let mut effects = vec![
            Effect::CancelQuietTimer,
            Effect::ScrollToTop,
            Effect::UnlockScroll,
            Effect::ShowNav,
            Effect::RevealContent,
        ];
        if self.has_video && self.media_audible() {
            effects.push(Effect::UnmuteMedia);
        }
        effects
    }

    pub fn visuals(&self) -> Visuals {
        let progress = self.scroll.progress();
        let entry = progress.clamp(0.0, 1.0);
        let exit = match self.config.stages {
            Stages::Single => 0.0,
            Stages::EntryExit => (progress - 1.0).clamp(0.0, 1.0),
        };

        let c = &self.config;
        let max_width = (self.viewport.width * c.max_media_width_ratio).max(c.initial_media_width);
        let media_width = lerp(c.initial_media_width, max_width, entry);
        let media_height = if c.aspect_ratio > 0.0 { media_width / c.aspect_ratio } else { 0.0 };

        Visuals {
            phase: self.phase,
            progress,
            media_width,
            media_height,
            media_opacity: if self.phase == Phase::Initial { 0.0 } else { 1.0 - exit },
            overlay_opacity: (c.overlay_start_opacity - entry * c.overlay_fade_rate).max(0.0),
            text_offset: entry * self.viewport.width * c.text_spread_ratio,
            content_open: self.phase == Phase::Expanded,
        }
    }
}
