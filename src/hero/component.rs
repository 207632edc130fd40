use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AddEventListenerOptions, Event, HtmlVideoElement, TouchEvent, WheelEvent, Window};
use yew::prelude::*;

use super::input::{is_passthrough, InputNormalizer, RawInput};
use super::machine::{Effect, HeroEvent, HeroMachine, Phase, Viewport, Visuals};
use super::media::{MediaAction, MediaError, MediaEvent, MediaPlayback, MediaStatus};
use super::nav_signal::{NavDecision, NavPolicy, NavSignal};
use super::reveal::RevealGate;
use crate::content::{HeroContent, MediaKind};

/// Splits "Elite Summer Camp" into ("Elite", "Summer Camp") for the spreading title.
pub fn split_title(title: &str) -> (&str, &str) {
    let title = title.trim();
    match title.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (title, ""),
    }
}

fn read_viewport(window: &Window) -> Viewport {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
    }
}

fn now_ms() -> f64 {
    web_sys::js_sys::Date::now()
}

/// A window listener that unregisters itself when dropped.
struct Listener {
    window: Window,
    name: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(window: &Window, name: &'static str, passive: bool, handler: impl FnMut(Event) + 'static) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let mut options = AddEventListenerOptions::new();
        options.passive(passive);
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| error!("failed to listen for {}: {:?}", name, e))
            .ok()?;
        Some(Self {
            window: window.clone(),
            name,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

/// Owns the state machine for one mounted hero and carries out its effects against the page.
struct Runtime {
    window: Window,
    machine: RefCell<HeroMachine>,
    input: RefCell<InputNormalizer>,
    policy: RefCell<NavPolicy>,
    nav: NavSignal,
    media: RefCell<MediaPlayback>,
    quiet_timer: RefCell<Option<Timeout>>,
    nav_timer: RefCell<Option<Timeout>>,
    frame: Cell<Option<i32>>,
    /// Reused for every animation frame; dropped on teardown.
    frame_callback: RefCell<Option<Closure<dyn FnMut()>>>,
    video: NodeRef,
    set_visuals: UseStateSetter<Visuals>,
    set_media: UseStateSetter<MediaPlayback>,
}

impl Runtime {
    fn dispatch(self: &Rc<Self>, event: HeroEvent, dom_event: Option<&Event>) {
        let effects = self.machine.borrow_mut().handle(event);
        for effect in effects {
            self.run(effect, dom_event);
        }
        // Nothing may re-hide the bar after the final broadcast.
        if event == HeroEvent::Unmount {
            return;
        }
        self.set_visuals.set(self.machine.borrow().visuals());
        self.sync_nav();
    }

    fn run(self: &Rc<Self>, effect: Effect, dom_event: Option<&Event>) {
        match effect {
            Effect::PreventDefault => {
                if let Some(e) = dom_event {
                    e.prevent_default();
                }
            }
            Effect::LockScroll => self.set_overflow("hidden"),
            Effect::UnlockScroll => self.set_overflow(""),
            Effect::ScrollToTop => self.window.scroll_to_with_x_and_y(0.0, 0.0),
            Effect::ArmQuietTimer(delay) => {
                let weak = Rc::downgrade(self);
                let timeout = Timeout::new(delay, move || {
                    if let Some(rt) = weak.upgrade() {
                        rt.dispatch(HeroEvent::QuietElapsed, None);
                    }
                });
                *self.quiet_timer.borrow_mut() = Some(timeout);
            }
            Effect::CancelQuietTimer => {
                if let Some(timeout) = self.quiet_timer.borrow_mut().take() {
                    timeout.cancel();
                }
            }
            Effect::RequestFrame => self.request_frame(),
            Effect::CancelFrame => {
                if let Some(id) = self.frame.take() {
                    let _ = self.window.cancel_animation_frame(id);
                }
            }
            Effect::UnmuteMedia => {
                if let Some(video) = self.video.cast::<HtmlVideoElement>() {
                    video.set_muted(false);
                    video.set_controls(true);
                    self.play();
                }
            }
            Effect::ShowNav => {
                let decision = self.policy.borrow_mut().show_now();
                self.apply_nav(decision);
                self.nav.publish(true);
            }
            Effect::ForceNavVisible => {
                self.nav_timer.borrow_mut().take();
                self.policy.borrow_mut().show_now();
                self.nav.force_visible();
            }
            // The gate is driven by `Visuals::content_open`.
            Effect::RevealContent | Effect::HideContent => {}
        }
    }

    fn set_overflow(&self, value: &str) {
        if let Some(body) = self.window.document().and_then(|d| d.body()) {
            let _ = body.style().set_property("overflow", value);
        }
    }

    fn request_frame(self: &Rc<Self>) {
        let mut slot = self.frame_callback.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            let weak: Weak<Self> = Rc::downgrade(self);
            Closure::wrap(Box::new(move || {
                if let Some(rt) = weak.upgrade() {
                    rt.frame.set(None);
                    rt.dispatch(HeroEvent::Frame, None);
                }
            }) as Box<dyn FnMut()>)
        });
        match self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.frame.set(Some(id)),
            Err(e) => error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn on_input(self: &Rc<Self>, raw: RawInput, event: &Event) {
        let passthrough = is_passthrough(event.target());
        let delta = self.input.borrow_mut().normalize(raw, passthrough);
        if let Some(delta) = delta {
            let page_scroll_y = self.window.scroll_y().unwrap_or(0.0);
            self.dispatch(HeroEvent::Input { delta, page_scroll_y }, Some(event));
        }
    }

    fn sync_nav(self: &Rc<Self>) {
        let phase = self.machine.borrow().phase();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let decision = self.policy.borrow_mut().observe(phase, scroll_y, now_ms());
        self.apply_nav(decision);
    }

    fn apply_nav(self: &Rc<Self>, decision: NavDecision) {
        match decision {
            NavDecision::Unchanged => {}
            NavDecision::ShowNow => {
                self.nav_timer.borrow_mut().take();
                self.nav.publish(true);
            }
            NavDecision::HideNow => {
                self.nav_timer.borrow_mut().take();
                self.nav.publish(false);
            }
            NavDecision::ShowAt(at) => {
                let delay = (at - now_ms()).max(0.0) as u32;
                let weak = Rc::downgrade(self);
                let timeout = Timeout::new(delay, move || {
                    if let Some(rt) = weak.upgrade() {
                        let decision = rt.policy.borrow_mut().tick(now_ms());
                        rt.apply_nav(decision);
                    }
                });
                *self.nav_timer.borrow_mut() = Some(timeout);
            }
        }
    }

    fn play(self: &Rc<Self>) {
        let Some(video) = self.video.cast::<HtmlVideoElement>() else {
            return;
        };
        let weak = Rc::downgrade(self);
        let muted = video.muted();
        match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    warn!("playback rejected (muted: {}): {:?}", muted, e);
                    if let Some(rt) = weak.upgrade() {
                        rt.on_media(MediaEvent::PlayRejected { muted });
                    }
                }
            }),
            Err(e) => {
                warn!("play() threw: {:?}", e);
                self.on_media(MediaEvent::PlayRejected { muted });
            }
        }
    }

    fn on_media(self: &Rc<Self>, event: MediaEvent) {
        let is_loaded = event == MediaEvent::Loaded;
        let action = self.media.borrow_mut().on_event(event);
        self.set_media.set(self.media.borrow().clone());
        match action {
            MediaAction::None if is_loaded => {
                // The muted attribute alone doesn't set the property on script-created elements.
                if let Some(video) = self.video.cast::<HtmlVideoElement>() {
                    video.set_muted(!self.machine.borrow().media_audible());
                }
                self.play();
            }
            MediaAction::None => {}
            MediaAction::RetryMuted => {
                if let Some(video) = self.video.cast::<HtmlVideoElement>() {
                    video.set_muted(true);
                }
                self.play();
            }
            MediaAction::Fail => {
                if let MediaStatus::Failed(e) = self.media.borrow().status() {
                    error!("hero media failed: {}", e);
                }
                self.dispatch(HeroEvent::MediaFailed, None);
            }
        }
    }

    fn teardown(self: &Rc<Self>) {
        self.dispatch(HeroEvent::Unmount, None);
        self.quiet_timer.borrow_mut().take();
        self.nav_timer.borrow_mut().take();
        self.frame_callback.borrow_mut().take();
    }
}

#[derive(Properties, PartialEq)]
pub struct ScrollExpandHeroProps {
    pub content: HeroContent,
    #[prop_or_default]
    pub children: Children,
}

const HERO_CSS: &str = r#"
    .scroll-hero {
        position: relative;
        height: 100vh;
        overflow: hidden;
        display: flex;
        align-items: center;
        justify-content: center;
    }
    .scroll-hero-bg {
        position: absolute;
        inset: 0;
        background-size: cover;
        background-position: center;
        z-index: 0;
    }
    .scroll-hero-media {
        position: relative;
        z-index: 1;
        border-radius: 16px;
        overflow: hidden;
        max-width: 95vw;
        max-height: 85vh;
        box-shadow: 0 0 50px rgba(0, 0, 0, 0.3);
    }
    .scroll-hero-media video,
    .scroll-hero-media img {
        width: 100%;
        height: 100%;
        object-fit: cover;
    }
    .scroll-hero-overlay {
        position: absolute;
        inset: 0;
        background: #000;
        pointer-events: none;
    }
    .scroll-hero-title {
        position: absolute;
        z-index: 2;
        display: flex;
        flex-direction: column;
        align-items: center;
        gap: 0.5rem;
        pointer-events: none;
    }
    .scroll-hero-title h1 {
        font-size: 4rem;
        color: #fff;
        margin: 0;
    }
    .scroll-hero-subtitle {
        color: rgba(255, 255, 255, 0.85);
        font-size: 1.25rem;
    }
    .scroll-hero-spinner {
        position: absolute;
        inset: 0;
        display: flex;
        align-items: center;
        justify-content: center;
    }
    .scroll-hero-play {
        position: absolute;
        left: 50%;
        top: 50%;
        transform: translate(-50%, -50%);
        padding: 1rem 1.5rem;
        border-radius: 999px;
        border: none;
        background: rgba(255, 255, 255, 0.9);
        cursor: pointer;
    }
    .scroll-hero-fallback p {
        position: absolute;
        bottom: 1rem;
        left: 1rem;
        right: 1rem;
        color: #fff;
        text-align: center;
    }
"#;

#[cfg(debug_assertions)]
fn diagnostic(err: &MediaError) -> Html {
    html! { <pre class="scroll-hero-diagnostic">{err.to_string()}</pre> }
}

#[cfg(not(debug_assertions))]
fn diagnostic(_err: &MediaError) -> Html {
    html! {}
}

#[function_component(ScrollExpandHero)]
pub fn scroll_expand_hero(props: &ScrollExpandHeroProps) -> Html {
    let content = &props.content;
    let nav = use_context::<NavSignal>().unwrap_or_default();
    let media_src = content.media.as_ref().map(|m| m.src.clone()).unwrap_or_default();
    let is_video = matches!(content.media.as_ref().map(|m| m.kind), Some(MediaKind::Video));

    let visuals = {
        let config = content.hero_config();
        use_state(move || HeroMachine::new(config, false).visuals())
    };
    let media = {
        let media_src = media_src.clone();
        use_state(move || MediaPlayback::new(&media_src))
    };
    let video_ref = use_node_ref();

    let runtime_slot = use_mut_ref(|| None::<Rc<Runtime>>);
    let runtime = runtime_slot
        .borrow_mut()
        .get_or_insert_with(|| {
            let config = content.hero_config();
            Rc::new(Runtime {
                window: web_sys::window().expect("hero rendered outside a browser window"),
                input: RefCell::new(InputNormalizer::new(
                    config.wheel_sensitivity,
                    config.touch_down_scale,
                    config.touch_up_scale,
                )),
                policy: RefCell::new(NavPolicy::new(config.nav_top_threshold, config.nav_show_debounce_ms)),
                machine: RefCell::new(HeroMachine::new(config, is_video)),
                nav: nav.clone(),
                media: RefCell::new(MediaPlayback::new(&media_src)),
                quiet_timer: RefCell::new(None),
                nav_timer: RefCell::new(None),
                frame: Cell::new(None),
                frame_callback: RefCell::new(None),
                video: video_ref.clone(),
                set_visuals: visuals.setter(),
                set_media: media.setter(),
            })
        })
        .clone();

    {
        let runtime = runtime.clone();
        use_effect_with_deps(
            move |_| {
                let window = runtime.window.clone();
                let mut listeners = Vec::new();

                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "wheel", false, move |e: Event| {
                        if let Some(wheel) = e.dyn_ref::<WheelEvent>() {
                            rt.on_input(RawInput::Wheel { delta_y: wheel.delta_y() }, &e);
                        }
                    }));
                }
                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "touchstart", true, move |e: Event| {
                        if let Some(y) = first_touch_y(&e) {
                            rt.on_input(RawInput::TouchStart { y }, &e);
                        }
                    }));
                }
                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "touchmove", false, move |e: Event| {
                        if let Some(y) = first_touch_y(&e) {
                            rt.on_input(RawInput::TouchMove { y }, &e);
                        }
                    }));
                }
                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "touchend", true, move |e: Event| {
                        rt.on_input(RawInput::TouchEnd, &e);
                    }));
                }
                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "scroll", true, move |_| rt.sync_nav()));
                }
                {
                    let rt = runtime.clone();
                    listeners.push(Listener::new(&window, "resize", true, move |_| {
                        let viewport = read_viewport(&rt.window);
                        rt.dispatch(HeroEvent::Resize { viewport }, None);
                    }));
                }

                runtime.dispatch(HeroEvent::Mount { viewport: read_viewport(&window) }, None);
                if runtime.media.borrow().is_failed() {
                    if let MediaStatus::Failed(e) = runtime.media.borrow().status() {
                        warn!("hero media unusable: {}", e);
                    }
                    runtime.dispatch(HeroEvent::MediaFailed, None);
                }
                debug!("scroll hero mounted");

                move || {
                    drop(listeners);
                    runtime.teardown();
                    debug!("scroll hero unmounted");
                }
            },
            (),
        );
    }

    let on_media_event = |event: MediaEvent| {
        let rt = runtime.clone();
        Callback::from(move |_: Event| rt.on_media(event.clone()))
    };
    let on_error = {
        let rt = runtime.clone();
        Callback::from(move |_: Event| rt.on_media(MediaEvent::Error("element reported an error".to_string())))
    };
    let on_play_click = {
        let rt = runtime.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Some(video) = rt.video.cast::<HtmlVideoElement>() {
                video.set_muted(false);
            }
            rt.play();
        })
    };

    let v = *visuals;
    let phase_class = match v.phase {
        Phase::Initial => "phase-initial",
        Phase::Expanding => "phase-expanding",
        Phase::Expanded => "phase-expanded",
    };
    let (first_word, rest) = split_title(&content.title);
    let bg_style = format!(
        "background-image: url('{}'); opacity: {:.3};",
        content.hero_image,
        1.0 - v.progress.clamp(0.0, 1.0)
    );
    let media_style = format!(
        "width: {:.1}px; height: {:.1}px; opacity: {:.3};",
        v.media_width, v.media_height, v.media_opacity
    );
    let overlay_style = format!("opacity: {:.3};", v.overlay_opacity);
    let left_style = format!("transform: translateX(-{:.1}px);", v.text_offset);
    let right_style = format!("transform: translateX({:.1}px);", v.text_offset);
    let poster = content.media.as_ref().and_then(|m| m.poster.clone());

    let media_html = match media.status() {
        MediaStatus::Failed(err) => html! {
            <div class="scroll-hero-fallback">
                <img src={content.hero_image.clone()} alt={content.title.clone()} />
                <p>{err.user_message(content.media.as_ref().map(|m| m.kind))}</p>
                { diagnostic(err) }
            </div>
        },
        _ if is_video => html! {
            <video
                ref={video_ref.clone()}
                src={media_src.clone()}
                poster={poster}
                muted={true}
                loop={true}
                playsinline={true}
                preload="auto"
                data-hero-passthrough={v.content_open.then(|| "true")}
                onloadeddata={on_media_event(MediaEvent::Loaded)}
                onplay={on_media_event(MediaEvent::Played)}
                onpause={on_media_event(MediaEvent::Paused)}
                onended={on_media_event(MediaEvent::Ended)}
                onerror={on_error}
            />
        },
        _ => html! {
            <img
                src={media_src.clone()}
                alt={content.title.clone()}
                onload={on_media_event(MediaEvent::Loaded)}
                onerror={on_error}
            />
        },
    };

    html! {
        <>
            <style>{HERO_CSS}</style>
            <section class={classes!("scroll-hero", phase_class)}>
                <div class="scroll-hero-bg" style={bg_style}></div>
                <div class="scroll-hero-media" style={media_style}>
                    { media_html }
                    <div class="scroll-hero-overlay" style={overlay_style}></div>
                    {
                        if media.show_spinner() {
                            html! { <div class="scroll-hero-spinner"><div class="spinner"></div></div> }
                        } else if is_video && media.show_play_button() {
                            html! {
                                <button class="scroll-hero-play" data-hero-passthrough="true" onclick={on_play_click}>
                                    {"▶ Play"}
                                </button>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <div class="scroll-hero-title">
                    <h1 style={left_style}>{first_word}</h1>
                    <h1 style={right_style}>{rest}</h1>
                    <p class="scroll-hero-subtitle">{&content.subtitle}</p>
                </div>
            </section>
            <RevealGate open={v.content_open}>
                { for props.children.iter() }
            </RevealGate>
        </>
    }
}

fn first_touch_y(e: &Event) -> Option<f64> {
    let touch = e.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(f64::from(touch.client_y()))
}

#[cfg(test)]
mod tests {
    use super::split_title;

    #[test]
    fn title_splits_on_first_word() {
        assert_eq!(split_title("Elite Summer Camp"), ("Elite", "Summer Camp"));
        assert_eq!(split_title("  Train  hard "), ("Train", "hard"));
        assert_eq!(split_title("Camp"), ("Camp", ""));
        assert_eq!(split_title(""), ("", ""));
    }
}
