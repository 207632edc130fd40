use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use web_sys::MouseEvent;

mod config;
mod content;
mod hero {
    pub mod accumulator;
    pub mod auto_continue;
    pub mod component;
    pub mod input;
    pub mod machine;
    pub mod media;
    pub mod nav_signal;
    pub mod reveal;
}
mod pages {
    pub mod home;
}

use hero::nav_signal::NavSignal;
use pages::home::Home;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <div class="not-found">
                    <h1>{"Page not found"}</h1>
                    <Link<Route> to={Route::Home}>{"Back to the camp"}</Link<Route>>
                </div>
            }
        },
    }
}

const NAV_SHOWN_STYLE: &str = "transform: translateY(0); transition: transform 0.3s ease;";
const NAV_HIDDEN_STYLE: &str = "transform: translateY(-100%); transition: transform 0.3s ease;";

#[function_component(Nav)]
pub fn nav() -> Html {
    let signal = use_context::<NavSignal>();
    let visible = use_state(|| signal.as_ref().map_or(true, NavSignal::current));
    let menu_open = use_state(|| false);

    {
        let visible = visible.clone();
        use_effect_with_deps(
            move |signal: &Option<NavSignal>| {
                let subscription = signal
                    .as_ref()
                    .map(|signal| signal.subscribe(Callback::from(move |v: bool| visible.set(v))));
                move || drop(subscription)
            },
            signal,
        );
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    // Hidden only while the menu is closed, so an open menu never slides away.
    let hidden = !*visible && !*menu_open;

    html! {
        <nav
            class={classes!("top-nav", hidden.then(|| "nav-hidden"))}
            style={if hidden { NAV_HIDDEN_STYLE } else { NAV_SHOWN_STYLE }}
            data-hero-passthrough="true"
        >
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Peak Training Camp"}
                </Link<Route>>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class} onclick={close_menu}>
                    <a href="#programs" class="nav-link">{"Programs"}</a>
                    <a href="#coaches" class="nav-link">{"Coaches"}</a>
                    <a href="#pricing" class="nav-link">{"Pricing"}</a>
                    <a href="#faq" class="nav-link">{"FAQ"}</a>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let nav_signal = use_state(NavSignal::new);

    html! {
        <ContextProvider<NavSignal> context={(*nav_signal).clone()}>
            <BrowserRouter>
                <Nav />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<NavSignal>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    console_log::init_with_level(level).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
