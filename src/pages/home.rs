use log::{info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::content::{fetch_home_content, HomeContent, Section};
use crate::hero::component::ScrollExpandHero;

fn render_section(section: &Section) -> Html {
    html! {
        <section id={section.id.clone()} class="home-section">
            <h2>{&section.heading}</h2>
            {
                if let Some(image) = &section.image {
                    html! { <img src={image.clone()} alt={section.heading.clone()} class="section-image" /> }
                } else {
                    html! {}
                }
            }
            <p>{&section.body}</p>
        </section>
    }
}

#[function_component(Home)]
pub fn home() -> Html {
    let content = use_state(|| None::<HomeContent>);

    {
        let content = content.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match fetch_home_content().await {
                        Ok(fetched) => {
                            info!("Loaded home content ({} sections)", fetched.sections.len());
                            content.set(Some(fetched));
                        }
                        Err(e) => {
                            warn!("Falling back to built-in home content: {}", e);
                            content.set(Some(HomeContent::fallback()));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let Some(content) = (*content).clone() else {
        return html! { <div class="home-loading"></div> };
    };

    let sections = html! {
        <div class="home-sections">
            { for content.sections.iter().map(render_section) }
        </div>
    };

    if content.hero.enabled {
        html! {
            <div class="home-page">
                <ScrollExpandHero content={content.hero.clone()}>
                    { sections }
                </ScrollExpandHero>
            </div>
        }
    } else {
        html! {
            <div class="home-page">
                <section
                    class="static-hero"
                    style={format!("background-image: url('{}');", content.hero.hero_image)}
                >
                    <h1>{&content.hero.title}</h1>
                    <p>{&content.hero.subtitle}</p>
                </section>
                { sections }
            </div>
        }
    }
}
