use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RevealGateProps {
    pub open: bool,
    pub children: Children,
}

pub fn gate_style(open: bool) -> &'static str {
    if open {
        "opacity: 1; pointer-events: auto; transition: opacity 0.8s ease-in;"
    } else {
        "opacity: 0; pointer-events: none; transition: opacity 0.8s ease-in;"
    }
}

/// Keeps the sections below the hero mounted but inert until the hero has expanded.
#[function_component(RevealGate)]
pub fn reveal_gate(props: &RevealGateProps) -> Html {
    html! {
        <div
            class={classes!("reveal-gate", props.open.then(|| "open"))}
            style={gate_style(props.open)}
            aria-hidden={(!props.open).to_string()}
        >
            { for props.children.iter() }
        </div>
    }
}
