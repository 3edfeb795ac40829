use dioxus::prelude::*;

use crate::navigation::use_navigation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    White,
    /// Plain text link.
    Text,
}

impl LinkVariant {
    fn class(&self) -> &'static str {
        match self {
            LinkVariant::Primary => "btn btn-primary",
            LinkVariant::Secondary => "btn btn-secondary",
            LinkVariant::Outline => "btn btn-outline",
            LinkVariant::White => "btn btn-white",
            LinkVariant::Text => "link",
        }
    }
}

/// Anchor that navigates in place instead of reloading the page.
#[component]
pub fn Link(
    #[props(into)] to: String,
    #[props(default)] variant: LinkVariant,
    #[props(default = false)] large: bool,
    #[props(default)] class: String,
    children: Element,
) -> Element {
    let navigator = use_navigation();
    let size = if large { "btn-large" } else { "" };
    let classes = format!("{} {size} {class}", variant.class());
    let target = to.clone();

    rsx! {
        a {
            href: "{to}",
            class: "{classes}",
            onclick: move |evt: MouseEvent| {
                evt.prevent_default();
                navigator.navigate(&target);
            },
            {children}
        }
    }
}
