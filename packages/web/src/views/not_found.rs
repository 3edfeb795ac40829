use dioxus::prelude::*;
use routing::paths;
use ui::{Link, LinkVariant};

/// Fallback for paths no route declares.
#[component]
pub fn NotFound() -> Element {
    rsx! {
        div {
            class: "page page-center",
            div {
                class: "card card-narrow text-center",
                h2 { class: "card-title", "Page Not Found" }
                p { class: "muted", "The page you are looking for does not exist." }
                Link { to: paths::ROOT, variant: LinkVariant::Primary, "Back to Home" }
            }
        }
    }
}
