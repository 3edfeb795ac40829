use dioxus::prelude::*;

use crate::icons::{FaCircleExclamation, FaLock};
use crate::navigation::use_navigation;
use crate::Icon;

/// Full-page loading indicator.
#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "page-center",
            div {
                class: "text-center",
                div { class: "spinner" }
                p { class: "muted", "{label}" }
            }
        }
    }
}

/// Shown to a signed-in user whose role may not open the current page.
#[component]
pub fn AccessDenied() -> Element {
    let navigator = use_navigation();

    rsx! {
        div {
            class: "page-center",
            div {
                class: "card card-narrow text-center",
                Icon { icon: FaLock, width: 32, height: 32, class: "icon-muted" }
                h2 { class: "card-title", "Access Denied" }
                p { class: "muted", "You don't have permission to access this page." }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| navigator.navigate(routing::paths::ROOT),
                    "Go to Dashboard"
                }
            }
        }
    }
}

/// Inline error message for forms.
#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div {
            class: "alert alert-error",
            Icon { icon: FaCircleExclamation, width: 16, height: 16 }
            span { "{message}" }
        }
    }
}
