use dioxus::prelude::*;

use crate::icons::{FaArrowRightFromBracket, FaHeartPulse};
use crate::navigation::use_navigation;
use crate::session::{use_session, use_session_store};
use crate::Icon;

/// Top bar of the dashboards: brand, greeting and sign-out.
#[component]
pub fn Navbar() -> Element {
    let session = use_session();
    let name = session
        .read()
        .profile
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_default();

    rsx! {
        nav {
            class: "navbar",
            div {
                class: "navbar-inner",
                Brand {}
                div {
                    class: "navbar-actions",
                    span {
                        class: "muted",
                        "Welcome, "
                        span { class: "strong", "{name}" }
                    }
                    SignOutButton {}
                }
            }
        }
    }
}

#[component]
pub fn Brand() -> Element {
    rsx! {
        div {
            class: "brand",
            Icon { icon: FaHeartPulse, width: 28, height: 28, class: "brand-icon" }
            span { class: "brand-name", "DUT SportCare" }
        }
    }
}

/// Signs out and returns to the login page.
#[component]
pub fn SignOutButton(#[props(default = "Sign Out".to_string())] label: String) -> Element {
    let store = use_session_store();
    let navigator = use_navigation();

    let onclick = move |_| {
        let store = store.clone();
        let navigator = navigator.clone();
        async move {
            store.sign_out().await;
            navigator.navigate(routing::paths::LOGIN);
        }
    };

    rsx! {
        button {
            class: "btn btn-ghost",
            onclick: onclick,
            Icon { icon: FaArrowRightFromBracket, width: 14, height: 14 }
            "{label}"
        }
    }
}
