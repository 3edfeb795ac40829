//! # Navigation context
//!
//! [`NavigationProvider`] owns the application's [`Navigator`] and exposes the
//! current path as a signal, so anything that reads it re-renders on every
//! navigation.
//!
//! In the browser the navigator sits on top of `window.history`. Back and forward
//! are asynchronous there: the provider listens for `popstate` and re-reads the
//! location. Elsewhere an in-memory history is used.

use std::rc::Rc;

use dioxus::prelude::*;
use routing::Navigator;

pub fn use_navigation() -> Navigator {
    use_context::<Navigator>()
}

pub fn use_current_path() -> Signal<String> {
    use_context::<Signal<String>>()
}

#[component]
pub fn NavigationProvider(children: Element) -> Element {
    let navigator = use_hook(new_navigator);
    let path = use_signal(|| navigator.current_path());

    let _subscription = use_hook(|| {
        Rc::new(navigator.subscribe(move |next: &str| {
            let mut path = path;
            path.set(next.to_string());
        }))
    });

    #[cfg(target_arch = "wasm32")]
    {
        let popstate = use_hook(|| Rc::new(browser::PopStateListener::attach(navigator.clone())));
        use_drop(move || popstate.detach());
    }

    use_context_provider(|| navigator.clone());
    use_context_provider(|| path);

    rsx! {
        {children}
    }
}

#[cfg(target_arch = "wasm32")]
fn new_navigator() -> Navigator {
    Navigator::new(browser::BrowserHistory)
}

#[cfg(not(target_arch = "wasm32"))]
fn new_navigator() -> Navigator {
    Navigator::in_memory(routing::paths::ROOT)
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use routing::{History, Navigator};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    fn history() -> Option<web_sys::History> {
        web_sys::window()?.history().ok()
    }

    /// `window.history` and `window.location`.
    pub struct BrowserHistory;

    impl History for BrowserHistory {
        fn location(&self) -> String {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| routing::paths::ROOT.to_string())
        }

        fn push(&self, path: &str) {
            let Some(history) = history() else { return };
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                tracing::warn!(path, error = ?e, "pushState failed");
            }
        }

        fn replace(&self, path: &str) {
            let Some(history) = history() else { return };
            if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(path)) {
                tracing::warn!(path, error = ?e, "replaceState failed");
            }
        }

        fn back(&self) -> Option<String> {
            if let Err(e) = history()?.back() {
                tracing::warn!(error = ?e, "history.back failed");
            }
            None
        }

        fn forward(&self) -> Option<String> {
            if let Err(e) = history()?.forward() {
                tracing::warn!(error = ?e, "history.forward failed");
            }
            None
        }
    }

    /// Keeps a `popstate` listener registered on `window` until detached.
    pub struct PopStateListener {
        callback: Closure<dyn FnMut()>,
    }

    impl PopStateListener {
        pub fn attach(navigator: Navigator) -> Self {
            let callback = Closure::<dyn FnMut()>::new(move || navigator.sync_from_history());
            if let Some(window) = web_sys::window() {
                if let Err(e) = window
                    .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
                {
                    tracing::warn!(error = ?e, "Could not listen for popstate");
                }
            }
            Self { callback }
        }

        pub fn detach(&self) {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.remove_event_listener_with_callback(
                    "popstate",
                    self.callback.as_ref().unchecked_ref(),
                ) {
                    tracing::warn!(error = ?e, "Could not remove popstate listener");
                }
            }
        }
    }
}
