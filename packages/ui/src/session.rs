//! Session context for the component tree.

use std::rc::Rc;

use api::HostedService;
use dioxus::prelude::*;
use store::{ServiceConfig, SessionState, SessionStore};

/// The session store wired to the hosted service.
pub type AppSession = SessionStore<HostedService, HostedService>;

/// Snapshot of the session that re-renders readers when it changes.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Handle for session actions (sign in, sign up, sign out, reporting).
pub fn use_session_store() -> AppSession {
    use_context::<AppSession>()
}

/// Owns the application's [`AppSession`].
///
/// Creates the store once, mirrors its state into a signal, runs its event loop
/// for as long as the provider is mounted and tears it down on unmount.
#[component]
pub fn SessionProvider(config: ServiceConfig, children: Element) -> Element {
    let store = use_hook(|| {
        let service = HostedService::from_config(config.clone());
        SessionStore::new(service.clone(), service)
    });
    let state = use_signal(|| store.state());

    let _watch = use_hook(|| {
        Rc::new(store.watch(move |next: &SessionState| {
            let mut state = state;
            state.set(next.clone());
        }))
    });

    let runner = store.clone();
    use_future(move || {
        let store = runner.clone();
        async move { store.run().await }
    });

    let owner = store.clone();
    use_drop(move || owner.teardown());

    use_context_provider(|| store.clone());
    use_context_provider(|| state);

    rsx! {
        {children}
    }
}
