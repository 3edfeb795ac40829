//! Guard component in front of protected views.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use routing::Access;
use store::Role;

use crate::navigation::use_navigation;
use crate::session::use_session;
use crate::status::{AccessDenied, Spinner};

/// Renders `children` only for a signed-in user whose role is in `allowed_roles`
/// (any role when `None`). A user whose profile is not loaded yet is let through.
///
/// While the session is loading a spinner is shown. A visitor without a user is
/// sent to the login page once, from an effect, and sees nothing in the meantime.
#[component]
pub fn RouteGuard(allowed_roles: Option<Vec<Role>>, children: Element) -> Element {
    let session = use_session();
    let navigator = use_navigation();
    let guard = use_hook(|| Rc::new(RefCell::new(routing::RouteGuard::new(allowed_roles.clone()))));

    let observer = guard.clone();
    use_effect(move || {
        let state = session();
        observer.borrow_mut().observe(&state, &navigator);
    });

    let access = guard.borrow().access(&session.read());
    match access {
        Access::Loading => rsx! { Spinner {} },
        Access::Unauthenticated => rsx! {},
        Access::Forbidden => rsx! { AccessDenied {} },
        Access::Authorized => children,
    }
}
