//! This crate contains all shared UI for the workspace.

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod session;
pub use session::{use_session, use_session_store, AppSession, SessionProvider};

mod navigation;
pub use navigation::{use_current_path, use_navigation, NavigationProvider};

mod guard;
pub use guard::RouteGuard;

mod link;
pub use link::{Link, LinkVariant};

mod navbar;
pub use navbar::{Brand, Navbar, SignOutButton};

mod status;
pub use status::{AccessDenied, ErrorBanner, Spinner};

mod timer;
pub use timer::sleep;
