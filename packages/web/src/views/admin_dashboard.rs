//! Admin home: system-wide counts.

use dioxus::prelude::*;
use store::{DataService, InjuryStatus, Role};
use ui::icons::{FaCircleCheck, FaTriangleExclamation, FaUserDoctor, FaUserGraduate};
use ui::{use_session_store, ErrorBanner, Icon, Navbar};

use super::widgets::{count_label, StatCard};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Totals {
    students: Option<u64>,
    practitioners: Option<u64>,
    open_injuries: Option<u64>,
    resolved: Option<u64>,
}

#[component]
pub fn AdminDashboard() -> Element {
    let store = use_session_store();
    let mut totals = use_signal(Totals::default);
    let mut error = use_signal(|| Option::<String>::None);

    let _loader = use_resource(move || {
        let store = store.clone();
        async move {
            let data = store.data();
            let mut failed = None;
            let mut keep = |result: store::Result<u64>| match result {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load admin totals");
                    failed = Some(e.to_string());
                    None
                }
            };

            let loaded = Totals {
                students: keep(data.count_profiles(Role::Student).await),
                practitioners: keep(data.count_profiles(Role::Practitioner).await),
                open_injuries: keep(data.count_open_injuries().await),
                resolved: keep(data.count_injuries_with_status(InjuryStatus::Resolved).await),
            };
            totals.set(loaded);
            if failed.is_some() {
                error.set(failed);
            }
        }
    });

    let t = totals();

    rsx! {
        div {
            class: "page",
            Navbar {}

            div {
                class: "container",
                div {
                    class: "page-header",
                    h1 { class: "page-title", "Admin Dashboard" }
                    p { class: "muted", "System overview and user management" }
                }

                if let Some(err) = error() {
                    ErrorBanner { message: err }
                }

                div {
                    class: "grid grid-4",
                    StatCard {
                        icon: rsx! { Icon { icon: FaUserGraduate, width: 24, height: 24 } },
                        title: "Students",
                        value: count_label(t.students),
                        tone: "blue",
                    }
                    StatCard {
                        icon: rsx! { Icon { icon: FaUserDoctor, width: 24, height: 24 } },
                        title: "Practitioners",
                        value: count_label(t.practitioners),
                        tone: "purple",
                    }
                    StatCard {
                        icon: rsx! { Icon { icon: FaTriangleExclamation, width: 24, height: 24 } },
                        title: "Open Injuries",
                        value: count_label(t.open_injuries),
                        subtitle: "Not yet resolved",
                        tone: "orange",
                    }
                    StatCard {
                        icon: rsx! { Icon { icon: FaCircleCheck, width: 24, height: 24 } },
                        title: "Resolved",
                        value: count_label(t.resolved),
                        tone: "green",
                    }
                }
            }
        }
    }
}
