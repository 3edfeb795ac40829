//! Practitioner home: caseload counts and the queue of new reports.

use dioxus::prelude::*;
use store::{DataService, Injury, InjuryStatus};
use ui::icons::{FaClipboardList, FaHeartPulse, FaPersonWalking};
use ui::{use_session_store, ErrorBanner, Icon, Navbar};

use super::widgets::{count_label, EmptyState, InjuryRow, StatCard};

const QUEUE_LIMIT: usize = 10;

#[component]
pub fn PractitionerDashboard() -> Element {
    let store = use_session_store();
    let mut reported = use_signal(|| Option::<u64>::None);
    let mut in_treatment = use_signal(|| Option::<u64>::None);
    let mut recovering = use_signal(|| Option::<u64>::None);
    let mut queue = use_signal(Vec::<Injury>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);

    let _loader = use_resource(move || {
        let store = store.clone();
        async move {
            let data = store.data();
            let counts = [
                (InjuryStatus::Reported, reported),
                (InjuryStatus::InTreatment, in_treatment),
                (InjuryStatus::Recovering, recovering),
            ];
            for (status, mut target) in counts {
                match data.count_injuries_with_status(status).await {
                    Ok(n) => target.set(Some(n)),
                    Err(e) => {
                        tracing::error!(error = %e, status = status.as_str(), "Failed to count injuries");
                        error.set(Some(e.to_string()));
                    }
                }
            }
            match data.injuries_with_status(InjuryStatus::Reported, QUEUE_LIMIT).await {
                Ok(rows) => queue.set(rows),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load new reports");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        }
    });

    rsx! {
        div {
            class: "page",
            Navbar {}

            div {
                class: "container",
                div {
                    class: "page-header",
                    h1 { class: "page-title", "Practitioner Dashboard" }
                    p { class: "muted", "Manage student injuries and treatment plans" }
                }

                if let Some(err) = error() {
                    ErrorBanner { message: err }
                }

                div {
                    class: "grid grid-3",
                    StatCard {
                        icon: rsx! { Icon { icon: FaClipboardList, width: 24, height: 24 } },
                        title: "New Reports",
                        value: count_label(reported()),
                        subtitle: "Awaiting assignment",
                        tone: "blue",
                    }
                    StatCard {
                        icon: rsx! { Icon { icon: FaHeartPulse, width: 24, height: 24 } },
                        title: "In Treatment",
                        value: count_label(in_treatment()),
                        tone: "orange",
                    }
                    StatCard {
                        icon: rsx! { Icon { icon: FaPersonWalking, width: 24, height: 24 } },
                        title: "Recovering",
                        value: count_label(recovering()),
                        tone: "teal",
                    }
                }

                div {
                    class: "card",
                    div {
                        class: "card-header",
                        h2 { class: "card-title", "New Injury Reports" }
                    }
                    if loading() {
                        p { class: "muted", "Loading..." }
                    } else if queue.read().is_empty() {
                        EmptyState {
                            icon: rsx! {},
                            message: "No new injury reports",
                        }
                    } else {
                        div {
                            class: "list",
                            for injury in queue() {
                                InjuryRow { key: "{injury.id}", injury, linked: false }
                            }
                        }
                    }
                }
            }
        }
    }
}
