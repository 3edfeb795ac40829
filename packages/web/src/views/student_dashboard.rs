//! Student home: recent injuries and upcoming appointments.

use dioxus::prelude::*;
use routing::paths;
use store::{Appointment, DataService, Injury};
use ui::icons::{FaCalendar, FaPlus};
use ui::{use_session, use_session_store, ErrorBanner, Icon, Link, LinkVariant, Navbar};

use super::widgets::{format_time, EmptyState, InjuryRow};

const LIST_LIMIT: usize = 5;

#[component]
pub fn StudentDashboard() -> Element {
    let store = use_session_store();
    let session = use_session();
    let mut injuries = use_signal(Vec::<Injury>::new);
    let mut appointments = use_signal(Vec::<Appointment>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);

    let _loader = use_resource(move || {
        let store = store.clone();
        async move {
            let Some(student_id) = session.read().user_id().map(str::to_string) else {
                return;
            };
            let data = store.data();

            match data.recent_injuries(&student_id, LIST_LIMIT).await {
                Ok(rows) => injuries.set(rows),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load injuries");
                    error.set(Some(e.to_string()));
                }
            }
            match data.upcoming_appointments(&student_id, LIST_LIMIT).await {
                Ok(rows) => appointments.set(rows),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load appointments");
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
                    h1 { class: "page-title", "Student Dashboard" }
                    p { class: "muted", "Track your injuries and manage your recovery" }
                }

                if let Some(err) = error() {
                    ErrorBanner { message: err }
                }

                div {
                    class: "grid grid-4 quick-actions",
                    Link {
                        to: paths::REPORT_INJURY,
                        variant: LinkVariant::Text,
                        class: "quick-action tone-teal",
                        Icon { icon: FaPlus, width: 24, height: 24 }
                        div { class: "strong", "Report Injury" }
                    }
                }

                div {
                    class: "grid grid-2",

                    div {
                        class: "card",
                        div {
                            class: "card-header",
                            h2 { class: "card-title", "Recent Injuries" }
                            Link { to: paths::REPORT_INJURY, variant: LinkVariant::Text, "Report New" }
                        }
                        if loading() {
                            p { class: "muted", "Loading..." }
                        } else if injuries.read().is_empty() {
                            EmptyState {
                                icon: rsx! {},
                                message: "No injuries reported yet",
                            }
                            div {
                                class: "text-center",
                                Link {
                                    to: paths::REPORT_INJURY,
                                    Icon { icon: FaPlus, width: 14, height: 14 }
                                    "Report Your First Injury"
                                }
                            }
                        } else {
                            div {
                                class: "list",
                                for injury in injuries() {
                                    InjuryRow { key: "{injury.id}", injury }
                                }
                            }
                        }
                    }

                    div {
                        class: "card",
                        div {
                            class: "card-header",
                            h2 { class: "card-title", "Upcoming Appointments" }
                        }
                        if loading() {
                            p { class: "muted", "Loading..." }
                        } else if appointments.read().is_empty() {
                            EmptyState {
                                icon: rsx! { Icon { icon: FaCalendar, width: 48, height: 48, class: "icon-muted" } },
                                message: "No upcoming appointments",
                            }
                        } else {
                            div {
                                class: "list",
                                for appointment in appointments() {
                                    AppointmentRow { key: "{appointment.id}", appointment }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AppointmentRow(appointment: Appointment) -> Element {
    let practitioner = appointment
        .practitioner
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_else(|| "Unassigned practitioner".to_string());

    rsx! {
        div {
            class: "list-row",
            div {
                class: "row-header",
                span { class: "strong small", "{practitioner}" }
                span { class: "badge badge-blue", "{appointment.status}" }
            }
            div { class: "muted small", "{format_time(&appointment.appointment_date)}" }
            if let Some(location) = &appointment.location {
                div { class: "muted tiny", "{location}" }
            }
        }
    }
}
