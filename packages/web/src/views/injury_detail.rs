//! A single injury as seen by the student who reported it.

use dioxus::prelude::*;
use routing::paths;
use store::{AuthProvider, DataService, Injury, SessionStore};
use ui::icons::FaCircleExclamation;
use ui::{use_session, use_session_store, ErrorBanner, Icon, Navbar, Spinner};

use super::widgets::{format_date, format_day, BackLink, EmptyState, SeverityBadge, StatusBadge};

#[component]
pub fn InjuryDetail(injury_id: String) -> Element {
    let store = use_session_store();
    let session = use_session();
    let mut injury = use_signal(|| Option::<Injury>::None);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| Option::<String>::None);

    // Re-runs when the id prop changes.
    let _loader = use_resource(use_reactive!(|(injury_id,)| {
        let store = store.clone();
        async move {
            loading.set(true);
            error.set(None);
            injury.set(None);
            let student_id = session.read().user_id().map(str::to_string);
            if let Some(student_id) = student_id {
                match load_owned_injury(&store, &injury_id, &student_id).await {
                    Ok(found) => injury.set(found),
                    Err(e) => {
                        tracing::error!(error = %e, injury_id = %injury_id, "Failed to load injury");
                        error.set(Some(e.to_string()));
                    }
                }
            }
            loading.set(false);
        }
    }));

    let content = if loading() {
        rsx! { Spinner { label: "Loading injury..." } }
    } else if let Some(err) = error() {
        rsx! { ErrorBanner { message: err } }
    } else if let Some(injury) = injury() {
        rsx! { InjuryCard { injury } }
    } else {
        rsx! {
            EmptyState {
                icon: rsx! { Icon { icon: FaCircleExclamation, width: 48, height: 48, class: "icon-muted" } },
                message: "Injury not found",
            }
        }
    };

    rsx! {
        div {
            class: "page",
            Navbar {}
            div {
                class: "container container-narrow",
                BackLink { to: paths::STUDENT_DASHBOARD, label: "Back to Dashboard" }
                {content}
            }
        }
    }
}

/// The injury with `injury_id` if it belongs to `student_id`. Anyone else's
/// report reads as missing.
async fn load_owned_injury<A: AuthProvider, D: DataService>(
    store: &SessionStore<A, D>,
    injury_id: &str,
    student_id: &str,
) -> store::Result<Option<Injury>> {
    let found = store.data().fetch_injury(injury_id).await?;
    Ok(found.filter(|i| i.student_id == student_id))
}

#[component]
fn InjuryCard(injury: Injury) -> Element {
    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                div {
                    h1 { class: "page-title", "{injury.injury_type}" }
                    p { class: "muted", "{injury.body_part}" }
                }
                div {
                    class: "row-meta",
                    SeverityBadge { severity: injury.severity }
                    StatusBadge { status: injury.status }
                }
            }

            dl {
                class: "details",
                dt { "Date occurred" }
                dd { "{format_day(&injury.date_occurred)}" }
                dt { "Reported" }
                dd { "{format_date(&injury.date_reported)}" }
                dt { "Last updated" }
                dd { "{format_date(&injury.updated_at)}" }
            }

            h2 { class: "section-label", "Description" }
            p { class: "description", "{injury.description}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use store::{Error, InjuryReport, MemoryAuth, MemoryData, Role};

    async fn store_with_injury() -> (SessionStore<MemoryAuth, MemoryData>, MemoryData, Injury) {
        let auth = MemoryAuth::new();
        let data = MemoryData::new();
        let user = auth.add_account("owner@example.com", "password1");
        data.add_profile(&user, "Owner", Role::Student);
        auth.set_session(Some(MemoryAuth::session_for(&user)));
        let store = SessionStore::new(auth, data.clone());
        store.initialize().await;

        let mut report = InjuryReport::new(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        report.injury_type = "Sprain".to_string();
        report.body_part = "Ankle".to_string();
        report.description = "Rolled it on the court".to_string();
        let injury = store.report_injury(report).await.unwrap();
        (store, data, injury)
    }

    #[tokio::test]
    async fn test_owner_sees_injury() {
        let (store, _data, injury) = store_with_injury().await;
        let found = load_owned_injury(&store, &injury.id, &injury.student_id).await;
        assert_eq!(found, Ok(Some(injury)));
    }

    #[tokio::test]
    async fn test_other_student_gets_nothing() {
        let (store, _data, injury) = store_with_injury().await;
        let found = load_owned_injury(&store, &injury.id, "someone-else").await;
        assert_eq!(found, Ok(None));
    }

    #[tokio::test]
    async fn test_failed_load_does_not_stick() {
        let (store, data, injury) = store_with_injury().await;
        data.fail_next_injury_fetch(Error::data("connection reset"));

        assert!(load_owned_injury(&store, &injury.id, &injury.student_id).await.is_err());
        let again = load_owned_injury(&store, &injury.id, &injury.student_id).await;
        assert_eq!(again, Ok(Some(injury)));
    }
}
