//! Injury report form.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use dioxus::prelude::*;
use routing::paths;
use store::{InjuryReport, Severity, BODY_PARTS, INJURY_TYPES};
use ui::icons::FaCircleCheck;
use ui::{sleep, use_navigation, use_session_store, ErrorBanner, Icon};

use super::widgets::BackLink;

/// How long the confirmation stays up before returning to the dashboard.
const CONFIRMATION_DELAY: Duration = Duration::from_secs(2);

#[component]
pub fn ReportInjury() -> Element {
    let store = use_session_store();
    let navigator = use_navigation();
    let today = Utc::now().date_naive();

    let mut injury_type = use_signal(String::new);
    let mut body_part = use_signal(String::new);
    let mut severity = use_signal(|| Severity::Moderate);
    let mut description = use_signal(String::new);
    let mut date_occurred = use_signal(move || today.format("%Y-%m-%d").to_string());
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let mut submitted = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        let navigator = navigator.clone();
        spawn(async move {
            error.set(None);

            let Ok(date) = NaiveDate::parse_from_str(&date_occurred(), "%Y-%m-%d") else {
                error.set(Some("Please enter the date the injury occurred".to_string()));
                return;
            };
            let report = InjuryReport {
                injury_type: injury_type(),
                body_part: body_part(),
                severity: severity(),
                description: description(),
                date_occurred: date,
            };

            loading.set(true);
            match store.report_injury(report).await {
                Ok(_) => {
                    submitted.set(true);
                    sleep(CONFIRMATION_DELAY).await;
                    navigator.navigate(paths::STUDENT_DASHBOARD);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    if submitted() {
        return rsx! {
            div {
                class: "page page-center",
                div {
                    class: "card card-narrow text-center",
                    div {
                        class: "success-icon",
                        Icon { icon: FaCircleCheck, width: 32, height: 32 }
                    }
                    h2 { class: "card-title", "Injury Reported" }
                    p {
                        class: "muted",
                        "Your injury has been reported successfully. A health coordinator will assign you to a practitioner soon."
                    }
                }
            }
        };
    }

    let max_date = today.format("%Y-%m-%d").to_string();

    rsx! {
        div {
            class: "page",
            div {
                class: "container container-narrow",
                BackLink { to: paths::STUDENT_DASHBOARD, label: "Back to Dashboard" }

                div {
                    class: "card",
                    h1 { class: "page-title", "Report an Injury" }
                    p { class: "muted", "Provide details about your injury so we can connect you with the right care" }

                    if let Some(err) = error() {
                        ErrorBanner { message: err }
                    }

                    form {
                        class: "form",
                        onsubmit: handle_submit,

                        div {
                            class: "grid grid-2",
                            div {
                                label { class: "form-label", "Injury Type" }
                                select {
                                    class: "input",
                                    required: true,
                                    value: injury_type(),
                                    onchange: move |evt: FormEvent| injury_type.set(evt.value()),
                                    option { value: "", "Select injury type" }
                                    for kind in INJURY_TYPES {
                                        option { key: "{kind}", value: "{kind}", "{kind}" }
                                    }
                                }
                            }
                            div {
                                label { class: "form-label", "Body Part" }
                                select {
                                    class: "input",
                                    required: true,
                                    value: body_part(),
                                    onchange: move |evt: FormEvent| body_part.set(evt.value()),
                                    option { value: "", "Select body part" }
                                    for part in BODY_PARTS {
                                        option { key: "{part}", value: "{part}", "{part}" }
                                    }
                                }
                            }
                        }

                        label { class: "form-label", "Severity" }
                        div {
                            class: "segmented",
                            for level in Severity::ALL {
                                button {
                                    key: "{level.as_str()}",
                                    r#type: "button",
                                    class: segment_class(level, severity()),
                                    onclick: move |_| severity.set(level),
                                    "{level.as_str()}"
                                }
                            }
                        }

                        label { class: "form-label", "Date Occurred" }
                        input {
                            class: "input",
                            r#type: "date",
                            required: true,
                            max: "{max_date}",
                            value: date_occurred(),
                            oninput: move |evt: FormEvent| date_occurred.set(evt.value()),
                        }

                        label { class: "form-label", "Description" }
                        textarea {
                            class: "input",
                            rows: 5,
                            required: true,
                            placeholder: "Describe how the injury happened and any symptoms you are experiencing",
                            value: description(),
                            oninput: move |evt: FormEvent| description.set(evt.value()),
                        }

                        button {
                            class: "btn btn-primary btn-block",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Submitting..." } else { "Submit Report" }
                        }
                    }
                }
            }
        }
    }
}

fn segment_class(level: Severity, selected: Severity) -> String {
    if level == selected {
        format!("segment segment-active severity-{}", level.as_str())
    } else {
        "segment".to_string()
    }
}
