//! Registration page view with email/password and profile form.

use dioxus::prelude::*;
use routing::paths;
use store::{Registration, Role, MIN_PASSWORD_LEN};
use ui::{use_session_store, Brand, ErrorBanner, Link, LinkVariant};

/// Roles that may sign themselves up. Admin accounts are provisioned.
const SELF_SERVICE_ROLES: [Role; 2] = [Role::Student, Role::Practitioner];

/// Register page component.
#[component]
pub fn Register() -> Element {
    let store = use_session_store();
    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut role = use_signal(|| Role::Student);
    let mut sport = use_signal(String::new);
    let mut student_number = use_signal(String::new);
    let mut specialization = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            error.set(None);

            if password() != confirm_password() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            let mut registration = Registration::new(full_name(), role());
            registration.phone = Some(phone());
            match role() {
                Role::Student => {
                    registration.sport = Some(sport());
                    registration.student_number = Some(student_number());
                }
                Role::Practitioner => registration.specialization = Some(specialization()),
                Role::Admin => {}
            }

            loading.set(true);
            if let Err(e) = store.sign_up(&email(), &password(), registration).await {
                error.set(Some(e.to_string()));
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "page page-gradient page-center",
            div {
                class: "auth-panel",
                div {
                    class: "text-center",
                    Brand {}
                    h1 { class: "page-title", "Create Your Account" }
                    p { class: "muted", "Join DUT SportCare to manage your recovery" }
                }

                div {
                    class: "card",
                    if let Some(err) = error() {
                        ErrorBanner { message: err }
                    }

                    form {
                        class: "form",
                        onsubmit: handle_register,

                        label { class: "form-label", "I am a" }
                        div {
                            class: "segmented",
                            for (option, label) in SELF_SERVICE_ROLES.map(|r| (r, r.label())) {
                                button {
                                    key: "{option}",
                                    r#type: "button",
                                    class: if role() == option { "segment segment-active" } else { "segment" },
                                    onclick: move |_| role.set(option),
                                    "{label}"
                                }
                            }
                        }

                        label { class: "form-label", "Full Name" }
                        input {
                            class: "input",
                            r#type: "text",
                            required: true,
                            placeholder: "Your full name",
                            value: full_name(),
                            oninput: move |evt: FormEvent| full_name.set(evt.value()),
                        }

                        label { class: "form-label", "Email Address" }
                        input {
                            class: "input",
                            r#type: "email",
                            required: true,
                            placeholder: "your.email@dut.ac.za",
                            value: email(),
                            oninput: move |evt: FormEvent| email.set(evt.value()),
                        }

                        if role() == Role::Student {
                            label { class: "form-label", "Student Number" }
                            input {
                                class: "input",
                                r#type: "text",
                                placeholder: "e.g. 21912345",
                                value: student_number(),
                                oninput: move |evt: FormEvent| student_number.set(evt.value()),
                            }

                            label { class: "form-label", "Sport" }
                            input {
                                class: "input",
                                r#type: "text",
                                placeholder: "e.g. Rugby",
                                value: sport(),
                                oninput: move |evt: FormEvent| sport.set(evt.value()),
                            }
                        } else {
                            label { class: "form-label", "Specialization" }
                            input {
                                class: "input",
                                r#type: "text",
                                placeholder: "e.g. Physiotherapy",
                                value: specialization(),
                                oninput: move |evt: FormEvent| specialization.set(evt.value()),
                            }
                        }

                        label { class: "form-label", "Phone (optional)" }
                        input {
                            class: "input",
                            r#type: "tel",
                            value: phone(),
                            oninput: move |evt: FormEvent| phone.set(evt.value()),
                        }

                        label { class: "form-label", "Password" }
                        input {
                            class: "input",
                            r#type: "password",
                            required: true,
                            placeholder: "At least {MIN_PASSWORD_LEN} characters",
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }

                        label { class: "form-label", "Confirm Password" }
                        input {
                            class: "input",
                            r#type: "password",
                            required: true,
                            value: confirm_password(),
                            oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                        }

                        button {
                            class: "btn btn-primary btn-block",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Creating account..." } else { "Create Account" }
                        }
                    }

                    p {
                        class: "form-footer",
                        "Already have an account? "
                        Link { to: paths::LOGIN, variant: LinkVariant::Text, "Sign in" }
                    }
                }
            }
        }
    }
}
