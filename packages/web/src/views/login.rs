//! Login page view with email/password form.

use dioxus::prelude::*;
use routing::paths;
use ui::{use_session_store, Brand, ErrorBanner, Link, LinkVariant};

/// Login page component.
///
/// A successful sign in does not navigate by itself; once the profile is loaded
/// the router sends the user to their dashboard.
#[component]
pub fn Login() -> Element {
    let store = use_session_store();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            if let Err(e) = store.sign_in(&email(), &password()).await {
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
                    h1 { class: "page-title", "Welcome Back" }
                    p { class: "muted", "Sign in to access your account" }
                }

                div {
                    class: "card",
                    if let Some(err) = error() {
                        ErrorBanner { message: err }
                    }

                    form {
                        class: "form",
                        onsubmit: handle_login,

                        label { r#for: "email", class: "form-label", "Email Address" }
                        input {
                            id: "email",
                            class: "input",
                            r#type: "email",
                            required: true,
                            placeholder: "your.email@dut.ac.za",
                            value: email(),
                            oninput: move |evt: FormEvent| email.set(evt.value()),
                        }

                        label { r#for: "password", class: "form-label", "Password" }
                        input {
                            id: "password",
                            class: "input",
                            r#type: "password",
                            required: true,
                            placeholder: "Enter your password",
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }

                        button {
                            class: "btn btn-primary btn-block",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Signing in..." } else { "Sign In" }
                        }
                    }

                    p {
                        class: "form-footer",
                        "Don't have an account? "
                        Link { to: paths::REGISTER, variant: LinkVariant::Text, "Create one" }
                    }
                }
            }
        }
    }
}
