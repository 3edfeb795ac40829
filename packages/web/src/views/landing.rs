//! Public landing page.

use dioxus::prelude::*;
use routing::paths;
use ui::icons::{FaHeart, FaHeartPulse, FaShieldHalved, FaUsers};
use ui::{Brand, Icon, Link, LinkVariant};

#[component]
pub fn Landing() -> Element {
    rsx! {
        div {
            class: "page page-gradient",

            nav {
                class: "navbar navbar-sticky",
                div {
                    class: "navbar-inner",
                    Brand {}
                    div {
                        class: "navbar-actions",
                        Link { to: paths::LOGIN, variant: LinkVariant::Secondary, "Sign In" }
                        Link { to: paths::REGISTER, "Get Started" }
                    }
                }
            }

            main {
                section {
                    class: "hero",
                    h1 {
                        class: "hero-title",
                        "Comprehensive Injury Management for"
                        span { class: "hero-accent", "DUT Student Athletes" }
                    }
                    p {
                        class: "hero-lead",
                        "A complete platform connecting injured athletes with healthcare practitioners for faster recovery and better outcomes"
                    }
                    div {
                        class: "hero-actions",
                        Link { to: paths::REGISTER, large: true, "Start Your Recovery Journey" }
                        Link { to: paths::LOGIN, variant: LinkVariant::Outline, large: true, "Sign In to Your Account" }
                    }
                }

                section {
                    class: "section",
                    h2 { class: "section-title", "Why Choose DUT SportCare?" }
                    div {
                        class: "grid grid-4",
                        FeatureCard {
                            icon: rsx! { Icon { icon: FaHeartPulse, width: 32, height: 32 } },
                            title: "Track Recovery",
                            description: "Monitor injury progress with detailed logs and practitioner updates",
                        }
                        FeatureCard {
                            icon: rsx! { Icon { icon: FaUsers, width: 32, height: 32 } },
                            title: "Expert Practitioners",
                            description: "Connect with physiotherapists, chiropractors, and somatologists",
                        }
                        FeatureCard {
                            icon: rsx! { Icon { icon: FaHeart, width: 32, height: 32 } },
                            title: "Personalized Care",
                            description: "Receive customized recovery plans and exercise prescriptions",
                        }
                        FeatureCard {
                            icon: rsx! { Icon { icon: FaShieldHalved, width: 32, height: 32 } },
                            title: "Secure Platform",
                            description: "Your medical data is protected with enterprise-grade security",
                        }
                    }
                }

                section {
                    class: "section section-white",
                    h2 { class: "section-title", "How It Works" }
                    div {
                        class: "grid grid-3",
                        Step {
                            number: 1,
                            title: "Report Your Injury",
                            description: "Log your injury details, severity, and upload medical documentation",
                        }
                        Step {
                            number: 2,
                            title: "Get Assigned",
                            description: "A health coordinator assigns you to the right practitioner for your needs",
                        }
                        Step {
                            number: 3,
                            title: "Track Progress",
                            description: "Work with your practitioner, book appointments, and monitor your recovery",
                        }
                    }
                }

                section {
                    class: "section section-cta",
                    h2 { class: "section-title", "Ready to Start Your Recovery?" }
                    p { class: "hero-lead", "Join DUT SportCare today and get connected with the care you need" }
                    Link { to: paths::REGISTER, variant: LinkVariant::White, large: true, "Create Your Account" }
                }
            }

            footer {
                class: "footer",
                Brand {}
                p { class: "small", "Durban University of Technology Student Athlete Injury Management System" }
                p { class: "small muted", "© 2025 DUT SportCare. All rights reserved." }
            }
        }
    }
}

#[component]
fn FeatureCard(icon: Element, title: String, description: String) -> Element {
    rsx! {
        div {
            class: "card feature-card",
            div { class: "feature-icon", {icon} }
            h3 { class: "card-title", "{title}" }
            p { class: "muted", "{description}" }
        }
    }
}

#[component]
fn Step(number: u8, title: String, description: String) -> Element {
    rsx! {
        div {
            class: "step",
            div { class: "step-number", "{number}" }
            h3 { class: "card-title", "{title}" }
            p { class: "muted", "{description}" }
        }
    }
}
