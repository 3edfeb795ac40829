use std::rc::Rc;

use dioxus::prelude::*;
use routing::{landing_redirect, paths, RouteTable};
use store::{Role, ServiceConfig};
use ui::{
    use_current_path, use_navigation, use_session, NavigationProvider, RouteGuard,
    SessionProvider,
};
use views::{
    AdminDashboard, InjuryDetail, Landing, Login, NotFound, PractitionerDashboard, Register,
    ReportInjury, StudentDashboard,
};

mod views;

const MAIN_CSS: Asset = asset!("/assets/main.css");
const CONFIG_TOML: &str = include_str!("../sportcare.toml");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Landing,
    Login,
    Register,
    StudentDashboard,
    ReportInjury,
    InjuryDetail,
    PractitionerDashboard,
    AdminDashboard,
    NotFound,
}

fn routes() -> RouteTable<Page> {
    RouteTable::new()
        .route(paths::ROOT, Page::Landing)
        .route(paths::LOGIN, Page::Login)
        .route(paths::REGISTER, Page::Register)
        .route(paths::STUDENT_DASHBOARD, Page::StudentDashboard)
        .route(paths::REPORT_INJURY, Page::ReportInjury)
        .route(paths::INJURY_DETAIL, Page::InjuryDetail)
        .route(paths::PRACTITIONER_DASHBOARD, Page::PractitionerDashboard)
        .route(paths::ADMIN_DASHBOARD, Page::AdminDashboard)
        .route(paths::WILDCARD, Page::NotFound)
}

/// Embedded `sportcare.toml`, overridden by build-time environment variables.
fn load_config() -> ServiceConfig {
    let config = ServiceConfig::from_toml(CONFIG_TOML).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid embedded {}", ServiceConfig::filename());
        ServiceConfig::default()
    });
    let config = config.with_overrides(option_env!("SPORTCARE_URL"), option_env!("SPORTCARE_ANON_KEY"));
    let config = runtime_overrides(config);
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "Hosted service is not configured");
    }
    config
}

/// Native builds may point at another project through the environment or `.env`.
#[cfg(not(target_arch = "wasm32"))]
fn runtime_overrides(config: ServiceConfig) -> ServiceConfig {
    match ServiceConfig::from_env() {
        Ok(env) => {
            tracing::info!(url = env.base_url(), "Using service from environment");
            env
        }
        Err(e) => {
            tracing::debug!(error = %e, "No service in environment");
            config
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_overrides(config: ServiceConfig) -> ServiceConfig {
    config
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        NavigationProvider {
            SessionProvider {
                config,
                AppRouter {}
            }
        }
    }
}

/// Renders the page for the current path and sends signed-in users from the
/// public pages to their dashboard.
#[component]
fn AppRouter() -> Element {
    let table = use_hook(|| Rc::new(routes()));
    let path = use_current_path();
    let session = use_session();
    let navigator = use_navigation();

    use_effect(move || {
        let current = path();
        let state = session();
        if let Some(target) = landing_redirect(&current, &state) {
            tracing::info!(from = %current, to = target, "Redirecting to dashboard");
            navigator.navigate(target);
        }
    });

    let current = path();
    let Some(matched) = table.resolve(&current) else {
        return rsx! {};
    };

    match *matched.view {
        Page::Landing => rsx! { Landing {} },
        Page::Login => rsx! { Login {} },
        Page::Register => rsx! { Register {} },
        Page::StudentDashboard => rsx! {
            RouteGuard { allowed_roles: vec![Role::Student], StudentDashboard {} }
        },
        Page::ReportInjury => rsx! {
            RouteGuard { allowed_roles: vec![Role::Student], ReportInjury {} }
        },
        Page::InjuryDetail => {
            let injury_id = matched.params.get("id").unwrap_or_default().to_string();
            rsx! {
                RouteGuard {
                    allowed_roles: vec![Role::Student],
                    InjuryDetail { injury_id }
                }
            }
        }
        Page::PractitionerDashboard => rsx! {
            RouteGuard { allowed_roles: vec![Role::Practitioner], PractitionerDashboard {} }
        },
        Page::AdminDashboard => rsx! {
            RouteGuard { allowed_roles: vec![Role::Admin], AdminDashboard {} }
        },
        Page::NotFound => rsx! { NotFound {} },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_path_resolves_to_its_page() {
        let table = routes();
        let cases = [
            ("/", Page::Landing),
            ("/login", Page::Login),
            ("/register", Page::Register),
            ("/student/dashboard", Page::StudentDashboard),
            ("/student/report-injury", Page::ReportInjury),
            ("/student/injury/injury-3", Page::InjuryDetail),
            ("/practitioner/dashboard", Page::PractitionerDashboard),
            ("/admin/dashboard", Page::AdminDashboard),
            ("/student/appointments", Page::NotFound),
        ];
        for (path, page) in cases {
            assert_eq!(*table.resolve(path).unwrap().view, page, "{path}");
        }
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = ServiceConfig::from_toml(CONFIG_TOML).unwrap();
        assert_eq!(config.session.storage_key, "sportcare.session");
    }

    #[test]
    fn test_every_dashboard_is_routed() {
        let table = routes();
        for role in Role::ALL {
            let matched = table.resolve(paths::dashboard_for(role)).unwrap();
            assert_ne!(*matched.view, Page::NotFound);
        }
    }
}
