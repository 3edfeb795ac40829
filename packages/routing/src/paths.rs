//! Well-known paths of the application.

use store::Role;

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const STUDENT_DASHBOARD: &str = "/student/dashboard";
pub const REPORT_INJURY: &str = "/student/report-injury";
pub const INJURY_DETAIL: &str = "/student/injury/:id";
pub const PRACTITIONER_DASHBOARD: &str = "/practitioner/dashboard";
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const WILDCARD: &str = "*";

/// Home page of each role.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Student => STUDENT_DASHBOARD,
        Role::Practitioner => PRACTITIONER_DASHBOARD,
        Role::Admin => ADMIN_DASHBOARD,
    }
}

/// Concrete path of one injury's detail page.
pub fn injury_detail(injury_id: &str) -> String {
    format!("/student/injury/{injury_id}")
}
