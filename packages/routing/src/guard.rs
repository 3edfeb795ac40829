//! # Route guard — who may see a protected view
//!
//! [`evaluate`] maps a [`SessionState`] and an optional role allow-list to one of
//! four [`Access`] outcomes:
//!
//! | Outcome | When | Rendered |
//! |---------|------|----------|
//! | `Loading` | `state.loading` | spinner |
//! | `Unauthenticated` | no user | nothing; one redirect to `/login` |
//! | `Forbidden` | roles given and the profile has another role | access-denied panel |
//! | `Authorized` | otherwise, including a signed-in user whose profile is missing | the protected view |
//!
//! [`RouteGuard`] carries the redirect latch: the login redirect is issued once when
//! the guard first observes `Unauthenticated`, and re-armed only after access is
//! granted or refused again. Observing happens after state changes, never during
//! rendering.

use store::{Role, SessionState};

use crate::navigation::Navigator;
use crate::paths;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Loading,
    Unauthenticated,
    Forbidden,
    Authorized,
}

pub fn evaluate(state: &SessionState, allowed_roles: Option<&[Role]>) -> Access {
    if state.loading {
        return Access::Loading;
    }
    if state.user.is_none() {
        return Access::Unauthenticated;
    }
    let Some(roles) = allowed_roles else {
        return Access::Authorized;
    };
    // a user without a profile row yet is let through
    match state.role() {
        Some(role) if !roles.contains(&role) => Access::Forbidden,
        _ => Access::Authorized,
    }
}

/// A guard instance for one protected view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteGuard {
    allowed_roles: Option<Vec<Role>>,
    redirected: bool,
}

impl RouteGuard {
    pub fn new(allowed_roles: Option<Vec<Role>>) -> Self {
        Self {
            allowed_roles,
            redirected: false,
        }
    }

    /// Any signed-in user passes.
    pub fn signed_in() -> Self {
        Self::new(None)
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self::new(Some(roles.to_vec()))
    }

    pub fn allowed_roles(&self) -> Option<&[Role]> {
        self.allowed_roles.as_deref()
    }

    pub fn access(&self, state: &SessionState) -> Access {
        evaluate(state, self.allowed_roles())
    }

    /// Evaluate `state` and, on the first `Unauthenticated` of an episode,
    /// navigate to the login page.
    pub fn observe(&mut self, state: &SessionState, navigator: &Navigator) -> Access {
        let access = self.access(state);
        match access {
            Access::Unauthenticated if !self.redirected => {
                self.redirected = true;
                tracing::info!(from = %navigator.current_path(), "Not signed in, redirecting to login");
                navigator.navigate(paths::LOGIN);
            }
            Access::Authorized | Access::Forbidden => self.redirected = false,
            Access::Unauthenticated | Access::Loading => {}
        }
        access
    }
}

/// Where a signed-in user landing on a public page should be sent.
///
/// Returns the role's dashboard for `/`, `/login` and `/register` once the
/// session is resolved and the profile is known.
pub fn landing_redirect(path: &str, state: &SessionState) -> Option<&'static str> {
    if state.loading || state.user.is_none() {
        return None;
    }
    let role = state.role()?;
    matches!(path, paths::ROOT | paths::LOGIN | paths::REGISTER).then(|| paths::dashboard_for(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::{Profile, User};

    fn user() -> User {
        User {
            id: "user-1".into(),
            email: "sam@uni.example".into(),
        }
    }

    fn profile(role: Role) -> Profile {
        Profile {
            id: "user-1".into(),
            full_name: "Sam Lee".into(),
            email: "sam@uni.example".into(),
            role,
            profile_pic_url: None,
            sport: None,
            specialization: None,
            phone: None,
            student_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn signed_in(role: Option<Role>) -> SessionState {
        SessionState {
            user: Some(user()),
            profile: role.map(profile),
            session: None,
            loading: false,
        }
    }

    fn signed_out() -> SessionState {
        SessionState {
            loading: false,
            ..SessionState::default()
        }
    }

    #[test]
    fn test_loading_wins() {
        let mut state = signed_in(Some(Role::Admin));
        state.loading = true;
        assert_eq!(evaluate(&state, Some(&[Role::Student])), Access::Loading);
        assert_eq!(evaluate(&SessionState::default(), None), Access::Loading);
    }

    #[test]
    fn test_unauthenticated() {
        assert_eq!(evaluate(&signed_out(), None), Access::Unauthenticated);
        assert_eq!(
            evaluate(&signed_out(), Some(&[Role::Student])),
            Access::Unauthenticated
        );
    }

    #[test]
    fn test_role_checks() {
        let student = signed_in(Some(Role::Student));
        assert_eq!(evaluate(&student, Some(&[Role::Student])), Access::Authorized);
        assert_eq!(
            evaluate(&student, Some(&[Role::Practitioner, Role::Admin])),
            Access::Forbidden
        );
        assert_eq!(evaluate(&student, None), Access::Authorized);
        assert_eq!(evaluate(&student, Some(&[])), Access::Forbidden);
    }

    #[test]
    fn test_missing_profile_is_authorized() {
        let state = signed_in(None);
        assert_eq!(evaluate(&state, Some(&[Role::Student])), Access::Authorized);
        assert_eq!(evaluate(&state, Some(&[Role::Admin])), Access::Authorized);
        assert_eq!(evaluate(&state, None), Access::Authorized);

        let nav = Navigator::in_memory("/student/dashboard");
        let mut guard = RouteGuard::roles(&[Role::Student]);
        assert_eq!(guard.observe(&state, &nav), Access::Authorized);
        assert_eq!(nav.current_path(), "/student/dashboard");
    }

    #[test]
    fn test_redirects_once_per_episode() {
        let nav = Navigator::in_memory("/student/dashboard");
        let mut guard = RouteGuard::roles(&[Role::Student]);

        assert_eq!(guard.observe(&SessionState::default(), &nav), Access::Loading);
        assert_eq!(nav.current_path(), "/student/dashboard");

        assert_eq!(guard.observe(&signed_out(), &nav), Access::Unauthenticated);
        assert_eq!(nav.current_path(), "/login");

        nav.navigate("/student/dashboard");
        guard.observe(&signed_out(), &nav);
        assert_eq!(nav.current_path(), "/student/dashboard");

        // a later episode redirects again
        guard.observe(&signed_in(Some(Role::Student)), &nav);
        guard.observe(&signed_out(), &nav);
        assert_eq!(nav.current_path(), "/login");
    }

    #[test]
    fn test_landing_redirect() {
        let practitioner = signed_in(Some(Role::Practitioner));
        assert_eq!(
            landing_redirect("/", &practitioner),
            Some("/practitioner/dashboard")
        );
        assert_eq!(
            landing_redirect("/login", &signed_in(Some(Role::Admin))),
            Some("/admin/dashboard")
        );
        assert_eq!(landing_redirect("/student/dashboard", &practitioner), None);
        assert_eq!(landing_redirect("/", &signed_out()), None);
        assert_eq!(landing_redirect("/", &signed_in(None)), None);
        assert_eq!(landing_redirect("/", &SessionState::default()), None);
    }
}
