//! Client-held session contract.
//!
//! The browser keeps `{token, role}` in durable storage, attaches the
//! token to every protected call and clears the pair on logout or on
//! any 401. The server keeps nothing: logout is client-only and the
//! token stays valid until natural expiry.

use crate::auth::error::AuthError;
use crate::auth::role::Role;

/// What the client stores after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    /// Establish a session from a login response, checking the role the
    /// user selected on the form against the role the server resolved.
    ///
    /// On mismatch the just-issued token is discarded and the caller
    /// surfaces an explicit role-mismatch error instead of silently
    /// logging in under the wrong role.
    pub fn establish(token: String, selected: Role, granted: Role) -> Result<Self, AuthError> {
        if selected == granted {
            Ok(Self {
                token,
                role: granted,
            })
        } else {
            Err(AuthError::RoleMismatch { selected, granted })
        }
    }

    /// Landing route after login, per the portal's navigation.
    #[must_use]
    pub fn landing_route(&self) -> &'static str {
        match self.role {
            Role::Student => "/student/dashboard",
            Role::Administrator => "/admin/dashboard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::role::can_enter;

    #[test]
    fn matching_roles_establish_a_session() {
        let session =
            Session::establish("tok".into(), Role::Student, Role::Student).unwrap();
        assert_eq!(session.role, Role::Student);
        assert_eq!(session.landing_route(), "/student/dashboard");
        assert!(can_enter(session.landing_route(), Some(session.role)));
    }

    #[test]
    fn mismatch_discards_the_token_and_names_both_roles() {
        let err = Session::establish("tok".into(), Role::Administrator, Role::Student)
            .unwrap_err();

        match err {
            AuthError::RoleMismatch { selected, granted } => {
                assert_eq!(selected, Role::Administrator);
                assert_eq!(granted, Role::Student);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_session_never_reaches_admin_routes() {
        // A Student who selected Administrator ends with no session at
        // all, so every admin route stays closed.
        let result = Session::establish("tok".into(), Role::Administrator, Role::Student);
        assert!(result.is_err());
        assert!(!can_enter("/admin/dashboard", None));
    }

    #[test]
    fn admin_lands_on_admin_dashboard() {
        let session = Session::establish(
            "tok".into(),
            Role::Administrator,
            Role::Administrator,
        )
        .unwrap();
        assert_eq!(session.landing_route(), "/admin/dashboard");
    }
}
