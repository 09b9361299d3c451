//! Roles and the advisory client-side route gate.
//!
//! The route table mirrors the portal's navigation: `/student/*` pages
//! require a Student session, `/admin/*` pages an Administrator one.
//! `can_enter` is a pure routing decision for the browser client; the
//! server-side guard in [`crate::auth::guard`] is the actual
//! enforcement point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Closed set of portal roles. The wire strings are `"Student"` and
/// `"Administrator"`, both in token claims and in login responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Student,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "Student"),
            Self::Administrator => write!(f, "Administrator"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Self::Student),
            "Administrator" => Ok(Self::Administrator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Role required to enter a route, or `None` for public routes.
#[must_use]
pub fn required_role(route: &str) -> Option<Role> {
    if route == "/student" || route.starts_with("/student/") {
        Some(Role::Student)
    } else if route == "/admin" || route.starts_with("/admin/") {
        Some(Role::Administrator)
    } else {
        None
    }
}

/// Whether a session with the given role may navigate into `route`.
///
/// Absent session or role mismatch means no: the client redirects to
/// the public entry point.
#[must_use]
pub fn can_enter(route: &str, session_role: Option<Role>) -> bool {
    match required_role(route) {
        None => true,
        Some(required) => session_role == Some(required),
    }
}
