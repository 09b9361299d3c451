//! Authentication and session-authorization core.
//!
//! Credential verification, token issuance and validation, role-based
//! access gating, and the client session contract. Everything here is
//! request-scoped and stateless except the login rate limiter, which
//! keeps a bounded in-memory window per email.

pub mod error;
pub mod guard;
pub mod password;
pub mod rate_limit;
pub mod role;
pub mod session;
pub mod token;

pub use self::error::AuthError;
pub use self::guard::{authorize, require_role};
pub use self::password::verify_credentials;
pub use self::rate_limit::{FixedWindowLimiter, NoopRateLimiter, RateLimiter};
pub use self::role::Role;
pub use self::session::Session;
pub use self::token::{Claims, TokenKeys, TOKEN_TTL_SECONDS};
