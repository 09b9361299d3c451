pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod me;
pub use self::me::me;

// common functions for the handlers
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

pub fn valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}
