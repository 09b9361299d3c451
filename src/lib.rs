pub mod auth;
pub mod cli;
pub mod eduerp;
pub mod store;
