// Database and token models for Gatehouse

pub mod account;
pub mod auth;

pub use account::{Account, AccountError, AccountUpdate, NewAccount, Role};
pub use auth::SessionClaims;
