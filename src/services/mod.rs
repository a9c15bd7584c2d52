// Service modules for Gatehouse

pub mod account;
pub mod token;

pub use account::{AccountService, LoggedInAccount, RegisteredAccount};
pub use token::{TokenConfig, TokenError, TokenService};
