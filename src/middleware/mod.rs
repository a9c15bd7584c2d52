// Middleware modules for Gatehouse
// Fixed pipeline on protected routes: token verifier first, then the role
// gate for routes with an allow-list.

pub mod auth;
pub mod auth_middleware;
pub mod role_gate;

pub use auth::AuthenticatedAccount;
pub use auth_middleware::auth_middleware;
pub use role_gate::{evaluate, require_admin, require_roles, GateDecision, RejectReason};
