// Identity attached to a request after token verification.
// Scoped to a single request's extensions; never shared across requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::Role;

/// Authenticated account information extracted from a verified session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub role: Role,
    pub token_id: String,
    pub exp: u64,
}
