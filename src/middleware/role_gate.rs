// Role gate: allow-list authorization over the closed Role enum.
//
// The decision is an explicit sum type produced by a pure function, composed
// into the route pipeline by thin axum wrappers. Exact membership test, no
// hierarchy.

use std::future::Future;
use std::pin::Pin;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthenticatedAccount;
use crate::models::account::Role;
use crate::utils::auth_errors::AuthError;

/// Outcome of a gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Reject(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// No identity on the request: the verifier did not run, or was bypassed.
    /// Maps to 401, never 403.
    Unauthenticated,
    /// Authenticated, but the role is outside the allow-list. Maps to 403.
    Forbidden { actual: Role },
}

/// Evaluate the gate for an (optional) identity against an allow-list.
pub fn evaluate(identity: Option<&AuthenticatedAccount>, allowed: &[Role]) -> GateDecision {
    let Some(identity) = identity else {
        return GateDecision::Reject(RejectReason::Unauthenticated);
    };

    if allowed.contains(&identity.role) {
        GateDecision::Allow
    } else {
        GateDecision::Reject(RejectReason::Forbidden {
            actual: identity.role,
        })
    }
}

async fn enforce(allowed: &'static [Role], request: Request<Body>, next: Next) -> Response {
    match evaluate(request.extensions().get::<AuthenticatedAccount>(), allowed) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Reject(RejectReason::Unauthenticated) => {
            tracing::warn!("role gate reached without an authenticated identity");
            AuthError::Unauthenticated.into_response()
        },
        GateDecision::Reject(RejectReason::Forbidden { actual }) => {
            tracing::info!(role = actual.as_str(), "role gate rejected request");
            AuthError::Forbidden.into_response()
        },
    }
}

/// Build a middleware admitting only the listed roles, for use with
/// `axum::middleware::from_fn`.
pub fn require_roles(
    allowed: &'static [Role],
) -> impl Fn(Request<Body>, Next) -> Pin<Box<dyn Future<Output = Response> + Send>>
       + Clone
       + Send
       + Sync
       + 'static {
    move |request, next| Box::pin(enforce(allowed, request, next))
}

/// Middleware: admit administrators only
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    enforce(&[Role::Admin], request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> AuthenticatedAccount {
        AuthenticatedAccount {
            account_id: Uuid::new_v4(),
            role,
            token_id: Uuid::new_v4().to_string(),
            exp: u64::MAX,
        }
    }

    #[test]
    fn test_admits_iff_role_in_allow_list() {
        let admin = identity(Role::Admin);
        let standard = identity(Role::Standard);
        let partner = identity(Role::Partner);

        assert_eq!(evaluate(Some(&admin), &[Role::Admin]), GateDecision::Allow);
        assert_eq!(
            evaluate(Some(&standard), &[Role::Admin]),
            GateDecision::Reject(RejectReason::Forbidden {
                actual: Role::Standard
            })
        );
        assert_eq!(
            evaluate(Some(&partner), &[Role::Admin, Role::Standard]),
            GateDecision::Reject(RejectReason::Forbidden {
                actual: Role::Partner
            })
        );
        assert_eq!(
            evaluate(Some(&partner), &[Role::Partner, Role::Standard]),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_no_role_hierarchy() {
        // Admin is not implicitly admitted to non-admin routes
        let admin = identity(Role::Admin);
        assert_eq!(
            evaluate(Some(&admin), &[Role::Partner]),
            GateDecision::Reject(RejectReason::Forbidden { actual: Role::Admin })
        );
    }

    #[test]
    fn test_missing_identity_is_unauthenticated_not_forbidden() {
        assert_eq!(
            evaluate(None, &[Role::Admin]),
            GateDecision::Reject(RejectReason::Unauthenticated)
        );
    }

    #[test]
    fn test_empty_allow_list_rejects_everyone() {
        let admin = identity(Role::Admin);
        assert!(matches!(
            evaluate(Some(&admin), &[]),
            GateDecision::Reject(RejectReason::Forbidden { .. })
        ));
    }
}
